//! Delivery address book for the current session.
//!
//! Addresses are owned by the backend address book; the session keeps a
//! locally fetched snapshot plus a cursor to the selected entry. Creating
//! or editing addresses is delegated entirely to the external
//! address-entry flow.

use serde::{Deserialize, Serialize};

use greenbasket_core::AddressId;

/// A delivery address from the shopper's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Backend-issued identifier.
    #[serde(rename = "_id")]
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Address {
    /// Format the address as a single line for display.
    #[must_use]
    pub fn formatted_single_line(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.street, self.city, self.state, self.country
        )
    }
}

/// Fetched address snapshot plus the selected-address cursor.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    addresses: Vec<Address>,
    selected: Option<AddressId>,
}

impl AddressBook {
    /// All fetched addresses, in backend order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The currently selected address, if the cursor resolves against the
    /// snapshot.
    #[must_use]
    pub fn selected(&self) -> Option<&Address> {
        let id = self.selected.as_ref()?;
        self.addresses.iter().find(|a| &a.id == id)
    }

    /// Point the cursor at an address. Pure state update, always succeeds.
    pub fn select(&mut self, id: AddressId) {
        self.selected = Some(id);
    }

    /// Replace the snapshot with a freshly fetched list.
    ///
    /// When nothing is selected yet and the list is non-empty, the first
    /// address becomes the default selection; an existing selection is
    /// kept.
    pub fn load(&mut self, addresses: Vec<Address>) {
        self.addresses = addresses;
        if self.selected.is_none()
            && let Some(first) = self.addresses.first()
        {
            self.selected = Some(first.id.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn address(id: &str, street: &str) -> Address {
        Address {
            id: AddressId::new(id),
            street: street.to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn load_selects_the_first_address_by_default() {
        let mut book = AddressBook::default();
        book.load(vec![address("a1", "12 MG Road"), address("a2", "4 Hill St")]);

        assert_eq!(book.selected().unwrap().id, AddressId::new("a1"));
    }

    #[test]
    fn load_keeps_an_existing_selection() {
        let mut book = AddressBook::default();
        book.load(vec![address("a1", "12 MG Road"), address("a2", "4 Hill St")]);
        book.select(AddressId::new("a2"));
        book.load(vec![address("a1", "12 MG Road"), address("a2", "4 Hill St")]);

        assert_eq!(book.selected().unwrap().id, AddressId::new("a2"));
    }

    #[test]
    fn load_of_empty_list_selects_nothing() {
        let mut book = AddressBook::default();
        book.load(vec![]);

        assert!(book.selected().is_none());
        assert!(book.addresses().is_empty());
    }

    #[test]
    fn stale_cursor_resolves_to_none_after_refresh() {
        let mut book = AddressBook::default();
        book.load(vec![address("a1", "12 MG Road")]);
        book.load(vec![address("a2", "4 Hill St")]);

        // Cursor still points at a1, which is gone from the snapshot.
        assert!(book.selected().is_none());
    }

    #[test]
    fn formatted_single_line_joins_all_parts() {
        assert_eq!(
            address("a1", "12 MG Road").formatted_single_line(),
            "12 MG Road, Pune, Maharashtra, India"
        );
    }

    #[test]
    fn address_deserializes_from_backend_json() {
        let json = r#"{
            "_id": "a1",
            "street": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra",
            "country": "India"
        }"#;

        let parsed: Address = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, address("a1", "12 MG Road"));
    }
}
