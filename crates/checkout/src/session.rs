//! One shopper's session: cart, catalog snapshot, address book, payment
//! choice, and the order submission state machine.
//!
//! No ambient context: the session is constructed once, owns all checkout
//! state, and views borrow it. External collaborators push data in
//! (catalog refreshes, the signed-in user) and the session never reaches
//! back out except through its [`StoreApi`] handle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use greenbasket_core::{AddressId, ProductId, UserId, format_amount};

use crate::address::{Address, AddressBook};
use crate::api::{OrderItemInput, OrderRequest, StoreApi};
use crate::cart::{CartItems, CartLine};
use crate::catalog::{Catalog, Product};
use crate::checkout::{CheckoutPhase, OrderTotals, PaymentOption, order_totals};
use crate::config::CheckoutConfig;
use crate::error::CheckoutError;

/// The signed-in shopper, as handed over by the external auth flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Where the shopper is sent after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The order-history view, which doubles as order confirmation.
    OrderHistory,
}

/// Outcome of a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlaced {
    /// Server confirmation message, surfaced to the shopper.
    pub message: String,
    /// Navigation hand-off for the embedding view layer.
    pub destination: Destination,
}

/// Everything a storefront view needs for one shopper session.
pub struct Session<A: StoreApi> {
    config: CheckoutConfig,
    api: A,
    user: Option<User>,
    catalog: Catalog,
    cart: CartItems,
    addresses: AddressBook,
    payment: PaymentOption,
    phase: CheckoutPhase,
    search_query: String,
}

impl<A: StoreApi> Session<A> {
    /// Create a fresh session with an empty cart and catalog.
    #[must_use]
    pub fn new(config: CheckoutConfig, api: A) -> Self {
        Self {
            config,
            api,
            user: None,
            catalog: Catalog::default(),
            cart: CartItems::new(),
            addresses: AddressBook::default(),
            payment: PaymentOption::default(),
            phase: CheckoutPhase::default(),
            search_query: String::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Currency display symbol for this session.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.config.currency_symbol
    }

    /// Format an amount with the session currency at two decimal places.
    #[must_use]
    pub fn display_amount(&self, amount: Decimal) -> String {
        format_amount(&self.config.currency_symbol, amount)
    }

    // ─────────────────────────────────────────────────────────────────────
    // User
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Adopt the shopper signed in by the external auth flow.
    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Drop the signed-in shopper along with the fetched address book.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.addresses = AddressBook::default();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Adopt a refreshed catalog as one atomic update.
    pub fn replace_catalog(&mut self, products: Vec<Product>) {
        self.catalog.replace(products);
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Catalog products matching the current search query.
    #[must_use]
    pub fn search_results(&self) -> Vec<&Product> {
        self.catalog.search(&self.search_query)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cart
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn cart(&self) -> &CartItems {
        &self.cart
    }

    pub fn add_to_cart(&mut self, id: &ProductId) {
        self.cart.add(id);
    }

    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove(id);
    }

    pub fn update_cart_item(&mut self, id: &ProductId, quantity: u32) {
        self.cart.set_quantity(id, quantity);
    }

    /// Total number of items in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart.count()
    }

    /// Cart amount at offer prices, truncated to whole cents.
    #[must_use]
    pub fn cart_amount(&self) -> Decimal {
        self.cart.amount(&self.catalog)
    }

    /// Display-ready cart lines: the cart joined against the live catalog.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.project(&self.catalog)
    }

    /// Subtotal, tax, and total for the current cart projection.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        order_totals(&self.cart_lines(), self.config.tax_rate_percent)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Addresses
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        self.addresses.addresses()
    }

    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        self.addresses.selected()
    }

    /// Point the delivery-address cursor at an address.
    pub fn select_address(&mut self, id: AddressId) {
        self.addresses.select(id);
    }

    /// Fetch the shopper's address book from the backend.
    ///
    /// Guest sessions skip the fetch: the address list stays empty and
    /// submission fails address validation. On failure the previously
    /// fetched list is left untouched so checkout can continue against it.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection message or the transport failure;
    /// both are recoverable by retrying.
    #[instrument(skip(self))]
    pub async fn refresh_addresses(&mut self) -> Result<(), CheckoutError> {
        if self.user.is_none() {
            tracing::debug!("guest session, skipping address fetch");
            return Ok(());
        }

        match self.api.fetch_addresses().await {
            Ok(addresses) => {
                self.addresses.load(addresses);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "address fetch failed");
                Err(CheckoutError::from_api(err))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Checkout
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn payment(&self) -> PaymentOption {
        self.payment
    }

    pub fn set_payment(&mut self, payment: PaymentOption) {
        self.payment = payment;
    }

    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Submit the current cart as an order.
    ///
    /// Runs the submission state machine: validates that an address is
    /// selected and the projection is non-empty, then places a
    /// cash-on-delivery order. On acceptance the cart is cleared and
    /// navigation is handed to the order-history view. Every failure
    /// leaves cart and address state intact for retry.
    ///
    /// # Errors
    ///
    /// Validation errors never leave the client; `Rejected` carries the
    /// server message verbatim; `Api` wraps transport failures.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<OrderPlaced, CheckoutError> {
        if self.phase == CheckoutPhase::Submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }
        self.phase = CheckoutPhase::Validating;

        let Some(address_id) = self.selected_address().map(|a| a.id.clone()) else {
            self.phase = CheckoutPhase::Idle;
            return Err(CheckoutError::NoAddress);
        };

        let lines = self.cart_lines();
        if lines.is_empty() {
            self.phase = CheckoutPhase::Idle;
            return Err(CheckoutError::EmptyCart);
        }

        if self.payment == PaymentOption::Online {
            self.phase = CheckoutPhase::Idle;
            return Err(CheckoutError::OnlineNotSupported);
        }

        let request = OrderRequest {
            items: lines
                .iter()
                .map(|line| OrderItemInput {
                    product: line.product.id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            address: address_id,
        };

        self.phase = CheckoutPhase::Submitting;
        match self.api.place_cod_order(request).await {
            Ok(message) => {
                self.phase = CheckoutPhase::Succeeded;
                self.cart.clear();
                tracing::info!("order placed, cart cleared");
                Ok(OrderPlaced {
                    message,
                    destination: Destination::OrderHistory,
                })
            }
            Err(err) => {
                self.phase = CheckoutPhase::Failed;
                tracing::warn!(error = %err, "order submission failed");
                Err(CheckoutError::from_api(err))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::address::tests::address;
    use crate::api::ApiError;
    use crate::catalog::tests::product;

    enum OrderOutcome {
        Accept(String),
        Reject(String),
        Transport,
    }

    /// Scripted in-memory backend.
    struct StubApi {
        addresses: RefCell<Vec<Address>>,
        address_failure: RefCell<Option<String>>,
        order_outcome: RefCell<OrderOutcome>,
        orders: RefCell<Vec<OrderRequest>>,
        fetch_calls: Cell<u32>,
    }

    impl Default for StubApi {
        fn default() -> Self {
            Self {
                addresses: RefCell::new(vec![]),
                address_failure: RefCell::new(None),
                order_outcome: RefCell::new(OrderOutcome::Accept("Order placed".to_string())),
                orders: RefCell::new(vec![]),
                fetch_calls: Cell::new(0),
            }
        }
    }

    fn transport_error() -> ApiError {
        ApiError::Parse(serde_json::from_str::<serde_json::Value>("not json").unwrap_err())
    }

    impl StoreApi for Rc<StubApi> {
        async fn fetch_addresses(&self) -> Result<Vec<Address>, ApiError> {
            self.fetch_calls.set(self.fetch_calls.get() + 1);
            match self.address_failure.borrow().clone() {
                Some(message) => Err(ApiError::Rejected(message)),
                None => Ok(self.addresses.borrow().clone()),
            }
        }

        async fn place_cod_order(&self, order: OrderRequest) -> Result<String, ApiError> {
            self.orders.borrow_mut().push(order);
            match &*self.order_outcome.borrow() {
                OrderOutcome::Accept(message) => Ok(message.clone()),
                OrderOutcome::Reject(message) => Err(ApiError::Rejected(message.clone())),
                OrderOutcome::Transport => Err(transport_error()),
            }
        }
    }

    fn config() -> CheckoutConfig {
        CheckoutConfig {
            api_base_url: "http://localhost:4000".to_string(),
            currency_symbol: "₹".to_string(),
            tax_rate_percent: "2".parse().unwrap(),
        }
    }

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    fn session() -> (Session<Rc<StubApi>>, Rc<StubApi>) {
        let stub = Rc::new(StubApi::default());
        (Session::new(config(), Rc::clone(&stub)), stub)
    }

    /// Session with a one-product catalog, signed-in user, and a selected
    /// address - one step away from a valid submission.
    fn checkout_ready() -> (Session<Rc<StubApi>>, Rc<StubApi>) {
        let (mut session, stub) = session();
        session.replace_catalog(vec![product("p1", "Potato", "Vegetables", "100")]);
        session.sign_in(user());
        stub.addresses.borrow_mut().push(address("a1", "12 MG Road"));
        (session, stub)
    }

    #[test]
    fn totals_follow_the_cart_projection() {
        let (mut session, _) = session();
        session.replace_catalog(vec![product("p1", "Potato", "Vegetables", "100")]);
        session.add_to_cart(&ProductId::new("p1"));
        session.add_to_cart(&ProductId::new("p1"));

        let totals = session.totals();
        assert_eq!(totals.subtotal, "200".parse().unwrap());
        assert_eq!(totals.tax, "4".parse().unwrap());
        assert_eq!(totals.total, "204".parse().unwrap());
        assert_eq!(session.display_amount(totals.total), "₹204.00");
    }

    #[test]
    fn cart_operations_delegate_to_the_store() {
        let (mut session, _) = session();
        session.replace_catalog(vec![product("p1", "Potato", "Vegetables", "25")]);

        session.add_to_cart(&ProductId::new("p1"));
        session.update_cart_item(&ProductId::new("p1"), 4);
        assert_eq!(session.cart_count(), 4);
        assert_eq!(session.cart_amount(), "100".parse().unwrap());

        session.remove_from_cart(&ProductId::new("p1"));
        assert_eq!(session.cart_count(), 3);
    }

    #[test]
    fn search_results_come_from_the_catalog() {
        let (mut session, _) = session();
        session.replace_catalog(vec![
            product("p1", "Green Apple", "Fruits", "90"),
            product("p2", "Banana", "Fruits", "40"),
        ]);
        session.set_search_query("apple");

        let names: Vec<_> = session
            .search_results()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, ["Green Apple"]);
    }

    #[tokio::test]
    async fn guest_sessions_skip_the_address_fetch() {
        let (mut session, stub) = session();

        session.refresh_addresses().await.unwrap();

        assert_eq!(stub.fetch_calls.get(), 0);
        assert!(session.addresses().is_empty());
        assert!(session.selected_address().is_none());
    }

    #[tokio::test]
    async fn refresh_loads_addresses_and_selects_the_first() {
        let (mut session, stub) = session();
        session.sign_in(user());
        stub.addresses
            .borrow_mut()
            .extend([address("a1", "12 MG Road"), address("a2", "4 Hill St")]);

        session.refresh_addresses().await.unwrap();

        assert_eq!(session.addresses().len(), 2);
        assert_eq!(
            session.selected_address().unwrap().id,
            AddressId::new("a1")
        );
    }

    #[tokio::test]
    async fn failed_refresh_leaves_the_previous_list_untouched() {
        let (mut session, stub) = session();
        session.sign_in(user());
        stub.addresses.borrow_mut().push(address("a1", "12 MG Road"));
        session.refresh_addresses().await.unwrap();

        *stub.address_failure.borrow_mut() = Some("session expired".to_string());
        let err = session.refresh_addresses().await.unwrap_err();

        assert_eq!(err.to_string(), "session expired");
        assert_eq!(session.addresses().len(), 1);
        assert_eq!(
            session.selected_address().unwrap().id,
            AddressId::new("a1")
        );
    }

    #[tokio::test]
    async fn submit_without_address_fails_validation() {
        let (mut session, stub) = checkout_ready();
        session.add_to_cart(&ProductId::new("p1"));
        // Address book never fetched, so no selection exists.

        let err = session.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::NoAddress));
        assert!(err.is_validation());
        assert_eq!(session.phase(), CheckoutPhase::Idle);
        assert_eq!(session.cart_count(), 1);
        assert!(stub.orders.borrow().is_empty());
    }

    #[tokio::test]
    async fn submit_with_empty_cart_fails_validation() {
        let (mut session, stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();

        let err = session.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(session.phase(), CheckoutPhase::Idle);
        assert!(stub.orders.borrow().is_empty());
    }

    #[tokio::test]
    async fn cart_entries_without_catalog_products_do_not_count_as_lines() {
        let (mut session, stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();
        session.add_to_cart(&ProductId::new("vanished"));

        let err = session.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(stub.orders.borrow().is_empty());
    }

    #[tokio::test]
    async fn successful_submission_clears_the_cart_and_hands_off_navigation() {
        let (mut session, _stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();
        session.add_to_cart(&ProductId::new("p1"));

        let placed = session.place_order().await.unwrap();

        assert_eq!(placed.message, "Order placed");
        assert_eq!(placed.destination, Destination::OrderHistory);
        assert_eq!(session.phase(), CheckoutPhase::Succeeded);
        assert!(session.cart().is_empty());
        // Address selection survives the submission.
        assert!(session.selected_address().is_some());
    }

    #[tokio::test]
    async fn submitted_order_carries_line_items_and_address_id() {
        let (mut session, stub) = checkout_ready();
        session.replace_catalog(vec![
            product("p1", "Potato", "Vegetables", "25"),
            product("p2", "Tomato", "Vegetables", "30"),
        ]);
        session.refresh_addresses().await.unwrap();
        session.update_cart_item(&ProductId::new("p1"), 2);
        session.add_to_cart(&ProductId::new("p2"));

        session.place_order().await.unwrap();

        let orders = stub.orders.borrow();
        let order = orders.first().unwrap();
        assert_eq!(order.address, AddressId::new("a1"));
        assert_eq!(
            order.items,
            vec![
                OrderItemInput {
                    product: ProductId::new("p1"),
                    quantity: 2,
                },
                OrderItemInput {
                    product: ProductId::new("p2"),
                    quantity: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn online_payment_is_an_explicit_stub() {
        let (mut session, stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();
        session.add_to_cart(&ProductId::new("p1"));
        session.set_payment(PaymentOption::Online);

        let err = session.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::OnlineNotSupported));
        assert_eq!(session.phase(), CheckoutPhase::Idle);
        assert_eq!(session.cart_count(), 1);
        assert!(stub.orders.borrow().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_keeps_the_cart_and_allows_retry() {
        let (mut session, stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();
        session.add_to_cart(&ProductId::new("p1"));
        *stub.order_outcome.borrow_mut() = OrderOutcome::Reject("Out of stock".to_string());

        let err = session.place_order().await.unwrap_err();
        assert_eq!(err.to_string(), "Out of stock");
        assert!(matches!(err, CheckoutError::Rejected(_)));
        assert_eq!(session.phase(), CheckoutPhase::Failed);
        assert_eq!(session.cart_count(), 1);

        // The shopper retries after the backend recovers.
        *stub.order_outcome.borrow_mut() = OrderOutcome::Accept("Order placed".to_string());
        let placed = session.place_order().await.unwrap();
        assert_eq!(placed.message, "Order placed");
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_rejection() {
        let (mut session, stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();
        session.add_to_cart(&ProductId::new("p1"));
        *stub.order_outcome.borrow_mut() = OrderOutcome::Transport;

        let err = session.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::Api(_)));
        assert!(!err.is_validation());
        assert_eq!(session.phase(), CheckoutPhase::Failed);
        assert_eq!(session.cart_count(), 1);
    }

    #[tokio::test]
    async fn sign_out_drops_the_address_book() {
        let (mut session, _stub) = checkout_ready();
        session.refresh_addresses().await.unwrap();
        assert!(!session.addresses().is_empty());

        session.sign_out();

        assert!(session.user().is_none());
        assert!(session.addresses().is_empty());
        assert!(session.selected_address().is_none());
    }
}
