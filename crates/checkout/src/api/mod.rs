//! Backend API seam for the checkout flow.
//!
//! The engine depends on exactly two remote operations: fetching the
//! shopper's address book and placing a cash-on-delivery order. Both go
//! through the [`StoreApi`] trait so the production `reqwest` client
//! ([`ApiClient`]) and in-memory test backends are interchangeable.
//!
//! The backend wraps every response in a `{success, message}` envelope and
//! reports domain failures as `success: false` with an HTTP 200, so the
//! client distinguishes three failure classes: the request never completed
//! ([`ApiError::Http`]), the body was not the expected shape
//! ([`ApiError::Parse`]), or the server processed the request and said no
//! ([`ApiError::Rejected`]).

mod client;

pub use client::ApiClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenbasket_core::{AddressId, ProductId};

use crate::address::Address;

/// Errors from backend API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, non-success status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The server processed the request and reported failure; the message
    /// is server-supplied.
    #[error("{0}")]
    Rejected(String),
}

/// Envelope for `GET /api/address/get`.
#[derive(Debug, Deserialize)]
pub struct AddressListResponse {
    pub success: bool,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One order line as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product: ProductId,
    pub quantity: u32,
}

/// Body for `POST /api/order/cod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItemInput>,
    pub address: AddressId,
}

/// Envelope for `POST /api/order/cod`.
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Remote backend operations the session engine depends on.
///
/// The session is single-threaded, so implementations never need `Send`
/// futures.
#[allow(async_fn_in_trait)]
pub trait StoreApi {
    /// Fetch the authenticated shopper's address book.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server message when the
    /// backend declines the request, or a transport-level variant when the
    /// call never completes.
    async fn fetch_addresses(&self) -> Result<Vec<Address>, ApiError>;

    /// Place a cash-on-delivery order; returns the server confirmation
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server message when the
    /// order is declined, or a transport-level variant when the call never
    /// completes.
    async fn place_cod_order(&self, order: OrderRequest) -> Result<String, ApiError>;
}
