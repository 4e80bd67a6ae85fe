//! Checkout error taxonomy.
//!
//! Three classes of failure, all recoverable: validation errors detected
//! locally before anything is sent, remote rejections carrying the
//! server's own message, and transport failures where the call never
//! completed. Every failure leaves the cart and address selection intact
//! so the shopper can correct and retry.

use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No delivery address is selected; submission never left the client.
    #[error("Please select an address")]
    NoAddress,

    /// The cart projection is empty; submission never left the client.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A submission is already in flight; this attempt was discarded.
    #[error("An order is already being placed")]
    SubmissionInFlight,

    /// Online payment is a deliberate placeholder, not a failure of the
    /// cash-on-delivery path.
    #[error("Online payment is not implemented yet")]
    OnlineNotSupported,

    /// The server processed the request and declined it; the message is
    /// surfaced verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The request never completed (network or decoding failure).
    #[error(transparent)]
    Api(ApiError),
}

impl CheckoutError {
    /// Whether this failure was detected locally, before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoAddress | Self::EmptyCart | Self::SubmissionInFlight | Self::OnlineNotSupported
        )
    }

    /// Classify a backend error: server rejections keep their message,
    /// everything else is transport.
    #[must_use]
    pub fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::Rejected(message) => Self::Rejected(message),
            other => Self::Api(other),
        }
    }
}
