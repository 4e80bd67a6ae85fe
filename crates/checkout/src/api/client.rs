//! HTTP implementation of the backend API.
//!
//! Authentication rides on the cookie jar: the external login flow signs
//! the shopper in against the same backend, which sets the session cookie
//! this client then replays on every call.

use std::sync::Arc;

use tracing::instrument;

use crate::api::{AddressListResponse, ApiError, OrderRequest, OrderResponse, StoreApi};
use crate::address::Address;
use crate::config::CheckoutConfig;

/// Client for the GreenBasket backend API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CheckoutConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }
}

impl StoreApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/address/get"))
            .send()
            .await?
            .error_for_status()?;

        let body: AddressListResponse = response.json().await?;
        if body.success {
            tracing::debug!(count = body.addresses.len(), "fetched address book");
            Ok(body.addresses)
        } else {
            Err(ApiError::Rejected(body.message.unwrap_or_else(|| {
                "address lookup failed".to_string()
            })))
        }
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn place_cod_order(&self, order: OrderRequest) -> Result<String, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/order/cod"))
            .json(&order)
            .send()
            .await?
            .error_for_status()?;

        let body: OrderResponse = response.json().await?;
        if body.success {
            tracing::info!("order accepted");
            Ok(body.message)
        } else {
            Err(ApiError::Rejected(body.message))
        }
    }
}
