//! Session configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GREENBASKET_API_URL` - Base URL of the backend API
//!
//! ## Optional
//! - `GREENBASKET_CURRENCY` - Currency display symbol (default: ₹)
//! - `GREENBASKET_TAX_RATE` - Tax rate in percent (default: 2)

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

/// Default tax rate in percent applied on top of the cart subtotal.
const DEFAULT_TAX_RATE_PERCENT: &str = "2";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout engine configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the backend API (address book and order endpoints).
    pub api_base_url: String,
    /// Currency symbol used for display formatting only; no conversion.
    pub currency_symbol: String,
    /// Tax rate in percent applied to the cart subtotal.
    pub tax_rate_percent: Decimal,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("GREENBASKET_API_URL")?;
        validate_base_url(&api_base_url, "GREENBASKET_API_URL")?;

        let currency_symbol = get_env_or_default("GREENBASKET_CURRENCY", "₹");
        let tax_rate_percent = parse_tax_rate(
            &get_env_or_default("GREENBASKET_TAX_RATE", DEFAULT_TAX_RATE_PERCENT),
            "GREENBASKET_TAX_RATE",
        )?;

        Ok(Self {
            api_base_url,
            currency_symbol,
            tax_rate_percent,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a base URL parses and carries a host.
fn validate_base_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must have a host".to_string(),
        ));
    }
    Ok(())
}

/// Parse a non-negative percent value.
fn parse_tax_rate(value: &str, var_name: &str) -> Result<Decimal, ConfigError> {
    let rate: Decimal = value
        .parse()
        .map_err(|e: rust_decimal::Error| {
            ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string())
        })?;
    if rate.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(rate)
}
