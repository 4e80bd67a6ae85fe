//! GreenBasket Core - Shared types library.
//!
//! This crate provides common types used across all GreenBasket components:
//! - `checkout` - Cart & checkout session engine
//! - any embedding storefront shell (UI, routing, auth)
//!
//! # Architecture
//!
//! The core crate contains only types and helpers - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and decimal money helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
