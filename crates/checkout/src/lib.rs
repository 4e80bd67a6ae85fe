//! GreenBasket cart & checkout session engine.
//!
//! This crate owns the in-memory state of one shopper session: which
//! products are in the cart and in what quantity, the catalog snapshot the
//! cart is priced against, the delivery address book, and the order
//! submission state machine. Everything around it - catalog loading,
//! routing, authentication UI, rendering - is an external collaborator
//! that borrows the [`session::Session`].
//!
//! # Architecture
//!
//! - Cart state is a plain insertion-ordered map; the display-ready line
//!   list is a pure join against the catalog, recomputed on every read so
//!   catalog changes propagate automatically.
//! - The backend is reached through the [`api::StoreApi`] trait; the
//!   production implementation is a `reqwest` client, tests substitute an
//!   in-memory one.
//! - The only async suspension points are the address fetch and the order
//!   submission. All mutation goes through `&mut Session`, so observed
//!   ordering follows call order.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;

pub use error::CheckoutError;
pub use session::Session;
