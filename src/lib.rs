//! A Rust client for a community subscription provider: a service that manages token gated
//! community subscriptions paid for on a zkSync style rollup.
//!
//! # Getting Started
//!
//! The primary entry point is the [`Provider`] trait and its default implementation,
//! [`HttpProvider`]. Every method performs exactly one JSON `POST` against the provider's
//! `api/v0.1` routes.
//!
//! Payment network values such as [`TransferFrom`] or [`SubscriptionTx`] are built and signed
//! by the caller and forwarded untouched.
//!
//! See `demos/subscribe.rs` (`cargo run --example subscribe`) for a walk through the
//! subscription check and minting signature flow.
//!
//! ## Using a Custom HTTP Client
//!
//! ```no_run
//! use std::time::Duration;
//! use subscription_provider_client::{HttpProvider, Transport};
//!
//! # fn main() -> Result<(), reqwest::Error> {
//! let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
//! let _provider = HttpProvider::from_transport(Transport::with_client("http://127.0.0.1:8081/", client));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{HttpProvider, Provider};
pub use error::{ApiErrorObject, TransportError};
pub use models::{
    Address, Community, GrantedTokensResponse, PackedEthSignature, Signature, SubscriptionCheckResponse, SubscriptionTx,
    Transfer, TransferFrom,
};
pub use transport::{ResponseBody, Transport, TransportConfig};
