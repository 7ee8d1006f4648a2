//! Piastrix: merchant SDK for the Piastrix payment gateway
//!
//! A Rust library that builds authenticated requests for billing, transfers,
//! withdrawals and account checks, and authenticates the payment status
//! callbacks the gateway sends back.
//!
//! # Request Authentication
//!
//! Every request carries a `sign` field: the lowercase hex SHA-256 digest of
//! the operation's signed field values, sorted by field name and joined with
//! `:`, followed by the merchant's shared secret. Callbacks are authenticated
//! the same way, except that the signed fields are whichever non-empty fields
//! the gateway sent.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   typed request    ┌──────────────────┐
//! │ Merchant backend │ ─────────────────▶ │  PiastrixClient  │
//! └──────────────────┘                    │  field assembly  │
//!          ▲                              │  extra-field     │
//!          │ Ok / PiastrixError           │  guard           │
//!          │                              └────────┬─────────┘
//! ┌────────┴─────────┐                             │
//! │ CallbackVerifier │                    ┌────────▼─────────┐
//! │ IP allow-list    │                    │ CanonicalSigner  │
//! │ signature        │                    └────────┬─────────┘
//! │ amount/currency  │                             │ JSON POST
//! │ status           │                    ┌────────▼─────────┐
//! └────────▲─────────┘                    │    Transport     │
//!          │ callback                     └────────┬─────────┘
//!          │                                       │
//! ┌────────┴───────────────────────────────────────▼─────────┐
//! │                    Piastrix gateway                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Create a Bill
//!
//! ```rust,no_run
//! use piastrix::{ClientConfig, PiastrixClient, SecretKey, request::BillRequest};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> piastrix::Result<()> {
//! let config = ClientConfig::new(112, SecretKey::new("SecretKey01"));
//! let client = PiastrixClient::new(config)?;
//!
//! let request = BillRequest::new(643, Decimal::new(1050, 2), 643, "order-101");
//! let response = client.bill(request).await?;
//! let body: serde_json::Value = response.json()?;
//! println!("Payment URL: {}", body["data"]["url"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Verify a Callback
//!
//! ```rust,no_run
//! use piastrix::{ClientConfig, PiastrixClient, SecretKey, fields::FieldMap};
//! use rust_decimal::Decimal;
//!
//! # fn example(payload: FieldMap, peer: std::net::IpAddr) -> piastrix::Result<()> {
//! let config = ClientConfig::new(112, SecretKey::new("SecretKey01"));
//! let client = PiastrixClient::new(config)?;
//!
//! // Expected values come from the merchant's own order record.
//! client.verify_callback(payload, peer, Decimal::new(1050, 2), 643)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`sign`]: canonical signer and callback verifier
//! - [`client`]: one method per gateway operation
//! - [`request`]: typed arguments for each operation
//! - [`operation`]: endpoint and signed-field table
//! - [`transport`]: sealed transport trait and the reqwest implementation
//! - [`config`]: TOML configuration and the secret key
//! - [`audit`]: audit events on the `audit` tracing target
//! - [`error`]: error types and stable error codes
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PiastrixError>`](error::Result).
//! Gateway-facing errors carry a stable [`ErrorCode`]; transport failures,
//! including non-success HTTP statuses, pass through as
//! [`PiastrixError::Http`].

#![warn(missing_docs)]

pub mod audit;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod operation;
pub mod request;
pub mod sign;
pub mod transport;
pub mod types;

pub use client::{GatewayResponse, PayForm, PiastrixClient};
pub use config::{ClientConfig, SecretKey};
pub use error::{ErrorCode, PiastrixError, Result};
pub use types::{Language, TransferAmountType, WithdrawAmountType};
