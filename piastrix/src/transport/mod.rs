//! Transport abstraction.
//!
//! The client hands a fully signed JSON body and an absolute URL to a
//! [`Transport`]; the transport only moves bytes. It never inspects or
//! re-signs the payload, and it reports failures without interpreting them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use piastrix::transport::{HttpTransport, Transport};
//!
//! # async fn example() -> piastrix::Result<()> {
//! let transport = HttpTransport::new(Duration::from_secs(10))?;
//!
//! let response = transport
//!     .post_json("https://core.piastrix.com/shop_balance", br#"{"shop_id":112}"#.to_vec())
//!     .await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::error::Result;

pub mod http;
mod sealed;

pub use http::HttpTransport;

/// Content type of every API request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Response from a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

/// Outbound request transport.
///
/// This trait is sealed: only implementations within this crate are allowed.
/// Implementations must send the body as-is with
/// `Content-Type: application/json` and surface non-success statuses as
/// errors.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// POSTs a JSON body to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Http`](crate::PiastrixError::Http) if the
    /// request fails or the server answers with a non-success status.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_response_equality() {
        let a = TransportResponse {
            status: 200,
            body: b"{}".to_vec(),
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transport_response_debug() {
        let response = TransportResponse {
            status: 200,
            body: b"test".to_vec(),
        };

        let debug_str = format!("{response:?}");
        assert!(debug_str.contains("TransportResponse"));
        assert!(debug_str.contains("200"));
    }
}
