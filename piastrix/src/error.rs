//! Error types for the Piastrix SDK.
//!
//! Every failure surfaces synchronously to the immediate caller as a
//! [`PiastrixError`]. Nothing is retried or suppressed inside the SDK.
//!
//! # Error Categories
//!
//! - **Request construction** ([`PiastrixError::ExtraFieldCollision`],
//!   [`PiastrixError::InvalidAmountType`], [`PiastrixError::InvalidLanguage`],
//!   [`PiastrixError::InvalidAmount`]): rejected before anything is signed or sent
//! - **Callback authentication** ([`PiastrixError::IpNotAllowed`],
//!   [`PiastrixError::SignatureMismatch`]): the callback did not come from the gateway
//! - **Callback business checks** ([`PiastrixError::ShopAmountMismatch`],
//!   [`PiastrixError::ShopCurrencyMismatch`], [`PiastrixError::StatusMismatch`])
//! - **Transport** ([`PiastrixError::Http`]): passed through from `reqwest` unmodified
//!
//! Gateway-facing kinds carry a stable numeric [`ErrorCode`].
//!
//! # Examples
//!
//! ```
//! use piastrix::error::{ErrorCode, PiastrixError};
//!
//! let err = PiastrixError::SignatureMismatch;
//! assert_eq!(err.code(), Some(ErrorCode::Sign));
//! assert_eq!(err.code().map(ErrorCode::as_u16), Some(1002));
//! ```

use std::fmt;

use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, PiastrixError>;

/// Stable numeric codes for the SDK's own error kinds.
///
/// The values match the codes used by the gateway's reference clients so that
/// logs and support tickets stay comparable across languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// An extra field reused a reserved field name.
    ExtraFields = 1000,
    /// Callback source address is not allow-listed.
    Ip = 1001,
    /// Callback signature does not match.
    Sign = 1002,
    /// Callback `shop_amount` differs from the expected amount.
    ShopAmount = 1003,
    /// Callback `shop_currency` differs from the expected currency.
    ShopCurrency = 1004,
    /// Callback `status` is not `success`.
    Status = 1005,
    /// Unsupported payment page language.
    Language = 1006,
    /// Unsupported amount type.
    AmountType = 1007,
}

impl ErrorCode {
    /// Returns the numeric value of this code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Errors that can occur while building requests or verifying callbacks.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum PiastrixError {
    /// A caller-supplied extra field reuses a field name the operation already sets.
    ///
    /// The reserved `sign` key is always rejected.
    ///
    /// # Recovery
    ///
    /// Rename or drop the conflicting extra field. Base fields are never overwritten.
    #[error("extra field '{0}' collides with a reserved request field")]
    ExtraFieldCollision(String),

    /// The callback arrived from an address outside the gateway allow-list.
    #[error("IP address {0} is not in allowed IP addresses")]
    IpNotAllowed(String),

    /// The recomputed callback signature differs from the claimed one.
    #[error("callback signature mismatch")]
    SignatureMismatch,

    /// The callback `shop_amount` differs from the amount the merchant expects.
    #[error("callback shop_amount does not match the expected amount")]
    ShopAmountMismatch,

    /// The callback `shop_currency` differs from the currency the merchant expects.
    #[error("callback shop_currency does not match the expected currency")]
    ShopCurrencyMismatch,

    /// The callback reports a status other than `success`.
    #[error("callback status is '{0}', expected 'success'")]
    StatusMismatch(String),

    /// The payment page language is not supported.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::Language;
    ///
    /// let err = "de".parse::<Language>().unwrap_err();
    /// assert_eq!(err.to_string(), "de is not valid language");
    /// ```
    #[error("{0} is not valid language")]
    InvalidLanguage(String),

    /// The amount type is not one of the values the operation accepts.
    #[error("invalid amount_type: {0}")]
    InvalidAmountType(String),

    /// A field named in the operation's signed-field list is missing from the payload.
    ///
    /// This indicates a programming error in the field table, not a business failure.
    #[error("signed field '{0}' is missing from the payload")]
    MissingSignedField(String),

    /// An amount cannot be represented as a JSON number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Client configuration is invalid or could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed or the gateway answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PiastrixError {
    /// Returns the stable error code for SDK-defined kinds.
    ///
    /// Transport, JSON and configuration errors have no code.
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::ExtraFieldCollision(_) => Some(ErrorCode::ExtraFields),
            Self::IpNotAllowed(_) => Some(ErrorCode::Ip),
            Self::SignatureMismatch => Some(ErrorCode::Sign),
            Self::ShopAmountMismatch => Some(ErrorCode::ShopAmount),
            Self::ShopCurrencyMismatch => Some(ErrorCode::ShopCurrency),
            Self::StatusMismatch(_) => Some(ErrorCode::Status),
            Self::InvalidLanguage(_) => Some(ErrorCode::Language),
            Self::InvalidAmountType(_) => Some(ErrorCode::AmountType),
            Self::MissingSignedField(_)
            | Self::InvalidAmount(_)
            | Self::Config(_)
            | Self::Http(_)
            | Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            PiastrixError::ExtraFieldCollision("shop_id".to_owned()),
            PiastrixError::IpNotAllowed("1.2.3.4".to_owned()),
            PiastrixError::SignatureMismatch,
            PiastrixError::ShopAmountMismatch,
            PiastrixError::ShopCurrencyMismatch,
            PiastrixError::StatusMismatch("pending".to_owned()),
            PiastrixError::InvalidLanguage("de".to_owned()),
            PiastrixError::InvalidAmountType("bogus".to_owned()),
        ];

        let codes: Vec<u16> = errors
            .iter()
            .filter_map(PiastrixError::code)
            .map(ErrorCode::as_u16)
            .collect();
        assert_eq!(codes, vec![1000, 1001, 1002, 1003, 1004, 1005, 1006, 1007]);
    }

    #[test]
    fn test_ambient_errors_have_no_code() {
        let errors = [
            PiastrixError::MissingSignedField("now".to_owned()),
            PiastrixError::Config("bad".to_owned()),
            PiastrixError::InvalidAmount("NaN".to_owned()),
        ];
        for error in &errors {
            assert!(error.code().is_none(), "{error:?} has a code");
        }
    }

    #[test]
    fn test_error_display() {
        let error = PiastrixError::ExtraFieldCollision("shop_id".to_owned());
        assert_eq!(
            error.to_string(),
            "extra field 'shop_id' collides with a reserved request field"
        );

        let error = PiastrixError::IpNotAllowed("10.0.0.1".to_owned());
        assert_eq!(
            error.to_string(),
            "IP address 10.0.0.1 is not in allowed IP addresses"
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::AmountType.to_string(), "1007");
    }
}
