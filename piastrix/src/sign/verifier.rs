//! Callback authentication for bill and invoice status notifications.

use std::net::{IpAddr, Ipv4Addr};

use rust_decimal::Decimal;
use serde_json::Value;
use subtle::ConstantTimeEq;
use tracing::{debug, instrument, warn};

use crate::{
    audit::{AuditEvent, AuditEventType, audit_log},
    config::SecretKey,
    error::{PiastrixError, Result},
    fields::{FieldMap, SIGN_FIELD, is_empty_value, render_value},
    sign::CanonicalSigner,
};

/// Source addresses the gateway sends callbacks from.
pub const CALLBACK_ALLOWED_IPS: [Ipv4Addr; 8] = [
    Ipv4Addr::new(87, 98, 145, 206),
    Ipv4Addr::new(51, 68, 53, 104),
    Ipv4Addr::new(51, 68, 53, 105),
    Ipv4Addr::new(51, 68, 53, 106),
    Ipv4Addr::new(51, 68, 53, 107),
    Ipv4Addr::new(91, 121, 216, 63),
    Ipv4Addr::new(37, 48, 108, 180),
    Ipv4Addr::new(37, 48, 108, 181),
];

/// Callback status reported for a completed payment.
pub const SUCCESS_STATUS: &str = "success";

/// Returns true if `addr` is one of the gateway's callback addresses.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`), as reported by dual-stack
/// listeners, are checked as their IPv4 form.
///
/// # Examples
///
/// ```
/// use piastrix::sign::is_allowed_callback_ip;
///
/// assert!(is_allowed_callback_ip("87.98.145.206".parse().unwrap()));
/// assert!(!is_allowed_callback_ip("87.98.145.20".parse().unwrap()));
/// ```
#[must_use]
pub fn is_allowed_callback_ip(addr: IpAddr) -> bool {
    match addr.to_canonical() {
        IpAddr::V4(v4) => CALLBACK_ALLOWED_IPS.contains(&v4),
        IpAddr::V6(_) => false,
    }
}

/// Values the merchant expects a successful callback to report.
///
/// These come from the merchant's own order records, never from the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackExpectation {
    /// Amount the shop expects to receive.
    pub shop_amount: Decimal,
    /// Numeric ISO 4217 currency code of the shop amount.
    pub shop_currency: u32,
}

/// Authenticates inbound payment callbacks.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. the source address is allow-listed ([`PiastrixError::IpNotAllowed`])
/// 2. the `sign` field matches a signature recomputed over every other
///    non-empty field ([`PiastrixError::SignatureMismatch`])
/// 3. `shop_amount` equals the expected amount ([`PiastrixError::ShopAmountMismatch`])
/// 4. `shop_currency` equals the expected currency ([`PiastrixError::ShopCurrencyMismatch`])
/// 5. `status` is `success` ([`PiastrixError::StatusMismatch`])
///
/// Unlike outbound signing, the signed field list is taken from the payload
/// itself: whichever fields the gateway sent with a non-empty value.
#[derive(Debug, Clone)]
pub struct CallbackVerifier {
    signer: CanonicalSigner,
}

impl CallbackVerifier {
    /// Creates a verifier for the given shared secret.
    #[must_use]
    pub fn new(secret: SecretKey) -> Self {
        Self {
            signer: CanonicalSigner::new(secret),
        }
    }

    /// Verifies a callback payload received from `remote_addr`.
    ///
    /// # Errors
    ///
    /// Returns the error for the first failed check; see the type-level docs
    /// for the order.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{
    ///     PiastrixError, SecretKey,
    ///     fields::FieldMap,
    ///     sign::{CallbackExpectation, CallbackVerifier},
    /// };
    /// use rust_decimal::Decimal;
    /// use serde_json::json;
    ///
    /// let verifier = CallbackVerifier::new(SecretKey::new("SecretKey01"));
    /// let expected = CallbackExpectation {
    ///     shop_amount: Decimal::new(105, 1),
    ///     shop_currency: 643,
    /// };
    ///
    /// let payload: FieldMap = serde_json::from_value(json!({
    ///     "shop_amount": 10.5,
    ///     "shop_currency": 643,
    ///     "status": "success",
    ///     "sign": "forged"
    /// }))
    /// .unwrap();
    ///
    /// let err = verifier
    ///     .verify(payload, "10.0.0.1".parse().unwrap(), &expected)
    ///     .unwrap_err();
    /// assert!(matches!(err, PiastrixError::IpNotAllowed(_)));
    /// ```
    #[instrument(skip_all, fields(remote_addr = %remote_addr, field_count = payload.len()))]
    pub fn verify(
        &self,
        payload: FieldMap,
        remote_addr: IpAddr,
        expected: &CallbackExpectation,
    ) -> Result<()> {
        let result = self.run_checks(payload, remote_addr, expected);

        match &result {
            Ok(()) => {
                debug!("callback verified");
                let event = AuditEvent::new(AuditEventType::CallbackAccepted)
                    .with_remote_addr(remote_addr.to_string());
                audit_log(&event);
            }
            Err(e) => {
                warn!(error = %e, "callback rejected");
                let event = AuditEvent::new(AuditEventType::CallbackRejected)
                    .with_remote_addr(remote_addr.to_string())
                    .with_error(e.to_string());
                audit_log(&event);
            }
        }

        result
    }

    /// Verifies a callback whose source address is still in text form.
    ///
    /// The text must be exactly an IP address. Anything that does not parse,
    /// including surrounding whitespace, is treated as not allow-listed.
    ///
    /// # Errors
    ///
    /// Same as [`verify`](Self::verify).
    pub fn verify_from(
        &self,
        payload: FieldMap,
        remote_addr: &str,
        expected: &CallbackExpectation,
    ) -> Result<()> {
        let addr: IpAddr = remote_addr.parse().map_err(|_| {
            warn!(remote_addr, "callback source address does not parse");
            PiastrixError::IpNotAllowed(remote_addr.to_owned())
        })?;
        self.verify(payload, addr, expected)
    }

    fn run_checks(
        &self,
        mut payload: FieldMap,
        remote_addr: IpAddr,
        expected: &CallbackExpectation,
    ) -> Result<()> {
        if !is_allowed_callback_ip(remote_addr) {
            return Err(PiastrixError::IpNotAllowed(remote_addr.to_string()));
        }

        let sign = payload.remove(SIGN_FIELD);
        let claimed = sign.as_ref().and_then(Value::as_str).unwrap_or_default();

        let signed_fields: Vec<&str> = payload
            .iter()
            .filter(|(_, value)| !is_empty_value(value))
            .map(|(name, _)| name.as_str())
            .collect();
        let computed = self.signer.compute_signature(&payload, &signed_fields)?;

        if !bool::from(computed.as_bytes().ct_eq(claimed.as_bytes())) {
            return Err(PiastrixError::SignatureMismatch);
        }

        if !amount_matches(payload.get("shop_amount"), expected.shop_amount) {
            return Err(PiastrixError::ShopAmountMismatch);
        }

        let currency = payload.get("shop_currency").and_then(Value::as_u64);
        if currency != Some(u64::from(expected.shop_currency)) {
            return Err(PiastrixError::ShopCurrencyMismatch);
        }

        match payload.get("status") {
            Some(Value::String(status)) if status == SUCCESS_STATUS => Ok(()),
            other => {
                let status = other.map(render_value).unwrap_or_default();
                Err(PiastrixError::StatusMismatch(status.into_owned()))
            }
        }
    }
}

/// Compares a callback amount with the expected one.
///
/// The callback value must be a JSON number; a numeric string is a mismatch.
fn amount_matches(value: Option<&Value>, expected: Decimal) -> bool {
    let Some(Value::Number(number)) = value else {
        return false;
    };

    let text = number.to_string();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .is_ok_and(|amount| amount == expected)
}
