//! Request and callback field maps.
//!
//! Payloads travel as [`FieldMap`]s: field name to JSON value. This module
//! holds the canonical string rendering used by the signer and the guard that
//! keeps caller-supplied extra fields from overwriting protocol fields.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::{PiastrixError, Result};

/// Field name to value mapping for outbound requests and inbound callbacks.
pub type FieldMap = Map<String, Value>;

/// Reserved key holding the payload signature.
pub const SIGN_FIELD: &str = "sign";

/// Renders a field value the way it appears in the signature basis.
///
/// Strings are used verbatim and numbers in their JSON text, so a value signs
/// exactly as it is encoded on the wire. `null` renders empty; arrays and
/// objects render as compact JSON.
///
/// # Examples
///
/// ```
/// use piastrix::fields::render_value;
/// use serde_json::json;
///
/// assert_eq!(render_value(&json!("order-1")), "order-1");
/// assert_eq!(render_value(&json!(10.5)), "10.5");
/// assert_eq!(render_value(&json!(643)), "643");
/// ```
#[must_use]
pub fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Returns true when a value is absent from the signature basis of a callback.
///
/// Only empty strings and `null` count as empty; `0` and `false` are data.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Merges caller-supplied extra fields into a base payload.
///
/// Every extra key must be new: a key already present in `base`, or the
/// reserved [`SIGN_FIELD`], fails with [`PiastrixError::ExtraFieldCollision`]
/// and leaves `base` untouched.
///
/// # Errors
///
/// Returns [`PiastrixError::ExtraFieldCollision`] naming the first conflicting key.
///
/// # Examples
///
/// ```
/// use piastrix::fields::{FieldMap, merge_extra_fields};
/// use serde_json::json;
///
/// let mut base = FieldMap::new();
/// base.insert("shop_id".to_owned(), json!(112));
///
/// let mut extra = FieldMap::new();
/// extra.insert("description".to_owned(), json!("Test"));
/// merge_extra_fields(&mut base, Some(extra)).unwrap();
/// assert_eq!(base["description"], "Test");
///
/// let mut clash = FieldMap::new();
/// clash.insert("shop_id".to_owned(), json!(1));
/// assert!(merge_extra_fields(&mut base, Some(clash)).is_err());
/// ```
pub fn merge_extra_fields(base: &mut FieldMap, extra: Option<FieldMap>) -> Result<()> {
    let Some(extra) = extra else {
        return Ok(());
    };

    let collision = extra
        .keys()
        .find(|key| key.as_str() == SIGN_FIELD || base.contains_key(*key));
    if let Some(key) = collision {
        return Err(PiastrixError::ExtraFieldCollision(key.clone()));
    }

    base.extend(extra);
    Ok(())
}
