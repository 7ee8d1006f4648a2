//! Canonical payload signing.

use sha2::{Digest, Sha256};
use tracing::{instrument, trace};

use crate::{
    config::SecretKey,
    error::{PiastrixError, Result},
    fields::{FieldMap, SIGN_FIELD, render_value},
    sign::FIELD_SEPARATOR,
};

/// Signs payloads with the merchant's shared secret.
///
/// Signing is pure: the same field values, field list and secret always give
/// the same signature, whatever order the payload was built in. The signer
/// holds only the immutable secret, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct CanonicalSigner {
    secret: SecretKey,
}

impl CanonicalSigner {
    /// Creates a signer for the given secret.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{SecretKey, sign::CanonicalSigner};
    ///
    /// let signer = CanonicalSigner::new(SecretKey::new("SecretKey01"));
    /// ```
    #[must_use]
    pub fn new(secret: SecretKey) -> Self {
        Self { secret }
    }

    /// Builds the signature basis without the secret.
    ///
    /// Field names are sorted in ascending byte order and their rendered values
    /// joined with `:`. Duplicate names are kept, so each contributes a value.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::MissingSignedField`] if a listed field is absent
    /// from `fields`.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{fields::FieldMap, sign::CanonicalSigner};
    /// use serde_json::json;
    ///
    /// let mut fields = FieldMap::new();
    /// fields.insert("shop_id".to_owned(), json!(112));
    /// fields.insert("amount".to_owned(), json!(10.5));
    ///
    /// let basis = CanonicalSigner::signature_basis(&fields, &["shop_id", "amount"]).unwrap();
    /// assert_eq!(basis, "10.5:112");
    /// ```
    pub fn signature_basis<S: AsRef<str>>(
        fields: &FieldMap,
        signed_fields: &[S],
    ) -> Result<String> {
        let mut names: Vec<&str> = signed_fields.iter().map(AsRef::as_ref).collect();
        names.sort_unstable();

        let values = names
            .into_iter()
            .map(|name| {
                fields
                    .get(name)
                    .map(render_value)
                    .ok_or_else(|| PiastrixError::MissingSignedField(name.to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(values.join(FIELD_SEPARATOR))
    }

    /// Computes the signature of `fields` over `signed_fields`.
    ///
    /// Does not modify the payload. The returned string is the lowercase hex
    /// SHA-256 digest of the signature basis followed by the secret.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::MissingSignedField`] if a listed field is absent
    /// from `fields`.
    #[instrument(skip_all, fields(field_count = signed_fields.len()))]
    pub fn compute_signature<S: AsRef<str>>(
        &self,
        fields: &FieldMap,
        signed_fields: &[S],
    ) -> Result<String> {
        let basis = Self::signature_basis(fields, signed_fields)?;
        trace!(basis_len = basis.len(), "signature basis built");

        let mut hasher = Sha256::new();
        hasher.update(basis.as_bytes());
        hasher.update(self.secret.expose().as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Signs `fields` over `signed_fields` and stores the result under `sign`.
    ///
    /// Any existing `sign` value is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::MissingSignedField`] if a listed field is absent
    /// from `fields`. The payload is left unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{SecretKey, fields::FieldMap, sign::CanonicalSigner};
    /// use serde_json::json;
    ///
    /// # fn example() -> piastrix::Result<()> {
    /// let signer = CanonicalSigner::new(SecretKey::new("SecretKey01"));
    ///
    /// let mut fields = FieldMap::new();
    /// fields.insert("shop_id".to_owned(), json!(112));
    /// fields.insert("now".to_owned(), json!("2024-01-01 12:00:00.000000"));
    /// signer.sign(&mut fields, &["shop_id", "now"])?;
    ///
    /// assert_eq!(fields["sign"].as_str().map(str::len), Some(64));
    /// # Ok(())
    /// # }
    /// ```
    pub fn sign<S: AsRef<str>>(&self, fields: &mut FieldMap, signed_fields: &[S]) -> Result<()> {
        let signature = self.compute_signature(fields, signed_fields)?;
        fields.insert(SIGN_FIELD.to_owned(), signature.into());
        Ok(())
    }
}
