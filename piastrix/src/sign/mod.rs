//! Request signing and callback authentication.
//!
//! The gateway authenticates every request with a keyed SHA-256 digest over a
//! canonical rendering of selected payload fields:
//!
//! 1. sort the signed field names in ascending byte order
//! 2. render each field's value (see [`render_value`](crate::fields::render_value))
//! 3. join the values with `:`
//! 4. append the shared secret with no separator
//! 5. hash with SHA-256 and hex-encode in lowercase
//!
//! The digest is stored in the payload under the reserved `sign` key.
//!
//! # Key Components
//!
//! - [`CanonicalSigner`]: signs outbound payloads over a fixed field list
//! - [`CallbackVerifier`]: authenticates inbound callbacks, deriving the field
//!   list from the non-empty fields the gateway actually sent
//!
//! # Examples
//!
//! ```rust
//! use piastrix::{SecretKey, fields::FieldMap, sign::CanonicalSigner};
//! use serde_json::json;
//!
//! # fn example() -> piastrix::Result<()> {
//! let signer = CanonicalSigner::new(SecretKey::new("K"));
//!
//! let mut fields = FieldMap::new();
//! fields.insert("b".to_owned(), json!(2));
//! fields.insert("a".to_owned(), json!(1));
//!
//! signer.sign(&mut fields, &["b", "a"])?;
//! // sha256("1:2K")
//! assert_eq!(
//!     fields["sign"],
//!     "496a1e5d58030ec3dbf1251365b85105983c4d46087cddfdd7f4dd3760b544b1"
//! );
//! # Ok(())
//! # }
//! ```

pub mod signer;
pub mod verifier;


pub use signer::CanonicalSigner;
pub use verifier::{
    CALLBACK_ALLOWED_IPS, CallbackExpectation, CallbackVerifier, is_allowed_callback_ip,
};

/// Separator placed between rendered field values in the signature basis.
pub const FIELD_SEPARATOR: &str = ":";
