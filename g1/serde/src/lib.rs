//! Named field bindings for Serde that tolerate missing input.
//!
//! Serde's derived `Deserialize` fails the whole decode when a field is absent from the document,
//! unless the field is annotated with `serde(default)`.  This crate provides the same leniency at
//! two levels:
//!
//! * At run time, for hand-written `Deserialize` impls: bind local variables to field names with
//!   `field!` and `optional!`, then hand the bindings to `decode`.  An `OptionalField` whose name is
//!   absent from the document receives its default value instead of failing the decode.
//!
//! * At compile time, for derived impls: `#[optional_fields]` rewrites `#[optional]` and
//!   `#[optional(default = <expr>)]` into the corresponding Serde attributes.
//!
//! ```
//! use serde::{Deserialize, Deserializer};
//!
//! use g1_serde::{field, optional};
//!
//! #[derive(Debug, PartialEq)]
//! struct Endpoint {
//!     host: String,
//!     port: u16,
//!     secure: bool,
//! }
//!
//! impl<'de> Deserialize<'de> for Endpoint {
//!     fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
//!     where
//!         D: Deserializer<'de>,
//!     {
//!         let mut host = String::new();
//!         let mut port: u16 = 0;
//!         let mut secure = false;
//!         g1_serde::decode(
//!             deserializer,
//!             (field!(host), optional!(port, 80), optional!(secure)),
//!         )?;
//!         Ok(Self { host, port, secure })
//!     }
//! }
//!
//! assert_eq!(
//!     serde_json::from_str::<Endpoint>(r#"{"host": "localhost"}"#).unwrap(),
//!     Endpoint {
//!         host: "localhost".to_string(),
//!         port: 80,
//!         secure: false,
//!     },
//! );
//! assert!(serde_json::from_str::<Endpoint>(r#"{"port": 443}"#).is_err());
//! ```

mod binding;
mod de;
mod error;
mod field;
mod fields;
mod macros;
mod options;
mod ser;

pub use g1_serde_attribute::optional_fields;

pub use crate::binding::{Binding, DecodeBinding, EncodeBinding};
pub use crate::de::{Decoder, decode, decode_with};
pub use crate::field::{Field, OptionalField};
pub use crate::fields::{DecodeFields, EncodeFields};
pub use crate::options::Options;
pub use crate::ser::{Encoder, encode};
