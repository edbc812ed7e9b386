//! Tag-keyed variant envelope codec.
//!
//! Converts between the flat wire shape
//! `{"foo": <string>, "t": {<tag>: <payload>}}` and an [`Envelope`] holding
//! `foo` plus one polymorphic value, without the surrounding structure ever
//! seeing the tag wrapping.
//!
//! Variants are plain serde-derived structs registered once, before first
//! use, in a [`VariantRegistry`]; decode resolves the tag through the
//! registry and encode looks the tag back up from the concrete type.
//! Encoded output is canonical (fixed key order, no whitespace), so
//! decoding canonical bytes and re-encoding them is byte-exact.
//!
//! # Example
//!
//! ```
//! use json_tagged::{Envelope, TaggedVariant, VariantRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Move {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl TaggedVariant for Move {
//!     const TAG: &'static str = "move";
//! }
//!
//! let mut registry = VariantRegistry::new();
//! registry.register::<Move>().unwrap();
//!
//! let bytes = br#"{"foo":"bar","t":{"move":{"x":1,"y":2}}}"#;
//! let envelope = Envelope::from_slice(bytes, &registry).unwrap();
//! assert_eq!(envelope.foo, "bar");
//! assert_eq!(envelope.variant::<Move>().unwrap().x, 1);
//! assert_eq!(envelope.to_vec(&registry).unwrap(), bytes);
//! ```

pub mod envelope;
pub mod error;
pub mod registry;
pub mod variant;

pub use envelope::{decode_envelope, encode_envelope, Envelope};
pub use error::EnvelopeError;
pub use registry::{VariantFactory, VariantRegistry};
pub use variant::{TaggedVariant, Variant};
