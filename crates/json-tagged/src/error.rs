//! Envelope codec error type.

use thiserror::Error;

/// Error type for tagged-envelope encode/decode operations.
///
/// Every variant is a deterministic outcome surfaced to the caller; the
/// codec never retries internally.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The outer object did not match the `{"foo": ..., "t": {...}}` shape.
    #[error("malformed envelope: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    /// The inner `t` object carried more than one tag.
    #[error("ambiguous variant: {count} tags present in \"t\"")]
    AmbiguousVariant { count: usize },

    /// The tag is not in the registry (decode), or the concrete variant
    /// type was never registered (encode).
    #[error("unknown variant tag: {0:?}")]
    UnknownVariant(String),

    /// The tag resolved but the payload does not match the variant's fields.
    #[error("payload for tag {tag:?} failed to decode: {source}")]
    PayloadDecode {
        tag: String,
        #[source]
        source: serde_json::Error,
    },

    /// The variant's fields failed to serialize.
    #[error("payload failed to encode: {source}")]
    PayloadEncode {
        #[source]
        source: serde_json::Error,
    },

    /// `register` was called twice for the same tag.
    #[error("duplicate variant tag: {0:?}")]
    DuplicateTag(String),
}
