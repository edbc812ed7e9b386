//! Variant traits: self-describing payloads for the tagged `t` field.

use std::any::Any;
use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use crate::error::EnvelopeError;

/// A concrete variant shape: a serde-serializable struct with a unique tag.
///
/// This is the trait users implement, one impl per payload type; the
/// object-safe [`Variant`] surface the codec works with comes for free
/// through a blanket impl.
///
/// # Example
///
/// ```
/// use json_tagged::TaggedVariant;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Move {
///     x: i64,
///     y: i64,
/// }
///
/// impl TaggedVariant for Move {
///     const TAG: &'static str = "move";
/// }
/// ```
pub trait TaggedVariant: Serialize + Debug + Send + Sync + 'static {
    /// The unique tag string naming this variant on the wire.
    const TAG: &'static str;
}

/// Object-safe variant handle stored inside an [`Envelope`](crate::Envelope).
///
/// Blanket-implemented for every [`TaggedVariant`]; not meant to be
/// implemented by hand.
pub trait Variant: Debug + Send + Sync {
    /// The tag naming this variant on the wire.
    fn tag_name(&self) -> &'static str;

    /// Serialize this variant's fields into a JSON payload.
    ///
    /// Key order matches the declared field order.
    fn payload(&self) -> Result<Value, EnvelopeError>;

    /// Downcasting support, used to get the concrete type back out of a
    /// decoded envelope.
    fn as_any(&self) -> &dyn Any;
}

impl<T: TaggedVariant> Variant for T {
    fn tag_name(&self) -> &'static str {
        T::TAG
    }

    fn payload(&self) -> Result<Value, EnvelopeError> {
        serde_json::to_value(self).map_err(|source| EnvelopeError::PayloadEncode { source })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
