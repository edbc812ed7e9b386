//! Envelope codec: the `{"foo": ..., "t": {<tag>: <payload>}}` wire form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EnvelopeError;
use crate::registry::VariantRegistry;
use crate::variant::{TaggedVariant, Variant};

/// The outer value: a plain `foo` field plus one polymorphic `t` value.
///
/// On the wire, `t` is wrapped in a single-entry object keyed by the
/// variant's tag; the decoded value carries no trace of that wrapping.
#[derive(Debug)]
pub struct Envelope {
    pub foo: String,
    /// The polymorphic value. `None` only when the wire `t` object was
    /// empty; see [`Envelope::from_slice`] for the policy.
    pub t: Option<Box<dyn Variant>>,
}

/// Transient wire shape. Field order here is the canonical key order.
#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    foo: String,
    t: Map<String, Value>,
}

impl Envelope {
    pub fn new<V: TaggedVariant>(foo: impl Into<String>, variant: V) -> Self {
        Self {
            foo: foo.into(),
            t: Some(Box::new(variant)),
        }
    }

    /// An envelope with no variant set; encodes as `"t":{}`.
    pub fn without_variant(foo: impl Into<String>) -> Self {
        Self {
            foo: foo.into(),
            t: None,
        }
    }

    /// The concrete variant, if one is present and is a `V`.
    ///
    /// # Example
    ///
    /// ```
    /// use json_tagged::{Envelope, TaggedVariant};
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Debug, Serialize, Deserialize)]
    /// struct Ping {
    ///     seq: u64,
    /// }
    ///
    /// impl TaggedVariant for Ping {
    ///     const TAG: &'static str = "ping";
    /// }
    ///
    /// let envelope = Envelope::new("bar", Ping { seq: 3 });
    /// assert_eq!(envelope.variant::<Ping>().unwrap().seq, 3);
    /// ```
    pub fn variant<V: TaggedVariant>(&self) -> Option<&V> {
        self.t.as_deref()?.as_any().downcast_ref::<V>()
    }

    /// Decode an envelope from its wire bytes.
    ///
    /// An empty `t` object decodes to `t = None` rather than an error.
    /// [`to_vec`](Envelope::to_vec) mirrors this by emitting `"t":{}` for an
    /// envelope without a variant, so empty envelopes round-trip
    /// byte-exactly.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::Malformed`] if the outer shape does not parse
    ///   (bad JSON, missing `t`, wrong types).
    /// - [`EnvelopeError::AmbiguousVariant`] if `t` carries more than one
    ///   tag. The format is defined to carry exactly one tagged value;
    ///   picking the first silently would hide a producer error.
    /// - [`EnvelopeError::UnknownVariant`] if the tag is not registered.
    /// - [`EnvelopeError::PayloadDecode`] if the payload does not match the
    ///   resolved variant's fields.
    pub fn from_slice(bytes: &[u8], registry: &VariantRegistry) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope =
            serde_json::from_slice(bytes).map_err(|source| EnvelopeError::Malformed { source })?;

        if wire.t.len() > 1 {
            return Err(EnvelopeError::AmbiguousVariant { count: wire.t.len() });
        }

        let t = match wire.t.into_iter().next() {
            None => None,
            Some((tag, payload)) => {
                let factory = registry
                    .resolve(&tag)
                    .ok_or_else(|| EnvelopeError::UnknownVariant(tag.clone()))?;
                let variant =
                    factory(payload).map_err(|source| EnvelopeError::PayloadDecode { tag, source })?;
                Some(variant)
            }
        };

        Ok(Self { foo: wire.foo, t })
    }

    /// Encode this envelope to canonical wire bytes.
    ///
    /// Canonical form: `foo` before `t`, one tag in `t` (or none, for an
    /// envelope without a variant), variant fields in declared order, no
    /// whitespace. Decoding canonical bytes and re-encoding reproduces them
    /// byte for byte.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnknownVariant`] if the concrete variant type was
    ///   never registered. Unreachable for envelopes produced by
    ///   [`from_slice`](Envelope::from_slice), but directly constructed
    ///   envelopes must be checked.
    /// - [`EnvelopeError::PayloadEncode`] if the variant's fields fail to
    ///   serialize.
    pub fn to_vec(&self, registry: &VariantRegistry) -> Result<Vec<u8>, EnvelopeError> {
        let mut t = Map::new();
        if let Some(variant) = self.t.as_deref() {
            let tag = registry.tag_of(variant)?;
            t.insert(tag.to_string(), variant.payload()?);
        }
        let wire = WireEnvelope {
            foo: self.foo.clone(),
            t,
        };
        serde_json::to_vec(&wire).map_err(|source| EnvelopeError::PayloadEncode { source })
    }
}

/// Structural equality: same `foo`, same tag, same payload value.
impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        if self.foo != other.foo {
            return false;
        }
        match (self.t.as_deref(), other.t.as_deref()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.tag_name() == b.tag_name()
                    && matches!((a.payload(), b.payload()), (Ok(x), Ok(y)) if x == y)
            }
            _ => false,
        }
    }
}

/// Decode an envelope from wire bytes.
///
/// Convenience wrapper over [`Envelope::from_slice`].
pub fn decode_envelope(bytes: &[u8], registry: &VariantRegistry) -> Result<Envelope, EnvelopeError> {
    Envelope::from_slice(bytes, registry)
}

/// Encode an envelope to canonical wire bytes.
///
/// Convenience wrapper over [`Envelope::to_vec`].
pub fn encode_envelope(
    envelope: &Envelope,
    registry: &VariantRegistry,
) -> Result<Vec<u8>, EnvelopeError> {
    envelope.to_vec(registry)
}
