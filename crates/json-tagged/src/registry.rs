//! Tag registry: maps wire tags to decode factories and concrete variant
//! types back to their tags.

use std::any::TypeId;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::EnvelopeError;
use crate::variant::{TaggedVariant, Variant};

/// Decode factory for one registered variant: structural decode of the raw
/// payload into the concrete type, boxed behind the [`Variant`] handle.
pub type VariantFactory = fn(Value) -> Result<Box<dyn Variant>, serde_json::Error>;

/// Mapping from tag to variant factory, built once before first use.
///
/// Registration happens up front through `&mut self`; afterwards the
/// registry is read-only, so a shared `&VariantRegistry` can serve any
/// number of concurrent encode/decode calls without locking.
///
/// # Example
///
/// ```
/// use json_tagged::{TaggedVariant, VariantRegistry};
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
/// let mut registry = VariantRegistry::new();
/// registry.register::<Ping>().unwrap();
/// assert!(registry.resolve("ping").is_some());
/// assert!(registry.resolve("pong").is_none());
/// ```
#[derive(Default)]
pub struct VariantRegistry {
    factories: HashMap<String, VariantFactory>,
    reverse: HashMap<TypeId, &'static str>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant type under its [`TaggedVariant::TAG`].
    ///
    /// # Errors
    ///
    /// Fails with [`EnvelopeError::DuplicateTag`] if the tag is already
    /// taken. A duplicate here is a programmer error, so last-write-wins is
    /// deliberately not supported.
    pub fn register<V>(&mut self) -> Result<(), EnvelopeError>
    where
        V: TaggedVariant + DeserializeOwned,
    {
        if self.factories.contains_key(V::TAG) {
            return Err(EnvelopeError::DuplicateTag(V::TAG.to_string()));
        }
        let factory: VariantFactory =
            |payload| serde_json::from_value::<V>(payload).map(|v| Box::new(v) as Box<dyn Variant>);
        self.factories.insert(V::TAG.to_string(), factory);
        self.reverse.insert(TypeId::of::<V>(), V::TAG);
        Ok(())
    }

    /// Look up the decode factory for a tag.
    pub fn resolve(&self, tag: &str) -> Option<&VariantFactory> {
        self.factories.get(tag)
    }

    /// Reverse lookup: the registered tag for a concrete variant value.
    ///
    /// This is the single source of truth on the encode side. For every
    /// registered tag, a value built by `resolve(tag)` maps back to `tag`.
    ///
    /// # Errors
    ///
    /// Fails with [`EnvelopeError::UnknownVariant`] if the concrete type was
    /// never registered (possible only for directly constructed envelopes).
    pub fn tag_of(&self, variant: &dyn Variant) -> Result<&'static str, EnvelopeError> {
        self.reverse
            .get(&variant.as_any().type_id())
            .copied()
            .ok_or_else(|| EnvelopeError::UnknownVariant(variant.tag_name().to_string()))
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Iterate over the registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, serde::Serialize, Deserialize)]
    struct Ping {
        seq: u64,
    }

    impl TaggedVariant for Ping {
        const TAG: &'static str = "ping";
    }

    #[derive(Debug, serde::Serialize, Deserialize)]
    struct Pong {
        seq: u64,
    }

    impl TaggedVariant for Pong {
        const TAG: &'static str = "pong";
    }

    // Same tag as Ping, different type.
    #[derive(Debug, serde::Serialize, Deserialize)]
    struct Imposter {
        seq: u64,
    }

    impl TaggedVariant for Imposter {
        const TAG: &'static str = "ping";
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = VariantRegistry::new();
        assert!(registry.is_empty());

        registry.register::<Ping>().unwrap();
        registry.register::<Pong>().unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.resolve("ping").is_some());
        assert!(registry.resolve("pong").is_some());
        assert!(registry.resolve("gone").is_none());

        let mut tags: Vec<&str> = registry.tags().collect();
        tags.sort_unstable();
        assert_eq!(tags, vec!["ping", "pong"]);
    }

    #[test]
    fn test_duplicate_tag_fails_fast() {
        let mut registry = VariantRegistry::new();
        registry.register::<Ping>().unwrap();

        let same_type = registry.register::<Ping>();
        assert!(matches!(
            same_type,
            Err(EnvelopeError::DuplicateTag(tag)) if tag == "ping"
        ));

        let same_tag = registry.register::<Imposter>();
        assert!(matches!(
            same_tag,
            Err(EnvelopeError::DuplicateTag(tag)) if tag == "ping"
        ));

        // The original registration is untouched.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_tag_of_inverts_resolve() {
        let mut registry = VariantRegistry::new();
        registry.register::<Ping>().unwrap();
        registry.register::<Pong>().unwrap();

        for tag in ["ping", "pong"] {
            let factory = registry.resolve(tag).unwrap();
            let variant = factory(json!({"seq": 7})).unwrap();
            assert_eq!(registry.tag_of(&*variant).unwrap(), tag);
            assert_eq!(variant.tag_name(), tag);
        }
    }

    #[test]
    fn test_tag_of_unregistered_type() {
        let mut registry = VariantRegistry::new();
        registry.register::<Ping>().unwrap();

        let stray = Pong { seq: 1 };
        assert!(matches!(
            registry.tag_of(&stray),
            Err(EnvelopeError::UnknownVariant(tag)) if tag == "pong"
        ));
    }

    #[test]
    fn test_factory_rejects_bad_payload() {
        let mut registry = VariantRegistry::new();
        registry.register::<Ping>().unwrap();

        let factory = registry.resolve("ping").unwrap();
        assert!(factory(json!({"seq": "not-a-number"})).is_err());
    }
}
