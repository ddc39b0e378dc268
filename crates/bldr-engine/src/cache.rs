//! Memoization of synthesized methods.
//!
//! All synthesizer inputs are immutable values, so identical
//! `(family, property)` pairs always produce identical methods; the cache
//! makes repeated shapes across many generated classes cheap. Reads are
//! concurrent, writes serialized.

use std::collections::HashMap;
use std::sync::RwLock;

use bldr_model::{Method, Property};

use crate::error::Result;

/// Identity tag of a synthesizer family; the explicit counterpart of the
/// runtime type inspection the caching layer would otherwise need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SynthKind {
    With,
    WithArray,
    WithOptional,
    Has,
    HasMatching,
    Getter,
    GetterArray,
    Setter,
    AddToCollection,
    RemoveFromCollection,
    AddToMap,
    AddMapToMap,
    RemoveFromMap,
    RemoveMapFromMap,
    WithNewNested,
    WithNewLikeNested,
    SetNewLikeNestedAtIndex,
    WithNestedInline,
    EditOrNew,
    EditOrNewLike,
    EditNested,
    And,
    End,
}

#[derive(Default)]
pub struct SynthCache {
    inner: RwLock<HashMap<(SynthKind, Property), Vec<Method>>>,
}

impl SynthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the memoized result, running `synthesize` on a miss. Errors
    /// are not cached; a failing shape fails every time.
    pub fn get_or_synthesize(
        &self,
        kind: SynthKind,
        property: &Property,
        synthesize: impl FnOnce() -> Result<Vec<Method>>,
    ) -> Result<Vec<Method>> {
        let key = (kind, property.clone());
        if let Some(hit) = self.inner.read().expect("cache lock poisoned").get(&key) {
            return Ok(hit.clone());
        }
        let methods = synthesize()?;
        self.inner
            .write()
            .expect("cache lock poisoned")
            .insert(key, methods.clone());
        Ok(methods)
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{Method, TypeRef};

    #[test]
    fn second_lookup_skips_synthesis() {
        let cache = SynthCache::new();
        let property = Property::new("x", TypeRef::int());

        let first = cache
            .get_or_synthesize(SynthKind::Has, &property, || {
                Ok(vec![Method::new("hasX", TypeRef::boolean())])
            })
            .unwrap();

        let second = cache
            .get_or_synthesize(SynthKind::Has, &property, || {
                panic!("memoized entry must be reused")
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        use crate::error::EngineError;

        let cache = SynthCache::new();
        let property = Property::new("x", TypeRef::int());

        let err = cache.get_or_synthesize(SynthKind::AddToMap, &property, || {
            Err(EngineError::invalid_model("a map type", "int"))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());
    }
}
