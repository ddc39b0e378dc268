//! The repository of known type definitions.
//!
//! Populated once (or incrementally, append-only) before synthesis reads
//! from it. Lookups are idempotent: registering a name twice keeps the first
//! definition. Reads are concurrent; writes are serialized behind the lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{TypeDef, TypeRef};

#[derive(Debug, Default)]
pub struct DefinitionRepository {
    inner: RwLock<HashMap<String, Arc<TypeDef>>>,
}

impl DefinitionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its fully-qualified name. If the name is
    /// already taken the existing definition wins and is returned, so the
    /// same name always maps to the same instance.
    pub fn register(&self, def: TypeDef) -> Arc<TypeDef> {
        let mut map = self.inner.write().expect("repository lock poisoned");
        map.entry(def.name.clone())
            .or_insert_with(|| Arc::new(def))
            .clone()
    }

    pub fn get_definition(&self, fully_qualified_name: &str) -> Option<Arc<TypeDef>> {
        let map = self.inner.read().expect("repository lock poisoned");
        map.get(fully_qualified_name).cloned()
    }

    /// Resolve a type reference to its definition, if known. Callers treat
    /// absence as "use the reference as supplied".
    pub fn definition_of(&self, type_ref: &TypeRef) -> Option<Arc<TypeDef>> {
        let class_ref = type_ref.as_class_ref()?;
        self.get_definition(&class_ref.name)
    }

    /// All known definitions, sorted by fully-qualified name so iteration
    /// order is stable across runs.
    pub fn all(&self) -> Vec<Arc<TypeDef>> {
        let map = self.inner.read().expect("repository lock poisoned");
        let mut defs: Vec<Arc<TypeDef>> = map.values().cloned().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("repository lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeKind;

    #[test]
    fn registration_is_idempotent() {
        let repo = DefinitionRepository::new();
        let first = repo.register(TypeDef::new(TypeKind::Class, "com.example.Animal"));

        let mut conflicting = TypeDef::new(TypeKind::Class, "com.example.Animal");
        conflicting.is_abstract = true;
        let second = repo.register(conflicting);

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!second.is_abstract);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn lookup_miss_is_none() {
        let repo = DefinitionRepository::new();
        assert!(repo.get_definition("com.example.Missing").is_none());
        assert!(repo
            .definition_of(&TypeRef::variable("T"))
            .is_none());
    }

    #[test]
    fn all_is_name_sorted() {
        let repo = DefinitionRepository::new();
        repo.register(TypeDef::new(TypeKind::Class, "com.example.Zebra"));
        repo.register(TypeDef::new(TypeKind::Class, "com.example.Aardvark"));
        let names: Vec<_> = repo.all().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["com.example.Aardvark", "com.example.Zebra"]);
    }
}
