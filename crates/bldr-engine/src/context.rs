//! Query seam between the synthesizers and the type repository.

use std::sync::Arc;

use bldr_model::{ClassRef, DefinitionRepository, TypeDef, TypeKind, TypeRef};

use crate::transform::{self, BUILDER_SUFFIX};

/// Everything a synthesizer needs to consult beyond the property itself.
#[derive(Clone)]
pub struct BuilderContext {
    repository: Arc<DefinitionRepository>,
    strict: bool,
}

impl BuilderContext {
    pub fn new(repository: Arc<DefinitionRepository>) -> Self {
        Self {
            repository,
            strict: false,
        }
    }

    /// Strict mode makes descendant-dispatch `with*` methods emit a runtime
    /// failure when no known descendant matches, instead of silently falling
    /// through.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn repository(&self) -> &DefinitionRepository {
        &self.repository
    }

    pub fn definition_of(&self, ty: &TypeRef) -> Option<Arc<TypeDef>> {
        self.repository.definition_of(ty)
    }

    /// Whether the (unwrapped) type has a generated builder.
    pub fn is_buildable(&self, ty: &TypeRef) -> bool {
        self.definition_of(ty).is_some_and(|def| def.buildable)
    }

    /// Whether the type cannot be instantiated directly. Unknown types are
    /// assumed concrete.
    pub fn is_abstract(&self, ty: &TypeRef) -> bool {
        self.definition_of(ty)
            .is_some_and(|def| def.is_abstract || def.kind == TypeKind::Interface)
    }

    /// Re-resolve a class reference through the repository, keeping the
    /// reference as supplied when the type is unknown.
    pub fn reload(&self, class_ref: &ClassRef) -> ClassRef {
        match self.repository.get_definition(&class_ref.name) {
            Some(def) => {
                let mut reloaded = def.to_reference();
                if !class_ref.arguments.is_empty() {
                    reloaded.arguments = class_ref.arguments.clone();
                }
                reloaded
            }
            None => class_ref.clone(),
        }
    }

    /// The builder-typed reference used for items of `ty` inside generated
    /// collections: the concrete `<X>Builder` when `ty` is buildable, the
    /// existential `VisitableBuilder<? extends X, ?>` otherwise.
    pub fn buildable_ref(&self, ty: &TypeRef) -> TypeRef {
        if self.is_buildable(ty) {
            if let Some(cr) = ty.as_class_ref() {
                return TypeRef::Class(ClassRef::new(format!("{}{}", cr.name, BUILDER_SUFFIX)));
            }
        }
        TypeRef::Class(transform::visitable_builder_ref(ty))
    }

    /// Simple name of the builder class for a class reference.
    pub fn builder_name(&self, class_ref: &ClassRef) -> String {
        format!("{}{}", class_ref.simple_name(), BUILDER_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::TypeDef;

    fn context_with(defs: Vec<TypeDef>) -> BuilderContext {
        let repo = Arc::new(DefinitionRepository::new());
        for def in defs {
            repo.register(def);
        }
        BuilderContext::new(repo)
    }

    #[test]
    fn buildable_follows_the_definition_flag() {
        let mut animal = TypeDef::new(TypeKind::Class, "com.example.Animal");
        animal.buildable = true;
        let ctx = context_with(vec![animal]);

        assert!(ctx.is_buildable(&TypeRef::class("com.example.Animal")));
        assert!(!ctx.is_buildable(&TypeRef::class("com.example.Unknown")));
        assert!(!ctx.is_buildable(&TypeRef::int()));
    }

    #[test]
    fn unknown_types_are_concrete_and_kept_as_supplied() {
        let ctx = context_with(vec![]);
        let reference = ClassRef::new("com.example.Unknown");
        assert!(!ctx.is_abstract(&TypeRef::Class(reference.clone())));
        assert_eq!(ctx.reload(&reference), reference);
    }

    #[test]
    fn buildable_ref_picks_concrete_or_existential() {
        let mut dog = TypeDef::new(TypeKind::Class, "com.example.Dog");
        dog.buildable = true;
        let ctx = context_with(vec![dog]);

        let concrete = ctx.buildable_ref(&TypeRef::class("com.example.Dog"));
        assert_eq!(
            concrete.as_class_ref().unwrap().name,
            "com.example.DogBuilder"
        );

        let existential = ctx.buildable_ref(&TypeRef::class("com.example.Animal"));
        assert_eq!(
            existential.as_class_ref().unwrap().name,
            transform::VISITABLE_BUILDER
        );
    }
}
