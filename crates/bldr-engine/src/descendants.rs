//! Resolution of buildable descendants.
//!
//! A property declared against an abstract buildable type (`List<Animal>`)
//! gets one derived "shadow" property per known concrete subtype, driving
//! per-subtype overloads and `instanceof` dispatch chains in the generated
//! builder.

use std::collections::{BTreeMap, HashSet};

use bldr_core::{capitalize_first, decapitalize};
use bldr_model::{ClassRef, Property, TypeDef, TypeRef};
use tracing::debug;

use crate::context::BuilderContext;
use crate::transform::unwrap_all;

/// The known buildable descendants of a property's declared type, as derived
/// properties ordered by name.
///
/// Each descendant keeps the base property's extras, substitutes the concrete
/// subtype into the original collection/array/optional wrapping, is renamed
/// `<subtype><Base>` (`dogItems` for `Dog` under `items`), and records the
/// base property as `descendant_of` so generated statements still target the
/// base field. The ordering is what makes generated `else if` chains
/// deterministic; dispatch itself is first-structural-match-wins.
pub fn buildable_descendants(ctx: &BuilderContext, property: &Property) -> Vec<Property> {
    if let Some(cached) = &property.extras.descendants {
        return cached.clone();
    }

    let unwrapped = unwrap_all(&property.type_ref);
    let Some(base_ref) = unwrapped.as_class_ref() else {
        return Vec::new();
    };

    let mut base = property.clone();
    base.extras.descendants = None;

    let mut found: BTreeMap<String, Property> = BTreeMap::new();
    for def in ctx.repository().all() {
        if def.name == base_ref.name || !def.buildable || ctx.is_abstract(&TypeRef::Class(def.to_reference())) {
            continue;
        }
        if !extends(ctx, &def, &base_ref.name) {
            continue;
        }

        let name = format!(
            "{}{}",
            decapitalize(def.simple_name()),
            capitalize_first(&property.name)
        );
        let concrete = TypeRef::Class(def.to_reference());
        let mut derived = property
            .with_name(name.clone())
            .with_type_ref(rewrap_like(&property.type_ref, concrete));
        derived.extras.descendant_of = Some(Box::new(base.clone()));
        derived.extras.descendants = None;
        found.insert(name, derived);
    }

    debug!(
        property = %property.name,
        base = %base_ref.name,
        descendants = found.len(),
        "resolved buildable descendants"
    );
    found.into_values().collect()
}

/// Whether `def`'s supertype chain reaches `target` (by fully-qualified
/// name). Unknown supertypes terminate the walk for their branch.
fn extends(ctx: &BuilderContext, def: &TypeDef, target: &str) -> bool {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending: Vec<ClassRef> = def.supertypes.clone();
    while let Some(super_ref) = pending.pop() {
        if super_ref.name == target {
            return true;
        }
        if !seen.insert(super_ref.name.clone()) {
            continue;
        }
        if let Some(super_def) = ctx.repository().get_definition(&super_ref.name) {
            pending.extend(super_def.supertypes.iter().cloned());
        }
    }
    false
}

/// Substitute `item` for the unwrapped item type of `original`, preserving
/// the collection/optional/array wrapping.
fn rewrap_like(original: &TypeRef, item: TypeRef) -> TypeRef {
    if original.dimensions() > 0 {
        return item.with_dimensions(original.dimensions());
    }
    if original.is_collection() || original.is_optional() {
        if let Some(cr) = original.as_class_ref() {
            if cr.arguments.len() == 1 {
                let inner = rewrap_like(&cr.arguments[0], item);
                return TypeRef::Class(cr.clone().with_arguments(vec![inner]));
            }
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{DefinitionRepository, TypeKind, JAVA_LIST};
    use std::sync::Arc;

    fn animal_kingdom() -> BuilderContext {
        let repo = Arc::new(DefinitionRepository::new());
        let mut animal = TypeDef::new(TypeKind::Class, "com.example.Animal");
        animal.is_abstract = true;
        animal.buildable = true;
        repo.register(animal);

        // Registered out of name order on purpose.
        for name in ["com.example.Dog", "com.example.Cat"] {
            let mut def = TypeDef::new(TypeKind::Class, name);
            def.buildable = true;
            def.supertypes.push(ClassRef::new("com.example.Animal"));
            repo.register(def);
        }

        let mut plant = TypeDef::new(TypeKind::Class, "com.example.Fern");
        plant.buildable = true;
        repo.register(plant);

        BuilderContext::new(repo)
    }

    #[test]
    fn finds_subtypes_sorted_by_name() {
        let ctx = animal_kingdom();
        let property = Property::new(
            "items",
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class("com.example.Animal")]),
        );

        let descendants = buildable_descendants(&ctx, &property);
        let names: Vec<_> = descendants.iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["catItems", "dogItems"]);

        let dog = &descendants[1];
        assert_eq!(dog.field_name(), "items");
        assert_eq!(
            dog.type_ref,
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class("com.example.Dog")])
        );
    }

    #[test]
    fn excludes_self_and_unrelated_types() {
        let ctx = animal_kingdom();
        let property = Property::new("pet", TypeRef::class("com.example.Dog"));
        assert!(buildable_descendants(&ctx, &property).is_empty());

        let fern = Property::new("fern", TypeRef::class("com.example.Fern"));
        assert!(buildable_descendants(&ctx, &fern).is_empty());
    }

    #[test]
    fn cached_descendants_win() {
        let ctx = animal_kingdom();
        let mut property = Property::new("items", TypeRef::class("com.example.Animal"));
        property.extras.descendants = Some(Vec::new());
        assert!(buildable_descendants(&ctx, &property).is_empty());
    }

    #[test]
    fn array_wrapping_is_preserved() {
        let ctx = animal_kingdom();
        let property = Property::new(
            "pets",
            TypeRef::class("com.example.Animal").with_dimensions(1),
        );
        let descendants = buildable_descendants(&ctx, &property);
        assert_eq!(descendants.len(), 2);
        assert_eq!(
            descendants[1].type_ref,
            TypeRef::class("com.example.Dog").with_dimensions(1)
        );
    }
}
