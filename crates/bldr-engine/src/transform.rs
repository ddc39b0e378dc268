//! The type-transform algebra.
//!
//! Each transform is a total pure function over `TypeRef`: it either applies
//! (the input has the right shape) or is the identity. That makes transforms
//! freely composable with [`combine`] without shape checks at every call
//! site; callers that *require* a class reference after unwrapping check
//! explicitly and raise `EngineError::InvalidModel`.

use bldr_model::{ClassRef, TypeDef, TypeKind, TypeParamDef, TypeRef};

/// Fully-qualified name of the polymorphic builder capability implemented by
/// every generated builder.
pub const VISITABLE_BUILDER: &str = "bldr.api.VisitableBuilder";

/// Suffix appended to a type's simple name to form its builder's name.
pub const BUILDER_SUFFIX: &str = "Builder";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTransform {
    /// `List<T>`/`Set<T>`/`Collection<T>` => `T`.
    UnwrapCollection,
    /// `T[]...[]` => `T`.
    UnwrapArray,
    /// `Optional<T>` => `T`; `OptionalInt/Long/Double` => the boxed primitive.
    UnwrapOptional,
    /// `T` => `T[]`.
    ArrayOf,
    /// Primitive => boxed class; identity otherwise.
    Boxed,
}

impl TypeTransform {
    pub fn apply(self, ty: &TypeRef) -> TypeRef {
        match self {
            TypeTransform::UnwrapCollection => unwrap_collection(ty),
            TypeTransform::UnwrapArray => {
                if ty.dimensions() > 0 {
                    ty.with_dimensions(0)
                } else {
                    ty.clone()
                }
            }
            TypeTransform::UnwrapOptional => unwrap_optional(ty),
            TypeTransform::ArrayOf => ty.with_dimensions(ty.dimensions() + 1),
            TypeTransform::Boxed => boxed(ty),
        }
    }
}

/// Apply transforms left-to-right; non-applicable steps are no-ops.
pub fn combine(transforms: &[TypeTransform], ty: &TypeRef) -> TypeRef {
    transforms
        .iter()
        .fold(ty.clone(), |ty, transform| transform.apply(&ty))
}

/// Unwrap every collection/array/optional layer down to the item type.
pub fn unwrap_all(ty: &TypeRef) -> TypeRef {
    combine(
        &[
            TypeTransform::UnwrapCollection,
            TypeTransform::UnwrapArray,
            TypeTransform::UnwrapOptional,
        ],
        ty,
    )
}

fn unwrap_collection(ty: &TypeRef) -> TypeRef {
    if !ty.is_collection() {
        return ty.clone();
    }
    match ty.as_class_ref() {
        Some(cr) if cr.arguments.len() == 1 => cr.arguments[0].clone(),
        _ => ty.clone(),
    }
}

fn unwrap_optional(ty: &TypeRef) -> TypeRef {
    use bldr_model::PrimitiveKind;

    if ty.is_optional() {
        return match ty.as_class_ref() {
            Some(cr) if cr.arguments.len() == 1 => cr.arguments[0].clone(),
            _ => ty.clone(),
        };
    }
    if ty.is_optional_int() {
        return TypeRef::class(PrimitiveKind::Int.boxed_name());
    }
    if ty.is_optional_long() {
        return TypeRef::class(PrimitiveKind::Long.boxed_name());
    }
    if ty.is_optional_double() {
        return TypeRef::class(PrimitiveKind::Double.boxed_name());
    }
    ty.clone()
}

fn boxed(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Primitive { kind, dimensions: 0 } => TypeRef::class(kind.boxed_name()),
        _ => ty.clone(),
    }
}

/// The generated builder definition for a buildable type:
/// `<Type>Builder`, same type parameters, implementing
/// `VisitableBuilder<Type, TypeBuilder>`.
pub fn builder_def(def: &TypeDef) -> TypeDef {
    let mut builder = shallow_builder_def(def);
    builder.supertypes.push(
        ClassRef::new(VISITABLE_BUILDER).with_arguments(vec![
            TypeRef::Class(def.to_reference()),
            TypeRef::Class(builder.to_reference()),
        ]),
    );
    builder
}

/// Like [`builder_def`] but without the visitable supertype; used where only
/// the name and constructors matter (e.g. `new XBuilder().build()` seeds).
pub fn shallow_builder_def(def: &TypeDef) -> TypeDef {
    let mut builder = TypeDef::new(TypeKind::Class, format!("{}{}", def.name, BUILDER_SUFFIX));
    builder.parameters = def.parameters.clone();
    builder
}

/// `VisitableBuilder<? extends T, ?>`: the existentially-bounded builder
/// capability used wherever the concrete builder type is unknown at
/// generation time.
pub fn visitable_builder_ref(ty: &TypeRef) -> ClassRef {
    ClassRef::new(VISITABLE_BUILDER).with_arguments(vec![
        TypeRef::wildcard_extending(ty.with_dimensions(0)),
        TypeRef::wildcard(),
    ])
}

/// Name-diff prefix used to disambiguate generated method names when the
/// item type lives in a different package than the origin type: the
/// capitalized package segments of `base` that the origin's package does not
/// share, in order.
pub fn fully_qualified_name_diff(base: &ClassRef, origin: Option<&TypeDef>) -> String {
    let Some(origin) = origin else {
        return String::new();
    };
    let Some(base_pkg) = base.package() else {
        return String::new();
    };
    let origin_pkg = origin.package().unwrap_or("");
    if base_pkg == origin_pkg {
        return String::new();
    }

    let origin_segments: Vec<&str> = origin_pkg.split('.').collect();
    base_pkg
        .split('.')
        .enumerate()
        .filter(|(i, segment)| origin_segments.get(*i) != Some(segment))
        .map(|(_, segment)| bldr_core::capitalize_first(segment))
        .collect()
}

/// Declares the `N` type parameter used by nested builders for their
/// parent-return type.
pub fn nested_param() -> TypeParamDef {
    TypeParamDef::new("N")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{JAVA_LIST, JAVA_OPTIONAL, JAVA_OPTIONAL_INT};

    fn animal() -> TypeRef {
        TypeRef::class("com.example.Animal")
    }

    #[test]
    fn unwraps_apply_only_to_matching_shapes() {
        let list = TypeRef::generic(JAVA_LIST, vec![animal()]);
        assert_eq!(TypeTransform::UnwrapCollection.apply(&list), animal());
        assert_eq!(TypeTransform::UnwrapCollection.apply(&animal()), animal());

        let opt = TypeRef::generic(JAVA_OPTIONAL, vec![animal()]);
        assert_eq!(TypeTransform::UnwrapOptional.apply(&opt), animal());
        assert_eq!(
            TypeTransform::UnwrapOptional.apply(&TypeRef::class(JAVA_OPTIONAL_INT)),
            TypeRef::class("java.lang.Integer")
        );

        let arr = animal().with_dimensions(2);
        assert_eq!(TypeTransform::UnwrapArray.apply(&arr), animal());
    }

    #[test]
    fn combine_chains_left_to_right() {
        let ty = TypeRef::generic(
            JAVA_LIST,
            vec![TypeRef::generic(JAVA_OPTIONAL, vec![animal()])],
        );
        assert_eq!(unwrap_all(&ty), animal());

        // Shape mismatch at each step degrades to identity.
        assert_eq!(unwrap_all(&TypeRef::boolean()), TypeRef::boolean());
    }

    #[test]
    fn boxes_primitives_only() {
        assert_eq!(
            TypeTransform::Boxed.apply(&TypeRef::int()),
            TypeRef::class("java.lang.Integer")
        );
        assert_eq!(TypeTransform::Boxed.apply(&animal()), animal());
    }

    #[test]
    fn builder_def_names_and_wires_visitable() {
        let def = TypeDef::new(TypeKind::Class, "com.example.Animal");
        let builder = builder_def(&def);
        assert_eq!(builder.name, "com.example.AnimalBuilder");
        assert_eq!(builder.supertypes.len(), 1);
        assert_eq!(builder.supertypes[0].name, VISITABLE_BUILDER);

        assert!(shallow_builder_def(&def).supertypes.is_empty());
    }

    #[test]
    fn name_diff_is_empty_within_a_package() {
        let origin = TypeDef::new(TypeKind::Class, "com.example.Root");
        let same = ClassRef::new("com.example.Widget");
        assert_eq!(fully_qualified_name_diff(&same, Some(&origin)), "");

        let other = ClassRef::new("com.example.extra.Widget");
        assert_eq!(fully_qualified_name_diff(&other, Some(&origin)), "Extra");
        assert_eq!(fully_qualified_name_diff(&other, None), "");
    }
}
