//! Derivation of the nested sub-builder types backing `withNew*()` chains.
//!
//! For a buildable property `spec` the builder grows an inner interface
//! `SpecNested<N>` and an inner class `SpecNestedImpl<N>`; `N` is the parent
//! builder's type, returned by `and()`/`end*()` to navigate back up.

use bldr_core::capitalize_first;
use bldr_model::{ClassRef, Property, TypeDef, TypeKind, TypeRef};

use crate::context::BuilderContext;
use crate::error::{EngineError, Result};
use crate::transform::{nested_param, unwrap_all};

/// Fully-qualified name of the runtime marker interface nested builders
/// extend.
pub const NESTED: &str = "bldr.api.Nested";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestedTypes {
    pub interface: TypeDef,
    pub implementation: TypeDef,
}

/// The `<Prop>Nested<N>` interface for a property. Fails when the property
/// does not unwrap to a class type.
pub fn nested_interface_def(ctx: &BuilderContext, property: &Property) -> Result<TypeDef> {
    let base = unwrapped_class(ctx, property)?;
    let mut def = TypeDef::new(
        TypeKind::Interface,
        format!("{}Nested", capitalize_first(&property.name)),
    );
    def.parameters = base_parameters(ctx, &base);
    def.parameters.push(nested_param());
    def.supertypes
        .push(ClassRef::new(NESTED).with_arguments(vec![TypeRef::variable("N")]));
    Ok(def)
}

/// The `<Prop>NestedImpl<N>` class: holds the delegate builder (and, for
/// collection properties, the slot index written back on `and()`).
pub fn nested_impl_def(ctx: &BuilderContext, property: &Property) -> Result<TypeDef> {
    let base = unwrapped_class(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;

    let mut def = TypeDef::new(
        TypeKind::Class,
        format!("{}NestedImpl", capitalize_first(&property.name)),
    );
    def.parameters = interface.parameters.clone();
    def.supertypes.push(interface.to_reference());

    let builder_name = format!("{}Builder", base.name);
    def.properties.push(Property::new(
        "builder",
        TypeRef::Class(ClassRef::new(builder_name)),
    ));
    if property.type_ref.is_collection() || property.type_ref.is_array() {
        def.properties.push(Property::new("index", TypeRef::int()));
    }
    Ok(def)
}

/// Reference to a nested type with the base type's arguments plus the
/// parent-return type appended, e.g. `SpecNested<T>` for self type `T`.
pub fn nested_ref(nested: &TypeDef, base: &ClassRef, parent: TypeRef) -> ClassRef {
    let mut arguments = base.arguments.clone();
    arguments.push(parent);
    ClassRef::new(nested.name.clone()).with_arguments(arguments)
}

/// Like [`nested_ref`] but with the base arguments erased to wildcards, used
/// by the `edit*`/`withNew*Like` family where the seed instance fixes them.
pub fn nested_ref_erased(nested: &TypeDef, base: &ClassRef, parent: TypeRef) -> ClassRef {
    let mut arguments: Vec<TypeRef> = base.arguments.iter().map(|_| TypeRef::wildcard()).collect();
    arguments.push(parent);
    ClassRef::new(nested.name.clone()).with_arguments(arguments)
}

fn base_parameters(ctx: &BuilderContext, base: &ClassRef) -> Vec<bldr_model::TypeParamDef> {
    ctx.repository()
        .get_definition(&base.name)
        .map(|def| def.parameters.clone())
        .unwrap_or_default()
}

/// Unwrap the property down to its class reference, reloading through the
/// repository, or fail with a model-shape error.
pub fn unwrapped_class(ctx: &BuilderContext, property: &Property) -> Result<ClassRef> {
    let unwrapped = unwrap_all(&property.type_ref);
    match unwrapped.as_class_ref() {
        Some(cr) => Ok(ctx.reload(cr)),
        None => Err(EngineError::invalid_model(
            "a nestable/buildable class type",
            &unwrapped,
        )),
    }
}
