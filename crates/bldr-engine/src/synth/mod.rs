//! Method synthesizers: one family per fluent-method kind.
//!
//! Every synthesizer is a pure function from a property (plus the context)
//! to one or more [`Method`] values. Families that touch a buildable-typed
//! field must keep the `_visitables` tracking list consistent with the field:
//! whatever a body adds to one it adds to the other, and removals mirror
//! that. This pairing is the engine's central invariant and is what the
//! structural tests lean on.

mod collections;
mod getters;
mod maps;
mod nested;
mod with;

use bldr_model::{
    ClassRef, Expr, InitFn, Method, Property, Statement, TypeRef, JAVA_PREDICATE,
};

use crate::cache::{SynthCache, SynthKind};
use crate::context::BuilderContext;
use crate::error::{EngineError, Result};

/// Name of the tracking list every generated builder maintains alongside its
/// fields.
pub const VISITABLES: &str = "_visitables";

/// Facade over the synthesizer families with `(family, property)`
/// memoization.
pub struct MethodSynthesizers {
    ctx: BuilderContext,
    cache: SynthCache,
}

impl MethodSynthesizers {
    pub fn new(ctx: BuilderContext) -> Self {
        Self {
            ctx,
            cache: SynthCache::new(),
        }
    }

    pub fn ctx(&self) -> &BuilderContext {
        &self.ctx
    }

    fn one(
        &self,
        kind: SynthKind,
        property: &Property,
        synthesize: impl FnOnce(&BuilderContext, &Property) -> Result<Vec<Method>>,
    ) -> Result<Method> {
        let mut methods = self
            .cache
            .get_or_synthesize(kind, property, || synthesize(&self.ctx, property))?;
        methods.pop().ok_or_else(|| {
            EngineError::invalid_model(
                format!("one {kind:?} method for `{}`", property.name),
                "an empty family",
            )
        })
    }

    fn many(
        &self,
        kind: SynthKind,
        property: &Property,
        synthesize: impl FnOnce(&BuilderContext, &Property) -> Result<Vec<Method>>,
    ) -> Result<Vec<Method>> {
        self.cache
            .get_or_synthesize(kind, property, || synthesize(&self.ctx, property))
    }

    pub fn with(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::With, property, with::with)
    }

    pub fn with_array(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::WithArray, property, with::with_array)
    }

    pub fn with_optional(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(SynthKind::WithOptional, property, with::with_optional)
    }

    pub fn setter(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::Setter, property, with::setter)
    }

    pub fn has(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::Has, property, getters::has)
    }

    pub fn has_matching(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::HasMatching, property, getters::has_matching)
    }

    pub fn getter(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(SynthKind::Getter, property, getters::getter)
    }

    pub fn getter_array(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(SynthKind::GetterArray, property, getters::getter_array)
    }

    pub fn add_to_collection(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(
            SynthKind::AddToCollection,
            property,
            collections::add_to_collection,
        )
    }

    pub fn remove_from_collection(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(
            SynthKind::RemoveFromCollection,
            property,
            collections::remove_from_collection,
        )
    }

    pub fn add_to_map(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::AddToMap, property, maps::add_to_map)
    }

    pub fn add_map_to_map(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::AddMapToMap, property, maps::add_map_to_map)
    }

    pub fn remove_from_map(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::RemoveFromMap, property, maps::remove_from_map)
    }

    pub fn remove_map_from_map(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::RemoveMapFromMap, property, maps::remove_map_from_map)
    }

    pub fn with_new_nested(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::WithNewNested, property, nested::with_new_nested)
    }

    pub fn with_new_like_nested(&self, property: &Property) -> Result<Method> {
        self.one(
            SynthKind::WithNewLikeNested,
            property,
            nested::with_new_like_nested,
        )
    }

    pub fn set_new_like_nested_at_index(&self, property: &Property) -> Result<Method> {
        self.one(
            SynthKind::SetNewLikeNestedAtIndex,
            property,
            nested::set_new_like_nested_at_index,
        )
    }

    pub fn with_nested_inline(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(
            SynthKind::WithNestedInline,
            property,
            nested::with_nested_inline,
        )
    }

    pub fn edit_or_new(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::EditOrNew, property, nested::edit_or_new)
    }

    pub fn edit_or_new_like(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::EditOrNewLike, property, nested::edit_or_new_like)
    }

    pub fn edit_nested(&self, property: &Property) -> Result<Vec<Method>> {
        self.many(SynthKind::EditNested, property, nested::edit_nested)
    }

    pub fn and_method(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::And, property, nested::and_method)
    }

    pub fn end_method(&self, property: &Property) -> Result<Method> {
        self.one(SynthKind::End, property, nested::end_method)
    }
}

// Shared helpers.

/// The tracking list as an expression.
pub(crate) fn visitables() -> Expr {
    Expr::field(VISITABLES)
}

/// The fluent return type: the builder's own self-type parameter when one
/// was configured, a generic `T` placeholder otherwise.
pub(crate) fn self_ref(property: &Property) -> TypeRef {
    property
        .extras
        .generic_self_type
        .clone()
        .unwrap_or_else(|| TypeRef::variable("T"))
}

/// `return (SelfType) this;`
pub(crate) fn ret_self(property: &Property) -> Statement {
    Statement::ret(Expr::cast(self_ref(property), Expr::This))
}

pub(crate) fn lazy_init(property: &Property) -> Result<Expr> {
    property
        .extras
        .lazy_init
        .clone()
        .ok_or_else(|| EngineError::missing_init(&property.name, "lazy-init expression"))
}

pub(crate) fn init_expr(property: &Property) -> Result<Expr> {
    property
        .extras
        .init
        .clone()
        .ok_or_else(|| EngineError::missing_init(&property.name, "init expression"))
}

pub(crate) fn init_function(property: &Property) -> Result<&InitFn> {
    property
        .extras
        .init_function
        .as_ref()
        .ok_or_else(|| EngineError::missing_init(&property.name, "init function"))
}

/// `if (this.<field> == null) { this.<field> = <lazy-init>; }`
pub(crate) fn lazy_init_guard(property: &Property) -> Result<Statement> {
    let field = property.field_name();
    Ok(Statement::if_then(
        Expr::field(field).is_null(),
        vec![Statement::assign(Expr::field(field), lazy_init(property)?)],
    ))
}

pub(crate) fn index_property() -> Property {
    Property::new("index", TypeRef::int())
}

/// `predicate: Predicate<item>` argument.
pub(crate) fn predicate_property(item: TypeRef) -> Property {
    Property::new(
        "predicate",
        TypeRef::generic(JAVA_PREDICATE, vec![item]),
    )
}

/// The unwrapped item type as a class reference, or a model-shape error.
pub(crate) fn require_class(unwrapped: &TypeRef) -> Result<&ClassRef> {
    unwrapped
        .as_class_ref()
        .ok_or_else(|| EngineError::invalid_model("a buildable class type", unwrapped))
}

/// Fully-qualified builder reference for an item class, for `also_import`.
pub(crate) fn builder_import(class_ref: &ClassRef) -> ClassRef {
    ClassRef::new(format!("{}Builder", class_ref.name))
}
