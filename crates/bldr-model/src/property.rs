//! Properties and their cross-cutting synthesis context.

use serde::Serialize;

use bldr_core::capitalize_first;

use crate::{Expr, TypeRef};

/// Factory for the expression that re-materializes a backing value from an
/// existing one, e.g. `new ArrayList<>(items)` or `Optional.of(b)`.
///
/// Typed replacement for an upstream "init function" carried as an opaque
/// string lambda; the engine only ever needs a constructor or a static
/// factory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum InitFn {
    Constructor(String),
    StaticFactory { class: String, method: String },
}

impl InitFn {
    pub fn apply(&self, args: Vec<Expr>) -> Expr {
        match self {
            InitFn::Constructor(class) => Expr::new_instance(class.clone(), args),
            InitFn::StaticFactory { class, method } => {
                Expr::static_call(class.clone(), method.clone(), args)
            }
        }
    }
}

/// Cross-cutting facts about a property, computed earlier in the pipeline.
///
/// This is the strongly-typed replacement of the string-keyed attribute bag
/// the engine consumes: every field is an explicit optional, so a synthesizer
/// that forgets to handle one fails to compile rather than silently reading
/// an absent key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyExtras {
    /// The builder's own self-type parameter, returned by fluent methods.
    pub generic_self_type: Option<TypeRef>,
    /// Expression materializing an empty backing value on first write,
    /// e.g. `new ArrayList<Animal>()`.
    pub lazy_init: Option<Expr>,
    /// Expression for the absent value of an optional property,
    /// e.g. `Optional.empty()`.
    pub init: Option<Expr>,
    /// Factory re-wrapping an existing value, see [`InitFn`].
    pub init_function: Option<InitFn>,
    /// Fully-qualified name of the `TypeDef` that declared this property.
    pub origin: Option<String>,
    /// Set when this property is the per-subtype shadow of another property;
    /// generated statements then target the shadowed field.
    pub descendant_of: Option<Box<Property>>,
    /// Precomputed buildable descendants, cached after the first resolution.
    pub descendants: Option<Vec<Property>>,
}

/// An immutable property of a type definition.
///
/// Derived properties (renamed for varargs, retyped per descendant) are
/// produced with the `with_*` copies; the source model is never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Property {
    pub name: String,
    pub type_ref: TypeRef,
    pub extras: PropertyExtras,
}

impl Property {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            extras: PropertyExtras::default(),
        }
    }

    pub fn capitalized_name(&self) -> String {
        capitalize_first(&self.name)
    }

    /// The builder field backing this property: the shadowed property's name
    /// when this is a descendant shadow, the property's own name otherwise.
    pub fn field_name(&self) -> &str {
        match &self.extras.descendant_of {
            Some(base) => &base.name,
            None => &self.name,
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Property {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }

    pub fn with_type_ref(&self, type_ref: TypeRef) -> Property {
        let mut copy = self.clone();
        copy.type_ref = type_ref;
        copy
    }

    pub fn with_extras(&self, extras: PropertyExtras) -> Property {
        let mut copy = self.clone();
        copy.extras = extras;
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_copies_leave_the_original_untouched() {
        let p = Property::new("items", TypeRef::class("java.util.List"));
        let renamed = p.with_name("item");
        assert_eq!(p.name, "items");
        assert_eq!(renamed.name, "item");
        assert_eq!(renamed.type_ref, p.type_ref);
    }

    #[test]
    fn field_name_follows_descendant_of() {
        let base = Property::new("items", TypeRef::class("java.util.List"));
        let mut shadow = Property::new("dogItems", TypeRef::class("java.util.List"));
        shadow.extras.descendant_of = Some(Box::new(base));
        assert_eq!(shadow.field_name(), "items");
        assert_eq!(shadow.capitalized_name(), "DogItems");
    }

    #[test]
    fn init_fn_builds_expressions() {
        let ctor = InitFn::Constructor("java.util.ArrayList".into());
        assert_eq!(
            ctor.apply(vec![Expr::var("items")]),
            Expr::new_instance("java.util.ArrayList", vec![Expr::var("items")])
        );

        let factory = InitFn::StaticFactory {
            class: "java.util.Optional".into(),
            method: "of".into(),
        };
        assert_eq!(
            factory.apply(vec![Expr::var("b")]),
            Expr::static_call("java.util.Optional", "of", vec![Expr::var("b")])
        );
    }
}
