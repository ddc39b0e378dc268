//! The nested-builder surface: `withNew*`/`addNew*` entry points,
//! `editOrNew*`/`edit*` re-entry, and the `and()`/`end*()` navigation pair
//! emitted onto the nested types themselves.

use bldr_core::{capitalize_first, singularize};
use bldr_model::{BinOp, Expr, Method, Property, Statement, TypeRef};

use crate::context::BuilderContext;
use crate::error::Result;
use crate::nesting::{nested_interface_def, nested_ref, nested_ref_erased, unwrapped_class};
use crate::transform::fully_qualified_name_diff;

use super::{index_property, predicate_property, self_ref};

/// Naming and type material shared by the whole family.
struct Nesting {
    base: bldr_model::ClassRef,
    /// `addNew` for collection-shaped properties, `withNew` otherwise.
    new_prefix: &'static str,
    /// Capitalized property name, singularized for collections.
    cap: String,
    /// Name-diff prefix disambiguating cross-package item types.
    diff: String,
    collection: bool,
    impl_name: String,
}

fn nesting(ctx: &BuilderContext, property: &Property) -> Result<Nesting> {
    let base = unwrapped_class(ctx, property)?;
    let origin = property
        .extras
        .origin
        .as_deref()
        .and_then(|fq| ctx.repository().get_definition(fq));
    let collection = property.type_ref.is_collection() || property.type_ref.is_array();
    let plain_cap = property.capitalized_name();
    Ok(Nesting {
        diff: fully_qualified_name_diff(&base, origin.as_deref()),
        base,
        new_prefix: if collection { "addNew" } else { "withNew" },
        cap: if collection {
            singularize(&plain_cap)
        } else {
            plain_cap
        },
        collection,
        impl_name: format!("{}NestedImpl", capitalize_first(&property.name)),
    })
}

/// `withNewX()` / `addNewX()`: opens a nested builder seeded empty.
pub(super) fn with_new_nested(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;
    let return_type = nested_ref(&interface, &n.base, self_ref(property));
    let parameters = ctx
        .repository()
        .get_definition(&n.base.name)
        .map(|def| def.parameters.clone())
        .unwrap_or_default();

    Ok(vec![Method::new(
        format!("{}{}{}", n.new_prefix, n.diff, n.cap),
        TypeRef::Class(return_type),
    )
    .with_type_parameters(parameters)
    .with_statements(vec![Statement::ret(Expr::new_instance(
        n.impl_name.clone(),
        vec![],
    ))])])
}

/// `withNewXLike(item)` / `addNewXLike(item)`: opens a nested builder seeded
/// from an existing value.
pub(super) fn with_new_like_nested(
    ctx: &BuilderContext,
    property: &Property,
) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;
    let return_type = nested_ref_erased(&interface, &n.base, self_ref(property));

    let args = if n.collection {
        // -1 appends on and(); setNew*Like passes a real slot.
        vec![Expr::int(-1), Expr::var("item")]
    } else {
        vec![Expr::var("item")]
    };
    Ok(vec![Method::new(
        format!("{}{}{}Like", n.new_prefix, n.diff, n.cap),
        TypeRef::Class(return_type),
    )
    .with_arguments(vec![property
        .with_name("item")
        .with_type_ref(TypeRef::Class(n.base.clone()))])
    .with_statements(vec![Statement::ret(Expr::new_instance(
        n.impl_name.clone(),
        args,
    ))])])
}

/// `setNewXLike(index, item)`: the slot-targeted variant used by `edit*`.
pub(super) fn set_new_like_nested_at_index(
    ctx: &BuilderContext,
    property: &Property,
) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;
    let return_type = nested_ref_erased(&interface, &n.base, self_ref(property));

    Ok(vec![Method::new(
        format!("setNew{}{}Like", n.diff, n.cap),
        TypeRef::Class(return_type),
    )
    .with_arguments(vec![
        index_property(),
        property
            .with_name("item")
            .with_type_ref(TypeRef::Class(n.base.clone())),
    ])
    .with_statements(vec![Statement::ret(Expr::new_instance(
        n.impl_name.clone(),
        vec![Expr::var("index"), Expr::var("item")],
    ))])])
}

/// One inline shortcut per simple constructor of the item type:
/// `withNewX(a, b)` builds the value and delegates to `withX`/`addToX`.
///
/// A constructor qualifies when it takes at least one argument and none of
/// them is itself buildable or container-shaped; anything richer goes
/// through the nested builder instead.
pub(super) fn with_nested_inline(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let Some(def) = ctx.repository().get_definition(&n.base.name) else {
        return Ok(Vec::new());
    };

    let delegate = if n.collection {
        format!("addTo{}", property.capitalized_name())
    } else {
        format!("with{}", property.capitalized_name())
    };

    let mut methods = Vec::new();
    for constructor in &def.constructors {
        if constructor.is_empty() || !constructor.iter().all(|arg| inlineable(ctx, arg)) {
            continue;
        }
        let seed = Expr::new_instance(
            n.base.simple_name().to_string(),
            constructor.iter().map(|arg| Expr::var(&arg.name)).collect(),
        );
        methods.push(
            Method::new(
                format!("{}{}{}", n.new_prefix, n.diff, n.cap),
                self_ref(property),
            )
            .with_arguments(constructor.clone())
            .with_statements(vec![Statement::ret(Expr::cast(
                self_ref(property),
                Expr::This.call(delegate.clone(), vec![seed]),
            ))])
            .with_also_import(vec![n.base.clone()]),
        );
    }
    Ok(methods)
}

fn inlineable(ctx: &BuilderContext, arg: &Property) -> bool {
    let ty = &arg.type_ref;
    !ctx.is_buildable(ty) && !ty.is_collection() && !ty.is_map() && !ty.is_any_optional()
}

fn current_value(property: &Property) -> Expr {
    let getter = Expr::This.call(format!("get{}", property.capitalized_name()), vec![]);
    if property.type_ref.is_any_optional() {
        getter.call("orElse", vec![Expr::Null])
    } else {
        getter
    }
}

/// `editOrNewX()`: re-enter the current value, or a freshly built default.
pub(super) fn edit_or_new(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;
    let return_type = nested_ref_erased(&interface, &n.base, self_ref(property));
    let fresh = Expr::new_instance(format!("{}Builder", n.base.simple_name()), vec![])
        .call("build", vec![]);
    let value = current_value(property);

    Ok(vec![Method::new(
        format!("editOrNew{}", n.cap),
        TypeRef::Class(return_type),
    )
    .with_statements(vec![Statement::ret(Expr::This.call(
        format!("withNew{}{}Like", n.diff, n.cap),
        vec![Expr::ternary(value.clone().not_null(), value, fresh)],
    ))])])
}

/// `editOrNewXLike(item)`: like [`edit_or_new`] but seeded with the caller's
/// fallback instead of a default-built one.
pub(super) fn edit_or_new_like(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;
    let return_type = nested_ref_erased(&interface, &n.base, self_ref(property));
    let value = current_value(property);

    Ok(vec![Method::new(
        format!("editOrNew{}Like", n.cap),
        TypeRef::Class(return_type),
    )
    .with_arguments(vec![property
        .with_name("item")
        .with_type_ref(TypeRef::Class(n.base.clone()))])
    .with_statements(vec![Statement::ret(Expr::This.call(
        format!("withNew{}{}Like", n.diff, n.cap),
        vec![Expr::ternary(value.clone().not_null(), value, Expr::var("item"))],
    ))])])
}

/// `editX()` for singular properties; the indexed/first/last/matching
/// quartet for list-shaped ones. The list variants fail fast at runtime
/// when the requested slot does not exist.
pub(super) fn edit_nested(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    let interface = nested_interface_def(ctx, property)?;
    let return_type = TypeRef::Class(nested_ref_erased(&interface, &n.base, self_ref(property)));

    if !(property.type_ref.is_list() || property.type_ref.is_array()) {
        return Ok(vec![Method::new(
            format!("edit{}{}", n.diff, n.cap),
            return_type,
        )
        .with_statements(vec![Statement::ret(Expr::This.call(
            format!("withNew{}{}Like", n.diff, n.cap),
            vec![current_value(property)],
        ))])]);
    }

    let field = Expr::field(property.field_name());
    let size = field.clone().call("size", vec![]);
    let reopen = |index: Expr| {
        Statement::ret(Expr::This.call(
            format!("setNew{}{}Like", n.diff, n.cap),
            vec![
                index.clone(),
                Expr::This.call(format!("build{}", n.cap), vec![index]),
            ],
        ))
    };
    let field_name = property.field_name();

    let at_index = Method::new(format!("edit{}{}", n.diff, n.cap), return_type.clone())
        .with_arguments(vec![index_property()])
        .with_statements(vec![
            Statement::if_then(
                size.clone().binary(BinOp::Le, Expr::var("index")),
                vec![Statement::Throw(format!(
                    "Can't edit {field_name}. Index exceeds size."
                ))],
            ),
            reopen(Expr::var("index")),
        ]);

    let first = Method::new(format!("editFirst{}{}", n.diff, n.cap), return_type.clone())
        .with_statements(vec![
            Statement::if_then(
                size.clone().binary(BinOp::Eq, Expr::int(0)),
                vec![Statement::Throw(format!(
                    "Can't edit first {field_name}. The list is empty."
                ))],
            ),
            reopen(Expr::int(0)),
        ]);

    let last = Method::new(format!("editLast{}{}", n.diff, n.cap), return_type.clone())
        .with_statements(vec![
            Statement::Let {
                name: "index".into(),
                ty: Some(TypeRef::int()),
                value: size.clone().binary(BinOp::Sub, Expr::int(1)),
            },
            Statement::if_then(
                Expr::var("index").binary(BinOp::Lt, Expr::int(0)),
                vec![Statement::Throw(format!(
                    "Can't edit last {field_name}. The list is empty."
                ))],
            ),
            reopen(Expr::var("index")),
        ]);

    let matching = Method::new(
        format!("editMatching{}{}", n.diff, n.cap),
        return_type,
    )
    .with_arguments(vec![predicate_property(ctx.buildable_ref(
        &crate::transform::unwrap_all(&property.type_ref),
    ))])
    .with_statements(vec![
        Statement::Let {
            name: "index".into(),
            ty: Some(TypeRef::int()),
            value: Expr::int(-1),
        },
        Statement::ForRange {
            var: "i".into(),
            upper: size,
            body: vec![Statement::if_then(
                Expr::var("predicate").call(
                    "test",
                    vec![field.clone().call("get", vec![Expr::var("i")])],
                ),
                vec![
                    Statement::assign(Expr::var("index"), Expr::var("i")),
                    Statement::Break,
                ],
            )],
        },
        Statement::if_then(
            Expr::var("index").binary(BinOp::Lt, Expr::int(0)),
            vec![Statement::Throw(format!(
                "Can't edit matching {field_name}. No match found."
            ))],
        ),
        reopen(Expr::var("index")),
    ]);

    Ok(vec![at_index, first, last, matching])
}

/// `and()` on the nested type: writes the built value back into the parent
/// builder and returns it. List/array slots are written positionally.
pub(super) fn and_method(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let built = Expr::var("builder").call("build", vec![]);
    // The receiver resolves to the enclosing builder when rendered inside
    // the nested impl.
    let write_back = if property.type_ref.is_list() || property.type_ref.is_array() {
        Expr::This.call(
            format!("setTo{}", property.capitalized_name()),
            vec![Expr::var("index"), built],
        )
    } else {
        Expr::This.call(format!("with{}", property.capitalized_name()), vec![built])
    };
    Ok(vec![Method::new("and", TypeRef::variable("N"))
        .with_statements(vec![Statement::ret(Expr::cast(
            TypeRef::variable("N"),
            write_back,
        ))])])
}

/// `endX()`: the named alias of `and()` closing a `withNewX()` chain.
pub(super) fn end_method(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let n = nesting(ctx, property)?;
    Ok(vec![Method::new(
        format!("end{}{}", n.diff, n.cap),
        TypeRef::variable("N"),
    )
    .with_statements(vec![Statement::ret(Expr::This.call("and", vec![]))])])
}
