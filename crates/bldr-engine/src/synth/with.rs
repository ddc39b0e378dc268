//! The `with*`/`set*` family: whole-value replacement of a property.

use bldr_model::{Expr, Method, Property, Statement, TypeRef};

use crate::context::BuilderContext;
use crate::descendants::buildable_descendants;
use crate::error::Result;
use crate::transform::{combine, unwrap_all, TypeTransform};

use super::{
    builder_import, init_expr, init_function, lazy_init, require_class, ret_self, self_ref,
    visitables,
};

/// `withX(x)`: replaces the backing value, keeping `_visitables` in step.
pub(super) fn with(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let mut also_import = Vec::new();
    let statements = with_statements(ctx, property, &mut also_import)?;
    Ok(vec![Method::new(
        format!("with{}", property.capitalized_name()),
        self_ref(property),
    )
    .with_arguments(vec![property.clone()])
    .with_statements(statements)
    .with_also_import(also_import)
    .vararg_preferred()])
}

fn with_statements(
    ctx: &BuilderContext,
    property: &Property,
    also_import: &mut Vec<bldr_model::ClassRef>,
) -> Result<Vec<Statement>> {
    let ty = &property.type_ref;
    let field = property.field_name().to_string();
    let arg = Expr::var(&property.name);
    let unwrapped = unwrap_all(ty);

    let mut statements = Vec::new();

    // A buildable singular field holds a builder that is also tracked in
    // `_visitables`; replacing the field must drop the old entry first.
    if ctx.is_buildable(&unwrapped) && !ty.is_collection() && !ty.is_map() {
        statements.push(Statement::Expr(
            visitables().call("remove", vec![Expr::field(&field)]),
        ));
    }

    if ty.is_map() {
        let absent = lazy_init(property)?;
        let rewrap = init_function(property)?;
        statements.push(Statement::if_else(
            arg.clone().is_null(),
            vec![Statement::assign(Expr::field(&field), absent)],
            vec![Statement::assign(
                Expr::field(&field),
                rewrap.apply(vec![arg]),
            )],
        ));
        statements.push(ret_self(property));
        return Ok(statements);
    }

    if ty.is_list() || ty.is_set() {
        // Item-wise delegation to addTo* keeps buildable wrapping and
        // descendant dispatch in exactly one place.
        statements.push(Statement::if_then(
            Expr::field(&field).not_null(),
            vec![Statement::Expr(
                visitables().call("removeAll", vec![Expr::field(&field)]),
            )],
        ));
        let rewrap = init_function(property)?;
        let absent = lazy_init(property)?;
        statements.push(Statement::if_else(
            arg.clone().not_null(),
            vec![
                Statement::assign(Expr::field(&field), rewrap.apply(vec![])),
                Statement::ForEach {
                    var: "item".into(),
                    item_type: Some(unwrapped.clone()),
                    iterable: arg,
                    body: vec![Statement::Expr(Expr::This.call(
                        format!("addTo{}", property.capitalized_name()),
                        vec![Expr::var("item")],
                    ))],
                },
            ],
            vec![Statement::assign(Expr::field(&field), absent)],
        ));
        statements.push(ret_self(property));
        return Ok(statements);
    }

    if ctx.is_buildable(&unwrapped) && !ctx.is_abstract(&unwrapped) {
        let class_ref = require_class(&unwrapped)?;
        also_import.push(builder_import(class_ref));
        statements.push(Statement::if_then(
            arg.clone().not_null(),
            vec![
                Statement::assign(
                    Expr::field(&field),
                    Expr::new_instance(ctx.builder_name(class_ref), vec![arg]),
                ),
                Statement::Expr(visitables().call("add", vec![Expr::field(&field)])),
            ],
        ));
        statements.push(ret_self(property));
        return Ok(statements);
    }

    let descendants = buildable_descendants(ctx, property);
    if !descendants.is_empty() {
        // Innermost else: silent fallthrough, or a failure in strict mode.
        let mut tail: Vec<Statement> = if ctx.strict() {
            vec![Statement::Throw(format!(
                "No descendant of {} matched the supplied value.",
                unwrapped
            ))]
        } else {
            Vec::new()
        };
        for descendant in descendants.iter().rev() {
            let concrete = unwrap_all(&descendant.type_ref);
            let class_ref = require_class(&concrete)?;
            also_import.push(class_ref.clone());
            also_import.push(builder_import(class_ref));
            let branch = Statement::if_else(
                arg.clone().instance_of(class_ref.simple_name()),
                vec![
                    Statement::assign(
                        Expr::field(&field),
                        Expr::new_instance(
                            ctx.builder_name(class_ref),
                            vec![Expr::cast(concrete.clone(), arg.clone())],
                        ),
                    ),
                    Statement::Expr(visitables().call("add", vec![Expr::field(&field)])),
                ],
                tail,
            );
            tail = vec![branch];
        }
        statements.extend(tail);
        statements.push(ret_self(property));
        return Ok(statements);
    }

    statements.push(Statement::assign(Expr::field(&field), arg));
    statements.push(ret_self(property));
    Ok(statements)
}

/// `withX(T... x)`: array/vararg replacement delegating item-wise to
/// `addToX`.
pub(super) fn with_array(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let item = combine(
        &[TypeTransform::UnwrapCollection, TypeTransform::UnwrapArray],
        &property.type_ref,
    );
    let array_arg = property.with_type_ref(item.with_dimensions(1));
    let field = property.field_name().to_string();
    let arg = Expr::var(&property.name);

    let statements = vec![
        Statement::if_then(
            Expr::field(&field).not_null(),
            vec![Statement::Expr(Expr::field(&field).call("clear", vec![]))],
        ),
        Statement::if_then(
            arg.clone().not_null(),
            vec![Statement::ForEach {
                var: "item".into(),
                item_type: Some(item),
                iterable: arg,
                body: vec![Statement::Expr(Expr::This.call(
                    format!("addTo{}", property.capitalized_name()),
                    vec![Expr::var("item")],
                ))],
            }],
        ),
        ret_self(property),
    ];

    Ok(vec![Method::new(
        format!("with{}", property.capitalized_name()),
        self_ref(property),
    )
    .with_arguments(vec![array_arg])
    .vararg_preferred()
    .with_statements(statements)])
}

/// `withX(Optional<T>)` plus the bare-value convenience overload
/// `withX(T)`.
pub(super) fn with_optional(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let unwrapped = TypeTransform::UnwrapOptional.apply(&property.type_ref);
    let absent = init_expr(property)?;
    let rewrap = init_function(property)?;
    let field = property.field_name().to_string();
    let arg = Expr::var(&property.name);
    let buildable = ctx.is_buildable(&unwrapped) && !ctx.is_abstract(&unwrapped);

    let mut also_import = Vec::new();
    let wrap_present: Vec<Statement> = if buildable {
        let class_ref = require_class(&unwrapped)?;
        let builder_name = ctx.builder_name(class_ref);
        also_import.push(builder_import(class_ref));
        vec![
            Statement::Let {
                name: "b".into(),
                ty: Some(TypeRef::class(format!("{}Builder", class_ref.name))),
                value: Expr::new_instance(
                    builder_name,
                    vec![arg.clone().call("get", vec![])],
                ),
            },
            Statement::Expr(visitables().call("add", vec![Expr::var("b")])),
            Statement::assign(Expr::field(&field), rewrap.apply(vec![Expr::var("b")])),
        ]
    } else {
        vec![Statement::assign(Expr::field(&field), arg.clone())]
    };

    let wrapped = Method::new(
        format!("with{}", property.capitalized_name()),
        self_ref(property),
    )
    .with_arguments(vec![property.clone()])
    .with_statements(vec![
        Statement::if_else(
            arg.clone()
                .is_null()
                .or(arg.clone().call("isPresent", vec![]).not()),
            vec![Statement::assign(Expr::field(&field), absent.clone())],
            wrap_present,
        ),
        ret_self(property),
    ])
    .with_also_import(also_import.clone());

    let bare_present: Vec<Statement> = if buildable {
        let class_ref = require_class(&unwrapped)?;
        vec![
            Statement::Let {
                name: "b".into(),
                ty: Some(TypeRef::class(format!("{}Builder", class_ref.name))),
                value: Expr::new_instance(ctx.builder_name(class_ref), vec![arg.clone()]),
            },
            Statement::Expr(visitables().call("add", vec![Expr::var("b")])),
            Statement::assign(Expr::field(&field), rewrap.apply(vec![Expr::var("b")])),
        ]
    } else {
        vec![Statement::assign(
            Expr::field(&field),
            rewrap.apply(vec![arg.clone()]),
        )]
    };

    let bare = Method::new(
        format!("with{}", property.capitalized_name()),
        self_ref(property),
    )
    .with_arguments(vec![property.with_type_ref(unwrapped)])
    .with_statements(vec![
        Statement::if_else(
            arg.is_null(),
            vec![Statement::assign(Expr::field(&field), absent)],
            bare_present,
        ),
        ret_self(property),
    ])
    .with_also_import(also_import);

    Ok(vec![wrapped, bare])
}

/// Plain Java-bean setter; emitted only when the caller asks for bean
/// compatibility on top of the fluent surface.
pub(super) fn setter(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    Ok(vec![Method::new(
        format!("set{}", property.capitalized_name()),
        TypeRef::Void,
    )
    .with_arguments(vec![property.clone()])
    .with_statements(vec![Statement::assign(
        Expr::field(property.field_name()),
        Expr::var(&property.name),
    )])])
}
