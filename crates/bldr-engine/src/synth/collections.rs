//! The `addTo*`/`setTo*`/`removeFrom*` family over list/set/array
//! properties.
//!
//! Buildable items are stored wrapped in their builder and mirrored into
//! `_visitables`; abstract item types dispatch per concrete descendant via
//! `instanceof`, falling back to `builderOf(item)` for unknown subtypes.

use bldr_model::{ClassRef, Expr, Method, Property, Statement, TypeParamDef, TypeRef};

use crate::context::BuilderContext;
use crate::descendants::buildable_descendants;
use crate::error::{EngineError, Result};
use crate::transform::{
    combine, fully_qualified_name_diff, visitable_builder_ref, TypeTransform,
};

use super::{
    builder_import, index_property, lazy_init_guard, require_class, ret_self, self_ref,
    visitables,
};

struct Family {
    item: TypeRef,
    field: String,
    cap: String,
    /// Name-diff prefix for the `addAllTo`/`removeAllFrom` variants.
    diff: String,
    type_parameters: Vec<TypeParamDef>,
}

fn family(ctx: &BuilderContext, property: &Property) -> Result<Family> {
    let ty = &property.type_ref;
    if !ty.is_collection() && !ty.is_array() {
        return Err(EngineError::invalid_model(
            "a collection or array property",
            ty,
        ));
    }
    let item = combine(
        &[
            TypeTransform::UnwrapCollection,
            TypeTransform::UnwrapArray,
            TypeTransform::Boxed,
        ],
        ty,
    );
    let origin = property
        .extras
        .origin
        .as_deref()
        .and_then(|fq| ctx.repository().get_definition(fq));
    let diff = item
        .as_class_ref()
        .map(|cr| fully_qualified_name_diff(cr, origin.as_deref()))
        .unwrap_or_default();
    let type_parameters = item
        .as_class_ref()
        .and_then(|cr| ctx.repository().get_definition(&cr.name))
        .map(|def| def.parameters.clone())
        .unwrap_or_default();
    Ok(Family {
        item,
        field: property.field_name().to_string(),
        cap: property.capitalized_name(),
        diff,
        type_parameters,
    })
}

fn items_arg(property: &Property, item: &TypeRef) -> Property {
    property.with_name("items").with_type_ref(item.with_dimensions(1))
}

fn collection_arg(property: &Property, item: &TypeRef) -> Property {
    property.with_name("items").with_type_ref(TypeRef::generic(
        bldr_model::JAVA_COLLECTION,
        vec![item.clone()],
    ))
}

fn item_arg(property: &Property, item: &TypeRef) -> Property {
    property.with_name("item").with_type_ref(item.clone())
}

/// `index >= 0 ? index : <target>.size()`
fn clamped_index(target: Expr) -> Expr {
    Expr::ternary(
        Expr::var("index").binary(bldr_model::BinOp::Ge, Expr::int(0)),
        Expr::var("index"),
        target.call("size", vec![]),
    )
}

/// `if (index < 0 || index >= <target>.size()) { target.add(v) } else
/// { target.set(index, v) }`
fn add_or_set(target: Expr, value: Expr) -> Statement {
    Statement::if_else(
        Expr::var("index")
            .binary(bldr_model::BinOp::Lt, Expr::int(0))
            .or(Expr::var("index")
                .binary(bldr_model::BinOp::Ge, target.clone().call("size", vec![]))),
        vec![Statement::Expr(target.clone().call("add", vec![value.clone()]))],
        vec![Statement::Expr(
            target.call("set", vec![Expr::var("index"), value]),
        )],
    )
}

pub(super) fn add_to_collection(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let f = family(ctx, property)?;
    let guard = lazy_init_guard(property)?;
    let descendants = buildable_descendants(ctx, property);
    let return_type = self_ref(property);
    let new_method = |name: String| Method::new(name, return_type.clone());

    let mut methods = Vec::new();

    if !descendants.is_empty() {
        require_class(&f.item)?;
        let imports: Vec<ClassRef> = descendants
            .iter()
            .filter_map(|d| {
                crate::transform::unwrap_all(&d.type_ref)
                    .as_class_ref()
                    .cloned()
            })
            .flat_map(|cr| [builder_import(&cr), cr])
            .collect();

        // addToX(index, item): dispatch to the per-descendant indexed adds.
        methods.push(
            new_method(format!("addTo{}", f.cap))
                .with_type_parameters(f.type_parameters.clone())
                .with_arguments(vec![index_property(), item_arg(property, &f.item)])
                .with_statements(vec![
                    dispatch(&descendants, "addTo", true, None)?,
                    ret_self(property),
                ])
                .with_also_import(imports.clone()),
        );
        // setToX(index, item)
        methods.push(
            new_method(format!("setTo{}", f.cap))
                .with_type_parameters(f.type_parameters.clone())
                .with_arguments(vec![index_property(), item_arg(property, &f.item)])
                .with_statements(vec![
                    dispatch(&descendants, "setTo", true, None)?,
                    ret_self(property),
                ])
                .with_also_import(imports.clone()),
        );
        // addToX(items...) and addAllToX(Collection): dispatch per item,
        // wrapping unknown subtypes through builderOf.
        let fallback = unknown_subtype_add(&f);
        let per_item = vec![
            dispatch(&descendants, "addTo", false, Some(fallback))?,
        ];
        for arg in [
            items_arg(property, &f.item),
            collection_arg(property, &f.item),
        ] {
            let vararg = arg.type_ref.is_array();
            let name = if vararg {
                format!("addTo{}", f.cap)
            } else {
                format!("addAllTo{}{}", f.diff, f.cap)
            };
            let mut m = new_method(name)
                .with_type_parameters(f.type_parameters.clone())
                .with_arguments(vec![arg])
                .with_statements(vec![
                    guard.clone(),
                    Statement::ForEach {
                        var: "item".into(),
                        item_type: Some(f.item.clone()),
                        iterable: Expr::var("items"),
                        body: per_item.clone(),
                    },
                    ret_self(property),
                ])
                .with_also_import(imports.clone());
            if vararg {
                m = m.vararg_preferred();
            }
            methods.push(m);
        }
        // Direct builder-typed adds let generated descendant methods (and
        // callers holding a builder) bypass dispatch.
        let builder_ty = TypeRef::Class(visitable_builder_ref(&f.item));
        let builder_arg = property.with_name("builder").with_type_ref(builder_ty);
        methods.push(
            new_method(format!("addTo{}", f.cap))
                .with_arguments(vec![builder_arg.clone()])
                .with_statements(vec![
                    guard.clone(),
                    Statement::Expr(visitables().call("add", vec![Expr::var("builder")])),
                    Statement::Expr(Expr::field(&f.field).call("add", vec![Expr::var("builder")])),
                    ret_self(property),
                ]),
        );
        methods.push(
            new_method(format!("addTo{}", f.cap))
                .with_arguments(vec![index_property(), builder_arg])
                .with_statements(vec![
                    guard,
                    Statement::Expr(
                        visitables()
                            .call("add", vec![clamped_index(visitables()), Expr::var("builder")]),
                    ),
                    Statement::Expr(Expr::field(&f.field).call(
                        "add",
                        vec![clamped_index(Expr::field(&f.field)), Expr::var("builder")],
                    )),
                    ret_self(property),
                ]),
        );
        return Ok(methods);
    }

    if ctx.is_buildable(&f.item) && !ctx.is_abstract(&f.item) {
        let class_ref = require_class(&f.item)?;
        let builder_name = ctx.builder_name(class_ref);
        let imports = vec![builder_import(class_ref)];
        let let_builder = Statement::Let {
            name: "builder".into(),
            ty: Some(TypeRef::class(format!("{}Builder", class_ref.name))),
            value: Expr::new_instance(builder_name.clone(), vec![Expr::var("item")]),
        };

        methods.push(
            new_method(format!("addTo{}", f.cap))
                .with_type_parameters(f.type_parameters.clone())
                .with_arguments(vec![index_property(), item_arg(property, &f.item)])
                .with_statements(vec![
                    guard.clone(),
                    let_builder.clone(),
                    Statement::Expr(
                        visitables()
                            .call("add", vec![clamped_index(visitables()), Expr::var("builder")]),
                    ),
                    Statement::Expr(Expr::field(&f.field).call(
                        "add",
                        vec![clamped_index(Expr::field(&f.field)), Expr::var("builder")],
                    )),
                    ret_self(property),
                ])
                .with_also_import(imports.clone()),
        );
        methods.push(
            new_method(format!("setTo{}", f.cap))
                .with_type_parameters(f.type_parameters.clone())
                .with_arguments(vec![index_property(), item_arg(property, &f.item)])
                .with_statements(vec![
                    guard.clone(),
                    let_builder.clone(),
                    add_or_set(visitables(), Expr::var("builder")),
                    add_or_set(Expr::field(&f.field), Expr::var("builder")),
                    ret_self(property),
                ])
                .with_also_import(imports.clone()),
        );
        let per_item = vec![
            let_builder,
            Statement::Expr(visitables().call("add", vec![Expr::var("builder")])),
            Statement::Expr(Expr::field(&f.field).call("add", vec![Expr::var("builder")])),
        ];
        methods.extend(bulk_adds(property, &f, &guard, per_item, imports));
        return Ok(methods);
    }

    // Plain values: the backing list stores them directly.
    methods.push(
        new_method(format!("addTo{}", f.cap))
            .with_arguments(vec![index_property(), item_arg(property, &f.item)])
            .with_statements(vec![
                guard.clone(),
                Statement::Expr(
                    Expr::field(&f.field).call("add", vec![Expr::var("index"), Expr::var("item")]),
                ),
                ret_self(property),
            ]),
    );
    methods.push(
        new_method(format!("setTo{}", f.cap))
            .with_arguments(vec![index_property(), item_arg(property, &f.item)])
            .with_statements(vec![
                guard.clone(),
                Statement::Expr(
                    Expr::field(&f.field).call("set", vec![Expr::var("index"), Expr::var("item")]),
                ),
                ret_self(property),
            ]),
    );
    let per_item = vec![Statement::Expr(
        Expr::field(&f.field).call("add", vec![Expr::var("item")]),
    )];
    methods.extend(bulk_adds(property, &f, &guard, per_item, Vec::new()));
    Ok(methods)
}

/// The vararg `addToX(items...)` and `addAllToX(Collection)` pair around a
/// shared per-item body.
fn bulk_adds(
    property: &Property,
    f: &Family,
    guard: &Statement,
    per_item: Vec<Statement>,
    imports: Vec<ClassRef>,
) -> Vec<Method> {
    let return_type = self_ref(property);
    [
        (items_arg(property, &f.item), format!("addTo{}", f.cap), true),
        (
            collection_arg(property, &f.item),
            format!("addAllTo{}{}", f.diff, f.cap),
            false,
        ),
    ]
    .into_iter()
    .map(|(arg, name, vararg)| {
        let mut m = Method::new(name, return_type.clone())
            .with_type_parameters(f.type_parameters.clone())
            .with_arguments(vec![arg])
            .with_statements(vec![
                guard.clone(),
                Statement::ForEach {
                    var: "item".into(),
                    item_type: Some(f.item.clone()),
                    iterable: Expr::var("items"),
                    body: per_item.clone(),
                },
                ret_self(property),
            ])
            .with_also_import(imports.clone());
        if vararg {
            m = m.vararg_preferred();
        }
        m
    })
    .collect()
}

/// `instanceof` chain over the descendants, first structural match wins.
/// `use_index` routes through the indexed per-descendant methods;
/// `fallback` (when given) handles items matching no known descendant.
fn dispatch(
    descendants: &[Property],
    prefix: &str,
    use_index: bool,
    fallback: Option<Vec<Statement>>,
) -> Result<Statement> {
    let mut tail = fallback.unwrap_or_default();
    for descendant in descendants.iter().rev() {
        let concrete = crate::transform::unwrap_all(&descendant.type_ref);
        let class_ref = require_class(&concrete)?;
        let mut args = Vec::new();
        if use_index {
            args.push(Expr::var("index"));
        }
        args.push(Expr::cast(concrete.clone(), Expr::var("item")));
        let branch = Statement::if_else(
            Expr::var("item").instance_of(class_ref.simple_name()),
            vec![Statement::Expr(Expr::This.call(
                format!("{}{}", prefix, descendant.capitalized_name()),
                args,
            ))],
            tail,
        );
        tail = vec![branch];
    }
    Ok(tail
        .into_iter()
        .next()
        .unwrap_or(Statement::Return(None)))
}

/// Fallback body wrapping an unknown subtype via the builder's
/// `builderOf(item)` hook.
fn unknown_subtype_add(f: &Family) -> Vec<Statement> {
    vec![
        Statement::Let {
            name: "builder".into(),
            ty: Some(TypeRef::Class(visitable_builder_ref(&f.item))),
            value: Expr::This.call("builderOf", vec![Expr::var("item")]),
        },
        Statement::Expr(visitables().call("add", vec![Expr::var("builder")])),
        Statement::Expr(Expr::field(&f.field).call("add", vec![Expr::var("builder")])),
    ]
}

pub(super) fn remove_from_collection(
    ctx: &BuilderContext,
    property: &Property,
) -> Result<Vec<Method>> {
    let f = family(ctx, property)?;
    let descendants = buildable_descendants(ctx, property);
    let return_type = self_ref(property);
    let new_method = |name: String| Method::new(name, return_type.clone());

    let per_item: Vec<Statement> = if !descendants.is_empty() {
        vec![dispatch(
            &descendants,
            "removeFrom",
            false,
            Some(vec![
                Statement::Let {
                    name: "builder".into(),
                    ty: Some(TypeRef::Class(visitable_builder_ref(&f.item))),
                    value: Expr::This.call("builderOf", vec![Expr::var("item")]),
                },
                Statement::Expr(visitables().call("remove", vec![Expr::var("builder")])),
                Statement::if_then(
                    Expr::field(&f.field).not_null(),
                    vec![Statement::Expr(
                        Expr::field(&f.field).call("remove", vec![Expr::var("builder")]),
                    )],
                ),
            ]),
        )?]
    } else if ctx.is_buildable(&f.item) && !ctx.is_abstract(&f.item) {
        let class_ref = require_class(&f.item)?;
        vec![
            Statement::Let {
                name: "builder".into(),
                ty: Some(TypeRef::class(format!("{}Builder", class_ref.name))),
                value: Expr::new_instance(ctx.builder_name(class_ref), vec![Expr::var("item")]),
            },
            Statement::Expr(visitables().call("remove", vec![Expr::var("builder")])),
            Statement::if_then(
                Expr::field(&f.field).not_null(),
                vec![Statement::Expr(
                    Expr::field(&f.field).call("remove", vec![Expr::var("builder")]),
                )],
            ),
        ]
    } else {
        vec![Statement::if_then(
            Expr::field(&f.field).not_null(),
            vec![Statement::Expr(
                Expr::field(&f.field).call("remove", vec![Expr::var("item")]),
            )],
        )]
    };

    let imports: Vec<ClassRef> = if descendants.is_empty() && ctx.is_buildable(&f.item) {
        f.item.as_class_ref().map(builder_import).into_iter().collect()
    } else {
        descendants
            .iter()
            .filter_map(|d| {
                crate::transform::unwrap_all(&d.type_ref)
                    .as_class_ref()
                    .cloned()
            })
            .flat_map(|cr| [builder_import(&cr), cr])
            .collect()
    };

    let mut methods: Vec<Method> = [
        (items_arg(property, &f.item), format!("removeFrom{}", f.cap), true),
        (
            collection_arg(property, &f.item),
            format!("removeAllFrom{}{}", f.diff, f.cap),
            false,
        ),
    ]
    .into_iter()
    .map(|(arg, name, vararg)| {
        let mut m = new_method(name)
            .with_arguments(vec![arg])
            .with_statements(vec![
                Statement::ForEach {
                    var: "item".into(),
                    item_type: Some(f.item.clone()),
                    iterable: Expr::var("items"),
                    body: per_item.clone(),
                },
                ret_self(property),
            ])
            .with_also_import(imports.clone());
        if vararg {
            m = m.vararg_preferred();
        }
        m
    })
    .collect();

    // Builder-typed removal, the counterpart of the builder-typed adds.
    if !descendants.is_empty() || (ctx.is_buildable(&f.item) && !ctx.is_abstract(&f.item)) {
        let builder_ty = if descendants.is_empty() {
            TypeRef::class(format!("{}Builder", require_class(&f.item)?.name))
        } else {
            TypeRef::Class(visitable_builder_ref(&f.item))
        };
        methods.push(
            new_method(format!("removeFrom{}", f.cap))
                .with_arguments(vec![property.with_name("builder").with_type_ref(builder_ty)])
                .with_statements(vec![
                    Statement::if_then(
                        Expr::field(&f.field).not_null(),
                        vec![
                            Statement::Expr(
                                visitables().call("remove", vec![Expr::var("builder")]),
                            ),
                            Statement::Expr(
                                Expr::field(&f.field).call("remove", vec![Expr::var("builder")]),
                            ),
                        ],
                    ),
                    ret_self(property),
                ]),
        );
    }

    // Predicate-driven removal over the backing list.
    let scan_item = ctx.buildable_ref(&f.item);
    methods.push(
        new_method(format!("removeMatchingFrom{}", f.cap))
            .with_arguments(vec![super::predicate_property(scan_item.clone())])
            .with_statements(vec![
                Statement::if_then(
                    Expr::field(&f.field).is_null(),
                    vec![Statement::ret(Expr::cast(self_ref(property), Expr::This))],
                ),
                Statement::ForEach {
                    var: "item".into(),
                    item_type: Some(scan_item),
                    iterable: Expr::new_instance(
                        "ArrayList",
                        vec![Expr::field(&f.field)],
                    ),
                    body: vec![Statement::if_then(
                        Expr::var("predicate").call("test", vec![Expr::var("item")]),
                        vec![
                            Statement::Expr(visitables().call("remove", vec![Expr::var("item")])),
                            Statement::Expr(
                                Expr::field(&f.field).call("remove", vec![Expr::var("item")]),
                            ),
                        ],
                    )],
                },
                ret_self(property),
            ]),
    );

    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{
        DefinitionRepository, InitFn, PropertyExtras, TypeDef, TypeKind, JAVA_LIST,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn ctx() -> BuilderContext {
        let repo = Arc::new(DefinitionRepository::new());
        let mut animal = TypeDef::new(TypeKind::Class, "zoo.Animal");
        animal.buildable = true;
        animal.is_abstract = true;
        repo.register(animal);
        for name in ["zoo.Cat", "zoo.Dog"] {
            let mut def = TypeDef::new(TypeKind::Class, name);
            def.buildable = true;
            def.supertypes.push(ClassRef::new("zoo.Animal"));
            repo.register(def);
        }
        BuilderContext::new(repo)
    }

    fn list_of(item: &str, name: &str) -> Property {
        let mut p = Property::new(
            name,
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class(item)]),
        );
        p.extras = PropertyExtras {
            lazy_init: Some(Expr::new_instance("ArrayList", vec![])),
            init_function: Some(InitFn::Constructor("ArrayList".into())),
            ..PropertyExtras::default()
        };
        p
    }

    #[test]
    fn plain_items_go_straight_into_the_field() {
        let property = list_of("java.lang.String", "names");
        let methods = add_to_collection(&ctx(), &property).unwrap();
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["addToNames", "setToNames", "addToNames", "addAllToNames"]
        );
        for m in &methods {
            let rendered: String = m.statements.iter().map(|s| s.to_string()).collect();
            assert!(!rendered.contains("_visitables"));
            assert!(rendered.contains("if (this.names == null)"));
        }
    }

    #[test]
    fn buildable_items_are_wrapped_and_tracked() {
        let property = list_of("zoo.Dog", "dogs");
        let methods = add_to_collection(&ctx(), &property).unwrap();
        let vararg = methods.iter().find(|m| m.vararg).unwrap();
        let rendered: String = vararg.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("new DogBuilder(item)"));
        assert!(rendered.contains("_visitables.add(builder)"));
        assert!(rendered.contains("this.dogs.add(builder)"));
    }

    #[test]
    fn removal_mirrors_the_tracking_list() {
        let property = list_of("zoo.Dog", "dogs");
        let methods = remove_from_collection(&ctx(), &property).unwrap();
        let vararg = methods.iter().find(|m| m.vararg).unwrap();
        let rendered: String = vararg.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("_visitables.remove(builder)"));
        assert!(rendered.contains("this.dogs.remove(builder)"));
    }

    #[test]
    fn abstract_items_dispatch_with_builder_of_fallback() {
        let property = list_of("zoo.Animal", "pets");
        let methods = add_to_collection(&ctx(), &property).unwrap();
        let vararg = methods.iter().find(|m| m.vararg).unwrap();
        let rendered: String = vararg.statements.iter().map(|s| s.to_string()).collect();
        let cat = rendered.find("item instanceof Cat").unwrap();
        let dog = rendered.find("item instanceof Dog").unwrap();
        assert!(cat < dog);
        assert!(rendered.contains("addToCatPets((Cat) item)"));
        assert!(rendered.contains("this.builderOf(item)"));
    }

    #[test]
    fn descendant_indexed_variants_route_by_name() {
        let property = list_of("zoo.Animal", "pets");
        let methods = add_to_collection(&ctx(), &property).unwrap();
        let indexed = &methods[0];
        assert_eq!(indexed.name, "addToPets");
        assert_eq!(indexed.arguments[0].name, "index");
        let rendered: String = indexed.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("addToDogPets(index, (Dog) item)"));
    }

    #[test]
    fn non_collection_property_is_a_model_error() {
        let property = Property::new("name", TypeRef::class("java.lang.String"));
        assert!(add_to_collection(&ctx(), &property).is_err());
    }
}
