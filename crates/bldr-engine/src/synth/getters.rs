//! The read surface: `has*`, `get*` and its non-deprecated `build*` twins,
//! plus the indexed/first/last/matching accessors for list-shaped
//! properties.

use bldr_core::singularize;
use bldr_model::{Expr, Method, Property, Statement, TypeRef};

use crate::context::BuilderContext;
use crate::descendants::buildable_descendants;
use crate::error::Result;
use crate::transform::{combine, unwrap_all, TypeTransform};

use super::{index_property, predicate_property, require_class};

const DEPRECATION_NOTE: &str =
    "This method has been deprecated, please use method build{} instead.";

fn getter_prefix(ty: &TypeRef) -> &'static str {
    if ty.is_primitive_boolean() {
        "is"
    } else {
        "get"
    }
}

/// `hasX()`: presence check matching the property's shape.
pub(super) fn has(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let ty = &property.type_ref;
    let field = Expr::field(property.field_name());
    let value = if ty.is_primitive() {
        Expr::bool(true)
    } else if ty.is_list() || ty.is_set() {
        field
            .clone()
            .not_null()
            .and(field.call("isEmpty", vec![]).not())
    } else if ty.is_any_optional() {
        field
            .clone()
            .not_null()
            .and(field.call("isPresent", vec![]))
    } else {
        field.not_null()
    };

    Ok(vec![Method::new(
        format!("has{}", property.capitalized_name()),
        TypeRef::boolean(),
    )
    .with_statements(vec![Statement::ret(value)])])
}

/// `hasMatchingX(Predicate<XBuilder>)` over a collection of tracked
/// builders.
pub(super) fn has_matching(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let item = ctx.buildable_ref(&unwrap_all(&property.type_ref));
    Ok(vec![matching_scan(
        format!("hasMatching{}", property.capitalized_name()),
        property,
        item,
        TypeRef::boolean(),
        Statement::ret(Expr::bool(true)),
        Statement::ret(Expr::bool(false)),
    )])
}

/// Shared `for (item : field) { if (predicate.test(item)) ... }` skeleton.
fn matching_scan(
    name: String,
    property: &Property,
    item: TypeRef,
    return_type: TypeRef,
    on_match: Statement,
    after: Statement,
) -> Method {
    Method::new(name, return_type)
        .with_arguments(vec![predicate_property(item.clone())])
        .with_statements(vec![
            Statement::ForEach {
                var: "item".into(),
                item_type: Some(item),
                iterable: Expr::field(property.field_name()),
                body: vec![Statement::if_then(
                    Expr::var("predicate").call("test", vec![Expr::var("item")]),
                    vec![on_match],
                )],
            },
            after,
        ])
}

/// `getX()` and, for buildable content, the `buildX()` family.
///
/// The getter of a buildable property materializes built values out of the
/// stored builders and is emitted deprecated in favor of its `build*` twin.
pub(super) fn getter(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let ty = &property.type_ref;
    let unwrapped = unwrap_all(ty);
    let field = Expr::field(property.field_name());
    let cap = property.capitalized_name();
    let buildable = ctx.is_buildable(&unwrapped);
    let descendants = !buildable_descendants(ctx, property).is_empty();
    let builds = buildable || descendants;
    let collection = ty.is_list() || ty.is_set();

    let value = if ty.is_map() || !builds {
        field.clone()
    } else if collection {
        Expr::This.call("build", vec![field.clone()])
    } else if ty.is_any_optional() {
        let rewrap = super::init_function(property)?;
        let absent = super::init_expr(property)?;
        Expr::cast(
            ty.clone(),
            Expr::ternary(
                field
                    .clone()
                    .not_null()
                    .and(field.clone().call("isPresent", vec![])),
                rewrap.apply(vec![field
                    .clone()
                    .call("get", vec![])
                    .call("build", vec![])]),
                absent,
            ),
        )
    } else {
        Expr::ternary(
            field.clone().not_null(),
            field.clone().call("build", vec![]),
            Expr::Null,
        )
    };

    let mut getter = Method::new(format!("{}{}", getter_prefix(ty), cap), ty.clone())
        .with_statements(vec![Statement::ret(value)]);

    let mut methods = Vec::new();
    if builds {
        getter = getter
            .deprecated()
            .with_comments(vec![DEPRECATION_NOTE.replace("{}", &cap)]);
        let mut build = getter.renamed(format!("build{cap}"));
        build.deprecated = false;
        build.comments.clear();
        methods.push(getter);
        methods.push(build);
        if ty.is_list() {
            methods.extend(indexed_builds(property, &unwrapped));
        }
        if collection {
            let builder_item = ctx.buildable_ref(&unwrapped);
            let sing = singularize(&cap);
            methods.push(matching_scan(
                format!("buildMatching{sing}"),
                property,
                builder_item.clone(),
                unwrapped.clone(),
                Statement::ret(Expr::var("item").call("build", vec![])),
                Statement::ret(Expr::Null),
            ));
            methods.push(matching_scan(
                format!("hasMatching{sing}"),
                property,
                builder_item,
                TypeRef::boolean(),
                Statement::ret(Expr::bool(true)),
                Statement::ret(Expr::bool(false)),
            ));
        }
    } else {
        methods.push(getter);
        if ty.is_list() {
            methods.extend(indexed_gets(property, &unwrapped));
        }
    }
    Ok(methods)
}

/// `buildX(index)`/`buildFirstX()`/`buildLastX()` over a list of builders.
fn indexed_builds(property: &Property, item: &TypeRef) -> Vec<Method> {
    let field = Expr::field(property.field_name());
    let sing = singularize(&property.capitalized_name());
    let build_at = |index: Expr| {
        Statement::ret(
            field
                .clone()
                .call("get", vec![index])
                .call("build", vec![]),
        )
    };
    vec![
        Method::new(format!("build{sing}"), item.clone())
            .with_arguments(vec![index_property()])
            .with_statements(vec![build_at(Expr::var("index"))]),
        Method::new(format!("buildFirst{sing}"), item.clone())
            .with_statements(vec![build_at(Expr::int(0))]),
        Method::new(format!("buildLast{sing}"), item.clone()).with_statements(vec![build_at(
            field
                .clone()
                .call("size", vec![])
                .binary(bldr_model::BinOp::Sub, Expr::int(1)),
        )]),
    ]
}

/// The non-buildable counterpart of [`indexed_builds`].
fn indexed_gets(property: &Property, item: &TypeRef) -> Vec<Method> {
    let field = Expr::field(property.field_name());
    let sing = singularize(&property.capitalized_name());
    let get_at = |index: Expr| Statement::ret(field.clone().call("get", vec![index]));
    vec![
        Method::new(format!("get{sing}"), item.clone())
            .with_arguments(vec![index_property()])
            .with_statements(vec![get_at(Expr::var("index"))]),
        Method::new(format!("getFirst{sing}"), item.clone())
            .with_statements(vec![get_at(Expr::int(0))]),
        Method::new(format!("getLast{sing}"), item.clone()).with_statements(vec![get_at(
            field
                .clone()
                .call("size", vec![])
                .binary(bldr_model::BinOp::Sub, Expr::int(1)),
        )]),
        matching_scan(
            format!("getMatching{sing}"),
            property,
            item.clone(),
            item.clone(),
            Statement::ret(Expr::var("item")),
            Statement::ret(Expr::Null),
        ),
        matching_scan(
            format!("hasMatching{sing}"),
            property,
            item.clone(),
            TypeRef::boolean(),
            Statement::ret(Expr::bool(true)),
            Statement::ret(Expr::bool(false)),
        ),
    ]
}

/// Array getter: copies the backing list into a fresh array, building each
/// element when the item type is buildable.
pub(super) fn getter_array(ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let ty = &property.type_ref;
    let item = combine(
        &[TypeTransform::UnwrapCollection, TypeTransform::UnwrapArray],
        ty,
    );
    let field = Expr::field(property.field_name());
    let cap = property.capitalized_name();
    let buildable = ctx.is_buildable(&item);

    let element = field.clone().call("get", vec![Expr::var("i")]);
    let element = if buildable {
        element.call("build", vec![])
    } else {
        element
    };

    let statements = vec![
        Statement::Let {
            name: "size".into(),
            ty: Some(TypeRef::int()),
            value: Expr::ternary(
                field.clone().not_null(),
                field.clone().call("size", vec![]),
                Expr::int(0),
            ),
        },
        Statement::Let {
            name: "result".into(),
            ty: Some(item.with_dimensions(1)),
            value: Expr::NewArray {
                item_type: item.clone(),
                len: Box::new(Expr::var("size")),
            },
        },
        Statement::if_then(
            field.clone().not_null(),
            vec![Statement::ForRange {
                var: "i".into(),
                upper: Expr::var("size"),
                body: vec![Statement::assign(
                    Expr::Index {
                        target: Box::new(Expr::var("result")),
                        index: Box::new(Expr::var("i")),
                    },
                    element,
                )],
            }],
        ),
        Statement::ret(Expr::var("result")),
    ];

    let mut getter = Method::new(format!("{}{}", getter_prefix(ty), cap), ty.clone())
        .with_statements(statements);

    let mut methods = Vec::new();
    if buildable {
        require_class(&item)?;
        getter = getter
            .deprecated()
            .with_comments(vec![DEPRECATION_NOTE.replace("{}", &cap)]);
        let mut build = getter.renamed(format!("build{cap}"));
        build.deprecated = false;
        build.comments.clear();
        methods.push(getter);
        methods.push(build);
        methods.extend(indexed_builds(property, &item));
        let builder_item = ctx.buildable_ref(&item);
        let sing = singularize(&cap);
        methods.push(matching_scan(
            format!("buildMatching{sing}"),
            property,
            builder_item.clone(),
            item,
            Statement::ret(Expr::var("item").call("build", vec![])),
            Statement::ret(Expr::Null),
        ));
        methods.push(matching_scan(
            format!("hasMatching{sing}"),
            property,
            builder_item,
            TypeRef::boolean(),
            Statement::ret(Expr::bool(true)),
            Statement::ret(Expr::bool(false)),
        ));
    } else {
        methods.push(getter);
    }
    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{DefinitionRepository, TypeDef, TypeKind, JAVA_LIST, JAVA_OPTIONAL};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn ctx() -> BuilderContext {
        let repo = Arc::new(DefinitionRepository::new());
        let mut dog = TypeDef::new(TypeKind::Class, "zoo.Dog");
        dog.buildable = true;
        repo.register(dog);
        BuilderContext::new(repo)
    }

    #[test]
    fn has_varies_with_shape() {
        let primitive = Property::new("age", TypeRef::int());
        let m = has(&ctx(), &primitive).unwrap().remove(0);
        assert_eq!(m.statements, vec![Statement::ret(Expr::bool(true))]);

        let list = Property::new(
            "dogs",
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class("zoo.Dog")]),
        );
        let m = has(&ctx(), &list).unwrap().remove(0);
        assert!(m.statements[0].to_string().contains("isEmpty"));

        let optional = Property::new(
            "nickname",
            TypeRef::generic(JAVA_OPTIONAL, vec![TypeRef::class("java.lang.String")]),
        );
        let m = has(&ctx(), &optional).unwrap().remove(0);
        assert!(m.statements[0].to_string().contains("isPresent"));
    }

    #[test]
    fn buildable_getter_is_deprecated_with_a_build_twin() {
        let property = Property::new("dog", TypeRef::class("zoo.Dog"));
        let methods = getter(&ctx(), &property).unwrap();
        assert_eq!(methods[0].name, "getDog");
        assert!(methods[0].deprecated);
        assert_eq!(methods[1].name, "buildDog");
        assert!(!methods[1].deprecated);
        assert_eq!(methods[0].statements, methods[1].statements);
        assert!(methods[1].statements[0].to_string().contains(".build()"));
    }

    #[test]
    fn buildable_list_getter_grows_the_indexed_family() {
        let property = Property::new(
            "dogs",
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class("zoo.Dog")]),
        );
        let names: Vec<String> = getter(&ctx(), &property)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "getDogs",
                "buildDogs",
                "buildDog",
                "buildFirstDog",
                "buildLastDog",
                "buildMatchingDog",
                "hasMatchingDog",
            ]
        );
    }

    #[test]
    fn plain_list_getter_keeps_the_get_family() {
        let property = Property::new(
            "names",
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class("java.lang.String")]),
        );
        let methods = getter(&ctx(), &property).unwrap();
        assert!(!methods[0].deprecated);
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "getNames",
                "getName",
                "getFirstName",
                "getLastName",
                "getMatchingName",
                "hasMatchingName",
            ]
        );
    }

    #[test]
    fn array_getter_copies_and_builds() {
        let property = Property::new("dogs", TypeRef::class("zoo.Dog").with_dimensions(1));
        let methods = getter_array(&ctx(), &property).unwrap();
        let rendered: String = methods[0].statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("new Dog[size]"));
        assert!(rendered.contains("this.dogs.get(i).build()"));
        assert_eq!(methods[1].name, "buildDogs");
    }
}
