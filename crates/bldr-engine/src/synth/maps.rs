//! The map family: `addToX(key, value)`, `addToX(Map)`, `removeFromX(key)`,
//! `removeFromX(Map)`.
//!
//! Map content is never builder-wrapped, so nothing here touches
//! `_visitables`; the only invariant is null-safety and treating removal
//! from an absent map as a no-op.

use bldr_model::{Expr, Method, Property, Statement, TypeRef};

use crate::context::BuilderContext;
use crate::error::{EngineError, Result};

use super::{init_function, ret_self, self_ref};

struct MapShape {
    key: TypeRef,
    value: TypeRef,
    field: String,
    cap: String,
}

fn map_shape(property: &Property) -> Result<MapShape> {
    let ty = &property.type_ref;
    let arguments = ty
        .as_class_ref()
        .filter(|_| ty.is_map())
        .map(|cr| cr.arguments.as_slice())
        .unwrap_or_default();
    match arguments {
        [key, value] => Ok(MapShape {
            key: key.clone(),
            value: value.clone(),
            field: property.field_name().to_string(),
            cap: property.capitalized_name(),
        }),
        _ => Err(EngineError::invalid_model(
            "a map property with key and value arguments",
            ty,
        )),
    }
}

pub(super) fn add_to_map(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let shape = map_shape(property)?;
    let rewrap = init_function(property)?;
    let key_arg = property.with_name("key").with_type_ref(shape.key.clone());
    let value_arg = property.with_name("value").with_type_ref(shape.value.clone());
    let both_present = Expr::var("key").not_null().and(Expr::var("value").not_null());

    Ok(vec![Method::new(
        format!("addTo{}", shape.cap),
        self_ref(property),
    )
    .with_arguments(vec![key_arg, value_arg])
    .with_statements(vec![
        Statement::if_then(
            Expr::field(&shape.field).is_null().and(both_present.clone()),
            vec![Statement::assign(
                Expr::field(&shape.field),
                rewrap.apply(vec![]),
            )],
        ),
        Statement::if_then(
            both_present,
            vec![Statement::Expr(Expr::field(&shape.field).call(
                "put",
                vec![Expr::var("key"), Expr::var("value")],
            ))],
        ),
        ret_self(property),
    ])])
}

pub(super) fn add_map_to_map(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let shape = map_shape(property)?;
    let rewrap = init_function(property)?;
    let map_arg = property.with_name("map");

    Ok(vec![Method::new(
        format!("addTo{}", shape.cap),
        self_ref(property),
    )
    .with_arguments(vec![map_arg])
    .with_statements(vec![
        Statement::if_then(
            Expr::field(&shape.field)
                .is_null()
                .and(Expr::var("map").not_null()),
            vec![Statement::assign(
                Expr::field(&shape.field),
                rewrap.apply(vec![]),
            )],
        ),
        Statement::if_then(
            Expr::var("map").not_null(),
            vec![Statement::Expr(
                Expr::field(&shape.field).call("putAll", vec![Expr::var("map")]),
            )],
        ),
        ret_self(property),
    ])])
}

pub(super) fn remove_from_map(_ctx: &BuilderContext, property: &Property) -> Result<Vec<Method>> {
    let shape = map_shape(property)?;
    let key_arg = property.with_name("key").with_type_ref(shape.key.clone());

    Ok(vec![Method::new(
        format!("removeFrom{}", shape.cap),
        self_ref(property),
    )
    .with_arguments(vec![key_arg])
    .with_statements(vec![
        Statement::if_then(
            Expr::field(&shape.field).is_null(),
            vec![ret_self(property)],
        ),
        Statement::if_then(
            Expr::var("key").not_null(),
            vec![Statement::Expr(
                Expr::field(&shape.field).call("remove", vec![Expr::var("key")]),
            )],
        ),
        ret_self(property),
    ])])
}

pub(super) fn remove_map_from_map(
    _ctx: &BuilderContext,
    property: &Property,
) -> Result<Vec<Method>> {
    let shape = map_shape(property)?;
    let map_arg = property.with_name("map");

    Ok(vec![Method::new(
        format!("removeFrom{}", shape.cap),
        self_ref(property),
    )
    .with_arguments(vec![map_arg])
    .with_statements(vec![
        Statement::if_then(
            Expr::field(&shape.field).is_null(),
            vec![ret_self(property)],
        ),
        Statement::if_then(
            Expr::var("map").not_null(),
            vec![Statement::ForEach {
                var: "key".into(),
                item_type: Some(shape.key.clone()),
                iterable: Expr::var("map").call("keySet", vec![]),
                body: vec![Statement::Expr(
                    Expr::field(&shape.field).call("remove", vec![Expr::var("key")]),
                )],
            }],
        ),
        ret_self(property),
    ])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{DefinitionRepository, InitFn, TypeRef, JAVA_MAP};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn ctx() -> BuilderContext {
        BuilderContext::new(Arc::new(DefinitionRepository::new()))
    }

    fn labels() -> Property {
        let mut p = Property::new(
            "labels",
            TypeRef::generic(
                JAVA_MAP,
                vec![
                    TypeRef::class("java.lang.String"),
                    TypeRef::class("java.lang.String"),
                ],
            ),
        );
        p.extras.init_function = Some(InitFn::Constructor("LinkedHashMap".into()));
        p
    }

    #[test]
    fn add_lazily_allocates_and_null_checks_both_sides() {
        let m = add_to_map(&ctx(), &labels()).unwrap().remove(0);
        assert_eq!(m.name, "addToLabels");
        assert_eq!(m.arguments.len(), 2);
        let rendered: String = m.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("new LinkedHashMap()"));
        assert!(rendered.contains("key != null && value != null"));
        assert!(rendered.contains("this.labels.put(key, value)"));
    }

    #[test]
    fn removal_from_an_absent_map_returns_early() {
        for m in [
            remove_from_map(&ctx(), &labels()).unwrap().remove(0),
            remove_map_from_map(&ctx(), &labels()).unwrap().remove(0),
        ] {
            let Statement::If { cond, then_branch, .. } = &m.statements[0] else {
                panic!("expected the absent-map early return");
            };
            assert_eq!(cond, &Expr::field("labels").is_null());
            assert_eq!(then_branch.len(), 1);
            assert!(matches!(then_branch[0], Statement::Return(Some(_))));
        }
    }

    #[test]
    fn bulk_removal_iterates_the_argument_keys() {
        let m = remove_map_from_map(&ctx(), &labels()).unwrap().remove(0);
        let rendered: String = m.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("map.keySet()"));
        assert!(rendered.contains("this.labels.remove(key)"));
    }

    #[test]
    fn missing_init_function_fails_fast() {
        let mut p = labels();
        p.extras.init_function = None;
        assert!(add_to_map(&ctx(), &p).is_err());
        // Removal needs no allocator.
        assert!(remove_from_map(&ctx(), &p).is_ok());
    }

    #[test]
    fn non_map_property_is_a_model_error() {
        let p = Property::new("name", TypeRef::class("java.lang.String"));
        assert!(add_to_map(&ctx(), &p).is_err());
    }
}
