//! Assembly of a complete builder description for a type definition.
//!
//! `assemble` walks the definition's properties, routes each one to the
//! synthesizer families its shape calls for, and collects the resulting
//! methods (deduplicated by signature, first emission wins) together with
//! the nested interface/impl pairs backing `withNew*` chains.

use std::collections::HashSet;

use bldr_model::{
    Expr, InitFn, Method, Property, TypeDef, TypeRef, JAVA_OPTIONAL, JAVA_OPTIONAL_DOUBLE,
    JAVA_OPTIONAL_INT, JAVA_OPTIONAL_LONG,
};
use tracing::debug;

use crate::context::BuilderContext;
use crate::descendants::buildable_descendants;
use crate::error::Result;
use crate::nesting::{nested_impl_def, nested_interface_def, NestedTypes};
use crate::synth::{MethodSynthesizers, VISITABLES};
use crate::transform::{builder_def, unwrap_all};

/// Everything the downstream renderer needs to emit one builder.
#[derive(Debug)]
pub struct BuilderPlan {
    /// The `<Type>Builder` definition, methods attached in emission order.
    pub builder: TypeDef,
    /// Nested interface/impl pairs, `and()`/`end*()` attached to the
    /// interface.
    pub nested: Vec<NestedTypes>,
    /// Name of the tracking-list field the builder must declare.
    pub visitables_field: &'static str,
}

/// Signature identity used to drop colliding emissions (an inline
/// constructor shortcut shadowing `withNewX()`, overlapping descendant
/// overloads).
#[derive(PartialEq, Eq, Hash)]
struct MethodKey {
    name: String,
    arg_types: Vec<TypeRef>,
}

impl MethodKey {
    fn of(method: &Method) -> Self {
        Self {
            name: method.name.clone(),
            arg_types: method.arguments.iter().map(|a| a.type_ref.clone()).collect(),
        }
    }
}

pub struct BuilderAssembler {
    synth: MethodSynthesizers,
    bean_setters: bool,
}

impl BuilderAssembler {
    pub fn new(ctx: BuilderContext) -> Self {
        Self {
            synth: MethodSynthesizers::new(ctx),
            bean_setters: false,
        }
    }

    /// Also emit plain `set*` bean setters next to the fluent surface.
    pub fn with_bean_setters(mut self, bean_setters: bool) -> Self {
        self.bean_setters = bean_setters;
        self
    }

    pub fn assemble(&self, def: &TypeDef) -> Result<BuilderPlan> {
        let mut methods: Vec<Method> = Vec::new();
        let mut seen: HashSet<MethodKey> = HashSet::new();
        let mut nested: Vec<NestedTypes> = Vec::new();

        for property in &def.properties {
            let property = normalize(property, def);
            let emitted = self.methods_for(&property, &mut nested)?;
            for method in emitted {
                if seen.insert(MethodKey::of(&method)) {
                    methods.push(method);
                }
            }
        }

        debug!(
            type_name = %def.name,
            methods = methods.len(),
            nested = nested.len(),
            "assembled builder plan"
        );

        let mut builder = builder_def(def);
        builder.methods = methods;
        Ok(BuilderPlan {
            builder,
            nested,
            visitables_field: VISITABLES,
        })
    }

    /// The families a property's shape calls for, in an order where every
    /// method only references methods emitted before it.
    fn methods_for(
        &self,
        property: &Property,
        nested: &mut Vec<NestedTypes>,
    ) -> Result<Vec<Method>> {
        let ctx = self.synth.ctx();
        let ty = &property.type_ref;
        let item = unwrap_all(ty);
        let buildable = ctx.is_buildable(&item);
        let concrete = buildable && !ctx.is_abstract(&item);
        let descendants = buildable_descendants(ctx, property);

        let mut methods = Vec::new();

        if ty.is_map() {
            methods.push(self.synth.add_to_map(property)?);
            methods.push(self.synth.add_map_to_map(property)?);
            methods.push(self.synth.remove_from_map(property)?);
            methods.push(self.synth.remove_map_from_map(property)?);
            methods.push(self.synth.with(property)?);
            methods.push(self.synth.has(property)?);
            methods.extend(self.synth.getter(property)?);
        } else if ty.is_list() || ty.is_set() || ty.is_array() {
            // Shadow properties first: the base property's dispatch chains
            // call the per-descendant methods by name.
            for shadow in &descendants {
                methods.extend(self.methods_for(shadow, nested)?);
            }
            methods.extend(self.synth.add_to_collection(property)?);
            methods.extend(self.synth.remove_from_collection(property)?);
            if ty.is_array() {
                methods.push(self.synth.with_array(property)?);
                methods.extend(self.synth.getter_array(property)?);
            } else {
                methods.push(self.synth.with(property)?);
                methods.extend(self.synth.getter(property)?);
            }
            methods.push(self.synth.has(property)?);
            if buildable || !descendants.is_empty() {
                methods.push(self.synth.has_matching(property)?);
            }
            if concrete {
                methods.extend(self.nested_family(property, nested, true)?);
            }
        } else if ty.is_any_optional() {
            methods.extend(self.synth.with_optional(property)?);
            methods.push(self.synth.has(property)?);
            methods.extend(self.synth.getter(property)?);
            if ctx.is_buildable(&item) && !ctx.is_abstract(&item) {
                methods.extend(self.nested_family(property, nested, false)?);
            }
        } else {
            methods.push(self.synth.with(property)?);
            methods.push(self.synth.has(property)?);
            methods.extend(self.synth.getter(property)?);
            if concrete {
                methods.extend(self.nested_family(property, nested, false)?);
            }
        }

        if self.bean_setters && !ty.is_array() {
            methods.push(self.synth.setter(property)?);
        }
        Ok(methods)
    }

    /// The `withNew*`/`edit*` entry points plus the nested types they open.
    fn nested_family(
        &self,
        property: &Property,
        nested: &mut Vec<NestedTypes>,
        indexed: bool,
    ) -> Result<Vec<Method>> {
        let ctx = self.synth.ctx();
        let mut methods = Vec::new();
        methods.push(self.synth.with_new_nested(property)?);
        methods.push(self.synth.with_new_like_nested(property)?);
        if indexed {
            methods.push(self.synth.set_new_like_nested_at_index(property)?);
        }
        methods.extend(self.synth.with_nested_inline(property)?);
        if indexed {
            methods.extend(self.synth.edit_nested(property)?);
        } else {
            methods.push(self.synth.edit_or_new(property)?);
            methods.push(self.synth.edit_or_new_like(property)?);
            methods.extend(self.synth.edit_nested(property)?);
        }

        let mut interface = nested_interface_def(ctx, property)?;
        interface.methods.push(self.synth.and_method(property)?);
        interface.methods.push(self.synth.end_method(property)?);
        let implementation = nested_impl_def(ctx, property)?;
        nested.push(NestedTypes {
            interface,
            implementation,
        });
        Ok(methods)
    }
}

/// Fill in the container extras the synthesizers require when the upstream
/// model left them unset, and default the fluent self-type.
fn normalize(property: &Property, origin: &TypeDef) -> Property {
    let mut property = property.clone();
    let extras = &mut property.extras;
    if extras.generic_self_type.is_none() {
        extras.generic_self_type = Some(TypeRef::variable("T"));
    }
    if extras.origin.is_none() {
        extras.origin = Some(origin.name.clone());
    }

    let ty = &property.type_ref;
    if ty.is_list() || ty.is_set() {
        let class = if ty.is_set() {
            "java.util.LinkedHashSet"
        } else {
            "java.util.ArrayList"
        };
        if extras.lazy_init.is_none() {
            extras.lazy_init = Some(Expr::new_instance(class, vec![]));
        }
        if extras.init_function.is_none() {
            extras.init_function = Some(InitFn::Constructor(class.into()));
        }
    } else if ty.is_array() {
        if extras.lazy_init.is_none() {
            extras.lazy_init = Some(Expr::new_instance("java.util.ArrayList", vec![]));
        }
    } else if ty.is_map() {
        if extras.lazy_init.is_none() {
            extras.lazy_init = Some(Expr::new_instance("java.util.LinkedHashMap", vec![]));
        }
        if extras.init_function.is_none() {
            extras.init_function = Some(InitFn::Constructor("java.util.LinkedHashMap".into()));
        }
    } else if ty.is_any_optional() {
        let class = match () {
            _ if ty.is_optional_int() => JAVA_OPTIONAL_INT,
            _ if ty.is_optional_long() => JAVA_OPTIONAL_LONG,
            _ if ty.is_optional_double() => JAVA_OPTIONAL_DOUBLE,
            _ => JAVA_OPTIONAL,
        };
        if extras.init.is_none() {
            extras.init = Some(Expr::static_call(class, "empty", vec![]));
        }
        if extras.init_function.is_none() {
            extras.init_function = Some(InitFn::StaticFactory {
                class: class.into(),
                method: "of".into(),
            });
        }
    }
    property
}

#[cfg(test)]
mod tests {
    use super::*;
    use bldr_model::{ClassRef, DefinitionRepository, TypeKind, JAVA_LIST, JAVA_MAP};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn zoo_repository() -> Arc<DefinitionRepository> {
        let repo = Arc::new(DefinitionRepository::new());
        let mut animal = TypeDef::new(TypeKind::Class, "zoo.Animal");
        animal.buildable = true;
        animal.is_abstract = true;
        repo.register(animal);
        for name in ["zoo.Dog", "zoo.Cat"] {
            let mut def = TypeDef::new(TypeKind::Class, name);
            def.buildable = true;
            def.supertypes.push(ClassRef::new("zoo.Animal"));
            repo.register(def);
        }
        repo
    }

    fn assemble(def: TypeDef) -> BuilderPlan {
        let repo = zoo_repository();
        repo.register(def.clone());
        BuilderAssembler::new(BuilderContext::new(repo))
            .assemble(&def)
            .unwrap()
    }

    fn shelter() -> TypeDef {
        let mut def = TypeDef::new(TypeKind::Class, "zoo.Shelter");
        def.buildable = true;
        def.properties.push(Property::new(
            "name",
            TypeRef::class("java.lang.String"),
        ));
        def.properties.push(Property::new(
            "items",
            TypeRef::generic(JAVA_LIST, vec![TypeRef::class("zoo.Animal")]),
        ));
        def
    }

    #[test]
    fn plan_names_the_builder_and_tracking_field() {
        let plan = assemble(shelter());
        assert_eq!(plan.builder.name, "zoo.ShelterBuilder");
        assert_eq!(plan.visitables_field, "_visitables");
        assert!(!plan.builder.methods.is_empty());
    }

    #[test]
    fn dispatch_targets_are_emitted_before_the_dispatching_method() {
        let plan = assemble(shelter());
        let mut position: HashMap<&str, usize> = HashMap::new();
        for (i, m) in plan.builder.methods.iter().enumerate() {
            position.entry(m.name.as_str()).or_insert(i);
        }
        // The dispatching addToItems comes after the per-descendant
        // addToDogItems/addToCatItems it calls.
        assert!(position["addToCatItems"] < position["addToItems"]);
        assert!(position["addToDogItems"] < position["addToItems"]);
        assert!(position["addToItems"] < position["withItems"]);
    }

    #[test]
    fn abstract_item_dispatch_reaches_the_dog_builder() {
        let plan = assemble(shelter());
        let add = plan
            .builder
            .methods
            .iter()
            .find(|m| m.name == "addToItems" && m.vararg)
            .unwrap();
        let rendered: String = add.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("item instanceof Dog"));
        assert!(rendered.contains("addToDogItems((Dog) item)"));
        let shadow = plan
            .builder
            .methods
            .iter()
            .find(|m| m.name == "addToDogItems" && m.vararg)
            .unwrap();
        let rendered: String = shadow.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains("new DogBuilder(item)"));
        assert!(rendered.contains("this.items.add(builder)"));
    }

    #[test]
    fn duplicate_signatures_are_dropped_first_wins() {
        let plan = assemble(shelter());
        let mut seen = HashSet::new();
        for m in &plan.builder.methods {
            assert!(
                seen.insert(MethodKey::of(m)),
                "duplicate signature {}",
                m.name
            );
        }
    }

    #[test]
    fn concrete_nested_types_carry_navigation() {
        let mut def = TypeDef::new(TypeKind::Class, "zoo.Kennel");
        def.buildable = true;
        def.properties
            .push(Property::new("dog", TypeRef::class("zoo.Dog")));
        let plan = assemble(def);

        assert_eq!(plan.nested.len(), 1);
        let interface = &plan.nested[0].interface;
        assert_eq!(interface.name, "DogNested");
        let names: Vec<&str> = interface.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["and", "endDog"]);
        assert_eq!(plan.nested[0].implementation.name, "DogNestedImpl");
    }

    #[test]
    fn map_properties_use_the_map_family_only() {
        let mut def = TypeDef::new(TypeKind::Class, "zoo.Tagged");
        def.buildable = true;
        def.properties.push(Property::new(
            "labels",
            TypeRef::generic(
                JAVA_MAP,
                vec![
                    TypeRef::class("java.lang.String"),
                    TypeRef::class("java.lang.String"),
                ],
            ),
        ));
        let plan = assemble(def);
        let names: Vec<&str> = plan
            .builder
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        // Key/value and bulk overloads share their names.
        assert_eq!(
            names,
            vec![
                "addToLabels",
                "addToLabels",
                "removeFromLabels",
                "removeFromLabels",
                "withLabels",
                "hasLabels",
                "getLabels",
            ]
        );
        assert!(plan.nested.is_empty());
    }

    #[test]
    fn bean_setters_are_opt_in() {
        let with_setters = {
            let repo = zoo_repository();
            let def = shelter();
            repo.register(def.clone());
            BuilderAssembler::new(BuilderContext::new(repo))
                .with_bean_setters(true)
                .assemble(&def)
                .unwrap()
        };
        assert!(with_setters
            .builder
            .methods
            .iter()
            .any(|m| m.name == "setName"));
        assert!(!assemble(shelter())
            .builder
            .methods
            .iter()
            .any(|m| m.name == "setName"));
    }
}
