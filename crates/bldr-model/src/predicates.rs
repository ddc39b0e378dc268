//! Shape predicates over type references.
//!
//! Collections, maps and optionals are recognized by fully-qualified name;
//! the engine treats anything else as an opaque value type.

use crate::{ClassRef, PrimitiveKind, TypeRef};

pub const JAVA_LIST: &str = "java.util.List";
pub const JAVA_SET: &str = "java.util.Set";
pub const JAVA_COLLECTION: &str = "java.util.Collection";
pub const JAVA_MAP: &str = "java.util.Map";
pub const JAVA_OPTIONAL: &str = "java.util.Optional";
pub const JAVA_OPTIONAL_INT: &str = "java.util.OptionalInt";
pub const JAVA_OPTIONAL_LONG: &str = "java.util.OptionalLong";
pub const JAVA_OPTIONAL_DOUBLE: &str = "java.util.OptionalDouble";
pub const JAVA_PREDICATE: &str = "java.util.function.Predicate";

fn is_class_named(ty: &TypeRef, name: &str) -> bool {
    matches!(ty, TypeRef::Class(ClassRef { name: n, dimensions: 0, .. }) if n == name)
}

impl TypeRef {
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive { dimensions: 0, .. })
    }

    pub fn is_primitive_boolean(&self) -> bool {
        matches!(
            self,
            TypeRef::Primitive {
                kind: PrimitiveKind::Boolean,
                dimensions: 0
            }
        )
    }

    pub fn is_array(&self) -> bool {
        self.dimensions() > 0
    }

    pub fn is_list(&self) -> bool {
        is_class_named(self, JAVA_LIST)
    }

    pub fn is_set(&self) -> bool {
        is_class_named(self, JAVA_SET)
    }

    /// List, set, or the raw collection interface.
    pub fn is_collection(&self) -> bool {
        self.is_list() || self.is_set() || is_class_named(self, JAVA_COLLECTION)
    }

    pub fn is_map(&self) -> bool {
        is_class_named(self, JAVA_MAP)
    }

    pub fn is_optional(&self) -> bool {
        is_class_named(self, JAVA_OPTIONAL)
    }

    pub fn is_optional_int(&self) -> bool {
        is_class_named(self, JAVA_OPTIONAL_INT)
    }

    pub fn is_optional_long(&self) -> bool {
        is_class_named(self, JAVA_OPTIONAL_LONG)
    }

    pub fn is_optional_double(&self) -> bool {
        is_class_named(self, JAVA_OPTIONAL_DOUBLE)
    }

    /// Any of the four optional flavors.
    pub fn is_any_optional(&self) -> bool {
        self.is_optional()
            || self.is_optional_int()
            || self.is_optional_long()
            || self.is_optional_double()
    }
}
