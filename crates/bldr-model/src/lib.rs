//! Immutable type model consumed by the bldr engine.
//!
//! The model describes Java-shaped classes (`TypeDef`), their properties and
//! methods, and references between them (`TypeRef`). Everything here is a
//! value: synthesis reads the model and produces new `Method`/`TypeDef`
//! values without mutating its inputs.

mod method;
mod predicates;
mod property;
mod repository;
mod stmt;
mod types;

pub use method::{Method, Visibility};
pub use predicates::{
    JAVA_COLLECTION, JAVA_LIST, JAVA_MAP, JAVA_OPTIONAL, JAVA_OPTIONAL_DOUBLE, JAVA_OPTIONAL_INT,
    JAVA_OPTIONAL_LONG, JAVA_PREDICATE, JAVA_SET,
};
pub use property::{InitFn, Property, PropertyExtras};
pub use repository::DefinitionRepository;
pub use stmt::{BinOp, Expr, Lit, Statement};
pub use types::{ClassRef, PrimitiveKind, TypeDef, TypeKind, TypeParamDef, TypeRef};
