//! References to types and type declarations.
//!
//! `TypeRef` is a *reference* to a type as it appears in a signature:
//! possibly generic, possibly an array, possibly a type variable. `TypeDef`
//! is the declaration itself. A `ClassRef` resolves to at most one `TypeDef`
//! through the [`DefinitionRepository`](crate::DefinitionRepository), keyed by
//! fully-qualified name.

use serde::Serialize;
use std::fmt;

use crate::{Method, Property};

/// Java primitive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Fully-qualified name of the boxed counterpart.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }
}

/// A reference to a class or interface: fully-qualified name, type
/// arguments, and array dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ClassRef {
    pub name: String,
    pub arguments: Vec<TypeRef>,
    pub dimensions: usize,
}

impl ClassRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            dimensions: 0,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// The name after the last `.`, e.g. `java.util.List` => `List`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// The package portion of the name, if any.
    pub fn package(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A reference to a type as used in signatures and statement ASTs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeRef {
    Void,
    Primitive {
        kind: PrimitiveKind,
        dimensions: usize,
    },
    Class(ClassRef),
    Variable {
        name: String,
        dimensions: usize,
    },
    /// `?` / `? extends X`, needed for `VisitableBuilder<? extends T, ?>`.
    Wildcard {
        extends: Option<Box<TypeRef>>,
    },
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(ClassRef::new(name))
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Class(ClassRef::new(name).with_arguments(arguments))
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive { kind, dimensions: 0 }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable {
            name: name.into(),
            dimensions: 0,
        }
    }

    pub fn wildcard() -> Self {
        TypeRef::Wildcard { extends: None }
    }

    pub fn wildcard_extending(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            extends: Some(Box::new(bound)),
        }
    }

    pub fn boolean() -> Self {
        TypeRef::primitive(PrimitiveKind::Boolean)
    }

    pub fn int() -> Self {
        TypeRef::primitive(PrimitiveKind::Int)
    }

    pub fn as_class_ref(&self) -> Option<&ClassRef> {
        match self {
            TypeRef::Class(cr) => Some(cr),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            TypeRef::Primitive { dimensions, .. } | TypeRef::Variable { dimensions, .. } => {
                *dimensions
            }
            TypeRef::Class(cr) => cr.dimensions,
            TypeRef::Void | TypeRef::Wildcard { .. } => 0,
        }
    }

    /// The same reference with a different array-dimension count. For
    /// `Void`/wildcards this is the identity.
    pub fn with_dimensions(&self, dimensions: usize) -> TypeRef {
        match self {
            TypeRef::Primitive { kind, .. } => TypeRef::Primitive {
                kind: *kind,
                dimensions,
            },
            TypeRef::Variable { name, .. } => TypeRef::Variable {
                name: name.clone(),
                dimensions,
            },
            TypeRef::Class(cr) => TypeRef::Class(cr.clone().with_dimensions(dimensions)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Primitive { kind, dimensions } => {
                write!(f, "{}", kind.keyword())?;
                for _ in 0..*dimensions {
                    write!(f, "[]")?;
                }
                Ok(())
            }
            TypeRef::Class(cr) => write!(f, "{cr}"),
            TypeRef::Variable { name, dimensions } => {
                write!(f, "{name}")?;
                for _ in 0..*dimensions {
                    write!(f, "[]")?;
                }
                Ok(())
            }
            TypeRef::Wildcard { extends: None } => write!(f, "?"),
            TypeRef::Wildcard { extends: Some(bound) } => write!(f, "? extends {bound}"),
        }
    }
}

/// Kind of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

/// A declared type parameter, e.g. `N` or `T extends Comparable<T>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeParamDef {
    pub name: String,
    pub bounds: Vec<ClassRef>,
}

impl TypeParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn to_reference(&self) -> TypeRef {
        TypeRef::variable(self.name.clone())
    }
}

/// A type declaration: the unit the repository owns and the engine reads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDef {
    pub kind: TypeKind,
    /// Fully-qualified name.
    pub name: String,
    pub parameters: Vec<TypeParamDef>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    /// Declared constructors, as argument lists.
    pub constructors: Vec<Vec<Property>>,
    pub supertypes: Vec<ClassRef>,
    pub is_abstract: bool,
    /// Whether a builder is generated for this type. Set by the upstream
    /// model extractor; everything in the engine keys off it.
    pub buildable: bool,
}

impl TypeDef {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parameters: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            supertypes: Vec::new(),
            is_abstract: false,
            buildable: false,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn package(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg)
    }

    /// Reference to this definition with its own type parameters as
    /// arguments, e.g. `Box<T>` for `class Box<T>`.
    pub fn to_reference(&self) -> ClassRef {
        ClassRef::new(self.name.clone())
            .with_arguments(self.parameters.iter().map(TypeParamDef::to_reference).collect())
    }
}
