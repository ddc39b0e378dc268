//! Generated-method descriptions. A `Method` is a pure value; the engine
//! produces them and the downstream renderer consumes them.

use serde::Serialize;

use crate::{ClassRef, Property, Statement, TypeParamDef, TypeRef};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    PackagePrivate,
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub return_type: TypeRef,
    pub type_parameters: Vec<TypeParamDef>,
    pub arguments: Vec<Property>,
    /// Prefer rendering the trailing array argument as a vararg.
    pub vararg: bool,
    pub deprecated: bool,
    pub comments: Vec<String>,
    pub statements: Vec<Statement>,
    /// Types the renderer must import beyond those reachable from the
    /// signature (e.g. concrete descendant builders used in dispatch).
    pub also_import: Vec<ClassRef>,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            return_type,
            type_parameters: Vec::new(),
            arguments: Vec::new(),
            vararg: false,
            deprecated: false,
            comments: Vec::new(),
            statements: Vec::new(),
            also_import: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Property>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParamDef>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_also_import(mut self, also_import: Vec<ClassRef>) -> Self {
        self.also_import = also_import;
        self
    }

    pub fn vararg_preferred(mut self) -> Self {
        self.vararg = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// A copy with a different name, keeping everything else. Used for
    /// families where a later method is the earlier one renamed (the
    /// non-deprecated `build*` twin of a getter).
    pub fn renamed(&self, name: impl Into<String>) -> Method {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_copy_drops_nothing_else() {
        let m = Method::new("getItems", TypeRef::class("java.util.List"))
            .deprecated()
            .with_comments(vec!["use buildItems instead".into()]);
        let renamed = m.renamed("buildItems");
        assert_eq!(renamed.name, "buildItems");
        assert!(renamed.deprecated);
        assert_eq!(m.name, "getItems");
    }
}
