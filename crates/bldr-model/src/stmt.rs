//! Statement and expression model for generated method bodies.
//!
//! Bodies are built as small tagged ASTs rather than text so a rendering
//! backend can target different output formats without re-parsing control
//! flow, and so tests can make structural assertions about what a
//! synthesized method does (e.g. that visitable-tracking adds and removes
//! stay paired). The `Display` impls render Java-ish text for debugging;
//! they are not the production renderer.

use serde::Serialize;
use std::fmt;

use crate::TypeRef;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Lit {
    Bool(bool),
    Int(i64),
    Str(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Add => "+",
            BinOp::Sub => "-",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Expr {
    This,
    /// `this.<name>` field access on the generated builder.
    Field(String),
    /// A local variable or argument.
    Var(String),
    Null,
    Lit(Lit),
    New {
        class: String,
        args: Vec<Expr>,
    },
    NewArray {
        item_type: TypeRef,
        len: Box<Expr>,
    },
    Call {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    StaticCall {
        class: String,
        method: String,
        args: Vec<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        class: String,
    },
    Not(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

impl Expr {
    pub fn field(name: impl Into<String>) -> Expr {
        Expr::Field(name.into())
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn int(value: i64) -> Expr {
        Expr::Lit(Lit::Int(value))
    }

    pub fn bool(value: bool) -> Expr {
        Expr::Lit(Lit::Bool(value))
    }

    pub fn new_instance(class: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::New {
            class: class.into(),
            args,
        }
    }

    pub fn call(self, method: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call {
            target: Box::new(self),
            method: method.into(),
            args,
        }
    }

    pub fn static_call(
        class: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Expr>,
    ) -> Expr {
        Expr::StaticCall {
            class: class.into(),
            method: method.into(),
            args,
        }
    }

    pub fn cast(ty: TypeRef, expr: Expr) -> Expr {
        Expr::Cast {
            ty,
            expr: Box::new(expr),
        }
    }

    pub fn instance_of(self, class: impl Into<String>) -> Expr {
        Expr::InstanceOf {
            expr: Box::new(self),
            class: class.into(),
        }
    }

    pub fn binary(self, op: BinOp, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn is_null(self) -> Expr {
        self.binary(BinOp::Eq, Expr::Null)
    }

    pub fn not_null(self) -> Expr {
        self.binary(BinOp::Ne, Expr::Null)
    }

    pub fn and(self, rhs: Expr) -> Expr {
        self.binary(BinOp::And, rhs)
    }

    pub fn or(self, rhs: Expr) -> Expr {
        self.binary(BinOp::Or, rhs)
    }

    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    pub fn ternary(cond: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
        Expr::Ternary {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::This => write!(f, "this"),
            Expr::Field(name) => write!(f, "this.{name}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Null => write!(f, "null"),
            Expr::Lit(Lit::Bool(b)) => write!(f, "{b}"),
            Expr::Lit(Lit::Int(i)) => write!(f, "{i}"),
            Expr::Lit(Lit::Str(s)) => write!(f, "\"{s}\""),
            Expr::New { class, args } => {
                write!(f, "new {class}(")?;
                join(f, args)?;
                write!(f, ")")
            }
            Expr::NewArray { item_type, len } => write!(f, "new {item_type}[{len}]"),
            Expr::Call {
                target,
                method,
                args,
            } => {
                write!(f, "{target}.{method}(")?;
                join(f, args)?;
                write!(f, ")")
            }
            Expr::StaticCall {
                class,
                method,
                args,
            } => {
                write!(f, "{class}.{method}(")?;
                join(f, args)?;
                write!(f, ")")
            }
            Expr::Index { target, index } => write!(f, "{target}[{index}]"),
            Expr::Cast { ty, expr } => write!(f, "({ty}) {expr}"),
            Expr::InstanceOf { expr, class } => write!(f, "{expr} instanceof {class}"),
            Expr::Not(inner) => write!(f, "!({inner})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "{cond} ? {then_branch} : {else_branch}"),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Statement {
    Expr(Expr),
    Assign {
        target: Expr,
        value: Expr,
    },
    Let {
        name: String,
        ty: Option<TypeRef>,
        value: Expr,
    },
    If {
        cond: Expr,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    ForEach {
        var: String,
        item_type: Option<TypeRef>,
        iterable: Expr,
        body: Vec<Statement>,
    },
    /// `for (int <var> = 0; <var> < <upper>; <var>++)`.
    ForRange {
        var: String,
        upper: Expr,
        body: Vec<Statement>,
    },
    Return(Option<Expr>),
    /// A generated-code runtime failure (`throw new RuntimeException(...)`).
    Throw(String),
    Break,
}

impl Statement {
    pub fn assign(target: Expr, value: Expr) -> Statement {
        Statement::Assign { target, value }
    }

    pub fn ret(expr: Expr) -> Statement {
        Statement::Return(Some(expr))
    }

    pub fn if_then(cond: Expr, then_branch: Vec<Statement>) -> Statement {
        Statement::If {
            cond,
            then_branch,
            else_branch: Vec::new(),
        }
    }

    pub fn if_else(
        cond: Expr,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    ) -> Statement {
        Statement::If {
            cond,
            then_branch,
            else_branch,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);
        match self {
            Statement::Expr(e) => writeln!(f, "{pad}{e};"),
            Statement::Assign { target, value } => writeln!(f, "{pad}{target} = {value};"),
            Statement::Let { name, ty, value } => match ty {
                Some(ty) => writeln!(f, "{pad}{ty} {name} = {value};"),
                None => writeln!(f, "{pad}var {name} = {value};"),
            },
            Statement::If {
                cond,
                then_branch,
                else_branch,
            } => {
                writeln!(f, "{pad}if ({cond}) {{")?;
                for s in then_branch {
                    s.render(f, indent + 1)?;
                }
                if else_branch.is_empty() {
                    writeln!(f, "{pad}}}")
                } else {
                    writeln!(f, "{pad}}} else {{")?;
                    for s in else_branch {
                        s.render(f, indent + 1)?;
                    }
                    writeln!(f, "{pad}}}")
                }
            }
            Statement::ForEach {
                var,
                item_type,
                iterable,
                body,
            } => {
                match item_type {
                    Some(ty) => writeln!(f, "{pad}for ({ty} {var} : {iterable}) {{")?,
                    None => writeln!(f, "{pad}for (var {var} : {iterable}) {{")?,
                }
                for s in body {
                    s.render(f, indent + 1)?;
                }
                writeln!(f, "{pad}}}")
            }
            Statement::ForRange { var, upper, body } => {
                writeln!(f, "{pad}for (int {var} = 0; {var} < {upper}; {var}++) {{")?;
                for s in body {
                    s.render(f, indent + 1)?;
                }
                writeln!(f, "{pad}}}")
            }
            Statement::Return(None) => writeln!(f, "{pad}return;"),
            Statement::Return(Some(e)) => writeln!(f, "{pad}return {e};"),
            Statement::Throw(message) => {
                writeln!(f, "{pad}throw new RuntimeException(\"{message}\");")
            }
            Statement::Break => writeln!(f, "{pad}break;"),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
