// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes and the module root.

use serde::{Deserialize, Serialize};

use super::expression::{Arguments, Expr, Keyword};
use super::op::Operator;
use super::pattern::Pattern;
use crate::literal::flag_serde;

/// The root of a parsed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Module {
        Module { body }
    }
}

/// A statement, tagged by the parser's node class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Stmt {
    FunctionDef(FunctionDef),
    AsyncFunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return(Return),
    Delete(Delete),
    Assign(Assign),
    TypeAlias(TypeAlias),
    AugAssign(AugAssign),
    AnnAssign(AnnAssign),
    For(For),
    AsyncFor(For),
    While(While),
    If(If),
    With(With),
    AsyncWith(With),
    Match(Match),
    Raise(Raise),
    Try(Try),
    TryStar(Try),
    Assert(Assert),
    Import(Import),
    ImportFrom(ImportFrom),
    Global(Global),
    Nonlocal(Nonlocal),
    Expr(ExprStmt),
    Pass {},
    Break {},
    Continue {},
}

/// Statement kinds without payload, for per-kind tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StmtKind {
    FunctionDef,
    AsyncFunctionDef,
    ClassDef,
    Return,
    Delete,
    Assign,
    TypeAlias,
    AugAssign,
    AnnAssign,
    For,
    AsyncFor,
    While,
    If,
    With,
    AsyncWith,
    Match,
    Raise,
    Try,
    TryStar,
    Assert,
    Import,
    ImportFrom,
    Global,
    Nonlocal,
    Expr,
    Pass,
    Break,
    Continue,
}

impl StmtKind {
    pub const ALL: [StmtKind; 28] = [
        StmtKind::FunctionDef,
        StmtKind::AsyncFunctionDef,
        StmtKind::ClassDef,
        StmtKind::Return,
        StmtKind::Delete,
        StmtKind::Assign,
        StmtKind::TypeAlias,
        StmtKind::AugAssign,
        StmtKind::AnnAssign,
        StmtKind::For,
        StmtKind::AsyncFor,
        StmtKind::While,
        StmtKind::If,
        StmtKind::With,
        StmtKind::AsyncWith,
        StmtKind::Match,
        StmtKind::Raise,
        StmtKind::Try,
        StmtKind::TryStar,
        StmtKind::Assert,
        StmtKind::Import,
        StmtKind::ImportFrom,
        StmtKind::Global,
        StmtKind::Nonlocal,
        StmtKind::Expr,
        StmtKind::Pass,
        StmtKind::Break,
        StmtKind::Continue,
    ];

    /// Dense index for table lookups.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Stmt {
    pub fn kind(&self) -> StmtKind {
        match self {
            Stmt::FunctionDef(_) => StmtKind::FunctionDef,
            Stmt::AsyncFunctionDef(_) => StmtKind::AsyncFunctionDef,
            Stmt::ClassDef(_) => StmtKind::ClassDef,
            Stmt::Return(_) => StmtKind::Return,
            Stmt::Delete(_) => StmtKind::Delete,
            Stmt::Assign(_) => StmtKind::Assign,
            Stmt::TypeAlias(_) => StmtKind::TypeAlias,
            Stmt::AugAssign(_) => StmtKind::AugAssign,
            Stmt::AnnAssign(_) => StmtKind::AnnAssign,
            Stmt::For(_) => StmtKind::For,
            Stmt::AsyncFor(_) => StmtKind::AsyncFor,
            Stmt::While(_) => StmtKind::While,
            Stmt::If(_) => StmtKind::If,
            Stmt::With(_) => StmtKind::With,
            Stmt::AsyncWith(_) => StmtKind::AsyncWith,
            Stmt::Match(_) => StmtKind::Match,
            Stmt::Raise(_) => StmtKind::Raise,
            Stmt::Try(_) => StmtKind::Try,
            Stmt::TryStar(_) => StmtKind::TryStar,
            Stmt::Assert(_) => StmtKind::Assert,
            Stmt::Import(_) => StmtKind::Import,
            Stmt::ImportFrom(_) => StmtKind::ImportFrom,
            Stmt::Global(_) => StmtKind::Global,
            Stmt::Nonlocal(_) => StmtKind::Nonlocal,
            Stmt::Expr(_) => StmtKind::Expr,
            Stmt::Pass {} => StmtKind::Pass,
            Stmt::Break {} => StmtKind::Break,
            Stmt::Continue {} => StmtKind::Continue,
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    pub fn expr(value: Expr) -> Stmt {
        Stmt::Expr(ExprStmt { value })
    }

    pub fn assign(targets: Vec<Expr>, value: Expr) -> Stmt {
        Stmt::Assign(Assign { targets, value })
    }

    pub fn return_(value: Option<Expr>) -> Stmt {
        Stmt::Return(Return { value })
    }

    pub fn if_(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
        Stmt::If(If { test, body, orelse })
    }

    pub fn while_(test: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::While(While {
            test,
            body,
            orelse: Vec::new(),
        })
    }

    pub fn for_(target: Expr, iter: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::For(For {
            target,
            iter,
            body,
            orelse: Vec::new(),
        })
    }

    pub fn import<I, S>(names: I) -> Stmt
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Stmt::Import(Import {
            names: names.into_iter().map(Alias::new).collect(),
        })
    }

    pub fn function(name: impl Into<String>, args: Arguments, body: Vec<Stmt>) -> Stmt {
        Stmt::FunctionDef(FunctionDef {
            name: name.into(),
            args,
            body,
            decorator_list: Vec::new(),
            returns: None,
            type_params: Vec::new(),
        })
    }

    pub fn class(name: impl Into<String>, bases: Vec<Expr>, body: Vec<Stmt>) -> Stmt {
        Stmt::ClassDef(ClassDef {
            name: name.into(),
            bases,
            keywords: Vec::new(),
            body,
            decorator_list: Vec::new(),
            type_params: Vec::new(),
        })
    }

    pub fn pass() -> Stmt {
        Stmt::Pass {}
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Shared by `def` and `async def`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub args: Arguments,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub decorator_list: Vec<Expr>,
    #[serde(default)]
    pub returns: Option<Expr>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<Expr>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub decorator_list: Vec<Expr>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
}

/// PEP 695 type parameters, with PEP 696 defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum TypeParam {
    TypeVar {
        name: String,
        #[serde(default)]
        bound: Option<Expr>,
        #[serde(default)]
        default_value: Option<Expr>,
    },
    ParamSpec {
        name: String,
        #[serde(default)]
        default_value: Option<Expr>,
    },
    TypeVarTuple {
        name: String,
        #[serde(default)]
        default_value: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: Expr,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    pub value: Expr,
}

// ============================================================================
// Simple statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    #[serde(default)]
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub targets: Vec<Expr>,
}

/// `a = b = value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugAssign {
    pub target: Expr,
    pub op: Operator,
    pub value: Expr,
}

/// `simple` is false when a plain name target was written in parentheses,
/// which keeps it out of `__annotations__`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnAssign {
    pub target: Expr,
    pub annotation: Expr,
    #[serde(default)]
    pub value: Option<Expr>,
    #[serde(default = "simple_default", with = "flag_serde")]
    pub simple: bool,
}

fn simple_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raise {
    #[serde(default)]
    pub exc: Option<Expr>,
    #[serde(default)]
    pub cause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assert {
    pub test: Expr,
    #[serde(default)]
    pub msg: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub names: Vec<Alias>,
}

/// `from .module import names`; `level` counts the leading dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFrom {
    #[serde(default)]
    pub module: Option<String>,
    pub names: Vec<Alias>,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    #[serde(default)]
    pub asname: Option<String>,
}

impl Alias {
    pub fn new(name: impl Into<String>) -> Alias {
        Alias {
            name: name.into(),
            asname: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nonlocal {
    pub names: Vec<String>,
}

/// An expression evaluated for its side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub value: Expr,
}

// ============================================================================
// Compound statements
// ============================================================================

/// Shared by `for` and `async for`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct For {
    pub target: Expr,
    pub iter: Expr,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub test: Expr,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub test: Expr,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
}

/// Shared by `with` and `async with`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub items: Vec<WithItem>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithItem {
    pub context_expr: Expr,
    #[serde(default)]
    pub optional_vars: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub subject: Expr,
    pub cases: Vec<MatchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    #[serde(default)]
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// Shared by `try` and `try` with `except*` handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Try {
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub handlers: Vec<ExceptHandler>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
    #[serde(default)]
    pub finalbody: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptHandler {
    #[serde(rename = "type", default)]
    pub type_: Option<Expr>,
    #[serde(default)]
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_deserializes_with_unit_like_statements() {
        let json = r#"{
            "_type": "Module",
            "body": [
                {"_type": "Pass", "lineno": 1, "col_offset": 0},
                {"_type": "Break"},
                {"_type": "Expr", "value": {"_type": "Name", "id": "x", "ctx": {"_type": "Load"}}}
            ],
            "type_ignores": []
        }"#;
        let module: Module = serde_json::from_str(json).unwrap();
        assert_eq!(
            module.body,
            vec![Stmt::pass(), Stmt::Break {}, Stmt::expr(Expr::name("x"))]
        );
    }

    #[test]
    fn async_variants_share_payloads() {
        let json = r#"{
            "_type": "AsyncFor",
            "target": {"_type": "Name", "id": "x"},
            "iter": {"_type": "Name", "id": "y"},
            "body": [{"_type": "Pass"}],
            "orelse": []
        }"#;
        let stmt: Stmt = serde_json::from_str(json).unwrap();
        assert_eq!(stmt.kind(), StmtKind::AsyncFor);
    }

    #[test]
    fn ann_assign_simple_flag() {
        let json = r#"{
            "_type": "AnnAssign",
            "target": {"_type": "Name", "id": "x"},
            "annotation": {"_type": "Name", "id": "int"},
            "value": null,
            "simple": 0
        }"#;
        let Stmt::AnnAssign(node) = serde_json::from_str::<Stmt>(json).unwrap() else {
            panic!("expected an annotated assignment");
        };
        assert!(!node.simple);
    }

    #[test]
    fn except_handler_type_field() {
        let json = r#"{"_type": "ExceptHandler", "type": {"_type": "Name", "id": "E"}, "name": "e", "body": [{"_type": "Pass"}]}"#;
        let handler: ExceptHandler = serde_json::from_str(json).unwrap();
        assert_eq!(handler.type_, Some(Expr::name("E")));
        assert_eq!(handler.name.as_deref(), Some("e"));
    }

    #[test]
    fn kind_table_is_dense() {
        for (index, kind) in StmtKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), index);
        }
    }
}
