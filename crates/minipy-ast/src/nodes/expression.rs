// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.
//!
//! Field names follow the parser's tree so a JSON dump deserializes directly.
//! Location and `ctx` fields in the dump are ignored.

use serde::{Deserialize, Serialize};

use super::op::{BoolOperator, CmpOp, Operator, UnaryOperator};
use crate::literal::{flag_serde, ConstantValue, IntLiteral};
use crate::precedence::Precedence;

/// An expression, tagged by the parser's node class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Expr {
    BoolOp(BoolOp),
    NamedExpr(NamedExpr),
    BinOp(BinOp),
    UnaryOp(UnaryOp),
    Lambda(Lambda),
    IfExp(IfExp),
    Dict(Dict),
    Set(Set),
    ListComp(ListComp),
    SetComp(SetComp),
    DictComp(DictComp),
    GeneratorExp(GeneratorExp),
    Await(Await),
    Yield(Yield),
    YieldFrom(YieldFrom),
    Compare(Compare),
    Call(Call),
    FormattedValue(FormattedValue),
    JoinedStr(JoinedStr),
    Constant(Constant),
    Attribute(Attribute),
    Subscript(Subscript),
    Starred(Starred),
    Name(Name),
    List(List),
    Tuple(Tuple),
    Slice(Slice),
}

impl Expr {
    /// Node class name, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::BoolOp(_) => "BoolOp",
            Expr::NamedExpr(_) => "NamedExpr",
            Expr::BinOp(_) => "BinOp",
            Expr::UnaryOp(_) => "UnaryOp",
            Expr::Lambda(_) => "Lambda",
            Expr::IfExp(_) => "IfExp",
            Expr::Dict(_) => "Dict",
            Expr::Set(_) => "Set",
            Expr::ListComp(_) => "ListComp",
            Expr::SetComp(_) => "SetComp",
            Expr::DictComp(_) => "DictComp",
            Expr::GeneratorExp(_) => "GeneratorExp",
            Expr::Await(_) => "Await",
            Expr::Yield(_) => "Yield",
            Expr::YieldFrom(_) => "YieldFrom",
            Expr::Compare(_) => "Compare",
            Expr::Call(_) => "Call",
            Expr::FormattedValue(_) => "FormattedValue",
            Expr::JoinedStr(_) => "JoinedStr",
            Expr::Constant(_) => "Constant",
            Expr::Attribute(_) => "Attribute",
            Expr::Subscript(_) => "Subscript",
            Expr::Starred(_) => "Starred",
            Expr::Name(_) => "Name",
            Expr::List(_) => "List",
            Expr::Tuple(_) => "Tuple",
            Expr::Slice(_) => "Slice",
        }
    }

    /// The precedence this expression has when printed as written.
    ///
    /// Tuples report `Tuple` even when empty; the printer parenthesizes empty
    /// tuples regardless of position.
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::BoolOp(node) => Precedence::of_bool(node.op),
            Expr::NamedExpr(_) => Precedence::NamedExpr,
            Expr::BinOp(node) => Precedence::of_operator(node.op),
            Expr::UnaryOp(node) => Precedence::of_unary(node.op),
            Expr::Lambda(_) | Expr::IfExp(_) => Precedence::Test,
            Expr::Await(_) => Precedence::Await,
            Expr::Yield(_) | Expr::YieldFrom(_) => Precedence::Yield,
            Expr::Compare(_) => Precedence::Cmp,
            Expr::Tuple(_) => Precedence::Tuple,
            _ => Precedence::Atom,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantValue> {
        match self {
            Expr::Constant(node) => Some(&node.value),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    pub fn name(id: impl Into<String>) -> Expr {
        Expr::Name(Name { id: id.into() })
    }

    pub fn constant(value: ConstantValue) -> Expr {
        Expr::Constant(Constant { value, kind: None })
    }

    pub fn int(value: impl Into<IntLiteral>) -> Expr {
        Expr::constant(ConstantValue::Int(value.into()))
    }

    pub fn float(value: f64) -> Expr {
        Expr::constant(ConstantValue::Float(value))
    }

    pub fn str(value: impl Into<String>) -> Expr {
        Expr::constant(ConstantValue::Str(value.into()))
    }

    pub fn none() -> Expr {
        Expr::constant(ConstantValue::None)
    }

    pub fn ellipsis() -> Expr {
        Expr::constant(ConstantValue::Ellipsis)
    }

    pub fn bool(value: bool) -> Expr {
        Expr::constant(ConstantValue::Bool(value))
    }

    pub fn bin_op(left: Expr, op: Operator, right: Expr) -> Expr {
        Expr::BinOp(BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Expr {
        Expr::UnaryOp(UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn bool_op(op: BoolOperator, values: Vec<Expr>) -> Expr {
        Expr::BoolOp(BoolOp { op, values })
    }

    pub fn compare(left: Expr, ops: Vec<CmpOp>, comparators: Vec<Expr>) -> Expr {
        Expr::Compare(Compare {
            left: Box::new(left),
            ops,
            comparators,
        })
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call(Call {
            func: Box::new(func),
            args,
            keywords: Vec::new(),
        })
    }

    pub fn attribute(value: Expr, attr: impl Into<String>) -> Expr {
        Expr::Attribute(Attribute {
            value: Box::new(value),
            attr: attr.into(),
        })
    }

    pub fn subscript(value: Expr, slice: Expr) -> Expr {
        Expr::Subscript(Subscript {
            value: Box::new(value),
            slice: Box::new(slice),
        })
    }

    pub fn tuple(elts: Vec<Expr>) -> Expr {
        Expr::Tuple(Tuple { elts })
    }

    pub fn list(elts: Vec<Expr>) -> Expr {
        Expr::List(List { elts })
    }

    pub fn if_exp(test: Expr, body: Expr, orelse: Expr) -> Expr {
        Expr::IfExp(IfExp {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    pub fn named(target: Expr, value: Expr) -> Expr {
        Expr::NamedExpr(NamedExpr {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn starred(value: Expr) -> Expr {
        Expr::Starred(Starred {
            value: Box::new(value),
        })
    }

    pub fn yield_(value: Option<Expr>) -> Expr {
        Expr::Yield(Yield {
            value: value.map(Box::new),
        })
    }

    pub fn lambda(args: Arguments, body: Expr) -> Expr {
        Expr::Lambda(Lambda {
            args: Box::new(args),
            body: Box::new(body),
        })
    }
}

// ============================================================================
// Operators and conditionals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolOp {
    pub op: BoolOperator,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub op: Operator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOp {
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    pub args: Box<Arguments>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExp {
    pub test: Box<Expr>,
    pub body: Box<Expr>,
    pub orelse: Box<Expr>,
}

/// A chained comparison; `ops` and `comparators` pair up one to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compare {
    pub left: Box<Expr>,
    pub ops: Vec<CmpOp>,
    pub comparators: Vec<Expr>,
}

// ============================================================================
// Displays and comprehensions
// ============================================================================

/// `None` keys are `**mapping` unpackings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dict {
    #[serde(default)]
    pub keys: Vec<Option<Expr>>,
    #[serde(default)]
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    #[serde(default)]
    pub elts: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default)]
    pub elts: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    #[serde(default)]
    pub elts: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListComp {
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetComp {
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorExp {
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictComp {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

/// One `for ... in ... if ...` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    #[serde(default)]
    pub ifs: Vec<Expr>,
    #[serde(default, with = "flag_serde")]
    pub is_async: bool,
}

// ============================================================================
// Generators and coroutines
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Await {
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yield {
    #[serde(default)]
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldFrom {
    pub value: Box<Expr>,
}

// ============================================================================
// Calls, f-strings, atoms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub func: Box<Expr>,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

/// `arg=value`, or `**value` when `arg` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(default)]
    pub arg: Option<String>,
    pub value: Expr,
}

/// The `{value!c:spec}` part of an f-string.
///
/// `conversion` uses the parser's encoding: `-1` for none, otherwise the
/// character code of `s`, `r` or `a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedValue {
    pub value: Box<Expr>,
    #[serde(default = "no_conversion")]
    pub conversion: i32,
    #[serde(default)]
    pub format_spec: Option<Box<Expr>>,
}

fn no_conversion() -> i32 {
    -1
}

impl FormattedValue {
    pub fn conversion_char(&self) -> Option<char> {
        match self.conversion {
            115 => Some('s'),
            114 => Some('r'),
            97 => Some('a'),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedStr {
    #[serde(default)]
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub value: ConstantValue,
    /// `"u"` for strings written with a `u` prefix.
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: Box<Expr>,
    pub attr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    pub value: Box<Expr>,
    pub slice: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starred {
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    #[serde(default)]
    pub lower: Option<Box<Expr>>,
    #[serde(default)]
    pub upper: Option<Box<Expr>>,
    #[serde(default)]
    pub step: Option<Box<Expr>>,
}

// ============================================================================
// Parameters
// ============================================================================

/// A parameter list.
///
/// `defaults` align with the tail of `posonlyargs + args`; `kw_defaults`
/// align one to one with `kwonlyargs`, `None` meaning no default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub posonlyargs: Vec<Arg>,
    #[serde(default)]
    pub args: Vec<Arg>,
    #[serde(default)]
    pub vararg: Option<Arg>,
    #[serde(default)]
    pub kwonlyargs: Vec<Arg>,
    #[serde(default)]
    pub kw_defaults: Vec<Option<Expr>>,
    #[serde(default)]
    pub kwarg: Option<Arg>,
    #[serde(default)]
    pub defaults: Vec<Expr>,
}

impl Arguments {
    /// Plain positional parameters without defaults or annotations.
    pub fn simple<I, S>(names: I) -> Arguments
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arguments {
            args: names.into_iter().map(Arg::new).collect(),
            ..Arguments::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.posonlyargs.is_empty()
            && self.args.is_empty()
            && self.vararg.is_none()
            && self.kwonlyargs.is_empty()
            && self.kwarg.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub arg: String,
    #[serde(default)]
    pub annotation: Option<Box<Expr>>,
}

impl Arg {
    pub fn new(name: impl Into<String>) -> Arg {
        Arg {
            arg: name.into(),
            annotation: None,
        }
    }
}
