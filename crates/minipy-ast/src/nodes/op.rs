// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Operator vocabulary of the syntax tree.
//!
//! Every operator knows its source spelling. Precedence and associativity
//! live in [`crate::precedence`].

use serde::{Deserialize, Serialize};

/// Binary arithmetic and bitwise operators (`BinOp`, `AugAssign`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Operator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mult => "*",
            Operator::MatMult => "@",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "**",
            Operator::LShift => "<<",
            Operator::RShift => ">>",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitAnd => "&",
            Operator::FloorDiv => "//",
        }
    }
}

/// Prefix operators (`UnaryOp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum UnaryOperator {
    Invert,
    Not,
    UAdd,
    USub,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Invert => "~",
            UnaryOperator::Not => "not",
            UnaryOperator::UAdd => "+",
            UnaryOperator::USub => "-",
        }
    }

    /// `not` is a keyword and needs word separation; the others are punctuation.
    pub fn is_keyword(self) -> bool {
        matches!(self, UnaryOperator::Not)
    }
}

/// Short-circuit operators (`BoolOp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    pub fn keyword(self) -> &'static str {
        match self {
            BoolOperator::And => "and",
            BoolOperator::Or => "or",
        }
    }
}

/// Comparison operators (`Compare`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// How a comparison operator is spelled: punctuation or one or two keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpSpelling {
    Symbol(&'static str),
    Keywords(&'static [&'static str]),
}

impl CmpOp {
    pub fn spelling(self) -> CmpSpelling {
        match self {
            CmpOp::Eq => CmpSpelling::Symbol("=="),
            CmpOp::NotEq => CmpSpelling::Symbol("!="),
            CmpOp::Lt => CmpSpelling::Symbol("<"),
            CmpOp::LtE => CmpSpelling::Symbol("<="),
            CmpOp::Gt => CmpSpelling::Symbol(">"),
            CmpOp::GtE => CmpSpelling::Symbol(">="),
            CmpOp::Is => CmpSpelling::Keywords(&["is"]),
            CmpOp::IsNot => CmpSpelling::Keywords(&["is", "not"]),
            CmpOp::In => CmpSpelling::Keywords(&["in"]),
            CmpOp::NotIn => CmpSpelling::Keywords(&["not", "in"]),
        }
    }
}
