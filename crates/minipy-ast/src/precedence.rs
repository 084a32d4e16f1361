// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Operator precedence table.
//!
//! Levels are ordered loosest to tightest. A printer asks for the level an
//! expression *has* and compares it against the level its position
//! *requires*; parentheses are needed exactly when the former is lower.
//!
//! ```
//! use minipy_ast::{Associativity, Operator, Precedence};
//!
//! assert!(Precedence::Arith < Precedence::Term);
//! assert_eq!(Precedence::of_operator(Operator::Pow), Precedence::Power);
//! assert_eq!(Operator::Pow.associativity(), Associativity::Right);
//! assert_eq!(Precedence::Atom.next(), Precedence::Atom);
//! ```

use crate::nodes::{BoolOperator, Operator, UnaryOperator};

/// Binding strength of an expression position, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// `target := value`
    NamedExpr,
    /// `a, b`
    Tuple,
    /// `yield`, `yield from`
    Yield,
    /// `x if c else y`, `lambda`
    Test,
    Or,
    And,
    Not,
    /// `<`, `==`, `in`, `is`, ...
    Cmp,
    /// `|`; also the level of a plain expression
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    /// `+`, `-`
    Arith,
    /// `*`, `@`, `/`, `%`, `//`
    Term,
    /// unary `+`, `-`, `~`
    Factor,
    Power,
    Await,
    Atom,
}

impl Precedence {
    /// A bare expression (starred operands, `**` in dict displays).
    pub const EXPR: Precedence = Precedence::BitOr;

    const ORDER: [Precedence; 18] = [
        Precedence::NamedExpr,
        Precedence::Tuple,
        Precedence::Yield,
        Precedence::Test,
        Precedence::Or,
        Precedence::And,
        Precedence::Not,
        Precedence::Cmp,
        Precedence::BitOr,
        Precedence::BitXor,
        Precedence::BitAnd,
        Precedence::Shift,
        Precedence::Arith,
        Precedence::Term,
        Precedence::Factor,
        Precedence::Power,
        Precedence::Await,
        Precedence::Atom,
    ];

    /// The next tighter level; `Atom` is its own successor.
    pub fn next(self) -> Precedence {
        let index = self as usize;
        Self::ORDER
            .get(index + 1)
            .copied()
            .unwrap_or(Precedence::Atom)
    }

    pub fn of_operator(op: Operator) -> Precedence {
        match op {
            Operator::Add | Operator::Sub => Precedence::Arith,
            Operator::Mult
            | Operator::MatMult
            | Operator::Div
            | Operator::Mod
            | Operator::FloorDiv => Precedence::Term,
            Operator::LShift | Operator::RShift => Precedence::Shift,
            Operator::BitOr => Precedence::BitOr,
            Operator::BitXor => Precedence::BitXor,
            Operator::BitAnd => Precedence::BitAnd,
            Operator::Pow => Precedence::Power,
        }
    }

    pub fn of_unary(op: UnaryOperator) -> Precedence {
        match op {
            UnaryOperator::Not => Precedence::Not,
            UnaryOperator::Invert | UnaryOperator::UAdd | UnaryOperator::USub => {
                Precedence::Factor
            }
        }
    }

    pub fn of_bool(op: BoolOperator) -> Precedence {
        match op {
            BoolOperator::And => Precedence::And,
            BoolOperator::Or => Precedence::Or,
        }
    }
}

/// Which side of a binary operator may hold an operand of equal precedence
/// without parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Operator {
    pub fn associativity(self) -> Associativity {
        match self {
            Operator::Pow => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Required precedence of the `(left, right)` operands.
    ///
    /// The operand on the associative side may sit at the operator's own
    /// level; the other side must bind strictly tighter.
    pub fn operand_precedence(self) -> (Precedence, Precedence) {
        let own = Precedence::of_operator(self);
        match self.associativity() {
            Associativity::Left => (own, own.next()),
            Associativity::Right => (own.next(), own),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_discriminants() {
        for (index, level) in Precedence::ORDER.iter().enumerate() {
            assert_eq!(*level as usize, index);
        }
    }

    #[test]
    fn next_is_strictly_tighter_until_atom() {
        let mut level = Precedence::NamedExpr;
        while level != Precedence::Atom {
            let tighter = level.next();
            assert!(tighter > level);
            level = tighter;
        }
        assert_eq!(Precedence::Atom.next(), Precedence::Atom);
    }

    #[test]
    fn expr_alias_is_bitor() {
        assert_eq!(Precedence::EXPR, Precedence::BitOr);
        assert_eq!(Precedence::EXPR.next(), Precedence::BitXor);
    }

    #[test]
    fn subtraction_is_left_associative() {
        let (left, right) = Operator::Sub.operand_precedence();
        assert_eq!(left, Precedence::Arith);
        assert_eq!(right, Precedence::Term);
    }

    #[test]
    fn power_is_right_associative() {
        let (left, right) = Operator::Pow.operand_precedence();
        assert_eq!(left, Precedence::Await);
        assert_eq!(right, Precedence::Power);
    }

    #[test]
    fn unary_levels() {
        assert_eq!(Precedence::of_unary(UnaryOperator::Not), Precedence::Not);
        assert_eq!(Precedence::of_unary(UnaryOperator::USub), Precedence::Factor);
        assert!(Precedence::of_bool(BoolOperator::Or) < Precedence::of_bool(BoolOperator::And));
    }
}
