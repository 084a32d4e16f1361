// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

pub mod expression;
pub mod op;
pub mod pattern;
pub mod statement;

pub use expression::{
    Arg, Arguments, Attribute, Await, BinOp, BoolOp, Call, Compare, Comprehension, Constant,
    Dict, DictComp, Expr, FormattedValue, GeneratorExp, IfExp, JoinedStr, Keyword, Lambda, List,
    ListComp, Name, NamedExpr, Set, SetComp, Slice, Starred, Subscript, Tuple, UnaryOp, Yield,
    YieldFrom,
};
pub use op::{BoolOperator, CmpOp, CmpSpelling, Operator, UnaryOperator};
pub use pattern::Pattern;
pub use statement::{
    Alias, AnnAssign, Assert, Assign, AugAssign, ClassDef, Delete, ExceptHandler, ExprStmt, For,
    FunctionDef, Global, If, Import, ImportFrom, Match, MatchCase, Module, Nonlocal, Raise,
    Return, Stmt, StmtKind, Try, TypeAlias, TypeParam, While, With, WithItem,
};
