// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Python syntax tree model for the minipy printer.
//!
//! This crate holds the owned, immutable tree that the printer walks. Nodes
//! deserialize from a JSON dump of the parser's `ast` tree, where every node
//! object names its class in a `_type` field.
//!
//! # Overview
//!
//! - **Nodes**: [`Module`], [`Stmt`], [`Expr`], [`Pattern`] and their helper
//!   structs, in [`nodes`].
//! - **Literals**: [`ConstantValue`] and the arbitrary precision
//!   [`IntLiteral`].
//! - **Precedence**: the ordered [`Precedence`] levels and per-operator
//!   [`Associativity`].
//! - **Documents**: [`Document`] accepts a bare module dump or an envelope
//!   that also carries the original source text.
//!
//! # Quick Start
//!
//! ```
//! use minipy_ast::{Document, Stmt};
//!
//! let json = r#"{"_type": "Module", "body": [{"_type": "Pass"}]}"#;
//! let doc = Document::from_json(json).unwrap();
//! assert_eq!(doc.tree.body, vec![Stmt::pass()]);
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

pub mod document;
pub mod literal;
pub mod nodes;
pub mod precedence;

pub use document::Document;
pub use literal::{ConstantValue, IntLiteral, LiteralError};
pub use nodes::*;
pub use precedence::{Associativity, Precedence};
