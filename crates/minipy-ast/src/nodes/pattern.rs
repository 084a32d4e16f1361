// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `match` statement patterns.

use serde::{Deserialize, Serialize};

use super::expression::Expr;
use crate::literal::ConstantValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Pattern {
    MatchValue {
        value: Box<Expr>,
    },
    /// `None`, `True` or `False`.
    MatchSingleton {
        value: ConstantValue,
    },
    MatchSequence {
        #[serde(default)]
        patterns: Vec<Pattern>,
    },
    /// `keys` and `patterns` pair up; `rest` is the `**name` capture.
    MatchMapping {
        #[serde(default)]
        keys: Vec<Expr>,
        #[serde(default)]
        patterns: Vec<Pattern>,
        #[serde(default)]
        rest: Option<String>,
    },
    MatchClass {
        cls: Box<Expr>,
        #[serde(default)]
        patterns: Vec<Pattern>,
        #[serde(default)]
        kwd_attrs: Vec<String>,
        #[serde(default)]
        kwd_patterns: Vec<Pattern>,
    },
    MatchStar {
        #[serde(default)]
        name: Option<String>,
    },
    /// `pattern as name`, a bare capture, or `_` when both are absent.
    MatchAs {
        #[serde(default)]
        pattern: Option<Box<Pattern>>,
        #[serde(default)]
        name: Option<String>,
    },
    MatchOr {
        patterns: Vec<Pattern>,
    },
}

impl Pattern {
    pub fn capture(name: impl Into<String>) -> Pattern {
        Pattern::MatchAs {
            pattern: None,
            name: Some(name.into()),
        }
    }

    pub fn wildcard() -> Pattern {
        Pattern::MatchAs {
            pattern: None,
            name: None,
        }
    }

    pub fn value(value: Expr) -> Pattern {
        Pattern::MatchValue {
            value: Box::new(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_deserializes_from_empty_match_as() {
        let pattern: Pattern =
            serde_json::from_str(r#"{"_type": "MatchAs", "pattern": null, "name": null}"#).unwrap();
        assert_eq!(pattern, Pattern::wildcard());
    }

    #[test]
    fn or_pattern_nests() {
        let json = r#"{"_type": "MatchOr", "patterns": [
            {"_type": "MatchValue", "value": {"_type": "Constant", "value": {"type": "int", "value": 1}}},
            {"_type": "MatchAs", "name": "x"}
        ]}"#;
        let Pattern::MatchOr { patterns } = serde_json::from_str::<Pattern>(json).unwrap() else {
            panic!("expected an or-pattern");
        };
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[1], Pattern::capture("x"));
    }
}
