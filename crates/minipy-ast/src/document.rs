// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JSON documents produced by the parser collaborator.
//!
//! Two shapes are accepted: a bare `Module` dump, or an envelope
//! `{"source": "...", "tree": {...}}` that also carries the original text.

use serde_json::Value;

use crate::nodes::Module;

/// A parsed tree plus, when the envelope supplied it, the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source: Option<String>,
    pub tree: Module,
}

impl Document {
    pub fn from_json(text: &str) -> Result<Document, serde_json::Error> {
        let mut value: Value = serde_json::from_str(text)?;
        match value.as_object_mut().and_then(|map| map.remove("tree")) {
            Some(tree) => {
                let source = match value.get("source") {
                    Some(Value::String(s)) => Some(s.clone()),
                    _ => None,
                };
                Ok(Document {
                    source,
                    tree: serde_json::from_value(tree)?,
                })
            }
            None => Ok(Document {
                source: None,
                tree: serde_json::from_value(value)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Stmt;

    #[test]
    fn bare_module() {
        let doc = Document::from_json(r#"{"_type": "Module", "body": [{"_type": "Pass"}]}"#).unwrap();
        assert_eq!(doc.source, None);
        assert_eq!(doc.tree.body, vec![Stmt::pass()]);
    }

    #[test]
    fn envelope_with_source() {
        let doc = Document::from_json(
            r#"{"source": "pass\n", "tree": {"_type": "Module", "body": [{"_type": "Pass"}]}}"#,
        )
        .unwrap();
        assert_eq!(doc.source.as_deref(), Some("pass\n"));
        assert_eq!(doc.tree.body.len(), 1);
    }

    #[test]
    fn malformed_tree_is_an_error() {
        assert!(Document::from_json(r#"{"tree": {"body": [{"_type": "Nope"}]}}"#).is_err());
        assert!(Document::from_json("not json").is_err());
    }

    #[test]
    fn float_constants_keep_every_bit() {
        use crate::literal::ConstantValue;
        use crate::nodes::Expr;

        for literal in [
            "1971.5909503065513",
            "0.9468822170900693",
            "1.7976931348623157e308",
            "5e-324",
        ] {
            let json = format!(
                r#"{{"_type": "Module", "body": [{{"_type": "Expr", "value":
                    {{"_type": "Constant", "value": {{"type": "float", "value": {}}}}}}}]}}"#,
                literal
            );
            let doc = Document::from_json(&json).unwrap();
            let value = match &doc.tree.body[0] {
                Stmt::Expr(stmt) => match &stmt.value {
                    Expr::Constant(constant) => constant.value.clone(),
                    other => panic!("expected a constant, got {:?}", other),
                },
                other => panic!("expected an expression statement, got {:?}", other),
            };
            let expected: f64 = literal.parse().unwrap();
            match value {
                ConstantValue::Float(found) => {
                    assert_eq!(found.to_bits(), expected.to_bits(), "{}", literal)
                }
                other => panic!("expected a float, got {:?}", other),
            }
        }
    }
}
