//! End-to-end tests: parser JSON dumps in, shortest source out.

use minipy::{
    minimize, minimize_candidate, minimize_tree, restore, Codec, MinimizeInput, MinimizeOptions,
    Origin, ParseFailure, Restored, SourceParser,
};
use minipy_ast::{Document, Expr, Module, Stmt};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn plain() -> MinimizeOptions {
    MinimizeOptions {
        compress: false,
        ..MinimizeOptions::default()
    }
}

fn minimize_json(json: &str) -> String {
    let document = Document::from_json(json).unwrap();
    minimize(MinimizeInput::Document(&document), &plain()).unwrap()
}

fn name(id: &str) -> String {
    format!(r#"{{"_type": "Name", "id": "{}", "ctx": {{"_type": "Load"}}}}"#, id)
}

fn int(value: u64) -> String {
    format!(
        r#"{{"_type": "Constant", "value": {{"type": "int", "value": {}}}}}"#,
        value
    )
}

// ============================================================================
// Printer + compaction
// ============================================================================

#[test]
fn single_line_if_body_joins_its_header() {
    let json = format!(
        r#"{{"_type": "Module", "type_ignores": [], "body": [
            {{"_type": "If",
              "test": {{"_type": "Constant", "value": {{"type": "bool", "value": true}}}},
              "body": [
                {{"_type": "Assign", "targets": [{x}], "value": {one}, "lineno": 2}},
                {{"_type": "Assign", "targets": [{y}], "value": {two}, "lineno": 3}}
              ],
              "orelse": []}}
        ]}}"#,
        x = name("x"),
        y = name("y"),
        one = int(1),
        two = int(2),
    );
    assert_eq!(minimize_json(&json), "if True:x=1;y=2");
}

#[test]
fn return_ellipsis() {
    let json = r#"{"_type": "Module", "body": [
        {"_type": "If",
         "test": {"_type": "Constant", "value": {"type": "bool", "value": true}},
         "body": [{"_type": "Return", "value": {"_type": "Constant", "value": {"type": "ellipsis"}}}]}
    ]}"#;
    assert_eq!(minimize_json(json), "if True:return...");
}

#[test]
fn function_with_docstring_and_imports() {
    let json = r#"{"_type": "Module", "body": [
        {"_type": "Import", "names": [{"_type": "alias", "name": "os"}]},
        {"_type": "Import", "names": [{"_type": "alias", "name": "sys"}]},
        {"_type": "FunctionDef", "name": "main",
         "args": {"_type": "arguments", "posonlyargs": [], "args": [{"_type": "arg", "arg": "argv"}],
                  "kwonlyargs": [], "kw_defaults": [], "defaults": []},
         "decorator_list": [],
         "body": [
            {"_type": "Expr", "value": {"_type": "Constant", "value": {"type": "str", "value": "\n    Entry point.\n    "}}},
            {"_type": "If",
             "test": {"_type": "Compare",
                      "left": {"_type": "Call", "func": {"_type": "Name", "id": "len"},
                               "args": [{"_type": "Name", "id": "argv"}], "keywords": []},
                      "ops": [{"_type": "Gt"}],
                      "comparators": [{"_type": "Constant", "value": {"type": "int", "value": 1}}]},
             "body": [{"_type": "Return",
                       "value": {"_type": "Subscript", "value": {"_type": "Name", "id": "argv"},
                                 "slice": {"_type": "Constant", "value": {"type": "int", "value": 1}}}}],
             "orelse": []},
            {"_type": "Return", "value": {"_type": "Constant", "value": {"type": "none"}}}
         ]}
    ]}"#;
    assert_eq!(
        minimize_json(json),
        "import os,sys\ndef main(argv):\n 'Entry point.'\n if len(argv)>1:return argv[1]\n return None"
    );
}

#[test]
fn operators_keep_only_required_parentheses() {
    // (a + b) * c ** -d
    let json = r#"{"_type": "Module", "body": [{"_type": "Expr", "value":
        {"_type": "BinOp",
         "left": {"_type": "BinOp", "left": {"_type": "Name", "id": "a"}, "op": {"_type": "Add"},
                  "right": {"_type": "Name", "id": "b"}},
         "op": {"_type": "Mult"},
         "right": {"_type": "BinOp", "left": {"_type": "Name", "id": "c"}, "op": {"_type": "Pow"},
                   "right": {"_type": "UnaryOp", "op": {"_type": "USub"},
                             "operand": {"_type": "Name", "id": "d"}}}}}]}"#;
    assert_eq!(minimize_json(json), "(a+b)*c**-d");
}

#[test]
fn large_round_numbers_become_powers() {
    let json = format!(
        r#"{{"_type": "Module", "body": [
            {{"_type": "Assign", "targets": [{a}], "value": {big}}},
            {{"_type": "Assign", "targets": [{b}], "value": {pow2}}},
            {{"_type": "Assign", "targets": [{c}], "value": {plain}}}
        ]}}"#,
        a = name("a"),
        b = name("b"),
        c = name("c"),
        big = int(1_000_000_000),
        pow2 = int(1 << 20),
        plain = int(10_000),
    );
    assert_eq!(minimize_json(&json), "a=10**9;b=2**20;c=10000");
}

fn float(literal: &str) -> String {
    format!(
        r#"{{"_type": "Constant", "value": {{"type": "float", "value": {}}}}}"#,
        literal
    )
}

fn bin_op(left: &str, op: &str, right: &str) -> String {
    format!(
        r#"{{"_type": "BinOp", "left": {}, "op": {{"_type": "{}"}}, "right": {}}}"#,
        left, op, right
    )
}

#[test]
fn nested_expression_keeps_exact_constants() {
    // r = -(a + 1971.5909503065513) * (b - 0.9468822170900693) ** 2
    //     / c[1.7976931348623157e308, 5e-324]
    let negated = format!(
        r#"{{"_type": "UnaryOp", "op": {{"_type": "USub"}}, "operand": {}}}"#,
        bin_op(&name("a"), "Add", &float("1971.5909503065513"))
    );
    let squared = bin_op(
        &bin_op(&name("b"), "Sub", &float("0.9468822170900693")),
        "Pow",
        &int(2),
    );
    let indexed = format!(
        r#"{{"_type": "Subscript", "value": {}, "slice": {{"_type": "Tuple", "elts": [{}, {}]}}}}"#,
        name("c"),
        float("1.7976931348623157e308"),
        float("5e-324")
    );
    let value = bin_op(&bin_op(&negated, "Mult", &squared), "Div", &indexed);
    let json = format!(
        r#"{{"_type": "Module", "body": [{{"_type": "Assign", "targets": [{}], "value": {}}}]}}"#,
        name("r"),
        value
    );

    let document = Document::from_json(&json).unwrap();
    assert_eq!(
        minimize_tree(&document.tree).unwrap(),
        "r=-(a+1971.5909503065513)*(b-.9468822170900693)**2/c[17976931348623157e292,5e-324]"
    );
}

#[test]
fn nested_blocks_stay_valid() {
    let module = Module::new(vec![
        Stmt::if_(
            Expr::name("a"),
            vec![Stmt::if_(Expr::name("b"), vec![Stmt::pass()], vec![])],
            vec![],
        ),
        Stmt::pass(),
    ]);
    assert_eq!(minimize_tree(&module).unwrap(), "if a:\n if b:pass\npass");
}

#[test]
fn malformed_tree_is_rejected() {
    let json = r#"{"_type": "Module", "body": [{"_type": "While",
        "test": {"_type": "Name", "id": "x"}, "body": []}]}"#;
    let document = Document::from_json(json).unwrap();
    let err = minimize(MinimizeInput::Document(&document), &plain()).unwrap_err();
    assert!(err.to_string().contains("empty block"), "{}", err);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn shorter_raw_source_is_kept() {
    let json = format!(
        r#"{{"source": "x=1", "tree": {{"_type": "Module", "body": [
            {{"_type": "Assign", "targets": [{x}], "value": {one}}}]}}}}"#,
        x = name("x"),
        one = int(1),
    );
    let document = Document::from_json(&json).unwrap();
    let candidate =
        minimize_candidate(MinimizeInput::Document(&document), &MinimizeOptions::default())
            .unwrap();
    assert_eq!(candidate.origin, Origin::Raw);
    assert_eq!(candidate.text, "x=1");
}

#[test]
fn repetitive_program_compresses_and_restores() {
    let body: Vec<Stmt> = (0..300)
        .map(|i| {
            Stmt::expr(Expr::call(
                Expr::name("print"),
                vec![Expr::str(format!("line {}", i % 7))],
            ))
        })
        .collect();
    let module = Module::new(body);
    let plain_text = minimize_tree(&module).unwrap();

    let candidate =
        minimize_candidate(MinimizeInput::Tree(&module), &MinimizeOptions::default()).unwrap();
    assert!(matches!(candidate.origin, Origin::Stub(_)));
    assert!(candidate.text.len() < plain_text.len());

    match restore(&candidate.text) {
        Restored::Decoded { text, .. } => assert_eq!(text, plain_text),
        other => panic!("expected a decoded stub, got {:?}", other),
    }
}

#[test]
fn forced_compression_wraps_even_tiny_programs() {
    let module = Module::new(vec![Stmt::pass()]);
    let options = MinimizeOptions {
        force_compress: true,
        ..MinimizeOptions::default()
    };
    let text = minimize(MinimizeInput::Tree(&module), &options).unwrap();
    assert!(text.starts_with("exec(__import__("), "{}", text);
    assert_eq!(restore(&text).into_text(), "pass");
}

#[test]
fn zstd_is_opt_in() {
    let module = Module::new(vec![Stmt::expr(Expr::str("z".repeat(2000)))]);
    let options = MinimizeOptions {
        codecs: vec![Codec::Zstd],
        ..MinimizeOptions::default()
    };
    let candidate = minimize_candidate(MinimizeInput::Tree(&module), &options).unwrap();
    assert!(matches!(
        candidate.origin,
        Origin::Stub(Codec::Zstd) | Origin::Stub(Codec::LzmaAlone)
    ));
}

// ============================================================================
// Parser seam
// ============================================================================

struct PassParser;

impl SourceParser for PassParser {
    fn parse(&self, source: &str) -> Result<Module, ParseFailure> {
        if source.trim() == "pass" {
            Ok(Module::new(vec![Stmt::pass()]))
        } else {
            Err(ParseFailure::new("only `pass` is supported"))
        }
    }
}

#[test]
fn source_input_goes_through_the_parser() {
    let text = minimize(
        MinimizeInput::Source {
            text: "pass  # comment\n",
            parser: &PassParser,
        },
        &plain(),
    );
    assert!(text.is_err());

    let text = minimize(
        MinimizeInput::Source {
            text: "   pass   ",
            parser: &PassParser,
        },
        &plain(),
    )
    .unwrap();
    assert_eq!(text, "pass");
}
