//! Block compaction.
//!
//! Joins a block header with its body when the body is a single physical
//! line, so `if a:\n x=1;y=2` becomes `if a:x=1;y=2`. A body that opens a
//! block itself is never pulled up: `if a:if b:x` is not valid source.

use tracing::trace;

use crate::codegen::{is_word_char, BLOCK_KEYWORDS};

fn indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// True when `line` starts a compound statement or a decorator.
fn opens_block(line: &str) -> bool {
    let text = line.trim_start();
    if text.starts_with('@') {
        return true;
    }
    BLOCK_KEYWORDS.iter().any(|keyword| {
        text.strip_prefix(keyword)
            .is_some_and(|rest| !rest.starts_with(is_word_char))
    })
}

/// Pull single-line block bodies up onto their headers.
pub fn compact(source: &str) -> String {
    let mut lines: Vec<String> = source
        .split('\n')
        .map(|line| {
            line.trim_end_matches(|c: char| c.is_whitespace() || c == ';')
                .to_string()
        })
        .collect();

    let count = lines.len();
    let mut removed: Vec<usize> = Vec::new();
    for i in 0..count {
        if removed.last() == Some(&i) || !lines[i].ends_with(':') || i + 1 == count {
            continue;
        }
        let header = indent(&lines[i]);
        let body = &lines[i + 1];
        if i + 2 < count {
            let next = indent(&lines[i + 2]);
            if header >= indent(body) || header < next {
                continue;
            }
        }
        if opens_block(body) {
            continue;
        }
        let body = body.trim().to_string();
        lines[i].push_str(&body);
        removed.push(i + 1);
    }

    trace!(merged = removed.len(), "compacted blocks");
    for (offset, index) in removed.into_iter().enumerate() {
        lines.remove(index - offset);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_bodies_are_pulled_up() {
        assert_eq!(compact("if True:\n x=1;y=2;"), "if True:x=1;y=2");
        assert_eq!(compact("if True:\n return...;"), "if True:return...");
    }

    #[test]
    fn blocks_with_more_lines_stay() {
        let text = "if a:\n if b:\n  x=1;\n y=2;";
        assert_eq!(compact(text), "if a:\n if b:x=1\n y=2");
    }

    #[test]
    fn sibling_statements_keep_the_header_apart() {
        let text = "def f():\n x=1;\n if x:\n  pass;\nf();";
        assert_eq!(compact(text), "def f():\n x=1\n if x:pass\nf()");
    }

    #[test]
    fn nested_headers_never_merge() {
        let text = "if a:\n if b:\n  x=1;\nz=2;";
        let once = compact(text);
        assert_eq!(once, "if a:\n if b:x=1\nz=2");
        assert_eq!(compact(&once), once);
    }

    #[test]
    fn decorators_and_clauses() {
        let text = "class C:\n @d\n def f(s):\n  pass;\nelse_=1;";
        assert_eq!(compact(text), "class C:\n @d\n def f(s):pass\nelse_=1");
        assert_eq!(compact("try:\n f();\nfinally:\n g();"), "try:f()\nfinally:g()");
    }

    #[test]
    fn identifiers_that_start_with_keywords_are_bodies() {
        assert_eq!(compact("if a:\n iffy=1;\nb=2;"), "if a:iffy=1\nb=2");
    }

    #[test]
    fn idempotent() {
        let text = "while x:\n for y in z:\n  g(y);\n h();\nelse:\n pass;";
        let once = compact(text);
        assert_eq!(compact(&once), once);
    }
}
