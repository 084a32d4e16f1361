//! Tree-to-text printer.
//!
//! [`CodegenState`] is the token buffer: it tracks nesting depth, decides
//! when a statement starts a new physical line, and inserts the single
//! spaces keywords need. [`Printer`] walks a [`Module`] depth-first and
//! writes the shortest source it knows for every node, passing the required
//! precedence down so parentheses appear only where the grammar needs them.
//!
//! ```
//! use minipy::codegen::Printer;
//! use minipy_ast::{Expr, Module, Stmt};
//!
//! let module = Module::new(vec![Stmt::if_(
//!     Expr::bool(true),
//!     vec![
//!         Stmt::assign(vec![Expr::name("x")], Expr::int(1u32)),
//!         Stmt::assign(vec![Expr::name("y")], Expr::int(2u32)),
//!     ],
//!     vec![],
//! )]);
//! let text = Printer::minimizer().render(&module).unwrap();
//! assert_eq!(text, "if True:\n x=1;y=2;");
//! ```

mod expression;
pub mod literal;
mod statement;
pub mod terminator;

use minipy_ast::{Alias, Module};
use tracing::trace;

use crate::error::RenderError;
pub use terminator::{HookTable, Terminators};

/// Keywords that open a compound statement (or one of its clauses).
pub const BLOCK_KEYWORDS: &[&str] = &[
    "try", "else", "finally", "except", "class", "def", "if", "elif", "while", "with", "match",
    "for", "async",
];

/// True when `c` can continue an identifier or a number.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || !c.is_ascii()
}

// ============================================================================
// Token buffer
// ============================================================================

/// Output buffer plus the indentation state of one printing pass.
#[derive(Debug, Default)]
pub struct CodegenState {
    pub tokens: String,
    depth: usize,
    line_depth: usize,
    pending_space: bool,
}

impl CodegenState {
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append punctuation, a name or a literal.
    ///
    /// A space is inserted only when the previous token was a keyword and
    /// this one would otherwise fuse with it.
    pub fn add_token(&mut self, tok: &str) {
        if self.pending_space && tok.chars().next().is_some_and(is_word_char) {
            self.tokens.push(' ');
        }
        self.pending_space = false;
        self.tokens.push_str(tok);
    }

    /// Append a keyword, separated from a preceding word, number or `.`.
    pub fn add_keyword(&mut self, kw: &str) {
        if self
            .tokens
            .chars()
            .next_back()
            .is_some_and(|c| is_word_char(c) || c == '.')
        {
            self.tokens.push(' ');
        }
        self.tokens.push_str(kw);
        self.pending_space = true;
    }

    /// Start a new physical line at the current depth.
    pub fn add_newline(&mut self) {
        if !self.tokens.is_empty() {
            self.tokens.push('\n');
        }
        for _ in 0..self.depth {
            self.tokens.push(' ');
        }
        self.line_depth = self.depth;
        self.pending_space = false;
    }

    /// Line-fill policy: decide whether the next statement shares the
    /// current line.
    pub fn begin_statement(&mut self, opens_block: bool) {
        if self.tokens.is_empty()
            || opens_block
            || self.depth != self.line_depth
            || self.tokens.ends_with(':')
        {
            self.add_newline();
        }
    }

    pub fn ends_with(&self, c: char) -> bool {
        self.tokens.ends_with(c)
    }
}

// ============================================================================
// Printer
// ============================================================================

/// One printing pass over a module.
///
/// The import buffer and the token buffer belong to the instance; render
/// concurrent trees with separate printers.
#[derive(Debug)]
pub struct Printer {
    state: CodegenState,
    hooks: HookTable,
    imports: Vec<Alias>,
}

impl Printer {
    pub fn new(terminators: &Terminators) -> Self {
        Printer {
            state: CodegenState::default(),
            hooks: HookTable::from_terminators(terminators),
            imports: Vec::new(),
        }
    }

    /// The configuration used for minimization: imports are terminated by
    /// the coalescing flush rather than by a hook.
    pub fn minimizer() -> Self {
        Printer::new(&Terminators::minimizer())
    }

    pub fn hooks_mut(&mut self) -> &mut HookTable {
        &mut self.hooks
    }

    /// Render `module`. The printer can be reused afterwards.
    pub fn render(&mut self, module: &Module) -> Result<String, RenderError> {
        self.state = CodegenState::default();
        self.imports.clear();
        let result = self.statements(&module.body, true);
        let tokens = std::mem::take(&mut self.state.tokens);
        self.imports.clear();
        result?;
        trace!(bytes = tokens.len(), "rendered module");
        Ok(tokens)
    }

    /// Emit `(`...`)` around `f` when `needed`.
    pub(crate) fn parenthesize<F>(&mut self, needed: bool, f: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        if needed {
            self.state.add_token("(");
        }
        f(self)?;
        if needed {
            self.state.add_token(")");
        }
        Ok(())
    }

    /// Run `f` against a fresh buffer and return what it wrote.
    pub(crate) fn detached<F>(&mut self, f: F) -> Result<String, RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        let saved = std::mem::take(&mut self.state);
        let result = f(self);
        let out = std::mem::replace(&mut self.state, saved);
        result.map(|()| out.tokens)
    }

    /// Write `items` separated by commas.
    pub(crate) fn comma_separated<T, F>(&mut self, items: &[T], mut f: F) -> Result<(), RenderError>
    where
        F: FnMut(&mut Self, &T) -> Result<(), RenderError>,
    {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.state.add_token(",");
            }
            f(self, item)?;
        }
        Ok(())
    }

    /// Write a name, rejecting anything that is not an identifier.
    pub(crate) fn identifier(&mut self, node: &'static str, name: &str) -> Result<(), RenderError> {
        if !is_identifier(name) {
            return Err(RenderError::malformed(
                node,
                format!("'{}' is not an identifier", name),
            ));
        }
        self.state.add_token(name);
        Ok(())
    }
}

/// Identifier check: a letter, `_` or non-ASCII start, word characters after.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() || !first.is_ascii() => {
            chars.all(is_word_char)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_space_only_between_words() {
        let mut state = CodegenState::default();
        state.add_keyword("return");
        state.add_token("...");
        assert_eq!(state.tokens, "return...");

        let mut state = CodegenState::default();
        state.add_keyword("return");
        state.add_token("x");
        assert_eq!(state.tokens, "return x");

        let mut state = CodegenState::default();
        state.add_token("'s'");
        state.add_keyword("in");
        state.add_token("x");
        assert_eq!(state.tokens, "'s'in x");

        let mut state = CodegenState::default();
        state.add_token("1");
        state.add_keyword("if");
        state.add_token("(");
        assert_eq!(state.tokens, "1 if(");
    }

    #[test]
    fn consecutive_keywords_are_separated() {
        let mut state = CodegenState::default();
        state.add_token("a");
        state.add_keyword("is");
        state.add_keyword("not");
        state.add_token("b");
        assert_eq!(state.tokens, "a is not b");
    }

    #[test]
    fn line_fill() {
        let mut state = CodegenState::default();
        state.begin_statement(false);
        state.add_token("x=1;");
        state.begin_statement(false);
        state.add_token("y=2;");
        assert_eq!(state.tokens, "x=1;y=2;");

        state.begin_statement(true);
        state.add_keyword("if");
        state.add_token("x:");
        state.indent();
        state.begin_statement(false);
        state.add_keyword("pass");
        state.add_token(";");
        state.dedent();
        state.begin_statement(false);
        state.add_token("z=3;");
        assert_eq!(state.tokens, "x=1;y=2;\nif x:\n pass;\nz=3;");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("_x1"));
        assert!(is_identifier("ñame"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
