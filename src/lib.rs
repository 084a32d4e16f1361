//! minipy: shortest equivalent source for Python syntax trees
//!
//! Takes a parsed Python tree (see [`minipy_ast`]) and produces the shortest
//! program it knows that behaves the same, optionally wrapped in a
//! self-extracting compressed stub. The pipeline is:
//!
//! 1. [`codegen::Printer`] renders the tree with minimal parentheses and
//!    spacing, many statements per line.
//! 2. [`compact::compact`] pulls single-line block bodies up onto their
//!    headers.
//! 3. [`select::select`] keeps the shortest of the raw source, the
//!    minimized text and the codec stubs.
//!
//! ```
//! use minipy::{minimize, MinimizeInput, MinimizeOptions};
//! use minipy_ast::{Expr, Module, Stmt};
//!
//! let module = Module::new(vec![Stmt::if_(
//!     Expr::bool(true),
//!     vec![Stmt::return_(Some(Expr::ellipsis()))],
//!     vec![],
//! )]);
//! let text = minimize(MinimizeInput::Tree(&module), &MinimizeOptions::default()).unwrap();
//! assert_eq!(text, "if True:return...");
//! ```

pub mod cli;
pub mod codec;
pub mod codegen;
pub mod compact;
pub mod config;
pub mod error;
pub mod restore;
pub mod select;

use minipy_ast::{Document, Module};
use tracing::debug;

pub use codec::Codec;
pub use config::Config;
pub use error::{MinipyError, ParseFailure, RenderError, Result};
pub use restore::{restore, restore_with, PlainFormatter, Restored, SourceFormatter};
pub use select::{Candidate, Origin};

/// Options for [`minimize`].
pub type MinimizeOptions = select::SelectOptions;

/// Turns source text into a tree. minipy does not parse Python itself.
pub trait SourceParser {
    fn parse(&self, source: &str) -> std::result::Result<Module, ParseFailure>;
}

/// What to minimize.
#[derive(Clone, Copy)]
pub enum MinimizeInput<'a> {
    /// A tree with no source text; there is no raw candidate.
    Tree(&'a Module),
    /// A tree, with its source text when the document carried it.
    Document(&'a Document),
    /// Source text and the parser that reads it.
    Source {
        text: &'a str,
        parser: &'a dyn SourceParser,
    },
}

/// Render, compact and trim a tree.
pub fn minimize_tree(module: &Module) -> std::result::Result<String, RenderError> {
    let printed = codegen::Printer::minimizer().render(module)?;
    let compacted = compact::compact(&printed);
    Ok(compacted
        .trim_matches(|c: char| c.is_whitespace() || c == ';')
        .to_string())
}

/// Minimize `input` and return the chosen candidate with its origin.
pub fn minimize_candidate(input: MinimizeInput<'_>, options: &MinimizeOptions) -> Result<Candidate> {
    let parsed;
    let (raw, module) = match input {
        MinimizeInput::Tree(module) => (None, module),
        MinimizeInput::Document(document) => (document.source.as_deref(), &document.tree),
        MinimizeInput::Source { text, parser } => {
            parsed = parser.parse(text)?;
            (Some(text), &parsed)
        }
    };
    let minimized = minimize_tree(module)?;
    debug!(
        "minimized {} statements to {} bytes",
        module.body.len(),
        minimized.len()
    );
    Ok(select::select(raw, &minimized, options))
}

/// Minimize `input` and return the shortest text.
pub fn minimize(input: MinimizeInput<'_>, options: &MinimizeOptions) -> Result<String> {
    Ok(minimize_candidate(input, options)?.text)
}
