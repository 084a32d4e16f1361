//! Statement termination.
//!
//! [`Terminators`] is the set of statement kinds that must be followed by a
//! `;`. When a [`Printer`](super::Printer) is built the set is turned into a
//! [`HookTable`]: one list of post-render hooks per statement kind. A hook
//! runs after the node has been written and may only append.

use std::collections::BTreeSet;
use std::fmt;

use minipy_ast::StmtKind;

use super::CodegenState;

const DEFAULT_TERMINATED: [StmtKind; 16] = [
    StmtKind::Return,
    StmtKind::Delete,
    StmtKind::Assign,
    StmtKind::TypeAlias,
    StmtKind::AugAssign,
    StmtKind::AnnAssign,
    StmtKind::Raise,
    StmtKind::Assert,
    StmtKind::Import,
    StmtKind::ImportFrom,
    StmtKind::Global,
    StmtKind::Nonlocal,
    StmtKind::Expr,
    StmtKind::Pass,
    StmtKind::Break,
    StmtKind::Continue,
];

/// Statement kinds that are followed by an explicit `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminators {
    kinds: BTreeSet<StmtKind>,
}

impl Default for Terminators {
    fn default() -> Self {
        Terminators {
            kinds: DEFAULT_TERMINATED.into_iter().collect(),
        }
    }
}

impl Terminators {
    /// The default set with `Import` removed; imports are terminated by the
    /// coalescing flush.
    pub fn minimizer() -> Self {
        Terminators::default().toggle(&[StmtKind::Import])
    }

    /// Symmetric difference: members named in `kinds` are removed, others
    /// added.
    pub fn toggle(mut self, kinds: &[StmtKind]) -> Self {
        for kind in kinds {
            if !self.kinds.remove(kind) {
                self.kinds.insert(*kind);
            }
        }
        self
    }

    pub fn contains(&self, kind: StmtKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = StmtKind> + '_ {
        self.kinds.iter().copied()
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Runs after a statement of some kind has been rendered.
pub type Hook = Box<dyn Fn(&mut CodegenState) + Send + Sync>;

/// Append the statement marker. Idempotent, so a kind terminated both by a
/// hook and by its own output still gets exactly one `;`.
pub fn terminate(state: &mut CodegenState) {
    if !state.ends_with(';') {
        state.add_token(";");
    }
}

/// Per-kind post-render hooks.
pub struct HookTable {
    hooks: Vec<Vec<Hook>>,
}

impl HookTable {
    pub fn from_terminators(terminators: &Terminators) -> Self {
        let mut table = HookTable {
            hooks: StmtKind::ALL.iter().map(|_| Vec::new()).collect(),
        };
        for kind in terminators.iter() {
            table.attach(kind, Box::new(terminate));
        }
        table
    }

    /// Add a hook after the ones already registered for `kind`.
    pub fn attach(&mut self, kind: StmtKind, hook: Hook) {
        if let Some(list) = self.hooks.get_mut(kind.index()) {
            list.push(hook);
        }
    }

    pub fn count(&self, kind: StmtKind) -> usize {
        self.hooks.get(kind.index()).map_or(0, Vec::len)
    }

    pub fn run(&self, kind: StmtKind, state: &mut CodegenState) {
        if let Some(list) = self.hooks.get(kind.index()) {
            for hook in list {
                hook(state);
            }
        }
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in StmtKind::ALL {
            let count = self.count(kind);
            if count > 0 {
                map.entry(&kind, &count);
            }
        }
        map.finish()
    }
}
