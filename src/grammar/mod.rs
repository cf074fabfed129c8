//! The grammar model: an arena of command/option/argument symbols, immutable
//! once built and shareable read-only across concurrent parses.

mod builder;
mod symbol;

pub use builder::{GrammarBuilder, GrammarError};
pub use symbol::{ConvertFn, DefaultFn, SymbolId};

pub(crate) use symbol::{SymbolData, SymbolKind};

/// An immutable grammar of commands, options, and positional arguments.
/// Built via [`GrammarBuilder`].
pub struct Grammar {
    symbols: Vec<SymbolData>,
    allow_multiple_arguments_per_token: bool,
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

impl Grammar {
    pub(crate) fn new(symbols: Vec<SymbolData>, allow_multiple_arguments_per_token: bool) -> Self {
        Self {
            symbols,
            allow_multiple_arguments_per_token,
        }
    }

    /// The root command.
    pub fn root(&self) -> SymbolId {
        SymbolId(0)
    }

    /// The canonical display name of a symbol: its longest alias, with any
    /// leading dashes stripped.
    pub fn display_name(&self, id: SymbolId) -> &str {
        self.data(id).display_name()
    }

    /// The aliases of a symbol, in declaration order.
    pub fn aliases(&self, id: SymbolId) -> &[String] {
        self.data(id).aliases()
    }

    pub(crate) fn data(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.index()]
    }

    pub(crate) fn len(&self) -> usize {
        self.symbols.len()
    }

    pub(crate) fn allow_multiple_arguments_per_token(&self) -> bool {
        self.allow_multiple_arguments_per_token
    }

    pub(crate) fn children(&self, scope: SymbolId) -> &[SymbolId] {
        match self.data(scope).kind() {
            SymbolKind::Command { children } => children,
            _ => unreachable!("internal error - scope must be a command"),
        }
    }

    pub(crate) fn child_commands(&self, scope: SymbolId) -> Vec<SymbolId> {
        self.children(scope)
            .iter()
            .copied()
            .filter(|id| self.data(*id).is_command())
            .collect()
    }

    pub(crate) fn arguments(&self, scope: SymbolId) -> Vec<SymbolId> {
        self.children(scope)
            .iter()
            .copied()
            .filter(|id| self.data(*id).is_argument())
            .collect()
    }

    /// Options visible within `scope`: its own, plus global options inherited
    /// from ancestor commands, ordered root-first for stable error reporting.
    pub(crate) fn options_in_scope(&self, scope: SymbolId) -> Vec<SymbolId> {
        let mut options = Vec::default();

        for ancestor in self.command_chain(scope) {
            let own_scope = ancestor == scope;
            options.extend(
                self.children(ancestor)
                    .iter()
                    .copied()
                    .filter(|id| {
                        let data = self.data(*id);
                        data.is_option() && (own_scope || data.is_global())
                    }),
            );
        }

        options
    }

    /// The command path from the root down to (and including) `scope`.
    pub(crate) fn command_chain(&self, scope: SymbolId) -> Vec<SymbolId> {
        let mut chain = vec![scope];
        let mut cursor = scope;

        while let Some(parent) = self.data(cursor).parent() {
            chain.push(parent);
            cursor = parent;
        }

        chain.reverse();
        chain
    }

    pub(crate) fn lookup_option(&self, scope: SymbolId, text: &str) -> Option<SymbolId> {
        self.options_in_scope(scope)
            .into_iter()
            .find(|id| self.data(*id).matches(text))
    }

    pub(crate) fn lookup_command(&self, scope: SymbolId, text: &str) -> Option<SymbolId> {
        self.child_commands(scope)
            .into_iter()
            .find(|id| self.data(*id).matches(text))
    }
}
