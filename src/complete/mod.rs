//! Shell-agnostic completion: candidate enumeration and ranking over a
//! partially typed token list.

use std::collections::HashSet;

use crate::grammar::{Grammar, SymbolId};
use crate::token::{Token, TokenKind};

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    label: String,
    sort_key: String,
    detail: Option<String>,
}

impl Candidate {
    /// The replacement text to insert.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The lowercase label with identifier prefixes stripped, for consumers
    /// that group options with their bare names.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// The symbol's help text, when declared.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl Grammar {
    /// Enumerate, filter, and rank completion candidates.
    ///
    /// Tokens before `cursor` are committed input; the token at `cursor` (when
    /// present) is the partial word under completion. Identical input always
    /// produces the identical candidate list.
    pub fn complete(&self, tokens: &[Token], cursor: usize) -> Vec<Candidate> {
        let walk = self.walk(&tokens[..cursor.min(tokens.len())]);
        let partial = tokens
            .get(cursor)
            .map(|token| token.text())
            .unwrap_or_default();

        let mut raw: Vec<(String, Option<String>)> = Vec::default();

        // Declared suggestions for whichever value position is open.
        let value_position = walk
            .pending_option
            .or_else(|| self.open_positional(walk.scope, walk.positional_fed));

        if let Some(id) = value_position {
            let data = self.data(id);
            for suggestion in data.suggestions() {
                raw.push((suggestion.clone(), data.help().map(str::to_string)));
            }
        }

        if !walk.positional_only {
            for command in self.child_commands(walk.scope) {
                let data = self.data(command);
                for alias in data.aliases() {
                    raw.push((alias.clone(), data.help().map(str::to_string)));
                }
            }

            for option in self.options_in_scope(walk.scope) {
                let data = self.data(option);
                for alias in data.aliases() {
                    raw.push((alias.clone(), data.help().map(str::to_string)));
                }
            }
        }

        rank(raw, partial)
    }

    /// Re-trace the command path the distributor would take.
    fn walk(&self, tokens: &[Token]) -> Walk {
        let mut walk = Walk {
            scope: self.root(),
            pending_option: None,
            positional_only: false,
            positional_fed: 0,
        };

        for token in tokens {
            if walk.positional_only {
                walk.positional_fed += 1;
                continue;
            }

            match token.kind() {
                TokenKind::Separator => {
                    walk.positional_only = true;
                    walk.pending_option = None;
                }
                TokenKind::Directive => {}
                _ => {
                    if token.identifier_shaped() {
                        if let Some(id) = self.lookup_option(walk.scope, token.text()) {
                            let data = self.data(id);
                            walk.pending_option = (data.arity().takes_values()
                                && data.is_greedy())
                            .then_some(id);
                            continue;
                        }
                    }

                    if walk.pending_option.take().is_some() {
                        continue;
                    }

                    if let Some(command) = self.lookup_command(walk.scope, token.text()) {
                        walk.scope = command;
                        walk.positional_fed = 0;
                        continue;
                    }

                    walk.positional_fed += 1;
                }
            }
        }

        walk
    }

    /// The positional argument the next plain value would feed.
    fn open_positional(&self, scope: SymbolId, fed: usize) -> Option<SymbolId> {
        let mut remaining = fed;

        for id in self.arguments(scope) {
            match self.data(id).arity().maximum() {
                Some(n) if remaining >= n as usize => remaining -= n as usize,
                _ => return Some(id),
            }
        }

        None
    }
}

#[derive(Debug)]
struct Walk {
    scope: SymbolId,
    pending_option: Option<SymbolId>,
    positional_only: bool,
    positional_fed: usize,
}

/// Case-insensitive substring filter; rank by match position within the
/// label, then the case-insensitive label. Duplicate labels collapse to their
/// best-ranked entry.
fn rank(raw: Vec<(String, Option<String>)>, partial: &str) -> Vec<Candidate> {
    let lower_partial = partial.to_lowercase();

    let mut ranked: Vec<(usize, String, Candidate)> = raw
        .into_iter()
        .filter_map(|(label, detail)| {
            let lower = label.to_lowercase();
            let position = lower.find(&lower_partial)?;
            let sort_key = lower.trim_start_matches('-').to_string();
            Some((
                position,
                lower,
                Candidate {
                    label,
                    sort_key,
                    detail,
                },
            ))
        })
        .collect();

    ranked.sort_by(|(left_position, left_lower, left), (right_position, right_lower, right)| {
        left_position
            .cmp(right_position)
            .then_with(|| left_lower.cmp(right_lower))
            .then_with(|| left.label.cmp(&right.label))
    });

    let mut seen: HashSet<String> = HashSet::default();
    ranked
        .into_iter()
        .filter(|(_, _, candidate)| seen.insert(candidate.label.clone()))
        .map(|(_, _, candidate)| candidate)
        .collect()
}
