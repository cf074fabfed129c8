//! The token distributor: a single left-to-right pass assigning every input
//! token to a grammar symbol, the unmatched list, or the tree's structural
//! lists. Errors never abort the scan.

use std::collections::VecDeque;

use crate::grammar::{Grammar, SymbolId};
use crate::token::{Token, TokenKind};
use crate::tree::{
    ArgumentResult, CommandResult, OptionResult, ParseError, SymbolResult, SymbolResultTree,
};

mod buffer;

use buffer::ClaimBuffer;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Distribute the tree's token list across the grammar.
pub(crate) fn distribute(grammar: &Grammar, tree: &mut SymbolResultTree) {
    tree.insert(
        grammar.root(),
        SymbolResult::Command(CommandResult::root(grammar.root())),
    );

    let tokens = tree.tokens().to_vec();
    let mut distributor = TokenDistributor::new(grammar);

    for token in tokens {
        distributor.feed(token, tree);
    }

    distributor.finish(tree);
}

#[derive(Debug)]
struct TokenDistributor<'a> {
    grammar: &'a Grammar,
    scope: SymbolId,
    pending_arguments: VecDeque<SymbolId>,
    buffer: Option<ClaimBuffer>,
    positional_only: bool,
}

impl<'a> TokenDistributor<'a> {
    fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            scope: grammar.root(),
            pending_arguments: grammar.arguments(grammar.root()).into(),
            buffer: None,
            positional_only: false,
        }
    }

    fn feed(&mut self, token: Token, tree: &mut SymbolResultTree) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("feed: {token}", token = token.text());
        }

        match token.kind() {
            TokenKind::Directive if !self.positional_only => {
                tree.push_directive(token);
                return;
            }
            TokenKind::Separator if !self.positional_only => {
                self.positional_only = true;

                // An option stops claiming at the separator; a positional
                // argument keeps filling across it.
                if matches!(&self.buffer, Some(buffer) if buffer.is_option()) {
                    let buffer = self
                        .buffer
                        .take()
                        .expect("internal error - the buffer was just observed");
                    self.flush(buffer, tree);
                }

                tree.push_separator(token);
                return;
            }
            _ => {}
        }

        if !self.positional_only && token.identifier_shaped() {
            if let Some(id) = self.grammar.lookup_option(self.scope, token.text()) {
                self.open_option(id, token, tree);
                return;
            }
            // No declared alias matches; fall through as a plain value.
        }

        if !self.positional_only && !self.option_buffer_open() {
            if let Some(command) = self.grammar.lookup_command(self.scope, token.text()) {
                self.descend(command, token, tree);
                return;
            }
        }

        self.claim_value(token, tree);
    }

    fn finish(mut self, tree: &mut SymbolResultTree) {
        if let Some(buffer) = self.buffer.take() {
            self.flush(buffer, tree);
        }
    }

    fn option_buffer_open(&self) -> bool {
        matches!(&self.buffer, Some(buffer) if buffer.is_option() && buffer.is_open())
    }

    fn open_option(&mut self, id: SymbolId, identifier: Token, tree: &mut SymbolResultTree) {
        if let Some(buffer) = self.buffer.take() {
            self.flush(buffer, tree);
        }

        let data = self.grammar.data(id);
        let parent = data
            .parent()
            .expect("internal error - an option always has a parent command");

        if tree.result(id).is_none() {
            tree.insert(id, SymbolResult::Option(OptionResult::supplied(id, parent)));
        }

        let (occurrences, claimed) = match tree.result(id) {
            Some(SymbolResult::Option(option)) => {
                (option.occurrences(), option.value().tokens().len())
            }
            _ => unreachable!("internal error - an option symbol must hold an option result"),
        };

        let arity = data.arity();
        let at_maximum = match arity.maximum() {
            Some(0) => occurrences > 0,
            Some(n) => claimed >= n as usize,
            None => false,
        };

        if at_maximum {
            tree.push_error(ParseError::DuplicateOption(data.display_name().to_string()));
        }

        match tree.result_mut(id) {
            Some(SymbolResult::Option(option)) => option.record_occurrence(identifier),
            _ => unreachable!("internal error - an option symbol must hold an option result"),
        }

        if at_maximum || !arity.takes_values() || !data.is_greedy() {
            return;
        }

        let remaining = arity.maximum().map(|n| n as usize - claimed);
        let capacity = if self.grammar.allow_multiple_arguments_per_token() {
            remaining
        } else {
            // Each identifier occurrence claims at most one value token.
            Some(1)
        };

        self.buffer.replace(ClaimBuffer::option(id, capacity));
    }

    fn descend(&mut self, command: SymbolId, token: Token, tree: &mut SymbolResultTree) {
        if let Some(buffer) = self.buffer.take() {
            self.flush(buffer, tree);
        }

        tree.insert(
            command,
            SymbolResult::Command(CommandResult::matched(command, self.scope, token)),
        );
        tree.select(command);
        self.scope = command;
        self.pending_arguments = self.grammar.arguments(command).into();
    }

    fn claim_value(&mut self, token: Token, tree: &mut SymbolResultTree) {
        let mut buffer = match self.buffer.take() {
            Some(buffer) if buffer.is_open() => buffer,
            Some(buffer) => {
                // Flip to the next positional argument.
                self.flush(buffer, tree);
                match self.next_argument() {
                    Some(buffer) => buffer,
                    None => return self.reject(token, tree),
                }
            }
            None => match self.next_argument() {
                Some(buffer) => buffer,
                None => return self.reject(token, tree),
            },
        };

        buffer.push(token);

        if self.buffer.replace(buffer).is_some() {
            unreachable!("internal error - the claim buffer is expected to be empty");
        }
    }

    fn next_argument(&mut self) -> Option<ClaimBuffer> {
        while let Some(id) = self.pending_arguments.pop_front() {
            let arity = self.grammar.data(id).arity();

            if !arity.takes_values() {
                continue;
            }

            return Some(ClaimBuffer::argument(
                id,
                arity.maximum().map(|n| n as usize),
            ));
        }

        None
    }

    fn reject(&self, token: Token, tree: &mut SymbolResultTree) {
        tree.push_error(ParseError::UnrecognizedToken(token.text().to_string()));
        tree.push_unmatched(token);
    }

    fn flush(&self, buffer: ClaimBuffer, tree: &mut SymbolResultTree) {
        let (symbol, option, tokens) = buffer.into_parts();

        if option {
            match tree.result_mut(symbol) {
                Some(SymbolResult::Option(result)) => result.value_mut().extend_tokens(tokens),
                _ => unreachable!("internal error - an option buffer requires its option result"),
            }
        } else {
            match tree.result_mut(symbol) {
                Some(SymbolResult::Argument(result)) => result.extend_tokens(tokens),
                Some(_) => {
                    unreachable!("internal error - an argument buffer requires an argument result")
                }
                None => {
                    let parent = self.grammar.data(symbol).parent();
                    let mut result = ArgumentResult::scoped(symbol, parent);
                    result.extend_tokens(tokens);
                    tree.insert(symbol, SymbolResult::Argument(result));
                }
            }
        }
    }
}
