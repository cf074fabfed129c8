//! Per-parse results: one [`SymbolResultTree`] per invocation, mapping each
//! grammar symbol to the tokens it claimed. Created at parse start, populated
//! during distribution and conversion, read-only for the caller afterwards.

mod error;

pub use error::{ParseError, ParseErrorKind};

use crate::convert::ArgumentConversionResult;
use crate::grammar::SymbolId;
use crate::token::Token;

/// The per-parse result of a single grammar symbol.
#[derive(Debug)]
pub enum SymbolResult {
    /// A matched command.
    Command(CommandResult),
    /// An option, supplied or implicit.
    Option(OptionResult),
    /// A positional argument.
    Argument(ArgumentResult),
}

impl SymbolResult {
    /// The originating symbol.
    pub fn symbol(&self) -> SymbolId {
        match self {
            SymbolResult::Command(result) => result.symbol,
            SymbolResult::Option(result) => result.symbol,
            SymbolResult::Argument(result) => result.symbol,
        }
    }

    /// The parent result's symbol; `None` for the root command.
    pub fn parent(&self) -> Option<SymbolId> {
        match self {
            SymbolResult::Command(result) => result.parent,
            SymbolResult::Option(result) => result.parent,
            SymbolResult::Argument(result) => result.parent,
        }
    }

    pub(crate) fn as_argument_mut(&mut self) -> Option<&mut ArgumentResult> {
        match self {
            SymbolResult::Argument(result) => Some(result),
            SymbolResult::Option(result) => Some(&mut result.value),
            SymbolResult::Command(_) => None,
        }
    }
}

/// The result of a matched command.
#[derive(Debug)]
pub struct CommandResult {
    symbol: SymbolId,
    parent: Option<SymbolId>,
    token: Option<Token>,
}

impl CommandResult {
    pub(crate) fn root(symbol: SymbolId) -> Self {
        Self {
            symbol,
            parent: None,
            token: None,
        }
    }

    pub(crate) fn matched(symbol: SymbolId, parent: SymbolId, token: Token) -> Self {
        Self {
            symbol,
            parent: Some(parent),
            token: Some(token),
        }
    }

    /// The command-name token that selected this command; `None` for the root.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }
}

/// The result of an option: its identifier occurrences plus an embedded
/// [`ArgumentResult`] holding the claimed value tokens.
#[derive(Debug)]
pub struct OptionResult {
    symbol: SymbolId,
    parent: Option<SymbolId>,
    identifiers: Vec<Token>,
    implicit: bool,
    value: ArgumentResult,
}

impl OptionResult {
    pub(crate) fn supplied(symbol: SymbolId, parent: SymbolId) -> Self {
        Self {
            symbol,
            parent: Some(parent),
            identifiers: Vec::default(),
            implicit: false,
            value: ArgumentResult::scoped(symbol, Some(parent)),
        }
    }

    pub(crate) fn implicit(symbol: SymbolId, parent: SymbolId) -> Self {
        Self {
            symbol,
            parent: Some(parent),
            identifiers: Vec::default(),
            implicit: true,
            value: ArgumentResult::scoped(symbol, Some(parent)),
        }
    }

    /// Whether the option never appeared in input.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// How many times the option's identifier appeared.
    pub fn occurrences(&self) -> usize {
        self.identifiers.len()
    }

    /// The identifier tokens, in input order.
    pub fn identifiers(&self) -> &[Token] {
        &self.identifiers
    }

    /// The embedded value result.
    pub fn value(&self) -> &ArgumentResult {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut ArgumentResult {
        &mut self.value
    }

    pub(crate) fn record_occurrence(&mut self, identifier: Token) {
        self.identifiers.push(identifier);
    }
}

/// The result of a positional argument (or an option's embedded value).
#[derive(Debug)]
pub struct ArgumentResult {
    symbol: SymbolId,
    parent: Option<SymbolId>,
    tokens: Vec<Token>,
    implicit: bool,
    converted: Option<ArgumentConversionResult>,
    converting: bool,
    passed_on: Option<Vec<Token>>,
    errors: Vec<ParseError>,
}

impl ArgumentResult {
    pub(crate) fn scoped(symbol: SymbolId, parent: Option<SymbolId>) -> Self {
        Self {
            symbol,
            parent,
            tokens: Vec::default(),
            implicit: false,
            converted: None,
            converting: false,
            passed_on: None,
            errors: Vec::default(),
        }
    }

    /// The originating symbol.
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// The claimed tokens, in input order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the value came from a default rather than input tokens.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Tokens released by [`ArgumentResult::only_take`], awaiting
    /// redistribution to a later sibling. `None` until partial consumption
    /// happens.
    pub fn passed_on(&self) -> Option<&[Token]> {
        self.passed_on.as_deref()
    }

    /// Restrict this result to its first `count` claimed tokens, exposing the
    /// remainder for redistribution.
    ///
    /// Calling this twice on the same result is a programming-contract
    /// violation and panics immediately; it reflects a grammar-authoring bug,
    /// not bad input. Requesting more tokens than are claimed truncates
    /// silently.
    pub fn only_take(&mut self, count: usize) {
        if self.passed_on.is_some() {
            panic!("contract violation - only_take may be called at most once per result");
        }

        let rest = if count < self.tokens.len() {
            self.tokens.split_off(count)
        } else {
            Vec::default()
        };
        self.passed_on = Some(rest);
    }

    /// Report a domain error against this result.
    /// Used by custom converters and default-value factories; the error is
    /// merged into the parse's shared error list.
    pub fn report(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub(crate) fn push_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn extend_tokens(&mut self, tokens: impl IntoIterator<Item = Token>) {
        self.tokens.extend(tokens);
    }

    pub(crate) fn mark_implicit(&mut self) {
        self.implicit = true;
    }

    pub(crate) fn memoized(&self) -> Option<&ArgumentConversionResult> {
        self.converted.as_ref()
    }

    pub(crate) fn memoize(&mut self, outcome: ArgumentConversionResult) {
        self.converted.replace(outcome);
    }

    pub(crate) fn begin_conversion(&mut self) {
        if self.converting {
            panic!("contract violation - re-entrant conversion of a result already being computed");
        }
        self.converting = true;
    }

    pub(crate) fn end_conversion(&mut self) {
        self.converting = false;
    }

    pub(crate) fn drain_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

/// The run-scoped mapping from grammar symbol to result.
///
/// Owns the flat token list, the accumulated error list, the unmatched-token
/// list, and the innermost selected command for one parse invocation. Never
/// reused across parses.
#[derive(Debug)]
pub struct SymbolResultTree {
    results: Vec<Option<SymbolResult>>,
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
    unmatched: Vec<Token>,
    directives: Vec<Token>,
    separators: Vec<Token>,
    selected: SymbolId,
}

impl SymbolResultTree {
    pub(crate) fn new(symbol_count: usize, tokens: Vec<Token>, root: SymbolId) -> Self {
        let mut results = Vec::with_capacity(symbol_count);
        results.resize_with(symbol_count, || None);

        Self {
            results,
            tokens,
            errors: Vec::default(),
            unmatched: Vec::default(),
            directives: Vec::default(),
            separators: Vec::default(),
            selected: root,
        }
    }

    /// The full input token list for this parse run.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The accumulated end-user input errors, in declaration order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Input tokens claimed by no grammar symbol, in input order.
    pub fn unmatched(&self) -> &[Token] {
        &self.unmatched
    }

    /// Directive tokens recorded during distribution, in input order.
    pub fn directives(&self) -> &[Token] {
        &self.directives
    }

    /// Separator ("--") tokens recorded during distribution, in input order.
    pub fn separators(&self) -> &[Token] {
        &self.separators
    }

    /// The innermost command ultimately selected.
    pub fn selected_command(&self) -> SymbolId {
        self.selected
    }

    /// The result for a symbol, if the parse produced one.
    pub fn result(&self, id: SymbolId) -> Option<&SymbolResult> {
        self.results[id.index()].as_ref()
    }

    pub(crate) fn insert(&mut self, id: SymbolId, result: SymbolResult) {
        if self.results[id.index()].replace(result).is_some() {
            unreachable!("internal error - a symbol's result may only be created once per parse");
        }
    }

    pub(crate) fn result_mut(&mut self, id: SymbolId) -> Option<&mut SymbolResult> {
        self.results[id.index()].as_mut()
    }

    pub(crate) fn take(&mut self, id: SymbolId) -> Option<SymbolResult> {
        self.results[id.index()].take()
    }

    pub(crate) fn restore(&mut self, id: SymbolId, result: SymbolResult) {
        self.results[id.index()] = Some(result);
    }

    pub(crate) fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub(crate) fn push_unmatched(&mut self, token: Token) {
        self.unmatched.push(token);
    }

    pub(crate) fn push_directive(&mut self, token: Token) {
        self.directives.push(token);
    }

    pub(crate) fn push_separator(&mut self, token: Token) {
        self.separators.push(token);
    }

    pub(crate) fn select(&mut self, command: SymbolId) {
        self.selected = command;
    }
}
