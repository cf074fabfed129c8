use thiserror::Error;

use crate::convert::Value;
use crate::grammar::symbol::*;
use crate::grammar::Grammar;
use crate::model::Arity;

/// A grammar-authoring error, reported eagerly at declaration time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// The alias is blank or contains whitespace.
    #[error("alias '{0}' is invalid: must be non-empty and contain no whitespace.")]
    InvalidAlias(String),

    /// The operation would leave a symbol with no aliases.
    #[error("a symbol must retain at least one alias.")]
    EmptyAliasSet,

    /// The alias is already declared within the containing scope.
    #[error("alias '{0}' is already declared in this scope.")]
    DuplicateAlias(String),
}

/// Declares an immutable [`Grammar`] of commands, options, and arguments.
///
/// Symbols are allocated into an arena and referenced by stable [`SymbolId`]s.
/// All alias validation happens here, at declaration time; malformed end-user
/// input is never the grammar's problem.
///
/// ### Example
/// ```
/// use burlap::{Arity, GrammarBuilder};
///
/// let mut builder = GrammarBuilder::new("tool").unwrap();
/// let root = builder.root();
/// builder.flag(root, &["-v", "--verbose"]).unwrap();
/// builder.argument(root, "path", Arity::exactly(1)).unwrap();
/// let grammar = builder.build();
/// # let _ = grammar;
/// ```
pub struct GrammarBuilder {
    symbols: Vec<SymbolData>,
    allow_multiple_arguments_per_token: bool,
}

impl std::fmt::Debug for GrammarBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarBuilder")
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

fn validate_alias(alias: &str) -> Result<(), GrammarError> {
    if alias.is_empty() || alias.chars().any(char::is_whitespace) {
        return Err(GrammarError::InvalidAlias(alias.to_string()));
    }

    Ok(())
}

impl GrammarBuilder {
    /// Create a grammar builder whose root command is named `program`.
    pub fn new(program: impl Into<String>) -> Result<Self, GrammarError> {
        let program = program.into();
        validate_alias(&program)?;
        let root = SymbolData::new(
            vec![program],
            SymbolKind::Command {
                children: Vec::default(),
            },
            Arity::zero(),
        );

        Ok(Self {
            symbols: vec![root],
            allow_multiple_arguments_per_token: false,
        })
    }

    /// The root command.
    pub fn root(&self) -> SymbolId {
        SymbolId(0)
    }

    /// Permit a single option identifier occurrence to claim multiple
    /// following value tokens (up to the option's arity maximum).
    /// When off (the default), each occurrence claims at most one token.
    pub fn allow_multiple_arguments_per_token(&mut self, allow: bool) {
        self.allow_multiple_arguments_per_token = allow;
    }

    /// Declare a sub-command under `parent`.
    pub fn command(&mut self, parent: SymbolId, aliases: &[&str]) -> Result<SymbolId, GrammarError> {
        self.attach(
            parent,
            aliases,
            SymbolKind::Command {
                children: Vec::default(),
            },
            Arity::zero(),
        )
    }

    /// Declare a value-carrying option under `parent`.
    pub fn option(
        &mut self,
        parent: SymbolId,
        aliases: &[&str],
        arity: Arity,
    ) -> Result<SymbolId, GrammarError> {
        self.attach(
            parent,
            aliases,
            SymbolKind::Option {
                required: false,
                global: false,
                greedy: true,
            },
            arity,
        )
    }

    /// Declare a presence flag (arity zero, boolean) under `parent`.
    pub fn flag(&mut self, parent: SymbolId, aliases: &[&str]) -> Result<SymbolId, GrammarError> {
        self.attach(
            parent,
            aliases,
            SymbolKind::Option {
                required: false,
                global: false,
                // Boolean flags never claim following tokens.
                greedy: false,
            },
            Arity::zero(),
        )
    }

    /// Declare a positional argument under `parent`.
    /// Positional order follows declaration order.
    pub fn argument(
        &mut self,
        parent: SymbolId,
        name: &str,
        arity: Arity,
    ) -> Result<SymbolId, GrammarError> {
        self.attach(parent, &[name], SymbolKind::Argument, arity)
    }

    fn attach(
        &mut self,
        parent: SymbolId,
        aliases: &[&str],
        kind: SymbolKind,
        arity: Arity,
    ) -> Result<SymbolId, GrammarError> {
        if aliases.is_empty() {
            return Err(GrammarError::EmptyAliasSet);
        }

        for alias in aliases {
            validate_alias(alias)?;
            if self.scope_contains(parent, alias) {
                return Err(GrammarError::DuplicateAlias(alias.to_string()));
            }
        }

        let mut unique: Vec<String> = Vec::default();
        for alias in aliases {
            if unique.iter().any(|existing| existing == alias) {
                return Err(GrammarError::DuplicateAlias(alias.to_string()));
            }
            unique.push(alias.to_string());
        }

        let mut data = SymbolData::new(unique, kind, arity);
        data.set_parent(parent);
        let id = SymbolId(self.symbols.len());
        self.symbols.push(data);

        match self.symbols[parent.index()].kind_mut() {
            SymbolKind::Command { children } => children.push(id),
            _ => panic!("grammar authoring error - parent must be a command"),
        }

        Ok(id)
    }

    fn scope_contains(&self, parent: SymbolId, alias: &str) -> bool {
        match self.symbols[parent.index()].kind() {
            SymbolKind::Command { children } => children
                .iter()
                .any(|child| self.symbols[child.index()].matches(alias)),
            _ => false,
        }
    }

    /// Mark an option as required.
    pub fn required(&mut self, id: SymbolId) {
        match self.symbols[id.index()].kind_mut() {
            SymbolKind::Option { required, .. } => *required = true,
            _ => panic!("grammar authoring error - only options may be required"),
        }
    }

    /// Mark an option as global: inherited by all descendant commands.
    pub fn global(&mut self, id: SymbolId) {
        match self.symbols[id.index()].kind_mut() {
            SymbolKind::Option { global, .. } => *global = true,
            _ => panic!("grammar authoring error - only options may be global"),
        }
    }

    /// Mark an option as non-greedy: its identifier claims no following
    /// tokens.
    pub fn non_greedy(&mut self, id: SymbolId) {
        match self.symbols[id.index()].kind_mut() {
            SymbolKind::Option { greedy, .. } => *greedy = false,
            _ => panic!("grammar authoring error - only options may be non-greedy"),
        }
    }

    /// Document the help text for a symbol, surfaced as completion detail.
    pub fn help(&mut self, id: SymbolId, help: impl Into<String>) {
        self.symbols[id.index()].set_help(help.into());
    }

    /// Declare completion value suggestions for an option or argument.
    pub fn suggest(&mut self, id: SymbolId, values: &[&str]) {
        self.symbols[id.index()]
            .suggestions_mut()
            .extend(values.iter().map(|value| value.to_string()));
    }

    /// Install a custom token-to-value converter for an option or argument.
    pub fn converter(&mut self, id: SymbolId, converter: ConvertFn) {
        self.symbols[id.index()].set_converter(converter);
    }

    /// Install a default-value factory for an option or argument.
    pub fn default_factory(&mut self, id: SymbolId, factory: DefaultFn) {
        self.symbols[id.index()].set_default_factory(factory);
    }

    /// Install a constant default value for an option or argument.
    pub fn default_value(&mut self, id: SymbolId, value: Value) {
        self.default_factory(id, Box::new(move |_| Some(value.clone())));
    }

    /// Add an alias to an existing symbol.
    pub fn add_alias(&mut self, id: SymbolId, alias: &str) -> Result<(), GrammarError> {
        validate_alias(alias)?;
        let scope = self.symbols[id.index()].parent();

        if let Some(parent) = scope {
            if self.scope_contains(parent, alias) {
                return Err(GrammarError::DuplicateAlias(alias.to_string()));
            }
        } else if self.symbols[id.index()].matches(alias) {
            return Err(GrammarError::DuplicateAlias(alias.to_string()));
        }

        self.symbols[id.index()].aliases_mut().push(alias.to_string());
        Ok(())
    }

    /// Remove an alias from an existing symbol.
    /// The alias set can never be emptied; removing the last alias is an error.
    pub fn remove_alias(&mut self, id: SymbolId, alias: &str) -> Result<(), GrammarError> {
        let aliases = self.symbols[id.index()].aliases_mut();

        if aliases.len() == 1 && aliases[0] == alias {
            return Err(GrammarError::EmptyAliasSet);
        }

        aliases.retain(|existing| existing != alias);
        Ok(())
    }

    /// Finalize the grammar. The result is immutable and safe to share
    /// read-only across concurrent parses.
    pub fn build(self) -> Grammar {
        Grammar::new(self.symbols, self.allow_multiple_arguments_per_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("--ver bose")]
    #[case("a\tb")]
    fn invalid_alias(#[case] alias: &str) {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let error = builder.flag(root, &[alias]).unwrap_err();
        assert_eq!(error, GrammarError::InvalidAlias(alias.to_string()));
    }

    #[test]
    fn builder_debug_summarizes() {
        let builder = GrammarBuilder::new("tool").unwrap();
        assert_eq!(format!("{builder:?}"), "GrammarBuilder { symbols: 1 }");
    }

    #[test]
    fn invalid_program() {
        let error = GrammarBuilder::new("bad program").unwrap_err();
        assert_eq!(error, GrammarError::InvalidAlias("bad program".to_string()));
    }

    #[test]
    fn empty_alias_set() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let error = builder.flag(root, &[]).unwrap_err();
        assert_eq!(error, GrammarError::EmptyAliasSet);
    }

    #[test]
    fn duplicate_alias_within_scope() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        builder.flag(root, &["-v", "--verbose"]).unwrap();
        let error = builder.option(root, &["-v"], Arity::exactly(1)).unwrap_err();
        assert_eq!(error, GrammarError::DuplicateAlias("-v".to_string()));
    }

    #[test]
    fn duplicate_alias_within_declaration() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let error = builder.flag(root, &["-v", "-v"]).unwrap_err();
        assert_eq!(error, GrammarError::DuplicateAlias("-v".to_string()));
    }

    #[test]
    fn same_alias_in_sibling_scopes() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let a = builder.command(root, &["a"]).unwrap();
        let b = builder.command(root, &["b"]).unwrap();
        builder.flag(a, &["--force"]).unwrap();
        builder.flag(b, &["--force"]).unwrap();
    }

    #[test]
    fn rename_preserves_non_empty_alias_set() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let option = builder.option(root, &["--verbose"], Arity::zero_or_one()).unwrap();

        // Removing the only alias must fail; add-then-remove succeeds.
        assert_eq!(
            builder.remove_alias(option, "--verbose").unwrap_err(),
            GrammarError::EmptyAliasSet
        );
        builder.add_alias(option, "--loud").unwrap();
        builder.remove_alias(option, "--verbose").unwrap();

        let grammar = builder.build();
        assert_eq!(grammar.display_name(option), "loud");
    }

    #[test]
    #[should_panic]
    fn required_on_argument() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let argument = builder.argument(root, "path", Arity::exactly(1)).unwrap();
        builder.required(argument);
    }

    #[test]
    #[should_panic]
    fn attach_under_option() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let option = builder.flag(root, &["-v"]).unwrap();
        let _ = builder.flag(option, &["-x"]);
    }
}
