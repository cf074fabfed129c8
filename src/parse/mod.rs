//! The parse entry point: one synchronous distribution-then-conversion pass
//! over a token list, and the read-only outcome view layered on the result
//! tree.

use std::str::FromStr;

use crate::convert::{self, ArgumentConversionResult, Value};
use crate::distribute::distribute;
use crate::grammar::{Grammar, SymbolId};
use crate::token::Token;
use crate::tree::{ArgumentResult, OptionResult, ParseError, SymbolResult, SymbolResultTree};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl Grammar {
    /// Parse a token list against this grammar.
    ///
    /// Never fails as a call: end-user input problems accumulate on the
    /// outcome's error list, and every input token is accounted for.
    pub fn parse(&self, tokens: Vec<Token>) -> ParseOutcome<'_> {
        let mut tree = SymbolResultTree::new(self.len(), tokens, self.root());

        distribute(self, &mut tree);
        self.materialize(&mut tree);
        self.convert_chain(&mut tree);

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "parsed: selected={selected}, errors={errors}",
                selected = self.display_name(tree.selected_command()),
                errors = tree.errors().len()
            );
        }

        ParseOutcome {
            grammar: self,
            tree,
        }
    }

    /// Fill in results for symbols along the selected command chain that
    /// claimed no input.
    fn materialize(&self, tree: &mut SymbolResultTree) {
        for command in self.command_chain(tree.selected_command()) {
            for child in self.children(command).to_vec() {
                let data = self.data(child);

                if tree.result(child).is_some() {
                    continue;
                }

                if data.is_option() {
                    if data.is_required() && data.default_factory().is_none() {
                        tree.push_error(ParseError::MissingRequiredOption(
                            data.display_name().to_string(),
                        ));
                    }

                    tree.insert(
                        child,
                        SymbolResult::Option(OptionResult::implicit(child, command)),
                    );
                } else if data.is_argument() {
                    tree.insert(
                        child,
                        SymbolResult::Argument(ArgumentResult::scoped(child, Some(command))),
                    );
                }
            }
        }
    }

    /// Convert every option and argument along the selected chain, in
    /// declaration order, redistributing partially consumed tokens to the
    /// next positional sibling.
    fn convert_chain(&self, tree: &mut SymbolResultTree) {
        for command in self.command_chain(tree.selected_command()) {
            let arguments = self.arguments(command);

            for child in self.children(command).to_vec() {
                if self.data(child).is_option() {
                    convert::run(self, tree, child);

                    // An option's converter may partially consume its claim;
                    // the remainder feeds the first positional argument.
                    let passed: Vec<Token> = match tree.result(child) {
                        Some(SymbolResult::Option(option)) => option
                            .value()
                            .passed_on()
                            .map(<[Token]>::to_vec)
                            .unwrap_or_default(),
                        _ => Vec::default(),
                    };
                    self.redistribute(tree, passed, arguments.first().copied());
                }
            }

            for (index, id) in arguments.iter().enumerate() {
                convert::run(self, tree, *id);

                let passed: Vec<Token> = match tree.result(*id) {
                    Some(SymbolResult::Argument(result)) => result
                        .passed_on()
                        .map(<[Token]>::to_vec)
                        .unwrap_or_default(),
                    _ => Vec::default(),
                };
                self.redistribute(tree, passed, arguments.get(index + 1).copied());
            }
        }
    }

    /// Hand partially consumed tokens to the next unresolved positional
    /// sibling, or record them as unmatched when no sibling remains.
    fn redistribute(
        &self,
        tree: &mut SymbolResultTree,
        passed: Vec<Token>,
        sibling: Option<SymbolId>,
    ) {
        if passed.is_empty() {
            return;
        }

        match sibling {
            Some(next) => match tree.result_mut(next) {
                Some(SymbolResult::Argument(result)) => result.extend_tokens(passed),
                _ => unreachable!(
                    "internal error - chain arguments are materialized before conversion"
                ),
            },
            None => {
                for token in passed {
                    tree.push_error(ParseError::UnrecognizedToken(token.text().to_string()));
                    tree.push_unmatched(token);
                }
            }
        }
    }
}

/// The read-only view over one finished parse run.
#[derive(Debug)]
pub struct ParseOutcome<'a> {
    grammar: &'a Grammar,
    tree: SymbolResultTree,
}

impl<'a> ParseOutcome<'a> {
    /// The full input token list.
    pub fn tokens(&self) -> &[Token] {
        self.tree.tokens()
    }

    /// Every accumulated end-user input error.
    pub fn errors(&self) -> &[ParseError] {
        self.tree.errors()
    }

    /// Input tokens claimed by no symbol, in input order.
    pub fn unmatched(&self) -> &[Token] {
        self.tree.unmatched()
    }

    /// Directive tokens, in input order.
    pub fn directives(&self) -> &[Token] {
        self.tree.directives()
    }

    /// Separator ("--") tokens, in input order.
    pub fn separators(&self) -> &[Token] {
        self.tree.separators()
    }

    /// The innermost command the input selected.
    pub fn selected_command(&self) -> SymbolId {
        self.tree.selected_command()
    }

    /// The raw result for a symbol, when the parse produced one.
    pub fn result(&self, id: SymbolId) -> Option<&SymbolResult> {
        self.tree.result(id)
    }

    /// The memoized conversion outcome for an option or argument.
    pub fn conversion(&self, id: SymbolId) -> Option<&ArgumentConversionResult> {
        match self.tree.result(id)? {
            SymbolResult::Argument(result) => result.memoized(),
            SymbolResult::Option(option) => option.value().memoized(),
            SymbolResult::Command(_) => None,
        }
    }

    /// Read a symbol's converted value as `T`.
    ///
    /// Flags read as `bool` through their presence; everything else goes
    /// through `FromStr` on the converted text.
    pub fn value<T: FromStr>(&self, id: SymbolId) -> Result<T, ParseError> {
        match self.outcome_for(id)? {
            ArgumentConversionResult::Success(Value::Single(text)) => self.parse_text(id, text),
            ArgumentConversionResult::Success(Value::Flag(flag)) => {
                self.parse_text(id, if *flag { "true" } else { "false" })
            }
            ArgumentConversionResult::Success(Value::Empty) => {
                Err(ParseError::ConversionFailed {
                    symbol: self.grammar.display_name(id).to_string(),
                    token: String::default(),
                    message: "no value was provided".to_string(),
                })
            }
            ArgumentConversionResult::Success(Value::Sequence(_)) => {
                Err(ParseError::ConversionFailed {
                    symbol: self.grammar.display_name(id).to_string(),
                    token: String::default(),
                    message: "a sequence cannot be read as a single value".to_string(),
                })
            }
            ArgumentConversionResult::Failure(error) => Err(error.clone()),
            ArgumentConversionResult::NoArgument => {
                let supplied = matches!(
                    self.tree.result(id),
                    Some(SymbolResult::Option(option))
                        if !option.is_implicit() && option.occurrences() > 0
                );
                self.parse_text(id, if supplied { "true" } else { "false" })
            }
        }
    }

    /// Read a symbol's converted value as a sequence of `T`.
    pub fn values<T: FromStr>(&self, id: SymbolId) -> Result<Vec<T>, ParseError> {
        match self.outcome_for(id)? {
            ArgumentConversionResult::Success(Value::Sequence(texts)) => texts
                .iter()
                .map(|text| self.parse_text(id, text))
                .collect(),
            ArgumentConversionResult::Success(Value::Single(text)) => {
                Ok(vec![self.parse_text(id, text)?])
            }
            ArgumentConversionResult::Success(Value::Empty)
            | ArgumentConversionResult::NoArgument => Ok(Vec::default()),
            ArgumentConversionResult::Success(Value::Flag(flag)) => {
                Ok(vec![self.parse_text(id, if *flag { "true" } else { "false" })?])
            }
            ArgumentConversionResult::Failure(error) => Err(error.clone()),
        }
    }

    fn outcome_for(&self, id: SymbolId) -> Result<&ArgumentConversionResult, ParseError> {
        self.conversion(id).ok_or_else(|| ParseError::ConversionFailed {
            symbol: self.grammar.display_name(id).to_string(),
            token: String::default(),
            message: "the parse produced no value for this symbol".to_string(),
        })
    }

    fn parse_text<T: FromStr>(&self, id: SymbolId, text: &str) -> Result<T, ParseError> {
        text.parse::<T>().map_err(|_| ParseError::ConversionFailed {
            symbol: self.grammar.display_name(id).to_string(),
            token: text.to_string(),
            message: format!("cannot interpret as {}", std::any::type_name::<T>()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use crate::model::Arity;

    #[test]
    fn flag_and_argument() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let verbose = builder.flag(root, &["--verbose"]).unwrap();
        let path = builder.argument(root, "path", Arity::exactly(1)).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![Token::option("--verbose"), Token::value("/tmp")]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(outcome.value::<bool>(verbose), Ok(true));
        assert_eq!(outcome.value::<String>(path), Ok("/tmp".to_string()));
    }

    #[test]
    fn absent_flag_reads_false() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let verbose = builder.flag(root, &["--verbose"]).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(outcome.value::<bool>(verbose), Ok(false));
    }

    #[test]
    fn typed_parse_failure() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let depth = builder.argument(root, "depth", Arity::exactly(1)).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![Token::value("deep")]);

        assert_matches!(
            outcome.value::<u32>(depth),
            Err(ParseError::ConversionFailed { token, .. }) if token == "deep"
        );
    }

    #[test]
    fn under_supplied_second_argument() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let first = builder.argument(root, "first", Arity::exactly(1)).unwrap();
        let second = builder.argument(root, "second", Arity::exactly(1)).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![Token::value("5")]);

        assert_eq!(outcome.value::<u32>(first), Ok(5));
        assert_eq!(
            outcome.errors(),
            &[ParseError::ArityTooFew {
                symbol: "second".to_string(),
                provided: 0,
                minimum: 1,
            }]
        );
        assert_matches!(
            outcome.conversion(second),
            Some(ArgumentConversionResult::Failure(_))
        );
    }

    #[test]
    fn missing_required_option() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let name = builder.option(root, &["--name"], Arity::exactly(1)).unwrap();
        builder.required(name);
        let grammar = builder.build();

        let outcome = grammar.parse(vec![]);

        assert_eq!(
            outcome.errors(),
            &[ParseError::MissingRequiredOption("name".to_string())]
        );
        // No value to compute; the absence never converts into a success.
        assert!(outcome.conversion(name).is_none());
        assert_matches!(
            outcome.value::<String>(name),
            Err(ParseError::ConversionFailed { .. })
        );
    }

    #[test]
    fn required_option_with_default_becomes_implicit() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let name = builder.option(root, &["--name"], Arity::exactly(1)).unwrap();
        builder.required(name);
        builder.default_value(name, Value::Single("anonymous".to_string()));
        let grammar = builder.build();

        let outcome = grammar.parse(vec![]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(outcome.value::<String>(name), Ok("anonymous".to_string()));
        assert_matches!(
            outcome.result(name),
            Some(SymbolResult::Option(option)) if option.is_implicit()
        );
    }

    #[test]
    fn variadic_argument() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let files = builder.argument(root, "files", Arity::zero_or_more()).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![
            Token::value("a"),
            Token::value("b"),
            Token::value("c"),
        ]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(
            outcome.values::<String>(files),
            Ok(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn partial_consumption_feeds_next_sibling() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let head = builder.argument(root, "head", Arity::at_least(1)).unwrap();
        builder.converter(
            head,
            Box::new(|result| {
                result.only_take(1);
                ArgumentConversionResult::Success(Value::Single(
                    result.tokens()[0].text().to_string(),
                ))
            }),
        );
        let rest = builder.argument(root, "rest", Arity::zero_or_more()).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![
            Token::value("a"),
            Token::value("b"),
            Token::value("c"),
        ]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(outcome.value::<String>(head), Ok("a".to_string()));
        assert_eq!(
            outcome.values::<String>(rest),
            Ok(vec!["b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn option_partial_consumption_feeds_first_argument() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        builder.allow_multiple_arguments_per_token(true);
        let root = builder.root();
        let take = builder
            .option(root, &["--take"], Arity::between(0, 3))
            .unwrap();
        builder.converter(
            take,
            Box::new(|result| {
                result.only_take(1);
                ArgumentConversionResult::Success(Value::Single(
                    result.tokens()[0].text().to_string(),
                ))
            }),
        );
        let rest = builder.argument(root, "rest", Arity::zero_or_more()).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![
            Token::option("--take"),
            Token::value("a"),
            Token::value("b"),
            Token::value("c"),
        ]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(outcome.value::<String>(take), Ok("a".to_string()));
        assert_eq!(
            outcome.values::<String>(rest),
            Ok(vec!["b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn partial_consumption_without_sibling_is_unmatched() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let head = builder.argument(root, "head", Arity::at_least(1)).unwrap();
        builder.converter(
            head,
            Box::new(|result| {
                result.only_take(1);
                ArgumentConversionResult::Success(Value::Single(
                    result.tokens()[0].text().to_string(),
                ))
            }),
        );
        let grammar = builder.build();

        let outcome = grammar.parse(vec![Token::value("a"), Token::value("b")]);

        assert_eq!(
            outcome.unmatched().iter().map(Token::text).collect::<Vec<_>>(),
            vec!["b"]
        );
        assert_eq!(
            outcome.errors(),
            &[ParseError::UnrecognizedToken("b".to_string())]
        );
    }

    #[test]
    fn subcommand_chain_materializes_both_scopes() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let verbose = builder.flag(root, &["--verbose"]).unwrap();
        builder.global(verbose);
        let fetch = builder.command(root, &["fetch"]).unwrap();
        let depth = builder.option(fetch, &["--depth"], Arity::exactly(1)).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![
            Token::value("fetch"),
            Token::option("--depth"),
            Token::value("3"),
            Token::option("--verbose"),
        ]);

        assert_eq!(outcome.errors(), &[]);
        assert_eq!(outcome.selected_command(), fetch);
        assert_eq!(outcome.value::<u32>(depth), Ok(3));
        assert_eq!(outcome.value::<bool>(verbose), Ok(true));
    }

    #[test]
    fn off_chain_symbol_has_no_conversion() {
        let mut builder = GrammarBuilder::new("tool").unwrap();
        let root = builder.root();
        let fetch = builder.command(root, &["fetch"]).unwrap();
        let depth = builder.argument(fetch, "depth", Arity::exactly(1)).unwrap();
        let grammar = builder.build();

        let outcome = grammar.parse(vec![]);

        assert_eq!(outcome.selected_command(), root);
        assert!(outcome.conversion(depth).is_none());
        assert_matches!(
            outcome.value::<u32>(depth),
            Err(ParseError::ConversionFailed { .. })
        );
    }
}
