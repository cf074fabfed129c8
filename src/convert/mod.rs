//! The conversion engine: turns a result's claimed tokens (or a computed
//! default) into a typed value, memoized per result, with every failure
//! reported as data on the shared tree.

use crate::grammar::{Grammar, SymbolId};
use crate::tree::{ArgumentResult, ParseError, SymbolResult, SymbolResultTree};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A converted value: a closed variant of the supported shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// No value (zero tokens on an optional position).
    Empty,
    /// A boolean presence value.
    Flag(bool),
    /// A single raw token text.
    Single(String),
    /// An ordered sequence of raw token texts.
    Sequence(Vec<String>),
}

/// The outcome of converting one result's tokens.
///
/// Never an exception; always returned as data, and computed at most once per
/// result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentConversionResult {
    /// Conversion produced a value.
    Success(Value),
    /// Conversion failed; the error also lands on the tree's error list.
    Failure(ParseError),
    /// The symbol carries no argument (arity maximum of zero).
    NoArgument,
}

impl ArgumentConversionResult {
    /// Convenience for custom converters signalling failure over a specific
    /// token.
    pub fn failure(
        symbol: impl Into<String>,
        token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ArgumentConversionResult::Failure(ParseError::ConversionFailed {
            symbol: symbol.into(),
            token: token.into(),
            message: message.into(),
        })
    }
}

/// Convert one result, memoized.
///
/// `owner_implicit` skips the arity check when the owning option result was
/// never supplied in input. The skip applies to implicit option owners only,
/// never to implicit command ancestors.
pub(crate) fn convert_argument(
    grammar: &Grammar,
    id: SymbolId,
    result: &mut ArgumentResult,
    owner_implicit: bool,
) -> ArgumentConversionResult {
    if let Some(memoized) = result.memoized() {
        return memoized.clone();
    }

    result.begin_conversion();
    let outcome = compute(grammar, id, result, owner_implicit);
    result.end_conversion();
    result.memoize(outcome.clone());

    #[cfg(feature = "tracing_debug")]
    {
        debug!(
            "converted '{name}': {outcome:?}",
            name = grammar.display_name(id)
        );
    }

    outcome
}

fn compute(
    grammar: &Grammar,
    id: SymbolId,
    result: &mut ArgumentResult,
    owner_implicit: bool,
) -> ArgumentConversionResult {
    let data = grammar.data(id);
    let arity = data.arity();

    if !arity.takes_values() {
        return ArgumentConversionResult::NoArgument;
    }

    let provided = result.tokens().len();

    if !owner_implicit && !arity.admits(provided) {
        let error = if provided < arity.minimum() as usize {
            ParseError::ArityTooFew {
                symbol: data.display_name().to_string(),
                provided,
                minimum: arity.minimum(),
            }
        } else {
            ParseError::ArityTooMany {
                symbol: data.display_name().to_string(),
                provided,
                maximum: arity
                    .maximum()
                    .expect("internal error - too-many requires a bounded maximum"),
            }
        };
        return ArgumentConversionResult::Failure(error);
    }

    if provided == 0 {
        if let Some(factory) = data.default_factory() {
            // The factory sees a fresh, scoped result so it can report domain
            // errors through the same channel as conversion.
            let mut scoped = ArgumentResult::scoped(id, data.parent());
            let value = factory(&mut scoped);
            let mut errors = scoped.drain_errors();

            if !errors.is_empty() {
                let first = errors.remove(0);
                for error in errors {
                    result.report(error);
                }
                return ArgumentConversionResult::Failure(first);
            }

            if let Some(value) = value {
                result.mark_implicit();
                return ArgumentConversionResult::Success(value);
            }
        }
    }

    if let Some(converter) = data.converter() {
        return converter(result);
    }

    match arity.maximum() {
        Some(1) => match result.tokens() {
            [] => ArgumentConversionResult::Success(Value::Empty),
            [token] => ArgumentConversionResult::Success(Value::Single(token.text().to_string())),
            _ => unreachable!("internal error - the arity check admits at most one token"),
        },
        _ => ArgumentConversionResult::Success(Value::Sequence(
            result
                .tokens()
                .iter()
                .map(|token| token.text().to_string())
                .collect(),
        )),
    }
}

/// Run conversion for a symbol's result in the tree, appending any failures
/// and reported domain errors to the shared error list.
pub(crate) fn run(grammar: &Grammar, tree: &mut SymbolResultTree, id: SymbolId) {
    let mut result = match tree.take(id) {
        Some(result) => result,
        None => return,
    };

    let owner_implicit = matches!(&result, SymbolResult::Option(option) if option.is_implicit());

    if owner_implicit {
        let data = grammar.data(id);

        // A valued option absent from input with nothing to compute a value
        // from produces no conversion outcome at all, only the missing-option
        // error already on the tree. Flags still convert, so presence reads
        // false.
        if data.arity().takes_values()
            && data.default_factory().is_none()
            && data.converter().is_none()
        {
            tree.restore(id, result);
            return;
        }
    }

    if let Some(argument) = result.as_argument_mut() {
        if argument.memoized().is_none() {
            let outcome = convert_argument(grammar, id, argument, owner_implicit);

            for error in argument.drain_errors() {
                tree.push_error(error);
            }

            if let ArgumentConversionResult::Failure(error) = &outcome {
                tree.push_error(error.clone());
            }
        }
    }

    tree.restore(id, result);
}
