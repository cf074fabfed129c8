use thiserror::Error;

/// The category of a [`ParseError`], exposed for callers that branch on the
/// failure class rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Fewer tokens claimed than the symbol's arity minimum.
    ArityTooFew,
    /// More tokens claimed than the symbol's arity maximum.
    ArityTooMany,
    /// Token text could not be converted to the declared value shape.
    ConversionFailed,
    /// A token matched no symbol and exceeded all arguments' capacity.
    UnrecognizedToken,
    /// An option supplied more times than its arity permits.
    DuplicateOption,
    /// A required option absent from input.
    MissingRequiredOption,
}

/// An end-user input error.
///
/// Always reported as data, accumulated on the result tree; never thrown as
/// control flow. Parsing continues best-effort so one pass surfaces every
/// node's problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not enough tokens provided to a symbol.
    #[error("not enough tokens provided to '{symbol}' (provided={provided}, expected at least {minimum}).")]
    ArityTooFew {
        /// The symbol's display name.
        symbol: String,
        /// The number of tokens claimed.
        provided: usize,
        /// The arity minimum.
        minimum: u8,
    },

    /// Too many tokens provided to a symbol.
    #[error("too many tokens provided to '{symbol}' (provided={provided}, expected at most {maximum}).")]
    ArityTooMany {
        /// The symbol's display name.
        symbol: String,
        /// The number of tokens claimed.
        provided: usize,
        /// The arity maximum.
        maximum: u8,
    },

    /// A token's text could not be converted to the declared value type.
    #[error("cannot convert '{token}' for '{symbol}': {message}")]
    ConversionFailed {
        /// The symbol's display name.
        symbol: String,
        /// The offending token text.
        token: String,
        /// A human-readable explanation.
        message: String,
    },

    /// A token matched no command, option, or argument.
    #[error("unrecognized token '{0}'.")]
    UnrecognizedToken(String),

    /// An option supplied more times than its arity permits.
    #[error("cannot duplicate the option '{0}'.")]
    DuplicateOption(String),

    /// A required option was absent from input.
    #[error("the required option '{0}' was not provided.")]
    MissingRequiredOption(String),
}

impl ParseError {
    /// The error's category.
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::ArityTooFew { .. } => ParseErrorKind::ArityTooFew,
            ParseError::ArityTooMany { .. } => ParseErrorKind::ArityTooMany,
            ParseError::ConversionFailed { .. } => ParseErrorKind::ConversionFailed,
            ParseError::UnrecognizedToken(_) => ParseErrorKind::UnrecognizedToken,
            ParseError::DuplicateOption(_) => ParseErrorKind::DuplicateOption,
            ParseError::MissingRequiredOption(_) => ParseErrorKind::MissingRequiredOption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let error = ParseError::ArityTooFew {
            symbol: "path".to_string(),
            provided: 0,
            minimum: 1,
        };
        assert_eq!(error.kind(), ParseErrorKind::ArityTooFew);
        assert_eq!(
            ParseError::UnrecognizedToken("x".to_string()).kind(),
            ParseErrorKind::UnrecognizedToken
        );
    }

    #[test]
    fn messages() {
        use crate::test::assert_contains;

        let error = ParseError::MissingRequiredOption("name".to_string());
        assert_eq!(
            error.to_string(),
            "the required option 'name' was not provided."
        );

        let error = ParseError::ConversionFailed {
            symbol: "depth".to_string(),
            token: "deep".to_string(),
            message: "cannot interpret as u32".to_string(),
        };
        assert_contains!(error.to_string(), "deep");
        assert_contains!(error.to_string(), "depth");
    }
}
