/// The classification assigned to a token by the external tokenizer.
///
/// The distributor re-validates this against the declared grammar rather than
/// trusting it blindly: an [`TokenKind::Option`] token matching no alias in
/// scope is treated as a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A candidate command name.
    Command,
    /// A candidate option identifier (`-v`, `--verbose`).
    Option,
    /// A plain value.
    Value,
    /// The `--` separator; ends option recognition for the scope.
    Separator,
    /// A directive; recorded on the parse result, never distributed.
    Directive,
}

/// An immutable raw input token.
///
/// The core never mutates a token's text, only which symbol claims it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    /// Create a token with an explicit classification.
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Shorthand for a [`TokenKind::Value`] token.
    pub fn value(text: impl Into<String>) -> Self {
        Self::new(text, TokenKind::Value)
    }

    /// Shorthand for a [`TokenKind::Option`] token.
    pub fn option(text: impl Into<String>) -> Self {
        Self::new(text, TokenKind::Option)
    }

    /// Shorthand for a [`TokenKind::Command`] token.
    pub fn command(text: impl Into<String>) -> Self {
        Self::new(text, TokenKind::Command)
    }

    /// Shorthand for the `--` separator token.
    pub fn separator() -> Self {
        Self::new("--", TokenKind::Separator)
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The tokenizer's classification.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub(crate) fn identifier_shaped(&self) -> bool {
        matches!(self.kind, TokenKind::Option) || self.text.starts_with('-')
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthands() {
        assert_eq!(Token::value("a"), Token::new("a", TokenKind::Value));
        assert_eq!(Token::option("-v"), Token::new("-v", TokenKind::Option));
        assert_eq!(Token::command("fetch"), Token::new("fetch", TokenKind::Command));
        assert_eq!(Token::separator(), Token::new("--", TokenKind::Separator));
    }

    #[test]
    fn identifier_shaped() {
        assert!(Token::option("verbose").identifier_shaped());
        assert!(Token::value("-v").identifier_shaped());
        assert!(!Token::value("v").identifier_shaped());
    }

    #[test]
    fn display() {
        assert_eq!(Token::value("/tmp").to_string(), "/tmp");
    }
}
