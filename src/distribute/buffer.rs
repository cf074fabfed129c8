use crate::grammar::SymbolId;
use crate::token::Token;

/// An in-progress token claim for one symbol.
///
/// At most one buffer is open at a time; the distributor flushes it into the
/// tree whenever another symbol starts claiming.
#[derive(Debug)]
pub(super) struct ClaimBuffer {
    symbol: SymbolId,
    option: bool,
    capacity: Option<usize>,
    tokens: Vec<Token>,
}

impl ClaimBuffer {
    pub(super) fn argument(symbol: SymbolId, capacity: Option<usize>) -> Self {
        Self {
            symbol,
            option: false,
            capacity,
            tokens: Vec::default(),
        }
    }

    pub(super) fn option(symbol: SymbolId, capacity: Option<usize>) -> Self {
        Self {
            symbol,
            option: true,
            capacity,
            tokens: Vec::default(),
        }
    }

    pub(super) fn is_option(&self) -> bool {
        self.option
    }

    pub(super) fn push(&mut self, token: Token) {
        if !self.is_open() {
            unreachable!("internal error - tokens may only be pushed to an open buffer");
        }

        self.tokens.push(token);
    }

    pub(super) fn is_open(&self) -> bool {
        match self.capacity {
            Some(n) => self.tokens.len() < n,
            None => true,
        }
    }

    pub(super) fn into_parts(self) -> (SymbolId, bool, Vec<Token>) {
        (self.symbol, self.option, self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0), 0, false)]
    #[case(Some(1), 0, true)]
    #[case(Some(1), 1, false)]
    #[case(Some(2), 1, true)]
    #[case(None, 0, true)]
    #[case(None, 100, true)]
    fn open_tracks_capacity(
        #[case] capacity: Option<usize>,
        #[case] feed: usize,
        #[case] remains_open: bool,
    ) {
        let mut buffer = ClaimBuffer::argument(SymbolId(1), capacity);

        for index in 0..feed {
            buffer.push(Token::value(index.to_string()));
        }

        assert_eq!(buffer.is_open(), remains_open);
    }

    #[test]
    fn into_parts_preserves_order() {
        let mut buffer = ClaimBuffer::option(SymbolId(2), Some(3));
        buffer.push(Token::value("a"));
        buffer.push(Token::value("b"));

        let (symbol, option, tokens) = buffer.into_parts();
        assert_eq!(symbol, SymbolId(2));
        assert!(option);
        assert_eq!(
            tokens.iter().map(|t| t.text()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    #[should_panic(expected = "internal error")]
    fn push_past_capacity() {
        let mut buffer = ClaimBuffer::argument(SymbolId(1), Some(1));
        buffer.push(Token::value("a"));
        buffer.push(Token::value("b"));
    }
}
