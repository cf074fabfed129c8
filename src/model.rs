/// The cardinality of value tokens a symbol may bind.
///
/// Inspired by argparse: <https://docs.python.org/3/library/argparse.html#nargs>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    minimum: u8,
    maximum: Option<u8>,
}

impl Arity {
    /// Precisely `n` values.
    pub fn exactly(n: u8) -> Self {
        Self {
            minimum: n,
            maximum: Some(n),
        }
    }

    /// No values at all (a presence flag).
    pub fn zero() -> Self {
        Self::exactly(0)
    }

    /// `?`: zero or one value.
    pub fn zero_or_one() -> Self {
        Self {
            minimum: 0,
            maximum: Some(1),
        }
    }

    /// `*`: any number of values, including zero.
    pub fn zero_or_more() -> Self {
        Self {
            minimum: 0,
            maximum: None,
        }
    }

    /// `+`: at least `n` values, unbounded above.
    pub fn at_least(n: u8) -> Self {
        Self {
            minimum: n,
            maximum: None,
        }
    }

    /// Between `minimum` and `maximum` values, inclusive.
    pub fn between(minimum: u8, maximum: u8) -> Self {
        if minimum > maximum {
            panic!("arity minimum ({minimum}) must not exceed maximum ({maximum})");
        }

        Self {
            minimum,
            maximum: Some(maximum),
        }
    }

    /// The declared minimum.
    pub fn minimum(&self) -> u8 {
        self.minimum
    }

    /// The declared maximum, where `None` is unbounded.
    pub fn maximum(&self) -> Option<u8> {
        self.maximum
    }

    pub(crate) fn admits(&self, count: usize) -> bool {
        if count < self.minimum as usize {
            return false;
        }

        match self.maximum {
            Some(maximum) => count <= maximum as usize,
            None => true,
        }
    }

    pub(crate) fn takes_values(&self) -> bool {
        !matches!(self.maximum, Some(0))
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.maximum {
            Some(maximum) if maximum == self.minimum => write!(f, "{{{maximum}}}"),
            Some(maximum) => write!(f, "{{{min}..{maximum}}}", min = self.minimum),
            None => write!(f, "{{{min}..}}", min = self.minimum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{distributions::Standard, prelude::Distribution, thread_rng, Rng};
    use rstest::rstest;

    impl Distribution<Arity> for Standard {
        fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Arity {
            match rng.gen_range(0..2) {
                0 => {
                    let maximum: u8 = rng.gen();

                    if maximum == 0 {
                        Arity::between(0, maximum)
                    } else {
                        Arity::between(rng.gen_range(0..maximum), maximum)
                    }
                }
                1 => Arity::at_least(rng.gen()),
                _ => unreachable!("internal error - impossible gen_range()"),
            }
        }
    }

    #[test]
    fn constructors() {
        assert_eq!(Arity::exactly(1), Arity::between(1, 1));
        assert_eq!(Arity::zero(), Arity::exactly(0));
        assert_eq!(Arity::zero_or_one(), Arity::between(0, 1));
        assert_eq!(Arity::zero_or_more(), Arity::at_least(0));
        assert_eq!(Arity::at_least(2).maximum(), None);
    }

    #[test]
    #[should_panic]
    fn between_inverted() {
        Arity::between(2, 1);
    }

    #[rstest]
    #[case(Arity::zero(), 0, true)]
    #[case(Arity::zero(), 1, false)]
    #[case(Arity::exactly(1), 0, false)]
    #[case(Arity::exactly(1), 1, true)]
    #[case(Arity::exactly(1), 2, false)]
    #[case(Arity::between(1, 3), 0, false)]
    #[case(Arity::between(1, 3), 2, true)]
    #[case(Arity::between(1, 3), 4, false)]
    #[case(Arity::zero_or_more(), 0, true)]
    #[case(Arity::zero_or_more(), 100, true)]
    #[case(Arity::at_least(1), 0, false)]
    #[case(Arity::at_least(1), 100, true)]
    fn admits(#[case] arity: Arity, #[case] count: usize, #[case] expected: bool) {
        assert_eq!(arity.admits(count), expected);
    }

    #[test]
    fn takes_values() {
        assert!(!Arity::zero().takes_values());
        assert!(Arity::exactly(1).takes_values());
        assert!(Arity::zero_or_more().takes_values());

        for _ in 0..100 {
            let arity: Arity = thread_rng().gen();
            assert_eq!(arity.takes_values(), arity.maximum() != Some(0));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Arity::exactly(1).to_string(), "{1}");
        assert_eq!(Arity::between(1, 3).to_string(), "{1..3}");
        assert_eq!(Arity::at_least(2).to_string(), "{2..}");
    }
}
