use std::fmt::{Display, Formatter};

/// Key for an undirected edge or a candidate friend pair.
///
/// The only constructor orders the two endpoints, so `(a, b)` and `(b, a)`
/// always produce the same key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnorderedPair<T> {
    low: T,
    high: T
}

impl<T: Ord> UnorderedPair<T> {
    pub fn new(a: T, b: T) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

impl<T> UnorderedPair<T> {
    pub fn low(&self) -> &T {
        &self.low
    }

    pub fn high(&self) -> &T {
        &self.high
    }
}

impl<T: PartialEq> UnorderedPair<T> {
    pub fn is_loop(&self) -> bool {
        self.low == self.high
    }
}

/// Renders as `low;high`, the pair column of the output table.
impl<T: Display> Display for UnorderedPair<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{};{}", self.low, self.high)
    }
}
