use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zero-based position of a question within its bank.
///
/// Assigned once at load time and never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionIndex(usize);

impl QuestionIndex {
    /// Creates a new `QuestionIndex`
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying zero-based value
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }

    /// 1-based number shown to people (`Q1`, `Q2`, ...).
    #[must_use]
    pub fn display_number(&self) -> usize {
        self.0 + 1
    }

    /// Inverse of [`display_number`](Self::display_number). `0` has no index.
    #[must_use]
    pub fn from_display_number(number: usize) -> Option<Self> {
        number.checked_sub(1).map(Self)
    }
}

impl fmt::Debug for QuestionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionIndex({})", self.0)
    }
}

impl fmt::Display for QuestionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr ───────────────────────────────────────────────────────────────────

/// Error type for parsing an index from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIndexError {
    raw: String,
}

impl fmt::Display for ParseIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse QuestionIndex from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIndexError {}

impl FromStr for QuestionIndex {
    type Err = ParseIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map(QuestionIndex::new)
            .map_err(|_| ParseIndexError { raw: s.to_string() })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_zero_based() {
        let index = QuestionIndex::new(4);
        assert_eq!(index.to_string(), "4");
        assert_eq!(format!("{index:?}"), "QuestionIndex(4)");
    }

    #[test]
    fn display_number_is_one_based() {
        assert_eq!(QuestionIndex::new(0).display_number(), 1);
        assert_eq!(
            QuestionIndex::from_display_number(3),
            Some(QuestionIndex::new(2))
        );
        assert_eq!(QuestionIndex::from_display_number(0), None);
    }

    #[test]
    fn from_str_accepts_padding() {
        let index: QuestionIndex = " 12 ".parse().unwrap();
        assert_eq!(index, QuestionIndex::new(12));
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("-1".parse::<QuestionIndex>().is_err());
        assert!("q1".parse::<QuestionIndex>().is_err());
    }
}
