use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChoiceKeyError {
    #[error("choice key must be a single letter A-E, got {raw:?}")]
    Invalid { raw: String },

    #[error("choice text cannot be empty")]
    EmptyText,
}

//
// ─── CHOICE KEY ────────────────────────────────────────────────────────────────
//

/// Single-letter identifier of an answer option.
///
/// Keys come from the fixed ordered alphabet `A..=E`; ordering follows the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
    E,
}

impl ChoiceKey {
    /// The full alphabet, in display order.
    pub const ALPHABET: [ChoiceKey; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Parses a key from a character, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `ChoiceKeyError::Invalid` for characters outside `A..=E`.
    pub fn from_char(ch: char) -> Result<Self, ChoiceKeyError> {
        match ch.to_ascii_uppercase() {
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::C),
            'D' => Ok(Self::D),
            'E' => Ok(Self::E),
            _ => Err(ChoiceKeyError::Invalid {
                raw: ch.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }

    /// 1-based position within the alphabet.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
            Self::D => 4,
            Self::E => 5,
        }
    }

    /// Circled numeral used by answered/unanswered indicators.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::A => '①',
            Self::B => '②',
            Self::C => '③',
            Self::D => '④',
            Self::E => '⑤',
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_char(), f)
    }
}

impl FromStr for ChoiceKey {
    type Err = ChoiceKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch),
            _ => Err(ChoiceKeyError::Invalid { raw: s.to_string() }),
        }
    }
}

impl TryFrom<String> for ChoiceKey {
    type Error = ChoiceKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChoiceKey> for String {
    fn from(key: ChoiceKey) -> Self {
        key.as_char().to_string()
    }
}

//
// ─── CHOICE ────────────────────────────────────────────────────────────────────
//

/// One answer option: a key plus the text shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    key: ChoiceKey,
    text: String,
}

impl Choice {
    /// # Errors
    ///
    /// Returns `ChoiceKeyError::EmptyText` if the text is blank.
    pub fn new(key: ChoiceKey, text: impl Into<String>) -> Result<Self, ChoiceKeyError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ChoiceKeyError::EmptyText);
        }
        Ok(Self { key, text })
    }

    #[must_use]
    pub fn key(&self) -> ChoiceKey {
        self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
