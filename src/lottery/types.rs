use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every number a player may pick, in board order. "0" and "00" are distinct.
pub const ALPHABET: [&str; 38] = [
    "0", "00", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15",
    "16", "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30", "31",
    "32", "33", "34", "35", "36",
];

/// Supported game variants
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    Polla,
    Micro,
}

impl GameVariant {
    pub const ALL: [GameVariant; 2] = [GameVariant::Polla, GameVariant::Micro];

    /// Numbers per ticket, which is also the only paying hit count
    pub const fn pick_size(self) -> usize {
        match self {
            GameVariant::Polla => 6,
            GameVariant::Micro => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GameVariant::Polla => "polla",
            GameVariant::Micro => "micro",
        }
    }

    /// Name shown to operators
    pub const fn title(self) -> &'static str {
        match self {
            GameVariant::Polla => "Polla",
            GameVariant::Micro => "Micro",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polla" => Ok(GameVariant::Polla),
            "micro" => Ok(GameVariant::Micro),
            other => Err(ValidationError::UnknownVariant(other.to_string())),
        }
    }
}

/// A validated lottery number.
///
/// Stored as its position in [`ALPHABET`], so a `Symbol` can only ever hold one of the
/// 38 allowed values. Serializes as its textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(u8);

impl Symbol {
    /// Look up a raw cell value. Surrounding whitespace is ignored.
    pub fn lookup(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        ALPHABET
            .iter()
            .position(|candidate| *candidate == raw)
            .map(|index| Symbol(index as u8))
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::lookup(raw).ok_or_else(|| ValidationError::InvalidSymbol(raw.trim().to_string()))
    }

    pub fn as_str(self) -> &'static str {
        ALPHABET[self.0 as usize]
    }

    /// All 38 symbols in board order
    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..ALPHABET.len() as u8).map(Symbol)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.as_str().to_string()
    }
}
