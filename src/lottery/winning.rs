//! The active winning-number set of each variant

use crate::errors::ValidationError;
use crate::lottery::types::{GameVariant, Symbol};
use crate::lottery::validator::NumberValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Draw lifecycle of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawState {
    NoDraw,
    Drawn,
}

/// Drawn numbers for one variant. An empty set means no draw yet, or cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningNumberSet {
    variant: GameVariant,
    numbers: BTreeSet<Symbol>,
}

impl WinningNumberSet {
    pub fn empty(variant: GameVariant) -> Self {
        Self {
            variant,
            numbers: BTreeSet::new(),
        }
    }

    /// Validate raw input into a set. Invalid, repeated or surplus numbers are rejected.
    pub fn from_raw<S: AsRef<str>>(variant: GameVariant, raw: &[S]) -> Result<Self, ValidationError> {
        let symbols = NumberValidator::validate_numbers(raw, variant)?;
        Ok(Self {
            variant,
            numbers: symbols.into_iter().collect(),
        })
    }

    /// Discard the current numbers and install `raw`.
    ///
    /// Validation happens before anything is touched, so a rejected set leaves the
    /// previous draw in place.
    pub fn replace<S: AsRef<str>>(&mut self, raw: &[S]) -> Result<(), ValidationError> {
        let next = Self::from_raw(self.variant, raw)?;
        *self = next;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.numbers.clear();
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.numbers.contains(&symbol)
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    /// Numbers in board order
    pub fn numbers(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.numbers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn state(&self) -> DrawState {
        if self.numbers.is_empty() {
            DrawState::NoDraw
        } else {
            DrawState::Drawn
        }
    }
}
