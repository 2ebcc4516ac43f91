//! Number validation shared by ticket edits and winning-set replacement

use crate::errors::ValidationError;
use crate::lottery::types::{GameVariant, Symbol};

/// Pure predicates over the number alphabet.
///
/// The alphabet is the same for every variant; the variant only bounds how many
/// numbers a ticket or a draw may hold.
pub struct NumberValidator;

impl NumberValidator {
    /// True iff `symbol` is one of "0", "00", "1".."36"
    pub fn is_valid(symbol: &str, _variant: GameVariant) -> bool {
        Symbol::lookup(symbol).is_some()
    }

    /// False iff `symbol` already appears in `existing`
    pub fn is_unique_within_ticket(symbol: Symbol, existing: &[Symbol]) -> bool {
        !existing.contains(&symbol)
    }

    /// Parse a single cell value
    pub fn parse(symbol: &str, variant: GameVariant) -> Result<Symbol, ValidationError> {
        if !Self::is_valid(symbol, variant) {
            return Err(ValidationError::InvalidSymbol(symbol.trim().to_string()));
        }
        Symbol::parse(symbol)
    }

    /// Validate a whole list of numbers for `variant`.
    ///
    /// Fails on the first invalid or repeated value, or when more than pick-size values
    /// are given. Nothing is returned on failure, so callers never apply a partial list.
    pub fn validate_numbers<S: AsRef<str>>(
        raw: &[S],
        variant: GameVariant,
    ) -> Result<Vec<Symbol>, ValidationError> {
        if raw.len() > variant.pick_size() {
            return Err(ValidationError::TooManyNumbers {
                variant: variant.to_string(),
                count: raw.len(),
                max: variant.pick_size(),
            });
        }

        let mut accepted = Vec::with_capacity(raw.len());
        for value in raw {
            let symbol = Self::parse(value.as_ref(), variant)?;
            if !Self::is_unique_within_ticket(symbol, &accepted) {
                return Err(ValidationError::DuplicateSymbol(symbol.to_string()));
            }
            accepted.push(symbol);
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_membership() {
        assert!(NumberValidator::is_valid("0", GameVariant::Polla));
        assert!(NumberValidator::is_valid("00", GameVariant::Micro));
        assert!(NumberValidator::is_valid("36", GameVariant::Polla));
        assert!(NumberValidator::is_valid(" 12 ", GameVariant::Polla));
        assert!(!NumberValidator::is_valid("37", GameVariant::Polla));
        assert!(!NumberValidator::is_valid("", GameVariant::Micro));
    }

    #[test]
    fn test_uniqueness() {
        let existing = NumberValidator::validate_numbers(&["5", "9"], GameVariant::Micro).unwrap();

        assert!(!NumberValidator::is_unique_within_ticket(Symbol::parse("5").unwrap(), &existing));
        assert!(NumberValidator::is_unique_within_ticket(Symbol::parse("7").unwrap(), &existing));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = NumberValidator::validate_numbers(&["5", "5", "9"], GameVariant::Micro);
        assert_eq!(result, Err(ValidationError::DuplicateSymbol("5".to_string())));
    }

    #[test]
    fn test_zero_and_double_zero_together_are_valid() {
        let numbers = NumberValidator::validate_numbers(&["0", "00", "1"], GameVariant::Micro).unwrap();
        assert_eq!(numbers.len(), 3);
    }

    #[test]
    fn test_too_many_numbers() {
        let result = NumberValidator::validate_numbers(&["1", "2", "3", "4"], GameVariant::Micro);
        assert!(matches!(result, Err(ValidationError::TooManyNumbers { count: 4, max: 3, .. })));
    }

    #[test]
    fn test_invalid_symbol_reported() {
        let result = NumberValidator::validate_numbers(&["1", "40"], GameVariant::Polla);
        assert_eq!(result, Err(ValidationError::InvalidSymbol("40".to_string())));
    }
}
