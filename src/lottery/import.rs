//! Bulk ticket entry from spreadsheet-style text
//!
//! Each line is `name, n1 .. nK [, free]` with columns separated by tabs, commas or
//! semicolons. Lines that fail validation are reported individually and never applied.

use crate::errors::ValidationError;
use crate::lottery::types::{GameVariant, Symbol};
use crate::lottery::validator::NumberValidator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRow {
    pub player_name: String,
    pub numbers: Vec<Symbol>,
    /// `None` when the column was absent
    pub is_free: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLine {
    /// 1-based line number in the pasted text
    pub line: usize,
    pub row: Result<ImportedRow, ValidationError>,
}

pub fn parse_paste(text: &str, variant: GameVariant) -> Vec<ImportLine> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| ImportLine {
            line: index + 1,
            row: parse_row(line, variant),
        })
        .collect()
}

fn parse_row(line: &str, variant: GameVariant) -> Result<ImportedRow, ValidationError> {
    let columns: Vec<&str> = line.split(['\t', ',', ';']).map(str::trim).collect();
    let pick_size = variant.pick_size();

    let player_name = columns.first().copied().unwrap_or_default().to_string();
    let number_columns: Vec<&str> = columns
        .iter()
        .skip(1)
        .take(pick_size)
        .copied()
        .filter(|value| !value.is_empty())
        .collect();
    let numbers = NumberValidator::validate_numbers(&number_columns, variant)?;
    let is_free = columns.get(1 + pick_size).map(|value| is_yes(value));

    Ok(ImportedRow {
        player_name,
        numbers,
        is_free,
    })
}

fn is_yes(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "yes" | "y"
    )
}
