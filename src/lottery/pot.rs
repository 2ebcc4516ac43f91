//! Per-variant pot values entered by the operator
//!
//! Input is tolerant: anything that does not read as a non-negative whole number is
//! stored as 0 instead of being rejected.

use crate::errors::ValidationError;
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

/// Whole currency units
pub type Amount = i64;

/// Fee per paid ticket when nothing else is configured
pub const DEFAULT_TICKET_PRICE: Amount = 30;

/// Days of the week in pot order, Monday first
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotConfiguration {
    daily: [Amount; 7],
    accumulated: Amount,
    guaranteed_minimum: Amount,
    ticket_price: Amount,
}

impl Default for PotConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_PRICE)
    }
}

impl PotConfiguration {
    pub fn new(ticket_price: Amount) -> Self {
        Self {
            daily: [0; 7],
            accumulated: 0,
            guaranteed_minimum: 0,
            ticket_price: ticket_price.max(0),
        }
    }

    /// Sum of the seven daily contributions, saturating at `Amount::MAX`
    pub fn weekly_total(&self) -> Amount {
        self.daily.iter().fold(0, |total: Amount, day| total.saturating_add(*day))
    }

    pub fn daily_contribution(&self, day: Weekday) -> Amount {
        self.daily[day.num_days_from_monday() as usize]
    }

    pub fn accumulated(&self) -> Amount {
        self.accumulated
    }

    pub fn guaranteed_minimum(&self) -> Amount {
        self.guaranteed_minimum
    }

    pub fn ticket_price(&self) -> Amount {
        self.ticket_price
    }

    pub fn set_daily(&mut self, day: Weekday, amount: Amount) {
        self.daily[day.num_days_from_monday() as usize] = amount.max(0);
    }

    pub fn set_accumulated(&mut self, amount: Amount) {
        self.accumulated = amount.max(0);
    }

    pub fn set_guaranteed_minimum(&mut self, amount: Amount) {
        self.guaranteed_minimum = amount.max(0);
    }

    pub fn set_ticket_price(&mut self, amount: Amount) {
        self.ticket_price = amount.max(0);
    }

    /// Zero the seven days, leaving accumulated, guarantee and price alone
    pub fn clear_weekly(&mut self) {
        self.daily = [0; 7];
    }
}

/// Read operator text the way the pot inputs do: the leading integer, or 0.
///
/// Negative values are coerced to 0.
pub fn coerce_amount(raw: &str) -> Amount {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<Amount>()
        .map(|value| (sign * value).max(0))
        .unwrap_or(0)
}

/// Parse a day label: Spanish names (with or without accents) or anything chrono accepts
pub fn parse_day(raw: &str) -> Result<Weekday, ValidationError> {
    let label = raw.trim().to_lowercase();
    let day = match label.as_str() {
        "lunes" => Weekday::Mon,
        "martes" => Weekday::Tue,
        "miércoles" | "miercoles" => Weekday::Wed,
        "jueves" => Weekday::Thu,
        "viernes" => Weekday::Fri,
        "sábado" | "sabado" => Weekday::Sat,
        "domingo" => Weekday::Sun,
        other => other
            .parse::<Weekday>()
            .map_err(|_| ValidationError::UnknownDay(raw.trim().to_string()))?,
    };
    Ok(day)
}

/// Spanish label used on the pot board
pub fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Current local weekday, highlighted on the pot board
pub fn today() -> Weekday {
    chrono::Local::now().weekday()
}
