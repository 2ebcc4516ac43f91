use crate::lottery::ticket::Ticket;
use crate::lottery::types::{GameVariant, Symbol};
use crate::lottery::winning::WinningNumberSet;
use serde::{Deserialize, Serialize};

/// Counts matches between ticket numbers and the active draw.
///
/// Always computed from scratch; hit counts are never cached on tickets.
pub struct HitCounter;

impl HitCounter {
    pub fn count_hits(ticket: &Ticket, winning: &WinningNumberSet) -> usize {
        Self::count_numbers(&ticket.numbers(), winning)
    }

    /// Hits for a bare list of numbers, used for live cell highlighting
    pub fn count_numbers(numbers: &[Symbol], winning: &WinningNumberSet) -> usize {
        numbers.iter().filter(|symbol| winning.contains(**symbol)).count()
    }
}

/// Display tier for a hit count. Only `Jackpot` carries money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", content = "hits", rename_all = "lowercase")]
pub enum HitTier {
    Jackpot,
    Partial(usize),
    Miss,
}

impl HitTier {
    /// Polla shades every partial count from 1 to 5; Micro shades 1 and 2.
    pub fn classify(hits: usize, variant: GameVariant, winning: &WinningNumberSet) -> Self {
        let top = variant.pick_size();
        if !winning.is_empty() && hits == top && hits > 0 {
            HitTier::Jackpot
        } else if hits > 0 && hits < top {
            HitTier::Partial(hits)
        } else {
            HitTier::Miss
        }
    }

    pub fn is_jackpot(self) -> bool {
        matches!(self, HitTier::Jackpot)
    }
}
