//! Prize pool derivation from collected fees and pot values

use crate::lottery::pot::{Amount, PotConfiguration};
use crate::lottery::ticket::Ticket;
use serde::{Deserialize, Serialize};

/// Share of collected fees that goes into the prize pool. The rest is retained.
pub const PRIZE_SHARE: f64 = 0.8;

/// Pool figures for one variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrizePool {
    pub paid_count: usize,
    pub total_collected: Amount,
    pub allocated_share: f64,
    pub weekly_total: Amount,
    pub accumulated: Amount,
    pub guaranteed_minimum: Amount,
    /// Never negative
    pub total_pool: f64,
}

impl PrizePool {
    /// Whole-unit prize for each top-tier winner.
    ///
    /// Zero winners pay nothing; the pool is not passed down to lower hit counts.
    /// Otherwise the floored even split, raised to the guaranteed minimum.
    pub fn per_winner_prize(&self, winner_count: usize) -> Amount {
        if winner_count == 0 {
            return 0;
        }
        let share = (self.total_pool / winner_count as f64).floor() as Amount;
        share.max(self.guaranteed_minimum)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrizePoolCalculator {
    prize_share: f64,
}

impl Default for PrizePoolCalculator {
    fn default() -> Self {
        Self::new(PRIZE_SHARE)
    }
}

impl PrizePoolCalculator {
    pub fn new(prize_share: f64) -> Self {
        Self {
            prize_share: prize_share.clamp(0.0, 1.0),
        }
    }

    pub fn prize_share(&self) -> f64 {
        self.prize_share
    }

    /// Free tickets and incomplete tickets bring in no fees.
    pub fn compute<'a, I>(&self, tickets: I, pot: &PotConfiguration) -> PrizePool
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let paid_count = tickets
            .into_iter()
            .filter(|ticket| ticket.is_complete() && !ticket.is_free())
            .count();

        let total_collected = Amount::try_from(paid_count)
            .unwrap_or(Amount::MAX)
            .saturating_mul(pot.ticket_price());
        let allocated_share = total_collected as f64 * self.prize_share;
        let weekly_total = pot.weekly_total();
        let accumulated = pot.accumulated();
        let total_pool = (allocated_share + weekly_total as f64 + accumulated as f64).max(0.0);

        PrizePool {
            paid_count,
            total_collected,
            allocated_share,
            weekly_total,
            accumulated,
            guaranteed_minimum: pot.guaranteed_minimum(),
            total_pool,
        }
    }
}
