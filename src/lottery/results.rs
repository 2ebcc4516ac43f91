//! Ranked, prize-annotated results for one variant
//!
//! Play counts, winner counts and pool figures are always derived here from the
//! current tickets, draw and pot. Nothing is kept as a separately updated counter.

use crate::lottery::hits::{HitCounter, HitTier};
use crate::lottery::pot::{Amount, PotConfiguration};
use crate::lottery::prize_pool::PrizePoolCalculator;
use crate::lottery::ticket::Ticket;
use crate::lottery::types::{GameVariant, Symbol};
use crate::lottery::winning::{DrawState, WinningNumberSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// One complete ticket with its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeResult {
    pub ticket: Ticket,
    pub hits: usize,
    pub tier: HitTier,
    pub prize_amount: Amount,
    /// 1-based position after ranking
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub variant: GameVariant,
    pub draw_state: DrawState,
    pub winning_numbers: Vec<Symbol>,
    pub total_tickets: usize,
    pub free_tickets: usize,
    pub paid_tickets: usize,
    pub winners: usize,
    pub ticket_price: Amount,
    pub total_collected: Amount,
    pub allocated_share: f64,
    pub weekly_total: Amount,
    pub accumulated: Amount,
    pub guaranteed_minimum: Amount,
    pub total_pool: f64,
    pub prize_per_winner: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub results: Vec<PrizeResult>,
    pub summary: ResultSummary,
}

impl ResultSet {
    pub fn winners(&self) -> impl Iterator<Item = &PrizeResult> {
        self.results.iter().filter(|result| result.tier.is_jackpot())
    }

    /// Case-insensitive substring match on the player name; an empty term matches all
    pub fn search(&self, term: &str) -> Vec<&PrizeResult> {
        let term = term.trim().to_lowercase();
        self.results
            .iter()
            .filter(|result| term.is_empty() || result.ticket.player_name().to_lowercase().contains(&term))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsAggregator {
    calculator: PrizePoolCalculator,
}

impl ResultsAggregator {
    pub fn new(calculator: PrizePoolCalculator) -> Self {
        Self { calculator }
    }

    /// Hits, winners, prizes and ranks for every complete ticket of `variant`.
    ///
    /// Only tickets hitting all pick-size numbers win, and they split the pool evenly
    /// whether or not the ticket was free.
    pub fn compute_results<'a, I>(
        &self,
        tickets: I,
        winning: &WinningNumberSet,
        pot: &PotConfiguration,
        variant: GameVariant,
    ) -> ResultSet
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let no_draw;
        let winning = if winning.variant() == variant {
            winning
        } else {
            warn!(
                expected = %variant,
                got = %winning.variant(),
                "Winning set belongs to another variant; treating as no draw"
            );
            no_draw = WinningNumberSet::empty(variant);
            &no_draw
        };

        let complete: Vec<&Ticket> = tickets
            .into_iter()
            .filter(|ticket| ticket.variant() == variant && ticket.is_complete())
            .collect();

        let top_tier = variant.pick_size();
        let scored: Vec<(&Ticket, usize)> = complete
            .iter()
            .map(|ticket| (*ticket, HitCounter::count_hits(ticket, winning)))
            .collect();
        let winner_count = scored.iter().filter(|(_, hits)| *hits == top_tier).count();

        let pool = self.calculator.compute(complete.iter().copied(), pot);
        let prize_per_winner = pool.per_winner_prize(winner_count);

        let mut results: Vec<PrizeResult> = scored
            .into_iter()
            .map(|(ticket, hits)| PrizeResult {
                ticket: ticket.clone(),
                hits,
                tier: HitTier::classify(hits, variant, winning),
                prize_amount: if hits == top_tier { prize_per_winner } else { 0 },
                rank: 0,
            })
            .collect();

        results.sort_by(rank_order);
        for (index, result) in results.iter_mut().enumerate() {
            result.rank = index + 1;
        }

        let free_tickets = complete.iter().filter(|ticket| ticket.is_free()).count();
        let summary = ResultSummary {
            variant,
            draw_state: winning.state(),
            winning_numbers: winning.numbers().collect(),
            total_tickets: complete.len(),
            free_tickets,
            paid_tickets: pool.paid_count,
            winners: winner_count,
            ticket_price: pot.ticket_price(),
            total_collected: pool.total_collected,
            allocated_share: pool.allocated_share,
            weekly_total: pool.weekly_total,
            accumulated: pool.accumulated,
            guaranteed_minimum: pool.guaranteed_minimum,
            total_pool: pool.total_pool,
            prize_per_winner,
        };

        debug!(
            variant = %variant,
            tickets = summary.total_tickets,
            winners = summary.winners,
            total_pool = summary.total_pool,
            prize_per_winner = summary.prize_per_winner,
            "Recomputed results"
        );

        ResultSet { results, summary }
    }
}

/// Most hits first. Ties without hits keep row order; other ties go by player name.
fn rank_order(a: &PrizeResult, b: &PrizeResult) -> Ordering {
    b.hits.cmp(&a.hits).then_with(|| {
        if a.hits == 0 {
            a.ticket.id().cmp(&b.ticket.id())
        } else {
            compare_names(a.ticket.player_name(), b.ticket.player_name())
                .then_with(|| a.ticket.id().cmp(&b.ticket.id()))
        }
    })
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: u32, variant: GameVariant, name: &str, numbers: &[&str], free: bool) -> Ticket {
        Ticket::filled(id, variant, name, numbers, free).unwrap()
    }

    #[test]
    fn test_no_draw_zeroes_everything() {
        let tickets = vec![
            ticket(1, GameVariant::Micro, "Ana", &["1", "2", "3"], false),
            ticket(2, GameVariant::Micro, "Beto", &["4", "5", "6"], false),
        ];
        let mut pot = PotConfiguration::new(30);
        pot.set_accumulated(1_000);

        let set = ResultsAggregator::default().compute_results(
            &tickets,
            &WinningNumberSet::empty(GameVariant::Micro),
            &pot,
            GameVariant::Micro,
        );

        assert_eq!(set.summary.draw_state, DrawState::NoDraw);
        assert_eq!(set.summary.prize_per_winner, 0);
        assert!(set.results.iter().all(|r| r.hits == 0 && r.prize_amount == 0));
        assert_eq!(set.winners().count(), 0);
    }

    #[test]
    fn test_free_winner_shares_prize() {
        let winning = WinningNumberSet::from_raw(GameVariant::Micro, &["1", "2", "3"]).unwrap();
        let tickets = vec![
            ticket(1, GameVariant::Micro, "Paga", &["1", "2", "3"], false),
            ticket(2, GameVariant::Micro, "Gratis", &["3", "2", "1"], true),
            ticket(3, GameVariant::Micro, "Nada", &["7", "8", "9"], false),
        ];
        let pot = PotConfiguration::new(50);

        let set = ResultsAggregator::default().compute_results(&tickets, &winning, &pot, GameVariant::Micro);

        // 2 paid * 50 * 0.8 = 80, split between two winners
        assert_eq!(set.summary.winners, 2);
        assert_eq!(set.summary.free_tickets, 1);
        assert_eq!(set.summary.paid_tickets, 2);
        assert_eq!(set.summary.prize_per_winner, 40);
        assert_eq!(set.winners().count(), 2);
        assert!(set.winners().all(|r| r.prize_amount == 40));
    }

    #[test]
    fn test_ranking_rules() {
        let winning = WinningNumberSet::from_raw(GameVariant::Polla, &["1", "2", "3", "4", "5", "6"]).unwrap();
        let tickets = vec![
            ticket(1, GameVariant::Polla, "Zoe", &["10", "11", "12", "13", "14", "15"], false),
            ticket(2, GameVariant::Polla, "Mario", &["1", "2", "20", "21", "22", "23"], false),
            ticket(3, GameVariant::Polla, "Adela", &["10", "11", "12", "13", "14", "16"], false),
            ticket(4, GameVariant::Polla, "luis", &["1", "2", "30", "31", "32", "33"], false),
            ticket(5, GameVariant::Polla, "Bruno", &["6", "5", "4", "3", "2", "1"], false),
        ];

        let set = ResultsAggregator::default().compute_results(
            &tickets,
            &winning,
            &PotConfiguration::new(30),
            GameVariant::Polla,
        );

        let order: Vec<&str> = set.results.iter().map(|r| r.ticket.player_name()).collect();
        assert_eq!(order, vec!["Bruno", "luis", "Mario", "Zoe", "Adela"]);
        let ranks: Vec<usize> = set.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert_eq!(set.results[0].tier, HitTier::Jackpot);
        assert_eq!(set.results[1].tier, HitTier::Partial(2));
    }

    #[test]
    fn test_incomplete_and_foreign_tickets_excluded() {
        let winning = WinningNumberSet::from_raw(GameVariant::Micro, &["1", "2", "3"]).unwrap();
        let mut unnamed = Ticket::new(2, GameVariant::Micro);
        unnamed.set_numbers(&["1", "2", "3"]).unwrap();
        let tickets = vec![
            ticket(1, GameVariant::Micro, "Ana", &["1", "2", "3"], false),
            unnamed,
            ticket(3, GameVariant::Polla, "Otro", &["1", "2", "3", "4", "5", "6"], false),
        ];

        let set = ResultsAggregator::default().compute_results(
            &tickets,
            &winning,
            &PotConfiguration::new(30),
            GameVariant::Micro,
        );

        assert_eq!(set.summary.total_tickets, 1);
        assert_eq!(set.summary.total_collected, 30);
    }

    #[test]
    fn test_search_by_name() {
        let tickets = vec![
            ticket(1, GameVariant::Micro, "María José", &["1", "2", "3"], false),
            ticket(2, GameVariant::Micro, "José Luis", &["4", "5", "6"], false),
            ticket(3, GameVariant::Micro, "Ana", &["7", "8", "9"], false),
        ];
        let set = ResultsAggregator::default().compute_results(
            &tickets,
            &WinningNumberSet::empty(GameVariant::Micro),
            &PotConfiguration::new(30),
            GameVariant::Micro,
        );

        assert_eq!(set.search("josé").len(), 2);
        assert_eq!(set.search("").len(), 3);
        assert!(set.search("pedro").is_empty());
    }
}
