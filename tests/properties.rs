//! Property checks for hit counting and prize allocation

use polla::lottery::pot::WEEK;
use polla::lottery::{Amount, HitCounter, PotConfiguration, PrizePoolCalculator, ALPHABET};
use polla::{GameVariant, ResultsAggregator, Ticket, WinningNumberSet};
use proptest::prelude::*;

fn arb_variant() -> impl Strategy<Value = GameVariant> {
    prop_oneof![Just(GameVariant::Polla), Just(GameVariant::Micro)]
}

/// Up to `max` distinct symbols, in random order
fn arb_numbers(max: usize) -> impl Strategy<Value = Vec<&'static str>> {
    Just(ALPHABET.to_vec())
        .prop_shuffle()
        .prop_flat_map(move |shuffled| (0..=max).prop_map(move |len| shuffled[..len].to_vec()))
}

fn arb_pot() -> impl Strategy<Value = PotConfiguration> {
    (
        prop::collection::vec(-500i64..5_000, 7),
        -500i64..5_000,
        -100i64..1_000,
        -50i64..200,
    )
        .prop_map(|(daily, accumulated, guaranteed, price)| {
            let mut pot = PotConfiguration::new(price);
            for (day, amount) in WEEK.into_iter().zip(daily) {
                pot.set_daily(day, amount);
            }
            pot.set_accumulated(accumulated);
            pot.set_guaranteed_minimum(guaranteed);
            pot
        })
}

fn arb_tickets(variant: GameVariant) -> impl Strategy<Value = Vec<Ticket>> {
    prop::collection::vec((arb_numbers(variant.pick_size()), any::<bool>()), 0..12).prop_map(
        move |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (numbers, free))| {
                    Ticket::filled(index as u32 + 1, variant, "Jugador", &numbers, free)
                        .expect("distinct symbols are always valid")
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn hits_match_set_intersection(
        variant in arb_variant(),
        ticket_numbers in arb_numbers(6),
        winning_numbers in arb_numbers(6),
    ) {
        let pick = variant.pick_size();
        let ticket_numbers = &ticket_numbers[..ticket_numbers.len().min(pick)];
        let winning_numbers = &winning_numbers[..winning_numbers.len().min(pick)];
        let ticket = Ticket::filled(1, variant, "Jugador", ticket_numbers, false).unwrap();
        let winning = WinningNumberSet::from_raw(variant, winning_numbers).unwrap();

        let expected = ticket_numbers.iter().filter(|n| winning_numbers.contains(n)).count();
        let hits = HitCounter::count_hits(&ticket, &winning);

        prop_assert_eq!(hits, expected);
        prop_assert!(hits <= pick);
        prop_assert_eq!(HitCounter::count_hits(&ticket, &WinningNumberSet::empty(variant)), 0);
    }

    #[test]
    fn replacing_with_same_numbers_is_idempotent(
        variant in arb_variant(),
        numbers in arb_numbers(3),
        ticket_numbers in arb_numbers(3),
    ) {
        let ticket = Ticket::filled(1, variant, "Jugador", &ticket_numbers, false).unwrap();
        let mut winning = WinningNumberSet::from_raw(variant, &numbers).unwrap();
        let first = HitCounter::count_hits(&ticket, &winning);

        winning.replace(&numbers).unwrap();

        prop_assert_eq!(HitCounter::count_hits(&ticket, &winning), first);
    }

    #[test]
    fn pool_and_prize_invariants(
        (variant, tickets) in arb_variant().prop_flat_map(|v| (Just(v), arb_tickets(v))),
        winning_numbers in arb_numbers(6),
        pot in arb_pot(),
    ) {
        let winning_numbers = &winning_numbers[..winning_numbers.len().min(variant.pick_size())];
        let winning = WinningNumberSet::from_raw(variant, winning_numbers).unwrap();

        let set = ResultsAggregator::default().compute_results(&tickets, &winning, &pot, variant);
        let summary = &set.summary;

        prop_assert!(summary.total_pool >= 0.0);
        if summary.winners == 0 {
            prop_assert_eq!(summary.prize_per_winner, 0);
        } else {
            prop_assert!(summary.prize_per_winner >= pot.guaranteed_minimum());
        }
        prop_assert_eq!(set.winners().count(), summary.winners);
        prop_assert!(set.results.windows(2).all(|pair| pair[0].hits >= pair[1].hits));
    }

    #[test]
    fn free_tickets_never_add_revenue(
        tickets in arb_tickets(GameVariant::Micro),
        price in 0i64..500,
    ) {
        let pot = PotConfiguration::new(price);
        let pool = PrizePoolCalculator::default().compute(&tickets, &pot);
        let paid = tickets.iter().filter(|t| t.is_complete() && !t.is_free()).count();

        prop_assert_eq!(pool.paid_count, paid);
        prop_assert_eq!(pool.total_collected, paid as Amount * price);
    }
}
