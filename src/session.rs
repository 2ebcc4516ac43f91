//! Operator session over both game variants
//!
//! The session owns the authoritative in-memory state. Every edit is validated and
//! applied locally first, then written to the stores. A failed write never undoes the
//! local change; it comes back as a [`Notice`] on the returned [`Outcome`].

use crate::coalesce::WriteCoalescer;
use crate::config::PollaConfig;
use crate::errors::{PollaError, ValidationError};
use crate::lottery::{
    parse_paste, Amount, GameVariant, NumberValidator, PotConfiguration, PrizePoolCalculator,
    ResultSet, ResultsAggregator, Ticket, TicketBook, TicketId, WinningNumberSet,
};
use crate::store::{PotWriteSink, Stores};
use chrono::Weekday;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A persistence problem the operator should see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub action: String,
    pub variant: GameVariant,
    pub message: String,
}

impl Notice {
    fn persistence(action: &str, variant: GameVariant, error: &PollaError) -> Self {
        warn!(action, variant = %variant, error = %error, "Persistence failed, keeping local state");
        Self {
            action: action.to_string(),
            variant,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] could not {}: {}", self.variant.title(), self.action, self.message)
    }
}

/// Result of an operation whose local effect always happened
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> Outcome<T> {
    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Outcome of a bulk paste
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: Vec<TicketId>,
    /// Pasted line number and the reason it was skipped
    pub rejected: Vec<(usize, ValidationError)>,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub polla_ticket_price: Amount,
    pub micro_ticket_price: Amount,
    pub prize_share: f64,
    pub debounce: Duration,
}

impl SessionOptions {
    pub fn from_config(config: &PollaConfig) -> Self {
        Self {
            polla_ticket_price: config.ticket_price(GameVariant::Polla),
            micro_ticket_price: config.ticket_price(GameVariant::Micro),
            prize_share: config.game.prize_share,
            debounce: config.debounce_window(),
        }
    }

    fn ticket_price(&self, variant: GameVariant) -> Amount {
        match variant {
            GameVariant::Polla => self.polla_ticket_price,
            GameVariant::Micro => self.micro_ticket_price,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&PollaConfig::default())
    }
}

struct VariantState {
    book: TicketBook,
    draw: WinningNumberSet,
    pot: PotConfiguration,
}

pub struct LotterySession {
    stores: Stores,
    aggregator: ResultsAggregator,
    polla: VariantState,
    micro: VariantState,
    pot_writer: WriteCoalescer<GameVariant, PotConfiguration>,
}

impl LotterySession {
    /// Build a session from whatever the stores hold. Unreadable records start empty.
    pub async fn load(stores: Stores, options: SessionOptions) -> Outcome<Self> {
        let mut notices = Vec::new();
        let polla = Self::load_variant(&stores, GameVariant::Polla, &options, &mut notices).await;
        let micro = Self::load_variant(&stores, GameVariant::Micro, &options, &mut notices).await;

        let sink = Arc::new(PotWriteSink::new(stores.pots.clone()));
        let session = Self {
            aggregator: ResultsAggregator::new(PrizePoolCalculator::new(options.prize_share)),
            pot_writer: WriteCoalescer::new(sink, options.debounce),
            stores,
            polla,
            micro,
        };

        info!(
            polla_tickets = session.polla.book.len(),
            micro_tickets = session.micro.book.len(),
            "Session loaded"
        );
        Outcome {
            value: session,
            notices,
        }
    }

    async fn load_variant(
        stores: &Stores,
        variant: GameVariant,
        options: &SessionOptions,
        notices: &mut Vec<Notice>,
    ) -> VariantState {
        let mut book = TicketBook::new(variant);
        match stores.tickets.list_all(variant).await {
            Ok(tickets) => tickets.into_iter().for_each(|ticket| book.insert(ticket)),
            Err(e) => notices.push(Notice::persistence("load tickets", variant, &e)),
        }

        let draw = match stores.draws.get_active(variant).await {
            Ok(Some(set)) => set,
            Ok(None) => WinningNumberSet::empty(variant),
            Err(e) => {
                notices.push(Notice::persistence("load winning numbers", variant, &e));
                WinningNumberSet::empty(variant)
            }
        };

        let pot = match stores.pots.get(variant).await {
            Ok(Some(pot)) => pot,
            Ok(None) => PotConfiguration::new(options.ticket_price(variant)),
            Err(e) => {
                notices.push(Notice::persistence("load pot", variant, &e));
                PotConfiguration::new(options.ticket_price(variant))
            }
        };

        VariantState { book, draw, pot }
    }

    fn state(&self, variant: GameVariant) -> &VariantState {
        match variant {
            GameVariant::Polla => &self.polla,
            GameVariant::Micro => &self.micro,
        }
    }

    fn state_mut(&mut self, variant: GameVariant) -> &mut VariantState {
        match variant {
            GameVariant::Polla => &mut self.polla,
            GameVariant::Micro => &mut self.micro,
        }
    }

    pub fn book(&self, variant: GameVariant) -> &TicketBook {
        &self.state(variant).book
    }

    pub fn ticket(&self, variant: GameVariant, id: TicketId) -> Option<&Ticket> {
        self.state(variant).book.get(id)
    }

    pub fn winning(&self, variant: GameVariant) -> &WinningNumberSet {
        &self.state(variant).draw
    }

    pub fn pot(&self, variant: GameVariant) -> &PotConfiguration {
        &self.state(variant).pot
    }

    /// Ranked results derived from the current state
    pub fn results(&self, variant: GameVariant) -> ResultSet {
        let state = self.state(variant);
        self.aggregator
            .compute_results(state.book.tickets(), &state.draw, &state.pot, variant)
    }

    fn ticket_mut(&mut self, variant: GameVariant, id: TicketId) -> Result<&mut Ticket, ValidationError> {
        self.state_mut(variant)
            .book
            .get_mut(id)
            .ok_or(ValidationError::UnknownTicket(id))
    }

    /// Attach background pot-write failures to an outcome
    fn outcome<T>(&self, value: T, mut notices: Vec<Notice>) -> Outcome<T> {
        for (variant, message) in self.pot_writer.take_failures() {
            notices.push(Notice {
                action: "save pot".to_string(),
                variant,
                message,
            });
        }
        Outcome { value, notices }
    }

    /// Mirror one row to the ticket store: blank rows are removed, others upserted
    async fn persist_ticket(&mut self, variant: GameVariant, id: TicketId) -> Outcome<()> {
        let Some(ticket) = self.ticket(variant, id).cloned() else {
            return self.outcome((), Vec::new());
        };

        let mut notices = Vec::new();
        if ticket.is_blank() {
            if let Some(storage_id) = ticket.storage_id() {
                match self.stores.tickets.delete(storage_id).await {
                    Ok(()) => {
                        if let Ok(row) = self.ticket_mut(variant, id) {
                            row.forget_storage_id();
                        }
                    }
                    Err(e) => notices.push(Notice::persistence("delete ticket", variant, &e)),
                }
            }
        } else {
            match self.stores.tickets.upsert(&ticket).await {
                Ok(storage_id) => {
                    if let Ok(row) = self.ticket_mut(variant, id) {
                        row.assign_storage_id(storage_id);
                    }
                }
                Err(e) => notices.push(Notice::persistence("save ticket", variant, &e)),
            }
        }
        self.outcome((), notices)
    }

    /// Append a filled ticket. Nothing is allocated if the numbers are rejected.
    pub async fn add_ticket<S: AsRef<str>>(
        &mut self,
        variant: GameVariant,
        player_name: &str,
        numbers: &[S],
        is_free: bool,
    ) -> Result<Outcome<TicketId>, ValidationError> {
        NumberValidator::validate_numbers(numbers, variant)?;

        let book = &mut self.state_mut(variant).book;
        let id = book.allocate();
        book.insert(Ticket::filled(id, variant, player_name, numbers, is_free)?);

        let outcome = self.persist_ticket(variant, id).await;
        Ok(Outcome {
            value: id,
            notices: outcome.notices,
        })
    }

    /// Allocate an empty row for cell-by-cell entry
    pub fn new_row(&mut self, variant: GameVariant) -> TicketId {
        self.state_mut(variant).book.allocate()
    }

    pub async fn set_player_name(
        &mut self,
        variant: GameVariant,
        id: TicketId,
        name: &str,
    ) -> Result<Outcome<()>, ValidationError> {
        self.ticket_mut(variant, id)?.set_player_name(name);
        Ok(self.persist_ticket(variant, id).await)
    }

    pub async fn set_number(
        &mut self,
        variant: GameVariant,
        id: TicketId,
        slot: usize,
        raw: &str,
    ) -> Result<Outcome<()>, ValidationError> {
        self.ticket_mut(variant, id)?.set_number(slot, raw)?;
        Ok(self.persist_ticket(variant, id).await)
    }

    pub async fn set_numbers<S: AsRef<str>>(
        &mut self,
        variant: GameVariant,
        id: TicketId,
        numbers: &[S],
    ) -> Result<Outcome<()>, ValidationError> {
        self.ticket_mut(variant, id)?.set_numbers(numbers)?;
        Ok(self.persist_ticket(variant, id).await)
    }

    pub async fn set_free(
        &mut self,
        variant: GameVariant,
        id: TicketId,
        is_free: bool,
    ) -> Result<Outcome<()>, ValidationError> {
        self.ticket_mut(variant, id)?.set_free(is_free);
        Ok(self.persist_ticket(variant, id).await)
    }

    /// Apply several field edits to one ticket as a single change.
    ///
    /// The edits are made on a copy, so a rejected number list leaves the name and free
    /// flag untouched too. The ticket is persisted once.
    pub async fn edit_ticket<S: AsRef<str>>(
        &mut self,
        variant: GameVariant,
        id: TicketId,
        name: Option<&str>,
        numbers: Option<&[S]>,
        is_free: Option<bool>,
    ) -> Result<Outcome<()>, ValidationError> {
        let ticket = self.ticket_mut(variant, id)?;
        let mut edited = ticket.clone();
        if let Some(numbers) = numbers {
            edited.set_numbers(numbers)?;
        }
        if let Some(name) = name {
            edited.set_player_name(name);
        }
        if let Some(is_free) = is_free {
            edited.set_free(is_free);
        }
        *ticket = edited;
        Ok(self.persist_ticket(variant, id).await)
    }

    /// Flip the free flag and return the new value
    pub async fn toggle_free(
        &mut self,
        variant: GameVariant,
        id: TicketId,
    ) -> Result<Outcome<bool>, ValidationError> {
        let is_free = self.ticket_mut(variant, id)?.toggle_free();
        let outcome = self.persist_ticket(variant, id).await;
        Ok(Outcome {
            value: is_free,
            notices: outcome.notices,
        })
    }

    /// Clear a row in place and delete its stored record
    pub async fn delete_ticket(
        &mut self,
        variant: GameVariant,
        id: TicketId,
    ) -> Result<Outcome<()>, ValidationError> {
        let before = self
            .state_mut(variant)
            .book
            .clear(id)
            .ok_or(ValidationError::UnknownTicket(id))?;

        let mut notices = Vec::new();
        if let Some(storage_id) = before.storage_id() {
            if let Err(e) = self.stores.tickets.delete(storage_id).await {
                notices.push(Notice::persistence("delete ticket", variant, &e));
            }
        }

        info!(variant = %variant, ticket_id = id, player = before.player_name(), "Deleted ticket");
        Ok(self.outcome((), notices))
    }

    /// Delete the highest-numbered row that still holds data
    pub async fn delete_last(&mut self, variant: GameVariant) -> Outcome<Option<TicketId>> {
        let Some(id) = self.book(variant).last_filled() else {
            return self.outcome(None, Vec::new());
        };
        let notices = self
            .delete_ticket(variant, id)
            .await
            .map(|outcome| outcome.notices)
            .unwrap_or_default();
        Outcome {
            value: Some(id),
            notices,
        }
    }

    /// Drop every ticket of `variant` and return how many held data
    pub async fn reset_plays(&mut self, variant: GameVariant) -> Outcome<usize> {
        let book = &mut self.state_mut(variant).book;
        let cleared = book.tickets().filter(|ticket| !ticket.is_blank()).count();
        book.reset();

        let mut notices = Vec::new();
        if let Err(e) = self.stores.tickets.delete_all(variant).await {
            notices.push(Notice::persistence("delete all tickets", variant, &e));
        }

        info!(variant = %variant, cleared, "Reset plays");
        self.outcome(cleared, notices)
    }

    /// Add every valid pasted row; invalid rows are reported and skipped
    pub async fn import_paste(&mut self, variant: GameVariant, text: &str) -> Outcome<ImportReport> {
        let mut report = ImportReport::default();
        let mut notices = Vec::new();

        for line in parse_paste(text, variant) {
            let row = match line.row {
                Ok(row) => row,
                Err(e) => {
                    report.rejected.push((line.line, e));
                    continue;
                }
            };
            let numbers: Vec<&str> = row.numbers.iter().map(|symbol| symbol.as_str()).collect();
            match self
                .add_ticket(variant, &row.player_name, &numbers, row.is_free.unwrap_or(false))
                .await
            {
                Ok(outcome) => {
                    report.added.push(outcome.value);
                    notices.extend(outcome.notices);
                }
                Err(e) => report.rejected.push((line.line, e)),
            }
        }

        info!(
            variant = %variant,
            added = report.added.len(),
            rejected = report.rejected.len(),
            "Imported pasted tickets"
        );
        self.outcome(report, notices)
    }

    /// Install a new winning set. A rejected set leaves the current one in place.
    pub async fn replace_winning<S: AsRef<str>>(
        &mut self,
        variant: GameVariant,
        numbers: &[S],
    ) -> Result<Outcome<()>, ValidationError> {
        self.state_mut(variant).draw.replace(numbers)?;
        let set = self.state(variant).draw.clone();
        info!(variant = %variant, numbers = set.len(), "Winning numbers replaced");

        let mut notices = Vec::new();
        if let Err(e) = self.stores.draws.replace_active(&set).await {
            notices.push(Notice::persistence("save winning numbers", variant, &e));
        }
        Ok(self.outcome((), notices))
    }

    pub async fn clear_winning(&mut self, variant: GameVariant) -> Outcome<()> {
        self.state_mut(variant).draw.clear();
        info!(variant = %variant, "Winning numbers cleared");

        let mut notices = Vec::new();
        if let Err(e) = self.stores.draws.delete_active(variant).await {
            notices.push(Notice::persistence("clear winning numbers", variant, &e));
        }
        self.outcome((), notices)
    }

    /// Apply a pot edit now and schedule the debounced write
    fn update_pot<F>(&mut self, variant: GameVariant, edit: F) -> Outcome<()>
    where
        F: FnOnce(&mut PotConfiguration),
    {
        let pot = &mut self.state_mut(variant).pot;
        edit(pot);
        let snapshot = pot.clone();
        self.pot_writer.submit(variant, snapshot);
        self.outcome((), Vec::new())
    }

    pub fn set_daily(&mut self, variant: GameVariant, day: Weekday, amount: Amount) -> Outcome<()> {
        self.update_pot(variant, |pot| pot.set_daily(day, amount))
    }

    pub fn set_accumulated(&mut self, variant: GameVariant, amount: Amount) -> Outcome<()> {
        self.update_pot(variant, |pot| pot.set_accumulated(amount))
    }

    pub fn set_guaranteed(&mut self, variant: GameVariant, amount: Amount) -> Outcome<()> {
        self.update_pot(variant, |pot| pot.set_guaranteed_minimum(amount))
    }

    pub fn set_ticket_price(&mut self, variant: GameVariant, amount: Amount) -> Outcome<()> {
        self.update_pot(variant, |pot| pot.set_ticket_price(amount))
    }

    pub fn clear_weekly_pot(&mut self, variant: GameVariant) -> Outcome<()> {
        info!(variant = %variant, "Clearing weekly pot");
        self.update_pot(variant, PotConfiguration::clear_weekly)
    }

    /// Write pending pot edits without waiting for the debounce window
    pub async fn flush(&self) -> Outcome<()> {
        let notices = self
            .pot_writer
            .flush_now()
            .await
            .into_iter()
            .map(|(variant, e)| Notice::persistence("save pot", variant, &e))
            .collect();
        self.outcome((), notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, PotStore, TicketStore, WinningSetStore};
    use crate::lottery::Symbol;

    fn options() -> SessionOptions {
        SessionOptions {
            debounce: Duration::from_secs(60),
            ..SessionOptions::default()
        }
    }

    async fn session_with(store: &Arc<MemoryStore>) -> LotterySession {
        let outcome = LotterySession::load(Stores::shared(store.clone()), options()).await;
        assert!(outcome.is_clean());
        outcome.into_value()
    }

    #[tokio::test]
    async fn test_edits_are_persisted_and_reloaded() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;

        let id = session
            .add_ticket(GameVariant::Micro, "Ana", &["2", "7", "30"], false)
            .await
            .unwrap()
            .into_value();
        let outcome = session.set_number(GameVariant::Micro, id, 2, "19").await.unwrap();
        assert!(outcome.is_clean());
        assert!(session.ticket(GameVariant::Micro, id).unwrap().storage_id().is_some());

        let stored = store.list_all(GameVariant::Micro).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].numbers()[2], Symbol::parse("19").unwrap());

        let reloaded = session_with(&store).await;
        assert_eq!(reloaded.book(GameVariant::Micro).len(), 1);
        assert_eq!(reloaded.ticket(GameVariant::Micro, id).unwrap().player_name(), "Ana");
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_ticket() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;
        let id = session
            .add_ticket(GameVariant::Micro, "Beto", &["5", "6", "9"], false)
            .await
            .unwrap()
            .into_value();
        let before = session.ticket(GameVariant::Micro, id).unwrap().clone();

        let err = session
            .set_numbers(GameVariant::Micro, id, &["5", "5", "9"])
            .await
            .unwrap_err();

        assert_eq!(err, ValidationError::DuplicateSymbol("5".to_string()));
        assert_eq!(session.ticket(GameVariant::Micro, id).unwrap(), &before);
        assert!(matches!(
            session.add_ticket(GameVariant::Micro, "Otro", &["1", "x"], false).await,
            Err(ValidationError::InvalidSymbol(_))
        ));
        assert_eq!(session.book(GameVariant::Micro).len(), 1);
    }

    #[tokio::test]
    async fn test_combined_edit_is_all_or_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;
        let variant = GameVariant::Polla;
        let id = session
            .add_ticket(variant, "Carmen", &["1", "2", "3", "4", "5", "6"], false)
            .await
            .unwrap()
            .into_value();
        let before = session.ticket(variant, id).unwrap().clone();

        let err = session
            .edit_ticket(variant, id, Some("Carmela"), Some(&["7", "7"][..]), Some(true))
            .await
            .unwrap_err();

        assert_eq!(err, ValidationError::DuplicateSymbol("7".to_string()));
        assert_eq!(session.ticket(variant, id).unwrap(), &before);
        let stored = store.list_all(variant).await.unwrap();
        assert_eq!(stored[0].player_name(), "Carmen");

        let outcome = session
            .edit_ticket(variant, id, Some("Carmela"), Some(&["8", "9"][..]), None)
            .await
            .unwrap();
        assert!(outcome.is_clean());
        let ticket = session.ticket(variant, id).unwrap();
        assert_eq!(ticket.player_name(), "Carmela");
        assert_eq!(ticket.numbers().len(), 2);
        assert!(!ticket.is_free());
        assert_eq!(store.list_all(variant).await.unwrap()[0].player_name(), "Carmela");
    }

    #[tokio::test]
    async fn test_store_failure_becomes_notice() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;
        store.set_offline(true);

        let outcome = session
            .add_ticket(GameVariant::Polla, "Carla", &["1", "2", "3", "4", "5", "6"], true)
            .await
            .unwrap();
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].action, "save ticket");

        let outcome = session.replace_winning(GameVariant::Polla, &["1", "2"]).await.unwrap();
        assert!(!outcome.is_clean());

        // local state is untouched by the failures
        assert_eq!(session.book(GameVariant::Polla).complete_tickets().count(), 1);
        assert_eq!(session.winning(GameVariant::Polla).len(), 2);
    }

    #[tokio::test]
    async fn test_winning_set_replacement() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;

        session.replace_winning(GameVariant::Micro, &["1", "2", "3"]).await.unwrap();
        session.replace_winning(GameVariant::Micro, &["4", "5", "6"]).await.unwrap();
        assert!(session.replace_winning(GameVariant::Micro, &["4", "4"]).await.is_err());

        let active = store.get_active(GameVariant::Micro).await.unwrap().unwrap();
        assert_eq!(&active, session.winning(GameVariant::Micro));
        assert!(active.contains(Symbol::parse("6").unwrap()));

        let outcome = session.clear_winning(GameVariant::Micro).await;
        assert!(outcome.is_clean());
        assert_eq!(store.get_active(GameVariant::Micro).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pot_edits_are_coalesced() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;

        assert!(session.set_daily(GameVariant::Polla, Weekday::Mon, 100).is_clean());
        assert!(session.set_daily(GameVariant::Polla, Weekday::Mon, 150).is_clean());
        assert!(session.set_accumulated(GameVariant::Polla, 20).is_clean());
        assert_eq!(session.pot(GameVariant::Polla).weekly_total(), 150);
        assert_eq!(store.get(GameVariant::Polla).await.unwrap(), None);

        assert!(session.flush().await.is_clean());
        let stored = store.get(GameVariant::Polla).await.unwrap().unwrap();
        assert_eq!(stored.weekly_total(), 150);
        assert_eq!(stored.accumulated(), 20);
    }

    #[tokio::test]
    async fn test_delete_last_and_reset() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;
        for name in ["Ana", "Beto", "Carla"] {
            let _ = session
                .add_ticket(GameVariant::Micro, name, &["1", "2", "3"], false)
                .await
                .unwrap();
        }

        let outcome = session.delete_last(GameVariant::Micro).await;
        assert_eq!(outcome.value, Some(3));
        assert!(session.ticket(GameVariant::Micro, 3).unwrap().is_blank());
        assert_eq!(store.list_all(GameVariant::Micro).await.unwrap().len(), 2);

        let outcome = session.reset_plays(GameVariant::Micro).await;
        assert_eq!(outcome.value, 2);
        assert!(session.book(GameVariant::Micro).is_empty());
        assert!(store.list_all(GameVariant::Micro).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_paste() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;

        let report = session
            .import_paste(GameVariant::Micro, "Ana,1,2,3,si\nBeto,4,4,5\n\nCarla;7;8;9")
            .await
            .into_value();

        assert_eq!(report.added, vec![1, 2]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, 2);
        assert!(session.ticket(GameVariant::Micro, 1).unwrap().is_free());
        assert_eq!(session.ticket(GameVariant::Micro, 2).unwrap().player_name(), "Carla");
    }

    #[tokio::test]
    async fn test_results_follow_state() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_with(&store).await;
        let _ = session
            .add_ticket(GameVariant::Micro, "Ana", &["1", "2", "3"], false)
            .await
            .unwrap();
        let _ = session.set_ticket_price(GameVariant::Micro, 50);
        session.replace_winning(GameVariant::Micro, &["1", "2", "3"]).await.unwrap();

        let results = session.results(GameVariant::Micro);
        assert_eq!(results.summary.winners, 1);
        assert_eq!(results.summary.prize_per_winner, 40);
    }
}
