//! Record stores for tickets, winning sets and pots
//!
//! The engine never blocks on these. Callers treat every failure as a notice and keep
//! their in-memory state.

use crate::coalesce::CoalescedSink;
use crate::errors::PollaResult;
use crate::lottery::{GameVariant, PotConfiguration, StorageId, Ticket, WinningNumberSet};
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod rocks;

pub use memory::MemoryStore;
pub use rocks::RocksStore;

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Every stored ticket of `variant`, ordered by ticket id
    async fn list_all(&self, variant: GameVariant) -> PollaResult<Vec<Ticket>>;

    /// Insert or overwrite a ticket. A ticket without a storage id gets a new one.
    async fn upsert(&self, ticket: &Ticket) -> PollaResult<StorageId>;

    async fn delete(&self, storage_id: &str) -> PollaResult<()>;

    /// Remove all tickets of `variant` and return how many there were
    async fn delete_all(&self, variant: GameVariant) -> PollaResult<usize>;
}

#[async_trait]
pub trait WinningSetStore: Send + Sync {
    async fn get_active(&self, variant: GameVariant) -> PollaResult<Option<WinningNumberSet>>;

    /// Returns whether a set was removed
    async fn delete_active(&self, variant: GameVariant) -> PollaResult<bool>;

    /// Store a new active set. Fails with `ActiveSetExists` if one is already stored.
    async fn create(&self, set: &WinningNumberSet) -> PollaResult<()>;

    /// Swap the active set for `set`; an empty set just removes it.
    ///
    /// Readers must never observe a variant with two active sets. The default runs the
    /// two steps in sequence; stores that can commit both together override it.
    async fn replace_active(&self, set: &WinningNumberSet) -> PollaResult<()> {
        self.delete_active(set.variant()).await?;
        if set.is_empty() {
            return Ok(());
        }
        self.create(set).await
    }
}

#[async_trait]
pub trait PotStore: Send + Sync {
    async fn get(&self, variant: GameVariant) -> PollaResult<Option<PotConfiguration>>;

    async fn update(&self, variant: GameVariant, pot: &PotConfiguration) -> PollaResult<()>;
}

/// The three stores a session writes to
#[derive(Clone)]
pub struct Stores {
    pub tickets: Arc<dyn TicketStore>,
    pub draws: Arc<dyn WinningSetStore>,
    pub pots: Arc<dyn PotStore>,
}

impl Stores {
    /// Use one backend for all three record kinds
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: TicketStore + WinningSetStore + PotStore + 'static,
    {
        Self {
            tickets: store.clone(),
            draws: store.clone(),
            pots: store,
        }
    }
}

/// Feeds coalesced pot edits into a [`PotStore`]
pub struct PotWriteSink {
    pots: Arc<dyn PotStore>,
}

impl PotWriteSink {
    pub fn new(pots: Arc<dyn PotStore>) -> Self {
        Self { pots }
    }
}

#[async_trait]
impl CoalescedSink<GameVariant, PotConfiguration> for PotWriteSink {
    async fn flush(&self, variant: &GameVariant, pot: PotConfiguration) -> PollaResult<()> {
        self.pots.update(*variant, &pot).await
    }
}
