//! In-process store backed by `DashMap`, for tests and dry runs

use super::{PotStore, TicketStore, WinningSetStore};
use crate::errors::{PersistenceError, PollaResult};
use crate::lottery::{GameVariant, PotConfiguration, StorageId, Ticket, WinningNumberSet};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    tickets: DashMap<StorageId, Ticket>,
    draws: DashMap<GameVariant, WinningNumberSet>,
    pots: DashMap<GameVariant, PotConfiguration>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> PollaResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("memory store is offline".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn list_all(&self, variant: GameVariant) -> PollaResult<Vec<Ticket>> {
        self.check_online()?;
        let mut tickets: Vec<Ticket> = self
            .tickets
            .iter()
            .filter(|entry| entry.value().variant() == variant)
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by_key(Ticket::id);
        Ok(tickets)
    }

    async fn upsert(&self, ticket: &Ticket) -> PollaResult<StorageId> {
        self.check_online()?;
        let storage_id = match ticket.storage_id() {
            Some(existing) => existing.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let mut record = ticket.clone();
        record.assign_storage_id(storage_id.clone());
        self.tickets.insert(storage_id.clone(), record);
        Ok(storage_id)
    }

    async fn delete(&self, storage_id: &str) -> PollaResult<()> {
        self.check_online()?;
        self.tickets
            .remove(storage_id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(format!("ticket {}", storage_id)).into())
    }

    async fn delete_all(&self, variant: GameVariant) -> PollaResult<usize> {
        self.check_online()?;
        let before = self.tickets.len();
        self.tickets.retain(|_, ticket| ticket.variant() != variant);
        Ok(before - self.tickets.len())
    }
}

#[async_trait]
impl WinningSetStore for MemoryStore {
    async fn get_active(&self, variant: GameVariant) -> PollaResult<Option<WinningNumberSet>> {
        self.check_online()?;
        Ok(self.draws.get(&variant).map(|entry| entry.value().clone()))
    }

    async fn delete_active(&self, variant: GameVariant) -> PollaResult<bool> {
        self.check_online()?;
        Ok(self.draws.remove(&variant).is_some())
    }

    async fn create(&self, set: &WinningNumberSet) -> PollaResult<()> {
        self.check_online()?;
        match self.draws.entry(set.variant()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(PersistenceError::ActiveSetExists(set.variant().to_string()).into())
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(set.clone());
                Ok(())
            }
        }
    }

    async fn replace_active(&self, set: &WinningNumberSet) -> PollaResult<()> {
        self.check_online()?;
        if set.is_empty() {
            self.draws.remove(&set.variant());
        } else {
            self.draws.insert(set.variant(), set.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl PotStore for MemoryStore {
    async fn get(&self, variant: GameVariant) -> PollaResult<Option<PotConfiguration>> {
        self.check_online()?;
        Ok(self.pots.get(&variant).map(|entry| entry.value().clone()))
    }

    async fn update(&self, variant: GameVariant, pot: &PotConfiguration) -> PollaResult<()> {
        self.check_online()?;
        self.pots.insert(variant, pot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_keeps_storage_id() {
        let store = MemoryStore::new();
        let mut ticket = Ticket::filled(1, GameVariant::Micro, "Ana", &["1", "2", "3"], false).unwrap();

        let storage_id = store.upsert(&ticket).await.unwrap();
        ticket.assign_storage_id(storage_id.clone());
        ticket.set_player_name("Ana María");
        let again = store.upsert(&ticket).await.unwrap();

        assert_eq!(storage_id, again);
        let stored = store.list_all(GameVariant::Micro).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].player_name(), "Ana María");
    }

    #[tokio::test]
    async fn test_create_refuses_second_active_set() {
        let store = MemoryStore::new();
        let set = WinningNumberSet::from_raw(GameVariant::Polla, &["1", "2"]).unwrap();

        store.create(&set).await.unwrap();
        let err = store.create(&set).await.unwrap_err();
        assert!(matches!(
            err,
            crate::errors::PollaError::Persistence(PersistenceError::ActiveSetExists(_))
        ));

        let next = WinningNumberSet::from_raw(GameVariant::Polla, &["3"]).unwrap();
        store.replace_active(&next).await.unwrap();
        assert_eq!(store.get_active(GameVariant::Polla).await.unwrap(), Some(next));
    }

    #[tokio::test]
    async fn test_delete_all_is_per_variant() {
        let store = MemoryStore::new();
        for id in 1..=3 {
            let ticket = Ticket::filled(id, GameVariant::Micro, "Jugador", &["1", "2", "3"], false).unwrap();
            store.upsert(&ticket).await.unwrap();
        }
        let polla = Ticket::filled(1, GameVariant::Polla, "Otro", &["1"], false).unwrap();
        store.upsert(&polla).await.unwrap();

        assert_eq!(store.delete_all(GameVariant::Micro).await.unwrap(), 3);
        assert!(store.list_all(GameVariant::Micro).await.unwrap().is_empty());
        assert_eq!(store.list_all(GameVariant::Polla).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_offline(true);

        let err = store.get(GameVariant::Micro).await.unwrap_err();
        assert!(err.is_persistence());

        store.set_offline(false);
        assert_eq!(store.get(GameVariant::Micro).await.unwrap(), None);
    }
}
