//! Persistent records stored in RocksDB.
//!
//! Key layout:
//! - `ticket:<variant>:<id be>` holds the ticket JSON, so a prefix scan yields id order
//! - `ticket:sid:<storage id>` points back at the ticket key
//! - `draw:active:<variant>` holds the active winning set
//! - `pot:<variant>` holds the pot configuration

use super::{PotStore, TicketStore, WinningSetStore};
use crate::errors::{PersistenceError, PollaError, PollaResult};
use crate::lottery::{GameVariant, PotConfiguration, StorageId, Ticket, WinningNumberSet};
use crate::storage::{BatchOp, KvStorage};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

const STORAGE_ID_PREFIX: &str = "ticket:sid:";

fn ticket_prefix(variant: GameVariant) -> Vec<u8> {
    format!("ticket:{}:", variant).into_bytes()
}

fn ticket_key(variant: GameVariant, id: u32) -> Vec<u8> {
    let mut key = ticket_prefix(variant);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

fn storage_id_key(storage_id: &str) -> Vec<u8> {
    format!("{}{}", STORAGE_ID_PREFIX, storage_id).into_bytes()
}

fn draw_key(variant: GameVariant) -> Vec<u8> {
    format!("draw:active:{}", variant).into_bytes()
}

fn pot_key(variant: GameVariant) -> Vec<u8> {
    format!("pot:{}", variant).into_bytes()
}

fn encode<T: Serialize>(what: &str, value: &T) -> PollaResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        PollaError::Persistence(PersistenceError::WriteFailed(format!(
            "Failed to encode {}: {}",
            what, e
        )))
    })
}

fn decode<T: DeserializeOwned>(what: &str, bytes: &[u8]) -> PollaResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        PollaError::Persistence(PersistenceError::CorruptedData(format!(
            "Failed to decode {}: {}",
            what, e
        )))
    })
}

#[derive(Clone)]
pub struct RocksStore {
    storage: KvStorage,
}

impl RocksStore {
    pub fn new(storage: KvStorage) -> Self {
        Self { storage }
    }

    fn load_ticket(&self, key: &[u8]) -> PollaResult<Option<Ticket>> {
        match self.storage.get(key)? {
            Some(bytes) => decode("ticket", &bytes).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TicketStore for RocksStore {
    async fn list_all(&self, variant: GameVariant) -> PollaResult<Vec<Ticket>> {
        self.storage
            .scan_prefix(&ticket_prefix(variant))?
            .into_iter()
            .map(|(_, bytes)| decode("ticket", &bytes))
            .collect()
    }

    async fn upsert(&self, ticket: &Ticket) -> PollaResult<StorageId> {
        let storage_id = match ticket.storage_id() {
            Some(existing) => existing.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let key = ticket_key(ticket.variant(), ticket.id());

        let mut ops = Vec::with_capacity(3);
        if let Some(previous) = self.load_ticket(&key)? {
            if let Some(old_id) = previous.storage_id().filter(|old_id| *old_id != storage_id) {
                ops.push(BatchOp::Delete {
                    key: storage_id_key(old_id),
                });
            }
        }

        let mut record = ticket.clone();
        record.assign_storage_id(storage_id.clone());
        ops.push(BatchOp::Put {
            key: key.clone(),
            value: encode("ticket", &record)?,
        });
        ops.push(BatchOp::Put {
            key: storage_id_key(&storage_id),
            value: key,
        });
        self.storage.write_batch(&ops)?;

        debug!(ticket_id = ticket.id(), storage_id = %storage_id, "Stored ticket");
        Ok(storage_id)
    }

    async fn delete(&self, storage_id: &str) -> PollaResult<()> {
        let index_key = storage_id_key(storage_id);
        let Some(record_key) = self.storage.get(&index_key)? else {
            return Err(PersistenceError::NotFound(format!("ticket {}", storage_id)).into());
        };

        self.storage.write_batch(&[
            BatchOp::Delete { key: record_key },
            BatchOp::Delete { key: index_key },
        ])?;
        debug!(storage_id = %storage_id, "Deleted ticket");
        Ok(())
    }

    async fn delete_all(&self, variant: GameVariant) -> PollaResult<usize> {
        let entries = self.storage.scan_prefix(&ticket_prefix(variant))?;
        let mut ops = Vec::with_capacity(entries.len() * 2);
        for (key, bytes) in &entries {
            let ticket: Ticket = decode("ticket", bytes)?;
            if let Some(storage_id) = ticket.storage_id() {
                ops.push(BatchOp::Delete {
                    key: storage_id_key(storage_id),
                });
            }
            ops.push(BatchOp::Delete { key: key.clone() });
        }
        self.storage.write_batch(&ops)?;

        info!(variant = %variant, count = entries.len(), "Deleted all tickets");
        Ok(entries.len())
    }
}

#[async_trait]
impl WinningSetStore for RocksStore {
    async fn get_active(&self, variant: GameVariant) -> PollaResult<Option<WinningNumberSet>> {
        match self.storage.get(&draw_key(variant))? {
            Some(bytes) => decode("winning set", &bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn delete_active(&self, variant: GameVariant) -> PollaResult<bool> {
        let key = draw_key(variant);
        if self.storage.get(&key)?.is_none() {
            return Ok(false);
        }
        self.storage.delete(&key)?;
        Ok(true)
    }

    async fn create(&self, set: &WinningNumberSet) -> PollaResult<()> {
        let key = draw_key(set.variant());
        if self.storage.get(&key)?.is_some() {
            return Err(PersistenceError::ActiveSetExists(set.variant().to_string()).into());
        }
        self.storage.put(&key, &encode("winning set", set)?)
    }

    /// Delete and create in one batch
    async fn replace_active(&self, set: &WinningNumberSet) -> PollaResult<()> {
        let key = draw_key(set.variant());
        let mut ops = vec![BatchOp::Delete { key: key.clone() }];
        if !set.is_empty() {
            ops.push(BatchOp::Put {
                key,
                value: encode("winning set", set)?,
            });
        }
        self.storage.write_batch(&ops)?;

        info!(variant = %set.variant(), numbers = set.len(), "Replaced active winning set");
        Ok(())
    }
}

#[async_trait]
impl PotStore for RocksStore {
    async fn get(&self, variant: GameVariant) -> PollaResult<Option<PotConfiguration>> {
        match self.storage.get(&pot_key(variant))? {
            Some(bytes) => decode("pot", &bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn update(&self, variant: GameVariant, pot: &PotConfiguration) -> PollaResult<()> {
        self.storage.put(&pot_key(variant), &encode("pot", pot)?)?;
        debug!(variant = %variant, weekly_total = pot.weekly_total(), "Stored pot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, RocksStore) {
        let temp_dir = TempDir::new().unwrap();
        let storage = KvStorage::open(temp_dir.path()).unwrap();
        (temp_dir, RocksStore::new(storage))
    }

    #[tokio::test]
    async fn test_tickets_listed_in_id_order() {
        let (_dir, store) = open_store();
        for id in [12, 3, 300] {
            let ticket = Ticket::filled(id, GameVariant::Polla, "Jugador", &["1"], false).unwrap();
            store.upsert(&ticket).await.unwrap();
        }

        let ids: Vec<u32> = store
            .list_all(GameVariant::Polla)
            .await
            .unwrap()
            .iter()
            .map(Ticket::id)
            .collect();
        assert_eq!(ids, vec![3, 12, 300]);
        assert!(store.list_all(GameVariant::Micro).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_storage_id() {
        let (_dir, store) = open_store();
        let ticket = Ticket::filled(1, GameVariant::Micro, "Ana", &["1", "2", "3"], true).unwrap();
        let storage_id = store.upsert(&ticket).await.unwrap();

        let stored = store.list_all(GameVariant::Micro).await.unwrap();
        assert_eq!(stored[0].storage_id(), Some(storage_id.as_str()));

        store.delete(&storage_id).await.unwrap();
        assert!(store.list_all(GameVariant::Micro).await.unwrap().is_empty());
        assert!(store.delete(&storage_id).await.is_err());
    }

    #[tokio::test]
    async fn test_replace_active_never_conflicts() {
        let (_dir, store) = open_store();
        let first = WinningNumberSet::from_raw(GameVariant::Micro, &["1", "2", "3"]).unwrap();
        let second = WinningNumberSet::from_raw(GameVariant::Micro, &["00", "0", "36"]).unwrap();

        store.create(&first).await.unwrap();
        assert!(store.create(&second).await.is_err());

        store.replace_active(&second).await.unwrap();
        assert_eq!(store.get_active(GameVariant::Micro).await.unwrap(), Some(second));

        store
            .replace_active(&WinningNumberSet::empty(GameVariant::Micro))
            .await
            .unwrap();
        assert_eq!(store.get_active(GameVariant::Micro).await.unwrap(), None);
        assert!(!store.delete_active(GameVariant::Micro).await.unwrap());
    }
}
