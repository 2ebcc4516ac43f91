//! Player tickets and the per-variant ticket book

use crate::errors::ValidationError;
use crate::lottery::types::{GameVariant, Symbol};
use crate::lottery::validator::NumberValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable row identity, assigned when the row is allocated
pub type TicketId = u32;

/// Identity handed out by a record store once the ticket is persisted
pub type StorageId = String;

/// A player's chosen numbers plus metadata.
///
/// Numbers live in pick-size slots so an operator can fill them one cell at a time.
/// Every setter validates before mutating; a rejected edit leaves the ticket unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    variant: GameVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_id: Option<StorageId>,
    player_name: String,
    slots: Vec<Option<Symbol>>,
    is_free: bool,
}

impl Ticket {
    /// Empty ticket for a freshly allocated row
    pub fn new(id: TicketId, variant: GameVariant) -> Self {
        Self {
            id,
            variant,
            storage_id: None,
            player_name: String::new(),
            slots: vec![None; variant.pick_size()],
            is_free: false,
        }
    }

    /// Build a ticket from complete input, validating every number up front
    pub fn filled<S: AsRef<str>>(
        id: TicketId,
        variant: GameVariant,
        player_name: &str,
        numbers: &[S],
        is_free: bool,
    ) -> Result<Self, ValidationError> {
        let mut ticket = Self::new(id, variant);
        ticket.set_numbers(numbers)?;
        ticket.set_player_name(player_name);
        ticket.set_free(is_free);
        Ok(ticket)
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    pub fn storage_id(&self) -> Option<&str> {
        self.storage_id.as_deref()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn is_free(&self) -> bool {
        self.is_free
    }

    /// Filled numbers in slot order
    pub fn numbers(&self) -> Vec<Symbol> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn slots(&self) -> &[Option<Symbol>] {
        &self.slots
    }

    /// Named and holding exactly pick-size numbers
    pub fn is_complete(&self) -> bool {
        !self.player_name.is_empty() && self.slots.iter().all(Option::is_some)
    }

    /// No name and no numbers
    pub fn is_blank(&self) -> bool {
        self.player_name.is_empty() && self.slots.iter().all(Option::is_none)
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = name.trim().to_string();
    }

    pub fn set_free(&mut self, is_free: bool) {
        self.is_free = is_free;
    }

    pub fn toggle_free(&mut self) -> bool {
        self.is_free = !self.is_free;
        self.is_free
    }

    /// Edit one number cell. An empty value clears the slot.
    pub fn set_number(&mut self, slot: usize, raw: &str) -> Result<(), ValidationError> {
        if slot >= self.slots.len() {
            return Err(ValidationError::SlotOutOfRange {
                variant: self.variant.to_string(),
                slot,
                pick_size: self.slots.len(),
            });
        }

        if raw.trim().is_empty() {
            self.slots[slot] = None;
            return Ok(());
        }

        let symbol = NumberValidator::parse(raw, self.variant)?;
        let others: Vec<Symbol> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != slot)
            .filter_map(|(_, value)| *value)
            .collect();
        if !NumberValidator::is_unique_within_ticket(symbol, &others) {
            return Err(ValidationError::DuplicateSymbol(symbol.to_string()));
        }

        self.slots[slot] = Some(symbol);
        Ok(())
    }

    /// Replace all numbers at once. Unfilled trailing slots stay empty.
    pub fn set_numbers<S: AsRef<str>>(&mut self, raw: &[S]) -> Result<(), ValidationError> {
        let symbols = NumberValidator::validate_numbers(raw, self.variant)?;
        self.slots = vec![None; self.variant.pick_size()];
        for (slot, symbol) in self.slots.iter_mut().zip(symbols) {
            *slot = Some(symbol);
        }
        Ok(())
    }

    pub fn assign_storage_id(&mut self, storage_id: StorageId) {
        self.storage_id = Some(storage_id);
    }

    pub fn forget_storage_id(&mut self) -> Option<StorageId> {
        self.storage_id.take()
    }

    /// Wipe every field except the row identity
    pub fn clear(&mut self) {
        self.player_name.clear();
        self.slots = vec![None; self.variant.pick_size()];
        self.is_free = false;
    }
}

/// All ticket rows of one variant, keyed by their stable id.
///
/// Deleting a ticket clears its row in place; remaining rows are never renumbered.
#[derive(Debug, Clone)]
pub struct TicketBook {
    variant: GameVariant,
    tickets: BTreeMap<TicketId, Ticket>,
    next_id: TicketId,
}

impl TicketBook {
    pub fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            tickets: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    /// Allocate an empty row and return its id
    pub fn allocate(&mut self) -> TicketId {
        let id = self.next_id;
        self.next_id += 1;
        self.tickets.insert(id, Ticket::new(id, self.variant));
        id
    }

    /// Insert a ticket loaded from a store, keeping its id
    pub fn insert(&mut self, ticket: Ticket) {
        self.next_id = self.next_id.max(ticket.id() + 1);
        self.tickets.insert(ticket.id(), ticket);
    }

    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    pub fn get_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.get_mut(&id)
    }

    /// Clear a row in place, returning its state before the wipe
    pub fn clear(&mut self, id: TicketId) -> Option<Ticket> {
        let ticket = self.tickets.get_mut(&id)?;
        let before = ticket.clone();
        ticket.clear();
        ticket.forget_storage_id();
        Some(before)
    }

    /// Highest-numbered row that still holds data
    pub fn last_filled(&self) -> Option<TicketId> {
        self.tickets
            .values()
            .rev()
            .find(|ticket| !ticket.is_blank())
            .map(Ticket::id)
    }

    /// Drop every row and restart numbering
    pub fn reset(&mut self) {
        self.tickets.clear();
        self.next_id = 1;
    }

    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }

    pub fn complete_tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values().filter(|ticket| ticket.is_complete())
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
