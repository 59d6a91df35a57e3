//! Origin-to-copy correlation used for edit and delete propagation.
//!
//! Every relayed message gets one slot keyed by its origin. A slot owns a fair async
//! mutex, and the relay engine holds it (through `CorrelationEntry`) for the whole of a
//! create, edit or delete so those three are serialized per origin message while
//! unrelated messages proceed in parallel. Slots are sharded in a `DashMap` so no
//! global lock is taken on the hot path.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use serenity::all::{ChannelId, MessageId};
use tokio::{
    sync::{Mutex, OwnedMutexGuard},
    time::Instant,
};

use crate::{
    config::Config,
    model::relay::{OriginKey, RelayedMessage},
};

/// How many correlations are kept and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub capacity: usize,
    pub ttl: Duration,
}

impl RetentionPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            capacity: config.correlation_capacity,
            ttl: config.correlation_ttl,
        }
    }
}

#[derive(Debug)]
enum CorrelationState {
    /// Slot exists only because an operation holds its lock.
    Vacant,
    /// An edit arrived before the message was relayed. The relay posts this content.
    Edited(String),
    Relayed(RelayedMessage),
    /// The origin was deleted. Kept until pruned so a late create is dropped.
    Deleted,
}

struct Slot {
    created_at: Instant,
    state: Arc<Mutex<CorrelationState>>,
}

impl Slot {
    fn new() -> Self {
        Self {
            created_at: Instant::now(),
            state: Arc::new(Mutex::new(CorrelationState::Vacant)),
        }
    }

    /// No operation holds or waits for the slot's lock.
    fn is_idle(&self) -> bool {
        Arc::strong_count(&self.state) == 1
    }
}

/// Store of relayed messages keyed by origin.
///
/// Cloning is cheap and clones share the same slots.
#[derive(Clone)]
pub struct CorrelationStore {
    slots: Arc<DashMap<OriginKey, Slot>>,
    retention: RetentionPolicy,
}

impl CorrelationStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            retention,
        }
    }

    /// Locks the slot of an origin message, creating it when missing.
    ///
    /// Waiters are served in FIFO order. The returned entry keeps the lock until it is
    /// dropped.
    pub async fn entry(&self, origin: OriginKey) -> CorrelationEntry {
        let state = self
            .slots
            .entry(origin)
            .or_insert_with(Slot::new)
            .state
            .clone();

        let guard = state.lock_owned().await;

        CorrelationEntry {
            origin,
            guard: Some(guard),
            slots: Arc::clone(&self.slots),
        }
    }

    #[cfg(test)]
    pub async fn get(&self, origin: OriginKey) -> Option<RelayedMessage> {
        self.entry(origin).await.get().cloned()
    }

    #[cfg(test)]
    pub async fn put(&self, origin: OriginKey, relayed: RelayedMessage) {
        self.entry(origin).await.put(relayed);
    }

    #[cfg(test)]
    pub async fn remove_destination(
        &self,
        origin: OriginKey,
        destination: ChannelId,
    ) -> Option<Vec<MessageId>> {
        self.entry(origin).await.remove_destination(destination)
    }

    #[cfg(test)]
    pub async fn evict(&self, origin: OriginKey) -> Option<RelayedMessage> {
        self.entry(origin).await.evict()
    }

    /// Number of slots, tombstones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Prunes only when the store grew past its capacity.
    pub fn enforce_capacity(&self) -> usize {
        if self.slots.len() > self.retention.capacity {
            self.prune()
        } else {
            0
        }
    }

    /// Drops expired slots, then the oldest slots beyond capacity.
    ///
    /// Over capacity, a tenth of the capacity is freed at once so a full store is not
    /// sorted again for every new relay.
    ///
    /// # Returns
    /// - `usize` - Number of slots removed
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    fn prune_at(&self, now: Instant) -> usize {
        let ttl = self.retention.ttl;
        let before = self.slots.len();

        self.slots
            .retain(|_, slot| !slot.is_idle() || now.duration_since(slot.created_at) < ttl);

        let mut removed = before.saturating_sub(self.slots.len());

        let capacity = self.retention.capacity;
        if self.slots.len() <= capacity {
            return removed;
        }
        let excess = self.slots.len() - (capacity - capacity / 10);

        let mut candidates: Vec<(Instant, OriginKey)> = self
            .slots
            .iter()
            .filter(|slot| slot.is_idle())
            .map(|slot| (slot.created_at, *slot.key()))
            .collect();
        candidates.sort_unstable_by_key(|(created_at, _)| *created_at);

        for (_, origin) in candidates.into_iter().take(excess) {
            if self.slots.remove_if(&origin, |_, slot| slot.is_idle()).is_some() {
                removed += 1;
            }
        }

        removed
    }
}

/// Exclusive access to the correlation of one origin message.
pub struct CorrelationEntry {
    origin: OriginKey,
    guard: Option<OwnedMutexGuard<CorrelationState>>,
    slots: Arc<DashMap<OriginKey, Slot>>,
}

impl CorrelationEntry {
    fn state(&self) -> Option<&CorrelationState> {
        self.guard.as_deref()
    }

    fn state_mut(&mut self) -> Option<&mut CorrelationState> {
        self.guard.as_deref_mut()
    }

    pub fn get(&self) -> Option<&RelayedMessage> {
        match self.state() {
            Some(CorrelationState::Relayed(relayed)) => Some(relayed),
            _ => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut RelayedMessage> {
        match self.state_mut() {
            Some(CorrelationState::Relayed(relayed)) => Some(relayed),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.state(), Some(CorrelationState::Deleted))
    }

    pub fn put(&mut self, relayed: RelayedMessage) {
        if let Some(state) = self.state_mut() {
            *state = CorrelationState::Relayed(relayed);
        }
    }

    /// Forgets the copy posted in `destination`, returning the IDs of its parts.
    pub fn remove_destination(&mut self, destination: ChannelId) -> Option<Vec<MessageId>> {
        self.get_mut()?.destinations.remove(&destination)
    }

    /// Keeps the content of an edit that arrived before the message was relayed.
    ///
    /// A later edit replaces an earlier one. Ignored once the message was relayed or
    /// deleted.
    pub fn defer_edit(&mut self, content: String) {
        if let Some(state) = self.state_mut() {
            if matches!(state, CorrelationState::Vacant | CorrelationState::Edited(_)) {
                *state = CorrelationState::Edited(content);
            }
        }
    }

    /// Takes the content of a deferred edit, leaving the slot vacant.
    pub fn take_deferred_edit(&mut self) -> Option<String> {
        let state = self.state_mut()?;
        if !matches!(state, CorrelationState::Edited(_)) {
            return None;
        }

        match std::mem::replace(state, CorrelationState::Vacant) {
            CorrelationState::Edited(content) => Some(content),
            _ => None,
        }
    }

    /// Removes the correlation and leaves a tombstone in its place.
    ///
    /// Slots without a correlation are left untouched.
    pub fn evict(&mut self) -> Option<RelayedMessage> {
        let state = self.state_mut()?;
        if !matches!(state, CorrelationState::Relayed(_)) {
            return None;
        }

        match std::mem::replace(state, CorrelationState::Deleted) {
            CorrelationState::Relayed(relayed) => Some(relayed),
            _ => None,
        }
    }

    /// Records that the origin was deleted without a correlation existing.
    pub fn mark_deleted(&mut self) {
        if let Some(state) = self.state_mut() {
            *state = CorrelationState::Deleted;
        }
    }
}

impl Drop for CorrelationEntry {
    fn drop(&mut self) {
        let vacant = matches!(self.state(), Some(CorrelationState::Vacant));
        drop(self.guard.take());

        if vacant {
            self.slots.remove_if(&self.origin, |_, slot| {
                slot.is_idle()
                    && slot
                        .state
                        .try_lock()
                        .map(|state| matches!(*state, CorrelationState::Vacant))
                        .unwrap_or(false)
            });
        }
    }
}
