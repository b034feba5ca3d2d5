//! Last-writer-wins coordination for in-flight cart mutations.
//!
//! Each mutation key (see [`crate::key`]) owns a generation counter.
//! Beginning a mutation bumps the generation and hands back a
//! [`MutationTicket`]; when the request resolves, the caller asks whether its
//! ticket is still current. A stale ticket means a newer request was issued
//! for the same key while this one was in flight, and the stale result must
//! be discarded, never applied. This is a cancellation policy, not a queue:
//! only the most recent request per key is allowed to land.
//!
//! Keys are independent: mutations on different keys may complete in any
//! relative order.

use std::collections::HashMap;
use std::sync::Mutex;

/// Proof that a mutation was begun under a key, at a specific generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    key: String,
    generation: u64,
}

impl MutationTicket {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Per-key generation table. Interior mutex; no lock is held across await
/// points. Callers take a ticket, run their request, then check back in.
#[derive(Debug, Default)]
pub struct MutationCoordinator {
    generations: Mutex<HashMap<String, u64>>,
}

impl MutationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new mutation under `key`, superseding any in-flight one.
    pub fn begin(&self, key: &str) -> MutationTicket {
        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        let generation = generations
            .entry(key.to_owned())
            .and_modify(|g| *g += 1)
            .or_insert(1);
        MutationTicket {
            key: key.to_owned(),
            generation: *generation,
        }
    }

    /// Whether `ticket` is still the newest mutation for its key.
    #[must_use]
    pub fn is_current(&self, ticket: &MutationTicket) -> bool {
        let generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        generations.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Completes the mutation behind `ticket`. Returns `true` and clears the
    /// key's slot when the ticket is still current; returns `false` when a
    /// newer mutation superseded it, in which case the caller must discard
    /// its result.
    pub fn finish(&self, ticket: &MutationTicket) -> bool {
        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        if generations.get(&ticket.key) == Some(&ticket.generation) {
            generations.remove(&ticket.key);
            true
        } else {
            tracing::debug!(key = %ticket.key, "cart mutation superseded; discarding result");
            false
        }
    }
}
