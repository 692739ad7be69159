//! Duel selection: at most two candidates, oldest evicted first.

use std::collections::VecDeque;

use serde::Serialize;
use uuid::Uuid;

pub const SELECTION_CAPACITY: usize = 2;

/// Fixed-capacity FIFO of candidate ids.
///
/// Toggling a held id removes it. Toggling a new id while full evicts the
/// oldest member and keeps the other one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: VecDeque<Uuid>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if let Some(pos) = self.ids.iter().position(|held| *held == id) {
            self.ids.remove(pos);
            return false;
        }
        if self.is_full() {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
        true
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Oldest first.
    pub fn ids(&self) -> Vec<Uuid> {
        self.ids.iter().copied().collect()
    }

    /// The selected pair, oldest first, once exactly two are held.
    pub fn pair(&self) -> Option<(Uuid, Uuid)> {
        match (self.ids.front(), self.ids.back()) {
            (Some(a), Some(b)) if self.is_full() => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() == SELECTION_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
