//! # Access Store
//!
//! Bounded, insertion-ordered set of authorized identifiers.
//!
//! - `insert` on a full store evicts the oldest entry.
//! - `remove` closes the gap and keeps the relative order of the rest.
//! - `replace_all` swaps the whole contents or changes nothing.
//!
//! The store does not deduplicate; duplicates simply occupy two slots.

use crate::domain::errors::AccessStoreError;
use shared_types::Identifier;
use std::collections::VecDeque;

/// Default number of identifiers a node keeps locally.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessStore {
    entries: VecDeque<Identifier>,
    capacity: usize,
}

impl AccessStore {
    /// Create an empty store. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[must_use]
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.entries.iter().any(|entry| entry == identifier)
    }

    /// Append an identifier, returning the entry evicted to make room.
    pub fn insert(&mut self, identifier: Identifier) -> Option<Identifier> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(identifier);
        evicted
    }

    /// Remove the first occurrence. Returns whether anything was removed.
    pub fn remove(&mut self, identifier: &Identifier) -> bool {
        match self.entries.iter().position(|entry| entry == identifier) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace every entry with `identifiers`, in order.
    pub fn replace_all(&mut self, identifiers: Vec<Identifier>) -> Result<(), AccessStoreError> {
        if identifiers.len() > self.capacity {
            return Err(AccessStoreError::CapacityExceeded {
                requested: identifiers.len(),
                capacity: self.capacity,
            });
        }
        self.entries = identifiers.into();
        Ok(())
    }

    /// Current contents, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AccessStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
