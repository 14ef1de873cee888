// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A lookup key is distinct from the ID type. This allows the lookup key
/// to not require ownership of the underlying ID data, which could require
/// allocations.
pub(crate) trait LookupKey<ID> {
    fn eq(&self, other: &ID) -> bool;
    fn to_id(self) -> ID;
}

/// An entry in the cache.
struct Entry<ID, T> {
    epoch: u64,
    id: ID,
    data: T,
}

/// A least-recently-used cache using a linear scan over its entries. Keep
/// `max_entries` small.
pub(crate) struct LruCache<ID, T> {
    entries: Vec<Entry<ID, T>>,
    epoch: u64,
    max_entries: usize,
}

impl<ID, T> LruCache<ID, T> {
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Returns a reference to the entry with the given ID, creating it with
    /// `make_data` when missing. The least recently used entry is evicted
    /// once the cache is full.
    pub(crate) fn entry(&mut self, id: impl LookupKey<ID>, make_data: impl FnOnce() -> T) -> &T {
        self.epoch += 1;
        let epoch = self.epoch;
        let index = match self.entries.iter().position(|entry| id.eq(&entry.id)) {
            Some(index) => index,
            None if self.entries.len() < self.max_entries => {
                self.entries.push(Entry {
                    epoch,
                    id: id.to_id(),
                    data: make_data(),
                });
                self.entries.len() - 1
            }
            None => {
                let index = self
                    .entries
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, entry)| entry.epoch)
                    .map(|(i, _)| i)
                    .unwrap_or_default();
                let entry = &mut self.entries[index];
                entry.id = id.to_id();
                entry.data = make_data();
                index
            }
        };
        let entry = &mut self.entries[index];
        entry.epoch = epoch;
        &entry.data
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
