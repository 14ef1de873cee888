// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use hashbrown::HashMap;
use linebender_resource_handle::Blob;

use crate::codec::{self, ContainerKey};
use crate::FontError;

/// Decoded font files keyed by storage key.
#[derive(Default)]
pub struct FontStorage {
    items: HashMap<String, Blob<u8>>,
    key: Option<ContainerKey>,
}

impl FontStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key used to decode encrypted containers.
    pub fn set_key(&mut self, key: ContainerKey) {
        self.key = Some(key);
    }

    /// Decodes `bytes` (a storage container or a plain font file) and stores
    /// the result under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: &str, bytes: Vec<u8>) -> Result<Blob<u8>, FontError> {
        let decoded = codec::decode_with_key(bytes, self.key.as_ref())?;
        let blob = Blob::new(Arc::new(decoded));
        self.items.insert(key.into(), blob.clone());
        Ok(blob)
    }

    /// Returns `true` if something is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Returns the decoded bytes stored under `key`, if non-empty.
    pub fn get(&self, key: &str) -> Option<Blob<u8>> {
        self.items
            .get(key)
            .filter(|blob| !blob.as_ref().is_empty())
            .cloned()
    }

    /// Removes the entry stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Blob<u8>> {
        self.items.remove(key)
    }
}

impl core::fmt::Debug for FontStorage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.items.iter().map(|(k, v)| (k, v.as_ref().len())))
            .finish()
    }
}
