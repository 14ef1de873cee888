// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use linebender_resource_handle::Blob;

use crate::{FontError, FontFace, OpenTypeFace};

/// A face registered in a [`FaceTable`].
pub struct FaceEntry {
    face: Box<dyn FontFace>,
    storage_key: String,
    fallback: bool,
}

impl FaceEntry {
    /// The face itself.
    pub fn face(&self) -> &dyn FontFace {
        &*self.face
    }

    /// Key of the font data in [`FontStorage`](crate::FontStorage) the face was
    /// loaded from. Empty for faces inserted directly.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns `true` if the face was registered as a fallback face.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl core::fmt::Debug for FaceEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FaceEntry")
            .field("face", &self.face)
            .field("storage_key", &self.storage_key)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Result of loading one face into the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedFace {
    /// PostScript name as found in the font file.
    pub original_name: String,
    /// Key the face is registered under.
    pub face_key: String,
}

/// Faces keyed by name.
#[derive(Debug, Default)]
pub struct FaceTable {
    entries: HashMap<String, FaceEntry>,
}

impl FaceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one face from a font file or collection.
    ///
    /// The face whose PostScript name equals `face_name` is picked, or the
    /// first face when `face_name` is empty. It is registered under
    /// `face_key`, or under its PostScript name when `face_key` is empty,
    /// replacing any previous entry.
    pub fn load_face(
        &mut self,
        storage_key: &str,
        face_key: &str,
        face_name: &str,
        data: &Blob<u8>,
    ) -> Result<LoadedFace, FontError> {
        let count = OpenTypeFace::face_count(data.as_ref());
        if count == 0 {
            return Err(FontError::invalid_data(storage_key));
        }
        for index in 0..count {
            let Some(face) = OpenTypeFace::new(data.clone(), index) else {
                continue;
            };
            let original_name = face.postscript_name().to_string();
            if face_name.is_empty() || original_name == face_name {
                let face_key = if face_key.is_empty() {
                    original_name.clone()
                } else {
                    face_key.to_string()
                };
                self.insert_entry(&face_key, Box::new(face), storage_key, false);
                return Ok(LoadedFace {
                    original_name,
                    face_key,
                });
            }
        }
        Err(FontError::face_not_found(face_name))
    }

    /// Loads every face of a font file or collection whose PostScript name
    /// is listed in `names`, or all faces when `names` is empty. Returns the
    /// names that were loaded.
    pub fn load_faces(
        &mut self,
        storage_key: &str,
        names: &[String],
        data: &Blob<u8>,
    ) -> Vec<String> {
        let mut loaded = Vec::new();
        for index in 0..OpenTypeFace::face_count(data.as_ref()) {
            let Some(face) = OpenTypeFace::new(data.clone(), index) else {
                continue;
            };
            let name = face.postscript_name().to_string();
            if names.is_empty() || names.contains(&name) {
                self.insert_entry(&name, Box::new(face), storage_key, false);
                loaded.push(name);
            }
        }
        loaded
    }

    /// Registers a face under `face_key`, replacing any previous entry.
    pub fn insert(
        &mut self,
        face_key: &str,
        face: Box<dyn FontFace>,
        storage_key: &str,
        fallback: bool,
    ) {
        self.insert_entry(face_key, face, storage_key, fallback);
    }

    fn insert_entry(
        &mut self,
        face_key: &str,
        face: Box<dyn FontFace>,
        storage_key: &str,
        fallback: bool,
    ) {
        self.entries.insert(
            face_key.into(),
            FaceEntry {
                face,
                storage_key: storage_key.into(),
                fallback,
            },
        );
    }

    /// Removes every face loaded from the given storage key.
    pub fn unload_by_storage_key(&mut self, storage_key: &str) {
        self.entries.retain(|_, entry| entry.storage_key != storage_key);
    }

    /// Removes all faces.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns `true` if a face is registered under `face_key`.
    pub fn exists(&self, face_key: &str) -> bool {
        self.entries.contains_key(face_key)
    }

    /// Returns the entry registered under `face_key`.
    pub fn get(&self, face_key: &str) -> Option<&FaceEntry> {
        self.entries.get(face_key)
    }

    /// Returns the face registered under `face_key`.
    pub fn face(&self, face_key: &str) -> Option<&dyn FontFace> {
        self.entries.get(face_key).map(FaceEntry::face)
    }

    /// Keys of all registered faces, sorted.
    pub fn list_all_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Keys of the faces loaded from the given storage key, sorted.
    pub fn list_faces_in_storage(&self, storage_key: &str) -> Vec<String> {
        let mut names: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.storage_key == storage_key)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}
