// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::Path;

use crate::codec::ContainerKey;
use crate::{FaceTable, FontError, FontFace, FontStorage};

/// Face key reserved for the emoji fallback face.
pub const DEFAULT_EMOJI_FONT: &str = "_default_emoji_font_";

/// Owns stored font data and the faces loaded from it.
#[derive(Debug, Default)]
pub struct FontManager {
    storage: FontStorage,
    faces: FaceTable,
    requires_default_emoji_font: bool,
}

impl FontManager {
    /// Creates a manager with no fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of loaded faces.
    pub fn faces(&self) -> &FaceTable {
        &self.faces
    }

    /// The decoded font data.
    pub fn storage(&self) -> &FontStorage {
        &self.storage
    }

    /// Sets the key used to decode encrypted font containers stored from now
    /// on.
    pub fn set_container_key(&mut self, key: ContainerKey) {
        self.storage.set_key(key);
    }

    /// Stores font bytes (plain or containerized) under `storage_key`.
    ///
    /// Existing data is kept unless `replace` is set.
    pub fn store_bytes(
        &mut self,
        storage_key: &str,
        bytes: Vec<u8>,
        replace: bool,
    ) -> Result<(), FontError> {
        if self.storage.contains(storage_key) && !replace {
            return Ok(());
        }
        self.storage.insert(storage_key, bytes).map(drop)
    }

    /// Reads a font file into storage under `storage_key`.
    ///
    /// Existing data is kept unless `replace` is set.
    pub fn store_file(
        &mut self,
        storage_key: &str,
        path: impl AsRef<Path>,
        replace: bool,
    ) -> Result<(), FontError> {
        if self.storage.contains(storage_key) && !replace {
            return Ok(());
        }
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| FontError::io(&path.to_string_lossy()))?;
        self.storage.insert(storage_key, bytes).map(drop)
    }

    /// Loads the first face of the data stored under `key`, registered under
    /// the same key.
    pub fn load_face_from_storage(&mut self, key: &str) -> Result<(), FontError> {
        self.load_face_as(key, key, "")
    }

    /// Loads the face named `face_name` from the data under `storage_key`
    /// and registers it as `face_key`.
    pub fn load_face_from_storage_as(
        &mut self,
        storage_key: &str,
        face_key: &str,
        face_name: &str,
    ) -> Result<(), FontError> {
        let data = self
            .storage
            .get(storage_key)
            .ok_or_else(|| FontError::storage_missing(storage_key))?;
        let loaded = self.faces.load_face(storage_key, face_key, face_name, &data)?;
        log::info!(
            "face {} from {} available under key {}",
            loaded.original_name,
            storage_key,
            loaded.face_key
        );
        Ok(())
    }

    /// Loads the listed faces (all faces when empty) from the data under
    /// `storage_key`.
    ///
    /// When no loaded face is named like the storage key, a face is also
    /// registered under the storage key itself.
    pub fn load_faces_from_storage(&mut self, storage_key: &str, names: &[String]) -> Vec<String> {
        let Some(data) = self.storage.get(storage_key) else {
            log::error!("failed to load faces from storage: {storage_key}");
            return Vec::new();
        };
        let mut loaded = self.faces.load_faces(storage_key, names, &data);
        if !loaded.iter().any(|name| name == storage_key) {
            let face_name = match names {
                [name] => name.as_str(),
                _ => "",
            };
            if self.load_face_as(storage_key, storage_key, face_name).is_ok() {
                loaded.push(storage_key.into());
            }
        }
        loaded
    }

    /// Reads a font file into storage (replacing) and loads its first face
    /// under `key`.
    pub fn load_face_from_file(
        &mut self,
        key: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), FontError> {
        self.store_file(key, path.as_ref(), true)?;
        self.load_face_from_storage(key)
    }

    /// Reads a font file into storage (replacing) and loads the listed faces.
    pub fn load_faces_from_file(
        &mut self,
        key: &str,
        names: &[String],
        path: impl AsRef<Path>,
    ) -> Vec<String> {
        if let Err(err) = self.store_file(key, path.as_ref(), true) {
            log::error!("{err}");
            return Vec::new();
        }
        self.load_faces_from_storage(key, names)
    }

    /// Loads a face from a font file, stored under the file path.
    ///
    /// Data already stored for the path is reused.
    pub fn load_face_from_file_as(
        &mut self,
        path: impl AsRef<Path>,
        face_key: &str,
        face_name: &str,
    ) -> Result<(), FontError> {
        let path = path.as_ref();
        let storage_key = path.to_string_lossy().into_owned();
        self.store_file(&storage_key, path, false)?;
        self.load_face_from_storage_as(&storage_key, face_key, face_name)
    }

    /// Loads the face named `face_name` from the data under `storage_key`
    /// and registers it as `face_key`, logging failures.
    pub fn load_face_as(
        &mut self,
        storage_key: &str,
        face_key: &str,
        face_name: &str,
    ) -> Result<(), FontError> {
        let result = match self.storage.get(storage_key) {
            Some(data) => self
                .faces
                .load_face(storage_key, face_key, face_name, &data)
                .map(drop),
            None => Err(FontError::storage_missing(storage_key)),
        };
        if let Err(err) = &result {
            log::error!("failed to load font face {face_key}: {err}");
        }
        if face_key == DEFAULT_EMOJI_FONT {
            self.requires_default_emoji_font = false;
        }
        result
    }

    /// Registers a custom face implementation under `face_key`.
    pub fn insert_face(&mut self, face_key: &str, face: Box<dyn FontFace>) {
        self.faces.insert(face_key, face, "", false);
        if face_key == DEFAULT_EMOJI_FONT {
            self.requires_default_emoji_font = false;
        }
    }

    /// Removes the faces loaded from `storage_key`.
    pub fn unload_storage(&mut self, storage_key: &str) {
        self.faces.unload_by_storage_key(storage_key);
    }

    /// Returns `true` if a face is registered under `face_key`.
    pub fn face_exists(&self, face_key: &str) -> bool {
        self.faces.exists(face_key)
    }

    /// Keys of all registered faces.
    pub fn list_all_faces(&self) -> Vec<String> {
        self.faces.list_all_names()
    }

    /// Keys of the faces loaded from `storage_key`.
    pub fn list_faces_in_storage(&self, storage_key: &str) -> Vec<String> {
        self.faces.list_faces_in_storage(storage_key)
    }

    /// Returns `true` if some text needed the emoji fallback face while it was
    /// not loaded.
    pub fn requires_default_emoji_font(&self) -> bool {
        self.requires_default_emoji_font
    }

    /// Flags the emoji fallback face as required, unless it is loaded.
    pub fn set_requires_default_emoji_font(&mut self) {
        if !self.faces.exists(DEFAULT_EMOJI_FONT) {
            self.requires_default_emoji_font = true;
        }
    }
}
