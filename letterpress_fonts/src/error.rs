// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error produced while storing, decoding or loading font data.
///
/// Carries a non-exhaustive [`FontErrorKind`] plus the key (storage key, face
/// key or file path) of the resource that failed, when one is known.
#[derive(Debug, Clone, PartialEq)]
pub struct FontError {
    /// The non-exhaustive category describing this error.
    kind: FontErrorKind,

    /// The key or path of the resource involved.
    key: Option<String>,

    /// The container format identifier, for codec failures.
    format: Option<u32>,
}

impl FontError {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> FontErrorKind {
        self.kind
    }

    /// The storage key, face key or file path involved, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The container format identifier, for codec related failures.
    pub fn format(&self) -> Option<u32> {
        self.format
    }

    pub(crate) fn io(path: &str) -> Self {
        Self {
            kind: FontErrorKind::Io,
            key: Some(path.into()),
            format: None,
        }
    }

    pub(crate) fn unknown_format(format: u32) -> Self {
        Self {
            kind: FontErrorKind::UnknownFormat,
            key: None,
            format: Some(format),
        }
    }

    pub(crate) fn codec_unavailable(format: u32) -> Self {
        Self {
            kind: FontErrorKind::CodecUnavailable,
            key: None,
            format: Some(format),
        }
    }

    pub(crate) fn verification_failed(format: u32) -> Self {
        Self {
            kind: FontErrorKind::VerificationFailed,
            key: None,
            format: Some(format),
        }
    }

    pub(crate) fn missing_key(format: u32) -> Self {
        Self {
            kind: FontErrorKind::MissingKey,
            key: None,
            format: Some(format),
        }
    }

    pub(crate) fn corrupted(format: u32) -> Self {
        Self {
            kind: FontErrorKind::Corrupted,
            key: None,
            format: Some(format),
        }
    }

    pub(crate) fn face_not_found(name: &str) -> Self {
        Self {
            kind: FontErrorKind::FaceNotFound,
            key: Some(name.into()),
            format: None,
        }
    }

    pub(crate) fn invalid_data(key: &str) -> Self {
        Self {
            kind: FontErrorKind::InvalidData,
            key: Some(key.into()),
            format: None,
        }
    }

    pub(crate) fn storage_missing(key: &str) -> Self {
        Self {
            kind: FontErrorKind::StorageMissing,
            key: Some(key.into()),
            format: None,
        }
    }
}

impl core::fmt::Display for FontError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let key = self.key.as_deref().unwrap_or("<unnamed>");
        let format = self.format.unwrap_or_default();
        match self.kind {
            FontErrorKind::Io => write!(f, "failed to read font file {key}"),
            FontErrorKind::UnknownFormat => {
                write!(f, "font container has unknown format id {format}")
            }
            FontErrorKind::CodecUnavailable => {
                write!(f, "font container format {format} is not available in this build")
            }
            FontErrorKind::VerificationFailed => {
                write!(f, "font container verification failed for format {format}")
            }
            FontErrorKind::MissingKey => {
                write!(f, "font container format {format} needs a key")
            }
            FontErrorKind::Corrupted => {
                write!(f, "font container payload of format {format} is corrupted")
            }
            FontErrorKind::FaceNotFound => write!(f, "no face named {key} in font data"),
            FontErrorKind::InvalidData => write!(f, "font data stored under {key} is not a font"),
            FontErrorKind::StorageMissing => write!(f, "no font data stored under {key}"),
        }
    }
}

impl core::error::Error for FontError {}

/// The non-exhaustive category of a [`FontError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontErrorKind {
    /// A font file could not be read.
    Io,

    /// A storage container carried the signature but an unknown format id.
    UnknownFormat,

    /// The container format is recognized but its codec is not compiled in.
    CodecUnavailable,

    /// Encoding succeeded but decoding the result did not reproduce the input.
    VerificationFailed,

    /// An encrypted container was seen but no key was configured.
    MissingKey,

    /// The container payload failed to decompress or authenticate.
    Corrupted,

    /// The font data holds no face with the requested PostScript name.
    FaceNotFound,

    /// The bytes could not be parsed as a font or font collection.
    InvalidData,

    /// Nothing is stored under the requested storage key.
    StorageMissing,
}
