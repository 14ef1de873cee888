// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container format for stored font bytes.
//!
//! A container is an 8 byte header (little-endian `u32` signature followed by
//! a little-endian `u32` format id) and the encoded payload. Buffers that do
//! not start with the signature are plain font files and pass through
//! untouched.
//!
//! The LZ4 formats need the `lz4` feature and the encrypted formats need the
//! `mono` feature. Encrypted payloads also need a [`ContainerKey`].

use crate::FontError;

/// Container signature, the bytes `AVCD` read as a little-endian `u32`.
pub const SIGNATURE: u32 = 0x4443_5641;

/// Size of the container header in bytes.
pub const HEADER_LEN: usize = 8;

/// Size of a [`ContainerKey`] in bytes.
pub const KEY_LEN: usize = 32;

/// Secret key of the encrypted container formats.
pub type ContainerKey = [u8; KEY_LEN];

const XOR_KEY: u8 = 97;

/// Payload encoding of a font container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum FontFormat {
    /// Bytes stored as-is.
    Raw = 0,
    /// Every byte XORed with a fixed key.
    Xor = 1,
    /// LZ4 block preceded by a 4 byte original length.
    Lz4 = 2,
    /// XChaCha20-Poly1305 with a 24 byte nonce and 16 byte MAC subheader.
    Mono = 3,
    /// LZ4 compression followed by [`FontFormat::Mono`] encryption.
    Lz4Mono = 4,
}

impl FontFormat {
    /// Maps a header format id to a format, if it is a known one.
    pub fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            0 => Self::Raw,
            1 => Self::Xor,
            2 => Self::Lz4,
            3 => Self::Mono,
            4 => Self::Lz4Mono,
            _ => return None,
        })
    }

    /// The id written into the container header.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Returns `true` if this build can encode and decode the format.
    pub fn is_available(self) -> bool {
        match self {
            Self::Raw | Self::Xor => true,
            Self::Lz4 => cfg!(feature = "lz4"),
            Self::Mono => cfg!(feature = "mono"),
            Self::Lz4Mono => cfg!(all(feature = "lz4", feature = "mono")),
        }
    }

    fn encode_payload(
        self,
        input: &[u8],
        #[cfg_attr(
            not(feature = "mono"),
            allow(unused_variables, reason = "only the encrypted formats take a key")
        )]
        key: Option<&ContainerKey>,
    ) -> Result<Vec<u8>, FontError> {
        match self {
            Self::Raw => Ok(input.to_vec()),
            Self::Xor => Ok(input.iter().map(|b| b ^ XOR_KEY).collect()),
            #[cfg(feature = "lz4")]
            Self::Lz4 => Ok(lz4::compress(input)),
            #[cfg(feature = "mono")]
            Self::Mono => mono::seal(self, input, key),
            #[cfg(all(feature = "lz4", feature = "mono"))]
            Self::Lz4Mono => mono::seal(self, &lz4::compress(input), key),
            #[allow(
                unreachable_patterns,
                reason = "every format is matched when all codecs are compiled in"
            )]
            _ => Err(FontError::codec_unavailable(self.id())),
        }
    }

    fn decode_payload(
        self,
        input: &[u8],
        #[cfg_attr(
            not(feature = "mono"),
            allow(unused_variables, reason = "only the encrypted formats take a key")
        )]
        key: Option<&ContainerKey>,
    ) -> Result<Vec<u8>, FontError> {
        match self {
            // Involutions.
            Self::Raw | Self::Xor => self.encode_payload(input, None),
            #[cfg(feature = "lz4")]
            Self::Lz4 => lz4::decompress(self, input),
            #[cfg(feature = "mono")]
            Self::Mono => mono::open(self, input, key),
            #[cfg(all(feature = "lz4", feature = "mono"))]
            Self::Lz4Mono => lz4::decompress(self, &mono::open(self, input, key)?),
            #[allow(
                unreachable_patterns,
                reason = "every format is matched when all codecs are compiled in"
            )]
            _ => Err(FontError::codec_unavailable(self.id())),
        }
    }
}

#[cfg(feature = "lz4")]
mod lz4 {
    use super::FontFormat;
    use crate::FontError;

    /// Compressed block behind a little-endian `u32` original length.
    pub(super) fn compress(input: &[u8]) -> Vec<u8> {
        lz4_flex::block::compress_prepend_size(input)
    }

    pub(super) fn decompress(format: FontFormat, input: &[u8]) -> Result<Vec<u8>, FontError> {
        lz4_flex::block::decompress_size_prepended(input).map_err(|err| {
            log::error!("font decode: invalid LZ4 stream: {err}");
            FontError::corrupted(format.id())
        })
    }
}

#[cfg(feature = "mono")]
mod mono {
    use chacha20poly1305::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
    use chacha20poly1305::{Key, Tag, XChaCha20Poly1305, XNonce};

    use super::{ContainerKey, FontFormat};
    use crate::FontError;

    const NONCE_LEN: usize = 24;
    const MAC_LEN: usize = 16;

    fn cipher(
        format: FontFormat,
        key: Option<&ContainerKey>,
    ) -> Result<XChaCha20Poly1305, FontError> {
        let key = key.ok_or_else(|| FontError::missing_key(format.id()))?;
        Ok(XChaCha20Poly1305::new(Key::from_slice(key)))
    }

    /// Encrypts `input` behind a fresh random nonce and the MAC.
    pub(super) fn seal(
        format: FontFormat,
        input: &[u8],
        key: Option<&ContainerKey>,
    ) -> Result<Vec<u8>, FontError> {
        let cipher = cipher(format, key)?;
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let mut body = input.to_vec();
        let mac = cipher
            .encrypt_in_place_detached(&nonce, b"", &mut body)
            .map_err(|_| FontError::corrupted(format.id()))?;
        let mut output = Vec::with_capacity(NONCE_LEN + MAC_LEN + body.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&mac);
        output.extend_from_slice(&body);
        Ok(output)
    }

    pub(super) fn open(
        format: FontFormat,
        input: &[u8],
        key: Option<&ContainerKey>,
    ) -> Result<Vec<u8>, FontError> {
        let cipher = cipher(format, key)?;
        if input.len() < NONCE_LEN + MAC_LEN {
            log::error!("font decode: truncated encrypted container");
            return Err(FontError::corrupted(format.id()));
        }
        let (nonce, rest) = input.split_at(NONCE_LEN);
        let (mac, body) = rest.split_at(MAC_LEN);
        let mut output = body.to_vec();
        cipher
            .decrypt_in_place_detached(
                XNonce::from_slice(nonce),
                b"",
                &mut output,
                Tag::from_slice(mac),
            )
            .map_err(|_| {
                log::error!("font decode: corrupted encrypted container");
                FontError::corrupted(format.id())
            })?;
        Ok(output)
    }
}

/// Encodes `bytes` into a container of the given format.
///
/// With `verify` set, the encoded payload is decoded again and compared with
/// the input before the header is prepended.
pub fn encode(format: FontFormat, bytes: &[u8], verify: bool) -> Result<Vec<u8>, FontError> {
    encode_with_key(format, bytes, verify, None)
}

/// Like [`encode`], with the key used by the encrypted formats.
pub fn encode_with_key(
    format: FontFormat,
    bytes: &[u8],
    verify: bool,
    key: Option<&ContainerKey>,
) -> Result<Vec<u8>, FontError> {
    let payload = format.encode_payload(bytes, key)?;
    if verify {
        let decoded = format.decode_payload(&payload, key)?;
        if decoded != bytes {
            return Err(FontError::verification_failed(format.id()));
        }
    }
    let mut encoded = Vec::with_capacity(HEADER_LEN + payload.len());
    encoded.extend_from_slice(&SIGNATURE.to_le_bytes());
    encoded.extend_from_slice(&format.id().to_le_bytes());
    encoded.extend_from_slice(&payload);
    Ok(encoded)
}

/// Decodes a container, or returns the input unchanged when it does not
/// carry the container signature.
///
/// A buffer with the signature and an unknown format id is a hard failure.
pub fn decode(bytes: Vec<u8>) -> Result<Vec<u8>, FontError> {
    decode_with_key(bytes, None)
}

/// Like [`decode`], with the key used by the encrypted formats.
pub fn decode_with_key(bytes: Vec<u8>, key: Option<&ContainerKey>) -> Result<Vec<u8>, FontError> {
    let Some((signature, format)) = read_header(&bytes) else {
        return Ok(bytes);
    };
    if signature != SIGNATURE {
        return Ok(bytes);
    }
    let format = FontFormat::from_id(format).ok_or_else(|| FontError::unknown_format(format))?;
    format.decode_payload(&bytes[HEADER_LEN..], key)
}

fn read_header(bytes: &[u8]) -> Option<(u32, u32)> {
    let signature = bytes.get(0..4)?.try_into().ok()?;
    let format = bytes.get(4..8)?.try_into().ok()?;
    Some((u32::from_le_bytes(signature), u32::from_le_bytes(format)))
}
