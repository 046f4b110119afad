//! Envelope wire format.
//!
//! Every envelope starts with the key derivation salt and the AEAD nonce. What
//! follows depends on the [`Layout`]:
//!
//! ```text
//! Detached: SALT (64) | NONCE (16) | TAG (16) | CIPHERTEXT
//! Combined: SALT (64) | NONCE (16) | CIPHERTEXT | TAG (16)
//! ```
//!
//! Layouts are never guessed from the bytes. The reader states which one it
//! expects and [`decode`] splits accordingly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::aead::SealedRef;
use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::FormatError;

pub mod combined;
pub mod detached;

/// Salt plus nonce, the prefix shared by both layouts.
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Position of the authentication tag relative to the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Tag stored before the ciphertext.
    Detached,
    /// Tag appended after the ciphertext.
    Combined,
}

impl Layout {
    /// Shortest byte length [`decode`] accepts for this layout.
    pub const fn min_len(self) -> usize {
        match self {
            Layout::Detached => detached::CIPHERTEXT_OFFSET,
            Layout::Combined => combined::SEALED_OFFSET,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Layout::Detached => "detached",
            Layout::Combined => "combined",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded envelope borrowing from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    layout: Layout,
    salt: &'a [u8; SALT_LEN],
    nonce: &'a [u8; NONCE_LEN],
    sealed: SealedRef<'a>,
}

impl<'a> Envelope<'a> {
    pub(crate) fn new(
        layout: Layout,
        salt: &'a [u8; SALT_LEN],
        nonce: &'a [u8; NONCE_LEN],
        sealed: SealedRef<'a>,
    ) -> Self {
        Self {
            layout,
            salt,
            nonce,
            sealed,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn salt(&self) -> &'a [u8; SALT_LEN] {
        self.salt
    }

    pub fn nonce(&self) -> &'a [u8; NONCE_LEN] {
        self.nonce
    }

    /// Ciphertext and tag in the order the layout stores them.
    pub fn sealed(&self) -> SealedRef<'a> {
        self.sealed
    }

    /// Total encoded length.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + match self.sealed {
                SealedRef::Detached { ciphertext, .. } => TAG_LEN + ciphertext.len(),
                SealedRef::Combined(bytes) => bytes.len(),
            }
    }

    /// Summary suitable for display. Contains no key material.
    pub fn info(&self) -> EnvelopeInfo {
        let (ciphertext_len, tag) = match self.sealed.split() {
            Ok((ciphertext, tag)) => (ciphertext.len(), Some(to_hex(tag))),
            Err(_) => (0, None),
        };

        EnvelopeInfo {
            layout: self.layout,
            length: self.encoded_len(),
            ciphertext_length: ciphertext_len,
            salt: to_hex(self.salt),
            nonce: to_hex(self.nonce),
            tag,
        }
    }
}

/// Serializable description of an envelope, printed by `crypter inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeInfo {
    pub layout: Layout,
    pub length: usize,
    pub ciphertext_length: usize,
    pub salt: String,
    pub nonce: String,
    /// Absent when a combined envelope is too short to hold a tag.
    pub tag: Option<String>,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Assembles an envelope in the requested layout.
///
/// Tag and ciphertext are reordered when `sealed` arrives in the other shape.
///
/// # Errors
///
/// Returns [`FormatError::TooShort`] if combined input must be split but
/// cannot hold a tag.
pub fn encode(
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    sealed: SealedRef<'_>,
    layout: Layout,
) -> Result<Vec<u8>, FormatError> {
    match layout {
        Layout::Detached => {
            let (ciphertext, tag) = sealed.split().map_err(|_| FormatError::TooShort {
                len: HEADER_LEN + sealed_len(sealed),
                min: Layout::Detached.min_len(),
            })?;
            Ok(detached::encode(salt, nonce, tag, ciphertext))
        }
        Layout::Combined => Ok(combined::encode(salt, nonce, &sealed.join())),
    }
}

/// Splits `data` according to `layout`.
///
/// # Errors
///
/// Returns [`FormatError::TooShort`] if `data` is shorter than
/// [`Layout::min_len`].
pub fn decode(data: &[u8], layout: Layout) -> Result<Envelope<'_>, FormatError> {
    match layout {
        Layout::Detached => detached::decode(data),
        Layout::Combined => combined::decode(data),
    }
}

/// Rewrites an envelope from one layout to the other. No secret is needed.
///
/// # Errors
///
/// Returns [`FormatError::TooShort`] if `data` is too short for `from`, or if
/// it carries no complete tag.
pub fn relayout(data: &[u8], from: Layout, to: Layout) -> Result<Vec<u8>, FormatError> {
    let envelope = decode(data, from)?;
    encode(envelope.salt(), envelope.nonce(), envelope.sealed(), to)
}

fn sealed_len(sealed: SealedRef<'_>) -> usize {
    match sealed {
        SealedRef::Detached { ciphertext, .. } => ciphertext.len() + TAG_LEN,
        SealedRef::Combined(bytes) => bytes.len(),
    }
}

/// Splits the shared `SALT | NONCE` prefix off `data`.
///
/// Callers must have checked `data.len() >= HEADER_LEN`.
fn split_header(data: &[u8]) -> Result<(&[u8; SALT_LEN], &[u8; NONCE_LEN], &[u8]), FormatError> {
    let too_short = || FormatError::TooShort {
        len: data.len(),
        min: HEADER_LEN,
    };

    let salt = data[..SALT_LEN].try_into().map_err(|_| too_short())?;
    let nonce = data[SALT_LEN..HEADER_LEN]
        .try_into()
        .map_err(|_| too_short())?;

    Ok((salt, nonce, &data[HEADER_LEN..]))
}
