//! Combined layout.
//!
//! ```text
//! SALT (64) | NONCE (16) | CIPHERTEXT ∥ TAG (16)
//! ```
//!
//! The tag has no fixed offset; it is whatever the last 16 bytes are.

use super::{Envelope, HEADER_LEN, Layout, split_header};
use crate::crypto::aead::SealedRef;
use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::FormatError;

pub const SEALED_OFFSET: usize = HEADER_LEN;

pub fn encode(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SEALED_OFFSET + sealed.len());

    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(sealed);

    buf
}

pub fn decode(data: &[u8]) -> Result<Envelope<'_>, FormatError> {
    if data.len() < SEALED_OFFSET {
        return Err(FormatError::TooShort {
            len: data.len(),
            min: SEALED_OFFSET,
        });
    }

    let (salt, nonce, sealed) = split_header(data)?;

    Ok(Envelope::new(
        Layout::Combined,
        salt,
        nonce,
        SealedRef::Combined(sealed),
    ))
}
