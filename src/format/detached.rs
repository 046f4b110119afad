//! Detached layout.
//!
//! ```text
//! SALT (64) | NONCE (16) | TAG (16) | CIPHERTEXT
//! ```

use super::{Envelope, HEADER_LEN, Layout, split_header};
use crate::crypto::aead::SealedRef;
use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::FormatError;

pub const TAG_OFFSET: usize = HEADER_LEN;
pub const CIPHERTEXT_OFFSET: usize = TAG_OFFSET + TAG_LEN;

pub fn encode(
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    tag: &[u8; TAG_LEN],
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(CIPHERTEXT_OFFSET + ciphertext.len());

    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(tag);
    buf.extend_from_slice(ciphertext);

    buf
}

pub fn decode(data: &[u8]) -> Result<Envelope<'_>, FormatError> {
    if data.len() < CIPHERTEXT_OFFSET {
        return Err(FormatError::TooShort {
            len: data.len(),
            min: CIPHERTEXT_OFFSET,
        });
    }

    let (salt, nonce, rest) = split_header(data)?;
    let (tag, ciphertext) = rest.split_at(TAG_LEN);
    let tag = tag.try_into().map_err(|_| FormatError::TooShort {
        len: data.len(),
        min: CIPHERTEXT_OFFSET,
    })?;

    Ok(Envelope::new(
        Layout::Detached,
        salt,
        nonce,
        SealedRef::Detached { ciphertext, tag },
    ))
}
