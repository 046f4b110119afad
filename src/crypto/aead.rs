//! AES-256-GCM primitives behind a common capability trait.
//!
//! Both primitives run the same algorithm (AES-256 in GCM mode with a 128-bit
//! nonce and a 128-bit tag) and therefore produce identical ciphertext and tag
//! bytes for identical inputs. They differ only in how the tag travels:
//!
//! - [`DirectCipher`] uses the in-place detached API: the tag is retrieved as a
//!   separate value after encryption and supplied separately before decryption.
//! - [`SubtleCipher`] uses the combined-output API: the tag is appended to the
//!   ciphertext and expected there on decryption.

use std::borrow::Cow;

use aes_gcm::{
    AesGcm, Error, Key, Nonce, Tag,
    aead::{Aead, AeadInPlace, KeyInit, Payload, consts::U16},
    aes::Aes256,
};

use super::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::format::Layout;

/// AES-256-GCM with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Output of a seal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sealed {
    /// Ciphertext and tag kept apart.
    Detached {
        ciphertext: Vec<u8>,
        tag: [u8; TAG_LEN],
    },
    /// `ciphertext ∥ tag`.
    Combined(Vec<u8>),
}

impl Sealed {
    /// Total number of bytes (ciphertext plus tag).
    pub fn len(&self) -> usize {
        match self {
            Sealed::Detached { ciphertext, .. } => ciphertext.len() + TAG_LEN,
            Sealed::Combined(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn borrowed(&self) -> SealedRef<'_> {
        match self {
            Sealed::Detached { ciphertext, tag } => SealedRef::Detached { ciphertext, tag },
            Sealed::Combined(bytes) => SealedRef::Combined(bytes),
        }
    }
}

/// Borrowed view of sealed bytes, as found inside an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealedRef<'a> {
    Detached {
        ciphertext: &'a [u8],
        tag: &'a [u8; TAG_LEN],
    },
    Combined(&'a [u8]),
}

impl<'a> SealedRef<'a> {
    /// Splits into `(ciphertext, tag)`.
    ///
    /// Fails when a combined region is too short to carry a tag.
    pub fn split(self) -> Result<(&'a [u8], &'a [u8; TAG_LEN]), Error> {
        match self {
            SealedRef::Detached { ciphertext, tag } => Ok((ciphertext, tag)),
            SealedRef::Combined(bytes) => {
                let at = bytes.len().checked_sub(TAG_LEN).ok_or(Error)?;
                let (ciphertext, tag) = bytes.split_at(at);
                let tag = tag.try_into().map_err(|_| Error)?;
                Ok((ciphertext, tag))
            }
        }
    }

    /// Joins into `ciphertext ∥ tag`, borrowing when already combined.
    pub fn join(self) -> Cow<'a, [u8]> {
        match self {
            SealedRef::Combined(bytes) => Cow::Borrowed(bytes),
            SealedRef::Detached { ciphertext, tag } => {
                let mut joined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
                joined.extend_from_slice(ciphertext);
                joined.extend_from_slice(tag);
                Cow::Owned(joined)
            }
        }
    }
}

/// An AEAD capability the envelope engines are generic over.
///
/// `aad` is empty when the caller supplied none; GCM treats both cases the
/// same way. `open` must accept either [`SealedRef`] shape and normalize it
/// into whatever its underlying API expects.
pub trait AeadPrimitive: Default + Send + Sync {
    /// Short name used in log events.
    const NAME: &'static str;
    /// Envelope layout an engine built on this primitive writes by default.
    const NATIVE_LAYOUT: Layout;

    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Sealed, Error>;

    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        sealed: SealedRef<'_>,
    ) -> Result<Vec<u8>, Error>;
}

fn build_cipher(key: &[u8; KEY_LEN]) -> Aes256Gcm16 {
    Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key))
}

/// Detached-tag primitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectCipher;

impl AeadPrimitive for DirectCipher {
    const NAME: &'static str = "direct";
    const NATIVE_LAYOUT: Layout = Layout::Detached;

    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Sealed, Error> {
        let cipher = build_cipher(key);

        let mut buffer = plaintext.to_vec();
        let tag =
            cipher.encrypt_in_place_detached(Nonce::<U16>::from_slice(nonce), aad, &mut buffer)?;

        let mut detached = [0u8; TAG_LEN];
        detached.copy_from_slice(&tag);

        Ok(Sealed::Detached {
            ciphertext: buffer,
            tag: detached,
        })
    }

    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        sealed: SealedRef<'_>,
    ) -> Result<Vec<u8>, Error> {
        let (ciphertext, tag) = sealed.split()?;
        let cipher = build_cipher(key);

        let mut buffer = ciphertext.to_vec();
        cipher.decrypt_in_place_detached(
            Nonce::<U16>::from_slice(nonce),
            aad,
            &mut buffer,
            Tag::<U16>::from_slice(tag),
        )?;

        Ok(buffer)
    }
}

/// Combined-output primitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubtleCipher;

impl AeadPrimitive for SubtleCipher {
    const NAME: &'static str = "subtle";
    const NATIVE_LAYOUT: Layout = Layout::Combined;

    fn seal(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Sealed, Error> {
        let cipher = build_cipher(key);
        let payload = Payload {
            msg: plaintext,
            aad,
        };

        let combined = cipher.encrypt(Nonce::<U16>::from_slice(nonce), payload)?;
        Ok(Sealed::Combined(combined))
    }

    fn open(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        sealed: SealedRef<'_>,
    ) -> Result<Vec<u8>, Error> {
        let combined = sealed.join();
        let cipher = build_cipher(key);
        let payload = Payload {
            msg: &combined,
            aad,
        };

        cipher.decrypt(Nonce::<U16>::from_slice(nonce), payload)
    }
}
