//! Password-based envelope engines.
//!
//! An [`Engine`] owns a secret and turns plaintext into self-contained
//! envelopes and back. Every call draws a fresh salt and nonce, derives a
//! one-off key with PBKDF2 and hands the actual AEAD work to its
//! [`AeadPrimitive`]. Nothing is shared between calls except the read-only
//! secret, so an engine can be used from many threads at once.

use aes_gcm::P_MAX;
use tracing::debug;

use crate::crypto::{
    AeadPrimitive, DirectCipher, KdfParams, SubtleCipher, derive_key, generate_nonce,
    generate_salt,
};
use crate::error::{DecryptionError, EncryptionError, InvalidSecret};
use crate::format::{self, Layout};
use crate::secret::Secret;

/// Engine sealing through the detached-tag primitive. Writes [`Layout::Detached`].
pub type DirectEngine = Engine<DirectCipher>;
/// Engine sealing through the combined-output primitive. Writes [`Layout::Combined`].
pub type SubtleEngine = Engine<SubtleCipher>;

/// Uniform encrypt/decrypt contract shared by every engine.
pub trait Crypter: Send + Sync {
    /// Seals `value`, binding `aad` into the tag when given.
    fn encrypt(&self, value: &[u8], aad: Option<&[u8]>) -> Result<Vec<u8>, EncryptionError>;

    /// Opens an envelope produced with the same secret, layout and `aad`.
    fn decrypt(&self, envelope: &[u8], aad: Option<&[u8]>) -> Result<Vec<u8>, DecryptionError>;
}

#[derive(Debug)]
pub struct Engine<P: AeadPrimitive> {
    secret: Secret,
    kdf: KdfParams,
    layout: Layout,
    primitive: P,
}

impl<P: AeadPrimitive> Engine<P> {
    /// Creates an engine with the default KDF parameters and the primitive's
    /// native layout.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSecret`] if `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, InvalidSecret> {
        Self::with_kdf(secret, KdfParams::default())
    }

    pub fn with_kdf(secret: impl AsRef<[u8]>, kdf: KdfParams) -> Result<Self, InvalidSecret> {
        Ok(Self {
            secret: Secret::new(secret)?,
            kdf,
            layout: P::NATIVE_LAYOUT,
            primitive: P::default(),
        })
    }

    /// Reads and writes `layout` instead of the native one.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    /// Encrypts `value` into a new envelope.
    ///
    /// # Errors
    ///
    /// - [`EncryptionError::InvalidValue`] if `value` exceeds the AES-GCM
    ///   plaintext limit.
    /// - [`EncryptionError::InvalidAad`] if `aad` is present but empty.
    /// - [`EncryptionError::Unknown`] for any failure of the randomness source,
    ///   key derivation or cipher.
    pub fn encrypt(&self, value: &[u8], aad: Option<&[u8]>) -> Result<Vec<u8>, EncryptionError> {
        if !plaintext_fits(value.len()) {
            return Err(EncryptionError::InvalidValue);
        }
        let aad = bound_aad(aad).ok_or(EncryptionError::InvalidAad)?;

        let nonce = generate_nonce().map_err(|e| {
            debug!(engine = P::NAME, error = %e, "random source unavailable");
            EncryptionError::Unknown
        })?;
        let salt = generate_salt().map_err(|e| {
            debug!(engine = P::NAME, error = %e, "random source unavailable");
            EncryptionError::Unknown
        })?;

        let key = derive_key(self.secret.expose(), &salt, self.kdf).map_err(|e| {
            debug!(engine = P::NAME, error = %e, "key derivation failed");
            EncryptionError::Unknown
        })?;

        let sealed = self
            .primitive
            .seal(&key, &nonce, aad, value)
            .map_err(|_| EncryptionError::Unknown)?;
        drop(key);

        let envelope = format::encode(&salt, &nonce, sealed.borrowed(), self.layout)
            .map_err(|_| EncryptionError::Unknown)?;

        debug!(
            engine = P::NAME,
            layout = %self.layout,
            plaintext_len = value.len(),
            envelope_len = envelope.len(),
            "sealed envelope"
        );

        Ok(envelope)
    }

    /// Decrypts an envelope written in this engine's layout.
    ///
    /// # Errors
    ///
    /// - [`DecryptionError::InvalidValue`] if `envelope` is shorter than the
    ///   layout's minimum length.
    /// - [`DecryptionError::InvalidAad`] if `aad` is present but empty.
    /// - [`DecryptionError::Failed`] for everything else: wrong secret, wrong
    ///   or missing AAD, tampered bytes, layout mismatch.
    pub fn decrypt(
        &self,
        envelope: &[u8],
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, DecryptionError> {
        let parsed = format::decode(envelope, self.layout)?;
        let aad = bound_aad(aad).ok_or(DecryptionError::InvalidAad)?;

        let key = derive_key(self.secret.expose(), parsed.salt(), self.kdf).map_err(|e| {
            debug!(engine = P::NAME, error = %e, "key derivation failed");
            DecryptionError::Failed
        })?;

        let plaintext = self
            .primitive
            .open(&key, parsed.nonce(), aad, parsed.sealed())
            .map_err(|_| {
                debug!(
                    engine = P::NAME,
                    layout = %self.layout,
                    envelope_len = envelope.len(),
                    "envelope rejected"
                );
                DecryptionError::Failed
            })?;

        debug!(
            engine = P::NAME,
            layout = %self.layout,
            envelope_len = envelope.len(),
            plaintext_len = plaintext.len(),
            "opened envelope"
        );

        Ok(plaintext)
    }
}

impl<P: AeadPrimitive> Crypter for Engine<P> {
    fn encrypt(&self, value: &[u8], aad: Option<&[u8]>) -> Result<Vec<u8>, EncryptionError> {
        Engine::encrypt(self, value, aad)
    }

    fn decrypt(&self, envelope: &[u8], aad: Option<&[u8]>) -> Result<Vec<u8>, DecryptionError> {
        Engine::decrypt(self, envelope, aad)
    }
}

fn plaintext_fits(len: usize) -> bool {
    len as u64 <= P_MAX
}

/// Absent AAD binds nothing. Present AAD must not be empty.
fn bound_aad(aad: Option<&[u8]>) -> Option<&[u8]> {
    match aad {
        None => Some(&[]),
        Some(bytes) if bytes.is_empty() => None,
        Some(bytes) => Some(bytes),
    }
}
