//! Password-based authenticated encryption envelopes.
//!
//! An envelope carries everything needed to decrypt it except the secret:
//! the PBKDF2 salt, the AES-GCM nonce, the authentication tag and the
//! ciphertext. Two engines produce them:
//!
//! - [`DirectEngine`] drives AES-256-GCM through a detached-tag API and writes
//!   `salt ∥ nonce ∥ tag ∥ ciphertext`.
//! - [`SubtleEngine`] drives it through a combined-output API and writes
//!   `salt ∥ nonce ∥ ciphertext ∥ tag`.
//!
//! Both derive keys identically and run the same cipher, so once they agree
//! on a [`Layout`] (see [`Engine::with_layout`] and [`format::relayout`]) an
//! envelope sealed by one opens with the other.
//!
//! ```no_run
//! use crypter::DirectEngine;
//!
//! let engine = DirectEngine::new("correct-horse-battery-staple")?;
//! let envelope = engine.encrypt(b"hello world", None).unwrap();
//! assert_eq!(envelope.len(), 107);
//! assert_eq!(engine.decrypt(&envelope, None).unwrap(), b"hello world");
//! # Ok::<(), crypter::InvalidSecret>(())
//! ```

pub mod crypto;
mod engine;
mod error;
pub mod format;
mod secret;

pub use crate::crypto::KdfParams;
pub use crate::engine::{Crypter, DirectEngine, Engine, SubtleEngine};
pub use crate::error::{
    DecryptionError, EncryptionError, FormatError, InvalidKdfParams, InvalidSecret,
    KeyDerivationError,
};
pub use crate::format::{Envelope, EnvelopeInfo, Layout};
