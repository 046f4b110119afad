//! Cryptographic building blocks for the envelope engines.
//!
//! Provides secure randomness, PBKDF2 key derivation and the two AES-256-GCM
//! primitives (detached tag and combined output).

pub mod aead;
pub mod kdf;

pub use aead::{AeadPrimitive, DirectCipher, Sealed, SubtleCipher};
pub use kdf::{KdfParams, derive_key};

use getrandom::fill;

/// Length of the key derivation salt (64 bytes).
pub const SALT_LEN: usize = 64;
/// Length of the AES-GCM nonce (16 bytes).
pub const NONCE_LEN: usize = 16;
/// Length of the GCM authentication tag (16 bytes / 128 bits).
pub const TAG_LEN: usize = 16;
/// Length of the derived encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), getrandom::Error> {
    fill(buf)
}

/// Generate a fresh key derivation salt
pub fn generate_salt() -> Result<[u8; SALT_LEN], getrandom::Error> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Generate a fresh AEAD nonce
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], getrandom::Error> {
    let mut nonce = [0u8; NONCE_LEN];
    secure_random(&mut nonce)?;
    Ok(nonce)
}
