use hmac::Hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

use super::{KEY_LEN, SALT_LEN};
use crate::error::{InvalidKdfParams, KeyDerivationError};

/// PBKDF2 iteration count every envelope is expected to be sealed with.
pub const DEFAULT_ITERATIONS: u32 = 100_000;
/// Lowest iteration count accepted by [`KdfParams::new`].
pub const MIN_ITERATIONS: u32 = 1_000;

/// PBKDF2-HMAC-SHA512 parameters.
///
/// The iteration count is not stored in the envelope, so both sides of an
/// exchange must agree on it out of band. Stick to the default unless both
/// the sealing and the opening engine are configured identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32) -> Result<Self, InvalidKdfParams> {
        let params = Self { iterations };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn validate(&self) -> Result<(), InvalidKdfParams> {
        if self.iterations < MIN_ITERATIONS {
            return Err(InvalidKdfParams::TooFewIterations {
                got: self.iterations,
                min: MIN_ITERATIONS,
            });
        }
        Ok(())
    }
}

/// Stretch `secret` and `salt` into a 256-bit AES key.
///
/// Pure function of its inputs. Nothing is cached; the returned key is wiped
/// when dropped.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8; SALT_LEN],
    kdf: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, KeyDerivationError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);

    pbkdf2::pbkdf2::<Hmac<Sha512>>(secret, salt, kdf.iterations, &mut key[..])
        .map_err(|e| KeyDerivationError(e.to_string()))?;

    Ok(key)
}
