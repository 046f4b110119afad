use thiserror::Error;

/// The secret handed to an engine constructor was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid input for secret value. Must be a non-empty byte sequence or string.")]
pub struct InvalidSecret;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidKdfParams {
    #[error("pbkdf2 iteration count {got} is below the minimum of {min}")]
    TooFewIterations { got: u32, min: u32 },
}

/// PBKDF2 refused its inputs. Not expected with HMAC, which accepts any key length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("key derivation failed: {0}")]
pub struct KeyDerivationError(pub(crate) String);

/// An envelope could not be split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("envelope too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },
}

/// Returned by `encrypt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncryptionError {
    #[error("The value to encrypt exceeds the maximum AES-GCM plaintext length.")]
    InvalidValue,

    #[error(
        "Invalid value for additional authenticated data. AAD must be a non-empty byte sequence."
    )]
    InvalidAad,

    #[error("Unknown error")]
    Unknown,
}

/// Returned by `decrypt`.
///
/// Every failure past input validation is reported as [`DecryptionError::Failed`]
/// regardless of cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptionError {
    #[error(
        "The value to decrypt does not contain the full information necessary to perform the decryption."
    )]
    InvalidValue,

    #[error(
        "Invalid value for additional authenticated data. AAD must be a non-empty byte sequence."
    )]
    InvalidAad,

    #[error(
        "Decryption failed. Please check your secret, the additional authenticated data and the encrypted payload for errors."
    )]
    Failed,
}

impl From<FormatError> for DecryptionError {
    fn from(_: FormatError) -> Self {
        DecryptionError::InvalidValue
    }
}
