use std::fmt;

use zeroize::Zeroizing;

use crate::error::InvalidSecret;

/// Owned engine secret, wiped on drop.
///
/// Accepts anything byte-like, so both text and raw bytes work. The bytes are
/// only reachable from inside the crate.
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, InvalidSecret> {
        let bytes = secret.as_ref();
        if bytes.is_empty() {
            return Err(InvalidSecret);
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_text_and_bytes() {
        assert!(Secret::new("correct-horse-battery-staple").is_ok());
        assert!(Secret::new(String::from("pw")).is_ok());
        assert!(Secret::new(b"raw".as_slice()).is_ok());
        assert!(Secret::new(vec![0u8]).is_ok());
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Secret::new("").unwrap_err(), InvalidSecret);
        assert_eq!(Secret::new(Vec::<u8>::new()).unwrap_err(), InvalidSecret);
        assert_eq!(Secret::new([0u8; 0]).unwrap_err(), InvalidSecret);
    }

    #[test]
    fn text_is_stored_as_utf8_bytes() {
        let secret = Secret::new("héllo").unwrap();
        assert_eq!(secret.expose(), "héllo".as_bytes());
    }

    #[test]
    fn debug_is_redacted() {
        let secret = Secret::new("hunter2").unwrap();
        let shown = format!("{secret:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("redacted"));
    }
}
