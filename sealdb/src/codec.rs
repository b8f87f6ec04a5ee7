//! Binary-to-text codec.
//!
//! Ciphertext parts and key files are stored as standard (padded) base64 so
//! they fit in a TEXT column or a plain file. The engine is fixed: changing it
//! would make existing key files unreadable.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::Error;

/// Encodes bytes as standard base64.
#[must_use]
pub fn encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Decodes standard base64 text.
///
/// # Errors
///
/// Returns `Error::Decode` if `text` is not valid base64.
pub fn decode(text: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_value() {
        assert_eq!(encode(b"secret1"), "c2VjcmV0MQ==");
        assert_eq!(decode("c2VjcmV0MQ==").unwrap(), b"secret1");
    }

    #[test]
    fn test_decode_rejects_invalid_input() {
        assert!(matches!(decode("not*base64"), Err(Error::Decode(_))));
        assert!(matches!(decode("abc"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(b""), "");
        assert!(decode("").unwrap().is_empty());
    }
}
