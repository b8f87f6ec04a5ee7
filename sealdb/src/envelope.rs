//! Text format for sealed values.
//!
//! A sealed value carries everything needed to open it except the secret:
//! - Salt for key derivation
//! - Nonce for the AEAD cipher
//! - Ciphertext with its authentication tag
//!
//! Each part is base64-encoded and the parts are joined with `*`, which never
//! appears in base64 output. The result is safe to store in a TEXT column.

use crate::codec;
use crate::error::Error;
use crate::kdf::SALT_SIZE;

/// Nonce size for ChaCha20-Poly1305 (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size for ChaCha20-Poly1305.
pub const TAG_SIZE: usize = 16;

const SEPARATOR: char = '*';

/// Parsed form of a sealed value.
///
/// Format:
/// ```text
/// base64(salt:16)*base64(nonce:12)*base64(ciphertext||tag)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    salt: [u8; SALT_SIZE],
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl SealedEnvelope {
    /// Creates a new envelope from its parts.
    #[must_use]
    pub const fn new(salt: [u8; SALT_SIZE], nonce: [u8; NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { salt, nonce, ciphertext }
    }

    /// Returns the key-derivation salt.
    #[must_use]
    pub const fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    /// Returns the nonce.
    #[must_use]
    pub const fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Returns the ciphertext including the authentication tag.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serializes the envelope to its text form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            codec::encode(self.salt),
            codec::encode(self.nonce),
            codec::encode(&self.ciphertext)
        )
    }

    /// Parses an envelope from its text form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCiphertext` if:
    /// - The text does not have exactly three parts
    /// - The salt or nonce has the wrong size
    /// - The ciphertext is shorter than an authentication tag
    ///
    /// Returns `Error::Decode` if a part is not valid base64.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let parts: Vec<&str> = text.split(SEPARATOR).collect();
        let [salt, nonce, ciphertext] = parts.as_slice() else {
            return Err(Error::InvalidCiphertext(format!(
                "expected 3 parts, found {}",
                parts.len()
            )));
        };

        let salt: [u8; SALT_SIZE] = codec::decode(salt)?.try_into().map_err(|v: Vec<u8>| {
            Error::InvalidCiphertext(format!("salt is {} bytes (expected {SALT_SIZE})", v.len()))
        })?;

        let nonce: [u8; NONCE_SIZE] = codec::decode(nonce)?.try_into().map_err(|v: Vec<u8>| {
            Error::InvalidCiphertext(format!("nonce is {} bytes (expected {NONCE_SIZE})", v.len()))
        })?;

        let ciphertext = codec::decode(ciphertext)?;
        if ciphertext.len() < TAG_SIZE {
            return Err(Error::InvalidCiphertext("ciphertext shorter than tag".to_string()));
        }

        Ok(Self { salt, nonce, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SealedEnvelope {
        SealedEnvelope::new([5; SALT_SIZE], [6; NONCE_SIZE], vec![7; TAG_SIZE + 4])
    }

    #[test]
    fn test_envelope_text_round_trip() {
        let envelope = sample();
        let text = envelope.encode();

        assert_eq!(text.matches(SEPARATOR).count(), 2);
        assert_eq!(SealedEnvelope::parse(&text).unwrap(), envelope);
    }

    #[test]
    fn test_envelope_wrong_part_count() {
        let result = SealedEnvelope::parse("AAAA*BBBB");
        assert!(matches!(result, Err(Error::InvalidCiphertext(_))));

        let result = SealedEnvelope::parse("plain text password");
        assert!(matches!(result, Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn test_envelope_wrong_nonce_size() {
        let text = format!(
            "{}*{}*{}",
            codec::encode([0u8; SALT_SIZE]),
            codec::encode([0u8; 8]),
            codec::encode([0u8; TAG_SIZE])
        );
        assert!(matches!(SealedEnvelope::parse(&text), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn test_envelope_truncated_ciphertext() {
        let text = format!(
            "{}*{}*{}",
            codec::encode([0u8; SALT_SIZE]),
            codec::encode([0u8; NONCE_SIZE]),
            codec::encode([0u8; 3])
        );
        assert!(matches!(SealedEnvelope::parse(&text), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn test_envelope_bad_base64() {
        let result = SealedEnvelope::parse("!!!*???*###");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
