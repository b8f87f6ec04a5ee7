//! Symmetric text cipher.
//!
//! `seal` turns a string into sealed text using a text secret; `open` reverses
//! it. Every call derives a fresh key from a random salt and uses a random
//! nonce, so sealing the same value twice yields different output.

use chacha20poly1305::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    ChaCha20Poly1305, Nonce,
};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::envelope::{SealedEnvelope, NONCE_SIZE};
use crate::error::Error;
use crate::kdf::{derive_cipher_key, generate_salt};

/// Seals `plaintext` with `secret`.
///
/// # Returns
///
/// Text of the form `salt*nonce*ciphertext`, each part base64.
///
/// # Errors
///
/// Returns error if key derivation or encryption fails.
pub fn seal(plaintext: &str, secret: &str) -> Result<String, Error> {
    let salt = generate_salt();
    let key = derive_cipher_key(secret, &salt)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(key.expose_secret())
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key: {e}")))?;

    let ciphertext = cipher
        .encrypt(&Nonce::from(nonce_bytes), plaintext.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("ChaCha20-Poly1305 encryption failed: {e}")))?;

    Ok(SealedEnvelope::new(salt, nonce_bytes, ciphertext).encode())
}

/// Opens text produced by [`seal`] with the same `secret`.
///
/// # Errors
///
/// Returns error if:
/// - The sealed text is malformed (`InvalidCiphertext`, `Decode`)
/// - The secret is wrong or the text was modified (`AuthenticationFailed`)
/// - The plaintext is not UTF-8 (`DecryptionFailed`)
pub fn open(sealed: &str, secret: &str) -> Result<String, Error> {
    let envelope = SealedEnvelope::parse(sealed)?;
    let key = derive_cipher_key(secret, envelope.salt())?;

    let cipher = ChaCha20Poly1305::new_from_slice(key.expose_secret())
        .map_err(|e| Error::DecryptionFailed(format!("Invalid key: {e}")))?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(&Nonce::from(*envelope.nonce()), envelope.ciphertext())
            .map_err(|_| Error::AuthenticationFailed)?,
    );

    String::from_utf8(plaintext.to_vec())
        .map_err(|e| Error::DecryptionFailed(format!("Plaintext is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_round_trip() {
        let sealed = seal("secret1", "inner-key").expect("Encryption failed");
        let opened = open(&sealed, "inner-key").expect("Decryption failed");

        assert_eq!(opened, "secret1");
    }

    #[test]
    fn test_seal_is_randomized() {
        let sealed1 = seal("secret1", "inner-key").unwrap();
        let sealed2 = seal("secret1", "inner-key").unwrap();

        assert_ne!(sealed1, sealed2);
    }

    #[test]
    fn test_sealed_text_hides_plaintext() {
        let sealed = seal("secret1", "inner-key").unwrap();
        assert!(!sealed.contains("secret1"));
    }

    #[test]
    fn test_open_with_wrong_secret_fails() {
        let sealed = seal("secret1", "inner-key").unwrap();

        let result = open(&sealed, "other-key");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_open_tampered_text_fails() {
        let sealed = seal("secret1", "inner-key").unwrap();
        let envelope = SealedEnvelope::parse(&sealed).unwrap();

        let mut ciphertext = envelope.ciphertext().to_vec();
        ciphertext[0] ^= 0xFF;
        let tampered = SealedEnvelope::new(*envelope.salt(), *envelope.nonce(), ciphertext);

        let result = open(&tampered.encode(), "inner-key");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_empty_and_unicode_plaintext() {
        let long = "x".repeat(10_000);
        for plaintext in ["", "päss wörd ✓", long.as_str()] {
            let sealed = seal(plaintext, "k").unwrap();
            assert_eq!(open(&sealed, "k").unwrap(), plaintext);
        }
    }
}
