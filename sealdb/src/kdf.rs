//! Key derivation using HKDF (HMAC-based Key Derivation Function).
//!
//! Text secrets (the outer key, or the generated inner key) are never used as
//! cipher keys directly. Each sealing operation draws a fresh salt and derives
//! a 32-byte ChaCha20-Poly1305 key with HKDF-SHA256.

use crate::error::Error;
use hkdf::Hkdf;
use secrecy::SecretVec;
use sha2::Sha256;

/// Derived cipher key size in bytes (256 bits).
pub const CIPHER_KEY_SIZE: usize = 32;

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// Domain separation label for field and key-file sealing.
const INFO: &[u8] = b"sealdb|seal|v1";

/// Derives a cipher key from a text secret and a per-message salt.
///
/// # Errors
///
/// Returns `Error::KeyDerivation` if the derivation fails.
///
/// # Example
///
/// ```
/// use sealdb::kdf::{derive_cipher_key, SALT_SIZE};
/// use secrecy::ExposeSecret;
///
/// let key = derive_cipher_key("outer secret", &[7u8; SALT_SIZE]).expect("derivation failed");
/// assert_eq!(key.expose_secret().len(), 32);
/// ```
pub fn derive_cipher_key(secret: &str, salt: &[u8]) -> Result<SecretVec<u8>, Error> {
    let hkdf = Hkdf::<Sha256>::new(Some(salt), secret.as_bytes());

    let mut key = vec![0u8; CIPHER_KEY_SIZE];
    hkdf.expand(INFO, &mut key).map_err(|_| Error::KeyDerivation)?;

    Ok(SecretVec::new(key))
}

/// Generates a random salt from the OS RNG.
#[must_use]
pub fn generate_salt() -> [u8; SALT_SIZE] {
    use chacha20poly1305::aead::{rand_core::RngCore, OsRng};

    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_derive_cipher_key_deterministic() {
        let salt = [1u8; SALT_SIZE];

        let key1 = derive_cipher_key("hfNdd521@Dfkl", &salt).expect("derivation failed");
        let key2 = derive_cipher_key("hfNdd521@Dfkl", &salt).expect("derivation failed");

        assert_eq!(key1.expose_secret(), key2.expose_secret());
    }

    #[test]
    fn test_derive_cipher_key_different_salts() {
        let key1 = derive_cipher_key("secret", &[1u8; SALT_SIZE]).unwrap();
        let key2 = derive_cipher_key("secret", &[2u8; SALT_SIZE]).unwrap();

        assert_ne!(key1.expose_secret(), key2.expose_secret());
    }

    #[test]
    fn test_derive_cipher_key_different_secrets() {
        let salt = [9u8; SALT_SIZE];
        let key1 = derive_cipher_key("secret-a", &salt).unwrap();
        let key2 = derive_cipher_key("secret-b", &salt).unwrap();

        assert_ne!(key1.expose_secret(), key2.expose_secret());
    }

    #[test]
    fn test_derive_cipher_key_output_length() {
        let key = derive_cipher_key("", &[0u8; SALT_SIZE]).unwrap();
        assert_eq!(key.expose_secret().len(), CIPHER_KEY_SIZE);
    }

    #[test]
    fn test_generate_salt() {
        assert_ne!(generate_salt(), generate_salt());
    }

    // RFC 5869 Test Vector (using HKDF-SHA256)
    // https://tools.ietf.org/html/rfc5869#appendix-A.1
    #[test]
    fn test_hkdf_rfc5869_test_case_1() {
        const IKM_HEX: &str = "0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b";
        const SALT_HEX: &str = "000102030405060708090a0b0c";
        const INFO_HEX: &str = "f0f1f2f3f4f5f6f7f8f9";
        const EXPECTED_OKM_HEX: &str =
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865";

        let ikm = hex::decode(IKM_HEX).unwrap();
        let salt = hex::decode(SALT_HEX).unwrap();
        let info = hex::decode(INFO_HEX).unwrap();
        let expected_okm = hex::decode(EXPECTED_OKM_HEX).unwrap();

        let hkdf = Hkdf::<Sha256>::new(Some(&salt), &ikm);
        let mut okm = vec![0u8; 42];
        hkdf.expand(&info, &mut okm).expect("HKDF expand failed");

        assert_eq!(okm, expected_okm);
    }
}
