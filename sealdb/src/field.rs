//! Field encryptor for sensitive record values.
//!
//! The encryptor never holds key material itself: each call asks the provider
//! for the current inner key and seals or opens one field value with it.

use crate::cipher;
use crate::error::Error;
use crate::key_provider::KeyProvider;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Name of the column whose values are encrypted on write.
///
/// Matching is ASCII case-insensitive: `password`, `Password` and `PASSWORD`
/// are all sensitive. This is a naming convention, not a schema attribute.
pub const SENSITIVE_COLUMN: &str = "password";

/// Returns `true` if values written to `column` must be encrypted.
///
/// # Example
///
/// ```
/// use sealdb::field::is_sensitive_column;
///
/// assert!(is_sensitive_column("PassWord"));
/// assert!(!is_sensitive_column("password_hint"));
/// ```
#[must_use]
pub fn is_sensitive_column(column: &str) -> bool {
    column.eq_ignore_ascii_case(SENSITIVE_COLUMN)
}

/// Encrypts and decrypts individual field values with a provider's inner key.
///
/// # Example
///
/// ```ignore
/// use sealdb::field::FieldEncryptor;
/// use sealdb_key_file::SidecarKeyProvider;
/// use secrecy::SecretString;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outer_key = SecretString::new("my outer secret".to_string());
/// let provider = SidecarKeyProvider::for_database("users.db", outer_key)?;
/// let encryptor = FieldEncryptor::new(provider);
///
/// let ciphertext = encryptor.encrypt_field("secret1")?;
/// let plaintext = encryptor.decrypt_field(&ciphertext)?;
///
/// assert_eq!(plaintext, "secret1");
/// # Ok(())
/// # }
/// ```
pub struct FieldEncryptor<P: KeyProvider> {
    provider: Arc<P>,
}

impl<P: KeyProvider> FieldEncryptor<P> {
    /// Creates a new encryptor backed by `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider: Arc::new(provider) }
    }

    /// Returns the key provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Encrypts a field value.
    ///
    /// # Returns
    ///
    /// Sealed text safe to store in a TEXT column.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyUnavailable` if the inner key cannot be obtained,
    /// or `Error::EncryptionFailed` if sealing fails.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, Error> {
        let inner_key = self.provider.inner_key()?;
        cipher::seal(plaintext, inner_key.expose_secret())
    }

    /// Decrypts a field value produced by [`encrypt_field`](Self::encrypt_field).
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The inner key cannot be obtained (`KeyUnavailable`)
    /// - The value was sealed under a different inner key (`AuthenticationFailed`)
    /// - The value is not sealed text (`InvalidCiphertext`, `Decode`)
    pub fn decrypt_field(&self, ciphertext: &str) -> Result<String, Error> {
        let inner_key = self.provider.inner_key()?;
        cipher::open(ciphertext, inner_key.expose_secret())
    }
}

impl<P: KeyProvider> Clone for FieldEncryptor<P> {
    fn clone(&self) -> Self {
        Self { provider: Arc::clone(&self.provider) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyProviderError;
    use secrecy::SecretString;
    use std::sync::Mutex;

    // Mock key provider whose key can be replaced to simulate key loss
    struct MockKeyProvider {
        key: Mutex<Option<String>>,
        calls: Mutex<usize>,
    }

    impl MockKeyProvider {
        fn new(key: &str) -> Self {
            Self { key: Mutex::new(Some(key.to_string())), calls: Mutex::new(0) }
        }

        fn replace(&self, key: Option<&str>) {
            *self.key.lock().unwrap() = key.map(str::to_string);
        }
    }

    impl KeyProvider for MockKeyProvider {
        fn inner_key(&self) -> Result<SecretString, KeyProviderError> {
            *self.calls.lock().unwrap() += 1;
            self.key
                .lock()
                .unwrap()
                .clone()
                .map(SecretString::new)
                .ok_or_else(|| KeyProviderError::KeyNotFound("mock".to_string()))
        }
    }

    #[test]
    fn test_field_encrypt_decrypt_round_trip() {
        let encryptor = FieldEncryptor::new(MockKeyProvider::new("inner"));

        let ciphertext = encryptor.encrypt_field("secret1").expect("Encryption failed");
        assert_ne!(ciphertext, "secret1");

        let plaintext = encryptor.decrypt_field(&ciphertext).expect("Decryption failed");
        assert_eq!(plaintext, "secret1");
    }

    #[test]
    fn test_field_key_fetched_every_call() {
        let encryptor = FieldEncryptor::new(MockKeyProvider::new("inner"));

        let ciphertext = encryptor.encrypt_field("a").unwrap();
        encryptor.decrypt_field(&ciphertext).unwrap();
        encryptor.decrypt_field(&ciphertext).unwrap();

        assert_eq!(*encryptor.provider().calls.lock().unwrap(), 3);
    }

    #[test]
    fn test_field_regenerated_key_fails() {
        let encryptor = FieldEncryptor::new(MockKeyProvider::new("original"));
        let ciphertext = encryptor.encrypt_field("secret1").unwrap();

        encryptor.provider().replace(Some("regenerated"));

        let result = encryptor.decrypt_field(&ciphertext);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_field_missing_key_is_typed_error() {
        let encryptor = FieldEncryptor::new(MockKeyProvider::new("inner"));
        encryptor.provider().replace(None);

        let result = encryptor.encrypt_field("secret1");
        assert!(matches!(result, Err(Error::KeyUnavailable(KeyProviderError::KeyNotFound(_)))));
    }

    #[test]
    fn test_field_rejects_plaintext_input() {
        let encryptor = FieldEncryptor::new(MockKeyProvider::new("inner"));

        let result = encryptor.decrypt_field("secret1");
        assert!(matches!(result, Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn test_field_clone_shares_provider() {
        let encryptor1 = FieldEncryptor::new(MockKeyProvider::new("inner"));
        let encryptor2 = encryptor1.clone();

        let ciphertext = encryptor1.encrypt_field("test").unwrap();
        assert_eq!(encryptor2.decrypt_field(&ciphertext).unwrap(), "test");
    }

    #[test]
    fn test_sensitive_column_matching() {
        for name in ["password", "Password", "PASSWORD", "pAsSwOrD"] {
            assert!(is_sensitive_column(name), "{name} should be sensitive");
        }
        for name in ["passwd", "password2", "user_password", " password", "name"] {
            assert!(!is_sensitive_column(name), "{name} should not be sensitive");
        }
    }
}
