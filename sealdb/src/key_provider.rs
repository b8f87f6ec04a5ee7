//! Key provider abstraction for inner-key management.

use crate::error::KeyProviderError;
use secrecy::SecretString;

/// Supplies the inner key used to seal sensitive fields.
///
/// Implementations must be thread-safe (`Send + Sync`) so a provider can be
/// shared between encryptor clones.
///
/// # Example
///
/// ```rust
/// use sealdb::error::KeyProviderError;
/// use sealdb::key_provider::KeyProvider;
/// use secrecy::SecretString;
///
/// struct FixedKey;
///
/// impl KeyProvider for FixedKey {
///     fn inner_key(&self) -> Result<SecretString, KeyProviderError> {
///         Ok(SecretString::new("fixed inner key".to_string()))
///     }
/// }
/// ```
pub trait KeyProvider: Send + Sync {
    /// Returns the current inner key, creating it if the provider supports that.
    ///
    /// # Errors
    ///
    /// Returns `KeyProviderError::CreationFailed` if a new key cannot be stored,
    /// `KeyProviderError::UnwrapFailed` or `KeyProviderError::Decode` if the
    /// stored key cannot be recovered.
    fn inner_key(&self) -> Result<SecretString, KeyProviderError>;
}

impl<P: KeyProvider + ?Sized> KeyProvider for std::sync::Arc<P> {
    fn inner_key(&self) -> Result<SecretString, KeyProviderError> {
        (**self).inner_key()
    }
}
