//! Error types for `SealDB` operations.

use std::fmt;

/// Main error type for field encryption operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encryption operation failed
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption operation failed
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Authentication tag verification failed (wrong key, or data corrupted or tampered)
    #[error("authentication failed: wrong key or ciphertext corrupted")]
    AuthenticationFailed,

    /// The inner key could not be obtained from the key provider
    #[error("key unavailable: {0}")]
    KeyUnavailable(#[from] KeyProviderError),

    /// Sealed text is not in the expected `salt*nonce*ciphertext` layout
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// Key derivation failed
    #[error("key derivation failed")]
    KeyDerivation,

    /// Base64 decoding failed
    #[error("decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Errors specific to key provider operations.
#[derive(Debug)]
pub enum KeyProviderError {
    /// Key file not found
    KeyNotFound(String),

    /// Key creation failed
    CreationFailed(String),

    /// Key file could not be opened with the outer key
    UnwrapFailed(String),

    /// Key file contents are not valid codec output
    Decode(String),

    /// I/O operation failed
    Io(std::io::Error),
}

impl fmt::Display for KeyProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound(path) => write!(f, "key file not found: {path}"),
            Self::CreationFailed(msg) => write!(f, "key creation failed: {msg}"),
            Self::UnwrapFailed(msg) => write!(f, "key unwrap failed: {msg}"),
            Self::Decode(msg) => write!(f, "key file decode failed: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for KeyProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KeyProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<base64::DecodeError> for KeyProviderError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}
