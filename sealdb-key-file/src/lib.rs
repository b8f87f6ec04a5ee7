//! Sidecar key file provider for `SealDB`.
//!
//! The inner key lives in a file next to the database, sealed with the
//! caller's outer key:
//! ```text
//! data/
//! ├── users.db     (SQLite database, `password` columns sealed)
//! └── users.key    (base64 of the sealed inner key, 0600 permissions)
//! ```
//!
//! The key file is created on first use and never overwritten. If it is
//! deleted, a new inner key is generated on the next use and every value
//! sealed under the old one is lost.

#![warn(clippy::pedantic, clippy::nursery)]

pub mod sidecar;

pub use sidecar::SidecarFile;

use rand::{rngs::OsRng, seq::SliceRandom};
use sealdb::error::KeyProviderError;
use sealdb::key_provider::KeyProvider;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, trace, warn};
use zeroize::Zeroizing;

/// Extension given to the sidecar key file.
pub const KEY_FILE_EXTENSION: &str = "key";

/// Characters an inner key is drawn from: ASCII letters, digits and punctuation.
pub const INNER_KEY_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Returns the sidecar key path for a database path (`users.db` → `users.key`).
#[must_use]
pub fn sidecar_path(db_path: impl AsRef<Path>) -> PathBuf {
    db_path.as_ref().with_extension(KEY_FILE_EXTENSION)
}

/// Length of the inner key generated for an outer key: `floor(n^1.5)` where
/// `n` is the outer key's character count.
///
/// Existing key files depend on this formula; it must not change.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn key_length(outer_key: &str) -> usize {
    let n = outer_key.chars().count() as f64;
    (n * n.sqrt()) as usize
}

/// Generates `length` characters drawn uniformly, with replacement, from
/// [`INNER_KEY_ALPHABET`] using the OS RNG.
#[must_use]
pub fn generate_inner_key(length: usize) -> SecretString {
    let key: String = (0..length)
        .filter_map(|_| INNER_KEY_ALPHABET.choose(&mut OsRng))
        .map(|&b| char::from(b))
        .collect();
    SecretString::new(key)
}

/// Sidecar-file-backed inner key manager.
///
/// The first call to [`KeyProvider::inner_key`] generates a key and creates
/// the file exclusively; later calls read it back. When two processes race on
/// a missing file, exactly one key wins and both callers return it.
///
/// # Example
///
/// ```no_run
/// use sealdb::key_provider::KeyProvider;
/// use sealdb_key_file::SidecarKeyProvider;
/// use secrecy::SecretString;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outer_key = SecretString::new("my outer secret".to_string());
/// let provider = SidecarKeyProvider::for_database("users.db", outer_key)?.with_cache(true);
///
/// let inner_key = provider.inner_key()?;
/// # Ok(())
/// # }
/// ```
pub struct SidecarKeyProvider {
    file: SidecarFile,
    key_length: usize,
    cache: Option<Mutex<Option<CachedKey>>>,
}

/// The last inner key read, with the encoded file contents it came from.
///
/// Every seal draws a fresh salt and nonce, so a regenerated key never
/// encodes to the same contents as the one it replaced.
struct CachedKey {
    encoded: Zeroizing<Vec<u8>>,
    key: SecretString,
}

impl SidecarKeyProvider {
    /// Creates a provider for the key file at `key_path`.
    ///
    /// # Arguments
    ///
    /// * `key_path` - Path of the sidecar key file
    /// * `outer_key` - Secret sealing the key file; required and non-empty
    ///
    /// # Errors
    ///
    /// Returns `KeyProviderError::CreationFailed` if the outer key is empty.
    pub fn new(
        key_path: impl Into<PathBuf>,
        outer_key: SecretString,
    ) -> Result<Self, KeyProviderError> {
        let key_length = key_length(outer_key.expose_secret());
        if key_length == 0 {
            return Err(KeyProviderError::CreationFailed(
                "outer key must not be empty".to_string(),
            ));
        }

        Ok(Self { file: SidecarFile::new(key_path, Some(outer_key)), key_length, cache: None })
    }

    /// Creates a provider whose key file sits next to `db_path`.
    ///
    /// # Errors
    ///
    /// Returns `KeyProviderError::CreationFailed` if the outer key is empty.
    pub fn for_database(
        db_path: impl AsRef<Path>,
        outer_key: SecretString,
    ) -> Result<Self, KeyProviderError> {
        Self::new(sidecar_path(db_path), outer_key)
    }

    /// Keeps the last inner key in memory while the key file's contents are
    /// unchanged. The file is still read on every call; only the decode and
    /// unseal are skipped.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| Mutex::new(None));
        self
    }

    /// Returns the key file path.
    #[must_use]
    pub fn key_path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the length of keys this provider generates.
    #[must_use]
    pub const fn generated_key_length(&self) -> usize {
        self.key_length
    }

    fn read_existing(&self, encoded: Zeroizing<Vec<u8>>) -> Result<SecretString, KeyProviderError> {
        let Some(cache) = &self.cache else {
            return self.file.decode(&encoded);
        };

        let mut slot = cache
            .lock()
            .map_err(|_| KeyProviderError::UnwrapFailed("key cache poisoned".to_string()))?;

        if let Some(cached) = slot.as_ref().filter(|cached| cached.encoded == encoded) {
            trace!(path = %self.key_path().display(), "inner key served from cache");
            return Ok(SecretString::new(cached.key.expose_secret().clone()));
        }

        let key = self.file.decode(&encoded)?;
        *slot = Some(CachedKey { encoded, key: SecretString::new(key.expose_secret().clone()) });
        drop(slot);
        Ok(key)
    }

    fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Ok(mut slot) = cache.lock() {
                *slot = None;
            }
        }
    }
}

impl KeyProvider for SidecarKeyProvider {
    fn inner_key(&self) -> Result<SecretString, KeyProviderError> {
        if let Some(encoded) = self.file.read_encoded()? {
            return self.read_existing(encoded);
        }

        self.clear_cache();
        debug!(path = %self.key_path().display(), "key file missing, generating inner key");

        let generated = generate_inner_key(self.key_length);
        if self.file.create_new(generated.expose_secret())? {
            info!(
                path = %self.key_path().display(),
                length = self.key_length,
                "created inner key file"
            );
            return Ok(generated);
        }

        warn!(path = %self.key_path().display(), "key file created concurrently, using existing key");
        self.file.read()
    }
}
