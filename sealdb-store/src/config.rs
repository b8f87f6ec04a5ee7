//! Configuration for opening a [`Database`](crate::Database).

use secrecy::SecretString;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Extension appended to database paths that lack it.
pub const DB_EXTENSION: &str = "db";

/// Default cap on candidates tried by the unique e-mail generator.
pub const DEFAULT_MAX_EMAIL_ATTEMPTS: usize = 1000;

/// Settings for a database handle.
///
/// The outer key is required: it seals the sidecar key file and there is no
/// built-in default.
///
/// # Example
///
/// ```
/// use sealdb_store::DatabaseConfig;
/// use secrecy::SecretString;
///
/// let config = DatabaseConfig::new("data/users", SecretString::new("outer".to_string()))
///     .with_key_cache(true)
///     .with_max_email_attempts(50);
///
/// assert_eq!(config.database_path().to_str(), Some("data/users.db"));
/// assert_eq!(config.key_path().to_str(), Some("data/users.key"));
/// ```
#[derive(Debug)]
pub struct DatabaseConfig {
    path: PathBuf,
    outer_key: SecretString,
    key_extension: String,
    key_cache: bool,
    max_email_attempts: usize,
}

impl DatabaseConfig {
    /// Creates a configuration for the database at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Database file path; `.db` is appended if missing
    /// * `outer_key` - Secret sealing the sidecar key file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, outer_key: SecretString) -> Self {
        Self {
            path: path.into(),
            outer_key,
            key_extension: sealdb_key_file::KEY_FILE_EXTENSION.to_string(),
            key_cache: false,
            max_email_attempts: DEFAULT_MAX_EMAIL_ATTEMPTS,
        }
    }

    /// Sets the extension of the sidecar key file (default `key`).
    #[must_use]
    pub fn with_key_extension(mut self, extension: impl Into<String>) -> Self {
        self.key_extension = extension.into();
        self
    }

    /// Enables the in-memory inner-key cache (default off).
    #[must_use]
    pub fn with_key_cache(mut self, enabled: bool) -> Self {
        self.key_cache = enabled;
        self
    }

    /// Sets the cap on unique e-mail generation attempts.
    #[must_use]
    pub fn with_max_email_attempts(mut self, attempts: usize) -> Self {
        self.max_email_attempts = attempts;
        self
    }

    /// Returns the database path, with `.db` appended if it was missing.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        if self.path.extension() == Some(OsStr::new(DB_EXTENSION)) {
            return self.path.clone();
        }
        let mut path = self.path.clone().into_os_string();
        path.push(".");
        path.push(DB_EXTENSION);
        PathBuf::from(path)
    }

    /// Returns the sidecar key file path.
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.database_path().with_extension(&self.key_extension)
    }

    /// Returns whether the inner-key cache is enabled.
    #[must_use]
    pub const fn key_cache(&self) -> bool {
        self.key_cache
    }

    /// Returns the cap on unique e-mail generation attempts.
    #[must_use]
    pub const fn max_email_attempts(&self) -> usize {
        self.max_email_attempts
    }

    pub(crate) fn into_outer_key(self) -> SecretString {
        self.outer_key
    }
}
