//! Sidecar file holding one opaque, optionally sealed, text blob.
//!
//! On disk the file contains `base64(text)` where `text` is either the data
//! itself or, when an outer key is set, the data sealed with that key. The
//! file has no header; the codec and cipher must stay fixed for existing files
//! to remain readable.

use sealdb::error::KeyProviderError;
use sealdb::{cipher, codec};
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Reads and writes a single text blob at a fixed path.
pub struct SidecarFile {
    path: PathBuf,
    outer_key: Option<SecretString>,
}

impl SidecarFile {
    /// Creates a handle for `path`. Nothing is touched on disk.
    ///
    /// With `outer_key` set, the blob is sealed before encoding and opened
    /// after decoding.
    pub fn new(path: impl Into<PathBuf>, outer_key: Option<SecretString>) -> Self {
        Self { path: path.into(), outer_key }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the encoded file contents, or `None` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read.
    pub fn read_encoded(&self) -> Result<Option<Zeroizing<Vec<u8>>>, KeyProviderError> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(Some(Zeroizing::new(raw))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KeyProviderError::Io(e)),
        }
    }

    /// Reads and decodes the blob.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The file does not exist (`KeyNotFound`)
    /// - The contents are not valid base64 or UTF-8 (`Decode`)
    /// - The outer key does not open the contents (`UnwrapFailed`)
    pub fn read(&self) -> Result<SecretString, KeyProviderError> {
        let raw = self
            .read_encoded()?
            .ok_or_else(|| KeyProviderError::KeyNotFound(self.path.display().to_string()))?;
        self.decode(&raw)
    }

    /// Decodes contents previously returned by [`read_encoded`](Self::read_encoded).
    ///
    /// # Errors
    ///
    /// Returns `Decode` for invalid base64 or UTF-8, and `UnwrapFailed` if the
    /// outer key does not open the contents.
    pub fn decode(&self, raw: &[u8]) -> Result<SecretString, KeyProviderError> {
        let decoded = Zeroizing::new(
            codec::decode(raw).map_err(|e| KeyProviderError::Decode(e.to_string()))?,
        );
        let text = String::from_utf8(decoded.to_vec())
            .map_err(|e| KeyProviderError::Decode(format!("contents are not UTF-8: {e}")))?;

        match &self.outer_key {
            Some(outer_key) => {
                let text = Zeroizing::new(text);
                cipher::open(&text, outer_key.expose_secret())
                    .map(SecretString::new)
                    .map_err(|e| KeyProviderError::UnwrapFailed(e.to_string()))
            }
            None => Ok(SecretString::new(text)),
        }
    }

    /// Encodes `data` and writes it, creating or truncating the file.
    ///
    /// A crash mid-write can leave a corrupt file.
    ///
    /// # Errors
    ///
    /// Returns error if sealing or the write fails.
    pub fn write(&self, data: &str) -> Result<(), KeyProviderError> {
        let encoded = self.encode(data)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(encoded.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Encodes `data` and writes it only if the file does not exist yet.
    ///
    /// The blob is written to a temporary file in the same directory and then
    /// linked into place without clobbering, so concurrent creators cannot
    /// overwrite each other.
    ///
    /// # Returns
    ///
    /// `true` if this call created the file, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns error if sealing, the temporary write, or the link fails for a
    /// reason other than the file already existing.
    pub fn create_new(&self, data: &str) -> Result<bool, KeyProviderError> {
        let encoded = self.encode(data)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = tempfile::Builder::new().prefix(".sealdb-key").tempfile_in(dir)?;
        staged.write_all(encoded.as_bytes())?;
        staged.as_file().sync_all()?;

        match staged.persist_noclobber(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(KeyProviderError::Io(e.error)),
        }
    }

    fn encode(&self, data: &str) -> Result<String, KeyProviderError> {
        match &self.outer_key {
            Some(outer_key) => {
                let sealed = Zeroizing::new(
                    cipher::seal(data, outer_key.expose_secret())
                        .map_err(|e| KeyProviderError::CreationFailed(e.to_string()))?,
                );
                Ok(codec::encode(sealed.as_bytes()))
            }
            None => Ok(codec::encode(data.as_bytes())),
        }
    }
}
