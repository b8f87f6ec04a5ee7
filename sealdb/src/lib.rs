//! # `SealDB`
//!
//! Transparent field-level encryption with a per-database inner key.
//!
//! ## Key layers
//!
//! - **Outer key**: a secret supplied by the caller. Never persisted; it only
//!   protects the key file.
//! - **Inner key**: generated on first use, sealed with the outer key and
//!   stored in a sidecar file next to the database (`users.db` → `users.key`).
//!   Deleting that file makes every encrypted field unrecoverable.
//!
//! ## Sensitive columns
//!
//! A column is encrypted on write if and only if its name equals `password`,
//! ignoring ASCII case. Reads return the stored ciphertext; call
//! [`FieldEncryptor::decrypt_field`] explicitly to recover the value.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdb::prelude::*;
//! use sealdb_key_file::SidecarKeyProvider;
//!
//! let provider = SidecarKeyProvider::for_database("users.db", outer_key)?;
//! let encryptor = FieldEncryptor::new(provider);
//!
//! let ciphertext = encryptor.encrypt_field("secret1")?;
//! let plaintext = encryptor.decrypt_field(&ciphertext)?;
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cipher;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod field;
pub mod kdf;
pub mod key_provider;

pub use error::{Error, KeyProviderError};
pub use field::{is_sensitive_column, FieldEncryptor, SENSITIVE_COLUMN};
pub use key_provider::KeyProvider;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::error::{Error, KeyProviderError};
    pub use crate::field::{is_sensitive_column, FieldEncryptor};
    pub use crate::key_provider::KeyProvider;
}
