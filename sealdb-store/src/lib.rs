//! SQLite record store for `SealDB`.
//!
//! Thin statement builders over a single SQLite file. Every column named
//! `password` (any ASCII case) is encrypted with the database's inner key
//! before it is written; reads return the stored ciphertext, which callers
//! decrypt explicitly with [`Database::decrypt`].
//!
//! The inner key lives in a sidecar file beside the database (`users.db` →
//! `users.key`), sealed with the outer key given in [`DatabaseConfig`].
//! Losing that file loses every encrypted value.

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
mod database;
pub mod error;
pub mod identity;
pub mod schema;
pub mod value;

pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{Result, StoreError};
pub use identity::extract_user_from_email;
pub use schema::ColumnSpec;
pub use value::{Record, Value};
