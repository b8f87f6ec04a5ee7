//! SQLite-backed record store with transparent `password` encryption.

use std::path::{Path, PathBuf};

use rusqlite::{params, params_from_iter, Connection};
use sealdb::field::{is_sensitive_column, FieldEncryptor};
use sealdb_key_file::SidecarKeyProvider;
use tracing::{debug, trace, warn};

use crate::config::DatabaseConfig;
use crate::error::{Result, StoreError};
use crate::identity;
use crate::schema::{create_table_sql, quote_identifier, ColumnSpec, ID_COLUMN};
use crate::value::{Record, Value};

/// A database handle.
///
/// Any column named `password` (ASCII case-insensitive) is encrypted before
/// it is written. Reads return the stored ciphertext unchanged; recover the
/// value with [`decrypt`](Self::decrypt). Because encryption is randomized,
/// querying by a `password` value never matches.
///
/// The handle owns one SQLite connection and is not `Sync`; share it between
/// threads only behind external synchronization.
///
/// # Example
///
/// ```no_run
/// use sealdb_store::{ColumnSpec, Database, DatabaseConfig};
/// use secrecy::SecretString;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig::new("users", SecretString::new("outer secret".to_string()));
/// let db = Database::open(config)?;
///
/// db.create_table("users", &[ColumnSpec::new("name", "TEXT", 50), ColumnSpec::new("password", "TEXT", 100)])?;
/// let id = db.insert_record("users", [("name", "Ann"), ("password", "secret1")])?;
///
/// let record = db.get_record_by_id("users", id)?.expect("record exists");
/// let password = db.decrypt(record.text("password").unwrap_or_default())?;
/// assert_eq!(password, "secret1");
/// # Ok(())
/// # }
/// ```
pub struct Database {
    path: PathBuf,
    connection: Connection,
    encryptor: FieldEncryptor<SidecarKeyProvider>,
    max_email_attempts: usize,
}

impl Database {
    /// Opens (creating if needed) the database described by `config`.
    ///
    /// The sidecar key file is not touched until the first encryption or
    /// decryption.
    ///
    /// # Errors
    ///
    /// Returns error if the outer key is empty or the database cannot be opened.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        let path = config.database_path();
        let key_path = config.key_path();
        let key_cache = config.key_cache();
        let max_email_attempts = config.max_email_attempts();

        let provider =
            SidecarKeyProvider::new(key_path, config.into_outer_key())?.with_cache(key_cache);
        let connection = Connection::open(&path)?;
        debug!(path = %path.display(), "opened database");

        Ok(Self { path, connection, encryptor: FieldEncryptor::new(provider), max_email_attempts })
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the sidecar key file path.
    #[must_use]
    pub fn key_path(&self) -> &Path {
        self.encryptor.provider().key_path()
    }

    /// Returns the field encryptor used for sensitive columns.
    #[must_use]
    pub const fn encryptor(&self) -> &FieldEncryptor<SidecarKeyProvider> {
        &self.encryptor
    }

    /// Creates `table` if it does not exist.
    ///
    /// An `id INTEGER PRIMARY KEY AUTOINCREMENT` column is always added first.
    ///
    /// # Errors
    ///
    /// Returns error if a name or type is invalid or the statement fails.
    pub fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
        let sql = create_table_sql(table, columns)?;
        self.connection.execute(&sql, [])?;
        debug!(table, columns = columns.len(), "created table");
        Ok(())
    }

    /// Inserts a record and returns its new identifier.
    ///
    /// Values for a `password` column are encrypted first.
    ///
    /// # Errors
    ///
    /// Returns error if a name is invalid, encryption fails, or the statement fails.
    pub fn insert_record<K, V, I>(&self, table: &str, fields: I) -> Result<i64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let table_sql = quote_identifier(table)?;
        let (columns, values) = self.prepare_fields(fields)?;

        let sql = if columns.is_empty() {
            format!("INSERT INTO {table_sql} DEFAULT VALUES")
        } else {
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!("INSERT INTO {table_sql} ({}) VALUES ({placeholders})", columns.join(", "))
        };

        self.connection.execute(&sql, params_from_iter(values.iter()))?;
        let id = self.connection.last_insert_rowid();
        debug!(table, id, "inserted record");
        Ok(id)
    }

    /// Updates the record `id` and returns the number of rows changed.
    ///
    /// Values for a `password` column are encrypted first. An empty field set
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns error if a name is invalid, encryption fails, or the statement fails.
    pub fn update_record<K, V, I>(&self, table: &str, id: i64, fields: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let table_sql = quote_identifier(table)?;
        let (columns, mut values) = self.prepare_fields(fields)?;
        if columns.is_empty() {
            return Ok(0);
        }

        let assignments: Vec<String> = columns.iter().map(|c| format!("{c} = ?")).collect();
        let sql =
            format!("UPDATE {table_sql} SET {} WHERE {ID_COLUMN} = ?", assignments.join(", "));
        values.push(Value::Integer(id));

        let changed = self.connection.execute(&sql, params_from_iter(values.iter()))?;
        debug!(table, id, changed, "updated record");
        Ok(changed)
    }

    /// Returns every record whose `column` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns error if a name is invalid or the query fails.
    pub fn get_records_by_value(
        &self,
        table: &str,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1",
            quote_identifier(table)?,
            quote_identifier(column)?
        );
        self.query_records(&sql, &value.into())
    }

    /// Returns the record with identifier `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the table name is invalid or the query fails.
    pub fn get_record_by_id(&self, table: &str, id: i64) -> Result<Option<Record>> {
        let sql = format!("SELECT * FROM {} WHERE {ID_COLUMN} = ?1", quote_identifier(table)?);
        Ok(self.query_records(&sql, &Value::Integer(id))?.into_iter().next())
    }

    /// Drops `column` from `table`.
    ///
    /// # Errors
    ///
    /// Returns error if a name is invalid or the statement fails.
    pub fn delete_column(&self, table: &str, column: &str) -> Result<()> {
        let sql = format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_identifier(table)?,
            quote_identifier(column)?
        );
        self.connection.execute(&sql, [])?;
        debug!(table, column, "dropped column");
        Ok(())
    }

    /// Deletes the record `id` and returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns error if the table name is invalid or the statement fails.
    pub fn delete_record_by_id(&self, table: &str, id: i64) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE {ID_COLUMN} = ?1", quote_identifier(table)?);
        let deleted = self.connection.execute(&sql, params![id])?;
        debug!(table, id, deleted, "deleted record");
        Ok(deleted)
    }

    /// Encrypts a value with this database's inner key.
    ///
    /// # Errors
    ///
    /// Returns error if the inner key is unavailable or encryption fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        Ok(self.encryptor.encrypt_field(plaintext)?)
    }

    /// Decrypts a value read from a `password` column.
    ///
    /// # Errors
    ///
    /// Returns error if the inner key is unavailable, or the value was not
    /// encrypted under the current inner key.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        Ok(self.encryptor.decrypt_field(ciphertext)?)
    }

    /// Generates an `@example.com` address not yet stored in `table.column`.
    ///
    /// A missing table or column counts as "not stored".
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` for bad names, or `UniqueValueExhausted`
    /// once the configured attempt cap is reached.
    pub fn generate_email(&self, table: &str, column: &str) -> Result<String> {
        self.generate_unique_value(table, column, identity::generate_email)
    }

    /// Draws candidates from `generator` until one is not stored in
    /// `table.column`, trying at most the configured number of times.
    ///
    /// Probe failures (for example a table that does not exist yet) are
    /// logged and treated as "not stored".
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` for bad names, or `UniqueValueExhausted`
    /// if every candidate collided.
    pub fn generate_unique_value<F>(&self, table: &str, column: &str, mut generator: F) -> Result<String>
    where
        F: FnMut() -> String,
    {
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
            quote_identifier(table)?,
            quote_identifier(column)?
        );

        for attempt in 1..=self.max_email_attempts {
            let candidate = generator();
            match self.value_exists(&sql, &candidate) {
                Ok(false) => {
                    debug!(table, column, attempt, "generated unique value");
                    return Ok(candidate);
                }
                Ok(true) => trace!(table, column, attempt, "candidate already stored"),
                Err(e) => {
                    warn!(table, column, error = %e, "uniqueness probe failed, treating as no match");
                    return Ok(candidate);
                }
            }
        }

        Err(StoreError::UniqueValueExhausted {
            table: table.to_string(),
            column: column.to_string(),
            attempts: self.max_email_attempts,
        })
    }

    fn value_exists(&self, sql: &str, value: &str) -> rusqlite::Result<bool> {
        self.connection.prepare_cached(sql)?.exists(params![value])
    }

    fn query_records(&self, sql: &str, value: &Value) -> Result<Vec<Record>> {
        let mut stmt = self.connection.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt.query_map(params![value], |row| {
            let mut fields = Vec::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                fields.push((name.clone(), Value::from(row.get_ref(i)?)));
            }
            Ok(Record::new(fields))
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Quotes column names and encrypts sensitive values.
    fn prepare_fields<K, V, I>(&self, fields: I) -> Result<(Vec<String>, Vec<Value>)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut columns = Vec::new();
        let mut values = Vec::new();

        for (name, value) in fields {
            let name = name.as_ref();
            columns.push(quote_identifier(name)?);
            let value = value.into();
            values.push(if is_sensitive_column(name) { self.seal_value(name, value)? } else { value });
        }

        Ok((columns, values))
    }

    fn seal_value(&self, column: &str, value: Value) -> Result<Value> {
        let plaintext = match value {
            Value::Null => return Ok(Value::Null),
            Value::Text(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => format!("{f:?}"),
            Value::Blob(_) => {
                return Err(StoreError::UnsupportedSensitiveValue { column: column.to_string() })
            }
        };
        trace!(column, "encrypting sensitive column");
        Ok(Value::Text(self.encrypt(&plaintext)?))
    }
}
