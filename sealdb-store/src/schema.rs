//! Table column specifications and identifier checks.
//!
//! Table and column names are interpolated into SQL, so they are restricted to
//! `[A-Za-z_][A-Za-z0-9_]*` and always emitted double-quoted.

use crate::error::{Result, StoreError};

/// Name of the implicit auto-incrementing identifier column.
pub const ID_COLUMN: &str = "id";

/// One column of a table definition: name, SQL type and declared length.
///
/// Rendered as `"name" TYPE(length)`. SQLite treats the length as advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    name: String,
    sql_type: String,
    length: u32,
}

impl ColumnSpec {
    /// Creates a column specification.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, length: u32) -> Self {
        Self { name: name.into(), sql_type: sql_type.into(), length }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the SQL type.
    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    /// Returns the declared length.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    pub(crate) fn to_sql(&self) -> Result<String> {
        let name = quote_identifier(&self.name)?;
        if self.sql_type.is_empty()
            || !self.sql_type.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_')
        {
            return Err(StoreError::InvalidIdentifier(self.sql_type.clone()));
        }
        Ok(format!("{name} {}({})", self.sql_type, self.length))
    }
}

impl<N: Into<String>, T: Into<String>> From<(N, T, u32)> for ColumnSpec {
    fn from((name, sql_type, length): (N, T, u32)) -> Self {
        Self::new(name, sql_type, length)
    }
}

/// Validates `name` as a plain identifier and returns it bracket-quoted.
///
/// SQLite reads an unknown double-quoted name as a string literal; a
/// bracketed name is always an identifier, so a misspelled column fails.
pub(crate) fn quote_identifier(name: &str) -> Result<String> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("[{name}]"))
}

/// Builds the `CREATE TABLE IF NOT EXISTS` statement for `table`.
pub(crate) fn create_table_sql(table: &str, columns: &[ColumnSpec]) -> Result<String> {
    let mut definitions = vec![format!("{ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT")];
    for column in columns {
        definitions.push(column.to_sql()?);
    }
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table)?,
        definitions.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users").unwrap(), "[users]");
        assert_eq!(quote_identifier("_last_name2").unwrap(), "[_last_name2]");
    }

    #[test]
    fn test_quote_identifier_rejects_injection() {
        for name in ["", "1users", "users; DROP TABLE x", "na\"me", "na]me", "a-b", "ñame"] {
            assert!(
                matches!(quote_identifier(name), Err(StoreError::InvalidIdentifier(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_create_table_sql() {
        let columns = [ColumnSpec::new("name", "TEXT", 50), ColumnSpec::from(("age", "INTEGER", 3))];
        let sql = create_table_sql("users", &columns).unwrap();

        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS [users] \
             (id INTEGER PRIMARY KEY AUTOINCREMENT, [name] TEXT(50), [age] INTEGER(3))"
        );
    }

    #[test]
    fn test_create_table_rejects_bad_type() {
        let columns = [ColumnSpec::new("name", "TEXT); DROP TABLE users; --", 50)];
        assert!(create_table_sql("users", &columns).is_err());
    }
}
