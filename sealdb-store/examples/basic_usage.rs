//! Basic usage example for `SealDB`.

use sealdb_store::{extract_user_from_email, ColumnSpec, Database, DatabaseConfig, Value};
use secrecy::SecretString;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SealDB Basic Usage Example");
    println!("==========================\n");

    // The outer key protects the generated key file; never ship a fixed one
    let outer_key = std::env::var("SEALDB_OUTER_KEY").unwrap_or_else(|_| "change me".to_string());
    let config = DatabaseConfig::new(PathBuf::from("./example"), SecretString::new(outer_key));
    println!("Database: {}", config.database_path().display());
    println!("Key file: {}\n", config.key_path().display());

    let db = Database::open(config)?;
    db.create_table(
        "users",
        &[
            ColumnSpec::new("name", "TEXT", 50),
            ColumnSpec::new("last_name", "TEXT", 50),
            ColumnSpec::new("age", "INTEGER", 50),
            ColumnSpec::new("email", "TEXT", 100),
            ColumnSpec::new("password", "TEXT", 100),
        ],
    )?;
    println!("✓ Table `users` ready\n");

    let email = db.generate_email("users", "email")?;
    let user = extract_user_from_email(&email).unwrap_or_default();
    let id = db.insert_record(
        "users",
        [
            ("name", Value::from(user.as_str())),
            ("last_name", "nunez".into()),
            ("age", 20.into()),
            ("email", email.as_str().into()),
            ("password", "5252525252".into()),
        ],
    )?;
    println!("✓ Inserted {user} <{email}> with id {id}");

    for record in db.get_records_by_value("users", "last_name", "nunez")? {
        let stored = record.text("password").unwrap_or_default();
        println!("  Stored password:    {stored}");
        println!("  Decrypted password: {}", db.decrypt(stored)?);
    }

    db.update_record("users", id, [("age", Value::from(41)), ("password", "42424242".into())])?;
    if let Some(record) = db.get_record_by_id("users", id)? {
        let stored = record.text("password").unwrap_or_default();
        println!("\n✓ Updated record {id}");
        println!("  Decrypted password: {}", db.decrypt(stored)?);
    }

    println!("\nNote: deleting {} makes every stored password unreadable", db.key_path().display());

    Ok(())
}
