use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{helpers::parse_datetime, Database};

#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

fn row_to_entry(row: &Row) -> Result<KvEntry> {
    let updated_at: String = row.get("updated_at")?;

    Ok(KvEntry {
        key: row.get("key")?,
        value: row.get("value")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn get_entry(&self, key: &str) -> Result<Option<KvEntry>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT key, value, updated_at FROM kv_entries WHERE key = ?1",
            )?;
            let entry = stmt
                .query_row(params![key], |row| Ok(row_to_entry(row)))
                .optional()?
                .transpose()?;
            Ok(entry)
        })
        .await
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    pub async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = Utc::now();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, updated_at.to_rfc3339()],
            )
            .with_context(|| format!("failed to store value for key {key}"))?;
            Ok(())
        })
        .await
    }

    /// Returns whether a row was deleted.
    pub async fn delete_value(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.execute(move |conn| {
            let deleted = conn
                .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
                .with_context(|| format!("failed to delete key {key}"))?;
            Ok(deleted > 0)
        })
        .await
    }
}
