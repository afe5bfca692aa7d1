//! Firefly Bridge Storage Layer
//!
//! Implements the CaseStore trait on SQLite.
//!
//! # Architecture
//!
//! - One `cases` table holds the raw post text and the fields derived at intake
//! - Derived columns are written once on insert; updates touch only the
//!   operator-mutable columns (`status`, `assigned_to`, `notes`)
//! - List queries filter on status/urgency and return newest first
//!
//! # Examples
//!
//! ```no_run
//! use firefly_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for case operations
//! ```

#![warn(missing_docs)]

use firefly_domain::traits::{CaseQuery, CaseStore, CaseUpdate};
use firefly_domain::{Case, CaseId, CaseStatus, UrgencyLevel};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A case with the same id already exists
    #[error("Duplicate case id")]
    Duplicate,
}

/// SQLite-based implementation of CaseStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a SqliteStore between
/// request handlers behind a mutex, or give each worker its own instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use firefly_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("firefly.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert CaseId to bytes for storage
    ///
    /// Big-endian, so blob comparison order equals numeric (and therefore
    /// chronological) order.
    fn case_id_to_bytes(id: CaseId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to CaseId
    fn bytes_to_case_id(bytes: &[u8]) -> Result<CaseId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for CaseId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(CaseId::from_value(u128::from_be_bytes(arr)))
    }

    /// Map one `cases` row (all columns, schema order) to a Case
    fn row_to_case(row: &rusqlite::Row<'_>) -> rusqlite::Result<Case> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_case_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let phones_json: String = row.get(4)?;
        let extracted_phones: Vec<String> = serde_json::from_str(&phones_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let urgency_str: String = row.get(7)?;
        let urgency = UrgencyLevel::parse(&urgency_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                format!("Unknown urgency level: {}", urgency_str).into(),
            )
        })?;

        let status_str: String = row.get(10)?;
        let status = CaseStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                10,
                rusqlite::types::Type::Text,
                format!("Unknown case status: {}", status_str).into(),
            )
        })?;

        Ok(Case {
            id,
            source: row.get(1)?,
            source_url: row.get(2)?,
            raw_content: row.get(3)?,
            extracted_phones,
            extracted_location: row.get(5)?,
            description: row.get(6)?,
            urgency,
            latitude: row.get(8)?,
            longitude: row.get(9)?,
            status,
            assigned_to: row.get(11)?,
            notes: row.get(12)?,
            created_at: row.get::<_, i64>(13)? as u64,
            updated_at: row.get::<_, i64>(14)? as u64,
        })
    }
}

const CASE_COLUMNS: &str = "id, source, source_url, raw_content, extracted_phones, \
     extracted_location, description, urgency_level, latitude, longitude, \
     status, assigned_to, notes, created_at, updated_at";

/// Current wall-clock time in milliseconds since the Unix epoch
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl CaseStore for SqliteStore {
    type Error = StoreError;

    fn insert_case(&mut self, case: Case) -> Result<CaseId, Self::Error> {
        let id_bytes = Self::case_id_to_bytes(case.id);

        let exists: bool = self
            .conn
            .query_row("SELECT 1 FROM cases WHERE id = ?1", params![&id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate);
        }

        let phones_json = serde_json::to_string(&case.extracted_phones)
            .map_err(|e| StoreError::InvalidData(format!("Phone list: {}", e)))?;

        self.conn.execute(
            "INSERT INTO cases (id, source, source_url, raw_content, extracted_phones, \
             extracted_location, description, urgency_level, latitude, longitude, \
             status, assigned_to, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                &id_bytes,
                &case.source,
                &case.source_url,
                &case.raw_content,
                &phones_json,
                &case.extracted_location,
                &case.description,
                case.urgency.as_str(),
                case.latitude,
                case.longitude,
                case.status.as_str(),
                &case.assigned_to,
                &case.notes,
                case.created_at as i64,
                case.updated_at as i64,
            ],
        )?;

        Ok(case.id)
    }

    fn get_case(&self, id: CaseId) -> Result<Option<Case>, Self::Error> {
        let id_bytes = Self::case_id_to_bytes(id);

        let case = self
            .conn
            .query_row(
                &format!("SELECT {} FROM cases WHERE id = ?1", CASE_COLUMNS),
                params![&id_bytes],
                Self::row_to_case,
            )
            .optional()?;

        Ok(case)
    }

    fn query_cases(&self, query: &CaseQuery) -> Result<Vec<Case>, Self::Error> {
        let mut sql = format!("SELECT {} FROM cases WHERE 1=1", CASE_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(urgency) = query.urgency {
            sql.push_str(" AND urgency_level = ?");
            params.push(Box::new(urgency.as_str()));
        }

        // Newest first; id (UUIDv7 blob) breaks same-millisecond ties
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let cases = stmt
            .query_map(&param_refs[..], Self::row_to_case)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cases)
    }

    fn update_case(&mut self, id: CaseId, update: &CaseUpdate) -> Result<Option<Case>, Self::Error> {
        let id_bytes = Self::case_id_to_bytes(id);

        let mut sql = String::from("UPDATE cases SET updated_at = ?");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(now_ms() as i64)];

        if let Some(status) = update.status {
            sql.push_str(", status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(assigned_to) = &update.assigned_to {
            sql.push_str(", assigned_to = ?");
            params.push(Box::new(assigned_to.clone()));
        }

        if let Some(notes) = &update.notes {
            sql.push_str(", notes = ?");
            params.push(Box::new(notes.clone()));
        }

        sql.push_str(" WHERE id = ?");
        params.push(Box::new(id_bytes));

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let affected = self.conn.execute(&sql, &param_refs[..])?;

        if affected == 0 {
            return Ok(None);
        }

        self.get_case(id)
    }

    fn delete_case(&mut self, id: CaseId) -> Result<bool, Self::Error> {
        let id_bytes = Self::case_id_to_bytes(id);

        let affected = self
            .conn
            .execute("DELETE FROM cases WHERE id = ?1", params![&id_bytes])?;

        Ok(affected > 0)
    }

    fn count_cases(&self) -> Result<u64, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cases", [], |row| row.get(0))?;

        Ok(count as u64)
    }
}
