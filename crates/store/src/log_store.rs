use crate::types::{LogEntry, LogStatus};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("agent_name must be non-empty")]
    EmptyAgentName,
}

/// SQLite-backed execution log. Append-only: rows are never updated or
/// deleted through this type.
///
/// A single connection behind a mutex serializes writers; SQLite guarantees
/// readers in other instances never observe a partially written row.
pub struct LogStore {
    conn: Mutex<Connection>,
}

impl LogStore {
    /// Open (or create) the log database at `db_path`. Schema creation is
    /// idempotent, so any number of instances may be constructed against the
    /// same file.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS llm_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                agent_name TEXT NOT NULL,
                model_used TEXT NOT NULL,
                prompt TEXT,
                response TEXT,
                status TEXT
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one terminal outcome row. The store assigns `id` and
    /// `timestamp`; the row is durable before this returns.
    pub fn insert(
        &self,
        agent_name: &str,
        model_used: &str,
        prompt: &str,
        response: &str,
        status: LogStatus,
    ) -> Result<LogEntry, StoreError> {
        if agent_name.is_empty() {
            return Err(StoreError::EmptyAgentName);
        }

        let timestamp = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO llm_log (timestamp, agent_name, model_used, prompt, response, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![timestamp, agent_name, model_used, prompt, response, status.as_str()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(LogEntry {
            id,
            timestamp,
            agent_name: agent_name.to_string(),
            model_used: model_used.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            status,
        })
    }

    pub fn has_entries(&self) -> Result<bool, StoreError> {
        Ok(self.count()? > 0)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM llm_log", [], |row| row.get(0))?;
        Ok(count)
    }

    /// `model_used` of the newest row, ties on timestamp broken by highest
    /// id so low-resolution clocks still give a deterministic answer.
    pub fn get_last_used_model(&self) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        let result = conn
            .query_row(
                "SELECT model_used FROM llm_log ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .map(Some);

        match result {
            Ok(model) => Ok(model),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All rows, ascending by `(timestamp, id)`.
    pub fn list_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, agent_name, model_used, prompt, response, status
             FROM llm_log ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt.query_map([], row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Rows with the given status, same ordering as `list_all`.
    pub fn list_by_status(&self, status: LogStatus) -> Result<Vec<LogEntry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, agent_name, model_used, prompt, response, status
             FROM llm_log WHERE status = ?1 ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![status.as_str()], row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        agent_name: row.get(2)?,
        model_used: row.get(3)?,
        prompt: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        response: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        status: LogStatus::from_str_lossy(
            row.get::<_, Option<String>>(6)?.unwrap_or_default().as_str(),
        ),
    })
}
