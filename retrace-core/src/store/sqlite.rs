//! Local SQLite event store
//!
//! An append-only log of raw interaction records, one row per event,
//! keyed by `(user_id, session_id)`. Uses embedded migrations managed
//! via PRAGMA user_version.

use crate::error::{Error, Result};
use crate::store::{EventStore, RawEventRecord};
use crate::types::SessionSummary;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS user_events (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id             TEXT NOT NULL,

        -- Wire contract fields, stored under their wire names
        session_id          TEXT NOT NULL,
        timestamp           INTEGER NOT NULL,
        doc_id              TEXT NOT NULL DEFAULT '',
        event_type          TEXT NOT NULL DEFAULT '',
        tag_name            TEXT NOT NULL DEFAULT '',
        text_content        TEXT NOT NULL DEFAULT '',
        event_source        TEXT NOT NULL DEFAULT '',
        offset_x            INTEGER NOT NULL DEFAULT 0,
        offset_y            INTEGER NOT NULL DEFAULT 0,
        interaction_context TEXT NOT NULL DEFAULT '',

        -- When this store observed the record
        recorded_at         DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_user_events_user
        ON user_events(user_id);
    CREATE INDEX IF NOT EXISTS idx_user_events_user_session
        ON user_events(user_id, session_id, timestamp);
    "#,
];

/// Local event store backed by a single SQLite file.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    /// Open or create a store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {}", path.display(), e)))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::StoreUnavailable(format!("in-memory: {}", e)))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Run pending migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let current: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current {
                conn.execute_batch(migration)?;
                conn.pragma_update(None, "user_version", version)?;
                tracing::info!(version, "Applied store migration");
            }
        }

        debug_assert_eq!(MIGRATIONS.len() as i32, SCHEMA_VERSION);
        Ok(())
    }

    /// Append one raw record to a user's event log.
    ///
    /// This is the ingestion side of the store: records arrive exactly as
    /// the recorder produced them and are never validated here.
    pub fn append_event(&self, user_id: &str, record: &RawEventRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO user_events (
                user_id, session_id, timestamp, doc_id, event_type, tag_name,
                text_content, event_source, offset_x, offset_y,
                interaction_context, recorded_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                user_id,
                record.session_id,
                record.timestamp,
                record.doc_id,
                record.event_type,
                record.tag_name,
                record.text_content,
                record.event_source,
                record.offset_x,
                record.offset_y,
                record.interaction_context,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<RawEventRecord> {
        Ok(RawEventRecord {
            session_id: row.get("session_id")?,
            timestamp: row.get("timestamp")?,
            doc_id: row.get("doc_id")?,
            event_type: row.get("event_type")?,
            tag_name: row.get("tag_name")?,
            text_content: row.get("text_content")?,
            event_source: row.get("event_source")?,
            offset_x: row.get("offset_x")?,
            offset_y: row.get("offset_y")?,
            interaction_context: row.get("interaction_context")?,
        })
    }
}

impl EventStore for SqliteEventStore {
    fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT e.session_id,
                   COALESCE(
                       (SELECT e2.interaction_context FROM user_events e2
                        WHERE e2.user_id = ?1
                          AND e2.session_id = e.session_id
                          AND e2.interaction_context <> ''
                        ORDER BY e2.timestamp DESC, e2.id DESC
                        LIMIT 1),
                       ''
                   ) AS task_name
            FROM user_events e
            WHERE e.user_id = ?1
            GROUP BY e.session_id
            ORDER BY MIN(e.timestamp)
            "#,
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok(SessionSummary {
                session_id: row.get("session_id")?,
                task_name: row.get("task_name")?,
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    fn fetch_events(&self, user_id: &str, session_id: &str) -> Result<Vec<RawEventRecord>> {
        let conn = self.conn.lock().unwrap();
        // Arrival order, not timestamp order: sorting is the assembler's job.
        let mut stmt = conn.prepare(
            r#"
            SELECT session_id, timestamp, doc_id, event_type, tag_name,
                   text_content, event_source, offset_x, offset_y,
                   interaction_context
            FROM user_events
            WHERE user_id = ?1 AND session_id = ?2
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, session_id], Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
