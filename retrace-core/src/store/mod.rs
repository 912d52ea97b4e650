//! Event store clients
//!
//! The event store is an external, append-only log of raw interaction
//! records keyed by user and session. This module owns only the boundary:
//! fetching raw records and session listings. It has no business logic;
//! normalization and everything downstream live in [`crate::replay`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │   Event store    │ ──► │   EventStore     │ ──► │ SessionAssembler│
//! │ (SQLite / HTTP)  │     │   trait impls    │     │ (crate::replay) │
//! └──────────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! Backends implement the [`EventStore`] trait:
//! - [`SqliteEventStore`] — local append-only SQLite file
//! - [`HttpEventStore`] — remote store over HTTP with a bounded timeout
//!
//! ## Error semantics
//!
//! A user or session with no events is an empty result, not an error.
//! [`Error::StoreUnavailable`](crate::Error::StoreUnavailable) is reserved
//! for the store being unreachable; no retries happen at this layer.

mod http;
mod sqlite;

pub use http::HttpEventStore;
pub use sqlite::SqliteEventStore;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::types::SessionSummary;
use serde::{Deserialize, Serialize};

/// A raw interaction record as stored by the event store.
///
/// Field names are the wire contract with the store and are preserved
/// exactly on ingestion; internal types rename and restructure them.
/// Every field is best-effort: absent fields deserialize to defaults and
/// validation happens during normalization, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEventRecord {
    /// Session identifier
    pub session_id: String,
    /// Ordering key: epoch milliseconds
    pub timestamp: i64,
    /// Page/document the event occurred on
    pub doc_id: String,
    /// Raw event type string ("click", "scroll", ...)
    pub event_type: String,
    /// Target DOM element tag
    pub tag_name: String,
    /// Visible text of the target element
    pub text_content: String,
    /// Raw viewport string, `"WIDTHxHEIGHT"`-shaped when well-formed
    pub event_source: String,
    /// Pointer offset within the viewport
    pub offset_x: i64,
    pub offset_y: i64,
    /// Free-text label of the broader task
    pub interaction_context: String,
}

/// Trait implemented by all event store backends.
///
/// Both operations are cheap lookups by identifier; neither runs the
/// replay pipeline. Implementations must return `Ok(vec![])` for a user
/// or session with no recorded events.
pub trait EventStore: Send + Sync {
    /// List a user's recorded sessions as `{session_id, task_name}` rows,
    /// ordered by first activity.
    fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>>;

    /// Fetch all raw records for one session of one user. Arrival order is
    /// not guaranteed; the assembler sorts by `timestamp`.
    fn fetch_events(&self, user_id: &str, session_id: &str) -> Result<Vec<RawEventRecord>>;
}

/// Open the event store selected by the configuration.
pub fn open_store(config: &Config) -> Result<Box<dyn EventStore>> {
    config.store.validate()?;

    match config.store.backend {
        StoreBackend::Sqlite => {
            let store = SqliteEventStore::open(&config.store_path())?;
            Ok(Box::new(store))
        }
        StoreBackend::Http => Ok(Box::new(HttpEventStore::new(&config.store)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_deserializes_with_missing_fields() {
        let record: RawEventRecord =
            serde_json::from_str(r#"{"session_id": "s1", "event_type": "click"}"#).unwrap();
        assert_eq!(record.session_id, "s1");
        assert_eq!(record.event_type, "click");
        assert_eq!(record.tag_name, "");
        assert_eq!(record.text_content, "");
        assert_eq!(record.event_source, "");
        assert_eq!(record.timestamp, 0);
        assert_eq!(record.offset_x, 0);
        assert_eq!(record.offset_y, 0);
    }

    #[test]
    fn test_open_store_defaults_to_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store: crate::config::StoreConfig {
                sqlite_path: Some(dir.path().join("events.db")),
                ..Default::default()
            },
            ..Default::default()
        };
        let store = open_store(&config).unwrap();
        assert!(store.list_sessions("nobody").unwrap().is_empty());
    }
}
