//! # retrace-core
//!
//! Core library for retrace - session event replay reconstruction.
//!
//! This library provides:
//! - Domain types for interaction events and sessions
//! - Event store clients (local SQLite, remote HTTP)
//! - The replay pipeline: normalize, collapse, classify, narrate
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Raw interaction records recorded during a browsing session are fetched
//! from an append-only event store, normalized into typed events,
//! collapsed to remove redundant low-signal repeats, and rendered into a
//! replay-ready event stream plus a human-readable narrative.
//!
//! ## Example
//!
//! ```rust,no_run
//! use retrace_core::{Config, SessionAssembler};
//!
//! let config = Config::load().expect("failed to load config");
//! let assembler = SessionAssembler::from_config(&config).expect("failed to open store");
//!
//! for session in assembler.list_sessions("alice").expect("listing failed") {
//!     let timeline = assembler
//!         .build_timeline("alice", &session.session_id)
//!         .expect("reconstruction failed");
//!     for line in &timeline.narrative {
//!         println!("{line}");
//!     }
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use replay::{ReplayDiagnostics, SessionAssembler, Timeline};
pub use store::{EventStore, HttpEventStore, RawEventRecord, SqliteEventStore};
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod logging;
pub mod replay;
pub mod store;
pub mod types;
