//! Session replay reconstruction pipeline
//!
//! This module orchestrates the full transformation from raw stored
//! records to a replayable timeline and its narrative:
//!
//! ```text
//! ┌─────────────┐    ┌───────────┐    ┌──────────┐    ┌────────────────────┐
//! │ EventStore  │ ─► │ normalize │ ─► │ collapse │ ─► │ classify + narrate │
//! └─────────────┘    └───────────┘    └──────────┘    └────────────────────┘
//!                                                               │
//!                                                               ▼
//!                                                         ┌──────────┐
//!                                                         │ Timeline │
//!                                                         └──────────┘
//! ```
//!
//! The pipeline is strictly sequential per session (the collapser depends
//! on ordering) and stateless across invocations; concurrent calls for
//! different sessions are independent.
//!
//! ## Error handling
//!
//! Only a store-level failure aborts a build. A record that fails
//! normalization hard (no session id) is skipped and counted; soft
//! degradations (unknown type, malformed viewport) keep the event and
//! are surfaced through [`ReplayDiagnostics`].

mod collapse;
mod narrate;
mod normalize;
pub mod spatial;

pub use collapse::collapse;
pub use narrate::describe;
pub use normalize::normalize;

use crate::config::Config;
use crate::error::Result;
use crate::store::{open_store, EventStore};
use crate::types::{Event, EventKind, ReplayFrame, SessionSummary};
use spatial::classify;

/// Counters describing what the pipeline did to one session's records.
///
/// These replace console diagnostics: callers decide whether the skip
/// rates warrant surfacing to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayDiagnostics {
    /// Raw records returned by the store
    pub records_fetched: usize,
    /// Records dropped by hard normalization failures
    pub records_skipped: usize,
    /// Normalized events with an unrecognized type (kept, not narrated)
    pub unknown_events: usize,
    /// Collapsed events whose spatial classification was skipped because
    /// the raw viewport string was malformed or absent
    pub missing_viewports: usize,
    /// Events removed by the collapser
    pub collapsed_away: usize,
}

/// A reconstructed session, ready for replay rendering and summary display.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Session this timeline was built for
    pub session_id: String,
    /// Full collapsed event list, in timestamp order
    pub events: Vec<Event>,
    /// Replay output frames, one per collapsed event
    pub frames: Vec<ReplayFrame>,
    /// Narrative lines for narrated events, in timeline order
    pub narrative: Vec<String>,
    /// What happened along the way
    pub diagnostics: ReplayDiagnostics,
}

/// Builds timelines and session listings on top of an [`EventStore`].
pub struct SessionAssembler {
    store: Box<dyn EventStore>,
}

impl SessionAssembler {
    /// Create an assembler over an already-open store.
    pub fn new(store: Box<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Create an assembler over the store selected by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(open_store(config)?))
    }

    /// List a user's recorded sessions. Cheap; does not run the pipeline.
    pub fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        self.store.list_sessions(user_id)
    }

    /// Reconstruct one session end to end.
    ///
    /// Fetch → normalize (skip-and-count hard failures) → sort by
    /// timestamp → collapse → classify + narrate. A session with some
    /// malformed records still yields a partial, correct timeline.
    pub fn build_timeline(&self, user_id: &str, session_id: &str) -> Result<Timeline> {
        let records = self.store.fetch_events(user_id, session_id)?;

        let mut diagnostics = ReplayDiagnostics {
            records_fetched: records.len(),
            ..Default::default()
        };

        let mut events: Vec<Event> = Vec::with_capacity(records.len());
        for record in &records {
            match normalize(record) {
                Ok(event) => {
                    // Fetch is scoped by session, so a differing id means a
                    // corrupt record, not another session's event.
                    if event.session_id != session_id {
                        diagnostics.records_skipped += 1;
                        tracing::warn!(
                            expected = session_id,
                            found = %event.session_id,
                            "Record session_id mismatch, skipping"
                        );
                        continue;
                    }
                    if event.kind == EventKind::Unknown {
                        diagnostics.unknown_events += 1;
                        tracing::debug!(raw_kind = %event.raw_kind, "Unknown event type");
                    }
                    events.push(event);
                }
                Err(e) => {
                    diagnostics.records_skipped += 1;
                    tracing::warn!(session_id, error = %e, "Skipping malformed record");
                }
            }
        }

        // The store does not guarantee arrival order. Stable sort keeps
        // arrival order for records with equal timestamps.
        events.sort_by_key(|e| e.timestamp);

        let before_collapse = events.len();
        let events = collapse(events);
        diagnostics.collapsed_away = before_collapse - events.len();

        let mut narrative = Vec::new();
        for event in &events {
            let quadrant = event.viewport.map(|vp| classify(vp, event.offset));
            if quadrant.is_none() {
                diagnostics.missing_viewports += 1;
            }
            if let Some(line) = describe(event, quadrant) {
                narrative.push(line);
            }
        }

        let frames = events.iter().map(ReplayFrame::from).collect();

        tracing::info!(
            session_id,
            fetched = diagnostics.records_fetched,
            skipped = diagnostics.records_skipped,
            collapsed_away = diagnostics.collapsed_away,
            narrative_lines = narrative.len(),
            "Timeline built"
        );

        Ok(Timeline {
            session_id: session_id.to_string(),
            events,
            frames,
            narrative,
            diagnostics,
        })
    }
}
