//! Core domain types for retrace
//!
//! These types form the canonical data model for reconstructed browsing
//! sessions: a raw record fetched from the event store is normalized into
//! an [`Event`], a sequence of events belongs to one session, and replay
//! output is rendered from [`ReplayFrame`] values.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One continuous recorded user-interaction timeline |
//! | **Event** | A single recorded interaction (click, scroll, key press, ...) |
//! | **High-signal event** | A discrete user decision, always preserved (`Open`, `Click`, `BeforeUnload`) |
//! | **Low-signal event** | Dense, low-information samples, collapsed when repeated (`Scroll`, `Keydown`) |
//! | **Quadrant** | Coarse on-screen location ("top left", ...) of an interaction |
//! | **Narrative** | Human-readable lines derived from the collapsed timeline |

use crate::error::Error;
use serde::{Deserialize, Serialize};

// ============================================
// Event kinds
// ============================================

/// Closed taxonomy of recorded interaction kinds.
///
/// Raw type strings that don't match any known kind map to [`EventKind::Unknown`]
/// rather than failing normalization; unknown events are carried through the
/// pipeline inert and surfaced via diagnostics, never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Page/document opened
    Open,
    Click,
    Scroll,
    Keydown,
    /// Page about to unload
    BeforeUnload,
    /// Unrecognized raw type string (preserved for diagnostics)
    Unknown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Open => "open",
            EventKind::Click => "click",
            EventKind::Scroll => "scroll",
            EventKind::Keydown => "keydown",
            EventKind::BeforeUnload => "beforeunload",
            EventKind::Unknown => "unknown",
        }
    }

    /// Map a raw wire string to a kind. Unrecognized strings become
    /// [`EventKind::Unknown`]; this never fails.
    pub fn from_raw(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => EventKind::Open,
            "click" => EventKind::Click,
            "scroll" => EventKind::Scroll,
            "keydown" => EventKind::Keydown,
            "beforeunload" => EventKind::BeforeUnload,
            _ => EventKind::Unknown,
        }
    }

    /// Discrete user decisions, preserved even back-to-back.
    pub fn is_high_signal(&self) -> bool {
        matches!(
            self,
            EventKind::Open | EventKind::Click | EventKind::BeforeUnload
        )
    }

    /// Dense sample streams, collapsed when consecutive.
    pub fn is_low_signal(&self) -> bool {
        matches!(self, EventKind::Scroll | EventKind::Keydown)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Viewport & offset
// ============================================

/// Viewport dimensions at event time.
///
/// Constructed only through [`Viewport::parse`], so both dimensions are
/// guaranteed strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Parse a raw `"WIDTHxHEIGHT"` string (e.g. `"1920x1080"`).
    ///
    /// Fails with [`Error::InvalidViewport`] if the string doesn't match the
    /// shape or either dimension is non-positive.
    pub fn parse(raw: &str) -> crate::error::Result<Self> {
        let (w, h) = raw
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidViewport(raw.to_string()))?;

        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| Error::InvalidViewport(raw.to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| Error::InvalidViewport(raw.to_string()))?;

        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport(raw.to_string()));
        }

        Ok(Viewport { width, height })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pointer/element offset within the viewport at event time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

// ============================================
// Events
// ============================================

/// A single normalized interaction event.
///
/// Immutable value; one per recorded interaction. Within a session, events
/// are ordered by non-decreasing `timestamp` (the assembler sorts when the
/// store returns them out of order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Session this event belongs to
    pub session_id: String,
    /// Ordering key: epoch milliseconds
    pub timestamp: i64,
    /// Normalized kind
    pub kind: EventKind,
    /// Original wire type string (meaningful when `kind` is `Unknown`)
    pub raw_kind: String,
    /// Target element tag (empty if absent)
    pub tag_name: String,
    /// Visible text of the target element (empty if absent)
    pub text_content: String,
    /// Viewport at event time; `None` when the raw record carried a
    /// malformed viewport string, in which case spatial classification
    /// is skipped for this event
    pub viewport: Option<Viewport>,
    /// Pointer offset within the viewport
    pub offset: Offset,
    /// Page/document the event occurred on
    pub doc_id: String,
    /// Free-text label of the broader task the session belongs to
    pub interaction_context: String,
}

impl Event {
    /// Display label for the event kind: the canonical name for known kinds,
    /// the original wire string for unknown ones.
    pub fn kind_label(&self) -> &str {
        match self.kind {
            EventKind::Unknown if !self.raw_kind.is_empty() => self.raw_kind.as_str(),
            kind => kind.as_str(),
        }
    }
}

// ============================================
// Session listing
// ============================================

/// Listing row for a user browsing their own sessions. Derived, not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session ID
    pub session_id: String,
    /// Task label the session belongs to
    pub task_name: String,
}

// ============================================
// Replay output
// ============================================

/// The slice of an [`Event`] that replay rendering consumes.
///
/// Field names are the output contract for replay consumers and must not
/// be renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub event_type: String,
    pub tag_name: String,
    pub text_content: String,
    pub offset_x: i64,
    pub offset_y: i64,
    pub doc_id: String,
}

impl From<&Event> for ReplayFrame {
    fn from(event: &Event) -> Self {
        ReplayFrame {
            event_type: event.kind_label().to_string(),
            tag_name: event.tag_name.clone(),
            text_content: event.text_content.clone(),
            offset_x: event.offset.x,
            offset_y: event.offset.y,
            doc_id: event.doc_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_raw_known() {
        assert_eq!(EventKind::from_raw("click"), EventKind::Click);
        assert_eq!(EventKind::from_raw("SCROLL"), EventKind::Scroll);
        assert_eq!(EventKind::from_raw(" beforeunload "), EventKind::BeforeUnload);
    }

    #[test]
    fn test_kind_from_raw_unknown() {
        assert_eq!(EventKind::from_raw("dragstart"), EventKind::Unknown);
        assert_eq!(EventKind::from_raw(""), EventKind::Unknown);
    }

    #[test]
    fn test_signal_sets() {
        assert!(EventKind::Click.is_high_signal());
        assert!(EventKind::Open.is_high_signal());
        assert!(EventKind::BeforeUnload.is_high_signal());
        assert!(EventKind::Scroll.is_low_signal());
        assert!(EventKind::Keydown.is_low_signal());
        assert!(!EventKind::Unknown.is_high_signal());
        assert!(!EventKind::Unknown.is_low_signal());
    }

    #[test]
    fn test_viewport_parse() {
        let vp = Viewport::parse("1920x1080").unwrap();
        assert_eq!(vp.width, 1920);
        assert_eq!(vp.height, 1080);
    }

    #[test]
    fn test_viewport_parse_rejects_malformed() {
        assert!(Viewport::parse("notaviewport").is_err());
        assert!(Viewport::parse("1920").is_err());
        assert!(Viewport::parse("x1080").is_err());
        assert!(Viewport::parse("1920x").is_err());
        assert!(Viewport::parse("-5x100").is_err());
    }

    #[test]
    fn test_viewport_parse_rejects_non_positive() {
        assert!(Viewport::parse("0x1080").is_err());
        assert!(Viewport::parse("1920x0").is_err());
    }
}
