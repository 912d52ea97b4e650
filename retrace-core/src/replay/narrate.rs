//! Narrative synthesis
//!
//! Maps a collapsed event plus its spatial context to a human-readable
//! description line. Only clicks are narrated: scroll/keydown are
//! replay-only, open/beforeunload are session lifecycle markers, and
//! unknown types are carried for diagnostics. The function is pure and
//! total — every event maps to exactly one outcome, never a panic.

use crate::replay::spatial::Quadrant;
use crate::types::{Event, EventKind};

/// Describe one event, or `None` if the event carries no narrative line.
pub fn describe(event: &Event, quadrant: Option<Quadrant>) -> Option<String> {
    match event.kind {
        EventKind::Click if !event.text_content.is_empty() => match quadrant {
            Some(quadrant) => Some(format!(
                "Click on {} at the {} of the page",
                event.text_content, quadrant
            )),
            None => Some(format!("Click on {}", event.text_content)),
        },
        // Clicks without visible text still appear in the replay stream;
        // a narrative line for them would carry no information.
        EventKind::Click => None,
        EventKind::Scroll | EventKind::Keydown => None,
        EventKind::Open | EventKind::BeforeUnload => None,
        EventKind::Unknown => None,
    }
}
