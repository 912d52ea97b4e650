//! Raw record normalization
//!
//! Turns a loosely-typed [`RawEventRecord`] into a typed [`Event`].
//! Normalization is deliberately forgiving: the only hard failure is a
//! record with no session identifier. Everything else degrades softly —
//! unrecognized event types become [`EventKind::Unknown`] and malformed
//! viewport strings leave the viewport unset so spatial classification is
//! skipped for that event. A single bad record must never abort a
//! session import.

use crate::error::{Error, Result};
use crate::store::RawEventRecord;
use crate::types::{Event, EventKind, Offset, Viewport};

/// Normalize one raw record into a typed event.
pub fn normalize(raw: &RawEventRecord) -> Result<Event> {
    if raw.session_id.is_empty() {
        return Err(Error::Normalize {
            message: "record has no session_id".to_string(),
        });
    }

    let kind = EventKind::from_raw(&raw.event_type);

    // Malformed viewport is a soft failure: the event survives without
    // spatial context and the narrative falls back to a type-only form.
    let viewport = Viewport::parse(&raw.event_source).ok();

    Ok(Event {
        session_id: raw.session_id.clone(),
        timestamp: raw.timestamp,
        kind,
        raw_kind: raw.event_type.clone(),
        tag_name: raw.tag_name.clone(),
        text_content: raw.text_content.clone(),
        viewport,
        offset: Offset {
            x: raw.offset_x,
            y: raw.offset_y,
        },
        doc_id: raw.doc_id.clone(),
        interaction_context: raw.interaction_context.clone(),
    })
}
