//! Streaming collapse of redundant low-signal events
//!
//! Scroll and keydown streams are dense and carry little information per
//! individual sample, while clicks and navigation events each represent a
//! discrete user decision. The collapser removes consecutive low-signal
//! repeats in a single left-to-right pass and preserves everything else,
//! including back-to-back clicks and repeated unknown types.
//!
//! The pass never reorders events; a run of equal-type low-signal events
//! keeps its first occurrence.

use crate::types::{Event, EventKind};

/// Collapse a chronologically ordered event sequence.
///
/// An event is suppressed iff its kind equals the last emitted kind AND
/// the kind is low-signal. O(n) time, O(1) state beyond the output.
/// Empty input yields empty output. Idempotent: collapsing twice equals
/// collapsing once.
pub fn collapse(events: Vec<Event>) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    let mut last_emitted: Option<EventKind> = None;

    for event in events {
        let suppress = last_emitted == Some(event.kind) && event.kind.is_low_signal();
        if !suppress {
            last_emitted = Some(event.kind);
            out.push(event);
        }
    }

    out
}
