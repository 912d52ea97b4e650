//! Spatial classification of pointer offsets
//!
//! Maps a pointer offset to a coarse on-screen quadrant by comparing it
//! against the half-viewport dimensions. Exact midpoints fall into the
//! top/left halves; this tie-break is part of the contract and tested.

use crate::types::{Offset, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    Top,
    Bottom,
}

impl Vertical {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vertical::Top => "top",
            Vertical::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizontal::Left => "left",
            Horizontal::Right => "right",
        }
    }
}

/// Coarse on-screen location of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadrant {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.vertical.as_str(), self.horizontal.as_str())
    }
}

/// Classify an offset within a viewport.
///
/// Total for any [`Viewport`]: construction guarantees strictly positive
/// dimensions, so an event without a valid viewport can never reach this
/// function — its classification is skipped upstream instead.
pub fn classify(viewport: Viewport, offset: Offset) -> Quadrant {
    let vertical = if offset.y <= i64::from(viewport.height) / 2 {
        Vertical::Top
    } else {
        Vertical::Bottom
    };

    let horizontal = if offset.x <= i64::from(viewport.width) / 2 {
        Horizontal::Left
    } else {
        Horizontal::Right
    };

    Quadrant {
        vertical,
        horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: u32, height: u32) -> Viewport {
        Viewport { width, height }
    }

    #[test]
    fn test_quadrant_corners() {
        let vp = viewport(100, 100);
        assert_eq!(classify(vp, Offset { x: 0, y: 0 }).to_string(), "top left");
        assert_eq!(
            classify(vp, Offset { x: 99, y: 0 }).to_string(),
            "top right"
        );
        assert_eq!(
            classify(vp, Offset { x: 0, y: 99 }).to_string(),
            "bottom left"
        );
        assert_eq!(
            classify(vp, Offset { x: 99, y: 99 }).to_string(),
            "bottom right"
        );
    }

    #[test]
    fn test_midpoint_ties_resolve_to_top_left() {
        let vp = viewport(100, 100);
        assert_eq!(
            classify(vp, Offset { x: 50, y: 50 }).to_string(),
            "top left"
        );
        assert_eq!(
            classify(vp, Offset { x: 51, y: 51 }).to_string(),
            "bottom right"
        );
    }

    #[test]
    fn test_odd_dimensions_round_half_down() {
        // Half of 101 is 50; 50 is still the inclusive top/left boundary.
        let vp = viewport(101, 101);
        assert_eq!(
            classify(vp, Offset { x: 50, y: 50 }).to_string(),
            "top left"
        );
        assert_eq!(
            classify(vp, Offset { x: 51, y: 51 }).to_string(),
            "bottom right"
        );
    }
}
