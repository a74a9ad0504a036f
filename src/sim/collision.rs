//! Catcher vs. item resolution
//!
//! Each tick every live item resolves to exactly one outcome. The catch test
//! runs before the off-screen test, so an item that overlaps the catcher on
//! the same tick it crosses the bottom boundary still counts as caught.

use serde::{Deserialize, Serialize};

use super::item::{FallingItem, Rect};

/// Result of resolving one item for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    /// Overlaps the catcher
    Caught,
    /// Fell past the bottom boundary without touching the catcher
    Missed,
    /// Still falling
    InFlight,
}

/// Resolve an item against the catcher rect and the bottom boundary
pub fn resolve_item(catcher: &Rect, item: &FallingItem, play_height: f32) -> ItemOutcome {
    if catcher.intersects(&item.rect) {
        ItemOutcome::Caught
    } else if item.is_past_bottom(play_height) {
        ItemOutcome::Missed
    } else {
        ItemOutcome::InFlight
    }
}
