//! Deterministic catch-phase simulation
//!
//! All catch-phase gameplay lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Caller-supplied RNG only
//! - Stable iteration order (by item ID)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod item;
pub mod spawn;
pub mod state;
pub mod tick;

pub use catalog::{CatalogError, ItemTypeSpec, default_catalog, total_to_catch, validate_catalog};
pub use collision::{ItemOutcome, resolve_item};
pub use item::{FallingItem, Rect, draw_fall_speed};
pub use spawn::{SpawnScheduler, spawn_delay_for};
pub use state::{CatchPhaseState, CatchStatus, Catcher, LossReason};
pub use tick::{TickInput, advance, tick};
