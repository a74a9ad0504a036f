//! ACM Challenge - a two-half puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic catch phase (spawning, falling items, collisions)
//! - `puzzle`: 3x3 sliding-tile board and its solvable shuffle
//! - `session` / `controller`: One play-through and the phase state machine
//! - `store` / `mirror`: Session registry and the request/response adapter
//! - `driver` / `view`: Fixed-timestep local loop and render snapshots
//! - `settings`: Game configuration

pub mod controller;
pub mod driver;
pub mod mirror;
pub mod puzzle;
pub mod session;
pub mod settings;
pub mod sim;
pub mod store;
pub mod view;

pub use controller::{Phase, PhaseController, PhaseError};
pub use driver::{ControllerInput, LocalGame};
pub use mirror::{MirrorError, SessionService};
pub use session::{GameSession, IdGenerator, SessionId};
pub use settings::{Environment, GameConfig, SettingsError};
pub use store::{InMemorySessionStore, SessionStore};

/// Game configuration constants
pub mod consts {
    /// Presentation frame rate; one catch-phase tick per frame
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions
    pub const SCREEN_WIDTH: f32 = 1000.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;

    /// Catch phase clock (seconds)
    pub const TIME_LIMIT: f32 = 120.0;

    /// Catcher (basket) size and its gap from the bottom edge
    pub const CATCHER_WIDTH: f32 = 80.0;
    pub const CATCHER_HEIGHT: f32 = 60.0;
    pub const CATCHER_BOTTOM_MARGIN: f32 = 10.0;

    /// Falling items are square sprites
    pub const ITEM_SIZE: f32 = 50.0;

    /// Spawn pacing, in ticks
    pub const INITIAL_SPAWN_DELAY: u32 = 60;
    pub const MIN_SPAWN_DELAY: u32 = 20;
    pub const SPAWN_DELAY_STEP: u32 = 10;
    pub const TYPE_CHANGE_PAUSE: u32 = 40;

    /// Fall speeds (pixels per tick) as `base + uniform[0, spread)`
    pub const FINAL_SPEED_BASE: f32 = 2.0;
    pub const FINAL_SPEED_SPREAD: f32 = 1.0;
    pub const FAST_SPEED_BASE: f32 = 9.0;
    pub const FAST_SPEED_SPREAD: f32 = 2.0;
    pub const NORMAL_SPEED_BASE: f32 = 5.0;
    pub const NORMAL_SPEED_SPREAD: f32 = 1.0;
    /// Probability a non-final item is drawn from the fast band
    pub const FAST_ITEM_CHANCE: f64 = 0.3;

    /// Sliding puzzle geometry
    pub const GRID_SIZE: usize = 3;
    pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
    /// Label stored in the empty cell
    pub const BLANK: u8 = 8;
    pub const TILE_SIZE: f32 = 150.0;
    /// Board is pushed down to leave room for the HUD
    pub const GRID_OFFSET_Y_SHIFT: f32 = 50.0;

    /// Scramble lengths
    pub const SHUFFLE_MOVES: u32 = 2000;
    pub const RESHUFFLE_BATCH: u32 = 100;
}

/// Board cell index to `(row, col)`
#[inline]
pub fn cell_to_row_col(index: usize) -> (usize, usize) {
    (index / consts::GRID_SIZE, index % consts::GRID_SIZE)
}

/// `(row, col)` to board cell index
#[inline]
pub fn row_col_to_cell(row: usize, col: usize) -> usize {
    row * consts::GRID_SIZE + col
}
