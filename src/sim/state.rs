//! Catch phase state
//!
//! Everything the catch phase needs lives here so a run can be snapshotted
//! and replayed: catalogue, play area, counters, live items, spawn cursor.

use serde::{Deserialize, Serialize};

use super::catalog::{ItemTypeSpec, total_to_catch};
use super::item::{FallingItem, Rect};
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::settings::GameConfig;

/// Catch phase status. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchStatus {
    Playing,
    /// Every item caught
    Won,
    /// One miss or the clock ran out
    Lost,
}

/// Why a catch phase was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// An item fell past the bottom
    Missed { final_item: bool },
    /// Time limit exceeded
    TimeUp,
    /// Client reported the phase as lost without a specific miss
    Forfeit,
}

/// The player's catcher (basket)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catcher {
    pub rect: Rect,
}

impl Catcher {
    /// Centered horizontally, resting just above the bottom edge
    pub fn new(play_width: f32, play_height: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(
                (play_width - width) / 2.0,
                play_height - height - CATCHER_BOTTOM_MARGIN,
                width,
                height,
            ),
        }
    }

    /// Center on the pointer x, kept inside the play area
    pub fn follow(&mut self, pointer_x: f32, play_width: f32) {
        let max_x = (play_width - self.rect.size.x).max(0.0);
        self.rect.pos.x = (pointer_x - self.rect.size.x / 2.0).clamp(0.0, max_x);
    }
}

/// Complete catch phase state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchPhaseState {
    /// Spawn order and per-type counts
    pub catalog: Vec<ItemTypeSpec>,
    pub play_width: f32,
    pub play_height: f32,
    pub item_size: f32,
    /// Seconds allowed for the whole phase
    pub time_limit: f32,
    pub catcher: Catcher,
    pub score: u64,
    pub items_caught: u32,
    pub items_missed: u32,
    pub items_spawned: u32,
    /// Fixed at construction: sum of catalogue counts
    pub total_to_catch: u32,
    /// Seconds elapsed
    pub elapsed_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live items (sorted by id)
    pub items: Vec<FallingItem>,
    pub spawner: SpawnScheduler,
    pub status: CatchStatus,
    pub loss: Option<LossReason>,
    /// Next item ID
    next_id: u32,
}

impl CatchPhaseState {
    /// Fresh phase from a config. The catalogue is expected to be validated
    /// by the caller.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            catalog: config.catalog.clone(),
            play_width: config.play_width,
            play_height: config.play_height,
            item_size: config.item_size,
            time_limit: config.time_limit,
            catcher: Catcher::new(
                config.play_width,
                config.play_height,
                config.catcher_width,
                config.catcher_height,
            ),
            score: 0,
            items_caught: 0,
            items_missed: 0,
            items_spawned: 0,
            total_to_catch: total_to_catch(&config.catalog),
            elapsed_time: 0.0,
            time_ticks: 0,
            items: Vec::new(),
            spawner: SpawnScheduler::new(),
            status: CatchStatus::Playing,
            loss: None,
            next_id: 1,
        }
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.status != CatchStatus::Playing
    }

    /// Seconds left on the clock (never negative)
    pub fn remaining_time(&self) -> f32 {
        (self.time_limit - self.elapsed_time).max(0.0)
    }

    /// Catalogue entry currently being spawned, if any remain
    pub fn current_type(&self) -> Option<&ItemTypeSpec> {
        self.catalog.get(self.spawner.type_index)
    }

    /// The last miss was the final item
    pub fn missed_final_item(&self) -> bool {
        matches!(self.loss, Some(LossReason::Missed { final_item: true }))
    }

    /// Set the clock and apply the time limit. Returns true if this call
    /// ended the phase.
    pub fn set_elapsed(&mut self, elapsed: f32) -> bool {
        if self.is_over() {
            return false;
        }
        self.elapsed_time = elapsed;
        if self.elapsed_time > self.time_limit {
            self.lose(LossReason::TimeUp);
            return true;
        }
        false
    }

    /// Count a catch. Reaching `total_to_catch` wins the phase.
    pub fn register_catch(&mut self, points: u32) {
        if self.is_over() {
            return;
        }
        self.score += u64::from(points);
        self.items_caught += 1;
        if self.items_caught == self.total_to_catch {
            self.status = CatchStatus::Won;
            log::info!(
                "Catch phase cleared: {}/{} caught, score {}",
                self.items_caught,
                self.total_to_catch,
                self.score
            );
        }
    }

    /// Count a miss. Any single miss ends the phase.
    pub fn register_miss(&mut self, final_item: bool) {
        if self.is_over() {
            return;
        }
        self.items_missed += 1;
        self.lose(LossReason::Missed { final_item });
    }

    /// An item the client spawned itself; keeps `items_spawned` covering
    /// every reported catch and miss.
    pub fn note_reported_spawn(&mut self) {
        let reported = self.items_caught + self.items_missed + 1;
        self.items_spawned = self.items_spawned.max(reported).min(self.total_to_catch);
    }

    pub(crate) fn lose(&mut self, reason: LossReason) {
        self.status = CatchStatus::Lost;
        self.loss = Some(reason);
        log::info!(
            "Catch phase lost ({:?}): {}/{} caught, score {}",
            reason,
            self.items_caught,
            self.total_to_catch,
            self.score
        );
    }

    /// Ensure items are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.items.sort_by_key(|item| item.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = CatchPhaseState::new(&GameConfig::default());
        assert_eq!(state.total_to_catch, 38);
        assert_eq!(state.status, CatchStatus::Playing);
        assert_eq!(state.remaining_time(), TIME_LIMIT);
        assert_eq!(state.current_type().map(|t| t.name.as_str()), Some("chocolates"));
        assert_eq!(state.catcher.rect.top(), SCREEN_HEIGHT - CATCHER_HEIGHT - 10.0);
    }

    #[test]
    fn test_catcher_clamped() {
        let mut catcher = Catcher::new(SCREEN_WIDTH, SCREEN_HEIGHT, CATCHER_WIDTH, CATCHER_HEIGHT);
        catcher.follow(-50.0, SCREEN_WIDTH);
        assert_eq!(catcher.rect.left(), 0.0);
        catcher.follow(5000.0, SCREEN_WIDTH);
        assert_eq!(catcher.rect.right(), SCREEN_WIDTH);
        catcher.follow(500.0, SCREEN_WIDTH);
        assert_eq!(catcher.rect.center().x, 500.0);
    }

    #[test]
    fn test_single_miss_is_fatal() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        state.register_catch(2);
        state.register_miss(false);
        assert_eq!(state.status, CatchStatus::Lost);
        assert_eq!(state.items_missed, 1);
        // Terminal: further catches are ignored
        state.register_catch(2);
        assert_eq!(state.items_caught, 1);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_clock_expiry() {
        let mut state = CatchPhaseState::new(&GameConfig::default());
        assert!(!state.set_elapsed(TIME_LIMIT));
        assert_eq!(state.status, CatchStatus::Playing);
        assert!(state.set_elapsed(TIME_LIMIT + 0.01));
        assert_eq!(state.loss, Some(LossReason::TimeUp));
        assert_eq!(state.remaining_time(), 0.0);
    }
}
