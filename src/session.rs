//! One play-through
//!
//! A `GameSession` ties a catch phase to the puzzle it unlocks and to the
//! two reward halves. Session IDs are a process-local counter plus a random
//! suffix, so concurrent creation cannot collide.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::puzzle::PuzzleBoard;
use crate::settings::GameConfig;
use crate::sim::CatchPhaseState;

/// Disclosed on a perfect catch phase
pub const REWARD_HALF_A: &str = "AcM_is_";
/// Disclosed when the puzzle is solved
pub const REWARD_HALF_B: &str = "tHe_gOaT";

pub const SESSION_SUFFIX_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Collision-resistant session ID source: `<counter hex>-<random suffix>`
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> SessionId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(SESSION_SUFFIX_LEN)
            .map(char::from)
            .collect();
        SessionId(format!("{n:08x}-{suffix}"))
    }
}

fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Aggregate record of one play-through
#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: SessionId,
    pub catch_phase: CatchPhaseState,
    /// Present once the catch phase is won
    pub puzzle: Option<PuzzleBoard>,
    /// Player has moved past the catch-phase victory screen
    pub puzzle_started: bool,
    reward_half_a: Option<&'static str>,
    reward_half_b: Option<&'static str>,
    full_reward: Option<String>,
    /// Wall-clock creation time (unix ms)
    pub created_at: u64,
    started: Instant,
    /// Catch phase duration, set when it ends
    pub catch_duration: Option<f32>,
}

impl GameSession {
    pub fn new(id: SessionId, config: &GameConfig) -> Self {
        Self {
            id,
            catch_phase: CatchPhaseState::new(config),
            puzzle: None,
            puzzle_started: false,
            reward_half_a: None,
            reward_half_b: None,
            full_reward: None,
            created_at: unix_millis(SystemTime::now()),
            started: Instant::now(),
            catch_duration: None,
        }
    }

    /// Wall-clock seconds since creation
    pub fn wall_elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    pub fn reward_half_a(&self) -> Option<&'static str> {
        self.reward_half_a
    }

    pub fn reward_half_b(&self) -> Option<&'static str> {
        self.reward_half_b
    }

    /// Both halves joined; only present after both phases are complete
    pub fn full_reward(&self) -> Option<&str> {
        self.full_reward.as_deref()
    }

    pub(crate) fn unlock_puzzle(&mut self, board: PuzzleBoard) {
        self.reward_half_a = Some(REWARD_HALF_A);
        self.puzzle = Some(board);
    }

    pub(crate) fn complete(&mut self) {
        if let Some(half_a) = self.reward_half_a {
            self.reward_half_b = Some(REWARD_HALF_B);
            self.full_reward = Some(format!("{half_a}{REWARD_HALF_B}"));
        }
    }
}
