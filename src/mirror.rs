//! Request/response adapter
//!
//! Each call is independent: look the session up, apply one operation to its
//! controller under that session's lock, return a serializable snapshot.
//! There is no tick loop here; the catch clock is the session's wall clock.

use serde::Serialize;
use thiserror::Error;

use crate::consts::CELL_COUNT;
use crate::controller::{PhaseController, PhaseError};
use crate::session::SessionId;
use crate::settings::GameConfig;
use crate::store::{SessionStore, lock_session};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    #[error(transparent)]
    Rejected(#[from] PhaseError),
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSnapshot {
    pub session_id: SessionId,
    pub config: GameConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchSnapshot {
    pub score: u64,
    pub items_caught: u32,
    pub items_missed: u32,
    pub total_to_catch: u32,
    pub game_over: bool,
    pub won: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndPhaseSnapshot {
    pub final_score: u64,
    pub items_caught: u32,
    pub items_missed: u32,
    /// Seconds from creation to the end of the catch phase
    pub duration: f32,
    pub won: bool,
    pub missed_final_item: bool,
    /// Empty unless the catch phase was won
    pub reward_half_a: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleSnapshot {
    pub cells: [u8; CELL_COUNT],
    pub blank_index: usize,
    pub moves: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveSnapshot {
    pub cells: [u8; CELL_COUNT],
    pub blank_index: usize,
    pub moves: u32,
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_half_b: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_reward: Option<String>,
}

fn catch_snapshot(ctl: &PhaseController) -> CatchSnapshot {
    let catch = ctl.catch_state();
    CatchSnapshot {
        score: catch.score,
        items_caught: catch.items_caught,
        items_missed: catch.items_missed,
        total_to_catch: catch.total_to_catch,
        game_over: catch.is_over(),
        won: ctl.session().reward_half_a().is_some(),
    }
}

/// The mirror's endpoints, generic over the registry
pub struct SessionService<S: SessionStore> {
    store: S,
    config: GameConfig,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: S, config: GameConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run `op` on a session, catch clock synced first
    fn with_session<T>(
        &self,
        id: &SessionId,
        op: impl FnOnce(&mut PhaseController) -> Result<T, PhaseError>,
    ) -> Result<T, MirrorError> {
        let Some(shared) = self.store.get(id) else {
            log::warn!("Request for unknown session {}", id);
            return Err(MirrorError::UnknownSession(id.clone()));
        };
        let mut ctl = lock_session(&shared);
        let elapsed = ctl.session().wall_elapsed();
        ctl.sync_clock(elapsed);
        op(&mut *ctl).map_err(|e| {
            log::warn!("Session {}: rejected ({})", id, e);
            MirrorError::Rejected(e)
        })
    }

    pub fn create_session(&self) -> CreateSnapshot {
        let session_id = self.store.create(&self.config, None);
        log::info!("Created session {}", session_id);
        CreateSnapshot {
            session_id,
            config: self.config.clone(),
        }
    }

    pub fn report_catch(&self, id: &SessionId, points: u32) -> Result<CatchSnapshot, MirrorError> {
        self.with_session(id, |ctl| {
            ctl.report_catch(points)?;
            Ok(catch_snapshot(ctl))
        })
    }

    pub fn report_miss(&self, id: &SessionId, final_item: bool) -> Result<CatchSnapshot, MirrorError> {
        self.with_session(id, |ctl| {
            ctl.report_miss(final_item)?;
            Ok(catch_snapshot(ctl))
        })
    }

    pub fn end_phase(
        &self,
        id: &SessionId,
        won: bool,
        missed_final_item: bool,
    ) -> Result<EndPhaseSnapshot, MirrorError> {
        self.with_session(id, |ctl| {
            ctl.end_catch_phase(won, missed_final_item)?;
            let session = ctl.session();
            let catch = &session.catch_phase;
            Ok(EndPhaseSnapshot {
                final_score: catch.score,
                items_caught: catch.items_caught,
                items_missed: catch.items_missed,
                duration: session.catch_duration.unwrap_or(catch.elapsed_time),
                won,
                missed_final_item: catch.missed_final_item(),
                reward_half_a: session.reward_half_a().unwrap_or_default().to_string(),
            })
        })
    }

    pub fn start_puzzle(&self, id: &SessionId) -> Result<PuzzleSnapshot, MirrorError> {
        self.with_session(id, |ctl| {
            let board = ctl.start_puzzle()?;
            Ok(PuzzleSnapshot {
                cells: *board.cells(),
                blank_index: board.blank_index(),
                moves: board.move_count(),
            })
        })
    }

    pub fn move_tile(&self, id: &SessionId, position: usize) -> Result<MoveSnapshot, MirrorError> {
        self.with_session(id, |ctl| {
            let outcome = ctl.apply_move(position)?;
            let board = ctl.board().ok_or(PhaseError::PuzzleLocked)?;
            let session = ctl.session();
            Ok(MoveSnapshot {
                cells: *board.cells(),
                blank_index: board.blank_index(),
                moves: outcome.move_count,
                solved: outcome.solved,
                reward_half_b: session.reward_half_b().map(str::to_string),
                full_reward: session.full_reward().map(str::to_string),
            })
        })
    }

    /// Drop a finished session; the store otherwise keeps it forever
    pub fn remove(&self, id: &SessionId) -> bool {
        self.store.remove(id)
    }
}
