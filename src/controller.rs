//! Top-level phase state machine
//!
//! Catch -> Puzzle -> Complete, with Abandoned reachable from anywhere.
//! Both the local render loop and the request/response mirror drive a game
//! only through this type, so the rules cannot drift between them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::{MoveError, MoveOutcome, PuzzleBoard};
use crate::session::{GameSession, SessionId};
use crate::settings::GameConfig;
use crate::sim::{self, CatchPhaseState, CatchStatus, LossReason, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Catching items; also the resting state after a loss
    Catch,
    /// Catch phase won, board unlocked
    Puzzle,
    /// Both halves disclosed
    Complete,
    /// Player quit
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("catch phase is already over")]
    CatchPhaseOver,
    #[error("catch phase has not been cleared")]
    CatchNotCleared,
    #[error("puzzle is locked until the catch phase is won")]
    PuzzleLocked,
    #[error("puzzle has not been started")]
    PuzzleNotStarted,
    #[error("session is complete")]
    SessionComplete,
    #[error("session was abandoned")]
    Abandoned,
    #[error("reported result (won: {claimed_won}) disagrees with catch status {status:?}")]
    ClaimMismatch {
        claimed_won: bool,
        status: CatchStatus,
    },
    #[error(transparent)]
    Move(#[from] MoveError),
}

pub struct PhaseController {
    config: GameConfig,
    session: GameSession,
    phase: Phase,
    rng: Pcg32,
}

impl PhaseController {
    /// New session. Seed precedence: argument, then config, then random.
    pub fn new(id: SessionId, config: GameConfig, seed: Option<u64>) -> Self {
        let seed = seed
            .or(config.seed)
            .unwrap_or_else(|| rand::rng().random());
        log::info!("Session {} starting with seed {}", id, seed);
        let session = GameSession::new(id, &config);
        Self {
            config,
            session,
            phase: Phase::Catch,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catch_state(&self) -> &CatchPhaseState {
        &self.session.catch_phase
    }

    pub fn board(&self) -> Option<&PuzzleBoard> {
        self.session.puzzle.as_ref()
    }

    /// Catch phase ended without a perfect run; only a reset leaves this
    pub fn is_lost(&self) -> bool {
        self.phase == Phase::Catch && self.session.catch_phase.status == CatchStatus::Lost
    }

    fn ensure_active(&self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Abandoned => Err(PhaseError::Abandoned),
            Phase::Complete => Err(PhaseError::SessionComplete),
            _ => Ok(()),
        }
    }

    fn ensure_catch_playing(&self) -> Result<(), PhaseError> {
        self.ensure_active()?;
        if self.phase != Phase::Catch || self.session.catch_phase.is_over() {
            return Err(PhaseError::CatchPhaseOver);
        }
        Ok(())
    }

    /// Advance the catch phase one simulated tick. Ignored outside a live
    /// catch phase.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Phase {
        if self.ensure_catch_playing().is_ok() {
            sim::tick(&mut self.session.catch_phase, input, dt, &mut self.rng);
            self.after_catch_update();
        }
        self.phase
    }

    /// Apply the wall clock to the catch phase (request/response shape)
    pub fn sync_clock(&mut self, elapsed: f32) {
        if self.ensure_catch_playing().is_ok() && self.session.catch_phase.set_elapsed(elapsed) {
            self.after_catch_update();
        }
    }

    /// Client-reported catch
    pub fn report_catch(&mut self, points: u32) -> Result<&CatchPhaseState, PhaseError> {
        self.ensure_catch_playing()?;
        let catch = &mut self.session.catch_phase;
        catch.note_reported_spawn();
        catch.register_catch(points);
        self.after_catch_update();
        Ok(&self.session.catch_phase)
    }

    /// Client-reported miss; always ends the catch phase
    pub fn report_miss(&mut self, final_item: bool) -> Result<&CatchPhaseState, PhaseError> {
        self.ensure_catch_playing()?;
        let catch = &mut self.session.catch_phase;
        catch.note_reported_spawn();
        catch.register_miss(final_item);
        self.after_catch_update();
        Ok(&self.session.catch_phase)
    }

    /// Client declares the catch phase over. A win is only accepted when the
    /// counters already say so; a loss is accepted while still playing.
    pub fn end_catch_phase(&mut self, won: bool, missed_final_item: bool) -> Result<(), PhaseError> {
        self.ensure_active()?;
        let status = self.session.catch_phase.status;
        match (self.phase, status, won) {
            (Phase::Puzzle, CatchStatus::Won, true) => Ok(()),
            (Phase::Catch, CatchStatus::Lost, false) => Ok(()),
            (Phase::Catch, CatchStatus::Playing, false) => {
                let reason = if missed_final_item {
                    LossReason::Missed { final_item: true }
                } else {
                    LossReason::Forfeit
                };
                self.session.catch_phase.lose(reason);
                self.after_catch_update();
                Ok(())
            }
            (Phase::Catch, CatchStatus::Playing, true) => Err(PhaseError::CatchNotCleared),
            _ => Err(PhaseError::ClaimMismatch {
                claimed_won: won,
                status,
            }),
        }
    }

    /// Leave the catch-phase victory screen and reveal the board.
    /// Calling it again returns the same board.
    pub fn start_puzzle(&mut self) -> Result<&PuzzleBoard, PhaseError> {
        self.ensure_active()?;
        if self.phase != Phase::Puzzle {
            return Err(PhaseError::PuzzleLocked);
        }
        if !self.session.puzzle_started {
            self.session.puzzle_started = true;
            log::info!("Session {}: puzzle started", self.session.id);
        }
        self.session.puzzle.as_ref().ok_or(PhaseError::PuzzleLocked)
    }

    /// Player move on the board
    pub fn apply_move(&mut self, target: usize) -> Result<MoveOutcome, PhaseError> {
        self.ensure_active()?;
        if self.phase != Phase::Puzzle {
            return Err(PhaseError::PuzzleLocked);
        }
        if !self.session.puzzle_started {
            return Err(PhaseError::PuzzleNotStarted);
        }
        let board = self.session.puzzle.as_mut().ok_or(PhaseError::PuzzleLocked)?;
        let outcome = board.apply_move(target)?;
        if outcome.solved {
            self.session.complete();
            self.phase = Phase::Complete;
            log::info!("Session {} complete", self.session.id);
        }
        Ok(outcome)
    }

    /// Throw the session away and start a new catch phase (same ID).
    /// An abandoned session stays abandoned.
    pub fn reset(&mut self) -> Result<(), PhaseError> {
        if self.phase == Phase::Abandoned {
            return Err(PhaseError::Abandoned);
        }
        let id = self.session.id.clone();
        log::info!("Session {} reset", id);
        self.session = GameSession::new(id, &self.config);
        self.phase = Phase::Catch;
        Ok(())
    }

    pub fn quit(&mut self) {
        if self.phase != Phase::Abandoned {
            log::info!("Session {} abandoned", self.session.id);
            self.phase = Phase::Abandoned;
        }
    }

    fn after_catch_update(&mut self) {
        if self.phase != Phase::Catch {
            return;
        }
        let catch = &self.session.catch_phase;
        match catch.status {
            CatchStatus::Playing => {}
            CatchStatus::Won => {
                self.session.catch_duration = Some(catch.elapsed_time);
                let board = self.config.shuffle().generate(&mut self.rng);
                self.session.unlock_puzzle(board);
                self.phase = Phase::Puzzle;
                log::info!("Session {}: first half unlocked", self.session.id);
            }
            CatchStatus::Lost => {
                if self.session.catch_duration.is_none() {
                    self.session.catch_duration = Some(catch.elapsed_time);
                }
            }
        }
    }
}
