//! Local render-loop adapter
//!
//! Owns one controller and feeds it from polled input. Frame time goes into
//! an accumulator drained in fixed `SIM_DT` steps; one-shot inputs (click,
//! advance, reset, quit) are consumed once and cleared.

use glam::Vec2;

use crate::consts::*;
use crate::controller::{Phase, PhaseController, PhaseError};
use crate::session::SessionId;
use crate::settings::GameConfig;
use crate::sim::TickInput;
use crate::view::{BoardLayout, FrameView};

/// Input polled from the presentation layer for one frame
#[derive(Debug, Clone, Default)]
pub struct ControllerInput {
    /// Pointer x in play-area coordinates
    pub pointer_x: Option<f32>,
    /// Click position this frame (one-shot)
    pub click: Option<Vec2>,
    /// ENTER: leave the catch-phase victory screen (one-shot)
    pub advance: bool,
    /// R: start over (one-shot)
    pub reset: bool,
    /// ESC / window close (one-shot)
    pub quit: bool,
    /// Autopilot steers the catcher
    pub idle_mode: bool,
}

pub struct LocalGame {
    controller: PhaseController,
    layout: BoardLayout,
    accumulator: f32,
    input: ControllerInput,
}

impl LocalGame {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let layout = BoardLayout::centered(config.play_width, config.play_height);
        Self {
            controller: PhaseController::new(SessionId::from("local"), config, seed),
            layout,
            accumulator: 0.0,
            input: ControllerInput::default(),
        }
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Merge this frame's polled input; one-shots latch until processed
    pub fn set_input(&mut self, input: ControllerInput) {
        self.input.pointer_x = input.pointer_x.or(self.input.pointer_x);
        self.input.idle_mode = input.idle_mode;
        self.input.click = input.click.or(self.input.click);
        self.input.advance |= input.advance;
        self.input.reset |= input.reset;
        self.input.quit |= input.quit;
    }

    /// Advance by real frame time
    pub fn update(&mut self, dt: f32) -> Phase {
        self.handle_one_shots();

        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                pointer_x: self.input.pointer_x,
                idle_mode: self.input.idle_mode,
            };
            self.controller.tick(&input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.controller.phase()
    }

    /// Select a board cell directly (keyboard or headless play)
    pub fn select_cell(&mut self, index: usize) -> Result<(), PhaseError> {
        self.controller.apply_move(index).map(|_| ())
    }

    /// Leave the catch-phase victory screen
    pub fn start_puzzle(&mut self) -> Result<(), PhaseError> {
        self.controller.start_puzzle().map(|_| ())
    }

    pub fn quit(&mut self) {
        self.controller.quit();
    }

    pub fn frame(&self) -> FrameView {
        FrameView::capture(&self.controller)
    }

    fn handle_one_shots(&mut self) {
        let input = std::mem::take(&mut self.input);
        // Continuous inputs persist
        self.input.pointer_x = input.pointer_x;
        self.input.idle_mode = input.idle_mode;

        if input.quit {
            self.controller.quit();
            return;
        }
        if input.reset {
            match self.controller.reset() {
                Ok(()) => self.accumulator = 0.0,
                Err(e) => log::debug!("Reset ignored: {}", e),
            }
            return;
        }
        if input.advance && self.controller.phase() == Phase::Puzzle {
            if let Err(e) = self.controller.start_puzzle() {
                log::debug!("Advance ignored: {}", e);
            }
        }
        // Clicks only mean something on the board
        if let Some(point) = input.click {
            if let Some(cell) = self.layout.cell_at(point) {
                if let Err(e) = self.controller.apply_move(cell) {
                    log::debug!("Click on cell {} ignored: {}", cell, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> LocalGame {
        LocalGame::new(GameConfig::default(), Some(99))
    }

    #[test]
    fn test_long_frame_clamped() {
        let mut game = seeded();
        // A long frame is clamped to 0.1s, about six steps
        game.update(1.0);
        let ticks = game.controller().catch_state().time_ticks;
        assert!((5..=6).contains(&ticks));
        assert!(ticks <= u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_accumulator_carries_remainder() {
        let mut game = seeded();
        game.update(SIM_DT * 0.6);
        assert_eq!(game.controller().catch_state().time_ticks, 0);
        game.update(SIM_DT * 0.6);
        assert_eq!(game.controller().catch_state().time_ticks, 1);
    }

    #[test]
    fn test_one_shots_cleared() {
        let mut game = seeded();
        game.update(SIM_DT * 10.0);
        game.set_input(ControllerInput {
            reset: true,
            ..Default::default()
        });
        game.update(0.0);
        assert_eq!(game.controller().catch_state().time_ticks, 0);
        game.update(SIM_DT * 1.5);
        // Reset is not applied a second time
        assert_eq!(game.controller().catch_state().time_ticks, 1);
    }

    #[test]
    fn test_quit_abandons() {
        let mut game = seeded();
        game.set_input(ControllerInput {
            quit: true,
            ..Default::default()
        });
        assert_eq!(game.update(SIM_DT), Phase::Abandoned);
        assert_eq!(game.controller().catch_state().time_ticks, 0);
    }

    #[test]
    fn test_reset_after_quit_stays_abandoned() {
        let mut game = seeded();
        game.set_input(ControllerInput {
            quit: true,
            ..Default::default()
        });
        game.update(SIM_DT);
        game.set_input(ControllerInput {
            reset: true,
            ..Default::default()
        });
        assert_eq!(game.update(SIM_DT * 2.0), Phase::Abandoned);
        assert_eq!(game.controller().catch_state().time_ticks, 0);
    }

    #[test]
    fn test_click_before_puzzle_ignored() {
        let mut game = seeded();
        game.set_input(ControllerInput {
            click: Some(Vec2::new(500.0, 400.0)),
            ..Default::default()
        });
        assert_eq!(game.update(0.0), Phase::Catch);
        assert!(game.controller().board().is_none());
    }
}
