//! Render snapshots
//!
//! A `FrameView` is everything a presentation layer needs for one frame,
//! copied out of the controller so drawing never holds on to game state.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::controller::{Phase, PhaseController};
use crate::sim::{LossReason, Rect};

/// Screen placement of the 3x3 board
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardLayout {
    pub origin: Vec2,
    pub tile_size: f32,
}

impl BoardLayout {
    /// Centred horizontally, pushed down below the HUD
    pub fn centered(play_width: f32, play_height: f32) -> Self {
        let board = TILE_SIZE * GRID_SIZE as f32;
        Self {
            origin: Vec2::new(
                (play_width - board) / 2.0,
                (play_height - board) / 2.0 + GRID_OFFSET_Y_SHIFT,
            ),
            tile_size: TILE_SIZE,
        }
    }

    pub fn cell_rect(&self, index: usize) -> Rect {
        let (row, col) = crate::cell_to_row_col(index);
        Rect::new(
            self.origin.x + col as f32 * self.tile_size,
            self.origin.y + row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Cell under a pointer position
    pub fn cell_at(&self, point: Vec2) -> Option<usize> {
        let local = (point - self.origin) / self.tile_size;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (col, row) = (local.x as usize, local.y as usize);
        (col < GRID_SIZE && row < GRID_SIZE).then(|| crate::row_col_to_cell(row, col))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub rect: Rect,
    pub sprite: String,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuzzleView {
    pub cells: [u8; CELL_COUNT],
    pub blank_index: usize,
    pub moves: u32,
    /// Cells that would move if clicked
    pub movable: [bool; CELL_COUNT],
    pub correct_tiles: usize,
    pub progress_percent: u32,
    pub solved: bool,
    /// Moves are accepted (player advanced past the victory screen)
    pub started: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: Phase,
    pub catcher: Rect,
    pub items: Vec<ItemView>,
    pub score: u64,
    pub items_caught: u32,
    pub items_missed: u32,
    pub total_to_catch: u32,
    pub remaining_time: f32,
    /// "Catching: Chips"
    pub current_type: Option<String>,
    pub lost: Option<LossReason>,
    pub puzzle: Option<PuzzleView>,
    pub layout: BoardLayout,
    pub reward_half_a: Option<String>,
    pub full_reward: Option<String>,
}

impl FrameView {
    pub fn capture(ctl: &PhaseController) -> Self {
        let session = ctl.session();
        let catch = &session.catch_phase;

        let items = catch
            .items
            .iter()
            .map(|item| ItemView {
                rect: item.rect,
                sprite: catch.catalog[item.type_index].sprite.clone(),
                is_final: item.is_final,
            })
            .collect();

        let puzzle = session.puzzle.as_ref().map(|board| {
            let mut movable = [false; CELL_COUNT];
            for (i, m) in movable.iter_mut().enumerate() {
                *m = session.puzzle_started && board.is_movable(i);
            }
            PuzzleView {
                cells: *board.cells(),
                blank_index: board.blank_index(),
                moves: board.move_count(),
                movable,
                correct_tiles: board.correct_tiles(),
                progress_percent: board.progress_percent(),
                solved: board.is_solved(),
                started: session.puzzle_started,
            }
        });

        Self {
            phase: ctl.phase(),
            catcher: catch.catcher.rect,
            items,
            score: catch.score,
            items_caught: catch.items_caught,
            items_missed: catch.items_missed,
            total_to_catch: catch.total_to_catch,
            remaining_time: catch.remaining_time(),
            current_type: catch
                .current_type()
                .filter(|_| ctl.phase() == Phase::Catch && !catch.is_over())
                .map(|spec| format!("Catching: {}", spec.display_name())),
            lost: if ctl.is_lost() { catch.loss } else { None },
            puzzle,
            layout: BoardLayout::centered(catch.play_width, catch.play_height),
            reward_half_a: session.reward_half_a().map(str::to_string),
            full_reward: session.full_reward().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use crate::settings::GameConfig;
    use crate::sim::TickInput;

    #[test]
    fn test_layout_hit_testing() {
        let layout = BoardLayout::centered(SCREEN_WIDTH, SCREEN_HEIGHT);
        assert_eq!(layout.origin, Vec2::new(275.0, 175.0));
        assert_eq!(layout.cell_at(Vec2::new(276.0, 176.0)), Some(0));
        assert_eq!(layout.cell_at(Vec2::new(275.0 + 450.0 - 1.0, 175.0 + 450.0 - 1.0)), Some(8));
        assert_eq!(layout.cell_at(Vec2::new(275.0 + 160.0, 175.0 + 10.0)), Some(1));
        assert_eq!(layout.cell_at(Vec2::new(274.0, 200.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(300.0, 175.0 + 450.0)), None);
        assert!(layout.cell_rect(4).contains_point(Vec2::new(500.0, 400.0)));
    }

    #[test]
    fn test_non_finite_pointer_misses_board() {
        let layout = BoardLayout::centered(SCREEN_WIDTH, SCREEN_HEIGHT);
        assert_eq!(layout.cell_at(Vec2::new(f32::NAN, 200.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(300.0, f32::NAN)), None);
        assert_eq!(layout.cell_at(Vec2::new(f32::INFINITY, 200.0)), None);
    }

    #[test]
    fn test_catch_frame() {
        let mut ctl = PhaseController::new(SessionId::from("v"), GameConfig::default(), Some(4));
        for _ in 0..(INITIAL_SPAWN_DELAY + 1) {
            ctl.tick(&TickInput::default(), SIM_DT);
        }
        let frame = FrameView::capture(&ctl);
        assert_eq!(frame.phase, Phase::Catch);
        assert_eq!(frame.items.len(), 1);
        assert_eq!(frame.items[0].sprite, "chocolates.jpg");
        assert_eq!(frame.current_type.as_deref(), Some("Catching: Chocolates"));
        assert!(frame.puzzle.is_none());
        assert!(frame.reward_half_a.is_none());
        assert!(frame.lost.is_none());
    }

    #[test]
    fn test_lost_frame() {
        let mut ctl = PhaseController::new(SessionId::from("v"), GameConfig::default(), Some(4));
        ctl.report_miss(false).unwrap();
        let frame = FrameView::capture(&ctl);
        assert_eq!(frame.lost, Some(LossReason::Missed { final_item: false }));
        assert!(frame.current_type.is_none());
    }
}
