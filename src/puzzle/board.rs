//! 3x3 sliding-tile board
//!
//! Cells hold labels 0..=7 for tiles and `BLANK` (8) for the empty cell.
//! The identity ordering is the solved picture.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::{cell_to_row_col, row_col_to_cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleStatus {
    Scrambled,
    /// Terminal; no further moves are accepted
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(usize),
    #[error("cell {target} is not next to the blank at {blank}")]
    NotAdjacent { target: usize, blank: usize },
    #[error("puzzle is already solved")]
    AlreadySolved,
}

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub move_count: u32,
    pub solved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleBoard {
    cells: [u8; CELL_COUNT],
    blank_index: usize,
    move_count: u32,
    status: PuzzleStatus,
}

impl Default for PuzzleBoard {
    fn default() -> Self {
        Self::identity()
    }
}

/// Cells orthogonally adjacent to `blank` (2 to 4 of them)
pub fn valid_moves(blank: usize) -> Vec<usize> {
    let (row, col) = cell_to_row_col(blank);
    let mut moves = Vec::with_capacity(4);
    if row > 0 {
        moves.push(row_col_to_cell(row - 1, col));
    }
    if row + 1 < GRID_SIZE {
        moves.push(row_col_to_cell(row + 1, col));
    }
    if col > 0 {
        moves.push(row_col_to_cell(row, col - 1));
    }
    if col + 1 < GRID_SIZE {
        moves.push(row_col_to_cell(row, col + 1));
    }
    moves
}

impl PuzzleBoard {
    /// Tiles in order, blank in the last cell. Status starts `Scrambled`:
    /// solvedness is only ever detected after a player move.
    pub fn identity() -> Self {
        let mut cells = [0u8; CELL_COUNT];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = i as u8;
        }
        Self {
            cells,
            blank_index: CELL_COUNT - 1,
            move_count: 0,
            status: PuzzleStatus::Scrambled,
        }
    }

    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.cells
    }

    pub fn blank_index(&self) -> usize {
        self.blank_index
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn status(&self) -> PuzzleStatus {
        self.status
    }

    pub fn is_solved(&self) -> bool {
        self.status == PuzzleStatus::Solved
    }

    pub fn valid_moves(&self) -> Vec<usize> {
        valid_moves(self.blank_index)
    }

    /// Whether `index` may currently be slid into the blank
    pub fn is_movable(&self, index: usize) -> bool {
        !self.is_solved() && self.valid_moves().contains(&index)
    }

    /// The eight numbered tiles are in order (the blank then has to be last)
    pub fn is_solved_arrangement(&self) -> bool {
        self.cells[..CELL_COUNT - 1]
            .iter()
            .enumerate()
            .all(|(i, &label)| label as usize == i)
    }

    /// Numbered tiles already in their home cell
    pub fn correct_tiles(&self) -> usize {
        self.cells[..CELL_COUNT - 1]
            .iter()
            .enumerate()
            .filter(|&(i, &label)| label as usize == i)
            .count()
    }

    /// Progress as a whole percentage of numbered tiles in place
    pub fn progress_percent(&self) -> u32 {
        (self.correct_tiles() * 100 / (CELL_COUNT - 1)) as u32
    }

    /// Slide the tile at `target` into the blank.
    ///
    /// Rejected moves leave the board untouched.
    pub fn apply_move(&mut self, target: usize) -> Result<MoveOutcome, MoveError> {
        if self.is_solved() {
            return Err(MoveError::AlreadySolved);
        }
        if target >= CELL_COUNT {
            return Err(MoveError::OutOfBounds(target));
        }
        if !self.valid_moves().contains(&target) {
            return Err(MoveError::NotAdjacent {
                target,
                blank: self.blank_index,
            });
        }

        self.swap_blank(target);
        self.move_count += 1;

        // Check if solved only after a player move
        if self.is_solved_arrangement() {
            self.status = PuzzleStatus::Solved;
            log::info!("Puzzle solved in {} moves", self.move_count);
        }

        Ok(MoveOutcome {
            move_count: self.move_count,
            solved: self.is_solved(),
        })
    }

    /// Pure form of [`apply_move`](Self::apply_move): the board after the move
    pub fn after_move(&self, target: usize) -> Result<PuzzleBoard, MoveError> {
        let mut next = self.clone();
        next.apply_move(target)?;
        Ok(next)
    }

    /// Move used while scrambling: no counter, no solved check
    pub(crate) fn scramble_move(&mut self, target: usize) {
        debug_assert!(valid_moves(self.blank_index).contains(&target));
        self.swap_blank(target);
    }

    pub(crate) fn reset_move_count(&mut self) {
        self.move_count = 0;
    }

    fn swap_blank(&mut self, target: usize) {
        self.cells.swap(self.blank_index, target);
        self.blank_index = target;
    }

    /// Cells form a permutation of 0..=8 and `blank_index` addresses the blank
    pub fn is_consistent(&self) -> bool {
        let mut seen = [false; CELL_COUNT];
        for &label in &self.cells {
            let label = label as usize;
            if label >= CELL_COUNT || seen[label] {
                return false;
            }
            seen[label] = true;
        }
        self.cells[self.blank_index] == BLANK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_moves_corners_edges_center() {
        let mut corner = valid_moves(0);
        corner.sort();
        assert_eq!(corner, vec![1, 3]);
        let mut edge = valid_moves(1);
        edge.sort();
        assert_eq!(edge, vec![0, 2, 4]);
        let mut center = valid_moves(4);
        center.sort();
        assert_eq!(center, vec![1, 3, 5, 7]);
        let mut last = valid_moves(8);
        last.sort();
        assert_eq!(last, vec![5, 7]);
    }

    #[test]
    fn test_identity_not_marked_solved() {
        let board = PuzzleBoard::identity();
        assert!(board.is_solved_arrangement());
        assert_eq!(board.status(), PuzzleStatus::Scrambled);
        assert_eq!(board.progress_percent(), 100);
    }

    #[test]
    fn test_non_adjacent_rejected_without_mutation() {
        let mut board = PuzzleBoard::identity();
        board.apply_move(7).unwrap();
        let before = board.clone();
        assert_eq!(
            board.apply_move(0),
            Err(MoveError::NotAdjacent { target: 0, blank: 7 })
        );
        assert_eq!(board.apply_move(9), Err(MoveError::OutOfBounds(9)));
        // Blank's own cell is distance 0, not a move
        assert!(board.apply_move(7).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_back_solves_and_freezes() {
        let mut board = PuzzleBoard::identity();
        let first = board.apply_move(7).unwrap();
        assert!(!first.solved);
        assert_eq!(board.cells()[7], BLANK);
        assert_eq!(board.cells()[8], 7);

        let second = board.apply_move(8).unwrap();
        assert!(second.solved);
        assert_eq!(second.move_count, 2);
        assert!(board.is_solved());

        let frozen = board.clone();
        assert_eq!(board.apply_move(5), Err(MoveError::AlreadySolved));
        assert_eq!(board, frozen);
        assert!(!board.is_movable(5));
    }

    #[test]
    fn test_after_move_leaves_original() {
        let board = PuzzleBoard::identity();
        let next = board.after_move(5).unwrap();
        assert_eq!(board, PuzzleBoard::identity());
        assert_eq!(next.blank_index(), 5);
        assert_eq!(next.move_count(), 1);
        assert!(board.after_move(0).is_err());
    }

    proptest! {
        #[test]
        fn legal_moves_keep_permutation(choices in proptest::collection::vec(0usize..4, 0..300)) {
            let mut board = PuzzleBoard::identity();
            for choice in choices {
                if board.is_solved() {
                    break;
                }
                let moves = board.valid_moves();
                let target = moves[choice % moves.len()];
                board.apply_move(target).unwrap();
                prop_assert!(board.is_consistent());
                prop_assert_eq!(board.cells()[board.blank_index()], BLANK);
            }
        }

        #[test]
        fn arbitrary_targets_never_corrupt(targets in proptest::collection::vec(0usize..12, 0..200)) {
            let mut board = PuzzleBoard::identity();
            for target in targets {
                let before = board.clone();
                match board.apply_move(target) {
                    Ok(outcome) => prop_assert_eq!(outcome.move_count, before.move_count() + 1),
                    Err(_) => prop_assert_eq!(&board, &before),
                }
                prop_assert!(board.is_consistent());
            }
        }
    }
}
