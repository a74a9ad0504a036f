//! Solvable shuffle
//!
//! Scrambles by walking the blank from the solved board with random legal
//! moves, so every result is reachable (and therefore solvable) by
//! construction. A walk that lands back on the solved picture keeps walking.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::board::PuzzleBoard;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleGenerator {
    /// Random moves in the initial walk
    moves: u32,
    /// Extra moves per retry when the walk ends solved (at least 1)
    retry_batch: u32,
}

impl Default for ShuffleGenerator {
    fn default() -> Self {
        Self {
            moves: SHUFFLE_MOVES,
            retry_batch: RESHUFFLE_BATCH,
        }
    }
}

impl ShuffleGenerator {
    pub fn new(moves: u32, retry_batch: u32) -> Self {
        Self {
            moves,
            // A zero batch would never leave the solved picture
            retry_batch: retry_batch.max(1),
        }
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn retry_batch(&self) -> u32 {
        self.retry_batch
    }

    /// Produce a scrambled, unsolved board with a zero move counter
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> PuzzleBoard {
        let mut board = PuzzleBoard::identity();
        random_walk(&mut board, self.moves, rng);

        let mut retries = 0u32;
        while board.is_solved_arrangement() {
            random_walk(&mut board, self.retry_batch.max(1), rng);
            retries += 1;
        }
        if retries > 0 {
            log::debug!("Shuffle landed solved, reshuffled {} time(s)", retries);
        }

        board.reset_move_count();
        board
    }
}

fn random_walk<R: Rng + ?Sized>(board: &mut PuzzleBoard, steps: u32, rng: &mut R) {
    for _ in 0..steps {
        let moves = board.valid_moves();
        if let Some(&target) = moves.choose(rng) {
            board.scramble_move(target);
        }
    }
}
