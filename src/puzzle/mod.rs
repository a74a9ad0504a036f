//! Sliding-tile puzzle (second half)
//!
//! A 3x3 board of eight tiles and one blank. Boards come from
//! [`ShuffleGenerator`] and only ever change through validated moves.

pub mod board;
pub mod shuffle;

pub use board::{MoveError, MoveOutcome, PuzzleBoard, PuzzleStatus, valid_moves};
pub use shuffle::ShuffleGenerator;
