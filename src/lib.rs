#![warn(missing_docs)]
//! A killer sudoku library
//!
//! ## Overview
//!
//! This crate generates and validates killer sudoku levels: 9x9 grids
//! partitioned into contiguous cages whose pairwise distinct values must
//! reach a published sum, on top of the usual row, column and block rules.
//! It also answers the per-keystroke rule questions of an interactive
//! board. Everything is a pure computation over in-memory grids; rendering,
//! input handling and persistence live elsewhere.
//!
//! ## Example
//!
//! ```
//! use killer_sudoku::level::generate_level;
//! use killer_sudoku::play::{get_possible_values, is_board_complete};
//! use killer_sudoku::validate::validate_level;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // generation is deterministic for a given rng
//! let mut rng = StdRng::seed_from_u64(7);
//! let level = generate_level(1, &mut rng).expect("level 1 generates");
//! assert!(validate_level(&level).valid);
//!
//! // the solved grid completes its own level
//! assert!(is_board_complete(&level.solution, &level.cages));
//!
//! // during play, a cell offers only the digits the rules allow
//! let cell = level.cages[0].cells[0];
//! let possible = get_possible_values(Some(&level.initial_values), cell, &level.cages);
//! assert!(!possible.is_empty());
//! ```

pub mod board;
pub mod cage;
pub mod color;
pub mod consts;
pub mod difficulty;
mod errors;
pub mod generator;
pub mod level;
pub mod play;
pub mod prefill;
pub mod validate;

pub use crate::board::{Cell, Digit, Grid};
pub use crate::cage::{Cage, RawCage, UncoloredCage};
pub use crate::color::CageColor;
pub use crate::difficulty::DifficultyConfig;
pub use crate::level::{GameLevel, RawGameLevel};

/// Contains the errors of the typed load boundary
pub mod load_errors {
    pub use crate::errors::{FromValuesError, LevelConversionError, ParseColorError};
}
