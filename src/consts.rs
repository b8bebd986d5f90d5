//! Board and generation constants shared across the crate.
//!
//! These centralize the 9×9 Sudoku geometry and the bounded-retry budgets so
//! the rest of the code never hard-codes them inline.

/// Side length of the grid (a standard Sudoku is 9×9).
pub const SIZE: usize = 9;

/// Side length of a block (the 3×3 sub-squares).
pub const BLOCK_SIZE: usize = 3;

/// Total number of cells in the grid (`SIZE * SIZE`).
pub const N_CELLS: usize = SIZE * SIZE;

/// Number of published levels (`1..=TOTAL_LEVELS`).
pub const TOTAL_LEVELS: u32 = 100;

/// Maximum attempts to (re)generate a level before falling back.
pub const MAX_LEVEL_ATTEMPTS: usize = 10;

/// Maximum attempts the prefill selector makes to reach its target count.
pub const MAX_PREFILL_ATTEMPTS: usize = 100;
