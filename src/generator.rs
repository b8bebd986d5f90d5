//! Generation of fully solved sudoku grids.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Cell, Digit, Grid};
use crate::consts::N_CELLS;

// one frame of the explicit backtracking stack, owning the shuffled
// candidate order for the cell at its depth
struct Frame {
    candidates: [u8; 9],
    next: usize,
}

impl Frame {
    fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut candidates = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        candidates.shuffle(rng);
        Frame { candidates, next: 0 }
    }

    // next untried candidate that is legal at `cell`, consuming rejected ones
    fn next_legal(&mut self, grid: &Grid, cell: Cell) -> Option<Digit> {
        while self.next < self.candidates.len() {
            let digit = Digit::new(self.candidates[self.next]);
            self.next += 1;
            if grid.sudoku_allows(cell, digit) {
                return Some(digit);
            }
        }
        None
    }
}

/// Generates a fully filled, valid sudoku solution.
///
/// Cells are filled in row-major order, trying digits in shuffled order and
/// backtracking on dead ends. Each call builds its own grid from the given
/// rng, so concurrent generations do not interfere and tests can pass a
/// seeded rng for reproducibility.
pub fn generate_solution<R: Rng>(rng: &mut R) -> Grid {
    loop {
        // a 9x9 board is always completable, the retry is defensive
        if let Some(grid) = fill_grid(rng) {
            return grid;
        }
    }
}

/// Generates a solution using the thread-local rng.
pub fn generate_solution_thread_rng() -> Grid {
    generate_solution(&mut rand::thread_rng())
}

fn fill_grid<R: Rng>(rng: &mut R) -> Option<Grid> {
    let mut grid = Grid::empty();
    let mut stack: Vec<Frame> = Vec::with_capacity(N_CELLS);
    stack.push(Frame::shuffled(rng));

    while let Some(depth) = stack.len().checked_sub(1) {
        let cell = Cell::new(depth as u8);
        // retract the frame's previous choice, if any, before the next try
        grid.set(cell, None);

        match stack[depth].next_legal(&grid, cell) {
            Some(digit) => {
                grid.set(cell, Some(digit));
                if stack.len() == N_CELLS {
                    return Some(grid);
                }
                stack.push(Frame::shuffled(rng));
            }
            None => {
                stack.pop();
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generates_valid_solutions() {
        let mut rng = StdRng::seed_from_u64(0xf111);
        for _ in 0..20 {
            let grid = generate_solution(&mut rng);
            assert!(
                grid.is_valid_solution(),
                "generated an invalid solution:\n{}",
                grid
            );
        }
    }

    #[test]
    fn same_seed_same_solution() {
        let one = generate_solution(&mut StdRng::seed_from_u64(99));
        let two = generate_solution(&mut StdRng::seed_from_u64(99));
        assert_eq!(one, two);
    }
}
