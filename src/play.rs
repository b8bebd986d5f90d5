//! Rule checks queried on every keystroke while a level is played.
//!
//! All functions are read-only over the play grid and a level's cages. The
//! validity checks take the play grid as an `Option`: the UI asks questions
//! before a level's state has finished loading, and an unloaded grid must
//! answer permissively instead of failing. Work per call is bounded: one
//! row/column/block scan plus one pass over a single cage.

use crate::board::{Cell, Digit, Grid};
use crate::cage::Cage;

/// Whether placing `value` at `cell` respects row, column and block
/// uniqueness. Clearing a cell (`value` of `None`) is always valid.
pub fn is_cell_valid_for_sudoku_rules(grid: Option<&Grid>, cell: Cell, value: Option<Digit>) -> bool {
    let grid = match grid {
        Some(grid) => grid,
        // play state not loaded yet: the move is unconstrained
        None => return true,
    };
    match value {
        Some(digit) => grid.sudoku_allows(cell, digit),
        None => true,
    }
}

/// Whether placing `value` at `cell` passes the sudoku rules and the rules
/// of the containing cage: no duplicate digit within the cage, and a cage
/// filled by this placement must hit its target sum.
pub fn is_cell_valid(grid: Option<&Grid>, cell: Cell, value: Option<Digit>, cages: &[Cage]) -> bool {
    let grid = match grid {
        Some(grid) => grid,
        None => return true,
    };
    let digit = match value {
        Some(digit) => digit,
        None => return true,
    };

    if !grid.sudoku_allows(cell, digit) {
        return false;
    }

    let cage = match cage_for_cell(cages, cell) {
        Some(cage) => cage,
        // a cell outside every cage only answers to the sudoku rules
        None => return true,
    };

    // hypothetical placement on a scratch copy
    let mut scratch = grid.clone();
    scratch.set_raw(cell, digit.get());

    if has_duplicates_in_cage(&scratch, cage) {
        return false;
    }
    if is_cage_filled(&scratch, cage) && current_cage_sum(&scratch, cage) != cage.sum {
        return false;
    }
    true
}

/// The cage containing `cell`, if any.
pub fn cage_for_cell<'a>(cages: &'a [Cage], cell: Cell) -> Option<&'a Cage> {
    cages.iter().find(|cage| cage.cells.contains(&cell))
}

/// Whether both cells belong to the same cage.
pub fn cells_share_cage(cages: &[Cage], a: Cell, b: Cell) -> bool {
    match cage_for_cell(cages, a) {
        Some(cage) => cage.cells.contains(&b),
        None => false,
    }
}

/// Whether two filled cells of the cage hold the same digit.
pub fn has_duplicates_in_cage(grid: &Grid, cage: &Cage) -> bool {
    let mut seen = 0u16;
    for &cell in &cage.cells {
        if let Some(digit) = grid.value(cell) {
            if seen & digit.mask() != 0 {
                return true;
            }
            seen |= digit.mask();
        }
    }
    false
}

/// Whether every cell of the cage holds a digit.
pub fn is_cage_filled(grid: &Grid, cage: &Cage) -> bool {
    cage.cells.iter().all(|&cell| grid.get_raw(cell) != 0)
}

/// The cage's current sum; empty cells count as zero.
pub fn current_cage_sum(grid: &Grid, cage: &Cage) -> u32 {
    cage.cells.iter().map(|&cell| u32::from(grid.get_raw(cell))).sum()
}

/// Whether the cage is completely and correctly filled: every cell holds a
/// digit, the digits are pairwise distinct and they sum to the target.
pub fn is_cage_complete(grid: &Grid, cage: &Cage) -> bool {
    is_cage_filled(grid, cage)
        && current_cage_sum(grid, cage) == cage.sum
        && !has_duplicates_in_cage(grid, cage)
}

/// Whether the whole board is filled and correct: no empty cell, the sudoku
/// rules hold everywhere and every cage is complete.
pub fn is_board_complete(grid: &Grid, cages: &[Cage]) -> bool {
    if !grid.is_full() {
        return false;
    }

    for cell in Cell::all() {
        let digit = match grid.value(cell) {
            Some(digit) => digit,
            None => return false,
        };
        if !grid.sudoku_allows(cell, digit) {
            return false;
        }
    }

    cages.iter().all(|cage| is_cage_complete(grid, cage))
}

/// The digits that [`is_cell_valid`] would accept at `cell`.
pub fn get_possible_values(grid: Option<&Grid>, cell: Cell, cages: &[Cage]) -> Vec<Digit> {
    Digit::all()
        .filter(|&digit| is_cell_valid(grid, cell, Some(digit), cages))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SOLVED_VALUES;
    use crate::color::CageColor;

    fn cage(id: &str, cells: Vec<Cell>, sum: u32) -> Cage {
        Cage {
            id: id.to_string(),
            cells,
            sum,
            color: CageColor::Blue,
        }
    }

    fn grid_with_row0(values: [u8; 9]) -> Grid {
        let mut rows = [[0u8; 9]; 9];
        rows[0] = values;
        Grid::from_values(rows).unwrap()
    }

    #[test]
    fn row_duplicate_is_rejected() {
        let grid = grid_with_row0([5, 0, 0, 0, 0, 0, 0, 0, 0]);
        let cell = Cell::from_coords(0, 1);
        assert!(!is_cell_valid_for_sudoku_rules(
            Some(&grid),
            cell,
            Digit::new_checked(5)
        ));
        assert!(is_cell_valid_for_sudoku_rules(
            Some(&grid),
            cell,
            Digit::new_checked(6)
        ));
    }

    #[test]
    fn column_and_block_duplicates_are_rejected() {
        let mut grid = Grid::empty();
        grid.set(Cell::from_coords(4, 4), Digit::new_checked(7));

        // same column, far away
        assert!(!is_cell_valid_for_sudoku_rules(
            Some(&grid),
            Cell::from_coords(8, 4),
            Digit::new_checked(7)
        ));
        // same block, different row and column
        assert!(!is_cell_valid_for_sudoku_rules(
            Some(&grid),
            Cell::from_coords(3, 3),
            Digit::new_checked(7)
        ));
    }

    #[test]
    fn unloaded_grid_answers_permissively() {
        let cages = [cage("a", vec![Cell::from_coords(0, 0)], 5)];
        assert!(is_cell_valid_for_sudoku_rules(
            None,
            Cell::from_coords(0, 0),
            Digit::new_checked(5)
        ));
        assert!(is_cell_valid(
            None,
            Cell::from_coords(0, 0),
            Digit::new_checked(5),
            &cages
        ));
        assert_eq!(
            get_possible_values(None, Cell::from_coords(0, 0), &cages).len(),
            9
        );
    }

    #[test]
    fn cage_duplicate_is_rejected() {
        // an L-shaped cage across the block border: (0,2) and (1,3) share
        // neither row, column nor block, so only the cage rule can reject
        // the duplicate
        let cells = vec![
            Cell::from_coords(0, 2),
            Cell::from_coords(1, 2),
            Cell::from_coords(1, 3),
        ];
        let cages = [cage("a", cells, 9)];

        let mut grid = Grid::empty();
        grid.set(Cell::from_coords(0, 2), Digit::new_checked(4));

        assert!(!is_cell_valid(
            Some(&grid),
            Cell::from_coords(1, 3),
            Digit::new_checked(4),
            &cages
        ));
        assert!(is_cell_valid(
            Some(&grid),
            Cell::from_coords(1, 3),
            Digit::new_checked(5),
            &cages
        ));
    }

    #[test]
    fn completing_a_cage_with_the_wrong_sum_is_rejected() {
        let cells = vec![
            Cell::from_coords(0, 2),
            Cell::from_coords(1, 2),
            Cell::from_coords(1, 3),
        ];
        let cages = [cage("a", cells, 9)];

        let mut grid = Grid::empty();
        grid.set(Cell::from_coords(0, 2), Digit::new_checked(4));
        grid.set(Cell::from_coords(1, 2), Digit::new_checked(2));

        // 4 + 2 + 5 overshoots the target of 9, 4 + 2 + 3 hits it
        assert!(!is_cell_valid(
            Some(&grid),
            Cell::from_coords(1, 3),
            Digit::new_checked(5),
            &cages
        ));
        assert!(is_cell_valid(
            Some(&grid),
            Cell::from_coords(1, 3),
            Digit::new_checked(3),
            &cages
        ));
    }

    #[test]
    fn cage_with_matching_sum_but_duplicate_digits_is_not_complete() {
        // 3 + 3 reaches the target of 6 but repeats a digit
        let cells = vec![Cell::from_coords(0, 3), Cell::from_coords(1, 4)];
        let the_cage = cage("a", cells, 6);

        let mut grid = Grid::empty();
        grid.set(Cell::from_coords(0, 3), Digit::new_checked(3));
        grid.set(Cell::from_coords(1, 4), Digit::new_checked(3));

        assert_eq!(current_cage_sum(&grid, &the_cage), 6);
        assert!(!is_cage_complete(&grid, &the_cage));
    }

    #[test]
    fn possible_values_shrink_with_constraints() {
        let grid = grid_with_row0([5, 0, 0, 0, 0, 0, 0, 0, 0]);
        let possible = get_possible_values(Some(&grid), Cell::from_coords(0, 1), &[]);
        let digits: Vec<u8> = possible.iter().map(|digit| digit.get()).collect();
        assert_eq!(digits, vec![1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn solved_grid_with_matching_cages_is_complete() {
        let grid = Grid::from_values(SOLVED_VALUES).unwrap();
        let cages: Vec<Cage> = Cell::all()
            .map(|cell| cage(&format!("c{}", cell.as_index()), vec![cell], u32::from(grid.get_raw(cell))))
            .collect();
        assert!(is_board_complete(&grid, &cages));

        let mut broken = grid.clone();
        broken.set(Cell::from_coords(0, 0), None);
        assert!(!is_board_complete(&broken, &cages));
    }
}
