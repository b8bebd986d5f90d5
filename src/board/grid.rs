use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::board::{Cell, Digit};
use crate::consts::{BLOCK_SIZE, N_CELLS, SIZE};
use crate::errors::FromValuesError;

const ALL_DIGITS: u16 = 0b1_1111_1111;

/// A 9x9 grid of cell values, `0` marking an empty cell.
///
/// The same representation serves three roles: the solution of a level, its
/// initial values, and the grid a player fills in during play. On the wire a
/// grid is the nested `int[9][9]` of the stored level format.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid(pub(crate) [u8; N_CELLS]);

impl Grid {
    /// Creates a grid with every cell empty.
    pub fn empty() -> Self {
        Grid([0; N_CELLS])
    }

    /// Creates a grid from nested row arrays, rejecting entries above 9.
    pub fn from_values(values: [[u8; SIZE]; SIZE]) -> Result<Self, FromValuesError> {
        let mut grid = Grid::empty();
        for (row, row_values) in values.iter().enumerate() {
            for (col, &value) in row_values.iter().enumerate() {
                if value > 9 {
                    return Err(FromValuesError(()));
                }
                grid.0[row * SIZE + col] = value;
            }
        }
        Ok(grid)
    }

    /// Returns the digit at `cell`, `None` if the cell is empty.
    pub fn value(&self, cell: Cell) -> Option<Digit> {
        Digit::new_checked(self.0[cell.as_index()])
    }

    /// Places a digit at `cell`, or clears the cell with `None`.
    pub fn set(&mut self, cell: Cell, value: Option<Digit>) {
        self.0[cell.as_index()] = value.map_or(0, Digit::get);
    }

    #[inline]
    pub(crate) fn get_raw(&self, cell: Cell) -> u8 {
        self.0[cell.as_index()]
    }

    #[inline]
    pub(crate) fn set_raw(&mut self, cell: Cell, value: u8) {
        self.0[cell.as_index()] = value;
    }

    /// Whether every cell holds a digit.
    pub fn is_full(&self) -> bool {
        self.0.iter().all(|&value| value != 0)
    }

    /// The grid as nested row arrays, the shape of the stored level format.
    pub fn to_values(&self) -> [[u8; SIZE]; SIZE] {
        let mut values = [[0; SIZE]; SIZE];
        for cell in Cell::all() {
            values[cell.row() as usize][cell.col() as usize] = self.get_raw(cell);
        }
        values
    }

    /// Whether the grid is a complete, valid sudoku solution: every row,
    /// column and block a permutation of `1..=9`.
    pub fn is_valid_solution(&self) -> bool {
        let mut rows = [0u16; SIZE];
        let mut cols = [0u16; SIZE];
        let mut blocks = [0u16; SIZE];

        for cell in Cell::all() {
            let digit = match self.value(cell) {
                Some(digit) => digit,
                None => return false,
            };
            rows[cell.row() as usize] |= digit.mask();
            cols[cell.col() as usize] |= digit.mask();
            blocks[cell.block() as usize] |= digit.mask();
        }

        // 9 cells per house: all digits present means no digit repeated
        rows.iter()
            .chain(cols.iter())
            .chain(blocks.iter())
            .all(|&house| house == ALL_DIGITS)
    }

    // whether `digit` may be placed at `cell` under the sudoku rules,
    // ignoring whatever the cell itself currently holds
    pub(crate) fn sudoku_allows(&self, cell: Cell, digit: Digit) -> bool {
        let value = digit.get();
        let (row, col) = (cell.row(), cell.col());

        for i in 0..SIZE as u8 {
            let in_row = Cell::from_coords(row, i);
            if in_row != cell && self.get_raw(in_row) == value {
                return false;
            }
            let in_col = Cell::from_coords(i, col);
            if in_col != cell && self.get_raw(in_col) == value {
                return false;
            }
        }

        let block_row = row / BLOCK_SIZE as u8 * BLOCK_SIZE as u8;
        let block_col = col / BLOCK_SIZE as u8 * BLOCK_SIZE as u8;
        for r in block_row..block_row + BLOCK_SIZE as u8 {
            for c in block_col..block_col + BLOCK_SIZE as u8 {
                let in_block = Cell::from_coords(r, c);
                if in_block != cell && self.get_raw(in_block) == value {
                    return false;
                }
            }
        }

        true
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in Cell::all() {
            match (cell.row(), cell.col()) {
                (_, 3) | (_, 6) => write!(f, " ")?,    // separate blocks in columns
                (3, 0) | (6, 0) => write!(f, "\n\n")?, // separate blocks in rows
                (_, 0) if cell.as_index() != 0 => writeln!(f)?,
                _ => {}
            }
            match self.get_raw(cell) {
                0 => write!(f, "_")?,
                value => write!(f, "{}", value)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_values().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = <[[u8; SIZE]; SIZE]>::deserialize(deserializer)?;
        Grid::from_values(values).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SOLVED_VALUES as SOLVED;

    #[test]
    fn from_values_rejects_large_entries() {
        let mut values = [[0; SIZE]; SIZE];
        values[4][4] = 10;
        assert!(Grid::from_values(values).is_err());
    }

    #[test]
    fn recognizes_valid_solution() {
        let grid = Grid::from_values(SOLVED).unwrap();
        assert!(grid.is_valid_solution());
    }

    #[test]
    fn rejects_solution_with_swapped_cells() {
        let mut values = SOLVED;
        values[0][0] = SOLVED[0][1];
        let grid = Grid::from_values(values).unwrap();
        assert!(!grid.is_valid_solution());
    }

    #[test]
    fn rejects_incomplete_solution() {
        let mut values = SOLVED;
        values[8][8] = 0;
        let grid = Grid::from_values(values).unwrap();
        assert!(!grid.is_valid_solution());
    }

    #[test]
    fn values_round_trip() {
        let grid = Grid::from_values(SOLVED).unwrap();
        assert_eq!(grid.to_values(), SOLVED);
    }
}
