use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::consts::{BLOCK_SIZE, N_CELLS, SIZE};

/// A cell of the 9x9 board, stored as a flat index in `0..81`,
/// counted left to right, top to bottom.
///
/// On the wire a cell is the `{ "row": r, "col": c }` pair of the stored
/// level format.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Hash)]
pub struct Cell(u8);

impl Cell {
    /// Constructs a new `Cell` from its flat index.
    ///
    /// # Panic
    /// Panics, if the index is not below 81.
    pub fn new(index: u8) -> Self {
        Self::new_checked(index).expect("cell index out of range")
    }

    /// Constructs a new `Cell` from its flat index, `None` for indices past the board.
    pub fn new_checked(index: u8) -> Option<Self> {
        if (index as usize) < N_CELLS {
            Some(Cell(index))
        } else {
            None
        }
    }

    /// Constructs a new `Cell` from row and column.
    ///
    /// # Panic
    /// Panics, if either coordinate is not below 9.
    pub fn from_coords(row: u8, col: u8) -> Self {
        Self::from_coords_checked(row, col).expect("cell coordinates out of range")
    }

    /// Constructs a new `Cell` from row and column, `None` for coordinates past the board.
    pub fn from_coords_checked(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < SIZE && (col as usize) < SIZE {
            Some(Cell(row * SIZE as u8 + col))
        } else {
            None
        }
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..N_CELLS as u8).map(Cell)
    }

    /// Returns the cell's row.
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / SIZE as u8
    }

    /// Returns the cell's column.
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % SIZE as u8
    }

    /// Returns the cell's 3x3 block, numbered row-major from the top left.
    #[inline]
    pub fn block(self) -> u8 {
        self.row() / BLOCK_SIZE as u8 * BLOCK_SIZE as u8 + self.col() / BLOCK_SIZE as u8
    }

    /// Returns the flat index as `usize` for indexing.
    #[inline]
    pub fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Returns the cells at Manhattan distance 1: two to four of them,
    /// depending on how close the cell is to the border.
    pub fn orthogonal_neighbors(self) -> Vec<Cell> {
        let mut neighbors = Vec::with_capacity(4);
        if self.row() > 0 {
            neighbors.push(Cell(self.0 - SIZE as u8));
        }
        if self.row() < SIZE as u8 - 1 {
            neighbors.push(Cell(self.0 + SIZE as u8));
        }
        if self.col() > 0 {
            neighbors.push(Cell(self.0 - 1));
        }
        if self.col() < SIZE as u8 - 1 {
            neighbors.push(Cell(self.0 + 1));
        }
        neighbors
    }

    /// Whether `other` lies at Manhattan distance 1 from this cell.
    pub fn is_orthogonal_neighbor(self, other: Cell) -> bool {
        let row_diff = (i16::from(self.row()) - i16::from(other.row())).abs();
        let col_diff = (i16::from(self.col()) - i16::from(other.col())).abs();
        row_diff + col_diff == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row(), self.col())
    }
}

// the wire format spells cells out as coordinate pairs, not flat indices
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Cell", 2)?;
        s.serialize_field("row", &self.row())?;
        s.serialize_field("col", &self.col())?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Coords {
            row: u8,
            col: u8,
        }

        let coords = Coords::deserialize(deserializer)?;
        Cell::from_coords_checked(coords.row, coords.col).ok_or_else(|| {
            de::Error::custom(format!(
                "cell position out of bounds: ({}, {})",
                coords.row, coords.col
            ))
        })
    }
}
