//! Cages and the random partition of the board into them.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Cell, Grid};
use crate::color::CageColor;
use crate::consts::N_CELLS;

/// A contiguous group of cells whose values must be pairwise distinct and
/// sum to a published target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cage {
    /// Identifier unique within a level.
    pub id: String,
    /// The cells of the cage, pairwise distinct.
    pub cells: Vec<Cell>,
    /// Target sum of the cage's cell values.
    pub sum: u32,
    /// Display color, distinct from orthogonally adjacent cages.
    pub color: CageColor,
}

/// A cage as produced by the partitioner, before colors are assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct UncoloredCage {
    /// Identifier unique within a level.
    pub id: String,
    /// The cells of the cage, pairwise distinct.
    pub cells: Vec<Cell>,
    /// Target sum of the cage's cell values.
    pub sum: u32,
}

/// A cage as stored on disk, with the color kept as its raw token so that
/// records with out-of-palette colors can still be diagnosed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCage {
    /// Identifier unique within a level.
    pub id: String,
    /// The cells of the cage.
    pub cells: Vec<Cell>,
    /// Target sum of the cage's cell values.
    pub sum: u32,
    /// Raw color token, e.g. `"blue.100"`.
    pub color: String,
}

impl Cage {
    /// The wire form of this cage.
    pub fn to_raw(&self) -> RawCage {
        RawCage {
            id: self.id.clone(),
            cells: self.cells.clone(),
            sum: self.sum,
            color: self.color.token().to_string(),
        }
    }
}

/// Sum of the solution's values over the given cells.
pub fn cage_sum(cells: &[Cell], solution: &Grid) -> u32 {
    cells.iter().map(|&cell| u32::from(solution.get_raw(cell))).sum()
}

/// The sums achievable by `cage_size` pairwise distinct digits from 1 to 9,
/// in ascending order. Empty for sizes outside `1..=9`.
pub fn possible_sums(cage_size: usize) -> Vec<u32> {
    if cage_size == 0 || cage_size > 9 {
        return Vec::new();
    }

    // enumerate all C(9, k) digit subsets via their 9-bit masks
    let mut achievable = [false; 46];
    for subset in 0u16..1 << 9 {
        if subset.count_ones() as usize != cage_size {
            continue;
        }
        let sum: usize = (0..9).filter(|bit| subset & (1 << bit) != 0).map(|bit| bit + 1).sum();
        achievable[sum] = true;
    }

    (0..achievable.len())
        .filter(|&sum| achievable[sum])
        .map(|sum| sum as u32)
        .collect()
}

/// Partitions the board into contiguous cages sized by the difficulty
/// profile, covering every cell exactly once.
///
/// Cage growth can stall when the neighborhood is exhausted; the partial
/// cage is accepted as-is, so cages may fall short of their target size and
/// a cell enclosed by covered neighbors becomes a singleton cage.
pub fn partition_into_cages<R: Rng>(
    solution: &Grid,
    min_cage_size: usize,
    max_cage_size: usize,
    rng: &mut R,
) -> Vec<UncoloredCage> {
    let mut covered = CoverageSet::new();
    let mut cages = Vec::new();

    while covered.len() < N_CELLS {
        let seed = covered.random_uncovered(rng);
        covered.insert(seed);
        let mut cells = vec![seed];

        // never ask for more cells than are left uncovered
        let remaining = N_CELLS - covered.len() + 1;
        let target = rng.gen_range(min_cage_size..=max_cage_size).min(remaining);

        while cells.len() < target {
            let candidates = uncovered_neighbors(&cells, &covered);
            let next = match candidates.choose(rng) {
                Some(&cell) => cell,
                None => break, // growth stalled, accept the partial cage
            };
            covered.insert(next);
            cells.push(next);
        }

        let sum = cage_sum(&cells, solution);
        cages.push(UncoloredCage { id: generate_id(rng), cells, sum });
    }

    cages
}

// uncovered orthogonal neighbors of any cell currently in the cage,
// each candidate listed once
fn uncovered_neighbors(cells: &[Cell], covered: &CoverageSet) -> Vec<Cell> {
    let mut seen = 0u128;
    let mut candidates = Vec::new();
    for &cell in cells {
        for neighbor in cell.orthogonal_neighbors() {
            let bit = 1u128 << neighbor.as_index();
            if !covered.contains(neighbor) && seen & bit == 0 {
                seen |= bit;
                candidates.push(neighbor);
            }
        }
    }
    candidates
}

// 81-bit coverage set, local to a single partition run
struct CoverageSet {
    bits: u128,
    len: usize,
}

impl CoverageSet {
    fn new() -> Self {
        CoverageSet { bits: 0, len: 0 }
    }

    fn contains(&self, cell: Cell) -> bool {
        self.bits & (1u128 << cell.as_index()) != 0
    }

    fn insert(&mut self, cell: Cell) {
        if !self.contains(cell) {
            self.bits |= 1u128 << cell.as_index();
            self.len += 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    // uniformly random uncovered cell; the set must not be full
    fn random_uncovered<R: Rng>(&self, rng: &mut R) -> Cell {
        let nth = rng.gen_range(0..N_CELLS - self.len);
        Cell::all()
            .filter(|&cell| !self.contains(cell))
            .nth(nth)
            .expect("no uncovered cell left")
    }
}

// 6 characters of lowercase base 36, the id format of the stored levels
pub(crate) fn generate_id<R: Rng>(rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
