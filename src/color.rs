//! Cage colors and the adjacency-aware assignment of them.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::board::Cell;
use crate::cage::{Cage, UncoloredCage};
use crate::consts::N_CELLS;
use crate::errors::ParseColorError;

/// A color token from the fixed palette of the stored level format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[allow(missing_docs)]
pub enum CageColor {
    Orange,
    Teal,
    Pink,
    Purple,
    Blue,
    Green,
    Yellow,
    Cyan,
    Gray,
}

/// The bounded palette used during assignment. Four colors suffice for the
/// adjacency graph of planar regions; the full palette stays legal on disk.
pub const FOUR_COLOR_PALETTE: [CageColor; 4] = [
    CageColor::Blue,
    CageColor::Yellow,
    CageColor::Pink,
    CageColor::Green,
];

impl CageColor {
    /// All palette colors, in the order of the stored level format.
    pub fn all() -> [CageColor; 9] {
        use self::CageColor::*;
        [Orange, Teal, Pink, Purple, Blue, Green, Yellow, Cyan, Gray]
    }

    /// The color's token in the stored level format, e.g. `"blue.100"`.
    pub fn token(self) -> &'static str {
        match self {
            CageColor::Orange => "orange.100",
            CageColor::Teal => "teal.100",
            CageColor::Pink => "pink.100",
            CageColor::Purple => "purple.100",
            CageColor::Blue => "blue.100",
            CageColor::Green => "green.100",
            CageColor::Yellow => "yellow.100",
            CageColor::Cyan => "cyan.100",
            CageColor::Gray => "gray.100",
        }
    }
}

impl fmt::Display for CageColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for CageColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CageColor::all()
            .iter()
            .copied()
            .find(|color| color.token() == s)
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl Serialize for CageColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for CageColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}

/// Whether some cell of `a` is orthogonally adjacent to some cell of `b`.
pub fn cages_adjacent(a: &[Cell], b: &[Cell]) -> bool {
    a.iter()
        .any(|&cell_a| b.iter().any(|&cell_b| cell_a.is_orthogonal_neighbor(cell_b)))
}

/// Assigns every cage a color from the four-color palette such that
/// orthogonally adjacent cages differ.
///
/// Colors are found by backtracking over the cages in most-constrained-first
/// order. Should the search fail (possible for adjacency graphs of cages
/// that are not strictly planar), a greedy pass assigns the lowest free
/// palette color instead, wrapping around by index when all four are taken
/// by neighbors. The wrap-around can leave two adjacent cages with the same
/// color; the level validator catches those before publication.
pub fn assign_colors(cages: Vec<UncoloredCage>) -> Vec<Cage> {
    let adjacency = cage_adjacency(&cages);

    // most-constrained first reduces backtracking
    let mut order: Vec<usize> = (0..cages.len()).collect();
    order.sort_by_key(|&index| Reverse(adjacency[index].len()));

    let assignment = color_by_backtracking(&adjacency, &order)
        .unwrap_or_else(|| color_greedy(&adjacency, &order));

    cages
        .into_iter()
        .zip(assignment)
        .map(|(cage, color_index)| Cage {
            id: cage.id,
            cells: cage.cells,
            sum: cage.sum,
            color: FOUR_COLOR_PALETTE[color_index],
        })
        .collect()
}

// adjacency list keyed by cage index, built from a cell -> cage sweep so
// every adjacent cell pair is examined exactly once
fn cage_adjacency(cages: &[UncoloredCage]) -> Vec<Vec<usize>> {
    let mut cell_to_cage = [usize::MAX; N_CELLS];
    for (index, cage) in cages.iter().enumerate() {
        for &cell in &cage.cells {
            cell_to_cage[cell.as_index()] = index;
        }
    }

    let mut adjacency = vec![Vec::new(); cages.len()];
    for cell in Cell::all() {
        let here = cell_to_cage[cell.as_index()];
        if here == usize::MAX {
            continue;
        }
        // looking right and down covers every orthogonal pair once
        let mut consider = |other: usize| {
            let there = cell_to_cage[other];
            if there != usize::MAX && there != here && !adjacency[here].contains(&there) {
                adjacency[here].push(there);
                adjacency[there].push(here);
            }
        };
        if cell.col() < 8 {
            consider(cell.as_index() + 1);
        }
        if cell.row() < 8 {
            consider(cell.as_index() + 9);
        }
    }

    adjacency
}

// backtracking search over palette indices with an explicit stack of
// per-depth candidate counters; `None` when every combination is exhausted
fn color_by_backtracking(adjacency: &[Vec<usize>], order: &[usize]) -> Option<Vec<usize>> {
    let n_cages = order.len();
    let mut colors: Vec<Option<usize>> = vec![None; n_cages];
    let mut next_color = vec![0usize; n_cages];
    let mut depth = 0;

    while depth < n_cages {
        let cage = order[depth];

        let mut chosen = None;
        while next_color[depth] < FOUR_COLOR_PALETTE.len() {
            let color = next_color[depth];
            next_color[depth] += 1;
            let taken = adjacency[cage].iter().any(|&neighbor| colors[neighbor] == Some(color));
            if !taken {
                chosen = Some(color);
                break;
            }
        }

        match chosen {
            Some(color) => {
                colors[cage] = Some(color);
                depth += 1;
            }
            None => {
                next_color[depth] = 0;
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                colors[order[depth]] = None;
            }
        }
    }

    Some(colors.into_iter().map(|color| color.expect("cage left uncolored")).collect())
}

// lowest palette color unused by already-colored neighbors; wraps around by
// index when all four are taken, which is where the adjacency guarantee
// can break down
fn color_greedy(adjacency: &[Vec<usize>], order: &[usize]) -> Vec<usize> {
    let mut colors: Vec<Option<usize>> = vec![None; order.len()];

    for &cage in order {
        let mut color = 0;
        while color < FOUR_COLOR_PALETTE.len()
            && adjacency[cage].iter().any(|&neighbor| colors[neighbor] == Some(color))
        {
            color += 1;
        }
        colors[cage] = Some(color % FOUR_COLOR_PALETTE.len());
    }

    colors
        .into_iter()
        .map(|color| color.expect("cage left uncolored"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Grid, SOLVED_VALUES};
    use crate::cage::partition_into_cages;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use strum::IntoEnumIterator;

    #[test]
    fn tokens_round_trip() {
        for color in CageColor::iter() {
            assert_eq!(color.token().parse::<CageColor>().unwrap(), color);
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert!("mauve.100".parse::<CageColor>().is_err());
    }

    #[test]
    fn four_color_palette_is_part_of_the_full_palette() {
        for color in FOUR_COLOR_PALETTE.iter() {
            assert!(CageColor::all().contains(color));
        }
    }

    #[test]
    fn adjacent_cells_make_adjacent_cages() {
        let a = vec![Cell::from_coords(0, 0), Cell::from_coords(0, 1)];
        let b = vec![Cell::from_coords(1, 1)];
        let c = vec![Cell::from_coords(2, 2)];
        assert!(cages_adjacent(&a, &b));
        assert!(!cages_adjacent(&a, &c));
        assert!(!cages_adjacent(&b, &c));
    }

    #[test]
    fn assignment_keeps_neighbors_distinct() {
        let solution = Grid::from_values(SOLVED_VALUES).unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..10 {
            let cages = assign_colors(partition_into_cages(&solution, 1, 4, &mut rng));
            for (i, a) in cages.iter().enumerate() {
                for b in &cages[i + 1..] {
                    if cages_adjacent(&a.cells, &b.cells) {
                        assert_ne!(
                            a.color, b.color,
                            "cages {} and {} are adjacent and share {}",
                            a.id, b.id, a.color
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn backtracking_gives_up_on_five_mutual_neighbors() {
        let adjacency: Vec<Vec<usize>> = (0..5)
            .map(|i| (0..5).filter(|&j| j != i).collect())
            .collect();
        let order: Vec<usize> = (0..5).collect();
        assert!(color_by_backtracking(&adjacency, &order).is_none());
    }

    #[test]
    fn greedy_wraps_around_when_palette_is_exhausted() {
        // five mutually adjacent cages cannot be four-colored; the greedy
        // pass wraps the last one around to the first palette color
        let adjacency: Vec<Vec<usize>> = (0..5)
            .map(|i| (0..5).filter(|&j| j != i).collect())
            .collect();
        let order: Vec<usize> = (0..5).collect();
        let assignment = color_greedy(&adjacency, &order);
        assert_eq!(&assignment[..4], &[0, 1, 2, 3]);
        assert_eq!(assignment[4], 0);
    }
}
