//! Selection of the cells revealed at puzzle start.

use rand::Rng;

use crate::board::Grid;
use crate::cage::Cage;
use crate::consts::{MAX_PREFILL_ATTEMPTS, N_CELLS};
use crate::difficulty::DifficultyConfig;

/// Chooses the given cells for a level: a grid where every nonzero entry
/// equals the solution at that position.
///
/// Low-rated levels (rating 3 and below) reveal one whole cage up front.
/// The remainder is filled best-effort from random cells of random
/// multi-cell cages until the target count derived from the prefill
/// percentage is reached or the attempt budget runs out; falling short of
/// the target is accepted. No cage other than the reserved one ever ends up
/// fully revealed.
pub fn select_prefilled<R: Rng>(
    solution: &Grid,
    cages: &[Cage],
    config: &DifficultyConfig,
    rng: &mut R,
) -> Grid {
    let mut prefilled = Grid::empty();
    let target = (N_CELLS as f64 * config.prefilled_cells_percent / 100.0).floor() as usize;

    // the one cage that may be revealed completely
    let reserved = rng.gen_range(0..cages.len());

    let mut revealed = 0;
    if config.difficulty_rating <= 3 {
        for &cell in &cages[reserved].cells {
            prefilled.set_raw(cell, solution.get_raw(cell));
            revealed += 1;
        }
    }

    let mut attempts = MAX_PREFILL_ATTEMPTS;
    while revealed < target && attempts > 0 {
        attempts -= 1;

        let cage_index = rng.gen_range(0..cages.len());
        let cage = &cages[cage_index];

        // singletons would give their sum away twice over
        if cage.cells.len() == 1 || cage_index == reserved {
            continue;
        }

        let cell = cage.cells[rng.gen_range(0..cage.cells.len())];
        if prefilled.get_raw(cell) != 0 {
            continue;
        }

        // leave at least one cell of every non-reserved cage unrevealed
        let unrevealed = cage
            .cells
            .iter()
            .filter(|&&other| prefilled.get_raw(other) == 0)
            .count();
        if unrevealed == 1 {
            continue;
        }

        prefilled.set_raw(cell, solution.get_raw(cell));
        revealed += 1;
    }

    prefilled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, SOLVED_VALUES};
    use crate::cage::partition_into_cages;
    use crate::color::assign_colors;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_cages(rng: &mut StdRng) -> (Grid, Vec<Cage>) {
        let solution = Grid::from_values(SOLVED_VALUES).unwrap();
        let cages = assign_colors(partition_into_cages(&solution, 1, 4, rng));
        (solution, cages)
    }

    #[test]
    fn givens_match_the_solution() {
        let mut rng = StdRng::seed_from_u64(31);
        let (solution, cages) = sample_cages(&mut rng);
        let config = DifficultyConfig::for_level(1);

        let prefilled = select_prefilled(&solution, &cages, &config, &mut rng);
        for cell in Cell::all() {
            let given = prefilled.get_raw(cell);
            assert!(given == 0 || given == solution.get_raw(cell));
        }
    }

    #[test]
    fn does_not_exceed_the_target_count() {
        let mut rng = StdRng::seed_from_u64(32);
        let (solution, cages) = sample_cages(&mut rng);
        let config = DifficultyConfig::for_level(30);

        let prefilled = select_prefilled(&solution, &cages, &config, &mut rng);
        let target = (N_CELLS as f64 * config.prefilled_cells_percent / 100.0).floor() as usize;
        let revealed = Cell::all().filter(|&cell| prefilled.get_raw(cell) != 0).count();

        // the reserved cage may overshoot a tiny target, anything else may not
        let largest_cage = cages.iter().map(|cage| cage.cells.len()).max().unwrap_or(0);
        assert!(revealed <= target.max(largest_cage));
    }

    #[test]
    fn at_most_one_cage_fully_revealed() {
        let mut rng = StdRng::seed_from_u64(33);
        let (solution, cages) = sample_cages(&mut rng);
        let config = DifficultyConfig::for_level(2);

        for _ in 0..10 {
            let prefilled = select_prefilled(&solution, &cages, &config, &mut rng);
            let fully_revealed = cages
                .iter()
                .filter(|cage| cage.cells.iter().all(|&cell| prefilled.get_raw(cell) != 0))
                .count();
            assert!(fully_revealed <= 1);
        }
    }

    #[test]
    fn hard_levels_reveal_no_full_cage() {
        let mut rng = StdRng::seed_from_u64(34);
        let (solution, cages) = sample_cages(&mut rng);
        let config = DifficultyConfig::for_level(90);
        assert!(config.difficulty_rating > 3);

        for _ in 0..10 {
            let prefilled = select_prefilled(&solution, &cages, &config, &mut rng);
            let fully_revealed = cages
                .iter()
                .filter(|cage| {
                    cage.cells.len() > 1
                        && cage.cells.iter().all(|&cell| prefilled.get_raw(cell) != 0)
                })
                .count();
            assert_eq!(fully_revealed, 0);
        }
    }
}
