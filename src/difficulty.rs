//! The difficulty curve mapping level numbers to generation parameters.

use crate::consts::TOTAL_LEVELS;

/// Generation parameters derived from a level number: cages grow and givens
/// thin out as the number rises.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DifficultyConfig {
    /// Smallest cage size the partitioner aims for.
    pub min_cage_size: usize,
    /// Largest cage size the partitioner aims for.
    pub max_cage_size: usize,
    /// Percentage of cells revealed at puzzle start, one decimal place.
    pub prefilled_cells_percent: f64,
    /// Displayed difficulty, `1..=10`.
    pub difficulty_rating: u8,
}

impl DifficultyConfig {
    /// Derives the parameters for `level_number`.
    ///
    /// # Panic
    /// Panics, if the level number is not in the range of `1..=100`.
    pub fn for_level(level_number: u32) -> Self {
        assert!(
            level_number >= 1 && level_number <= TOTAL_LEVELS,
            "level number out of range: {}",
            level_number
        );

        let normalized = f64::from(level_number - 1) / f64::from(TOTAL_LEVELS - 1);

        let min_cage_size = ((1.0 + normalized).floor() as usize).max(1);
        let max_cage_size = ((3.0 + normalized * 2.0).floor() as usize).max(3);

        // 33% of cells given at level 1 down to 10% at level 60,
        // then on down to 0% at level 100
        let percent = if level_number <= 60 {
            33.0 - f64::from(level_number - 1) * (23.0 / 59.0)
        } else {
            10.0 - f64::from(level_number - 60) * (10.0 / 40.0)
        };
        let prefilled_cells_percent = ((percent * 10.0).round() / 10.0).max(0.0);

        let difficulty_rating = (1.0 + normalized * 9.0).ceil() as u8;

        DifficultyConfig {
            min_cage_size,
            max_cage_size,
            prefilled_cells_percent,
            difficulty_rating,
        }
    }
}
