//! Level records, assembly of freshly generated levels and the batch driver.

use chrono::Utc;
use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Cell, Grid};
use crate::cage::{generate_id, partition_into_cages, Cage, RawCage};
use crate::color::{assign_colors, FOUR_COLOR_PALETTE};
use crate::consts::{MAX_LEVEL_ATTEMPTS, TOTAL_LEVELS};
use crate::difficulty::DifficultyConfig;
use crate::errors::LevelConversionError;
use crate::generator::generate_solution;
use crate::prefill::select_prefilled;
use crate::validate::validate_level;

const AUTHOR: &str = "KillerSudoku Generator";

const THEMES: [&str; 19] = [
    "Cascade", "Pyramid", "Spiral", "Fortress", "Labyrinth", "Diamond", "Flower", "Waterfall",
    "Puzzle", "Challenge", "Riddle", "Mystery", "Adventure", "Journey", "Quest", "Enigma", "Maze",
    "Path", "Crown",
];

/// A fully assembled killer sudoku level.
///
/// Created once by [`generate_level`] (or deserialized from a stored
/// record), immutable afterwards; validation and play consume it read-only.
/// Serializes to the stored level format with camelCase field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLevel {
    /// Identifier of the level.
    pub id: String,
    /// Position in the 1..=100 level set.
    pub level_number: u32,
    /// Displayed difficulty, `1..=10`.
    pub difficulty_rating: u8,
    /// Displayed name.
    pub name: String,
    /// The cages partitioning the board.
    pub cages: Vec<Cage>,
    /// The given cells; `0` entries are hidden.
    pub initial_values: Grid,
    /// The full solution.
    pub solution: Grid,
    /// Displayed description.
    pub description: String,
    /// Author attribution.
    pub author: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
}

/// A level as stored on disk: the grids are optional and cage colors stay
/// raw tokens, so incomplete or hand-edited records can be loaded and
/// diagnosed by the validator instead of failing to parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGameLevel {
    /// Identifier of the level.
    pub id: String,
    /// Position in the level set.
    pub level_number: u32,
    /// Displayed difficulty, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_rating: Option<u8>,
    /// Displayed name, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The cages partitioning the board.
    pub cages: Vec<RawCage>,
    /// The given cells, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_values: Option<Grid>,
    /// The full solution, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Grid>,
    /// Displayed description, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author attribution, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// ISO-8601 creation timestamp, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl GameLevel {
    /// The permissive wire form of this level.
    pub fn to_raw(&self) -> RawGameLevel {
        RawGameLevel {
            id: self.id.clone(),
            level_number: self.level_number,
            difficulty_rating: Some(self.difficulty_rating),
            name: Some(self.name.clone()),
            cages: self.cages.iter().map(Cage::to_raw).collect(),
            initial_values: Some(self.initial_values.clone()),
            solution: Some(self.solution.clone()),
            description: Some(self.description.clone()),
            author: Some(self.author.clone()),
            created_at: Some(self.created_at.clone()),
        }
    }
}

impl RawGameLevel {
    /// Converts a stored record into a strict [`GameLevel`], rejecting
    /// records with missing grids or out-of-palette colors.
    pub fn try_into_level(self) -> Result<GameLevel, LevelConversionError> {
        let id = self.id;
        let solution = self
            .solution
            .ok_or_else(|| LevelConversionError::MissingSolution(id.clone()))?;
        let initial_values = self
            .initial_values
            .ok_or_else(|| LevelConversionError::MissingInitialValues(id.clone()))?;

        let mut cages = Vec::with_capacity(self.cages.len());
        for raw in self.cages {
            let color = raw.color.parse().map_err(|source| LevelConversionError::InvalidColor {
                level: id.clone(),
                cage: raw.id.clone(),
                source,
            })?;
            cages.push(Cage { id: raw.id, cells: raw.cells, sum: raw.sum, color });
        }

        Ok(GameLevel {
            id,
            level_number: self.level_number,
            difficulty_rating: self.difficulty_rating.unwrap_or(1),
            name: self.name.unwrap_or_default(),
            cages,
            initial_values,
            solution,
            description: self.description.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_default(),
        })
    }
}

/// Generates a level for `level_number`, retrying with a fresh solution and
/// partition until the validator accepts the assembly.
///
/// Returns `None` once the attempt budget of 10 is spent;
/// [`generate_all_levels`] falls back to [`fallback_level`] in that case.
pub fn generate_level<R: Rng>(level_number: u32, rng: &mut R) -> Option<GameLevel> {
    let config = DifficultyConfig::for_level(level_number);

    for attempt in 1..=MAX_LEVEL_ATTEMPTS {
        let solution = generate_solution(rng);
        let cages = partition_into_cages(
            &solution,
            config.min_cage_size,
            config.max_cage_size,
            rng,
        );
        let cages = assign_colors(cages);
        let initial_values = select_prefilled(&solution, &cages, &config, rng);

        let level = GameLevel {
            id: generate_id(rng),
            level_number,
            difficulty_rating: config.difficulty_rating,
            name: level_name(level_number, config.difficulty_rating, rng),
            description: format!(
                "A level (difficulty {}/10) with {} cages.",
                config.difficulty_rating,
                cages.len()
            ),
            author: AUTHOR.to_string(),
            created_at: Utc::now().to_rfc3339(),
            cages,
            initial_values,
            solution,
        };

        let result = validate_level(&level);
        if result.valid {
            return Some(level);
        }

        let kinds: Vec<&str> = result.errors.iter().map(|error| error.kind.as_str()).collect();
        warn!(
            "level {}: validation failed on attempt {}/{}: {}",
            level_number,
            attempt,
            MAX_LEVEL_ATTEMPTS,
            kinds.join(", ")
        );
    }

    None
}

/// The degenerate but always-valid level used when generation keeps being
/// rejected: every cell its own singleton cage, nothing prefilled.
pub fn fallback_level<R: Rng>(level_number: u32, rng: &mut R) -> GameLevel {
    let config = DifficultyConfig::for_level(level_number);
    let solution = generate_solution(rng);

    let cages: Vec<Cage> = Cell::all()
        .map(|cell| Cage {
            id: generate_id(rng),
            cells: vec![cell],
            sum: u32::from(solution.get_raw(cell)),
            // 2x2 parity tiling: orthogonal neighbors always land on a
            // different palette color
            color: FOUR_COLOR_PALETTE[(cell.row() % 2 * 2 + cell.col() % 2) as usize],
        })
        .collect();

    GameLevel {
        id: generate_id(rng),
        level_number,
        difficulty_rating: config.difficulty_rating,
        name: format!("Easy Basic {}", level_number),
        cages,
        initial_values: Grid::empty(),
        solution,
        description: format!(
            "A simple fallback level (difficulty {}/10).",
            config.difficulty_rating
        ),
        author: AUTHOR.to_string(),
        created_at: Utc::now().to_rfc3339(),
    }
}

/// Generates the whole 1..=100 level set.
///
/// Levels whose every generation attempt is rejected are replaced by
/// [`fallback_level`], so the batch always completes with 100 levels.
pub fn generate_all_levels<R: Rng>(rng: &mut R) -> Vec<GameLevel> {
    (1..=TOTAL_LEVELS)
        .map(|level_number| {
            generate_level(level_number, rng).unwrap_or_else(|| {
                warn!(
                    "level {}: falling back to singleton cages after {} rejected attempts",
                    level_number, MAX_LEVEL_ATTEMPTS
                );
                fallback_level(level_number, rng)
            })
        })
        .collect()
}

fn level_name<R: Rng>(level_number: u32, rating: u8, rng: &mut R) -> String {
    let theme = THEMES[rng.gen_range(0..THEMES.len())];
    format!("{} {} {}", difficulty_label(rating), theme, level_number)
}

// display label for a rating, used in level names
fn difficulty_label(rating: u8) -> &'static str {
    match rating {
        0..=2 => "Very easy",
        3..=4 => "Easy",
        5..=6 => "Medium",
        7..=8 => "Hard",
        _ => "Expert",
    }
}
