//! Exhaustive static validation of assembled levels.
//!
//! The validator never fails and never stops at the first problem: one pass
//! aggregates every violation it can find, so a rejected level is fully
//! diagnosed. It is the single gate deciding whether a level is publishable.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::board::{Cell, Grid};
use crate::cage::{cage_sum, possible_sums, RawCage};
use crate::color::{cages_adjacent, CageColor};
use crate::consts::N_CELLS;
use crate::level::{GameLevel, RawGameLevel};

// conflicting cage pairs are plentiful when coloring goes wrong; the first
// few locate the defect
const MAX_REPORTED_CONFLICTS: usize = 5;

/// The kinds of findings the validator reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    InvalidCageSum,
    OverlappingCages,
    UncoveredCells,
    MissingSolution,
    InvalidSolution,
    MissingInitialValues,
    InitialValuesMismatch,
    AdjacentSameColor,
    InvalidColor,
}

impl ValidationErrorKind {
    /// The wire token of this kind, e.g. `"INVALID_CAGE_SUM"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidCageSum => "INVALID_CAGE_SUM",
            ValidationErrorKind::OverlappingCages => "OVERLAPPING_CAGES",
            ValidationErrorKind::UncoveredCells => "UNCOVERED_CELLS",
            ValidationErrorKind::MissingSolution => "MISSING_SOLUTION",
            ValidationErrorKind::InvalidSolution => "INVALID_SOLUTION",
            ValidationErrorKind::MissingInitialValues => "MISSING_INITIAL_VALUES",
            ValidationErrorKind::InitialValuesMismatch => "INITIAL_VALUES_MISMATCH",
            ValidationErrorKind::AdjacentSameColor => "ADJACENT_SAME_COLOR",
            ValidationErrorKind::InvalidColor => "INVALID_COLOR",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding, carrying the data needed to locate the defect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Id of the level the finding belongs to.
    pub level_id: String,
    /// The kind of violation.
    #[serde(rename = "errorType")]
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Structured payload, where the kind has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Structured payloads attached to findings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    /// The cage a per-cage finding refers to.
    Cage(RawCage),
    /// Cells claimed by more than one cage.
    #[serde(rename_all = "camelCase")]
    Overlap {
        /// Ids of every cage involved in an overlap.
        overlapping_ids: Vec<String>,
        /// The doubly-claimed positions with the claimants.
        overlapping_coordinates: Vec<OverlapCoordinate>,
    },
    /// Adjacent same-colored cage pairs, capped to the first five.
    Conflicts {
        /// The conflicting pairs.
        conflicts: Vec<ColorConflict>,
    },
}

/// A position claimed by two cages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapCoordinate {
    /// Row of the position.
    pub row: u8,
    /// Column of the position.
    pub col: u8,
    /// The two claimants, in claim order.
    pub cage_ids: Vec<String>,
}

/// Two orthogonally adjacent cages sharing a color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorConflict {
    /// Id of the first cage.
    pub cage1: String,
    /// Id of the second cage.
    pub cage2: String,
    /// The shared color token.
    pub color: String,
}

/// Everything the validator found for one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Id of the validated level.
    pub level_id: String,
    /// Whether no finding was reported.
    pub valid: bool,
    /// Every finding, in check order.
    pub errors: Vec<ValidationError>,
}

/// Batch report over a set of levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// ISO-8601 time the report was produced.
    pub timestamp: String,
    /// Number of levels examined.
    pub total_levels: usize,
    /// Findings across all levels.
    pub total_errors: usize,
    /// Per-level results.
    pub results: Vec<ValidationResult>,
}

/// Validates an assembled level.
pub fn validate_level(level: &GameLevel) -> ValidationResult {
    validate_raw_level(&level.to_raw())
}

/// Validates a stored level record, aggregating every violation.
pub fn validate_raw_level(level: &RawGameLevel) -> ValidationResult {
    let mut errors = Vec::new();

    check_cage_sums(level, &mut errors);
    check_overlaps(level, &mut errors);
    check_coverage(level, &mut errors);
    check_solution(level, &mut errors);
    check_initial_values(level, &mut errors);
    check_adjacent_colors(level, &mut errors);
    check_color_tokens(level, &mut errors);

    ValidationResult {
        level_id: level.id.clone(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Validates a batch of levels into a single report.
pub fn validate_levels(levels: &[GameLevel]) -> ValidationReport {
    let results: Vec<ValidationResult> = levels.iter().map(validate_level).collect();
    let total_errors = results.iter().map(|result| result.errors.len()).sum();

    ValidationReport {
        timestamp: Utc::now().to_rfc3339(),
        total_levels: levels.len(),
        total_errors,
        results,
    }
}

// every cage's stored sum must be reachable with pairwise distinct digits,
// and the stored sum is not trusted: it is recomputed from the solution
fn check_cage_sums(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    // the feasible sums only depend on the cage size, compute each size once
    let mut sums_by_size: Vec<Option<Vec<u32>>> = vec![None; N_CELLS + 1];

    for cage in &level.cages {
        let size = cage.cells.len();
        let feasible = sums_by_size[size].get_or_insert_with(|| possible_sums(size));
        if !feasible.contains(&cage.sum) {
            errors.push(ValidationError {
                level_id: level.id.clone(),
                kind: ValidationErrorKind::InvalidCageSum,
                message: format!(
                    "cage {} has an impossible sum of {} for {} cells",
                    cage.id, cage.sum, size
                ),
                details: Some(ErrorDetails::Cage(cage.clone())),
            });
            continue;
        }

        if let Some(solution) = &level.solution {
            let actual = cage_sum(&cage.cells, solution);
            if actual != cage.sum {
                errors.push(ValidationError {
                    level_id: level.id.clone(),
                    kind: ValidationErrorKind::InvalidCageSum,
                    message: format!(
                        "cage {} stores a sum of {} but its cells sum to {}",
                        cage.id, cage.sum, actual
                    ),
                    details: Some(ErrorDetails::Cage(cage.clone())),
                });
            }
        }
    }
}

fn check_overlaps(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    let mut cell_to_cage: Vec<Option<&str>> = vec![None; N_CELLS];
    let mut overlapping_ids: Vec<String> = Vec::new();
    let mut overlapping_coordinates = Vec::new();

    for cage in &level.cages {
        for &cell in &cage.cells {
            if let Some(first) = cell_to_cage[cell.as_index()] {
                push_unique(&mut overlapping_ids, first);
                push_unique(&mut overlapping_ids, &cage.id);
                overlapping_coordinates.push(OverlapCoordinate {
                    row: cell.row(),
                    col: cell.col(),
                    cage_ids: vec![first.to_string(), cage.id.clone()],
                });
            }
            cell_to_cage[cell.as_index()] = Some(&cage.id);
        }
    }

    if !overlapping_coordinates.is_empty() {
        errors.push(ValidationError {
            level_id: level.id.clone(),
            kind: ValidationErrorKind::OverlappingCages,
            message: "found cages claiming the same cell".to_string(),
            details: Some(ErrorDetails::Overlap {
                overlapping_ids,
                overlapping_coordinates,
            }),
        });
    }
}

fn check_coverage(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    let mut covered = [false; N_CELLS];
    for cage in &level.cages {
        for &cell in &cage.cells {
            covered[cell.as_index()] = true;
        }
    }

    let uncovered = Cell::all().filter(|&cell| !covered[cell.as_index()]).count();
    if uncovered > 0 {
        errors.push(ValidationError {
            level_id: level.id.clone(),
            kind: ValidationErrorKind::UncoveredCells,
            message: format!("{} cells are not assigned to any cage", uncovered),
            details: None,
        });
    }
}

fn check_solution(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    match &level.solution {
        None => errors.push(ValidationError {
            level_id: level.id.clone(),
            kind: ValidationErrorKind::MissingSolution,
            message: "no solution found for the level".to_string(),
            details: None,
        }),
        Some(solution) if !solution.is_valid_solution() => errors.push(ValidationError {
            level_id: level.id.clone(),
            kind: ValidationErrorKind::InvalidSolution,
            message: "the solution is not a valid sudoku".to_string(),
            details: None,
        }),
        Some(_) => {}
    }
}

fn check_initial_values(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    let initial_values = match &level.initial_values {
        Some(initial_values) => initial_values,
        None => {
            errors.push(ValidationError {
                level_id: level.id.clone(),
                kind: ValidationErrorKind::MissingInitialValues,
                message: "no initial values found for the level".to_string(),
                details: None,
            });
            return;
        }
    };

    // a mismatch is only detectable against a present solution
    if let Some(solution) = &level.solution {
        let mismatch = Cell::all().any(|cell| {
            let given = initial_values.get_raw(cell);
            given != 0 && given != solution.get_raw(cell)
        });
        if mismatch {
            errors.push(ValidationError {
                level_id: level.id.clone(),
                kind: ValidationErrorKind::InitialValuesMismatch,
                message: "the initial values do not match the solution".to_string(),
                details: None,
            });
        }
    }
}

fn check_adjacent_colors(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    let mut conflicts = Vec::new();

    for (index, a) in level.cages.iter().enumerate() {
        for b in &level.cages[index + 1..] {
            if a.color == b.color && cages_adjacent(&a.cells, &b.cells) {
                conflicts.push(ColorConflict {
                    cage1: a.id.clone(),
                    cage2: b.id.clone(),
                    color: a.color.clone(),
                });
            }
        }
    }

    if !conflicts.is_empty() {
        conflicts.truncate(MAX_REPORTED_CONFLICTS);
        errors.push(ValidationError {
            level_id: level.id.clone(),
            kind: ValidationErrorKind::AdjacentSameColor,
            message: "found adjacent cages sharing a color".to_string(),
            details: Some(ErrorDetails::Conflicts { conflicts }),
        });
    }
}

// the stored format admits all nine named colors, independent of the
// four-color assignment scheme
fn check_color_tokens(level: &RawGameLevel, errors: &mut Vec<ValidationError>) {
    for cage in &level.cages {
        if cage.color.parse::<CageColor>().is_err() {
            errors.push(ValidationError {
                level_id: level.id.clone(),
                kind: ValidationErrorKind::InvalidColor,
                message: format!("cage {} uses an unknown color: {}", cage.id, cage.color),
                details: Some(ErrorDetails::Cage(cage.clone())),
            });
        }
    }
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}
