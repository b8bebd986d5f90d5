#[cfg(doc)]
use crate::board::Grid;
#[cfg(doc)]
use crate::level::RawGameLevel;

/// Error for [`Grid::from_values`]
#[derive(Debug, thiserror::Error)]
#[error("grid contains entries >9")]
pub struct FromValuesError(pub(crate) ());

/// Error when parsing a cage color token
#[derive(Debug, thiserror::Error)]
#[error("unknown cage color: {0}")]
pub struct ParseColorError(pub(crate) String);

/// Error for [`RawGameLevel::try_into_level`]
#[derive(Debug, thiserror::Error)]
pub enum LevelConversionError {
    /// The stored record carries no solution grid
    #[error("level {0} has no solution grid")]
    MissingSolution(String),
    /// The stored record carries no initial values grid
    #[error("level {0} has no initial values grid")]
    MissingInitialValues(String),
    /// A cage's color token is not part of the palette
    #[error("cage {cage} of level {level}: {source}")]
    InvalidColor {
        /// Id of the offending level
        level: String,
        /// Id of the offending cage
        cage: String,
        /// The underlying parse failure
        source: ParseColorError,
    },
}
