//! Crate-level error types.
use thiserror::Error;

/// Errors surfaced at the content and persistence seams.
///
/// Closed-set lookups (resource kinds, tool materials, crack overlays) are
/// not represented here: the enums are exhaustive, so a missing arm cannot
/// compile and a missing content entry is a panic at load time, not a
/// runtime condition to recover from.
#[derive(Debug, Error)]
pub enum GameError {
    /// A gatherable descriptor is missing its animation frame data.
    #[error("gatherable '{0}' has no animation frames")]
    MissingAnimation(String),
    /// A gatherable descriptor yields nothing.
    #[error("gatherable '{0}' has an empty yield table")]
    EmptyYields(String),
    /// The persisted score record could not be read or written.
    #[error("score store failure")]
    ScoreStore(#[source] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
