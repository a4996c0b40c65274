//! Hatchling Game Engine
//!
//! Platform-agnostic core game logic for the Hatchling top-down
//! survival/collection game. This crate provides the player state
//! machine, the tool progression economy, and the run lifecycle without
//! UI or platform-specific dependencies: rendering, input polling, and
//! world generation stay behind injected collaborator seams.

pub mod constants;
pub mod error;
pub mod gather;
pub mod health;
pub mod input;
pub mod lifecycle;
pub mod player;
pub mod resources;
pub mod session;
pub mod tools;
pub mod world;

// Re-export commonly used types
pub use error::{GameError, GameResult};
pub use gather::{SwingPhase, SwingSequence};
pub use health::{CrackMeter, CrackUpdate};
pub use input::{InputFrame, slot_for_numeric_key};
pub use lifecycle::{GameOverSummary, LifecycleStep, RunLifecycle};
pub use player::{Facing, Movement, PlayerMode, PlayerStateMachine, ToolPose};
pub use resources::{ResourceKind, ResourceLedger, YieldRange};
pub use session::{GameSession, RunSnapshot, TickOutcome, TickReport};
pub use tools::{
    ActiveSlot, RepairManager, ToolInstance, ToolKind, ToolRegistry, UpgradeCost, UpgradeTier,
    UseOutcome,
};
pub use world::{
    Biome, CollisionView, GatherTarget, GatherableSpec, MarkerId, TargetId, WorldGenerator,
    WorldView, validate_content,
};

/// Trait for abstracting the persisted best-score record.
/// Platform-specific implementations should provide this; the record
/// itself is a plain textual integer, and an absent record is a normal
/// first-run condition.
pub trait ScoreStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the persisted best score, `None` when no record exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be read.
    fn load_best(&self) -> Result<Option<i64>, Self::Error>;

    /// Overwrite the persisted best score.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_best(&mut self, score: i64) -> Result<(), Self::Error>;
}
