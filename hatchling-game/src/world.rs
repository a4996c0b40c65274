//! Collaborator contracts for the generated world, plus the content
//! descriptors the gameplay core consumes from it.
//!
//! The crate never discovers these collaborators at runtime; they are
//! injected into the session at construction.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GameError, GameResult};
use crate::resources::{ResourceKind, YieldRange};
use crate::tools::ToolKind;

/// Environmental variant the world cycles through between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Biome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Default seasonal cycle, used by generators with no special order.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Autumn,
            Self::Autumn => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a tile/region watched for fallout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MarkerId(pub u32);

/// Identifier of a gatherable object instance in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Content descriptor for one gatherable object type. Authored data:
/// the required tool kind and yields are explicit fields, never
/// inferred from presentation names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherableSpec {
    pub name: String,
    pub required_tool: ToolKind,
    pub yields: Vec<(ResourceKind, YieldRange)>,
    /// Harvest animation frame count; the content set must be complete.
    pub animation_frames: u32,
}

/// A gatherable currently in proximity range of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherTarget {
    pub id: TargetId,
    pub required_tool: ToolKind,
    /// Index into the session's content table.
    pub spec: usize,
}

/// Verify authored content up front. Missing animation or yield data is
/// a content-authoring error surfaced before the first tick.
pub fn validate_content(specs: &[GatherableSpec]) -> GameResult<()> {
    for spec in specs {
        if spec.animation_frames == 0 {
            return Err(GameError::MissingAnimation(spec.name.clone()));
        }
        if spec.yields.is_empty() {
            return Err(GameError::EmptyYields(spec.name.clone()));
        }
    }
    Ok(())
}

/// Per-direction blocking predicates for one tick, already resolved by
/// the host's collision detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CollisionView {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Plain-data snapshot of the world facts the core consumes each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldView {
    /// The single region currently watched for fallout, if any.
    pub watched_marker: Option<MarkerId>,
    /// Collision state for the four movement directions.
    pub collisions: CollisionView,
    /// External completion signal for the in-flight gather action.
    pub gather_finished: bool,
}

/// World-generation collaborator. The core consumes exactly two of its
/// signals - "should the run end" and "advance to the next biome" - and
/// requests cleanup, generation, and fallout effects through it.
pub trait WorldGenerator {
    /// Remove spent world objects before the end-of-run check.
    fn clean(&mut self);

    /// Whether the remaining gatherable budget warrants ending the run.
    fn should_end_run(&self) -> bool;

    /// Successor biome for the given one.
    fn next_biome(&self, current: Biome) -> Biome;

    /// Populate the world for a biome.
    fn generate(&mut self, biome: Biome);

    /// Trigger the fallout effect for a watched marker. Called at most
    /// once per marker.
    fn fallout(&mut self, marker: MarkerId);
}
