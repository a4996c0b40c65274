//! The multi-tick gather swing, modeled as an explicit state object
//! advanced once per tick rather than an implicit background task.
//! Cancellation is clearing the object; nothing keeps running.
use serde::{Deserialize, Serialize};

use crate::constants::SWING_STEP_DEGREES;
use crate::tools::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingPhase {
    Raise,
    Lower,
}

/// One in-flight tool swing. The tool rotates up for a fixed number of
/// steps, then back down, looping until the external gather completion
/// signal ends the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingSequence {
    kind: ToolKind,
    phase: SwingPhase,
    step: u32,
    steps_per_phase: u32,
}

impl SwingSequence {
    /// Start a swing for the given tool; the step count is proportional
    /// to the kind.
    #[must_use]
    pub fn for_tool(kind: ToolKind) -> Self {
        Self {
            kind,
            phase: SwingPhase::Raise,
            step: 0,
            steps_per_phase: kind.swing_steps(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ToolKind {
        self.kind
    }

    #[must_use]
    pub const fn phase(&self) -> SwingPhase {
        self.phase
    }

    /// Advance one step and return the rotation delta, in degrees, the
    /// presentation layer should apply to the tool sprite this tick.
    pub fn advance(&mut self) -> f32 {
        let delta = match self.phase {
            SwingPhase::Raise => SWING_STEP_DEGREES,
            SwingPhase::Lower => -SWING_STEP_DEGREES,
        };
        self.step += 1;
        if self.step >= self.steps_per_phase {
            self.step = 0;
            self.phase = match self.phase {
                SwingPhase::Raise => SwingPhase::Lower,
                SwingPhase::Lower => SwingPhase::Raise,
            };
        }
        delta
    }
}
