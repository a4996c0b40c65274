//! Centralized balance and tuning constants for Hatchling game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Movement tuning ----------------------------------------------------------
pub(crate) const BASE_MOVEMENT_SPEED: f32 = 3.0;
pub(crate) const SPRINT_MULTIPLIER: f32 = 1.8;
pub(crate) const CROUCH_MULTIPLIER: f32 = 0.45;

// Sprint budget ------------------------------------------------------------
pub(crate) const SPRINT_MAX: f32 = 100.0;
pub(crate) const SPRINT_MIN: f32 = 10.0;
pub(crate) const SPRINT_USAGE_PER_TICK: f32 = 0.8;
pub(crate) const SPRINT_REGAIN_PER_TICK: f32 = 0.25;

// Gather swing tuning ------------------------------------------------------
pub(crate) const AXE_SWING_STEPS: u32 = 35;
pub(crate) const PICKAXE_SWING_STEPS: u32 = 20;
pub(crate) const SWING_STEP_DEGREES: f32 = 2.0;

// Repair cost escalation ---------------------------------------------------
pub(crate) const REPAIR_BASE_COST: u32 = 2;
pub(crate) const REPAIR_COST_INCREMENT: u32 = 1;

// Crack meter --------------------------------------------------------------
pub(crate) const CRACK_HEALTH_MAX: u8 = 7;

// Tool presentation --------------------------------------------------------
// Hand anchor offsets and swing pivot, mirrored for left-facing sprites.
pub(crate) const TOOL_OFFSET_LEFT: [f32; 3] = [-0.2, -0.1, -5.0];
pub(crate) const TOOL_OFFSET_DEFAULT: [f32; 3] = [0.15, -0.115, -5.0];
pub(crate) const TOOL_REST_ROTATION_DEGREES: f32 = 100.0;
