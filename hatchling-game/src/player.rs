//! The player orchestrator: movement and facing, the sprint budget,
//! tool slots and equipped instances, gather-target tracking, and the
//! gather action state machine.
//!
//! Action legality per tick is mutually exclusive: UI interaction
//! suppresses everything else, gathering rejects movement, and the
//! remaining case is free roaming.
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    BASE_MOVEMENT_SPEED, CROUCH_MULTIPLIER, SPRINT_MAX, SPRINT_MIN, SPRINT_MULTIPLIER,
    SPRINT_REGAIN_PER_TICK, SPRINT_USAGE_PER_TICK, TOOL_OFFSET_DEFAULT, TOOL_OFFSET_LEFT,
    TOOL_REST_ROTATION_DEGREES,
};
use crate::gather::SwingSequence;
use crate::input::InputFrame;
use crate::resources::ResourceLedger;
use crate::tools::{ActiveSlot, RepairManager, ToolInstance, ToolKind, ToolRegistry, UseOutcome};
use crate::world::{CollisionView, GatherTarget, TargetId};

/// Cardinal facing of the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Body sprite for this facing.
    #[must_use]
    pub const fn sprite_key(self) -> &'static str {
        match self {
            Self::Up => "look_up",
            Self::Down => "look_down",
            Self::Left => "look_left",
            Self::Right => "look_right",
        }
    }

    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::Left)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation transform for the held tool, a pure function of facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolPose {
    pub offset: [f32; 3],
    pub rotation_degrees: f32,
    pub flip_y: bool,
}

const fn pose_for(facing: Facing) -> ToolPose {
    if facing.is_left() {
        ToolPose {
            offset: TOOL_OFFSET_LEFT,
            rotation_degrees: TOOL_REST_ROTATION_DEGREES,
            flip_y: false,
        }
    } else {
        ToolPose {
            offset: TOOL_OFFSET_DEFAULT,
            rotation_degrees: TOOL_REST_ROTATION_DEGREES,
            flip_y: true,
        }
    }
}

/// Mutually exclusive action mode for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    Roaming,
    Gathering,
    UiInteracting,
}

/// Displacement request produced by one tick of movement, in world
/// units. Position integration is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Movement {
    pub dx: f32,
    pub dy: f32,
}

impl Movement {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Player runtime state and the transitions over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStateMachine {
    facing: Facing,
    sprint: f32,
    slot: ActiveSlot,
    axe: Option<ToolInstance>,
    pickaxe: Option<ToolInstance>,
    gather_target: Option<GatherTarget>,
    swing: Option<SwingSequence>,
    is_gathering: bool,
    inventory_open: bool,
}

impl PlayerStateMachine {
    /// Fresh player with both tool instances instantiated at the
    /// registry's current tiers and a full sprint budget.
    #[must_use]
    pub fn new(registry: &ToolRegistry) -> Self {
        let instance = |kind: ToolKind| {
            let index = registry.tier_index(kind);
            ToolInstance::from_tier(kind, index, registry.current_tier(kind))
        };
        Self {
            facing: Facing::default(),
            sprint: SPRINT_MAX,
            slot: ActiveSlot::Hands,
            axe: Some(instance(ToolKind::Axe)),
            pickaxe: Some(instance(ToolKind::Pickaxe)),
            gather_target: None,
            swing: None,
            is_gathering: false,
            inventory_open: false,
        }
    }

    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    #[must_use]
    pub const fn sprint(&self) -> f32 {
        self.sprint
    }

    #[must_use]
    pub const fn active_slot(&self) -> ActiveSlot {
        self.slot
    }

    #[must_use]
    pub const fn is_gathering(&self) -> bool {
        self.is_gathering
    }

    #[must_use]
    pub const fn inventory_open(&self) -> bool {
        self.inventory_open
    }

    #[must_use]
    pub const fn gather_target(&self) -> Option<GatherTarget> {
        self.gather_target
    }

    #[must_use]
    pub const fn mode(&self) -> PlayerMode {
        if self.inventory_open {
            PlayerMode::UiInteracting
        } else if self.is_gathering {
            PlayerMode::Gathering
        } else {
            PlayerMode::Roaming
        }
    }

    #[must_use]
    pub const fn tool(&self, kind: ToolKind) -> Option<&ToolInstance> {
        match kind {
            ToolKind::Axe => self.axe.as_ref(),
            ToolKind::Pickaxe => self.pickaxe.as_ref(),
        }
    }

    fn tool_mut(&mut self, kind: ToolKind) -> Option<&mut ToolInstance> {
        match kind {
            ToolKind::Axe => self.axe.as_mut(),
            ToolKind::Pickaxe => self.pickaxe.as_mut(),
        }
    }

    /// The instance in the active slot, if the slot holds a tool that
    /// still exists.
    #[must_use]
    pub fn active_tool(&self) -> Option<&ToolInstance> {
        self.slot.tool().and_then(|kind| self.tool(kind))
    }

    /// The tool visible in the player's hand. While gathering this is
    /// the tool the swing was started with: slot switches mid-gather
    /// are accepted but have no visible effect until the swing ends.
    #[must_use]
    pub fn displayed_tool(&self) -> Option<ToolKind> {
        match &self.swing {
            Some(swing) => Some(swing.kind()),
            None => self.active_tool().map(ToolInstance::kind),
        }
    }

    /// Tool presentation transform, suppressed during the swing so the
    /// gather animation owns the sprite.
    #[must_use]
    pub fn tool_pose(&self) -> Option<ToolPose> {
        if self.is_gathering {
            None
        } else {
            Some(pose_for(self.facing))
        }
    }

    /// Switch the active slot. Always accepted; while gathering the
    /// change only becomes visible once the swing ends.
    pub fn select_slot(&mut self, slot: ActiveSlot) {
        self.slot = slot;
    }

    // Movement --------------------------------------------------------

    /// Resolve movement for one tick: multiplier priority is crouch,
    /// then sprint (budget permitting), then base speed. Directions are
    /// evaluated up/down/right/left; facing follows the last direction
    /// moved. Rejected entirely while gathering.
    pub fn control_movement(
        &mut self,
        input: &InputFrame,
        collisions: CollisionView,
        dt: f32,
    ) -> Movement {
        if self.is_gathering {
            return Movement::ZERO;
        }

        let mut sprinted = false;
        let multiplier = if input.crouch_held {
            CROUCH_MULTIPLIER
        } else if input.sprint_held && self.sprint >= SPRINT_MIN {
            self.sprint -= SPRINT_USAGE_PER_TICK;
            sprinted = true;
            SPRINT_MULTIPLIER
        } else {
            1.0
        };

        let movement = self.step(input, collisions, multiplier, dt);

        if !sprinted {
            self.sprint = (self.sprint + SPRINT_REGAIN_PER_TICK).min(SPRINT_MAX);
        }
        movement
    }

    fn step(
        &mut self,
        input: &InputFrame,
        collisions: CollisionView,
        multiplier: f32,
        dt: f32,
    ) -> Movement {
        let stride = BASE_MOVEMENT_SPEED * multiplier * dt;
        let mut movement = Movement::ZERO;

        if input.up_held && !collisions.up {
            movement.dy += stride;
            self.facing = Facing::Up;
        }
        if input.down_held && !collisions.down {
            movement.dy -= stride;
            self.facing = Facing::Down;
        }
        if input.right_held && !collisions.right {
            movement.dx += stride;
            self.facing = Facing::Right;
        }
        if input.left_held && !collisions.left {
            movement.dx -= stride;
            self.facing = Facing::Left;
        }
        movement
    }

    // Gather-target tracking ------------------------------------------

    /// Proximity enter: the first zone entered wins; overlapping zones
    /// do not override an existing target.
    pub fn zone_entered(&mut self, target: GatherTarget) {
        if self.gather_target.is_none() {
            self.gather_target = Some(target);
        }
    }

    /// Proximity exit clears the target unconditionally, without
    /// checking which zone is leaving. Overlapping zones can therefore
    /// clear a target set by a different, still-active zone.
    pub fn zone_left(&mut self, _id: TargetId) {
        self.gather_target = None;
    }

    // Gathering -------------------------------------------------------

    /// Attempt to start gathering. Requires an equipped tool matching
    /// the target's required kind. On success the target is consumed,
    /// the gathering flag is raised, and a swing sequence begins; the
    /// returned target tells the caller which harvest is now pending.
    pub fn try_start_gather(&mut self) -> Option<GatherTarget> {
        let target = self.gather_target?;
        let tool = self.active_tool()?;
        if tool.kind() != target.required_tool {
            return None;
        }
        let kind = tool.kind();
        self.gather_target = None;
        self.is_gathering = true;
        self.swing = Some(SwingSequence::for_tool(kind));
        debug!("gathering started with {kind}");
        Some(target)
    }

    /// Advance the in-flight swing one step. Returns the rotation delta
    /// for the presentation layer, or `None` when not gathering.
    pub fn advance_swing(&mut self) -> Option<f32> {
        if !self.is_gathering {
            return None;
        }
        self.swing.as_mut().map(SwingSequence::advance)
    }

    /// Complete the gather action on the external completion signal.
    /// Durability is decremented on the tool that performed the swing;
    /// a break clears the active slot.
    pub fn finish_gather(&mut self) -> Option<(ToolKind, UseOutcome)> {
        let swing = self.swing.take()?;
        self.is_gathering = false;
        let kind = swing.kind();
        let outcome = self.tool_mut(kind)?.on_use();
        if outcome == UseOutcome::Broke {
            self.destroy_tool(kind);
        }
        Some((kind, outcome))
    }

    /// Cancel any in-flight gather without a durability decrement
    /// (biome-advance path). Clears both the flag and the swing so no
    /// dangling sequence survives.
    pub fn cancel_gather(&mut self) {
        self.swing = None;
        self.is_gathering = false;
    }

    fn destroy_tool(&mut self, kind: ToolKind) {
        match kind {
            ToolKind::Axe => self.axe = None,
            ToolKind::Pickaxe => self.pickaxe = None,
        }
        self.slot = ActiveSlot::Hands;
    }

    // Upgrades and repair ---------------------------------------------

    /// Shared affordance/hotkey predicate for upgrading the active tool.
    #[must_use]
    pub fn can_upgrade(&self, registry: &ToolRegistry, ledger: &ResourceLedger) -> bool {
        match self.active_tool() {
            Some(tool) => registry.can_upgrade(tool.kind(), ledger),
            None => false,
        }
    }

    /// Upgrade the active tool, replacing its instance with one at the
    /// new tier's full durability. No-op when the predicate fails.
    pub fn upgrade(&mut self, registry: &mut ToolRegistry, ledger: &mut ResourceLedger) -> bool {
        let Some(kind) = self.active_tool().map(ToolInstance::kind) else {
            return false;
        };
        if !registry.commit_upgrade(kind, ledger) {
            return false;
        }
        let index = registry.tier_index(kind);
        let replacement = ToolInstance::from_tier(kind, index, registry.current_tier(kind));
        match kind {
            ToolKind::Axe => self.axe = Some(replacement),
            ToolKind::Pickaxe => self.pickaxe = Some(replacement),
        }
        true
    }

    /// Shared affordance/hotkey predicate for repairing the active
    /// tool: it must exist, be worn, and the ledger must cover the
    /// current requirement in the tool's material.
    #[must_use]
    pub fn can_repair(
        &self,
        registry: &ToolRegistry,
        repairs: &RepairManager,
        ledger: &ResourceLedger,
    ) -> bool {
        let Some(tool) = self.active_tool() else {
            return false;
        };
        if !tool.is_worn() {
            return false;
        }
        let material = registry.material_of(tool.kind());
        ledger.get(material) >= repairs.requirement(material)
    }

    /// Repair the active tool at the validated price, then escalate the
    /// requirement for the next repair of that material. No-op when the
    /// predicate fails.
    pub fn repair(
        &mut self,
        registry: &ToolRegistry,
        repairs: &mut RepairManager,
        ledger: &mut ResourceLedger,
    ) -> bool {
        if !self.can_repair(registry, repairs, ledger) {
            return false;
        }
        let Some(kind) = self.active_tool().map(ToolInstance::kind) else {
            return false;
        };
        let material = registry.material_of(kind);
        let price = repairs.requirement(material);
        repairs.escalate(material);
        if let Some(tool) = self.tool_mut(kind) {
            tool.repair();
        }
        ledger.spend(material, price);
        debug!("repaired {kind} for {price} {material}");
        true
    }

    // Inventory UI ----------------------------------------------------

    /// Toggle the inventory screen; returns true when it is now open.
    pub fn toggle_inventory(&mut self) -> bool {
        self.inventory_open = !self.inventory_open;
        self.inventory_open
    }
}
