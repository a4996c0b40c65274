//! Tool kinds, upgrade tiers, the registry, equipped instances, and the
//! escalating repair cost table.
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    AXE_SWING_STEPS, PICKAXE_SWING_STEPS, REPAIR_BASE_COST, REPAIR_COST_INCREMENT,
};
use crate::resources::{ResourceKind, ResourceLedger};

/// The two harvesting tools. A gatherable names the kind required to
/// harvest it; the bare-handed state is [`ActiveSlot::Hands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Axe,
    Pickaxe,
}

impl ToolKind {
    pub const ALL: [Self; 2] = [Self::Axe, Self::Pickaxe];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Axe => "axe",
            Self::Pickaxe => "pickaxe",
        }
    }

    /// Steps per half-swing of the gather animation.
    #[must_use]
    pub(crate) const fn swing_steps(self) -> u32 {
        match self {
            Self::Axe => AXE_SWING_STEPS,
            Self::Pickaxe => PICKAXE_SWING_STEPS,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "axe" => Ok(Self::Axe),
            "pickaxe" => Ok(Self::Pickaxe),
            _ => Err(()),
        }
    }
}

/// The player's active tool slot. Hotkeys 0/1/2 select these in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSlot {
    #[default]
    Hands,
    Axe,
    Pickaxe,
}

impl ActiveSlot {
    /// The tool kind held in this slot, if any.
    #[must_use]
    pub const fn tool(self) -> Option<ToolKind> {
        match self {
            Self::Hands => None,
            Self::Axe => Some(ToolKind::Axe),
            Self::Pickaxe => Some(ToolKind::Pickaxe),
        }
    }

    /// Map a numeric select key (0/1/2) to a slot.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Hands),
            1 => Some(Self::Axe),
            2 => Some(Self::Pickaxe),
            _ => None,
        }
    }
}

/// Cost to advance out of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCost {
    pub kind: ResourceKind,
    pub amount: u32,
}

/// One discrete upgrade level of a tool kind.
///
/// `upgrade_cost` is the cost to leave this tier, so the terminal tier
/// carries `None`. `material` names the resource the tier's tool is made
/// of and is the repair currency for tools at this tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTier {
    pub material: ResourceKind,
    pub durability: u32,
    pub upgrade_cost: Option<UpgradeCost>,
}

pub type TierTable = SmallVec<[UpgradeTier; 6]>;

const fn tier(
    material: ResourceKind,
    durability: u32,
    upgrade_cost: Option<UpgradeCost>,
) -> UpgradeTier {
    UpgradeTier {
        material,
        durability,
        upgrade_cost,
    }
}

const fn cost(kind: ResourceKind, amount: u32) -> Option<UpgradeCost> {
    Some(UpgradeCost { kind, amount })
}

/// Maps each tool kind to its ordered upgrade tiers and tracks the
/// current tier index per kind. Tier indices start at zero and advance
/// only through [`ToolRegistry::commit_upgrade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRegistry {
    axe_tiers: TierTable,
    pickaxe_tiers: TierTable,
    axe_level: usize,
    pickaxe_level: usize,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_standard_tiers()
    }
}

impl ToolRegistry {
    /// Build a registry from explicit tier tables. Both tables must be
    /// non-empty; an empty table is a content-authoring error.
    #[must_use]
    pub fn new(axe_tiers: TierTable, pickaxe_tiers: TierTable) -> Self {
        assert!(
            !axe_tiers.is_empty() && !pickaxe_tiers.is_empty(),
            "tool tier tables must not be empty"
        );
        Self {
            axe_tiers,
            pickaxe_tiers,
            axe_level: 0,
            pickaxe_level: 0,
        }
    }

    /// The standard bronze-through-ruby progression.
    #[must_use]
    pub fn with_standard_tiers() -> Self {
        let axe_tiers = TierTable::from_slice(&[
            tier(ResourceKind::Bronze, 30, cost(ResourceKind::Wood, 10)),
            tier(ResourceKind::Iron, 45, cost(ResourceKind::Coal, 8)),
            tier(ResourceKind::Diamond, 60, cost(ResourceKind::Iron, 6)),
            tier(ResourceKind::Emerald, 80, cost(ResourceKind::Diamond, 5)),
            tier(ResourceKind::Ruby, 100, None),
        ]);
        let pickaxe_tiers = TierTable::from_slice(&[
            tier(ResourceKind::Bronze, 25, cost(ResourceKind::Rock, 12)),
            tier(ResourceKind::Iron, 40, cost(ResourceKind::Coal, 8)),
            tier(ResourceKind::Diamond, 55, cost(ResourceKind::Iron, 6)),
            tier(ResourceKind::Emerald, 75, cost(ResourceKind::Diamond, 5)),
            tier(ResourceKind::Ruby, 95, None),
        ]);
        Self::new(axe_tiers, pickaxe_tiers)
    }

    const fn tiers(&self, kind: ToolKind) -> &TierTable {
        match kind {
            ToolKind::Axe => &self.axe_tiers,
            ToolKind::Pickaxe => &self.pickaxe_tiers,
        }
    }

    #[must_use]
    pub const fn tier_index(&self, kind: ToolKind) -> usize {
        match kind {
            ToolKind::Axe => self.axe_level,
            ToolKind::Pickaxe => self.pickaxe_level,
        }
    }

    #[must_use]
    pub fn tier_count(&self, kind: ToolKind) -> usize {
        self.tiers(kind).len()
    }

    /// The tier the given kind currently sits at.
    #[must_use]
    pub fn current_tier(&self, kind: ToolKind) -> &UpgradeTier {
        &self.tiers(kind)[self.tier_index(kind)]
    }

    /// Repair currency for tools of this kind at their current tier.
    #[must_use]
    pub fn material_of(&self, kind: ToolKind) -> ResourceKind {
        self.current_tier(kind).material
    }

    /// True when a next tier exists and the ledger covers the current
    /// tier's listed upgrade cost.
    #[must_use]
    pub fn can_upgrade(&self, kind: ToolKind, ledger: &ResourceLedger) -> bool {
        if self.tier_index(kind) + 1 >= self.tier_count(kind) {
            return false;
        }
        match self.current_tier(kind).upgrade_cost {
            Some(cost) => ledger.get(cost.kind) >= cost.amount,
            None => false,
        }
    }

    /// Spend the current tier's cost and advance one tier. Silently a
    /// no-op when [`Self::can_upgrade`] does not hold; callers drive UI
    /// affordances from the same predicate.
    pub fn commit_upgrade(&mut self, kind: ToolKind, ledger: &mut ResourceLedger) -> bool {
        if !self.can_upgrade(kind, ledger) {
            return false;
        }
        let Some(cost) = self.current_tier(kind).upgrade_cost else {
            return false;
        };
        ledger.spend(cost.kind, cost.amount);
        match kind {
            ToolKind::Axe => self.axe_level += 1,
            ToolKind::Pickaxe => self.pickaxe_level += 1,
        }
        debug!(
            "upgraded {kind} to tier {} for {} {}",
            self.tier_index(kind),
            cost.amount,
            cost.kind
        );
        true
    }
}

/// Result of one completed use of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    Intact,
    /// Durability hit zero; the instance is spent and the owner must
    /// clear its active slot.
    Broke,
}

/// Runtime state of one equipped tool. Created at its tier's full
/// durability and replaced wholesale on upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInstance {
    kind: ToolKind,
    tier_index: usize,
    max_durability: u32,
    durability: u32,
}

impl ToolInstance {
    #[must_use]
    pub fn from_tier(kind: ToolKind, tier_index: usize, tier: &UpgradeTier) -> Self {
        Self {
            kind,
            tier_index,
            max_durability: tier.durability,
            durability: tier.durability,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ToolKind {
        self.kind
    }

    #[must_use]
    pub const fn tier_index(&self) -> usize {
        self.tier_index
    }

    #[must_use]
    pub const fn durability(&self) -> u32 {
        self.durability
    }

    #[must_use]
    pub const fn max_durability(&self) -> u32 {
        self.max_durability
    }

    /// True when the instance has taken any wear.
    #[must_use]
    pub const fn is_worn(&self) -> bool {
        self.durability < self.max_durability
    }

    /// Reset durability to the tier maximum. The caller must already
    /// have validated and spent the repair cost.
    pub fn repair(&mut self) {
        self.durability = self.max_durability;
    }

    /// Decrement durability after a completed gather action.
    pub fn on_use(&mut self) -> UseOutcome {
        self.durability = self.durability.saturating_sub(1);
        if self.durability == 0 {
            debug!("{} broke", self.kind);
            UseOutcome::Broke
        } else {
            UseOutcome::Intact
        }
    }
}

/// Escalating repair price per resource kind. Each successful repair of
/// a kind's tool bumps that kind's requirement by a fixed increment;
/// the bump is never reverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepairManager {
    repairs: [u32; ResourceKind::COUNT],
}

impl RepairManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current price of a repair paid in `kind`.
    #[must_use]
    pub const fn requirement(&self, kind: ResourceKind) -> u32 {
        REPAIR_BASE_COST + self.repairs[kind as usize] * REPAIR_COST_INCREMENT
    }

    /// Record one successful repair. Must be called exactly once per
    /// repair, before the spend.
    pub fn escalate(&mut self, kind: ResourceKind) {
        self.repairs[kind as usize] += 1;
    }
}
