//! Resource kinds, the run ledger, and gather yield ranges.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every resource the world can yield. The set is closed; score weights
/// and material lookups match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Wood,
    Coal,
    Bronze,
    Iron,
    Diamond,
    Emerald,
    Ruby,
    Leaf,
    Rock,
}

impl ResourceKind {
    pub const ALL: [Self; 9] = [
        Self::Wood,
        Self::Coal,
        Self::Bronze,
        Self::Iron,
        Self::Diamond,
        Self::Emerald,
        Self::Ruby,
        Self::Leaf,
        Self::Rock,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Fixed scoring weight applied per unit held at run end.
    #[must_use]
    pub const fn score_weight(self) -> i64 {
        match self {
            Self::Wood => 1,
            Self::Coal => 2,
            Self::Bronze => 3,
            Self::Iron => 5,
            Self::Diamond => 7,
            Self::Emerald => 9,
            Self::Ruby => 11,
            Self::Leaf => 2,
            Self::Rock => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Coal => "coal",
            Self::Bronze => "bronze",
            Self::Iron => "iron",
            Self::Diamond => "diamond",
            Self::Emerald => "emerald",
            Self::Ruby => "ruby",
            Self::Leaf => "leaf",
            Self::Rock => "rock",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wood" => Ok(Self::Wood),
            "coal" => Ok(Self::Coal),
            "bronze" => Ok(Self::Bronze),
            "iron" => Ok(Self::Iron),
            "diamond" => Ok(Self::Diamond),
            "emerald" => Ok(Self::Emerald),
            "ruby" => Ok(Self::Ruby),
            "leaf" => Ok(Self::Leaf),
            "rock" => Ok(Self::Rock),
            _ => Err(()),
        }
    }
}

/// Inclusive amount range rolled when a gatherable is harvested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldRange {
    pub min: u32,
    pub max: u32,
}

impl YieldRange {
    #[must_use]
    pub const fn fixed(amount: u32) -> Self {
        Self {
            min: amount,
            max: amount,
        }
    }

    /// Roll an amount inside the range.
    pub fn roll<R: Rng>(self, rng: &mut R) -> u32 {
        if self.min >= self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Per-kind resource counts for one run.
///
/// Spend operations are preconditioned by a sufficiency check performed by
/// the caller; the ledger itself does not clamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceLedger {
    counts: [u32; ResourceKind::COUNT],
}

impl ResourceLedger {
    /// Fresh ledger with every kind at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        self.counts[kind.index()] += amount;
    }

    /// Decrement a count. The caller must have verified
    /// `amount <= get(kind)`; violating that is a contract bug.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) {
        debug_assert!(
            amount <= self.counts[kind.index()],
            "spend of {amount} {kind} exceeds held {}",
            self.counts[kind.index()]
        );
        self.counts[kind.index()] -= amount;
    }

    /// Weighted sum over all held resources.
    #[must_use]
    pub fn score(&self) -> i64 {
        ResourceKind::ALL
            .iter()
            .map(|kind| kind.score_weight() * i64::from(self.get(*kind)))
            .sum()
    }

    /// Snapshot of every kind and its count, for the UI synchronize pull.
    pub fn counts(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn ledger_starts_empty_and_tracks_net_sums() {
        let mut ledger = ResourceLedger::new();
        for (_, count) in ledger.counts() {
            assert_eq!(count, 0);
        }

        ledger.add(ResourceKind::Wood, 7);
        ledger.add(ResourceKind::Wood, 3);
        ledger.spend(ResourceKind::Wood, 4);
        assert_eq!(ledger.get(ResourceKind::Wood), 6);
        assert_eq!(ledger.get(ResourceKind::Coal), 0);
    }

    #[test]
    fn score_is_linear_in_added_amounts() {
        let mut ledger = ResourceLedger::new();
        let before = ledger.score();
        ledger.add(ResourceKind::Ruby, 3);
        assert_eq!(
            ledger.score(),
            before + ResourceKind::Ruby.score_weight() * 3
        );
    }

    #[test]
    fn score_matches_weight_table() {
        let mut ledger = ResourceLedger::new();
        ledger.add(ResourceKind::Wood, 5);
        ledger.add(ResourceKind::Coal, 2);
        assert_eq!(ledger.score(), 5 + 2 * 2);
    }

    #[test]
    fn yield_roll_stays_inside_inclusive_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let range = YieldRange { min: 2, max: 5 };
        for _ in 0..200 {
            let rolled = range.roll(&mut rng);
            assert!((2..=5).contains(&rolled));
        }
        assert_eq!(YieldRange::fixed(3).roll(&mut rng), 3);
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("obsidian".parse::<ResourceKind>().is_err());
    }
}
