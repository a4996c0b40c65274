//! One playable session: the player, economy, and lifecycle wired
//! together over injected world and score-store collaborators, driven
//! by a fixed per-tick sub-order.
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::ScoreStore;
use crate::error::{GameError, GameResult};
use crate::health::{CrackMeter, CrackUpdate};
use crate::input::InputFrame;
use crate::lifecycle::{GameOverSummary, LifecycleStep, RunLifecycle};
use crate::player::{Movement, PlayerStateMachine};
use crate::resources::{ResourceKind, ResourceLedger};
use crate::tools::{RepairManager, ToolRegistry, UseOutcome};
use crate::world::{
    Biome, GatherTarget, GatherableSpec, MarkerId, TargetId, WorldGenerator, WorldView,
    validate_content,
};

/// What one tick resolved to, beyond ordinary play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Continue,
    FalloutTriggered(MarkerId),
    BiomeAdvanced(Biome),
    GameOver(GameOverSummary),
    /// The run already ended; the tick processed nothing.
    Halted,
    /// The crack meter hit zero. Irrecoverable: the host must stop the
    /// whole process, and no score is recorded.
    HardStop,
}

/// Everything the presentation layer needs from one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub movement: Movement,
    /// Damage overlay sprite to show, if the shell is cracked.
    pub overlay: Option<&'static str>,
    /// Rotation delta for the held tool while a swing is in flight.
    pub swing_delta: Option<f32>,
    /// Resources credited by a gather completed this tick.
    pub harvested: Vec<(ResourceKind, u32)>,
    pub can_upgrade: bool,
    pub can_repair: bool,
    /// Ledger snapshot delivered when the inventory screen opens.
    pub inventory: Option<Vec<(ResourceKind, u32)>>,
}

impl TickReport {
    fn quiet(outcome: TickOutcome, overlay: Option<&'static str>) -> Self {
        Self {
            outcome,
            movement: Movement::ZERO,
            overlay,
            swing_delta: None,
            harvested: Vec::new(),
            can_upgrade: false,
            can_repair: false,
            inventory: None,
        }
    }
}

/// Serializable snapshot of everything that outlives a tick. Tool tiers
/// ride along in the registry, so progression can persist across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub ledger: ResourceLedger,
    pub registry: ToolRegistry,
    pub repairs: RepairManager,
    pub player: PlayerStateMachine,
    pub cracks: CrackMeter,
    pub lifecycle: RunLifecycle,
}

/// The assembled gameplay core. Collaborators are injected at
/// construction; the session never discovers them at runtime.
pub struct GameSession<W, S>
where
    W: WorldGenerator,
    S: ScoreStore,
{
    world: W,
    store: S,
    content: Vec<GatherableSpec>,
    ledger: ResourceLedger,
    registry: ToolRegistry,
    repairs: RepairManager,
    player: PlayerStateMachine,
    cracks: CrackMeter,
    lifecycle: RunLifecycle,
    rng: ChaCha20Rng,
    /// Content index of the gather currently in flight.
    pending_harvest: Option<usize>,
}

impl<W, S> GameSession<W, S>
where
    W: WorldGenerator,
    S: ScoreStore,
{
    /// Assemble a session over validated content. The best score is
    /// read up front; an absent record is a first run, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the content fails validation or the score
    /// store cannot be read.
    pub fn new(world: W, store: S, content: Vec<GatherableSpec>, seed: u64) -> GameResult<Self> {
        validate_content(&content)?;
        let best = store
            .load_best()
            .map_err(|e| GameError::ScoreStore(anyhow::Error::new(e)))?
            .unwrap_or(0);
        let registry = ToolRegistry::with_standard_tiers();
        let player = PlayerStateMachine::new(&registry);
        Ok(Self {
            world,
            store,
            content,
            ledger: ResourceLedger::new(),
            registry,
            repairs: RepairManager::new(),
            player,
            cracks: CrackMeter::new(),
            lifecycle: RunLifecycle::new(best),
            rng: ChaCha20Rng::seed_from_u64(seed),
            pending_harvest: None,
        })
    }

    #[must_use]
    pub const fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn player(&self) -> &PlayerStateMachine {
        &self.player
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &RunLifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub const fn cracks(&self) -> &CrackMeter {
        &self.cracks
    }

    #[must_use]
    pub const fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the injected world collaborator, for hosts
    /// that drive its state between ticks.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    #[must_use]
    pub fn content(&self) -> &[GatherableSpec] {
        &self.content
    }

    /// Proximity enter for a tagged gatherable zone.
    pub fn zone_entered(&mut self, target: GatherTarget) {
        self.player.zone_entered(target);
    }

    /// Proximity exit for a tagged gatherable zone.
    pub fn zone_left(&mut self, id: TargetId) {
        self.player.zone_left(id);
    }

    /// Apply shell damage from an external hazard.
    pub fn damage(&mut self, amount: u8) {
        self.cracks.damage(amount);
    }

    /// Run one simulation tick in the fixed sub-order: cracks, then
    /// movement, tool switch and display, gathering, upgrade/repair
    /// affordances and hotkeys, inventory toggle, and finally the
    /// world-lifecycle check.
    ///
    /// # Errors
    ///
    /// Returns an error when the score store rejects a best-score
    /// update at run end.
    pub fn tick(
        &mut self,
        input: &InputFrame,
        view: &WorldView,
        dt: f32,
    ) -> anyhow::Result<TickReport> {
        let overlay = match self.cracks.evaluate() {
            CrackUpdate::Shattered => {
                return Ok(TickReport::quiet(TickOutcome::HardStop, None));
            }
            CrackUpdate::Intact => None,
            CrackUpdate::Overlay(sprite) => Some(sprite),
        };

        if !self.lifecycle.is_active() {
            return Ok(TickReport::quiet(TickOutcome::Halted, overlay));
        }

        let mut report = TickReport::quiet(TickOutcome::Continue, overlay);
        let ui_open = self.player.inventory_open();

        if ui_open {
            // Affordances stay hidden while another UI screen is up.
            report.can_upgrade = false;
            report.can_repair = false;
        } else {
            report.movement = self.player.control_movement(input, view.collisions, dt);

            if let Some(slot) = input.select_slot {
                self.player.select_slot(slot);
            }

            if view.gather_finished && self.player.is_gathering() {
                self.complete_gather(&mut report);
            }
            if input.gather_pressed
                && let Some(target) = self.player.try_start_gather()
            {
                self.pending_harvest = Some(target.spec);
            }
            report.swing_delta = self.player.advance_swing();

            // One predicate drives both the visible affordance and the
            // hotkey guard.
            report.can_upgrade = self.player.can_upgrade(&self.registry, &self.ledger);
            if input.upgrade_pressed && report.can_upgrade {
                self.player.upgrade(&mut self.registry, &mut self.ledger);
            }
            report.can_repair = self
                .player
                .can_repair(&self.registry, &self.repairs, &self.ledger);
            if input.repair_pressed && report.can_repair {
                self.player
                    .repair(&self.registry, &mut self.repairs, &mut self.ledger);
            }
        }

        // The toggle also closes an open inventory, so it runs in both
        // branches.
        if input.toggle_inventory_pressed && self.player.toggle_inventory() {
            report.inventory = Some(self.ledger.counts().collect());
        }

        if !ui_open {
            match self.lifecycle.check(
                view.watched_marker,
                &self.ledger,
                &mut self.world,
                &mut self.store,
            )? {
                LifecycleStep::Idle => {}
                LifecycleStep::FalloutTriggered(marker) => {
                    report.outcome = TickOutcome::FalloutTriggered(marker);
                }
                LifecycleStep::BiomeAdvanced(biome) => {
                    self.player.cancel_gather();
                    self.pending_harvest = None;
                    report.outcome = TickOutcome::BiomeAdvanced(biome);
                }
                LifecycleStep::RunEnded(summary) => {
                    report.outcome = TickOutcome::GameOver(summary);
                }
            }
        }

        Ok(report)
    }

    fn complete_gather(&mut self, report: &mut TickReport) {
        let Some((kind, outcome)) = self.player.finish_gather() else {
            return;
        };
        if let Some(spec_index) = self.pending_harvest.take() {
            let spec = &self.content[spec_index];
            for (resource, range) in &spec.yields {
                let amount = range.roll(&mut self.rng);
                self.ledger.add(*resource, amount);
                report.harvested.push((*resource, amount));
            }
            debug!("harvest of '{}' complete with {kind}", spec.name);
        }
        if outcome == UseOutcome::Broke {
            debug!("{kind} spent after harvest");
        }
    }

    /// Start a new run after game over. The ledger, repair costs, crack
    /// meter, and player reset; tool tiers persist in the registry and
    /// the best score is reloaded from the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the score store cannot be read.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        let best = self.store.load_best()?.unwrap_or(0);
        self.ledger = ResourceLedger::new();
        self.repairs = RepairManager::new();
        self.cracks = CrackMeter::new();
        self.player = PlayerStateMachine::new(&self.registry);
        self.pending_harvest = None;
        self.lifecycle.reset(best);
        Ok(())
    }

    /// Snapshot everything that outlives a tick.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            ledger: self.ledger.clone(),
            registry: self.registry.clone(),
            repairs: self.repairs.clone(),
            player: self.player.clone(),
            cracks: self.cracks,
            lifecycle: self.lifecycle.clone(),
        }
    }

    /// Rebuild a session from a persisted snapshot over fresh
    /// collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error when the content fails validation.
    pub fn from_snapshot(
        world: W,
        store: S,
        content: Vec<GatherableSpec>,
        seed: u64,
        snapshot: RunSnapshot,
    ) -> GameResult<Self> {
        validate_content(&content)?;
        Ok(Self {
            world,
            store,
            content,
            ledger: snapshot.ledger,
            registry: snapshot.registry,
            repairs: snapshot.repairs,
            player: snapshot.player,
            cracks: snapshot.cracks,
            lifecycle: snapshot.lifecycle,
            rng: ChaCha20Rng::seed_from_u64(seed),
            pending_harvest: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::YieldRange;
    use crate::tools::{ActiveSlot, ToolKind};
    use std::convert::Infallible;

    #[derive(Default)]
    struct ScriptedWorld {
        fallouts: Vec<MarkerId>,
        generated: Vec<Biome>,
        cleans: u32,
        end_run: bool,
    }

    impl WorldGenerator for ScriptedWorld {
        fn clean(&mut self) {
            self.cleans += 1;
        }

        fn should_end_run(&self) -> bool {
            self.end_run
        }

        fn next_biome(&self, current: Biome) -> Biome {
            current.successor()
        }

        fn generate(&mut self, biome: Biome) {
            self.generated.push(biome);
        }

        fn fallout(&mut self, marker: MarkerId) {
            self.fallouts.push(marker);
        }
    }

    #[derive(Default)]
    struct MemoryScores {
        best: Option<i64>,
    }

    impl ScoreStore for MemoryScores {
        type Error = Infallible;

        fn load_best(&self) -> Result<Option<i64>, Self::Error> {
            Ok(self.best)
        }

        fn save_best(&mut self, score: i64) -> Result<(), Self::Error> {
            self.best = Some(score);
            Ok(())
        }
    }

    fn content() -> Vec<GatherableSpec> {
        vec![
            GatherableSpec {
                name: "birch".into(),
                required_tool: ToolKind::Axe,
                yields: vec![(ResourceKind::Wood, YieldRange { min: 2, max: 4 })],
                animation_frames: 5,
            },
            GatherableSpec {
                name: "coal seam".into(),
                required_tool: ToolKind::Pickaxe,
                yields: vec![
                    (ResourceKind::Coal, YieldRange::fixed(2)),
                    (ResourceKind::Rock, YieldRange { min: 1, max: 2 }),
                ],
                animation_frames: 4,
            },
        ]
    }

    fn session() -> GameSession<ScriptedWorld, MemoryScores> {
        GameSession::new(ScriptedWorld::default(), MemoryScores::default(), content(), 7).unwrap()
    }

    fn watching(marker: u32) -> WorldView {
        WorldView {
            watched_marker: Some(MarkerId(marker)),
            ..WorldView::default()
        }
    }

    fn axe_target(id: u32) -> GatherTarget {
        GatherTarget {
            id: TargetId(id),
            required_tool: ToolKind::Axe,
            spec: 0,
        }
    }

    #[test]
    fn construction_rejects_invalid_content() {
        let broken = vec![GatherableSpec {
            name: "husk".into(),
            required_tool: ToolKind::Axe,
            yields: vec![],
            animation_frames: 3,
        }];
        let result =
            GameSession::new(ScriptedWorld::default(), MemoryScores::default(), broken, 0);
        assert!(result.is_err());
    }

    #[test]
    fn gather_cycle_credits_rolled_yields() {
        let mut session = session();
        session.zone_entered(axe_target(1));

        let select = InputFrame {
            select_slot: Some(ActiveSlot::Axe),
            ..InputFrame::idle()
        };
        session.tick(&select, &watching(1), 0.016).unwrap();

        let gather = InputFrame {
            gather_pressed: true,
            ..InputFrame::idle()
        };
        let report = session.tick(&gather, &watching(1), 0.016).unwrap();
        assert!(session.player().is_gathering());
        assert!(report.swing_delta.is_some());

        let finish = WorldView {
            gather_finished: true,
            ..watching(1)
        };
        let report = session.tick(&InputFrame::idle(), &finish, 0.016).unwrap();
        assert!(!session.player().is_gathering());
        assert_eq!(report.harvested.len(), 1);
        let (kind, amount) = report.harvested[0];
        assert_eq!(kind, ResourceKind::Wood);
        assert!((2..=4).contains(&amount));
        assert_eq!(session.ledger().get(ResourceKind::Wood), amount);
    }

    #[test]
    fn fallout_triggers_once_per_marker() {
        let mut session = session();
        let report = session.tick(&InputFrame::idle(), &watching(5), 0.016).unwrap();
        assert_eq!(report.outcome, TickOutcome::FalloutTriggered(MarkerId(5)));

        let report = session.tick(&InputFrame::idle(), &watching(5), 0.016).unwrap();
        assert_eq!(report.outcome, TickOutcome::Continue);
        assert_eq!(session.world().fallouts, vec![MarkerId(5)]);
    }

    #[test]
    fn biome_advance_cancels_in_flight_gather() {
        let mut session = session();
        session.zone_entered(axe_target(1));
        let select = InputFrame {
            select_slot: Some(ActiveSlot::Axe),
            gather_pressed: true,
            ..InputFrame::idle()
        };
        session.tick(&select, &watching(1), 0.016).unwrap();
        assert!(session.player().is_gathering());

        let exhausted = WorldView::default();
        let report = session.tick(&InputFrame::idle(), &exhausted, 0.016).unwrap();
        assert_eq!(report.outcome, TickOutcome::BiomeAdvanced(Biome::Summer));
        assert!(!session.player().is_gathering());
        assert!(report.harvested.is_empty());

        // the cancelled harvest never lands, even after a later finish signal
        let finish = WorldView {
            gather_finished: true,
            ..WorldView::default()
        };
        let report = session.tick(&InputFrame::idle(), &finish, 0.016).unwrap();
        assert!(report.harvested.is_empty());
        assert_eq!(session.ledger().get(ResourceKind::Wood), 0);
    }

    #[test]
    fn game_over_halts_all_further_ticks() {
        let mut session = session();
        session.ledger.add(ResourceKind::Coal, 21);
        session.world.end_run = true;

        let report = session
            .tick(&InputFrame::idle(), &WorldView::default(), 0.016)
            .unwrap();
        match report.outcome {
            TickOutcome::GameOver(summary) => {
                assert_eq!(summary.score, 42);
                assert!(summary.improved);
            }
            other => panic!("expected game over, got {other:?}"),
        }
        assert_eq!(session.store.best, Some(42));

        // nothing mutates after the terminal tick
        session.zone_entered(axe_target(1));
        let moving = InputFrame {
            up_held: true,
            gather_pressed: true,
            ..InputFrame::idle()
        };
        let report = session.tick(&moving, &WorldView::default(), 0.016).unwrap();
        assert_eq!(report.outcome, TickOutcome::Halted);
        assert!(report.movement.is_zero());
        assert!(!session.player().is_gathering());
    }

    #[test]
    fn shattered_shell_hard_stops_before_anything_else() {
        let mut session = session();
        session.damage(7);
        let report = session
            .tick(&InputFrame::idle(), &watching(1), 0.016)
            .unwrap();
        assert_eq!(report.outcome, TickOutcome::HardStop);
        assert!(session.world().fallouts.is_empty());
    }

    #[test]
    fn open_inventory_suppresses_gameplay_and_syncs_counts() {
        let mut session = session();
        session.ledger.add(ResourceKind::Wood, 3);

        let toggle = InputFrame {
            toggle_inventory_pressed: true,
            ..InputFrame::idle()
        };
        let report = session.tick(&toggle, &WorldView::default(), 0.016).unwrap();
        let counts = report.inventory.expect("inventory sync on open");
        assert!(counts.contains(&(ResourceKind::Wood, 3)));

        // while open: no movement, no lifecycle, affordances hidden
        let moving = InputFrame {
            up_held: true,
            ..InputFrame::idle()
        };
        let report = session.tick(&moving, &watching(4), 0.016).unwrap();
        assert!(report.movement.is_zero());
        assert_eq!(report.outcome, TickOutcome::Continue);
        assert!(session.world().fallouts.is_empty());
        assert!(!report.can_upgrade && !report.can_repair);

        // toggling again closes without a fresh sync
        let report = session.tick(&toggle, &WorldView::default(), 0.016).unwrap();
        assert!(report.inventory.is_none());
        assert!(!session.player().inventory_open());
    }

    #[test]
    fn upgrade_hotkey_respects_the_shared_predicate() {
        let mut session = session();
        session.ledger.add(ResourceKind::Wood, 10);

        let select = InputFrame {
            select_slot: Some(ActiveSlot::Axe),
            ..InputFrame::idle()
        };
        session.tick(&select, &watching(1), 0.016).unwrap();

        let upgrade = InputFrame {
            upgrade_pressed: true,
            ..InputFrame::idle()
        };
        let report = session.tick(&upgrade, &watching(1), 0.016).unwrap();
        assert!(report.can_upgrade);
        assert_eq!(session.registry().tier_index(ToolKind::Axe), 1);
        assert_eq!(session.ledger().get(ResourceKind::Wood), 0);

        // without funds the same hotkey is a no-op
        let report = session.tick(&upgrade, &watching(1), 0.016).unwrap();
        assert!(!report.can_upgrade);
        assert_eq!(session.registry().tier_index(ToolKind::Axe), 1);
    }

    #[test]
    fn snapshot_round_trips_and_keeps_tool_tiers() {
        let mut session = session();
        session.ledger.add(ResourceKind::Wood, 10);
        let select = InputFrame {
            select_slot: Some(ActiveSlot::Axe),
            upgrade_pressed: true,
            ..InputFrame::idle()
        };
        session.tick(&select, &watching(1), 0.016).unwrap();
        session.tick(&select, &watching(1), 0.016).unwrap();
        assert_eq!(session.registry().tier_index(ToolKind::Axe), 1);

        let encoded = serde_json::to_string(&session.snapshot()).unwrap();
        let decoded: RunSnapshot = serde_json::from_str(&encoded).unwrap();
        let restored = GameSession::from_snapshot(
            ScriptedWorld::default(),
            MemoryScores::default(),
            content(),
            7,
            decoded,
        )
        .unwrap();
        assert_eq!(restored.registry().tier_index(ToolKind::Axe), 1);
        let tool = restored.player().tool(ToolKind::Axe).unwrap();
        assert_eq!(tool.tier_index(), 1);
    }
}
