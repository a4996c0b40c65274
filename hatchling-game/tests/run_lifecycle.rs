//! Full-session scenarios: gather, upgrade, fallout, and the end of a
//! run, driven through the public tick API with scripted collaborators.
use std::convert::Infallible;

use hatchling_game::{
    ActiveSlot, Biome, GameSession, GatherTarget, GatherableSpec, InputFrame, MarkerId,
    ResourceKind, ScoreStore, TargetId, TickOutcome, ToolKind, WorldGenerator, WorldView,
    YieldRange,
};

const DT: f32 = 0.016;

#[derive(Default)]
struct ScriptedWorld {
    fallouts: Vec<MarkerId>,
    generated: Vec<Biome>,
    end_run: bool,
}

impl WorldGenerator for ScriptedWorld {
    fn clean(&mut self) {}

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
    vec![GatherableSpec {
        name: "birch".into(),
        required_tool: ToolKind::Axe,
        yields: vec![(ResourceKind::Wood, YieldRange::fixed(5))],
        animation_frames: 5,
    }]
}

fn birch_in_range(id: u32) -> GatherTarget {
    GatherTarget {
        id: TargetId(id),
        required_tool: ToolKind::Axe,
        spec: 0,
    }
}

fn harvest_one(session: &mut GameSession<ScriptedWorld, MemoryScores>, id: u32, view: &WorldView) {
    session.zone_entered(birch_in_range(id));
    let gather = InputFrame {
        gather_pressed: true,
        ..InputFrame::idle()
    };
    session.tick(&gather, view, DT).unwrap();
    assert!(session.player().is_gathering());

    let finish = WorldView {
        gather_finished: true,
        ..*view
    };
    session.tick(&InputFrame::idle(), &finish, DT).unwrap();
    assert!(!session.player().is_gathering());
}

#[test]
fn gather_upgrade_and_game_over_in_one_run() {
    let store = MemoryScores { best: Some(30) };
    let mut session = GameSession::new(ScriptedWorld::default(), store, content(), 11).unwrap();

    let view = WorldView {
        watched_marker: Some(MarkerId(1)),
        ..WorldView::default()
    };
    let select = InputFrame {
        select_slot: Some(ActiveSlot::Axe),
        ..InputFrame::idle()
    };
    session.tick(&select, &view, DT).unwrap();

    // two harvests at five wood each cover the first axe upgrade
    harvest_one(&mut session, 1, &view);
    harvest_one(&mut session, 2, &view);
    assert_eq!(session.ledger().get(ResourceKind::Wood), 10);

    let upgrade = InputFrame {
        upgrade_pressed: true,
        ..InputFrame::idle()
    };
    session.tick(&upgrade, &view, DT).unwrap();
    assert_eq!(session.registry().tier_index(ToolKind::Axe), 1);
    assert_eq!(session.ledger().get(ResourceKind::Wood), 0);

    // one more harvest, then the world runs out
    harvest_one(&mut session, 3, &view);
    assert_eq!(session.ledger().score(), 5);

    session.world_mut().end_run = true;
    let report = session
        .tick(&InputFrame::idle(), &WorldView::default(), DT)
        .unwrap();
    match report.outcome {
        TickOutcome::GameOver(summary) => {
            assert_eq!(summary.score, 5);
            assert_eq!(summary.best, 30);
            assert!(!summary.improved);
        }
        other => panic!("expected game over, got {other:?}"),
    }
}

#[test]
fn fallout_markers_trigger_exactly_once_across_ticks() {
    let mut session =
        GameSession::new(ScriptedWorld::default(), MemoryScores::default(), content(), 3).unwrap();

    for marker in [4u32, 4, 9, 9, 4] {
        let view = WorldView {
            watched_marker: Some(MarkerId(marker)),
            ..WorldView::default()
        };
        session.tick(&InputFrame::idle(), &view, DT).unwrap();
    }
    assert_eq!(session.world().fallouts, vec![MarkerId(4), MarkerId(9)]);
}

#[test]
fn exhausted_world_cycles_biomes_until_the_end_check_fires() {
    let mut session =
        GameSession::new(ScriptedWorld::default(), MemoryScores::default(), content(), 3).unwrap();

    let exhausted = WorldView::default();
    let report = session.tick(&InputFrame::idle(), &exhausted, DT).unwrap();
    assert_eq!(report.outcome, TickOutcome::BiomeAdvanced(Biome::Summer));
    let report = session.tick(&InputFrame::idle(), &exhausted, DT).unwrap();
    assert_eq!(report.outcome, TickOutcome::BiomeAdvanced(Biome::Autumn));
    assert_eq!(
        session.world().generated,
        vec![Biome::Summer, Biome::Autumn]
    );
}

#[test]
fn best_score_written_once_and_survives_replay() {
    let mut session = GameSession::new(
        ScriptedWorld {
            end_run: true,
            ..ScriptedWorld::default()
        },
        MemoryScores::default(),
        content(),
        5,
    )
    .unwrap();

    let select = InputFrame {
        select_slot: Some(ActiveSlot::Axe),
        ..InputFrame::idle()
    };
    let view = WorldView {
        watched_marker: Some(MarkerId(1)),
        ..WorldView::default()
    };
    session.tick(&select, &view, DT).unwrap();
    harvest_one(&mut session, 1, &view);
    assert_eq!(session.ledger().score(), 5);

    let report = session
        .tick(&InputFrame::idle(), &WorldView::default(), DT)
        .unwrap();
    assert!(matches!(report.outcome, TickOutcome::GameOver(_)));

    // further ticks are halted and write nothing more
    for _ in 0..3 {
        let report = session
            .tick(&InputFrame::idle(), &WorldView::default(), DT)
            .unwrap();
        assert_eq!(report.outcome, TickOutcome::Halted);
    }

    session.reset().unwrap();
    assert!(session.lifecycle().is_active());
    assert_eq!(session.lifecycle().best_score(), 5);
    assert_eq!(session.ledger().score(), 0);
}
