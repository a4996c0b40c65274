//! Run lifecycle: fallout watching, the continue-vs-end decision,
//! scoring, best-score persistence, and the terminal game-over state.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ScoreStore;
use crate::resources::ResourceLedger;
use crate::world::{Biome, MarkerId, WorldGenerator};

/// Terminal summary surfaced at game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: i64,
    /// Best score as persisted before this run ended.
    pub best: i64,
    /// Whether this run's score replaced the persisted best.
    pub improved: bool,
}

impl GameOverSummary {
    #[must_use]
    pub fn score_line(&self) -> String {
        format!("Score: {}", self.score)
    }

    #[must_use]
    pub fn best_line(&self) -> String {
        format!("Best score: {}", self.best)
    }
}

/// Outcome of one lifecycle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    /// Marker already triggered, or nothing to do.
    Idle,
    /// The watched marker's fallout fired for the first time.
    FalloutTriggered(MarkerId),
    /// Nothing left to watch and the run continues in a new biome.
    BiomeAdvanced(Biome),
    /// Nothing left to watch and the run is over.
    RunEnded(GameOverSummary),
}

/// Lifecycle state for one run. Constructed with the persisted best
/// score; a run that beats it writes the record back through the
/// injected [`ScoreStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLifecycle {
    biome: Biome,
    run_active: bool,
    triggered: BTreeSet<MarkerId>,
    best_score: i64,
    game_over: Option<GameOverSummary>,
}

impl RunLifecycle {
    #[must_use]
    pub fn new(best_score: i64) -> Self {
        Self {
            biome: Biome::default(),
            run_active: true,
            triggered: BTreeSet::new(),
            best_score,
            game_over: None,
        }
    }

    #[must_use]
    pub const fn biome(&self) -> Biome {
        self.biome
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.run_active
    }

    #[must_use]
    pub const fn best_score(&self) -> i64 {
        self.best_score
    }

    #[must_use]
    pub const fn game_over(&self) -> Option<GameOverSummary> {
        self.game_over
    }

    /// Run one lifecycle check against the currently watched marker.
    ///
    /// A non-null, not-yet-triggered marker fires its fallout exactly
    /// once. A null marker means nothing is left to watch: the world is
    /// cleaned, then either the run ends (score computed, best-score
    /// record updated when beaten) or the next biome is generated.
    ///
    /// # Errors
    ///
    /// Returns an error when the score store rejects the updated best.
    pub fn check<W, S>(
        &mut self,
        watched: Option<MarkerId>,
        ledger: &ResourceLedger,
        world: &mut W,
        store: &mut S,
    ) -> anyhow::Result<LifecycleStep>
    where
        W: WorldGenerator,
        S: ScoreStore,
    {
        if !self.run_active {
            return Ok(LifecycleStep::Idle);
        }

        match watched {
            Some(marker) if !self.triggered.contains(&marker) => {
                world.fallout(marker);
                self.triggered.insert(marker);
                debug!("fallout triggered for marker {}", marker.0);
                Ok(LifecycleStep::FalloutTriggered(marker))
            }
            Some(_) => Ok(LifecycleStep::Idle),
            None => {
                world.clean();
                if world.should_end_run() {
                    let score = ledger.score();
                    let improved = score > self.best_score;
                    if improved {
                        store.save_best(score)?;
                    }
                    let summary = GameOverSummary {
                        score,
                        best: self.best_score,
                        improved,
                    };
                    self.run_active = false;
                    self.game_over = Some(summary);
                    self.biome = Biome::Spring;
                    info!("run ended: score {score}, best {}", self.best_score);
                    Ok(LifecycleStep::RunEnded(summary))
                } else {
                    self.biome = world.next_biome(self.biome);
                    world.generate(self.biome);
                    debug!("advancing to biome {}", self.biome);
                    Ok(LifecycleStep::BiomeAdvanced(self.biome))
                }
            }
        }
    }

    /// Arm a new run after game over, with a freshly loaded best score.
    pub fn reset(&mut self, best_score: i64) {
        self.biome = Biome::Spring;
        self.run_active = true;
        self.triggered.clear();
        self.best_score = best_score;
        self.game_over = None;
    }
}
