//! The crack meter: integral shell health with a per-value damage
//! overlay and an irrecoverable hard stop at zero.
use serde::{Deserialize, Serialize};

use crate::constants::CRACK_HEALTH_MAX;

/// What the presentation layer should do with the crack overlay this
/// tick, evaluated from the current health value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrackUpdate {
    /// Full health; no overlay is shown.
    Intact,
    /// Degrading but alive; show the named overlay sprite.
    Overlay(&'static str),
    /// Health reached zero. The run does not merely end: the host must
    /// hard-stop the whole process. No score is recorded.
    Shattered,
}

/// Shell health counter, 0..=7 with 7 undamaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrackMeter {
    health: u8,
}

impl Default for CrackMeter {
    fn default() -> Self {
        Self {
            health: CRACK_HEALTH_MAX,
        }
    }
}

impl CrackMeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn health(&self) -> u8 {
        self.health
    }

    /// Apply damage, clamping at zero.
    pub fn damage(&mut self, amount: u8) {
        self.health = self.health.saturating_sub(amount);
    }

    /// The overlay decision for the current health value.
    #[must_use]
    pub const fn evaluate(&self) -> CrackUpdate {
        match self.health {
            0 => CrackUpdate::Shattered,
            h if h >= CRACK_HEALTH_MAX => CrackUpdate::Intact,
            h => CrackUpdate::Overlay(overlay_sprite(h)),
        }
    }
}

/// Fixed lookup from remaining health to the damage overlay sprite.
/// One sprite per value in 1..=6; the content set is complete by
/// construction.
const fn overlay_sprite(health: u8) -> &'static str {
    match health {
        1 => "cracks_1",
        2 => "cracks_2",
        3 => "cracks_3",
        4 => "cracks_4",
        5 => "cracks_5",
        6 => "cracks_6",
        _ => panic!("overlay lookup outside the degrading range"),
    }
}
