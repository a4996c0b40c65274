//! Sampled input for one tick.
//!
//! Device polling lives with the host; the core consumes a plain-data
//! frame per tick. Each action has its own field, so binding tables are
//! the host's concern and no two actions can collide on a combination.
//!
//! Suggested bindings: WASD movement, Shift crouch, Ctrl sprint, G
//! gather, 0/1/2 slot select, Ctrl+U upgrade, Shift+R repair, Tab
//! inventory toggle.
use serde::{Deserialize, Serialize};

use crate::tools::ActiveSlot;

/// Input state sampled once per tick. `*_held` fields report keys held
/// down this tick; the rest report edge-triggered presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InputFrame {
    pub up_held: bool,
    pub down_held: bool,
    pub left_held: bool,
    pub right_held: bool,
    pub crouch_held: bool,
    pub sprint_held: bool,
    pub gather_pressed: bool,
    /// Slot select key pressed this tick (0/1/2), if any.
    pub select_slot: Option<ActiveSlot>,
    pub upgrade_pressed: bool,
    pub repair_pressed: bool,
    pub toggle_inventory_pressed: bool,
}

impl InputFrame {
    /// Frame with nothing held or pressed.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn any_direction_held(&self) -> bool {
        self.up_held || self.down_held || self.left_held || self.right_held
    }
}

/// Map a numeric key to a slot selection, for hosts that forward raw
/// digit keys.
#[must_use]
pub fn slot_for_numeric_key(key: u8) -> Option<ActiveSlot> {
    ActiveSlot::from_index(key)
}
