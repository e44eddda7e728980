//! Per-ship ability input, written by the keyboard system (player) or the
//! fighter brain (enemies) and read by the loadout tick.

use bevy::prelude::*;
use serde::Deserialize;

/// Input slot an ability is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilitySlot {
    Primary,
    Secondary,
    Special,
    Defense,
    Mobility,
}

impl AbilitySlot {
    pub const COUNT: usize = 5;

    pub const ALL: [AbilitySlot; Self::COUNT] = [
        AbilitySlot::Primary,
        AbilitySlot::Secondary,
        AbilitySlot::Special,
        AbilitySlot::Defense,
        AbilitySlot::Mobility,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AbilitySlot::Primary => 0,
            AbilitySlot::Secondary => 1,
            AbilitySlot::Special => 2,
            AbilitySlot::Defense => 3,
            AbilitySlot::Mobility => 4,
        }
    }
}

/// Edge + level state of one slot for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotInput {
    /// Went down this tick.
    pub pressed: bool,
    /// Currently down (includes the press tick).
    pub held: bool,
    /// Went up this tick.
    pub released: bool,
}

impl SlotInput {
    pub const PRESS: SlotInput = SlotInput {
        pressed: true,
        held: true,
        released: false,
    };

    pub const HOLD: SlotInput = SlotInput {
        pressed: false,
        held: true,
        released: false,
    };

    pub const RELEASE: SlotInput = SlotInput {
        pressed: false,
        held: false,
        released: true,
    };
}

/// All slots for one ship.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbilityInput {
    slots: [SlotInput; AbilitySlot::COUNT],
}

impl AbilityInput {
    #[inline]
    pub fn get(&self, slot: AbilitySlot) -> SlotInput {
        self.slots[slot.index()]
    }

    #[inline]
    pub fn set(&mut self, slot: AbilitySlot, input: SlotInput) {
        self.slots[slot.index()] = input;
    }

    /// Update a slot from a level signal, deriving the press/release edges
    /// from the previous tick's `held`.
    pub fn set_level(&mut self, slot: AbilitySlot, down: bool) {
        let prev = self.slots[slot.index()].held;
        self.slots[slot.index()] = SlotInput {
            pressed: down && !prev,
            held: down,
            released: !down && prev,
        };
    }

    /// Clear the edge flags after the tick consumed them; `held` persists.
    pub fn clear_edges(&mut self) {
        for slot in &mut self.slots {
            slot.pressed = false;
            slot.released = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_signal_derives_edges() {
        let mut input = AbilityInput::default();
        input.set_level(AbilitySlot::Primary, true);
        assert_eq!(input.get(AbilitySlot::Primary), SlotInput::PRESS);

        input.set_level(AbilitySlot::Primary, true);
        assert_eq!(input.get(AbilitySlot::Primary), SlotInput::HOLD);

        input.set_level(AbilitySlot::Primary, false);
        assert_eq!(input.get(AbilitySlot::Primary), SlotInput::RELEASE);
    }

    #[test]
    fn clearing_edges_keeps_hold() {
        let mut input = AbilityInput::default();
        input.set(AbilitySlot::Defense, SlotInput::PRESS);
        input.clear_edges();
        assert_eq!(input.get(AbilitySlot::Defense), SlotInput::HOLD);
    }
}
