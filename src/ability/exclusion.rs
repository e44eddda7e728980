//! Named mutual-exclusion groups.
//!
//! An ability declares at most one group in its config.  While it is active
//! the group is "occupied" and no other member may activate.  Occupancy only
//! gates new activations; it never cancels an ability that is already running.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionGroup {
    /// Heavy weapons that monopolise the ship's hardpoint.
    Weapon,
    /// Shield / reflect.
    Defense,
    /// Teleport / dash.
    Mobility,
}

impl ExclusionGroup {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            ExclusionGroup::Weapon => 1 << 0,
            ExclusionGroup::Defense => 1 << 1,
            ExclusionGroup::Mobility => 1 << 2,
        }
    }
}

/// Snapshot of which groups are held by *other* abilities on the same ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionView {
    occupied: u8,
}

impl ExclusionView {
    pub fn occupy(&mut self, group: ExclusionGroup) {
        self.occupied |= group.bit();
    }

    #[inline]
    pub fn is_occupied(&self, group: ExclusionGroup) -> bool {
        self.occupied & group.bit() != 0
    }

    /// `Some(group)` when `group` is set and occupied.
    pub fn conflict(&self, group: Option<ExclusionGroup>) -> Option<ExclusionGroup> {
        group.filter(|g| self.is_occupied(*g))
    }
}
