//! Ability framework core.
//!
//! Everything in this module is plain data and logic, free of ECS queries, so
//! it can be ticked and tested without an `App`.  The Bevy side lives in
//! [`crate::ship`].
//!
//! | Module         | Responsibility                                           |
//! |----------------|----------------------------------------------------------|
//! | [`cooldown`]   | last-used timestamp + cooldown gate                      |
//! | [`capacity`]   | heat pool: drain while active, regen while idle          |
//! | [`charge`]     | hold time → [`charge::ChargeTier`], per-tier tables      |
//! | [`modifier`]   | multiplicative thrust / rotation / damage-taken factors  |
//! | [`exclusion`]  | exclusion groups and the per-tick occupancy view         |
//! | [`activation`] | Idle → Activating → Active state machine + guard chain   |
//! | [`sequence`]   | tick-driven multi-phase procedures                       |
//! | [`effect`]     | side effects abilities request from the world            |
//! | [`input`]      | per-slot press / hold / release edges                    |
//! | [`loadout`]    | the [`loadout::Ability`] trait and per-ship ordering     |

pub mod activation;
pub mod capacity;
pub mod charge;
pub mod cooldown;
pub mod effect;
pub mod exclusion;
pub mod input;
pub mod loadout;
pub mod modifier;
pub mod sequence;

pub use activation::{AbilityCore, AbilityStats, ActivationState, CooldownPolicy, HeatTick};
pub use capacity::{CapacityResource, HeatConfig};
pub use charge::{ChargeRelease, ChargeSession, ChargeThresholds, ChargeTier, ChargeWindow, TierTable};
pub use cooldown::CooldownGate;
pub use effect::{AbilityEffect, Attachment, AttachmentKind, CueKind, EffectBuffer};
pub use exclusion::{ExclusionGroup, ExclusionView};
pub use input::{AbilityInput, AbilitySlot, SlotInput};
pub use loadout::{Ability, CollisionOutcome, Loadout, ShipContext, TickContext};
pub use modifier::{ModifierKind, ModifierStack, Modifiers};

use serde::Deserialize;

/// Identifies an ability implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Beam,
    FireTrail,
    TractorBeam,
    GigaBlast,
    Shield,
    Reflect,
    Teleport,
    StretchDash,
    TriggerBomb,
}
