//! The ability catalogue.
//!
//! | Ability                          | Kind                  | Exclusion | Cooldown stamped |
//! |----------------------------------|-----------------------|-----------|------------------|
//! | [`beam::Beam`]                   | toggle + heat         | Weapon    | on activation    |
//! | [`fire_trail::FireTrail`]        | toggle + heat         | none      | on activation    |
//! | [`tractor_beam::TractorBeam`]    | toggle, optional heat | Weapon    | on activation    |
//! | [`giga_blast::GigaBlast`]        | charge-and-release    | Weapon    | on fire          |
//! | [`shield::Shield`]               | timed                 | Defense   | on activation    |
//! | [`reflect::Reflect`]             | timed                 | Defense   | on activation    |
//! | [`teleport::Teleport`]           | phase sequence        | Mobility  | on activation    |
//! | [`stretch_dash::StretchDash`]    | charge, then sequence | Mobility  | on launch        |
//! | [`trigger_bomb::TriggerBomb`]    | one-shot + follow-up  | none      | on launch        |
//!
//! Toggles are hold-to-use: the press edge runs the guards, releasing the
//! slot switches the ability off.

pub mod beam;
pub mod fire_trail;
pub mod giga_blast;
pub mod reflect;
pub mod shield;
pub mod stretch_dash;
pub mod teleport;
pub mod tractor_beam;
pub mod trigger_bomb;

use crate::ability::{Ability, AbilityCore, AbilityKind, AbilitySlot, Loadout, TickContext};
use crate::config::{AbilityConfig, LoadoutSlot};

/// What a toggle did with this tick's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToggleEdge {
    On,
    Off,
    Unchanged,
}

/// Hold-to-use toggle handling shared by beam, fire trail and tractor beam.
pub(crate) fn toggle_input(core: &mut AbilityCore, ctx: &TickContext) -> ToggleEdge {
    if core.is_engaged() {
        if !ctx.input.held {
            core.deactivate();
            return ToggleEdge::Off;
        }
    } else if ctx.input.pressed && core.try_activate(ctx.now, &ctx.exclusion, Ok(())).is_ok() {
        return ToggleEdge::On;
    }
    ToggleEdge::Unchanged
}

/// Build one ability from its config section.
pub fn build_ability(kind: AbilityKind, config: &AbilityConfig) -> Box<dyn Ability> {
    match kind {
        AbilityKind::Beam => Box::new(beam::Beam::new(&config.beam)),
        AbilityKind::FireTrail => Box::new(fire_trail::FireTrail::new(&config.fire_trail)),
        AbilityKind::TractorBeam => Box::new(tractor_beam::TractorBeam::new(&config.tractor_beam)),
        AbilityKind::GigaBlast => Box::new(giga_blast::GigaBlast::new(&config.giga_blast)),
        AbilityKind::Shield => Box::new(shield::Shield::new(&config.shield)),
        AbilityKind::Reflect => Box::new(reflect::Reflect::new(&config.reflect)),
        AbilityKind::Teleport => Box::new(teleport::Teleport::new(&config.teleport)),
        AbilityKind::StretchDash => Box::new(stretch_dash::StretchDash::new(&config.stretch_dash)),
        AbilityKind::TriggerBomb => Box::new(trigger_bomb::TriggerBomb::new(&config.trigger_bomb)),
    }
}

/// Build a loadout in the listed order.
pub fn build_loadout(slots: &[LoadoutSlot], config: &AbilityConfig) -> Loadout {
    let mut loadout = Loadout::default();
    for entry in slots {
        loadout.push_boxed(entry.slot, build_ability(entry.ability, config));
    }
    loadout
}

/// Convenience for code that only needs a single slot bound.
pub fn single(slot: AbilitySlot, kind: AbilityKind, config: &AbilityConfig) -> Loadout {
    build_loadout(&[LoadoutSlot { slot, ability: kind }], config)
}
