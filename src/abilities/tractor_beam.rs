//! Tractor beam: pulls loose bodies in a forward cone toward the ship.
//!
//! The ability itself only owns the on/off state and the movement penalty.
//! `ship::control::tractor_beam_force_system` applies the cone force to every
//! `Tractorable` body while [`Loadout::is_active`](crate::ability::Loadout::is_active)
//! reports the beam on.

use super::{toggle_input, ToggleEdge};
use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    CooldownPolicy, CueKind, EffectBuffer, ExclusionGroup, HeatTick, Modifiers, TickContext,
};
use crate::config::TractorBeamConfig;
use crate::error::AbilityResult;

pub struct TractorBeam {
    core: AbilityCore,
    config: TractorBeamConfig,
}

impl TractorBeam {
    pub fn new(config: &TractorBeamConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::TractorBeam,
            AbilityStats {
                cooldown: config.cooldown,
                duration: 0.0,
            },
            CooldownPolicy::OnActivation,
        )
        .with_heat(config.heat)
        .with_exclusion(Some(ExclusionGroup::Weapon))
        .with_validation(config.validate());
        Self {
            core,
            config: config.clone(),
        }
    }

    fn shut_off(&mut self, effects: &mut EffectBuffer, cue: CueKind) {
        if !self.core.is_engaged() {
            return;
        }
        self.core.deactivate();
        effects.push(AbilityEffect::Detach(AttachmentKind::TractorCone));
        effects.cue(AbilityKind::TractorBeam, cue);
    }
}

impl Ability for TractorBeam {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if self.core.update_heat(ctx.dt) == HeatTick::Overheated {
            self.shut_off(ctx.effects, CueKind::Overheated);
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        match toggle_input(&mut self.core, ctx) {
            ToggleEdge::On => {
                ctx.effects.push(AbilityEffect::Attach(Attachment::TractorCone {
                    range: self.config.range,
                }));
                ctx.effects.cue(AbilityKind::TractorBeam, CueKind::Activated);
            }
            ToggleEdge::Off => {
                ctx.effects
                    .push(AbilityEffect::Detach(AttachmentKind::TractorCone));
                ctx.effects
                    .cue(AbilityKind::TractorBeam, CueKind::Deactivated);
            }
            ToggleEdge::Unchanged => {}
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        if self.core.is_active() {
            Modifiers::movement(self.config.thrust_factor, self.config.rotation_factor)
        } else {
            Modifiers::IDENTITY
        }
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        self.shut_off(effects, CueKind::Deactivated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::beam::Beam;
    use crate::ability::{AbilitySlot, Loadout, SlotInput};
    use crate::abilities::test_support::Harness;
    use crate::config::BeamConfig;

    #[test]
    fn shares_the_weapon_group_with_the_beam() {
        let mut h = Harness::new(
            Loadout::default()
                .with(AbilitySlot::Primary, Beam::new(&BeamConfig::default()))
                .with(
                    AbilitySlot::Special,
                    TractorBeam::new(&TractorBeamConfig::default()),
                ),
        );
        h.tick_now(&[(AbilitySlot::Primary, SlotInput::PRESS)]);
        h.step(
            0.25,
            &[
                (AbilitySlot::Primary, SlotInput::HOLD),
                (AbilitySlot::Special, SlotInput::PRESS),
            ],
        );
        assert!(h.loadout.is_active(AbilityKind::Beam));
        assert!(!h.loadout.is_active(AbilityKind::TractorBeam));
        assert!(h.loadout.is_group_occupied(ExclusionGroup::Weapon));
    }

    #[test]
    fn runs_without_heat_by_default() {
        let mut h = Harness::new(
            Loadout::default().with(
                AbilitySlot::Special,
                TractorBeam::new(&TractorBeamConfig::default()),
            ),
        );
        h.tick_now(&[(AbilitySlot::Special, SlotInput::PRESS)]);
        h.run_until(60.0, 0.5, &[(AbilitySlot::Special, SlotInput::HOLD)]);
        assert!(h.loadout.is_active(AbilityKind::TractorBeam));
        let mods = h.loadout.composed_modifiers();
        assert_eq!(mods.thrust, 0.7);
        assert_eq!(mods.rotation, 0.8);
    }
}
