//! Continuous beam weapon.
//!
//! Hold to fire.  Heat builds while the beam is on; reaching the ceiling cuts
//! the beam in the same tick and it stays locked out until heat drops below
//! the ceiling again.  The ship is slowed and turns sluggishly while firing.

use super::{toggle_input, ToggleEdge};
use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    CooldownPolicy, CueKind, EffectBuffer, ExclusionGroup, HeatTick, Modifiers, TickContext,
};
use crate::config::BeamConfig;
use crate::error::AbilityResult;

pub struct Beam {
    core: AbilityCore,
    config: BeamConfig,
}

impl Beam {
    pub fn new(config: &BeamConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::Beam,
            AbilityStats {
                cooldown: config.cooldown,
                duration: 0.0,
            },
            CooldownPolicy::OnActivation,
        )
        .with_heat(Some(config.heat))
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
        effects.push(AbilityEffect::Detach(AttachmentKind::Beam));
        effects.cue(AbilityKind::Beam, cue);
    }
}

impl Ability for Beam {
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
                ctx.effects.push(AbilityEffect::Attach(Attachment::Beam {
                    length: self.config.length,
                    width: self.config.width,
                    damage_per_second: self.config.damage_per_second,
                    target: ctx.ship.team.opponent(),
                }));
                ctx.effects.cue(AbilityKind::Beam, CueKind::Activated);
            }
            ToggleEdge::Off => {
                ctx.effects.push(AbilityEffect::Detach(AttachmentKind::Beam));
                ctx.effects.cue(AbilityKind::Beam, CueKind::Deactivated);
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
