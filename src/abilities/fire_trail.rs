//! Afterburner that leaves burning hazard segments behind the ship.

use super::{toggle_input, ToggleEdge};
use crate::ability::effect::HazardSpec;
use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    CooldownPolicy, CueKind, EffectBuffer, HeatTick, Modifiers, ShipContext, TickContext,
};
use crate::config::FireTrailConfig;
use crate::error::AbilityResult;

pub struct FireTrail {
    core: AbilityCore,
    config: FireTrailConfig,
    /// Seconds since the last segment was dropped.
    since_segment: f32,
}

impl FireTrail {
    pub fn new(config: &FireTrailConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::FireTrail,
            AbilityStats {
                cooldown: config.cooldown,
                duration: 0.0,
            },
            CooldownPolicy::OnActivation,
        )
        .with_heat(Some(config.heat))
        .with_validation(config.validate());
        Self {
            core,
            config: config.clone(),
            since_segment: 0.0,
        }
    }

    fn drop_segment(&self, ship: &ShipContext, effects: &mut EffectBuffer) {
        effects.push(AbilityEffect::DropHazard(HazardSpec {
            position: ship.position - ship.forward * self.config.segment_offset,
            radius: self.config.segment_radius,
            damage_per_second: self.config.damage_per_second,
            lifetime: self.config.segment_lifetime,
            target: ship.team.opponent(),
        }));
    }

    fn shut_off(&mut self, effects: &mut EffectBuffer, cue: CueKind) {
        if !self.core.is_engaged() {
            return;
        }
        self.core.deactivate();
        effects.push(AbilityEffect::Detach(AttachmentKind::FireTrailEmitter));
        effects.cue(AbilityKind::FireTrail, cue);
    }
}

impl Ability for FireTrail {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if self.core.update_heat(ctx.dt) == HeatTick::Overheated {
            self.shut_off(ctx.effects, CueKind::Overheated);
            return Ok(());
        }
        if !self.core.is_active() {
            return Ok(());
        }
        self.since_segment += ctx.dt;
        while self.since_segment >= self.config.segment_interval {
            self.since_segment -= self.config.segment_interval;
            self.drop_segment(ctx.ship, ctx.effects);
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        match toggle_input(&mut self.core, ctx) {
            ToggleEdge::On => {
                self.since_segment = 0.0;
                ctx.effects
                    .push(AbilityEffect::Attach(Attachment::FireTrailEmitter));
                ctx.effects.cue(AbilityKind::FireTrail, CueKind::Activated);
                self.drop_segment(ctx.ship, ctx.effects);
            }
            ToggleEdge::Off => {
                ctx.effects
                    .push(AbilityEffect::Detach(AttachmentKind::FireTrailEmitter));
                ctx.effects.cue(AbilityKind::FireTrail, CueKind::Deactivated);
            }
            ToggleEdge::Unchanged => {}
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        if self.core.is_active() {
            Modifiers::movement(self.config.thrust_factor, 1.0)
        } else {
            Modifiers::IDENTITY
        }
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        self.shut_off(effects, CueKind::Deactivated);
    }
}
