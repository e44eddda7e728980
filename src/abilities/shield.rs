//! Timed invulnerability bubble.  Requires a `ShieldEmitter` on the ship.

use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    CooldownPolicy, CueKind, EffectBuffer, ExclusionGroup, Modifiers, TickContext,
};
use crate::config::ShieldConfig;
use crate::error::AbilityResult;

pub struct Shield {
    core: AbilityCore,
    radius: f32,
}

impl Shield {
    pub fn new(config: &ShieldConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::Shield,
            AbilityStats {
                cooldown: config.cooldown,
                duration: config.duration,
            },
            CooldownPolicy::OnActivation,
        )
        .with_exclusion(Some(ExclusionGroup::Defense))
        .with_validation(config.validate());
        Self {
            core,
            radius: config.radius,
        }
    }

    fn drop_shield(&mut self, effects: &mut EffectBuffer) {
        if !self.core.is_engaged() {
            return;
        }
        self.core.deactivate();
        effects.push(AbilityEffect::Detach(AttachmentKind::ShieldBubble));
        effects.cue(AbilityKind::Shield, CueKind::Deactivated);
    }
}

impl Ability for Shield {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if self.core.duration_elapsed(ctx.now) {
            self.drop_shield(ctx.effects);
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if !ctx.input.pressed || self.core.is_engaged() {
            return Ok(());
        }
        let precondition = if ctx.ship.has_shield_emitter {
            Ok(())
        } else {
            Err("no shield emitter")
        };
        if self
            .core
            .try_activate(ctx.now, &ctx.exclusion, precondition)
            .is_ok()
        {
            ctx.effects.push(AbilityEffect::Attach(Attachment::ShieldBubble {
                radius: self.radius,
            }));
            ctx.effects.cue(AbilityKind::Shield, CueKind::Activated);
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        if self.core.is_active() {
            Modifiers {
                damage_taken: 0.0,
                ..Modifiers::IDENTITY
            }
        } else {
            Modifiers::IDENTITY
        }
    }

    fn has_damage_mitigation(&self) -> bool {
        self.core.is_active()
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        self.drop_shield(effects);
    }
}
