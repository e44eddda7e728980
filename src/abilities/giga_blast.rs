//! Charged super-shot.
//!
//! Press to start charging, release to fire.  The charge tier at release
//! selects speed, damage, recoil, impact and pierce falloff from the tier
//! tables; the longer the hold, the heavier the ship feels while charging.
//! Holding past `max_charge_time` fires automatically at the capped tier.
//!
//! Cooldown starts only when a shot actually leaves the ship.  A release
//! before `min_charge_time` fizzles and leaves the gate open.

use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    ChargeRelease, ChargeSession, ChargeTier, CooldownPolicy, CueKind, EffectBuffer,
    ExclusionGroup, Modifiers, ShipContext, TickContext,
};
use crate::config::GigaBlastConfig;
use crate::error::{AbilityError, AbilityResult};
use crate::projectile::ProjectileSpec;

/// Distance ahead of the ship's centre where the shot appears.
const MUZZLE_OFFSET: f32 = 14.0;

pub struct GigaBlast {
    core: AbilityCore,
    config: GigaBlastConfig,
    session: Option<ChargeSession>,
}

impl GigaBlast {
    pub fn new(config: &GigaBlastConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::GigaBlast,
            AbilityStats {
                cooldown: config.cooldown,
                duration: 0.0,
            },
            CooldownPolicy::OnEffect,
        )
        .with_exclusion(Some(ExclusionGroup::Weapon))
        .with_validation(config.validate());
        Self {
            core,
            config: config.clone(),
            session: None,
        }
    }

    fn projectile_for(&self, tier: ChargeTier, ship: &ShipContext) -> ProjectileSpec {
        let direction = ship.aim_or_forward();
        let spec = ProjectileSpec {
            position: ship.position + direction * MUZZLE_OFFSET,
            direction,
            target: ship.team.opponent(),
            speed: self.config.speed[tier],
            damage: self.config.damage[tier],
            lifetime: self.config.lifetime,
            impact: self.config.impact[tier],
            radius: self.config.radius,
            pierce: None,
            slow: None,
        };
        let falloff = self.config.pierce_falloff[tier];
        if falloff > 0.0 {
            spec.with_piercing(falloff)
        } else {
            spec
        }
    }

    /// End the charge, firing or fizzling.
    fn release(&mut self, now: f64, ship: &ShipContext, effects: &mut EffectBuffer) -> AbilityResult<()> {
        let session = self.session.take().ok_or(AbilityError::MissingSession {
            ability: AbilityKind::GigaBlast,
        })?;
        self.core.deactivate();
        effects.push(AbilityEffect::Detach(AttachmentKind::ChargeGlow));

        match session.release(now, &self.config.window) {
            ChargeRelease::TooEarly { .. } => {
                effects.cue(AbilityKind::GigaBlast, CueKind::Fizzled);
            }
            ChargeRelease::Fire { tier, .. } => {
                let spec = self.projectile_for(tier, ship);
                effects.push(AbilityEffect::SpawnProjectile(spec));
                effects.push(AbilityEffect::Impulse(-spec.direction * self.config.recoil[tier]));
                effects.cue(AbilityKind::GigaBlast, CueKind::Fired);
                self.core.mark_used(now);
            }
        }
        Ok(())
    }
}

impl Ability for GigaBlast {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if !self.core.is_engaged() {
            return Ok(());
        }
        let window = self.config.window;
        let session = self.session.as_mut().ok_or(AbilityError::MissingSession {
            ability: AbilityKind::GigaBlast,
        })?;
        let before = session.current_tier();
        let tier = session.update(ctx.now, &window);
        if tier != before {
            ctx.effects
                .push(AbilityEffect::Attach(Attachment::ChargeGlow { tier }));
            ctx.effects
                .cue(AbilityKind::GigaBlast, CueKind::ChargeTier(tier));
        }
        if session.is_overcharged(ctx.now, &window) {
            self.release(ctx.now, ctx.ship, ctx.effects)?;
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if self.core.is_engaged() {
            if !ctx.input.held {
                self.release(ctx.now, ctx.ship, ctx.effects)?;
            }
        } else if ctx.input.pressed && self.core.try_activate(ctx.now, &ctx.exclusion, Ok(())).is_ok() {
            let session = ChargeSession::begin(ctx.now);
            ctx.effects.push(AbilityEffect::Attach(Attachment::ChargeGlow {
                tier: session.current_tier(),
            }));
            ctx.effects.cue(AbilityKind::GigaBlast, CueKind::Activated);
            self.session = Some(session);
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        match self.session {
            Some(session) => {
                let tier = session.current_tier();
                Modifiers::movement(
                    self.config.thrust_penalty[tier],
                    self.config.rotation_penalty[tier],
                )
            }
            None => Modifiers::IDENTITY,
        }
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        if self.session.take().is_some() || self.core.is_engaged() {
            effects.push(AbilityEffect::Detach(AttachmentKind::ChargeGlow));
        }
        self.core.deactivate();
    }
}
