//! Timed reflect field.
//!
//! While active, incoming projectiles are turned around instead of hitting:
//! target team and owner swap, damage is multiplied, and the projectile is
//! marked so no reflect field can bounce it a second time.

use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    CollisionOutcome, CooldownPolicy, CueKind, EffectBuffer, ExclusionGroup, Modifiers,
    TickContext,
};
use crate::config::ReflectConfig;
use crate::error::AbilityResult;
use crate::projectile::Projectile;

pub struct Reflect {
    core: AbilityCore,
    config: ReflectConfig,
}

impl Reflect {
    pub fn new(config: &ReflectConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::Reflect,
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
            config: config.clone(),
        }
    }

    fn drop_field(&mut self, effects: &mut EffectBuffer) {
        if !self.core.is_engaged() {
            return;
        }
        self.core.deactivate();
        effects.push(AbilityEffect::Detach(AttachmentKind::ReflectField));
        effects.cue(AbilityKind::Reflect, CueKind::Deactivated);
    }
}

impl Ability for Reflect {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if self.core.duration_elapsed(ctx.now) {
            self.drop_field(ctx.effects);
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if ctx.input.pressed
            && !self.core.is_engaged()
            && self.core.try_activate(ctx.now, &ctx.exclusion, Ok(())).is_ok()
        {
            ctx.effects.push(AbilityEffect::Attach(Attachment::ReflectField {
                radius: self.config.radius,
            }));
            ctx.effects.cue(AbilityKind::Reflect, CueKind::Activated);
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        if self.core.is_active() {
            Modifiers::movement(1.0, self.config.rotation_factor)
        } else {
            Modifiers::IDENTITY
        }
    }

    fn has_collision_modification(&self) -> bool {
        self.core.is_active()
    }

    /// Turns the projectile around.  The caller flips its velocity and hands
    /// ownership to the reflecting ship.
    fn process_collision(
        &mut self,
        projectile: &mut Projectile,
        effects: &mut EffectBuffer,
    ) -> CollisionOutcome {
        if !self.core.is_active() || projectile.reflected {
            return CollisionOutcome::Unhandled;
        }
        projectile.target = projectile.target.opponent();
        projectile.damage *= self.config.damage_multiplier;
        projectile.reflected = true;
        projectile.age = 0.0;
        effects.cue(AbilityKind::Reflect, CueKind::Reflected);
        CollisionOutcome::Reflected
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        self.drop_field(effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::test_support::Harness;
    use crate::ability::{AbilitySlot, Loadout, SlotInput};
    use crate::projectile::Team;

    const D: AbilitySlot = AbilitySlot::Defense;

    fn active_reflect() -> Harness {
        let mut h = Harness::new(Loadout::default().with(D, Reflect::new(&ReflectConfig::default())));
        h.tick_now(&[(D, SlotInput::PRESS)]);
        assert!(h.loadout.has_collision_modification());
        h
    }

    #[test]
    fn reflects_and_swaps_target() {
        let mut h = active_reflect();
        let mut projectile = Projectile::initialize(Team::Player, 400.0, 10.0, 2.0, 0.0, None);
        let outcome = h.loadout.process_collision(&mut projectile, &mut h.effects);

        assert_eq!(outcome, CollisionOutcome::Reflected);
        assert_eq!(projectile.target, Team::Enemy);
        assert_eq!(projectile.damage, 15.0);
        assert!(projectile.reflected);
    }

    #[test]
    fn reflects_only_once() {
        let mut h = active_reflect();
        let mut projectile = Projectile::initialize(Team::Player, 400.0, 10.0, 2.0, 0.0, None);
        h.loadout.process_collision(&mut projectile, &mut h.effects);
        projectile.target = Team::Player;

        let outcome = h.loadout.process_collision(&mut projectile, &mut h.effects);
        assert_eq!(outcome, CollisionOutcome::Unhandled);
        assert_eq!(projectile.damage, 15.0);
    }

    #[test]
    fn field_expires_after_duration() {
        let mut h = active_reflect();
        h.run_until(ReflectConfig::default().duration as f64, 0.25, &[]);
        assert!(!h.loadout.has_collision_modification());
        assert!(h.loadout.composed_modifiers().is_identity());
    }
}
