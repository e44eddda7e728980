//! Remote-detonated bomb.
//!
//! Press to lob a bomb; the ability stays active while the bomb exists.  A
//! second press after the arm delay detonates it, and the fuse detonates it
//! regardless.  If the bomb disappears on its own (contact detonation,
//! despawn) the ability simply returns to idle.

use crate::ability::effect::BombSpec;
use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, Attachment, AttachmentKind,
    CooldownPolicy, CueKind, EffectBuffer, Modifiers, TickContext,
};
use crate::config::TriggerBombConfig;
use crate::error::AbilityResult;

/// Launch point ahead of the ship's centre.
const LAUNCH_OFFSET: f32 = 16.0;

pub struct TriggerBomb {
    core: AbilityCore,
    config: TriggerBombConfig,
    launched_at: Option<f64>,
}

impl TriggerBomb {
    pub fn new(config: &TriggerBombConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::TriggerBomb,
            AbilityStats {
                cooldown: config.cooldown,
                duration: config.fuse,
            },
            CooldownPolicy::OnActivation,
        )
        .with_validation(config.validate());
        Self {
            core,
            config: config.clone(),
            launched_at: None,
        }
    }

    fn detonate(&mut self, effects: &mut EffectBuffer) {
        self.launched_at = None;
        self.core.deactivate();
        effects.push(AbilityEffect::DetonateBomb);
        effects.cue(AbilityKind::TriggerBomb, CueKind::Detonated);
    }

    fn is_armed(&self, now: f64) -> bool {
        self.launched_at
            .is_some_and(|t| now - t >= self.config.arm_delay as f64)
    }
}

impl Ability for TriggerBomb {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if self.core.duration_elapsed(ctx.now) {
            self.detonate(ctx.effects);
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if !ctx.input.pressed {
            return Ok(());
        }
        if self.core.is_engaged() {
            if self.is_armed(ctx.now) {
                self.detonate(ctx.effects);
            }
            return Ok(());
        }
        if self.core.try_activate(ctx.now, &ctx.exclusion, Ok(())).is_ok() {
            let direction = ctx.ship.aim_or_forward();
            ctx.effects.push(AbilityEffect::Attach(Attachment::Bomb(BombSpec {
                position: ctx.ship.position + direction * LAUNCH_OFFSET,
                velocity: ctx.ship.velocity + direction * self.config.launch_speed,
                blast_radius: self.config.blast_radius,
                damage: self.config.damage,
                impact: self.config.impact,
                target: ctx.ship.team.opponent(),
            })));
            ctx.effects.cue(AbilityKind::TriggerBomb, CueKind::Activated);
            self.launched_at = Some(ctx.now);
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers::IDENTITY
    }

    fn attachment_lost(&mut self, kind: AttachmentKind, _now: f64, _effects: &mut EffectBuffer) {
        if kind == AttachmentKind::Bomb && self.core.is_engaged() {
            self.launched_at = None;
            self.core.deactivate();
        }
    }

    /// Removes the bomb without detonating it.
    fn cancel(&mut self, effects: &mut EffectBuffer) {
        if self.core.is_engaged() {
            effects.push(AbilityEffect::Detach(AttachmentKind::Bomb));
        }
        self.launched_at = None;
        self.core.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::test_support::Harness;
    use crate::ability::{AbilitySlot, Loadout, SlotInput};

    const S: AbilitySlot = AbilitySlot::Special;

    fn harness() -> Harness {
        Harness::new(Loadout::default().with(S, TriggerBomb::new(&TriggerBombConfig::default())))
    }

    fn detonations(h: &Harness) -> usize {
        h.emitted(|e| *e == AbilityEffect::DetonateBomb)
    }

    #[test]
    fn second_press_detonates_once_armed() {
        let mut h = harness();
        h.tick_now(&[(S, SlotInput::PRESS)]);
        assert!(h.loadout.is_active(AbilityKind::TriggerBomb));

        // Too soon: arm delay is 0.25 s.
        h.step(0.125, &[(S, SlotInput::PRESS)]);
        assert_eq!(detonations(&h), 0);
        assert!(h.loadout.is_active(AbilityKind::TriggerBomb));

        h.step(0.125, &[(S, SlotInput::PRESS)]);
        assert_eq!(detonations(&h), 1);
        assert!(!h.loadout.is_active(AbilityKind::TriggerBomb));
    }

    #[test]
    fn fuse_detonates_automatically() {
        let mut h = harness();
        h.tick_now(&[(S, SlotInput::PRESS)]);
        h.run_until(TriggerBombConfig::default().fuse as f64, 0.25, &[]);
        assert_eq!(detonations(&h), 1);
        assert!(!h.loadout.is_active(AbilityKind::TriggerBomb));
    }

    #[test]
    fn losing_the_bomb_ends_the_ability() {
        let mut h = harness();
        h.tick_now(&[(S, SlotInput::PRESS)]);
        h.loadout
            .attachment_lost(AttachmentKind::Bomb, 0.5, &mut h.effects);
        assert!(!h.loadout.is_active(AbilityKind::TriggerBomb));

        // No stale fuse fires later.
        h.run_until(5.0, 0.25, &[]);
        assert_eq!(detonations(&h), 0);
    }

    #[test]
    fn bomb_inherits_ship_velocity() {
        let mut h = harness();
        h.ship.velocity = bevy::math::Vec2::new(50.0, 0.0);
        h.tick_now(&[(S, SlotInput::PRESS)]);
        let spec = h
            .history
            .iter()
            .find_map(|e| match e {
                AbilityEffect::Attach(Attachment::Bomb(spec)) => Some(*spec),
                _ => None,
            })
            .expect("bomb launched");
        assert_eq!(spec.velocity.x, 50.0);
        assert!(spec.velocity.y > 0.0);
    }
}
