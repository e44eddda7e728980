//! Charge-then-dash.
//!
//! Hold to wind up: the ship stretches along its nose and gets heavier with
//! each tier.  Release launches a dash along the nose at the tier's speed,
//! during which thrust is cut and steering is mostly locked.  Releasing before
//! `min_charge_time` cancels without a dash or cooldown.

use crate::ability::sequence::{PhaseHandler, PhaseSpec, SequenceOutcome, SequenceStatus, TemporalSequence};
use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, ChargeRelease, ChargeSession,
    ChargeTier, CooldownPolicy, CueKind, EffectBuffer, ExclusionGroup, Modifiers, TickContext,
};
use crate::config::StretchDashConfig;
use crate::error::{AbilityError, AbilityResult};
use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPhase {
    Dash,
}

#[derive(Debug, Clone, Copy)]
struct DashHandler {
    velocity: Vec2,
}

impl PhaseHandler<DashPhase> for DashHandler {
    fn on_begin(&mut self, effects: &mut EffectBuffer) {
        effects.push(AbilityEffect::SetScale(Vec2::ONE));
        effects.push(AbilityEffect::SetLinearVelocity(self.velocity));
    }

    fn on_finish(&mut self, _outcome: SequenceOutcome, effects: &mut EffectBuffer) {
        effects.push(AbilityEffect::SetScale(Vec2::ONE));
    }
}

enum DashState {
    Idle,
    Charging(ChargeSession),
    Dashing {
        sequence: TemporalSequence<DashPhase>,
        handler: DashHandler,
    },
}

pub struct StretchDash {
    core: AbilityCore,
    config: StretchDashConfig,
    state: DashState,
}

impl StretchDash {
    pub fn new(config: &StretchDashConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::StretchDash,
            AbilityStats {
                cooldown: config.cooldown,
                duration: config.dash_duration,
            },
            CooldownPolicy::OnEffect,
        )
        .with_exclusion(Some(ExclusionGroup::Mobility))
        .with_validation(config.validate());
        Self {
            core,
            config: config.clone(),
            state: DashState::Idle,
        }
    }

    fn stretch(&self, tier: ChargeTier) -> Vec2 {
        let s = self.config.stretch_scale[tier];
        Vec2::new(1.0 / s, s)
    }

    fn launch(&mut self, ctx: &mut TickContext, session: ChargeSession) {
        match session.release(ctx.now, &self.config.window) {
            ChargeRelease::TooEarly { .. } => {
                self.state = DashState::Idle;
                self.core.deactivate();
                ctx.effects.push(AbilityEffect::SetScale(Vec2::ONE));
                ctx.effects.cue(AbilityKind::StretchDash, CueKind::Fizzled);
            }
            ChargeRelease::Fire { tier, .. } => {
                let mut handler = DashHandler {
                    velocity: ctx.ship.forward.normalize_or_zero() * self.config.dash_speed[tier],
                };
                let sequence = TemporalSequence::start(
                    vec![PhaseSpec::new(DashPhase::Dash, self.config.dash_duration)],
                    ctx.now,
                    &mut handler,
                    ctx.effects,
                );
                self.state = DashState::Dashing { sequence, handler };
                self.core.mark_used(ctx.now);
                ctx.effects.cue(AbilityKind::StretchDash, CueKind::Fired);
            }
        }
    }
}

impl Ability for StretchDash {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        match &mut self.state {
            DashState::Idle if self.core.is_engaged() => Err(AbilityError::MissingSession {
                ability: AbilityKind::StretchDash,
            }),
            DashState::Idle => Ok(()),
            DashState::Charging(session) => {
                let before = session.current_tier();
                let tier = session.update(ctx.now, &self.config.window);
                let overcharged = session.is_overcharged(ctx.now, &self.config.window);
                let session = *session;
                if tier != before {
                    ctx.effects.push(AbilityEffect::SetScale(self.stretch(tier)));
                    ctx.effects
                        .cue(AbilityKind::StretchDash, CueKind::ChargeTier(tier));
                }
                if overcharged {
                    self.launch(ctx, session);
                }
                Ok(())
            }
            DashState::Dashing { sequence, handler } => {
                if sequence.advance(ctx.now, handler, ctx.effects) == SequenceStatus::Finished {
                    self.state = DashState::Idle;
                    self.core.deactivate();
                }
                Ok(())
            }
        }
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        match self.state {
            DashState::Idle => {
                if ctx.input.pressed && self.core.try_activate(ctx.now, &ctx.exclusion, Ok(())).is_ok() {
                    let session = ChargeSession::begin(ctx.now);
                    ctx.effects
                        .push(AbilityEffect::SetScale(self.stretch(session.current_tier())));
                    ctx.effects.cue(AbilityKind::StretchDash, CueKind::Activated);
                    self.state = DashState::Charging(session);
                }
            }
            DashState::Charging(session) if !ctx.input.held => self.launch(ctx, session),
            DashState::Charging(_) => {}
            // Not re-triggerable: a press mid-dash is dropped, not queued.
            DashState::Dashing { .. } => {}
        }
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        match &self.state {
            DashState::Idle => Modifiers::IDENTITY,
            DashState::Charging(session) => {
                let tier = session.current_tier();
                Modifiers::movement(
                    self.config.thrust_penalty[tier],
                    self.config.rotation_penalty[tier],
                )
            }
            // The launch velocity carries the ship; held thrust must not add to it.
            DashState::Dashing { .. } => Modifiers::movement(0.0, self.config.dash_rotation_factor),
        }
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        match std::mem::replace(&mut self.state, DashState::Idle) {
            DashState::Idle => {}
            DashState::Charging(_) => effects.push(AbilityEffect::SetScale(Vec2::ONE)),
            DashState::Dashing {
                mut sequence,
                mut handler,
            } => sequence.cancel(&mut handler, effects),
        }
        self.core.deactivate();
    }
}
