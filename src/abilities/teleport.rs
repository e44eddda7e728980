//! Short-range teleport driven by a [`TemporalSequence`].
//!
//! ```text
//! PreDelay ──▶ Shrink ──▶ Warp (instant) ──▶ Grow
//! ```
//!
//! The ship is intangible from the first tick of `PreDelay` until `Grow`
//! finishes.  The core sits in `Activating` for the pre-delay and turns
//! `Active` when `Shrink` begins.  Pressing again mid-flight (cooldown permitting) cancels the
//! running sequence, restoring collision, visibility and scale, and starts a
//! fresh one from wherever the ship is now.

use crate::ability::sequence::{PhaseHandler, PhaseSpec, SequenceOutcome, SequenceStatus, TemporalSequence};
use crate::ability::{
    Ability, AbilityCore, AbilityEffect, AbilityKind, AbilityStats, CooldownPolicy, CueKind,
    EffectBuffer, ExclusionGroup, Modifiers, ShipContext, TickContext,
};
use crate::config::TeleportConfig;
use crate::error::{AbilityError, AbilityResult};
use bevy::math::Vec2;

/// Smallest scale written while shrunk; a zero scale breaks child transforms.
const MIN_SCALE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportPhase {
    PreDelay,
    Shrink,
    Warp,
    Grow,
}

/// Effects for one in-flight teleport.
#[derive(Debug, Clone, Copy)]
struct WarpHandler {
    target: Vec2,
    overshoot: f32,
}

impl PhaseHandler<TeleportPhase> for WarpHandler {
    fn on_begin(&mut self, effects: &mut EffectBuffer) {
        effects.push(AbilityEffect::SetCollision(false));
    }

    fn on_enter(&mut self, phase: TeleportPhase, effects: &mut EffectBuffer) {
        if phase == TeleportPhase::Warp {
            effects.cue(AbilityKind::Teleport, CueKind::WarpOut);
            effects.push(AbilityEffect::SetVisible(false));
            effects.push(AbilityEffect::Warp { to: self.target });
        }
    }

    fn on_tick(&mut self, phase: TeleportPhase, progress: f32, effects: &mut EffectBuffer) {
        let scale = match phase {
            TeleportPhase::Shrink => 1.0 + (MIN_SCALE - 1.0) * progress,
            TeleportPhase::Grow if progress < 0.5 => {
                MIN_SCALE + (self.overshoot - MIN_SCALE) * (progress * 2.0)
            }
            TeleportPhase::Grow => self.overshoot + (1.0 - self.overshoot) * ((progress - 0.5) * 2.0),
            TeleportPhase::PreDelay | TeleportPhase::Warp => return,
        };
        effects.push(AbilityEffect::SetScale(Vec2::splat(scale)));
    }

    fn on_exit(&mut self, phase: TeleportPhase, effects: &mut EffectBuffer) {
        if phase == TeleportPhase::Warp {
            effects.push(AbilityEffect::SetVisible(true));
            effects.cue(AbilityKind::Teleport, CueKind::WarpIn);
        }
    }

    fn on_finish(&mut self, _outcome: SequenceOutcome, effects: &mut EffectBuffer) {
        effects.push(AbilityEffect::SetScale(Vec2::ONE));
        effects.push(AbilityEffect::SetVisible(true));
        effects.push(AbilityEffect::SetCollision(true));
    }
}

struct InFlight {
    sequence: TemporalSequence<TeleportPhase>,
    handler: WarpHandler,
}

pub struct Teleport {
    core: AbilityCore,
    config: TeleportConfig,
    in_flight: Option<InFlight>,
}

impl Teleport {
    pub fn new(config: &TeleportConfig) -> Self {
        let core = AbilityCore::new(
            AbilityKind::Teleport,
            AbilityStats {
                cooldown: config.cooldown,
                duration: 0.0,
            },
            CooldownPolicy::OnActivation,
        )
        .with_exclusion(Some(ExclusionGroup::Mobility))
        .with_activation_delay(config.pre_delay)
        .with_validation(config.validate());
        Self {
            core,
            config: config.clone(),
            in_flight: None,
        }
    }

    /// Phase of the running sequence, if any.
    pub fn phase(&self) -> Option<TeleportPhase> {
        self.in_flight.as_ref().and_then(|f| f.sequence.current())
    }

    fn destination(&self, ship: &ShipContext) -> Vec2 {
        ship.position + ship.aim_or_forward() * self.config.range
    }

    fn phases(&self) -> Vec<PhaseSpec<TeleportPhase>> {
        vec![
            PhaseSpec::new(TeleportPhase::PreDelay, self.config.pre_delay),
            PhaseSpec::new(TeleportPhase::Shrink, self.config.shrink_time),
            PhaseSpec::new(TeleportPhase::Warp, 0.0),
            PhaseSpec::new(TeleportPhase::Grow, self.config.grow_time),
        ]
    }

    /// Abort the running sequence and restore everything it suppressed.
    fn abort(&mut self, effects: &mut EffectBuffer) {
        if let Some(mut flight) = self.in_flight.take() {
            flight.sequence.cancel(&mut flight.handler, effects);
        }
        self.core.deactivate();
    }
}

impl Ability for Teleport {
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
        let flight = self.in_flight.as_mut().ok_or(AbilityError::MissingSequence {
            ability: AbilityKind::Teleport,
        })?;
        if flight.sequence.advance(ctx.now, &mut flight.handler, ctx.effects) == SequenceStatus::Finished {
            self.in_flight = None;
            self.core.deactivate();
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
        if !ctx.input.pressed {
            return Ok(());
        }
        let target = self.destination(ctx.ship);
        let precondition = if target.length() <= ctx.ship.arena_radius {
            Ok(())
        } else {
            Err("teleport target outside the arena")
        };
        if self.core.check_guards(ctx.now, &ctx.exclusion, precondition).is_err() {
            return Ok(());
        }
        if self.core.is_engaged() {
            self.abort(ctx.effects);
        }
        if self.core.try_activate(ctx.now, &ctx.exclusion, precondition).is_err() {
            return Ok(());
        }

        let mut handler = WarpHandler {
            target,
            overshoot: self.config.overshoot,
        };
        let sequence = TemporalSequence::start(self.phases(), ctx.now, &mut handler, ctx.effects);
        self.in_flight = Some(InFlight { sequence, handler });
        Ok(())
    }

    fn modifiers(&self) -> Modifiers {
        if self.core.is_engaged() {
            Modifiers::movement(0.0, 1.0)
        } else {
            Modifiers::IDENTITY
        }
    }

    fn cancel(&mut self, effects: &mut EffectBuffer) {
        self.abort(effects);
    }
}
