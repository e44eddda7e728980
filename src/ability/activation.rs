//! Shared activation state machine.
//!
//! ```text
//! Idle ──(guards pass)──▶ Activating(pre-delay) ──▶ Active ──▶ Idle
//!                 └───────(no pre-delay)──────────▶ Active
//! ```
//!
//! Every Idle → Active attempt runs the guards in a fixed order:
//!
//! 0. configuration valid
//! 1. cooldown gate ready
//! 2. heat not locked
//! 3. exclusion group free
//! 4. ability-specific precondition
//!
//! The first failure aborts the attempt with no state change and no cooldown
//! consumption.  How `Active` ends (input release, duration, overheat, bomb
//! detonation…) is up to each ability; this module only owns the bookkeeping.

use super::capacity::{CapacityResource, HeatConfig};
use super::cooldown::CooldownGate;
use super::exclusion::{ExclusionGroup, ExclusionView};
use super::AbilityKind;
use crate::error::GuardFailure;
use bevy::log::debug;

/// Immutable per-ability timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityStats {
    pub cooldown: f32,
    /// Active window for timed abilities; ignored by toggles.
    pub duration: f32,
}

/// When the cooldown gate is stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownPolicy {
    /// Stamped as soon as activation succeeds (shield, reflect, teleport, bomb, toggles).
    OnActivation,
    /// Stamped by the ability when its effect actually happens (GigaBlast fire,
    /// dash launch).  A release that produces nothing leaves the gate open.
    OnEffect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationState {
    Idle,
    Activating { ready_at: f64 },
    Active { since: f64 },
}

/// Outcome of the per-tick heat update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatTick {
    /// No heat pool, or nothing notable.
    Nominal,
    /// The pool hit its ceiling while active: the owner must shut off this tick.
    Overheated,
}

/// Bookkeeping every ability embeds.
#[derive(Debug, Clone)]
pub struct AbilityCore {
    kind: AbilityKind,
    stats: AbilityStats,
    cooldown: CooldownGate,
    heat: Option<CapacityResource>,
    exclusion: Option<ExclusionGroup>,
    activation_delay: f32,
    policy: CooldownPolicy,
    state: ActivationState,
    misconfigured: bool,
}

impl AbilityCore {
    pub fn new(kind: AbilityKind, stats: AbilityStats, policy: CooldownPolicy) -> Self {
        Self {
            kind,
            stats,
            cooldown: CooldownGate::new(stats.cooldown),
            heat: None,
            exclusion: None,
            activation_delay: 0.0,
            policy,
            state: ActivationState::Idle,
            misconfigured: false,
        }
    }

    pub fn with_heat(mut self, heat: Option<HeatConfig>) -> Self {
        self.heat = heat.map(CapacityResource::new);
        self
    }

    pub fn with_exclusion(mut self, group: Option<ExclusionGroup>) -> Self {
        self.exclusion = group;
        self
    }

    pub fn with_activation_delay(mut self, delay: f32) -> Self {
        self.activation_delay = delay.max(0.0);
        self
    }

    /// Disable activation for good when the source config failed validation.
    pub fn with_validation<E: std::fmt::Display>(mut self, result: Result<(), E>) -> Self {
        if let Err(err) = result {
            bevy::log::warn!(ability = ?self.kind, %err, "invalid ability config; ability disabled");
            self.misconfigured = true;
        }
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> AbilityKind {
        self.kind
    }

    #[inline]
    pub fn stats(&self) -> AbilityStats {
        self.stats
    }

    #[inline]
    pub fn state(&self) -> ActivationState {
        self.state
    }

    #[inline]
    pub fn cooldown(&self) -> &CooldownGate {
        &self.cooldown
    }

    #[inline]
    pub fn heat(&self) -> Option<&CapacityResource> {
        self.heat.as_ref()
    }

    #[inline]
    pub fn exclusion(&self) -> Option<ExclusionGroup> {
        self.exclusion
    }

    #[inline]
    pub fn is_misconfigured(&self) -> bool {
        self.misconfigured
    }

    /// Activating or Active.  Occupies the exclusion group.
    #[inline]
    pub fn is_engaged(&self) -> bool {
        !matches!(self.state, ActivationState::Idle)
    }

    /// Fully Active (past any pre-delay).
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, ActivationState::Active { .. })
    }

    /// Seconds spent Active, `None` when not Active.
    pub fn active_elapsed(&self, now: f64) -> Option<f32> {
        match self.state {
            ActivationState::Active { since } => Some((now - since).max(0.0) as f32),
            _ => None,
        }
    }

    /// `true` once a timed ability has been Active for its full duration.
    pub fn duration_elapsed(&self, now: f64) -> bool {
        self.active_elapsed(now)
            .is_some_and(|elapsed| elapsed >= self.stats.duration)
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Run the guard chain without changing any state.
    pub fn check_guards(
        &self,
        now: f64,
        exclusion: &ExclusionView,
        precondition: Result<(), &'static str>,
    ) -> Result<(), GuardFailure> {
        if self.misconfigured {
            return Err(GuardFailure::InvalidConfiguration);
        }
        if !self.cooldown.is_ready(now) {
            return Err(GuardFailure::CooldownPending {
                remaining: self.cooldown.time_remaining(now),
            });
        }
        if self.heat.as_ref().is_some_and(CapacityResource::is_locked) {
            return Err(GuardFailure::Overheated);
        }
        if let Some(group) = exclusion.conflict(self.exclusion) {
            return Err(GuardFailure::Excluded { group });
        }
        precondition.map_err(GuardFailure::PreconditionUnmet)
    }

    /// Idle → Activating/Active.  Stamps the cooldown under
    /// [`CooldownPolicy::OnActivation`].
    pub fn try_activate(
        &mut self,
        now: f64,
        exclusion: &ExclusionView,
        precondition: Result<(), &'static str>,
    ) -> Result<(), GuardFailure> {
        if self.is_engaged() {
            return Ok(());
        }
        if let Err(failure) = self.check_guards(now, exclusion, precondition) {
            debug!(ability = ?self.kind, %failure, "activation refused");
            return Err(failure);
        }
        self.state = if self.activation_delay > 0.0 {
            ActivationState::Activating {
                ready_at: now + self.activation_delay as f64,
            }
        } else {
            ActivationState::Active { since: now }
        };
        if self.policy == CooldownPolicy::OnActivation {
            self.cooldown.mark_used(now);
        }
        Ok(())
    }

    /// Promote Activating → Active once the pre-delay has passed.
    /// Returns `true` on the tick the promotion happens.
    pub fn advance_activation(&mut self, now: f64) -> bool {
        if let ActivationState::Activating { ready_at } = self.state {
            if now >= ready_at {
                self.state = ActivationState::Active { since: now };
                return true;
            }
        }
        false
    }

    /// Drain heat while engaged, regenerate while idle.
    pub fn update_heat(&mut self, dt: f32) -> HeatTick {
        let engaged = self.is_engaged();
        let Some(heat) = self.heat.as_mut() else {
            return HeatTick::Nominal;
        };
        if engaged {
            heat.drain(dt);
            if heat.is_locked() {
                return HeatTick::Overheated;
            }
        } else {
            heat.regen(dt);
        }
        HeatTick::Nominal
    }

    /// Stamp the cooldown for [`CooldownPolicy::OnEffect`] abilities.
    pub fn mark_used(&mut self, now: f64) {
        self.cooldown.mark_used(now);
    }

    /// Any state → Idle.
    pub fn deactivate(&mut self) {
        self.state = ActivationState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed_core() -> AbilityCore {
        AbilityCore::new(
            AbilityKind::Shield,
            AbilityStats {
                cooldown: 5.0,
                duration: 2.0,
            },
            CooldownPolicy::OnActivation,
        )
    }

    #[test]
    fn cooldown_five_duration_two_scenario() {
        let mut core = timed_core();
        let free = ExclusionView::default();

        assert!(core.try_activate(0.0, &free, Ok(())).is_ok());
        assert!(core.is_active());
        assert!(!core.duration_elapsed(1.99));
        assert!(core.duration_elapsed(2.0));
        core.deactivate();

        assert!(matches!(
            core.try_activate(4.0, &free, Ok(())),
            Err(GuardFailure::CooldownPending { .. })
        ));
        assert!(!core.is_engaged());

        assert!(core.try_activate(5.0, &free, Ok(())).is_ok());
        assert!(core.is_active());
    }

    #[test]
    fn guard_order_reports_cooldown_before_exclusion() {
        let mut core = timed_core().with_exclusion(Some(ExclusionGroup::Defense));
        let free = ExclusionView::default();
        core.try_activate(0.0, &free, Ok(())).unwrap();
        core.deactivate();

        let mut busy = ExclusionView::default();
        busy.occupy(ExclusionGroup::Defense);
        assert!(matches!(
            core.check_guards(1.0, &busy, Err("nope")),
            Err(GuardFailure::CooldownPending { .. })
        ));
        assert_eq!(
            core.check_guards(6.0, &busy, Err("nope")),
            Err(GuardFailure::Excluded {
                group: ExclusionGroup::Defense
            })
        );
        assert_eq!(
            core.check_guards(6.0, &ExclusionView::default(), Err("nope")),
            Err(GuardFailure::PreconditionUnmet("nope"))
        );
    }

    #[test]
    fn failed_guard_does_not_consume_cooldown() {
        let mut core = timed_core();
        assert!(core.try_activate(0.0, &ExclusionView::default(), Err("missing emitter")).is_err());
        assert!(core.cooldown().last_used_at().is_none());
        assert!(!core.is_engaged());
    }

    #[test]
    fn on_effect_policy_leaves_gate_open_on_activation() {
        let mut core = AbilityCore::new(
            AbilityKind::GigaBlast,
            AbilityStats {
                cooldown: 3.0,
                duration: 0.0,
            },
            CooldownPolicy::OnEffect,
        );
        core.try_activate(0.0, &ExclusionView::default(), Ok(())).unwrap();
        assert!(core.cooldown().is_ready(0.0));
        core.mark_used(1.0);
        assert!(!core.cooldown().is_ready(1.0));
    }

    #[test]
    fn misconfigured_core_never_activates() {
        let mut core = timed_core().with_validation(Err("duration must be > 0"));
        assert_eq!(
            core.try_activate(0.0, &ExclusionView::default(), Ok(())),
            Err(GuardFailure::InvalidConfiguration)
        );
    }

    #[test]
    fn activation_delay_passes_through_activating() {
        let mut core = timed_core().with_activation_delay(0.5);
        core.try_activate(0.0, &ExclusionView::default(), Ok(())).unwrap();
        assert!(core.is_engaged());
        assert!(!core.is_active());
        assert!(!core.advance_activation(0.25));
        assert!(core.advance_activation(0.5));
        assert!(core.is_active());
    }

    #[test]
    fn overheated_core_refuses_activation() {
        let mut core = AbilityCore::new(
            AbilityKind::Beam,
            AbilityStats {
                cooldown: 0.1,
                duration: 0.0,
            },
            CooldownPolicy::OnActivation,
        )
        .with_heat(Some(HeatConfig {
            max: 10.0,
            drain_rate: 10.0,
            regen_rate: 1.0,
        }));
        core.try_activate(0.0, &ExclusionView::default(), Ok(())).unwrap();
        assert_eq!(core.update_heat(1.0), HeatTick::Overheated);
        core.deactivate();
        assert_eq!(
            core.try_activate(5.0, &ExclusionView::default(), Ok(())),
            Err(GuardFailure::Overheated)
        );
        core.update_heat(0.5);
        assert!(core.try_activate(5.0, &ExclusionView::default(), Ok(())).is_ok());
    }
}
