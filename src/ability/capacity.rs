//! Heat: a bounded capacity that rises while an ability fires and bleeds off
//! while it rests.

use crate::error::{require_non_negative, require_positive, ConfigResult};
use serde::Deserialize;

/// Drain/regen rates and ceiling for one heat pool.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HeatConfig {
    /// Ceiling.  Reaching it while active forces the ability off.
    pub max: f32,
    /// Units gained per second while the ability is active.
    pub drain_rate: f32,
    /// Units shed per second while the ability is idle.
    pub regen_rate: f32,
}

impl HeatConfig {
    pub fn validate(&self, section: &'static str) -> ConfigResult<()> {
        require_positive(section, "heat.max", self.max)?;
        require_non_negative(section, "heat.drain_rate", self.drain_rate)?;
        require_non_negative(section, "heat.regen_rate", self.regen_rate)
    }
}

/// Bounded scalar in `[0, max]`.
///
/// `drain` and `regen` are never called in the same tick for one resource;
/// the owning ability picks exactly one based on whether it is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityResource {
    config: HeatConfig,
    current: f32,
}

impl CapacityResource {
    pub fn new(config: HeatConfig) -> Self {
        Self {
            config,
            current: 0.0,
        }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.config.max
    }

    /// Normalised heat in `[0, 1]` for gauges.
    pub fn fraction(&self) -> f32 {
        if self.config.max <= 0.0 {
            return 1.0;
        }
        (self.current / self.config.max).clamp(0.0, 1.0)
    }

    /// `current = min(max, current + drain_rate * dt)`.
    pub fn drain(&mut self, dt: f32) {
        self.current = (self.current + self.config.drain_rate * dt).min(self.config.max);
    }

    /// `current = max(0, current - regen_rate * dt)`.
    pub fn regen(&mut self, dt: f32) {
        self.current = (self.current - self.config.regen_rate * dt).max(0.0);
    }

    /// Overheated: no activation allowed, and an active owner must shut off.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.current >= self.config.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn heat() -> HeatConfig {
        HeatConfig {
            max: 100.0,
            drain_rate: 20.0,
            regen_rate: 35.0,
        }
    }

    #[test]
    fn drain_clamps_at_max() {
        let mut res = CapacityResource::new(heat());
        res.drain(10.0);
        assert_eq!(res.current(), 100.0);
        assert!(res.is_locked());
    }

    #[test]
    fn regen_clamps_at_zero() {
        let mut res = CapacityResource::new(heat());
        res.drain(1.0);
        res.regen(10.0);
        assert_eq!(res.current(), 0.0);
        assert!(!res.is_locked());
    }

    #[test]
    fn reaches_exactly_max_after_five_seconds_at_twenty_per_second() {
        let mut res = CapacityResource::new(heat());
        for _ in 0..19 {
            res.drain(0.25);
            assert!(!res.is_locked());
        }
        res.drain(0.25);
        assert_eq!(res.current(), 100.0);
        assert!(res.is_locked());
    }

    #[test]
    fn bounds_hold_for_arbitrary_call_sequences() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut res = CapacityResource::new(heat());
        for _ in 0..10_000 {
            let dt = rng.gen_range(0.0..0.5);
            if rng.gen_bool(0.5) {
                res.drain(dt);
            } else {
                res.regen(dt);
            }
            assert!(
                (0.0..=100.0).contains(&res.current()),
                "heat escaped bounds: {}",
                res.current()
            );
        }
    }
}
