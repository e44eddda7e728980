//! Charge tiers: how long an ability was held before release, bucketed into
//! four discrete levels that index per-tier lookup tables.
//!
//! | Elapsed hold time | Tier |
//! |-------------------|------|
//! | `>= t4`           | 4    |
//! | `>= t3`           | 3    |
//! | `>= t2`           | 2    |
//! | anything else     | 1    |
//!
//! Tier 1 is the floor once charging has begun, even below `t1`.  Whether a
//! release below `min_charge_time` produces anything is decided by
//! [`ChargeSession::release`], not by the tier lookup.

use crate::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::ops::Index;

/// One of the four charge levels.  Tier 5+ is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChargeTier {
    One,
    Two,
    Three,
    Four,
}

impl ChargeTier {
    pub const ALL: [ChargeTier; 4] = [
        ChargeTier::One,
        ChargeTier::Two,
        ChargeTier::Three,
        ChargeTier::Four,
    ];

    /// Zero-based table index.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ChargeTier::One => 0,
            ChargeTier::Two => 1,
            ChargeTier::Three => 2,
            ChargeTier::Four => 3,
        }
    }

    /// Human-readable 1-based level.
    #[inline]
    pub fn level(self) -> u32 {
        self.index() as u32 + 1
    }
}

/// Ordered hold-time thresholds `[t1, t2, t3, t4]` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChargeThresholds(pub [f32; 4]);

impl ChargeThresholds {
    pub fn validate(&self, section: &'static str) -> ConfigResult<()> {
        let t = self.0;
        let ordered = t.iter().all(|v| v.is_finite() && *v >= 0.0)
            && t.windows(2).all(|w| w[0] <= w[1]);
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::UnorderedThresholds {
                section,
                thresholds: t,
            })
        }
    }

    /// Highest tier whose threshold has been reached, floored at tier 1.
    pub fn tier_for(&self, elapsed: f32) -> ChargeTier {
        let [_, t2, t3, t4] = self.0;
        if elapsed >= t4 {
            ChargeTier::Four
        } else if elapsed >= t3 {
            ChargeTier::Three
        } else if elapsed >= t2 {
            ChargeTier::Two
        } else {
            ChargeTier::One
        }
    }
}

/// Fixed-size per-tier lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TierTable<T>(pub [T; 4]);

impl<T> Index<ChargeTier> for TierTable<T> {
    type Output = T;

    #[inline]
    fn index(&self, tier: ChargeTier) -> &T {
        &self.0[tier.index()]
    }
}

/// Hold-time window shared by every charge-and-release ability.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChargeWindow {
    pub thresholds: ChargeThresholds,
    /// Releases shorter than this produce nothing.
    pub min_charge_time: f32,
    /// Hold time is capped here before the tier lookup; charging past it
    /// forces an automatic release.
    pub max_charge_time: f32,
}

impl ChargeWindow {
    pub fn validate(&self, section: &'static str) -> ConfigResult<()> {
        self.thresholds.validate(section)?;
        crate::error::require_non_negative(section, "min_charge_time", self.min_charge_time)?;
        crate::error::require_positive(section, "max_charge_time", self.max_charge_time)?;
        if self.min_charge_time > self.max_charge_time {
            return Err(ConfigError::ChargeWindow {
                section,
                min: self.min_charge_time,
                max: self.max_charge_time,
            });
        }
        Ok(())
    }
}

/// Result of ending a charge session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChargeRelease {
    /// Held too briefly; nothing happens and no cooldown starts.
    TooEarly { elapsed: f32 },
    /// Fire at the given tier.
    Fire { tier: ChargeTier, held: f32 },
}

/// An in-progress charge, created on charge-begin and consumed by
/// [`ChargeSession::release`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeSession {
    started_at: f64,
    current_tier: ChargeTier,
}

impl ChargeSession {
    pub fn begin(now: f64) -> Self {
        Self {
            started_at: now,
            current_tier: ChargeTier::One,
        }
    }

    #[inline]
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    #[inline]
    pub fn current_tier(&self) -> ChargeTier {
        self.current_tier
    }

    #[inline]
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.started_at).max(0.0) as f32
    }

    /// Recompute the tier for this tick.  The stored tier never decreases
    /// while the session lives.
    pub fn update(&mut self, now: f64, window: &ChargeWindow) -> ChargeTier {
        let held = self.elapsed(now).min(window.max_charge_time);
        let tier = window.thresholds.tier_for(held);
        if tier > self.current_tier {
            self.current_tier = tier;
        }
        self.current_tier
    }

    /// `true` once the hold has reached `max_charge_time`.
    #[inline]
    pub fn is_overcharged(&self, now: f64, window: &ChargeWindow) -> bool {
        self.elapsed(now) >= window.max_charge_time
    }

    /// End the session.  Hold time is capped at `max_charge_time` before the
    /// tier lookup.
    pub fn release(self, now: f64, window: &ChargeWindow) -> ChargeRelease {
        let elapsed = self.elapsed(now);
        if elapsed < window.min_charge_time {
            return ChargeRelease::TooEarly { elapsed };
        }
        let held = elapsed.min(window.max_charge_time);
        ChargeRelease::Fire {
            tier: window.thresholds.tier_for(held),
            held,
        }
    }
}
