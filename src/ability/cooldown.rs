//! Cooldown gate: "has enough time passed since this ability was last used?"

/// Tracks the last successful use of one ability.
///
/// A gate that has never been used is always ready.  `mark_used` is the only
/// mutator; callers invoke it exactly once per successful activation (or per
/// successful effect, for abilities whose cooldown starts on fire).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownGate {
    cooldown: f32,
    last_used_at: Option<f64>,
}

impl CooldownGate {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            last_used_at: None,
        }
    }

    #[inline]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    #[inline]
    pub fn last_used_at(&self) -> Option<f64> {
        self.last_used_at
    }

    /// `now >= last_used + cooldown`.
    #[inline]
    pub fn is_ready(&self, now: f64) -> bool {
        match self.last_used_at {
            None => true,
            Some(last) => now >= last + self.cooldown as f64,
        }
    }

    /// Seconds until the gate reopens, never negative.
    pub fn time_remaining(&self, now: f64) -> f32 {
        match self.last_used_at {
            None => 0.0,
            Some(last) => (last + self.cooldown as f64 - now).max(0.0) as f32,
        }
    }

    /// Fraction of the cooldown already elapsed, in `[0, 1]`.  Drives UI fill bars.
    pub fn fill_fraction(&self, now: f64) -> f32 {
        if self.cooldown <= 0.0 {
            return 1.0;
        }
        1.0 - (self.time_remaining(now) / self.cooldown).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn mark_used(&mut self, now: f64) {
        self.last_used_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_gate_is_ready() {
        let gate = CooldownGate::new(5.0);
        assert!(gate.is_ready(0.0));
        assert_eq!(gate.time_remaining(0.0), 0.0);
    }

    #[test]
    fn repeated_ready_checks_do_not_change_state() {
        let mut gate = CooldownGate::new(5.0);
        gate.mark_used(1.0);
        let before = gate;
        for _ in 0..10 {
            let _ = gate.is_ready(3.0);
            let _ = gate.time_remaining(3.0);
        }
        assert_eq!(gate, before);
    }

    #[test]
    fn mark_used_closes_gate_immediately() {
        let mut gate = CooldownGate::new(5.0);
        gate.mark_used(0.0);
        assert!(!gate.is_ready(0.0));
        assert!(!gate.is_ready(4.0));
        assert!(gate.is_ready(5.0));
    }

    #[test]
    fn zero_cooldown_reopens_at_once() {
        let mut gate = CooldownGate::new(0.0);
        gate.mark_used(2.0);
        assert!(gate.is_ready(2.0));
    }

    #[test]
    fn time_remaining_clamps_at_zero() {
        let mut gate = CooldownGate::new(2.0);
        gate.mark_used(10.0);
        assert!((gate.time_remaining(11.0) - 1.0).abs() < 1e-6);
        assert_eq!(gate.time_remaining(20.0), 0.0);
    }

    #[test]
    fn fill_fraction_tracks_progress() {
        let mut gate = CooldownGate::new(4.0);
        gate.mark_used(0.0);
        assert!((gate.fill_fraction(1.0) - 0.25).abs() < 1e-6);
        assert_eq!(gate.fill_fraction(8.0), 1.0);
    }
}
