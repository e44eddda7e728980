//! Multiplicative modifiers contributed by active abilities.
//!
//! Composition is pure: the ship's stored base thrust / rotation is never
//! written.  Each tick the movement system asks the loadout for its composed
//! [`Modifiers`] and computes `effective = base × factor` on the fly, so there
//! is nothing to restore after the physics step.

use super::AbilityKind;
use std::ops::{Mul, MulAssign};

/// Channel a modifier acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Thrust,
    Rotation,
    /// Applied once when damage is received, not per tick.
    DamageTaken,
}

/// One factor per channel.  `1.0` is neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    pub thrust: f32,
    pub rotation: f32,
    pub damage_taken: f32,
}

impl Modifiers {
    pub const IDENTITY: Modifiers = Modifiers {
        thrust: 1.0,
        rotation: 1.0,
        damage_taken: 1.0,
    };

    pub fn movement(thrust: f32, rotation: f32) -> Self {
        Self {
            thrust,
            rotation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn factor(&self, kind: ModifierKind) -> f32 {
        match kind {
            ModifierKind::Thrust => self.thrust,
            ModifierKind::Rotation => self.rotation,
            ModifierKind::DamageTaken => self.damage_taken,
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `base × thrust factor`.
    #[inline]
    pub fn effective_thrust(&self, base: f32) -> f32 {
        base * self.thrust
    }

    /// `base × rotation factor`.
    #[inline]
    pub fn effective_rotation(&self, base: f32) -> f32 {
        base * self.rotation
    }

    /// `amount × damage-taken factor`.
    #[inline]
    pub fn effective_damage(&self, amount: f32) -> f32 {
        amount * self.damage_taken
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Modifiers {
    type Output = Modifiers;

    fn mul(self, rhs: Modifiers) -> Modifiers {
        Modifiers {
            thrust: self.thrust * rhs.thrust,
            rotation: self.rotation * rhs.rotation,
            damage_taken: self.damage_taken * rhs.damage_taken,
        }
    }
}

impl MulAssign for Modifiers {
    fn mul_assign(&mut self, rhs: Modifiers) {
        *self = *self * rhs;
    }
}

impl std::iter::Product for Modifiers {
    fn product<I: Iterator<Item = Modifiers>>(iter: I) -> Self {
        iter.fold(Modifiers::IDENTITY, Mul::mul)
    }
}

/// A single contributed factor, kept for inspection (debug overlay, tests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierEntry {
    pub source: AbilityKind,
    pub kind: ModifierKind,
    pub factor: f32,
}

/// The per-tick list of contributions.  Rebuilt every tick; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierStack {
    entries: Vec<ModifierEntry>,
}

impl ModifierStack {
    /// Record every non-neutral channel of `modifiers` under `source`.
    pub fn push(&mut self, source: AbilityKind, modifiers: Modifiers) {
        for kind in [
            ModifierKind::Thrust,
            ModifierKind::Rotation,
            ModifierKind::DamageTaken,
        ] {
            let factor = modifiers.factor(kind);
            if factor != 1.0 {
                self.entries.push(ModifierEntry {
                    source,
                    kind,
                    factor,
                });
            }
        }
    }

    pub fn entries(&self) -> &[ModifierEntry] {
        &self.entries
    }

    /// Product of every entry on one channel.
    pub fn factor(&self, kind: ModifierKind) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.factor)
            .product()
    }

    pub fn composed(&self) -> Modifiers {
        Modifiers {
            thrust: self.factor(ModifierKind::Thrust),
            rotation: self.factor(ModifierKind::Rotation),
            damage_taken: self.factor(ModifierKind::DamageTaken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_product_is_identity() {
        let composed: Modifiers = std::iter::empty().product();
        assert!(composed.is_identity());
    }

    #[test]
    fn contributions_multiply_not_add() {
        let composed: Modifiers = [Modifiers::movement(0.5, 0.8), Modifiers::movement(0.5, 0.5)]
            .into_iter()
            .product();
        assert!((composed.thrust - 0.25).abs() < 1e-6);
        assert!((composed.rotation - 0.4).abs() < 1e-6);
    }

    #[test]
    fn composition_is_order_independent() {
        let a = Modifiers::movement(0.6, 0.5);
        let b = Modifiers::movement(1.15, 1.0);
        let c = Modifiers {
            damage_taken: 0.0,
            ..Modifiers::IDENTITY
        };
        let abc: Modifiers = [a, b, c].into_iter().product();
        let cba: Modifiers = [c, b, a].into_iter().product();
        assert!((abc.thrust - cba.thrust).abs() < 1e-6);
        assert!((abc.rotation - cba.rotation).abs() < 1e-6);
        assert_eq!(abc.damage_taken, cba.damage_taken);
    }

    #[test]
    fn effective_values_leave_base_untouched() {
        let base_thrust = 120.0_f32;
        let m = Modifiers::movement(0.6, 0.5);
        let effective = m.effective_thrust(base_thrust);
        assert!((effective - 72.0).abs() < 1e-4);
        assert_eq!(base_thrust, 120.0);
    }

    #[test]
    fn stack_skips_neutral_channels() {
        let mut stack = ModifierStack::default();
        stack.push(AbilityKind::Beam, Modifiers::movement(0.6, 1.0));
        stack.push(AbilityKind::FireTrail, Modifiers::IDENTITY);
        assert_eq!(stack.entries().len(), 1);
        assert!((stack.composed().thrust - 0.6).abs() < 1e-6);
        assert_eq!(stack.composed().rotation, 1.0);
    }
}
