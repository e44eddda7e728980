//! Ship components, world actors spawned by abilities, and the messages the
//! ship pipeline exchanges.
//!
//! Systems that mutate this state live in the sibling modules:
//! - [`super::control`]: input, movement, tractor forces
//! - [`super::effects`]: applying ability effects to the world
//! - [`super::combat`]: ability ticking, damage, hits, death

use crate::ability::{AbilityKind, Attachment, AttachmentKind, CueKind, EffectBuffer};
use crate::config::ShipConfig;
use crate::projectile::Team;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

// ── Ship components ───────────────────────────────────────────────────────────

/// Any combat ship, player or AI.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ship;

/// Marker for the keyboard-controlled ship.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Base movement values.  Abilities never write these; the movement system
/// multiplies them by the loadout's composed modifiers every tick.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ShipMovement {
    pub thrust_force: f32,
    pub reverse_force: f32,
    pub rotation_speed: f32,
}

impl ShipMovement {
    pub fn from_config(config: &ShipConfig) -> Self {
        Self {
            thrust_force: config.thrust_force,
            reverse_force: config.reverse_force,
            rotation_speed: config.rotation_speed,
        }
    }
}

/// What the pilot (keyboard or brain) wants this tick.
///
/// `turn` is in `[-1, 1]`; positive turns counter-clockwise.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    pub thrust_forward: f32,
    pub thrust_reverse: f32,
    pub turn: f32,
}

/// Hull plus a shield pool.  Damage drains the shield first.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ShipHealth {
    pub hull: f32,
    pub max_hull: f32,
    pub shield: f32,
    pub max_shield: f32,
}

impl ShipHealth {
    pub fn new(max_hull: f32, max_shield: f32) -> Self {
        Self {
            hull: max_hull,
            max_hull,
            shield: max_shield,
            max_shield,
        }
    }

    /// Returns `true` when this hit destroyed the ship.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        let amount = amount.max(0.0);
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        self.hull = (self.hull - (amount - absorbed)).max(0.0);
        self.hull <= 0.0
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull <= 0.0
    }
}

/// Hardware the Shield ability needs before it will activate.
#[derive(Component, Debug, Clone, Copy)]
pub struct ShieldEmitter;

/// Movement penalty left by a slowing projectile.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Slowed {
    pub multiplier: f32,
    pub remaining: f32,
}

/// World-space aim.  Zero means "use the nose".
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AimDirection(pub Vec2);

/// Effects produced by the ship's abilities, waiting for the applier.
#[derive(Component, Debug, Default)]
pub struct PendingEffects(pub EffectBuffer);

/// Live attachment entities, at most one per kind.
#[derive(Component, Debug, Default)]
pub struct Attachments(pub HashMap<AttachmentKind, Entity>);

impl Attachments {
    pub fn get(&self, kind: AttachmentKind) -> Option<Entity> {
        self.0.get(&kind).copied()
    }
}

// ── World actors ──────────────────────────────────────────────────────────────

/// An ability-owned entity.  Beams, cones and bubbles are children of the
/// owner; bombs fly free.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AttachedTo {
    pub owner: Entity,
    pub attachment: Attachment,
}

/// Damaging area left by the fire trail.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub target: Team,
    pub radius: f32,
    pub damage_per_second: f32,
    pub remaining: f32,
}

/// Bomb in flight.  Damage and impulse come from the launching spec.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Bomb {
    pub owner: Entity,
    pub target: Team,
    pub blast_radius: f32,
    pub damage: f32,
    pub impact: f32,
}

/// Set on a bomb that goes off this tick.
#[derive(Component, Debug, Clone, Copy)]
pub struct Detonating;

/// Free-floating body the tractor beam can pull.
#[derive(Component, Debug, Clone, Copy)]
pub struct Tractorable;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Seeded RNG shared by AI decisions, so headless runs are reproducible.
#[derive(Resource)]
pub struct ArenaRng(pub StdRng);

impl Default for ArenaRng {
    fn default() -> Self {
        Self(StdRng::seed_from_u64(0x5eed))
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// A request to damage a ship.  Resolved by `ship_damage_system`, which
/// applies mitigation and damage-taken modifiers.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageMessage {
    pub target: Entity,
    pub amount: f32,
    pub source: Option<Entity>,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ShipDestroyed {
    pub entity: Entity,
    pub team: Team,
}

/// Audio / visual hook.  Nothing in the simulation depends on it.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityCue {
    pub ship: Entity,
    pub ability: AbilityKind,
    pub cue: CueKind,
}

/// A ship moved without travelling (teleport).  Cameras and trails should
/// snap rather than interpolate.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CameraDiscontinuity {
    pub entity: Entity,
    pub from: Vec2,
    pub to: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_pool_absorbs_before_hull() {
        let mut health = ShipHealth::new(100.0, 30.0);
        assert!(!health.apply_damage(20.0));
        assert_eq!((health.shield, health.hull), (10.0, 100.0));

        assert!(!health.apply_damage(25.0));
        assert_eq!((health.shield, health.hull), (0.0, 85.0));
    }

    #[test]
    fn lethal_damage_clamps_hull_at_zero() {
        let mut health = ShipHealth::new(50.0, 0.0);
        assert!(health.apply_damage(80.0));
        assert_eq!(health.hull, 0.0);
        assert!(health.is_destroyed());
    }

    #[test]
    fn negative_damage_is_ignored() {
        let mut health = ShipHealth::new(50.0, 10.0);
        health.apply_damage(-5.0);
        assert_eq!(health, ShipHealth::new(50.0, 10.0));
    }
}
