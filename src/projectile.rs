//! Projectile actors and the descriptors abilities use to request them.
//!
//! Abilities never spawn entities themselves.  They describe what they want
//! with a [`ProjectileSpec`]; `ship::effects` turns the spec into an entity
//! carrying a [`Projectile`] component.

use bevy::prelude::*;

/// Which side a ship or projectile belongs to.  Projectiles carry the team
/// they are allowed to hit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    #[inline]
    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Damage kept per pierced target: `damage *= falloff` after every hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PierceFalloff(pub f32);

/// Slows whatever the projectile hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowEffect {
    /// Thrust / rotation multiplier applied to the victim.
    pub multiplier: f32,
    pub duration: f32,
}

/// Everything needed to put a projectile in the world, minus the shooter
/// entity (filled in by the effect applier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub position: Vec2,
    pub direction: Vec2,
    pub target: Team,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    /// Impulse magnitude transferred to the victim along the flight direction.
    pub impact: f32,
    pub radius: f32,
    pub pierce: Option<PierceFalloff>,
    pub slow: Option<SlowEffect>,
}

impl ProjectileSpec {
    pub fn with_piercing(mut self, falloff: f32) -> Self {
        self.pierce = Some(PierceFalloff(falloff));
        self
    }

    pub fn with_slow(mut self, multiplier: f32, duration: f32) -> Self {
        self.slow = Some(SlowEffect {
            multiplier,
            duration,
        });
        self
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.direction.normalize_or_zero() * self.speed
    }
}

/// Live projectile state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub target: Team,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub impact: f32,
    pub shooter: Option<Entity>,
    /// Seconds since spawn.
    pub age: f32,
    pub pierce: Option<PierceFalloff>,
    pub slow: Option<SlowEffect>,
    /// Set once a reflect has turned this projectile around.  A reflected
    /// projectile cannot be reflected again by the same mechanism.
    pub reflected: bool,
}

impl Projectile {
    pub fn initialize(
        target: Team,
        speed: f32,
        damage: f32,
        lifetime: f32,
        impact: f32,
        shooter: Option<Entity>,
    ) -> Self {
        Self {
            target,
            speed,
            damage,
            lifetime,
            impact,
            shooter,
            age: 0.0,
            pierce: None,
            slow: None,
            reflected: false,
        }
    }

    pub fn from_spec(spec: &ProjectileSpec, shooter: Option<Entity>) -> Self {
        let mut projectile = Self::initialize(
            spec.target,
            spec.speed,
            spec.damage,
            spec.lifetime,
            spec.impact,
            shooter,
        );
        projectile.pierce = spec.pierce;
        projectile.slow = spec.slow;
        projectile
    }

    pub fn enable_piercing(&mut self, falloff: f32) {
        self.pierce = Some(PierceFalloff(falloff));
    }

    pub fn enable_slow(&mut self, multiplier: f32, duration: f32) {
        self.slow = Some(SlowEffect {
            multiplier,
            duration,
        });
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Apply pierce falloff after a hit.  Returns `false` when the projectile
    /// should be destroyed instead.
    pub fn consume_hit(&mut self) -> bool {
        match self.pierce {
            Some(PierceFalloff(falloff)) => {
                self.damage *= falloff;
                self.damage > 0.01
            }
            None => false,
        }
    }
}
