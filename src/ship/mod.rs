//! Ship module: the ECS side of the ability framework.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | Components (`Ship`, `ShipHealth`, `PendingEffects`, …), world actors (`Hazard`, `Bomb`), messages |
//! | [`control`] | Keyboard → `AbilityInput`, movement with composed modifiers, tractor forces |
//! | [`effects`] | Applies queued `AbilityEffect`s: attachments, projectiles, physics writes, cues |
//! | [`combat`] | Ability tick, beams, hazards, projectile / bomb contact, damage resolution |
//! | [`rendering`] | Gizmo drawing, cursor aim, camera follow (windowed builds only) |

pub mod combat;
pub mod control;
pub mod effects;
pub mod rendering;
pub mod state;

pub use combat::{
    ability_input_clear_system, ability_tick_system, attachment_watch_system,
    beam_damage_system, bomb_detonation_system, hazard_damage_system, projectile_hit_system,
    projectile_lifetime_system, ship_damage_system,
};
pub use control::{keyboard_to_ability_input_system, ship_movement_system, tractor_beam_force_system};
pub use effects::apply_ability_effects_system;
pub use state::{
    AbilityCue, AimDirection, ArenaRng, AttachedTo, Attachments, Bomb, CameraDiscontinuity,
    DamageMessage, Hazard, MovementIntent, PendingEffects, Player, ShieldEmitter, Ship,
    ShipDestroyed, ShipHealth, ShipMovement, Slowed, Tractorable,
};

use crate::abilities::build_loadout;
use crate::ability::{AbilityInput, Loadout};
use crate::config::{AbilityConfig, ShipConfig};
use crate::projectile::Team;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use effects::layers;

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Everything a combat ship needs, player or AI.
///
/// Ships are dynamic bodies on the ship layer.  They collide with other ships
/// and debris and receive sensor events from projectiles and bombs.
pub fn ship_bundle(team: Team, position: Vec2, loadout: Loadout, config: &ShipConfig) -> impl Bundle {
    (
        (
            Ship,
            team,
            ShipMovement::from_config(config),
            MovementIntent::default(),
            AbilityInput::default(),
            AimDirection::default(),
            loadout,
            PendingEffects::default(),
            Attachments::default(),
            ShipHealth::new(config.max_hull, config.max_shield),
        ),
        (
            RigidBody::Dynamic,
            Collider::ball(config.collider_radius),
            Velocity::zero(),
            ExternalForce::default(),
            ExternalImpulse::default(),
            Damping {
                linear_damping: config.linear_damping,
                angular_damping: config.angular_damping,
            },
            CollisionGroups::new(
                layers::SHIPS,
                layers::SHIPS | layers::DEBRIS | layers::PROJECTILES,
            ),
            ActiveEvents::COLLISION_EVENTS,
            Transform::from_translation(position.extend(0.0)),
            Visibility::default(),
        ),
    )
}

/// Spawn the keyboard-controlled ship at the origin.
pub fn spawn_player(mut commands: Commands, config: Res<AbilityConfig>) {
    let loadout = build_loadout(&config.player_loadout, &config);
    let slots = loadout.len();
    commands.spawn((
        ship_bundle(Team::Player, Vec2::ZERO, loadout, &config.ship),
        Player,
        ShieldEmitter,
    ));
    info!(slots, "player ship spawned");
}

/// Loose bodies for the tractor beam to work on.
pub const DEBRIS_COUNT: usize = 12;
const DEBRIS_RADIUS: f32 = 10.0;

/// Deterministic scatter on a golden-angle spiral.
fn debris_offset(index: usize, arena_radius: f32) -> Vec2 {
    const GOLDEN_ANGLE: f32 = 2.399_963;
    let a = index as f32 * GOLDEN_ANGLE;
    let r = arena_radius * (0.25 + 0.5 * (index as f32 + 0.5) / DEBRIS_COUNT as f32);
    Vec2::new(a.cos(), a.sin()) * r
}

pub fn spawn_debris(mut commands: Commands, config: Res<AbilityConfig>) {
    for i in 0..DEBRIS_COUNT {
        commands.spawn((
            Tractorable,
            RigidBody::Dynamic,
            Collider::ball(DEBRIS_RADIUS),
            Velocity::zero(),
            ExternalForce::default(),
            Damping {
                linear_damping: 0.5,
                angular_damping: 0.5,
            },
            CollisionGroups::new(layers::DEBRIS, layers::SHIPS | layers::DEBRIS),
            Transform::from_translation(debris_offset(i, config.ship.arena_radius).extend(0.0)),
            Visibility::default(),
        ));
    }
}
