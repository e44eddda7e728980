//! Input and movement systems.
//!
//! ## Pipeline (per fixed tick)
//!
//! 1. [`keyboard_to_ability_input_system`]: keys → `AbilityInput` levels and
//!    `MovementIntent` on the player ship.  AI ships are written by
//!    `enemy::fighter_brain_system` instead.
//! 2. *(abilities tick, effects applied)*
//! 3. [`ship_movement_system`]: `MovementIntent` × base movement × composed
//!    ability modifiers × slow → `ExternalForce` / angular velocity.
//! 4. [`tractor_beam_force_system`]: pulls `Tractorable` bodies toward ships
//!    with an active tractor beam.
//!
//! Base values in [`ShipMovement`] are never written, so nothing has to be
//! restored when an ability ends.

use super::state::{AimDirection, MovementIntent, Player, Ship, ShipMovement, Slowed, Tractorable};
use crate::ability::{AbilityInput, AbilityKind, AbilitySlot, Loadout};
use crate::config::{AbilityConfig, TractorBeamConfig};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Default key for each ability slot.
pub const SLOT_KEYS: [(AbilitySlot, KeyCode); AbilitySlot::COUNT] = [
    (AbilitySlot::Primary, KeyCode::Space),
    (AbilitySlot::Secondary, KeyCode::KeyF),
    (AbilitySlot::Special, KeyCode::KeyE),
    (AbilitySlot::Defense, KeyCode::ShiftLeft),
    (AbilitySlot::Mobility, KeyCode::KeyQ),
];

// ── Step 1: Keyboard → input ──────────────────────────────────────────────────

/// Translate held keys into slot levels and movement intent.
///
/// - **W / S** → forward / reverse thrust
/// - **A / D** → turn counter-clockwise / clockwise
/// - slot keys per [`SLOT_KEYS`]
///
/// Does nothing when no keyboard resource exists (headless runs).
pub fn keyboard_to_ability_input_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut q: Query<(&mut AbilityInput, &mut MovementIntent), With<Player>>,
) {
    let Some(keys) = keys else {
        return;
    };
    for (mut input, mut intent) in q.iter_mut() {
        for (slot, key) in SLOT_KEYS {
            input.set_level(slot, keys.pressed(key));
        }
        let axis = |on: bool| if on { 1.0 } else { 0.0 };
        *intent = MovementIntent {
            thrust_forward: axis(keys.pressed(KeyCode::KeyW)),
            thrust_reverse: axis(keys.pressed(KeyCode::KeyS)),
            turn: axis(keys.pressed(KeyCode::KeyA)) - axis(keys.pressed(KeyCode::KeyD)),
        };
    }
}

// ── Step 3: Intent → physics ──────────────────────────────────────────────────

/// Convert each ship's [`MovementIntent`] into `ExternalForce` and angular
/// velocity.
///
/// | Input | Physics effect |
/// |---|---|
/// | `thrust_forward` | `force = nose × thrust_force × thrust_mod × slow` |
/// | `thrust_reverse` | `force −= nose × reverse_force × thrust_mod × slow` |
/// | `turn` | `angvel = turn × rotation_speed × rotation_mod × slow` |
///
/// Also counts down [`Slowed`] and removes it when it runs out.
#[allow(clippy::type_complexity)]
pub fn ship_movement_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<
        (
            Entity,
            &Transform,
            &ShipMovement,
            &MovementIntent,
            &Loadout,
            Option<&mut Slowed>,
            &mut ExternalForce,
            &mut Velocity,
        ),
        With<Ship>,
    >,
) {
    let dt = time.delta_secs();
    for (entity, transform, movement, intent, loadout, slowed, mut force, mut velocity) in
        q.iter_mut()
    {
        let slow = match slowed {
            Some(mut slowed) => {
                let multiplier = slowed.multiplier;
                slowed.remaining -= dt;
                if slowed.remaining <= 0.0 {
                    commands.entity(entity).remove::<Slowed>();
                }
                multiplier
            }
            None => 1.0,
        };

        let modifiers = loadout.composed_modifiers();
        let forward = transform.rotation.mul_vec3(Vec3::Y).truncate();
        let thrust = modifiers.effective_thrust(movement.thrust_force) * slow;
        let reverse = modifiers.effective_thrust(movement.reverse_force) * slow;

        force.force = forward * (thrust * intent.thrust_forward - reverse * intent.thrust_reverse);
        force.torque = 0.0;
        velocity.angvel =
            intent.turn.clamp(-1.0, 1.0) * modifiers.effective_rotation(movement.rotation_speed) * slow;
    }
}

// ── Step 4: Tractor beam ──────────────────────────────────────────────────────

/// Pull exerted on a body at `target_pos`, or `None` when it sits outside the
/// cone.  Strength falls off linearly from `min_distance` to `range`.
pub fn tractor_pull(
    ship_pos: Vec2,
    beam_dir: Vec2,
    target_pos: Vec2,
    config: &TractorBeamConfig,
) -> Option<Vec2> {
    let range = config.range;
    let min_dist = config.min_distance;
    if range <= min_dist {
        return None;
    }
    let to_target = target_pos - ship_pos;
    let dist_sq = to_target.length_squared();
    if dist_sq < min_dist * min_dist || dist_sq > range * range {
        return None;
    }
    let dist = dist_sq.sqrt();
    if beam_dir.dot(to_target / dist) < config.cone_dot {
        return None;
    }
    let falloff = 1.0 - ((dist - min_dist) / (range - min_dist)).clamp(0.0, 1.0);
    if falloff <= 0.0 {
        return None;
    }
    Some(-to_target / dist * (config.force * falloff))
}

/// Apply tractor forces to every `Tractorable` body.
///
/// Resets the bodies' `ExternalForce` first; nothing else drives them.
#[allow(clippy::type_complexity)]
pub fn tractor_beam_force_system(
    config: Res<AbilityConfig>,
    q_ships: Query<(&Transform, &AimDirection, &Loadout), With<Ship>>,
    mut q_bodies: Query<(&Transform, &mut ExternalForce), (With<Tractorable>, Without<Ship>)>,
) {
    let beams: Vec<(Vec2, Vec2)> = q_ships
        .iter()
        .filter(|(_, _, loadout)| loadout.is_active(AbilityKind::TractorBeam))
        .map(|(transform, aim, _)| {
            let dir = if aim.0.length_squared() > 1e-4 {
                aim.0.normalize_or_zero()
            } else {
                transform.rotation.mul_vec3(Vec3::Y).truncate()
            };
            (transform.translation.truncate(), dir)
        })
        .collect();

    for (transform, mut force) in q_bodies.iter_mut() {
        force.force = Vec2::ZERO;
        let pos = transform.translation.truncate();
        for &(ship_pos, dir) in &beams {
            if let Some(pull) = tractor_pull(ship_pos, dir, pos, &config.tractor_beam) {
                force.force += pull;
            }
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
