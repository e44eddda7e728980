//! Centralised ship and ability tuning defaults.
//!
//! Every value here is the compiled default of a field in
//! [`crate::config::AbilityConfig`]; `assets/abilities.toml` can override any
//! subset at startup.
//!
//! Times are seconds, distances world units, forces Rapier units with
//! `pixels_per_meter(1.0)`.

// ── Ship: Movement ────────────────────────────────────────────────────────────

/// Forward thrust force (N) applied while thrust is held.
///
/// Abilities never change this value; they scale it through the composed
/// modifier each tick.
pub const SHIP_THRUST_FORCE: f32 = 25_000.0;

/// Reverse thrust force (N).  Half of forward thrust.
pub const SHIP_REVERSE_FORCE: f32 = 12_500.0;

/// Angular velocity (rad/s) while a rotation key is held.
pub const SHIP_ROTATION_SPEED: f32 = 3.0;

pub const SHIP_LINEAR_DAMPING: f32 = 0.1;

/// High angular damping stops the ship turning almost as soon as the key is released.
pub const SHIP_ANGULAR_DAMPING: f32 = 10.0;

pub const SHIP_COLLIDER_RADIUS: f32 = 8.0;

// ── Ship: Health ──────────────────────────────────────────────────────────────

pub const SHIP_MAX_HULL: f32 = 100.0;

/// Shield points absorbed before the hull takes damage.  Only ships carrying a
/// `ShieldEmitter` get a non-zero shield pool.
pub const SHIP_MAX_SHIELD: f32 = 50.0;

// ── Arena ─────────────────────────────────────────────────────────────────────

/// Radius of the circular arena centred on the origin.  Teleport targets
/// outside it are refused.
pub const ARENA_RADIUS: f32 = 1200.0;

// ── Beam ──────────────────────────────────────────────────────────────────────

pub const BEAM_COOLDOWN: f32 = 0.5;
pub const BEAM_HEAT_MAX: f32 = 100.0;

/// Heat gained per second while firing.  At 20/s a cold beam overheats after
/// exactly five seconds.
pub const BEAM_HEAT_DRAIN_RATE: f32 = 20.0;
pub const BEAM_HEAT_REGEN_RATE: f32 = 25.0;
pub const BEAM_LENGTH: f32 = 420.0;
pub const BEAM_WIDTH: f32 = 10.0;
pub const BEAM_DAMAGE_PER_SECOND: f32 = 30.0;
pub const BEAM_THRUST_FACTOR: f32 = 0.6;
pub const BEAM_ROTATION_FACTOR: f32 = 0.5;

// ── Fire trail ────────────────────────────────────────────────────────────────

pub const FIRE_TRAIL_COOLDOWN: f32 = 1.0;
pub const FIRE_TRAIL_HEAT_MAX: f32 = 100.0;
pub const FIRE_TRAIL_HEAT_DRAIN_RATE: f32 = 25.0;
pub const FIRE_TRAIL_HEAT_REGEN_RATE: f32 = 20.0;

/// Seconds between dropped hazard segments.
pub const FIRE_TRAIL_SEGMENT_INTERVAL: f32 = 0.1;
pub const FIRE_TRAIL_SEGMENT_RADIUS: f32 = 14.0;
pub const FIRE_TRAIL_SEGMENT_LIFETIME: f32 = 2.5;
pub const FIRE_TRAIL_DAMAGE_PER_SECOND: f32 = 12.0;

/// Segments spawn this far behind the ship's centre.
pub const FIRE_TRAIL_SEGMENT_OFFSET: f32 = 12.0;
pub const FIRE_TRAIL_THRUST_FACTOR: f32 = 1.15;

// ── Tractor beam ──────────────────────────────────────────────────────────────

pub const TRACTOR_BEAM_COOLDOWN: f32 = 0.25;
pub const TRACTOR_BEAM_RANGE: f32 = 300.0;

/// Bodies closer than this are ignored to avoid jitter at point-blank range.
pub const TRACTOR_BEAM_MIN_DISTANCE: f32 = 20.0;

/// Cosine of the cone half-angle (≈ 25°).
pub const TRACTOR_BEAM_CONE_DOT: f32 = 0.9;

/// Force at the ship, falling linearly to zero at `TRACTOR_BEAM_RANGE`.
pub const TRACTOR_BEAM_FORCE: f32 = 18_000.0;
pub const TRACTOR_BEAM_THRUST_FACTOR: f32 = 0.7;
pub const TRACTOR_BEAM_ROTATION_FACTOR: f32 = 0.8;

// ── GigaBlast ─────────────────────────────────────────────────────────────────

pub const GIGA_BLAST_COOLDOWN: f32 = 3.0;

/// Hold-time thresholds for tiers 1–4.
pub const GIGA_BLAST_THRESHOLDS: [f32; 4] = [0.5, 1.0, 2.0, 3.0];

/// Releases shorter than this fizzle without starting the cooldown.
pub const GIGA_BLAST_MIN_CHARGE: f32 = 0.5;

/// Charging past this fires automatically at the capped tier.
pub const GIGA_BLAST_MAX_CHARGE: f32 = 4.0;
pub const GIGA_BLAST_SPEED: [f32; 4] = [500.0, 600.0, 750.0, 900.0];
pub const GIGA_BLAST_DAMAGE: [f32; 4] = [20.0, 35.0, 60.0, 100.0];
pub const GIGA_BLAST_RECOIL: [f32; 4] = [200.0, 500.0, 1_000.0, 2_000.0];
pub const GIGA_BLAST_IMPACT: [f32; 4] = [300.0, 700.0, 1_500.0, 3_000.0];

/// Damage kept per pierced target.  Zero disables piercing for that tier.
pub const GIGA_BLAST_PIERCE_FALLOFF: [f32; 4] = [0.0, 0.0, 0.5, 0.75];
pub const GIGA_BLAST_THRUST_PENALTY: [f32; 4] = [0.9, 0.75, 0.5, 0.3];
pub const GIGA_BLAST_ROTATION_PENALTY: [f32; 4] = [0.9, 0.8, 0.6, 0.4];
pub const GIGA_BLAST_LIFETIME: f32 = 3.0;
pub const GIGA_BLAST_RADIUS: f32 = 6.0;

// ── Shield ────────────────────────────────────────────────────────────────────

pub const SHIELD_COOLDOWN: f32 = 5.0;
pub const SHIELD_DURATION: f32 = 2.0;
pub const SHIELD_RADIUS: f32 = 22.0;

// ── Reflect ───────────────────────────────────────────────────────────────────

pub const REFLECT_COOLDOWN: f32 = 6.0;
pub const REFLECT_DURATION: f32 = 1.5;
pub const REFLECT_RADIUS: f32 = 24.0;

/// Damage multiplier applied to a projectile when it is turned around.
pub const REFLECT_DAMAGE_MULTIPLIER: f32 = 1.5;
pub const REFLECT_ROTATION_FACTOR: f32 = 0.5;

// ── Teleport ──────────────────────────────────────────────────────────────────

pub const TELEPORT_COOLDOWN: f32 = 4.0;

/// Distance jumped along the aim direction.
pub const TELEPORT_RANGE: f32 = 250.0;
pub const TELEPORT_PRE_DELAY: f32 = 0.1;
pub const TELEPORT_SHRINK_TIME: f32 = 0.15;
pub const TELEPORT_GROW_TIME: f32 = 0.2;

/// Scale peak on arrival before settling back to 1.
pub const TELEPORT_OVERSHOOT: f32 = 1.3;

// ── Stretch dash ──────────────────────────────────────────────────────────────

pub const STRETCH_DASH_COOLDOWN: f32 = 2.5;
pub const STRETCH_DASH_THRESHOLDS: [f32; 4] = [0.2, 0.5, 0.9, 1.4];
pub const STRETCH_DASH_MIN_CHARGE: f32 = 0.2;
pub const STRETCH_DASH_MAX_CHARGE: f32 = 2.0;
pub const STRETCH_DASH_SPEED: [f32; 4] = [400.0, 550.0, 700.0, 900.0];
pub const STRETCH_DASH_THRUST_PENALTY: [f32; 4] = [0.8, 0.6, 0.4, 0.2];
pub const STRETCH_DASH_ROTATION_PENALTY: [f32; 4] = [0.9, 0.8, 0.7, 0.6];

/// Ship length-wise scale while charging (squash builds up with tier).
pub const STRETCH_DASH_SCALE: [f32; 4] = [1.1, 1.25, 1.4, 1.6];
pub const STRETCH_DASH_DURATION: f32 = 0.3;
pub const STRETCH_DASH_ROTATION_FACTOR: f32 = 0.2;

// ── Trigger bomb ──────────────────────────────────────────────────────────────

pub const TRIGGER_BOMB_COOLDOWN: f32 = 3.0;
pub const TRIGGER_BOMB_LAUNCH_SPEED: f32 = 350.0;

/// A second press before this has elapsed is ignored.
pub const TRIGGER_BOMB_ARM_DELAY: f32 = 0.25;

/// The bomb detonates by itself after this long.
pub const TRIGGER_BOMB_FUSE: f32 = 3.0;
pub const TRIGGER_BOMB_BLAST_RADIUS: f32 = 90.0;
pub const TRIGGER_BOMB_DAMAGE: f32 = 45.0;
pub const TRIGGER_BOMB_IMPACT: f32 = 2_500.0;

// ── Fighter AI ────────────────────────────────────────────────────────────────

/// Minimum gap between the starts of two attack runs.
pub const FIGHTER_FIRE_COOLDOWN: f32 = 1.5;

/// How long the fighter holds its weapon during one attack run.
pub const FIGHTER_BURST_DURATION: f32 = 0.6;
pub const FIGHTER_DODGE_COOLDOWN: f32 = 2.0;

/// The fighter starts its attack run inside this distance.
pub const FIGHTER_ATTACK_RANGE: f32 = 350.0;

/// Cosine of the angle within which the fighter considers itself lined up.
pub const FIGHTER_AIM_DOT: f32 = 0.95;

/// Seconds spent drifting without thrust after an attack run.
pub const FIGHTER_COAST_DURATION: f32 = 1.0;

/// Incoming projectiles within this radius trigger a dodge.
pub const FIGHTER_THREAT_RADIUS: f32 = 120.0;
pub const FIGHTER_DODGE_IMPULSE: f32 = 4_000.0;
pub const FIGHTER_DODGE_DURATION: f32 = 0.4;
