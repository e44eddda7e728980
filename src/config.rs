//! Runtime ability configuration loaded from `assets/abilities.toml`.
//!
//! [`AbilityConfig`] is a Bevy [`Resource`] with one sub-section per ability
//! plus the ship and fighter-AI sections.  At startup [`load_ability_config`]
//! reads `assets/abilities.toml`, validates it, and replaces the defaults.
//! Missing keys fall back to the compile-time defaults in
//! [`crate::constants`], so a minimal TOML can override only what you care
//! about:
//!
//! ```toml
//! [beam]
//! length = 500.0
//!
//! [giga_blast]
//! damage = [25.0, 40.0, 70.0, 120.0]
//! ```
//!
//! A file that fails to parse or validate is rejected as a whole with a
//! warning; the compiled defaults stay in place.

use crate::ability::{AbilityKind, AbilitySlot, ChargeThresholds, ChargeWindow, HeatConfig, TierTable};
use crate::constants::*;
use crate::error::{require_non_negative, require_positive, ConfigError, ConfigResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Path read by [`load_ability_config`].
pub const ABILITY_CONFIG_PATH: &str = "assets/abilities.toml";

/// Runtime-tunable ability and ship configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    /// Player abilities, ticked in this order.
    pub player_loadout: Vec<LoadoutSlot>,
    pub fighter_loadout: Vec<LoadoutSlot>,
    pub ship: ShipConfig,
    pub beam: BeamConfig,
    pub fire_trail: FireTrailConfig,
    pub tractor_beam: TractorBeamConfig,
    pub giga_blast: GigaBlastConfig,
    pub shield: ShieldConfig,
    pub reflect: ReflectConfig,
    pub teleport: TeleportConfig,
    pub stretch_dash: StretchDashConfig,
    pub trigger_bomb: TriggerBombConfig,
    pub fighter: FighterConfig,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            player_loadout: vec![
                LoadoutSlot::new(AbilitySlot::Primary, AbilityKind::Beam),
                LoadoutSlot::new(AbilitySlot::Secondary, AbilityKind::GigaBlast),
                LoadoutSlot::new(AbilitySlot::Special, AbilityKind::TriggerBomb),
                LoadoutSlot::new(AbilitySlot::Defense, AbilityKind::Shield),
                LoadoutSlot::new(AbilitySlot::Mobility, AbilityKind::Teleport),
            ],
            fighter_loadout: vec![LoadoutSlot::new(AbilitySlot::Primary, AbilityKind::Beam)],
            ship: ShipConfig::default(),
            beam: BeamConfig::default(),
            fire_trail: FireTrailConfig::default(),
            tractor_beam: TractorBeamConfig::default(),
            giga_blast: GigaBlastConfig::default(),
            shield: ShieldConfig::default(),
            reflect: ReflectConfig::default(),
            teleport: TeleportConfig::default(),
            stretch_dash: StretchDashConfig::default(),
            trigger_bomb: TriggerBombConfig::default(),
            fighter: FighterConfig::default(),
        }
    }
}

impl AbilityConfig {
    /// Check every section; the first bad value is reported.
    pub fn validate(&self) -> ConfigResult<()> {
        self.ship.validate()?;
        self.beam.validate()?;
        self.fire_trail.validate()?;
        self.tractor_beam.validate()?;
        self.giga_blast.validate()?;
        self.shield.validate()?;
        self.reflect.validate()?;
        self.teleport.validate()?;
        self.stretch_dash.validate()?;
        self.trigger_bomb.validate()?;
        self.fighter.validate()
    }
}

/// One `[[player_loadout]]` / `[[fighter_loadout]]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LoadoutSlot {
    pub slot: AbilitySlot,
    pub ability: AbilityKind,
}

impl LoadoutSlot {
    pub const fn new(slot: AbilitySlot, ability: AbilityKind) -> Self {
        Self { slot, ability }
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub thrust_force: f32,
    pub reverse_force: f32,
    pub rotation_speed: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub collider_radius: f32,
    pub max_hull: f32,
    pub max_shield: f32,
    pub arena_radius: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            thrust_force: SHIP_THRUST_FORCE,
            reverse_force: SHIP_REVERSE_FORCE,
            rotation_speed: SHIP_ROTATION_SPEED,
            linear_damping: SHIP_LINEAR_DAMPING,
            angular_damping: SHIP_ANGULAR_DAMPING,
            collider_radius: SHIP_COLLIDER_RADIUS,
            max_hull: SHIP_MAX_HULL,
            max_shield: SHIP_MAX_SHIELD,
            arena_radius: ARENA_RADIUS,
        }
    }
}

impl ShipConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "ship";
        require_non_negative(S, "thrust_force", self.thrust_force)?;
        require_non_negative(S, "reverse_force", self.reverse_force)?;
        require_non_negative(S, "rotation_speed", self.rotation_speed)?;
        require_non_negative(S, "linear_damping", self.linear_damping)?;
        require_non_negative(S, "angular_damping", self.angular_damping)?;
        require_positive(S, "collider_radius", self.collider_radius)?;
        require_positive(S, "max_hull", self.max_hull)?;
        require_non_negative(S, "max_shield", self.max_shield)?;
        require_positive(S, "arena_radius", self.arena_radius)
    }
}

// ── Toggles ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub cooldown: f32,
    pub heat: HeatConfig,
    pub length: f32,
    pub width: f32,
    pub damage_per_second: f32,
    pub thrust_factor: f32,
    pub rotation_factor: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            cooldown: BEAM_COOLDOWN,
            heat: HeatConfig {
                max: BEAM_HEAT_MAX,
                drain_rate: BEAM_HEAT_DRAIN_RATE,
                regen_rate: BEAM_HEAT_REGEN_RATE,
            },
            length: BEAM_LENGTH,
            width: BEAM_WIDTH,
            damage_per_second: BEAM_DAMAGE_PER_SECOND,
            thrust_factor: BEAM_THRUST_FACTOR,
            rotation_factor: BEAM_ROTATION_FACTOR,
        }
    }
}

impl BeamConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "beam";
        require_positive(S, "cooldown", self.cooldown)?;
        self.heat.validate(S)?;
        require_positive(S, "length", self.length)?;
        require_positive(S, "width", self.width)?;
        require_non_negative(S, "damage_per_second", self.damage_per_second)?;
        require_non_negative(S, "thrust_factor", self.thrust_factor)?;
        require_non_negative(S, "rotation_factor", self.rotation_factor)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FireTrailConfig {
    pub cooldown: f32,
    pub heat: HeatConfig,
    pub segment_interval: f32,
    pub segment_radius: f32,
    pub segment_lifetime: f32,
    pub segment_offset: f32,
    pub damage_per_second: f32,
    pub thrust_factor: f32,
}

impl Default for FireTrailConfig {
    fn default() -> Self {
        Self {
            cooldown: FIRE_TRAIL_COOLDOWN,
            heat: HeatConfig {
                max: FIRE_TRAIL_HEAT_MAX,
                drain_rate: FIRE_TRAIL_HEAT_DRAIN_RATE,
                regen_rate: FIRE_TRAIL_HEAT_REGEN_RATE,
            },
            segment_interval: FIRE_TRAIL_SEGMENT_INTERVAL,
            segment_radius: FIRE_TRAIL_SEGMENT_RADIUS,
            segment_lifetime: FIRE_TRAIL_SEGMENT_LIFETIME,
            segment_offset: FIRE_TRAIL_SEGMENT_OFFSET,
            damage_per_second: FIRE_TRAIL_DAMAGE_PER_SECOND,
            thrust_factor: FIRE_TRAIL_THRUST_FACTOR,
        }
    }
}

impl FireTrailConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "fire_trail";
        require_positive(S, "cooldown", self.cooldown)?;
        self.heat.validate(S)?;
        require_positive(S, "segment_interval", self.segment_interval)?;
        require_positive(S, "segment_radius", self.segment_radius)?;
        require_positive(S, "segment_lifetime", self.segment_lifetime)?;
        require_non_negative(S, "segment_offset", self.segment_offset)?;
        require_non_negative(S, "damage_per_second", self.damage_per_second)?;
        require_non_negative(S, "thrust_factor", self.thrust_factor)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TractorBeamConfig {
    pub cooldown: f32,
    /// `None` (the default) runs the beam without a heat budget.
    pub heat: Option<HeatConfig>,
    pub range: f32,
    pub min_distance: f32,
    pub cone_dot: f32,
    pub force: f32,
    pub thrust_factor: f32,
    pub rotation_factor: f32,
}

impl Default for TractorBeamConfig {
    fn default() -> Self {
        Self {
            cooldown: TRACTOR_BEAM_COOLDOWN,
            heat: None,
            range: TRACTOR_BEAM_RANGE,
            min_distance: TRACTOR_BEAM_MIN_DISTANCE,
            cone_dot: TRACTOR_BEAM_CONE_DOT,
            force: TRACTOR_BEAM_FORCE,
            thrust_factor: TRACTOR_BEAM_THRUST_FACTOR,
            rotation_factor: TRACTOR_BEAM_ROTATION_FACTOR,
        }
    }
}

impl TractorBeamConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "tractor_beam";
        require_positive(S, "cooldown", self.cooldown)?;
        if let Some(heat) = &self.heat {
            heat.validate(S)?;
        }
        require_positive(S, "range", self.range)?;
        require_non_negative(S, "min_distance", self.min_distance)?;
        if self.min_distance >= self.range {
            return Err(ConfigError::NotPositive {
                section: S,
                field: "range - min_distance",
                value: self.range - self.min_distance,
            });
        }
        require_non_negative(S, "force", self.force)?;
        require_non_negative(S, "thrust_factor", self.thrust_factor)?;
        require_non_negative(S, "rotation_factor", self.rotation_factor)
    }
}

// ── Charge-and-release ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GigaBlastConfig {
    pub cooldown: f32,
    pub window: ChargeWindow,
    pub speed: TierTable<f32>,
    pub damage: TierTable<f32>,
    pub recoil: TierTable<f32>,
    pub impact: TierTable<f32>,
    /// Damage kept per pierced target; `0` means the shot stops on first hit.
    pub pierce_falloff: TierTable<f32>,
    pub thrust_penalty: TierTable<f32>,
    pub rotation_penalty: TierTable<f32>,
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for GigaBlastConfig {
    fn default() -> Self {
        Self {
            cooldown: GIGA_BLAST_COOLDOWN,
            window: ChargeWindow {
                thresholds: ChargeThresholds(GIGA_BLAST_THRESHOLDS),
                min_charge_time: GIGA_BLAST_MIN_CHARGE,
                max_charge_time: GIGA_BLAST_MAX_CHARGE,
            },
            speed: TierTable(GIGA_BLAST_SPEED),
            damage: TierTable(GIGA_BLAST_DAMAGE),
            recoil: TierTable(GIGA_BLAST_RECOIL),
            impact: TierTable(GIGA_BLAST_IMPACT),
            pierce_falloff: TierTable(GIGA_BLAST_PIERCE_FALLOFF),
            thrust_penalty: TierTable(GIGA_BLAST_THRUST_PENALTY),
            rotation_penalty: TierTable(GIGA_BLAST_ROTATION_PENALTY),
            lifetime: GIGA_BLAST_LIFETIME,
            radius: GIGA_BLAST_RADIUS,
        }
    }
}

impl GigaBlastConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "giga_blast";
        require_positive(S, "cooldown", self.cooldown)?;
        self.window.validate(S)?;
        for (field, table) in [
            ("speed", &self.speed),
            ("damage", &self.damage),
            ("recoil", &self.recoil),
            ("impact", &self.impact),
            ("pierce_falloff", &self.pierce_falloff),
            ("thrust_penalty", &self.thrust_penalty),
            ("rotation_penalty", &self.rotation_penalty),
        ] {
            validate_table(S, field, table)?;
        }
        require_positive(S, "lifetime", self.lifetime)?;
        require_positive(S, "radius", self.radius)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StretchDashConfig {
    pub cooldown: f32,
    pub window: ChargeWindow,
    pub dash_speed: TierTable<f32>,
    pub thrust_penalty: TierTable<f32>,
    pub rotation_penalty: TierTable<f32>,
    /// Length-wise stretch while charging, per tier.
    pub stretch_scale: TierTable<f32>,
    pub dash_duration: f32,
    pub dash_rotation_factor: f32,
}

impl Default for StretchDashConfig {
    fn default() -> Self {
        Self {
            cooldown: STRETCH_DASH_COOLDOWN,
            window: ChargeWindow {
                thresholds: ChargeThresholds(STRETCH_DASH_THRESHOLDS),
                min_charge_time: STRETCH_DASH_MIN_CHARGE,
                max_charge_time: STRETCH_DASH_MAX_CHARGE,
            },
            dash_speed: TierTable(STRETCH_DASH_SPEED),
            thrust_penalty: TierTable(STRETCH_DASH_THRUST_PENALTY),
            rotation_penalty: TierTable(STRETCH_DASH_ROTATION_PENALTY),
            stretch_scale: TierTable(STRETCH_DASH_SCALE),
            dash_duration: STRETCH_DASH_DURATION,
            dash_rotation_factor: STRETCH_DASH_ROTATION_FACTOR,
        }
    }
}

impl StretchDashConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "stretch_dash";
        require_positive(S, "cooldown", self.cooldown)?;
        self.window.validate(S)?;
        validate_table(S, "dash_speed", &self.dash_speed)?;
        validate_table(S, "thrust_penalty", &self.thrust_penalty)?;
        validate_table(S, "rotation_penalty", &self.rotation_penalty)?;
        for scale in self.stretch_scale.0 {
            require_positive(S, "stretch_scale", scale)?;
        }
        require_positive(S, "dash_duration", self.dash_duration)?;
        require_non_negative(S, "dash_rotation_factor", self.dash_rotation_factor)
    }
}

fn validate_table(section: &'static str, field: &'static str, table: &TierTable<f32>) -> ConfigResult<()> {
    table
        .0
        .iter()
        .try_for_each(|v| require_non_negative(section, field, *v))
}

// ── Timed ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    pub cooldown: f32,
    pub duration: f32,
    pub radius: f32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            cooldown: SHIELD_COOLDOWN,
            duration: SHIELD_DURATION,
            radius: SHIELD_RADIUS,
        }
    }
}

impl ShieldConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("shield", "cooldown", self.cooldown)?;
        require_positive("shield", "duration", self.duration)?;
        require_positive("shield", "radius", self.radius)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReflectConfig {
    pub cooldown: f32,
    pub duration: f32,
    pub radius: f32,
    pub damage_multiplier: f32,
    pub rotation_factor: f32,
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            cooldown: REFLECT_COOLDOWN,
            duration: REFLECT_DURATION,
            radius: REFLECT_RADIUS,
            damage_multiplier: REFLECT_DAMAGE_MULTIPLIER,
            rotation_factor: REFLECT_ROTATION_FACTOR,
        }
    }
}

impl ReflectConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "reflect";
        require_positive(S, "cooldown", self.cooldown)?;
        require_positive(S, "duration", self.duration)?;
        require_positive(S, "radius", self.radius)?;
        require_non_negative(S, "damage_multiplier", self.damage_multiplier)?;
        require_non_negative(S, "rotation_factor", self.rotation_factor)
    }
}

// ── Sequences ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    pub cooldown: f32,
    pub range: f32,
    pub pre_delay: f32,
    pub shrink_time: f32,
    pub grow_time: f32,
    pub overshoot: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            cooldown: TELEPORT_COOLDOWN,
            range: TELEPORT_RANGE,
            pre_delay: TELEPORT_PRE_DELAY,
            shrink_time: TELEPORT_SHRINK_TIME,
            grow_time: TELEPORT_GROW_TIME,
            overshoot: TELEPORT_OVERSHOOT,
        }
    }
}

impl TeleportConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "teleport";
        require_positive(S, "cooldown", self.cooldown)?;
        require_positive(S, "range", self.range)?;
        require_non_negative(S, "pre_delay", self.pre_delay)?;
        require_non_negative(S, "shrink_time", self.shrink_time)?;
        require_non_negative(S, "grow_time", self.grow_time)?;
        require_positive(S, "overshoot", self.overshoot)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriggerBombConfig {
    pub cooldown: f32,
    pub launch_speed: f32,
    pub arm_delay: f32,
    pub fuse: f32,
    pub blast_radius: f32,
    pub damage: f32,
    pub impact: f32,
}

impl Default for TriggerBombConfig {
    fn default() -> Self {
        Self {
            cooldown: TRIGGER_BOMB_COOLDOWN,
            launch_speed: TRIGGER_BOMB_LAUNCH_SPEED,
            arm_delay: TRIGGER_BOMB_ARM_DELAY,
            fuse: TRIGGER_BOMB_FUSE,
            blast_radius: TRIGGER_BOMB_BLAST_RADIUS,
            damage: TRIGGER_BOMB_DAMAGE,
            impact: TRIGGER_BOMB_IMPACT,
        }
    }
}

impl TriggerBombConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "trigger_bomb";
        require_positive(S, "cooldown", self.cooldown)?;
        require_non_negative(S, "launch_speed", self.launch_speed)?;
        require_non_negative(S, "arm_delay", self.arm_delay)?;
        require_positive(S, "fuse", self.fuse)?;
        require_positive(S, "blast_radius", self.blast_radius)?;
        require_non_negative(S, "damage", self.damage)?;
        require_non_negative(S, "impact", self.impact)
    }
}

// ── Fighter AI ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FighterConfig {
    pub fire_cooldown: f32,
    pub burst_duration: f32,
    pub dodge_cooldown: f32,
    pub attack_range: f32,
    pub aim_dot: f32,
    pub coast_duration: f32,
    pub threat_radius: f32,
    pub dodge_impulse: f32,
    pub dodge_duration: f32,
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self {
            fire_cooldown: FIGHTER_FIRE_COOLDOWN,
            burst_duration: FIGHTER_BURST_DURATION,
            dodge_cooldown: FIGHTER_DODGE_COOLDOWN,
            attack_range: FIGHTER_ATTACK_RANGE,
            aim_dot: FIGHTER_AIM_DOT,
            coast_duration: FIGHTER_COAST_DURATION,
            threat_radius: FIGHTER_THREAT_RADIUS,
            dodge_impulse: FIGHTER_DODGE_IMPULSE,
            dodge_duration: FIGHTER_DODGE_DURATION,
        }
    }
}

impl FighterConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        const S: &str = "fighter";
        require_positive(S, "fire_cooldown", self.fire_cooldown)?;
        require_positive(S, "burst_duration", self.burst_duration)?;
        require_positive(S, "dodge_cooldown", self.dodge_cooldown)?;
        require_positive(S, "attack_range", self.attack_range)?;
        require_non_negative(S, "coast_duration", self.coast_duration)?;
        require_positive(S, "threat_radius", self.threat_radius)?;
        require_non_negative(S, "dodge_impulse", self.dodge_impulse)?;
        require_positive(S, "dodge_duration", self.dodge_duration)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse and validate a TOML document.
pub fn parse_ability_config(contents: &str) -> ConfigResult<AbilityConfig> {
    let config: AbilityConfig =
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Startup system: overwrite the [`AbilityConfig`] resource with
/// `assets/abilities.toml` when the file exists and is valid.
///
/// Must run before any system that builds loadouts from the config.
pub fn load_ability_config(mut config: ResMut<AbilityConfig>) {
    let path = ABILITY_CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_ability_config(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("loaded ability config from {path}");
            }
            Err(err) => {
                warn!(%err, "rejected {path}; using defaults");
            }
        },
        Err(_) => {
            info!("no {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::ChargeTier;

    #[test]
    fn defaults_validate() {
        AbilityConfig::default()
            .validate()
            .expect("compiled defaults must validate");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_ability_config(
            r#"
            [beam.heat]
            max = 100.0
            drain_rate = 40.0
            regen_rate = 10.0

            [shield]
            duration = 3.0
            "#,
        )
        .expect("valid partial config");

        assert_eq!(config.beam.heat.drain_rate, 40.0);
        assert_eq!(config.beam.length, BEAM_LENGTH);
        assert_eq!(config.shield.duration, 3.0);
        assert_eq!(config.shield.cooldown, SHIELD_COOLDOWN);
        assert_eq!(config.teleport.range, TELEPORT_RANGE);
    }

    #[test]
    fn tier_tables_load_from_arrays() {
        let config = parse_ability_config(
            r#"
            [giga_blast]
            damage = [1.0, 2.0, 3.0, 4.0]
            "#,
        )
        .expect("valid tier table");
        assert_eq!(config.giga_blast.damage[ChargeTier::Three], 3.0);
    }

    #[test]
    fn zero_duration_timed_ability_is_rejected() {
        let err = parse_ability_config("[shield]\nduration = 0.0\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::NotPositive { section: "shield", field: "duration", .. }),
            "expected shield.duration rejection, got {err:?}"
        );
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let err = parse_ability_config(
            r#"
            [giga_blast.window]
            thresholds = [0.5, 2.0, 1.0, 3.0]
            min_charge_time = 0.5
            max_charge_time = 4.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnorderedThresholds { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_ability_config("[beam\nlength = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loadouts_are_listed_in_order() {
        let config = parse_ability_config(
            r#"
            [[player_loadout]]
            slot = "primary"
            ability = "tractor_beam"

            [[player_loadout]]
            slot = "mobility"
            ability = "stretch_dash"
            "#,
        )
        .expect("loadout list");
        assert_eq!(
            config.player_loadout,
            vec![
                LoadoutSlot::new(AbilitySlot::Primary, AbilityKind::TractorBeam),
                LoadoutSlot::new(AbilitySlot::Mobility, AbilityKind::StretchDash),
            ]
        );
        assert_eq!(config.fighter_loadout, AbilityConfig::default().fighter_loadout);
    }

    #[test]
    fn tractor_heat_is_optional() {
        let config = AbilityConfig::default();
        assert!(config.tractor_beam.heat.is_none());

        let config = parse_ability_config(
            r#"
            [tractor_beam.heat]
            max = 50.0
            drain_rate = 10.0
            regen_rate = 5.0
            "#,
        )
        .expect("tractor heat section");
        assert_eq!(config.tractor_beam.heat.map(|h| h.max), Some(50.0));
    }
}
