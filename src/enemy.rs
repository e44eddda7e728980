//! Enemy fighter: a small state machine that drives the same `AbilityInput`
//! and `MovementIntent` a player would.
//!
//! The fighter cycles `Approach → Attack → Coast → Approach`.  An attack run
//! holds the primary slot for `burst_duration`; the coast that follows cuts
//! thrust and keeps turning toward the target.  An incoming projectile inside
//! `threat_radius` interrupts any state with a sideways dodge when the dodge
//! gate is open.

use crate::abilities::build_loadout;
use crate::ability::{AbilityInput, AbilitySlot, CooldownGate};
use crate::config::{AbilityConfig, FighterConfig};
use crate::projectile::{Projectile, Team};
use crate::ship::{ship_bundle, AimDirection, ArenaRng, MovementIntent, Ship};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrainState {
    Approach,
    Attack { until: f64 },
    Coast { until: f64 },
    Dodge { until: f64 },
}

#[derive(Component, Debug, Clone)]
pub struct FighterBrain {
    pub state: BrainState,
    fire_gate: CooldownGate,
    dodge_gate: CooldownGate,
}

impl FighterBrain {
    pub fn new(config: &FighterConfig) -> Self {
        Self {
            state: BrainState::Approach,
            fire_gate: CooldownGate::new(config.fire_cooldown),
            dodge_gate: CooldownGate::new(config.dodge_cooldown),
        }
    }
}

/// What the fighter can see this tick.
#[derive(Debug, Clone, Copy)]
pub struct FighterView {
    pub position: Vec2,
    pub forward: Vec2,
    pub target: Option<Vec2>,
    /// Velocity of the nearest projectile closing on the fighter.
    pub threat: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FighterOrders {
    pub fire: bool,
    pub thrust: bool,
    pub turn: f32,
    pub aim: Vec2,
    /// Set on the tick a dodge starts; the caller picks the side.
    pub dodge_from: Option<Vec2>,
}

/// Turn input in `[-1, 1]`; positive is counter-clockwise.
fn steer(forward: Vec2, to_target: Vec2) -> f32 {
    let cross = forward.perp_dot(to_target);
    if cross.abs() < 1e-3 && forward.dot(to_target) < 0.0 {
        return 1.0;
    }
    (cross * 4.0).clamp(-1.0, 1.0)
}

impl FighterBrain {
    /// Advance the state machine and decide this tick's orders.
    pub fn think(&mut self, now: f64, view: &FighterView, config: &FighterConfig) -> FighterOrders {
        let mut orders = FighterOrders::default();

        if let Some(threat) = view.threat {
            let dodging = matches!(self.state, BrainState::Dodge { .. });
            if !dodging && self.dodge_gate.is_ready(now) {
                self.dodge_gate.mark_used(now);
                self.state = BrainState::Dodge {
                    until: now + config.dodge_duration as f64,
                };
                orders.dodge_from = Some(threat);
            }
        }

        let Some(target) = view.target else {
            if !matches!(self.state, BrainState::Dodge { .. }) {
                self.state = BrainState::Approach;
            }
            return orders;
        };
        let to_target = (target - view.position).normalize_or_zero();
        let distance = view.position.distance(target);
        orders.aim = to_target;
        orders.turn = steer(view.forward, to_target);

        match self.state {
            BrainState::Dodge { until } => {
                if now >= until {
                    self.state = BrainState::Approach;
                }
            }
            BrainState::Approach => {
                orders.thrust = true;
                let lined_up = view.forward.dot(to_target) >= config.aim_dot;
                if distance <= config.attack_range && lined_up && self.fire_gate.is_ready(now) {
                    self.fire_gate.mark_used(now);
                    self.state = BrainState::Attack {
                        until: now + config.burst_duration as f64,
                    };
                    orders.fire = true;
                }
            }
            BrainState::Attack { until } => {
                if now >= until {
                    self.state = BrainState::Coast {
                        until: now + config.coast_duration as f64,
                    };
                } else {
                    orders.fire = true;
                    orders.thrust = true;
                }
            }
            BrainState::Coast { until } => {
                if now >= until {
                    self.state = BrainState::Approach;
                    orders.thrust = true;
                }
            }
        }
        orders
    }
}

pub fn fighter_brain_system(
    time: Res<Time>,
    config: Res<AbilityConfig>,
    mut rng: ResMut<ArenaRng>,
    q_ships: Query<(&Transform, &Team), With<Ship>>,
    q_projectiles: Query<(&Transform, &Velocity, &Projectile)>,
    mut q_fighters: Query<(
        &Transform,
        &Team,
        &mut FighterBrain,
        &mut AbilityInput,
        &mut MovementIntent,
        &mut AimDirection,
        &mut ExternalImpulse,
    )>,
) {
    let now = time.elapsed_secs_f64();
    let fighter_config = &config.fighter;

    for (transform, team, mut brain, mut input, mut intent, mut aim, mut impulse) in
        q_fighters.iter_mut()
    {
        let position = transform.translation.truncate();

        let target = q_ships
            .iter()
            .filter(|(_, other)| **other != *team)
            .map(|(t, _)| t.translation.truncate())
            .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)));

        let threat = q_projectiles
            .iter()
            .filter(|(_, _, p)| p.target == *team)
            .filter_map(|(t, v, _)| {
                let offset = position - t.translation.truncate();
                let closing = v.linvel.dot(offset) > 0.0;
                let near = offset.length() <= fighter_config.threat_radius;
                (closing && near).then_some((offset.length_squared(), v.linvel))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, vel)| vel);

        let view = FighterView {
            position,
            forward: transform.rotation.mul_vec3(Vec3::Y).truncate(),
            target,
            threat,
        };
        let orders = brain.think(now, &view, fighter_config);

        input.set_level(AbilitySlot::Primary, orders.fire);
        intent.thrust_forward = f32::from(orders.thrust);
        intent.thrust_reverse = 0.0;
        intent.turn = orders.turn;
        aim.0 = orders.aim;

        if let Some(threat_velocity) = orders.dodge_from {
            let side = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
            let dir = threat_velocity.normalize_or_zero().perp() * side;
            impulse.impulse += dir * fighter_config.dodge_impulse;
            debug!(?dir, "fighter dodging");
        }
    }
}

/// Startup system: one fighter on the far side of the arena.
pub fn spawn_fighter(mut commands: Commands, config: Res<AbilityConfig>) {
    let loadout = build_loadout(&config.fighter_loadout, &config);
    let position = Vec2::new(0.0, config.ship.arena_radius * 0.6);
    commands.spawn((
        ship_bundle(Team::Enemy, position, loadout, &config.ship),
        FighterBrain::new(&config.fighter),
    ));
    info!(?position, "fighter spawned");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(target: Option<Vec2>) -> FighterView {
        FighterView {
            position: Vec2::ZERO,
            forward: Vec2::Y,
            target,
            threat: None,
        }
    }

    #[test]
    fn approach_steers_toward_target() {
        let config = FighterConfig::default();
        let mut brain = FighterBrain::new(&config);
        // Target to the left of a +Y nose: counter-clockwise turn.
        let orders = brain.think(0.0, &view(Some(Vec2::new(-500.0, 100.0))), &config);
        assert!(orders.thrust);
        assert!(!orders.fire);
        assert!(orders.turn > 0.0);
        assert_eq!(brain.state, BrainState::Approach);
    }

    #[test]
    fn lined_up_target_in_range_starts_attack_run() {
        let config = FighterConfig::default();
        let mut brain = FighterBrain::new(&config);
        let orders = brain.think(0.0, &view(Some(Vec2::new(0.0, 200.0))), &config);
        assert!(orders.fire);
        assert!(matches!(brain.state, BrainState::Attack { .. }));
    }

    #[test]
    fn attack_run_ends_in_coast_then_reapproach() {
        let config = FighterConfig::default();
        let mut brain = FighterBrain::new(&config);
        let target = view(Some(Vec2::new(0.0, 200.0)));
        brain.think(0.0, &target, &config);

        let burst_end = config.burst_duration as f64;
        let orders = brain.think(burst_end, &target, &config);
        assert!(!orders.fire);
        assert!(!orders.thrust, "coasting cuts thrust");
        assert!(matches!(brain.state, BrainState::Coast { .. }));

        let coast_end = burst_end + config.coast_duration as f64;
        let orders = brain.think(coast_end, &target, &config);
        assert!(orders.thrust);
        assert_eq!(brain.state, BrainState::Approach);
    }

    #[test]
    fn fire_gate_spaces_attack_runs() {
        let config = FighterConfig {
            burst_duration: 0.1,
            coast_duration: 0.1,
            fire_cooldown: 5.0,
            ..FighterConfig::default()
        };
        let mut brain = FighterBrain::new(&config);
        let target = view(Some(Vec2::new(0.0, 200.0)));
        let burst_end = config.burst_duration as f64;
        brain.think(0.0, &target, &config);
        brain.think(burst_end, &target, &config);
        brain.think(burst_end + config.coast_duration as f64, &target, &config);
        assert_eq!(brain.state, BrainState::Approach);

        let orders = brain.think(1.0, &target, &config);
        assert!(!orders.fire, "gate still closed");
        let orders = brain.think(5.0, &target, &config);
        assert!(orders.fire);
    }

    #[test]
    fn threat_triggers_one_dodge_per_gate() {
        let config = FighterConfig::default();
        let mut brain = FighterBrain::new(&config);
        let mut threatened = view(Some(Vec2::new(0.0, 200.0)));
        threatened.threat = Some(Vec2::new(0.0, 300.0));

        let orders = brain.think(0.0, &threatened, &config);
        assert_eq!(orders.dodge_from, Some(Vec2::new(0.0, 300.0)));
        assert!(!orders.fire, "dodging preempts the attack");
        assert!(matches!(brain.state, BrainState::Dodge { .. }));

        let after = config.dodge_duration as f64;
        let orders = brain.think(after, &threatened, &config);
        assert_eq!(orders.dodge_from, None, "dodge gate still closed");
        assert_eq!(brain.state, BrainState::Approach);
    }

    #[test]
    fn no_target_idles() {
        let config = FighterConfig::default();
        let mut brain = FighterBrain::new(&config);
        let orders = brain.think(0.0, &view(None), &config);
        assert_eq!(orders, FighterOrders::default());
    }

    fn brain_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(AbilityConfig::default());
        app.init_resource::<ArenaRng>();
        app.add_systems(Update, fighter_brain_system);
        app
    }

    fn spawn_pair(app: &mut App) -> Entity {
        let config = AbilityConfig::default();
        app.world_mut().spawn(ship_bundle(
            Team::Player,
            Vec2::new(0.0, 200.0),
            crate::ability::Loadout::default(),
            &config.ship,
        ));
        app.world_mut()
            .spawn((
                ship_bundle(Team::Enemy, Vec2::ZERO, crate::ability::Loadout::default(), &config.ship),
                FighterBrain::new(&config.fighter),
            ))
            .id()
    }

    #[test]
    fn fighter_holds_primary_on_attack_run() {
        let mut app = brain_app();
        let fighter = spawn_pair(&mut app);
        app.update();

        let world = app.world();
        let input = world.get::<AbilityInput>(fighter).unwrap();
        assert!(input.get(AbilitySlot::Primary).held);
        let aim = world.get::<AimDirection>(fighter).unwrap();
        assert!((aim.0 - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn incoming_projectile_pushes_fighter_sideways() {
        let mut app = brain_app();
        let fighter = spawn_pair(&mut app);
        app.world_mut().spawn((
            Projectile::initialize(Team::Enemy, 300.0, 10.0, 2.0, 0.0, None),
            Transform::from_xyz(0.0, -60.0, 0.0),
            Velocity::linear(Vec2::new(0.0, 300.0)),
        ));
        app.update();

        let impulse = app.world().get::<ExternalImpulse>(fighter).unwrap().impulse;
        let expected = AbilityConfig::default().fighter.dodge_impulse;
        assert!((impulse.x.abs() - expected).abs() < 1e-3, "impulse {impulse:?}");
        assert!(impulse.y.abs() < 1e-3);
    }
}
