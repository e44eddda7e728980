//! Headless tests for the full ability pipeline.
//!
//! These tests use [`MinimalPlugins`] with the arena systems moved into
//! `Update` and a fixed 100 ms step, so every `app.update()` is one tick.
//! Rapier is not added: collider and visibility changes are checked as
//! components, and nothing moves unless an ability warps it.
//!
//! Covered scenarios:
//! 1. Shield blocks damage for its duration, then honours its cooldown.
//! 2. A teleport warps the ship and restores collision, visibility and scale.
//! 3. Death cancels every active ability and removes their attachments.
//! 4. A fighter drives its beam through the same framework as the player.

use arena_abilities::abilities::{build_loadout, single};
use arena_abilities::ability::{AbilityInput, AbilityKind, AbilitySlot, Loadout, SlotInput};
use arena_abilities::config::{AbilityConfig, LoadoutSlot};
use arena_abilities::enemy::FighterBrain;
use arena_abilities::projectile::Team;
use arena_abilities::ship::{
    ship_bundle, AimDirection, AttachedTo, CameraDiscontinuity, DamageMessage, ShieldEmitter,
    ShipDestroyed, ShipHealth,
};
use arena_abilities::simulation::ArenaPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::*;
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn arena_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.add_plugins(ArenaPlugin::in_schedule(Update));
    app
}

fn spawn_ship(app: &mut App, team: Team, position: Vec2, loadout: Loadout) -> Entity {
    let config = AbilityConfig::default();
    app.world_mut()
        .spawn(ship_bundle(team, position, loadout, &config.ship))
        .id()
}

fn press(app: &mut App, ship: Entity, slot: AbilitySlot) {
    let mut input = app.world_mut().get_mut::<AbilityInput>(ship).unwrap();
    input.set(slot, SlotInput::PRESS);
}

fn damage(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().write_message(DamageMessage {
        target,
        amount,
        source: None,
    });
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn is_active(app: &App, ship: Entity, kind: AbilityKind) -> bool {
    app.world().get::<Loadout>(ship).unwrap().is_active(kind)
}

#[derive(Resource, Default)]
struct WarpCount(usize);

fn count_warps(mut reader: MessageReader<CameraDiscontinuity>, mut count: ResMut<WarpCount>) {
    count.0 += reader.read().count();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Cooldown 5 s, duration 2 s: damage is ignored while up, the pool takes it
/// afterwards, and a second press only works once 5 s have passed.
#[test]
fn shield_blocks_damage_then_respects_cooldown() {
    let mut app = arena_app();
    let config = AbilityConfig::default();
    let ship = spawn_ship(
        &mut app,
        Team::Player,
        Vec2::ZERO,
        single(AbilitySlot::Defense, AbilityKind::Shield, &config),
    );
    app.world_mut().entity_mut(ship).insert(ShieldEmitter);

    // t = 0.0
    press(&mut app, ship, AbilitySlot::Defense);
    app.update();
    assert!(is_active(&app, ship, AbilityKind::Shield));

    // t = 0.1
    damage(&mut app, ship, 10.0);
    app.update();
    let health = app.world().get::<ShipHealth>(ship).unwrap();
    assert_eq!(health.shield, health.max_shield);
    assert_eq!(health.hull, health.max_hull);

    // t = 0.2 ..= 2.5
    run(&mut app, 24);
    assert!(!is_active(&app, ship, AbilityKind::Shield), "duration elapsed");

    // t = 2.6
    damage(&mut app, ship, 10.0);
    press(&mut app, ship, AbilitySlot::Defense);
    app.update();
    let health = app.world().get::<ShipHealth>(ship).unwrap();
    assert!((health.shield - (health.max_shield - 10.0)).abs() < 1e-4);
    assert!(!is_active(&app, ship, AbilityKind::Shield), "still cooling down");

    // t = 2.7 ..= 5.0
    run(&mut app, 24);

    // t = 5.1
    press(&mut app, ship, AbilitySlot::Defense);
    app.update();
    assert!(is_active(&app, ship, AbilityKind::Shield));
}

#[test]
fn teleport_warps_and_restores_the_ship() {
    let mut app = arena_app();
    app.init_resource::<WarpCount>();
    app.add_systems(Update, count_warps);
    let config = AbilityConfig::default();
    let ship = spawn_ship(
        &mut app,
        Team::Player,
        Vec2::ZERO,
        single(AbilitySlot::Mobility, AbilityKind::Teleport, &config),
    );
    app.world_mut().get_mut::<AimDirection>(ship).unwrap().0 = Vec2::X;

    press(&mut app, ship, AbilitySlot::Mobility);
    app.update();
    assert!(
        app.world().get::<ColliderDisabled>(ship).is_some(),
        "intangible while the sequence runs"
    );

    run(&mut app, 10);

    let world = app.world();
    let transform = world.get::<Transform>(ship).unwrap();
    assert!((transform.translation.x - config.teleport.range).abs() < 1e-3);
    assert!(transform.translation.y.abs() < 1e-3);
    assert!((transform.scale.x - 1.0).abs() < 1e-5);
    assert!(world.get::<ColliderDisabled>(ship).is_none());
    assert_ne!(*world.get::<Visibility>(ship).unwrap(), Visibility::Hidden);
    assert_eq!(world.resource::<WarpCount>().0, 1);
    assert!(!is_active(&app, ship, AbilityKind::Teleport));
}

#[test]
fn death_cancels_abilities_and_clears_attachments() {
    let mut app = arena_app();
    let config = AbilityConfig::default();
    let loadout = build_loadout(
        &[
            LoadoutSlot::new(AbilitySlot::Primary, AbilityKind::Beam),
            LoadoutSlot::new(AbilitySlot::Special, AbilityKind::TriggerBomb),
        ],
        &config,
    );
    let ship = spawn_ship(&mut app, Team::Player, Vec2::ZERO, loadout);

    press(&mut app, ship, AbilitySlot::Primary);
    press(&mut app, ship, AbilitySlot::Special);
    app.update();

    let mut attachments = app.world_mut().query::<&AttachedTo>();
    assert_eq!(attachments.iter(app.world()).count(), 2, "beam and bomb");

    damage(&mut app, ship, 10_000.0);
    app.update();

    assert!(app.world().get_entity(ship).is_err(), "ship despawned");
    assert_eq!(attachments.iter(app.world()).count(), 0);
    let destroyed = app.world().resource::<Messages<ShipDestroyed>>();
    assert_eq!(destroyed.len(), 1);
}

#[test]
fn fighter_beams_player_through_the_ability_framework() {
    let mut app = arena_app();
    let config = AbilityConfig::default();
    let player = spawn_ship(&mut app, Team::Player, Vec2::ZERO, Loadout::default());
    let fighter = app
        .world_mut()
        .spawn((
            ship_bundle(
                Team::Enemy,
                Vec2::new(0.0, 200.0),
                build_loadout(&config.fighter_loadout, &config),
                &config.ship,
            ),
            FighterBrain::new(&config.fighter),
        ))
        .id();
    // Nose toward the player.
    app.world_mut()
        .get_mut::<Transform>(fighter)
        .unwrap()
        .rotation = Quat::from_rotation_z(std::f32::consts::PI);

    app.update();
    assert!(is_active(&app, fighter, AbilityKind::Beam));

    run(&mut app, 5);
    let health = app.world().get::<ShipHealth>(player).unwrap();
    assert!(health.shield < health.max_shield, "beam connected");
    assert_eq!(health.hull, health.max_hull);
}
