use arena_abilities::config::{load_ability_config, AbilityConfig};
use arena_abilities::enemy::spawn_fighter;
use arena_abilities::ship::rendering::{setup_camera, ArenaRenderPlugin};
use arena_abilities::ship::{spawn_debris, spawn_player, ArenaRng};
use arena_abilities::simulation::ArenaPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;

/// Configure Rapier physics: no gravity in space.
fn setup_physics_config(mut config: Query<&mut RapierConfiguration>) {
    for mut cfg in config.iter_mut() {
        cfg.gravity = Vec2::ZERO;
    }
}

fn main() {
    let seed = env::var("ARENA_SEED").ok().and_then(|s| s.parse::<u64>().ok());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Arena".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Compiled defaults; load_ability_config overwrites them from
    // assets/abilities.toml (if present) in the Startup schedule.
    .insert_resource(AbilityConfig::default())
    // World units are pixels; a larger scale changes how forces feel.
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .add_plugins(ArenaPlugin::default())
    .add_plugins(ArenaRenderPlugin)
    .add_systems(
        Startup,
        (
            // Load config first so every spawn sees the final values.
            load_ability_config,
            setup_physics_config,
            spawn_player.after(load_ability_config).after(setup_camera),
            spawn_fighter.after(load_ability_config),
            spawn_debris.after(load_ability_config),
        ),
    );

    if let Some(seed) = seed {
        app.insert_resource(ArenaRng(StdRng::seed_from_u64(seed)));
        info!(seed, "arena rng seeded from ARENA_SEED");
    }

    app.run();
}
