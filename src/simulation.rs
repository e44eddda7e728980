//! Arena plugin: registers messages and resources and runs the ability
//! pipeline as one chained system set.

use crate::config::AbilityConfig;
use crate::enemy::fighter_brain_system;
use crate::ship::{
    ability_input_clear_system, ability_tick_system, apply_ability_effects_system,
    attachment_watch_system, beam_damage_system, bomb_detonation_system, hazard_damage_system,
    keyboard_to_ability_input_system, projectile_hit_system, projectile_lifetime_system,
    ship_damage_system, ship_movement_system, tractor_beam_force_system, AbilityCue, ArenaRng,
    CameraDiscontinuity, DamageMessage, ShipDestroyed,
};
use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

pub struct ArenaPlugin {
    schedule: InternedScheduleLabel,
}

impl ArenaPlugin {
    /// Run the pipeline in `schedule` instead of `FixedUpdate`.  Headless
    /// tests use `Update` so a single `app.update()` advances one tick.
    pub fn in_schedule(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Default for ArenaPlugin {
    fn default() -> Self {
        Self::in_schedule(FixedUpdate)
    }
}

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DamageMessage>()
            .add_message::<ShipDestroyed>()
            .add_message::<AbilityCue>()
            .add_message::<CameraDiscontinuity>()
            // Rapier registers this too; tests without the physics plugin need it.
            .add_message::<CollisionEvent>()
            .init_resource::<AbilityConfig>()
            .init_resource::<ArenaRng>()
            .add_systems(
                self.schedule,
                (
                    keyboard_to_ability_input_system,
                    fighter_brain_system,
                    ability_tick_system,
                    apply_ability_effects_system,
                    ship_movement_system,
                    tractor_beam_force_system,
                    projectile_lifetime_system,
                    beam_damage_system,
                    hazard_damage_system,
                    projectile_hit_system,
                    bomb_detonation_system,
                    ship_damage_system,
                    attachment_watch_system,
                    ability_input_clear_system,
                )
                    .chain(),
            );
    }
}
