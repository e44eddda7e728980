//! Gizmo rendering, cursor aim and camera follow.  Windowed builds only; the
//! simulation never depends on anything here.
//!
//! | Layer | Drawn as |
//! |---|---|
//! | Ships | dart outline tinted by team, hull / shield bars |
//! | Player loadout | one cooldown bar per ability, heat bar underneath |
//! | Beam | line along the aim, width ignored |
//! | Tractor cone | two edge lines at the cone half-angle |
//! | Shield / reflect | circle around the ship |
//! | Charge glow | circle growing with the tier |
//! | Bomb | small disc plus faint blast radius |
//! | Hazards, projectiles, debris | circles |

use super::state::{
    AimDirection, AttachedTo, Bomb, CameraDiscontinuity, Hazard, Player, Ship, ShipHealth,
    Tractorable,
};
use crate::ability::{AbilityKind, Attachment, Loadout};
use crate::config::AbilityConfig;
use crate::projectile::{Projectile, Team};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Fraction of the remaining distance the camera closes each frame.
const CAMERA_FOLLOW_RATE: f32 = 0.2;

pub struct ArenaRenderPlugin;

impl Plugin for ArenaRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (
                cursor_aim_system,
                camera_follow_system,
                ship_gizmo_system,
                ability_hud_gizmo_system,
                attachment_gizmo_system,
                world_gizmo_system,
            )
                .chain(),
        );
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Local-space dart; nose along +Y.
fn ship_vertices() -> [Vec2; 4] {
    [
        Vec2::new(0.0, 12.0),
        Vec2::new(-8.0, -8.0),
        Vec2::new(0.0, -4.0),
        Vec2::new(8.0, -8.0),
    ]
}

fn team_color(team: Team) -> Color {
    match team {
        Team::Player => Color::srgb(0.2, 0.9, 1.0),
        Team::Enemy => Color::srgb(1.0, 0.35, 0.25),
    }
}

/// Point the player's aim at the cursor.
pub fn cursor_aim_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform)>,
    mut q_player: Query<(&Transform, &mut AimDirection), With<Player>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = q_camera.single() else {
        return;
    };
    let Ok(world) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };
    for (transform, mut aim) in q_player.iter_mut() {
        aim.0 = (world - transform.translation.truncate()).normalize_or_zero();
    }
}

/// Ease the camera toward the player; snap after a teleport.
pub fn camera_follow_system(
    mut discontinuities: MessageReader<CameraDiscontinuity>,
    q_player: Query<(Entity, &Transform), With<Player>>,
    mut q_camera: Query<&mut Transform, (With<Camera>, Without<Player>)>,
) {
    let Ok((player, player_transform)) = q_player.single() else {
        return;
    };
    let Ok(mut cam) = q_camera.single_mut() else {
        return;
    };
    let snap = discontinuities.read().any(|d| d.entity == player);
    let target = player_transform.translation.truncate();
    let current = cam.translation.truncate();
    let next = if snap {
        target
    } else {
        current.lerp(target, CAMERA_FOLLOW_RATE)
    };
    cam.translation.x = next.x;
    cam.translation.y = next.y;
}

pub fn ship_gizmo_system(
    mut gizmos: Gizmos,
    q_ships: Query<(&Transform, &Team, &ShipHealth, &Visibility), With<Ship>>,
) {
    for (transform, team, health, visibility) in q_ships.iter() {
        if *visibility == Visibility::Hidden {
            continue;
        }
        let pos = transform.translation.truncate();
        let verts = ship_vertices();
        let color = team_color(*team);
        for i in 0..verts.len() {
            let p1 = transform.transform_point(verts[i].extend(0.0)).truncate();
            let p2 = transform
                .transform_point(verts[(i + 1) % verts.len()].extend(0.0))
                .truncate();
            gizmos.line_2d(p1, p2, color);
        }

        let bar_half = 20.0;
        let hull_frac = (health.hull / health.max_hull).clamp(0.0, 1.0);
        let hull_start = pos + Vec2::new(-bar_half, 18.0);
        gizmos.line_2d(hull_start, hull_start + Vec2::new(bar_half * 2.0, 0.0), Color::srgba(0.4, 0.0, 0.0, 0.8));
        if hull_frac > 0.0 {
            gizmos.line_2d(
                hull_start,
                hull_start + Vec2::new(bar_half * 2.0 * hull_frac, 0.0),
                Color::srgb(1.0 - hull_frac, hull_frac, 0.0),
            );
        }
        if health.max_shield > 0.0 && health.shield > 0.0 {
            let shield_frac = (health.shield / health.max_shield).clamp(0.0, 1.0);
            let shield_start = pos + Vec2::new(-bar_half, 21.0);
            gizmos.line_2d(
                shield_start,
                shield_start + Vec2::new(bar_half * 2.0 * shield_frac, 0.0),
                Color::srgb(0.3, 0.6, 1.0),
            );
        }
    }
}

/// What the HUD shows for one loadout entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityGauge {
    pub kind: AbilityKind,
    /// Cooldown progress, `1.0` when ready.
    pub cooldown: f32,
    /// Heat fill, for abilities that carry a heat pool.
    pub heat: Option<f32>,
}

pub fn ability_gauges(loadout: &Loadout, now: f64) -> Vec<AbilityGauge> {
    loadout
        .iter()
        .map(|entry| {
            let core = entry.ability.core();
            AbilityGauge {
                kind: core.kind(),
                cooldown: core.cooldown().fill_fraction(now),
                heat: core.heat().map(|h| h.fraction()),
            }
        })
        .collect()
}

/// Cooldown and heat bars stacked under the player's ship.
pub fn ability_hud_gizmo_system(
    mut gizmos: Gizmos,
    time: Res<Time>,
    q_player: Query<(&Transform, &Loadout), With<Player>>,
) {
    let now = time.elapsed_secs_f64();
    let bar_len = 40.0;
    for (transform, loadout) in q_player.iter() {
        let pos = transform.translation.truncate();
        for (i, gauge) in ability_gauges(loadout, now).iter().enumerate() {
            let start = pos + Vec2::new(-bar_len * 0.5, -20.0 - 6.0 * i as f32);
            let ready = gauge.cooldown >= 1.0;
            let color = if ready {
                Color::srgb(0.3, 1.0, 0.4)
            } else {
                Color::srgba(0.8, 0.8, 0.8, 0.7)
            };
            gizmos.line_2d(start, start + Vec2::new(bar_len * gauge.cooldown, 0.0), color);
            if let Some(heat) = gauge.heat.filter(|h| *h > 0.0) {
                let heat_start = start + Vec2::new(0.0, -2.0);
                gizmos.line_2d(
                    heat_start,
                    heat_start + Vec2::new(bar_len * heat, 0.0),
                    Color::srgb(1.0, 0.4 * (1.0 - heat), 0.0),
                );
            }
        }
    }
}

pub fn attachment_gizmo_system(
    mut gizmos: Gizmos,
    config: Res<AbilityConfig>,
    q_attachments: Query<(&AttachedTo, &Transform), Without<Ship>>,
    q_owners: Query<(&Transform, &AimDirection), With<Ship>>,
) {
    for (tag, own_transform) in q_attachments.iter() {
        let Ok((owner, aim)) = q_owners.get(tag.owner) else {
            continue;
        };
        let pos = owner.translation.truncate();
        let dir = if aim.0.length_squared() > 1e-4 {
            aim.0.normalize_or_zero()
        } else {
            owner.rotation.mul_vec3(Vec3::Y).truncate()
        };
        match tag.attachment {
            Attachment::Beam { length, .. } => {
                gizmos.line_2d(pos, pos + dir * length, Color::srgb(1.0, 0.9, 0.3));
            }
            Attachment::TractorCone { range } => {
                let half_angle = config.tractor_beam.cone_dot.clamp(-1.0, 1.0).acos();
                let color = Color::srgba(0.5, 1.0, 0.6, 0.6);
                for side in [-half_angle, half_angle] {
                    let edge = Vec2::from_angle(side).rotate(dir);
                    gizmos.line_2d(pos, pos + edge * range, color);
                }
            }
            Attachment::ShieldBubble { radius } => {
                gizmos.circle_2d(pos, radius, Color::srgb(0.3, 0.6, 1.0));
            }
            Attachment::ReflectField { radius } => {
                gizmos.circle_2d(pos, radius, Color::srgb(0.9, 0.4, 1.0));
            }
            Attachment::ChargeGlow { tier } => {
                gizmos.circle_2d(pos, 10.0 + 4.0 * tier.level() as f32, Color::srgb(1.0, 0.6, 0.1));
            }
            Attachment::Bomb(spec) => {
                let at = own_transform.translation.truncate();
                gizmos.circle_2d(at, 5.0, Color::srgb(1.0, 0.2, 0.2));
                gizmos.circle_2d(at, spec.blast_radius, Color::srgba(1.0, 0.2, 0.2, 0.15));
            }
            Attachment::FireTrailEmitter => {}
        }
    }
}

pub fn world_gizmo_system(
    mut gizmos: Gizmos,
    q_projectiles: Query<&Transform, With<Projectile>>,
    q_hazards: Query<(&Transform, &Hazard)>,
    q_debris: Query<&Transform, (With<Tractorable>, Without<Bomb>)>,
) {
    for transform in q_projectiles.iter() {
        gizmos.circle_2d(transform.translation.truncate(), 3.0, Color::srgb(1.0, 0.9, 0.2));
    }
    for (transform, hazard) in q_hazards.iter() {
        gizmos.circle_2d(transform.translation.truncate(), hazard.radius, Color::srgb(1.0, 0.45, 0.0));
    }
    for transform in q_debris.iter() {
        gizmos.circle_2d(transform.translation.truncate(), 10.0, Color::srgb(0.6, 0.6, 0.6));
    }
}
