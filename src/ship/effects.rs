//! Turns queued [`AbilityEffect`]s into world changes.
//!
//! This is the only place abilities reach the ECS.  Everything an ability
//! asked for during `ability_tick_system` lands here in order, per ship.

use super::state::{
    AbilityCue, AttachedTo, Attachments, Bomb, CameraDiscontinuity, Detonating, Hazard,
    PendingEffects, Ship,
};
use crate::ability::effect::{BombSpec, HazardSpec};
use crate::ability::{AbilityEffect, Attachment, AttachmentKind};
use crate::projectile::{Projectile, ProjectileSpec};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Collision layers.
pub mod layers {
    use bevy_rapier2d::geometry::Group;

    pub const SHIPS: Group = Group::GROUP_1;
    pub const DEBRIS: Group = Group::GROUP_2;
    pub const PROJECTILES: Group = Group::GROUP_3;
}

/// Bomb collider radius.
const BOMB_RADIUS: f32 = 6.0;

/// Drain every ship's [`PendingEffects`] and apply them.
#[allow(clippy::type_complexity)]
pub fn apply_ability_effects_system(
    mut commands: Commands,
    mut q_ships: Query<
        (
            Entity,
            &mut PendingEffects,
            &mut Attachments,
            &mut Transform,
            &mut Velocity,
            &mut ExternalImpulse,
            &mut Visibility,
        ),
        With<Ship>,
    >,
    mut cues: MessageWriter<AbilityCue>,
    mut discontinuities: MessageWriter<CameraDiscontinuity>,
) {
    for (ship, mut pending, mut attachments, mut transform, mut velocity, mut impulse, mut visibility) in
        q_ships.iter_mut()
    {
        if pending.0.is_empty() {
            continue;
        }
        for effect in pending.0.drain() {
            match effect {
                AbilityEffect::Attach(attachment) => {
                    let kind = attachment.kind();
                    if let Some(old) = attachments.0.remove(&kind) {
                        commands.entity(old).despawn();
                    }
                    let entity = spawn_attachment(&mut commands, ship, attachment);
                    attachments.0.insert(kind, entity);
                }
                AbilityEffect::Detach(kind) => {
                    if let Some(entity) = attachments.0.remove(&kind) {
                        commands.entity(entity).despawn();
                    }
                }
                AbilityEffect::SpawnProjectile(spec) => {
                    spawn_projectile(&mut commands, &spec, Some(ship));
                }
                AbilityEffect::DropHazard(spec) => {
                    spawn_hazard(&mut commands, &spec);
                }
                AbilityEffect::Impulse(kick) => {
                    impulse.impulse += kick;
                }
                AbilityEffect::SetLinearVelocity(linvel) => {
                    velocity.linvel = linvel;
                }
                AbilityEffect::SetCollision(true) => {
                    commands.entity(ship).remove::<ColliderDisabled>();
                }
                AbilityEffect::SetCollision(false) => {
                    commands.entity(ship).insert(ColliderDisabled);
                }
                AbilityEffect::SetVisible(visible) => {
                    *visibility = if visible {
                        Visibility::Visible
                    } else {
                        Visibility::Hidden
                    };
                }
                AbilityEffect::SetScale(scale) => {
                    transform.scale = scale.extend(1.0);
                }
                AbilityEffect::Warp { to } => {
                    let from = transform.translation.truncate();
                    transform.translation = to.extend(transform.translation.z);
                    discontinuities.write(CameraDiscontinuity {
                        entity: ship,
                        from,
                        to,
                    });
                }
                AbilityEffect::DetonateBomb => {
                    if let Some(bomb) = attachments.0.remove(&AttachmentKind::Bomb) {
                        commands.entity(bomb).insert(Detonating);
                    }
                }
                AbilityEffect::Cue(ability, cue) => {
                    debug!(?ship, ?ability, ?cue, "ability cue");
                    cues.write(AbilityCue { ship, ability, cue });
                }
            }
        }
    }
}

fn spawn_attachment(commands: &mut Commands, owner: Entity, attachment: Attachment) -> Entity {
    let tag = AttachedTo { owner, attachment };
    match attachment {
        Attachment::Bomb(spec) => spawn_bomb(commands, owner, tag, &spec),
        _ => commands
            .spawn((
                tag,
                Transform::default(),
                Visibility::default(),
                ChildOf(owner),
            ))
            .id(),
    }
}

fn spawn_bomb(commands: &mut Commands, owner: Entity, tag: AttachedTo, spec: &BombSpec) -> Entity {
    commands
        .spawn((
            tag,
            Bomb {
                owner,
                target: spec.target,
                blast_radius: spec.blast_radius,
                damage: spec.damage,
                impact: spec.impact,
            },
            Transform::from_translation(spec.position.extend(0.1)),
            Visibility::default(),
            RigidBody::KinematicVelocityBased,
            Velocity {
                linvel: spec.velocity,
                angvel: 0.0,
            },
            Collider::ball(BOMB_RADIUS),
            Sensor,
            CollisionGroups::new(layers::PROJECTILES, layers::SHIPS),
            ActiveCollisionTypes::DYNAMIC_KINEMATIC,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Spawn a projectile entity from a spec.
///
/// Projectiles are kinematic sensors: they report hits without pushing what
/// they touch; impact impulses are applied by the hit system instead.
pub fn spawn_projectile(commands: &mut Commands, spec: &ProjectileSpec, shooter: Option<Entity>) -> Entity {
    commands
        .spawn((
            Projectile::from_spec(spec, shooter),
            Transform::from_translation(spec.position.extend(0.2)),
            Visibility::default(),
            RigidBody::KinematicVelocityBased,
            Velocity {
                linvel: spec.velocity(),
                angvel: 0.0,
            },
            Collider::ball(spec.radius),
            Sensor,
            Ccd { enabled: true },
            CollisionGroups::new(layers::PROJECTILES, layers::SHIPS),
            ActiveCollisionTypes::DYNAMIC_KINEMATIC,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

fn spawn_hazard(commands: &mut Commands, spec: &HazardSpec) -> Entity {
    commands
        .spawn((
            Hazard {
                target: spec.target,
                radius: spec.radius,
                damage_per_second: spec.damage_per_second,
                remaining: spec.lifetime,
            },
            Transform::from_translation(spec.position.extend(-0.1)),
            Visibility::default(),
        ))
        .id()
}
