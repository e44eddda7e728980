//! Ability ticking and everything that turns into damage.
//!
//! ## Damage flow
//!
//! Beams, hazards, projectiles and bombs never touch `ShipHealth` directly.
//! They write [`DamageMessage`]s; [`ship_damage_system`] resolves them in one
//! place so mitigation and damage-taken modifiers apply uniformly:
//!
//! 1. Any ability with damage mitigation active → the message is dropped.
//! 2. `amount × composed damage_taken` → shield pool, then hull.
//! 3. Hull at zero → every ability is cancelled, attachments go, the ship is
//!    despawned and [`ShipDestroyed`] is written.

use super::state::{
    AimDirection, AttachedTo, Attachments, Bomb, DamageMessage, Detonating, Hazard,
    PendingEffects, ShieldEmitter, Ship, ShipDestroyed, ShipHealth, Slowed,
};
use crate::ability::{
    AbilityInput, Attachment, AttachmentKind, CollisionOutcome, Loadout, ShipContext,
};
use crate::config::AbilityConfig;
use crate::projectile::{Projectile, Team};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

/// Projectiles further than this multiple of the arena radius are culled.
const PROJECTILE_CULL_FACTOR: f32 = 1.5;

// ── Ability tick ──────────────────────────────────────────────────────────────

/// Snapshot every ship and advance its loadout by one tick.
#[allow(clippy::type_complexity)]
pub fn ability_tick_system(
    time: Res<Time>,
    config: Res<AbilityConfig>,
    mut q: Query<
        (
            &Transform,
            &Velocity,
            &Team,
            &AimDirection,
            &AbilityInput,
            Has<ShieldEmitter>,
            &mut Loadout,
            &mut PendingEffects,
        ),
        With<Ship>,
    >,
) {
    let now = time.elapsed_secs_f64();
    let dt = time.delta_secs();
    for (transform, velocity, team, aim, input, has_shield_emitter, mut loadout, mut pending) in
        q.iter_mut()
    {
        let ship = ShipContext {
            position: transform.translation.truncate(),
            forward: transform.rotation.mul_vec3(Vec3::Y).truncate(),
            aim: aim.0,
            velocity: velocity.linvel,
            team: *team,
            has_shield_emitter,
            arena_radius: config.ship.arena_radius,
        };
        loadout.tick(now, dt, &ship, input, &mut pending.0);
    }
}

/// Edges are consumed by exactly one tick; `held` carries over.
pub fn ability_input_clear_system(mut q: Query<&mut AbilityInput>) {
    for mut input in q.iter_mut() {
        input.clear_edges();
    }
}

// ── Projectile lifetime ───────────────────────────────────────────────────────

/// Age projectiles and despawn them when they expire or leave the arena.
pub fn projectile_lifetime_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<AbilityConfig>,
    mut q: Query<(Entity, &mut Projectile, &Transform)>,
) {
    let dt = time.delta_secs();
    let max_dist = config.ship.arena_radius * PROJECTILE_CULL_FACTOR;
    for (entity, mut projectile, transform) in q.iter_mut() {
        projectile.age += dt;
        if projectile.is_expired() || transform.translation.truncate().length() > max_dist {
            commands.entity(entity).despawn();
        }
    }
}

// ── Continuous damage ─────────────────────────────────────────────────────────

/// Shortest distance from `p` to the segment `a..b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Beams deal `damage_per_second × dt` to every opponent ship they touch.
/// Intangible ships (collider disabled) are skipped, as they are by Rapier.
pub fn beam_damage_system(
    time: Res<Time>,
    config: Res<AbilityConfig>,
    q_beams: Query<&AttachedTo>,
    q_owners: Query<(&Transform, &AimDirection), With<Ship>>,
    q_targets: Query<(Entity, &Transform, &Team), (With<Ship>, Without<ColliderDisabled>)>,
    mut damage: MessageWriter<DamageMessage>,
) {
    let dt = time.delta_secs();
    for tag in q_beams.iter() {
        let Attachment::Beam {
            length,
            width,
            damage_per_second,
            target,
        } = tag.attachment
        else {
            continue;
        };
        let Ok((owner_transform, aim)) = q_owners.get(tag.owner) else {
            continue;
        };
        let start = owner_transform.translation.truncate();
        let dir = if aim.0.length_squared() > 1e-4 {
            aim.0.normalize_or_zero()
        } else {
            owner_transform.rotation.mul_vec3(Vec3::Y).truncate()
        };
        let end = start + dir * length;
        let reach = width * 0.5 + config.ship.collider_radius;

        for (entity, transform, team) in q_targets.iter() {
            if entity == tag.owner || *team != target {
                continue;
            }
            if distance_to_segment(transform.translation.truncate(), start, end) <= reach {
                damage.write(DamageMessage {
                    target: entity,
                    amount: damage_per_second * dt,
                    source: Some(tag.owner),
                });
            }
        }
    }
}

/// Fire-trail segments burn opponents standing in them, then burn out.
pub fn hazard_damage_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<AbilityConfig>,
    mut q_hazards: Query<(Entity, &Transform, &mut Hazard)>,
    q_targets: Query<(Entity, &Transform, &Team), (With<Ship>, Without<ColliderDisabled>)>,
    mut damage: MessageWriter<DamageMessage>,
) {
    let dt = time.delta_secs();
    for (entity, transform, mut hazard) in q_hazards.iter_mut() {
        hazard.remaining -= dt;
        if hazard.remaining <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        let center = transform.translation.truncate();
        let reach = hazard.radius + config.ship.collider_radius;
        for (ship, ship_transform, team) in q_targets.iter() {
            if *team == hazard.target && ship_transform.translation.truncate().distance(center) <= reach {
                damage.write(DamageMessage {
                    target: ship,
                    amount: hazard.damage_per_second * dt,
                    source: None,
                });
            }
        }
    }
}

// ── Contact ───────────────────────────────────────────────────────────────────

/// Resolve projectile and bomb contacts with ships.
///
/// Matches `CollisionEvent::Started` pairs; ignores `Stopped`.  A projectile
/// only interacts with ships of its target team.  If the ship has a
/// collision-modifying ability active, that ability sees the projectile first
/// and may turn it around; otherwise the default hit applies: damage, impact
/// impulse, slow, then despawn unless the projectile pierces.
#[allow(clippy::type_complexity)]
pub fn projectile_hit_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    mut q_projectiles: Query<(&mut Projectile, &mut Velocity), Without<Ship>>,
    q_bombs: Query<&Bomb>,
    mut q_ships: Query<
        (&Team, &mut Loadout, &mut PendingEffects, &mut ExternalImpulse),
        With<Ship>,
    >,
    mut damage: MessageWriter<DamageMessage>,
) {
    let mut spent: HashSet<Entity> = HashSet::new();
    let mut resolved: HashSet<(Entity, Entity)> = HashSet::new();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        for (other, ship) in [(e1, e2), (e2, e1)] {
            if spent.contains(&other) || !resolved.insert((other, ship)) {
                continue;
            }
            let Ok((team, mut loadout, mut pending, mut impulse)) = q_ships.get_mut(ship) else {
                continue;
            };

            if let Ok(bomb) = q_bombs.get(other) {
                if *team == bomb.target {
                    commands.entity(other).insert(Detonating);
                    spent.insert(other);
                }
                continue;
            }

            let Ok((mut projectile, mut velocity)) = q_projectiles.get_mut(other) else {
                continue;
            };
            if *team != projectile.target {
                continue;
            }

            if loadout.has_collision_modification()
                && loadout.process_collision(&mut projectile, &mut pending.0)
                    == CollisionOutcome::Reflected
            {
                velocity.linvel = -velocity.linvel;
                projectile.shooter = Some(ship);
                continue;
            }

            damage.write(DamageMessage {
                target: ship,
                amount: projectile.damage,
                source: projectile.shooter,
            });
            impulse.impulse += velocity.linvel.normalize_or_zero() * projectile.impact;
            if let Some(slow) = projectile.slow {
                commands.entity(ship).insert(Slowed {
                    multiplier: slow.multiplier,
                    remaining: slow.duration,
                });
            }
            if !projectile.consume_hit() {
                spent.insert(other);
                commands.entity(other).despawn();
            }
        }
    }
}

/// Explode every bomb marked [`Detonating`].
#[allow(clippy::type_complexity)]
pub fn bomb_detonation_system(
    mut commands: Commands,
    config: Res<AbilityConfig>,
    q_bombs: Query<(Entity, &Bomb, &Transform), With<Detonating>>,
    mut q_ships: Query<
        (Entity, &Transform, &Team, &mut ExternalImpulse),
        (With<Ship>, Without<Bomb>, Without<ColliderDisabled>),
    >,
    mut damage: MessageWriter<DamageMessage>,
) {
    for (entity, bomb, transform) in q_bombs.iter() {
        let center = transform.translation.truncate();
        let reach = bomb.blast_radius + config.ship.collider_radius;
        let mut hit = 0usize;
        for (ship, ship_transform, team, mut impulse) in q_ships.iter_mut() {
            let offset = ship_transform.translation.truncate() - center;
            if *team != bomb.target || offset.length() > reach {
                continue;
            }
            damage.write(DamageMessage {
                target: ship,
                amount: bomb.damage,
                source: Some(bomb.owner),
            });
            impulse.impulse += offset.normalize_or_zero() * bomb.impact;
            hit += 1;
        }
        debug!(?entity, %center, hit, "bomb detonated");
        commands.entity(entity).despawn();
    }
}

// ── Damage resolution ─────────────────────────────────────────────────────────

/// Apply queued damage; destroy ships whose hull reaches zero.
#[allow(clippy::type_complexity)]
pub fn ship_damage_system(
    mut commands: Commands,
    mut messages: MessageReader<DamageMessage>,
    mut q: Query<
        (
            &Team,
            &mut ShipHealth,
            &mut Loadout,
            &mut PendingEffects,
            &mut Attachments,
        ),
        With<Ship>,
    >,
    mut destroyed: MessageWriter<ShipDestroyed>,
) {
    let mut dead: HashSet<Entity> = HashSet::new();
    for message in messages.read() {
        if dead.contains(&message.target) {
            continue;
        }
        let Ok((team, mut health, mut loadout, mut pending, mut attachments)) =
            q.get_mut(message.target)
        else {
            continue;
        };
        if loadout.has_damage_mitigation() {
            debug!(target = ?message.target, amount = message.amount, "damage mitigated");
            continue;
        }
        let amount = loadout.composed_modifiers().effective_damage(message.amount);
        if !health.apply_damage(amount) {
            continue;
        }

        // Cancel first so every suppressed invariant is restored, then drop
        // the queue: the entity is going away with its children.
        loadout.cancel_all(&mut pending.0);
        pending.0.clear();
        for (kind, attachment) in attachments.0.drain() {
            if kind == AttachmentKind::Bomb {
                commands.entity(attachment).despawn();
            }
        }
        info!(ship = ?message.target, team = ?team, "ship destroyed");
        destroyed.write(ShipDestroyed {
            entity: message.target,
            team: *team,
        });
        commands.entity(message.target).despawn();
        dead.insert(message.target);
    }
}

// ── Attachment bookkeeping ────────────────────────────────────────────────────

/// Tell loadouts about attachments that disappeared without a `Detach`
/// (contact-detonated bombs, external despawns).
pub fn attachment_watch_system(
    time: Res<Time>,
    q_live: Query<(), With<AttachedTo>>,
    mut q_ships: Query<(&mut Attachments, &mut Loadout, &mut PendingEffects), With<Ship>>,
) {
    let now = time.elapsed_secs_f64();
    for (mut attachments, mut loadout, mut pending) in q_ships.iter_mut() {
        let lost: Vec<AttachmentKind> = attachments
            .0
            .iter()
            .filter(|(_, entity)| !q_live.contains(**entity))
            .map(|(kind, _)| *kind)
            .collect();
        for kind in lost {
            attachments.0.remove(&kind);
            debug!(?kind, "attachment lost");
            loadout.attachment_lost(kind, now, &mut pending.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{reflect::Reflect, shield::Shield, trigger_bomb::TriggerBomb};
    use crate::ability::effect::BombSpec;
    use crate::ability::{AbilityKind, AbilitySlot, EffectBuffer, SlotInput};
    use crate::config::{ReflectConfig, ShieldConfig, ShipConfig, TriggerBombConfig};
    use crate::projectile::ProjectileSpec;
    use crate::ship::ship_bundle;
    use bevy::time::TimeUpdateStrategy;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
    use std::time::Duration;

    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CollisionEvent>();
        app.add_message::<DamageMessage>();
        app.add_message::<ShipDestroyed>();
        app.insert_resource(AbilityConfig::default());
        app
    }

    fn spawn_ship(app: &mut App, team: Team, position: Vec2, loadout: Loadout) -> Entity {
        app.world_mut()
            .spawn(ship_bundle(team, position, loadout, &ShipConfig::default()))
            .id()
    }

    /// Activate `slot` on a fresh loadout at t = 0.
    fn pressed(loadout: Loadout, slot: AbilitySlot) -> Loadout {
        let mut loadout = loadout;
        let mut input = AbilityInput::default();
        input.set(slot, SlotInput::PRESS);
        let ship = crate::abilities::test_support::ship();
        loadout.tick(0.0, 0.0, &ship, &input, &mut EffectBuffer::default());
        loadout
    }

    fn spawn_projectile(app: &mut App, target: Team, damage: f32) -> Entity {
        let spec = ProjectileSpec {
            position: Vec2::ZERO,
            direction: Vec2::Y,
            target,
            speed: 400.0,
            damage,
            lifetime: 2.0,
            impact: 100.0,
            radius: 4.0,
            pierce: None,
            slow: None,
        };
        app.world_mut()
            .spawn((
                Projectile::from_spec(&spec, None),
                Velocity::linear(spec.velocity()),
                Transform::default(),
            ))
            .id()
    }

    fn collide(app: &mut App, a: Entity, b: Entity) {
        app.world_mut()
            .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
    }

    fn health(app: &App, ship: Entity) -> ShipHealth {
        *app.world().get::<ShipHealth>(ship).unwrap()
    }

    #[test]
    fn segment_distance() {
        let a = Vec2::ZERO;
        let b = Vec2::new(0.0, 100.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 50.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(0.0, 110.0), a, b), 10.0);
        assert_eq!(distance_to_segment(Vec2::new(3.0, -4.0), a, b), 5.0);
    }

    #[test]
    fn projectile_hit_damages_and_despawns() {
        let mut app = build_test_app();
        app.add_systems(Update, (projectile_hit_system, ship_damage_system).chain());
        let ship = spawn_ship(&mut app, Team::Enemy, Vec2::ZERO, Loadout::default());
        let projectile = spawn_projectile(&mut app, Team::Enemy, 60.0);
        collide(&mut app, projectile, ship);
        app.update();

        let h = health(&app, ship);
        assert!(h.shield + h.hull < h.max_shield + h.max_hull);
        assert!(app.world().get_entity(projectile).is_err());
        assert!(app.world().get::<ExternalImpulse>(ship).unwrap().impulse.y > 0.0);
    }

    #[test]
    fn friendly_projectile_passes_through() {
        let mut app = build_test_app();
        app.add_systems(Update, (projectile_hit_system, ship_damage_system).chain());
        let ship = spawn_ship(&mut app, Team::Player, Vec2::ZERO, Loadout::default());
        let projectile = spawn_projectile(&mut app, Team::Enemy, 60.0);
        collide(&mut app, ship, projectile);
        app.update();

        assert_eq!(health(&app, ship), ShipHealth::new(ShipConfig::default().max_hull, ShipConfig::default().max_shield));
        assert!(app.world().get_entity(projectile).is_ok());
    }

    #[test]
    fn reflect_turns_projectile_around_without_damage() {
        let mut app = build_test_app();
        app.add_systems(Update, (projectile_hit_system, ship_damage_system).chain());
        let loadout = pressed(
            Loadout::default().with(AbilitySlot::Defense, Reflect::new(&ReflectConfig::default())),
            AbilitySlot::Defense,
        );
        let ship = spawn_ship(&mut app, Team::Player, Vec2::ZERO, loadout);
        let projectile = spawn_projectile(&mut app, Team::Player, 10.0);
        collide(&mut app, projectile, ship);
        app.update();

        let untouched = ShipHealth::new(ShipConfig::default().max_hull, ShipConfig::default().max_shield);
        assert_eq!(health(&app, ship), untouched);
        let p = app.world().get::<Projectile>(projectile).unwrap();
        assert_eq!(p.target, Team::Enemy);
        assert_eq!(p.shooter, Some(ship));
        assert!(app.world().get::<Velocity>(projectile).unwrap().linvel.y < 0.0);
    }

    #[test]
    fn shield_mitigates_all_damage() {
        let mut app = build_test_app();
        app.add_systems(Update, ship_damage_system);
        let loadout = pressed(
            Loadout::default().with(AbilitySlot::Defense, Shield::new(&ShieldConfig::default())),
            AbilitySlot::Defense,
        );
        let ship = spawn_ship(&mut app, Team::Player, Vec2::ZERO, loadout);
        app.world_mut().write_message(DamageMessage {
            target: ship,
            amount: 500.0,
            source: None,
        });
        app.update();

        assert!(!health(&app, ship).is_destroyed());
        assert_eq!(health(&app, ship).hull, ShipConfig::default().max_hull);
    }

    #[test]
    fn lethal_damage_despawns_and_reports() {
        let mut app = build_test_app();
        app.add_systems(Update, ship_damage_system);
        let ship = spawn_ship(&mut app, Team::Enemy, Vec2::ZERO, Loadout::default());
        for _ in 0..2 {
            app.world_mut().write_message(DamageMessage {
                target: ship,
                amount: 10_000.0,
                source: None,
            });
        }
        app.update();

        assert!(app.world().get_entity(ship).is_err());
        let destroyed = app.world().resource::<Messages<ShipDestroyed>>();
        assert_eq!(destroyed.len(), 1);
    }

    #[test]
    fn beam_hits_opponent_in_line_only() {
        let mut app = build_test_app();
        app.add_systems(Update, (beam_damage_system, ship_damage_system).chain());
        let owner = spawn_ship(&mut app, Team::Player, Vec2::ZERO, Loadout::default());
        app.world_mut().entity_mut(owner).insert(AimDirection(Vec2::X));
        let in_line = spawn_ship(&mut app, Team::Enemy, Vec2::new(200.0, 0.0), Loadout::default());
        let off_line = spawn_ship(&mut app, Team::Enemy, Vec2::new(0.0, 200.0), Loadout::default());
        app.world_mut().spawn(AttachedTo {
            owner,
            attachment: Attachment::Beam {
                length: 400.0,
                width: 10.0,
                damage_per_second: 1_000_000.0,
                target: Team::Enemy,
            },
        });
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        // The first frame has zero length; the second carries 100 ms.
        app.update();
        app.update();

        let untouched = ShipHealth::new(ShipConfig::default().max_hull, ShipConfig::default().max_shield);
        assert!(app.world().get_entity(in_line).is_err(), "beam target should be destroyed");
        assert_eq!(health(&app, off_line), untouched);
        assert_eq!(health(&app, owner), untouched);
    }

    #[test]
    fn bomb_contact_detonates_and_releases_ability() {
        let mut app = build_test_app();
        app.add_systems(
            Update,
            (projectile_hit_system, bomb_detonation_system, ship_damage_system, attachment_watch_system).chain(),
        );
        let loadout = pressed(
            Loadout::default().with(AbilitySlot::Special, TriggerBomb::new(&TriggerBombConfig::default())),
            AbilitySlot::Special,
        );
        assert!(loadout.is_active(AbilityKind::TriggerBomb));
        let owner = spawn_ship(&mut app, Team::Player, Vec2::ZERO, loadout);
        let victim = spawn_ship(&mut app, Team::Enemy, Vec2::new(0.0, 60.0), Loadout::default());
        let bomb = app
            .world_mut()
            .spawn((
                Bomb {
                    owner,
                    target: Team::Enemy,
                    blast_radius: 90.0,
                    damage: 45.0,
                    impact: 10.0,
                },
                AttachedTo {
                    owner,
                    attachment: Attachment::Bomb(BombSpec {
                        position: Vec2::new(0.0, 50.0),
                        velocity: Vec2::ZERO,
                        blast_radius: 90.0,
                        damage: 45.0,
                        impact: 10.0,
                        target: Team::Enemy,
                    }),
                },
                Transform::from_xyz(0.0, 50.0, 0.0),
            ))
            .id();
        app.world_mut()
            .get_mut::<Attachments>(owner)
            .unwrap()
            .0
            .insert(AttachmentKind::Bomb, bomb);

        collide(&mut app, victim, bomb);
        app.update();

        assert!(app.world().get_entity(bomb).is_err());
        assert!(health(&app, victim).shield < ShipConfig::default().max_shield);
        app.update();
        let owner_loadout = app.world().get::<Loadout>(owner).unwrap();
        assert!(!owner_loadout.is_active(AbilityKind::TriggerBomb));
    }

    #[test]
    fn expired_hazard_is_removed() {
        let mut app = build_test_app();
        app.add_systems(Update, hazard_damage_system);
        let hazard = app
            .world_mut()
            .spawn((
                Hazard {
                    target: Team::Enemy,
                    radius: 10.0,
                    damage_per_second: 5.0,
                    remaining: 0.0,
                },
                Transform::default(),
            ))
            .id();
        app.update();
        assert!(app.world().get_entity(hazard).is_err());
    }

    #[test]
    fn intangible_ship_ignores_beam_hazard_and_blast() {
        let mut app = build_test_app();
        app.add_systems(
            Update,
            (beam_damage_system, hazard_damage_system, bomb_detonation_system, ship_damage_system).chain(),
        );
        let owner = spawn_ship(&mut app, Team::Player, Vec2::ZERO, Loadout::default());
        app.world_mut().entity_mut(owner).insert(AimDirection(Vec2::X));
        let warping = spawn_ship(&mut app, Team::Enemy, Vec2::new(200.0, 0.0), Loadout::default());
        app.world_mut().entity_mut(warping).insert(ColliderDisabled);
        let solid = spawn_ship(&mut app, Team::Enemy, Vec2::new(200.0, 3.0), Loadout::default());

        app.world_mut().spawn(AttachedTo {
            owner,
            attachment: Attachment::Beam {
                length: 400.0,
                width: 10.0,
                damage_per_second: 20.0,
                target: Team::Enemy,
            },
        });
        app.world_mut().spawn((
            Hazard {
                target: Team::Enemy,
                radius: 20.0,
                damage_per_second: 20.0,
                remaining: 5.0,
            },
            Transform::from_xyz(200.0, 0.0, 0.0),
        ));
        app.world_mut().spawn((
            Bomb {
                owner,
                target: Team::Enemy,
                blast_radius: 50.0,
                damage: 5.0,
                impact: 10.0,
            },
            Detonating,
            Transform::from_xyz(200.0, 0.0, 0.0),
        ));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.update();
        app.update();

        let untouched = ShipHealth::new(ShipConfig::default().max_hull, ShipConfig::default().max_shield);
        assert_eq!(health(&app, warping), untouched);
        assert_eq!(app.world().get::<ExternalImpulse>(warping).unwrap().impulse, Vec2::ZERO);
        assert!(health(&app, solid).shield < untouched.shield, "control ship is hit");
    }
}
