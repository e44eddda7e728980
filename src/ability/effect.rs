//! Side effects requested by abilities.
//!
//! Abilities stay ECS-free: they push [`AbilityEffect`]s into an
//! [`EffectBuffer`] and `ship::effects::apply_ability_effects_system` turns
//! them into `Commands`, physics writes and messages.  An attachment created
//! with [`AbilityEffect::Attach`] lives until the matching
//! [`AbilityEffect::Detach`] (or until the ship dies).

use super::charge::ChargeTier;
use super::AbilityKind;
use crate::projectile::{ProjectileSpec, Team};
use bevy::math::Vec2;

/// World objects an ability owns for the length of its Active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Beam,
    FireTrailEmitter,
    TractorCone,
    ShieldBubble,
    ReflectField,
    ChargeGlow,
    Bomb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombSpec {
    pub position: Vec2,
    pub velocity: Vec2,
    pub blast_radius: f32,
    pub damage: f32,
    pub impact: f32,
    pub target: Team,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attachment {
    Beam {
        length: f32,
        width: f32,
        damage_per_second: f32,
        target: Team,
    },
    FireTrailEmitter,
    TractorCone {
        range: f32,
    },
    ShieldBubble {
        radius: f32,
    },
    ReflectField {
        radius: f32,
    },
    ChargeGlow {
        tier: ChargeTier,
    },
    Bomb(BombSpec),
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Beam { .. } => AttachmentKind::Beam,
            Attachment::FireTrailEmitter => AttachmentKind::FireTrailEmitter,
            Attachment::TractorCone { .. } => AttachmentKind::TractorCone,
            Attachment::ShieldBubble { .. } => AttachmentKind::ShieldBubble,
            Attachment::ReflectField { .. } => AttachmentKind::ReflectField,
            Attachment::ChargeGlow { .. } => AttachmentKind::ChargeGlow,
            Attachment::Bomb(_) => AttachmentKind::Bomb,
        }
    }
}

/// A damaging area left behind in the world (fire trail segments).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardSpec {
    pub position: Vec2,
    pub radius: f32,
    pub damage_per_second: f32,
    pub lifetime: f32,
    pub target: Team,
}

/// Fire-and-forget audio/visual hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Activated,
    Deactivated,
    Overheated,
    ChargeTier(ChargeTier),
    Fired,
    Fizzled,
    WarpOut,
    WarpIn,
    Detonated,
    Reflected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    Attach(Attachment),
    Detach(AttachmentKind),
    SpawnProjectile(ProjectileSpec),
    DropHazard(HazardSpec),
    /// Instant velocity change on the owning ship (recoil, dash kick).
    Impulse(Vec2),
    SetLinearVelocity(Vec2),
    SetCollision(bool),
    SetVisible(bool),
    SetScale(Vec2),
    /// Teleport the owner; the camera is told about the discontinuity.
    Warp {
        to: Vec2,
    },
    DetonateBomb,
    Cue(AbilityKind, CueKind),
}

/// Per-ship effect queue, drained once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectBuffer {
    effects: Vec<AbilityEffect>,
}

impl EffectBuffer {
    #[inline]
    pub fn push(&mut self, effect: AbilityEffect) {
        self.effects.push(effect);
    }

    #[inline]
    pub fn cue(&mut self, ability: AbilityKind, cue: CueKind) {
        self.effects.push(AbilityEffect::Cue(ability, cue));
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, AbilityEffect> {
        self.effects.drain(..)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AbilityEffect> {
        self.effects.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
