//! The [`Ability`] contract and the per-ship [`Loadout`] that ticks abilities
//! in a fixed order.
//!
//! ## Per-tick order (one ship)
//!
//! For each ability, in loadout order:
//! 0. promote `Activating` → `Active` once its pre-delay has passed
//! 1. `advance`: heat, timers, charge tiers, sequences, forced transitions
//! 2. `handle_input`: guarded activation / release / follow-up presses
//!
//! Each ability sees the exclusion groups occupied by the *other* abilities as
//! they stand at that moment, so two conflicting abilities pressed on the same
//! tick resolve in loadout order.  After the loop the movement system reads
//! [`Loadout::composed_modifiers`].
//!
//! A fault in one ability (`Err` from `advance` / `handle_input`) is logged,
//! that ability is cancelled (restoring whatever it suppressed), and the loop
//! moves on.

use super::activation::AbilityCore;
use super::effect::{AttachmentKind, EffectBuffer};
use super::exclusion::{ExclusionGroup, ExclusionView};
use super::input::{AbilityInput, AbilitySlot, SlotInput};
use super::modifier::{ModifierStack, Modifiers};
use super::AbilityKind;
use crate::error::{AbilityError, AbilityResult};
use crate::projectile::{Projectile, Team};
use bevy::prelude::*;

/// Read-only snapshot of the owning ship, taken before the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipContext {
    pub position: Vec2,
    /// Unit vector along the ship's nose.
    pub forward: Vec2,
    /// Unit aim direction (mouse / stick / AI target).
    pub aim: Vec2,
    pub velocity: Vec2,
    pub team: Team,
    pub has_shield_emitter: bool,
    /// Radius of the playable arena, centred on the origin.
    pub arena_radius: f32,
}

impl ShipContext {
    /// Aim if set, otherwise the nose direction.
    pub fn aim_or_forward(&self) -> Vec2 {
        if self.aim.length_squared() > 1e-4 {
            self.aim.normalize_or_zero()
        } else {
            self.forward.normalize_or_zero()
        }
    }
}

/// Everything an ability may read or write during its tick.
pub struct TickContext<'a> {
    pub now: f64,
    pub dt: f32,
    pub ship: &'a ShipContext,
    pub input: SlotInput,
    /// Groups held by the other abilities on this ship.
    pub exclusion: ExclusionView,
    pub effects: &'a mut EffectBuffer,
}

/// Result of offering an incoming projectile to an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Default hit resolution applies.
    Unhandled,
    /// The projectile was turned around; it must not damage this ship.
    Reflected,
}

/// Shared activation contract.
pub trait Ability: Send + Sync + 'static {
    fn core(&self) -> &AbilityCore;

    fn core_mut(&mut self) -> &mut AbilityCore;

    fn kind(&self) -> AbilityKind {
        self.core().kind()
    }

    /// Advance clocks and resources, and apply forced transitions (duration
    /// over, overheat, overcharge, sequence end).
    fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()>;

    /// React to this tick's slot input.
    fn handle_input(&mut self, ctx: &mut TickContext) -> AbilityResult<()>;

    /// Multipliers this ability contributes right now.  Identity when idle.
    fn modifiers(&self) -> Modifiers {
        Modifiers::IDENTITY
    }

    /// While `true`, incoming damage events are discarded whole.
    fn has_damage_mitigation(&self) -> bool {
        false
    }

    /// While `true`, projectile hits are routed to [`Ability::process_collision`].
    fn has_collision_modification(&self) -> bool {
        false
    }

    fn process_collision(
        &mut self,
        _projectile: &mut Projectile,
        _effects: &mut EffectBuffer,
    ) -> CollisionOutcome {
        CollisionOutcome::Unhandled
    }

    /// The world object behind an attachment disappeared on its own (bomb
    /// hit something, entity despawned).
    fn attachment_lost(&mut self, _kind: AttachmentKind, _now: f64, _effects: &mut EffectBuffer) {}

    /// Force back to Idle, releasing attachments and restoring every
    /// suppressed invariant.  Used on death and after a fault.
    fn cancel(&mut self, effects: &mut EffectBuffer);
}

pub struct LoadoutEntry {
    pub slot: AbilitySlot,
    pub ability: Box<dyn Ability>,
}

/// A ship's abilities, ticked in insertion order.
#[derive(Component, Default)]
pub struct Loadout {
    entries: Vec<LoadoutEntry>,
}

impl Loadout {
    pub fn with(mut self, slot: AbilitySlot, ability: impl Ability) -> Self {
        self.push(slot, ability);
        self
    }

    pub fn push(&mut self, slot: AbilitySlot, ability: impl Ability) {
        self.entries.push(LoadoutEntry {
            slot,
            ability: Box::new(ability),
        });
    }

    pub fn push_boxed(&mut self, slot: AbilitySlot, ability: Box<dyn Ability>) {
        self.entries.push(LoadoutEntry { slot, ability });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadoutEntry> {
        self.entries.iter()
    }

    pub fn ability(&self, kind: AbilityKind) -> Option<&dyn Ability> {
        self.entries
            .iter()
            .find(|e| e.ability.kind() == kind)
            .map(|e| e.ability.as_ref())
    }

    pub fn is_active(&self, kind: AbilityKind) -> bool {
        self.ability(kind).is_some_and(|a| a.core().is_engaged())
    }

    /// "Is group G occupied": by any engaged ability on this ship.
    pub fn is_group_occupied(&self, group: ExclusionGroup) -> bool {
        self.exclusion_view(None).is_occupied(group)
    }

    /// Groups occupied by every engaged ability except `skip`.
    fn exclusion_view(&self, skip: Option<usize>) -> ExclusionView {
        let mut view = ExclusionView::default();
        for (i, entry) in self.entries.iter().enumerate() {
            if Some(i) == skip {
                continue;
            }
            let core = entry.ability.core();
            if let (true, Some(group)) = (core.is_engaged(), core.exclusion()) {
                view.occupy(group);
            }
        }
        view
    }

    /// Advance every ability by one tick.
    pub fn tick(
        &mut self,
        now: f64,
        dt: f32,
        ship: &ShipContext,
        input: &AbilityInput,
        effects: &mut EffectBuffer,
    ) {
        for i in 0..self.entries.len() {
            let exclusion = self.exclusion_view(Some(i));
            let entry = &mut self.entries[i];
            let mut ctx = TickContext {
                now,
                dt,
                ship,
                input: input.get(entry.slot),
                exclusion,
                effects,
            };
            let result = if dt.is_finite() {
                if entry.ability.core_mut().advance_activation(now) {
                    debug!(ability = ?entry.ability.kind(), "pre-delay over; active");
                }
                entry
                    .ability
                    .advance(&mut ctx)
                    .and_then(|()| entry.ability.handle_input(&mut ctx))
            } else {
                Err(AbilityError::NonFiniteTimeStep {
                    ability: entry.ability.kind(),
                    dt,
                })
            };
            if let Err(err) = result {
                warn!(ability = ?entry.ability.kind(), %err, "ability fault; cancelling");
                entry.ability.cancel(effects);
            }
        }
    }

    /// Product of every ability's contribution.
    pub fn composed_modifiers(&self) -> Modifiers {
        self.modifier_stack().composed()
    }

    /// Per-source contributions; identity entries are skipped.
    pub fn modifier_stack(&self) -> ModifierStack {
        let mut stack = ModifierStack::default();
        for entry in &self.entries {
            stack.push(entry.ability.kind(), entry.ability.modifiers());
        }
        stack
    }

    pub fn has_damage_mitigation(&self) -> bool {
        self.entries.iter().any(|e| e.ability.has_damage_mitigation())
    }

    pub fn has_collision_modification(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.ability.has_collision_modification())
    }

    /// Offer a projectile to the first ability that modifies collisions.
    pub fn process_collision(
        &mut self,
        projectile: &mut Projectile,
        effects: &mut EffectBuffer,
    ) -> CollisionOutcome {
        for entry in &mut self.entries {
            if entry.ability.has_collision_modification() {
                let outcome = entry.ability.process_collision(projectile, effects);
                if outcome != CollisionOutcome::Unhandled {
                    return outcome;
                }
            }
        }
        CollisionOutcome::Unhandled
    }

    pub fn attachment_lost(&mut self, kind: AttachmentKind, now: f64, effects: &mut EffectBuffer) {
        for entry in &mut self.entries {
            entry.ability.attachment_lost(kind, now, effects);
        }
    }

    /// Cancel everything (ship death / despawn).
    pub fn cancel_all(&mut self, effects: &mut EffectBuffer) {
        for entry in &mut self.entries {
            entry.ability.cancel(effects);
        }
    }
}
