//! Ability framework for a 2D arena space-combat game.
//!
//! The pure core lives in [`ability`] (activation, cooldowns, heat, charge
//! tiers, sequences, modifiers, exclusion) and [`abilities`] (the concrete
//! ability set).  [`ship`] and [`simulation`] connect it to Bevy and Rapier.

pub mod abilities;
pub mod ability;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod projectile;
pub mod ship;
pub mod simulation;
