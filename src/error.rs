//! Ability-framework error types.
//!
//! Three families, each handled differently by callers:
//!
//! - [`GuardFailure`]: an activation request was refused (cooldown pending,
//!   overheated, exclusion group occupied, precondition unmet).  Never fatal;
//!   the request is dropped and optionally logged at `debug`.
//! - [`ConfigError`]: a tuning value is out of range.  Rejected when
//!   `assets/abilities.toml` is loaded; an ability built from a bad config
//!   refuses every activation instead of crashing.
//! - [`AbilityError`]: a runtime fault inside one ability's tick.  The loadout
//!   logs it, cancels that ability and keeps ticking the others.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::error::{AbilityError, AbilityResult};
//!
//! fn advance(&mut self, ctx: &mut TickContext) -> AbilityResult<()> {
//!     let session = self.session.as_ref().ok_or(AbilityError::MissingSession {
//!         ability: AbilityKind::GigaBlast,
//!     })?;
//!     Ok(())
//! }
//! ```

use crate::ability::exclusion::ExclusionGroup;
use crate::ability::AbilityKind;
use thiserror::Error;

/// Reason an Idle → Active transition was refused.
///
/// Guards are evaluated in declaration order; the first failing one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GuardFailure {
    /// The ability was built from a configuration that failed validation.
    #[error("ability configuration is invalid; activation disabled")]
    InvalidConfiguration,

    /// The cooldown gate is still closed.
    #[error("cooldown pending: {remaining:.2}s remaining")]
    CooldownPending {
        /// Seconds until the gate reopens.
        remaining: f32,
    },

    /// The heat resource sits at its ceiling.
    #[error("overheated")]
    Overheated,

    /// Another ability in the same exclusion group is active.
    #[error("exclusion group {group:?} is occupied")]
    Excluded {
        /// Group that blocked the request.
        group: ExclusionGroup,
    },

    /// An ability-specific requirement is not met.
    #[error("precondition unmet: {0}")]
    PreconditionUnmet(&'static str),
}

/// A tuning value rejected at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero, negative or NaN.
    #[error("{section}.{field} = {value} must be > 0")]
    NotPositive {
        section: &'static str,
        field: &'static str,
        value: f32,
    },

    /// A value that must be non-negative was negative or NaN.
    #[error("{section}.{field} = {value} must be >= 0")]
    Negative {
        section: &'static str,
        field: &'static str,
        value: f32,
    },

    /// Charge thresholds are not ordered `t1 <= t2 <= t3 <= t4`.
    #[error("{section}: charge thresholds {thresholds:?} must be non-decreasing")]
    UnorderedThresholds {
        section: &'static str,
        thresholds: [f32; 4],
    },

    /// `min_charge_time` exceeds `max_charge_time`.
    #[error("{section}: min_charge_time {min} exceeds max_charge_time {max}")]
    ChargeWindow {
        section: &'static str,
        min: f32,
        max: f32,
    },

    /// `assets/abilities.toml` could not be parsed.
    #[error("failed to parse ability config: {0}")]
    Parse(String),
}

/// Runtime fault raised by a single ability during its tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbilityError {
    /// The ability believed it was charging but held no charge session.
    #[error("{ability:?} is charging without a charge session")]
    MissingSession { ability: AbilityKind },

    /// The ability believed a sequence was running but none was present.
    #[error("{ability:?} is active without a running sequence")]
    MissingSequence { ability: AbilityKind },

    /// A non-finite value (NaN / inf) reached the ability's clock.
    #[error("{ability:?} received a non-finite time step ({dt})")]
    NonFiniteTimeStep { ability: AbilityKind, dt: f32 },
}

/// Convenience alias: a `Result` using [`AbilityError`] as the error type.
pub type AbilityResult<T> = Result<T, AbilityError>;

/// Convenience alias for load-time validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(section: &'static str, field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            section,
            field,
            value,
        })
    }
}

/// Returns an error unless `value` is finite and `>= 0`.
pub fn require_non_negative(
    section: &'static str,
    field: &'static str,
    value: f32,
) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative {
            section,
            field,
            value,
        })
    }
}
