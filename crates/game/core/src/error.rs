//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (e.g., `MovementError`, `CombatError`) live next to
//! the operations that produce them. This module holds what they share: a
//! severity tier, a context record, and the [`GameError`] trait.
//!
//! # Error Tiers
//!
//! - **Rejected**: the Controller offered an action that the rules refuse
//!   (not enough mana, destination outside the movement cloud, ...). The
//!   engine has not mutated anything and the caller may pick another action.
//! - **Fatal**: an invariant was violated (double-processed combat, acting
//!   with zero actions, ...). The Controller should never have offered the
//!   action; the engine surfaces it immediately and does not recover.

use crate::grid::Position;
use crate::state::UnitId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected input rejection. Nothing was mutated.
    ///
    /// Examples: insufficient mana, occupied destination
    Rejected,

    /// Programmer or invariant error.
    ///
    /// Examples: combat processed twice, path requested without a movement cloud
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if the caller may continue with another action.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Returns true if this error indicates a controller or engine bug.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Unit that triggered the error (if applicable).
    pub unit: Option<UnitId>,

    /// Tile where the error occurred (if applicable).
    pub position: Option<Position>,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unit: None,
            position: None,
            message: None,
        }
    }

    /// Attaches a unit to this context (builder pattern).
    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Attaches a position to this context (builder pattern).
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by who is at fault: the player (Rejected) or the
///   controller/engine (Fatal)
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics and tests. Default implementation uses the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
