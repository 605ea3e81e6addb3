//! World arena errors.
//!
//! Errors related to unit creation, lookups and modifier bookkeeping.

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::grid::{GridError, Position, TerrainKind};
use crate::state::{PlayerId, UnitId};

/// Errors raised while adding units or players to the world.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// Player slot does not exist.
    #[error("player {player} does not exist")]
    PlayerNotFound { player: PlayerId },

    /// Unit handle does not refer to a living unit.
    #[error("unit {unit} does not exist")]
    UnitNotFound { unit: UnitId },

    /// Player list is full.
    #[error("player list is full (max: {max})")]
    TooManyPlayers { max: usize },

    /// Template cannot stand on the tile's terrain.
    #[error("{terrain} at {position} is not valid terrain for this unit")]
    TerrainNotAllowed {
        position: Position,
        terrain: TerrainKind,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PlayerNotFound { .. } | Self::UnitNotFound { .. } | Self::TooManyPlayers { .. } => {
                ErrorSeverity::Fatal
            }
            Self::TerrainNotAllowed { .. } => ErrorSeverity::Rejected,
            Self::Grid(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::UnitNotFound { unit } => Some(ErrorContext::new().with_unit(*unit)),
            Self::TerrainNotAllowed { position, .. } => {
                Some(ErrorContext::new().with_position(*position))
            }
            Self::Grid(err) => err.context(),
            Self::PlayerNotFound { .. } | Self::TooManyPlayers { .. } => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PlayerNotFound { .. } => "STATE_PLAYER_NOT_FOUND",
            Self::UnitNotFound { .. } => "STATE_UNIT_NOT_FOUND",
            Self::TooManyPlayers { .. } => "STATE_TOO_MANY_PLAYERS",
            Self::TerrainNotAllowed { .. } => "STATE_TERRAIN_NOT_ALLOWED",
            Self::Grid(err) => err.error_code(),
        }
    }
}

/// Errors raised while attaching or ticking modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierError {
    #[error("modifier target {unit} does not exist")]
    TargetNotFound { unit: UnitId },

    #[error("modifier source {unit} does not exist")]
    SourceNotFound { unit: UnitId },

    /// The target already carries the maximum number of modifiers.
    #[error("{unit} cannot carry more than {max} modifiers")]
    StackFull { unit: UnitId, max: usize },
}

impl GameError for ModifierError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TargetNotFound { .. } | Self::SourceNotFound { .. } => ErrorSeverity::Fatal,
            Self::StackFull { .. } => ErrorSeverity::Rejected,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::TargetNotFound { unit }
            | Self::SourceNotFound { unit }
            | Self::StackFull { unit, .. } => Some(ErrorContext::new().with_unit(*unit)),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TargetNotFound { .. } => "MODIFIER_TARGET_NOT_FOUND",
            Self::SourceNotFound { .. } => "MODIFIER_SOURCE_NOT_FOUND",
            Self::StackFull { .. } => "MODIFIER_STACK_FULL",
        }
    }
}
