//! Error types surfaced by the engine façade.

use crate::action::{AbilityError, SummonError};
use crate::combat::CombatError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::movement::MovementError;
use crate::state::{ModifierError, PlayerId, StateError, UnitId};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Errors surfaced while querying or mutating through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("move failed: {0}")]
    Movement(#[from] MovementError),

    #[error("attack failed: {0}")]
    Combat(#[from] CombatError),

    #[error("cast failed: {0}")]
    Ability(#[from] AbilityError),

    #[error("summon failed: {0}")]
    Summon(#[from] SummonError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

impl EngineError {
    fn inner(&self) -> Option<&dyn GameError> {
        match self {
            Self::UnitNotFound(_) | Self::PlayerNotFound(_) => None,
            Self::Movement(err) => Some(err),
            Self::Combat(err) => Some(err),
            Self::Ability(err) => Some(err),
            Self::Summon(err) => Some(err),
            Self::State(err) => Some(err),
            Self::Modifier(err) => Some(err),
        }
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        self.inner()
            .map_or(ErrorSeverity::Fatal, |err| err.severity())
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::UnitNotFound(unit) => Some(ErrorContext::new().with_unit(*unit)),
            Self::PlayerNotFound(_) => None,
            _ => self.inner().and_then(|err| err.context()),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "ENGINE_UNIT_NOT_FOUND",
            Self::PlayerNotFound(_) => "ENGINE_PLAYER_NOT_FOUND",
            _ => self.inner().map_or("ENGINE_UNKNOWN", |err| err.error_code()),
        }
    }
}
