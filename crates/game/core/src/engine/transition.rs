//! Action transition dispatch.

use tracing::debug;

use crate::action::{Action, ActionContext, ActionResult, ActionTransition};
use crate::state::World;

use super::errors::{EngineError, TransitionPhase};

/// Runs one transition through its three phases.
///
/// 1. `pre_validate` - check preconditions before mutation
/// 2. `apply` - mutate the world and produce the result
/// 3. `post_validate` - verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    world: &mut World,
    ctx: &mut ActionContext<'_>,
) -> Result<T::Result, EngineError>
where
    T: ActionTransition,
    EngineError: From<T::Error>,
{
    let fail = |phase: TransitionPhase, error: T::Error| {
        let error = EngineError::from(error);
        debug!(actor = %transition.actor(), phase = phase.as_str(), %error, "transition failed");
        error
    };

    transition
        .pre_validate(world, ctx)
        .map_err(|error| fail(TransitionPhase::PreValidate, error))?;
    let result = transition
        .apply(world, ctx)
        .map_err(|error| fail(TransitionPhase::Apply, error))?;
    transition
        .post_validate(world, ctx)
        .map_err(|error| fail(TransitionPhase::PostValidate, error))?;
    Ok(result)
}

/// Routes an action to its transition and wraps the result.
pub(super) fn execute_transition(
    action: &Action,
    world: &mut World,
    ctx: &mut ActionContext<'_>,
) -> Result<ActionResult, EngineError> {
    match action {
        Action::Move(transition) => drive_transition(transition, world, ctx).map(ActionResult::Move),
        Action::Attack(transition) => {
            drive_transition(transition, world, ctx).map(ActionResult::Attack)
        }
        Action::Cast(transition) => drive_transition(transition, world, ctx).map(ActionResult::Cast),
        Action::Summon(transition) => {
            drive_transition(transition, world, ctx).map(ActionResult::Summon)
        }
    }
}
