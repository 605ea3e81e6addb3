use crate::config::GameConfig;
use crate::rng::RngOracle;
use crate::state::{UnitId, World};

/// Rules and randomness available to a transition.
pub struct ActionContext<'a> {
    pub config: &'a GameConfig,
    pub rng: &'a mut dyn RngOracle,
}

impl<'a> ActionContext<'a> {
    pub fn new(config: &'a GameConfig, rng: &'a mut dyn RngOracle) -> Self {
        Self { config, rng }
    }
}

/// Defines how a concrete action mutates the world.
///
/// The engine drives every action through `pre_validate`, `apply` and
/// `post_validate`. Validation hooks get read-only access and must stay
/// side-effect free; `apply` may assume `pre_validate` succeeded and must
/// not fail after it has started mutating.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Unit performing the action.
    fn actor(&self) -> UnitId;

    /// Validates pre-conditions using the world **before** mutation.
    fn pre_validate(&self, _world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the world directly.
    fn apply(
        &self,
        world: &mut World,
        ctx: &mut ActionContext<'_>,
    ) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the world **after** mutation.
    fn post_validate(&self, _world: &World, _ctx: &ActionContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}
