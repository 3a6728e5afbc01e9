//! The [`Reducer`] trait

use crate::effect::Effect;
use smallvec::SmallVec;

/// Effects returned by one reduction
///
/// A form transition starts at most one request, so four inline slots never spill.
pub type Effects<A> = SmallVec<[Effect<A>; 4]>;

/// Applies one action to state and describes the work that follows
///
/// Implementations mutate `state` in place and never perform I/O themselves:
/// anything asynchronous comes back as an [`Effect`] for the runtime to run.
pub trait Reducer {
    /// What the reducer owns
    type State;

    /// Operator intents and request outcomes alike
    type Action;

    /// Injected services (clock, server access, reference data)
    type Environment;

    /// Apply `action` to `state`
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action>;
}
