//! Descriptions of asynchronous work

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Work a reducer asks the runtime to do
///
/// An effect is inert until a runtime runs it. A `Future` resolving to
/// `Some(action)` feeds that action back through the reducer.
pub enum Effect<Action> {
    /// Nothing to do
    None,

    /// Run all at once
    Parallel(Vec<Effect<Action>>),

    /// Run one after the other, each finishing before the next starts
    Sequential(Vec<Effect<Action>>),

    /// A request whose result may become the next action
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
}

impl<Action: fmt::Debug> fmt::Debug for Effect<Action> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("Effect::None"),
            Self::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Self::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
            Self::Future(_) => f.write_str("Effect::Future(<future>)"),
        }
    }
}

impl<Action> Effect<Action> {
    /// `effects` run concurrently
    #[must_use]
    pub const fn merge(effects: Vec<Self>) -> Self {
        Self::Parallel(effects)
    }

    /// `effects` run in order
    #[must_use]
    pub const fn chain(effects: Vec<Self>) -> Self {
        Self::Sequential(effects)
    }

    /// True when running this effect would do nothing
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::None => true,
            Self::Parallel(effects) | Self::Sequential(effects) => effects.iter().all(Self::is_noop),
            Self::Future(_) => false,
        }
    }
}
