//! Errors returned by the [`Store`](crate::Store)

use thiserror::Error;

/// Why the store refused or gave up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `send` after `shutdown` began
    #[error("Store is closed to new actions")]
    ShutdownInProgress,

    /// `shutdown` gave up with requests still running
    #[error("Shutdown gave up with {0} effect(s) still running")]
    ShutdownTimeout(usize),

    /// An [`EffectHandle`](crate::EffectHandle) wait ran out of time
    #[error("Effects did not finish in time")]
    Timeout,
}
