//! # Room Desk Runtime
//!
//! The [`Store`] that drives a reservation form: it owns the state, applies
//! actions through the reducer, spawns the requests the reducer describes, and
//! feeds each request's outcome back as another action.
//!
//! ```ignore
//! let store = Store::new(FormState::default(), FormReducer::new(), environment);
//!
//! let mut handle = store.send(FormAction::CheckAvailability).await?;
//! handle.wait().await;
//!
//! let rows = store.state(|s| s.selections.len()).await;
//! ```

pub mod error;
mod handle;
mod store;

pub use error::StoreError;
pub use handle::EffectHandle;
pub use store::Store;
