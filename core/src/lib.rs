//! # Room Desk Core
//!
//! The reservation form is a state machine. Its inputs are operator actions
//! (pick dates, add a room, submit) and the outcomes of the requests it
//! starts. A [`Reducer`](reducer::Reducer) turns each input into a state change
//! plus [`Effect`](effect::Effect)s describing any request to start; a runtime
//! runs those effects and feeds their results back as new actions.
//!
//! ```ignore
//! impl Reducer for FormReducer {
//!     type State = FormState;
//!     type Action = FormAction;
//!     type Environment = FormEnvironment;
//!
//!     fn reduce(&self, state: &mut FormState, action: FormAction, env: &FormEnvironment)
//!         -> Effects<FormAction>
//!     {
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

pub mod effect;
mod effect_macros;
pub mod environment;
pub mod reducer;
