//! # Room Desk Testing
//!
//! Helpers for testing reducers without a runtime: a pinned [`Clock`](room_desk_core::environment::Clock)
//! and a Given-When-Then harness that reduces actions in sequence and checks
//! the resulting state and effects.
//!
//! ```ignore
//! ReducerTest::new(FormReducer::new())
//!     .with_env(test_environment())
//!     .given_state(FormState::default())
//!     .when_action(FormAction::AddRoom)
//!     .then_state(|state| assert_eq!(state.selections.len(), 1))
//!     .run();
//! ```

mod clock;

pub use clock::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
