//! # Room Desk Reservation
//!
//! State manager for a multi-room hotel reservation form. The operator picks a
//! date range, the form loads per-room-type availability for it, and every
//! room row the operator adds draws from that shared pool. No combination of
//! rows can ask for more rooms of a type than the pool holds.
//!
//! ## Components
//!
//! - [`catalog`]: the property's room types, in display order
//! - [`types`]: date range, availability pool, selection rows, form state and actions
//! - [`allocation`]: what each row may offer, with its own choice exempted
//! - [`reducer`]: the form controller, as a reducer over [`FormState`]
//! - [`view`]: everything a renderer needs, derived from state
//! - [`api`]: the reservation server seam and an in-memory implementation
//!
//! ## Example
//!
//! ```ignore
//! let env = FormEnvironment::new(Arc::new(SystemClock), Arc::new(client), Arc::new(catalog));
//! let store = Store::new(FormState::default(), FormReducer::new(), env);
//!
//! store.send(FormAction::SetCheckIn(Some(check_in))).await?;
//! store.send(FormAction::SetCheckOut(Some(check_out))).await?;
//! store.send(FormAction::CheckAvailability).await?.wait().await;
//! store.send(FormAction::AddRoom).await?;
//! ```

pub mod allocation;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod reducer;
pub mod types;
pub mod view;

pub use allocation::{AllocationEngine, GuestOptions, RoomOffer};
pub use api::{InMemoryReservationApi, ReservationApi};
pub use catalog::{AvailabilityCatalog, RoomType};
pub use config::Config;
pub use error::{ConfigError, FormError};
pub use reducer::{FormEnvironment, FormReducer};
pub use types::{
    AvailabilityPool, DateRange, FormAction, FormState, GuestDetails, RequestStatus,
    RoomSelection, SelectionSet, SessionPhase,
};
pub use view::FormView;
