//! Reducer for the reservation form
//!
//! Every operator action is validated against current state first; a failed
//! validation records the message and changes nothing else. Network calls
//! leave as effects and come back as outcome actions.

use crate::allocation::AllocationEngine;
use crate::api::ReservationApi;
use crate::catalog::AvailabilityCatalog;
use crate::error::FormError;
use crate::types::{
    AvailabilityPool, DateRange, FormAction, FormState, RequestStatus, SessionPhase,
};
use room_desk_client::{AvailabilityQuery, ReservationRequest, RoomTypeId};
use room_desk_core::reducer::{Effects, Reducer};
use room_desk_core::{SmallVec, async_effect, environment::Clock, smallvec};
use std::sync::Arc;

/// Fallback message when an availability lookup fails without a server message
pub const AVAILABILITY_FAILED: &str = "Failed to check availability";

/// Fallback message when a reservation fails without a server message
pub const RESERVATION_FAILED: &str = "Failed to create reservation";

/// Notice shown once the server accepted the reservation
pub const RESERVATION_CREATED: &str = "Reservation created successfully!";

/// Environment dependencies for the form reducer
#[derive(Clone)]
pub struct FormEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Reservation server
    pub api: Arc<dyn ReservationApi>,
    /// Room types of the property
    pub catalog: Arc<AvailabilityCatalog>,
}

impl FormEnvironment {
    /// Creates a new `FormEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        api: Arc<dyn ReservationApi>,
        catalog: Arc<AvailabilityCatalog>,
    ) -> Self {
        Self {
            clock,
            api,
            catalog,
        }
    }
}

/// Reducer for the reservation form
#[derive(Clone, Debug, Default)]
pub struct FormReducer;

impl FormReducer {
    /// Creates a new `FormReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn engine<'a>(state: &'a FormState, env: &'a FormEnvironment) -> AllocationEngine<'a> {
        AllocationEngine::new(&env.catalog, state.pool.as_ref(), &state.selections)
    }

    /// Row edits wait for a running availability check to finish
    fn ensure_rows_editable(state: &FormState) -> Result<(), FormError> {
        if state.availability_request.is_in_flight() {
            return Err(FormError::AvailabilityCheckInFlight);
        }
        Ok(())
    }

    /// Validates a `CheckAvailability` action, returning the range to query
    fn validate_check_availability(state: &FormState) -> Result<DateRange, FormError> {
        if state.availability_request.is_in_flight() {
            return Err(FormError::AvailabilityCheckInFlight);
        }
        if state.submission.is_in_flight() {
            return Err(FormError::SubmissionInFlight);
        }
        DateRange::from_inputs(state.check_in, state.check_out)
    }

    /// Validates an `AddRoom` action
    fn validate_add_room(state: &FormState, env: &FormEnvironment) -> Result<(), FormError> {
        Self::ensure_rows_editable(state)?;
        if state.pool.is_none() {
            return Err(FormError::AvailabilityNotLoaded);
        }
        if !Self::engine(state, env).has_bookable_rooms() {
            return Err(FormError::NoRoomsAvailable);
        }
        Ok(())
    }

    /// Validates a `ChangeRoomType` action
    fn validate_change_room_type(
        state: &FormState,
        env: &FormEnvironment,
        row: usize,
        room_type_id: Option<&RoomTypeId>,
    ) -> Result<(), FormError> {
        Self::ensure_rows_editable(state)?;
        if state.selections.get(row).is_none() {
            return Err(FormError::RowOutOfRange(row));
        }

        let Some(id) = room_type_id else {
            return Ok(());
        };
        let Some(room_type) = env.catalog.get(id) else {
            return Err(FormError::UnknownRoomType(id.clone()));
        };
        if !Self::engine(state, env).can_assign(row, id) {
            return Err(FormError::RoomTypeNotOffered(room_type.name.clone()));
        }
        Ok(())
    }

    /// Validates a `ChangeGuests` action
    fn validate_change_guests(
        state: &FormState,
        env: &FormEnvironment,
        row: usize,
        guests: u32,
    ) -> Result<(), FormError> {
        Self::ensure_rows_editable(state)?;
        let selection = state
            .selections
            .get(row)
            .ok_or(FormError::RowOutOfRange(row))?;

        let options = Self::engine(state, env).guest_options(selection.room_type_id.as_ref());
        if !options.editable {
            return Err(FormError::GuestsNotEditable);
        }
        if !options.allows(guests) {
            let max = options.choices.last().copied().unwrap_or(1);
            return Err(FormError::GuestsOutOfRange { guests, max });
        }
        Ok(())
    }

    /// Validates a `RemoveRoom` action
    fn validate_remove_room(state: &FormState, row: usize) -> Result<(), FormError> {
        Self::ensure_rows_editable(state)?;
        if state.selections.get(row).is_none() {
            return Err(FormError::RowOutOfRange(row));
        }
        Ok(())
    }

    /// Validates a `Submit` action, returning the request to send
    fn validate_submit(state: &FormState) -> Result<ReservationRequest, FormError> {
        if state.submission.is_in_flight() {
            return Err(FormError::SubmissionInFlight);
        }
        if state.availability_request.is_in_flight() {
            return Err(FormError::AvailabilityCheckInFlight);
        }

        let rooms = state.selections.room_requests();
        if rooms.is_empty() {
            return Err(FormError::NoRoomsSelected);
        }
        let range = state
            .pool
            .as_ref()
            .map(AvailabilityPool::range)
            .ok_or(FormError::AvailabilityNotLoaded)?;

        Ok(ReservationRequest {
            check_in: range.check_in(),
            check_out: range.check_out(),
            first_name: state.guest.first_name.clone(),
            last_name: state.guest.last_name.clone(),
            ota_ref: state.guest.ota_ref.clone(),
            notes: state.guest.notes.clone(),
            rooms,
        })
    }

    /// Applies an accepted operator action, returning its effects
    fn apply_operator_action(
        state: &mut FormState,
        action: FormAction,
        env: &FormEnvironment,
    ) -> Result<Effects<FormAction>, FormError> {
        if state.is_completed() && action != FormAction::Reset {
            return Err(FormError::SessionCompleted);
        }

        match action {
            FormAction::Reset => {
                // A running request keeps its control disabled into the new session
                *state = FormState {
                    availability_request: state.availability_request.abandon(),
                    submission: state.submission.abandon(),
                    ..FormState::default()
                };
                Ok(SmallVec::new())
            },
            FormAction::SetCheckIn(date) => {
                state.check_in = date;
                Ok(SmallVec::new())
            },
            FormAction::SetCheckOut(date) => {
                state.check_out = date;
                Ok(SmallVec::new())
            },
            FormAction::SetGuestDetails(details) => {
                state.guest = details;
                Ok(SmallVec::new())
            },
            FormAction::CheckAvailability => {
                let range = Self::validate_check_availability(state)?;
                state.availability_request = RequestStatus::InFlight;
                tracing::debug!(
                    check_in = %range.check_in(),
                    check_out = %range.check_out(),
                    "Checking availability"
                );

                let api = Arc::clone(&env.api);
                let query = AvailabilityQuery {
                    check_in: range.check_in(),
                    check_out: range.check_out(),
                };
                Ok(smallvec![async_effect! {
                    match api.check_availability(query).await {
                        Ok(response) => Some(FormAction::AvailabilityLoaded {
                            range,
                            availability: response.availability,
                        }),
                        Err(error) => Some(FormAction::AvailabilityFailed {
                            message: error.operator_message(AVAILABILITY_FAILED),
                        }),
                    }
                }])
            },
            FormAction::AddRoom => {
                Self::validate_add_room(state, env)?;
                let row = state.selections.add();
                tracing::debug!(row, "Room row added");
                Ok(SmallVec::new())
            },
            FormAction::ChangeRoomType { row, room_type_id } => {
                Self::validate_change_room_type(state, env, row, room_type_id.as_ref())?;
                tracing::debug!(row, room_type = ?room_type_id, "Room type changed");
                state.selections.set_room_type(row, room_type_id)?;
                Ok(SmallVec::new())
            },
            FormAction::ChangeGuests { row, guests } => {
                Self::validate_change_guests(state, env, row, guests)?;
                state.selections.set_guests(row, guests)?;
                Ok(SmallVec::new())
            },
            FormAction::RemoveRoom { row } => {
                Self::validate_remove_room(state, row)?;
                state.selections.remove(row)?;
                tracing::debug!(row, remaining_rows = state.selections.len(), "Room row removed");
                Ok(SmallVec::new())
            },
            FormAction::Submit => {
                let request = Self::validate_submit(state)?;
                state.submission = RequestStatus::InFlight;
                tracing::debug!(rooms = request.rooms.len(), "Submitting reservation");

                let api = Arc::clone(&env.api);
                Ok(smallvec![async_effect! {
                    match api.create_reservation(request).await {
                        Ok(receipt) => Some(FormAction::ReservationCreated {
                            reservation_id: receipt.reservation_id,
                        }),
                        Err(error) => Some(FormAction::ReservationFailed {
                            message: error.operator_message(RESERVATION_FAILED),
                        }),
                    }
                }])
            },
            FormAction::AvailabilityLoaded { .. }
            | FormAction::AvailabilityFailed { .. }
            | FormAction::ReservationCreated { .. }
            | FormAction::ReservationFailed { .. } => Ok(SmallVec::new()),
        }
    }

    /// Applies a request outcome; outcomes nobody is waiting for are dropped
    fn apply_outcome(state: &mut FormState, action: FormAction, env: &FormEnvironment) {
        match action {
            FormAction::AvailabilityLoaded {
                range,
                availability,
            } => {
                match state.availability_request.finish() {
                    RequestStatus::InFlight => {},
                    RequestStatus::Abandoned => {
                        tracing::info!("Discarding availability result from a reset session");
                        return;
                    },
                    RequestStatus::Idle => {
                        tracing::warn!("Ignoring availability result with no check in flight");
                        return;
                    },
                }
                state.pool = Some(AvailabilityPool::new(range, availability, env.clock.now()));
                // Rows chosen for the previous range may not exist in the new one
                state.selections.clear();
                state.last_error = None;

                let bookable = Self::engine(state, env).has_bookable_rooms();
                tracing::info!(nights = range.nights(), bookable, "Availability loaded");
            },
            FormAction::AvailabilityFailed { message } => {
                match state.availability_request.finish() {
                    RequestStatus::InFlight => {},
                    RequestStatus::Abandoned => {
                        tracing::info!(%message, "Discarding availability failure from a reset session");
                        return;
                    },
                    RequestStatus::Idle => {
                        tracing::warn!("Ignoring availability failure with no check in flight");
                        return;
                    },
                }
                tracing::warn!(%message, "Availability check failed");
                state.last_error = Some(message);
            },
            FormAction::ReservationCreated { reservation_id } => {
                match state.submission.finish() {
                    RequestStatus::InFlight => {},
                    RequestStatus::Abandoned => {
                        tracing::warn!(
                            reservation_id = ?reservation_id,
                            "Reservation created for a session that was reset"
                        );
                        return;
                    },
                    RequestStatus::Idle => {
                        tracing::warn!("Ignoring reservation result with no submission in flight");
                        return;
                    },
                }
                state.pool = None;
                state.selections.clear();
                state.last_error = None;
                state.notice = Some(match &reservation_id {
                    Some(id) => format!("{RESERVATION_CREATED} Reservation ID: {id}"),
                    None => RESERVATION_CREATED.to_string(),
                });
                tracing::info!(reservation_id = ?reservation_id, "Reservation created");
                state.phase = SessionPhase::Completed {
                    reservation_id,
                    completed_at: env.clock.now(),
                };
            },
            FormAction::ReservationFailed { message } => {
                match state.submission.finish() {
                    RequestStatus::InFlight => {},
                    RequestStatus::Abandoned => {
                        tracing::info!(%message, "Discarding reservation failure from a reset session");
                        return;
                    },
                    RequestStatus::Idle => {
                        tracing::warn!("Ignoring reservation failure with no submission in flight");
                        return;
                    },
                }
                tracing::warn!(%message, "Reservation failed");
                state.last_error = Some(message);
            },
            _ => {},
        }
    }
}

impl Reducer for FormReducer {
    type State = FormState;
    type Action = FormAction;
    type Environment = FormEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<FormAction> {
        if action.is_outcome() {
            Self::apply_outcome(state, action, env);
            return SmallVec::new();
        }

        match Self::apply_operator_action(state, action, env) {
            Ok(effects) => {
                state.last_error = None;
                effects
            },
            Err(error) => {
                tracing::warn!(%error, "Action rejected");
                state.last_error = Some(error.to_string());
                SmallVec::new()
            },
        }
    }
}
