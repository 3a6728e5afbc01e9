//! Domain types for the reservation form
//!
//! Plain data: the date range, the availability pool fetched for it, the
//! operator's room selections and the form state that owns them all.

use crate::error::FormError;
use chrono::{DateTime, NaiveDate, Utc};
use room_desk_client::{AvailabilityEntry, RoomRequest, RoomTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Dates
// ============================================================================

/// A stay: check-in date up to, but not including, check-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DateRange {
    /// Create a range
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidDateRange`] unless `check_out` is after `check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, FormError> {
        if check_out <= check_in {
            return Err(FormError::InvalidDateRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Create a range from the form's date inputs
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingDates`] if either date is unset, otherwise
    /// as [`DateRange::new`].
    pub fn from_inputs(
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<Self, FormError> {
        match (check_in, check_out) {
            (Some(check_in), Some(check_out)) => Self::new(check_in, check_out),
            _ => Err(FormError::MissingDates),
        }
    }

    /// First night
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Departure day
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights, always at least 1
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

// ============================================================================
// Availability pool
// ============================================================================

/// Per-room-type availability for one date range
///
/// Replaced wholesale by every successful availability check; never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityPool {
    range: DateRange,
    entries: HashMap<RoomTypeId, AvailabilityEntry>,
    fetched_at: DateTime<Utc>,
}

impl AvailabilityPool {
    /// Create a pool from a server response
    #[must_use]
    pub const fn new(
        range: DateRange,
        entries: HashMap<RoomTypeId, AvailabilityEntry>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            range,
            entries,
            fetched_at,
        }
    }

    /// Date range the pool was fetched for
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// When the pool was fetched
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Units of a room type; types the server omitted have none
    #[must_use]
    pub fn available(&self, id: &RoomTypeId) -> u32 {
        self.entries.get(id).map_or(0, |e| e.available)
    }

    /// Nightly rate of a room type, if the server returned one
    #[must_use]
    pub fn rate(&self, id: &RoomTypeId) -> Option<Decimal> {
        self.entries.get(id).map(|e| e.rate)
    }
}

// ============================================================================
// Selections
// ============================================================================

/// One row of the form: a room type choice and a guest count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSelection {
    /// Chosen room type; `None` until the operator picks one
    pub room_type_id: Option<RoomTypeId>,
    /// Guests in the room
    pub guests: u32,
}

impl Default for RoomSelection {
    fn default() -> Self {
        Self {
            room_type_id: None,
            guests: 1,
        }
    }
}

/// Ordered rows the operator is building
///
/// Indices are contiguous: removing a row shifts every later row down by one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    rows: Vec<RoomSelection>,
}

impl SelectionSet {
    /// Append an empty row, returning its index
    pub fn add(&mut self) -> usize {
        self.rows.push(RoomSelection::default());
        self.rows.len() - 1
    }

    /// Row at `row`
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&RoomSelection> {
        self.rows.get(row)
    }

    /// Set or clear a row's room type
    ///
    /// An actual change sends the guest count back to 1; choosing the type
    /// the row already holds leaves the row as it is.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::RowOutOfRange`] if there is no such row.
    pub fn set_room_type(
        &mut self,
        row: usize,
        room_type_id: Option<RoomTypeId>,
    ) -> Result<(), FormError> {
        let selection = self.rows.get_mut(row).ok_or(FormError::RowOutOfRange(row))?;
        if selection.room_type_id != room_type_id {
            selection.room_type_id = room_type_id;
            selection.guests = 1;
        }
        Ok(())
    }

    /// Set a row's guest count
    ///
    /// # Errors
    ///
    /// Returns [`FormError::RowOutOfRange`] if there is no such row.
    pub fn set_guests(&mut self, row: usize, guests: u32) -> Result<(), FormError> {
        let selection = self.rows.get_mut(row).ok_or(FormError::RowOutOfRange(row))?;
        selection.guests = guests;
        Ok(())
    }

    /// Remove a row
    ///
    /// # Errors
    ///
    /// Returns [`FormError::RowOutOfRange`] if there is no such row.
    pub fn remove(&mut self, row: usize) -> Result<RoomSelection, FormError> {
        if row >= self.rows.len() {
            return Err(FormError::RowOutOfRange(row));
        }
        Ok(self.rows.remove(row))
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Rows holding `id`, not counting the row at `excluding`
    #[must_use]
    pub fn claimed(&self, id: &RoomTypeId, excluding: Option<usize>) -> u32 {
        let count = self
            .rows
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != excluding)
            .filter(|(_, s)| s.room_type_id.as_ref() == Some(id))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Whether any row holds a room type
    #[must_use]
    pub fn has_chosen_room(&self) -> bool {
        self.rows.iter().any(|s| s.room_type_id.is_some())
    }

    /// Rows with a room type, as request lines; empty rows are dropped
    #[must_use]
    pub fn room_requests(&self) -> Vec<RoomRequest> {
        self.rows
            .iter()
            .filter_map(|s| {
                s.room_type_id.as_ref().map(|id| RoomRequest {
                    room_type_id: id.clone(),
                    guests: s.guests,
                })
            })
            .collect()
    }

    /// Rows in index order
    pub fn iter(&self) -> impl Iterator<Item = &RoomSelection> {
        self.rows.iter()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Form state
// ============================================================================

/// Lead guest identity and free-form fields, passed through unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    /// Lead guest first name
    pub first_name: String,
    /// Lead guest last name
    pub last_name: String,
    /// Booking channel reference
    pub ota_ref: String,
    /// Notes for the property
    pub notes: String,
}

/// Whether a request of one kind is outstanding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Control enabled
    #[default]
    Idle,
    /// Control disabled until the outcome arrives
    InFlight,
    /// Still running, but started by a session that was reset since
    ///
    /// The control stays disabled; the outcome only frees it.
    Abandoned,
}

impl RequestStatus {
    /// Whether a request of this kind is outstanding, for any session
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight | Self::Abandoned)
    }

    /// Status carried into a fresh session
    #[must_use]
    pub const fn abandon(self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::InFlight | Self::Abandoned => Self::Abandoned,
        }
    }

    /// Marks the request answered, returning what it was before
    pub fn finish(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Lifecycle of one form session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// The operator is composing a reservation
    #[default]
    Editing,
    /// The server accepted the reservation
    Completed {
        /// Server-assigned id, when the server returned one
        reservation_id: Option<String>,
        /// When the outcome was applied
        completed_at: DateTime<Utc>,
    },
}

/// Everything the reservation form knows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Check-in date input
    pub check_in: Option<NaiveDate>,
    /// Check-out date input
    pub check_out: Option<NaiveDate>,
    /// Guest identity fields
    pub guest: GuestDetails,
    /// Availability for the last successfully checked range
    pub pool: Option<AvailabilityPool>,
    /// The operator's rows
    pub selections: SelectionSet,
    /// Availability lookup status
    pub availability_request: RequestStatus,
    /// Reservation creation status
    pub submission: RequestStatus,
    /// Session lifecycle
    pub phase: SessionPhase,
    /// Message of the last failure, cleared by the next accepted action
    pub last_error: Option<String>,
    /// Confirmation message
    pub notice: Option<String>,
}

impl FormState {
    /// Whether the reservation has been created
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed { .. })
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Operator intents and request outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    // Operator actions
    /// Start a fresh session (modal opened or closed)
    Reset,
    /// Edit the check-in input
    SetCheckIn(Option<NaiveDate>),
    /// Edit the check-out input
    SetCheckOut(Option<NaiveDate>),
    /// Edit the guest fields
    SetGuestDetails(GuestDetails),
    /// Look up availability for the date inputs
    CheckAvailability,
    /// Append an empty row
    AddRoom,
    /// Choose or clear a row's room type
    ChangeRoomType {
        /// Row index
        row: usize,
        /// New room type; `None` clears the choice
        room_type_id: Option<RoomTypeId>,
    },
    /// Choose a row's guest count
    ChangeGuests {
        /// Row index
        row: usize,
        /// Guests
        guests: u32,
    },
    /// Delete a row
    RemoveRoom {
        /// Row index
        row: usize,
    },
    /// Send the reservation
    Submit,

    // Outcomes
    /// Availability lookup succeeded
    AvailabilityLoaded {
        /// Range that was queried
        range: DateRange,
        /// Per-room-type availability
        availability: HashMap<RoomTypeId, AvailabilityEntry>,
    },
    /// Availability lookup failed
    AvailabilityFailed {
        /// Operator-facing message
        message: String,
    },
    /// Reservation accepted
    ReservationCreated {
        /// Server-assigned id
        reservation_id: Option<String>,
    },
    /// Reservation refused or not delivered
    ReservationFailed {
        /// Operator-facing message
        message: String,
    },
}

impl FormAction {
    /// Whether this action reports the end of a request
    #[must_use]
    pub const fn is_outcome(&self) -> bool {
        matches!(
            self,
            Self::AvailabilityLoaded { .. }
                | Self::AvailabilityFailed { .. }
                | Self::ReservationCreated { .. }
                | Self::ReservationFailed { .. }
        )
    }
}
