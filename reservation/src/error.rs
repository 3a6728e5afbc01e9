//! Error types for the reservation form
//!
//! `Display` of [`FormError`] is the message shown to the operator.

use room_desk_client::RoomTypeId;
use std::path::PathBuf;
use thiserror::Error;

/// An operator action the form refuses
///
/// A rejected action changes nothing except the form's error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// One or both dates are missing
    #[error("Please select check-in and check-out dates")]
    MissingDates,

    /// Check-out is on or before check-in
    #[error("Check-out must be after check-in")]
    InvalidDateRange,

    /// Submit with no row holding a room type
    #[error("Please add at least one room")]
    NoRoomsSelected,

    /// Rows can only be added once availability is known
    #[error("Please check availability first")]
    AvailabilityNotLoaded,

    /// The loaded pool has nothing bookable
    #[error("No rooms available for selected dates")]
    NoRoomsAvailable,

    /// An availability check is already running
    #[error("Availability check already in progress")]
    AvailabilityCheckInFlight,

    /// A reservation request is already running
    #[error("Reservation is already being created")]
    SubmissionInFlight,

    /// No row at this index
    #[error("No room at position {0}")]
    RowOutOfRange(usize),

    /// The id is not in the catalog
    #[error("Unknown room type: {0}")]
    UnknownRoomType(RoomTypeId),

    /// Every unit of this type is already claimed by other rows
    #[error("No {0} rooms left for selected dates")]
    RoomTypeNotOffered(String),

    /// Guest count of a row without a room type
    #[error("Select a room type before choosing guests")]
    GuestsNotEditable,

    /// Guest count outside what the room type allows
    #[error("Guest count must be between 1 and {max}")]
    GuestsOutOfRange {
        /// Requested guest count
        guests: u32,
        /// Room type occupancy
        max: u32,
    },

    /// The reservation has been created; only a reset is accepted
    #[error("Reservation already created, start a new one")]
    SessionCompleted,
}

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON is malformed
    #[error("Invalid catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// An environment variable holds an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidVar {
        /// Variable name
        name: &'static str,
        /// Value found
        value: String,
    },
}
