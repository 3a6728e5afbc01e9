//! Request and response bodies for the OTA endpoints

use crate::types::{AvailabilityEntry, RoomTypeId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /ota/availability`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// First night
    pub check_in: NaiveDate,
    /// Departure day, exclusive
    pub check_out: NaiveDate,
}

/// Response of `POST /ota/availability`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Availability keyed by room type; types the server omits are unavailable
    #[serde(default)]
    pub availability: HashMap<RoomTypeId, AvailabilityEntry>,
}

/// One room of a reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    /// Room type to book
    pub room_type_id: RoomTypeId,
    /// Guests staying in the room
    pub guests: u32,
}

/// Body of `POST /ota/create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// First night
    pub check_in: NaiveDate,
    /// Departure day, exclusive
    pub check_out: NaiveDate,
    /// Lead guest first name
    pub first_name: String,
    /// Lead guest last name
    pub last_name: String,
    /// The agency's own booking reference
    pub ota_ref: String,
    /// Free-form notes for the property
    pub notes: String,
    /// Rooms to book; never empty when sent by the form
    pub rooms: Vec<RoomRequest>,
}

/// Response of `POST /ota/create`
///
/// Every field is optional on the wire: an empty or unexpected success body
/// decodes to a receipt without an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationReceipt {
    /// Server-side success flag
    #[serde(default)]
    pub success: bool,
    /// Identifier of the created reservation
    #[serde(default, rename = "reservationID")]
    pub reservation_id: Option<String>,
}

/// Error body the server sends with non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error: Option<String>,
}
