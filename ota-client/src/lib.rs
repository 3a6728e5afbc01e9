//! # OTA Reservation Client
//!
//! Wire model and HTTP client for the two endpoints behind the multi-room
//! reservation form:
//!
//! - `POST /ota/availability`: per-room-type counts and rates for a date range
//! - `POST /ota/create`: create a reservation for a set of rooms
//!
//! ## Example
//!
//! ```no_run
//! use room_desk_client::{AvailabilityQuery, OtaClient};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OtaClient::new("http://localhost:5000").with_remote_user("agency-a");
//!
//!     let query = AvailabilityQuery {
//!         check_in: NaiveDate::from_ymd_opt(2025, 3, 1).ok_or("bad date")?,
//!         check_out: NaiveDate::from_ymd_opt(2025, 3, 4).ok_or("bad date")?,
//!     };
//!     let response = client.check_availability(&query).await?;
//!
//!     for (room_type, entry) in &response.availability {
//!         println!("{room_type}: {} left at {}", entry.available, entry.rate);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod types;

// Re-export main types for convenience
pub use client::OtaClient;
pub use error::OtaError;
pub use messages::{
    AvailabilityQuery, AvailabilityResponse, ReservationReceipt, ReservationRequest, RoomRequest,
};
pub use types::{AvailabilityEntry, RoomTypeId};
