//! Shared value types for the OTA wire model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a room type in the property's catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomTypeId(String);

impl RoomTypeId {
    /// Create an identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomTypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomTypeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Availability of one room type over the queried range
///
/// Older servers answer with a bare count instead of an object; those
/// entries decode with a zero rate. A negative rate fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRepr")]
pub struct AvailabilityEntry {
    /// Rooms of this type free for every night of the range
    pub available: u32,
    /// Nightly rate
    pub rate: Decimal,
}

impl AvailabilityEntry {
    /// Create an entry
    #[must_use]
    pub const fn new(available: u32, rate: Decimal) -> Self {
        Self { available, rate }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Detailed {
        available: u32,
        #[serde(default)]
        rate: Decimal,
    },
    Count(u32),
}

impl TryFrom<EntryRepr> for AvailabilityEntry {
    type Error = String;

    fn try_from(repr: EntryRepr) -> Result<Self, Self::Error> {
        match repr {
            EntryRepr::Detailed { rate, .. } if rate.is_sign_negative() && !rate.is_zero() => {
                Err(format!("rate must not be negative, got {rate}"))
            },
            EntryRepr::Detailed { available, rate } => Ok(Self { available, rate }),
            EntryRepr::Count(available) => Ok(Self {
                available,
                rate: Decimal::ZERO,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;

    #[test]
    fn detailed_entry_decodes() {
        let entry: AvailabilityEntry =
            serde_json::from_str(r#"{"available": 3, "rate": 129.5}"#).unwrap();
        assert_eq!(entry.available, 3);
        assert_eq!(entry.rate, Decimal::new(1295, 1));
    }

    #[test]
    fn bare_count_decodes_with_zero_rate() {
        let entry: AvailabilityEntry = serde_json::from_str("2").unwrap();
        assert_eq!(entry, AvailabilityEntry::new(2, Decimal::ZERO));
    }

    #[test]
    fn negative_count_is_rejected() {
        assert!(serde_json::from_str::<AvailabilityEntry>("-1").is_err());
    }

    #[test]
    fn negative_rate_is_rejected() {
        let error = serde_json::from_str::<AvailabilityEntry>(r#"{"available": 2, "rate": -80}"#)
            .unwrap_err();
        assert!(error.to_string().contains("rate must not be negative"));
    }

    #[test]
    fn zero_rate_is_accepted() {
        let entry: AvailabilityEntry =
            serde_json::from_str(r#"{"available": 1, "rate": 0}"#).unwrap();
        assert_eq!(entry.rate, Decimal::ZERO);
    }

    #[test]
    fn room_type_id_is_a_plain_string_on_the_wire() {
        let id = RoomTypeId::from("deluxe-king");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""deluxe-king""#);
        assert_eq!(id.to_string(), "deluxe-king");
    }
}
