//! Room type catalog
//!
//! Static reference data for the session: which room types exist, what they
//! are called, and how many guests each holds. The catalog's declared order
//! is the order room types are offered in.

use crate::error::ConfigError;
use room_desk_client::RoomTypeId;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Occupancy assumed when the catalog does not state one
pub const DEFAULT_MAX_GUESTS: u32 = 2;

/// A bookable category of room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    /// Unique key
    pub id: RoomTypeId,
    /// Display name
    pub name: String,
    /// Maximum occupancy, always at least 1
    pub max_guests: u32,
}

impl RoomType {
    /// Create a room type; a zero occupancy falls back to the default
    #[must_use]
    pub fn new(id: impl Into<RoomTypeId>, name: impl Into<String>, max_guests: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_guests: if max_guests == 0 {
                DEFAULT_MAX_GUESTS
            } else {
                max_guests
            },
        }
    }
}

/// Ordered, read-only set of room types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityCatalog {
    room_types: Vec<RoomType>,
}

impl AvailabilityCatalog {
    /// Build a catalog; a repeated id replaces the earlier entry in place
    #[must_use]
    pub fn new(room_types: impl IntoIterator<Item = RoomType>) -> Self {
        let mut catalog = Self::default();
        for room_type in room_types {
            catalog.insert(room_type);
        }
        catalog
    }

    fn insert(&mut self, room_type: RoomType) {
        match self.room_types.iter_mut().find(|t| t.id == room_type.id) {
            Some(existing) => *existing = room_type,
            None => self.room_types.push(room_type),
        }
    }

    /// Look up a room type
    #[must_use]
    pub fn get(&self, id: &RoomTypeId) -> Option<&RoomType> {
        self.room_types.iter().find(|t| &t.id == id)
    }

    /// Whether the id is in the catalog
    #[must_use]
    pub fn contains(&self, id: &RoomTypeId) -> bool {
        self.get(id).is_some()
    }

    /// Maximum occupancy of a room type; 0 for ids not in the catalog
    #[must_use]
    pub fn max_guests(&self, id: &RoomTypeId) -> u32 {
        self.get(id).map_or(0, |t| t.max_guests)
    }

    /// Display name of a room type, falling back to the raw id
    #[must_use]
    pub fn name<'a>(&'a self, id: &'a RoomTypeId) -> &'a str {
        self.get(id).map_or(id.as_str(), |t| t.name.as_str())
    }

    /// Room types in declared order
    pub fn iter(&self) -> impl Iterator<Item = &RoomType> {
        self.room_types.iter()
    }

    /// Number of room types
    #[must_use]
    pub fn len(&self) -> usize {
        self.room_types.len()
    }

    /// Whether the catalog has no room types
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.room_types.is_empty()
    }

    /// Parse a catalog document: `{"roomTypes": {"<id>": {"name", "maxGuests"}}}`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CatalogParse`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(document.room_types)
    }

    /// Read and parse a catalog file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CatalogRead`] if the file cannot be read and
    /// [`ConfigError::CatalogParse`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), room_types = catalog.len(), "Loaded room catalog");
        Ok(catalog)
    }

    /// Small built-in catalog for demos and offline use
    #[must_use]
    pub fn sample() -> Self {
        Self::new([
            RoomType::new("standard-queen", "Standard Queen", 2),
            RoomType::new("deluxe-king", "Deluxe King", 2),
            RoomType::new("family-suite", "Family Suite", 4),
            RoomType::new("single", "Single", 1),
        ])
    }
}

impl<'a> IntoIterator for &'a AvailabilityCatalog {
    type Item = &'a RoomType;
    type IntoIter = std::slice::Iter<'a, RoomType>;

    fn into_iter(self) -> Self::IntoIter {
        self.room_types.iter()
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(rename = "roomTypes")]
    room_types: AvailabilityCatalog,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomTypeFields {
    name: String,
    #[serde(default)]
    max_guests: Option<u32>,
}

/// Deserialized from a JSON object keyed by id, keeping key order
impl<'de> Deserialize<'de> for AvailabilityCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = AvailabilityCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of room type id to {name, maxGuests}")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut catalog = AvailabilityCatalog::default();
                while let Some((id, fields)) = map.next_entry::<RoomTypeId, RoomTypeFields>()? {
                    if catalog.contains(&id) {
                        return Err(de::Error::custom(format!("duplicate room type {id}")));
                    }
                    catalog.insert(RoomType::new(
                        id,
                        fields.name,
                        fields.max_guests.unwrap_or(DEFAULT_MAX_GUESTS),
                    ));
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
