//! Allocation engine
//!
//! Answers what each row may offer given the shared availability pool and
//! every other row's claim on it. Everything here is a pure query over
//! borrowed state; nothing is cached, so two calls with no mutation in
//! between always agree.
//!
//! The central rule is self-exemption: when computing what row `i` may offer,
//! row `i`'s own claim is added back, so its current choice stays selectable
//! even if it took the last unit.

use crate::catalog::AvailabilityCatalog;
use crate::types::{AvailabilityPool, SelectionSet};
use room_desk_client::RoomTypeId;

/// A room type a row may choose, with the units left for that row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOffer {
    /// Room type
    pub room_type_id: RoomTypeId,
    /// Units left after every other row's claim
    pub remaining: u32,
}

/// Guest counts a row may choose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestOptions {
    /// Selectable counts, ascending
    pub choices: Vec<u32>,
    /// Whether the operator may change the count
    pub editable: bool,
}

impl GuestOptions {
    /// The single disabled choice shown while no room type is chosen
    #[must_use]
    pub fn locked() -> Self {
        Self {
            choices: vec![1],
            editable: false,
        }
    }

    /// Whether `guests` is one of the choices
    #[must_use]
    pub fn allows(&self, guests: u32) -> bool {
        self.choices.contains(&guests)
    }
}

/// Pure queries over catalog, pool and selections
#[derive(Debug, Clone, Copy)]
pub struct AllocationEngine<'a> {
    catalog: &'a AvailabilityCatalog,
    pool: Option<&'a AvailabilityPool>,
    selections: &'a SelectionSet,
}

impl<'a> AllocationEngine<'a> {
    /// Borrow the state the engine answers from
    #[must_use]
    pub const fn new(
        catalog: &'a AvailabilityCatalog,
        pool: Option<&'a AvailabilityPool>,
        selections: &'a SelectionSet,
    ) -> Self {
        Self {
            catalog,
            pool,
            selections,
        }
    }

    /// Units of a room type in the pool
    ///
    /// Zero without a pool, and zero for ids outside the catalog.
    #[must_use]
    pub fn available(&self, id: &RoomTypeId) -> u32 {
        if !self.catalog.contains(id) {
            return 0;
        }
        self.pool.map_or(0, |pool| pool.available(id))
    }

    /// Units of a room type not claimed by any row other than `excluding`
    #[must_use]
    pub fn remaining(&self, id: &RoomTypeId, excluding: Option<usize>) -> u32 {
        self.available(id)
            .saturating_sub(self.selections.claimed(id, excluding))
    }

    /// Options for an existing row, in catalog order
    #[must_use]
    pub fn offers_for_row(&self, row: usize) -> Vec<RoomOffer> {
        self.offers(Some(row))
    }

    /// Options a newly added row would get
    #[must_use]
    pub fn offers_for_new_row(&self) -> Vec<RoomOffer> {
        self.offers(None)
    }

    /// Options for every row, recomputed from scratch
    #[must_use]
    pub fn all_row_offers(&self) -> Vec<Vec<RoomOffer>> {
        (0..self.selections.len())
            .map(|row| self.offers_for_row(row))
            .collect()
    }

    fn offers(&self, excluding: Option<usize>) -> Vec<RoomOffer> {
        self.catalog
            .iter()
            .filter_map(|room_type| {
                let remaining = self.remaining(&room_type.id, excluding);
                (remaining > 0).then(|| RoomOffer {
                    room_type_id: room_type.id.clone(),
                    remaining,
                })
            })
            .collect()
    }

    /// Whether `row` may switch to `id` without exceeding the pool
    #[must_use]
    pub fn can_assign(&self, row: usize, id: &RoomTypeId) -> bool {
        self.remaining(id, Some(row)) > 0
    }

    /// Guest counts for a row holding `room_type`
    ///
    /// `1..=maxGuests` for a catalog type; the locked single choice for no
    /// type or an id outside the catalog.
    #[must_use]
    pub fn guest_options(&self, room_type: Option<&RoomTypeId>) -> GuestOptions {
        match room_type.map(|id| self.catalog.max_guests(id)) {
            Some(max) if max > 0 => GuestOptions {
                choices: (1..=max).collect(),
                editable: true,
            },
            _ => GuestOptions::locked(),
        }
    }

    /// Whether any catalog room type has units in the pool
    #[must_use]
    pub fn has_bookable_rooms(&self) -> bool {
        self.catalog.iter().any(|t| self.available(&t.id) > 0)
    }

    /// Whether no room type is claimed by more rows than it has units
    #[must_use]
    pub fn is_within_pool(&self) -> bool {
        self.catalog
            .iter()
            .all(|t| self.selections.claimed(&t.id, None) <= self.available(&t.id))
    }
}
