//! Derived view of the reservation form
//!
//! [`FormView::derive`] recomputes everything a renderer needs from
//! [`FormState`] alone. Call it after every action and redraw from the result;
//! no view data is kept between calls.

use crate::allocation::AllocationEngine;
use crate::catalog::AvailabilityCatalog;
use crate::error::FormError;
use crate::types::FormState;
use room_desk_client::RoomTypeId;
use rust_decimal::Decimal;
use serde::Serialize;

/// A room type with units in the loaded pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityLine {
    /// Room type
    pub room_type_id: RoomTypeId,
    /// Display name
    pub name: String,
    /// Units in the pool
    pub available: u32,
    /// Nightly rate
    pub rate: Decimal,
}

/// One selectable room type in a row's dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// Room type
    pub room_type_id: RoomTypeId,
    /// `"<name> (<n> left)"`
    pub label: String,
    /// Units left for this row
    pub remaining: u32,
}

/// One guest count choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestChoiceView {
    /// Guests
    pub value: u32,
    /// `"1 guest"` or `"N guests"`
    pub label: String,
}

/// One row of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Row index
    pub index: usize,
    /// Room types this row may choose, in catalog order
    pub options: Vec<OptionView>,
    /// Current choice
    pub selected: Option<RoomTypeId>,
    /// Guest counts this row may choose
    pub guest_choices: Vec<GuestChoiceView>,
    /// Whether the guest control is enabled
    pub guests_editable: bool,
    /// Current guest count
    pub guests: u32,
}

/// Everything the form shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Nights of the loaded range
    pub nights: Option<i64>,
    /// Bookable room types of the loaded pool, in catalog order
    pub availability_summary: Vec<AvailabilityLine>,
    /// Shown instead of the summary when a pool is loaded but empty
    pub availability_message: Option<String>,
    /// Room rows in index order
    pub rows: Vec<RowView>,
    /// Whether the availability button is enabled
    pub can_check_availability: bool,
    /// Whether the add-room button is enabled
    pub can_add_room: bool,
    /// Whether the confirm button is enabled
    pub can_submit: bool,
    /// An availability check is running
    pub checking_availability: bool,
    /// A reservation request is running
    pub submitting: bool,
    /// Sum of rate times nights over chosen rows, capped at `Decimal::MAX`
    pub estimated_total: Decimal,
    /// Message of the last failure
    pub error: Option<String>,
    /// Confirmation message
    pub notice: Option<String>,
}

/// `"1 guest"`, `"2 guests"`, ...
#[must_use]
pub fn guest_label(guests: u32) -> String {
    if guests == 1 {
        "1 guest".to_string()
    } else {
        format!("{guests} guests")
    }
}

impl FormView {
    /// Derive the view from current state
    #[must_use]
    pub fn derive(state: &FormState, catalog: &AvailabilityCatalog) -> Self {
        let engine = AllocationEngine::new(catalog, state.pool.as_ref(), &state.selections);
        let pool = state.pool.as_ref();

        let availability_summary: Vec<AvailabilityLine> = pool
            .map(|pool| {
                catalog
                    .iter()
                    .filter(|t| engine.available(&t.id) > 0)
                    .map(|t| AvailabilityLine {
                        room_type_id: t.id.clone(),
                        name: t.name.clone(),
                        available: engine.available(&t.id),
                        rate: pool.rate(&t.id).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let availability_message = (pool.is_some() && availability_summary.is_empty())
            .then(|| FormError::NoRoomsAvailable.to_string());

        let rows = state
            .selections
            .iter()
            .enumerate()
            .map(|(index, selection)| {
                let guest_options = engine.guest_options(selection.room_type_id.as_ref());
                RowView {
                    index,
                    options: engine
                        .offers_for_row(index)
                        .into_iter()
                        .map(|offer| OptionView {
                            label: format!(
                                "{} ({} left)",
                                catalog.name(&offer.room_type_id),
                                offer.remaining
                            ),
                            room_type_id: offer.room_type_id,
                            remaining: offer.remaining,
                        })
                        .collect(),
                    selected: selection.room_type_id.clone(),
                    guest_choices: guest_options
                        .choices
                        .iter()
                        .map(|&value| GuestChoiceView {
                            value,
                            label: guest_label(value),
                        })
                        .collect(),
                    guests_editable: guest_options.editable,
                    guests: selection.guests,
                }
            })
            .collect();

        let nights = pool.map(|p| p.range().nights());
        let estimated_total = pool.map_or(Decimal::ZERO, |pool| {
            let nights = Decimal::from(pool.range().nights());
            state
                .selections
                .room_requests()
                .iter()
                .filter_map(|room| pool.rate(&room.room_type_id))
                .fold(Decimal::ZERO, |total, rate| {
                    total.saturating_add(rate.saturating_mul(nights))
                })
        });

        let checking_availability = state.availability_request.is_in_flight();
        let submitting = state.submission.is_in_flight();
        let editing = !state.is_completed();

        Self {
            nights,
            availability_summary,
            availability_message,
            rows,
            can_check_availability: editing && !checking_availability && !submitting,
            can_add_room: editing && !checking_availability && engine.has_bookable_rooms(),
            can_submit: editing
                && !checking_availability
                && !submitting
                && state.selections.has_chosen_room(),
            checking_availability,
            submitting,
            estimated_total,
            error: state.last_error.clone(),
            notice: state.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;
    use crate::catalog::RoomType;
    use crate::types::{AvailabilityPool, DateRange, RequestStatus};
    use chrono::{NaiveDate, Utc};
    use room_desk_client::AvailabilityEntry;
    use std::collections::HashMap;

    fn catalog() -> AvailabilityCatalog {
        AvailabilityCatalog::new([
            RoomType::new("standard", "Standard Queen", 2),
            RoomType::new("deluxe", "Deluxe King", 2),
            RoomType::new("suite", "Family Suite", 4),
        ])
    }

    fn state(entries: &[(&str, u32, i64)]) -> FormState {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
        )
        .unwrap();
        let availability: HashMap<RoomTypeId, AvailabilityEntry> = entries
            .iter()
            .map(|(id, n, rate)| ((*id).into(), AvailabilityEntry::new(*n, Decimal::from(*rate))))
            .collect();
        FormState {
            pool: Some(AvailabilityPool::new(range, availability, Utc::now())),
            ..FormState::default()
        }
    }

    #[test]
    fn empty_form_only_allows_date_entry() {
        let view = FormView::derive(&FormState::default(), &catalog());

        assert!(view.can_check_availability);
        assert!(!view.can_add_room);
        assert!(!view.can_submit);
        assert_eq!(view.nights, None);
        assert_eq!(view.availability_message, None);
    }

    #[test]
    fn summary_follows_catalog_order_and_skips_sold_out() {
        let view = FormView::derive(
            &state(&[("suite", 1, 300), ("standard", 0, 90), ("deluxe", 2, 150)]),
            &catalog(),
        );

        let names: Vec<_> = view.availability_summary.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Deluxe King", "Family Suite"]);
        assert_eq!(view.nights, Some(3));
        assert!(view.can_add_room);
    }

    #[test]
    fn sold_out_pool_disables_add_room() {
        let view = FormView::derive(&state(&[("deluxe", 0, 150)]), &catalog());

        assert!(view.availability_summary.is_empty());
        assert_eq!(
            view.availability_message.as_deref(),
            Some("No rooms available for selected dates")
        );
        assert!(!view.can_add_room);
    }

    #[test]
    fn rows_show_labels_and_guest_choices() {
        let mut state = state(&[("deluxe", 2, 150), ("suite", 1, 300)]);
        state.selections.add();
        state.selections.set_room_type(0, Some("suite".into())).unwrap();
        state.selections.add();

        let view = FormView::derive(&state, &catalog());

        let first = &view.rows[0];
        let labels: Vec<_> = first.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Deluxe King (2 left)", "Family Suite (1 left)"]);
        assert!(first.guests_editable);
        let guest_labels: Vec<_> = first.guest_choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(guest_labels, ["1 guest", "2 guests", "3 guests", "4 guests"]);

        let second = &view.rows[1];
        let labels: Vec<_> = second.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Deluxe King (2 left)"]);
        assert!(!second.guests_editable);
        assert_eq!(second.guest_choices.len(), 1);

        assert!(view.can_submit);
    }

    #[test]
    fn estimated_total_is_rate_times_nights() {
        let mut state = state(&[("deluxe", 2, 150), ("suite", 1, 300)]);
        for id in ["deluxe", "deluxe", "suite"] {
            let row = state.selections.add();
            state.selections.set_room_type(row, Some(id.into())).unwrap();
        }
        state.selections.add();

        let view = FormView::derive(&state, &catalog());
        assert_eq!(view.estimated_total, Decimal::from((150 + 150 + 300) * 3));
    }

    #[test]
    fn huge_rates_cap_the_estimate_instead_of_overflowing() {
        let mut state = state(&[("deluxe", 2, 150)]);
        let pool = state.pool.take().unwrap();
        let availability = HashMap::from([(
            RoomTypeId::from("deluxe"),
            AvailabilityEntry::new(2, Decimal::MAX),
        )]);
        state.pool = Some(AvailabilityPool::new(pool.range(), availability, Utc::now()));
        for _ in 0..2 {
            let row = state.selections.add();
            state.selections.set_room_type(row, Some("deluxe".into())).unwrap();
        }

        let view = FormView::derive(&state, &catalog());
        assert_eq!(view.estimated_total, Decimal::MAX);
        assert!(view.can_submit);
    }

    #[test]
    fn busy_flags_disable_controls() {
        let mut state = state(&[("deluxe", 2, 150)]);
        let row = state.selections.add();
        state.selections.set_room_type(row, Some("deluxe".into())).unwrap();
        state.submission = RequestStatus::InFlight;

        let view = FormView::derive(&state, &catalog());
        assert!(view.submitting);
        assert!(!view.can_submit);
        assert!(!view.can_check_availability);
        assert!(view.can_add_room);
    }

    #[test]
    fn guest_labels() {
        assert_eq!(guest_label(1), "1 guest");
        assert_eq!(guest_label(3), "3 guests");
    }
}
