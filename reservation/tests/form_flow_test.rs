//! End-to-end form sessions through the Store with an in-memory server
//!
//! Every request goes through the real effect loop: the reducer starts it,
//! the Store runs it, and its outcome comes back as an action.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use chrono::NaiveDate;
use room_desk_client::{AvailabilityEntry, OtaError, RoomRequest, RoomTypeId};
use room_desk_reservation::{
    AvailabilityCatalog, FormAction, FormEnvironment, FormReducer, FormState, FormView,
    GuestDetails, InMemoryReservationApi, RequestStatus, RoomType,
};
use room_desk_runtime::Store;
use room_desk_testing::test_clock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

type FormStore = Store<FormState, FormAction, FormEnvironment, FormReducer>;

const WAIT: Duration = Duration::from_secs(2);

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn catalog() -> AvailabilityCatalog {
    AvailabilityCatalog::new([
        RoomType::new("standard", "Standard Queen", 2),
        RoomType::new("deluxe", "Deluxe King", 2),
        RoomType::new("suite", "Family Suite", 4),
    ])
}

fn availability(entries: &[(&str, u32, i64)]) -> HashMap<RoomTypeId, AvailabilityEntry> {
    entries
        .iter()
        .map(|(id, n, rate)| ((*id).into(), AvailabilityEntry::new(*n, Decimal::from(*rate))))
        .collect()
}

fn setup(api: &InMemoryReservationApi) -> FormStore {
    Store::new(
        FormState::default(),
        FormReducer::new(),
        FormEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(api.clone()),
            Arc::new(catalog()),
        ),
    )
}

async fn send(store: &FormStore, action: FormAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();
}

async fn check(store: &FormStore, check_in: NaiveDate, check_out: NaiveDate) {
    send(store, FormAction::SetCheckIn(Some(check_in))).await;
    send(store, FormAction::SetCheckOut(Some(check_out))).await;
    send(store, FormAction::CheckAvailability).await;
}

async fn add_room(store: &FormStore, room_type: &str) {
    send(store, FormAction::AddRoom).await;
    let row = store.state(|s| s.selections.len() - 1).await;
    send(
        store,
        FormAction::ChangeRoomType {
            row,
            room_type_id: Some(room_type.into()),
        },
    )
    .await;
}

async fn view(store: &FormStore) -> FormView {
    let catalog = catalog();
    store.state(|s| FormView::derive(s, &catalog)).await
}

#[tokio::test]
async fn full_session_creates_reservation() {
    let api = InMemoryReservationApi::new(availability(&[("deluxe", 2, 180), ("suite", 1, 320)]));
    let store = setup(&api);

    check(&store, date(3, 10), date(3, 12)).await;
    add_room(&store, "deluxe").await;
    add_room(&store, "suite").await;
    send(&store, FormAction::ChangeGuests { row: 1, guests: 4 }).await;
    send(
        &store,
        FormAction::SetGuestDetails(GuestDetails {
            first_name: "Katherine".into(),
            last_name: "Johnson".into(),
            ota_ref: "BK-3003".into(),
            notes: "Quiet floor".into(),
        }),
    )
    .await;

    let before_submit = view(&store).await;
    assert!(before_submit.can_submit);
    assert_eq!(before_submit.estimated_total, Decimal::from((180 + 320) * 2));

    send(&store, FormAction::Submit).await;

    let requests = api.reservations();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.check_in, date(3, 10));
    assert_eq!(request.check_out, date(3, 12));
    assert_eq!(request.first_name, "Katherine");
    assert_eq!(
        request.rooms,
        vec![
            RoomRequest {
                room_type_id: "deluxe".into(),
                guests: 1,
            },
            RoomRequest {
                room_type_id: "suite".into(),
                guests: 4,
            },
        ]
    );

    let (completed, pool_cleared, rows) = store
        .state(|s| (s.is_completed(), s.pool.is_none(), s.selections.len()))
        .await;
    assert!(completed);
    assert!(pool_cleared);
    assert_eq!(rows, 0);

    let after = view(&store).await;
    assert_eq!(
        after.notice.as_deref(),
        Some("Reservation created successfully! Reservation ID: MEM-1")
    );
    assert!(!after.can_submit);
    assert!(!after.can_check_availability);
}

#[tokio::test]
async fn failed_refetch_leaves_previous_pool_and_rows() {
    let api = InMemoryReservationApi::new(availability(&[("deluxe", 2, 180)]));
    let store = setup(&api);

    check(&store, date(4, 1), date(4, 3)).await;
    add_room(&store, "deluxe").await;
    let before = store.state(|s| (s.pool.clone(), s.selections.clone())).await;

    api.fail_next_availability(OtaError::Rejected {
        status: 500,
        message: None,
    });
    check(&store, date(5, 1), date(5, 4)).await;

    let (pool, selections, status, error) = store
        .state(|s| {
            (
                s.pool.clone(),
                s.selections.clone(),
                s.availability_request,
                s.last_error.clone(),
            )
        })
        .await;
    assert_eq!((pool, selections), before);
    assert_eq!(status, RequestStatus::Idle);
    assert_eq!(error.as_deref(), Some("Failed to check availability"));
    assert_eq!(api.queries().len(), 2);
}

#[tokio::test]
async fn successful_refetch_discards_rows() {
    let api = InMemoryReservationApi::new(availability(&[("deluxe", 2, 180)]));
    let store = setup(&api);

    check(&store, date(4, 1), date(4, 3)).await;
    add_room(&store, "deluxe").await;

    api.set_availability(availability(&[("standard", 5, 95)]));
    check(&store, date(6, 1), date(6, 2)).await;

    let view = view(&store).await;
    assert!(view.rows.is_empty());
    assert_eq!(view.nights, Some(1));
    assert_eq!(view.availability_summary.len(), 1);
    assert_eq!(view.availability_summary[0].name, "Standard Queen");
}

#[tokio::test]
async fn rejected_reservation_keeps_everything_for_retry() {
    let api = InMemoryReservationApi::new(availability(&[("deluxe", 1, 180)]));
    let store = setup(&api);

    check(&store, date(7, 1), date(7, 5)).await;
    add_room(&store, "deluxe").await;

    api.fail_next_reservation(OtaError::Rejected {
        status: 409,
        message: Some("Not enough rooms available for Deluxe King".into()),
    });
    send(&store, FormAction::Submit).await;

    let failed = view(&store).await;
    assert_eq!(
        failed.error.as_deref(),
        Some("Not enough rooms available for Deluxe King")
    );
    assert_eq!(failed.rows.len(), 1);
    assert!(failed.can_submit);
    assert!(!failed.submitting);

    // Retry goes through once the server accepts
    send(&store, FormAction::Submit).await;
    assert_eq!(api.reservations().len(), 2);
    assert!(store.state(FormState::is_completed).await);
}

#[tokio::test]
async fn submission_uses_the_checked_dates_not_the_edited_inputs() {
    let api = InMemoryReservationApi::new(availability(&[("suite", 1, 320)]));
    let store = setup(&api);

    check(&store, date(8, 10), date(8, 14)).await;
    add_room(&store, "suite").await;
    send(&store, FormAction::SetCheckOut(Some(date(8, 20)))).await;
    send(&store, FormAction::Submit).await;

    let request = api.reservations().pop().unwrap();
    assert_eq!(request.check_in, date(8, 10));
    assert_eq!(request.check_out, date(8, 14));
}

#[tokio::test]
async fn invalid_dates_never_reach_the_server() {
    let api = InMemoryReservationApi::default();
    let store = setup(&api);

    check(&store, date(9, 3), date(9, 3)).await;

    assert!(api.queries().is_empty());
    let error = store.state(|s| s.last_error.clone()).await;
    assert_eq!(error.as_deref(), Some("Check-out must be after check-in"));
}

#[tokio::test]
async fn reset_after_completion_starts_over() {
    let api = InMemoryReservationApi::new(availability(&[("deluxe", 1, 180)]));
    let store = setup(&api);

    check(&store, date(10, 1), date(10, 2)).await;
    add_room(&store, "deluxe").await;
    send(&store, FormAction::Submit).await;
    send(&store, FormAction::Reset).await;

    let state = store.state(FormState::clone).await;
    assert_eq!(state, FormState::default());
}
