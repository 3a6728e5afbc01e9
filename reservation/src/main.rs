//! Reservation desk demo binary
//!
//! Walks one reservation session against the configured server (or the
//! in-process one with `ROOM_DESK_OFFLINE=true`) and prints the form after
//! each step.

use anyhow::Context;
use chrono::Days;
use room_desk_client::{AvailabilityEntry, OtaClient};
use room_desk_core::environment::{Clock, SystemClock};
use room_desk_reservation::{
    AvailabilityCatalog, Config, FormAction, FormEnvironment, FormReducer, FormState, FormView,
    GuestDetails, InMemoryReservationApi, ReservationApi,
};
use room_desk_runtime::Store;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type FormStore = Store<FormState, FormAction, FormEnvironment, FormReducer>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| room_desk_reservation::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = Arc::new(config.load_catalog()?);
    let api = build_api(&config, &catalog);
    let clock = Arc::new(SystemClock);
    let today = clock.now().date_naive();

    let store = Store::new(
        FormState::default(),
        FormReducer::new(),
        FormEnvironment::new(clock, api, Arc::clone(&catalog)),
    );

    println!("=== Room Desk: new reservation ===");
    if config.offline {
        println!("(offline: using the in-process reservation server)");
    }

    let check_in = today
        .checked_add_days(Days::new(7))
        .context("check-in date out of range")?;
    let check_out = check_in
        .checked_add_days(Days::new(3))
        .context("check-out date out of range")?;

    step(&store, &catalog, FormAction::Reset).await?;
    step(&store, &catalog, FormAction::SetCheckIn(Some(check_in))).await?;
    step(&store, &catalog, FormAction::SetCheckOut(Some(check_out))).await?;
    step(&store, &catalog, FormAction::CheckAvailability).await?;

    // Two rooms, each taking the first type still offered to it
    for _ in 0..2 {
        step(&store, &catalog, FormAction::AddRoom).await?;
        let view = current_view(&store, &catalog).await;
        let Some(row) = view.rows.last() else { break };
        let Some(offer) = row.options.first() else {
            println!("Nothing left to offer for room {}", row.index + 1);
            break;
        };
        let action = FormAction::ChangeRoomType {
            row: row.index,
            room_type_id: Some(offer.room_type_id.clone()),
        };
        step(&store, &catalog, action).await?;
    }

    let view = current_view(&store, &catalog).await;
    if let Some(max) = view.rows.first().and_then(|r| r.guest_choices.last()) {
        step(&store, &catalog, FormAction::ChangeGuests { row: 0, guests: max.value }).await?;
    }

    let details = GuestDetails {
        first_name: "Margaret".to_string(),
        last_name: "Hamilton".to_string(),
        ota_ref: "DEMO-0001".to_string(),
        notes: "Adjoining rooms if possible".to_string(),
    };
    step(&store, &catalog, FormAction::SetGuestDetails(details)).await?;
    step(&store, &catalog, FormAction::Submit).await?;

    store.shutdown(Duration::from_secs(5)).await?;
    println!("\n=== Session finished ===");
    Ok(())
}

fn build_api(config: &Config, catalog: &AvailabilityCatalog) -> Arc<dyn ReservationApi> {
    if config.offline {
        let availability = catalog
            .iter()
            .zip(1u32..)
            .map(|(room_type, n)| {
                let rate = Decimal::from(80 + 40 * n);
                (room_type.id.clone(), AvailabilityEntry::new(n % 3 + 1, rate))
            })
            .collect();
        return Arc::new(InMemoryReservationApi::new(availability));
    }

    let client = OtaClient::new(config.api_url.clone());
    match &config.remote_user {
        Some(user) => Arc::new(client.with_remote_user(user.clone())),
        None => Arc::new(client),
    }
}

async fn current_view(store: &FormStore, catalog: &AvailabilityCatalog) -> FormView {
    store.state(|s| FormView::derive(s, catalog)).await
}

/// Send one action, wait for any request it started, and print the form
async fn step(
    store: &FormStore,
    catalog: &AvailabilityCatalog,
    action: FormAction,
) -> anyhow::Result<()> {
    println!("\n>>> {action:?}");
    let mut handle = store.send(action).await?;
    handle.wait_with_timeout(REQUEST_TIMEOUT).await?;

    print_view(&current_view(store, catalog).await);
    Ok(())
}

fn print_view(view: &FormView) {
    if let Some(nights) = view.nights {
        println!("  {nights} night(s)");
        for line in &view.availability_summary {
            println!("  {}: {} available at {}", line.name, line.available, line.rate);
        }
    }
    if let Some(message) = &view.availability_message {
        println!("  {message}");
    }

    for row in &view.rows {
        let options: Vec<&str> = row.options.iter().map(|o| o.label.as_str()).collect();
        let selected = row
            .selected
            .as_ref()
            .map_or("Select room...", |id| id.as_str());
        println!(
            "  Room {}: {selected} [{}], {} guest(s){}",
            row.index + 1,
            options.join(", "),
            row.guests,
            if row.guests_editable { "" } else { " (locked)" },
        );
    }

    if !view.rows.is_empty() {
        println!("  Estimated total: {}", view.estimated_total);
    }
    println!(
        "  [check availability: {}] [add room: {}] [confirm: {}]",
        view.can_check_availability, view.can_add_room, view.can_submit
    );
    if let Some(error) = &view.error {
        println!("  ! {error}");
    }
    if let Some(notice) = &view.notice {
        println!("  * {notice}");
    }
}
