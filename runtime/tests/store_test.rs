//! Store behaviour with a small lookup reducer: feedback of request results,
//! effect handles, observers and shutdown.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use room_desk_core::reducer::{Effects, Reducer};
use room_desk_core::{SmallVec, effect::Effect, smallvec};
use room_desk_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum LookupAction {
    /// Start a lookup that resolves after a short delay
    Lookup { key: u32 },
    /// The lookup came back
    Resolved { key: u32, value: u32 },
    /// Start two lookups one after the other
    LookupBoth { first: u32, second: u32 },
    /// Start several lookups at once
    LookupAll(Vec<u32>),
    /// A lookup that never answers in time
    Hang,
    /// Local edit with no side effects
    Note(String),
}

#[derive(Debug, Clone, Default)]
struct LookupState {
    in_flight: u32,
    resolved: Vec<(u32, u32)>,
    notes: Vec<String>,
}

struct LookupEnvironment {
    multiplier: u32,
}

struct LookupReducer;

fn lookup(key: u32, multiplier: u32) -> Effect<LookupAction> {
    Effect::Future(Box::pin(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Some(LookupAction::Resolved {
            key,
            value: key * multiplier,
        })
    }))
}

impl Reducer for LookupReducer {
    type State = LookupState;
    type Action = LookupAction;
    type Environment = LookupEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<LookupAction> {
        match action {
            LookupAction::Lookup { key } => {
                state.in_flight += 1;
                smallvec![lookup(key, env.multiplier)]
            },
            LookupAction::LookupBoth { first, second } => {
                state.in_flight += 2;
                smallvec![Effect::chain(vec![
                    lookup(first, env.multiplier),
                    lookup(second, env.multiplier),
                ])]
            },
            LookupAction::LookupAll(keys) => {
                state.in_flight += u32::try_from(keys.len()).unwrap_or(u32::MAX);
                smallvec![Effect::merge(
                    keys.into_iter().map(|k| lookup(k, env.multiplier)).collect()
                )]
            },
            LookupAction::Hang => smallvec![Effect::Future(Box::pin(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                None
            }))],
            LookupAction::Resolved { key, value } => {
                state.in_flight = state.in_flight.saturating_sub(1);
                state.resolved.push((key, value));
                SmallVec::new()
            },
            LookupAction::Note(note) => {
                state.notes.push(note);
                smallvec![Effect::None]
            },
        }
    }
}

fn store() -> Store<LookupState, LookupAction, LookupEnvironment, LookupReducer> {
    Store::new(
        LookupState::default(),
        LookupReducer,
        LookupEnvironment { multiplier: 10 },
    )
}

#[tokio::test]
async fn pure_action_updates_state_immediately() {
    let store = store();

    let handle = store.send(LookupAction::Note("late arrival".into())).await.unwrap();
    assert_eq!(handle.pending(), 0);

    let notes = store.state(|s| s.notes.clone()).await;
    assert_eq!(notes, vec!["late arrival".to_string()]);
}

#[tokio::test]
async fn future_effect_feeds_its_action_back() {
    let store = store();

    let mut handle = store.send(LookupAction::Lookup { key: 3 }).await.unwrap();
    assert_eq!(store.state(|s| s.in_flight).await, 1);

    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let (in_flight, resolved) = store.state(|s| (s.in_flight, s.resolved.clone())).await;
    assert_eq!(in_flight, 0);
    assert_eq!(resolved, vec![(3, 30)]);
}

#[tokio::test]
async fn sequential_effects_resolve_in_order() {
    let store = store();

    let mut handle = store
        .send(LookupAction::LookupBoth { first: 1, second: 2 })
        .await
        .unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let resolved = store.state(|s| s.resolved.clone()).await;
    assert_eq!(resolved, vec![(1, 10), (2, 20)]);
}

#[tokio::test]
async fn observers_see_every_reduced_action() {
    let store = store();
    let mut actions = store.subscribe_actions();

    let mut handle = store.send(LookupAction::Lookup { key: 4 }).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(actions.recv().await.unwrap(), LookupAction::Lookup { key: 4 });
    assert_eq!(
        actions.recv().await.unwrap(),
        LookupAction::Resolved { key: 4, value: 40 }
    );
}

#[tokio::test]
async fn completed_handle_does_not_block() {
    let mut handle = EffectHandle::completed();
    handle.wait_with_timeout(Duration::from_millis(50)).await.unwrap();
}

#[tokio::test]
async fn shutdown_waits_for_pending_effects_then_rejects_actions() {
    let store = store();

    let _handle = store.send(LookupAction::Lookup { key: 5 }).await.unwrap();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    // The in-flight lookup could not feed its result back once shutdown began
    let result = store.send(LookupAction::Note("after close".into())).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    assert!(store.state(|s| s.notes.is_empty()).await);
}

#[tokio::test]
async fn parallel_lookups_all_resolve_before_the_handle_returns() {
    let store = store();

    let mut handle = store.send(LookupAction::LookupAll(vec![1, 2, 3])).await.unwrap();
    assert_eq!(handle.pending(), 1);
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let (in_flight, mut resolved) = store.state(|s| (s.in_flight, s.resolved.clone())).await;
    resolved.sort_unstable();
    assert_eq!(in_flight, 0);
    assert_eq!(resolved, vec![(1, 10), (2, 20), (3, 30)]);
}

#[tokio::test]
async fn handle_wait_times_out_on_a_slow_effect() {
    let store = store();

    let mut handle = store.send(LookupAction::Hang).await.unwrap();
    let result = handle.wait_with_timeout(Duration::from_millis(20)).await;

    assert_eq!(result, Err(StoreError::Timeout));
    assert_eq!(handle.pending(), 1);
}

#[tokio::test]
async fn shutdown_reports_effects_left_running() {
    let store = store();

    let _handle = store.send(LookupAction::Hang).await.unwrap();
    let result = store.shutdown(Duration::from_millis(20)).await;

    assert_eq!(result, Err(StoreError::ShutdownTimeout(1)));
}
