//! Reservation server abstraction
//!
//! The reducer talks to the server through [`ReservationApi`] so tests and the
//! offline demo can swap the HTTP client for [`InMemoryReservationApi`].

use futures::FutureExt;
use futures::future::BoxFuture;
use room_desk_client::{
    AvailabilityEntry, AvailabilityQuery, AvailabilityResponse, OtaClient, OtaError,
    ReservationReceipt, ReservationRequest, RoomTypeId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

/// Result of a server call
pub type ApiResult<T> = Result<T, OtaError>;

/// The two server endpoints behind the form
pub trait ReservationApi: Send + Sync {
    /// Availability for a date range
    ///
    /// # Errors
    ///
    /// Returns the client error when the lookup fails
    fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> BoxFuture<'static, ApiResult<AvailabilityResponse>>;

    /// Create a reservation
    ///
    /// # Errors
    ///
    /// Returns the client error when the server refuses or cannot be reached
    fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> BoxFuture<'static, ApiResult<ReservationReceipt>>;
}

impl ReservationApi for OtaClient {
    fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> BoxFuture<'static, ApiResult<AvailabilityResponse>> {
        let client = self.clone();
        async move { OtaClient::check_availability(&client, &query).await }.boxed()
    }

    fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> BoxFuture<'static, ApiResult<ReservationReceipt>> {
        let client = self.clone();
        async move { OtaClient::create_reservation(&client, &request).await }.boxed()
    }
}

#[derive(Debug, Default)]
struct InMemoryInner {
    availability: HashMap<RoomTypeId, AvailabilityEntry>,
    availability_failures: VecDeque<OtaError>,
    reservation_failures: VecDeque<OtaError>,
    queries: Vec<AvailabilityQuery>,
    reservations: Vec<ReservationRequest>,
}

/// Scriptable in-process server
///
/// Answers availability from a fixed map and accepts every reservation,
/// unless a failure has been queued for the next call. Every request is
/// recorded. Clones share the same script and records.
///
/// # Example
///
/// ```ignore
/// let api = InMemoryReservationApi::with_availability([("deluxe", 2, dec!(180))]);
/// api.fail_next_reservation(OtaError::Rejected { status: 409, message: None });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryReservationApi {
    inner: Arc<Mutex<InMemoryInner>>,
}

impl InMemoryReservationApi {
    /// Create an API that reports the given availability
    #[must_use]
    pub fn new(availability: HashMap<RoomTypeId, AvailabilityEntry>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryInner {
                availability,
                ..InMemoryInner::default()
            })),
        }
    }

    /// Create an API from `(id, available, rate)` triples
    #[must_use]
    pub fn with_availability<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32, rust_decimal::Decimal)>,
        S: Into<RoomTypeId>,
    {
        Self::new(
            entries
                .into_iter()
                .map(|(id, available, rate)| (id.into(), AvailabilityEntry::new(available, rate)))
                .collect(),
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the availability later lookups report
    pub fn set_availability(&self, availability: HashMap<RoomTypeId, AvailabilityEntry>) {
        self.lock().availability = availability;
    }

    /// Make the next availability lookup fail
    pub fn fail_next_availability(&self, error: OtaError) {
        self.lock().availability_failures.push_back(error);
    }

    /// Make the next reservation fail
    pub fn fail_next_reservation(&self, error: OtaError) {
        self.lock().reservation_failures.push_back(error);
    }

    /// Availability lookups received so far
    #[must_use]
    pub fn queries(&self) -> Vec<AvailabilityQuery> {
        self.lock().queries.clone()
    }

    /// Reservation requests received so far
    #[must_use]
    pub fn reservations(&self) -> Vec<ReservationRequest> {
        self.lock().reservations.clone()
    }
}

impl ReservationApi for InMemoryReservationApi {
    fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> BoxFuture<'static, ApiResult<AvailabilityResponse>> {
        let mut inner = self.lock();
        inner.queries.push(query);

        let result = match inner.availability_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(AvailabilityResponse {
                availability: inner.availability.clone(),
            }),
        };
        futures::future::ready(result).boxed()
    }

    fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> BoxFuture<'static, ApiResult<ReservationReceipt>> {
        let mut inner = self.lock();
        inner.reservations.push(request);

        let result = match inner.reservation_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(ReservationReceipt {
                success: true,
                reservation_id: Some(format!("MEM-{}", inner.reservations.len())),
            }),
        };
        futures::future::ready(result).boxed()
    }
}
