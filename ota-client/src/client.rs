//! OTA reservation server client implementation

use crate::{
    error::OtaError,
    messages::{
        AvailabilityQuery, AvailabilityResponse, ErrorBody, ReservationReceipt, ReservationRequest,
    },
};
use reqwest::{Client, Response};

/// Header the server uses to identify the booking agency
pub const REMOTE_USER_HEADER: &str = "X-Remote-User";

/// Client for the OTA availability and reservation endpoints
#[derive(Debug, Clone)]
pub struct OtaClient {
    client: Client,
    base_url: String,
    remote_user: Option<String>,
}

impl OtaClient {
    /// Create a client for the server at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            remote_user: None,
        }
    }

    /// Identify requests as coming from `user`
    #[must_use]
    pub fn with_remote_user(mut self, user: impl Into<String>) -> Self {
        self.remote_user = Some(user.into());
        self
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch availability for a date range
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or a body
    /// that is not an availability map
    #[tracing::instrument(skip(self), fields(check_in = %query.check_in, check_out = %query.check_out))]
    pub async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityResponse, OtaError> {
        let response = self.post("/ota/availability", query).await?;
        let response = Self::ensure_success(response).await?;

        response
            .json::<AvailabilityResponse>()
            .await
            .map_err(|e| OtaError::ResponseParseFailed(e.to_string()))
    }

    /// Create a reservation
    ///
    /// A success status with a body that does not decode yields an empty
    /// receipt: the reservation exists even if its id is unknown.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or non-success statuses
    #[tracing::instrument(skip(self, request), fields(rooms = request.rooms.len()))]
    pub async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationReceipt, OtaError> {
        let response = self.post("/ota/create", request).await?;
        let response = Self::ensure_success(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| OtaError::ResponseParseFailed(e.to_string()))?;

        Ok(serde_json::from_str(&body).unwrap_or_else(|error| {
            tracing::warn!(%error, "Reservation created but receipt body did not decode");
            ReservationReceipt::default()
        }))
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, OtaError> {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("content-type", "application/json")
            .json(body);

        if let Some(user) = &self.remote_user {
            request = request.header(REMOTE_USER_HEADER, user);
        }

        request
            .send()
            .await
            .map_err(|e| OtaError::RequestFailed(e.to_string()))
    }

    async fn ensure_success(response: Response) -> Result<Response, OtaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);

        tracing::debug!(status = status.as_u16(), ?message, "Server rejected request");
        Err(OtaError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
