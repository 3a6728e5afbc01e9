//! Error types for the OTA client

use thiserror::Error;

/// Errors that can occur when talking to the reservation server
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OtaError {
    /// The request never produced a response (connection refused, TLS, ...)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// A success response whose body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The server answered with a non-success status
    #[error("Server rejected request (status {status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected {
        /// HTTP status code
        status: u16,
        /// The `error` field of the response body, if there was one
        message: Option<String>,
    },
}

impl OtaError {
    /// The server's own error message, if it sent one
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            Self::RequestFailed(_) | Self::ResponseParseFailed(_) => None,
        }
    }

    /// Message to show an operator: the server's text verbatim, else `fallback`
    #[must_use]
    pub fn operator_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}
