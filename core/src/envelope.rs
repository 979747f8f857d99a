//! Response envelope shared by every backend endpoint.
//!
//! The backend wraps each payload as `{status, message, data?, error?}`.
//! `status` is the only success discriminant; HTTP status codes are treated as
//! transport detail by the executor.

use crate::format::lenient_u64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Success discriminant of an [`Envelope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// Request succeeded; `data` carries the payload (if any)
    Success,
    /// Backend rejected the request; `message`/`error` describe why
    Error,
}

/// Wrapper returned by every API call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Success discriminant
    pub status: EnvelopeStatus,
    /// Human-readable message (localized by the backend)
    #[serde(default)]
    pub message: Option<String>,
    /// Payload on success
    #[serde(default = "none")]
    pub data: Option<T>,
    /// Structured error on failure
    #[serde(default)]
    pub error: Option<ApiError>,
}

const fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Whether the backend reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, EnvelopeStatus::Success)
    }

    /// Successful envelope carrying `data`.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope with a message and optional structured error.
    #[must_use]
    pub fn failure(message: impl Into<String>, error: Option<ApiError>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            message: Some(message.into()),
            data: None,
            error,
        }
    }

    /// Normalized error for a failed envelope.
    ///
    /// Prefers the structured `error` body, filling an empty message from the
    /// envelope message; falls back to `{code: fallback_code, message}`.
    #[must_use]
    pub fn to_api_error(&self, fallback_code: i32) -> ApiError {
        match &self.error {
            Some(err) if err.message.is_empty() => ApiError {
                code: err.code,
                message: self.message.clone().unwrap_or_default(),
            },
            Some(err) => err.clone(),
            None => ApiError {
                code: fallback_code,
                message: self.message.clone().unwrap_or_default(),
            },
        }
    }
}

/// Normalized error stored by resource modules and handed to callbacks.
///
/// `code == 0` marks a network failure: no response was received.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct ApiError {
    /// HTTP-like status code, `0` for network failures
    #[serde(default)]
    pub code: i32,
    /// Human-readable description
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    /// Code used for transport failures where no response arrived.
    pub const NETWORK_CODE: i32 = 0;

    /// Create a new error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Network failure with the given (localized) message.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(Self::NETWORK_CODE, message)
    }

    /// Whether this error describes a missing response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        self.code == Self::NETWORK_CODE
    }
}

/// Paginated search result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    #[serde(deserialize_with = "lenient_u64")]
    pub total_count: u64,
    /// Requested page size
    #[serde(default)]
    pub page_size: u32,
    /// One-based page number
    #[serde(default)]
    pub page_number: u32,
}

impl<T> Page<T> {
    /// Page holding `items` with the total equal to their count.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        let total_count = items.len() as u64;
        Self {
            items,
            total_count,
            page_size: 0,
            page_number: 1,
        }
    }
}
