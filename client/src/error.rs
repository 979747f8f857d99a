//! Error types for the ticketdesk client

use thiserror::Error;
use ticketdesk_core::ApiError;
use ticketdesk_core::environment::StorageError;
use ticketdesk_runtime::Superseded;

/// Errors that can occur when talking to the ticketing backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Backend reported a failure
    #[error("API error (code {code}): {message}")]
    Api {
        /// HTTP-like status code
        code: i32,
        /// Message reported by the backend
        message: String,
    },

    /// Request body could not be encoded
    #[error("Request encoding failed: {0}")]
    Encode(String),

    /// Persisted auth state could not be read or written
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A newer debounced call replaced this one
    #[error(transparent)]
    Superseded(#[from] Superseded),
}

impl ClientError {
    /// Whether the error means the request never got a response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Normalized `{code, message}` form of this error, if it came from a call.
    #[must_use]
    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            Self::Network(message) => Some(ApiError::network(message.clone())),
            Self::Api { code, message } => Some(ApiError::new(*code, message.clone())),
            _ => None,
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        if err.is_network() {
            Self::Network(err.message)
        } else {
            Self::Api {
                code: err.code,
                message: err.message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_code_maps_to_network_variant() {
        let err = ClientError::from(ApiError::network("offline"));
        assert!(err.is_network());
        assert_eq!(err.api_error(), Some(ApiError::new(0, "offline")));
    }

    #[test]
    fn test_server_error_keeps_code() {
        let err = ClientError::from(ApiError::new(409, "Already reserved"));
        assert!(matches!(err, ClientError::Api { code: 409, .. }));
        assert_eq!(err.to_string(), "API error (code 409): Already reserved");
    }
}
