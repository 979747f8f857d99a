//! # Ticketdesk Core
//!
//! Core types shared by every ticketdesk crate.
//!
//! This crate holds the data-transfer records mirrored from the ticketing
//! backend, the response envelope every endpoint wraps its payload in, the
//! localized message catalog, and the environment traits through which the
//! rest of the workspace reaches the outside world.
//!
//! ## Core Concepts
//!
//! - **Envelope**: `{status, message, data, error}` wrapper returned by every API call
//! - **DTOs**: Event, Ticket, Attendee, Payment, User, Calendar and Image records
//! - **Environment**: Injected dependencies (`Clock`, `KeyValueStorage`) via traits
//!
//! The client never fabricates server-assigned identifiers. Id newtypes can
//! only be obtained by deserializing a response or wrapping a `Uuid` that
//! came from one.
//!
//! ## Example
//!
//! ```
//! use ticketdesk_core::envelope::Envelope;
//! use ticketdesk_core::types::EventResponse;
//!
//! let json = r#"{"status":"error","message":"Event not found","error":{"code":404}}"#;
//! let envelope: Envelope<EventResponse> = serde_json::from_str(json).unwrap();
//! assert!(!envelope.is_success());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};

/// Response envelope and normalized API error
pub mod envelope;

/// Date, currency and wire-format helpers
pub mod format;

/// Server-assigned identifier newtypes
pub mod ids;

/// Locales, message catalog and status labels
pub mod messages;

/// Data-transfer records exchanged with the backend
pub mod types;

pub use envelope::{ApiError, Envelope, EnvelopeStatus, Page};
pub use messages::{Locale, MessageKey};

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// where they are needed, so tests can substitute deterministic versions.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Errors raised by a [`KeyValueStorage`] backend.
    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    pub enum StorageError {
        /// Underlying medium could not be read or written
        #[error("Storage I/O failed: {0}")]
        Io(String),

        /// Persisted contents are not in the expected format
        #[error("Storage contents are corrupt: {0}")]
        Corrupt(String),

        /// Internal lock was poisoned by a panicking writer
        #[error("Storage lock poisoned")]
        LockPoisoned,
    }

    /// Durable string key-value storage.
    ///
    /// Mirrors the browser's local storage: values survive a reload of the
    /// application and are removed explicitly on logout.
    pub trait KeyValueStorage: Send + Sync {
        /// Read the value stored under `key`.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Remove `key`. Removing a missing key is not an error.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}

#[cfg(test)]
mod tests {
    use super::environment::{Clock, SystemClock};

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
