//! # Ticketdesk Testing
//!
//! Testing utilities shared by the ticketdesk crates.
//!
//! This crate provides:
//! - Mock implementations of the environment traits ([`FixedClock`], [`InMemoryStorage`])
//! - A [`RecordingFocus`] that remembers which form fields were focused
//! - Scriptable map SDK mocks ([`MockSdkLoader`], [`MockMapSdk`])
//! - JSON fixtures for backend envelopes and records ([`fixtures`])
//! - Property-based testing strategies ([`properties`])
//!
//! ## Example
//!
//! ```
//! use ticketdesk_core::environment::KeyValueStorage;
//! use ticketdesk_testing::InMemoryStorage;
//!
//! let storage = InMemoryStorage::new();
//! storage.set("auth_token", "t").unwrap();
//!
//! // A clone shares contents, which is how tests simulate a reload.
//! let reloaded = storage.clone();
//! assert_eq!(reloaded.get("auth_token").unwrap().as_deref(), Some("t"));
//! ```

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Mock locks only panic if a test already did

use chrono::{DateTime, Utc};
use ticketdesk_core::environment::Clock;

/// Map SDK mocks
pub mod map_mocks;

/// Backend JSON fixtures
pub mod fixtures;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use ticketdesk_core::environment::{KeyValueStorage, StorageError};
    use ticketdesk_runtime::FieldFocus;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticketdesk_testing::mocks::FixedClock;
    /// use ticketdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    /// In-memory key-value storage.
    ///
    /// Clones share contents, so handing a clone to a second component
    /// simulates the application restarting on the same storage.
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryStorage {
        data: Arc<Mutex<HashMap<String, String>>>,
        fail_writes: Arc<AtomicBool>,
        failing_keys: Arc<Mutex<HashSet<String>>>,
    }

    impl InMemoryStorage {
        /// Create a new empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Storage pre-populated with `entries`.
        #[must_use]
        pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
            let storage = Self::new();
            storage.data.lock().unwrap().extend(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value.to_string())),
            );
            storage
        }

        /// Make every following `set`/`remove` fail with [`StorageError::Io`].
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Make every following `set`/`remove` of `key` fail.
        pub fn fail_writes_to(&self, key: &str) {
            self.failing_keys.lock().unwrap().insert(key.to_string());
        }

        /// Snapshot of one entry, bypassing the trait.
        #[must_use]
        pub fn peek(&self, key: &str) -> Option<String> {
            self.data.lock().unwrap().get(key).cloned()
        }

        /// Number of stored entries.
        #[must_use]
        pub fn len(&self) -> usize {
            self.data.lock().unwrap().len()
        }

        /// Whether nothing is stored.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check_writable(&self, key: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) || self.failing_keys.lock().unwrap().contains(key) {
                Err(StorageError::Io("writes disabled by test".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check_writable(key)?;
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.check_writable(key)?;
            self.data.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// [`FieldFocus`] that records every focused field.
    #[derive(Debug, Default)]
    pub struct RecordingFocus {
        focused: Mutex<Vec<String>>,
    }

    impl RecordingFocus {
        /// Create a new recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Fields focused so far, oldest first.
        #[must_use]
        pub fn focused(&self) -> Vec<String> {
            self.focused.lock().unwrap().clone()
        }

        /// Most recently focused field.
        #[must_use]
        pub fn last(&self) -> Option<String> {
            self.focused.lock().unwrap().last().cloned()
        }
    }

    impl FieldFocus for RecordingFocus {
        fn focus(&self, field: &str) {
            self.focused.lock().unwrap().push(field.to_string());
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static TRACING: Once = Once::new();

    /// Install a test-friendly tracing subscriber once per process.
    ///
    /// Output goes through the test harness writer and honors `RUST_LOG`.
    pub fn init_test_tracing() {
        TRACING.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_test_writer()
                .try_init();
        });
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use ticketdesk_maps::{Coordinates, SearchResult};

    /// Any valid `[lng, lat]` pair.
    pub fn coordinates() -> impl Strategy<Value = Coordinates> {
        (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(lng, lat)| Coordinates(lng, lat))
    }

    /// Search results, roughly a fifth of them without geometry.
    pub fn search_results(max: usize) -> impl Strategy<Value = Vec<SearchResult>> {
        prop::collection::vec(
            (coordinates(), prop::bool::weighted(0.8)).prop_map(|(point, placed)| {
                let mut result = SearchResult::at(point, "p");
                if !placed {
                    result.geometry = None;
                }
                result
            }),
            0..max,
        )
    }
}

// Re-export commonly used items
pub use map_mocks::{MockMapSdk, MockSdkLoader};
pub use mocks::{FixedClock, InMemoryStorage, RecordingFocus, test_clock};
