//! Scriptable stand-ins for the map SDK ports.
//!
//! ```
//! use std::sync::Arc;
//! use ticketdesk_testing::{MockMapSdk, MockSdkLoader};
//!
//! let sdk = Arc::new(MockMapSdk::new().fail_import("@yandex/ymaps3-default-ui-theme"));
//! let loader = MockSdkLoader::new(Arc::clone(&sdk));
//! assert_eq!(loader.injections(), 0);
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticketdesk_maps::{ComponentSet, MapSdk, MapsError, SdkFuture, SdkLoader, SearchOptions, SearchResult};

/// Mock SDK returning canned search results.
#[derive(Debug, Default)]
pub struct MockMapSdk {
    results: Mutex<Vec<SearchResult>>,
    failing_modules: Mutex<HashSet<String>>,
    fail_ready: bool,
    fail_search: bool,
    imports: Mutex<Vec<String>>,
    searches: Mutex<Vec<(String, SearchOptions)>>,
}

impl MockMapSdk {
    /// SDK whose searches return nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches return `results`.
    #[must_use]
    pub fn with_results(self, results: Vec<SearchResult>) -> Self {
        *self.results.lock().unwrap() = results;
        self
    }

    /// Importing `module` fails.
    #[must_use]
    pub fn fail_import(self, module: &str) -> Self {
        self.failing_modules.lock().unwrap().insert(module.to_string());
        self
    }

    /// The readiness signal fails.
    #[must_use]
    pub const fn fail_ready(mut self) -> Self {
        self.fail_ready = true;
        self
    }

    /// Every search fails.
    #[must_use]
    pub const fn fail_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Modules imported so far, in order.
    #[must_use]
    pub fn imports(&self) -> Vec<String> {
        self.imports.lock().unwrap().clone()
    }

    /// Searches issued so far with the options the SDK received.
    #[must_use]
    pub fn searches(&self) -> Vec<(String, SearchOptions)> {
        self.searches.lock().unwrap().clone()
    }
}

impl MapSdk for MockMapSdk {
    fn ready(&self) -> SdkFuture<'_, ()> {
        let result = if self.fail_ready {
            Err(MapsError::Load("ready rejected".to_string()))
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }

    fn import(&self, module: &str) -> SdkFuture<'_, ComponentSet> {
        self.imports.lock().unwrap().push(module.to_string());
        let result = if self.failing_modules.lock().unwrap().contains(module) {
            Err(MapsError::Load(format!("cannot import {module}")))
        } else {
            Ok(ComponentSet::new(module, [format!("{module}#default")]))
        };
        Box::pin(async move { result })
    }

    fn search(&self, query: &str, options: &SearchOptions) -> SdkFuture<'_, Vec<SearchResult>> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), options.clone()));
        let result = if self.fail_search {
            Err(MapsError::Load("search rejected".to_string()))
        } else {
            Ok(self.results.lock().unwrap().clone())
        };
        Box::pin(async move { result })
    }
}

/// Mock loader that hands out one [`MockMapSdk`].
///
/// Injection takes `delay` of (Tokio) time so concurrent first calls overlap.
#[derive(Debug)]
pub struct MockSdkLoader {
    sdk: Arc<MockMapSdk>,
    delay: Duration,
    failures_left: AtomicUsize,
    injections: AtomicUsize,
    sources: Mutex<Vec<String>>,
}

impl MockSdkLoader {
    /// Loader that injects successfully after 50 ms.
    #[must_use]
    pub const fn new(sdk: Arc<MockMapSdk>) -> Self {
        Self {
            sdk,
            delay: Duration::from_millis(50),
            failures_left: AtomicUsize::new(0),
            injections: AtomicUsize::new(0),
            sources: Mutex::new(Vec::new()),
        }
    }

    /// Change the injection delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The next `count` injections fail.
    #[must_use]
    pub fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Number of script injections attempted.
    #[must_use]
    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    /// Script URLs injected so far.
    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        self.sources.lock().unwrap().clone()
    }
}

impl SdkLoader for MockSdkLoader {
    fn inject_script(&self, src: &str) -> SdkFuture<'_, Arc<dyn MapSdk>> {
        self.injections.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().unwrap().push(src.to_string());
        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        let sdk: Arc<dyn MapSdk> = Arc::clone(&self.sdk) as Arc<dyn MapSdk>;
        let delay = self.delay;

        Box::pin(async move {
            tokio::time::sleep(delay).await;
            if fail {
                Err(MapsError::Load("script failed to load".to_string()))
            } else {
                Ok(sdk)
            }
        })
    }
}
