//! Map SDK stand-in for hosts without a browser.
//!
//! Nothing is injected: the "script" is ready as soon as it is requested,
//! imported modules contribute no components, and searches are answered by
//! the REST geocoder. Command-line tools and servers use it to get the same
//! search behavior as the interactive map.

use crate::config::MapsConfig;
use crate::geocoder::Geocoder;
use crate::sdk::{ComponentSet, MapSdk, SdkFuture, SdkLoader, SearchOptions};
use crate::viewport::SearchResult;
use std::sync::Arc;
use ticketdesk_core::Locale;

/// [`MapSdk`] that renders nothing and searches through the geocoder.
#[derive(Debug, Clone)]
pub struct HeadlessSdk {
    geocoder: Geocoder,
}

impl HeadlessSdk {
    /// SDK searching through `geocoder`.
    #[must_use]
    pub const fn new(geocoder: Geocoder) -> Self {
        Self { geocoder }
    }
}

impl MapSdk for HeadlessSdk {
    fn ready(&self) -> SdkFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }

    fn import(&self, module: &str) -> SdkFuture<'_, ComponentSet> {
        let components = ComponentSet::new(module, Vec::<String>::new());
        Box::pin(async move { Ok(components) })
    }

    fn search(&self, query: &str, options: &SearchOptions) -> SdkFuture<'_, Vec<SearchResult>> {
        let query = query.to_string();
        let options = options.clone();
        Box::pin(async move { self.geocoder.search(&query, &options).await })
    }
}

/// [`SdkLoader`] handing out one shared [`HeadlessSdk`].
#[derive(Debug, Clone)]
pub struct HeadlessSdkLoader {
    sdk: Arc<HeadlessSdk>,
}

impl HeadlessSdkLoader {
    /// Loader whose SDK queries the geocoder described by `config`.
    #[must_use]
    pub fn new(config: &MapsConfig, locale: Locale) -> Self {
        Self {
            sdk: Arc::new(HeadlessSdk::new(Geocoder::new(config, locale))),
        }
    }
}

impl SdkLoader for HeadlessSdkLoader {
    fn inject_script(&self, src: &str) -> SdkFuture<'_, Arc<dyn MapSdk>> {
        tracing::debug!(src, "Headless map host, skipping script injection");
        let sdk: Arc<dyn MapSdk> = Arc::clone(&self.sdk) as _;
        Box::pin(async move { Ok(sdk) })
    }
}
