//! Ports through which the map SDK is driven.
//!
//! The SDK is a script executed by the host (a browser page, a webview or a
//! headless renderer). The host implements these traits; this crate never
//! talks to the script directly.
//!
//! # Dyn Compatibility
//!
//! Methods return boxed futures instead of using `async fn` so the traits can
//! be used as `Arc<dyn SdkLoader>` and `Arc<dyn MapSdk>`.

use crate::error::MapsError;
use crate::viewport::{Bounds, SearchResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by the SDK ports.
pub type SdkFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MapsError>> + Send + 'a>>;

/// Components an imported SDK module contributes to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentSet {
    /// Module the components came from
    pub module: String,
    /// Exported component names
    pub components: Vec<String>,
}

impl ComponentSet {
    /// Set of `components` exported by `module`.
    #[must_use]
    pub fn new<I, S>(module: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into(),
            components: components.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options forwarded to [`MapSdk::search`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Box the search is restricted to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounded_by: Option<Bounds>,
    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchOptions {
    /// Restrict the search to `bounds`.
    #[must_use]
    pub const fn bounded_by(mut self, bounds: Bounds) -> Self {
        self.bounded_by = Some(bounds);
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Injects the SDK script into the host.
pub trait SdkLoader: Send + Sync {
    /// Inject the script at `src` and resolve with the SDK handle once the
    /// script has executed.
    ///
    /// Hosts where the SDK is already present return the existing handle
    /// without injecting anything.
    fn inject_script(&self, src: &str) -> SdkFuture<'_, Arc<dyn MapSdk>>;
}

/// Loaded SDK.
pub trait MapSdk: Send + Sync {
    /// Resolves once the SDK has finished its own initialization.
    fn ready(&self) -> SdkFuture<'_, ()>;

    /// Import an SDK submodule and bind it into renderable components.
    fn import(&self, module: &str) -> SdkFuture<'_, ComponentSet>;

    /// Geographic search.
    fn search(&self, query: &str, options: &SearchOptions) -> SdkFuture<'_, Vec<SearchResult>>;
}
