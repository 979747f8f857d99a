//! Map SDK loader and search facade.

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::geocoder::{AddressSuggestion, Geocoder, ReverseGeocode};
use crate::sdk::{ComponentSet, MapSdk, SdkLoader, SearchOptions};
use crate::viewport::{COUNTRY_BOUNDS, Coordinates, SearchResult};
use std::fmt;
use std::sync::Arc;
use ticketdesk_core::Locale;
use ticketdesk_runtime::LazyInit;

/// Handle to a loaded SDK with its renderable components.
#[derive(Clone)]
pub struct LoadedMap {
    sdk: Arc<dyn MapSdk>,
    base: ComponentSet,
    ui_theme: Option<ComponentSet>,
}

impl LoadedMap {
    /// The SDK.
    #[must_use]
    pub fn sdk(&self) -> &Arc<dyn MapSdk> {
        &self.sdk
    }

    /// Base map components.
    #[must_use]
    pub const fn base_components(&self) -> &ComponentSet {
        &self.base
    }

    /// UI theme components, absent if the theme failed to import.
    #[must_use]
    pub const fn ui_components(&self) -> Option<&ComponentSet> {
        self.ui_theme.as_ref()
    }

    /// Every registered component set, base first.
    pub fn component_sets(&self) -> impl Iterator<Item = &ComponentSet> {
        std::iter::once(&self.base).chain(self.ui_theme.as_ref())
    }
}

impl fmt::Debug for LoadedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedMap")
            .field("base", &self.base.module)
            .field("ui_theme", &self.ui_theme.as_ref().map(|set| &set.module))
            .finish_non_exhaustive()
    }
}

/// Entry point of the map integration.
///
/// Loading is exactly-once: concurrent callers of [`MapService::load`] share
/// one in-flight load, later callers get the loaded handle immediately, and a
/// failed load is forgotten so the next call retries.
pub struct MapService {
    config: Arc<MapsConfig>,
    locale: Locale,
    loader: Arc<dyn SdkLoader>,
    loaded: LazyInit<LoadedMap, MapsError>,
    geocoder: Geocoder,
}

impl MapService {
    /// Service that loads the SDK through `loader`.
    #[must_use]
    pub fn new(config: MapsConfig, locale: Locale, loader: Arc<dyn SdkLoader>) -> Self {
        let geocoder = Geocoder::new(&config, locale);
        Self {
            config: Arc::new(config),
            locale,
            loader,
            loaded: LazyInit::new(),
            geocoder,
        }
    }

    /// Whether the SDK has finished loading.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_ready()
    }

    /// Loaded handle, if loading has finished.
    #[must_use]
    pub fn loaded(&self) -> Option<LoadedMap> {
        self.loaded.get()
    }

    /// Load the SDK, or join the load already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Load`] if the script, its readiness signal or the
    /// bindings module fails, and [`MapsError::Config`] for a bad script URL.
    /// A UI theme import failure is not an error: the map is usable with base
    /// components only.
    pub async fn load(&self) -> Result<LoadedMap, MapsError> {
        let config = Arc::clone(&self.config);
        let loader = Arc::clone(&self.loader);
        let locale = self.locale;

        self.loaded
            .get_or_try_init(move || async move { load_sdk(&config, locale, loader.as_ref()).await })
            .await
    }

    /// SDK search restricted to [`COUNTRY_BOUNDS`] unless `options` names
    /// another box.
    ///
    /// Failures, including searching before the SDK is loaded, are logged and
    /// produce no results.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Vec<SearchResult> {
        let Some(loaded) = self.loaded.get() else {
            tracing::warn!("Map search requested before the SDK was loaded");
            return Vec::new();
        };

        let options = SearchOptions {
            bounded_by: options.bounded_by.or(Some(COUNTRY_BOUNDS)),
            ..options
        };

        match loaded.sdk.search(query, &options).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(error = %e, "Map search failed");
                Vec::new()
            },
        }
    }

    /// Address suggestions for an autocomplete field.
    ///
    /// Unlike [`MapService::search`], geocoder failures are returned rather
    /// than turned into an empty list; the same holds for
    /// [`MapService::geocode`] and [`MapService::reverse_geocode`].
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::NotLoaded`] before the SDK has loaded, otherwise
    /// any geocoder error.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<AddressSuggestion>, MapsError> {
        self.ensure_loaded()?;
        self.geocoder.suggestions(query).await
    }

    /// Coordinates of `address`.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::NotLoaded`] before the SDK has loaded, otherwise
    /// any geocoder error.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, MapsError> {
        self.ensure_loaded()?;
        self.geocoder.geocode(address).await
    }

    /// Address at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::NotLoaded`] before the SDK has loaded, otherwise
    /// any geocoder error.
    pub async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<ReverseGeocode>, MapsError> {
        self.ensure_loaded()?;
        self.geocoder.reverse(coordinates).await
    }

    fn ensure_loaded(&self) -> Result<(), MapsError> {
        if self.loaded.is_ready() {
            Ok(())
        } else {
            Err(MapsError::NotLoaded)
        }
    }
}

impl fmt::Debug for MapService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapService")
            .field("locale", &self.locale)
            .field("loaded", &self.loaded.is_ready())
            .field("loading", &self.loaded.is_pending())
            .finish_non_exhaustive()
    }
}

async fn load_sdk(config: &MapsConfig, locale: Locale, loader: &dyn SdkLoader) -> Result<LoadedMap, MapsError> {
    let src = config.script_src(locale)?;
    tracing::info!(script = %config.script_url, "Loading map SDK");

    let sdk = loader.inject_script(src.as_str()).await.map_err(into_load_error)?;
    sdk.ready().await.map_err(into_load_error)?;

    let base = sdk
        .import(&config.bindings_module)
        .await
        .map_err(|e| MapsError::Load(format!("importing {}: {e}", config.bindings_module)))?;

    let ui_theme = match sdk.import(&config.ui_theme_module).await {
        Ok(components) => Some(components),
        Err(e) => {
            tracing::warn!(module = %config.ui_theme_module, error = %e, "UI theme unavailable, using base components only");
            None
        },
    };

    tracing::info!(ui_theme = ui_theme.is_some(), "Map SDK loaded");
    Ok(LoadedMap { sdk, base, ui_theme })
}

fn into_load_error(err: MapsError) -> MapsError {
    match err {
        MapsError::Load(_) => err,
        other => MapsError::Load(other.to_string()),
    }
}
