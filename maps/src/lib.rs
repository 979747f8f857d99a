//! # Ticketdesk Maps
//!
//! Location search for the checkout and event-editing flows.
//!
//! The map SDK itself is a third-party script. This crate only drives it
//! through the [`sdk::SdkLoader`] and [`sdk::MapSdk`] ports: it loads the SDK
//! exactly once, wraps its search with a country-wide bounding box and turns
//! search results into map viewport changes. Address suggestions and
//! (reverse) geocoding go through the vendor's REST geocoder.
//!
//! ## Example
//!
//! ```ignore
//! let maps = MapService::new(MapsConfig::from_env(), Locale::Ru, loader);
//! maps.load().await?;
//! let suggestions = maps.suggestions("Москва, Тверская").await?;
//! ```

/// Map SDK and geocoder configuration
pub mod config;

/// Error types
pub mod error;

/// REST geocoder client
pub mod geocoder;

/// Browserless SDK backed by the geocoder
pub mod headless;

/// Map SDK ports
pub mod sdk;

/// Loader and search facade
pub mod service;

/// Coordinates, bounds and viewport changes
pub mod viewport;

pub use config::MapsConfig;
pub use error::MapsError;
pub use geocoder::{AddressSuggestion, Geocoder, ReverseGeocode};
pub use headless::{HeadlessSdk, HeadlessSdkLoader};
pub use sdk::{ComponentSet, MapSdk, SdkFuture, SdkLoader, SearchOptions};
pub use service::{LoadedMap, MapService};
pub use viewport::{
    Bounds, COUNTRY_BOUNDS, Coordinates, Geometry, MapLocation, SearchFocus, SearchProperties,
    SearchResult, calculate_bounds, handle_search_results,
};
