//! Coordinates, bounding boxes and the viewport changes search results cause.
//!
//! Coordinates are `[longitude, latitude]` pairs, the order both the SDK and
//! the geocoder use.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Zoom level used when centering on a single search result.
pub const SINGLE_RESULT_ZOOM: u8 = 15;

/// Animation length for search-driven viewport changes.
pub const FOCUS_ANIMATION: Duration = Duration::from_millis(400);

/// Fraction of the span added on each side of computed bounds.
pub const BOUNDS_PADDING: f64 = 0.1;

/// Fixed box covering the whole country, used to constrain search.
pub const COUNTRY_BOUNDS: Bounds = Bounds {
    south_west: Coordinates(19.484, 41.185),
    north_east: Coordinates(191.014, 81.858),
};

/// `[longitude, latitude]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    /// Longitude.
    #[must_use]
    pub const fn lng(self) -> f64 {
        self.0
    }

    /// Latitude.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.1
    }

    /// Parse the geocoder's space-separated `"lng lat"` form.
    #[must_use]
    pub fn parse_pos(pos: &str) -> Option<Self> {
        let mut parts = pos.split_whitespace().map(str::parse::<f64>);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(lng)), Some(Ok(lat)), None) => Some(Self(lng, lat)),
            _ => None,
        }
    }
}

/// Axis-aligned box given by its south-west and north-east corners.
///
/// Serialized as `[[sw_lng, sw_lat], [ne_lng, ne_lat]]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Coordinates; 2]", into = "[Coordinates; 2]")]
pub struct Bounds {
    /// Minimum corner
    pub south_west: Coordinates,
    /// Maximum corner
    pub north_east: Coordinates,
}

impl Bounds {
    /// Geocoder `bbox` parameter: `"sw_lng,sw_lat~ne_lng,ne_lat"`.
    #[must_use]
    pub fn to_bbox_param(&self) -> String {
        format!(
            "{},{}~{},{}",
            self.south_west.0, self.south_west.1, self.north_east.0, self.north_east.1
        )
    }

    /// Whether `point` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south_west.0..=self.north_east.0).contains(&point.0)
            && (self.south_west.1..=self.north_east.1).contains(&point.1)
    }
}

impl From<[Coordinates; 2]> for Bounds {
    fn from([south_west, north_east]: [Coordinates; 2]) -> Self {
        Self {
            south_west,
            north_east,
        }
    }
}

impl From<Bounds> for [Coordinates; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.south_west, bounds.north_east]
    }
}

/// Point geometry of a search result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Location of the result
    pub coordinates: Coordinates,
}

/// Display properties of a search result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProperties {
    /// Short name, e.g. a street address
    #[serde(default)]
    pub name: String,
    /// Longer description, e.g. the city and region
    #[serde(default)]
    pub description: String,
}

/// One result of an SDK search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Location, absent for results the SDK could not place
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Display properties
    #[serde(default)]
    pub properties: SearchProperties,
}

impl SearchResult {
    /// Result at `coordinates` with the given name.
    #[must_use]
    pub fn at(coordinates: Coordinates, name: impl Into<String>) -> Self {
        Self {
            geometry: Some(Geometry { coordinates }),
            properties: SearchProperties {
                name: name.into(),
                description: String::new(),
            },
        }
    }

    /// Result coordinates, if placed.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.geometry.map(|geometry| geometry.coordinates)
    }
}

/// Requested change of the map viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapLocation {
    /// New center
    pub center: Option<Coordinates>,
    /// New zoom level
    pub zoom: Option<u8>,
    /// Box to fit into view
    pub bounds: Option<Bounds>,
    /// Animation length
    pub duration: Option<Duration>,
}

/// What the map should do after a search.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchFocus {
    /// Exactly one result: select it and center on it.
    Select {
        /// The selected result
        marker: SearchResult,
        /// Centered viewport
        location: MapLocation,
    },
    /// Several results: fit all of them into view.
    Fit(MapLocation),
}

/// Decide how the map reacts to a set of search results.
///
/// No results, or several results none of which has geometry, leave the map
/// untouched.
#[must_use]
pub fn handle_search_results(results: &[SearchResult]) -> Option<SearchFocus> {
    match results {
        [] => None,
        [only] => Some(SearchFocus::Select {
            marker: only.clone(),
            location: MapLocation {
                center: only.coordinates(),
                zoom: Some(SINGLE_RESULT_ZOOM),
                bounds: None,
                duration: Some(FOCUS_ANIMATION),
            },
        }),
        many => calculate_bounds(many).map(|bounds| {
            SearchFocus::Fit(MapLocation {
                center: None,
                zoom: None,
                bounds: Some(bounds),
                duration: Some(FOCUS_ANIMATION),
            })
        }),
    }
}

/// Bounding box of every result that has geometry, padded by
/// [`BOUNDS_PADDING`] of the span on each side.
///
/// Returns `None` when no result has geometry.
#[must_use]
pub fn calculate_bounds(markers: &[SearchResult]) -> Option<Bounds> {
    let mut points = markers.iter().filter_map(SearchResult::coordinates);
    let first = points.next()?;

    let (min, max) = points.fold((first, first), |(min, max), point| {
        (
            Coordinates(min.0.min(point.0), min.1.min(point.1)),
            Coordinates(max.0.max(point.0), max.1.max(point.1)),
        )
    });

    let pad_x = (max.0 - min.0) * BOUNDS_PADDING;
    let pad_y = (max.1 - min.1) * BOUNDS_PADDING;

    Some(Bounds {
        south_west: Coordinates(min.0 - pad_x, min.1 - pad_y),
        north_east: Coordinates(max.0 + pad_x, max.1 + pad_y),
    })
}
