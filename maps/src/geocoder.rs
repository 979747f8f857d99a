//! REST geocoder client.
//!
//! Every request is confined to a bounding box with `rspn=1` and asks for JSON
//! in the configured locale. The box is [`COUNTRY_BOUNDS`](crate::viewport::COUNTRY_BOUNDS)
//! except for [`Geocoder::search`], which honors the caller's box.

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::sdk::SearchOptions;
use crate::viewport::{Bounds, COUNTRY_BOUNDS, Coordinates, Geometry, SearchProperties, SearchResult};
use metrics::counter;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ticketdesk_core::Locale;

/// Queries shorter than this (after trimming) get no suggestions.
pub const MIN_SUGGESTION_QUERY: usize = 3;

/// Number of suggestions requested.
pub const SUGGESTION_LIMIT: u32 = 10;

/// Object kinds requested for suggestions.
pub const SUGGESTION_KINDS: &str = "house,street,locality,metro,district";

/// Address suggestion for an autocomplete field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    /// Text shown in the dropdown
    pub title: String,
    /// Text written into the field when chosen
    pub value: String,
    /// Location, when the geocoder returned one
    pub coordinates: Option<Coordinates>,
}

/// Result of reverse geocoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseGeocode {
    /// Full formatted address
    pub address: String,
    /// Address components by kind (`country`, `locality`, `street`, `house`, ...)
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GeocoderResponse {
    response: GeocoderBody,
}

#[derive(Debug, Deserialize)]
struct GeocoderBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Default, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "Point")]
    point: Option<Point>,
    #[serde(rename = "metaDataProperty")]
    meta: Option<MetaDataProperty>,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

#[derive(Debug, Deserialize)]
struct MetaDataProperty {
    #[serde(rename = "GeocoderMetaData")]
    geocoder: Option<GeocoderMetaData>,
}

#[derive(Debug, Deserialize)]
struct GeocoderMetaData {
    #[serde(default)]
    text: String,
    #[serde(rename = "Address")]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    #[serde(rename = "Components", default)]
    components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    kind: String,
    name: String,
}

impl GeoObject {
    fn metadata(&self) -> Option<&GeocoderMetaData> {
        self.meta.as_ref().and_then(|meta| meta.geocoder.as_ref())
    }

    fn coordinates(&self) -> Option<Coordinates> {
        self.point.as_ref().and_then(|point| Coordinates::parse_pos(&point.pos))
    }

    /// Formatted text, else "name, description", else whichever is present.
    fn label(&self) -> Option<String> {
        if let Some(meta) = self.metadata().filter(|meta| !meta.text.is_empty()) {
            return Some(meta.text.clone());
        }
        match (self.name.is_empty(), self.description.is_empty()) {
            (false, false) => Some(format!("{}, {}", self.name, self.description)),
            (false, true) => Some(self.name.clone()),
            (true, false) => Some(self.description.clone()),
            (true, true) => None,
        }
    }
}

/// Geocoder HTTP client.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: Client,
    url: String,
    api_key: String,
    locale: Locale,
}

impl Geocoder {
    /// Client for the geocoder described by `config`.
    #[must_use]
    pub fn new(config: &MapsConfig, locale: Locale) -> Self {
        Self {
            http: Client::new(),
            url: config.geocoder_url.clone(),
            api_key: config.effective_geocoder_key().to_string(),
            locale,
        }
    }

    /// Address suggestions for a partially typed query.
    ///
    /// Queries shorter than [`MIN_SUGGESTION_QUERY`] characters return nothing
    /// without calling the geocoder.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Geocoder`] or [`MapsError::Decode`] if the request fails.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<AddressSuggestion>, MapsError> {
        if query.trim().chars().count() < MIN_SUGGESTION_QUERY {
            return Ok(Vec::new());
        }

        let results = SUGGESTION_LIMIT.to_string();
        let objects = self
            .fetch(
                "suggest",
                &COUNTRY_BOUNDS,
                &[
                    ("geocode", query),
                    ("results", results.as_str()),
                    ("kinds", SUGGESTION_KINDS),
                ],
            )
            .await?;

        Ok(objects
            .into_iter()
            .map(|object| {
                let label = object.label().unwrap_or_else(|| query.to_string());
                AddressSuggestion {
                    title: label.clone(),
                    value: label,
                    coordinates: object.coordinates(),
                }
            })
            .collect())
    }

    /// Coordinates of the best match for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Geocoder`] or [`MapsError::Decode`] if the request fails.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, MapsError> {
        let objects = self
            .fetch("geocode", &COUNTRY_BOUNDS, &[("geocode", address), ("results", "1")])
            .await?;
        Ok(objects.first().and_then(GeoObject::coordinates))
    }

    /// Address at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Geocoder`] or [`MapsError::Decode`] if the request fails.
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<Option<ReverseGeocode>, MapsError> {
        let point = format!("{},{}", coordinates.lng(), coordinates.lat());
        let objects = self
            .fetch("reverse", &COUNTRY_BOUNDS, &[("geocode", point.as_str())])
            .await?;

        Ok(objects.into_iter().next().map(|object| {
            let meta = object.metadata();
            let address = meta
                .map(|meta| meta.text.clone())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| point.clone());
            let details = meta
                .and_then(|meta| meta.address.as_ref())
                .map(|address| {
                    address
                        .components
                        .iter()
                        .map(|component| (component.kind.clone(), component.name.clone()))
                        .collect()
                })
                .unwrap_or_default();
            ReverseGeocode { address, details }
        }))
    }

    /// Places matching `query`, shaped like SDK search results.
    ///
    /// Objects the geocoder returns without a point keep `geometry: None`.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Geocoder`] or [`MapsError::Decode`] if the request fails.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, MapsError> {
        let bounds = options.bounded_by.unwrap_or(COUNTRY_BOUNDS);
        let limit = options.limit.map(|limit| limit.to_string());
        let mut params = vec![("geocode", query)];
        if let Some(limit) = limit.as_deref() {
            params.push(("results", limit));
        }

        let objects = self.fetch("search", &bounds, &params).await?;
        Ok(objects
            .into_iter()
            .map(|object| SearchResult {
                geometry: object.coordinates().map(|coordinates| Geometry { coordinates }),
                properties: SearchProperties {
                    name: object.name,
                    description: object.description,
                },
            })
            .collect())
    }

    async fn fetch(
        &self,
        operation: &'static str,
        bounds: &Bounds,
        params: &[(&str, &str)],
    ) -> Result<Vec<GeoObject>, MapsError> {
        let bbox = bounds.to_bbox_param();
        let mut query: Vec<(&str, &str)> = vec![("apikey", self.api_key.as_str()), ("format", "json")];
        query.extend_from_slice(params);
        query.extend([("bbox", bbox.as_str()), ("rspn", "1"), ("lang", self.locale.map_lang())]);

        tracing::debug!(operation, "Geocoder request");
        counter!("ticketdesk_geocoder_requests_total", "operation" => operation).increment(1);

        let response = self
            .http
            .get(&self.url)
            .query(&query)
            .send()
            .await
            .map_err(|e| MapsError::Geocoder(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(operation, status = status.as_u16(), "Geocoder returned an error status");
            return Err(MapsError::Geocoder(format!("HTTP error! status: {}", status.as_u16())));
        }

        let body: GeocoderResponse = response
            .json()
            .await
            .map_err(|e| MapsError::Decode(e.to_string()))?;

        Ok(body
            .response
            .collection
            .members
            .into_iter()
            .map(|member| member.geo_object)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> GeoObject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_label_prefers_formatted_text() {
        let geo = object(json!({
            "name": "Tverskaya 1",
            "description": "Moscow",
            "metaDataProperty": {"GeocoderMetaData": {"text": "Russia, Moscow, Tverskaya 1"}}
        }));
        assert_eq!(geo.label().as_deref(), Some("Russia, Moscow, Tverskaya 1"));
    }

    #[test]
    fn test_label_joins_name_and_description() {
        let geo = object(json!({"name": "Tverskaya 1", "description": "Moscow"}));
        assert_eq!(geo.label().as_deref(), Some("Tverskaya 1, Moscow"));
        assert_eq!(object(json!({"description": "Moscow"})).label().as_deref(), Some("Moscow"));
        assert_eq!(object(json!({})).label(), None);
    }

    #[test]
    fn test_point_pos_is_lng_lat() {
        let geo = object(json!({"Point": {"pos": "37.617 55.755"}}));
        assert_eq!(geo.coordinates(), Some(Coordinates(37.617, 55.755)));
    }

    #[tokio::test]
    async fn test_short_query_skips_request() {
        let geocoder = Geocoder::new(
            &MapsConfig::default().with_geocoder_url("http://127.0.0.1:1/unreachable"),
            Locale::Ru,
        );
        assert!(geocoder.suggestions("  ab  ").await.unwrap().is_empty());
    }
}
