//! `MapService` running on the browserless SDK.

#![allow(clippy::unwrap_used)] // Test code

use std::sync::Arc;
use ticketdesk_core::Locale;
use ticketdesk_maps::{
    Bounds, Coordinates, HeadlessSdkLoader, MapService, MapsConfig, SearchFocus, SearchOptions,
    handle_search_results,
};
use ticketdesk_testing::fixtures::{geo_object, geocoder_response};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn headless(server: &MockServer) -> MapService {
    let config = MapsConfig::default()
        .with_api_key("sdk-key")
        .with_geocoder_url(format!("{}/1.x/", server.uri()));
    let loader = HeadlessSdkLoader::new(&config, Locale::En);
    let maps = MapService::new(config, Locale::En, Arc::new(loader));
    maps.load().await.unwrap();
    maps
}

#[tokio::test]
async fn loads_without_components() {
    let server = MockServer::start().await;
    let maps = headless(&server).await;

    let loaded = maps.loaded().unwrap();
    assert!(loaded.base_components().components.is_empty());
    assert_eq!(loaded.component_sets().count(), 2);
}

#[tokio::test]
async fn search_goes_through_the_geocoder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("geocode", "Arbat"))
        .and(query_param("bbox", "19.484,41.185~191.014,81.858"))
        .and(query_param("lang", "en_US"))
        .and(query_param_is_missing("results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![
            geo_object("Arbat 10", "Moscow", "", "37.59 55.75"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let maps = headless(&server).await;
    let results = maps.search("Arbat", SearchOptions::default()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].properties.name, "Arbat 10");
    assert_eq!(results[0].properties.description, "Moscow");
    let Some(SearchFocus::Select { location, .. }) = handle_search_results(&results) else {
        unreachable!("single result selects it");
    };
    assert_eq!(location.center, Some(Coordinates(37.59, 55.75)));
}

#[tokio::test]
async fn search_honors_bounds_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("bbox", "37.5,55.5~38,56"))
        .and(query_param("results", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let maps = headless(&server).await;
    let bounds = Bounds {
        south_west: Coordinates(37.5, 55.5),
        north_east: Coordinates(38.0, 56.0),
    };
    let results = maps
        .search("cafe", SearchOptions::default().bounded_by(bounds).with_limit(3))
        .await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn geocoder_failure_yields_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let maps = headless(&server).await;
    assert!(maps.search("Arbat", SearchOptions::default()).await.is_empty());
}
