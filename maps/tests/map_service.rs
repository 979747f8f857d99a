//! Loader, search and geocoding behavior of `MapService`.

#![allow(clippy::unwrap_used)] // Test code

use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::Locale;
use ticketdesk_maps::{
    COUNTRY_BOUNDS, Coordinates, MapService, MapsConfig, MapsError, SearchFocus, SearchOptions,
    SearchResult, handle_search_results,
};
use ticketdesk_maps::config::{DEFAULT_BINDINGS_MODULE, DEFAULT_UI_THEME_MODULE};
use ticketdesk_testing::fixtures::{geo_object, geocoder_response};
use ticketdesk_testing::{MockMapSdk, MockSdkLoader};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(sdk: Arc<MockMapSdk>, config: MapsConfig) -> (MapService, Arc<MockSdkLoader>) {
    let loader = Arc::new(MockSdkLoader::new(sdk));
    let service = MapService::new(config, Locale::Ru, Arc::clone(&loader) as _);
    (service, loader)
}

#[tokio::test(start_paused = true)]
async fn concurrent_loads_inject_the_script_once() {
    let sdk = Arc::new(MockMapSdk::new());
    let (maps, loader) = service(Arc::clone(&sdk), MapsConfig::default().with_api_key("key"));
    let maps = Arc::new(maps);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let maps = Arc::clone(&maps);
        handles.push(tokio::spawn(async move { maps.load().await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(loader.injections(), 1);
    assert_eq!(
        loader.sources(),
        vec!["https://api-maps.yandex.ru/v3/?apikey=key&lang=ru_RU".to_string()]
    );
    assert!(maps.is_loaded());

    maps.load().await.unwrap();
    assert_eq!(loader.injections(), 1);
    assert_eq!(sdk.imports(), vec![DEFAULT_BINDINGS_MODULE, DEFAULT_UI_THEME_MODULE]);
}

#[tokio::test(start_paused = true)]
async fn ui_theme_failure_keeps_base_components() {
    let sdk = Arc::new(MockMapSdk::new().fail_import(DEFAULT_UI_THEME_MODULE));
    let (maps, _) = service(sdk, MapsConfig::default());

    let loaded = maps.load().await.unwrap();
    assert_eq!(loaded.base_components().module, DEFAULT_BINDINGS_MODULE);
    assert!(loaded.ui_components().is_none());
    assert_eq!(loaded.component_sets().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn bindings_failure_fails_the_load() {
    let sdk = Arc::new(MockMapSdk::new().fail_import(DEFAULT_BINDINGS_MODULE));
    let (maps, _) = service(sdk, MapsConfig::default());

    assert!(matches!(maps.load().await, Err(MapsError::Load(_))));
    assert!(!maps.is_loaded());
}

#[tokio::test(start_paused = true)]
async fn failed_load_can_be_retried() {
    let sdk = Arc::new(MockMapSdk::new());
    let loader = Arc::new(MockSdkLoader::new(sdk).failing(1).with_delay(Duration::from_millis(5)));
    let maps = MapService::new(MapsConfig::default(), Locale::En, Arc::clone(&loader) as _);

    assert!(matches!(maps.load().await, Err(MapsError::Load(_))));
    assert!(maps.loaded().is_none());

    maps.load().await.unwrap();
    assert_eq!(loader.injections(), 2);
    assert!(maps.is_loaded());
}

#[tokio::test(start_paused = true)]
async fn search_defaults_to_country_bounds() {
    let results = vec![SearchResult::at(Coordinates(37.6, 55.7), "Tverskaya")];
    let sdk = Arc::new(MockMapSdk::new().with_results(results.clone()));
    let (maps, _) = service(Arc::clone(&sdk), MapsConfig::default());

    assert!(maps.search("Tverskaya", SearchOptions::default()).await.is_empty());

    maps.load().await.unwrap();
    assert_eq!(maps.search("Tverskaya", SearchOptions::default()).await, results);

    let mut narrowed = COUNTRY_BOUNDS;
    narrowed.north_east = Coordinates(40.0, 60.0);
    maps.search("Nevsky", SearchOptions::default().bounded_by(narrowed).with_limit(3))
        .await;

    let searches = sdk.searches();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[0].1.bounded_by, Some(COUNTRY_BOUNDS));
    assert_eq!(searches[1].1.bounded_by, Some(narrowed));
    assert_eq!(searches[1].1.limit, Some(3));
}

#[tokio::test(start_paused = true)]
async fn search_errors_yield_no_results() {
    let sdk = Arc::new(MockMapSdk::new().fail_search());
    let (maps, _) = service(sdk, MapsConfig::default());
    maps.load().await.unwrap();

    assert!(maps.search("anything", SearchOptions::default()).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_results_drive_the_viewport() {
    let sdk = Arc::new(MockMapSdk::new().with_results(vec![
        SearchResult::at(Coordinates(30.3, 59.9), "Saint Petersburg"),
        SearchResult::at(Coordinates(37.6, 55.7), "Moscow"),
    ]));
    let (maps, _) = service(sdk, MapsConfig::default());
    maps.load().await.unwrap();

    let results = maps.search("city", SearchOptions::default()).await;
    let Some(SearchFocus::Fit(location)) = handle_search_results(&results) else {
        unreachable!("two results should fit bounds");
    };
    let bounds = location.bounds.unwrap();
    assert!(bounds.contains(Coordinates(30.3, 59.9)));
    assert!(bounds.contains(Coordinates(37.6, 55.7)));
}

#[tokio::test]
async fn geocoder_requires_loaded_sdk() {
    let (maps, _) = service(Arc::new(MockMapSdk::new()), MapsConfig::default());

    assert_eq!(maps.suggestions("Moscow").await, Err(MapsError::NotLoaded));
    assert_eq!(maps.geocode("Moscow").await, Err(MapsError::NotLoaded));
    assert_eq!(
        maps.reverse_geocode(Coordinates(37.6, 55.7)).await,
        Err(MapsError::NotLoaded)
    );
}

async fn loaded_with_geocoder(server: &MockServer) -> MapService {
    let config = MapsConfig::default()
        .with_api_key("sdk-key")
        .with_geocoder_url(format!("{}/1.x/", server.uri()));
    let (maps, _) = service(Arc::new(MockMapSdk::new()), config);
    maps.load().await.unwrap();
    maps
}

#[tokio::test]
async fn suggestions_query_the_geocoder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("apikey", "sdk-key"))
        .and(query_param("format", "json"))
        .and(query_param("geocode", "Тверская"))
        .and(query_param("results", "10"))
        .and(query_param("kinds", "house,street,locality,metro,district"))
        .and(query_param("bbox", "19.484,41.185~191.014,81.858"))
        .and(query_param("rspn", "1"))
        .and(query_param("lang", "ru_RU"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![
            geo_object("Tverskaya 1", "Moscow", "Russia, Moscow, Tverskaya 1", "37.611 55.757"),
            geo_object("Tverskaya", "Tver", "", "35.9 56.85"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    let suggestions = maps.suggestions("Тверская").await.unwrap();

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].title, "Russia, Moscow, Tverskaya 1");
    assert_eq!(suggestions[0].coordinates, Some(Coordinates(37.611, 55.757)));
    assert_eq!(suggestions[1].value, "Tverskaya, Tver");
}

#[tokio::test]
async fn short_suggestion_query_skips_the_geocoder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    assert!(maps.suggestions(" Мо ").await.unwrap().is_empty());
}

#[tokio::test]
async fn geocode_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("results", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![
            geo_object("Red Square", "Moscow", "Russia, Moscow, Red Square", "37.6208 55.7539"),
        ])))
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    assert_eq!(
        maps.geocode("Red Square").await.unwrap(),
        Some(Coordinates(37.6208, 55.7539))
    );
}

#[tokio::test]
async fn geocode_without_matches_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![])))
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    assert_eq!(maps.geocode("nowhere").await.unwrap(), None);
    assert_eq!(maps.reverse_geocode(Coordinates(0.0, 0.0)).await.unwrap(), None);
}

#[tokio::test]
async fn reverse_geocode_collects_address_components() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("geocode", "37.6208,55.7539"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![
            geo_object("Red Square", "Moscow", "Russia, Moscow, Red Square", "37.6208 55.7539"),
        ])))
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    let found = maps
        .reverse_geocode(Coordinates(37.6208, 55.7539))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.address, "Russia, Moscow, Red Square");
    assert_eq!(found.details.get("locality").map(String::as_str), Some("Moscow"));
    assert_eq!(found.details.get("street").map(String::as_str), Some("Red Square"));
}

#[tokio::test]
async fn reverse_geocode_falls_back_to_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoder_response(vec![
            geo_object("", "", "", "37.5 55.5"),
        ])))
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    let found = maps.reverse_geocode(Coordinates(37.5, 55.5)).await.unwrap().unwrap();
    assert_eq!(found.address, "37.5,55.5");
}

#[tokio::test]
async fn geocoder_http_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    assert!(matches!(maps.geocode("Moscow").await, Err(MapsError::Geocoder(_))));
    assert!(matches!(maps.suggestions("Moscow").await, Err(MapsError::Geocoder(_))));
    assert!(matches!(
        maps.reverse_geocode(Coordinates(37.6, 55.7)).await,
        Err(MapsError::Geocoder(_))
    ));
}

#[tokio::test]
async fn geocoder_garbage_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let maps = loaded_with_geocoder(&server).await;
    assert!(matches!(maps.geocode("Moscow").await, Err(MapsError::Decode(_))));
}
