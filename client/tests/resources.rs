//! Resource modules against a mocked backend.

#![allow(clippy::unwrap_used)] // Test code

use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticketdesk_client::{AppContext, ClientConfig, ClientError, LoadingKey, RequestOptions};
use ticketdesk_core::ids::{EventId, ImageId, UserId};
use ticketdesk_core::types::{
    EventFilterRequest, EventSearchRequest, ImageAddRequest, ImageFile, ImageMetadata,
    PaginationRequest, ReserveTicketRequest, TicketStatus,
};
use ticketdesk_core::{ApiError, Locale, MessageKey};
use ticketdesk_runtime::NotificationKind;
use ticketdesk_testing::fixtures::{
    event, failure, failure_with_error, id, image, page, success, success_without_data, ticket,
};
use ticketdesk_testing::helpers::init_test_tracing;
use ticketdesk_testing::{InMemoryStorage, MockMapSdk, MockSdkLoader};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base: &str) -> ClientConfig {
    ClientConfig::default()
        .with_api_base_url(base)
        .with_search_debounce(Duration::from_millis(50))
}

fn app_with(config: ClientConfig) -> AppContext {
    init_test_tracing();
    let loader = MockSdkLoader::new(Arc::new(MockMapSdk::new()));
    AppContext::new(config, Arc::new(InMemoryStorage::new()), Arc::new(loader)).unwrap()
}

fn app(server: &MockServer) -> AppContext {
    app_with(config(&format!("{}/api", server.uri())))
}

fn notices(app: &AppContext) -> Vec<(NotificationKind, String)> {
    app.notifications()
        .notifications()
        .into_iter()
        .map(|n| (n.kind, n.message))
        .collect()
}

#[tokio::test]
async fn search_caches_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/search"))
        .and(header("accept-language", "ru"))
        .and(body_string_contains(r#""title":["Jazz"]"#))
        .and(body_string_contains(r#""pagination":{"pageNumber":2,"pageSize":2}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(
            vec![event(id(1), "Jazz night"), event(id(2), "Jazz brunch")],
            7,
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    let filter = EventFilterRequest {
        title: vec!["Jazz".to_string()],
        ..EventFilterRequest::default()
    };
    let request = EventSearchRequest::new(filter).with_pagination(PaginationRequest::new(2, 2));
    let page = app.events.search(&request, RequestOptions::new()).await.unwrap().unwrap();

    assert_eq!(page.total_count, 7);
    assert_eq!(page.items.len(), 2);
    assert_eq!(app.events.items(), page.items);
    assert_eq!(app.events.total_count(), 7);
    assert_eq!(app.events.error(), None);
    assert!(!app.events.is_loading());
    assert!(notices(&app).is_empty());
}

#[tokio::test]
async fn get_caches_a_single_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/events/{}", id(3))))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(event(id(3), "Opera"))))
        .mount(&server)
        .await;

    let app = app(&server);
    let event = app
        .events
        .get(EventId::from_uuid(id(3)), RequestOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(event.title, "Opera");
    assert_eq!(app.events.data(), Some(event));
    assert!(app.events.items().is_empty());
}

#[tokio::test]
async fn network_failure_is_cached_and_announced() {
    let app = app_with(config("http://127.0.0.1:1/api"));
    let message = Locale::Ru.message(MessageKey::NetworkError);

    let err = app
        .events
        .get(EventId::from_uuid(id(1)), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert_eq!(app.events.error(), Some(ApiError::network(message)));
    assert_eq!(notices(&app), vec![(NotificationKind::Error, message.to_string())]);
    assert!(!app.events.is_loading_key(LoadingKey::Get));
}

#[tokio::test]
async fn malformed_success_body_is_reported_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let app = app(&server);
    let unexpected = Locale::Ru.message(MessageKey::Unexpected);
    let err = app
        .events
        .get(EventId::from_uuid(id(1)), RequestOptions::new())
        .await
        .unwrap_err();

    let ClientError::Api { code, message } = err else {
        unreachable!("undecodable bodies surface as API errors");
    };
    assert_eq!(code, 200);
    assert_eq!(message, unexpected);
    assert_eq!(app.events.error(), Some(ApiError::new(200, unexpected)));
    assert_eq!(app.events.data(), None);
}

#[tokio::test]
async fn failure_envelope_with_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failure("Event not found")))
        .mount(&server)
        .await;

    let app = app(&server);
    let err = app
        .events
        .get(EventId::from_uuid(id(1)), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { code: 400, ref message } if message == "Event not found"));
    assert_eq!(app.events.error(), Some(ApiError::new(400, "Event not found")));
    assert_eq!(notices(&app), vec![(NotificationKind::Error, "Event not found".to_string())]);
}

#[tokio::test]
async fn caller_error_message_wins_over_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failure("Event not found")))
        .mount(&server)
        .await;

    let app = app(&server);
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let options = RequestOptions::new()
        .with_error_message("Could not open the event")
        .on_error(move |error| *sink.lock().unwrap() = Some(error.clone()));

    app.events
        .get(EventId::from_uuid(id(1)), options)
        .await
        .unwrap_err();

    assert_eq!(
        notices(&app),
        vec![(NotificationKind::Error, "Could not open the event".to_string())]
    );
    assert_eq!(*seen.lock().unwrap(), Some(ApiError::new(400, "Event not found")));
}

#[tokio::test]
async fn error_status_keeps_the_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tickets/reserve"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(failure_with_error("Seats taken", 409, "No seats left")),
        )
        .mount(&server)
        .await;

    let app = app(&server);
    let request = ReserveTicketRequest {
        event_id: EventId::from_uuid(id(1)),
        user_id: UserId::from_uuid(id(2)),
        attendees: Vec::new(),
    };
    let err = app.tickets.reserve(&request, RequestOptions::new()).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { code: 409, .. }));
    assert_eq!(app.tickets.error(), Some(ApiError::new(409, "No seats left")));
    assert_eq!(notices(&app), vec![(NotificationKind::Error, "Seats taken".to_string())]);
}

#[tokio::test]
async fn error_status_without_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let app = app(&server);
    app.events
        .get(EventId::from_uuid(id(1)), RequestOptions::new().with_error_notification(false))
        .await
        .unwrap_err();

    assert_eq!(
        app.events.error(),
        Some(ApiError::new(502, "Request failed with status code 502"))
    );
    assert!(notices(&app).is_empty());
}

#[tokio::test]
async fn loading_flag_is_raised_while_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success(event(id(1), "Slow")))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let app = Arc::new(app(&server));
    let finished = Arc::new(AtomicBool::new(false));

    let call = {
        let app = Arc::clone(&app);
        let finished = Arc::clone(&finished);
        tokio::spawn(async move {
            let options = RequestOptions::new().on_finally(move || finished.store(true, Ordering::SeqCst));
            app.events.get(EventId::from_uuid(id(1)), options).await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(app.events.is_loading_key(LoadingKey::Get));
    assert!(!app.events.is_loading_key(LoadingKey::Search));
    assert!(!finished.load(Ordering::SeqCst));

    call.await.unwrap().unwrap();
    assert!(!app.events.is_loading());
    assert!(finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn mutations_announce_success_in_the_current_locale() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/images/{}", id(4))))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!(true))))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/images/{}", id(5))))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_without_data()))
        .mount(&server)
        .await;

    let app = app(&server);
    app.set_locale(Locale::En);

    app.images
        .delete(ImageId::from_uuid(id(4)), RequestOptions::new())
        .await
        .unwrap();
    app.images
        .delete(ImageId::from_uuid(id(5)), RequestOptions::new())
        .await
        .unwrap();
    app.images
        .delete(
            ImageId::from_uuid(id(4)),
            RequestOptions::new().with_success_message("Gone"),
        )
        .await
        .unwrap();

    assert_eq!(
        notices(&app),
        vec![
            (NotificationKind::Success, Locale::En.message(MessageKey::ImageDeleted).to_string()),
            (NotificationKind::Success, "Gone".to_string()),
        ]
    );
}

#[tokio::test]
async fn reservation_returns_short_tickets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tickets/reserve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([
            {"id": id(10), "status": "Reserved"},
            {"id": id(11), "status": "Reserved"}
        ]))))
        .mount(&server)
        .await;

    let app = app(&server);
    let request = ReserveTicketRequest {
        event_id: EventId::from_uuid(id(1)),
        user_id: UserId::from_uuid(id(2)),
        attendees: Vec::new(),
    };
    let tickets = app
        .tickets
        .reserve(&request, RequestOptions::new().with_success_notification(false))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tickets.len(), 2);
    assert!(tickets.iter().all(|t| t.status == TicketStatus::Reserved));
    assert!(app.tickets.items().is_empty());
    assert!(notices(&app).is_empty());
}

#[tokio::test]
async fn my_tickets_sends_pagination_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/me"))
        .and(query_param("pageNumber", "3"))
        .and(query_param("pageSize", "5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success(page(vec![ticket(id(7), id(1))], 11))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    let page = app
        .tickets
        .my_tickets(PaginationRequest::new(3, 5), RequestOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.total_count, 11);
    assert_eq!(app.tickets.items()[0].event_id, EventId::from_uuid(id(1)));
}

#[tokio::test]
async fn newer_debounced_search_supersedes_older() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/search"))
        .and(body_string_contains("Rock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(
            vec![event(id(2), "Rock fest")],
            1,
        ))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/events/search"))
        .and(body_string_contains("Ro\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(vec![], 0))))
        .expect(0)
        .mount(&server)
        .await;

    let app = app(&server);
    let search = |title: &str| {
        EventSearchRequest::new(EventFilterRequest {
            title: vec![title.to_string()],
            ..EventFilterRequest::default()
        })
    };

    let (older, newer) = tokio::join!(
        app.events.search_debounced(search("Ro"), RequestOptions::new()),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.events.search_debounced(search("Rock"), RequestOptions::new()).await
        }
    );

    assert!(matches!(older, Err(ClientError::Superseded(_))));
    assert_eq!(newer.unwrap().unwrap().items[0].title, "Rock fest");
    assert_eq!(app.events.total_count(), 1);
}

#[tokio::test]
async fn cancelled_debounced_search_never_reaches_the_server() {
    let server = MockServer::start().await;
    let app = app(&server);

    let (pending, ()) = tokio::join!(
        app.events.search_debounced(EventSearchRequest::default(), RequestOptions::new()),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.events.cancel_debounced();
        }
    );

    assert!(matches!(pending, Err(ClientError::Superseded(_))));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!app.events.is_loading());
}

#[tokio::test]
async fn reset_state_clears_cached_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/events/{}", id(3))))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(event(id(3), "Opera"))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/events/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(
            vec![event(id(1), "Ballet")],
            4,
        ))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/events/{}", id(9))))
        .respond_with(ResponseTemplate::new(404).set_body_json(failure("Not found")))
        .mount(&server)
        .await;

    let app = app(&server);
    app.events
        .get(EventId::from_uuid(id(3)), RequestOptions::new())
        .await
        .unwrap();
    app.events
        .search(&EventSearchRequest::default(), RequestOptions::new())
        .await
        .unwrap();
    app.events
        .get(EventId::from_uuid(id(9)), RequestOptions::new().with_error_notification(false))
        .await
        .unwrap_err();

    assert!(app.events.data().is_some());
    assert_eq!(app.events.items().len(), 1);
    assert_eq!(app.events.total_count(), 4);
    assert!(app.events.error().is_some());

    app.events.reset_state();

    assert_eq!(app.events.data(), None);
    assert!(app.events.items().is_empty());
    assert_eq!(app.events.total_count(), 0);
    assert_eq!(app.events.error(), None);
}

#[tokio::test]
async fn image_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/images"))
        .and(body_string_contains("name=\"image\"; filename=\"poster.png\""))
        .and(body_string_contains("name=\"imageType\""))
        .and(body_string_contains("poster"))
        .and(body_string_contains("name=\"localOrderRank\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(image(id(9), "poster"))))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    let request = ImageAddRequest {
        image: ImageFile::new("poster.png", "image/png", b"png-bytes".to_vec()),
        metadata: ImageMetadata {
            image_type: Some("poster".to_string()),
            ..ImageMetadata::default()
        },
    };
    let uploaded = app
        .images
        .upload(request, RequestOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(uploaded.id, ImageId::from_uuid(id(9)));
    assert_eq!(
        notices(&app),
        vec![(NotificationKind::Success, Locale::Ru.message(MessageKey::ImageUploaded).to_string())]
    );
}
