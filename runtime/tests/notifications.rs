//! Notification lifecycle as seen by a subscriber.

#![allow(clippy::unwrap_used)] // Test code

use std::sync::Arc;
use std::time::Duration;
use ticketdesk_runtime::notifications::FADE_DURATION;
use ticketdesk_runtime::{NotificationCenter, NotificationEvent, NotificationKind, NotificationOptions};
use ticketdesk_testing::test_clock;

#[tokio::test(start_paused = true)]
async fn subscriber_sees_show_dismiss_and_remove() {
    let clock = test_clock();
    let center = NotificationCenter::with_clock(Arc::new(clock.clone()));
    let mut events = center.subscribe();

    let id = center.show(
        "Ticket reserved",
        NotificationOptions::new(NotificationKind::Success).with_timeout(Duration::from_secs(1)),
    );

    let NotificationEvent::Shown(shown) = events.recv().await.unwrap() else {
        unreachable!("first event announces the notification");
    };
    assert_eq!(shown.id, id);
    assert_eq!(shown.created_at, ticketdesk_core::environment::Clock::now(&clock));
    assert!((shown.progress - 100.0).abs() < f64::EPSILON);

    tokio::time::sleep(Duration::from_millis(1010)).await;
    assert_eq!(events.recv().await.unwrap(), NotificationEvent::Dismissed(id));
    assert!(!center.get(id).unwrap().visible);

    tokio::time::sleep(FADE_DURATION).await;
    assert_eq!(events.recv().await.unwrap(), NotificationEvent::Removed(id));
    assert!(center.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closing_early_cancels_expiry() {
    let center = NotificationCenter::new();
    let mut events = center.subscribe();

    let keep = center.show("Saved", NotificationOptions::default().sticky());
    let close = center.error("Network error");
    events.recv().await.unwrap();
    events.recv().await.unwrap();

    center.close(close);
    assert_eq!(events.recv().await.unwrap(), NotificationEvent::Dismissed(close));
    center.close(close);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(events.recv().await.unwrap(), NotificationEvent::Removed(close));
    assert!(events.try_recv().is_err());

    let remaining = center.notifications();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);
    center.shutdown();
}

#[tokio::test(start_paused = true)]
async fn closing_mid_countdown_freezes_progress_and_fades_out() {
    let center = NotificationCenter::new();
    let id = center.info("Seats released");

    tokio::time::sleep(Duration::from_millis(200)).await;
    let before = center.get(id).unwrap();
    assert!(before.visible);
    assert!(before.progress < 100.0);

    center.close(id);
    let frozen = center.get(id).unwrap();
    assert!(!frozen.visible);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let later = center.get(id).unwrap();
    assert!((later.progress - frozen.progress).abs() < f64::EPSILON);

    tokio::time::sleep(FADE_DURATION).await;
    assert!(center.get(id).is_none());
}
