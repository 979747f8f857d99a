//! Form validation driven the way field widgets drive it.

#![allow(clippy::unwrap_used)] // Test code

use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::{Locale, MessageKey};
use ticketdesk_runtime::{FormValidation, NotificationCenter, NotificationKind, SubmitOutcome};
use ticketdesk_testing::RecordingFocus;

/// Spawn a widget that answers every trigger for `field` with `valid`.
fn widget(form: &Arc<FormValidation>, field: &'static str, valid: bool) {
    let mut trigger = form.watch_trigger(field).unwrap();
    let form = Arc::clone(form);
    tokio::spawn(async move {
        while trigger.changed().await.is_ok() {
            form.update_validation_state(field, valid);
        }
    });
}

fn checkout_form(center: &NotificationCenter, focus: &Arc<RecordingFocus>) -> Arc<FormValidation> {
    Arc::new(
        FormValidation::new(
            ["fullName", "birthDate", "documentNumber"],
            center.clone(),
            Arc::clone(focus) as _,
            Locale::En,
        )
        .with_settle_delay(Duration::from_millis(50)),
    )
}

#[tokio::test(start_paused = true)]
async fn invalid_form_focuses_first_bad_field_and_warns() {
    let center = NotificationCenter::new();
    let focus = Arc::new(RecordingFocus::new());
    let form = checkout_form(&center, &focus);
    widget(&form, "fullName", true);
    widget(&form, "birthDate", false);
    widget(&form, "documentNumber", false);

    let outcome = form
        .handle_submit(|| async { Ok::<_, String>("submitted") })
        .await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(focus.focused(), vec!["birthDate"]);
    let shown = center.notifications();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, NotificationKind::Error);
    assert_eq!(shown[0].message, Locale::En.message(MessageKey::FormHasErrors));
    center.shutdown();
}

#[tokio::test(start_paused = true)]
async fn valid_form_submits() {
    let center = NotificationCenter::new();
    let focus = Arc::new(RecordingFocus::new());
    let form = checkout_form(&center, &focus);
    for field in ["fullName", "birthDate", "documentNumber"] {
        widget(&form, field, true);
    }

    let outcome = form.handle_submit(|| async { Ok::<_, String>(42) }).await;

    assert_eq!(outcome, SubmitOutcome::Submitted(42));
    assert!(focus.focused().is_empty());
    assert!(center.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_submit_is_announced() {
    let center = NotificationCenter::new();
    let focus = Arc::new(RecordingFocus::new());
    let form = checkout_form(&center, &focus);
    for field in ["fullName", "birthDate", "documentNumber"] {
        widget(&form, field, true);
    }

    let outcome = form
        .handle_submit(|| async { Err::<(), _>("Seats taken".to_string()) })
        .await;
    assert_eq!(outcome, SubmitOutcome::Failed("Seats taken".to_string()));

    let outcome = form.handle_submit(|| async { Err::<(), _>(String::new()) }).await;
    let fallback = Locale::En.message(MessageKey::SubmitError).to_string();
    assert_eq!(outcome, SubmitOutcome::Failed(fallback.clone()));

    let messages: Vec<String> = center.notifications().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec![fallback, "Seats taken".to_string()]);
    center.shutdown();
}

#[tokio::test(start_paused = true)]
async fn reset_requires_fields_to_report_again() {
    let center = NotificationCenter::new();
    let focus = Arc::new(RecordingFocus::new());
    let form = checkout_form(&center, &focus);
    for field in ["fullName", "birthDate", "documentNumber"] {
        form.update_validation_state(field, true);
    }
    assert_eq!(form.first_invalid_field(), None);

    form.reset_validation();
    assert_eq!(form.first_invalid_field(), Some("fullName"));
    assert!(!form.validate_form().await);
    assert_eq!(focus.last().as_deref(), Some("fullName"));
}
