//! Form validation coordinator.
//!
//! Field widgets validate themselves. The coordinator asks them to, through a
//! per-field trigger counter, then collects the verdicts they report back with
//! [`FormValidation::update_validation_state`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ticketdesk_core::Locale;
//! use ticketdesk_runtime::notifications::NotificationCenter;
//! use ticketdesk_runtime::validation::{FormValidation, NoopFocus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let form = FormValidation::new(
//!     ["email", "password"],
//!     NotificationCenter::new(),
//!     Arc::new(NoopFocus),
//!     Locale::En,
//! );
//! form.update_validation_state("email", true);
//! form.update_validation_state("password", true);
//! assert!(form.validate_form().await);
//! # }
//! ```

use crate::notifications::NotificationCenter;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use ticketdesk_core::{Locale, MessageKey};
use tokio::sync::watch;

/// Time given to fields to report back after a validation trigger.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Moves the user's attention to a field.
///
/// In a graphical client this scrolls the field into view and focuses its
/// input; a terminal client might highlight it.
pub trait FieldFocus: Send + Sync {
    /// Bring `field` into view and focus it.
    fn focus(&self, field: &str);
}

/// [`FieldFocus`] that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFocus;

impl FieldFocus for NoopFocus {
    fn focus(&self, _field: &str) {}
}

/// Result of [`FormValidation::handle_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// At least one field was invalid; nothing was submitted
    Invalid,
    /// The submit action succeeded
    Submitted(T),
    /// The submit action failed with the message shown to the user
    Failed(String),
}

impl<T> SubmitOutcome<T> {
    /// Whether the submit action ran and succeeded.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

struct Field {
    name: String,
    valid: watch::Sender<bool>,
    trigger: watch::Sender<u64>,
}

/// Validation state for a fixed set of fields.
pub struct FormValidation {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    notifications: NotificationCenter,
    focus: Arc<dyn FieldFocus>,
    locale: Locale,
    settle_delay: Duration,
}

impl FormValidation {
    /// Coordinator for `fields`, in the order they appear on screen.
    ///
    /// Every field starts invalid.
    #[must_use]
    pub fn new<I, S>(
        fields: I,
        notifications: NotificationCenter,
        focus: Arc<dyn FieldFocus>,
        locale: Locale,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut declared = Vec::new();
        for name in fields {
            let name = name.into();
            if index.contains_key(&name) {
                continue;
            }
            index.insert(name.clone(), declared.len());
            declared.push(Field {
                name,
                valid: watch::channel(false).0,
                trigger: watch::channel(0).0,
            });
        }

        Self {
            fields: declared,
            index,
            notifications,
            focus,
            locale,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the settle delay.
    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Field names in declared order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Current verdict for `field`, `None` for unknown fields.
    #[must_use]
    pub fn is_valid(&self, field: &str) -> Option<bool> {
        self.field(field).map(|field| *field.valid.borrow())
    }

    /// Watch the verdict for `field`.
    #[must_use]
    pub fn watch_validity(&self, field: &str) -> Option<watch::Receiver<bool>> {
        self.field(field).map(|field| field.valid.subscribe())
    }

    /// Watch the validation trigger for `field`. The value changes every time
    /// the form asks its fields to validate.
    #[must_use]
    pub fn watch_trigger(&self, field: &str) -> Option<watch::Receiver<u64>> {
        self.field(field).map(|field| field.trigger.subscribe())
    }

    /// Record a field's verdict. Unknown fields are ignored.
    pub fn update_validation_state(&self, field: &str, valid: bool) {
        match self.field(field) {
            Some(field) => {
                field.valid.send_replace(valid);
            },
            None => tracing::debug!(field, "Ignoring validation state for unknown field"),
        }
    }

    /// First invalid field in declared order.
    #[must_use]
    pub fn first_invalid_field(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| !*field.valid.borrow())
            .map(|field| field.name.as_str())
    }

    /// Ask every field to validate, wait for them to settle and report whether
    /// the whole form is valid. Focuses the first invalid field if not.
    pub async fn validate_form(&self) -> bool {
        for field in &self.fields {
            field.trigger.send_modify(|count| *count += 1);
        }

        tokio::time::sleep(self.settle_delay).await;

        match self.first_invalid_field() {
            None => true,
            Some(field) => {
                tracing::debug!(field, "Form invalid");
                self.focus.focus(field);
                false
            },
        }
    }

    /// Validate and, if valid, run `submit`.
    ///
    /// Invalid forms show the "fix the errors" notification. Errors from
    /// `submit` are shown as error notifications, falling back to a generic
    /// message when the error renders empty.
    pub async fn handle_submit<F, Fut, T, E>(&self, submit: F) -> SubmitOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if !self.validate_form().await {
            self.notifications
                .error(self.locale.message(MessageKey::FormHasErrors));
            return SubmitOutcome::Invalid;
        }

        match submit().await {
            Ok(value) => SubmitOutcome::Submitted(value),
            Err(err) => {
                let mut message = err.to_string();
                if message.trim().is_empty() {
                    message = self.locale.message(MessageKey::SubmitError).to_string();
                }
                tracing::warn!(error = %message, "Form submission failed");
                self.notifications.error(message.clone());
                SubmitOutcome::Failed(message)
            },
        }
    }

    /// Mark every field invalid.
    pub fn reset_validation(&self) {
        for field in &self.fields {
            field.valid.send_replace(false);
        }
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).and_then(|&i| self.fields.get(i))
    }
}

impl std::fmt::Debug for FormValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state: Vec<(&str, bool)> = self
            .fields
            .iter()
            .map(|field| (field.name.as_str(), *field.valid.borrow()))
            .collect();
        f.debug_struct("FormValidation")
            .field("fields", &state)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    fn form(fields: &[&str]) -> FormValidation {
        FormValidation::new(
            fields.iter().copied(),
            NotificationCenter::new(),
            Arc::new(NoopFocus),
            Locale::En,
        )
    }

    #[test]
    fn test_fields_start_invalid() {
        let form = form(&["a", "b"]);
        assert_eq!(form.is_valid("a"), Some(false));
        assert_eq!(form.first_invalid_field(), Some("a"));
        assert_eq!(form.is_valid("zzz"), None);
    }

    #[test]
    fn test_unknown_field_ignored() {
        let form = form(&["a"]);
        form.update_validation_state("zzz", true);
        assert_eq!(form.fields().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_duplicate_fields_collapse() {
        let form = form(&["a", "a", "b"]);
        assert_eq!(form.fields().count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validate_bumps_triggers() {
        let form = form(&["a", "b"]);
        let mut trigger = form.watch_trigger("b").unwrap();
        form.update_validation_state("a", true);

        assert!(!form.validate_form().await);
        assert!(trigger.has_changed().unwrap());
        assert_eq!(*trigger.borrow_and_update(), 1);
        assert_eq!(form.first_invalid_field(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_validation() {
        let form = form(&["a"]);
        form.update_validation_state("a", true);
        assert!(form.validate_form().await);
        form.reset_validation();
        assert_eq!(form.is_valid("a"), Some(false));
    }
}
