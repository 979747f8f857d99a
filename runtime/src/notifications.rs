//! Process-wide toast notifications.
//!
//! A [`NotificationCenter`] keeps the active notifications newest first. Each
//! notification with a non-zero timeout gets a timer task that decays its
//! progress bar and dismisses it when the timeout elapses. Dismissed
//! notifications stay in the list, invisible, for a short fade before they are
//! removed.
//!
//! Observers (a terminal renderer, a test) subscribe to [`NotificationEvent`]s
//! through a broadcast channel.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ticketdesk_runtime::notifications::{NotificationCenter, NotificationKind, NotificationOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let center = NotificationCenter::new();
//! let id = center.show(
//!     "Saved",
//!     NotificationOptions::new(NotificationKind::Success).with_timeout(Duration::from_secs(3)),
//! );
//! assert_eq!(center.notifications()[0].id, id);
//! center.shutdown();
//! # }
//! ```

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use ticketdesk_core::environment::{Clock, SystemClock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep};

/// Timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Delay between dismissal and removal.
pub const FADE_DURATION: Duration = Duration::from_millis(300);

/// Number of progress steps over a notification's lifetime.
const PROGRESS_STEPS: u32 = 200;

/// Progress lost on each step.
const PROGRESS_DECREMENT: f64 = 0.5;

/// Visual category of a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl NotificationKind {
    /// Lowercase name, used as a metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Options for [`NotificationCenter::show`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Category
    pub kind: NotificationKind,
    /// Time until automatic dismissal; zero keeps the notification until closed
    pub timeout: Duration,
}

impl NotificationOptions {
    /// Options of the given kind with the default timeout.
    #[must_use]
    pub const fn new(kind: NotificationKind) -> Self {
        Self {
            kind,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keep the notification until it is closed explicitly.
    #[must_use]
    pub const fn sticky(self) -> Self {
        self.with_timeout(Duration::ZERO)
    }
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self::new(NotificationKind::Info)
    }
}

/// Snapshot of one notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    /// Monotonically increasing id, unique per center
    pub id: u64,
    /// Text shown to the user
    pub message: String,
    /// Category
    pub kind: NotificationKind,
    /// Configured timeout
    pub timeout: Duration,
    /// `false` while fading out
    pub visible: bool,
    /// Remaining lifetime in percent, 100 down to 0
    pub progress: f64,
    /// When the notification was shown
    pub created_at: DateTime<Utc>,
}

/// Change to the set of active notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum NotificationEvent {
    /// A notification was added at the head of the list
    Shown(Notification),
    /// A notification started fading out
    Dismissed(u64),
    /// A notification left the list
    Removed(u64),
}

struct Entry {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
    fade: Option<JoinHandle<()>>,
}

impl Entry {
    fn abort_tasks(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(fade) = self.fade.take() {
            fade.abort();
        }
    }
}

struct Inner {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
    events: broadcast::Sender<NotificationEvent>,
    clock: Arc<dyn Clock>,
    fade: Duration,
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: NotificationEvent) {
        // No subscribers is the normal case.
        let _ = self.events.send(event);
    }
}

/// Shared notification queue. Cloning yields a handle to the same queue.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    /// Center using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Center stamping notifications with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                events,
                clock,
                fade: FADE_DURATION,
            }),
        }
    }

    /// Show `message` and return its id.
    ///
    /// Timers only run inside a Tokio runtime; outside one the notification
    /// stays until it is closed.
    pub fn show(&self, message: impl Into<String>, options: NotificationOptions) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            kind: options.kind,
            timeout: options.timeout,
            visible: true,
            progress: 100.0,
            created_at: self.inner.clock.now(),
        };

        tracing::debug!(id, kind = options.kind.as_str(), "Showing notification");
        metrics::counter!("ticketdesk_notifications_shown_total", "kind" => options.kind.as_str())
            .increment(1);

        self.inner.entries().insert(
            0,
            Entry {
                notification: notification.clone(),
                timer: None,
                fade: None,
            },
        );
        self.inner.emit(NotificationEvent::Shown(notification));

        if !options.timeout.is_zero() {
            if let Some(timer) = self.spawn_timer(id, options.timeout) {
                let mut entries = self.inner.entries();
                match entries
                    .iter_mut()
                    .find(|entry| entry.notification.id == id && entry.notification.visible)
                {
                    Some(entry) => entry.timer = Some(timer),
                    None => timer.abort(),
                }
            }
        }
        id
    }

    /// Show a success notification with the default timeout.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationOptions::new(NotificationKind::Success))
    }

    /// Show an error notification with the default timeout.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationOptions::new(NotificationKind::Error))
    }

    /// Show an info notification with the default timeout.
    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationOptions::new(NotificationKind::Info))
    }

    /// Show a warning notification with the default timeout.
    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationOptions::new(NotificationKind::Warning))
    }

    /// Dismiss a notification: stop its timers, hide it and remove it after
    /// the fade delay. Unknown or already dismissed ids are ignored.
    pub fn close(&self, id: u64) {
        let mut entries = self.inner.entries();
        let Some(entry) = entries
            .iter_mut()
            .find(|entry| entry.notification.id == id && entry.notification.visible)
        else {
            return;
        };

        entry.abort_tasks();
        entry.notification.visible = false;
        entry.notification.progress = 0.0;

        match self.spawn_fade(id) {
            Some(fade) => entry.fade = Some(fade),
            None => {
                entries.retain(|entry| entry.notification.id != id);
                drop(entries);
                self.inner.emit(NotificationEvent::Dismissed(id));
                self.inner.emit(NotificationEvent::Removed(id));
                return;
            },
        }
        drop(entries);

        tracing::trace!(id, "Notification dismissed");
        self.inner.emit(NotificationEvent::Dismissed(id));
    }

    /// Dismiss every visible notification.
    pub fn close_all(&self) {
        let ids: Vec<u64> = self
            .inner
            .entries()
            .iter()
            .filter(|entry| entry.notification.visible)
            .map(|entry| entry.notification.id)
            .collect();
        for id in ids {
            self.close(id);
        }
    }

    /// Active notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .entries()
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    /// Look up one notification.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<Notification> {
        self.inner
            .entries()
            .iter()
            .find(|entry| entry.notification.id == id)
            .map(|entry| entry.notification.clone())
    }

    /// Subscribe to changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }

    /// Abort every timer and drop all notifications without emitting events.
    pub fn shutdown(&self) {
        let mut entries = self.inner.entries();
        for entry in entries.iter_mut() {
            entry.abort_tasks();
        }
        let count = entries.len();
        entries.clear();
        tracing::debug!(count, "Notification center shut down");
    }

    fn spawn_timer(&self, id: u64, timeout: Duration) -> Option<JoinHandle<()>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id, "No Tokio runtime, notification will not expire");
            return None;
        };
        let weak = Arc::downgrade(&self.inner);
        let step = (timeout / PROGRESS_STEPS).max(Duration::from_millis(1));

        Some(handle.spawn(async move {
            let start = Instant::now();
            let expiry = sleep(timeout);
            tokio::pin!(expiry);
            let mut ticker = interval_at(start + step, step);

            loop {
                tokio::select! {
                    () = &mut expiry => {
                        if let Some(inner) = weak.upgrade() {
                            // Detach first so close() does not abort this task mid-call.
                            detach_timer(&inner, id);
                            Self { inner }.close(id);
                        }
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(inner) = weak.upgrade() else { break };
                        decay(&inner, id);
                    }
                }
            }
        }))
    }

    fn spawn_fade(&self, id: u64) -> Option<JoinHandle<()>> {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let fade = self.inner.fade;

        Some(handle.spawn(async move {
            sleep(fade).await;
            if let Some(inner) = weak.upgrade() {
                let removed = {
                    let mut entries = inner.entries();
                    let before = entries.len();
                    entries.retain(|entry| entry.notification.id != id);
                    entries.len() != before
                };
                if removed {
                    inner.emit(NotificationEvent::Removed(id));
                }
            }
        }))
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("active", &self.inner.entries().len())
            .finish_non_exhaustive()
    }
}

fn detach_timer(inner: &Inner, id: u64) {
    if let Some(entry) = inner
        .entries()
        .iter_mut()
        .find(|entry| entry.notification.id == id)
    {
        entry.timer = None;
    }
}

fn decay(inner: &Inner, id: u64) {
    if let Some(entry) = inner
        .entries()
        .iter_mut()
        .find(|entry| entry.notification.id == id && entry.notification.visible)
    {
        entry.notification.progress = (entry.notification.progress - PROGRESS_DECREMENT).max(0.0);
    }
}
