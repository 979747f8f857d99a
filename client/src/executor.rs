//! Generic request executor.
//!
//! A [`Resource`] binds the executor to one REST resource under
//! `{api_base_url}/{name}` and caches what its calls return: the last single
//! item, the last item list with its total count, the last error, and a
//! reference-counted set of loading flags.
//!
//! Every call goes through the same steps:
//!
//! 1. raise its loading flag and clear the previous error;
//! 2. send the request and settle the response envelope;
//! 3. on success, cache the payload in the shape the caller chose
//!    ([`ResponseKind`]), optionally notify, and run `on_success`;
//! 4. on failure, cache a normalized [`ApiError`], optionally notify, and run
//!    `on_error`;
//! 5. run `on_finally` and lower the loading flag.
//!
//! Step 5 is tied to a drop guard, so it also happens when the call's future
//! is dropped before it settles.
//!
//! # Example
//!
//! ```no_run
//! use ticketdesk_client::executor::{LoadingKey, RequestOptions, Resource};
//! use ticketdesk_client::http::{ApiRequest, HttpClient};
//! use ticketdesk_client::ClientConfig;
//! use ticketdesk_core::types::EventResponse;
//! use ticketdesk_runtime::NotificationCenter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! let http = HttpClient::new(&config)?;
//! let events: Resource<EventResponse> =
//!     Resource::new("events", &config, http, NotificationCenter::new());
//!
//! let page = events
//!     .page(LoadingKey::Search, ApiRequest::post("/search"), RequestOptions::new())
//!     .await?;
//! assert_eq!(events.total_count(), page.map_or(0, |p| p.total_count));
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{ApiRequest, HttpClient, HttpResponse};
use crate::metrics::{ApiMetrics, Outcome};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use ticketdesk_core::{ApiError, Locale, MessageKey, Page};
use ticketdesk_runtime::{Debouncer, NotificationCenter, Superseded};

/// Code cached for a failure envelope that arrived with a 2xx status and no
/// structured error body.
const FAILURE_ENVELOPE_CODE: i32 = 400;

/// Code cached for client-side failures that never reached the backend.
const CLIENT_FAILURE_CODE: i32 = 500;

/// Named loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum LoadingKey {
    Get,
    Search,
    Create,
    Update,
    Delete,
    Login,
    Register,
    ChangePassword,
}

impl LoadingKey {
    /// Name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Search => "search",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "login",
            Self::Register => "register",
            Self::ChangePassword => "changePassword",
        }
    }
}

/// Where a success payload is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Single record, cached as `data`
    Item,
    /// Paginated result, cached as `items` + `total_count`
    Page,
    /// Plain list, cached as `items` with `total_count` = its length
    List,
    /// Returned to the caller only
    Opaque,
}

type SuccessCallback<R> = Box<dyn FnOnce(Option<&R>) + Send>;
type ErrorCallback = Box<dyn FnOnce(&ApiError) + Send>;
type FinallyCallback = Box<dyn FnOnce() + Send>;

/// Per-call notification and callback options.
pub struct RequestOptions<R> {
    show_success_notification: Option<bool>,
    show_error_notification: bool,
    success_message: Option<String>,
    error_message: Option<String>,
    on_success: Option<SuccessCallback<R>>,
    on_error: Option<ErrorCallback>,
    on_finally: Option<FinallyCallback>,
}

impl<R> Default for RequestOptions<R> {
    fn default() -> Self {
        Self {
            show_success_notification: None,
            show_error_notification: true,
            success_message: None,
            error_message: None,
            on_success: None,
            on_error: None,
            on_finally: None,
        }
    }
}

impl<R> RequestOptions<R> {
    /// Defaults: no success notification, error notification on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show (or suppress) a notification when the call returns a payload.
    #[must_use]
    pub const fn with_success_notification(mut self, show: bool) -> Self {
        self.show_success_notification = Some(show);
        self
    }

    /// Show (or suppress) a notification when the call fails.
    #[must_use]
    pub const fn with_error_notification(mut self, show: bool) -> Self {
        self.show_error_notification = show;
        self
    }

    /// Text of the success notification.
    #[must_use]
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Text of the error notification. How it ranks against the server's own
    /// message depends on the failure; see [`Resource`].
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Run `callback` with the payload (if any) after a success.
    #[must_use]
    pub fn on_success(mut self, callback: impl FnOnce(Option<&R>) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Run `callback` with the cached error after a failure.
    #[must_use]
    pub fn on_error(mut self, callback: impl FnOnce(&ApiError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Run `callback` once the call is over, whatever the outcome.
    #[must_use]
    pub fn on_finally(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_finally = Some(Box::new(callback));
        self
    }

    /// Whether a success notification will be shown.
    #[must_use]
    pub fn shows_success_notification(&self) -> bool {
        self.show_success_notification.unwrap_or(false)
    }

    /// Turn the success notification on with `message` unless the caller
    /// already decided.
    pub(crate) fn or_success_message(mut self, message: &str) -> Self {
        self.show_success_notification.get_or_insert(true);
        self.success_message.get_or_insert_with(|| message.to_string());
        self
    }
}

impl<R: 'static> RequestOptions<R> {
    /// Run `hook` before the caller's own `on_success`.
    pub(crate) fn before_success(mut self, hook: impl FnOnce(Option<&R>) + Send + 'static) -> Self {
        let after = self.on_success.take();
        self.on_success = Some(Box::new(move |data: Option<&R>| {
            hook(data);
            if let Some(after) = after {
                after(data);
            }
        }));
        self
    }
}

impl<R> fmt::Debug for RequestOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("show_success_notification", &self.show_success_notification)
            .field("show_error_notification", &self.show_error_notification)
            .field("success_message", &self.success_message)
            .field("error_message", &self.error_message)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_finally", &self.on_finally.is_some())
            .finish()
    }
}

/// Cached state of a [`Resource`].
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// Last single item
    pub data: Option<T>,
    /// Last list or page of items
    pub items: Vec<T>,
    /// Total matching items reported with `items`
    pub total_count: u64,
    /// Error of the last failed call, cleared when a call starts
    pub error: Option<ApiError>,
    loading: HashMap<LoadingKey, usize>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            items: Vec::new(),
            total_count: 0,
            error: None,
            loading: HashMap::new(),
        }
    }
}

impl<T> ResourceState<T> {
    /// Whether any call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.loading.is_empty()
    }

    /// Whether a call with `key` is in flight.
    #[must_use]
    pub fn is_loading_key(&self, key: LoadingKey) -> bool {
        self.loading.contains_key(&key)
    }

    fn start(&mut self, key: LoadingKey) {
        *self.loading.entry(key).or_insert(0) += 1;
        self.error = None;
    }

    fn finish(&mut self, key: LoadingKey) {
        if let Some(count) = self.loading.get_mut(&key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.loading.remove(&key);
            }
        }
    }

    fn reset(&mut self) {
        self.data = None;
        self.items.clear();
        self.total_count = 0;
        self.error = None;
    }
}

/// Lowers a loading flag and runs `on_finally` when the call is over.
struct InFlight<'a, T> {
    state: &'a Mutex<ResourceState<T>>,
    key: LoadingKey,
    on_finally: Option<FinallyCallback>,
}

impl<'a, T> InFlight<'a, T> {
    fn begin(state: &'a Mutex<ResourceState<T>>, key: LoadingKey, on_finally: Option<FinallyCallback>) -> Self {
        state.lock().unwrap_or_else(PoisonError::into_inner).start(key);
        Self {
            state,
            key,
            on_finally,
        }
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finish(self.key);
        if let Some(on_finally) = self.on_finally.take() {
            on_finally();
        }
    }
}

/// Failed call: what gets cached and what the user is told.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure {
    error: ApiError,
    notice: String,
}

fn non_empty(message: Option<&str>) -> Option<&str> {
    message.filter(|message| !message.trim().is_empty())
}

/// Turn a transport result into a payload or a [`Failure`].
fn settle<R>(
    response: Result<HttpResponse<R>, ClientError>,
    locale: Locale,
    error_message: Option<&str>,
) -> (Outcome, Result<Option<R>, Failure>) {
    let caller = non_empty(error_message);
    let unexpected = || caller.unwrap_or(locale.message(MessageKey::Unexpected)).to_string();

    let response = match response {
        Ok(response) => response,
        Err(ClientError::Network(cause)) => {
            tracing::warn!(%cause, "No response from backend");
            let message = locale.message(MessageKey::NetworkError);
            let failure = Failure {
                error: ApiError::network(message),
                notice: caller.unwrap_or(message).to_string(),
            };
            return (Outcome::Network, Err(failure));
        },
        Err(err) => {
            let failure = Failure {
                error: ApiError::new(CLIENT_FAILURE_CODE, err.to_string()),
                notice: unexpected(),
            };
            return (Outcome::Failure, Err(failure));
        },
    };

    let status = i32::from(response.status);

    if response.is_http_success() {
        return match response.envelope {
            Ok(envelope) if envelope.is_success() => (Outcome::Success, Ok(envelope.data)),
            Ok(envelope) => {
                let notice = caller
                    .or_else(|| non_empty(envelope.message.as_deref()))
                    .unwrap_or(locale.message(MessageKey::OperationFailed))
                    .to_string();
                let failure = Failure {
                    error: envelope.to_api_error(FAILURE_ENVELOPE_CODE),
                    notice,
                };
                (Outcome::Failure, Err(failure))
            },
            Err(decode) => {
                tracing::warn!(status, error = %decode, "Malformed response envelope");
                let failure = Failure {
                    error: ApiError::new(status, locale.message(MessageKey::Unexpected)),
                    notice: unexpected(),
                };
                (Outcome::Failure, Err(failure))
            },
        };
    }

    let fallback = || ApiError::new(status, format!("Request failed with status code {status}"));
    let failure = match response.envelope {
        Ok(envelope) => {
            let error = if envelope.error.is_some() {
                envelope.to_api_error(status)
            } else {
                fallback()
            };
            let notice = non_empty(envelope.message.as_deref())
                .or(caller)
                .unwrap_or(locale.message(MessageKey::Unexpected))
                .to_string();
            Failure { error, notice }
        },
        Err(_) => Failure {
            error: fallback(),
            notice: unexpected(),
        },
    };
    (Outcome::Failure, Err(failure))
}

struct Inner<T> {
    name: String,
    base_url: String,
    http: HttpClient,
    notifications: NotificationCenter,
    state: Mutex<ResourceState<T>>,
    debouncer: Debouncer,
}

/// Executor bound to `{api_base_url}/{name}`.
///
/// Clones share the cached state, the loading flags and the debouncer.
///
/// Error notification text, first non-empty wins:
///
/// | Failure | Order |
/// |---------|-------|
/// | failure envelope | caller `error_message`, server `message`, "operation failed" |
/// | non-2xx response | server `message`, caller `error_message`, "unexpected" |
/// | no response | caller `error_message`, "network error" |
pub struct Resource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Resource<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    /// Resource `name` under the configured API root.
    #[must_use]
    pub fn new(name: &str, config: &ClientConfig, http: HttpClient, notifications: NotificationCenter) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.to_string(),
                base_url: format!("{}/{name}", config.api_base_url.trim_end_matches('/')),
                http,
                notifications,
                state: Mutex::new(ResourceState::default()),
                debouncer: Debouncer::new(config.search_debounce),
            }),
        }
    }

    /// Resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Absolute root of this resource.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Locale currently sent to the backend.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.inner.http.locale()
    }

    /// HTTP client shared by every resource.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// Call that caches a single record as `data`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] the call cached.
    pub async fn item(
        &self,
        key: LoadingKey,
        request: ApiRequest,
        options: RequestOptions<T>,
    ) -> Result<Option<T>, ApiError> {
        self.execute(ResponseKind::Item, key, request, options, |state, item: &T| {
            state.data = Some(item.clone());
        })
        .await
    }

    /// Call that caches a paginated result as `items` + `total_count`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] the call cached.
    pub async fn page(
        &self,
        key: LoadingKey,
        request: ApiRequest,
        options: RequestOptions<Page<T>>,
    ) -> Result<Option<Page<T>>, ApiError> {
        self.execute(ResponseKind::Page, key, request, options, |state, page: &Page<T>| {
            state.items.clone_from(&page.items);
            state.total_count = page.total_count;
        })
        .await
    }

    /// Call that caches a plain list as `items`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] the call cached.
    pub async fn list(
        &self,
        key: LoadingKey,
        request: ApiRequest,
        options: RequestOptions<Vec<T>>,
    ) -> Result<Option<Vec<T>>, ApiError> {
        self.execute(ResponseKind::List, key, request, options, |state, items: &Vec<T>| {
            state.items.clone_from(items);
            state.total_count = items.len() as u64;
        })
        .await
    }

    /// Call whose payload is handed back without being cached.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] the call cached.
    pub async fn opaque<R>(
        &self,
        key: LoadingKey,
        request: ApiRequest,
        options: RequestOptions<R>,
    ) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned + Send,
    {
        self.execute(ResponseKind::Opaque, key, request, options, |_, _: &R| {})
            .await
    }

    /// Run `operation` through this resource's debouncer.
    ///
    /// # Errors
    ///
    /// Returns [`Superseded`] when a newer debounced call on this resource
    /// starts before `operation` completes.
    pub async fn debounced<F, Fut, R>(&self, operation: F) -> Result<R, Superseded>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        self.inner.debouncer.run(operation).await
    }

    /// Drop any pending or running debounced call.
    pub fn cancel_debounced(&self) {
        self.inner.debouncer.cancel();
    }

    async fn execute<R, S>(
        &self,
        kind: ResponseKind,
        key: LoadingKey,
        request: ApiRequest,
        mut options: RequestOptions<R>,
        store: S,
    ) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned + Send,
        S: FnOnce(&mut ResourceState<T>, &R) + Send,
    {
        let inner = &*self.inner;
        let _in_flight = InFlight::begin(&inner.state, key, options.on_finally.take());

        let url = format!("{}{}", inner.base_url, request.path);
        let locale = inner.http.locale();
        tracing::debug!(
            resource = %inner.name,
            method = %request.method,
            url = %url,
            loading = key.as_str(),
            shape = ?kind,
            "Dispatching API request"
        );

        let started = Instant::now();
        let response = inner.http.send::<R>(&url, &request).await;
        let (outcome, settled) = settle(response, locale, options.error_message.as_deref());
        ApiMetrics::record_request(&inner.name, outcome, started.elapsed());

        match settled {
            Ok(data) => {
                if let Some(payload) = &data {
                    store(&mut *self.lock(), payload);
                    if options.shows_success_notification() {
                        let message = options
                            .success_message
                            .take()
                            .unwrap_or_else(|| locale.message(MessageKey::OperationSuccess).to_string());
                        inner.notifications.success(message);
                    }
                }
                if let Some(on_success) = options.on_success.take() {
                    on_success(data.as_ref());
                }
                Ok(data)
            },
            Err(Failure { error, notice }) => {
                tracing::warn!(
                    resource = %inner.name,
                    loading = key.as_str(),
                    code = error.code,
                    error = %error.message,
                    "API request failed"
                );
                self.lock().error = Some(error.clone());
                if options.show_error_notification {
                    inner.notifications.error(notice);
                }
                if let Some(on_error) = options.on_error.take() {
                    on_error(&error);
                }
                Err(error)
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResourceState<T>> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the cached state.
    pub fn state<R>(&self, read: impl FnOnce(&ResourceState<T>) -> R) -> R {
        read(&self.lock())
    }

    /// Last single item.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.lock().data.clone()
    }

    /// Last list or page of items.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    /// Total reported with the last list or page.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.lock().total_count
    }

    /// Error of the last failed call.
    #[must_use]
    pub fn error(&self) -> Option<ApiError> {
        self.lock().error.clone()
    }

    /// Whether any call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    /// Whether a call with `key` is in flight.
    #[must_use]
    pub fn is_loading_key(&self, key: LoadingKey) -> bool {
        self.lock().is_loading_key(key)
    }

    /// Clear data, items, total count and error. Loading flags are untouched.
    pub fn reset_state(&self) {
        self.lock().reset();
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.inner.name)
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
