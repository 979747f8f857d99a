//! Application context - wires together every client component.
//!
//! One [`AppContext`] corresponds to one running front end: it owns the
//! shared HTTP client, the notification queue, the persisted session, one
//! module per backend resource, the map service and the route table. All of
//! them share the same locale and bearer token through the HTTP client.

use crate::auth_store::AuthStore;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::HttpClient;
use crate::resources::{
    AttendeesApi, AuthApi, CalendarApi, EventsApi, ImagesApi, PaymentsApi, TicketsApi, UsersApi,
};
use crate::routes::{Navigation, RouteTable};
use crate::storage::FileStorage;
use std::sync::Arc;
use ticketdesk_core::Locale;
use ticketdesk_core::environment::KeyValueStorage;
use ticketdesk_maps::{HeadlessSdkLoader, MapService, SdkLoader};
use ticketdesk_runtime::NotificationCenter;

/// Everything a front end needs to talk to the ticketing backend.
pub struct AppContext {
    /// Events
    pub events: EventsApi,
    /// Tickets and reservations
    pub tickets: TicketsApi,
    /// Attendees
    pub attendees: AttendeesApi,
    /// Payments
    pub payments: PaymentsApi,
    /// Users
    pub users: UsersApi,
    /// Images
    pub images: ImagesApi,
    /// Calendars
    pub calendar: CalendarApi,
    /// Login, registration and password change
    pub auth: AuthApi,
    /// Map SDK and geocoder
    pub maps: MapService,
    config: ClientConfig,
    http: HttpClient,
    notifications: NotificationCenter,
    store: AuthStore,
    routes: RouteTable,
}

impl AppContext {
    /// Build the context on top of `storage` and restore the persisted session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an invalid configuration and
    /// [`ClientError::Storage`] if the session cannot be read.
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
        loader: Arc<dyn SdkLoader>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        tracing::info!(api = %config.api_base_url, locale = %config.locale, "Initializing client");

        let http = HttpClient::new(&config)?;
        let notifications = NotificationCenter::new();
        let store = AuthStore::new(storage, http.clone());
        store.initialize_auth()?;

        let events = EventsApi::new(&config, http.clone(), notifications.clone());
        let tickets = TicketsApi::new(&config, http.clone(), notifications.clone());
        let attendees = AttendeesApi::new(&config, http.clone(), notifications.clone());
        let payments = PaymentsApi::new(&config, http.clone(), notifications.clone());
        let users = UsersApi::new(&config, http.clone(), notifications.clone());
        let images = ImagesApi::new(&config, http.clone(), notifications.clone());
        let calendar = CalendarApi::new(&config, http.clone(), notifications.clone());
        let auth = AuthApi::new(&config, http.clone(), notifications.clone(), store.clone());

        let maps = MapService::new(config.maps.clone(), config.locale, loader);

        Ok(Self {
            events,
            tickets,
            attendees,
            payments,
            users,
            images,
            calendar,
            auth,
            maps,
            config,
            http,
            notifications,
            store,
            routes: RouteTable::default(),
        })
    }

    /// Build the context with a [`FileStorage`] at `config.storage_path` and
    /// a [`HeadlessSdkLoader`].
    ///
    /// # Errors
    ///
    /// As [`AppContext::new`], plus [`ClientError::Storage`] if the storage
    /// file exists but cannot be read.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let storage = FileStorage::open(&config.storage_path)?;
        let loader = HeadlessSdkLoader::new(&config.maps, config.locale);
        Self::new(config, Arc::new(storage), Arc::new(loader))
    }

    /// Configuration the context was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared HTTP client.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Notification queue.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Persisted session.
    #[must_use]
    pub const fn auth_store(&self) -> &AuthStore {
        &self.store
    }

    /// Route table.
    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Current interface language.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.http.locale()
    }

    /// Switch the interface language of later API requests and notifications.
    ///
    /// The map keeps the language it was loaded with.
    pub fn set_locale(&self, locale: Locale) {
        self.http.set_locale(locale);
        tracing::info!(locale = %locale, "Locale changed");
    }

    /// Resolve `path` against the route table for the current session.
    #[must_use]
    pub fn navigate(&self, path: &str) -> Navigation<'_> {
        let navigation = self.routes.resolve(path, &self.store.snapshot());
        if let Navigation::Redirect(to) = navigation {
            tracing::debug!(from = path, to, "Navigation redirected");
        }
        navigation
    }

    /// Drop pending notifications and their timers.
    pub fn shutdown(&self) {
        self.notifications.shutdown();
        tracing::info!("Client shut down");
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api", &self.config.api_base_url)
            .field("locale", &self.locale())
            .field("auth", &self.store)
            .field("maps", &self.maps)
            .finish_non_exhaustive()
    }
}
