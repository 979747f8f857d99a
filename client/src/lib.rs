//! # Ticketdesk Client
//!
//! Typed client for the ticketing backend: one module per REST resource on
//! top of a shared executor, a persisted auth session, localized
//! notifications and a guarded route table.
//!
//! ## Example
//!
//! ```no_run
//! use ticketdesk_client::{AppContext, ClientConfig, RequestOptions};
//! use ticketdesk_core::types::{EventSearchRequest, LoginRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = AppContext::from_config(ClientConfig::from_env())?;
//!
//!     app.auth
//!         .login(&LoginRequest::new("user@example.com", "secret"), RequestOptions::new())
//!         .await?;
//!
//!     let page = app
//!         .events
//!         .search(&EventSearchRequest::default(), RequestOptions::new())
//!         .await?;
//!     println!("{} events", page.map_or(0, |page| page.total_count));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `{status, message, data, error}` envelope handling with per-call loading flags
//! - Success and error notifications in the session's language
//! - Debounced searches where a newer search supersedes an older one
//! - Session token and role persisted across restarts
//! - Route guard redirecting to login, unauthorized or not-found pages

/// Session persistence
pub mod auth_store;
/// Environment-driven configuration
pub mod config;
/// Application wiring
pub mod context;
/// Error types
pub mod error;
/// Generic API call executor and cached resource state
pub mod executor;
/// Request building and transport
pub mod http;
/// Metric names and recording helpers
pub mod metrics;
/// Per-entity API modules
pub mod resources;
/// Route table and navigation guard
pub mod routes;
/// File-backed key-value storage
pub mod storage;

// Re-export main types for convenience
pub use auth_store::{AuthState, AuthStore};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::ClientError;
pub use executor::{LoadingKey, RequestOptions, Resource, ResourceState};
pub use http::{ApiRequest, HttpClient, MultipartForm};
pub use resources::{
    Ack, AttendeesApi, AuthApi, CalendarApi, EventsApi, ImagesApi, PaymentsApi, TicketsApi, UsersApi,
};
pub use routes::{Navigation, Route, RouteTable};
pub use storage::FileStorage;
