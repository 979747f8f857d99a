//! # Ticketdesk Runtime
//!
//! Asynchronous building blocks shared by the API client and the map
//! integration.
//!
//! ## Core Components
//!
//! - **Notifications**: process-wide toast queue with expiry timers ([`notifications`])
//! - **Debounce**: trailing-edge debouncer that fences superseded calls ([`debounce`])
//! - **Validation**: form validation coordinator ([`validation`])
//! - **Lazy initialization**: exactly-once async init guard ([`lazy`])
//!
//! Everything here runs on Tokio. Shared state lives behind `std` mutexes that
//! are never held across an `.await`.

/// Toast notification queue
pub mod notifications;

/// Debouncing with supersession
pub mod debounce;

/// Form validation coordinator
pub mod validation;

/// Exactly-once async initialization
pub mod lazy;

pub use debounce::{Debouncer, Superseded};
pub use lazy::LazyInit;
pub use notifications::{
    Notification, NotificationCenter, NotificationEvent, NotificationKind, NotificationOptions,
};
pub use validation::{FieldFocus, FormValidation, NoopFocus, SubmitOutcome};
