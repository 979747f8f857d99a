//! Per-entity API modules.
//!
//! Each module binds a [`Resource`] to one REST resource and gives its
//! endpoints typed methods. The resource's cached state (`items`,
//! `total_count`, `error`, loading flags) is reachable through `Deref`.
//!
//! Mutating calls show a localized success notification unless the caller's
//! [`RequestOptions`] say otherwise. Searches come in an immediate and a
//! debounced flavor; debounced searches on the same module supersede each
//! other.

use crate::executor::{RequestOptions, Resource};
use serde::de::DeserializeOwned;
use ticketdesk_core::MessageKey;

macro_rules! resource_api {
    ($(#[$meta:meta])* $name:ident, $entity:ty, $path:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            resource: $crate::executor::Resource<$entity>,
        }

        impl $name {
            /// Path segment under the API root.
            pub const NAME: &'static str = $path;

            /// Module bound to `{api_base_url}/` followed by [`Self::NAME`].
            #[must_use]
            pub fn new(
                config: &$crate::config::ClientConfig,
                http: $crate::http::HttpClient,
                notifications: ticketdesk_runtime::NotificationCenter,
            ) -> Self {
                Self {
                    resource: $crate::executor::Resource::new(Self::NAME, config, http, notifications),
                }
            }

            /// Underlying executor.
            #[must_use]
            pub const fn resource(&self) -> &$crate::executor::Resource<$entity> {
                &self.resource
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::executor::Resource<$entity>;

            fn deref(&self) -> &Self::Target {
                &self.resource
            }
        }
    };
}

pub(crate) use resource_api;

/// Attendee endpoints
pub mod attendees;
/// Login, registration and password change
pub mod auth;
/// Personal and per-user calendars
pub mod calendar;
/// Event endpoints
pub mod events;
/// Image upload and lookup
pub mod images;
/// Payment endpoints
pub mod payments;
/// Ticket endpoints, including reservation
pub mod tickets;
/// User profiles
pub mod users;

pub use attendees::AttendeesApi;
pub use auth::AuthApi;
pub use calendar::CalendarApi;
pub use events::EventsApi;
pub use images::ImagesApi;
pub use payments::PaymentsApi;
pub use tickets::TicketsApi;
pub use users::UsersApi;

/// Payload of calls whose response body carries nothing the client reads.
pub type Ack = serde_json::Value;

/// Default a mutating call's options to a localized success notification.
fn announce<T, R>(resource: &Resource<T>, options: RequestOptions<R>, message: MessageKey) -> RequestOptions<R>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    options.or_success_message(resource.locale().message(message))
}
