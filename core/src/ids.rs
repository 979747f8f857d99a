//! Identifier newtypes.
//!
//! Identifiers always originate from API responses, so there is no random
//! constructor. `from_uuid` wraps ids read back from a response, a route
//! parameter or persisted state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! server_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap a `Uuid` previously returned by the backend
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

server_id!(
    /// Unique identifier for an event
    EventId
);
server_id!(
    /// Unique identifier for a ticket
    TicketId
);
server_id!(
    /// Unique identifier for an attendee
    AttendeeId
);
server_id!(
    /// Unique identifier for a payment
    PaymentId
);
server_id!(
    /// Unique identifier for a user
    UserId
);
server_id!(
    /// Unique identifier for an uploaded image
    ImageId
);
server_id!(
    /// Unique identifier for an entry in a user's calendar
    CalendarEntryId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_id_is_transparent_on_the_wire() {
        let id: EventId = serde_json::from_str(r#""6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11""#).unwrap();
        assert_eq!(id.to_string(), "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            r#""6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11""#
        );
    }

    #[test]
    fn test_id_from_route_parameter() {
        let id: TicketId = "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11".parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11");
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }
}
