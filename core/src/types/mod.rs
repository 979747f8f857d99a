//! Data-transfer records exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. Request types are built by
//! callers; response types are only ever deserialized.

#[allow(missing_docs)]
mod attendee;
#[allow(missing_docs)]
mod auth;
#[allow(missing_docs)]
mod calendar;
#[allow(missing_docs)]
mod event;
#[allow(missing_docs)]
mod image;
#[allow(missing_docs)]
mod payment;
mod search;
#[allow(missing_docs)]
mod ticket;
#[allow(missing_docs)]
mod user;

pub use attendee::{AttendeeAddRequest, AttendeeFilterRequest, AttendeeResponse, AttendeeUpdateRequest};
pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};
pub use calendar::{
    UserCalendarAddEventRequest, UserCalendarEventResponse, UserCalendarResponse,
    UserCalendarUpdateEventRequest,
};
pub use event::{
    EventAddRequest, EventFilterRequest, EventImageAddRequest, EventImageUpdateRequest,
    EventResponse, EventUpdateRequest,
};
pub use image::{
    ImageAddRequest, ImageFile, ImageFilterRequest, ImageMetadata, ImageResponse,
    ImageUpdateRequest,
};
pub use payment::{PaymentAddRequest, PaymentFilterRequest, PaymentResponse, PaymentUpdateRequest};
pub use search::{PaginationRequest, SearchRequest, SortOrder, SortRequest};
pub use ticket::{
    ReserveTicketRequest, TicketAddRequest, TicketFilterRequest, TicketResponse,
    TicketShortResponse, TicketUpdateRequest,
};
pub use user::{UserFilterRequest, UserResponse, UserUpdateRequest};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Search request for events
pub type EventSearchRequest = SearchRequest<EventFilterRequest>;
/// Search request for tickets
pub type TicketSearchRequest = SearchRequest<TicketFilterRequest>;
/// Search request for attendees
pub type AttendeeSearchRequest = SearchRequest<AttendeeFilterRequest>;
/// Search request for payments
pub type PaymentSearchRequest = SearchRequest<PaymentFilterRequest>;
/// Search request for users
pub type UserSearchRequest = SearchRequest<UserFilterRequest>;
/// Search request for images
pub type ImageSearchRequest = SearchRequest<ImageFilterRequest>;

/// Lifecycle status of a ticket.
///
/// Transitions happen only on the backend; the client observes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Not yet reserved
    Available,
    /// Held for a buyer, awaiting payment
    Reserved,
    /// Paid for
    Paid,
    /// Scanned at the venue
    Used,
    /// Cancelled by the buyer or an administrator
    Cancelled,
}

/// Status of a payment as reported by the payment provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Created, waiting for the buyer to pay
    Pending,
    /// Authorized, waiting for capture
    WaitingForCapture,
    /// Money captured
    Succeeded,
    /// Cancelled before capture
    Canceled,
    /// Provider rejected the payment
    Failed,
}

/// Identity document presented by an attendee. Numeric on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DocumentType {
    Passport,
    DriverLicense,
    ForeignPassport,
    StudentCard,
    BirthCertificate,
}

impl DocumentType {
    /// All document types in wire-code order.
    pub const ALL: [Self; 5] = [
        Self::Passport,
        Self::DriverLicense,
        Self::ForeignPassport,
        Self::StudentCard,
        Self::BirthCertificate,
    ];

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Passport => 0,
            Self::DriverLicense => 1,
            Self::ForeignPassport => 2,
            Self::StudentCard => 3,
            Self::BirthCertificate => 4,
        }
    }

    /// Document type for a wire code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Passport),
            1 => Some(Self::DriverLicense),
            2 => Some(Self::ForeignPassport),
            3 => Some(Self::StudentCard),
            4 => Some(Self::BirthCertificate),
            _ => None,
        }
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown document type {code}")))
    }
}

/// Role of an account. Numeric on the wire (`User = 0`, `Admin = 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Regular customer
    User,
    /// Back-office administrator
    Admin,
}

impl UserRole {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Admin => 1,
        }
    }

    /// Name used when the role is persisted locally.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "0" => Ok(Self::User),
            "admin" | "1" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(0) => Ok(Self::User),
            Raw::Code(1) => Ok(Self::Admin),
            Raw::Code(code) => Err(serde::de::Error::custom(format!("unknown role {code}"))),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
