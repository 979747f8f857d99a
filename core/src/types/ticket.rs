use super::TicketStatus;
use super::attendee::{AttendeeAddRequest, AttendeeResponse};
use super::payment::PaymentResponse;
use crate::ids::{AttendeeId, EventId, PaymentId, TicketId, UserId};
use serde::{Deserialize, Serialize};

/// Ticket with its attendee and payment, if any.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: TicketId,
    pub event_id: EventId,
    #[serde(default)]
    pub qr_code: String,
    /// Absent on older backend versions
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub attendee: Option<AttendeeResponse>,
    #[serde(default)]
    pub payment: Option<PaymentResponse>,
}

/// Id and status only; returned by reservation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketShortResponse {
    pub id: TicketId,
    pub status: TicketStatus,
}

/// Ticket issued by an administrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAddRequest {
    pub event_id: EventId,
    pub qr_code: Option<String>,
    pub attendee_id: Option<AttendeeId>,
    pub payment_id: Option<PaymentId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdateRequest {
    pub attendee_id: Option<AttendeeId>,
    pub qr_code: String,
    pub payment_id: Option<PaymentId>,
}

/// Reserve one ticket per attendee for `event_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveTicketRequest {
    pub event_id: EventId,
    pub user_id: UserId,
    pub attendees: Vec<AttendeeAddRequest>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilterRequest {
    #[serde(default)]
    pub ticket_ids: Vec<TicketId>,
    #[serde(default)]
    pub event_ids: Vec<EventId>,
    #[serde(default)]
    pub buyer_ids: Vec<UserId>,
    pub buyer_name: Option<String>,
    /// Singular on the wire
    #[serde(default, rename = "attendeeId")]
    pub attendee_ids: Vec<AttendeeId>,
    pub attendee_name: Option<String>,
    #[serde(default)]
    pub status: Vec<TicketStatus>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub payment_ids: Vec<PaymentId>,
}
