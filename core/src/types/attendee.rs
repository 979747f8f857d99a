use super::DocumentType;
use crate::format::{date, option_timestamp, timestamp};
use crate::ids::{AttendeeId, TicketId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Person a ticket is issued to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub id: AttendeeId,
    pub full_name: String,
    #[serde(with = "date")]
    pub birth_date: NaiveDate,
    pub document_type: DocumentType,
    pub document_number: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeAddRequest {
    pub full_name: String,
    #[serde(with = "date")]
    pub birth_date: NaiveDate,
    pub document_type: DocumentType,
    pub document_number: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub ticket_id: Option<TicketId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeUpdateRequest {
    pub full_name: String,
    #[serde(with = "date")]
    pub birth_date: NaiveDate,
    pub document_type: DocumentType,
    pub document_number: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeFilterRequest {
    #[serde(default)]
    pub attendee_ids: Vec<AttendeeId>,
    pub full_name: Option<String>,
    #[serde(default, with = "option_timestamp")]
    pub birth_date_from: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub birth_date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub doc_type: Vec<DocumentType>,
    pub doc_number: Option<String>,
}
