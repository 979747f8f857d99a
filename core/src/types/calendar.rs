use super::event::EventResponse;
use super::user::UserResponse;
use crate::format::option_timestamp;
use crate::ids::{CalendarEntryId, EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's personal calendar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserCalendarResponse {
    pub user: UserResponse,
    #[serde(default)]
    pub events: Vec<UserCalendarEventResponse>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCalendarEventResponse {
    pub id: CalendarEntryId,
    pub event: EventResponse,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, with = "option_timestamp")]
    pub reminder_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCalendarAddEventRequest {
    pub event_id: EventId,
    pub note: Option<String>,
    #[serde(default, with = "option_timestamp")]
    pub reminder_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCalendarUpdateEventRequest {
    pub event_id: EventId,
    pub user_id: Option<UserId>,
    pub note: Option<String>,
    #[serde(default, with = "option_timestamp")]
    pub reminder_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calendar_without_events_key() {
        let calendar: UserCalendarResponse = serde_json::from_value(json!({
            "user": {
                "id": "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11",
                "fullName": "Anna",
                "email": "anna@example.com",
                "phone": "",
                "role": 0,
                "birthDate": null
            }
        }))
        .unwrap();
        assert!(calendar.events.is_empty());
        assert_eq!(calendar.user.birth_date, None);
    }
}
