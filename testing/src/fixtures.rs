//! JSON bodies shaped like the backend's and the geocoder's responses.
//!
//! Ids are deterministic: `id(1)` always yields the same UUID, so tests can
//! assert on paths like `/events/{id}`.

use serde_json::{Value, json};
use uuid::Uuid;

/// Deterministic UUID for fixture records.
#[must_use]
pub const fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// `{status: "success", data}`.
#[must_use]
pub fn success(data: Value) -> Value {
    json!({"status": "success", "message": "OK", "data": data})
}

/// `{status: "success"}` with no payload.
#[must_use]
pub fn success_without_data() -> Value {
    json!({"status": "success", "message": "OK"})
}

/// `{status: "error", message}`.
#[must_use]
pub fn failure(message: &str) -> Value {
    json!({"status": "error", "message": message})
}

/// `{status: "error", message, error: {code, message}}`.
#[must_use]
pub fn failure_with_error(message: &str, code: i32, error_message: &str) -> Value {
    json!({
        "status": "error",
        "message": message,
        "error": {"code": code, "message": error_message}
    })
}

/// Paginated payload.
#[must_use]
pub fn page(items: Vec<Value>, total_count: u64) -> Value {
    let page_size = items.len();
    json!({
        "items": items,
        "totalCount": total_count,
        "pageSize": page_size,
        "pageNumber": 1
    })
}

/// Event record.
#[must_use]
pub fn event(id: Uuid, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Open-air concert",
        "location": "Moscow, Gorky Park",
        "tag": "concert",
        "startTime": "2025-07-01T18:00:00Z",
        "endTime": "2025-07-01T22:00:00Z",
        "price": 1500.0,
        "isActive": true,
        "images": []
    })
}

/// Ticket record for `event_id`.
#[must_use]
pub fn ticket(id: Uuid, event_id: Uuid) -> Value {
    json!({
        "id": id,
        "eventId": event_id,
        "qrCode": format!("QR-{id}"),
        "status": "Reserved"
    })
}

/// User record. `role` is the wire code (0 user, 1 admin).
#[must_use]
pub fn user(id: Uuid, role: u8) -> Value {
    json!({
        "id": id,
        "fullName": "Ivan Petrov",
        "email": "ivan@example.com",
        "phone": "+79990000000",
        "role": role,
        "birthDate": "1990-04-12"
    })
}

/// Attendee record.
#[must_use]
pub fn attendee(id: Uuid) -> Value {
    json!({
        "id": id,
        "fullName": "Anna Petrova",
        "birthDate": "1992-08-30T00:00:00",
        "documentType": 0,
        "documentNumber": "4510 123456",
        "createdAt": "2025-01-10T09:00:00Z"
    })
}

/// Payment record.
#[must_use]
pub fn payment(id: Uuid, status: &str) -> Value {
    json!({
        "id": id,
        "amount": 3000.0,
        "status": status,
        "createdAt": "2025-01-10T09:05:00Z",
        "paidAt": null,
        "qrUrl": "https://pay.example.com/qr/1"
    })
}

/// Image record.
#[must_use]
pub fn image(id: Uuid, image_type: &str) -> Value {
    json!({
        "id": id,
        "url": format!("https://cdn.example.com/{id}.jpg"),
        "imageType": image_type,
        "localOrderRank": 0
    })
}

/// Calendar entry for `event`.
#[must_use]
pub fn calendar_entry(id: Uuid, event: Value) -> Value {
    json!({
        "id": id,
        "event": event,
        "note": "Bring friends",
        "reminderTime": "2025-07-01T12:00:00Z"
    })
}

/// Login payload.
#[must_use]
pub fn login(token: &str, role: u8) -> Value {
    json!({"token": token, "role": role})
}

/// Geocoder object.
#[must_use]
pub fn geo_object(name: &str, description: &str, text: &str, pos: &str) -> Value {
    json!({
        "GeoObject": {
            "name": name,
            "description": description,
            "Point": {"pos": pos},
            "metaDataProperty": {
                "GeocoderMetaData": {
                    "text": text,
                    "Address": {
                        "Components": [
                            {"kind": "country", "name": "Russia"},
                            {"kind": "locality", "name": description},
                            {"kind": "street", "name": name}
                        ]
                    }
                }
            }
        }
    })
}

/// Geocoder response wrapping `members` (as built by [`geo_object`]).
#[must_use]
pub fn geocoder_response(members: Vec<Value>) -> Value {
    json!({"response": {"GeoObjectCollection": {"featureMember": members}}})
}
