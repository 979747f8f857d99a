use super::PaymentStatus;
use super::user::UserResponse;
use crate::format::{option_timestamp, timestamp};
use crate::ids::{PaymentId, TicketId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: PaymentId,
    #[serde(default)]
    pub buyer: Option<UserResponse>,
    pub amount: f64,
    pub status: PaymentStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "option_timestamp")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Payment page or QR code link; empty until the provider issues one
    #[serde(default)]
    pub qr_url: String,
}

impl PaymentResponse {
    /// Whether money was captured.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self.status, PaymentStatus::Succeeded)
    }
}

/// Payment for reserved tickets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAddRequest {
    pub ticket_ids: Vec<TicketId>,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdateRequest {
    pub status: Option<PaymentStatus>,
    #[serde(default, with = "option_timestamp")]
    pub paid_at: Option<DateTime<Utc>>,
    pub qr_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilterRequest {
    #[serde(default)]
    pub payment_ids: Vec<PaymentId>,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub status: Vec<PaymentStatus>,
    #[serde(default, with = "option_timestamp")]
    pub created_at_from: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub created_at_to: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub paid_at_from: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub paid_at_to: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_payment_without_paid_at() {
        let payment: PaymentResponse = serde_json::from_value(json!({
            "id": "6f1c1b0e-3c1a-4d57-9f43-2f1e8c0b7a11",
            "buyer": null,
            "amount": 3000.0,
            "status": "Pending",
            "createdAt": "2025-02-01T12:00:00Z",
            "paidAt": "",
            "qrUrl": "https://pay.example/qr/1"
        }))
        .unwrap();
        assert!(!payment.is_paid());
        assert_eq!(payment.paid_at, None);
    }

    #[test]
    fn test_update_request_sends_status_name() {
        let request = PaymentUpdateRequest {
            status: Some(PaymentStatus::Canceled),
            ..PaymentUpdateRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"status": "Canceled", "paidAt": null, "qrUrl": null})
        );
    }
}
