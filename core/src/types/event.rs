use super::image::{ImageMetadata, ImageResponse};
use crate::format::{option_timestamp, timestamp};
use crate::ids::{EventId, ImageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event as listed in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    pub price: f64,
    #[serde(default)]
    pub is_active: bool,
    /// Images ordered by `local_order_rank`
    #[serde(default)]
    pub images: Vec<ImageResponse>,
    #[serde(default)]
    pub tag: String,
}

impl EventResponse {
    /// First image by order rank, used as the cover.
    #[must_use]
    pub fn cover(&self) -> Option<&ImageResponse> {
        self.images.iter().min_by_key(|image| image.local_order_rank)
    }
}

/// Reference to an already uploaded image attached to a new event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventImageAddRequest {
    pub image_id: ImageId,
    pub local_order_rank: u32,
}

/// Metadata change for one image of an existing event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventImageUpdateRequest {
    pub id: ImageId,
    pub image: ImageMetadata,
}

/// New event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAddRequest {
    pub title: String,
    pub description: String,
    pub tag: String,
    pub location: String,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "option_timestamp")]
    pub end_date: Option<DateTime<Utc>>,
    pub ticket_count: u32,
    pub price: f64,
    pub is_active: bool,
    pub images: Vec<EventImageAddRequest>,
}

/// Changes to an existing event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdateRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "option_timestamp")]
    pub end_date: Option<DateTime<Utc>>,
    pub ticket_count: u32,
    pub images: Vec<EventImageUpdateRequest>,
}

impl EventAddRequest {
    /// Copy of the request with a missing end date set to the start date.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.end_date.get_or_insert(self.start_date);
        self
    }
}

impl EventUpdateRequest {
    /// Copy of the request with a missing end date set to the start date.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.end_date.get_or_insert(self.start_date);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterRequest {
    #[serde(default)]
    pub event_ids: Vec<EventId>,
    #[serde(default, with = "option_timestamp")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default, with = "option_timestamp")]
    pub date_to: Option<DateTime<Utc>>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub location: Vec<String>,
    #[serde(default)]
    pub tag: Vec<String>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}
