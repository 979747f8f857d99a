use crate::ids::ImageId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uploaded image as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: ImageId,
    pub url: String,
    #[serde(default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub local_order_rank: u32,
    #[serde(default)]
    pub entity_id: Option<Uuid>,
    #[serde(default)]
    pub entity_target: Option<String>,
}

/// Raw file selected for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// File with the given name, MIME type and contents.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Metadata attached to an image: how it is classified and what it belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default)]
    pub local_order_rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_target: Option<String>,
}

impl ImageMetadata {
    /// Text parts of a multipart upload, in the order the backend reads them.
    ///
    /// Absent optional fields are omitted rather than sent empty.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(4);
        if let Some(image_type) = &self.image_type {
            fields.push(("imageType", image_type.clone()));
        }
        fields.push(("localOrderRank", self.local_order_rank.to_string()));
        if let Some(entity_id) = &self.entity_id {
            fields.push(("entityId", entity_id.to_string()));
        }
        if let Some(entity_target) = &self.entity_target {
            fields.push(("entityTarget", entity_target.clone()));
        }
        fields
    }
}

/// New image upload. Always sent as multipart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAddRequest {
    pub image: ImageFile,
    pub metadata: ImageMetadata,
}

/// Image update. Multipart when `image` carries new bytes, JSON metadata otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpdateRequest {
    #[serde(skip)]
    pub image: Option<ImageFile>,
    #[serde(flatten)]
    pub metadata: ImageMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilterRequest {
    #[serde(default)]
    pub image_ids: Vec<ImageId>,
    #[serde(default)]
    pub image_types: Vec<String>,
    #[serde(default)]
    pub entity_ids: Vec<Uuid>,
    #[serde(default)]
    pub entity_target: Option<String>,
}
