use super::{Ack, announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::{ApiRequest, MultipartForm};
use ticketdesk_core::ids::ImageId;
use ticketdesk_core::types::{
    ImageAddRequest, ImageFile, ImageMetadata, ImageResponse, ImageSearchRequest, ImageUpdateRequest,
};
use ticketdesk_core::{MessageKey, Page};

resource_api!(
    /// `/images`
    ImagesApi,
    ImageResponse,
    "images"
);

/// Multipart body: the file under `image`, then the metadata fields.
fn upload_form(image: ImageFile, metadata: &ImageMetadata) -> MultipartForm {
    metadata
        .form_fields()
        .into_iter()
        .fold(MultipartForm::new().file("image", image), |form, (name, value)| {
            form.text(name, value)
        })
}

impl ImagesApi {
    /// `GET /images/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn get(
        &self,
        id: ImageId,
        options: RequestOptions<ImageResponse>,
    ) -> Result<Option<ImageResponse>, ClientError> {
        let request = ApiRequest::get(format!("/{id}"));
        Ok(self.resource.item(LoadingKey::Get, request, options).await?)
    }

    /// `GET /images?imageType=..`: every image of one type, as a plain list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn by_type(
        &self,
        image_type: &str,
        options: RequestOptions<Vec<ImageResponse>>,
    ) -> Result<Option<Vec<ImageResponse>>, ClientError> {
        let request = ApiRequest::get("").query("imageType", image_type);
        Ok(self.resource.list(LoadingKey::Get, request, options).await?)
    }

    /// `POST /images` as `multipart/form-data`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the file's content type is invalid or the
    /// call fails.
    pub async fn upload(
        &self,
        request: ImageAddRequest,
        options: RequestOptions<ImageResponse>,
    ) -> Result<Option<ImageResponse>, ClientError> {
        let ImageAddRequest { image, metadata } = request;
        let request = ApiRequest::post("").multipart(upload_form(image, &metadata));
        let options = announce(&self.resource, options, MessageKey::ImageUploaded);
        Ok(self.resource.item(LoadingKey::Create, request, options).await?)
    }

    /// `PUT /images/{id}`: multipart when new bytes are attached, JSON
    /// metadata otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update(
        &self,
        id: ImageId,
        request: ImageUpdateRequest,
        options: RequestOptions<Ack>,
    ) -> Result<(), ClientError> {
        let path = format!("/{id}");
        let request = match request.image {
            Some(image) => ApiRequest::put(path).multipart(upload_form(image, &request.metadata)),
            None => ApiRequest::put(path).json(&request.metadata)?,
        };
        let options = announce(&self.resource, options, MessageKey::ImageUpdated);
        self.resource.opaque(LoadingKey::Update, request, options).await?;
        Ok(())
    }

    /// `DELETE /images/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete(&self, id: ImageId, options: RequestOptions<Ack>) -> Result<(), ClientError> {
        let options = announce(&self.resource, options, MessageKey::ImageDeleted);
        self.resource
            .opaque(LoadingKey::Delete, ApiRequest::delete(format!("/{id}")), options)
            .await?;
        Ok(())
    }

    /// `POST /images/search`, immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn search(
        &self,
        request: &ImageSearchRequest,
        options: RequestOptions<Page<ImageResponse>>,
    ) -> Result<Option<Page<ImageResponse>>, ClientError> {
        let request = ApiRequest::post("/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /images/search` after the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Superseded`] if a newer debounced search started
    /// first, otherwise as [`ImagesApi::search`].
    pub async fn search_debounced(
        &self,
        request: ImageSearchRequest,
        options: RequestOptions<Page<ImageResponse>>,
    ) -> Result<Option<Page<ImageResponse>>, ClientError> {
        self.resource
            .debounced(|| self.search(&request, options))
            .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_form_puts_file_first() {
        let metadata = ImageMetadata {
            image_type: Some("poster".to_string()),
            local_order_rank: 3,
            ..ImageMetadata::default()
        };
        let form = upload_form(ImageFile::new("a.png", "image/png", vec![1]), &metadata);
        assert_eq!(form.files.len(), 1);
        assert_eq!(form.files[0].0, "image");
        assert_eq!(
            form.text,
            vec![
                ("imageType".to_string(), "poster".to_string()),
                ("localOrderRank".to_string(), "3".to_string()),
            ]
        );
    }
}
