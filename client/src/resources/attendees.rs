use super::{Ack, announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::ApiRequest;
use ticketdesk_core::ids::AttendeeId;
use ticketdesk_core::types::{
    AttendeeAddRequest, AttendeeResponse, AttendeeSearchRequest, AttendeeUpdateRequest,
};
use ticketdesk_core::{MessageKey, Page};

resource_api!(
    /// `/attendees`
    AttendeesApi,
    AttendeeResponse,
    "attendees"
);

impl AttendeesApi {
    /// `GET /attendees/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn get(
        &self,
        id: AttendeeId,
        options: RequestOptions<AttendeeResponse>,
    ) -> Result<Option<AttendeeResponse>, ClientError> {
        let request = ApiRequest::get(format!("/{id}"));
        Ok(self.resource.item(LoadingKey::Get, request, options).await?)
    }

    /// `POST /attendees/search`, immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn search(
        &self,
        request: &AttendeeSearchRequest,
        options: RequestOptions<Page<AttendeeResponse>>,
    ) -> Result<Option<Page<AttendeeResponse>>, ClientError> {
        let request = ApiRequest::post("/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /attendees/search` after the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Superseded`] if a newer debounced search started
    /// first, otherwise as [`AttendeesApi::search`].
    pub async fn search_debounced(
        &self,
        request: AttendeeSearchRequest,
        options: RequestOptions<Page<AttendeeResponse>>,
    ) -> Result<Option<Page<AttendeeResponse>>, ClientError> {
        self.resource
            .debounced(|| self.search(&request, options))
            .await?
    }

    /// `POST /attendees`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn create(
        &self,
        request: &AttendeeAddRequest,
        options: RequestOptions<AttendeeResponse>,
    ) -> Result<Option<AttendeeResponse>, ClientError> {
        let request = ApiRequest::post("").json(request)?;
        let options = announce(&self.resource, options, MessageKey::AttendeeCreated);
        Ok(self.resource.item(LoadingKey::Create, request, options).await?)
    }

    /// `POST /attendees/me`: attendee linked to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn create_self(
        &self,
        request: &AttendeeAddRequest,
        options: RequestOptions<AttendeeResponse>,
    ) -> Result<Option<AttendeeResponse>, ClientError> {
        let request = ApiRequest::post("/me").json(request)?;
        let options = announce(&self.resource, options, MessageKey::AttendeeCreated);
        Ok(self.resource.item(LoadingKey::Create, request, options).await?)
    }

    /// `POST /attendees/me/search`: the signed-in user's attendees.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn my_attendees(
        &self,
        request: &AttendeeSearchRequest,
        options: RequestOptions<Page<AttendeeResponse>>,
    ) -> Result<Option<Page<AttendeeResponse>>, ClientError> {
        let request = ApiRequest::post("/me/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `PUT /attendees/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update(
        &self,
        id: AttendeeId,
        request: &AttendeeUpdateRequest,
        options: RequestOptions<Ack>,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::put(format!("/{id}")).json(request)?;
        let options = announce(&self.resource, options, MessageKey::AttendeeUpdated);
        self.resource.opaque(LoadingKey::Update, request, options).await?;
        Ok(())
    }

    /// `DELETE /attendees/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete(&self, id: AttendeeId, options: RequestOptions<Ack>) -> Result<(), ClientError> {
        let options = announce(&self.resource, options, MessageKey::AttendeeDeleted);
        self.resource
            .opaque(LoadingKey::Delete, ApiRequest::delete(format!("/{id}")), options)
            .await?;
        Ok(())
    }
}
