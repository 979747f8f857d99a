use super::{Ack, announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::ApiRequest;
use ticketdesk_core::ids::EventId;
use ticketdesk_core::types::{EventAddRequest, EventResponse, EventSearchRequest, EventUpdateRequest};
use ticketdesk_core::{MessageKey, Page};

resource_api!(
    /// `/events`
    EventsApi,
    EventResponse,
    "events"
);

impl EventsApi {
    /// `GET /events/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn get(
        &self,
        id: EventId,
        options: RequestOptions<EventResponse>,
    ) -> Result<Option<EventResponse>, ClientError> {
        let request = ApiRequest::get(format!("/{id}"));
        Ok(self.resource.item(LoadingKey::Get, request, options).await?)
    }

    /// `POST /events/search`, immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn search(
        &self,
        request: &EventSearchRequest,
        options: RequestOptions<Page<EventResponse>>,
    ) -> Result<Option<Page<EventResponse>>, ClientError> {
        let request = ApiRequest::post("/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /events/search` after the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Superseded`] if a newer debounced search started
    /// first, otherwise as [`EventsApi::search`].
    pub async fn search_debounced(
        &self,
        request: EventSearchRequest,
        options: RequestOptions<Page<EventResponse>>,
    ) -> Result<Option<Page<EventResponse>>, ClientError> {
        self.resource
            .debounced(|| self.search(&request, options))
            .await?
    }

    /// `POST /events`. A missing end date is sent as the start date.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn create(
        &self,
        request: EventAddRequest,
        options: RequestOptions<EventResponse>,
    ) -> Result<Option<EventResponse>, ClientError> {
        let request = ApiRequest::post("").json(&request.normalized())?;
        let options = announce(&self.resource, options, MessageKey::EventCreated);
        Ok(self.resource.item(LoadingKey::Create, request, options).await?)
    }

    /// `PUT /events/{id}`. A missing end date is sent as the start date.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update(
        &self,
        id: EventId,
        request: EventUpdateRequest,
        options: RequestOptions<EventResponse>,
    ) -> Result<Option<EventResponse>, ClientError> {
        let request = ApiRequest::put(format!("/{id}")).json(&request.normalized())?;
        let options = announce(&self.resource, options, MessageKey::EventUpdated);
        Ok(self.resource.item(LoadingKey::Update, request, options).await?)
    }

    /// `DELETE /events/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete(&self, id: EventId, options: RequestOptions<Ack>) -> Result<(), ClientError> {
        let options = announce(&self.resource, options, MessageKey::EventDeleted);
        self.resource
            .opaque(LoadingKey::Delete, ApiRequest::delete(format!("/{id}")), options)
            .await?;
        Ok(())
    }
}
