use super::{Ack, announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::ApiRequest;
use ticketdesk_core::ids::TicketId;
use ticketdesk_core::types::{
    PaginationRequest, ReserveTicketRequest, TicketAddRequest, TicketResponse, TicketSearchRequest,
    TicketShortResponse, TicketUpdateRequest,
};
use ticketdesk_core::{MessageKey, Page};

resource_api!(
    /// `/tickets`
    TicketsApi,
    TicketResponse,
    "tickets"
);

impl TicketsApi {
    /// `GET /tickets/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn get(
        &self,
        id: TicketId,
        options: RequestOptions<TicketResponse>,
    ) -> Result<Option<TicketResponse>, ClientError> {
        let request = ApiRequest::get(format!("/{id}"));
        Ok(self.resource.item(LoadingKey::Get, request, options).await?)
    }

    /// `GET /tickets/me?pageNumber=..&pageSize=..`, the signed-in user's tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn my_tickets(
        &self,
        pagination: PaginationRequest,
        options: RequestOptions<Page<TicketResponse>>,
    ) -> Result<Option<Page<TicketResponse>>, ClientError> {
        let request = pagination
            .to_query()
            .into_iter()
            .fold(ApiRequest::get("/me"), |request, (key, value)| request.query(key, value));
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /tickets/search`, immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn search(
        &self,
        request: &TicketSearchRequest,
        options: RequestOptions<Page<TicketResponse>>,
    ) -> Result<Option<Page<TicketResponse>>, ClientError> {
        let request = ApiRequest::post("/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /tickets/search` after the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Superseded`] if a newer debounced search started
    /// first, otherwise as [`TicketsApi::search`].
    pub async fn search_debounced(
        &self,
        request: TicketSearchRequest,
        options: RequestOptions<Page<TicketResponse>>,
    ) -> Result<Option<Page<TicketResponse>>, ClientError> {
        self.resource
            .debounced(|| self.search(&request, options))
            .await?
    }

    /// `POST /tickets`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn create(
        &self,
        request: &TicketAddRequest,
        options: RequestOptions<TicketResponse>,
    ) -> Result<Option<TicketResponse>, ClientError> {
        let request = ApiRequest::post("").json(request)?;
        let options = announce(&self.resource, options, MessageKey::TicketCreated);
        Ok(self.resource.item(LoadingKey::Create, request, options).await?)
    }

    /// `POST /tickets/reserve`: hold one ticket per attendee.
    ///
    /// The backend answers with ids and statuses only, so the cached list is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn reserve(
        &self,
        request: &ReserveTicketRequest,
        options: RequestOptions<Vec<TicketShortResponse>>,
    ) -> Result<Option<Vec<TicketShortResponse>>, ClientError> {
        let request = ApiRequest::post("/reserve").json(request)?;
        let options = announce(&self.resource, options, MessageKey::TicketReserved);
        Ok(self.resource.opaque(LoadingKey::Create, request, options).await?)
    }

    /// `PUT /tickets/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update(
        &self,
        id: TicketId,
        request: &TicketUpdateRequest,
        options: RequestOptions<TicketResponse>,
    ) -> Result<Option<TicketResponse>, ClientError> {
        let request = ApiRequest::put(format!("/{id}")).json(request)?;
        let options = announce(&self.resource, options, MessageKey::TicketUpdated);
        Ok(self.resource.item(LoadingKey::Update, request, options).await?)
    }

    /// `DELETE /tickets/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete(&self, id: TicketId, options: RequestOptions<Ack>) -> Result<(), ClientError> {
        let options = announce(&self.resource, options, MessageKey::TicketDeleted);
        self.resource
            .opaque(LoadingKey::Delete, ApiRequest::delete(format!("/{id}")), options)
            .await?;
        Ok(())
    }
}
