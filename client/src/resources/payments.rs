use super::{Ack, announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::ApiRequest;
use ticketdesk_core::ids::PaymentId;
use ticketdesk_core::types::{
    PaymentAddRequest, PaymentResponse, PaymentSearchRequest, PaymentUpdateRequest,
};
use ticketdesk_core::{MessageKey, Page};

resource_api!(
    /// `/payments`
    PaymentsApi,
    PaymentResponse,
    "payments"
);

impl PaymentsApi {
    /// `POST /payments`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn create(
        &self,
        request: &PaymentAddRequest,
        options: RequestOptions<PaymentResponse>,
    ) -> Result<Option<PaymentResponse>, ClientError> {
        let request = ApiRequest::post("").json(request)?;
        let options = announce(&self.resource, options, MessageKey::PaymentCreated);
        Ok(self.resource.item(LoadingKey::Create, request, options).await?)
    }

    /// `GET /payments/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn get(
        &self,
        id: PaymentId,
        options: RequestOptions<PaymentResponse>,
    ) -> Result<Option<PaymentResponse>, ClientError> {
        let request = ApiRequest::get(format!("/{id}"));
        Ok(self.resource.item(LoadingKey::Get, request, options).await?)
    }

    /// `POST /payments/me`: the signed-in user's payments.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn my_payments(
        &self,
        request: &PaymentSearchRequest,
        options: RequestOptions<Page<PaymentResponse>>,
    ) -> Result<Option<Page<PaymentResponse>>, ClientError> {
        let request = ApiRequest::post("/me").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /payments/search`, immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn search(
        &self,
        request: &PaymentSearchRequest,
        options: RequestOptions<Page<PaymentResponse>>,
    ) -> Result<Option<Page<PaymentResponse>>, ClientError> {
        let request = ApiRequest::post("/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /payments/search` after the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Superseded`] if a newer debounced search started
    /// first, otherwise as [`PaymentsApi::search`].
    pub async fn search_debounced(
        &self,
        request: PaymentSearchRequest,
        options: RequestOptions<Page<PaymentResponse>>,
    ) -> Result<Option<Page<PaymentResponse>>, ClientError> {
        self.resource
            .debounced(|| self.search(&request, options))
            .await?
    }

    /// `PUT /payments/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update(
        &self,
        id: PaymentId,
        request: &PaymentUpdateRequest,
        options: RequestOptions<PaymentResponse>,
    ) -> Result<Option<PaymentResponse>, ClientError> {
        let request = ApiRequest::put(format!("/{id}")).json(request)?;
        let options = announce(&self.resource, options, MessageKey::PaymentUpdated);
        Ok(self.resource.item(LoadingKey::Update, request, options).await?)
    }

    /// `DELETE /payments/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete(&self, id: PaymentId, options: RequestOptions<Ack>) -> Result<(), ClientError> {
        let options = announce(&self.resource, options, MessageKey::PaymentDeleted);
        self.resource
            .opaque(LoadingKey::Delete, ApiRequest::delete(format!("/{id}")), options)
            .await?;
        Ok(())
    }
}
