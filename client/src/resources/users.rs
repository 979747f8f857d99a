use super::{Ack, announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::ApiRequest;
use ticketdesk_core::ids::UserId;
use ticketdesk_core::types::{UserResponse, UserSearchRequest, UserUpdateRequest};
use ticketdesk_core::{MessageKey, Page};

resource_api!(
    /// `/users`
    UsersApi,
    UserResponse,
    "users"
);

impl UsersApi {
    /// `POST /users/search`, immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn search(
        &self,
        request: &UserSearchRequest,
        options: RequestOptions<Page<UserResponse>>,
    ) -> Result<Option<Page<UserResponse>>, ClientError> {
        let request = ApiRequest::post("/search").json(request)?;
        Ok(self.resource.page(LoadingKey::Search, request, options).await?)
    }

    /// `POST /users/search` after the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Superseded`] if a newer debounced search started
    /// first, otherwise as [`UsersApi::search`].
    pub async fn search_debounced(
        &self,
        request: UserSearchRequest,
        options: RequestOptions<Page<UserResponse>>,
    ) -> Result<Option<Page<UserResponse>>, ClientError> {
        self.resource
            .debounced(|| self.search(&request, options))
            .await?
    }

    /// `GET /users/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn get(
        &self,
        id: UserId,
        options: RequestOptions<UserResponse>,
    ) -> Result<Option<UserResponse>, ClientError> {
        let request = ApiRequest::get(format!("/{id}"));
        Ok(self.resource.item(LoadingKey::Get, request, options).await?)
    }

    /// `GET /users/me`: the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn me(&self, options: RequestOptions<UserResponse>) -> Result<Option<UserResponse>, ClientError> {
        Ok(self.resource.item(LoadingKey::Get, ApiRequest::get("/me"), options).await?)
    }

    /// `PUT /users/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update(
        &self,
        id: UserId,
        request: &UserUpdateRequest,
        options: RequestOptions<Ack>,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::put(format!("/{id}")).json(request)?;
        let options = announce(&self.resource, options, MessageKey::UserUpdated);
        self.resource.opaque(LoadingKey::Update, request, options).await?;
        Ok(())
    }

    /// `DELETE /users/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete(&self, id: UserId, options: RequestOptions<Ack>) -> Result<(), ClientError> {
        let options = announce(&self.resource, options, MessageKey::UserDeleted);
        self.resource
            .opaque(LoadingKey::Delete, ApiRequest::delete(format!("/{id}")), options)
            .await?;
        Ok(())
    }
}
