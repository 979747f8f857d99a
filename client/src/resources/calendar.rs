use super::{announce, resource_api};
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions};
use crate::http::ApiRequest;
use ticketdesk_core::MessageKey;
use ticketdesk_core::ids::{CalendarEntryId, UserId};
use ticketdesk_core::types::{
    UserCalendarAddEventRequest, UserCalendarEventResponse, UserCalendarResponse,
    UserCalendarUpdateEventRequest,
};

resource_api!(
    /// `/calendar`. The cached item is the last calendar loaded.
    CalendarApi,
    UserCalendarResponse,
    "calendar"
);

type Entry = UserCalendarEventResponse;

impl CalendarApi {
    /// `GET /calendar/me`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn my_calendar(
        &self,
        options: RequestOptions<UserCalendarResponse>,
    ) -> Result<Option<UserCalendarResponse>, ClientError> {
        Ok(self.resource.item(LoadingKey::Get, ApiRequest::get("/me"), options).await?)
    }

    /// `POST /calendar/user/{user_id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn add_user_event(
        &self,
        user_id: UserId,
        request: &UserCalendarAddEventRequest,
        options: RequestOptions<Entry>,
    ) -> Result<Option<Entry>, ClientError> {
        let request = ApiRequest::post(format!("/user/{user_id}")).json(request)?;
        self.entry(LoadingKey::Create, request, options, MessageKey::CalendarEventAdded)
            .await
    }

    /// `POST /calendar/me`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn add_my_event(
        &self,
        request: &UserCalendarAddEventRequest,
        options: RequestOptions<Entry>,
    ) -> Result<Option<Entry>, ClientError> {
        let request = ApiRequest::post("/me").json(request)?;
        self.entry(LoadingKey::Create, request, options, MessageKey::CalendarEventAdded)
            .await
    }

    /// `DELETE /calendar/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete_user_event(
        &self,
        id: CalendarEntryId,
        options: RequestOptions<Entry>,
    ) -> Result<Option<Entry>, ClientError> {
        let request = ApiRequest::delete(format!("/{id}"));
        self.entry(LoadingKey::Delete, request, options, MessageKey::CalendarEventDeleted)
            .await
    }

    /// `DELETE /calendar/me/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn delete_my_event(
        &self,
        id: CalendarEntryId,
        options: RequestOptions<Entry>,
    ) -> Result<Option<Entry>, ClientError> {
        let request = ApiRequest::delete(format!("/me/{id}"));
        self.entry(LoadingKey::Delete, request, options, MessageKey::CalendarEventDeleted)
            .await
    }

    /// `PUT /calendar/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update_user_event(
        &self,
        id: CalendarEntryId,
        request: &UserCalendarUpdateEventRequest,
        options: RequestOptions<Entry>,
    ) -> Result<Option<Entry>, ClientError> {
        let request = ApiRequest::put(format!("/{id}")).json(request)?;
        self.entry(LoadingKey::Update, request, options, MessageKey::CalendarEventUpdated)
            .await
    }

    /// `PUT /calendar/me/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be encoded or the call fails.
    pub async fn update_my_event(
        &self,
        id: CalendarEntryId,
        request: &UserCalendarUpdateEventRequest,
        options: RequestOptions<Entry>,
    ) -> Result<Option<Entry>, ClientError> {
        let request = ApiRequest::put(format!("/me/{id}")).json(request)?;
        self.entry(LoadingKey::Update, request, options, MessageKey::CalendarEventUpdated)
            .await
    }

    async fn entry(
        &self,
        key: LoadingKey,
        request: ApiRequest,
        options: RequestOptions<Entry>,
        message: MessageKey,
    ) -> Result<Option<Entry>, ClientError> {
        let options = announce(&self.resource, options, message);
        Ok(self.resource.opaque(key, request, options).await?)
    }
}
