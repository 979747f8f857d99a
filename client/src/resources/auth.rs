use super::{Ack, announce};
use crate::auth_store::AuthStore;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::executor::{LoadingKey, RequestOptions, Resource};
use crate::http::{ApiRequest, HttpClient};
use ticketdesk_core::MessageKey;
use ticketdesk_core::types::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserRole,
};
use ticketdesk_runtime::NotificationCenter;

/// `/auth`. Successful logins and registrations are persisted in the
/// [`AuthStore`] before the caller's `on_success` runs.
#[derive(Clone, Debug)]
pub struct AuthApi {
    resource: Resource<LoginResponse>,
    store: AuthStore,
}

impl AuthApi {
    /// Path segment under the API root.
    pub const NAME: &'static str = "auth";

    /// Module bound to `{api_base_url}/auth`, persisting sessions in `store`.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        http: HttpClient,
        notifications: NotificationCenter,
        store: AuthStore,
    ) -> Self {
        Self {
            resource: Resource::new(Self::NAME, config, http, notifications),
            store,
        }
    }

    /// Underlying executor.
    #[must_use]
    pub const fn resource(&self) -> &Resource<LoginResponse> {
        &self.resource
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn login(
        &self,
        request: &LoginRequest,
        options: RequestOptions<LoginResponse>,
    ) -> Result<Option<LoginResponse>, ClientError> {
        let request = ApiRequest::post("/login").json(request)?;
        let options = announce(&self.resource, options, MessageKey::LoginSuccess);
        self.sign_in(LoadingKey::Login, request, options).await
    }

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn register(
        &self,
        request: &RegisterRequest,
        options: RequestOptions<LoginResponse>,
    ) -> Result<Option<LoginResponse>, ClientError> {
        let request = ApiRequest::post("/register").json(request)?;
        let options = announce(&self.resource, options, MessageKey::RegisterSuccess);
        self.sign_in(LoadingKey::Register, request, options).await
    }

    /// `PUT /auth/change-password`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the call fails.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
        options: RequestOptions<Ack>,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::put("/change-password").json(request)?;
        let options = announce(&self.resource, options, MessageKey::PasswordChanged);
        self.resource
            .opaque(LoadingKey::ChangePassword, request, options)
            .await?;
        Ok(())
    }

    /// Sign out locally.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the persisted session cannot be
    /// removed. The in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), ClientError> {
        Ok(self.store.clear_token()?)
    }

    /// Whether a session token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Role of the current session.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.store.role()
    }

    async fn sign_in(
        &self,
        key: LoadingKey,
        request: ApiRequest,
        options: RequestOptions<LoginResponse>,
    ) -> Result<Option<LoginResponse>, ClientError> {
        let store = self.store.clone();
        let options = options.before_success(move |session: Option<&LoginResponse>| {
            if let Some(session) = session.filter(|s| !s.token.is_empty()) {
                if let Err(err) = store.set_auth(&session.token, session.role) {
                    tracing::error!(error = %err, "Failed to persist session");
                }
            }
        });
        Ok(self.resource.opaque(key, request, options).await?)
    }
}

impl std::ops::Deref for AuthApi {
    type Target = Resource<LoginResponse>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
