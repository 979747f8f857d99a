//! HTTP transport with shared default headers.
//!
//! Every request carries `Accept-Language` and, while a session is active,
//! `Authorization: Bearer <token>`. The bearer token is only changed by the
//! auth store.

use crate::config::ClientConfig;
use crate::error::ClientError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};
use ticketdesk_core::types::ImageFile;
use ticketdesk_core::{Envelope, Locale};

/// Body of an [`ApiRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Serialized JSON
    Json(Vec<u8>),
    /// `multipart/form-data`
    Multipart(MultipartForm),
}

/// Multipart form kept as plain data until it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Text fields, in order
    pub text: Vec<(String, String)>,
    /// File fields, in order
    pub files: Vec<(String, ImageFile)>,
}

impl MultipartForm {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }

    /// Append a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: ImageFile) -> Self {
        self.files.push((name.into(), file));
        self
    }

    fn into_form(self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, file) in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| ClientError::Encode(format!("content type {}: {e}", file.content_type)))?;
            form = form.part(name, part);
        }
        for (name, value) in self.text {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

/// Request relative to a resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path appended to the resource root, `""` or starting with `/`
    pub path: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Body
    pub body: RequestBody,
}

impl ApiRequest {
    /// Request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Encode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(bytes);
        Ok(self)
    }

    /// Attach a multipart body.
    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

/// Response whose envelope may or may not have decoded.
#[derive(Debug)]
pub struct HttpResponse<R> {
    /// HTTP status code
    pub status: u16,
    /// Decoded envelope, or the decoding error
    pub envelope: Result<Envelope<R>, String>,
}

impl<R> HttpResponse<R> {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_http_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug)]
struct DefaultHeaders {
    locale: Locale,
    bearer: Option<String>,
}

/// Shared HTTP client.
///
/// Clones share the connection pool and the default headers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    defaults: Arc<RwLock<DefaultHeaders>>,
}

impl HttpClient {
    /// Client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("http client: {e}")))?;

        Ok(Self {
            client,
            defaults: Arc::new(RwLock::new(DefaultHeaders {
                locale: config.locale,
                bearer: None,
            })),
        })
    }

    /// Set or clear the bearer token sent with every request.
    pub fn set_bearer_token(&self, token: Option<&str>) {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .bearer = token.map(str::to_string);
    }

    /// Bearer token currently sent, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .bearer
            .clone()
    }

    /// Change the `Accept-Language` sent with every request.
    pub fn set_locale(&self, locale: Locale) {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .locale = locale;
    }

    /// Locale currently sent.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner).locale
    }

    /// Send `request` to `url` and decode the envelope.
    ///
    /// Only a missing response is an error; any status code, including
    /// non-2xx, yields an [`HttpResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if no response arrived (or its body
    /// could not be read) and [`ClientError::Encode`] for a malformed
    /// multipart body.
    pub async fn send<R>(&self, url: &str, request: &ApiRequest) -> Result<HttpResponse<R>, ClientError>
    where
        R: DeserializeOwned,
    {
        let (locale, bearer) = {
            let defaults = self.defaults.read().unwrap_or_else(PoisonError::into_inner);
            (defaults.locale, defaults.bearer.clone())
        };

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(header::ACCEPT, "application/json")
            .header(header::ACCEPT_LANGUAGE, locale.accept_language());
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            RequestBody::Multipart(form) => builder.multipart(form.clone().into_form()?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let envelope = serde_json::from_slice::<Envelope<R>>(&bytes).map_err(|e| e.to_string());
        Ok(HttpResponse { status, envelope })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let defaults = self.defaults.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("HttpClient")
            .field("locale", &defaults.locale)
            .field("authorized", &defaults.bearer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("").query("imageType", "poster");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, vec![("imageType".to_string(), "poster".to_string())]);

        let request = ApiRequest::post("/search").json(&json!({"a": 1})).unwrap();
        assert_eq!(request.body, RequestBody::Json(br#"{"a":1}"#.to_vec()));
    }

    #[test]
    fn test_bearer_token_is_shared_between_clones() {
        let http = HttpClient::new(&ClientConfig::default()).unwrap();
        let clone = http.clone();
        http.set_bearer_token(Some("abc"));
        assert_eq!(clone.bearer_token().as_deref(), Some("abc"));
        clone.set_bearer_token(None);
        assert_eq!(http.bearer_token(), None);
    }

    #[test]
    fn test_invalid_content_type_is_an_encode_error() {
        let form = MultipartForm::new().file("image", ImageFile::new("a.png", "not a mime", vec![1]));
        assert!(matches!(form.into_form(), Err(ClientError::Encode(_))));
    }
}
