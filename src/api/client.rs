//! Reqwest-backed HTTP client wrapper.
//!
//! Every request to the REST API goes through [`HttpClient`], which owns the
//! transport details:
//!
//! - `Authorization: Bearer <token>` when the shared credentials hold a token
//! - a fixed request deadline, surfaced as [`BloglineError::Timeout`]
//! - a `traceparent` header linking the request to the issuing span
//! - mapping of non-success responses to a single human-readable message
//! - dropping the in-memory token on 401
//!
//! It does not retry, and it does not touch durable storage. Reacting to a
//! 401 beyond the in-memory token is the store's job.

use crate::api::endpoints::ApiPath;
use crate::domain::error::{BloglineError, Result};
use crate::domain::{Credentials, ImageUpload};
use crate::observability::current_traceparent;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::Instrument;

/// Request deadline used when the configuration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A value in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(ImageUpload),
}

/// Transport-independent description of a multipart body.
///
/// Built by the service layer and converted to a reqwest form only when the
/// request is sent, so field selection can be checked without a server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    fields: Vec<(&'static str, FormValue)>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, FormValue::Text(value.into())));
        self
    }

    /// Adds a text field only when `value` is present.
    #[must_use]
    pub fn text_opt(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    /// Adds a file field only when `image` is present.
    #[must_use]
    pub fn file_opt(mut self, name: &'static str, image: Option<&ImageUpload>) -> Self {
        if let Some(image) = image {
            self.fields.push((name, FormValue::File(image.clone())));
        }
        self
    }

    /// First value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(image) => {
                    let part = Part::bytes(image.bytes)
                        .file_name(image.file_name)
                        .mime_str(&image.mime_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Extracts the human-readable message from an error response body.
///
/// Looks at `message` first (a string, or the first element of an array of
/// validation messages), then at `error`. Returns `None` when the body is not
/// JSON or carries neither.
///
/// # Example
///
/// ```
/// use blogline::api::client::extract_error_message;
///
/// let body = br#"{"message":["title must be longer than 3 characters"],"error":"Bad Request"}"#;
/// assert_eq!(
///     extract_error_message(body).as_deref(),
///     Some("title must be longer than 3 characters")
/// );
/// ```
#[must_use]
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    use serde_json::Value;

    let value: Value = serde_json::from_slice(body).ok()?;

    match value.get("message") {
        Some(Value::String(message)) if !message.is_empty() => return Some(message.clone()),
        Some(Value::Array(items)) => match items.first() {
            Some(Value::String(message)) => return Some(message.clone()),
            Some(other) => return Some(other.to_string()),
            None => {}
        },
        _ => {}
    }

    match value.get("error") {
        Some(Value::String(error)) if !error.is_empty() => Some(error.clone()),
        _ => None,
    }
}

fn status_message(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| BloglineError::Decode(e.to_string()))
}

/// HTTP client bound to one API base URL and one set of credentials.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl HttpClient {
    /// Builds a client with an explicit request deadline.
    ///
    /// # Errors
    ///
    /// Returns [`BloglineError::Config`] if `base_url` is not an absolute
    /// http(s) URL or the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BloglineError::Config(format!("invalid API base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(BloglineError::Config(format!(
                "API base URL must be http(s): {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BloglineError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, timeout_ms = timeout.as_millis(), "http client ready");

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// The shared in-memory credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Absolute URL for `path`, with each segment percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`BloglineError::Config`] if the base URL cannot carry a path.
    pub fn url(&self, path: &ApiPath) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                BloglineError::Config("API base URL cannot carry a path".to_string())
            })?;
            segments.pop_if_empty().extend(path.segments());
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &ApiPath) -> Result<RequestBuilder> {
        let mut builder = self
            .client
            .request(method, self.url(path)?)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = self.credentials.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(traceparent) = current_traceparent() {
            builder = builder.header("traceparent", traceparent);
        }
        Ok(builder)
    }

    /// Sends the request and returns the body of a successful response.
    async fn send(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED {
            let cleared = self.credentials.clear();
            tracing::debug!(cleared = cleared, "401 received, in-memory token dropped");
            return Err(BloglineError::Unauthorized {
                message: extract_error_message(&body).unwrap_or_else(|| status_message(status)),
            });
        }

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| status_message(status));
            tracing::debug!(status = status.as_u16(), message = %message, "request rejected");
            return Err(BloglineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "request succeeded");
        Ok(body.to_vec())
    }

    /// `GET path?query` decoded as `T`.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport, status, or decode error.
    pub async fn get<T: DeserializeOwned>(&self, path: &ApiPath, query: &[(&str, String)]) -> Result<T> {
        let span = tracing::debug_span!("http_request", method = "GET", path = %path);
        async {
            let builder = self.request(Method::GET, path)?.query(query);
            decode(&self.send(builder).await?)
        }
        .instrument(span)
        .await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport, status, or decode error.
    pub async fn post_json<B, T>(&self, path: &ApiPath, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport, status, or decode error.
    pub async fn patch_json<B, T>(&self, path: &ApiPath, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &ApiPath, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let span = tracing::debug_span!("http_request", method = %method, path = %path);
        async {
            let builder = self.request(method.clone(), path)?.json(body);
            decode(&self.send(builder).await?)
        }
        .instrument(span)
        .await
    }

    /// `POST path` without a body.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport, status, or decode error.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &ApiPath) -> Result<T> {
        let span = tracing::debug_span!("http_request", method = "POST", path = %path);
        async {
            let builder = self.request(Method::POST, path)?;
            decode(&self.send(builder).await?)
        }
        .instrument(span)
        .await
    }

    /// `POST path` with a multipart body.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport, status, or decode error.
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &ApiPath, body: MultipartBody) -> Result<T> {
        self.send_multipart(Method::POST, path, body).await
    }

    /// `PATCH path` with a multipart body.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport, status, or decode error.
    pub async fn patch_multipart<T: DeserializeOwned>(&self, path: &ApiPath, body: MultipartBody) -> Result<T> {
        self.send_multipart(Method::PATCH, path, body).await
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &ApiPath,
        body: MultipartBody,
    ) -> Result<T> {
        let span = tracing::debug_span!("http_request", method = %method, path = %path, multipart = true);
        async {
            let builder = self.request(method.clone(), path)?.multipart(body.into_form()?);
            decode(&self.send(builder).await?)
        }
        .instrument(span)
        .await
    }

    /// `DELETE path`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns the mapped transport or status error.
    pub async fn delete(&self, path: &ApiPath) -> Result<()> {
        let span = tracing::debug_span!("http_request", method = "DELETE", path = %path);
        async {
            let builder = self.request(Method::DELETE, path)?;
            self.send(builder).await.map(|_| ())
        }
        .instrument(span)
        .await
    }
}
