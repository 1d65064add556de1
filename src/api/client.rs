// ABOUTME: HTTP gateway to the marketplace backend
// Attaches the session token, sends JSON or multipart bodies and maps every failure to ApiError

use crate::api::error::{extract_message, parse_field_errors, ApiError, GENERAL_FIELD};
use crate::config::ApiConfig;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Issue one request; the body, when given, is sent as JSON
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(&method, path, builder).await
    }

    /// JSON POST authorized with `token` instead of the current session token
    pub async fn post_as<B, T>(&self, path: &str, token: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.post(self.url(path)).json(body);
        self.send_with(&Method::POST, path, builder, Some(token.to_string()))
            .await
    }

    /// Multipart POST, used for file uploads
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let builder = self.client.post(self.url(path)).multipart(form);
        self.send(&Method::POST, path, builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let token = self.session.get_token();
        self.send_with(method, path, builder, token).await
    }

    async fn send_with<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
        token: Option<String>,
    ) -> Result<T, ApiError> {
        let builder = match token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed without a response: {}", method, path, e);
            ApiError::Transport
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("{} {} response body could not be read: {}", method, path, e);
            ApiError::Transport
        })?;
        debug!(
            "{} {} -> {} in {}ms",
            method,
            path,
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if status.is_success() {
            decode(&bytes).map_err(|e| {
                error!("{} {} returned a body we could not decode: {}", method, path, e);
                ApiError::UnexpectedResponse(e)
            })
        } else {
            Err(self.map_failure(status, &bytes, token.as_deref()))
        }
    }

    fn map_failure(&self, status: StatusCode, body: &[u8], sent_token: Option<&str>) -> ApiError {
        let json: Option<Value> = serde_json::from_slice(body).ok();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                if let Some(token) = sent_token {
                    if let Err(e) = self.session.expire_token(token) {
                        warn!("Session rejected but could not be fully cleared: {}", e);
                    }
                }
                ApiError::Unauthenticated
            }
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let fields = json.as_ref().map(parse_field_errors).unwrap_or_default();
                if fields.is_empty() {
                    ApiError::validation(GENERAL_FIELD, "The server rejected the request.")
                } else {
                    ApiError::ValidationFailed(fields)
                }
            }
            _ => ApiError::Server {
                status: status.as_u16(),
                message: json
                    .as_ref()
                    .and_then(extract_message)
                    .or_else(|| status.canonical_reason().map(ToString::to_string))
                    .unwrap_or_else(|| "Unknown error".to_string()),
            },
        }
    }
}

/// Empty bodies decode as JSON `null`, so `()` and `Option<_>` accept 204s
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| e.to_string())
}
