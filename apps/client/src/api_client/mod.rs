//! API client: the single point of entry for all backend calls.
//!
//! RULE: services never build their own HTTP requests. Everything goes through
//! `ApiClient::send`, which attaches the bearer token and turns transport failures
//! into network errors. On a 401 it refreshes the access token and resubmits once.
use std::sync::Arc;

use reqwest::{multipart, Client};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::config::Config;
use crate::errors::ApiError;
use crate::models::user::TokenRefresh;

pub mod request;

pub use request::{ApiRequest, RequestBody, UploadFile};

const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    /// Serializes refreshes so concurrent 401s mint one new token between them.
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    /// Sends the request and deserializes the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(ApiError::Decode)
    }

    /// Sends the request, resubmitting it once after a token refresh if the backend answers 401.
    /// An empty success body is returned as `Value::Null`.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        loop {
            let token = self.session.access_token();
            match self.execute(&request, token.as_deref()).await {
                Err(ApiError::Unauthorized { .. }) if !request.retried => {
                    request.retried = true;
                    debug!(
                        "{} {} returned 401, refreshing access token",
                        request.method, request.path
                    );
                    self.refresh_after_unauthorized(token).await?;
                }
                result => return result,
            }
        }
    }

    /// Exchanges the refresh token for a new access token.
    /// On failure the session is cleared and the failure is returned as `SessionExpired`.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_after_unauthorized(&self, stale_token: Option<String>) -> Result<(), ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.access_token();
        if current.is_some() && current != stale_token {
            debug!("Access token already refreshed by a concurrent request");
            return Ok(());
        }

        self.refresh_locked().await.map(|_| ())
    }

    async fn refresh_locked(&self) -> Result<String, ApiError> {
        let outcome = match self.session.refresh_token() {
            None => Err(ApiError::MissingRefreshToken),
            Some(refresh) => {
                let request = ApiRequest::post(REFRESH_PATH)
                    .json(&json!({ "refresh": refresh }))?
                    .without_refresh();
                match self.execute(&request, None).await {
                    Ok(body) => serde_json::from_value::<TokenRefresh>(body).map_err(ApiError::from),
                    Err(e) => Err(e),
                }
            }
        };

        match outcome {
            Ok(refreshed) => {
                self.session
                    .update_tokens(refreshed.access.clone(), refreshed.refresh)?;
                info!("Access token refreshed");
                Ok(refreshed.access)
            }
            Err(e) => {
                warn!("Token refresh failed, clearing session: {e}");
                if let Err(clear_err) = self.session.clear() {
                    warn!("Failed to clear persisted tokens: {clear_err}");
                }
                Err(ApiError::SessionExpired(Box::new(e)))
            }
        }
    }

    /// One attempt, no retry.
    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(file) => builder.multipart(build_form(file)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| self.network_error(request, &e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.network_error(request, &e))?;

        if status.is_success() {
            debug!("{} {} -> {}", request.method, request.path, status);
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| {
                ApiError::InvalidResponse(format!(
                    "{} {} returned a non-JSON body: {e}",
                    request.method, request.path
                ))
            });
        }

        let body = parse_error_body(&bytes);
        warn!(
            "{} {} -> {}: {}",
            request.method,
            request.path,
            status,
            body.as_ref().map(serde_json::Value::to_string).unwrap_or_default()
        );
        Err(ApiError::from_status(status, body))
    }

    fn network_error(&self, request: &ApiRequest, e: &reqwest::Error) -> ApiError {
        let message = error_chain(e);
        let err = ApiError::network(&message, &self.base_url);
        if let ApiError::Network { kind, .. } = &err {
            warn!(
                "{} {} failed without a response ({kind:?}): {message}",
                request.method, request.path
            );
        }
        err
    }
}

fn build_form(file: &UploadFile) -> Result<multipart::Form, ApiError> {
    let part = multipart::Part::stream_with_length(file.bytes.clone(), file.bytes.len() as u64)
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ApiError::Request(format!("Invalid MIME type '{}': {e}", file.mime_type)))?;
    Ok(multipart::Form::new().part("file", part))
}

/// Error bodies are usually JSON; anything else is kept as text.
fn parse_error_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())),
    )
}

fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
