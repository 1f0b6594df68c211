use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a request never produced an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The transport reported a cross-origin rejection.
    Cors,
    /// Connection refused, DNS failure, timeout, truncated body.
    Connectivity,
}

/// Client-level error type.
/// Every service and store operation returns `Result<T, ApiError>`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Network {
        kind: NetworkFailure,
        message: String,
    },

    #[error("Unauthorized")]
    Unauthorized { body: Option<Value> },

    #[error("Session expired: {0}")]
    SessionExpired(#[source] Box<ApiError>),

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Validation error (status {status})")]
    Validation {
        status: u16,
        errors: Map<String, Value>,
    },

    #[error("API error (status {status})")]
    Api { status: u16, body: Option<Value> },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request build error: {0}")]
    Request(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

const CORS_MESSAGE: &str = "CORS Error: The backend may not be configured to allow requests from this origin. Check CORS settings.";

impl ApiError {
    /// Builds the network error for a request that never reached the server.
    /// Messages mentioning CORS are reported as cross-origin failures.
    pub fn network(transport_message: &str, base_url: &str) -> Self {
        if transport_message.contains("CORS") {
            return ApiError::Network {
                kind: NetworkFailure::Cors,
                message: CORS_MESSAGE.to_string(),
            };
        }
        ApiError::Network {
            kind: NetworkFailure::Connectivity,
            message: format!(
                "Network Error: Unable to connect to the server. Please make sure the backend is running on {base_url}"
            ),
        }
    }

    /// Classifies a non-success HTTP response by status and body.
    pub fn from_status(status: StatusCode, body: Option<Value>) -> Self {
        match (status, body) {
            (StatusCode::UNAUTHORIZED, body) => ApiError::Unauthorized { body },
            (StatusCode::BAD_REQUEST, Some(Value::Object(errors))) => ApiError::Validation {
                status: status.as_u16(),
                errors,
            },
            (status, body) => ApiError::Api {
                status: status.as_u16(),
                body,
            },
        }
    }

    pub fn is_network_error(&self) -> bool {
        match self {
            ApiError::Network { .. } => true,
            ApiError::SessionExpired(source) => source.is_network_error(),
            _ => false,
        }
    }

    /// True when the caller should send the user back to the login surface.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::SessionExpired(_) | ApiError::MissingRefreshToken
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            ApiError::Validation { status, .. } | ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The structured error body returned by the backend, if any.
    pub fn body(&self) -> Option<&Map<String, Value>> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            ApiError::Unauthorized { body: Some(Value::Object(map)) }
            | ApiError::Api {
                body: Some(Value::Object(map)),
                ..
            } => Some(map),
            _ => None,
        }
    }

    /// Returns the message under the first of `keys` present in the error body.
    pub fn field_message(&self, keys: &[&str]) -> Option<String> {
        let body = self.body()?;
        keys.iter()
            .filter_map(|key| body.get(*key))
            .find_map(|value| joined_message(value))
    }

    /// Human-readable message for display, in priority order:
    /// field errors, `detail`, `non_field_errors`, first field, raw message, fallback.
    pub fn display_message(&self, fallback: &str) -> String {
        if self.is_network_error() {
            return self.to_string();
        }
        if let Some(body) = self.body() {
            if let Some(message) = self.field_message(&["password", "email", "detail", "non_field_errors"]) {
                return message;
            }
            return body
                .values()
                .next()
                .and_then(first_message)
                .unwrap_or_else(|| fallback.to_string());
        }
        let raw = self.to_string();
        if raw.is_empty() {
            fallback.to_string()
        } else {
            raw
        }
    }
}

/// A key counts as present unless its value is null, false, zero or an empty string.
/// An empty array is present and yields an empty message.
fn joined_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(first_message),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
