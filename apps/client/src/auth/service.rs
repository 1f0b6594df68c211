use crate::api_client::{ApiClient, ApiRequest};
use crate::errors::ApiError;
use crate::models::user::{AuthResponse, Credentials, Registration};

/// Wrappers for the `/auth/*` endpoints.
/// Login and registration never trigger a token refresh: a 401 there means bad credentials.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /auth/login
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/auth/login")
            .json(credentials)?
            .without_refresh();
        self.client.send_json(request).await
    }

    /// POST /auth/register
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = ApiRequest::post("/auth/register")
            .json(registration)?
            .without_refresh();
        self.client.send_json(request).await
    }

    /// POST /auth/logout
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.send(ApiRequest::post("/auth/logout")).await?;
        Ok(())
    }

    /// POST /auth/refresh, updating the session on success.
    pub async fn refresh_token(&self) -> Result<String, ApiError> {
        self.client.refresh_access_token().await
    }
}
