use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::service::AuthService;
use crate::auth::Session;
use crate::errors::ApiError;
use crate::models::user::{AuthResponse, Credentials, Registration, User};

/// Auth state for the UI layer: wraps the shared `Session` and keeps the last error message.
pub struct AuthStore {
    service: AuthService,
    session: Arc<Session>,
    pub error: Option<String>,
}

impl AuthStore {
    pub fn new(service: AuthService, session: Arc<Session>) -> Self {
        Self {
            service,
            session,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.error = None;
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let result = match self.service.login(&credentials).await {
            Ok(response) => self.install(response),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            self.error = Some(
                e.field_message(&["detail"])
                    .unwrap_or_else(|| "Login failed".to_string()),
            );
            e
        })
    }

    pub async fn register(&mut self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.error = None;

        let result = match self.service.register(registration).await {
            Ok(response) if response.access.is_empty() || response.refresh.is_empty() => Err(
                ApiError::InvalidResponse("missing access or refresh token".to_string()),
            ),
            Ok(response) => self.install(response),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            self.error = Some(e.display_message("Registration failed. Please try again."));
            e
        })
    }

    /// Logs out on the backend if possible; local state is cleared regardless.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        if let Err(e) = self.service.logout().await {
            warn!("Backend logout failed, clearing local session anyway: {e}");
        }
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn refresh_access_token(&mut self) -> Result<String, ApiError> {
        self.service.refresh_token().await
    }

    #[allow(dead_code)]
    pub fn set_user(&mut self, user: Option<User>) -> Result<(), ApiError> {
        self.session.set_user(user)
    }

    fn install(&self, response: AuthResponse) -> Result<AuthResponse, ApiError> {
        self.session.establish(
            response.access.clone(),
            response.refresh.clone(),
            response.user.clone(),
        )?;
        Ok(response)
    }
}
