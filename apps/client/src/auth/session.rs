use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::auth::token_store::{PersistedSession, TokenStore};
use crate::errors::ApiError;
use crate::models::user::User;

#[derive(Debug, Clone, Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
}

impl SessionState {
    fn snapshot(&self) -> PersistedSession {
        PersistedSession {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
        }
    }
}

/// Authentication context shared by the API client and the stores.
///
/// Holds the token pair and the signed-in user in memory and mirrors both
/// into a `TokenStore` on every change. Concurrent flows are
/// last-writer-wins: there is no guard against a login racing a logout.
pub struct Session {
    state: RwLock<SessionState>,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Builds a session from whatever tokens the store persisted last.
    pub fn restore(store: Box<dyn TokenStore>) -> Result<Self, ApiError> {
        let persisted = store.load()?;
        debug!(
            "Restored session (access token present: {})",
            persisted.access_token.is_some()
        );
        Ok(Self {
            state: RwLock::new(SessionState {
                access_token: persisted.access_token,
                refresh_token: persisted.refresh_token,
                user: persisted.user,
            }),
            store,
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().access_token.is_some()
    }

    /// Installs a fresh token pair after login or registration.
    pub fn establish(&self, access: String, refresh: String, user: Option<User>) -> Result<(), ApiError> {
        let persisted = {
            let mut state = self.write();
            state.access_token = Some(access);
            state.refresh_token = Some(refresh);
            state.user = user;
            state.snapshot()
        };
        self.store.save(&persisted)?;
        info!("Session established");
        Ok(())
    }

    /// Replaces the access token after a refresh. A rotated refresh token replaces the old one.
    pub fn update_tokens(&self, access: String, refresh: Option<String>) -> Result<(), ApiError> {
        let persisted = {
            let mut state = self.write();
            state.access_token = Some(access);
            if let Some(refresh) = refresh {
                state.refresh_token = Some(refresh);
            }
            state.snapshot()
        };
        self.store.save(&persisted)
    }

    pub fn set_user(&self, user: Option<User>) -> Result<(), ApiError> {
        let persisted = {
            let mut state = self.write();
            state.user = user;
            state.snapshot()
        };
        self.store.save(&persisted)
    }

    /// Drops tokens and user, in memory and on disk.
    pub fn clear(&self) -> Result<(), ApiError> {
        *self.write() = SessionState::default();
        self.store.clear()?;
        info!("Session cleared");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
