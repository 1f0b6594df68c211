use std::sync::Arc;

use crate::analytics::{service::AnalyticsService, store::AnalyticsStore};
use crate::api_client::ApiClient;
use crate::auth::token_store::MemoryTokenStore;
use crate::auth::{service::AuthService, store::AuthStore, FileTokenStore, Session, TokenStore};
use crate::config::Config;
use crate::errors::ApiError;
use crate::interviews::{service::InterviewService, store::InterviewStore};
use crate::job_posting::JobPostingService;
use crate::profile::{service::ProfileService, store::ProfileStore};
use crate::roles::{service::RolesService, store::RolesStore};

/// Shared client state: one session and one HTTP client behind every store.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub session: Arc<Session>,
    pub client: ApiClient,
}

impl AppState {
    /// Restores the session from disk, or from nothing when `ephemeral` is set.
    pub fn init(config: Config, ephemeral: bool) -> Result<Self, ApiError> {
        let store: Box<dyn TokenStore> = if ephemeral {
            Box::new(MemoryTokenStore::default())
        } else {
            Box::new(FileTokenStore::new(&config.token_store_path))
        };
        let session = Arc::new(Session::restore(store)?);
        let client = ApiClient::new(&config, session.clone())?;

        Ok(Self {
            config,
            session,
            client,
        })
    }

    pub fn auth_store(&self) -> AuthStore {
        AuthStore::new(AuthService::new(self.client.clone()), self.session.clone())
    }

    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(ProfileService::new(self.client.clone()))
    }

    pub fn interview_store(&self) -> InterviewStore {
        InterviewStore::new(InterviewService::new(self.client.clone()))
    }

    pub fn roles_store(&self) -> RolesStore {
        RolesStore::new(RolesService::new(self.client.clone()))
    }

    pub fn analytics_store(&self) -> AnalyticsStore {
        AnalyticsStore::new(AnalyticsService::new(self.client.clone()))
    }

    pub fn job_postings(&self) -> JobPostingService {
        JobPostingService::new(self.client.clone())
    }
}
