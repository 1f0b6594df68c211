use crate::api_client::{ApiClient, ApiRequest};
use crate::errors::ApiError;
use crate::models::analytics::{OverviewStats, SessionFilters, SessionHistoryPage};

#[derive(Clone)]
pub struct AnalyticsService {
    client: ApiClient,
}

impl AnalyticsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /analytics/overview
    pub async fn get_overview(&self) -> Result<OverviewStats, ApiError> {
        self.client
            .send_json(ApiRequest::get("/analytics/overview"))
            .await
    }

    /// GET /analytics/sessions
    pub async fn get_sessions(&self, filters: &SessionFilters) -> Result<SessionHistoryPage, ApiError> {
        self.client
            .send_json(ApiRequest::get("/analytics/sessions").query(filters.to_query()))
            .await
    }
}
