use crate::analytics::service::AnalyticsService;
use crate::errors::ApiError;
use crate::models::analytics::{OverviewStats, SessionFilters, SessionHistoryPage};
use crate::models::interview::InterviewSession;

pub struct AnalyticsStore {
    service: AnalyticsService,
    pub overview: Option<OverviewStats>,
    pub sessions: Vec<InterviewSession>,
    pub error: Option<String>,
}

impl AnalyticsStore {
    pub fn new(service: AnalyticsService) -> Self {
        Self {
            service,
            overview: None,
            sessions: Vec::new(),
            error: None,
        }
    }

    pub async fn fetch_overview(&mut self) -> Result<OverviewStats, ApiError> {
        self.error = None;
        match self.service.get_overview().await {
            Ok(overview) => {
                self.overview = Some(overview.clone());
                Ok(overview)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch overview")),
        }
    }

    pub async fn fetch_sessions(&mut self, filters: &SessionFilters) -> Result<SessionHistoryPage, ApiError> {
        self.error = None;
        match self.service.get_sessions(filters).await {
            Ok(page) => {
                self.sessions = page.results.clone();
                Ok(page)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch sessions")),
        }
    }

    // Analytics endpoints report failures under `error` only.
    fn fail(&mut self, e: ApiError, fallback: &str) -> ApiError {
        self.error = Some(
            e.field_message(&["error"])
                .unwrap_or_else(|| fallback.to_string()),
        );
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ApiClient;
    use crate::auth::token_store::MemoryTokenStore;
    use crate::auth::Session;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> AnalyticsStore {
        let session =
            Arc::new(Session::restore(Box::new(MemoryTokenStore::with_tokens("a1", "r1"))).unwrap());
        let client = ApiClient::new(&Config::for_base_url(server.uri()), session).unwrap();
        AnalyticsStore::new(AnalyticsService::new(client))
    }

    #[tokio::test]
    async fn test_fetch_overview() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/overview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "overall_score": 72.5,
                "total_sessions": 4,
                "score_trend": [{"date": "2024-05-01", "score": "70"}],
                "category_trend": {"technical": 75.0, "hr": 68.0},
                "top_improving_skills": [],
                "top_weak_skills": [{"skill": "sql", "score": "40"}]
            })))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        let overview = store.fetch_overview().await.unwrap();
        assert_eq!(overview.total_sessions, 4);
        assert_eq!(overview.category_trend["technical"], 75.0);
        assert!(store.overview.is_some());
    }

    #[tokio::test]
    async fn test_fetch_sessions_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/sessions"))
            .and(query_param("limit", "5"))
            .and(query_param("type", "hr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [], "count": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        let filters = SessionFilters {
            limit: Some(5),
            offset: None,
            interview_type: Some("hr".into()),
        };
        let page = store.fetch_sessions(&filters).await.unwrap();
        assert_eq!(page.count, 0);
        assert!(store.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_error_ignores_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/overview"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        assert!(store.fetch_overview().await.is_err());
        assert_eq!(store.error.as_deref(), Some("Failed to fetch overview"));
    }
}
