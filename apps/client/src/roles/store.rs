use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::role::{Role, RoleSuggestion};
use crate::roles::service::RolesService;

const MESSAGE_KEYS: &[&str] = &["error", "detail"];

pub struct RolesStore {
    service: RolesService,
    pub roles: Vec<Role>,
    pub suggestions: Vec<RoleSuggestion>,
    pub error: Option<String>,
}

impl RolesStore {
    pub fn new(service: RolesService) -> Self {
        Self {
            service,
            roles: Vec::new(),
            suggestions: Vec::new(),
            error: None,
        }
    }

    pub async fn fetch_roles(&mut self, category: Option<&str>) -> Result<&[Role], ApiError> {
        self.error = None;
        match self.service.get_roles(category).await {
            Ok(roles) => {
                self.roles = roles;
                Ok(self.roles.as_slice())
            }
            Err(e) => Err(self.fail(e, "Failed to fetch roles")),
        }
    }

    pub async fn fetch_suggestions(&mut self, cv_id: Uuid) -> Result<&[RoleSuggestion], ApiError> {
        self.error = None;
        match self.service.get_role_suggestions(cv_id).await {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                Ok(self.suggestions.as_slice())
            }
            Err(e) => Err(self.fail(e, "Failed to fetch role suggestions")),
        }
    }

    fn fail(&mut self, e: ApiError, fallback: &str) -> ApiError {
        self.error = Some(
            e.field_message(MESSAGE_KEYS)
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

    const CV_ID: &str = "0b8e5a52-1a57-4a8e-9a52-5d1c2f6e9b10";

    fn store_for(server: &MockServer) -> RolesStore {
        let session =
            Arc::new(Session::restore(Box::new(MemoryTokenStore::with_tokens("a1", "r1"))).unwrap());
        let client = ApiClient::new(&Config::for_base_url(server.uri()), session).unwrap();
        RolesStore::new(RolesService::new(client))
    }

    #[tokio::test]
    async fn test_fetch_roles_passes_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles"))
            .and(query_param("category", "data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "results": [{
                    "id": "9c3b8f5e-7d2a-4b1c-8e6f-0a1b2c3d4e5f",
                    "name": "Data Engineer",
                    "category": "data",
                    "keywords_json": ["spark"]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        let roles = store.fetch_roles(Some("data")).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "Data Engineer");
    }

    #[tokio::test]
    async fn test_fetch_suggestions_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/cv/{CV_ID}/role-suggestions")))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Permission denied"})))
            .mount(&server)
            .await;

        let mut store = store_for(&server);
        let err = store
            .fetch_suggestions(CV_ID.parse().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(store.error.as_deref(), Some("Permission denied"));
        assert!(store.suggestions.is_empty());
    }
}
