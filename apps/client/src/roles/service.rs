use uuid::Uuid;

use crate::api_client::{ApiClient, ApiRequest};
use crate::errors::ApiError;
use crate::models::role::{Role, RoleListing, RoleSuggestion, SuggestionListing};

#[derive(Clone)]
pub struct RolesService {
    client: ApiClient,
}

impl RolesService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /roles, optionally filtered by category.
    pub async fn get_roles(&self, category: Option<&str>) -> Result<Vec<Role>, ApiError> {
        let query = category
            .map(|c| vec![("category".to_string(), c.to_string())])
            .unwrap_or_default();
        let listing: RoleListing = self
            .client
            .send_json(ApiRequest::get("/roles").query(query))
            .await?;
        Ok(listing.into_roles())
    }

    /// GET /cv/{id}/role-suggestions
    pub async fn get_role_suggestions(&self, cv_id: Uuid) -> Result<Vec<RoleSuggestion>, ApiError> {
        let listing: SuggestionListing = self
            .client
            .send_json(ApiRequest::get(format!("/cv/{cv_id}/role-suggestions")))
            .await?;
        Ok(listing.into_suggestions())
    }
}
