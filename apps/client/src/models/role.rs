use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords_json: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSuggestion {
    pub id: Uuid,
    pub role: Role,
    pub score: f64,
    #[serde(default)]
    pub reasons_json: Value,
}

/// `GET /roles` answers either a paginated page or a bare list depending on backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RoleListing {
    Page { results: Vec<Role> },
    List(Vec<Role>),
}

impl RoleListing {
    pub fn into_roles(self) -> Vec<Role> {
        match self {
            RoleListing::Page { results } => results,
            RoleListing::List(roles) => roles,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuggestionListing {
    Suggestions { suggestions: Vec<RoleSuggestion> },
    Page { results: Vec<RoleSuggestion> },
    List(Vec<RoleSuggestion>),
}

impl SuggestionListing {
    pub fn into_suggestions(self) -> Vec<RoleSuggestion> {
        match self {
            SuggestionListing::Suggestions { suggestions } => suggestions,
            SuggestionListing::Page { results } => results,
            SuggestionListing::List(suggestions) => suggestions,
        }
    }
}
