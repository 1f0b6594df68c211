use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body of `/auth/login` and `/auth/register` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub refresh: String,
    pub user: Option<User>,
    pub message: Option<String>,
}

/// Body of `/auth/refresh`. `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub access: String,
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}
