//! Job posting parsing. Hands raw posting text to the backend and returns its structured reading.

use serde_json::{json, Value};

use crate::api_client::{ApiClient, ApiRequest};
use crate::errors::ApiError;

#[derive(Clone)]
pub struct JobPostingService {
    client: ApiClient,
}

impl JobPostingService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /job-posting/parse
    pub async fn parse_job_posting(&self, text: &str) -> Result<Value, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Request("Job posting text is required".to_string()));
        }
        self.client
            .send(ApiRequest::post("/job-posting/parse").json(&json!({ "text": text }))?)
            .await
    }
}
