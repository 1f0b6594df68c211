use uuid::Uuid;

use crate::api_client::{ApiClient, ApiRequest, UploadFile};
use crate::errors::ApiError;
use crate::models::profile::{CvDocument, Profile, ProfileUpdate};

#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /profile/me
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.client.send_json(ApiRequest::get("/profile/me")).await
    }

    /// PATCH /profile/me
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.client
            .send_json(ApiRequest::patch("/profile/me").json(update)?)
            .await
    }

    /// POST /cv/upload (multipart, field `file`)
    pub async fn upload_cv(&self, file: UploadFile) -> Result<CvDocument, ApiError> {
        self.client
            .send_json(ApiRequest::post("/cv/upload").multipart(file))
            .await
    }

    /// GET /cv/{id}
    pub async fn get_cv_document(&self, id: Uuid) -> Result<CvDocument, ApiError> {
        self.client
            .send_json(ApiRequest::get(format!("/cv/{id}")))
            .await
    }
}
