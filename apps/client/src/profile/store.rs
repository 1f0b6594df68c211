use tracing::debug;
use uuid::Uuid;

use crate::api_client::UploadFile;
use crate::errors::ApiError;
use crate::models::profile::{CvDocument, Profile, ProfileUpdate};
use crate::profile::level::{determine_level, Level};
use crate::profile::service::ProfileService;

const MESSAGE_KEYS: &[&str] = &["error", "detail"];

pub struct ProfileStore {
    service: ProfileService,
    pub profile: Option<Profile>,
    pub cv_document: Option<CvDocument>,
    pub error: Option<String>,
}

impl ProfileStore {
    pub fn new(service: ProfileService) -> Self {
        Self {
            service,
            profile: None,
            cv_document: None,
            error: None,
        }
    }

    pub async fn fetch_profile(&mut self) -> Result<&Profile, ApiError> {
        self.error = None;
        match self.service.get_profile().await {
            Ok(profile) => {
                if let Some(cv) = &profile.cv_document {
                    self.cv_document = Some(cv.clone());
                }
                Ok(&*self.profile.insert(profile))
            }
            Err(e) => Err(self.fail(e, "Failed to fetch profile")),
        }
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<&Profile, ApiError> {
        self.error = None;
        match self.service.update_profile(update).await {
            Ok(profile) => Ok(&*self.profile.insert(profile)),
            Err(e) => Err(self.fail(e, "Failed to update profile")),
        }
    }

    /// Uploads a CV, then reloads the profile the backend derives from it.
    pub async fn upload_cv(&mut self, file: UploadFile) -> Result<CvDocument, ApiError> {
        self.error = None;
        let document = match self.service.upload_cv(file).await {
            Ok(document) => document,
            Err(e) => return Err(self.fail(e, "Failed to upload CV")),
        };
        debug!("Uploaded CV {} ({:?})", document.id, document.status);
        self.cv_document = Some(document.clone());

        if let Err(e) = self.fetch_profile().await.map(|_| ()) {
            return Err(self.fail(e, "Failed to upload CV"));
        }
        Ok(document)
    }

    pub async fn fetch_cv_document(&mut self, id: Uuid) -> Result<CvDocument, ApiError> {
        self.error = None;
        match self.service.get_cv_document(id).await {
            Ok(document) => {
                self.cv_document = Some(document.clone());
                Ok(document)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch CV document")),
        }
    }

    /// Experience level of the loaded profile, if there is enough data to tell.
    pub fn detected_level(&self) -> Option<Level> {
        determine_level(self.profile.as_ref().map(|p| &p.data_json))
    }

    fn fail(&mut self, e: ApiError, fallback: &str) -> ApiError {
        self.error = Some(
            e.field_message(MESSAGE_KEYS)
                .unwrap_or_else(|| fallback.to_string()),
        );
        e
    }
}
