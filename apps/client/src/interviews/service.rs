use serde_json::Value;
use uuid::Uuid;

use crate::api_client::{ApiClient, ApiRequest};
use crate::errors::ApiError;
use crate::models::interview::{
    AnswerSubmission, InterviewAnswer, InterviewSession, NewSession, QuestionList,
};

#[derive(Clone)]
pub struct InterviewService {
    client: ApiClient,
}

impl InterviewService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /interviews
    pub async fn create_session(&self, session: &NewSession) -> Result<InterviewSession, ApiError> {
        self.client
            .send_json(ApiRequest::post("/interviews").json(session)?)
            .await
    }

    /// GET /interviews/{id}
    pub async fn get_session(&self, id: Uuid) -> Result<InterviewSession, ApiError> {
        self.client
            .send_json(ApiRequest::get(format!("/interviews/{id}")))
            .await
    }

    /// GET /interviews/{id}/questions
    pub async fn get_questions(&self, id: Uuid) -> Result<QuestionList, ApiError> {
        self.client
            .send_json(ApiRequest::get(format!("/interviews/{id}/questions")))
            .await
    }

    /// POST /interviews/{id}/answers
    pub async fn submit_answer(
        &self,
        id: Uuid,
        answer: &AnswerSubmission,
    ) -> Result<InterviewAnswer, ApiError> {
        self.client
            .send_json(ApiRequest::post(format!("/interviews/{id}/answers")).json(answer)?)
            .await
    }

    /// PATCH /interviews/{id}/finish
    pub async fn finish_session(&self, id: Uuid) -> Result<InterviewSession, ApiError> {
        self.client
            .send_json(ApiRequest::patch(format!("/interviews/{id}/finish")))
            .await
    }

    /// GET /interviews/{id}/report
    pub async fn get_report(&self, id: Uuid) -> Result<Value, ApiError> {
        self.client
            .send(ApiRequest::get(format!("/interviews/{id}/report")))
            .await
    }
}
