use serde_json::Value;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::interviews::service::InterviewService;
use crate::models::interview::{
    AnswerSubmission, InterviewAnswer, InterviewQuestion, InterviewSession, NewSession,
};

const MESSAGE_KEYS: &[&str] = &["error", "detail"];

/// Tracks the active interview session, its questions, and which question is current.
pub struct InterviewStore {
    service: InterviewService,
    pub current_session: Option<InterviewSession>,
    pub questions: Vec<InterviewQuestion>,
    pub current_question_index: usize,
    pub error: Option<String>,
}

impl InterviewStore {
    pub fn new(service: InterviewService) -> Self {
        Self {
            service,
            current_session: None,
            questions: Vec::new(),
            current_question_index: 0,
            error: None,
        }
    }

    pub async fn create_session(&mut self, new_session: &NewSession) -> Result<InterviewSession, ApiError> {
        self.error = None;
        match self.service.create_session(new_session).await {
            Ok(session) => {
                self.current_session = Some(session.clone());
                self.current_question_index = 0;
                Ok(session)
            }
            Err(e) => Err(self.fail(e, "Failed to create interview session")),
        }
    }

    pub async fn fetch_session(&mut self, id: Uuid) -> Result<InterviewSession, ApiError> {
        self.error = None;
        match self.service.get_session(id).await {
            Ok(session) => {
                self.current_session = Some(session.clone());
                Ok(session)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch interview session")),
        }
    }

    /// Loads the questions and moves to the first one without an answer, or the first question.
    pub async fn fetch_questions(&mut self, session_id: Uuid) -> Result<&[InterviewQuestion], ApiError> {
        self.error = None;
        match self.service.get_questions(session_id).await {
            Ok(list) => {
                self.questions = list.questions;
                self.current_question_index = self
                    .questions
                    .iter()
                    .position(|q| q.answer.is_none())
                    .unwrap_or(0);
                Ok(self.questions.as_slice())
            }
            Err(e) => Err(self.fail(e, "Failed to fetch questions")),
        }
    }

    /// Submits an answer, attaches the scored answer to its question, and refreshes the session.
    pub async fn submit_answer(
        &mut self,
        session_id: Uuid,
        answer: &AnswerSubmission,
    ) -> Result<InterviewAnswer, ApiError> {
        self.error = None;
        let scored = match self.service.submit_answer(session_id, answer).await {
            Ok(scored) => scored,
            Err(e) => return Err(self.fail(e, "Failed to submit answer")),
        };

        if let Some(question) = self.questions.iter_mut().find(|q| q.id == answer.question_id) {
            question.answer = Some(scored.clone());
        }

        if let Err(e) = self.fetch_session(session_id).await {
            return Err(self.fail(e, "Failed to submit answer"));
        }
        Ok(scored)
    }

    pub async fn finish_session(&mut self, session_id: Uuid) -> Result<InterviewSession, ApiError> {
        self.error = None;
        match self.service.finish_session(session_id).await {
            Ok(session) => {
                self.current_session = Some(session.clone());
                Ok(session)
            }
            Err(e) => Err(self.fail(e, "Failed to finish session")),
        }
    }

    pub async fn fetch_report(&mut self, session_id: Uuid) -> Result<Value, ApiError> {
        self.error = None;
        let result = self.service.get_report(session_id).await;
        result.map_err(|e| self.fail(e, "Failed to fetch report"))
    }

    /// Moves to `index`; out-of-range indexes are ignored.
    pub fn set_current_question_index(&mut self, index: usize) {
        if index < self.questions.len() {
            self.current_question_index = index;
        }
    }

    pub fn current_question(&self) -> Option<&InterviewQuestion> {
        self.questions.get(self.current_question_index)
    }

    fn fail(&mut self, e: ApiError, fallback: &str) -> ApiError {
        self.error = Some(
            e.field_message(MESSAGE_KEYS)
                .unwrap_or_else(|| fallback.to_string()),
        );
        e
    }
}
