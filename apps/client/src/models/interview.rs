use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub role_selected: Option<Role>,
    #[serde(default)]
    pub role_source: String,
    pub level: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub status: String,
    pub overall_score: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub progress: Option<Progress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current_question: u32,
    pub total_questions: u32,
    pub answered: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub id: Uuid,
    pub order: u32,
    pub question_text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Value,
    #[serde(default)]
    pub skill_tags_json: Value,
    #[serde(default)]
    pub is_followup: bool,
    pub answer: Option<InterviewAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub id: Uuid,
    pub answer_text: String,
    #[serde(default)]
    pub scores_json: Value,
    #[serde(default)]
    pub feedback_json: Value,
    #[serde(default)]
    pub skill_tags_json: Value,
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_seconds: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionList {
    #[serde(default)]
    pub questions: Vec<InterviewQuestion>,
}

/// Body of `POST /interviews`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSession {
    pub role_id: Uuid,
    pub level: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<Uuid>,
    pub role_source: String,
}

/// Body of `POST /interviews/{id}/answers`.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerSubmission {
    pub question_id: Uuid,
    pub answer_text: String,
    pub time_seconds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_type_field_renamed() {
        let session: InterviewSession = serde_json::from_value(json!({
            "id": "5e0c7b8a-2f3d-4c1b-9a8e-7d6c5b4a3f2e",
            "user": 1,
            "profile": null,
            "role_selected": null,
            "role_source": "catalog",
            "level": "mid",
            "type": "technical",
            "status": "in_progress",
            "overall_score": null,
            "started_at": "2024-05-01T09:00:00Z",
            "ended_at": null,
            "progress": {"current_question": 2, "total_questions": 5, "answered": 1}
        }))
        .unwrap();
        assert_eq!(session.interview_type, "technical");
        assert_eq!(session.progress.unwrap().answered, 1);
    }

    #[test]
    fn test_new_session_serializes_type_and_skips_missing_profile() {
        let body = serde_json::to_value(NewSession {
            role_id: Uuid::nil(),
            level: "junior".into(),
            interview_type: "hr".into(),
            profile_id: None,
            role_source: "catalog".into(),
        })
        .unwrap();
        assert_eq!(body["type"], "hr");
        assert!(body.get("profile_id").is_none());
    }
}
