use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::models::interview::InterviewSession;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewStats {
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub score_trend: Vec<Value>,
    #[serde(default)]
    pub category_trend: HashMap<String, f64>,
    #[serde(default)]
    pub top_improving_skills: Vec<Value>,
    #[serde(default)]
    pub top_weak_skills: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHistoryPage {
    #[serde(default)]
    pub results: Vec<InterviewSession>,
    #[serde(default)]
    pub count: u32,
}

/// Query parameters for `GET /analytics/sessions`.
#[derive(Debug, Clone, Default)]
pub struct SessionFilters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub interview_type: Option<String>,
}

impl SessionFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(kind) = &self.interview_type {
            query.push(("type".to_string(), kind.clone()));
        }
        query
    }
}
