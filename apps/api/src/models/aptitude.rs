use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{text_enum, Stream, Violations};

text_enum! {
    QuestionCategory {
        LogicalReasoning => "Logical Reasoning",
        NumericalAbility => "Numerical Ability",
        VerbalReasoning => "Verbal Reasoning",
        SpatialReasoning => "Spatial Reasoning",
        AbstractReasoning => "Abstract Reasoning",
    }
}

text_enum! {
    Difficulty {
        Easy => "Easy",
        Medium => "Medium",
        Hard => "Hard",
    }
}

text_enum! {
    TestType {
        Personality => "personality",
        Intelligence => "intelligence",
        Interest => "interest",
        Skill => "skill",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeQuestion {
    pub id: Uuid,
    pub category: QuestionCategory,
    pub subcategory: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i16,
    pub explanation: String,
    pub difficulty: Difficulty,
    /// Seconds.
    pub time_limit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAptitudeQuestion {
    pub category: QuestionCategory,
    pub subcategory: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: i16,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub time_limit: i32,
}

impl NewAptitudeQuestion {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::default();
        v.require(&self.subcategory, "Subcategory is required");
        v.require(&self.question, "Question is required");
        v.max_chars(&self.question, 1000, "Question cannot exceed 1000 characters");
        v.check(self.correct_answer >= 0, "Answer index cannot be negative");
        v.check(self.correct_answer <= 3, "Answer index cannot exceed 3");
        v.require(&self.explanation, "Explanation is required");
        v.max_chars(&self.explanation, 500, "Explanation cannot exceed 500 characters");
        v.check(self.time_limit >= 30, "Time limit must be at least 30 seconds");
        v.check(self.time_limit <= 300, "Time limit cannot exceed 300 seconds");
        v.into_result()
    }
}

/// A submitted answer is either a numeric choice or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeResponse {
    pub question_id: String,
    pub answer: Answer,
    #[serde(default)]
    pub time_spent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecommendations {
    pub streams: Vec<Stream>,
    /// Course ids.
    pub courses: Vec<Uuid>,
    pub career_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityInsight {
    #[serde(rename = "type")]
    pub personality_type: String,
    pub traits: Vec<String>,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResults {
    pub scores: Vec<CategoryScore>,
    pub recommendations: ResultRecommendations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<PersonalityInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeResult {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub test_type: TestType,
    pub responses: Json<Vec<AptitudeResponse>>,
    pub results: Json<AssessmentResults>,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A scored submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewAptitudeResult {
    pub user_id: Uuid,
    pub test_type: TestType,
    pub responses: Vec<AptitudeResponse>,
    pub results: AssessmentResults,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question() -> NewAptitudeQuestion {
        NewAptitudeQuestion {
            category: QuestionCategory::NumericalAbility,
            subcategory: "Percentages".to_string(),
            question: "What is 20% of 150?".to_string(),
            options: vec!["20".into(), "25".into(), "30".into(), "35".into()],
            correct_answer: 2,
            explanation: "0.2 x 150 = 30".to_string(),
            difficulty: Difficulty::Easy,
            time_limit: 60,
        }
    }

    #[test]
    fn test_valid_question_passes() {
        assert!(new_question().validate().is_ok());
    }

    #[test]
    fn test_answer_index_and_time_limit_bounds() {
        let mut q = new_question();
        q.correct_answer = 4;
        q.time_limit = 10;
        let err = q.validate().unwrap_err().to_string();
        assert!(err.contains("Answer index cannot exceed 3"));
        assert!(err.contains("at least 30 seconds"));
    }

    #[test]
    fn test_answer_accepts_number_or_text() {
        let r: AptitudeResponse =
            serde_json::from_str(r#"{"questionId":"q1","answer":3}"#).unwrap();
        assert_eq!(r.answer, Answer::Number(3.0));
        let r: AptitudeResponse =
            serde_json::from_str(r#"{"questionId":"q2","answer":"4","timeSpent":12}"#).unwrap();
        assert_eq!(r.answer, Answer::Text("4".to_string()));
        assert_eq!(r.time_spent, Some(12.0));
    }

    #[test]
    fn test_question_category_literal() {
        let c: QuestionCategory = serde_json::from_str("\"Spatial Reasoning\"").unwrap();
        assert_eq!(c, QuestionCategory::SpatialReasoning);
    }
}
