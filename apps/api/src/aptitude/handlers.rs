//! Axum route handlers for aptitude questions and assessments.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::aptitude::scoring::assess;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::aptitude::{
    AptitudeQuestion, AptitudeResponse, AptitudeResult, NewAptitudeQuestion, NewAptitudeResult,
    TestType,
};
use crate::routes::params::{bounded_param, enum_param, DEFAULT_LIMIT, MAX_LIMIT};
use crate::state::AppState;
use crate::store::QuestionFilter;

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub data: Vec<AptitudeQuestion>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct QuestionCreatedResponse {
    pub success: bool,
    pub data: AptitudeQuestion,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub message: String,
}

/// GET /api/aptitude/questions?category&difficulty&limit
///
/// Random sample of matching questions.
pub async fn handle_list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let filter = QuestionFilter {
        category: enum_param(query.category.as_deref(), "category")?,
        difficulty: enum_param(query.difficulty.as_deref(), "difficulty")?,
    };
    let limit = bounded_param(query.limit.as_deref(), DEFAULT_LIMIT, MAX_LIMIT);

    let data = state.store.sample_questions(&filter, limit).await?;

    Ok(Json(QuestionsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// POST /api/aptitude/questions
pub async fn handle_create_question(
    State(state): State<AppState>,
    Json(question): Json<NewAptitudeQuestion>,
) -> Result<(StatusCode, Json<QuestionCreatedResponse>), AppError> {
    question.validate()?;
    let data = state.store.insert_question(question).await?;

    Ok((
        StatusCode::CREATED,
        Json(QuestionCreatedResponse {
            success: true,
            data,
        }),
    ))
}

/// Submission body. Kept loose so a malformed body is a 400 with a message
/// rather than an extractor rejection.
fn parse_submission(body: &Value) -> Result<(String, Vec<AptitudeResponse>), AppError> {
    let invalid = || AppError::Validation("Invalid request data".to_string());

    let test_type = body
        .get("testType")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;
    let responses = body
        .get("responses")
        .filter(|v| v.is_array())
        .ok_or_else(invalid)?;
    let responses: Vec<AptitudeResponse> =
        serde_json::from_value(responses.clone()).map_err(|_| invalid())?;

    if responses.is_empty() {
        return Err(AppError::Validation(
            "At least one response is required".to_string(),
        ));
    }
    if responses
        .iter()
        .any(|r| r.time_spent.is_some_and(|t| t < 0.0))
    {
        return Err(AppError::Validation(
            "Time spent cannot be negative".to_string(),
        ));
    }

    Ok((test_type.to_string(), responses))
}

/// POST /api/aptitude/submit
///
/// Scores a completed assessment and stores it for the signed-in user.
pub async fn handle_submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<SubmitResponse>, AppError> {
    let (test_type, responses) = parse_submission(&body)?;
    let user = auth.account(&state).await?;

    let test_type: TestType = test_type
        .parse()
        .map_err(|_| AppError::Validation("Invalid test type".to_string()))?;

    let results = assess(test_type, &responses);
    let stored = state
        .store
        .insert_result(NewAptitudeResult {
            user_id: user.id,
            test_type,
            responses,
            results,
            completed_at: Utc::now(),
        })
        .await?;

    info!(
        result_id = %stored.id,
        test_type = test_type.as_str(),
        "Assessment submitted"
    );

    Ok(Json(SubmitResponse {
        id: stored.id,
        message: "Assessment submitted successfully".to_string(),
    }))
}

/// GET /api/aptitude/results/:id
///
/// Only the owner can read a result; anyone else gets a 404.
pub async fn handle_get_result(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AptitudeResult>, AppError> {
    let user = auth.account(&state).await?;

    let result = state
        .store
        .find_result(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_submission_requires_type_and_responses() {
        assert!(parse_submission(&json!({})).is_err());
        assert!(parse_submission(&json!({ "testType": "skill" })).is_err());
        assert!(parse_submission(&json!({ "testType": "skill", "responses": {} })).is_err());
        assert!(parse_submission(&json!({ "testType": "skill", "responses": [] })).is_err());
        assert!(parse_submission(&json!({
            "testType": "skill",
            "responses": [{ "answer": 3 }]
        }))
        .is_err());
    }

    #[test]
    fn test_parse_submission_accepts_valid_body() {
        let (test_type, responses) = parse_submission(&json!({
            "testType": "intelligence",
            "responses": [
                { "questionId": "q1", "answer": 3 },
                { "questionId": "q2", "answer": "2", "timeSpent": 14.5 }
            ]
        }))
        .unwrap();
        assert_eq!(test_type, "intelligence");
        assert_eq!(responses.len(), 2);
    }
}
