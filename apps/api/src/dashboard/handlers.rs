//! Landing-page summary for the signed-in user.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::aptitude::{AptitudeResult, CategoryScore, ResultRecommendations, TestType};
use crate::state::AppState;

const RECENT_RESULTS: u32 = 5;
const DEFAULT_NAME: &str = "Student";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub name: String,
    pub email: String,
    pub profile_completion: u8,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ResultOverview {
    pub scores: Vec<CategoryScore>,
    pub recommendations: ResultRecommendations,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub id: Uuid,
    pub test_type: TestType,
    pub completed_at: DateTime<Utc>,
    pub results: ResultOverview,
}

impl From<AptitudeResult> for ResultSummary {
    fn from(result: AptitudeResult) -> Self {
        let results = result.results.0;
        Self {
            id: result.id,
            test_type: result.test_type,
            completed_at: result.completed_at,
            results: ResultOverview {
                scores: results.scores,
                recommendations: results.recommendations,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: DashboardUser,
    pub aptitude_results: Vec<ResultSummary>,
    pub recommendations: Value,
    pub upcoming_deadlines: Value,
}

/// 40 for having an account, 10 each for a name and an email, 30 for the
/// first completed assessment and 10 more once there are two.
pub fn profile_completion(name: &str, email: &str, results: usize) -> u8 {
    let mut score = 40;
    if !name.trim().is_empty() {
        score += 10;
    }
    if !email.trim().is_empty() {
        score += 10;
    }
    if results > 0 {
        score += 30;
    }
    if results >= 2 {
        score += 10;
    }
    score
}

fn featured_recommendations() -> Value {
    json!({
        "courses": [
            { "id": 1, "name": "Computer Science Engineering", "match": 95 },
            { "id": 2, "name": "Data Science", "match": 88 },
            { "id": 3, "name": "Software Engineering", "match": 85 }
        ],
        "colleges": [
            { "id": 1, "name": "IIT Delhi", "match": 92 },
            { "id": 2, "name": "NIT Trichy", "match": 87 },
            { "id": 3, "name": "IIIT Hyderabad", "match": 85 }
        ],
        "careerPaths": [
            "Software Engineer",
            "Data Scientist",
            "Product Manager",
            "Research Scientist"
        ]
    })
}

fn upcoming_deadlines() -> Value {
    json!([
        { "title": "JEE Main Registration", "date": "2025-01-15", "type": "exam" },
        { "title": "NEET Application", "date": "2025-02-01", "type": "exam" },
        { "title": "Scholarship Deadline", "date": "2025-01-30", "type": "scholarship" }
    ])
}

/// GET /api/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = auth.account(&state).await?;
    let results = state.store.recent_results(user.id, RECENT_RESULTS).await?;

    let name = if user.name.trim().is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        user.name.clone()
    };

    Ok(Json(DashboardResponse {
        user: DashboardUser {
            profile_completion: profile_completion(&user.name, &user.email, results.len()),
            name,
            email: user.email,
            last_active: Utc::now(),
        },
        aptitude_results: results.into_iter().map(ResultSummary::from).collect(),
        recommendations: featured_recommendations(),
        upcoming_deadlines: upcoming_deadlines(),
    }))
}
