//! Stored course recommendations for the signed-in user.
//!
//! A set younger than a day is served again unless the client forces a
//! refresh. A fresh set comes from the recommendation backend and is kept
//! in the user's history; a backend failure here is an error, not a mock.

use std::time::Duration;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::history::RecommendationKind;
use crate::models::user::User;
use crate::recommendations::handlers::COURSE_RECOMMENDATIONS_PATH;
use crate::recommendations::normalize::{normalize, NormalizedRequest};
use crate::state::AppState;

const BACKEND_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RECOMMENDATIONS: u64 = 10;

const DEFAULT_LEARNING_STYLE: &str = "hands-on";
const DEFAULT_TIME_COMMITMENT: &str = "10-15";
const DEFAULT_BUDGET_RANGE: &str = "free";

/// Reply keys that may hold the course list, in order.
const COURSE_LIST_KEYS: [&str; 2] = ["courses", "recommendations"];

/// Fields kept in history, each with the reply keys it may come from.
const STORED_FIELDS: &[(&str, &[&str])] = &[
    ("title", &["title"]),
    ("provider", &["provider"]),
    ("category", &["category"]),
    ("level", &["level", "difficulty_level"]),
    ("match_percentage", &["match_percentage"]),
    ("reasoning", &["reasoning"]),
    ("skills_gained", &["skills_gained"]),
    ("estimated_duration", &["estimated_duration", "duration"]),
    ("cost", &["cost", "estimated_cost"]),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub success: bool,
    pub recommendations: Vec<Value>,
    pub last_updated: Option<DateTime<Utc>>,
    pub total_recommendations: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshRequest {
    pub force_refresh: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub recommendations: Vec<Value>,
    pub cached: bool,
    pub last_updated: DateTime<Utc>,
}

fn or_default(slot: &mut Option<String>, default: &str) {
    if slot.is_none() {
        *slot = Some(default.to_string());
    }
}

/// Backend request for a stored account. The saved profile document wins;
/// the account fills the gaps and fixed defaults cover the rest.
pub fn account_request(user: &User, saved_profile: Option<&Value>) -> NormalizedRequest {
    let mut request = normalize(&json!({
        "userId": user.id.to_string(),
        "userPreferences": saved_profile.cloned().unwrap_or(Value::Null),
    }));

    let profile = &mut request.user_profile;
    profile.email = Some(user.email.clone());
    or_default(&mut profile.academic_level, user.education_level.as_str());
    or_default(&mut profile.learning_style, DEFAULT_LEARNING_STYLE);
    or_default(&mut profile.time_commitment, DEFAULT_TIME_COMMITMENT);
    or_default(&mut profile.budget_range, DEFAULT_BUDGET_RANGE);
    if profile.interests.is_empty() {
        profile.interests = user.interests.clone();
    }
    for list in [
        &mut profile.interests,
        &mut profile.career_goals,
        &mut profile.current_skills,
        &mut profile.skill_gaps,
    ] {
        for item in list.iter_mut() {
            *item = item.to_lowercase();
        }
    }

    request.focus_areas = request.user_profile.interests.clone();
    request.max_recommendations = MAX_RECOMMENDATIONS;
    request
}

/// The course list from a backend reply; the first matching key wins even
/// when its list is empty.
fn course_items(reply: &Value) -> Vec<Value> {
    COURSE_LIST_KEYS
        .iter()
        .find_map(|key| reply.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// The subset of a course kept in history. Non-objects are dropped.
fn stored_summary(item: &Value) -> Option<Value> {
    let fields = item.as_object()?;
    let summary: Map<String, Value> = STORED_FIELDS
        .iter()
        .filter_map(|(name, keys)| {
            keys.iter()
                .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
                .map(|value| (name.to_string(), value.clone()))
        })
        .collect();
    Some(Value::Object(summary))
}

/// GET /api/user/recommendations
///
/// The newest stored course set, or an empty list.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HistoryResponse>, AppError> {
    let user = auth.account(&state).await?;
    let latest = state
        .store
        .latest_recommendations(user.id, RecommendationKind::Course)
        .await?;

    let (recommendations, last_updated) = match latest {
        Some(record) => (record.recommendations.0, Some(record.created_at)),
        None => (Vec::new(), None),
    };

    Ok(Json(HistoryResponse {
        success: true,
        total_recommendations: recommendations.len(),
        recommendations,
        last_updated,
    }))
}

/// POST /api/user/recommendations  `{forceRefresh?}`
pub async fn handle_refresh_recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<RefreshResponse>, AppError> {
    let force_refresh = body.map(|Json(b)| b.force_refresh).unwrap_or_default();
    let user = auth.account(&state).await?;

    if !force_refresh {
        let latest = state
            .store
            .latest_recommendations(user.id, RecommendationKind::Course)
            .await?;
        if let Some(record) = latest.filter(|r| r.is_fresh(Utc::now())) {
            debug!(user_id = %user.id, "Serving stored course recommendations");
            return Ok(Json(RefreshResponse {
                success: true,
                recommendations: record.recommendations.0,
                cached: true,
                last_updated: record.created_at,
            }));
        }
    }

    let saved_profile = state.store.get_profile(&user.email).await?;
    let request = account_request(&user, saved_profile.as_ref().map(|doc| &doc.profile));
    let reply = state
        .upstream
        .post_json_with_timeout(COURSE_RECOMMENDATIONS_PATH, &request, BACKEND_TIMEOUT)
        .await?;

    let courses = course_items(&reply);
    if !courses.is_empty() {
        let summaries = courses.iter().filter_map(stored_summary).collect();
        state
            .store
            .insert_recommendations(user.id, RecommendationKind::Course, summaries)
            .await?;
    }
    info!(
        user_id = %user.id,
        count = courses.len(),
        force_refresh,
        "Generated course recommendations"
    );

    Ok(Json(RefreshResponse {
        success: true,
        recommendations: courses,
        cached: false,
        last_updated: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json as SqlJson;
    use uuid::Uuid;

    use super::*;
    use crate::models::user::{EducationLevel, Location};

    fn account() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: String::new(),
            date_of_birth: None,
            gender: None,
            education_level: EducationLevel::Graduate,
            interests: vec!["Robotics".to_string(), "AI".to_string()],
            location: SqlJson(Location {
                state: "Karnataka".to_string(),
                district: "Mysuru".to_string(),
                pincode: None,
            }),
            preferred_streams: SqlJson(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_request_uses_account_and_defaults() {
        let user = account();
        let request = account_request(&user, None);
        let profile = &request.user_profile;

        assert_eq!(profile.user_id, user.id.to_string());
        assert_eq!(profile.email.as_deref(), Some("asha@example.com"));
        assert_eq!(profile.academic_level.as_deref(), Some("graduate"));
        assert_eq!(profile.interests, vec!["robotics", "ai"]);
        assert_eq!(profile.learning_style.as_deref(), Some("hands-on"));
        assert_eq!(profile.time_commitment.as_deref(), Some("10-15"));
        assert_eq!(profile.budget_range.as_deref(), Some("free"));
        assert_eq!(request.focus_areas, vec!["robotics", "ai"]);
        assert_eq!(request.max_recommendations, 10);
    }

    #[test]
    fn test_saved_profile_takes_priority() {
        let saved = json!({
            "academicLevel": "postgraduate",
            "interests": ["Finance"],
            "currentSkills": ["Excel", "SQL"],
            "budgetRange": "paid",
        });
        let request = account_request(&account(), Some(&saved));
        let profile = &request.user_profile;

        assert_eq!(profile.academic_level.as_deref(), Some("postgraduate"));
        assert_eq!(profile.interests, vec!["finance"]);
        assert_eq!(profile.current_skills, vec!["excel", "sql"]);
        assert_eq!(profile.budget_range.as_deref(), Some("paid"));
        assert_eq!(request.focus_areas, vec!["finance"]);
    }

    #[test]
    fn test_course_items_prefers_courses_key() {
        let reply = json!({ "courses": [], "recommendations": [{ "title": "x" }] });
        assert!(course_items(&reply).is_empty());

        let reply = json!({ "recommendations": [{ "title": "x" }] });
        assert_eq!(course_items(&reply).len(), 1);

        assert!(course_items(&json!({ "courses": "none" })).is_empty());
    }

    #[test]
    fn test_stored_summary_keeps_known_fields() {
        let item = json!({
            "title": "Intro to ML",
            "difficulty_level": "Beginner",
            "duration": "6 weeks",
            "estimated_cost": "Free",
            "match_percentage": 88,
            "url": "https://example.com",
            "reasoning": null,
        });
        let summary = stored_summary(&item).unwrap();
        assert_eq!(
            summary,
            json!({
                "title": "Intro to ML",
                "level": "Beginner",
                "estimated_duration": "6 weeks",
                "cost": "Free",
                "match_percentage": 88,
            })
        );
        assert!(stored_summary(&json!("text")).is_none());
    }
}
