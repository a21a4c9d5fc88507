use axum::{extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::fallback::payloads;
use crate::recommendations::normalize::normalize;
use crate::recommendations::transform::{recommendation_id, transform, RecommendationsEnvelope};
use crate::state::AppState;
use crate::upstream::or_fallback;

pub const COURSE_RECOMMENDATIONS_PATH: &str = "/api/courses/recommendations";

/// POST /api/courses/recommendations
///
/// Always answers 200: a failed backend call is replaced by the canned list,
/// which then goes through the same transformation.
pub async fn handle_course_recommendations(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<RecommendationsEnvelope> {
    let request = normalize(&body);
    debug!(
        user_id = %request.user_profile.user_id,
        max = request.max_recommendations,
        "Requesting course recommendations"
    );

    let result = state
        .upstream
        .post_json(COURSE_RECOMMENDATIONS_PATH, &request)
        .await;
    let (upstream, source) = or_fallback("course recommendations", result, || {
        payloads::course_recommendations(request.max_recommendations)
    });

    let envelope = transform(&upstream, recommendation_id);
    debug!(
        ?source,
        count = envelope.recommendations.len(),
        "Course recommendations ready"
    );
    Json(envelope)
}
