//! Pass-through handlers for the backend's AI endpoints. Each forwards the
//! request unchanged and serves a canned payload when the backend fails.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::fallback::{chat, payloads};
use crate::state::AppState;
use crate::upstream::or_fallback;

pub const CHAT_PATH: &str = "/api/ai-enhanced/chat";
pub const MARKET_INSIGHTS_PATH: &str = "/api/ai-enhanced/market/insights";
pub const COMPREHENSIVE_PATH: &str = "/api/ai-enhanced/recommendations/comprehensive";
pub const SKILLS_ANALYZE_PATH: &str = "/api/ai-enhanced/skills/analyze";

#[derive(Debug, Deserialize)]
pub struct MarketInsightsQuery {
    pub fields: Option<String>,
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// POST /api/ai-enhanced/chat
pub async fn handle_chat(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    let result = state.upstream.post_json(CHAT_PATH, &body).await;
    let (reply, _) = or_fallback("chat", result, || {
        chat::chat_reply(
            str_field(&body, "message").unwrap_or_default(),
            str_field(&body, "user_id"),
        )
    });
    Json(reply)
}

/// GET /api/ai-enhanced/market/insights?fields=
pub async fn handle_market_insights(
    State(state): State<AppState>,
    Query(query): Query<MarketInsightsQuery>,
) -> Json<Value> {
    let fields = query.fields.unwrap_or_default();
    let result = state
        .upstream
        .get_json(MARKET_INSIGHTS_PATH, &[("fields", fields.as_str())])
        .await;
    let (insights, _) = or_fallback("market insights", result, payloads::market_insights);
    Json(insights)
}

/// POST /api/ai-enhanced/recommendations/comprehensive
pub async fn handle_comprehensive(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let result = state.upstream.post_json(COMPREHENSIVE_PATH, &body).await;
    let (recommendations, _) = or_fallback("comprehensive recommendations", result, || {
        payloads::comprehensive_recommendations(str_field(&body, "user_id"))
    });
    Json(recommendations)
}

/// POST /api/ai-enhanced/skills/analyze
pub async fn handle_skills_analyze(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let result = state.upstream.post_json(SKILLS_ANALYZE_PATH, &body).await;
    let (analysis, _) = or_fallback("skills analysis", result, || {
        payloads::skills_analysis(str_field(&body, "user_id"))
    });
    Json(analysis)
}
