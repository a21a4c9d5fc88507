pub mod health;
pub mod params;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{advisor, ai_enhanced, aptitude, auth, catalog, dashboard, recommendations, user};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        // Backend proxies with canned fallbacks
        .route(
            "/api/ai-enhanced/chat",
            post(ai_enhanced::handlers::handle_chat),
        )
        .route(
            "/api/ai-enhanced/market/insights",
            get(ai_enhanced::handlers::handle_market_insights),
        )
        .route(
            "/api/ai-enhanced/recommendations/comprehensive",
            post(ai_enhanced::handlers::handle_comprehensive),
        )
        .route(
            "/api/ai-enhanced/skills/analyze",
            post(ai_enhanced::handlers::handle_skills_analyze),
        )
        .route(
            "/api/courses/recommendations",
            post(recommendations::handlers::handle_course_recommendations),
        )
        // LLM advisor
        .route(
            "/api/ai/recommendations",
            post(advisor::handlers::handle_ai_recommendations),
        )
        // Aptitude
        .route(
            "/api/aptitude/questions",
            get(aptitude::handlers::handle_list_questions)
                .post(aptitude::handlers::handle_create_question),
        )
        .route("/api/aptitude/submit", post(aptitude::handlers::handle_submit))
        .route(
            "/api/aptitude/results/:id",
            get(aptitude::handlers::handle_get_result),
        )
        // Catalog
        .route(
            "/api/courses",
            get(catalog::handlers::handle_list_courses)
                .post(catalog::handlers::handle_create_course),
        )
        .route(
            "/api/colleges",
            get(catalog::handlers::handle_list_colleges)
                .post(catalog::handlers::handle_create_college),
        )
        // User
        .route(
            "/api/user/profile",
            get(user::handlers::handle_get_profile).put(user::handlers::handle_put_profile),
        )
        .route(
            "/api/user/reset-profile",
            post(user::handlers::handle_reset_profile),
        )
        .route(
            "/api/user/recommendations",
            get(user::recommendations::handle_get_recommendations)
                .post(user::recommendations::handle_refresh_recommendations),
        )
        .route("/api/dashboard", get(dashboard::handlers::handle_dashboard))
        .with_state(state)
}
