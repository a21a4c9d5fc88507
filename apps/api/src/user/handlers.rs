//! Saved profile endpoints for the signed-in user.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::ProfileDocument;
use crate::state::AppState;

/// Keys a client may not overwrite through a profile update.
const PROTECTED_KEYS: [&str; 2] = ["email", "password"];

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileDocument,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/user/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .store
        .get_profile(&auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}

/// Drops protected keys and non-string entries from top-level lists.
fn sanitize_profile(body: Value) -> Result<Value, AppError> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::Validation(
            "Profile must be a JSON object".to_string(),
        ));
    };

    for key in PROTECTED_KEYS {
        fields.remove(key);
    }
    for value in fields.values_mut() {
        if let Value::Array(items) = value {
            items.retain(Value::is_string);
        }
    }

    Ok(Value::Object(fields))
}

/// PUT /api/user/profile
///
/// Creates or replaces the saved profile for the signed-in user.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = sanitize_profile(body)?;
    let profile = state.store.upsert_profile(&auth.email, profile).await?;

    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}

/// POST /api/user/reset-profile
///
/// Deletes every saved profile for the signed-in user.
pub async fn handle_reset_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResetResponse>, AppError> {
    let removed = state.store.delete_profiles(&auth.email).await?;
    info!("Reset profile for {} ({removed} removed)", auth.email);

    Ok(Json(ResetResponse {
        success: true,
        message: "User profile reset successfully. You can now create a new profile."
            .to_string(),
    }))
}
