use axum::{Extension, Json, extract::State};

use khatm_db::models::ProfileRow;
use khatm_types::api::{Claims, ProfileResponse, UpdateProfileRequest};

use crate::error::ApiError;
use crate::{AppState, parse_uuid};

fn to_response(row: ProfileRow) -> ProfileResponse {
    ProfileResponse {
        id: parse_uuid(&row.id, "profile id"),
        display_name: row.display_name,
        avatar_url: row.avatar_url,
    }
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = state
        .db
        .get_profile(&claims.sub.to_string())?
        .ok_or(ApiError::NotFound("Profile not found"))?;
    Ok(Json(to_response(row)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let display_name = req.display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::BadRequest("Display name is required".into()));
    }

    let user_id = claims.sub.to_string();
    if !state
        .db
        .update_profile(&user_id, display_name, req.avatar_url.as_deref())?
    {
        return Err(ApiError::NotFound("Profile not found"));
    }

    let row = state
        .db
        .get_profile(&user_id)?
        .ok_or(ApiError::NotFound("Profile not found"))?;
    Ok(Json(to_response(row)))
}

/// Copies the avatar URL from the provider's `picture` claim into the
/// profile row.
pub async fn sync_avatar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id = claims.sub.to_string();
    if !state.db.set_avatar(&user_id, claims.picture.as_deref())? {
        return Err(ApiError::NotFound("Profile not found"));
    }

    let row = state
        .db
        .get_profile(&user_id)?
        .ok_or(ApiError::NotFound("Profile not found"))?;
    Ok(Json(to_response(row)))
}
