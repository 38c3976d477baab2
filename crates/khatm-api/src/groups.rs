use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand::Rng;
use tracing::warn;
use uuid::Uuid;

use khatm_db::models::MemberRow;
use khatm_types::api::{
    ActiveBookmark, Claims, CreateGroupRequest, GroupDetailResponse, GroupMemberDetail,
    GroupResponse, GroupSummary, JoinByCodeRequest, MembershipResponse, SetActiveBookmarkRequest,
};
use khatm_types::models::Role;

use crate::error::ApiError;
use crate::{AppState, parse_uuid};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 5;
const CODE_MAX_ATTEMPTS: u32 = 10;

fn random_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a code not yet present in the store. Exhausting the retry
/// budget fails group creation outright instead of degrading the code.
fn unique_group_code(
    mut exists: impl FnMut(&str) -> anyhow::Result<bool>,
) -> Result<String, ApiError> {
    for _ in 0..CODE_MAX_ATTEMPTS {
        let code = random_code();
        if !exists(&code)? {
            return Ok(code);
        }
    }
    Err(ApiError::Conflict("Failed to generate a unique group code"))
}

fn parse_role(raw: &str) -> Role {
    Role::parse(raw).unwrap_or_else(|| {
        warn!("Corrupt member role '{}'", raw);
        Role::Member
    })
}

fn membership_response(row: MemberRow) -> MembershipResponse {
    MembershipResponse {
        group_id: parse_uuid(&row.group_id, "group id"),
        user_id: parse_uuid(&row.user_id, "user id"),
        role: parse_role(&row.role),
        current_bookmark_id: row
            .current_bookmark_id
            .as_deref()
            .map(|id| parse_uuid(id, "bookmark id")),
    }
}

pub async fn list_groups(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let rows = state.db.groups_for_user(&claims.sub.to_string())?;
    let groups = rows
        .into_iter()
        .map(|row| GroupSummary {
            id: parse_uuid(&row.id, "group id"),
            name: row.name,
            group_code: row.group_code,
            role: parse_role(&row.role),
            member_count: row.member_count,
        })
        .collect();
    Ok(Json(groups))
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }

    let group_code = unique_group_code(|code| state.db.group_code_exists(code))?;
    let group_id = Uuid::new_v4();
    state.db.create_group(
        &group_id.to_string(),
        name,
        &group_code,
        &claims.sub.to_string(),
        &Uuid::new_v4().to_string(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(GroupResponse {
            id: group_id,
            name: name.to_string(),
            group_code,
            created_by: claims.sub,
            created_at: chrono::Utc::now(),
        }),
    ))
}

/// Group page: members with profiles, active bookmarks, and all-time
/// progress, sorted highest first. Membership is required; the caller
/// learns nothing about groups they are not in beyond their existence.
pub async fn group_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<GroupDetailResponse>, ApiError> {
    let group_id = id.to_string();
    let user_id = claims.sub.to_string();

    let membership = state
        .db
        .get_member(&group_id, &user_id)?
        .ok_or(ApiError::Forbidden("Not a member of this group"))?;

    let group = state
        .db
        .get_group(&group_id)?
        .ok_or(ApiError::NotFound("Group not found"))?;

    let member_rows = state.db.group_members_detailed(&group_id)?;
    let sums = state.db.sum_progress_by_user(&group_id, None)?;
    let progress_of = |uid: &str| {
        sums.iter()
            .find(|(user, _)| user == uid)
            .map(|(_, total)| *total)
            .unwrap_or(0)
    };

    let mut members: Vec<GroupMemberDetail> = member_rows
        .into_iter()
        .map(|row| GroupMemberDetail {
            user_id: parse_uuid(&row.user_id, "user id"),
            role: parse_role(&row.role),
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            bookmark: row.bookmark.map(|b| ActiveBookmark {
                id: parse_uuid(&b.id, "bookmark id"),
                name: b.name,
                surah_number: b.surah_number,
                verse_number: b.verse_number,
            }),
            progress: progress_of(&row.user_id),
        })
        .collect();
    members.sort_by(|a, b| b.progress.cmp(&a.progress));

    Ok(Json(GroupDetailResponse {
        id: parse_uuid(&group.id, "group id"),
        name: group.name,
        group_code: group.group_code,
        created_by: parse_uuid(&group.created_by, "user id"),
        members,
        current_user_role: parse_role(&membership.role),
        current_user_id: claims.sub,
    }))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let group_id = id.to_string();

    let membership = state
        .db
        .get_member(&group_id, &claims.sub.to_string())?
        .ok_or(ApiError::Forbidden("Only the group admin can delete it"))?;
    if parse_role(&membership.role) != Role::Admin {
        return Err(ApiError::Forbidden("Only the group admin can delete it"));
    }

    if !state.db.soft_delete_group(&group_id)? {
        return Err(ApiError::NotFound("Group not found"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn join_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let group = state
        .db
        .get_group(&id.to_string())?
        .ok_or(ApiError::NotFound("Group not found"))?;
    join(&state, &group.id, &claims.sub.to_string()).await
}

/// Join by the shareable 5-character code. Input is trimmed and uppercased
/// before lookup; codes are stored uppercase.
pub async fn join_by_code(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<JoinByCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = req.code.trim().to_uppercase();
    if code.len() != CODE_LENGTH {
        return Err(ApiError::BadRequest(
            "Group code must be 5 characters".into(),
        ));
    }

    let group = state
        .db
        .find_group_by_code(&code)?
        .ok_or(ApiError::NotFound("Group not found"))?;
    join(&state, &group.id, &claims.sub.to_string()).await
}

/// Idempotent join: an existing membership is returned as-is. A genuine
/// duplicate-insert race loses to the UNIQUE constraint and surfaces as a
/// conflict.
async fn join(
    state: &AppState,
    group_id: &str,
    user_id: &str,
) -> Result<(StatusCode, Json<MembershipResponse>), ApiError> {
    if let Some(existing) = state.db.get_member(group_id, user_id)? {
        return Ok((StatusCode::OK, Json(membership_response(existing))));
    }

    let member_id = Uuid::new_v4().to_string();
    if !state
        .db
        .insert_member(&member_id, group_id, user_id, Role::Member.as_str())?
    {
        return Err(ApiError::Conflict("Already a member of this group"));
    }

    let member = state
        .db
        .get_member(group_id, user_id)?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Membership vanished after insert")))?;
    Ok((StatusCode::CREATED, Json(membership_response(member))))
}

pub async fn leave_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let group_id = id.to_string();
    let user_id = claims.sub.to_string();

    state
        .db
        .get_member(&group_id, &user_id)?
        .ok_or(ApiError::Forbidden("Not a member of this group"))?;

    state.db.delete_member(&group_id, &user_id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Designate which of the caller's bookmarks feeds this group's
/// leaderboard. The bookmark must be the caller's own — the schema does
/// not enforce that, so it is checked here.
pub async fn set_active_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetActiveBookmarkRequest>,
) -> Result<Json<MembershipResponse>, ApiError> {
    let group_id = id.to_string();
    let user_id = claims.sub.to_string();

    state
        .db
        .get_member(&group_id, &user_id)?
        .ok_or(ApiError::Forbidden("Not a member of this group"))?;

    let bookmark_id = req.bookmark_id.to_string();
    state
        .db
        .get_bookmark(&bookmark_id, &user_id)?
        .ok_or(ApiError::NotFound("Bookmark not found"))?;

    state.db.set_active_bookmark(&group_id, &user_id, &bookmark_id)?;

    let member = state
        .db
        .get_member(&group_id, &user_id)?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Membership vanished after update")))?;
    Ok(Json(membership_response(member)))
}
