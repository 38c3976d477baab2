use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use khatm_db::models::BookmarkRow;
use khatm_types::api::{
    BookmarkResponse, Claims, CreateBookmarkRequest, RenameBookmarkRequest, UpdateBookmarkRequest,
};
use khatm_types::models::{JuzPosition, Position};

use crate::error::ApiError;
use crate::reading_logs::week_window;
use crate::{AppState, parse_db_time, parse_uuid};

const SURAH_COUNT: u16 = 114;

/// Range-check only; whether (surah, verse) denotes a real verse is the
/// content API's business.
pub(crate) fn validate_position(surah: u16, verse: u16) -> Result<Position, ApiError> {
    if !(1..=SURAH_COUNT).contains(&surah) {
        return Err(ApiError::BadRequest(format!(
            "Surah number must be between 1 and 114, got {surah}"
        )));
    }
    if verse < 1 {
        return Err(ApiError::BadRequest(
            "Verse number must be at least 1".into(),
        ));
    }
    Ok(Position::new(surah, verse))
}

fn to_response(row: BookmarkRow, juz: Option<JuzPosition>) -> BookmarkResponse {
    BookmarkResponse {
        id: parse_uuid(&row.id, "bookmark id"),
        name: row.name,
        surah_number: row.surah_number,
        verse_number: row.verse_number,
        updated_at: parse_db_time(&row.updated_at, "bookmark updated_at"),
        juz,
    }
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<BookmarkResponse>>, ApiError> {
    let rows = state.db.bookmarks_for_user(&claims.sub.to_string())?;

    let mut bookmarks = Vec::with_capacity(rows.len());
    for row in rows {
        // Juz info is display sugar: a content-API hiccup degrades to null
        // instead of failing the whole list.
        let position = Position::new(row.surah_number, row.verse_number);
        let juz = match state.quran.juz_position(position).await {
            Ok(juz) => Some(juz),
            Err(e) => {
                warn!("Juz lookup failed for {}: {}", position.verse_key(), e);
                None
            }
        };
        bookmarks.push(to_response(row, juz));
    }

    Ok(Json(bookmarks))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    validate_position(req.surah_number, req.verse_number)?;

    let id = Uuid::new_v4();
    state.db.insert_bookmark(
        &id.to_string(),
        &claims.sub.to_string(),
        name,
        req.surah_number,
        req.verse_number,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(BookmarkResponse {
            id,
            name: name.to_string(),
            surah_number: req.surah_number,
            verse_number: req.verse_number,
            updated_at: chrono::Utc::now(),
            juz: None,
        }),
    ))
}

/// Repositioning is one logical operation: move the bookmark, compute the
/// character progress from the old position, and append a reading log for
/// every group where this bookmark is the member's active one. Progress is
/// computed before anything is written, so a content-API failure leaves
/// the bookmark untouched.
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBookmarkRequest>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let new_position = validate_position(req.surah_number, req.verse_number)?;
    let user_id = claims.sub.to_string();
    let bookmark_id = id.to_string();

    let old = state
        .db
        .get_bookmark(&bookmark_id, &user_id)?
        .ok_or(ApiError::NotFound("Bookmark not found"))?;
    let old_position = Position::new(old.surah_number, old.verse_number);

    let character_count = state
        .quran
        .character_progress(old_position, new_position)
        .await?;

    let window = week_window(chrono::Utc::now().date_naive());
    let logged = state.db.reposition_bookmark(
        &bookmark_id,
        &user_id,
        req.surah_number,
        req.verse_number,
        character_count,
        &window.start_sql(),
        &window.end_sql(),
    )?;
    if !logged.is_empty() {
        info!(
            "Logged {} characters for user {} in {} group(s)",
            character_count,
            user_id,
            logged.len()
        );
    }

    let row = state
        .db
        .get_bookmark(&bookmark_id, &user_id)?
        .ok_or(ApiError::NotFound("Bookmark not found"))?;
    Ok(Json(to_response(row, None)))
}

pub async fn rename_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RenameBookmarkRequest>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }

    let user_id = claims.sub.to_string();
    let bookmark_id = id.to_string();
    if !state.db.rename_bookmark(&bookmark_id, &user_id, name)? {
        return Err(ApiError::NotFound("Bookmark not found"));
    }

    let row = state
        .db
        .get_bookmark(&bookmark_id, &user_id)?
        .ok_or(ApiError::NotFound("Bookmark not found"))?;
    Ok(Json(to_response(row, None)))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state
        .db
        .delete_bookmark(&id.to_string(), &claims.sub.to_string())?
    {
        return Err(ApiError::NotFound("Bookmark not found"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_bounds_are_checked() {
        assert!(validate_position(1, 1).is_ok());
        assert!(validate_position(114, 6).is_ok());
        assert!(validate_position(0, 1).is_err());
        assert!(validate_position(115, 1).is_err());
        assert!(validate_position(2, 0).is_err());
    }
}
