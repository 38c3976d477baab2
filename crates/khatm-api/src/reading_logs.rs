use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use khatm_types::api::{
    Claims, CreateReadingLogRequest, RankingEntry, RankingsQuery, ReadingLogResponse,
};
use khatm_types::models::Period;

use crate::bookmarks::validate_position;
use crate::error::ApiError;
use crate::{AppState, parse_uuid};

const SQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Inclusive aggregation window. Bounds format to the same
/// `datetime('now')` shape the log rows carry, so string comparison in SQL
/// is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    pub fn start_sql(&self) -> String {
        self.start.format(SQL_DATETIME).to_string()
    }

    pub fn end_sql(&self) -> String {
        self.end.format(SQL_DATETIME).to_string()
    }
}

/// Monday 00:00:00 through Sunday 23:59:59 of the week containing `today`.
pub fn week_window(today: NaiveDate) -> PeriodWindow {
    let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
    PeriodWindow {
        start: monday.and_time(NaiveTime::MIN),
        end: end_of_day(monday + Days::new(6)),
    }
}

/// First through last calendar day of the month containing `today`.
pub fn month_window(today: NaiveDate) -> PeriodWindow {
    let first = today.with_day(1).unwrap_or(today);
    let last = match NaiveDate::from_ymd_opt(
        match first.month() {
            12 => first.year() + 1,
            _ => first.year(),
        },
        match first.month() {
            12 => 1,
            m => m + 1,
        },
        1,
    ) {
        Some(next_first) => next_first - Days::new(1),
        None => first,
    };
    PeriodWindow {
        start: first.and_time(NaiveTime::MIN),
        end: end_of_day(last),
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

pub fn window_for(period: Period, today: NaiveDate) -> Option<PeriodWindow> {
    match period {
        Period::Weekly => Some(week_window(today)),
        Period::Monthly => Some(month_window(today)),
        Period::All => None,
    }
}

/// GET /groups/{id}/rankings?period=weekly|monthly|all
///
/// Sums each user's logged characters over the window and ranks them,
/// highest first. Ranks are sequential on purpose: equal sums get
/// consecutive distinct ranks, matching the product's existing
/// leaderboard behavior. Only users with at least one log row appear;
/// the group page merges in the rest of the members at zero.
pub async fn group_rankings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RankingsQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    let group_id = id.to_string();
    state
        .db
        .get_group(&group_id)?
        .ok_or(ApiError::NotFound("Group not found"))?;

    let window = window_for(query.period, chrono::Utc::now().date_naive());
    let bounds = window.map(|w| (w.start_sql(), w.end_sql()));
    let sums = state.db.sum_progress_by_user(
        &group_id,
        bounds.as_ref().map(|(start, end)| (start.as_str(), end.as_str())),
    )?;

    let rankings = sums
        .iter()
        .enumerate()
        .map(|(idx, (user_id, progress))| RankingEntry {
            user_id: parse_uuid(user_id, "user id"),
            rank: idx as u32 + 1,
            progress: *progress,
        })
        .collect();
    Ok(Json(rankings))
}

/// POST /reading-logs
///
/// Record progress between two explicit positions, optionally attributed
/// to a group the caller belongs to. Uses the same canonical
/// character-count metric as bookmark repositioning; zero progress writes
/// nothing.
pub async fn create_reading_log(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateReadingLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let old = validate_position(req.old_surah, req.old_verse)?;
    let new = validate_position(req.new_surah, req.new_verse)?;

    let group_id = match req.group_id {
        Some(gid) => {
            let gid = gid.to_string();
            state
                .db
                .get_group(&gid)?
                .ok_or(ApiError::NotFound("Group not found"))?;
            state
                .db
                .get_member(&gid, &claims.sub.to_string())?
                .ok_or(ApiError::Forbidden("Not a member of this group"))?;
            Some(gid)
        }
        None => None,
    };

    let character_count = state.quran.character_progress(old, new).await?;
    if character_count == 0 {
        return Ok((
            StatusCode::OK,
            Json(ReadingLogResponse {
                log_id: None,
                character_count: 0,
            }),
        ));
    }

    let id = Uuid::new_v4();
    let window = week_window(chrono::Utc::now().date_naive());
    state.db.insert_reading_log(
        &id.to_string(),
        &claims.sub.to_string(),
        group_id.as_deref(),
        character_count,
        &window.start_sql(),
        &window.end_sql(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(ReadingLogResponse {
            log_id: Some(id),
            character_count,
        }),
    ))
}
