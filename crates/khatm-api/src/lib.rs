pub mod bookmarks;
pub mod error;
pub mod groups;
pub mod middleware;
pub mod profile;
pub mod reading_logs;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use khatm_db::Database;
use khatm_quran::QuranClient;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub quran: QuranClient,
    pub jwt_secret: String,
}

/// Parse a UUID stored as TEXT. Corrupt rows are logged and mapped to the
/// nil UUID rather than failing the whole response.
pub(crate) fn parse_uuid(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", what, raw, e);
        Uuid::default()
    })
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC and convert; RFC 3339 is also accepted.
pub(crate) fn parse_db_time(raw: &str, what: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}': {}", what, raw, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_datetime_format() {
        let parsed = parse_db_time("2026-08-03 10:30:00", "test");
        assert_eq!(parsed.to_rfc3339(), "2026-08-03T10:30:00+00:00");
    }

    #[test]
    fn corrupt_values_fall_back_to_defaults() {
        assert_eq!(parse_db_time("yesterday-ish", "test"), DateTime::<Utc>::default());
        assert_eq!(parse_uuid("not-a-uuid", "test"), Uuid::default());
    }
}
