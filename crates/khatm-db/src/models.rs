/// Database row types — these map directly to SQLite rows.
/// Distinct from khatm-types API models to keep the DB layer independent.

pub struct ProfileRow {
    pub id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

pub struct BookmarkRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub surah_number: u16,
    pub verse_number: u16,
    pub created_at: String,
    pub updated_at: String,
}

pub struct GroupRow {
    pub id: String,
    pub name: String,
    pub group_code: String,
    pub created_by: String,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

pub struct MemberRow {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub role: String,
    pub current_bookmark_id: Option<String>,
    pub created_at: String,
}

/// One row of a user's group list: group columns joined with the user's
/// own membership plus the live member count.
pub struct GroupSummaryRow {
    pub id: String,
    pub name: String,
    pub group_code: String,
    pub role: String,
    pub member_count: u32,
}

/// A member's active bookmark, when one is set.
pub struct BookmarkRef {
    pub id: String,
    pub name: String,
    pub surah_number: u16,
    pub verse_number: u16,
}

/// Group-page member row: membership joined with profile and active
/// bookmark. Progress is merged in by the caller from the log aggregation.
pub struct MemberDetailRow {
    pub user_id: String,
    pub role: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bookmark: Option<BookmarkRef>,
}
