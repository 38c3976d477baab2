use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{JuzPosition, Period, Role};

// -- JWT Claims --

/// Claims carried by the auth provider's access token. The middleware
/// verifies the signature and trusts these verbatim; `sub` keys the local
/// profile row. `name`/`email`/`picture` are optional OIDC claims used for
/// lazy profile provisioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub exp: usize,
}

// -- Errors --

/// Body shape of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Profile --

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

// -- Bookmarks --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookmarkRequest {
    pub name: String,
    pub surah_number: u16,
    pub verse_number: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookmarkRequest {
    pub surah_number: u16,
    pub verse_number: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameBookmarkRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub id: Uuid,
    pub name: String,
    pub surah_number: u16,
    pub verse_number: u16,
    pub updated_at: DateTime<Utc>,
    /// Juz display info; null when the content API lookup failed.
    pub juz: Option<JuzPosition>,
}

// -- Groups --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinByCodeRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetActiveBookmarkRequest {
    pub bookmark_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub group_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One row of the caller's group list.
#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub group_code: String,
    pub role: Role,
    pub member_count: u32,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub current_bookmark_id: Option<Uuid>,
}

/// A member's active bookmark as shown on the group page.
#[derive(Debug, Serialize)]
pub struct ActiveBookmark {
    pub id: Uuid,
    pub name: String,
    pub surah_number: u16,
    pub verse_number: u16,
}

#[derive(Debug, Serialize)]
pub struct GroupMemberDetail {
    pub user_id: Uuid,
    pub role: Role,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bookmark: Option<ActiveBookmark>,
    /// All-time character progress logged in this group.
    pub progress: u64,
}

#[derive(Debug, Serialize)]
pub struct GroupDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub group_code: String,
    pub created_by: Uuid,
    /// Sorted by progress, highest first.
    pub members: Vec<GroupMemberDetail>,
    pub current_user_role: Role,
    pub current_user_id: Uuid,
}

// -- Rankings --

#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Serialize)]
pub struct RankingEntry {
    pub user_id: Uuid,
    pub rank: u32,
    pub progress: u64,
}

// -- Reading logs --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReadingLogRequest {
    pub old_surah: u16,
    pub old_verse: u16,
    pub new_surah: u16,
    pub new_verse: u16,
    #[serde(default)]
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReadingLogResponse {
    /// Null when no progress was made and no row was written.
    pub log_id: Option<Uuid>,
    pub character_count: u64,
}
