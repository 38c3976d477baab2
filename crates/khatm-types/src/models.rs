use serde::{Deserialize, Serialize};

/// A reading position: surah (chapter) number and verse number within it.
/// The derived ordering is lexicographic with surah as the major key, which
/// is canonical reading order — field order matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub surah: u16,
    pub verse: u16,
}

impl Position {
    pub fn new(surah: u16, verse: u16) -> Self {
        Self { surah, verse }
    }

    /// The `surah:verse` key used by the content API.
    pub fn verse_key(&self) -> String {
        format!("{}:{}", self.surah, self.verse)
    }
}

/// Member role within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

/// Leaderboard time window selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Weekly,
    Monthly,
    All,
}

/// Where a verse sits within its juz. Display-only metadata derived from
/// the content API; never used for progress computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuzPosition {
    pub juz_number: u8,
    pub position_in_juz: u32,
    pub verses_in_juz: u32,
}
