use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use khatm_types::models::{JuzPosition, Position};

use crate::progress;

/// Errors from the Quran content API. A failed fetch fails the operation
/// that needed it — no progress value is ever fabricated from a partial
/// read.
#[derive(Debug, Error)]
pub enum QuranError {
    #[error("content API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed verse key: {0}")]
    MalformedVerseKey(String),

    #[error("verse not found in its juz: {0}")]
    VerseNotFound(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Verse {
    pub verse_key: String,
    pub text_uthmani: String,
}

impl Verse {
    /// The verse number within its surah, parsed from `verse_key`
    /// (`"2:255"` → 255).
    pub fn verse_number(&self) -> Result<u16, QuranError> {
        self.verse_key
            .split(':')
            .nth(1)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| QuranError::MalformedVerseKey(self.verse_key.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct ChapterVersesResponse {
    verses: Vec<Verse>,
}

#[derive(Debug, Deserialize)]
struct VerseByKeyResponse {
    verse: VerseMeta,
}

#[derive(Debug, Deserialize)]
struct VerseMeta {
    juz_number: u8,
}

#[derive(Debug, Deserialize)]
struct JuzResponse {
    juz: JuzMeta,
}

#[derive(Debug, Deserialize)]
struct JuzMeta {
    verses_count: u32,
}

#[derive(Debug, Deserialize)]
struct VersesByJuzResponse {
    verses: Vec<VerseKeyOnly>,
}

#[derive(Debug, Deserialize)]
struct VerseKeyOnly {
    verse_key: String,
}

/// Client for the Quran content API (api.quran.com v4 shape). Pure
/// consumer: no caching, no retries — a failed fetch propagates.
#[derive(Clone)]
pub struct QuranClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuranClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.quran.com/api/v4";

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// All verses of a surah with Uthmani text. One request per surah:
    /// per_page 300 covers the longest surah (al-Baqarah, 286 verses).
    pub async fn chapter_verses(&self, surah: u16) -> Result<Vec<Verse>, QuranError> {
        let url = format!("{}/verses/by_chapter/{}", self.base_url, surah);
        let body: ChapterVersesResponse = self
            .http
            .get(&url)
            .query(&[("per_page", "300"), ("fields", "text_uthmani")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Fetched {} verses for surah {}", body.verses.len(), surah);
        Ok(body.verses)
    }

    /// Arabic letters read moving from `old` to `new`. Non-forward moves
    /// are 0 without touching the network; forward moves sum the letter
    /// counts of every verse strictly after `old` up to and including
    /// `new`, across surah boundaries.
    pub async fn character_progress(&self, old: Position, new: Position) -> Result<u64, QuranError> {
        let mut total = 0u64;
        for span in progress::spans_between(old, new) {
            let verses = self.chapter_verses(span.surah).await?;
            for verse in &verses {
                let number = verse.verse_number()?;
                if number >= span.from && span.to.map_or(true, |to| number <= to) {
                    total += progress::count_arabic_letters(&verse.text_uthmani);
                }
            }
        }
        Ok(total)
    }

    /// Where a position sits within its juz, for display: juz number, the
    /// verse's 1-based index in the juz, and the juz's verse count.
    pub async fn juz_position(&self, position: Position) -> Result<JuzPosition, QuranError> {
        let key = position.verse_key();

        let url = format!("{}/verses/by_key/{}", self.base_url, key);
        let by_key: VerseByKeyResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let juz_number = by_key.verse.juz_number;

        let url = format!("{}/juzs/{}", self.base_url, juz_number);
        let juz: JuzResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let verses_in_juz = juz.juz.verses_count;

        let url = format!("{}/verses/by_juz/{}", self.base_url, juz_number);
        let per_page = verses_in_juz.to_string();
        let in_juz: VersesByJuzResponse = self
            .http
            .get(&url)
            .query(&[("page", "1"), ("per_page", per_page.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let position_in_juz = in_juz
            .verses
            .iter()
            .position(|v| v.verse_key == key)
            .map(|idx| idx as u32 + 1)
            .ok_or(QuranError::VerseNotFound(key))?;

        Ok(JuzPosition {
            juz_number,
            position_in_juz,
            verses_in_juz,
        })
    }
}
