//! Drives the real client against a loopback fixture server speaking the
//! content API's JSON shapes.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use khatm_quran::QuranClient;
use khatm_types::models::{JuzPosition, Position};

/// Fixture corpus: surah 2 has 10 verses of "الم" (3 letters), surah 3 has
/// 5 verses of "من" (2 letters), surah 4 has 10 verses of "بسم" (3
/// letters). Surah 99 simulates an outage.
fn fixture_chapter(surah: u16) -> Option<(u16, &'static str)> {
    match surah {
        2 => Some((10, "الم")),
        3 => Some((5, "من")),
        4 => Some((10, "بسم")),
        _ => None,
    }
}

async fn by_chapter(Path(surah): Path<u16>) -> Result<Json<Value>, StatusCode> {
    let (count, text) = fixture_chapter(surah).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let verses: Vec<Value> = (1..=count)
        .map(|n| json!({ "verse_key": format!("{surah}:{n}"), "text_uthmani": text }))
        .collect();
    Ok(Json(json!({ "verses": verses })))
}

async fn by_key(Path(key): Path<String>) -> Json<Value> {
    Json(json!({ "verse": { "juz_number": 1, "verse_key": key } }))
}

async fn juz_meta(Path(juz): Path<u8>) -> Json<Value> {
    let _ = juz;
    Json(json!({ "juz": { "verses_count": 10 } }))
}

async fn by_juz(Path(juz): Path<u8>) -> Json<Value> {
    let _ = juz;
    let verses: Vec<Value> = (1..=10)
        .map(|n| json!({ "verse_key": format!("2:{n}") }))
        .collect();
    Json(json!({ "verses": verses }))
}

async fn spawn_fixture_server() -> String {
    let app = Router::new()
        .route("/verses/by_chapter/{surah}", get(by_chapter))
        .route("/verses/by_key/{key}", get(by_key))
        .route("/juzs/{juz}", get(juz_meta))
        .route("/verses/by_juz/{juz}", get(by_juz));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn forward_move_within_one_surah_sums_verses_after_old() {
    let client = QuranClient::new(spawn_fixture_server().await);

    // Verses 2:6 through 2:8, 3 letters each.
    let progress = client
        .character_progress(Position::new(2, 5), Position::new(2, 8))
        .await
        .unwrap();
    assert_eq!(progress, 9);
}

#[tokio::test]
async fn cross_surah_move_sums_tail_middles_and_head() {
    let client = QuranClient::new(spawn_fixture_server().await);

    // 2:9-2:10 (2×3) + all of surah 3 (5×2) + 4:1-4:2 (2×3)
    let progress = client
        .character_progress(Position::new(2, 8), Position::new(4, 2))
        .await
        .unwrap();
    assert_eq!(progress, 22);
}

#[tokio::test]
async fn backward_move_is_zero_without_any_fetch() {
    // Nothing is listening here: a backward move must not hit the network.
    let client = QuranClient::new("http://127.0.0.1:9");

    let progress = client
        .character_progress(Position::new(2, 8), Position::new(2, 3))
        .await
        .unwrap();
    assert_eq!(progress, 0);

    let same = client
        .character_progress(Position::new(2, 8), Position::new(2, 8))
        .await
        .unwrap();
    assert_eq!(same, 0);
}

#[tokio::test]
async fn progress_is_deterministic_for_a_fixed_range() {
    let client = QuranClient::new(spawn_fixture_server().await);

    let first = client
        .character_progress(Position::new(2, 1), Position::new(3, 5))
        .await
        .unwrap();
    let second = client
        .character_progress(Position::new(2, 1), Position::new(3, 5))
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn upstream_failure_propagates_instead_of_fabricating_progress() {
    let client = QuranClient::new(spawn_fixture_server().await);

    // Surah 99 answers 500.
    let result = client
        .character_progress(Position::new(99, 1), Position::new(99, 5))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn juz_position_is_derived_from_the_three_lookups() {
    let client = QuranClient::new(spawn_fixture_server().await);

    let juz = client.juz_position(Position::new(2, 5)).await.unwrap();
    assert_eq!(
        juz,
        JuzPosition {
            juz_number: 1,
            position_in_juz: 5,
            verses_in_juz: 10
        }
    );
}
