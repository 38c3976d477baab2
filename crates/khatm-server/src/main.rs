use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use khatm_api::middleware::require_auth;
use khatm_api::{AppState, AppStateInner, bookmarks, groups, profile, reading_logs};
use khatm_quran::QuranClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khatm=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("KHATM_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("KHATM_DB_PATH").unwrap_or_else(|_| "khatm.db".into());
    let host = std::env::var("KHATM_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("KHATM_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let quran_api_url = std::env::var("KHATM_QURAN_API_URL")
        .unwrap_or_else(|_| QuranClient::DEFAULT_BASE_URL.into());

    // Init database
    let db = khatm_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        quran: QuranClient::new(quran_api_url),
        jwt_secret,
    });

    // Routes — every endpoint requires an authenticated session.
    let app = Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/profile/sync-avatar", post(profile::sync_avatar))
        .route(
            "/bookmarks",
            get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark),
        )
        .route(
            "/bookmarks/{id}",
            put(bookmarks::update_bookmark).delete(bookmarks::delete_bookmark),
        )
        .route("/bookmarks/{id}/rename", patch(bookmarks::rename_bookmark))
        .route(
            "/groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route("/groups/join-by-code", post(groups::join_by_code))
        .route(
            "/groups/{id}",
            get(groups::group_detail).delete(groups::delete_group),
        )
        .route("/groups/{id}/join", post(groups::join_group))
        .route("/groups/{id}/leave", post(groups::leave_group))
        .route("/groups/{id}/bookmark", put(groups::set_active_bookmark))
        .route("/groups/{id}/rankings", get(reading_logs::group_rankings))
        .route("/reading-logs", post(reading_logs::create_reading_log))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Khatm server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
