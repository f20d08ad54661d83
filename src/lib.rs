//! Artist Catalog API
//! 音楽アーティストカタログの REST API
//!
//! - アーティスト CRUD + フィルタ/ソート/ページング検索
//! - OTP 二要素ログイン（bcrypt + JWT）
//! - ユーザーごとのお気に入り

pub mod auth;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod query;
pub mod validation;

use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;

// ========================================
// 設定
// ========================================

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: String,
    pub token_secret: String,
    pub otp_ttl_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            db_path: "artists.db".to_string(),
            token_secret: "dev-secret-change-me".to_string(),
            otp_ttl_minutes: 5,
        }
    }
}

impl AppConfig {
    /// 環境変数から設定を読む（未設定はデフォルト値）
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            db_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.db_path),
            token_secret: std::env::var("TOKEN_SECRET").unwrap_or(defaults.token_secret),
            otp_ttl_minutes: std::env::var("OTP_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.otp_ttl_minutes),
        }
    }
}

/// 共有アプリケーション状態（起動時に一度構築してハンドラへ注入）
pub struct AppState {
    pub db: db::DbPool,
    pub config: AppConfig,
}

// ========================================
// Router
// ========================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// ヘルスチェック
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "artist-catalog-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 404 フォールバック
async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route not found: {} {}", method, uri))
}

/// ルーター構築
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/artists",
            get(handlers::artists::list_artists).post(handlers::artists::create_artist),
        )
        .route(
            "/artists/:id",
            get(handlers::artists::get_artist)
                .put(handlers::artists::update_artist)
                .delete(handlers::artists::delete_artist),
        )
        .route("/users/register", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login))
        .route("/users/verify-login", post(handlers::users::verify_login))
        .route("/users/me", get(handlers::users::me))
        .route("/users/favorites", get(handlers::favorites::list_favorites))
        .route(
            "/users/favorites/:artist_id",
            post(handlers::favorites::add_favorite).delete(handlers::favorites::remove_favorite),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
