//! Favorites API Handlers
//! /users/favorites エンドポイント
//!
//! 追加も削除も冪等。重複追加と不在削除はエラーにしない。
//! 変更は1文のアトミックな set 操作で行い、read-modify-write による
//! 更新消失を避ける。

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Artist, ArtistResponse, MessageResponse};
use crate::AppState;

// ========================================
// Response Types
// ========================================

#[derive(Serialize)]
pub struct FavoritesResponse {
    pub items: Vec<ArtistResponse>,
    pub total: usize,
}

// ========================================
// Handlers
// ========================================

/// GET /users/favorites - お気に入り一覧（Artist を結合して返す）
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<FavoritesResponse>, ApiError> {
    // JOIN なので削除済みアーティストの残存IDは自然に落ちる
    let artists: Vec<Artist> = sqlx::query_as(
        "SELECT artists.* FROM artists \
         JOIN favorites ON favorites.artist_id = artists.artist_id \
         WHERE favorites.user_id = ? \
         ORDER BY favorites.created_at_ms ASC, artists.artist_id ASC",
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    let items: Vec<ArtistResponse> = artists.iter().map(ArtistResponse::from_artist).collect();
    let total = items.len();

    Ok(Json(FavoritesResponse { items, total }))
}

/// POST /users/favorites/:artist_id - お気に入り追加（冪等）
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(artist_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // 追加時点での存在チェック
    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM artists WHERE artist_id = ?")
        .bind(&artist_id)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(ApiError::NotFound("Artist not found".to_string()));
    }

    let now_ms = chrono::Utc::now().timestamp_millis();

    // 登録済みなら no-op
    sqlx::query(
        "INSERT OR IGNORE INTO favorites (user_id, artist_id, created_at_ms) VALUES (?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&artist_id)
    .bind(now_ms)
    .execute(&state.db)
    .await?;

    info!("Favorite added: user={}, artist={}", user.id, artist_id);

    Ok(Json(MessageResponse::new("Artist added to favorites")))
}

/// DELETE /users/favorites/:artist_id - お気に入り削除（冪等）
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(artist_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // 未登録でも成功扱い
    sqlx::query("DELETE FROM favorites WHERE user_id = ? AND artist_id = ?")
        .bind(&user.id)
        .bind(&artist_id)
        .execute(&state.db)
        .await?;

    info!("Favorite removed: user={}, artist={}", user.id, artist_id);

    Ok(Json(MessageResponse::new("Artist removed from favorites")))
}
