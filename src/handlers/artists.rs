//! Artists API Handlers
//! /artists エンドポイント

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{
    classify, level_for, Artist, ArtistResponse, CreateArtistRequest, MessageResponse,
    UpdateArtistRequest,
};
use crate::query::{self, ArtistFilter, ListOptions, Page};
use crate::validation;
use crate::AppState;

// ========================================
// Query Parameters
// ========================================

/// 生のクエリ文字列（数値系は緩く解釈するため String で受ける）
#[derive(Debug, Deserialize)]
pub struct ListArtistsQuery {
    pub genre: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "minPopularity")]
    pub min_popularity: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

// ========================================
// Handlers
// ========================================

/// GET /artists - フィルタ + ソート + ページング付き一覧
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListArtistsQuery>,
) -> Result<Json<Page<ArtistResponse>>, ApiError> {
    let filter = ArtistFilter {
        genre: non_empty(query.genre),
        country: non_empty(query.country),
        min_popularity: query::coerce_min_popularity(query.min_popularity.as_deref()),
        q: non_empty(query.q),
    };
    let opts = ListOptions::from_raw(
        query.page.as_deref(),
        query.limit.as_deref(),
        query.sort_by.as_deref(),
        query.order.as_deref(),
    );

    let page = query::list_artists(&state.db, &filter, &opts).await?;
    Ok(Json(page.map(ArtistResponse::from_artist)))
}

/// GET /artists/:id - Artist詳細取得
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(artist_id): Path<String>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let artist = fetch_artist(&state.db, &artist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artist not found".to_string()))?;

    Ok(Json(ArtistResponse::from_artist(&artist)))
}

/// POST /artists - Artist作成（admin専用）
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<ArtistResponse>), ApiError> {
    let errors = validation::validate_artist_create(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let req: CreateArtistRequest = serde_json::from_value(payload)?;

    let now_ms = chrono::Utc::now().timestamp_millis();

    // ティアが明示されていなければスコアから導出
    let level = match &req.popularity_level {
        Some(level) => level.clone(),
        None => level_for(req.popularity_score).as_str().to_string(),
    };

    let artist = Artist {
        artist_id: generate_artist_id(),
        name: req.name,
        genres: serde_json::to_string(&req.genres)?,
        country: req.country,
        popularity_score: req.popularity_score,
        popularity_level: level,
        debut_year: req.debut_year,
        years_active: req.years_active,
        label: req.label,
        image_url: req.image_url,
        sample_song_title: req.sample_song_title,
        audio_preview_url: req.audio_preview_url,
        description: req.description,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    };

    sqlx::query(r#"
        INSERT INTO artists (
            artist_id, name, genres, country,
            popularity_score, popularity_level, debut_year,
            years_active, label, image_url, sample_song_title,
            audio_preview_url, description, created_at_ms, updated_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    "#)
    .bind(&artist.artist_id)
    .bind(&artist.name)
    .bind(&artist.genres)
    .bind(&artist.country)
    .bind(artist.popularity_score)
    .bind(&artist.popularity_level)
    .bind(artist.debut_year)
    .bind(&artist.years_active)
    .bind(&artist.label)
    .bind(&artist.image_url)
    .bind(&artist.sample_song_title)
    .bind(&artist.audio_preview_url)
    .bind(&artist.description)
    .bind(artist.created_at_ms)
    .bind(artist.updated_at_ms)
    .execute(&state.db)
    .await?;

    info!(
        "Artist created: artist_id={}, name={}, by={}",
        artist.artist_id, artist.name, admin.email
    );

    Ok((StatusCode::CREATED, Json(ArtistResponse::from_artist(&artist))))
}

/// PUT /artists/:id - Artist部分更新（admin専用）
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(artist_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let errors = validation::validate_artist_update(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let req: UpdateArtistRequest = serde_json::from_value(payload)?;

    let existing = fetch_artist(&state.db, &artist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artist not found".to_string()))?;

    let now_ms = chrono::Utc::now().timestamp_millis();

    // ティア再計算: 明示指定 > スコア変更で再分類 > 既存値を維持
    let level = match (&req.popularity_level, req.popularity_score) {
        (Some(level), _) => level.clone(),
        (None, Some(score)) => classify(score).as_str().to_string(),
        (None, None) => existing.popularity_level.clone(),
    };

    let genres_json = match &req.genres {
        Some(genres) => Some(serde_json::to_string(genres)?),
        None => None,
    };

    sqlx::query(r#"
        UPDATE artists SET
            name = COALESCE(?, name),
            genres = COALESCE(?, genres),
            country = COALESCE(?, country),
            popularity_score = COALESCE(?, popularity_score),
            popularity_level = ?,
            debut_year = COALESCE(?, debut_year),
            years_active = COALESCE(?, years_active),
            label = COALESCE(?, label),
            image_url = COALESCE(?, image_url),
            sample_song_title = COALESCE(?, sample_song_title),
            audio_preview_url = COALESCE(?, audio_preview_url),
            description = COALESCE(?, description),
            updated_at_ms = ?
        WHERE artist_id = ?
    "#)
    .bind(&req.name)
    .bind(&genres_json)
    .bind(&req.country)
    .bind(req.popularity_score)
    .bind(&level)
    .bind(req.debut_year)
    .bind(&req.years_active)
    .bind(&req.label)
    .bind(&req.image_url)
    .bind(&req.sample_song_title)
    .bind(&req.audio_preview_url)
    .bind(&req.description)
    .bind(now_ms)
    .bind(&artist_id)
    .execute(&state.db)
    .await?;

    let updated = fetch_artist(&state.db, &artist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artist not found".to_string()))?;

    info!("Artist updated: artist_id={}, by={}", artist_id, admin.email);

    Ok(Json(ArtistResponse::from_artist(&updated)))
}

/// DELETE /artists/:id - Artist削除（admin専用）
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(artist_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM artists WHERE artist_id = ?")
        .bind(&artist_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Artist not found".to_string()));
    }

    info!("Artist deleted: artist_id={}, by={}", artist_id, admin.email);

    Ok(Json(MessageResponse::new("Artist deleted")))
}

// ========================================
// Helper Functions
// ========================================

/// artist_id 生成 (ARTIST_ + base32 8文字)
fn generate_artist_id() -> String {
    use rand::Rng;
    let random_bytes: [u8; 5] = rand::thread_rng().gen();
    let encoded = base32::encode(base32::Alphabet::Crockford, &random_bytes);
    format!("ARTIST_{}", &encoded[..8])
}

async fn fetch_artist(db: &DbPool, artist_id: &str) -> Result<Option<Artist>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM artists WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_optional(db)
        .await
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
