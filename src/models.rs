//! Data Models
//! Artist, User, Favorites などのデータ構造定義

use serde::{Deserialize, Serialize};

// ========================================
// Role Constants
// ========================================

pub mod role {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";
}

// ========================================
// Popularity Classification
// ========================================

/// 人気度ティア（popularity_score から導出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PopularityLevel {
    Emerging,
    Mainstream,
    Star,
    Legendary,
}

impl PopularityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopularityLevel::Emerging => "Emerging",
            PopularityLevel::Mainstream => "Mainstream",
            PopularityLevel::Star => "Star",
            PopularityLevel::Legendary => "Legendary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Emerging" => Some(PopularityLevel::Emerging),
            "Mainstream" => Some(PopularityLevel::Mainstream),
            "Star" => Some(PopularityLevel::Star),
            "Legendary" => Some(PopularityLevel::Legendary),
            _ => None,
        }
    }
}

/// スコア(0..=100)をティアに分類する純関数
///
/// 区切りは単調かつ隙間なし: <60 Emerging / 60..=79 Mainstream /
/// 80..=94 Star / >=95 Legendary
pub fn classify(score: i64) -> PopularityLevel {
    if score >= 95 {
        PopularityLevel::Legendary
    } else if score >= 80 {
        PopularityLevel::Star
    } else if score >= 60 {
        PopularityLevel::Mainstream
    } else {
        PopularityLevel::Emerging
    }
}

/// スコア未設定のアーティストは Emerging 扱い
pub fn level_for(score: Option<i64>) -> PopularityLevel {
    score.map(classify).unwrap_or(PopularityLevel::Emerging)
}

// ========================================
// Artist
// ========================================

/// Artist (DB row) — genres は JSON 配列の文字列で保持
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub genres: String,
    pub country: String,
    pub popularity_score: Option<i64>,
    pub popularity_level: String,
    pub debut_year: Option<i64>,
    pub years_active: Option<String>,
    pub label: Option<String>,
    pub image_url: Option<String>,
    pub sample_song_title: Option<String>,
    pub audio_preview_url: Option<String>,
    pub description: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Artist 作成リクエスト（バリデーション通過後に from_value で復元）
#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: String,
    pub genres: Vec<String>,
    pub country: String,
    pub popularity_score: Option<i64>,
    pub popularity_level: Option<String>,
    pub debut_year: Option<i64>,
    pub years_active: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "sampleSongTitle")]
    pub sample_song_title: Option<String>,
    #[serde(rename = "audioPreviewUrl")]
    pub audio_preview_url: Option<String>,
    pub description: Option<String>,
}

/// Artist 更新リクエスト（部分更新: 未指定フィールドは既存値を維持）
#[derive(Debug, Deserialize)]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub genres: Option<Vec<String>>,
    pub country: Option<String>,
    pub popularity_score: Option<i64>,
    pub popularity_level: Option<String>,
    pub debut_year: Option<i64>,
    pub years_active: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "sampleSongTitle")]
    pub sample_song_title: Option<String>,
    #[serde(rename = "audioPreviewUrl")]
    pub audio_preview_url: Option<String>,
    pub description: Option<String>,
}

/// Artist レスポンス（API返却用）
#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub country: String,
    pub popularity_score: Option<i64>,
    pub popularity_level: String,
    pub debut_year: Option<i64>,
    pub years_active: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "sampleSongTitle")]
    pub sample_song_title: Option<String>,
    #[serde(rename = "audioPreviewUrl")]
    pub audio_preview_url: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at_ms: i64,
}

impl ArtistResponse {
    pub fn from_artist(a: &Artist) -> Self {
        let genres: Vec<String> = serde_json::from_str(&a.genres).unwrap_or_default();
        Self {
            id: a.artist_id.clone(),
            name: a.name.clone(),
            genres,
            country: a.country.clone(),
            popularity_score: a.popularity_score,
            popularity_level: a.popularity_level.clone(),
            debut_year: a.debut_year,
            years_active: a.years_active.clone(),
            label: a.label.clone(),
            image_url: a.image_url.clone(),
            sample_song_title: a.sample_song_title.clone(),
            audio_preview_url: a.audio_preview_url.clone(),
            description: a.description.clone(),
            created_at_ms: a.created_at_ms,
            updated_at_ms: a.updated_at_ms,
        }
    }
}

// ========================================
// User
// ========================================

/// User (DB row)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub otp: Option<String>,
    pub otp_expires_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// 登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// ログインリクエスト（第一要素: email + password）
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// OTP検証リクエスト（第二要素）
#[derive(Debug, Deserialize)]
pub struct VerifyLoginRequest {
    pub email: String,
    pub otp: String,
}

/// 登録レスポンス
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// OTP検証レスポンス（Bearerトークン発行）
#[derive(Debug, Serialize)]
pub struct VerifyLoginResponse {
    pub token: String,
    pub email: String,
    pub role: String,
}

/// プロフィールレスポンス（password / otp は含めない）
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub favorites: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at_ms: i64,
}

// ========================================
// Shared Response Types
// ========================================

/// メッセージのみのレスポンス
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// ========================================
// Tests
// ========================================
