//! Auth Module
//! パスワードハッシュ / JWT / OTP 生成と、ハンドラへ渡す認証コンテキスト
//!
//! ハッシュとトークンは差し替え可能な外部プリミティブ（bcrypt /
//! jsonwebtoken）に委譲する。認証済みユーザーは extractor として
//! ハンドラ引数に明示的に渡す。

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::role;
use crate::AppState;

const BCRYPT_COST: u32 = 10;
const TOKEN_TTL_SECS: i64 = 3600; // 1時間

// ========================================
// Password Hashing
// ========================================

pub fn hash_password(raw: &str) -> anyhow::Result<String> {
    Ok(bcrypt::hash(raw, BCRYPT_COST)?)
}

/// 照合失敗もハッシュ形式エラーも false 扱い
pub fn verify_password(raw: &str, hash: &str) -> bool {
    bcrypt::verify(raw, hash).unwrap_or(false)
}

// ========================================
// Bearer Token
// ========================================

/// JWTクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn encode_token(
    user_id: &str,
    email: &str,
    role: &str,
    secret: &str,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        id: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// "Bearer xxx" 形式も受け付ける。無効・期限切れは None
pub fn decode_token(token: &str, secret: &str) -> Option<Claims> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

// ========================================
// OTP
// ========================================

/// 6桁OTP生成（先頭ゼロなし）
pub fn generate_otp() -> String {
    use rand::Rng;
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

// ========================================
// Extractors
// ========================================

/// 認証済みユーザーコンテキスト
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == role::ADMIN
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if header.is_empty() {
            return Err(ApiError::Auth("Authorization header missing".to_string()));
        }

        let claims = decode_token(header, &state.config.token_secret)
            .ok_or_else(|| ApiError::Auth("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            id: claims.id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// admin ロール必須のエンドポイント用
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Forbidden("Forbidden: insufficient role".to_string()));
        }
        Ok(AdminUser(user))
    }
}

// ========================================
// Tests
// ========================================
