//! Users API Handlers
//! /users エンドポイント（登録 / OTPログイン / プロフィール）
//!
//! ログインは二段階: login で資格情報を検証して OTP を発行し、
//! verify-login で OTP を Bearer トークンに交換する。

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::mailer;
use crate::models::{
    role, LoginRequest, MessageResponse, RegisterRequest, RegisterResponse, User, UserResponse,
    VerifyLoginRequest, VerifyLoginResponse,
};
use crate::validation;
use crate::AppState;

// ========================================
// Handlers
// ========================================

/// POST /users/register - ユーザー登録
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let errors = validation::validate_register(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let req: RegisterRequest = serde_json::from_value(payload)?;

    let email = normalize_email(&req.email);

    // email 重複チェック
    let existing: Option<(String,)> = sqlx::query_as("SELECT user_id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User with this email already exists".to_string()));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user_id = Uuid::new_v4().to_string();
    let user_role = req.role.unwrap_or_else(|| role::USER.to_string());
    let now_ms = chrono::Utc::now().timestamp_millis();

    sqlx::query(r#"
        INSERT INTO users (user_id, email, password_hash, role, created_at_ms, updated_at_ms)
        VALUES (?, ?, ?, ?, ?, ?)
    "#)
    .bind(&user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(&user_role)
    .bind(now_ms)
    .bind(now_ms)
    .execute(&state.db)
    .await?;

    info!("User registered: {} (role: {})", email, user_role);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user_id,
            email,
            role: user_role,
        }),
    ))
}

/// POST /users/login - 資格情報を検証して OTP を発行
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    let errors = validation::validate_login(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let req: LoginRequest = serde_json::from_value(payload)?;

    let user = fetch_user_by_email(&state.db, &normalize_email(&req.email))
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid email or password".to_string()))?;

    if !auth::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Auth("Invalid email or password".to_string()));
    }

    let otp = auth::generate_otp();
    let now_ms = chrono::Utc::now().timestamp_millis();
    let expires_at_ms = now_ms + state.config.otp_ttl_minutes * 60 * 1000;

    sqlx::query(
        "UPDATE users SET otp = ?, otp_expires_at_ms = ?, updated_at_ms = ? WHERE user_id = ?",
    )
    .bind(&otp)
    .bind(expires_at_ms)
    .bind(now_ms)
    .bind(&user.user_id)
    .execute(&state.db)
    .await?;

    mailer::send_email(
        &user.email,
        "Your Artist Catalog OTP",
        &format!(
            "Your OTP is: {}. It expires in {} minutes.",
            otp, state.config.otp_ttl_minutes
        ),
    )
    .await?;

    info!("OTP issued for {}", user.email);

    Ok(Json(MessageResponse::new(
        "OTP sent to your email (simulated in console for this project).",
    )))
}

/// POST /users/verify-login - OTP を検証して Bearer トークンを返す
pub async fn verify_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<VerifyLoginResponse>, ApiError> {
    let errors = validation::validate_verify_login(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let req: VerifyLoginRequest = serde_json::from_value(payload)?;

    let user = fetch_user_by_email(&state.db, &normalize_email(&req.email)).await?;

    let (user, otp, expires_at_ms) = match user {
        Some(u) => match (u.otp.clone(), u.otp_expires_at_ms) {
            (Some(otp), Some(expires)) => (u, otp, expires),
            _ => {
                return Err(ApiError::BadRequest(
                    "OTP not found. Please login again.".to_string(),
                ))
            }
        },
        None => {
            return Err(ApiError::BadRequest(
                "OTP not found. Please login again.".to_string(),
            ))
        }
    };

    let now_ms = chrono::Utc::now().timestamp_millis();
    if now_ms > expires_at_ms {
        // 期限切れは回復可能な状態遷移: OTP を消して再ログインを促す
        clear_otp(&state.db, &user.user_id, now_ms).await?;
        return Err(ApiError::BadRequest(
            "OTP expired. Please login again.".to_string(),
        ));
    }

    if otp != req.otp {
        return Err(ApiError::BadRequest("Invalid OTP".to_string()));
    }

    // OTP は一度きり
    clear_otp(&state.db, &user.user_id, now_ms).await?;

    let token = auth::encode_token(
        &user.user_id,
        &user.email,
        &user.role,
        &state.config.token_secret,
    )?;

    info!("Login verified for {}", user.email);

    Ok(Json(VerifyLoginResponse {
        token,
        email: user.email,
        role: user.role,
    }))
}

/// GET /users/me - プロフィール取得
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let record: Option<User> = sqlx::query_as("SELECT * FROM users WHERE user_id = ?")
        .bind(&user.id)
        .fetch_optional(&state.db)
        .await?;
    let record = record.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let favorites: Vec<String> = sqlx::query_scalar(
        "SELECT artist_id FROM favorites WHERE user_id = ? ORDER BY created_at_ms ASC",
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(UserResponse {
        id: record.user_id,
        email: record.email,
        role: record.role,
        favorites,
        created_at_ms: record.created_at_ms,
        updated_at_ms: record.updated_at_ms,
    }))
}

// ========================================
// Helper Functions
// ========================================

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

async fn fetch_user_by_email(db: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await
}

async fn clear_otp(db: &DbPool, user_id: &str, now_ms: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET otp = NULL, otp_expires_at_ms = NULL, updated_at_ms = ? WHERE user_id = ?",
    )
    .bind(now_ms)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(())
}
