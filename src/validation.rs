//! Validation Layer
//! Artist / 認証ペイロードのフィールド単位バリデーション
//!
//! 各関数は JSON ペイロードを一巡して全フィールドのエラーを
//! 蓄積して返す（空 Vec = 有効）。必須フィールドの欠落はその
//! フィールドの後続ルールを打ち切る。

use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::PopularityLevel;

/// フィールド単位のエラー
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ========================================
// Artist Rulesets
// ========================================

/// Artist 作成ペイロード: name/genres/country 必須
pub fn validate_artist_create(payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_required_string(payload, "name", "Name is required", &mut errors);
    check_genres(payload, true, &mut errors);
    check_required_string(payload, "country", "Country is required", &mut errors);
    check_artist_common(payload, &mut errors);

    errors
}

/// Artist 更新ペイロード: 全フィールド任意（指定時は型/範囲を満たすこと）
pub fn validate_artist_update(payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_optional_non_empty_string(payload, "name", "Name must be a non-empty string", &mut errors);
    check_genres(payload, false, &mut errors);
    check_optional_non_empty_string(
        payload,
        "country",
        "Country must be a non-empty string",
        &mut errors,
    );
    check_artist_common(payload, &mut errors);

    errors
}

/// create/update 共通ルール（数値範囲・ティアラベル・表示メタデータ）
fn check_artist_common(payload: &Value, errors: &mut Vec<FieldError>) {
    check_int_range(
        payload,
        "popularity_score",
        0,
        100,
        "Popularity score must be between 0 and 100",
        errors,
    );

    if let Some(value) = present(payload, "popularity_level") {
        let valid = value
            .as_str()
            .and_then(PopularityLevel::parse)
            .is_some();
        if !valid {
            errors.push(FieldError::new("popularity_level", "Invalid popularity level"));
        }
    }

    let current_year = Utc::now().year() as i64;
    check_int_range(
        payload,
        "debut_year",
        1900,
        current_year,
        format!("Debut year must be between 1900 and {}", current_year),
        errors,
    );

    for field in [
        "years_active",
        "label",
        "imageUrl",
        "sampleSongTitle",
        "audioPreviewUrl",
        "description",
    ] {
        check_optional_string(payload, field, errors);
    }
}

// ========================================
// Credential Rulesets
// ========================================

/// 登録ペイロード: email + password 必須、role は任意
pub fn validate_register(payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_required_string(payload, "email", "Email is required", &mut errors);
    check_required_string(payload, "password", "Password is required", &mut errors);

    if let Some(value) = present(payload, "role") {
        let valid = matches!(value.as_str(), Some("admin") | Some("user"));
        if !valid {
            errors.push(FieldError::new("role", "Invalid role"));
        }
    }

    errors
}

/// ログインペイロード: email + password 必須
pub fn validate_login(payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_required_string(payload, "email", "Email is required", &mut errors);
    check_required_string(payload, "password", "Password is required", &mut errors);

    errors
}

/// OTP検証ペイロード: email + otp 必須
pub fn validate_verify_login(payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_required_string(payload, "email", "Email is required", &mut errors);
    check_required_string(payload, "otp", "OTP is required", &mut errors);

    errors
}

// ========================================
// Rule Helpers
// ========================================

/// null はフィールド未指定と同じ扱い
fn present<'a>(payload: &'a Value, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|v| !v.is_null())
}

/// 必須: 非空文字列。欠落・空・型違いは同一メッセージ1件のみ
fn check_required_string(
    payload: &Value,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) {
    let ok = present(payload, field)
        .and_then(Value::as_str)
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    if !ok {
        errors.push(FieldError::new(field, message));
    }
}

/// 任意: 指定時は非空文字列であること
fn check_optional_non_empty_string(
    payload: &Value,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) {
    if let Some(value) = present(payload, field) {
        let ok = value.as_str().map(|s| !s.trim().is_empty()).unwrap_or(false);
        if !ok {
            errors.push(FieldError::new(field, message));
        }
    }
}

/// 任意: 指定時は文字列であること
fn check_optional_string(payload: &Value, field: &str, errors: &mut Vec<FieldError>) {
    if let Some(value) = present(payload, field) {
        if !value.is_string() {
            errors.push(FieldError::new(field, format!("{} must be a string", field)));
        }
    }
}

/// genres: 非空の文字列配列。required=false なら未指定は許容
fn check_genres(payload: &Value, required: bool, errors: &mut Vec<FieldError>) {
    const MESSAGE: &str = "Genres must be a non-empty array";

    let value = match present(payload, "genres") {
        Some(v) => v,
        None => {
            if required {
                errors.push(FieldError::new("genres", MESSAGE));
            }
            return;
        }
    };

    let ok = value.as_array().map_or(false, |arr| {
        !arr.is_empty()
            && arr
                .iter()
                .all(|g| g.as_str().map(|s| !s.trim().is_empty()).unwrap_or(false))
    });
    if !ok {
        errors.push(FieldError::new("genres", MESSAGE));
    }
}

/// 任意の整数範囲ルール。非数値も範囲外も同一メッセージ1件
fn check_int_range(
    payload: &Value,
    field: &str,
    min: i64,
    max: i64,
    message: impl Into<String>,
    errors: &mut Vec<FieldError>,
) {
    if let Some(value) = present(payload, field) {
        let ok = value.as_i64().map(|n| n >= min && n <= max).unwrap_or(false);
        if !ok {
            errors.push(FieldError::new(field, message));
        }
    }
}

// ========================================
// Tests
// ========================================
