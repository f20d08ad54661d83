//! End-to-end API tests
//! インメモリ SQLite + tower::oneshot でルーターを直接叩く

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use artist_catalog_api::{build_router, db, AppConfig, AppState};

// ========================================
// Test Helpers
// ========================================

/// 共有インメモリDB: 接続を1本に絞って全リクエストが同じDBを見る
async fn test_app() -> (Router, sqlx::SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::create_schema(&pool).await.expect("schema");

    let state = Arc::new(AppState {
        db: pool.clone(),
        config: AppConfig::default(),
    });
    (build_router(state), pool)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// 登録 → ログイン → OTP検証 まで通して Bearer トークンを得る
async fn register_and_token(
    app: &Router,
    pool: &sqlx::SqlitePool,
    email: &str,
    role: &str,
) -> String {
    let (status, _) = request(
        app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": email, "password": "pw123456", "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": email, "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // メール送信はシミュレートなので OTP はストアから読む
    let otp: String = sqlx::query_scalar("SELECT otp FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();

    let (status, body) = request(
        app,
        "POST",
        "/users/verify-login",
        None,
        Some(json!({ "email": email, "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_artist(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = request(app, "POST", "/artists", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

// ========================================
// Artists CRUD + Query Engine
// ========================================

#[tokio::test]
async fn test_full_artist_lifecycle() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    let created = create_artist(
        &app,
        &token,
        json!({
            "name": "Test Act",
            "genres": ["Pop"],
            "country": "USA",
            "popularity_score": 90
        }),
    )
    .await;

    // スコア90はトップの一段下のティア
    assert_eq!(created["popularity_level"], "Star");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = request(&app, "GET", &format!("/artists/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Test Act");
    assert_eq!(fetched["genres"], json!(["Pop"]));

    let (status, listed) = request(
        &app,
        "GET",
        "/artists?genre=Pop&minPopularity=80",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = listed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&id.as_str()));

    let (status, _) = request(&app, "DELETE", &format!("/artists/{}", id), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", &format!("/artists/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&app, "DELETE", &format!("/artists/{}", id), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_and_total_independent_of_paging() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    create_artist(
        &app,
        &token,
        json!({ "name": "Alpha", "genres": ["Pop"], "country": "Canada", "popularity_score": 90 }),
    )
    .await;
    create_artist(
        &app,
        &token,
        json!({ "name": "Beta", "genres": ["pop", "Rock"], "country": "USA", "popularity_score": 70 }),
    )
    .await;
    create_artist(
        &app,
        &token,
        json!({ "name": "Gamma", "genres": ["Jazz"], "country": "France",
                "description": "Synthwave pioneer turned jazz trio" }),
    )
    .await;

    // genre は大文字小文字を無視した完全一致
    let (_, body) = request(&app, "GET", "/artists?genre=POP", None, None).await;
    assert_eq!(body["total"], 2);

    // total は limit に依存しない
    let (_, body) = request(&app, "GET", "/artists?genre=POP&limit=1", None, None).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalPages"], 2);

    // country は部分一致
    let (_, body) = request(&app, "GET", "/artists?country=ana", None, None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Alpha");

    // minPopularity はしきい値以上（スコア未設定は落ちる）
    let (_, body) = request(&app, "GET", "/artists?minPopularity=80", None, None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Alpha");

    // q は name または description の部分一致
    let (_, body) = request(&app, "GET", "/artists?q=pioneer", None, None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Gamma");

    // フィルタは AND 結合
    let (_, body) = request(&app, "GET", "/artists?genre=Pop&country=USA", None, None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Beta");
}

#[tokio::test]
async fn test_page_beyond_range_returns_empty_not_error() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    for name in ["One", "Two", "Three"] {
        create_artist(
            &app,
            &token,
            json!({ "name": name, "genres": ["Pop"], "country": "USA" }),
        )
        .await;
    }

    let (status, body) = request(&app, "GET", "/artists?page=5&limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 5);
}

#[tokio::test]
async fn test_page_and_limit_fall_back_to_defaults() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    create_artist(
        &app,
        &token,
        json!({ "name": "Solo", "genres": ["Pop"], "country": "USA" }),
    )
    .await;

    // 非数値・limit=0 はデフォルト (page=1, limit=10) へ
    let (status, body) = request(&app, "GET", "/artists?page=abc&limit=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn test_sort_order_and_stability() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    create_artist(
        &app,
        &token,
        json!({ "name": "Same Name", "genres": ["Pop"], "country": "USA", "popularity_score": 40 }),
    )
    .await;
    create_artist(
        &app,
        &token,
        json!({ "name": "Same Name", "genres": ["Pop"], "country": "USA", "popularity_score": 80 }),
    )
    .await;
    create_artist(
        &app,
        &token,
        json!({ "name": "Another", "genres": ["Pop"], "country": "USA", "popularity_score": 60 }),
    )
    .await;

    // スコア降順
    let (_, body) = request(
        &app,
        "GET",
        "/artists?sortBy=popularity_score&order=desc",
        None,
        None,
    )
    .await;
    let scores: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["popularity_score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![80, 60, 40]);

    // 同値キーは artist_id の昇順で安定: 同じデータへの連続呼び出しで順序不変
    let (_, first) = request(&app, "GET", "/artists?sortBy=name", None, None).await;
    let (_, second) = request(&app, "GET", "/artists?sortBy=name", None, None).await;
    assert_eq!(first["items"], second["items"]);
    assert_eq!(first["items"][0]["name"], "Another");
}

#[tokio::test]
async fn test_update_merges_partially_and_reclassifies() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    let created = create_artist(
        &app,
        &token,
        json!({ "name": "Test Act", "genres": ["Pop"], "country": "USA", "popularity_score": 50 }),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["popularity_level"], "Emerging");

    // スコアだけ更新 → ティアは再計算、他フィールドは維持
    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/artists/{}", id),
        Some(token.as_str()),
        Some(json!({ "popularity_score": 96 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["popularity_level"], "Legendary");
    assert_eq!(updated["name"], "Test Act");
    assert_eq!(updated["country"], "USA");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    // ティアを明示すれば再計算しない
    let (_, updated) = request(
        &app,
        "PUT",
        &format!("/artists/{}", id),
        Some(token.as_str()),
        Some(json!({ "popularity_score": 10, "popularity_level": "Star" })),
    )
    .await;
    assert_eq!(updated["popularity_level"], "Star");

    let (status, _) = request(
        &app,
        "PUT",
        "/artists/ARTIST_MISSING1",
        Some(token.as_str()),
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_accumulates_field_errors() {
    let (app, pool) = test_app().await;
    let token = register_and_token(&app, &pool, "admin@example.com", "admin").await;

    let (status, body) = request(&app, "POST", "/artists", Some(token.as_str()), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "genres", "country"]);

    let (status, body) = request(
        &app,
        "POST",
        "/artists",
        Some(token.as_str()),
        Some(json!({
            "name": "X", "genres": ["Pop"], "country": "USA",
            "popularity_score": 150,
            "debut_year": 1850
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["message"], "Popularity score must be between 0 and 100");
}

// ========================================
// Auth & Roles
// ========================================

#[tokio::test]
async fn test_admin_routes_require_token_and_role() {
    let (app, pool) = test_app().await;

    let payload = json!({ "name": "A", "genres": ["Pop"], "country": "USA" });

    // トークンなし → 401
    let (status, body) = request(&app, "POST", "/artists", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization header missing");

    // 出鱈目なトークン → 401
    let (status, _) = request(&app, "POST", "/artists", Some("garbage"), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // user ロール → 403
    let user_token = register_and_token(&app, &pool, "user@example.com", "user").await;
    let (status, body) = request(&app, "POST", "/artists", Some(user_token.as_str()), Some(payload)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: insufficient role");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_case_insensitive() {
    let (app, _pool) = test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": "Dup@Example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": "dup@example.com ", "password": "pw2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _pool) = test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": "a@b.com", "password": "right" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "a@b.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, _) = request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "nobody@b.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ========================================
// OTP Flow
// ========================================

#[tokio::test]
async fn test_otp_verifies_exactly_once() {
    let (app, pool) = test_app().await;

    request(
        &app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": "otp@b.com", "password": "pw" })),
    )
    .await;
    request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "otp@b.com", "password": "pw" })),
    )
    .await;

    let otp: String = sqlx::query_scalar("SELECT otp FROM users WHERE email = ?")
        .bind("otp@b.com")
        .fetch_one(&pool)
        .await
        .unwrap();

    // 正しいコードは一度だけ成功する
    let (status, body) = request(
        &app,
        "POST",
        "/users/verify-login",
        None,
        Some(json!({ "email": "otp@b.com", "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    // クリア済みのコードで再検証 → OTP not found
    let (status, body) = request(
        &app,
        "POST",
        "/users/verify-login",
        None,
        Some(json!({ "email": "otp@b.com", "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "OTP not found. Please login again.");
}

#[tokio::test]
async fn test_wrong_otp_rejected_but_not_consumed() {
    let (app, pool) = test_app().await;

    request(
        &app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": "otp@b.com", "password": "pw" })),
    )
    .await;
    request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "otp@b.com", "password": "pw" })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/users/verify-login",
        None,
        Some(json!({ "email": "otp@b.com", "otp": "000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid OTP");

    // 失敗してもコードは残っているので正しいコードで成功できる
    let otp: String = sqlx::query_scalar("SELECT otp FROM users WHERE email = ?")
        .bind("otp@b.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (status, _) = request(
        &app,
        "POST",
        "/users/verify-login",
        None,
        Some(json!({ "email": "otp@b.com", "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_otp_cleared_and_reported() {
    let (app, pool) = test_app().await;

    request(
        &app,
        "POST",
        "/users/register",
        None,
        Some(json!({ "email": "late@b.com", "password": "pw" })),
    )
    .await;
    request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "late@b.com", "password": "pw" })),
    )
    .await;

    let otp: String = sqlx::query_scalar("SELECT otp FROM users WHERE email = ?")
        .bind("late@b.com")
        .fetch_one(&pool)
        .await
        .unwrap();

    // 期限を過去に倒す
    sqlx::query("UPDATE users SET otp_expires_at_ms = 1 WHERE email = ?")
        .bind("late@b.com")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = request(
        &app,
        "POST",
        "/users/verify-login",
        None,
        Some(json!({ "email": "late@b.com", "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "OTP expired. Please login again.");

    // 期限切れ検出で OTP 両フィールドがクリアされている
    let stored: (Option<String>, Option<i64>) =
        sqlx::query_as("SELECT otp, otp_expires_at_ms FROM users WHERE email = ?")
            .bind("late@b.com")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, (None, None));
}

// ========================================
// Favorites Ledger
// ========================================

#[tokio::test]
async fn test_favorites_add_remove_idempotent() {
    let (app, pool) = test_app().await;
    let admin = register_and_token(&app, &pool, "admin@example.com", "admin").await;
    let user = register_and_token(&app, &pool, "fan@example.com", "user").await;

    let artist = create_artist(
        &app,
        &admin,
        json!({ "name": "Fave", "genres": ["Pop"], "country": "USA" }),
    )
    .await;
    let id = artist["id"].as_str().unwrap();

    // 二重追加してもサイズは1
    for _ in 0..2 {
        let (status, _) = request(
            &app,
            "POST",
            &format!("/users/favorites/{}", id),
            Some(user.as_str()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = request(&app, "GET", "/users/favorites", Some(user.as_str()), None).await;
    assert_eq!(body["total"], 1);

    // 未登録の削除も成功扱い
    let (status, _) = request(
        &app,
        "DELETE",
        "/users/favorites/ARTIST_UNKNOWN1",
        Some(user.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/users/favorites/{}", id),
        Some(user.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(&app, "GET", "/users/favorites", Some(user.as_str()), None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_favorites_drop_deleted_artists_silently() {
    let (app, pool) = test_app().await;
    let admin = register_and_token(&app, &pool, "admin@example.com", "admin").await;
    let user = register_and_token(&app, &pool, "fan@example.com", "user").await;

    let keep = create_artist(
        &app,
        &admin,
        json!({ "name": "Keeper", "genres": ["Pop"], "country": "USA" }),
    )
    .await;
    let doomed = create_artist(
        &app,
        &admin,
        json!({ "name": "Doomed", "genres": ["Pop"], "country": "USA" }),
    )
    .await;

    for artist in [&keep, &doomed] {
        let id = artist["id"].as_str().unwrap();
        request(&app, "POST", &format!("/users/favorites/{}", id), Some(user.as_str()), None).await;
    }

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/artists/{}", doomed["id"].as_str().unwrap()),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 残存IDはエラーにせず黙って落とす
    let (status, body) = request(&app, "GET", "/users/favorites", Some(user.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Keeper");

    // me のお気に入りID一覧からも消えてはいない（台帳自体は残る）
    let (_, me) = request(&app, "GET", "/users/me", Some(user.as_str()), None).await;
    assert_eq!(me["favorites"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_favorites_concurrent_adds_converge() {
    let (app, pool) = test_app().await;
    let admin = register_and_token(&app, &pool, "admin@example.com", "admin").await;
    let user = register_and_token(&app, &pool, "fan@example.com", "user").await;

    let artist = create_artist(
        &app,
        &admin,
        json!({ "name": "Hot", "genres": ["Pop"], "country": "USA" }),
    )
    .await;
    let uri = format!("/users/favorites/{}", artist["id"].as_str().unwrap());

    let (a, b) = tokio::join!(
        request(&app, "POST", &uri, Some(user.as_str()), None),
        request(&app, "POST", &uri, Some(user.as_str()), None),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    let (_, body) = request(&app, "GET", "/users/favorites", Some(user.as_str()), None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_add_favorite_for_missing_artist_is_404() {
    let (app, pool) = test_app().await;
    let user = register_and_token(&app, &pool, "fan@example.com", "user").await;

    let (status, _) = request(
        &app,
        "POST",
        "/users/favorites/ARTIST_NOPE0001",
        Some(user.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========================================
// Misc
// ========================================

#[tokio::test]
async fn test_health_and_unknown_route() {
    let (app, _pool) = test_app().await;

    let (status, body) = request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = request(&app, "GET", "/no/such/route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found: GET /no/such/route");
}

#[tokio::test]
async fn test_me_requires_auth_and_hides_secrets() {
    let (app, pool) = test_app().await;

    let (status, _) = request(&app, "GET", "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = register_and_token(&app, &pool, "me@example.com", "user").await;
    let (status, body) = request(&app, "GET", "/users/me", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("otp").is_none());
}
