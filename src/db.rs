//! Database Module
//! SQLite を使用した artists/users/favorites の管理

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::info;

/// データベース接続プール
pub type DbPool = Pool<Sqlite>;

/// データベースを初期化
pub async fn init_db(db_path: &str) -> Result<DbPool> {
    // SQLite接続文字列
    let db_url = format!("sqlite:{}?mode=rwc", db_path);

    info!("Initializing database: {}", db_path);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // スキーマ作成
    create_schema(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

/// スキーマ作成
pub async fn create_schema(pool: &DbPool) -> Result<()> {
    // artists テーブル（genres は JSON 配列テキスト）
    sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS artists (
            artist_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT '[]',
            country TEXT NOT NULL DEFAULT '',
            popularity_score INTEGER,
            popularity_level TEXT NOT NULL DEFAULT 'Emerging',
            debut_year INTEGER,
            years_active TEXT,
            label TEXT,
            image_url TEXT,
            sample_song_title TEXT,
            audio_preview_url TEXT,
            description TEXT,
            created_at_ms INTEGER NOT NULL,
            updated_at_ms INTEGER NOT NULL
        )
    "#)
    .execute(pool)
    .await?;

    // users テーブル（otp と otp_expires_at_ms は常に両方NULLか両方セット）
    sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            otp TEXT,
            otp_expires_at_ms INTEGER,
            created_at_ms INTEGER NOT NULL,
            updated_at_ms INTEGER NOT NULL
        )
    "#)
    .execute(pool)
    .await?;

    // favorites テーブル（user ↔ artist 紐付け）
    // artist 側に FK は張らない: アーティスト削除後の残存行は
    // 一覧取得時の JOIN で自然に落ちる
    sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS favorites (
            user_id TEXT NOT NULL,
            artist_id TEXT NOT NULL,
            created_at_ms INTEGER NOT NULL,
            PRIMARY KEY (user_id, artist_id),
            FOREIGN KEY (user_id) REFERENCES users(user_id)
        )
    "#)
    .execute(pool)
    .await?;

    // インデックス作成
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_name ON artists(name)")
        .execute(pool).await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_country ON artists(country)")
        .execute(pool).await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_popularity ON artists(popularity_score)")
        .execute(pool).await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_favorites_artist ON favorites(artist_id)")
        .execute(pool).await?;

    Ok(())
}
