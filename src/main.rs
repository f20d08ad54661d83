//! Artist Catalog API Server

use std::sync::Arc;

use tracing::info;

use artist_catalog_api::{build_router, db, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ログ初期化
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    // ストアは起動時に一度だけ接続してハンドラへ注入する
    let db = db::init_db(&config.db_path).await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState {
        db: db.clone(),
        config,
    });
    let app = build_router(state);

    info!("🚀 Artist Catalog API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 明示的にプールを閉じる
    db.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
