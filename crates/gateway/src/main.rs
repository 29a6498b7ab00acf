//! # Skyrim Sentinel Gateway
//!
//! プラグインファイルのSHA-256ハッシュを受け取り、レジストリ上の
//! ステータス（verified / revoked / unknown）を返す照会API。
//!
//! ## 役割
//! - リクエスト検証（不正な入力は照会前に400で拒否）
//! - ハッシュの正規化とレジストリ（外部KVストア）への並行照会
//! - 結果の分類と集計
//!
//! ## API エンドポイント
//! - `GET /` — 稼働確認
//! - `GET /health` — ヘルスチェック
//! - `POST /api/v1/scan` — ハッシュのバッチ照会

mod config;
mod endpoints;
mod error;
mod registry;
mod routes;
mod scan;
mod validation;

use std::sync::Arc;

use tokio::signal;

use crate::config::{AppState, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let registry = config.build_registry()?;
    tracing::info!(
        backend = registry.backend_name(),
        registry_timeout = ?config.registry_timeout,
        registry_concurrency = config.registry_concurrency,
        scan_timeout = ?config.scan_timeout,
        "レジストリを初期化しました"
    );

    let state = Arc::new(AppState {
        registry,
        registry_concurrency: config.registry_concurrency,
        scan_timeout: config.scan_timeout,
    });
    let app = routes::build_router(state, config.max_body_bytes);

    tracing::info!("Gatewayを {} で起動します (version {})", config.bind_addr, config::VERSION);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gatewayを停止しました");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+Cハンドラの登録に失敗");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERMハンドラの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+Cを受信。シャットダウンします"),
        _ = terminate => tracing::info!("SIGTERMを受信。シャットダウンします"),
    }
}
