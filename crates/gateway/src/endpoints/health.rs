//! # GET /health
//!
//! ヘルスチェックエンドポイント。レジストリには問い合わせない。

use axum::Json;
use sentinel_types::HealthResponse;

use crate::config::VERSION;
use crate::scan::now_iso8601;

/// GET /health — ヘルスチェック。
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: now_iso8601(),
        version: VERSION.to_string(),
    })
}
