//! # POST /api/v1/scan
//!
//! ハッシュのバッチ照会。
//!
//! ## 処理フロー
//! 1. ボディを検証（失敗時は400で即座に返す）
//! 2. 全ハッシュをレジストリに並行照会
//! 3. 集計してScanResponseを返す

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use sentinel_types::ScanResponse;

use crate::config::AppState;
use crate::error::ApiError;
use crate::scan::scan_hashes;
use crate::validation::validate_scan_body;

/// POST /api/v1/scan — ハッシュのバッチ照会。
///
/// ボディは生のバイト列として受け取り、JSONのパースも含めて検証する。
/// 処理期限を超えた場合は部分的な結果を返さず500とする。
pub async fn handle_scan(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ScanResponse>, ApiError> {
    let hashes = validate_scan_body(&body)?;

    let response = tokio::time::timeout(
        state.scan_timeout,
        scan_hashes(state.registry.as_ref(), &hashes, state.registry_concurrency),
    )
    .await
    .map_err(|_| {
        ApiError::Internal(format!(
            "スキャンが処理期限を超えました: {}件, {:?}",
            hashes.len(),
            state.scan_timeout
        ))
    })?;

    tracing::info!(
        scanned = response.scanned,
        verified = response.verified,
        unknown = response.unknown,
        revoked = response.revoked,
        "スキャン完了"
    );

    Ok(Json(response))
}
