//! # バッチ照会と集計
//!
//! 検証済みハッシュごとにレジストリを照会し、結果を分類して
//! ScanResponseを組み立てる。
//!
//! ## 分類
//! | レジストリ | status | plugin |
//! |---|---|---|
//! | 未登録 | unknown | null |
//! | verified | verified | あり |
//! | revoked | revoked | あり |
//! | pending | unknown | null |
//! | 照会失敗 | unknown | null |

use futures::stream::{self, StreamExt};
use sentinel_types::{EntryStatus, PluginEntry, ScanResponse, ScanResult, ScanStatus};

use crate::registry::{storage_key, PluginRegistry};
use crate::validation::ContentHash;

/// 現在時刻をISO-8601（ミリ秒、UTC）で返す。
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// 全ハッシュを並行に照会し、入力順の結果と集計を返す。
///
/// 同時に実行する照会は最大 `concurrency` 件。
/// 個々の照会失敗はバッチ全体を中断せず、そのハッシュをunknownとして扱う。
pub async fn scan_hashes(
    registry: &dyn PluginRegistry,
    hashes: &[ContentHash],
    concurrency: usize,
) -> ScanResponse {
    let lookups: Vec<_> = hashes.iter().map(|hash| lookup(registry, hash)).collect();
    let results: Vec<ScanResult> = stream::iter(lookups)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut response = ScanResponse {
        scanned: results.len(),
        verified: 0,
        unknown: 0,
        revoked: 0,
        timestamp: String::new(),
        results: Vec::new(),
    };
    for result in &results {
        match result.status {
            ScanStatus::Verified => response.verified += 1,
            ScanStatus::Unknown => response.unknown += 1,
            ScanStatus::Revoked => response.revoked += 1,
        }
    }
    response.results = results;
    response.timestamp = now_iso8601();
    response
}

/// 1件のハッシュを照会して分類する。
async fn lookup(registry: &dyn PluginRegistry, hash: &ContentHash) -> ScanResult {
    let key = storage_key(hash.normalized());
    let entry = match registry.get(&key).await {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(
                key = %key,
                backend = registry.backend_name(),
                error = %e,
                "レジストリ照会に失敗。unknownとして扱います"
            );
            None
        }
    };
    classify(hash, entry.as_ref())
}

/// レジストリのエントリからレスポンス上のステータスを決定する。
pub fn classify(hash: &ContentHash, entry: Option<&PluginEntry>) -> ScanResult {
    let (status, plugin) = match entry {
        Some(e) if e.status == EntryStatus::Verified => (ScanStatus::Verified, Some(e.to_info())),
        Some(e) if e.status == EntryStatus::Revoked => (ScanStatus::Revoked, Some(e.to_info())),
        // pendingは信頼されていないため公開しない
        Some(_) | None => (ScanStatus::Unknown, None),
    };
    ScanResult {
        hash: hash.original().to_string(),
        status,
        plugin,
    }
}
