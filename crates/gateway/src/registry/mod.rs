//! # プラグインレジストリ
//!
//! 既知プラグインのエントリを保持する外部KVストアの抽象インターフェース。
//! 本サービスはキーによる単発の読み取りのみを行い、書き込みは行わない。
//!
//! ## 実装
//! - `MemoryRegistry`: インメモリのマップ（ローカル開発・テスト用）
//! - `CloudflareKvRegistry`: Cloudflare Workers KV REST API（本番用）

pub mod memory;
#[cfg(feature = "vendor-cloudflare")]
pub mod cloudflare;

pub use memory::MemoryRegistry;
#[cfg(feature = "vendor-cloudflare")]
pub use cloudflare::CloudflareKvRegistry;

use sentinel_types::PluginEntry;

/// レジストリ照会のエラー型。
/// 照会単位で発生し、呼び出し側でunknownに縮退させる。
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// ストアへの接続・通信に失敗
    #[error("レジストリへの通信に失敗: {0}")]
    Unavailable(String),
    /// ストアが想定外のステータスを返した
    #[error("レジストリがエラーを返しました: HTTP {status} - {body}")]
    Status { status: u16, body: String },
    /// 格納値がPluginEntryとしてデコードできない
    #[error("エントリのデコードに失敗 ({key}): {reason}")]
    Decode { key: String, reason: String },
}

/// プラグインレジストリの抽象インターフェース。
///
/// キーは `"sha256:<小文字16進数ハッシュ>"` 形式（[`storage_key`] で生成）。
/// エントリが存在しない場合は `Ok(None)` を返す。
#[async_trait::async_trait]
pub trait PluginRegistry: Send + Sync {
    /// キーに対応するエントリを取得する。
    async fn get(&self, key: &str) -> Result<Option<PluginEntry>, RegistryError>;

    /// ログ出力用のバックエンド名。
    fn backend_name(&self) -> &'static str;
}

/// 正規化済みハッシュからレジストリのキーを構築する。
pub fn storage_key(normalized_hash: &str) -> String {
    format!("{}:{normalized_hash}", sentinel_types::HASH_SCHEME)
}

/// 格納値（JSON）をPluginEntryにデコードする。
#[cfg_attr(not(feature = "vendor-cloudflare"), allow(dead_code))]
pub(crate) fn decode_entry(key: &str, raw: &[u8]) -> Result<PluginEntry, RegistryError> {
    serde_json::from_slice(raw).map_err(|e| RegistryError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
