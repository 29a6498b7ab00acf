//! # Skyrim Sentinel 共有型定義
//!
//! レジストリに格納されるプラグインエントリと、スキャンAPIの
//! リクエスト/レスポンスをRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - JSONフィールド名はcamelCase（`nexusId`）
//! - ハッシュはSHA-256の16進数表記（64文字）

use serde::{Deserialize, Serialize};

/// レジストリのキーに付与するハッシュ方式の識別子。
/// キー形式: `"sha256:<小文字16進数ハッシュ>"`
pub const HASH_SCHEME: &str = "sha256";

/// SHA-256ダイジェストの16進数表記の長さ。
pub const HASH_HEX_LEN: usize = 64;

// ---------------------------------------------------------------------------
// レジストリ格納型
// ---------------------------------------------------------------------------

/// レジストリ上のエントリのステータス。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// 正規のファイルとして確認済み
    Verified,
    /// レビュー中（まだ信頼されていない）
    Pending,
    /// 以前は信頼されていたが取り消された
    Revoked,
}

/// 外部KVストアに格納されているプラグインのメタデータ。
/// 外部システムが所有・更新し、本サービスは読み取りのみ行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginEntry {
    /// プラグイン名
    pub name: String,
    /// Nexus Mods上のMod ID
    pub nexus_id: u64,
    /// ファイル名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// 作者
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// レジストリ上のステータス
    pub status: EntryStatus,
}

impl PluginEntry {
    /// レスポンスに含める公開フィールドのみを取り出す。
    pub fn to_info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name.clone(),
            nexus_id: self.nexus_id,
            filename: self.filename.clone(),
            author: self.author.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/v1/scan
// ---------------------------------------------------------------------------

/// POST /api/v1/scan リクエストボディ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// 照会するSHA-256ハッシュの一覧（大文字小文字は区別しない）
    pub hashes: Vec<String>,
}

/// スキャン結果に含めるプラグイン情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub name: String,
    pub nexus_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// レスポンス上のハッシュのステータス。
/// `pending` は公開されず `unknown` として扱われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Verified,
    Unknown,
    Revoked,
}

/// ハッシュ1件ごとの照会結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// リクエストで受け取ったハッシュ（正規化前のまま）
    pub hash: String,
    /// 照会結果のステータス
    pub status: ScanStatus,
    /// verified/revokedの場合のみ設定される。それ以外はnull。
    pub plugin: Option<PluginInfo>,
}

/// POST /api/v1/scan レスポンスボディ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// 照会したハッシュの件数
    pub scanned: usize,
    /// verifiedの件数
    pub verified: usize,
    /// unknownの件数（未登録・pending・照会失敗を含む）
    pub unknown: usize,
    /// revokedの件数
    pub revoked: usize,
    /// レスポンス生成時刻（ISO-8601）
    pub timestamp: String,
    /// 入力と同じ順序の照会結果
    pub results: Vec<ScanResult>,
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// GET /health レスポンスボディ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 常に `"ok"`
    pub status: String,
    /// レスポンス生成時刻（ISO-8601）
    pub timestamp: String,
    /// サーバーのバージョン
    pub version: String,
}

// ---------------------------------------------------------------------------
// エラーレスポンス
// ---------------------------------------------------------------------------

/// 機械可読なエラーコード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// ボディがJSONオブジェクトとしてパースできない
    InvalidJson,
    /// `hashes` フィールドが存在しない、または文字列配列でない
    InvalidRequest,
    /// `hashes` が空配列
    EmptyHashes,
    /// 64文字の16進数でない要素が含まれる
    InvalidHashFormat,
    /// 存在しないルート
    NotFound,
    /// 内部エラー
    InternalError,
}

/// 標準エラーレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 人間が読めるエラーメッセージ
    pub error: String,
    /// 機械可読なエラーコード
    pub code: ErrorCode,
    /// 補足情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
