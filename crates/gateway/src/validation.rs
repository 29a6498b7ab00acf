//! # スキャンリクエストの検証
//!
//! 生のリクエストボディを検証し、型付きのハッシュ一覧に変換する。
//!
//! ## 検証順序（最初の失敗で打ち切る）
//! 1. JSONオブジェクトとしてパースできるか → `INVALID_JSON`
//! 2. `hashes` が文字列配列か → `INVALID_REQUEST`
//! 3. 空配列でないか → `EMPTY_HASHES`
//! 4. 全要素が64文字の16進数か → `INVALID_HASH_FORMAT`

use sentinel_types::{ScanRequest, HASH_HEX_LEN};

use crate::error::ApiError;

/// 検証済みのSHA-256ハッシュ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    /// リクエストで受け取った文字列（レスポンスにそのまま返す）
    original: String,
    /// 小文字に正規化した16進数表記（レジストリのキーに使用）
    normalized: String,
}

impl ContentHash {
    /// 64文字の16進数文字列をパースする。大文字小文字は区別しない。
    pub fn parse(input: &str) -> Option<Self> {
        if input.len() != HASH_HEX_LEN {
            return None;
        }
        let bytes = hex::decode(input).ok()?;
        Some(Self {
            original: input.to_string(),
            normalized: hex::encode(bytes),
        })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// リクエストボディを検証し、入力順のハッシュ一覧を返す。
pub fn validate_scan_body(body: &[u8]) -> Result<Vec<ContentHash>, ApiError> {
    // Step 1. JSONオブジェクトとしてパース
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidJson(format!("failed to parse body: {e}")))?;
    if !value.is_object() {
        return Err(ApiError::InvalidJson("body must be a JSON object".to_string()));
    }

    // Step 2. hashes: string[]
    let request: ScanRequest = serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid scan request: {e}")))?;

    // Step 3. 空配列チェック
    if request.hashes.is_empty() {
        return Err(ApiError::EmptyHashes);
    }

    // Step 4. 形式チェック（1件でも不正ならバッチ全体を拒否）
    let mut hashes = Vec::with_capacity(request.hashes.len());
    let mut invalid = Vec::new();
    for (i, raw) in request.hashes.iter().enumerate() {
        match ContentHash::parse(raw) {
            Some(hash) => hashes.push(hash),
            None => invalid.push(i.to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(ApiError::InvalidHashFormat(format!(
            "invalid entries at indices: {}",
            invalid.join(", ")
        )));
    }

    Ok(hashes)
}
