//! # GET /

use crate::error::ApiError;

/// 稼働確認メッセージ。
pub const ROOT_MESSAGE: &str = "Skyrim Sentinel API is running.";

/// GET / — 稼働確認。
pub async fn handle_root() -> &'static str {
    ROOT_MESSAGE
}

/// 未定義ルートのフォールバック。
pub async fn handle_not_found() -> ApiError {
    ApiError::NotFound
}
