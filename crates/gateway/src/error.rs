//! # Gateway エラー型
//!
//! HTTPレスポンスに変換されるエラー型。全エンドポイントで共通。

use axum::http::StatusCode;
use axum::Json;
use sentinel_types::{ErrorCode, ErrorResponse};

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// ボディがJSONオブジェクトとしてパースできない
    #[error("Invalid JSON body")]
    InvalidJson(String),
    /// `hashes` フィールドが存在しない、または文字列配列でない
    #[error("Request must contain a 'hashes' array of strings")]
    InvalidRequest(String),
    /// `hashes` が空配列
    #[error("Hashes array cannot be empty")]
    EmptyHashes,
    /// 64文字の16進数でない要素が含まれる
    #[error("One or more hashes are not valid SHA-256 hex strings")]
    InvalidHashFormat(String),
    /// 存在しないルート
    #[error("Not found")]
    NotFound,
    /// 内部エラー（詳細はログにのみ出力する）
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// エラーコード。
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidJson(_) => ErrorCode::InvalidJson,
            ApiError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            ApiError::EmptyHashes => ErrorCode::EmptyHashes,
            ApiError::InvalidHashFormat(_) => ErrorCode::InvalidHashFormat,
            ApiError::NotFound => ErrorCode::NotFound,
            ApiError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// HTTPステータスコード。
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_)
            | ApiError::InvalidRequest(_)
            | ApiError::EmptyHashes
            | ApiError::InvalidHashFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// クライアントに返す補足情報。内部エラーの詳細は返さない。
    fn details(&self) -> Option<String> {
        match self {
            ApiError::InvalidJson(d)
            | ApiError::InvalidRequest(d)
            | ApiError::InvalidHashFormat(d) => Some(d.clone()),
            ApiError::EmptyHashes | ApiError::NotFound | ApiError::Internal(_) => None,
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "内部エラー");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}
