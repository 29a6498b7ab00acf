//! # Gatewayエンドポイント
//!
//! - `GET /` — 稼働確認（プレーンテキスト）
//! - `GET /health` — ヘルスチェック
//! - `POST /api/v1/scan` — ハッシュのバッチ照会

pub mod health;
pub mod root;
pub mod scan;

pub use health::handle_health;
pub use root::{handle_not_found, handle_root};
pub use scan::handle_scan;
