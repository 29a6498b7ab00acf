//! # Cloudflare Workers KV レジストリ
//!
//! Cloudflare Workers KV REST API経由でエントリを取得するレジストリ実装。
//!
//! `GET {api_base}/accounts/{account_id}/storage/kv/namespaces/{namespace_id}/values/{key}`
//! - 200: ボディがエントリのJSON
//! - 404: キーが存在しない
//! - その他: エラー

use std::time::Duration;

use sentinel_types::PluginEntry;

use super::{decode_entry, PluginRegistry, RegistryError};

/// Cloudflare Workers KVによるレジストリ実装。
pub struct CloudflareKvRegistry {
    http_client: reqwest::Client,
    /// `.../namespaces/{namespace_id}/values` までのURL
    values_url: String,
    api_token: String,
}

impl CloudflareKvRegistry {
    /// 新しいCloudflareKvRegistryを作成する。
    ///
    /// # 引数
    /// - `api_base`: APIのベースURL（例: "https://api.cloudflare.com/client/v4"）
    /// - `timeout`: 照会1件あたりのHTTPタイムアウト
    pub fn new(
        api_base: &str,
        account_id: &str,
        namespace_id: &str,
        api_token: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("HTTPクライアントの構築に失敗: {e}"))?;

        let values_url = format!(
            "{}/accounts/{account_id}/storage/kv/namespaces/{namespace_id}/values",
            api_base.trim_end_matches('/')
        );

        Ok(Self {
            http_client,
            values_url,
            api_token,
        })
    }
}

#[async_trait::async_trait]
impl PluginRegistry for CloudflareKvRegistry {
    async fn get(&self, key: &str) -> Result<Option<PluginEntry>, RegistryError> {
        let url = format!("{}/{key}", self.values_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("HTTP送信失敗: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Unavailable(format!("レスポンス読み取り失敗: {e}")))?;

        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        decode_entry(key, &body).map(Some)
    }

    fn backend_name(&self) -> &'static str {
        "cloudflare-kv"
    }
}
