//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use std::sync::Arc;
use std::time::Duration;

use crate::registry::{MemoryRegistry, PluginRegistry};

/// サーバーのバージョン（/health で返却）。
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cloudflare API のデフォルトベースURL。
pub const DEFAULT_CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare Workers KV の接続設定。
#[derive(Clone, PartialEq, Eq)]
pub struct CloudflareSettings {
    pub api_base: String,
    pub account_id: String,
    pub namespace_id: String,
    pub api_token: String,
}

impl std::fmt::Debug for CloudflareSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareSettings")
            .field("api_base", &self.api_base)
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// レジストリのバックエンド種別。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryBackend {
    /// Cloudflare Workers KV
    Cloudflare(CloudflareSettings),
    /// インメモリ（シードファイルから読み込み）
    Memory { seed_file: Option<String> },
}

/// 環境変数から読み込むGateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// listenアドレス
    pub bind_addr: String,
    /// レジストリのバックエンド
    pub backend: RegistryBackend,
    /// 照会1件あたりのHTTPタイムアウト
    pub registry_timeout: Duration,
    /// 1スキャン内で同時に実行する照会の上限
    pub registry_concurrency: usize,
    /// スキャン全体の処理期限
    pub scan_timeout: Duration,
    /// リクエストボディの上限サイズ（バイト）
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の変数参照関数から構築する。
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let default_backend = if cfg!(feature = "vendor-cloudflare") {
            "cloudflare"
        } else {
            "memory"
        };
        let backend = match var("REGISTRY_BACKEND").as_deref().unwrap_or(default_backend) {
            "cloudflare" => RegistryBackend::Cloudflare(CloudflareSettings {
                api_base: var("CF_API_BASE").unwrap_or_else(|| DEFAULT_CF_API_BASE.to_string()),
                account_id: required_var(&var, "CF_ACCOUNT_ID")?,
                namespace_id: required_var(&var, "CF_KV_NAMESPACE_ID")?,
                api_token: required_var(&var, "CF_API_TOKEN")?,
            }),
            "memory" => RegistryBackend::Memory {
                seed_file: var("REGISTRY_SEED_FILE"),
            },
            other => anyhow::bail!(
                "REGISTRY_BACKENDが不正です: {other}（cloudflare または memory）"
            ),
        };

        let registry_timeout =
            Duration::from_millis(parse_var(&var, "REGISTRY_TIMEOUT_MS", 2000)?);
        let registry_concurrency = parse_var(&var, "REGISTRY_CONCURRENCY", 32)? as usize;
        if registry_concurrency == 0 {
            anyhow::bail!("REGISTRY_CONCURRENCYは1以上である必要があります");
        }
        let scan_timeout = Duration::from_secs(parse_var(&var, "SCAN_TIMEOUT_SECS", 25)?);
        let max_body_bytes = parse_var(&var, "MAX_BODY_BYTES", 1024 * 1024)? as usize;

        Ok(Self {
            bind_addr,
            backend,
            registry_timeout,
            registry_concurrency,
            scan_timeout,
            max_body_bytes,
        })
    }

    /// 設定に従ってレジストリを構築する。
    pub fn build_registry(&self) -> anyhow::Result<Arc<dyn PluginRegistry>> {
        match &self.backend {
            #[cfg(feature = "vendor-cloudflare")]
            RegistryBackend::Cloudflare(cf) => {
                tracing::info!(
                    api_base = %cf.api_base,
                    namespace_id = %cf.namespace_id,
                    "Cloudflare KVレジストリを設定"
                );
                Ok(Arc::new(crate::registry::CloudflareKvRegistry::new(
                    &cf.api_base,
                    &cf.account_id,
                    &cf.namespace_id,
                    cf.api_token.clone(),
                    self.registry_timeout,
                )?))
            }
            #[cfg(not(feature = "vendor-cloudflare"))]
            RegistryBackend::Cloudflare(_) => {
                anyhow::bail!("vendor-cloudflare featureが無効なためCloudflare KVを使用できません")
            }
            RegistryBackend::Memory { seed_file: Some(path) } => {
                let registry = MemoryRegistry::from_json_file(path)?;
                tracing::info!(
                    entries = registry.len(),
                    seed_file = %path,
                    "シードファイルを読み込みました"
                );
                Ok(Arc::new(registry))
            }
            RegistryBackend::Memory { seed_file: None } => {
                tracing::warn!(
                    "REGISTRY_SEED_FILEが未設定です。空のレジストリで起動します（開発環境用）"
                );
                Ok(Arc::new(MemoryRegistry::new()))
            }
        }
    }
}

fn parse_var(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> anyhow::Result<u64> {
    match var(name) {
        Some(v) => v
            .parse()
            .map_err(|e| anyhow::anyhow!("{name}は0以上の整数である必要があります ({v}): {e}")),
        None => Ok(default),
    }
}

fn required_var(var: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<String> {
    var(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{name}が未設定です"))
}

/// Gatewayの共有状態。
pub struct AppState {
    /// プラグインレジストリ（外部KVストア、トレイトで抽象化）
    pub registry: Arc<dyn PluginRegistry>,
    /// 1スキャン内で同時に実行する照会の上限
    pub registry_concurrency: usize,
    /// スキャン全体の処理期限
    pub scan_timeout: Duration,
}
