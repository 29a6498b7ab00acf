//! # インメモリ レジストリ
//!
//! キーとエントリのマップを保持するレジストリ。
//! ローカル開発（シードファイル読み込み）とテストで使用する。

use std::collections::HashMap;
use std::path::Path;

use sentinel_types::PluginEntry;

use super::{PluginRegistry, RegistryError};

/// インメモリのプラグインレジストリ。
///
/// シードファイル形式: `{ "sha256:<hash>": <PluginEntry>, ... }`
/// （KVネームスペースのダンプと同じキー・値の組）
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistry {
    entries: HashMap<String, PluginEntry>,
}

impl MemoryRegistry {
    /// 空のレジストリを作成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを追加する。
    #[cfg(test)]
    pub fn with_entry(mut self, key: impl Into<String>, entry: PluginEntry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }

    /// JSON文字列からレジストリを構築する。
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let entries: HashMap<String, PluginEntry> = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("シードデータのパースに失敗: {e}"))?;
        Ok(Self { entries })
    }

    /// シードファイルからレジストリを構築する。
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("シードファイルの読み込みに失敗 ({}): {e}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl PluginRegistry for MemoryRegistry {
    async fn get(&self, key: &str) -> Result<Option<PluginEntry>, RegistryError> {
        Ok(self.entries.get(key).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
