//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Map TOML onto the [`AppConfig`] DTO / 将 TOML 映射为 AppConfig DTO
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//!
//! Missing values become empty facts. Choosing what an empty value means
//! happens in [`resolve_storage_dir`] and in wiring.

use std::path::PathBuf;

use anyhow::Context;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the persisted wizard blob (may be empty)
    pub storage_dir: PathBuf,

    /// Storage key (may be empty)
    pub storage_key: String,

    /// Queue writes for a background task instead of writing inline
    /// (`None` when not configured)
    pub background_flush: Option<bool>,

    /// `EnvFilter` directives used when `RUST_LOG` is not set (may be empty)
    pub log_filter: String,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let storage = toml_value.get("storage");
        let logging = toml_value.get("logging");

        Ok(Self {
            storage_dir: PathBuf::from(
                storage
                    .and_then(|s| s.get("dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            storage_key: storage
                .and_then(|s| s.get("key"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            background_flush: storage
                .and_then(|s| s.get("background_flush"))
                .and_then(|v| v.as_bool()),
            log_filter: logging
                .and_then(|l| l.get("filter"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Directory the wizard blob is stored in.
///
/// An empty configured dir falls back to `<local data dir>/diverlah`.
pub fn resolve_storage_dir(config: &AppConfig) -> anyhow::Result<PathBuf> {
    if !config.storage_dir.as_os_str().is_empty() {
        return Ok(config.storage_dir.clone());
    }

    let base = dirs::data_local_dir().context("No local data directory on this platform")?;
    Ok(base.join("diverlah"))
}
