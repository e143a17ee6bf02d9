use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UrlynkError};
use crate::wire::api::DEFAULT_BASE_URL;

/// 默认配置文件名
pub const DEFAULT_CONFIG_PATH: &str = "urlynk.toml";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "URLYNK";

/// CLI 客户端配置
///
/// - api: API key、服务地址、超时、平台名
/// - device: User-Agent 与点击匹配上报的设备信息
/// - logging: 日志配置
/// - preferences: 点击搜索计数的存储位置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

impl ClientConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > urlynk.toml > 默认值
    /// ENV 前缀：URLYNK，分隔符：__
    /// 示例：URLYNK__API__API_KEY=xxxx
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let required = path.is_some();
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // 1. 从 TOML 文件加载；显式指定时必须存在
            .add_source(File::with_name(path).required(required))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        if Path::new(path).exists() {
            tracing::debug!("Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| UrlynkError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// API 访问配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_platform")]
    pub platform: String,
}

/// 设备信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default = "default_version_code")]
    pub version_code: i64,
    #[serde(default)]
    pub installed_from_store: bool,
    #[serde(default = "default_os_version")]
    pub os_version: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

/// 偏好存储配置；未设置路径时仅保存在内存中
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreferencesConfig {
    #[serde(default)]
    pub path: Option<String>,
}

// ============================================================
// Default value functions
// ============================================================

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_platform() -> String {
    std::env::consts::OS.to_string()
}

fn default_app_id() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_version_code() -> i64 {
    1
}

fn default_os_version() -> String {
    std::env::consts::OS.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            platform: default_platform(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            device_id: String::new(),
            version_code: default_version_code(),
            installed_from_store: false,
            os_version: default_os_version(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}
