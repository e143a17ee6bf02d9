use std::fmt;

use crate::validation::ValidationError;

#[derive(Debug, Clone)]
pub enum UrlynkError {
    Validation(String),
    Transport {
        message: String,
        status: Option<u16>,
    },
    NotConfigured(String),
    Serialization(String),
    FileOperation(String),
    Config(String),
    UnexpectedResponse(String),
}

/// 调用 SDK 方法前未执行 `configure` 时的统一提示
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Service not configured. Call configure() before using this method.";

impl UrlynkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            UrlynkError::Validation(_) => "E001",
            UrlynkError::Transport { .. } => "E002",
            UrlynkError::NotConfigured(_) => "E003",
            UrlynkError::Serialization(_) => "E004",
            UrlynkError::FileOperation(_) => "E005",
            UrlynkError::Config(_) => "E006",
            UrlynkError::UnexpectedResponse(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            UrlynkError::Validation(_) => "Validation Error",
            UrlynkError::Transport { .. } => "Transport Error",
            UrlynkError::NotConfigured(_) => "Service Not Configured",
            UrlynkError::Serialization(_) => "Serialization Error",
            UrlynkError::FileOperation(_) => "File Operation Error",
            UrlynkError::Config(_) => "Configuration Error",
            UrlynkError::UnexpectedResponse(_) => "Unexpected Response",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            UrlynkError::Validation(msg) => msg,
            UrlynkError::Transport { message, .. } => message,
            UrlynkError::NotConfigured(msg) => msg,
            UrlynkError::Serialization(msg) => msg,
            UrlynkError::FileOperation(msg) => msg,
            UrlynkError::Config(msg) => msg,
            UrlynkError::UnexpectedResponse(msg) => msg,
        }
    }

    /// HTTP 状态码（仅 Transport 错误可能携带）
    pub fn status(&self) -> Option<u16> {
        match self {
            UrlynkError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// 格式化为彩色输出（用于 CLI）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for UrlynkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for UrlynkError {}

// 便捷的构造函数
impl UrlynkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        UrlynkError::Validation(msg.into())
    }

    pub fn transport<T: Into<String>>(msg: T, status: Option<u16>) -> Self {
        UrlynkError::Transport {
            message: msg.into(),
            status,
        }
    }

    pub fn not_configured() -> Self {
        UrlynkError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        UrlynkError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        UrlynkError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        UrlynkError::Config(msg.into())
    }

    pub fn unexpected_response<T: Into<String>>(msg: T) -> Self {
        UrlynkError::UnexpectedResponse(msg.into())
    }
}

impl From<ValidationError> for UrlynkError {
    fn from(err: ValidationError) -> Self {
        UrlynkError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for UrlynkError {
    fn from(err: std::io::Error) -> Self {
        UrlynkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for UrlynkError {
    fn from(err: serde_json::Error) -> Self {
        UrlynkError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for UrlynkError {
    fn from(err: toml::de::Error) -> Self {
        UrlynkError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for UrlynkError {
    fn from(err: config::ConfigError) -> Self {
        UrlynkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UrlynkError>;
