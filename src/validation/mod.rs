//! 链接配置验证
//!
//! 验证是一条按固定顺序执行的检查流水线，遇到第一个失败即返回（first-error-wins）。
//! 纯函数：不做 I/O、不修改输入；`validate` 只读取一次系统时钟，
//! `validate_at` 由调用方传入时钟读数，便于测试边界。
//!
//! 检查顺序：
//! 1. url 为有效的 http(s) URL
//! 2. id（若有）去除空白后非空
//! 3. domain（若有）为合法域名
//! 4. webhook_url（若有）为有效的 http(s) URL
//! 5. password（若有）去除空白后非空
//! 6. start_time（若有）不早于当前时间
//! 7. expiry_rules（若有）非空、无重复类型、每条规则有效
//! 8. restrictions（若有）递归验证
//! 9. smart_routing（若有）递归验证

mod rules;

use std::fmt;

use crate::models::LinkConfig;
use crate::utils::now_millis;
use crate::utils::url_validator::{UrlValidationError, is_valid_domain, validate_url};

pub use rules::{
    validate_expiry_rule, validate_geo_location, validate_hour_range, validate_restrictions,
    validate_smart_routing,
};

/// 时间型过期规则距当前时间的最小间隔（24 小时，毫秒）
pub const MIN_EXPIRY_HORIZON_MS: i64 = 24 * 60 * 60 * 1000;

/// 小时区间的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourField {
    Start,
    End,
}

/// 外接矩形的边
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxEdge {
    SouthLat,
    NorthLat,
    WestLng,
    EastLng,
}

impl BoxEdge {
    pub fn name(self) -> &'static str {
        match self {
            BoxEdge::SouthLat => "southLat",
            BoxEdge::NorthLat => "northLat",
            BoxEdge::WestLng => "westLng",
            BoxEdge::EastLng => "eastLng",
        }
    }

    pub fn limit(self) -> f64 {
        match self {
            BoxEdge::SouthLat | BoxEdge::NorthLat => 90.0,
            BoxEdge::WestLng | BoxEdge::EastLng => 180.0,
        }
    }
}

/// 验证失败原因
///
/// `Display` 输出一条描述性信息；嵌套集合中的失败以 `Nested` 包装，
/// 输出形如 `"Start hr cannot be greater than end hr: restrictions workingHrs"`。
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidUrl(UrlValidationError),
    BlankId,
    InvalidDomain,
    InvalidWebhookUrl(UrlValidationError),
    BlankPassword,
    StartTimeInPast,
    /// 集合存在但为空，携带集合名
    EmptyCollection(&'static str),
    /// 集合内存在重复项，携带集合名
    DuplicateEntries(&'static str),
    NonPositiveClicks,
    ExpiryTooSoon,
    NonPositiveClicksPerDevice,
    HourOutOfRange(HourField),
    HourOrder,
    BlankAddress,
    CoordinateOutOfRange(BoxEdge),
    LatitudeOrder,
    LongitudeOrder,
    Nested {
        path: &'static str,
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub(crate) fn nested(path: &'static str, source: ValidationError) -> Self {
        ValidationError::Nested {
            path,
            source: Box::new(source),
        }
    }

    /// 去掉路径包装后的根本原因
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            ValidationError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 失败位置（顶层字段失败时为 `None`）
    pub fn path(&self) -> Option<&'static str> {
        match self {
            ValidationError::Nested { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(e) => write!(f, "Invalid URL ({})", e),
            Self::BlankId => write!(f, "ID cannot be empty"),
            Self::InvalidDomain => write!(f, "Invalid domain"),
            Self::InvalidWebhookUrl(e) => write!(f, "Invalid webhook URL ({})", e),
            Self::BlankPassword => write!(f, "Password cannot be empty"),
            Self::StartTimeInPast => write!(f, "Start time cannot be less than current time"),
            Self::EmptyCollection(name) => write!(f, "{} cannot be empty", name),
            Self::DuplicateEntries(name) => write!(f, "{} contain duplicates", name),
            Self::NonPositiveClicks => write!(f, "Expiry clicks must be greater than 0"),
            Self::ExpiryTooSoon => write!(
                f,
                "Expiry time must be more than 24 hours from current time"
            ),
            Self::NonPositiveClicksPerDevice => {
                write!(f, "Clicks per device must be greater than 0")
            }
            Self::HourOutOfRange(HourField::Start) => {
                write!(f, "Start hr must be between 0 and 23")
            }
            Self::HourOutOfRange(HourField::End) => write!(f, "End hr must be between 0 and 23"),
            Self::HourOrder => write!(f, "Start hr cannot be greater than end hr"),
            Self::BlankAddress => write!(f, "Address cannot be blank"),
            Self::CoordinateOutOfRange(edge) => write!(
                f,
                "{} must be between -{} and {}",
                edge.name(),
                edge.limit(),
                edge.limit()
            ),
            Self::LatitudeOrder => write!(f, "southLat cannot be greater than northLat"),
            Self::LongitudeOrder => write!(f, "westLng cannot be greater than eastLng"),
            Self::Nested { path, source } => write!(f, "{}: {}", source, path),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUrl(e) | Self::InvalidWebhookUrl(e) => Some(e),
            Self::Nested { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

type Check = fn(&LinkConfig, i64) -> Result<(), ValidationError>;

/// 顶层检查流水线，顺序即报告顺序
const LINK_CHECKS: [Check; 9] = [
    check_url,
    check_id,
    check_domain,
    check_webhook_url,
    check_password,
    check_start_time,
    check_expiry_rules,
    check_restrictions,
    check_smart_routing,
];

/// 使用当前系统时间验证链接配置
pub fn validate(config: &LinkConfig) -> Result<(), ValidationError> {
    validate_at(config, now_millis())
}

/// 使用给定的时钟读数（UTC 毫秒）验证链接配置
pub fn validate_at(config: &LinkConfig, now_ms: i64) -> Result<(), ValidationError> {
    LINK_CHECKS
        .iter()
        .try_for_each(|check| check(config, now_ms))
}

fn check_url(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    validate_url(&config.url).map_err(ValidationError::InvalidUrl)
}

fn check_id(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    match config.id.as_deref() {
        Some(id) if id.trim().is_empty() => Err(ValidationError::BlankId),
        _ => Ok(()),
    }
}

fn check_domain(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    match config.domain.as_deref() {
        Some(domain) if !is_valid_domain(domain) => Err(ValidationError::InvalidDomain),
        _ => Ok(()),
    }
}

fn check_webhook_url(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    match config.webhook_url.as_deref() {
        Some(webhook) => validate_url(webhook).map_err(ValidationError::InvalidWebhookUrl),
        None => Ok(()),
    }
}

fn check_password(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    match config.password.as_deref() {
        Some(password) if password.trim().is_empty() => Err(ValidationError::BlankPassword),
        _ => Ok(()),
    }
}

fn check_start_time(config: &LinkConfig, now_ms: i64) -> Result<(), ValidationError> {
    match config.start_time {
        Some(start) if start < now_ms => Err(ValidationError::StartTimeInPast),
        _ => Ok(()),
    }
}

fn check_expiry_rules(config: &LinkConfig, now_ms: i64) -> Result<(), ValidationError> {
    let Some(rules) = config.expiry_rules.as_deref() else {
        return Ok(());
    };
    rules::check_collection(rules, "Expiry", |rule| validate_expiry_rule(rule, now_ms))
}

fn check_restrictions(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    config
        .restrictions
        .as_ref()
        .map_or(Ok(()), validate_restrictions)
}

fn check_smart_routing(config: &LinkConfig, _now_ms: i64) -> Result<(), ValidationError> {
    config
        .smart_routing
        .as_ref()
        .map_or(Ok(()), validate_smart_routing)
}
