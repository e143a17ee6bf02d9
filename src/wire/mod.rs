//! 线上格式编码
//!
//! 把已通过验证的 [`LinkConfig`] 转换为服务端协议的 JSON 结构：
//!
//! ```text
//! {"data": {"_id", "data", "domain", "password", "startTime", "utcOffset",
//!           "webhookURL", "expiry", "restrictions", "smartRouting"}}
//! ```
//!
//! 规则：
//! - 所有字符串字段去除首尾空白
//! - 枚举按冻结的线上编码输出（见 `models::enums`）
//! - 顶层可选字段缺省时输出 `null`；`restrictions` / `smartRouting` 内部缺省的子字段直接省略
//! - `utcOffset` 在编码时从本地时钟采样，单位为小时（可带小数）

pub mod api;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, UrlynkError};
use crate::models::{
    ExpiryRule, GeoLocation, HourRange, LinkConfig, Restrictions, RoutingRule, SmartRouting,
};

/// 请求/响应统一信封：负载位于 `data` 键下
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// 链接的线上表示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireLink {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub data: String,
    pub domain: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<i64>,
    #[serde(rename = "utcOffset")]
    pub utc_offset: f64,
    #[serde(rename = "webhookURL")]
    pub webhook_url: Option<String>,
    pub expiry: Option<Vec<WireExpiry>>,
    pub restrictions: Option<WireRestrictions>,
    #[serde(rename = "smartRouting")]
    pub smart_routing: Option<WireSmartRouting>,
}

impl WireLink {
    /// 转为 JSON 对象
    pub fn to_json_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(UrlynkError::serialization(format!(
                "wire link encoded as non-object: {}",
                other
            ))),
        }
    }

    /// 包装为请求信封
    pub fn into_envelope(self) -> ApiEnvelope<WireLink> {
        ApiEnvelope::new(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WireExpiry {
    pub value: i64,
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireRestrictions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks_per_device: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incl_loc: Option<Vec<WireLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excl_loc: Option<Vec<WireLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hrs: Option<Vec<WireHourRange>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireSmartRouting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_based: Option<Vec<WireRoutingRule<u8>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_based: Option<Vec<WireRoutingRule<u8>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_based: Option<Vec<WireRoutingRule<WireHourRange>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc_based: Option<Vec<WireRoutingRule<WireLocation>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireRoutingRule<T> {
    pub data: String,
    pub targets: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHourRange {
    pub start_hr: i32,
    pub end_hr: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLocation {
    pub address: String,
    pub bounding_box: [f64; 4],
}

/// 调用方当前本地时区相对 UTC 的偏移（小时）
pub fn local_utc_offset_hours() -> f64 {
    let offset_secs = chrono::Local::now().offset().local_minus_utc();
    f64::from(offset_secs) / 3600.0
}

/// 编码链接配置，`utcOffset` 取当前本地时区
///
/// 不重复验证，调用前应先通过 `validation::validate`。
pub fn to_wire_format(config: &LinkConfig) -> WireLink {
    to_wire_format_with_offset(config, local_utc_offset_hours())
}

/// 编码链接配置，使用给定的 `utcOffset`（小时）
pub fn to_wire_format_with_offset(config: &LinkConfig, utc_offset: f64) -> WireLink {
    WireLink {
        id: trimmed(config.id.as_deref()),
        data: config.url.trim().to_string(),
        domain: trimmed(config.domain.as_deref()),
        password: trimmed(config.password.as_deref()),
        start_time: config.start_time,
        utc_offset,
        webhook_url: trimmed(config.webhook_url.as_deref()),
        expiry: config
            .expiry_rules
            .as_deref()
            .map(|rules| rules.iter().map(encode_expiry).collect()),
        restrictions: config.restrictions.as_ref().map(encode_restrictions),
        smart_routing: config.smart_routing.as_ref().map(encode_smart_routing),
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// 缺省或为空的子集合都不输出
fn encode_list<T, U>(items: Option<&[T]>, encode: impl FnMut(&T) -> U) -> Option<Vec<U>> {
    items
        .filter(|items| !items.is_empty())
        .map(|items| items.iter().map(encode).collect())
}

fn encode_expiry(rule: &ExpiryRule) -> WireExpiry {
    WireExpiry {
        value: rule.value,
        kind: rule.kind.wire_code(),
    }
}

fn encode_hour_range(range: &HourRange) -> WireHourRange {
    WireHourRange {
        start_hr: range.start_hr,
        end_hr: range.end_hr,
    }
}

fn encode_location(location: &GeoLocation) -> WireLocation {
    WireLocation {
        address: location.address.trim().to_string(),
        bounding_box: location.bounding_box,
    }
}

fn encode_restrictions(restrictions: &Restrictions) -> WireRestrictions {
    WireRestrictions {
        clicks_per_device: restrictions.max_clicks_per_device,
        os: encode_list(restrictions.allowed_os.as_deref(), |os| os.wire_code()),
        devices: encode_list(restrictions.allowed_devices.as_deref(), |d| d.wire_code()),
        incl_loc: encode_list(restrictions.included_locations.as_deref(), encode_location),
        excl_loc: encode_list(restrictions.excluded_locations.as_deref(), encode_location),
        working_hrs: encode_list(restrictions.working_hours.as_deref(), encode_hour_range),
    }
}

fn encode_rule<T, U>(rule: &RoutingRule<T>, encode_target: impl FnMut(&T) -> U) -> WireRoutingRule<U> {
    WireRoutingRule {
        data: rule.url.trim().to_string(),
        targets: rule.targets.iter().map(encode_target).collect(),
    }
}

fn encode_smart_routing(routing: &SmartRouting) -> WireSmartRouting {
    WireSmartRouting {
        os_based: encode_list(routing.os_based.as_deref(), |rule| {
            encode_rule(rule, |os| os.wire_code())
        }),
        device_based: encode_list(routing.device_based.as_deref(), |rule| {
            encode_rule(rule, |d| d.wire_code())
        }),
        time_based: encode_list(routing.time_based.as_deref(), |rule| {
            encode_rule(rule, encode_hour_range)
        }),
        loc_based: encode_list(routing.loc_based.as_deref(), |rule| {
            encode_rule(rule, encode_location)
        }),
    }
}
