//! 链接配置模型
//!
//! `LinkConfig` 是一次创建/更新请求的声明式描述，由调用方构造，
//! 校验（`crate::validation`）后编码为线上格式（`crate::wire`）发送给服务端。

use serde::{Deserialize, Serialize};

use super::enums::{DeviceType, ExpiryType, OsType};

/// 链接配置（根实体）
///
/// 只有 `url` 是必填项，其余字段均为可选。反序列化支持 camelCase 字段名，
/// 也接受服务端协议使用的字段名（如 `webhookURL`、`expiry`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    /// 要更新的链接 ID（短链末尾的路径段）。创建新链接时为 `None`。
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    /// 被缩短的原始 URL
    #[serde(alias = "data")]
    pub url: String,

    /// 自定义域名，必须已在服务端完成验证
    #[serde(default)]
    pub domain: Option<String>,

    /// 链接生效的 UTC 时间戳（毫秒）。`None` 表示立即生效。
    #[serde(default)]
    pub start_time: Option<i64>,

    /// 访问密码
    #[serde(default)]
    pub password: Option<String>,

    /// 点击事件回调地址（HTTP/HTTPS POST 端点）
    #[serde(default, alias = "webhookURL")]
    pub webhook_url: Option<String>,

    /// 过期规则（按点击数或按时间）
    #[serde(default, alias = "expiry")]
    pub expiry_rules: Option<Vec<ExpiryRule>>,

    /// 访问限制
    #[serde(default)]
    pub restrictions: Option<Restrictions>,

    /// 智能路由规则
    #[serde(default)]
    pub smart_routing: Option<SmartRouting>,
}

impl LinkConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_start_time(mut self, start_time_ms: i64) -> Self {
        self.start_time = Some(start_time_ms);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_webhook_url(mut self, webhook_url: impl Into<String>) -> Self {
        self.webhook_url = Some(webhook_url.into());
        self
    }

    pub fn with_expiry_rules(mut self, rules: Vec<ExpiryRule>) -> Self {
        self.expiry_rules = Some(rules);
        self
    }

    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = Some(restrictions);
        self
    }

    pub fn with_smart_routing(mut self, smart_routing: SmartRouting) -> Self {
        self.smart_routing = Some(smart_routing);
        self
    }
}

/// 过期规则
///
/// `value` 的含义取决于 `kind`：
/// - `ClickBased`: 允许的点击次数
/// - `TimeBased`: 失效时刻的 UTC 时间戳（毫秒）
///
/// 同一规则集中每种 `kind` 至多出现一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryRule {
    #[serde(alias = "type")]
    pub kind: ExpiryType,
    pub value: i64,
}

impl ExpiryRule {
    pub fn click_based(clicks: i64) -> Self {
        Self {
            kind: ExpiryType::ClickBased,
            value: clicks,
        }
    }

    pub fn time_based(expires_at_ms: i64) -> Self {
        Self {
            kind: ExpiryType::TimeBased,
            value: expires_at_ms,
        }
    }
}

/// 限制条件的判定维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionAxis {
    ClicksPerDevice,
    Os,
    Device,
    WorkingHours,
    ExcludedLocations,
    IncludedLocations,
}

/// 访问限制
///
/// 字段缺省表示该维度不做限制。服务端按 [`Restrictions::EVALUATION_ORDER`]
/// 依次判定；排除地区优先于与之重叠的包含地区。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(default, alias = "os")]
    pub allowed_os: Option<Vec<OsType>>,

    #[serde(default, alias = "devices")]
    pub allowed_devices: Option<Vec<DeviceType>>,

    #[serde(default, alias = "clicksPerDevice")]
    pub max_clicks_per_device: Option<i32>,

    #[serde(default, alias = "workingHrs")]
    pub working_hours: Option<Vec<HourRange>>,

    #[serde(default, alias = "inclLoc")]
    pub included_locations: Option<Vec<GeoLocation>>,

    #[serde(default, alias = "exclLoc")]
    pub excluded_locations: Option<Vec<GeoLocation>>,
}

impl Restrictions {
    pub const EVALUATION_ORDER: [RestrictionAxis; 6] = [
        RestrictionAxis::ClicksPerDevice,
        RestrictionAxis::Os,
        RestrictionAxis::Device,
        RestrictionAxis::WorkingHours,
        RestrictionAxis::ExcludedLocations,
        RestrictionAxis::IncludedLocations,
    ];
}

/// 智能路由的判定维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingAxis {
    Time,
    Location,
    Device,
    Os,
}

/// 智能路由：按访问者属性把同一短链重定向到不同目标
///
/// 服务端按 [`SmartRouting::EVALUATION_ORDER`] 匹配，且只有在访问未被
/// [`Restrictions`] 拦截时才会生效。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SmartRouting {
    #[serde(default)]
    pub os_based: Option<Vec<RoutingRule<OsType>>>,

    #[serde(default)]
    pub device_based: Option<Vec<RoutingRule<DeviceType>>>,

    #[serde(default)]
    pub time_based: Option<Vec<RoutingRule<HourRange>>>,

    #[serde(default)]
    pub loc_based: Option<Vec<RoutingRule<GeoLocation>>>,
}

impl SmartRouting {
    pub const EVALUATION_ORDER: [RoutingAxis; 4] = [
        RoutingAxis::Time,
        RoutingAxis::Location,
        RoutingAxis::Device,
        RoutingAxis::Os,
    ];
}

/// 单条路由规则：命中任一 `targets` 时重定向到 `url`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRule<T> {
    #[serde(alias = "data")]
    pub url: String,
    pub targets: Vec<T>,
}

impl<T> RoutingRule<T> {
    pub fn new(url: impl Into<String>, targets: Vec<T>) -> Self {
        Self {
            url: url.into(),
            targets,
        }
    }
}

/// 小时区间 `start_hr:00:00` ~ `end_hr:59:59`（闭区间）
///
/// 按链接创建者的本地时区解释，时区偏移在序列化时注入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourRange {
    pub start_hr: i32,
    pub end_hr: i32,
}

impl HourRange {
    pub fn new(start_hr: i32, end_hr: i32) -> Self {
        Self { start_hr, end_hr }
    }
}

/// 地理位置：地址 + 外接矩形
///
/// `bounding_box` 顺序固定为 `[southLat, northLat, westLng, eastLng]`。
/// 判等时地址先去除首尾空白。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub address: String,
    pub bounding_box: [f64; 4],
}

impl GeoLocation {
    pub fn new(address: impl Into<String>, bounding_box: [f64; 4]) -> Self {
        Self {
            address: address.into(),
            bounding_box,
        }
    }

    pub fn south_lat(&self) -> f64 {
        self.bounding_box[0]
    }

    pub fn north_lat(&self) -> f64 {
        self.bounding_box[1]
    }

    pub fn west_lng(&self) -> f64 {
        self.bounding_box[2]
    }

    pub fn east_lng(&self) -> f64 {
        self.bounding_box[3]
    }
}

impl PartialEq for GeoLocation {
    fn eq(&self, other: &Self) -> bool {
        self.address.trim() == other.address.trim() && self.bounding_box == other.bounding_box
    }
}
