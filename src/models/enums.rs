//! 链接配置中使用的枚举类型
//!
//! 每个枚举都带有一张显式的线上编码表（`wire_code`）。服务端协议按整数编码
//! 识别这些值，编码一经发布即冻结：新增变体只能追加新编码，不能复用或重排。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// 操作系统类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OsType {
    Android,
    #[serde(alias = "iOS")]
    Ios,
    #[serde(alias = "macOS")]
    Macos,
    Windows,
    Linux,
}

impl OsType {
    /// 线上编码（冻结）
    pub const fn wire_code(self) -> u8 {
        match self {
            OsType::Android => 0,
            OsType::Ios => 1,
            OsType::Macos => 2,
            OsType::Windows => 3,
            OsType::Linux => 4,
        }
    }
}

/// 设备类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    /// 线上编码（冻结）
    pub const fn wire_code(self) -> u8 {
        match self {
            DeviceType::Mobile => 0,
            DeviceType::Tablet => 1,
            DeviceType::Desktop => 2,
        }
    }
}

/// 过期规则类型
///
/// - `ClickBased`: 点击次数达到阈值后失效
/// - `TimeBased`: 到达指定 UTC 时间戳（毫秒）后失效
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ExpiryType {
    ClickBased,
    TimeBased,
}

impl ExpiryType {
    /// 线上编码（冻结）
    pub const fn wire_code(self) -> u8 {
        match self {
            ExpiryType::ClickBased => 0,
            ExpiryType::TimeBased => 1,
        }
    }
}
