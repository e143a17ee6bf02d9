//! 设备与应用信息
//!
//! 宿主环境通过 `DeviceInfoProvider` 向客户端提供 User-Agent 与点击匹配所需的信息。

use serde::{Deserialize, Serialize};

/// 屏幕尺寸（像素）与像素密度（dpi）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub pixel_density: u32,
}

pub trait DeviceInfoProvider: Send + Sync {
    fn app_id(&self) -> String;
    fn device_id(&self) -> String;
    fn version_code(&self) -> i64;
    /// 是否从应用商店安装
    fn installed_from_store(&self) -> bool;
    fn os_version(&self) -> String;
    fn screen_metrics(&self) -> ScreenMetrics;
}

/// 固定值的设备信息，用于 CLI 与测试
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticDeviceInfo {
    pub app_id: String,
    pub device_id: String,
    pub version_code: i64,
    pub installed_from_store: bool,
    pub os_version: String,
    pub screen: ScreenMetrics,
}

impl Default for StaticDeviceInfo {
    fn default() -> Self {
        Self {
            app_id: env!("CARGO_PKG_NAME").to_string(),
            device_id: String::new(),
            version_code: 1,
            installed_from_store: false,
            os_version: std::env::consts::OS.to_string(),
            screen: ScreenMetrics::default(),
        }
    }
}

impl DeviceInfoProvider for StaticDeviceInfo {
    fn app_id(&self) -> String {
        self.app_id.clone()
    }

    fn device_id(&self) -> String {
        self.device_id.clone()
    }

    fn version_code(&self) -> i64 {
        self.version_code
    }

    fn installed_from_store(&self) -> bool {
        self.installed_from_store
    }

    fn os_version(&self) -> String {
        self.os_version.clone()
    }

    fn screen_metrics(&self) -> ScreenMetrics {
        self.screen
    }
}
