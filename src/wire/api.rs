//! 客户端与服务端交换的其余 JSON 结构

use serde::{Deserialize, Serialize};

/// 服务端 API 的默认地址，`GET /urls` 可下发新的地址
pub const DEFAULT_BASE_URL: &str = "https://api-xn4bb66p3a-uc.a.run.app/v4";

/// `POST /links` 创建深度链接的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepLinkRequest {
    pub app_id: String,
    pub data: String,
}

/// `POST /clicks/find` 延迟深度链接匹配的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickSearchRequest {
    pub is_live: bool,
    pub version_code: i64,
    pub screen_width: u32,
    pub screen_height: u32,
    pub device_pixel_ratio: u32,
    pub os_version: String,
}

/// `POST /logs` 上报的单条错误日志
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogEntry {
    pub level: u8,
    pub time: i64,
    pub stack_trace: String,
    pub message: String,
}

/// `GET /urls` 的响应：服务端下发的基础地址与点击搜索上限
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    #[serde(default, rename = "baseURL")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub max_click_search: Option<u32>,
}

/// `POST /links` 的响应
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedLink {
    pub link: CreatedLinkBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedLinkBody {
    pub url: LinkUrls,
}

/// 默认短链与自定义域名短链
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkUrls {
    #[serde(default)]
    pub custom: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

impl LinkUrls {
    /// 优先返回自定义域名短链；为空或字面量 "null" 时回退到默认短链
    pub fn preferred(&self) -> Option<&str> {
        self.custom
            .as_deref()
            .map(str::trim)
            .filter(|custom| !custom.is_empty() && *custom != "null")
            .or_else(|| self.default.as_deref().map(str::trim))
            .filter(|url| !url.is_empty())
    }
}

/// `GET /links/{a}/{b}` 的响应
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLink {
    pub link_data: String,
}

/// `POST /clicks/find` 的响应
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClickMatch {
    pub link: String,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preferred_url() {
        let urls = LinkUrls {
            custom: Some("https://go.brand.com/x".into()),
            default: Some("https://urlynk.in/x".into()),
        };
        assert_eq!(urls.preferred(), Some("https://go.brand.com/x"));

        let urls = LinkUrls {
            custom: Some("null".into()),
            default: Some("https://urlynk.in/x".into()),
        };
        assert_eq!(urls.preferred(), Some("https://urlynk.in/x"));

        let urls = LinkUrls {
            custom: Some("  ".into()),
            default: None,
        };
        assert_eq!(urls.preferred(), None);
    }

    #[test]
    fn test_remote_settings_partial() {
        let settings: RemoteSettings =
            serde_json::from_value(json!({"baseURL": "https://api.example.com/v5"})).unwrap();
        assert_eq!(settings.base_url.as_deref(), Some("https://api.example.com/v5"));
        assert_eq!(settings.max_click_search, None);
    }

    #[test]
    fn test_click_search_request_keys() {
        let body = ClickSearchRequest {
            is_live: true,
            version_code: 42,
            screen_width: 1080,
            screen_height: 2400,
            device_pixel_ratio: 420,
            os_version: "14".into(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({
                "isLive": true,
                "versionCode": 42,
                "screenWidth": 1080,
                "screenHeight": 2400,
                "devicePixelRatio": 420,
                "osVersion": "14"
            })
        );
    }
}
