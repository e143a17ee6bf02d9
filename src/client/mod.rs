//! URLynk SDK 客户端
//!
//! 在校验与序列化之上封装服务端交互：创建短链与深度链接、解析传入的深度链接、
//! 以及首次启动时的延迟深度链接匹配（点击搜索）。
//!
//! # Architecture
//!
//! ```text
//! handle_deep_link ─┬─ 未配置 → 暂存 initial link
//!                   └─ 已配置 → resolve_link ──→ GET  /links/{a}/{b} ─┐
//! configure ─→ GET /urls ─┬─ initial link → resolve_link             ├─→ broadcast
//!                         └─ 否则 → search_click ─→ POST /clicks/find ┘
//! ```
//!
//! 网络失败与无法解析的响应会上报到 `POST /logs`，上报本身失败时不再上报。

mod device;
mod preferences;
mod transport;

pub use device::{DeviceInfoProvider, ScreenMetrics, StaticDeviceInfo};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceSnapshot, PreferenceStore,
};
pub use transport::{ApiRequest, Method, Transport, TransportError, UreqTransport};

pub use crate::wire::api::DEFAULT_BASE_URL;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::errors::{Result, UrlynkError};
use crate::models::LinkConfig;
use crate::utils::{now_millis, sha256_hex};
use crate::validation::validate;
use crate::wire::api::{
    ClickMatch, ClickSearchRequest, CreatedLink, DeepLinkRequest, ErrorLogEntry, RemoteSettings,
    ResolvedLink,
};
use crate::wire::{ApiEnvelope, to_wire_format};

pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

const EVENT_CHANNEL_CAPACITY: usize = 16;
const ERROR_LOG_LEVEL: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub sdk_version: String,
    /// User-Agent 中的平台名
    pub platform: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sdk_version: SDK_VERSION.to_string(),
            platform: std::env::consts::OS.to_string(),
        }
    }
}

/// 解析或匹配得到的链接数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkData {
    pub link: String,
    pub data: String,
}

/// 推送给订阅者的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Data(LinkData),
    Error(String),
}

#[derive(Debug)]
struct Session {
    api_key: Option<String>,
    user_agent: Option<String>,
    base_url: String,
    max_click_search: Option<u32>,
    initial_link: Option<String>,
}

pub struct UrlynkClient {
    settings: ClientSettings,
    transport: Arc<dyn Transport>,
    device: Arc<dyn DeviceInfoProvider>,
    prefs: Arc<dyn PreferenceStore>,
    session: RwLock<Session>,
    events: broadcast::Sender<LinkEvent>,
}

impl UrlynkClient {
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
        device: Arc<dyn DeviceInfoProvider>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = Session {
            api_key: None,
            user_agent: None,
            base_url: normalize_base_url(&settings.base_url),
            max_click_search: None,
            initial_link: None,
        };

        Self {
            settings,
            transport,
            device,
            prefs,
            session: RwLock::new(session),
            events,
        }
    }

    /// 订阅链接解析与点击匹配的结果
    pub fn subscribe(&self) -> broadcast::Receiver<LinkEvent> {
        self.events.subscribe()
    }

    pub fn is_configured(&self) -> bool {
        self.session.read().api_key.is_some()
    }

    pub fn base_url(&self) -> String {
        self.session.read().base_url.clone()
    }

    pub fn max_click_search(&self) -> Option<u32> {
        self.session.read().max_click_search
    }

    pub fn pending_link(&self) -> Option<String> {
        self.session.read().initial_link.clone()
    }

    pub fn user_agent(&self) -> Option<String> {
        self.session.read().user_agent.clone()
    }

    /// 处理打开应用的深度链接
    ///
    /// 尚未 `configure` 时只暂存链接，配置完成后再解析。
    pub async fn handle_deep_link(&self, link: &str) -> Result<Option<LinkData>> {
        let link = link.trim();
        if link.is_empty() {
            return Ok(None);
        }

        {
            let mut session = self.session.write();
            if session.api_key.is_none() {
                debug!("Client not configured, deferring deep link {}", link);
                session.initial_link = Some(link.to_string());
                return Ok(None);
            }
        }

        self.resolve_link(link).await.map(Some)
    }

    /// 使用 API key 配置客户端
    ///
    /// 拉取远端设置后，优先解析暂存的深度链接，否则执行点击搜索。
    pub async fn configure(&self, api_key: &str) -> Result<Option<LinkData>> {
        self.authenticate(api_key).await?;

        // 解析成功后才清除暂存链接，失败时下次 configure 重试
        let pending = self.session.read().initial_link.clone();
        let Some(link) = pending else {
            return self.search_click().await;
        };

        let resolved = self.resolve_link(&link).await?;
        let mut session = self.session.write();
        if session.initial_link.as_deref() == Some(link.as_str()) {
            session.initial_link = None;
        }
        Ok(Some(resolved))
    }

    /// 只设置 API key 并拉取远端设置，不解析链接也不执行点击搜索
    pub async fn authenticate(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(UrlynkError::validation("API key cannot be empty"));
        }

        let user_agent = format!(
            "{}; {}; {}; {}",
            self.settings.platform,
            self.device.app_id(),
            sha256_hex(&self.device.device_id()),
            self.settings.sdk_version
        );

        {
            let mut session = self.session.write();
            session.api_key = Some(api_key.to_string());
            session.user_agent = Some(user_agent);
        }
        info!("URLynk client configured");

        self.fetch_remote_settings().await;
        Ok(())
    }

    /// 创建短链，返回优先使用自定义域名的短链地址
    pub async fn create_short_link(&self, config: &LinkConfig) -> Result<String> {
        self.ensure_configured()?;
        validate(config)?;

        let body = serde_json::to_value(to_wire_format(config).into_envelope())?;
        self.create_link(body).await
    }

    /// 创建携带任意字符串负载的深度链接
    pub async fn create_deep_link(&self, data: &str) -> Result<String> {
        self.ensure_configured()?;
        let data = data.trim();
        if data.is_empty() {
            return Err(UrlynkError::validation("Data cannot be empty"));
        }

        let body = serde_json::to_value(DeepLinkRequest {
            app_id: String::new(),
            data: data.to_string(),
        })?;
        self.create_link(body).await
    }

    /// 解析深度链接：路径必须恰好包含两段
    pub async fn resolve_link(&self, link: &str) -> Result<LinkData> {
        self.ensure_configured()?;
        let (first, second) = link_path(link)?;

        let outcome = match self
            .send(Method::Get, &format!("/links/{}/{}", first, second), None)
            .await
        {
            Ok(payload) => self
                .decode::<ResolvedLink>(payload)
                .await
                .map(|resolved| LinkData {
                    link: link.to_string(),
                    data: resolved.link_data,
                }),
            Err(e) => Err(e.into()),
        };

        self.publish_outcome(&outcome);
        outcome
    }

    /// 延迟深度链接匹配
    ///
    /// 商店安装且版本未变时，累计次数达到 `maxClickSearch` 后不再请求。
    /// 成功或 404（无匹配）都会更新计数；404 返回 `Ok(None)`。
    pub async fn search_click(&self) -> Result<Option<LinkData>> {
        self.ensure_configured()?;

        let prefs = self.prefs.snapshot()?;
        let is_live = self.device.installed_from_store();
        let version = self.device.version_code();
        let reset = prefs.last_app_version != Some(version);

        if is_live
            && !reset
            && self
                .max_click_search()
                .is_some_and(|max| prefs.click_search_count >= max)
        {
            debug!(
                "Click search skipped after {} attempts on version {}",
                prefs.click_search_count, version
            );
            return Ok(None);
        }

        let next_count = if reset {
            1
        } else {
            prefs.click_search_count.saturating_add(1)
        };
        let screen = self.device.screen_metrics();
        let body = serde_json::to_value(ClickSearchRequest {
            is_live,
            version_code: version,
            screen_width: screen.width,
            screen_height: screen.height,
            device_pixel_ratio: screen.pixel_density,
            os_version: self.device.os_version(),
        })?;

        match self.send(Method::Post, "/clicks/find", Some(body)).await {
            Ok(payload) => {
                let outcome = self
                    .decode::<ClickMatch>(payload)
                    .await
                    .map(|found| LinkData {
                        link: found.link,
                        data: found.data,
                    });
                self.publish_outcome(&outcome);
                let data = outcome?;
                self.prefs.record_click_search(version, next_count)?;
                Ok(Some(data))
            }
            Err(e) => {
                self.publish(LinkEvent::Error(e.to_string()));
                if e.status == Some(404) {
                    debug!("No matching click for version {}", version);
                    self.prefs.record_click_search(version, next_count)?;
                    return Ok(None);
                }
                Err(e.into())
            }
        }
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(UrlynkError::not_configured())
        }
    }

    async fn fetch_remote_settings(&self) {
        let payload = match self.send(Method::Get, "/urls", None).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to fetch remote settings: {}", e);
                return;
            }
        };

        let Ok(remote) = self.decode::<RemoteSettings>(payload).await else {
            return;
        };

        let mut session = self.session.write();
        if let Some(base_url) = remote.base_url.filter(|url| !url.trim().is_empty()) {
            session.base_url = normalize_base_url(&base_url);
        }
        session.max_click_search = remote.max_click_search;
        debug!(
            "Remote settings applied: base_url={}, max_click_search={:?}",
            session.base_url, session.max_click_search
        );
    }

    async fn create_link(&self, body: Value) -> Result<String> {
        let payload = self.send(Method::Post, "/links", Some(body)).await?;
        let created = self.decode::<CreatedLink>(payload).await?;

        created
            .link
            .url
            .preferred()
            .map(str::to_string)
            .ok_or_else(|| UrlynkError::unexpected_response("Response did not contain a short URL"))
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiRequest {
        let session = self.session.read();
        ApiRequest {
            method,
            url: format!("{}{}", session.base_url, path),
            headers: Vec::new(),
            body,
        }
        .header("x-api-key", session.api_key.clone().unwrap_or_default())
        .header("user-agent", session.user_agent.clone().unwrap_or_default())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<Value, TransportError> {
        let request = self.request(method, path, body);
        debug!("{} {}", request.method, request.url);

        let result = self.transport.send(request).await;
        if let Err(e) = &result
            && e.is_unexpected()
        {
            self.report_error(&e.to_string(), &format!("{:?}", e)).await;
        }
        result
    }

    async fn decode<T: DeserializeOwned + Send>(&self, payload: Value) -> Result<T> {
        match serde_json::from_value(payload) {
            Ok(value) => Ok(value),
            Err(e) => {
                let message = format!("Malformed response: {}", e);
                self.report_error(&message, &format!("{:?}", e)).await;
                Err(UrlynkError::unexpected_response(message))
            }
        }
    }

    /// 上报错误日志；上报失败只在本地 trace
    async fn report_error(&self, message: &str, stack_trace: &str) {
        let envelope = ApiEnvelope::new(vec![ErrorLogEntry {
            level: ERROR_LOG_LEVEL,
            time: now_millis(),
            stack_trace: stack_trace.to_string(),
            message: message.to_string(),
        }]);
        let body = match serde_json::to_value(envelope) {
            Ok(body) => body,
            Err(e) => {
                trace!("Failed to encode error log: {}", e);
                return;
            }
        };

        let request = self.request(Method::Post, "/logs", Some(body));
        if let Err(e) = self.transport.send(request).await {
            trace!("Error log upload failed: {}", e);
        }
    }

    fn publish_outcome(&self, outcome: &Result<LinkData>) {
        match outcome {
            Ok(data) => self.publish(LinkEvent::Data(data.clone())),
            Err(e) => self.publish(LinkEvent::Error(e.message().to_string())),
        }
    }

    fn publish(&self, event: LinkEvent) {
        if self.events.send(event).is_err() {
            trace!("No link event subscribers");
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// 提取深度链接路径中的两段，空段忽略
fn link_path(link: &str) -> Result<(String, String)> {
    let url = url::Url::parse(link.trim())
        .map_err(|e| UrlynkError::validation(format!("Invalid deep link {}: {}", link, e)))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [first, second] => Ok((first.to_string(), second.to_string())),
        _ => Err(UrlynkError::validation(format!(
            "Deep link path must have exactly two segments, got {}",
            segments.len()
        ))),
    }
}
