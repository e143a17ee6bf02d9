//! HTTP 传输层
//!
//! `Transport` 是客户端与网络之间的唯一接缝：发出一个 JSON 请求，成功时返回
//! 响应信封中 `data` 键下的负载，失败时返回带可选状态码的 `TransportError`。
//! 默认实现 `UreqTransport` 使用同步的 ureq，在 `spawn_blocking` 中执行。

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use crate::errors::UrlynkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// 一次 API 请求
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 按名称（不区分大小写）查找请求头
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// 传输失败：网络错误时无状态码，服务端返回错误时携带 HTTP 状态码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: Option<String>,
    pub status: Option<u16>,
    /// 响应体无法解析
    pub malformed: bool,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: None,
            malformed: false,
        }
    }

    pub fn http(status: u16, message: Option<String>) -> Self {
        Self {
            message,
            status: Some(status),
            malformed: false,
        }
    }

    /// 响应已到达但内容无法解析，不论状态码
    pub fn malformed(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: Some(status),
            malformed: true,
        }
    }

    /// 网络层失败或响应无法解析；服务端返回的业务错误不算在内
    pub fn is_unexpected(&self) -> bool {
        self.malformed || self.status.is_none_or(|status| (200..300).contains(&status))
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.status) {
            (Some(msg), Some(status)) => write!(f, "{} (HTTP {})", msg, status),
            (Some(msg), None) => write!(f, "{}", msg),
            (None, Some(status)) => write!(f, "HTTP {}", status),
            (None, None) => write!(f, "unknown transport error"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for UrlynkError {
    fn from(err: TransportError) -> Self {
        UrlynkError::transport(err.to_string(), err.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// 基于 ureq 的默认传输实现
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn send_sync(agent: Agent, request: ApiRequest) -> Result<Value, TransportError> {
        let response = match request.method {
            Method::Get => {
                let mut builder = agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.send_json(request.body.unwrap_or(Value::Null))
            }
        };

        let response = response.map_err(|e| {
            warn!("{} \"{}\" failed: {}", request.method, request.url, e);
            TransportError::network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| TransportError::malformed(status, e.to_string()))?;
        trace!("{} \"{}\" -> {} {}", request.method, request.url, status, body);

        parse_envelope(status, &body)
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || Self::send_sync(agent, request))
            .await
            .unwrap_or_else(|e| Err(TransportError::network(format!("request task failed: {}", e))))
    }
}

/// 解析响应信封
///
/// - 空响应体：失败，仅携带状态码
/// - 非 2xx：失败，消息取 `message` 字段
/// - 2xx：返回 `data` 键下的负载，缺失时视为失败
pub(crate) fn parse_envelope(status: u16, body: &str) -> Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Err(TransportError::http(status, None));
    }

    let json: Value =
        serde_json::from_str(body).map_err(|e| TransportError::malformed(status, e.to_string()))?;

    if !(200..300).contains(&status) {
        let message = json["message"].as_str().map(String::from);
        return Err(TransportError::http(status, message));
    }

    match json.get("data") {
        Some(data) if data.is_object() => Ok(data.clone()),
        _ => Err(TransportError::malformed(
            status,
            "response is missing the \"data\" object",
        )),
    }
}
