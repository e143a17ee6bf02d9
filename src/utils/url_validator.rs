//! 目标地址与自定义域名的格式检查
//!
//! 先按 scheme 分类（web / 被拦截 / 其他），只有 web scheme 才继续
//! 交给 `url` 解析并要求存在主机名。不做可达性检查。

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    /// 去除空白后为空
    Empty,
    /// 可执行或本地内容的 scheme，携带小写 scheme 名
    BlockedScheme(String),
    /// 非 http/https；没有 scheme 时为空字符串
    UnsupportedScheme(String),
    /// `url` 解析失败或缺少主机名
    Malformed(String),
}

impl fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("URL is empty"),
            Self::BlockedScheme(scheme) => write!(f, "scheme \"{}\" is not allowed", scheme),
            Self::UnsupportedScheme(scheme) if scheme.is_empty() => {
                f.write_str("missing http(s) scheme")
            }
            Self::UnsupportedScheme(scheme) => {
                write!(f, "scheme \"{}\" is not http or https", scheme)
            }
            Self::Malformed(reason) => write!(f, "malformed URL ({})", reason),
        }
    }
}

impl std::error::Error for UrlValidationError {}

enum SchemeKind {
    Web,
    Blocked,
    Other,
}

fn classify(scheme: &str) -> SchemeKind {
    match scheme {
        "http" | "https" => SchemeKind::Web,
        "javascript" | "vbscript" | "data" | "file" | "about" | "blob" => SchemeKind::Blocked,
        _ => SchemeKind::Other,
    }
}

static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("domain pattern is a valid regex")
});

/// 检查链接目标：非空、http(s)、可解析且带主机名
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let scheme = url
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();

    match classify(&scheme) {
        SchemeKind::Blocked => return Err(UrlValidationError::BlockedScheme(scheme)),
        SchemeKind::Other => return Err(UrlValidationError::UnsupportedScheme(scheme)),
        SchemeKind::Web => {}
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::Malformed("no host".to_string())),
    }
}

pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}

/// 自定义域名：以至少两个字母的顶级域结尾，不带 scheme
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_PATTERN.is_match(domain.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_targets_accepted() {
        for url in [
            "https://shop.example.com/item/42?ref=mail",
            "http://10.0.0.7:3000/",
            "HTTPS://Example.COM",
            "\thttp://example.org\n",
        ] {
            assert_eq!(validate_url(url), Ok(()), "{}", url);
        }
    }

    #[test]
    fn test_blocked_schemes() {
        assert_eq!(
            validate_url("JavaScript:void(0)"),
            Err(UrlValidationError::BlockedScheme("javascript".into()))
        );
        assert_eq!(
            validate_url("data:image/png;base64,AAAA"),
            Err(UrlValidationError::BlockedScheme("data".into()))
        );
        assert_eq!(
            validate_url("blob:https://example.com/uuid"),
            Err(UrlValidationError::BlockedScheme("blob".into()))
        );
    }

    #[test]
    fn test_unsupported_schemes() {
        assert_eq!(
            validate_url("ftp://files.example.com"),
            Err(UrlValidationError::UnsupportedScheme("ftp".into()))
        );
        assert_eq!(
            validate_url("intent://scan/#Intent;end"),
            Err(UrlValidationError::UnsupportedScheme("intent".into()))
        );
        assert_eq!(
            validate_url("www.example.com/path"),
            Err(UrlValidationError::UnsupportedScheme(String::new()))
        );
    }

    #[test]
    fn test_unparseable_or_hostless() {
        assert!(matches!(
            validate_url("https://"),
            Err(UrlValidationError::Malformed(_))
        ));
        assert!(matches!(
            validate_url("http://bad host.com"),
            Err(UrlValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(validate_url(" \t "), Err(UrlValidationError::Empty));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UrlValidationError::UnsupportedScheme(String::new()).to_string(),
            "missing http(s) scheme"
        );
        assert_eq!(
            UrlValidationError::BlockedScheme("file".into()).to_string(),
            "scheme \"file\" is not allowed"
        );
    }

    #[test]
    fn test_domains() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("go.my-brand.co.uk"));
        assert!(is_valid_domain(" links.example.io "));
        assert!(!is_valid_domain("localhost"));
        assert!(!is_valid_domain("example.c"));
        assert!(!is_valid_domain("example.123"));
        assert!(!is_valid_domain("exa_mple.com"));
        assert!(!is_valid_domain("https://example.com"));
        assert!(!is_valid_domain(""));
    }
}
