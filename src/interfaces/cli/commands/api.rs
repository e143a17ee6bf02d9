//! Commands that talk to the URLynk API

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;

use super::link_file::load_link_config;
use crate::client::{
    ClientSettings, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, SDK_VERSION,
    ScreenMetrics, StaticDeviceInfo, UreqTransport, UrlynkClient,
};
use crate::config::ClientConfig;
use crate::errors::Result;
use crate::interfaces::cli::CliError;

/// 按配置构建客户端（尚未设置 API key）
pub fn build_client(config: &ClientConfig) -> Result<UrlynkClient> {
    let settings = ClientSettings {
        base_url: config.api.base_url.clone(),
        sdk_version: SDK_VERSION.to_string(),
        platform: config.api.platform.clone(),
    };

    let device = StaticDeviceInfo {
        app_id: config.device.app_id.clone(),
        device_id: config.device.device_id.clone(),
        version_code: config.device.version_code,
        installed_from_store: config.device.installed_from_store,
        os_version: config.device.os_version.clone(),
        screen: ScreenMetrics::default(),
    };

    let prefs: Arc<dyn PreferenceStore> = match &config.preferences.path {
        Some(path) => Arc::new(FilePreferenceStore::open(path)?),
        None => Arc::new(MemoryPreferenceStore::new()),
    };

    Ok(UrlynkClient::new(
        settings,
        Arc::new(UreqTransport::new(Duration::from_secs(config.api.timeout_secs))),
        Arc::new(device),
        prefs,
    ))
}

fn api_key(config: &ClientConfig) -> std::result::Result<&str, CliError> {
    config
        .api
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            CliError::CommandError(
                "API key not set. Use [api] api_key in urlynk.toml or URLYNK__API__API_KEY"
                    .to_string(),
            )
        })
}

pub async fn shorten_link(config: &ClientConfig, file_path: &str) -> std::result::Result<(), CliError> {
    let link = load_link_config(file_path)?;
    let client = build_client(config)?;
    client.authenticate(api_key(config)?).await?;

    let short_url = client.create_short_link(&link).await?;
    println!(
        "{} Created short link: {} -> {}",
        "✓".bold().green(),
        short_url.cyan(),
        link.url.trim().blue().underline()
    );
    Ok(())
}

pub async fn create_deep_link(config: &ClientConfig, data: &str) -> std::result::Result<(), CliError> {
    let client = build_client(config)?;
    client.authenticate(api_key(config)?).await?;

    let link = client.create_deep_link(data).await?;
    println!("{} Created deep link: {}", "✓".bold().green(), link.cyan());
    Ok(())
}

/// 与 SDK 启动流程一致：先暂存链接，配置完成后解析
pub async fn resolve_link(config: &ClientConfig, link: &str) -> std::result::Result<(), CliError> {
    // 空链接会让 configure 转去点击搜索
    if link.trim().is_empty() {
        return Err(CliError::ValidationError("Link cannot be empty".to_string()));
    }

    let client = build_client(config)?;
    client.handle_deep_link(link).await?;

    match client.configure(api_key(config)?).await? {
        Some(data) => {
            println!(
                "{} Resolved {}",
                "✓".bold().green(),
                data.link.blue().underline()
            );
            println!("  {} {}", "data:".dimmed(), data.data.magenta());
        }
        None => println!("{} No link data for {}", "ℹ".bold().blue(), link.cyan()),
    }
    Ok(())
}
