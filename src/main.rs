use clap::Parser;
use tracing::debug;

use urlynk::cli::Cli;
use urlynk::config::ClientConfig;
use urlynk::interfaces::cli::run_cli_command;
use urlynk::system::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;

    let guard = init_logging(&config.logging)?;
    debug!("urlynk {} starting", env!("CARGO_PKG_VERSION"));

    let result = run_cli_command(cli.command, &config).await;
    // exit 前释放 guard，保证日志刷盘
    drop(guard);

    if let Err(e) = result {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }

    Ok(())
}
