// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod forwarder;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use pgr_app::{init_logging, ConfigFile};
use pgr_core::decode::DecodedPage;
use pgr_core::DynResult;
use pgr_decode_log::DecodeLogger;
use pgr_reporting::{run_pagermon_uplink, PagerMonClient};

use config::ServerConfig;

const PKG_DESCRIPTION: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " - forwards multimon-ng pages to PagerMon"
);
const PAGE_CHANNEL_BUFFER: usize = 256;
const UPLINK_DRAIN_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// PagerMon base URL (overrides PAGERMON_BASE_URL)
    #[arg(long = "base-url")]
    base_url: Option<String>,
    /// PagerMon API key (overrides PAGERMON_API_KEY)
    #[arg(long = "api-key")]
    api_key: Option<String>,
    /// Source identifier (overrides PAGERMON_IDENTIFIER)
    #[arg(short = 's', long = "source")]
    source: Option<String>,
    /// Read multimon-ng output from FILE instead of stdin ("-" for stdin)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<String>,
    /// Parse and send a single line, then exit
    #[arg(long = "line", value_name = "LINE")]
    line: Option<String>,
}

/// Apply CLI overrides on top of file and environment values.
fn apply_cli(cli: &Cli, cfg: &mut ServerConfig) {
    if let Some(ref url) = cli.base_url {
        cfg.pagermon.base_url = Some(url.clone());
    }
    if let Some(ref key) = cli.api_key {
        cfg.pagermon.api_key = Some(key.clone());
    }
    if let Some(ref source) = cli.source {
        cfg.pagermon.source = Some(source.clone());
    }
    if let Some(ref input) = cli.input {
        cfg.input.path = Some(input.clone());
    }
}

async fn open_input(path: Option<PathBuf>) -> DynResult<Box<dyn AsyncBufRead + Unpin + Send>> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| format!("open input '{}': {}", path.display(), e))?;
            info!("Reading multimon-ng output from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("Reading multimon-ng output from stdin");
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
    }
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ServerConfig::example_combined_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = ServerConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        ServerConfig::load_from_default_paths()?
    };
    cfg.pagermon.apply_env(|key| std::env::var(key).ok());
    apply_cli(&cli, &mut cfg);

    cfg.validate()
        .map_err(|e| format!("Invalid server configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let resolved = cfg.pagermon.resolve()?;
    let client = PagerMonClient::new(&resolved.client)?;

    if let Some(ref line) = cli.line {
        return forwarder::send_once(&client, &resolved.source, line).await;
    }

    info!(
        "Starting pgr-server (endpoint: {}, source: {})",
        client.message_endpoint(),
        resolved.source
    );

    let decode_logs = match DecodeLogger::from_config(&cfg.decode_logs) {
        Ok(v) => v,
        Err(e) => {
            warn!("Decode file logging disabled: {}", e);
            None
        }
    };

    let input_path = cfg.input.resolved_path();
    let from_stdin = input_path.is_none();
    let input = open_input(input_path).await?;

    let (page_tx, page_rx) = mpsc::channel::<DecodedPage>(PAGE_CHANNEL_BUFFER);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let uplink = tokio::spawn(run_pagermon_uplink(client, resolved.source.clone(), page_rx));

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down");
        }
        let _ = shutdown_tx.send(true);
    });

    let stats = forwarder::run_line_reader(input, page_tx, decode_logs, shutdown_rx).await;
    info!(
        "Reader stopped: lines={}, pages={}, rejected={}",
        stats.lines, stats.pages, stats.rejected
    );

    // The uplink drains whatever is still queued once the sender is gone.
    match tokio::time::timeout(Duration::from_secs(UPLINK_DRAIN_TIMEOUT_SECS), uplink).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!("PagerMon uplink task failed: {}", e),
        Err(_) => warn!(
            "PagerMon uplink did not drain within {}s",
            UPLINK_DRAIN_TIMEOUT_SECS
        ),
    }

    // A pending stdin read cannot be cancelled and would keep the runtime
    // from shutting down until the next newline arrives.
    if from_stdin {
        std::process::exit(0);
    }
    Ok(())
}
