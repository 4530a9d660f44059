//! Memory Browser server
//!
//! Entry point: loads configuration, starts the viewer and opens it in the
//! default browser.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use memory_browser::AppState;
use memory_browser::browser::MemoryBrowser;
use memory_browser::config::{AppConfig, Cli};
use memory_browser::sdk::Client;
use memory_browser::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenv();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli).context("Configuration error")?;

    init_tracing(config.logging.json);

    let client = Client::new(&config.api.base_url)
        .with_context(|| format!("Invalid API base URL: {}", config.api.base_url))?;
    info!(
        name: "api.config.loaded",
        base_url = %client.base_url(),
        "Inspection API configured"
    );

    let browser = MemoryBrowser::new(Arc::new(client), config.limits);

    let listener = tokio::net::TcpListener::bind(config.server.address())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.address()))?;

    if config.ui.open_browser {
        spawn_browser_opener(config.server.url(), config.ui.browser_delay());
    }

    server::serve(listener, AppState::new(browser, config)).await
}

/// Initialize tracing (M-LOG-STRUCTURED).
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Browser launch
// ─────────────────────────────────────────────────────────────────────────────

/// Open `url` in the default browser after `delay`. Failures are only logged.
fn spawn_browser_opener(url: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let (program, args) = opener_command(&url);
        match tokio::process::Command::new(program).args(&args).status().await {
            Ok(status) if status.success() => {
                info!(name: "browser.opened", url = %url, "Opened browser");
            }
            Ok(status) => {
                warn!(url = %url, %status, "Browser opener exited unsuccessfully");
            }
            Err(e) => {
                warn!(url = %url, error = %e, opener = program, "Failed to launch browser");
            }
        }
    });
}

fn opener_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}
