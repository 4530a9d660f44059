//! Layered configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. a config file (`--config` / `CONFIG_FILE`, else `./config.yaml` when it exists)
//! 3. `MEMORY_BROWSER__`-prefixed environment variables, e.g. `MEMORY_BROWSER__SERVER__PORT=9000`
//! 4. command-line flags (some also readable from plain env vars such as `PORT`)

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::browser::QueryLimits;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "MEMORY_BROWSER";

/// Default htmx build loaded by the page shell.
pub const DEFAULT_HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Browse memories, events and records of an inspection API", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Interface to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the inspection API
    #[arg(long, env = "MEMORY_API_URL")]
    pub api_url: Option<String>,

    /// Do not open a browser window on startup
    #[arg(long)]
    pub no_browser: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub limits: QueryLimits,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` to bind.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the viewer is reachable at.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub open_browser: bool,
    pub browser_delay_ms: u64,
    pub htmx_src: String,
}

impl UiConfig {
    #[must_use]
    pub fn browser_delay(&self) -> Duration {
        Duration::from_millis(self.browser_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    /// Load from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Fails on invalid flags, unreadable config files and values of the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Load from explicit arguments (the first one is the program name).
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layer defaults, file, environment and `cli`.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let limits = QueryLimits::default();

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("api.base_url", "http://127.0.0.1:8080")?
            .set_default("limits.events_max_results", limits.events_max_results)?
            .set_default("limits.records_max_results", limits.records_max_results)?
            .set_default("limits.retrieve_max_results", limits.retrieve_max_results)?
            .set_default("ui.open_browser", true)?
            .set_default("ui.browser_delay_ms", 2000)?
            .set_default("ui.htmx_src", DEFAULT_HTMX_SRC)?
            .set_default("logging.json", false)?;

        // 2. Config file
        match &cli.config {
            Some(path) => builder = builder.add_source(File::with_name(path)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        // 3. Prefixed environment, e.g. MEMORY_BROWSER__API__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and the plain env vars clap reads for them)
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = &cli.api_url {
            builder = builder.set_override("api.base_url", url.as_str())?;
        }
        if cli.no_browser {
            builder = builder.set_override("ui.open_browser", false)?;
        }
        if cli.log_json {
            builder = builder.set_override("logging.json", true)?;
        }

        builder.build()?.try_deserialize()
    }
}
