//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Reference datasets used for theme and synergy discovery.
    pub resources: ResourcesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Card search provider configuration.
    pub scryfall: ScryfallConfig,

    /// Tool execution limits.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the reference datasets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Directory containing `creature-types.txt`, `keyword-abilities.txt`
    /// and `themepatterns.json`. When unset, the copies bundled into the
    /// binary are used.
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to also write logs to `file_path`.
    pub log_to_file: bool,

    /// Log file used when `log_to_file` is set.
    pub file_path: PathBuf,
}

/// Scryfall API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallConfig {
    /// API base URL.
    pub base_url: String,

    /// User agent sent with every request (required by Scryfall).
    pub user_agent: String,

    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Minimum spacing between two requests in milliseconds.
    pub request_interval_ms: u64,
}

/// Limits applied to tool invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Deadline for a single tool invocation in seconds.
    pub timeout_secs: u64,
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.scryfall.com".to_string(),
            user_agent: format!("scryfall-mcp-server/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            request_interval_ms: 100,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "scryfall-card-search-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            resources: ResourcesConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                log_to_file: false,
                file_path: PathBuf::from("mcp-server.log"),
            },
            transport: TransportConfig::default(),
            scryfall: ScryfallConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Parse an environment variable, keeping `current` when it is unset or malformed.
fn env_parse<T: FromStr + Copy>(key: &str, current: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value {:?} for {}", raw, key);
            current
        }),
        Err(_) => current,
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(version) = std::env::var("MCP_SERVER_VERSION") {
            config.server.version = version;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.logging.log_to_file = env_parse("MCP_LOG_TO_FILE", config.logging.log_to_file);

        if let Ok(path) = std::env::var("MCP_LOG_FILE") {
            config.logging.file_path = PathBuf::from(path);
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(dir) = std::env::var("MCP_RESOURCES_DIR") {
            config.resources.data_dir = Some(PathBuf::from(dir));
            info!("Reference data directory: {:?}", config.resources.data_dir);
        }

        if let Ok(base_url) = std::env::var("MCP_SCRYFALL_BASE_URL") {
            config.scryfall.base_url = base_url;
        }

        config.scryfall.timeout_secs =
            env_parse("MCP_SCRYFALL_TIMEOUT_SECS", config.scryfall.timeout_secs);
        config.scryfall.request_interval_ms = env_parse(
            "MCP_SCRYFALL_REQUEST_INTERVAL_MS",
            config.scryfall.request_interval_ms,
        );
        config.tools.timeout_secs = env_parse("MCP_TOOL_TIMEOUT_SECS", config.tools.timeout_secs);

        config
    }
}
