//! Scryfall MCP Server Entry Point
//!
//! Initializes logging, loads configuration, warms the reference data and
//! starts the server with the configured transport.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{EnvFilter, fmt};

use scryfall_mcp_server::core::config::LoggingConfig;
use scryfall_mcp_server::core::{Config, McpServer, TransportService};
use scryfall_mcp_server::domains::discovery::ReferenceCache;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone());
    ReferenceCache::global().warm();

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr, since stdout carries the STDIO transport. When
/// file logging is enabled they are also appended to the configured file.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let mut file_error = None;
    let writer = if logging.log_to_file {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&logging.file_path)
        {
            Ok(file) => BoxMakeWriter::new(std::io::stderr.and(Arc::new(file))),
            Err(e) => {
                file_error = Some(e);
                BoxMakeWriter::new(std::io::stderr)
            }
        }
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(!logging.log_to_file)
        .with_writer(writer)
        .init();

    if let Some(e) = file_error {
        warn!(
            "Could not open log file {}: {}, logging to stderr only",
            logging.file_path.display(),
            e
        );
    }
}
