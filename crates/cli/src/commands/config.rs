use std::env;
use std::path::{Path, PathBuf};

use margo_core::config::{AppConfig, LoadOptions, LogFormat};

/// Renders the effective configuration with per-field source
/// attribution, so operators can see which layer won.
pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        field_source("MARGO_SERVER_BIND_ADDRESS", config_file_path.as_deref()),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        field_source("MARGO_SERVER_PORT", config_file_path.as_deref()),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        field_source("MARGO_SERVER_GRACEFUL_SHUTDOWN_SECS", config_file_path.as_deref()),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source("MARGO_LOGGING_LEVEL", config_file_path.as_deref()),
    ));
    let format = match config.logging.format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    };
    lines.push(render_line(
        "logging.format",
        format,
        field_source("MARGO_LOGGING_FORMAT", config_file_path.as_deref()),
    ));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  ({source})")
}

fn field_source(env_key: &str, config_file_path: Option<&Path>) -> String {
    if env::var(env_key).map(|value| !value.trim().is_empty()).unwrap_or(false) {
        return format!("env: {env_key}");
    }
    if let Some(path) = config_file_path {
        return format!("file: {}", path.display());
    }
    "default".to_string()
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("margo.toml"), PathBuf::from("config/margo.toml")]
        .into_iter()
        .find(|path| path.exists())
}
