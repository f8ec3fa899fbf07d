//! Configuration loader for Glimora.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`GlimoraConfig`]. Falls back to defaults when the file is missing or
//! malformed, so a fresh install runs without any setup.

use std::path::{Path, PathBuf};

use glimora_types::config::GlimoraConfig;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_VAR: &str = "GLIMORA_DATA_DIR";

/// Resolve the data directory that holds `config.toml` and `sessions.json`.
///
/// `GLIMORA_DATA_DIR` wins when set; otherwise the platform data dir plus
/// a `glimora` component. A headless environment with neither falls back
/// to `.glimora` in the working directory.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_VAR) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("glimora"))
        .unwrap_or_else(|| PathBuf::from(".glimora"))
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlimoraConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> GlimoraConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlimoraConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlimoraConfig::default();
        }
    };

    match toml::from_str::<GlimoraConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlimoraConfig::default()
        }
    }
}
