mod config;
pub mod device_id;

pub use config::{ApiConfig, Config, LayoutConfig};
pub use device_id::{get_or_create_device_id, get_or_create_device_id_at};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/timepilot[-dev]/` based on TIMEPILOT_ENV.
///
/// Set TIMEPILOT_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEPILOT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timepilot-dev")
    } else {
        base_dir.join("timepilot")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
