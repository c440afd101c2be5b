mod config;
pub mod snapshot;

pub use config::{CalendarConfig, Config, ProfileConfig, RewardsConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/screentime[-dev]/` based on SCREENTIME_ENV.
///
/// Set SCREENTIME_ENV=dev to use the development data directory, or
/// SCREENTIME_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("SCREENTIME_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SCREENTIME_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("screentime-dev")
            } else {
                base_dir.join("screentime")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
