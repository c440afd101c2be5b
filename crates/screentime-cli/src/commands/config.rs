use clap::Subcommand;
use screentime_core::Config;

use super::Output;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "streak.daily_goal", "rewards.tick_interval_secs")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (empty clears an optional value)
        value: String,
    },
    /// Show the whole configuration
    Show,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, out: Output) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            out.emit(&serde_json::json!({ "key": key, "value": value }), || value.clone())?;
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            out.emit(&serde_json::json!({ "key": key, "value": config.get(&key) }), || {
                "ok".to_string()
            })?;
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            if out.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            out.emit(&config, || "config reset to defaults".to_string())?;
        }
    }
    Ok(())
}
