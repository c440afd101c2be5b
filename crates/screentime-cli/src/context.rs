//! Loads and saves the state every command works on.

use std::path::PathBuf;

use screentime_core::storage::{data_dir, snapshot, Config, ProfileConfig};
use screentime_core::{IdentityProvider, Session, StateSnapshot, SystemClock, TaskManager};

/// Identity from `SCREENTIME_USER_ID` / `SCREENTIME_USERNAME`, falling back
/// to the `[profile]` section of the config.
struct EnvIdentity {
    profile: ProfileConfig,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl IdentityProvider for EnvIdentity {
    fn current_user_id(&self) -> Option<String> {
        env_value("SCREENTIME_USER_ID").or_else(|| self.profile.user_id.clone())
    }

    fn current_display_name(&self) -> Option<String> {
        env_value("SCREENTIME_USERNAME").or_else(|| self.profile.username.clone())
    }
}

pub struct AppContext {
    pub manager: TaskManager,
    state_path: PathBuf,
}

impl AppContext {
    /// Restores the saved state, or starts a fresh one.
    ///
    /// Screen time is only drained while `ledger watch` runs, so the tick
    /// schedule restarts at the current time on every invocation.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let state_path = snapshot::snapshot_path(&data_dir()?);
        let session = Session::new(
            EnvIdentity {
                profile: config.profile.clone(),
            },
            config.settings(),
        );

        tracing::debug!(path = %state_path.display(), "opening state");
        let manager = match snapshot::load(&state_path)? {
            Some(state) => TaskManager::restore(
                session,
                Box::new(SystemClock),
                StateSnapshot {
                    last_tick_at: None,
                    ..state
                },
            ),
            None => TaskManager::new(session, Box::new(SystemClock), Vec::new(), Vec::new()),
        };

        Ok(Self {
            manager,
            state_path,
        })
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        snapshot::save(&self.state_path, &self.manager.snapshot())?;
        Ok(())
    }

    /// Ends the session and persists its final state.
    pub fn close(self) -> Result<(), Box<dyn std::error::Error>> {
        let state = self.manager.sign_out();
        snapshot::save(&self.state_path, &state)?;
        Ok(())
    }
}
