//! Session lifecycle and the identity collaborator.
//!
//! A [`Session`] is created at app start with the signed-in identity and the
//! effective settings, handed to the manager, and given back up at sign-out.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::RewardLedger;
use crate::streak::StreakConfig;

/// Fallback user id when the identity provider has none.
pub const UNKNOWN_USER_ID: &str = "unknown";
/// Fallback display name when the identity provider has none.
pub const DEFAULT_USERNAME: &str = "User";

/// Source of the signed-in user, typically an auth provider.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
    fn current_display_name(&self) -> Option<String>;
}

/// Identity fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            display_name: Some(display_name.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn current_display_name(&self) -> Option<String> {
        self.display_name.clone()
    }
}

/// The user an achievement or comment is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub username: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    /// Resolves the current user, substituting the fallbacks for missing
    /// or blank values.
    pub fn from_provider(provider: &dyn IdentityProvider) -> Self {
        let user_id = non_blank(provider.current_user_id())
            .unwrap_or_else(|| UNKNOWN_USER_ID.to_string());
        let username = non_blank(provider.current_display_name())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        Self { user_id, username }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Effective settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub initial_allowance_secs: f64,
    pub tick_interval_secs: u64,
    pub streak: StreakConfig,
    /// Offset used to decide which calendar day "today" is
    pub utc_offset: FixedOffset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_allowance_secs: RewardLedger::DEFAULT_ALLOWANCE_SECS,
            tick_interval_secs: 60,
            streak: StreakConfig::default(),
            utc_offset: Utc.fix(),
        }
    }
}

pub struct Session {
    identity: Box<dyn IdentityProvider>,
    settings: Settings,
}

impl Session {
    pub fn new(identity: impl IdentityProvider + 'static, settings: Settings) -> Self {
        Self {
            identity: Box::new(identity),
            settings,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::from_provider(self.identity.as_ref())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("actor", &self.actor())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_uses_provider_values() {
        let actor = Actor::from_provider(&StaticIdentity::new("u-42", "Sam"));
        assert_eq!(actor, Actor::new("u-42", "Sam"));
    }

    #[test]
    fn actor_falls_back_when_absent() {
        let actor = Actor::from_provider(&StaticIdentity::anonymous());
        assert_eq!(actor.user_id, UNKNOWN_USER_ID);
        assert_eq!(actor.username, DEFAULT_USERNAME);
    }

    #[test]
    fn actor_falls_back_when_blank() {
        let identity = StaticIdentity {
            user_id: Some("u-1".into()),
            display_name: Some("   ".into()),
        };
        let actor = Actor::from_provider(&identity);
        assert_eq!(actor.user_id, "u-1");
        assert_eq!(actor.username, "User");
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.initial_allowance_secs, 14_400.0);
        assert_eq!(settings.tick_interval_secs, 60);
        assert_eq!(settings.streak.daily_goal, 3);
        assert_eq!(settings.utc_offset.local_minus_utc(), 0);
    }
}
