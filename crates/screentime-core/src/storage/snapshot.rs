//! JSON persistence for [`StateSnapshot`].
//!
//! The file is versioned so older binaries refuse data they do not
//! understand instead of silently dropping fields.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};
use crate::manager::StateSnapshot;

pub const SNAPSHOT_VERSION: u32 = 1;
pub const SNAPSHOT_FILE: &str = "state.json";

#[derive(Serialize, Deserialize)]
struct StoredSnapshot {
    version: u32,
    #[serde(flatten)]
    state: StateSnapshot,
}

pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(SNAPSHOT_FILE)
}

/// Returns `Ok(None)` when no snapshot has been written yet.
pub fn load(path: &Path) -> Result<Option<StateSnapshot>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::ReadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into())
        }
    };

    let raw: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| StorageError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let found = raw
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0);
    if found == 0 || found > SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found,
            supported: SNAPSHOT_VERSION,
        }
        .into());
    }

    let stored: StoredSnapshot =
        serde_json::from_value(raw).map_err(|e| StorageError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    tracing::debug!(path = %path.display(), tasks = stored.state.tasks.len(), "snapshot loaded");
    Ok(Some(stored.state))
}

/// Writes through a temporary sibling file and renames it into place.
pub fn save(path: &Path, state: &StateSnapshot) -> Result<()> {
    let write_failed = |message: String| StorageError::WriteFailed {
        path: path.to_path_buf(),
        message,
    };
    let stored = StoredSnapshot {
        version: SNAPSHOT_VERSION,
        state: state.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).map_err(|e| write_failed(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| write_failed(e.to_string()))?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::ledger::RewardLedger;
    use crate::streak::StreakState;
    use crate::task::{Task, TaskCategory, TaskDraft};
    use chrono::{TimeZone, Utc};

    fn sample() -> StateSnapshot {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        StateSnapshot {
            tasks: vec![Task::from_draft(
                TaskDraft::new("Stretch", TaskCategory::Wellness).duration_secs(600),
                "t-1".into(),
                now,
            )],
            feed: Vec::new(),
            ledger: RewardLedger::from_parts(15_000.0, 120.0),
            streak: StreakState {
                weekly_streak: 2,
                last_increment_day: None,
            },
            last_tick_at: Some(now),
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&snapshot_path(dir.path())).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path());

        save(&path, &sample()).unwrap();
        assert_eq!(load(&path).unwrap(), Some(sample()));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn huge_credits_still_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path());
        let mut state = sample();
        state.ledger.credit(1e308);
        state.ledger.credit(1e308);

        save(&path, &state).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.ledger.allowance_secs(), f64::MAX);
        assert_eq!(loaded, state);
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path());
        save(&path, &sample()).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        raw["version"] = serde_json::json!(SNAPSHOT_VERSION + 1);
        std::fs::write(&path, raw.to_string()).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn garbage_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path());
        std::fs::write(&path, "not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, CoreError::Storage(StorageError::ReadFailed { .. })));
    }
}
