pub mod config;
pub mod feed;
pub mod ledger;
pub mod share;
pub mod streak;
pub mod task;

use serde::Serialize;

use screentime_core::storage::{data_dir, snapshot};

/// Output mode selected by the global `--json` flag.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Prints `value` as pretty JSON in JSON mode, otherwise the text
    /// produced by `text`.
    pub fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

/// Formats seconds as `Hh MMm SSs`.
pub fn format_secs(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    format!("{h}h {m:02}m {s:02}s")
}

pub fn reset(out: Output) -> Result<(), Box<dyn std::error::Error>> {
    let path = snapshot::snapshot_path(&data_dir()?);
    let removed = match std::fs::remove_file(&path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };
    out.emit(&serde_json::json!({ "reset": removed }), || {
        if removed {
            "state reset".to_string()
        } else {
            "nothing to reset".to_string()
        }
    })
}
