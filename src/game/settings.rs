use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::error::StoreError;

pub const DEFAULT_BOARD_SLOTS: usize = 16;
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);
pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_millis(500);
/// The timer counts tenths of a second, so the tick period is not configurable.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_board_slots")]
    pub board_slots: usize,

    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_time_limit", rename = "time_limit_seconds")]
    pub time_limit: Duration,

    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_mismatch_delay", rename = "mismatch_delay_ms")]
    pub mismatch_delay: Duration,
}

fn default_version() -> u32 {
    1
}
fn default_board_slots() -> usize {
    DEFAULT_BOARD_SLOTS
}
fn default_time_limit() -> Duration {
    DEFAULT_TIME_LIMIT
}
fn default_mismatch_delay() -> Duration {
    DEFAULT_MISMATCH_DELAY
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 1,
            board_slots: DEFAULT_BOARD_SLOTS,
            time_limit: DEFAULT_TIME_LIMIT,
            mismatch_delay: DEFAULT_MISMATCH_DELAY,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to (and writing) the defaults when the
    /// file is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(e) => warn!(target: "settings", "Ignoring invalid {:?}: {}", path, e),
            }
        }
        let default = Settings::default();
        if let Err(e) = default.save_to(path) {
            warn!(target: "settings", "Could not write default settings: {}", e);
        }
        default
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn migrate(&mut self) {
        if self.version == 0 {
            info!(target: "settings", "Migrating settings from version 0");
            self.version = 1;
        }
    }

    /// Number of pairs on the board.
    pub fn with_board_slots(board_slots: usize) -> Self {
        Settings {
            board_slots,
            ..Settings::default()
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        let value = std::env::var("SEED").ok()?;
        match value.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(target: "settings", "Ignoring SEED={:?}; not a u64", value);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("animal-match-{}", Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"board_slots": 12}"#).unwrap();
        assert_eq!(settings.board_slots, 12);
        assert_eq!(settings.time_limit, DEFAULT_TIME_LIMIT);
        assert_eq!(settings.mismatch_delay, DEFAULT_MISMATCH_DELAY);
    }

    #[test]
    fn test_durations_use_readable_units() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["time_limit_seconds"], 60);
        assert_eq!(json["mismatch_delay_ms"], 500);
    }

    #[test]
    fn test_load_writes_defaults_then_reads_back() {
        let path = scratch_path();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, Settings::default());
        assert!(path.exists());

        let custom = Settings::with_board_slots(20);
        custom.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), custom);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_with_board_slots_keeps_other_defaults() {
        let settings = Settings::with_board_slots(4);
        assert_eq!(settings.board_slots, 4);
        assert_eq!(settings.time_limit, DEFAULT_TIME_LIMIT);
        assert_eq!(settings.mismatch_delay, DEFAULT_MISMATCH_DELAY);
        let parsed: Settings = serde_json::from_str(r#"{ "board_slots": 4 }"#).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    #[serial]
    fn test_seed_from_env() {
        std::env::set_var("SEED", "1234");
        assert_eq!(Settings::seed_from_env(), Some(1234));
        std::env::set_var("SEED", "not-a-number");
        assert_eq!(Settings::seed_from_env(), None);
        std::env::remove_var("SEED");
        assert_eq!(Settings::seed_from_env(), None);
    }

    #[test]
    #[serial]
    fn test_debug_mode_from_env() {
        std::env::set_var("DEBUG", "1");
        assert!(Settings::is_debug_mode());
        std::env::remove_var("DEBUG");
        assert!(!Settings::is_debug_mode());
    }
}
