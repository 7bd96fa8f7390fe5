use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_FIXED_SLOTS: usize = 6;
pub const DEFAULT_GROWING_SLOTS: usize = 8;
pub const DEFAULT_CONTENT_GOAL: usize = 49;
pub const DEFAULT_REEL_GOAL: usize = 7;
pub const DEFAULT_DAILY_GOAL: usize = 5;
pub const DEFAULT_WINDOW_DAYS: usize = 7;
pub const DEFAULT_SAVE_DELAY_MS: u64 = 1000;

/// How a day's slot array behaves once its last slot fills up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotLayout {
    /// A fixed number of slots per day.
    #[default]
    Fixed,
    /// Always keeps one trailing empty slot to drop onto.
    Growing,
}

impl fmt::Display for SlotLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotLayout::Fixed => write!(f, "fixed"),
            SlotLayout::Growing => write!(f, "growing"),
        }
    }
}

impl FromStr for SlotLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(SlotLayout::Fixed),
            "growing" | "grow" => Ok(SlotLayout::Growing),
            other => Err(format!(
                "unknown slot layout `{}` (expected fixed or growing)",
                other
            )),
        }
    }
}

/// The slot rules mutations need, resolved from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    pub min_slots: usize,
    pub growing: bool,
}

impl SlotPolicy {
    pub fn fixed(min_slots: usize) -> Self {
        Self {
            min_slots,
            growing: false,
        }
    }

    pub fn growing(min_slots: usize) -> Self {
        Self {
            min_slots,
            growing: true,
        }
    }
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_FIXED_SLOTS)
    }
}

/// Targets used by the metrics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goals {
    pub content: usize,
    pub reels: usize,
    pub daily: usize,
    pub window_days: usize,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT_GOAL,
            reels: DEFAULT_REEL_GOAL,
            daily: DEFAULT_DAILY_GOAL,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Configuration for the board, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardConfig {
    #[serde(default)]
    pub slot_layout: SlotLayout,

    /// Minimum slots per day; unset means the layout's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots_per_day: Option<usize>,

    #[serde(default = "default_content_goal")]
    pub content_goal: usize,

    #[serde(default = "default_reel_goal")]
    pub reel_goal: usize,

    #[serde(default = "default_daily_goal")]
    pub daily_goal: usize,

    #[serde(default = "default_window_days")]
    pub window_days: usize,

    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,

    /// Location of the shared board document; unset keeps everything local
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_path: Option<PathBuf>,
}

fn default_content_goal() -> usize {
    DEFAULT_CONTENT_GOAL
}

fn default_reel_goal() -> usize {
    DEFAULT_REEL_GOAL
}

fn default_daily_goal() -> usize {
    DEFAULT_DAILY_GOAL
}

fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}

fn default_save_delay_ms() -> u64 {
    DEFAULT_SAVE_DELAY_MS
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            slot_layout: SlotLayout::Fixed,
            slots_per_day: None,
            content_goal: DEFAULT_CONTENT_GOAL,
            reel_goal: DEFAULT_REEL_GOAL,
            daily_goal: DEFAULT_DAILY_GOAL,
            window_days: DEFAULT_WINDOW_DAYS,
            save_delay_ms: DEFAULT_SAVE_DELAY_MS,
            remote_path: None,
        }
    }
}

pub const CONFIG_KEYS: &[&str] = &[
    "slot-layout",
    "slots-per-day",
    "content-goal",
    "reel-goal",
    "daily-goal",
    "window-days",
    "save-delay-ms",
    "remote-path",
];

impl BoardConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BoardError::Io)?;
        let config: BoardConfig =
            serde_json::from_str(&content).map_err(BoardError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BoardError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BoardError::Serialization)?;
        fs::write(config_path, content).map_err(BoardError::Io)?;
        Ok(())
    }

    pub fn min_slots(&self) -> usize {
        self.slots_per_day.unwrap_or(match self.slot_layout {
            SlotLayout::Fixed => DEFAULT_FIXED_SLOTS,
            SlotLayout::Growing => DEFAULT_GROWING_SLOTS,
        })
    }

    pub fn slot_policy(&self) -> SlotPolicy {
        match self.slot_layout {
            SlotLayout::Fixed => SlotPolicy::fixed(self.min_slots()),
            SlotLayout::Growing => SlotPolicy::growing(self.min_slots()),
        }
    }

    pub fn goals(&self) -> Goals {
        Goals {
            content: self.content_goal,
            reels: self.reel_goal,
            daily: self.daily_goal,
            window_days: self.window_days,
        }
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "slot-layout" => Some(self.slot_layout.to_string()),
            "slots-per-day" => Some(self.min_slots().to_string()),
            "content-goal" => Some(self.content_goal.to_string()),
            "reel-goal" => Some(self.reel_goal.to_string()),
            "daily-goal" => Some(self.daily_goal.to_string()),
            "window-days" => Some(self.window_days.to_string()),
            "save-delay-ms" => Some(self.save_delay_ms.to_string()),
            "remote-path" => Some(
                self.remote_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string()),
            ),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "slot-layout" => self.slot_layout = value.parse()?,
            "slots-per-day" => self.slots_per_day = Some(parse_positive(key, value)?),
            "content-goal" => self.content_goal = parse_positive(key, value)?,
            "reel-goal" => self.reel_goal = parse_positive(key, value)?,
            "daily-goal" => self.daily_goal = parse_positive(key, value)?,
            "window-days" => self.window_days = parse_positive(key, value)?,
            "save-delay-ms" => {
                self.save_delay_ms = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("{} expects a number of milliseconds", key))?
            }
            "remote-path" => {
                let trimmed = value.trim();
                self.remote_path = if trimmed.is_empty() || trimmed == "none" {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> std::result::Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{} expects a positive whole number", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.slot_layout, SlotLayout::Fixed);
        assert_eq!(config.min_slots(), 6);
        assert_eq!(config.goals(), Goals::default());
        assert_eq!(config.save_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_growing_layout_defaults_to_eight_slots() {
        let mut config = BoardConfig::default();
        config.set("slot-layout", "growing").unwrap();
        assert_eq!(config.slot_policy(), SlotPolicy::growing(8));
    }

    #[test]
    fn test_explicit_slot_count_wins() {
        let mut config = BoardConfig::default();
        config.set("slots-per-day", "4").unwrap();
        assert_eq!(config.slot_policy(), SlotPolicy::fixed(4));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = BoardConfig::default();
        assert!(config.set("daily-goal", "0").is_err());
        assert!(config.set("daily-goal", "many").is_err());
        assert!(config.set("slot-layout", "spiral").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_remote_path_can_be_cleared() {
        let mut config = BoardConfig::default();
        config.set("remote-path", "/srv/board.json").unwrap();
        assert_eq!(config.get("remote-path").unwrap(), "/srv/board.json");
        config.set("remote-path", "none").unwrap();
        assert_eq!(config.remote_path, None);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::load(dir.path().join("nope")).unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = BoardConfig::default();
        config.set("daily-goal", "3").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = BoardConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.daily_goal, 3);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"slot_layout": "growing"}"#).unwrap();
        assert_eq!(config.slot_layout, SlotLayout::Growing);
        assert_eq!(config.content_goal, 49);
        assert_eq!(config.reel_goal, 7);
    }
}
