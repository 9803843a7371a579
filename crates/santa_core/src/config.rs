use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Longest lead time a schedule window may ask for (one year).
pub const MAX_LEAD_MINUTES: i64 = 365 * 24 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the store mints event ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// "0", "1", "2", ...
    #[default]
    Sequential,
    /// Random UUID v4 strings.
    Uuid,
}

impl IdStrategy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Some(Self::Sequential),
            "uuid" => Some(Self::Uuid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How new event ids are minted.
    pub id_strategy: IdStrategy,
    /// Accept the same name more than once on a roster.
    pub allow_duplicate_participants: bool,
    /// Full redraws tried before a close gives up.
    pub max_assignment_attempts: u32,
    /// Seed for the assignment RNG. Unset means seeded from OS entropy.
    pub seed: Option<u64>,
    /// Lead time for dialog-created events.
    pub schedule: ScheduleConfig,
}

/// Window for the `scheduled_at` stamp given to events created from the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Shortest lead time in minutes.
    pub lead_minutes_min: i64,
    /// Longest lead time in minutes, at most [`MAX_LEAD_MINUTES`].
    pub lead_minutes_max: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lead_minutes_min: 5,
            lead_minutes_max: 15,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Sequential,
            allow_duplicate_participants: false,
            max_assignment_attempts: 32,
            seed: None,
            schedule: ScheduleConfig::default(),
        }
    }
}

/// `~/.secret-santa`
pub fn santa_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".secret-santa")
}

pub fn default_config_path() -> PathBuf {
    santa_dir().join(CONFIG_FILE_NAME)
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Config {
    /// Load the config the binary runs with.
    ///
    /// An explicit `path` must exist. Without one, `~/.secret-santa/config.toml`
    /// is read if present and defaults are used otherwise. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `SANTA_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strategy) = lookup("SANTA_ID_STRATEGY").and_then(|v| IdStrategy::parse(&v)) {
            self.id_strategy = strategy;
        }
        if let Some(allow) = lookup("SANTA_ALLOW_DUPLICATES") {
            self.allow_duplicate_participants = parse_bool_env(&allow);
        }
        if let Some(attempts) =
            lookup("SANTA_MAX_ASSIGNMENT_ATTEMPTS").and_then(|v| v.trim().parse().ok())
        {
            self.max_assignment_attempts = attempts;
        }
        if let Some(seed) = lookup("SANTA_SEED").and_then(|v| v.trim().parse().ok()) {
            self.seed = Some(seed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_assignment_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_assignment_attempts must be at least 1".to_string(),
            ));
        }
        let schedule = &self.schedule;
        if schedule.lead_minutes_min < 0 || schedule.lead_minutes_min > schedule.lead_minutes_max {
            return Err(ConfigError::Invalid(format!(
                "schedule window {}..={} minutes is empty or negative",
                schedule.lead_minutes_min, schedule.lead_minutes_max
            )));
        }
        if schedule.lead_minutes_max > MAX_LEAD_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "schedule window may not exceed {} minutes, got {}",
                MAX_LEAD_MINUTES, schedule.lead_minutes_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_duplicate_flag_accepts_common_spellings() {
        for value in ["1", "TRUE", " yes ", "Y", "on"] {
            let mut config = Config::default();
            config.apply_env(env(&[("SANTA_ALLOW_DUPLICATES", value)]));
            assert!(config.allow_duplicate_participants, "{value:?}");
        }
    }

    #[test]
    fn test_duplicate_flag_can_be_switched_off() {
        for value in ["0", "false", "off", "", "maybe"] {
            let mut config = Config {
                allow_duplicate_participants: true,
                ..Config::default()
            };
            config.apply_env(env(&[("SANTA_ALLOW_DUPLICATES", value)]));
            assert!(!config.allow_duplicate_participants, "{value:?}");
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert!(!config.allow_duplicate_participants);
        assert_eq!(config.max_assignment_attempts, 32);
        assert_eq!(config.schedule.lead_minutes_min, 5);
        assert_eq!(config.schedule.lead_minutes_max, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "id_strategy = \"uuid\"\nseed = 9\n\n[schedule]\nlead_minutes_max = 60\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.schedule.lead_minutes_min, 5);
        assert_eq!(config.schedule.lead_minutes_max, 60);
        assert_eq!(config.max_assignment_attempts, 32);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_assignment_attempts = \"many\"").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("SANTA_ID_STRATEGY", "UUID"),
            ("SANTA_ALLOW_DUPLICATES", "yes"),
            ("SANTA_MAX_ASSIGNMENT_ATTEMPTS", "4"),
            ("SANTA_SEED", " 123 "),
        ]));
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert!(config.allow_duplicate_participants);
        assert_eq!(config.max_assignment_attempts, 4);
        assert_eq!(config.seed, Some(123));
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("SANTA_ID_STRATEGY", "random"),
            ("SANTA_SEED", "abc"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.max_assignment_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.schedule.lead_minutes_min = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_caps_schedule_window() {
        let mut config = Config::default();
        config.schedule.lead_minutes_max = MAX_LEAD_MINUTES;
        assert!(config.validate().is_ok());

        config.schedule = ScheduleConfig {
            lead_minutes_min: 1_000_000_000_000,
            lead_minutes_max: 1_000_000_000_000,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_rejects_oversized_window_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nlead_minutes_max = 1000000000000\n").unwrap();
        assert!(Config::from_file(&path).is_ok());
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Invalid(_))
        ));
    }
}
