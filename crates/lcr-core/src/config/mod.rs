//! Configuration types for lcr.
//!
//! Values come from defaults, then a config file, then `LCR_*` environment
//! variables, in increasing precedence.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LcrError, LcrResult};
use crate::scheduling::{
    IntervalScheduler, ReviewPlanner, DEFAULT_INTERVALS, DEFAULT_MAX_INTERVAL, DEFAULT_RANDOMIZATION,
    DEFAULT_REVIEW_TIMES, MAX_REVIEW_COUNT,
};

/// Interval generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalsConfig {
    /// Base day-offsets, one per review iteration.
    pub base: Vec<u32>,
    /// Relative jitter applied to each interval, in `[0, 1]`.
    pub randomization: f64,
    /// Upper bound on any generated interval.
    pub max_interval: u32,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_INTERVALS.to_vec(),
            randomization: DEFAULT_RANDOMIZATION,
            max_interval: DEFAULT_MAX_INTERVAL,
        }
    }
}

/// Planning defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Reviews generated per registration when no count is given.
    pub review_times: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            review_times: DEFAULT_REVIEW_TIMES,
        }
    }
}

/// Database location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path. A leading `~` expands to the home directory.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let lcr_dir = dirs::home_dir()
            .map(|h| h.join(".lcr"))
            .unwrap_or_else(|| PathBuf::from(".lcr"));

        Self {
            path: lcr_dir.join("lcr.db"),
        }
    }
}

/// Output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// `chrono` format string for dates.
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Main lcr configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcrConfig {
    pub intervals: IntervalsConfig,
    pub defaults: DefaultsConfig,
    pub database: DatabaseConfig,
    pub display: DisplayConfig,
}

impl LcrConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    ///
    /// Files without an extension, such as `.lcrrc`, are read as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> LcrResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str());

        let config = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| LcrError::Configuration(e.to_string()))?,
            Some("json") => serde_json::from_str(&content).map_err(|e| LcrError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") | None => {
                serde_yaml::from_str(&content).map_err(|e| LcrError::Configuration(e.to_string()))?
            }
            Some(other) => {
                return Err(LcrError::Configuration(format!(
                    "Unsupported config file format '.{}'. Use .toml, .json, or .yaml",
                    other
                )))
            }
        };
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Candidate config files, highest priority first.
    pub fn search_paths(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = vec![cwd.join(".lcrrc")];
        if let Some(home) = home {
            paths.push(home.join(".lcrrc"));
            paths.push(home.join(".config").join("lcr").join("config.yaml"));
            paths.push(home.join(".config").join("lcr").join("config.toml"));
        }
        paths
    }

    /// Load the first config file found on the search path, or defaults.
    pub fn discover() -> LcrResult<Self> {
        let cwd = std::env::current_dir()?;
        let home = dirs::home_dir();
        Self::discover_in(&cwd, home.as_deref())
    }

    /// [`discover`](Self::discover) rooted at explicit directories.
    pub fn discover_in(cwd: &Path, home: Option<&Path>) -> LcrResult<Self> {
        match Self::search_paths(cwd, home).into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Full load: explicit file or discovery, then environment, then validation.
    pub fn load(explicit: Option<&Path>) -> LcrResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::discover()?,
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over defaults.
    pub fn from_env() -> LcrResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `LCR_*` environment variables.
    pub fn apply_env(&mut self) -> LcrResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override fields using `lookup` as the environment.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> LcrResult<()> {
        if let Some(path) = lookup("LCR_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("LCR_INTERVALS") {
            self.intervals.base = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u32>()
                        .map_err(|e| LcrError::Configuration(format!("LCR_INTERVALS entry '{}': {}", s, e)))
                })
                .collect::<LcrResult<Vec<_>>>()?;
        }

        if let Some(raw) = lookup("LCR_RANDOMIZATION") {
            self.intervals.randomization = raw
                .trim()
                .parse()
                .map_err(|e| LcrError::Configuration(format!("LCR_RANDOMIZATION '{}': {}", raw, e)))?;
        }

        if let Some(raw) = lookup("LCR_REVIEW_TIMES") {
            self.defaults.review_times = raw
                .trim()
                .parse()
                .map_err(|e| LcrError::Configuration(format!("LCR_REVIEW_TIMES '{}': {}", raw, e)))?;
        }

        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> LcrResult<()> {
        if self.intervals.base.is_empty() {
            return Err(LcrError::Configuration("intervals.base must not be empty".to_string()));
        }
        if self.intervals.base.contains(&0) {
            return Err(LcrError::Configuration(
                "intervals.base entries must be at least 1 day".to_string(),
            ));
        }
        let r = self.intervals.randomization;
        if !r.is_finite() || !(0.0..=1.0).contains(&r) {
            return Err(LcrError::Configuration(format!(
                "intervals.randomization must be between 0 and 1, got {}",
                r
            )));
        }
        if self.intervals.max_interval < 1 {
            return Err(LcrError::Configuration("intervals.max_interval must be at least 1".to_string()));
        }
        if !(1..=MAX_REVIEW_COUNT).contains(&self.defaults.review_times) {
            return Err(LcrError::Configuration(format!(
                "defaults.review_times must be between 1 and {}, got {}",
                MAX_REVIEW_COUNT, self.defaults.review_times
            )));
        }
        let date_format = &self.display.date_format;
        if date_format.trim().is_empty() {
            return Err(LcrError::Configuration("display.date_format must not be empty".to_string()));
        }
        if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LcrError::Configuration(format!(
                "display.date_format '{}' is not a valid strftime format",
                date_format
            )));
        }
        Ok(())
    }

    /// Database path with `~` expanded.
    pub fn db_path(&self) -> PathBuf {
        expand_home(&self.database.path)
    }

    /// Interval scheduler for these settings.
    pub fn scheduler(&self) -> LcrResult<IntervalScheduler> {
        IntervalScheduler::new(self.intervals.base.clone(), self.intervals.randomization)?
            .with_max_interval(self.intervals.max_interval)
    }

    /// Review planner for these settings.
    pub fn planner(&self) -> LcrResult<ReviewPlanner> {
        ReviewPlanner::new(self.scheduler()?, self.defaults.review_times)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> LcrConfigBuilder {
        LcrConfigBuilder::default()
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Builder for LcrConfig.
#[derive(Default)]
pub struct LcrConfigBuilder {
    config: LcrConfig,
}

impl LcrConfigBuilder {
    pub fn base_intervals(mut self, base: Vec<u32>) -> Self {
        self.config.intervals.base = base;
        self
    }

    pub fn randomization(mut self, randomization: f64) -> Self {
        self.config.intervals.randomization = randomization;
        self
    }

    pub fn max_interval(mut self, max_interval: u32) -> Self {
        self.config.intervals.max_interval = max_interval;
        self
    }

    pub fn review_times(mut self, review_times: u32) -> Self {
        self.config.defaults.review_times = review_times;
        self
    }

    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database.path = path.into();
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config.display.date_format = format.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LcrConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LcrConfig::default();
        assert_eq!(config.intervals.base, vec![1, 7, 18, 35]);
        assert!((config.intervals.randomization - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.intervals.max_interval, 365);
        assert_eq!(config.defaults.review_times, 4);
        assert!(config.database.path.ends_with(".lcr/lcr.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".lcrrc");
        std::fs::write(&path, "intervals:\n  base: [2, 5]\ndefaults:\n  review_times: 6\n").unwrap();

        let config = LcrConfig::from_file(&path).unwrap();
        assert_eq!(config.intervals.base, vec![2, 5]);
        assert!((config.intervals.randomization - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.defaults.review_times, 6);
        assert_eq!(config.display.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "[intervals]\nrandomization = 0.0\n\n[database]\npath = \"/tmp/x.db\"\n").unwrap();
        let config = LcrConfig::from_file(&toml_path).unwrap();
        assert_eq!(config.intervals.randomization, 0.0);
        assert_eq!(config.database.path, PathBuf::from("/tmp/x.db"));

        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"display": {"date_format": "%d/%m"}}"#).unwrap();
        let config = LcrConfig::from_file(&json_path).unwrap();
        assert_eq!(config.display.date_format, "%d/%m");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "x=1").unwrap();
        assert!(matches!(LcrConfig::from_file(&path), Err(LcrError::Configuration(_))));
    }

    #[test]
    fn test_discover_prefers_cwd() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let config_dir = home.path().join(".config").join("lcr");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.yaml"), "defaults:\n  review_times: 2\n").unwrap();

        let config = LcrConfig::discover_in(cwd.path(), Some(home.path())).unwrap();
        assert_eq!(config.defaults.review_times, 2);

        std::fs::write(cwd.path().join(".lcrrc"), "defaults:\n  review_times: 9\n").unwrap();
        let config = LcrConfig::discover_in(cwd.path(), Some(home.path())).unwrap();
        assert_eq!(config.defaults.review_times, 9);
    }

    #[test]
    fn test_discover_without_files_uses_defaults() {
        let cwd = tempfile::tempdir().unwrap();
        let config = LcrConfig::discover_in(cwd.path(), None).unwrap();
        assert_eq!(config, LcrConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LcrConfig::default();
        config
            .apply_env_from(env(&[
                ("LCR_DB_PATH", "/data/lcr.db"),
                ("LCR_INTERVALS", "1, 3,9"),
                ("LCR_RANDOMIZATION", "0"),
                ("LCR_REVIEW_TIMES", "3"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/data/lcr.db"));
        assert_eq!(config.intervals.base, vec![1, 3, 9]);
        assert_eq!(config.intervals.randomization, 0.0);
        assert_eq!(config.defaults.review_times, 3);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = LcrConfig::default();
        let err = config.apply_env_from(env(&[("LCR_INTERVALS", "1,x")])).unwrap_err();
        assert!(matches!(err, LcrError::Configuration(_)));
    }

    #[test]
    fn test_validate() {
        assert!(LcrConfig::builder().randomization(1.5).build().validate().is_err());
        assert!(LcrConfig::builder().base_intervals(vec![]).build().validate().is_err());
        assert!(LcrConfig::builder().base_intervals(vec![1, 0]).build().validate().is_err());
        assert!(LcrConfig::builder().review_times(0).build().validate().is_err());
        assert!(LcrConfig::builder().date_format(" ").build().validate().is_err());
        assert!(LcrConfig::builder().review_times(MAX_REVIEW_COUNT + 1).build().validate().is_err());

        let err = LcrConfig::builder().date_format("%Q").build().validate().unwrap_err();
        assert!(matches!(err, LcrError::Configuration(_)));
        assert!(err.to_string().contains("%Q"));
        assert!(LcrConfig::builder().date_format("%Y-%m-%d %").build().validate().is_err());
        assert!(LcrConfig::builder().date_format("%d/%m/%Y").build().validate().is_ok());
    }

    #[test]
    fn test_builder_and_planner() {
        let config = LcrConfig::builder()
            .base_intervals(vec![2, 4])
            .randomization(0.0)
            .max_interval(30)
            .review_times(2)
            .db_path("~/tracking/lcr.db")
            .build();

        let planner = config.planner().unwrap();
        assert_eq!(planner.default_count(), 2);
        assert_eq!(planner.scheduler().max_interval(), 30);
        assert_eq!(planner.scheduler().generate(3).unwrap(), vec![2, 4, 4]);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.db_path(), home.join("tracking").join("lcr.db"));
        }
    }
}
