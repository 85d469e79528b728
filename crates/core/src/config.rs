use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine tunables. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tick_interval_ms: u64,
    pub initial_duration_ms: u64,
    /// Rounding boundary for automatic growth, and the short menu step.
    pub duration_step_ms: u64,
    pub duration_extend_ms: u64,
    pub min_shrunk_duration_ms: u64,
    pub speed_presets: Vec<f64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            initial_duration_ms: 30_000,
            duration_step_ms: 30_000,
            duration_extend_ms: 60_000,
            min_shrunk_duration_ms: 60_000,
            speed_presets: vec![1.0, 2.0],
        }
    }
}

impl EditorConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("isound").join("config.toml"))
    }

    /// Load from the user config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Durations must be positive multiples of the step, so growth always
    /// lands on a selectable value and every offered candidate validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".to_string()));
        }
        let step = self.duration_step_ms;
        if step == 0 {
            return Err(ConfigError::Invalid("duration_step_ms must be positive".to_string()));
        }
        for (name, value) in [
            ("initial_duration_ms", self.initial_duration_ms),
            ("duration_extend_ms", self.duration_extend_ms),
            ("min_shrunk_duration_ms", self.min_shrunk_duration_ms),
        ] {
            if value == 0 || value % step != 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} = {value} is not a positive multiple of duration_step_ms = {step}"
                )));
            }
        }
        if let Some(speed) = self
            .speed_presets
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "speed preset {speed} must be positive and finite"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.initial_duration_ms, 30_000);
        assert_eq!(config.speed_presets, vec![1.0, 2.0]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str("tick_interval_ms = 50\n").expect("parse");
        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.duration_step_ms, 30_000);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = EditorConfig::from_toml_str("tick_interval_ms = \"fast\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let result = EditorConfig::from_toml_str("duration_step_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_extend_off_step_is_rejected() {
        let result = EditorConfig::from_toml_str("duration_extend_ms = 45000\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_min_shrunk_off_step_is_rejected() {
        let result = EditorConfig::from_toml_str("min_shrunk_duration_ms = 50000\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_initial_duration_off_step_is_rejected() {
        let result = EditorConfig::from_toml_str("initial_duration_ms = 20000\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_tick_interval_is_rejected() {
        let result = EditorConfig::from_toml_str("tick_interval_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_positive_speed_preset_is_rejected() {
        for presets in ["[1.0, 0.0]", "[-2.0]", "[1.0, nan]", "[inf]"] {
            let result = EditorConfig::from_toml_str(&format!("speed_presets = {presets}\n"));
            assert!(
                matches!(result, Err(ConfigError::Invalid(_))),
                "{presets} should be rejected"
            );
        }
    }

    #[test]
    fn test_custom_step_with_matching_durations() {
        let config = EditorConfig::from_toml_str(
            "duration_step_ms = 15000\nduration_extend_ms = 45000\nmin_shrunk_duration_ms = 15000\n",
        )
        .expect("valid");
        assert_eq!(config.duration_extend_ms, 45_000);
    }

    #[test]
    fn test_invalid_file_falls_back_through_load_from() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "duration_step_ms = 0").unwrap();
        let result = EditorConfig::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "speed_presets = [1.0, 1.5, 2.0]").unwrap();
        writeln!(file, "initial_duration_ms = 60000").unwrap();

        let config = EditorConfig::load_from(file.path()).expect("load");
        assert_eq!(config.speed_presets, vec![1.0, 1.5, 2.0]);
        assert_eq!(config.initial_duration_ms, 60_000);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = EditorConfig::load_from(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
