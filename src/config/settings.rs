// src/config/settings.rs
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use ::config::{Config, Environment};
use serde::{Serialize, Deserialize};

pub const ENV_PREFIX: &str = "PROTEIN_SCORE";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    #[default]
    Simulated,
    Vision,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisionSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            max_tokens: 2000,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileSettings {
    pub display_name: String,
    pub tagline: String,
    pub daily_calorie_goal: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            display_name: "Alex".to_string(),
            tagline: "Active user".to_string(),
            daily_calorie_goal: 2500.0,
        }
    }
}

impl ProfileSettings {
    pub fn initials(&self) -> String {
        self.display_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub locale: Locale,
    pub daily_protein_seed: f64,
    pub daily_protein_goal: f64,
    pub reset_daily_total: bool,
    pub analyzer: AnalyzerKind,
    pub simulated_delay_ms: u64,
    pub analysis_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub vision: VisionSettings,
    pub profile: ProfileSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            daily_protein_seed: 45.0,
            daily_protein_goal: 120.0,
            reset_daily_total: false,
            analyzer: AnalyzerKind::Simulated,
            simulated_delay_ms: 2500,
            analysis_timeout_secs: 60,
            max_upload_bytes: 10 * 1024 * 1024,
            vision: VisionSettings::default(),
            profile: ProfileSettings::default(),
        }
    }
}

impl Settings {
    /// `settings.ron` under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("protein-score").join("settings.ron"))
    }

    /// Overlays `PROTEIN_SCORE__*` variables (e.g. `PROTEIN_SCORE__VISION__MODEL`) on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.layered(None)
    }

    fn layered(self, env: Option<HashMap<String, String>>) -> Result<Self> {
        let base = Config::try_from(&self).context("Failed to convert settings")?;

        let merged = Config::builder()
            .add_source(base)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to read environment overrides")?;

        let settings: Settings = merged
            .try_deserialize()
            .context("Failed to parse settings")?;
        settings.validated()
    }

    fn validated(self) -> Result<Self> {
        if !(self.daily_protein_goal > 0.0) {
            return Err(anyhow::anyhow!(
                "daily_protein_goal must be positive, got {}",
                self.daily_protein_goal
            ));
        }
        if self.daily_protein_seed < 0.0 {
            return Err(anyhow::anyhow!(
                "daily_protein_seed must not be negative, got {}",
                self.daily_protein_seed
            ));
        }
        if self.analysis_timeout_secs == 0 {
            return Err(anyhow::anyhow!("analysis_timeout_secs must be at least 1"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("max_upload_bytes must be at least 1"));
        }
        // the simulated analyzer is also the fallback for vision, so this always applies
        if self.simulated_delay() >= self.analysis_timeout() {
            return Err(anyhow::anyhow!(
                "simulated_delay_ms ({}) must be shorter than analysis_timeout_secs ({}s)",
                self.simulated_delay_ms,
                self.analysis_timeout_secs
            ));
        }
        Ok(self)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_match_the_mock_session() {
        let settings = Settings::default();
        assert_eq!(settings.daily_protein_seed, 45.0);
        assert_eq!(settings.daily_protein_goal, 120.0);
        assert_eq!(settings.simulated_delay(), Duration::from_millis(2500));
        assert_eq!(settings.analyzer, AnalyzerKind::Simulated);
        assert!(!settings.reset_daily_total);
    }

    #[test]
    fn no_overrides_round_trips_unchanged() {
        let settings = Settings::default().layered(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn env_overrides_top_level_and_nested_keys() {
        let settings = Settings::default()
            .layered(env(&[
                ("PROTEIN_SCORE__DAILY_PROTEIN_GOAL", "150"),
                ("PROTEIN_SCORE__ANALYZER", "vision"),
                ("PROTEIN_SCORE__LOCALE", "ru"),
                ("PROTEIN_SCORE__VISION__MODEL", "gpt-4o"),
                ("UNRELATED", "ignored"),
            ]))
            .unwrap();

        assert_eq!(settings.daily_protein_goal, 150.0);
        assert_eq!(settings.analyzer, AnalyzerKind::Vision);
        assert_eq!(settings.locale, Locale::Ru);
        assert_eq!(settings.vision.model, "gpt-4o");
        assert_eq!(settings.daily_protein_seed, 45.0);
    }

    #[test]
    fn rejects_non_positive_goal() {
        let result = Settings::default().layered(env(&[("PROTEIN_SCORE__DAILY_PROTEIN_GOAL", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_timeout_and_upload_limit() {
        let zero_timeout = Settings::default().layered(env(&[("PROTEIN_SCORE__ANALYSIS_TIMEOUT_SECS", "0")]));
        assert!(zero_timeout.is_err());

        let zero_limit = Settings::default().layered(env(&[("PROTEIN_SCORE__MAX_UPLOAD_BYTES", "0")]));
        assert!(zero_limit.is_err());
    }

    #[test]
    fn simulated_delay_must_fit_inside_the_timeout() {
        let too_slow = Settings::default().layered(env(&[("PROTEIN_SCORE__SIMULATED_DELAY_MS", "60000")]));
        assert!(too_slow.is_err());

        let settings = Settings::default()
            .layered(env(&[
                ("PROTEIN_SCORE__SIMULATED_DELAY_MS", "70000"),
                ("PROTEIN_SCORE__ANALYSIS_TIMEOUT_SECS", "90"),
            ]))
            .unwrap();
        assert_eq!(settings.simulated_delay(), Duration::from_secs(70));
    }

    #[test]
    fn initials_from_display_name() {
        let profile = ProfileSettings {
            display_name: "alex lee".to_string(),
            ..ProfileSettings::default()
        };
        assert_eq!(profile.initials(), "AL");
    }
}
