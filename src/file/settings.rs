// src/file/settings.rs
use super::FileHandler;
use crate::config::Settings;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};
use tracing::{info, warn};

#[derive(Debug)]
pub struct SettingsFileHandler;

impl SettingsFileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Reads the settings file, writing the defaults first if it does not exist yet.
    /// Environment overrides are applied on top either way.
    pub fn load_or_init(&self, path: Option<&Path>) -> Result<Settings> {
        let file_settings = match path {
            Some(path) if path.exists() => self.load(path)?,
            Some(path) => {
                let defaults = Settings::default();
                match self.save(&defaults, path) {
                    Ok(()) => info!("Wrote default settings to {}", path.display()),
                    Err(e) => warn!("Could not write default settings to {}: {e:#}", path.display()),
                }
                defaults
            }
            None => {
                warn!("No config directory available, using default settings");
                Settings::default()
            }
        };

        file_settings.with_env_overrides()
    }
}

impl FileHandler<Settings> for SettingsFileHandler {
    fn load(&self, path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ron::from_str(&content).context("Failed to parse settings file")
    }

    fn save(&self, data: &Settings, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = ron::ser::to_string_pretty(
            data,
            ron::ser::PrettyConfig::new()
                .new_line("\n".to_string())
                .depth_limit(3)
        )?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Locale;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("protein-score-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("settings.ron");
        let handler = SettingsFileHandler::new();

        let mut settings = Settings::default();
        settings.locale = Locale::Ru;
        settings.daily_protein_goal = 140.0;
        settings.vision.api_key = Some("sk-test".to_string());

        handler.save(&settings, &path).unwrap();
        let loaded = handler.load(&path).unwrap();
        assert_eq!(loaded, settings);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.ron");
        fs::write(&path, "(daily_protein_goal: 100.0, profile: (display_name: \"Sam\"))").unwrap();

        let loaded = SettingsFileHandler::new().load(&path).unwrap();
        assert_eq!(loaded.daily_protein_goal, 100.0);
        assert_eq!(loaded.daily_protein_seed, 45.0);
        assert_eq!(loaded.profile.display_name, "Sam");
        assert_eq!(loaded.profile.daily_calorie_goal, 2500.0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = scratch_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.ron");
        fs::write(&path, "(daily_protein_goal: \"lots\")").unwrap();

        assert!(SettingsFileHandler::new().load(&path).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
