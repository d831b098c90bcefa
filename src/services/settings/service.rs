use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::CalculatorSettings;

const SETTINGS_FILE: &str = "settings.toml";

pub struct SettingsService;

impl SettingsService {
    /// `<config dir>/rrule-calc/settings.toml` for the current user.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rrule-calc").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load and validate settings from a TOML file.
    pub fn load(path: &Path) -> Result<CalculatorSettings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to load settings from {}", path.display()))
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// A missing default file yields default settings; an explicitly given
    /// path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<CalculatorSettings> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                log::debug!("No settings file found, using defaults");
                Ok(CalculatorSettings::default())
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<CalculatorSettings> {
        let settings: CalculatorSettings =
            toml::from_str(contents).context("Failed to parse settings TOML")?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    pub fn save(path: &Path, settings: &CalculatorSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        log::info!("Saved settings to {}", path.display());
        Ok(())
    }
}
