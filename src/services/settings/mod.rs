// Settings service
// Loads and saves the day grid configuration as TOML

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

use crate::models::settings::CalendarSettings;

pub const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file in the platform config directory, or the working
    /// directory when no home directory can be resolved.
    pub fn with_default_path() -> Self {
        let path = match ProjectDirs::from("com", "RustDaySchedule", "DaySchedule") {
            Some(dirs) => dirs.config_dir().join(SETTINGS_FILE_NAME),
            None => {
                log::warn!("Unable to resolve project directory; using current dir for settings");
                PathBuf::from(SETTINGS_FILE_NAME)
            }
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields the defaults.
    pub fn load(&self) -> Result<CalendarSettings, SettingsError> {
        if !self.path.exists() {
            log::debug!("No settings at {}, using defaults", self.path.display());
            return Ok(CalendarSettings::default());
        }

        let data = fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        let settings: CalendarSettings = toml::from_str(&data)?;
        settings.validate().map_err(SettingsError::Invalid)?;

        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error.
    pub fn load_or_default(&self) -> CalendarSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {}, using defaults", e);
                CalendarSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &CalendarSettings) -> Result<(), SettingsError> {
        settings.validate().map_err(SettingsError::Invalid)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let data = toml::to_string_pretty(settings)?;
        fs::write(&self.path, data).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Settings saved to {}", self.path.display());

        Ok(())
    }
}
