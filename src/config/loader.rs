use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading the init file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read init file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse init file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings persisted by the front end between runs.
///
/// Command-line options always take precedence over these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InitFileSettings {
    /// UI language, used when translations are enabled.
    pub language: Option<String>,
    pub client: ClientSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub name: Option<String>,
    pub midi_setup: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub welcome_message: Option<String>,
    pub server_info: Option<String>,
    pub directory_server: Option<String>,
    pub recording_dir: Option<PathBuf>,
    pub start_minimized: Option<bool>,
    pub delay_pan: Option<bool>,
}

impl InitFileSettings {
    /// Default init file location.
    ///
    /// Uses `~/.config/koord/koord.toml` on Linux, or the platform
    /// equivalent via `dirs::config_dir()`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("koord").join("koord.toml"))
    }

    /// Load from `path`. A missing file yields default settings.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load the explicit init file, else the default one.
    ///
    /// Settings never stop startup: an unreadable file is reported and
    /// defaults are used.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Self::default(),
            },
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "init file loaded");
                settings
            }
            Err(e) => {
                tracing::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = InitFileSettings::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(settings, InitFileSettings::default());
    }

    #[test]
    fn partial_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("koord.toml");
        fs::write(
            &path,
            "language = \"de\"\n[server]\nwelcome_message = \"Hallo\"\nstart_minimized = true\n",
        )
        .unwrap();
        let settings = InitFileSettings::load_from(&path).unwrap();
        assert_eq!(settings.language.as_deref(), Some("de"));
        assert_eq!(settings.server.welcome_message.as_deref(), Some("Hallo"));
        assert_eq!(settings.server.start_minimized, Some(true));
        assert_eq!(settings.client, ClientSettings::default());
    }

    #[test]
    fn malformed_file_is_an_error_but_load_or_default_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("koord.toml");
        fs::write(&path, "language = [").unwrap();
        assert!(matches!(
            InitFileSettings::load_from(&path),
            Err(SettingsError::ParseError { .. })
        ));
        assert_eq!(
            InitFileSettings::load_or_default(Some(&path)),
            InitFileSettings::default()
        );
    }
}
