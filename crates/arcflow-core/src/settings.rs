use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// When to emit ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnsiMode {
    /// Only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub ansi: AnsiMode,
    /// Overrides the detected terminal width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    /// Show start/end date columns when the terminal is wide enough.
    pub dates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ansi: AnsiMode::Auto,
            width: None,
            dates: true,
        }
    }
}

impl Settings {
    /// Reads `config.toml`, falling back to defaults for anything it leaves out.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()?;
        Ok(settings)
    }

    pub fn use_ansi(&self, stdout_is_terminal: bool) -> bool {
        match self.ansi {
            AnsiMode::Auto => stdout_is_terminal,
            AnsiMode::Always => true,
            AnsiMode::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.ansi, AnsiMode::Auto);
        assert_eq!(settings.width, None);
        assert!(settings.dates);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ansi = \"never\"\nwidth = 120\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.ansi, AnsiMode::Never);
        assert_eq!(settings.width, Some(120));
        assert!(settings.dates);
    }

    #[test]
    fn test_written_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let wanted = Settings {
            ansi: AnsiMode::Always,
            width: Some(64),
            dates: false,
        };
        std::fs::write(&path, toml::to_string_pretty(&wanted).unwrap()).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), wanted);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ansi = \"sometimes\"\n").unwrap();

        assert!(matches!(Settings::load(&path), Err(Error::Settings(_))));
    }

    #[test]
    fn test_ansi_resolution() {
        let mut settings = Settings::default();
        assert!(settings.use_ansi(true));
        assert!(!settings.use_ansi(false));
        settings.ansi = AnsiMode::Always;
        assert!(settings.use_ansi(false));
        settings.ansi = AnsiMode::Never;
        assert!(!settings.use_ansi(true));
    }
}
