use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{Error, Result};

pub const DIR_NAME: &str = ".arcflow";
pub const STORE_FILE: &str = "storage.json";
pub const SETTINGS_FILE: &str = "config.toml";

/// Where arcflow keeps its files. Passed around explicitly so tests can point
/// everything at a scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    dir: PathBuf,
}

impl AppPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.arcflow` for the current user.
    pub fn user_default() -> Result<Self> {
        let base = BaseDirs::new().ok_or(Error::NoHomeDirectory)?;
        Ok(Self::new(base.home_dir().join(DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn store_file(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_in_the_data_dir() {
        let paths = AppPaths::new("/tmp/arcflow-test");
        assert_eq!(paths.dir(), Path::new("/tmp/arcflow-test"));
        assert_eq!(
            paths.store_file(),
            PathBuf::from("/tmp/arcflow-test/storage.json")
        );
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/tmp/arcflow-test/config.toml")
        );
    }
}
