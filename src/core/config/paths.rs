use super::ConfigError;
use std::env;
use std::path::{Path, PathBuf};

pub const RC_FILE: &str = ".microshrc";
pub const HISTORY_FILE: &str = ".microsh_history";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: PathBuf,
    pub history_path: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Result<Self, ConfigError> {
        let home = env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::HomeDirNotFound)?;
        Ok(Self::in_dir(&home))
    }

    pub fn in_dir(home: &Path) -> Self {
        ConfigPaths {
            rc_path: home.join(RC_FILE),
            history_path: home.join(HISTORY_FILE),
        }
    }

    pub fn with_rc_path(mut self, rc_path: impl Into<PathBuf>) -> Self {
        self.rc_path = rc_path.into();
        self
    }
}
