use std::{fmt, path::PathBuf};

mod loader;
mod paths;

pub use loader::ConfigLoader;
pub use paths::ConfigPaths;

use crate::flags::Flags;

/// Startup configuration: where the rc and history files live and whether
/// the rc file is read at all.
#[derive(Debug, Clone)]
pub struct Config {
    paths: ConfigPaths,
    load_rc: bool,
}

impl Config {
    pub fn new(flags: &Flags) -> Result<Self, ConfigError> {
        let mut paths = ConfigPaths::new()?;
        if let Some(rc_path) = flags.get_value("config") {
            paths = paths.with_rc_path(rc_path);
        }

        Ok(Self::with_paths(paths, !flags.is_set("norc")))
    }

    pub fn with_paths(paths: ConfigPaths, load_rc: bool) -> Self {
        Config { paths, load_rc }
    }

    pub fn history_path(&self) -> &PathBuf {
        &self.paths.history_path
    }

    pub fn rc_path(&self) -> &PathBuf {
        &self.paths.rc_path
    }

    pub fn startup_lines(&self) -> Result<Vec<String>, ConfigError> {
        if !self.load_rc {
            return Ok(Vec::new());
        }
        ConfigLoader::new(&self.paths.rc_path).load_lines()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    HomeDirNotFound,
    Unreadable { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HomeDirNotFound => write!(f, "Home directory not found"),
            ConfigError::Unreadable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_norc_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        fs::write(&paths.rc_path, "x=1\n").unwrap();

        assert!(Config::with_paths(paths.clone(), false)
            .startup_lines()
            .unwrap()
            .is_empty());
        assert_eq!(
            Config::with_paths(paths, true).startup_lines().unwrap(),
            vec!["x=1"]
        );
    }

    #[test]
    fn test_config_flag_overrides_rc_path() {
        let mut flags = Flags::new();
        flags
            .parse(&["--config".to_string(), "/tmp/custom_rc".to_string()])
            .unwrap();

        if let Ok(config) = Config::new(&flags) {
            assert_eq!(config.rc_path(), &PathBuf::from("/tmp/custom_rc"));
        }
    }
}
