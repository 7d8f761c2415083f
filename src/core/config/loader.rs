use std::{fs, io, path::Path};

use super::ConfigError;

/// Reads the startup file into the lines the session should run.
pub struct ConfigLoader<'a> {
    rc_path: &'a Path,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(rc_path: &'a Path) -> Self {
        Self { rc_path }
    }

    /// A missing file yields no lines.
    pub fn load_lines(&self) -> Result<Vec<String>, ConfigError> {
        let content = match fs::read_to_string(self.rc_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ConfigError::Unreadable {
                    path: self.rc_path.to_path_buf(),
                    source: e,
                })
            }
        };

        Ok(content
            .lines()
            .filter_map(Self::process_line)
            .map(String::from)
            .collect())
    }

    fn process_line(line: &str) -> Option<&str> {
        let line = line.trim_end_matches('\r');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            None
        } else {
            Some(line)
        }
    }
}
