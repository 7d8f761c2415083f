use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

/// Completes argument words (redirection targets included) against the
/// file system.
#[derive(Clone, Debug, Default)]
pub struct PathCompleter;

impl PathCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_path(&self, word: &str) -> Vec<Pair> {
        let (dir, prefix) = Self::split_word(word);
        let search_dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir.as_path()
        };

        let Ok(entries) = fs::read_dir(search_dir) else {
            return Vec::new();
        };

        let mut matches: Vec<Pair> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !name.starts_with(prefix) || (name.starts_with('.') && !prefix.starts_with('.')) {
                    return None;
                }
                let completed = dir.join(&name).to_string_lossy().into_owned();
                Some(if entry.path().is_dir() {
                    Pair {
                        display: format!("{}/", name),
                        replacement: format!("{}/", completed),
                    }
                } else {
                    Pair {
                        display: name,
                        replacement: format!("{} ", completed),
                    }
                })
            })
            .collect();

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }

    /// `"src/ma"` → (`"src"`, `"ma"`); `"src/"` → (`"src/"`, `""`).
    fn split_word(word: &str) -> (PathBuf, &str) {
        match word.rfind('/') {
            Some(slash) => (PathBuf::from(&word[..=slash]), &word[slash + 1..]),
            None => (PathBuf::new(), word),
        }
    }
}
