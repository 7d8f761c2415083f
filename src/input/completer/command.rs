use std::{collections::BTreeSet, env, fs};

use rustyline::completion::Pair;

use crate::core::commands::BUILTIN_NAMES;

/// Completes command words from the built-ins and every file on `PATH`.
#[derive(Clone, Debug)]
pub struct CommandCompleter {
    commands: BTreeSet<String>,
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandCompleter {
    pub fn new() -> Self {
        let mut completer = Self {
            commands: BTreeSet::new(),
        };
        completer.refresh_commands();
        completer
    }

    fn refresh_commands(&mut self) {
        self.commands.clear();
        self.commands
            .extend(BUILTIN_NAMES.iter().map(|name| name.to_string()));
        self.add_path_commands();
    }

    fn add_path_commands(&mut self) {
        let Some(path_var) = env::var_os("PATH") else {
            return;
        };
        for path in env::split_paths(&path_var) {
            let Ok(entries) = fs::read_dir(path) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let is_file = entry
                    .file_type()
                    .map(|t| t.is_file() || t.is_symlink())
                    .unwrap_or(false);
                if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
                    self.commands.insert(name.to_string());
                }
            }
        }
    }

    pub fn complete_command(&self, word: &str) -> Vec<Pair> {
        self.commands
            .range(word.to_string()..)
            .take_while(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}
