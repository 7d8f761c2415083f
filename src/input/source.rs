use std::io::BufRead;
use std::path::PathBuf;

use rustyline::{error::ReadlineError, history::FileHistory, Editor};

use super::{trim_line_ending, ShellCompleter};
use crate::error::ShellError;

/// Where the session gets its next line from.
pub trait LineSource {
    /// `Ok(None)` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;

    /// Called once when the session ends.
    fn finish(&mut self) -> Result<(), ShellError> {
        Ok(())
    }
}

/// Lines from any reader, without a prompt. Used when stdin is not a
/// terminal.
pub struct ScriptInput<R> {
    reader: R,
}

impl<R: BufRead> ScriptInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ScriptInput<R> {
    /// Bytes that are not valid UTF-8 are replaced rather than failing
    /// the whole session.
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, ShellError> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&line);
        Ok(Some(trim_line_ending(&line).to_string()))
    }
}

/// Line editor for terminals, with completion, highlighting and history.
pub struct InteractiveInput {
    editor: Editor<ShellCompleter, FileHistory>,
    history_path: PathBuf,
    quiet: bool,
}

impl InteractiveInput {
    pub fn new(history_path: PathBuf, quiet: bool) -> Result<Self, ShellError> {
        let mut editor = Editor::<ShellCompleter, FileHistory>::new()?;
        editor.set_helper(Some(ShellCompleter::new()));

        if history_path.exists() {
            if let Err(e) = editor.load_history(&history_path) {
                tracing::warn!("couldn't load history from {}: {}", history_path.display(), e);
            }
        }

        Ok(Self {
            editor,
            history_path,
            quiet,
        })
    }
}

impl LineSource for InteractiveInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                            if !self.quiet {
                                eprintln!("Warning: Couldn't add to history: {}", e);
                            }
                        }
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn finish(&mut self) -> Result<(), ShellError> {
        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::warn!("couldn't save history to {}: {}", self.history_path.display(), e);
        }
        Ok(())
    }
}
