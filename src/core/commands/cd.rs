use super::{Command, CommandContext, CommandError};
use std::env;
use std::io::Write;
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct CdCommand;

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    fn home_dir() -> Result<PathBuf, CommandError> {
        env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or_else(|| CommandError::ExecutionError("cd: HOME not set".into()))
    }

    /// Changes the working directory of the calling process.
    pub fn change_dir(&self, args: &[String]) -> Result<(), CommandError> {
        let target = match args.first() {
            Some(path) => PathBuf::from(path),
            None => Self::home_dir()?,
        };

        env::set_current_dir(&target).map_err(|e| {
            CommandError::ExecutionError(format!("cd: {}: {}", target.display(), e))
        })
    }
}

impl Command for CdCommand {
    fn execute(
        &self,
        args: &[String],
        _ctx: &CommandContext<'_>,
        _out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        self.change_dir(args)
    }
}

/// Held by every test that moves the test process to another directory.
#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
