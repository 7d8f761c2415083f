use std::env;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

use super::{Command, CommandContext, CommandError};

#[derive(Clone, Debug, Default)]
pub struct PwdCommand;

impl PwdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for PwdCommand {
    fn execute(
        &self,
        _args: &[String],
        _ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let cwd = env::current_dir()
            .map_err(|e| CommandError::ExecutionError(format!("pwd: {}", e)))?;
        out.write_all(cwd.as_os_str().as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
