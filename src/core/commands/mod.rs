use std::collections::BTreeMap;
use std::io::{self, Write};

mod cd;
mod echo;
mod export;
mod pwd;

pub use cd::CdCommand;
#[cfg(test)]
pub(crate) use cd::CWD_LOCK;
pub use echo::{expand_token, EchoCommand};
pub use export::ExportCommand;
pub use pwd::PwdCommand;

use crate::core::vars::VariableStore;
use crate::process::{self, ProcessError};

/// Every name the shell handles itself, session-level ones included.
pub const BUILTIN_NAMES: &[&str] = &["cd", "echo", "exit", "export", "pwd"];

#[derive(Debug)]
pub enum CommandError {
    InvalidArguments(String),
    ExecutionError(String),
    IoError(io::Error),
    ProcessError(ProcessError),
}

impl CommandError {
    /// Exit status of a worker whose command failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::ProcessError(e) => e.exit_code(),
            _ => 1,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidArguments(msg) => write!(f, "{}", msg),
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
            CommandError::ProcessError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::ProcessError(err)
    }
}

/// What a built-in can see of the session that launched it.
pub struct CommandContext<'a> {
    pub vars: &'a VariableStore,
}

pub trait Command {
    fn execute(
        &self,
        args: &[String],
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CommandError>;
}

#[derive(Clone, Debug)]
enum CommandType {
    Echo(EchoCommand),
    Pwd(PwdCommand),
    Cd(CdCommand),
}

impl Command for CommandType {
    fn execute(
        &self,
        args: &[String],
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match self {
            CommandType::Echo(cmd) => cmd.execute(args, ctx, out),
            CommandType::Pwd(cmd) => cmd.execute(args, ctx, out),
            CommandType::Cd(cmd) => cmd.execute(args, ctx, out),
        }
    }
}

/// Runs one cleaned argument vector: a built-in in this process, anything
/// else by replacing the process image.
#[derive(Clone, Debug)]
pub struct CommandExecutor {
    commands: BTreeMap<&'static str, CommandType>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("echo", CommandType::Echo(EchoCommand::new()));
        commands.insert("pwd", CommandType::Pwd(PwdCommand::new()));
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        Self { commands }
    }

    /// Runs `argv` to completion.
    ///
    /// For an external program this only returns on failure, so it must
    /// only be called inside a forked worker.
    pub fn execute(
        &self,
        argv: &[String],
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let Some((name, args)) = argv.split_first() else {
            return Ok(());
        };

        match self.commands.get(name.as_str()) {
            Some(cmd) => {
                cmd.execute(args, ctx, out)?;
                out.flush()?;
                Ok(())
            }
            None => Err(process::exec(argv).into()),
        }
    }
}
