use crate::core::commands::CommandError;
use crate::core::config::ConfigError;
use crate::process::ProcessError;
use crate::shell::pipeline::PipelineError;
use crate::shell::redirect::RedirectError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    /// Malformed assignment or session built-in; reported on stdout.
    InvalidCommand,
    CommandError(CommandError),
    PipelineError(PipelineError),
    RedirectError(RedirectError),
    ProcessError(ProcessError),
    ConfigError(ConfigError),
    FlagError(String),
    CtrlC(String),
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ctrlc::Error> for ShellError {
    fn from(err: ctrlc::Error) -> Self {
        ShellError::CtrlC(err.to_string())
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::InvalidArguments(_) => ShellError::InvalidCommand,
            other => ShellError::CommandError(other),
        }
    }
}

impl From<PipelineError> for ShellError {
    fn from(err: PipelineError) -> Self {
        ShellError::PipelineError(err)
    }
}

impl From<RedirectError> for ShellError {
    fn from(err: RedirectError) -> Self {
        match err {
            RedirectError::MissingTarget => ShellError::InvalidCommand,
            other => ShellError::RedirectError(other),
        }
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::ProcessError(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::ConfigError(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "Readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::InvalidCommand => write!(f, "Invalid command"),
            ShellError::CommandError(e) => write!(f, "{}", e),
            ShellError::PipelineError(e) => write!(f, "{}", e),
            ShellError::RedirectError(e) => write!(f, "{}", e),
            ShellError::ProcessError(e) => write!(f, "{}", e),
            ShellError::ConfigError(e) => write!(f, "Config error: {}", e),
            ShellError::FlagError(msg) => write!(f, "Flag error: {}", msg),
            ShellError::CtrlC(msg) => write!(f, "Ctrl-C error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}
