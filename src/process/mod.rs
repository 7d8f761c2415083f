use std::fmt;
use std::io;

use nix::errno::Errno;

pub mod exec;
pub mod fd;
pub mod fork;
pub mod signal;

pub use exec::exec;
pub use fd::{install, PipeLink, RawStdout};
pub use fork::{exit_child, fork, wait, ChildStatus, Fork, Pid};

/// Repeats `f` for as long as it is interrupted by a signal.
pub(crate) fn syscall<F, T>(mut f: F) -> nix::Result<T>
where
    F: FnMut() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => continue,
            result => return result,
        }
    }
}

#[derive(Debug)]
pub enum ProcessError {
    Pipe(io::Error),
    Fork(io::Error),
    Wait(io::Error),
    Dup(io::Error),
    CommandNotFound(String),
    Exec { program: String, source: io::Error },
    InvalidArgument(String),
    SignalError(String),
}

impl ProcessError {
    /// Exit status a worker reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::CommandNotFound(_) => 127,
            ProcessError::Exec { .. } | ProcessError::InvalidArgument(_) => 126,
            _ => 1,
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Pipe(e) => write!(f, "pipe failed: {}", e),
            ProcessError::Fork(e) => write!(f, "fork failed: {}", e),
            ProcessError::Wait(e) => write!(f, "wait failed: {}", e),
            ProcessError::Dup(e) => write!(f, "dup2 failed: {}", e),
            ProcessError::CommandNotFound(cmd) => write!(f, "{}: command not found", cmd),
            ProcessError::Exec { program, source } => write!(f, "{}: {}", program, source),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a nul byte: {:?}", arg)
            }
            ProcessError::SignalError(msg) => write!(f, "signal error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Pipe(e)
            | ProcessError::Fork(e)
            | ProcessError::Wait(e)
            | ProcessError::Dup(e)
            | ProcessError::Exec { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
