use std::fmt;

use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult};

use super::{syscall, ProcessError};

pub use nix::unistd::Pid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fork {
    Parent(Pid),
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Exited(i32),
    Signaled(i32),
}

impl ChildStatus {
    pub fn success(&self) -> bool {
        matches!(self, ChildStatus::Exited(0))
    }
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildStatus::Exited(code) => write!(f, "exit status {}", code),
            ChildStatus::Signaled(sig) => write!(f, "killed by signal {}", sig),
        }
    }
}

/// Duplicates the calling process.
///
/// The child must leave through [`exit_child`] so that nothing inherited
/// from the parent (buffered output, destructors, test harness state) runs
/// a second time.
pub fn fork() -> Result<Fork, ProcessError> {
    // The child only rewires descriptors and then execs or calls `_exit`.
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Parent { child }) => Ok(Fork::Parent(child)),
        Ok(ForkResult::Child) => Ok(Fork::Child),
        Err(e) => Err(ProcessError::Fork(e.into())),
    }
}

/// Blocks until `pid` has terminated.
pub fn wait(pid: Pid) -> Result<ChildStatus, ProcessError> {
    loop {
        let status = syscall(|| waitpid(pid, None)).map_err(|e| ProcessError::Wait(e.into()))?;
        match status {
            WaitStatus::Exited(_, code) => return Ok(ChildStatus::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => return Ok(ChildStatus::Signaled(signal as i32)),
            // Stop and continue events are not terminations.
            _ => continue,
        }
    }
}

pub fn exit_child(code: i32) -> ! {
    unsafe { libc::_exit(code) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_and_wait_exit_code() {
        match fork().unwrap() {
            Fork::Child => exit_child(7),
            Fork::Parent(pid) => {
                assert!(pid.as_raw() > 0);
                assert_eq!(wait(pid).unwrap(), ChildStatus::Exited(7));
            }
        }
    }

    #[test]
    fn test_signaled_child() {
        match fork().unwrap() {
            Fork::Child => {
                let _ = nix::sys::signal::raise(nix::sys::signal::Signal::SIGKILL);
                exit_child(0);
            }
            Fork::Parent(pid) => {
                let status = wait(pid).unwrap();
                assert_eq!(status, ChildStatus::Signaled(libc::SIGKILL));
                assert!(!status.success());
            }
        }
    }

    #[test]
    fn test_wait_on_unknown_pid_fails() {
        assert!(matches!(wait(Pid::from_raw(-12345)), Err(ProcessError::Wait(_))));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ChildStatus::Exited(1).to_string(), "exit status 1");
        assert_eq!(ChildStatus::Signaled(9).to_string(), "killed by signal 9");
    }
}
