use crate::process::ProcessError;

use libc::{sighandler_t, signal, SIGINT, SIGPIPE, SIG_DFL, SIG_ERR};

/// Puts SIGINT and SIGPIPE back to their default dispositions.
///
/// The Rust runtime ignores SIGPIPE and the session installs its own
/// SIGINT handler; a worker must not pass either on to the program it
/// execs, or `yes | head` would never see the broken pipe.
pub fn restore_defaults() -> Result<(), ProcessError> {
    for sig in [SIGINT, SIGPIPE] {
        let previous = unsafe { signal(sig, SIG_DFL as sighandler_t) };
        if previous == SIG_ERR {
            return Err(ProcessError::SignalError(format!(
                "failed to reset signal {}: {}",
                sig,
                std::io::Error::last_os_error()
            )));
        }
    }
    Ok(())
}
