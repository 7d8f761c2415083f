use std::ffi::CString;

use nix::errno::Errno;
use nix::unistd;

use super::ProcessError;

/// Replaces the current process image with `argv[0]`, searched on `PATH`.
///
/// Only returns when the replacement failed.
pub fn exec(argv: &[String]) -> ProcessError {
    let Some(program) = argv.first() else {
        return ProcessError::InvalidArgument(String::new());
    };

    let args: Result<Vec<CString>, _> = argv.iter().map(|a| CString::new(a.as_str())).collect();
    let args = match args {
        Ok(args) => args,
        Err(e) => {
            let bad = String::from_utf8_lossy(&e.into_vec()).into_owned();
            return ProcessError::InvalidArgument(bad);
        }
    };

    let err = match unistd::execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(err) => err,
    };

    if err == Errno::ENOENT {
        ProcessError::CommandNotFound(program.clone())
    } else {
        ProcessError::Exec {
            program: program.clone(),
            source: err.into(),
        }
    }
}
