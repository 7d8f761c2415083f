use std::fs::File;
use std::io::{self, Write};
use std::mem::ManuallyDrop;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

use nix::fcntl::{fcntl, FcntlArg, FdFlag, OFlag};
use nix::unistd;

use super::{syscall, ProcessError};

/// One unidirectional channel between two adjacent pipeline stages.
///
/// Both ends are close-on-exec, so the only copies that survive an `exec`
/// are the ones explicitly installed onto stdin or stdout.
#[derive(Debug)]
pub struct PipeLink {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl PipeLink {
    pub fn open() -> Result<Self, ProcessError> {
        let (read, write) =
            unistd::pipe2(OFlag::O_CLOEXEC).map_err(|e| ProcessError::Pipe(e.into()))?;
        Ok(Self { read, write })
    }

    pub fn into_parts(self) -> (OwnedFd, OwnedFd) {
        (self.read, self.write)
    }
}

/// Makes `fd` the process's descriptor number `target`, consuming it.
///
/// A descriptor that already occupies `target` is kept open (with
/// close-on-exec cleared) instead of being duplicated onto itself and
/// then closed.
pub fn install(fd: OwnedFd, target: RawFd) -> Result<(), ProcessError> {
    if fd.as_raw_fd() == target {
        let raw = fd.into_raw_fd();
        fcntl(raw, FcntlArg::F_SETFD(FdFlag::empty())).map_err(|e| ProcessError::Dup(e.into()))?;
        return Ok(());
    }

    syscall(|| unistd::dup2(fd.as_raw_fd(), target)).map_err(|e| ProcessError::Dup(e.into()))?;
    Ok(())
}

/// Unbuffered writer over whatever currently sits on descriptor 1.
///
/// Built-ins running in a worker write through this rather than
/// `std::io::stdout()` so their bytes go to the wired descriptor and never
/// into a buffer inherited from the session.
pub struct RawStdout {
    file: ManuallyDrop<File>,
}

impl RawStdout {
    pub fn new() -> Self {
        Self {
            file: ManuallyDrop::new(unsafe { File::from_raw_fd(libc::STDOUT_FILENO) }),
        }
    }
}

impl Default for RawStdout {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for RawStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_pipe_round_trip() {
        let (read, write) = PipeLink::open().unwrap().into_parts();
        let mut writer = File::from(write);
        writer.write_all(b"through the pipe").unwrap();
        drop(writer);

        let mut reader = File::from(read);
        let mut received = String::new();
        reader.read_to_string(&mut received).unwrap();
        assert_eq!(received, "through the pipe");
    }

    #[test]
    fn test_pipe_ends_are_cloexec() {
        let link = PipeLink::open().unwrap();
        for fd in [link.read.as_raw_fd(), link.write.as_raw_fd()] {
            let flags = FdFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFD).unwrap());
            assert!(flags.contains(FdFlag::FD_CLOEXEC));
        }
    }

    #[test]
    fn test_reader_sees_eof_once_writer_dropped() {
        let link = PipeLink::open().unwrap();
        drop(link.write);

        let mut reader = File::from(link.read);
        let mut buf = Vec::new();
        assert_eq!(reader.read_to_end(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_install_in_place_clears_cloexec() {
        let link = PipeLink::open().unwrap();
        let raw = link.write.as_raw_fd();

        install(link.write, raw).unwrap();
        let flags = FdFlag::from_bits_truncate(fcntl(raw, FcntlArg::F_GETFD).unwrap());
        assert!(!flags.contains(FdFlag::FD_CLOEXEC));
        drop(unsafe { OwnedFd::from_raw_fd(raw) });
    }

    #[test]
    fn test_install_onto_spare_descriptor() {
        let link = PipeLink::open().unwrap();
        let spare = unistd::dup(link.read.as_raw_fd()).unwrap();

        install(link.write, spare).unwrap();
        let mut writer = unsafe { File::from_raw_fd(spare) };
        writer.write_all(b"x").unwrap();
        drop(writer);

        let mut reader = File::from(link.read);
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"x");
    }
}
