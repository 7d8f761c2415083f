use std::fmt;
use std::io::Write;
use std::os::fd::OwnedFd;

use super::redirect::{self, RedirectError};
use crate::core::commands::{CommandContext, CommandExecutor};
use crate::core::vars::VariableStore;
use crate::process::{self, signal, ChildStatus, Fork, Pid, PipeLink, ProcessError, RawStdout};

pub const PIPE: &str = "|";

#[derive(Debug)]
pub enum PipelineError {
    /// A `|` with nothing on one side of it.
    EmptySegment,
    Process(ProcessError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySegment => write!(f, "syntax error near unexpected token '{}'", PIPE),
            Self::Process(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ProcessError> for PipelineError {
    fn from(err: ProcessError) -> Self {
        PipelineError::Process(err)
    }
}

/// One stage of a pipeline: a command, its arguments and any redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    args: Vec<String>,
}

impl Segment {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn command(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaped {
    pub pid: Pid,
    pub segment: usize,
    pub status: ChildStatus,
}

/// What one invocation did. Statuses stay internal; the user only ever
/// sees a failing stage's own error output.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub links: usize,
    pub processes: Vec<Reaped>,
}

#[derive(Debug)]
pub struct Pipeline {
    segments: Vec<Segment>,
}

impl Pipeline {
    /// Splits `tokens` at every `|`.
    pub fn parse(tokens: &[String]) -> Result<Self, PipelineError> {
        let segments: Vec<Segment> = tokens
            .split(|token| token == PIPE)
            .map(|args| Segment { args: args.to_vec() })
            .collect();

        if segments.iter().any(|segment| segment.args.is_empty()) {
            return Err(PipelineError::EmptySegment);
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Forks one worker per segment, joined by pipes, and waits for all of
    /// them.
    ///
    /// If a pipe or fork fails part way, the remaining segments are not
    /// started; the workers already running are still reaped before the
    /// error is returned.
    pub fn run(
        &self,
        vars: &VariableStore,
        executor: &CommandExecutor,
    ) -> Result<PipelineOutcome, PipelineError> {
        let last = self.segments.len().saturating_sub(1);
        let mut children: Vec<(usize, Pid)> = Vec::with_capacity(self.segments.len());
        let mut links = 0;
        let mut upstream: Option<OwnedFd> = None;
        let mut failure = None;

        for (index, segment) in self.segments.iter().enumerate() {
            let (next_read, write) = if index < last {
                match PipeLink::open() {
                    Ok(link) => {
                        links += 1;
                        let (read, write) = link.into_parts();
                        (Some(read), Some(write))
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            } else {
                (None, None)
            };

            match process::fork() {
                Ok(Fork::Child) => {
                    drop(next_read);
                    let code = run_worker(segment, vars, executor, upstream.take(), write);
                    process::exit_child(code);
                }
                Ok(Fork::Parent(pid)) => {
                    tracing::debug!(%pid, segment = index, command = ?segment.command(), "forked stage");
                    children.push((index, pid));
                    // Stage `index` now holds its own copies of both ends.
                    drop(write);
                    upstream = next_read;
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        drop(upstream);

        let processes = reap(&children);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(PipelineOutcome { links, processes }),
        }
    }
}

fn reap(children: &[(usize, Pid)]) -> Vec<Reaped> {
    let mut reaped = Vec::with_capacity(children.len());
    for &(segment, pid) in children {
        match process::wait(pid) {
            Ok(status) => {
                tracing::debug!(%pid, segment, %status, "reaped stage");
                reaped.push(Reaped { pid, segment, status });
            }
            Err(e) => tracing::warn!(%pid, segment, "could not reap stage: {}", e),
        }
    }
    reaped
}

/// Descriptors a worker puts in place of its standard streams.
struct StreamWiring {
    pipe_in: Option<OwnedFd>,
    pipe_out: Option<OwnedFd>,
    file_out: Option<OwnedFd>,
}

impl StreamWiring {
    /// Installs pipe output, then pipe input, then the redirection file.
    /// The file goes last so it replaces a pipe on stdout.
    fn install(self) -> Result<(), ProcessError> {
        if let Some(fd) = self.pipe_out {
            process::install(fd, libc::STDOUT_FILENO)?;
        }
        if let Some(fd) = self.pipe_in {
            process::install(fd, libc::STDIN_FILENO)?;
        }
        if let Some(fd) = self.file_out {
            process::install(fd, libc::STDOUT_FILENO)?;
        }
        Ok(())
    }
}

/// Body of a forked stage. Returns the worker's exit status.
fn run_worker(
    segment: &Segment,
    vars: &VariableStore,
    executor: &CommandExecutor,
    stdin: Option<OwnedFd>,
    stdout: Option<OwnedFd>,
) -> i32 {
    if let Err(e) = signal::restore_defaults() {
        eprintln!("microsh: {}", e);
        return 1;
    }

    let resolved = match redirect::resolve(segment.args()) {
        Ok(resolved) => resolved,
        Err(RedirectError::MissingTarget) => {
            let _ = writeln!(RawStdout::new(), "Invalid command");
            return 1;
        }
        Err(e) => {
            eprintln!("microsh: {}", e);
            return 1;
        }
    };

    let wiring = StreamWiring {
        pipe_in: stdin,
        pipe_out: stdout,
        file_out: resolved.output.map(OwnedFd::from),
    };
    if let Err(e) = wiring.install() {
        eprintln!("microsh: {}", e);
        return 1;
    }

    let mut out = RawStdout::new();
    match executor.execute(&resolved.argv, &CommandContext { vars }, &mut out) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("microsh: {}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn tokens(line: &str) -> Vec<String> {
        crate::input::tokenize(line)
    }

    fn run_line(line: &str, vars: &VariableStore) -> PipelineOutcome {
        Pipeline::parse(&tokens(line))
            .unwrap()
            .run(vars, &CommandExecutor::new())
            .unwrap()
    }

    fn statuses(outcome: &PipelineOutcome) -> Vec<ChildStatus> {
        outcome.processes.iter().map(|p| p.status).collect()
    }

    fn path_str(path: &Path) -> String {
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_parse_splits_on_pipe() {
        let pipeline = Pipeline::parse(&tokens("ls -l | grep rs | wc -l")).unwrap();
        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline.segments()[0].args(), tokens("ls -l").as_slice());
        assert_eq!(pipeline.segments()[1].command(), Some("grep"));
        assert_eq!(pipeline.segments()[2].args(), tokens("wc -l").as_slice());
    }

    #[test]
    fn test_parse_single_segment() {
        let pipeline = Pipeline::parse(&tokens("echo a > out")).unwrap();
        assert_eq!(pipeline.len(), 1);
        assert!(!pipeline.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for line in ["|", "| cat", "echo a |", "echo a | | cat", "| |"] {
            assert!(
                matches!(Pipeline::parse(&tokens(line)), Err(PipelineError::EmptySegment)),
                "{:?} should be rejected",
                line
            );
        }
    }

    #[test]
    fn test_pipe_inside_token_is_not_a_separator() {
        let pipeline = Pipeline::parse(&tokens("echo a|b")).unwrap();
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_echo_redirect_truncate_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("out.txt"));
        let vars = VariableStore::new();

        let outcome = run_line(&format!("echo a b c > {}", out), &vars);
        assert_eq!(statuses(&outcome), vec![ChildStatus::Exited(0)]);
        assert_eq!(outcome.links, 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "a b c\n");

        run_line(&format!("echo a b c >> {}", out), &vars);
        assert_eq!(fs::read_to_string(&out).unwrap(), "a b c\na b c\n");

        run_line(&format!("echo fresh > {}", out), &vars);
        assert_eq!(fs::read_to_string(&out).unwrap(), "fresh\n");
    }

    #[test]
    fn test_stage_and_link_counts() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("out"));

        let outcome = run_line(&format!("echo hello | cat | cat > {}", out), &VariableStore::new());
        assert_eq!(outcome.processes.len(), 3);
        assert_eq!(outcome.links, 2);
        assert!(outcome.processes.iter().all(|p| p.status.success()));
        let segments: Vec<usize> = outcome.processes.iter().map(|p| p.segment).collect();
        assert_eq!(segments, vec![0, 1, 2]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");
    }

    #[test]
    fn test_large_payload_passes_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        let output = dir.path().join("out.bin");

        // Several times a pipe buffer, with every byte value present.
        let payload: Vec<u8> = (0..1_000_003u32).map(|i| (i * 31 % 256) as u8).collect();
        fs::write(&input, &payload).unwrap();

        let line = format!("cat {} | cat | cat > {}", path_str(&input), path_str(&output));
        let outcome = run_line(&line, &VariableStore::new());

        assert_eq!(outcome.processes.len(), 3);
        assert_eq!(fs::read(&output).unwrap(), payload);
    }

    #[test]
    fn test_redirection_wins_over_pipe() {
        let dir = tempfile::tempdir().unwrap();
        let first = path_str(&dir.path().join("first"));
        let count = path_str(&dir.path().join("count"));

        let line = format!("echo hi > {} | wc -c > {}", first, count);
        let outcome = run_line(&line, &VariableStore::new());

        assert_eq!(outcome.links, 1);
        assert_eq!(fs::read_to_string(&first).unwrap(), "hi\n");
        assert_eq!(fs::read_to_string(&count).unwrap().trim(), "0");
    }

    #[test]
    fn test_variables_reach_workers() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("out"));
        let mut vars = VariableStore::new();
        vars.set("greeting", "hello");

        run_line(&format!("echo $greeting $missing | cat > {}", out), &vars);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello $missing\n");
    }

    #[test]
    fn test_missing_command_fails_only_its_stage() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("out"));

        let line = format!("microsh-no-such-program | echo after > {}", out);
        let outcome = run_line(&line, &VariableStore::new());

        assert_eq!(
            statuses(&outcome),
            vec![ChildStatus::Exited(127), ChildStatus::Exited(0)]
        );
        assert_eq!(fs::read_to_string(&out).unwrap(), "after\n");
    }

    #[test]
    fn test_failed_redirection_open_abandons_command() {
        let line = "echo hi > /nonexistent-dir/microsh/out";
        let outcome = run_line(line, &VariableStore::new());
        assert_eq!(statuses(&outcome), vec![ChildStatus::Exited(1)]);
    }

    #[test]
    fn test_pwd_in_worker() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("pwd"));

        run_line(&format!("pwd > {}", out), &VariableStore::new());
        let printed = fs::read_to_string(&out).unwrap();
        assert!(printed.ends_with('\n'));
        assert!(Path::new(printed.trim_end()).is_absolute());
    }

    #[test]
    fn test_builtin_reads_nothing_from_upstream() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("out"));

        let line = format!("echo ignored | echo replaced > {}", out);
        let outcome = run_line(&line, &VariableStore::new());

        assert_eq!(outcome.processes.len(), 2);
        assert_eq!(fs::read_to_string(&out).unwrap(), "replaced\n");
    }

    #[test]
    fn test_external_filter_between_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let out = path_str(&dir.path().join("out"));

        let line = format!("echo b a c | wc -w | cat > {}", out);
        let outcome = run_line(&line, &VariableStore::new());

        assert_eq!(outcome.links, 2);
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "3");
    }
}
