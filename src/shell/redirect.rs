use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

pub const TRUNCATE: &str = ">";
pub const APPEND: &str = ">>";

#[derive(Debug)]
pub enum RedirectError {
    MissingTarget,
    Open { path: PathBuf, source: io::Error },
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectError::MissingTarget => write!(f, "Invalid command"),
            RedirectError::Open { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RedirectError {}

/// Where a segment's standard output should go instead of its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub target: PathBuf,
    pub append: bool,
    /// Position of the operator; it and everything after it is not part of
    /// the command's arguments.
    pub index: usize,
}

impl Redirection {
    /// Finds the first `>` or `>>` in `tokens`.
    pub fn parse(tokens: &[String]) -> Result<Option<Self>, RedirectError> {
        let Some(index) = tokens.iter().position(|t| t == TRUNCATE || t == APPEND) else {
            return Ok(None);
        };

        let target = tokens.get(index + 1).ok_or(RedirectError::MissingTarget)?;
        Ok(Some(Self {
            target: PathBuf::from(target),
            append: tokens[index] == APPEND,
            index,
        }))
    }

    pub fn open(&self) -> Result<File, RedirectError> {
        let mut options = OpenOptions::new();
        options.create(true).mode(0o644);
        if self.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        options.open(&self.target).map_err(|source| RedirectError::Open {
            path: self.target.clone(),
            source,
        })
    }
}

/// A segment with its redirection stripped and already opened.
#[derive(Debug)]
pub struct ResolvedCommand {
    pub argv: Vec<String>,
    pub output: Option<File>,
}

pub fn resolve(segment: &[String]) -> Result<ResolvedCommand, RedirectError> {
    match Redirection::parse(segment)? {
        None => Ok(ResolvedCommand {
            argv: segment.to_vec(),
            output: None,
        }),
        Some(redirection) => {
            let output = redirection.open()?;
            Ok(ResolvedCommand {
                argv: segment[..redirection.index].to_vec(),
                output: Some(output),
            })
        }
    }
}
