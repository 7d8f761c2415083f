use std::io::Write;

use super::pipeline::{Pipeline, PIPE};
use super::redirect;
use super::{Flow, Shell, FAREWELL};
use crate::core::commands::{CdCommand, ExportCommand};
use crate::error::ShellError;
use crate::input::{tokenize, trim_line_ending};

pub(crate) trait CommandHandler {
    fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError>;
}

/// `name=value` with both sides non-empty. Anything after the first `=`
/// belongs to the value.
fn parse_assignment(token: &str) -> Result<(&str, &str), ShellError> {
    match token.split_once('=') {
        Some((name, value)) if !name.is_empty() && !value.is_empty() => Ok((name, value)),
        _ => Err(ShellError::InvalidCommand),
    }
}

impl<W: Write> CommandHandler for Shell<W> {
    fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        let tokens = tokenize(trim_line_ending(line));
        let Some(first) = tokens.first() else {
            return Ok(Flow::Continue);
        };

        if first.contains('=') {
            let (name, value) = parse_assignment(first)?;
            tracing::debug!(name, value, "assignment");
            self.vars.set(name, value);
            return Ok(Flow::Continue);
        }

        let args = &tokens[1..];
        match first.as_str() {
            "exit" => {
                writeln!(self.out, "{}", FAREWELL)?;
                self.out.flush()?;
                return Ok(Flow::Exit);
            }
            "export" => {
                ExportCommand::new().export(args)?;
                return Ok(Flow::Continue);
            }
            // Alone on its line, cd has to move the session itself. The
            // redirect target is still created, relative to the old directory.
            "cd" if !tokens.iter().any(|t| t == PIPE) => {
                let resolved = redirect::resolve(&tokens)?;
                CdCommand::new().change_dir(&resolved.argv[1..])?;
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        let pipeline = Pipeline::parse(&tokens)?;
        tracing::debug!(segments = pipeline.len(), "running pipeline");

        // Workers inherit a copy of anything still buffered here.
        self.out.flush()?;
        std::io::stdout().flush()?;

        let outcome = pipeline.run(&self.vars, &self.executor)?;
        tracing::debug!(
            links = outcome.links,
            processes = outcome.processes.len(),
            failed = outcome.processes.iter().filter(|p| !p.status.success()).count(),
            "pipeline finished"
        );
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("x=5").unwrap(), ("x", "5"));
        assert_eq!(parse_assignment("x==5").unwrap(), ("x", "=5"));
        assert!(matches!(parse_assignment("=5"), Err(ShellError::InvalidCommand)));
        assert!(matches!(parse_assignment("x="), Err(ShellError::InvalidCommand)));
        assert!(matches!(parse_assignment("x"), Err(ShellError::InvalidCommand)));
    }
}
