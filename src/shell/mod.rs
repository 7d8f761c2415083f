use std::env;
use std::io::{self, IsTerminal, Write};

mod executor;
pub mod pipeline;
pub mod redirect;

use crate::{
    core::{commands::CommandExecutor, config::Config, vars::VariableStore},
    error::ShellError,
    flags::Flags,
    highlight::SyntaxHighlighter,
    input::{InteractiveInput, LineSource, ScriptInput},
};

pub(crate) use executor::CommandHandler;

pub const FAREWELL: &str = "Good Bye :)";

/// What the session does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<W: Write = io::Stdout> {
    pub(crate) input: Box<dyn LineSource>,
    pub(crate) out: W,
    pub(crate) vars: VariableStore,
    pub(crate) executor: CommandExecutor,
    pub(crate) config: Option<Config>,
    pub(crate) flags: Flags,
    pub(crate) highlighter: SyntaxHighlighter,
}

impl Shell<io::Stdout> {
    /// A session on the process's own stdin and stdout. A terminal gets the
    /// line editor; anything else is read as a plain script.
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let config = Config::new(&flags)?;

        let input: Box<dyn LineSource> = if io::stdin().is_terminal() {
            let quiet = flags.is_set("quiet");
            ctrlc::set_handler(move || {
                if !quiet {
                    println!("\nUse 'exit' to exit the shell");
                }
            })?;
            if !quiet {
                println!("microsh {}. Type 'exit' to leave.", env!("CARGO_PKG_VERSION"));
            }
            Box::new(InteractiveInput::new(config.history_path().clone(), quiet)?)
        } else {
            Box::new(ScriptInput::new(io::stdin().lock()))
        };

        let mut shell = Shell::with_io(flags, input, io::stdout());
        shell.highlighter = SyntaxHighlighter::new();
        shell.config = Some(config);
        Ok(shell)
    }
}

impl<W: Write> Shell<W> {
    /// A session over arbitrary input and output, without a startup file.
    pub fn with_io(flags: Flags, input: Box<dyn LineSource>, out: W) -> Self {
        Shell {
            input,
            out,
            vars: VariableStore::new(),
            executor: CommandExecutor::new(),
            config: None,
            flags,
            highlighter: SyntaxHighlighter::plain(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        if self.run_startup_file()? == Flow::Continue {
            self.command_loop()?;
        }
        self.input.finish()?;
        self.out.flush()?;
        Ok(())
    }

    fn command_loop(&mut self) -> Result<(), ShellError> {
        loop {
            let prompt = self.prompt();
            let Some(line) = self.input.read_line(&prompt)? else {
                return Ok(());
            };

            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => self.report(e)?,
            }
        }
    }

    fn run_startup_file(&mut self) -> Result<Flow, ShellError> {
        let Some(config) = &self.config else {
            return Ok(Flow::Continue);
        };

        let rc_path = config.rc_path().clone();
        let lines = match config.startup_lines() {
            Ok(lines) => lines,
            Err(e) => {
                if !self.flags.is_set("quiet") {
                    tracing::warn!("{}", e);
                }
                return Ok(Flow::Continue);
            }
        };

        tracing::debug!(path = %rc_path.display(), lines = lines.len(), "running startup file");
        for line in lines {
            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(Flow::Exit),
                Err(e) => {
                    tracing::warn!(path = %rc_path.display(), line = %line, "startup line failed");
                    self.report(e)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn prompt(&self) -> String {
        let cwd = env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "?".to_string());
        format!("{} > ", cwd)
    }

    /// Prints a line-level failure. Malformed input gets the plain
    /// `Invalid command` on stdout; everything else goes to stderr.
    pub(crate) fn report(&mut self, err: ShellError) -> Result<(), ShellError> {
        match err {
            ShellError::InvalidCommand => {
                writeln!(self.out, "{}", ShellError::InvalidCommand)?;
                self.out.flush()?;
            }
            other => {
                let message = format!("microsh: {}", other);
                eprintln!("{}", self.highlighter.highlight_error(&message));
            }
        }
        Ok(())
    }
}
