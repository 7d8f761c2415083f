use std::borrow::Cow;

use super::{command::CommandCompleter, path::PathCompleter};
use crate::highlight::SyntaxHighlighter;
use crate::shell::pipeline::PIPE;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

/// rustyline helper: completion plus highlighting.
#[derive(Clone)]
pub struct ShellCompleter {
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl Default for ShellCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellCompleter {
    pub fn new() -> Self {
        ShellCompleter {
            command_completer: CommandCompleter::new(),
            path_completer: PathCompleter::new(),
            highlighter: SyntaxHighlighter::new(),
        }
    }

    /// Start of the word under the cursor and whether it names a command.
    fn current_word(line: &str) -> (usize, bool) {
        let start = line.rfind(' ').map_or(0, |space| space + 1);
        let is_command = match line[..start].split(' ').filter(|t| !t.is_empty()).last() {
            None => true,
            Some(previous) => previous == PIPE,
        };
        (start, is_command)
    }

    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line_up_to_cursor = &line[..pos];
        let (start, is_command) = Self::current_word(line_up_to_cursor);
        let word = &line_up_to_cursor[start..];

        let matches = if is_command {
            self.command_completer.complete_command(word)
        } else {
            self.path_completer.complete_path(word)
        };
        (start, matches)
    }
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlighter.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}
