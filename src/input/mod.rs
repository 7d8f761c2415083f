mod completer;
mod source;
mod tokenize;

pub use completer::ShellCompleter;
pub use source::{InteractiveInput, LineSource, ScriptInput};
pub use tokenize::{tokenize, trim_line_ending};
