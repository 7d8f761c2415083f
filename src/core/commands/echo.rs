use std::borrow::Cow;
use std::io::Write;

use super::{Command, CommandContext, CommandError};
use crate::core::vars::VariableStore;

/// Resolves a `$name` token against the session variables.
///
/// Unknown names, and tokens that do not start with `$`, come back
/// unchanged.
pub fn expand_token<'a>(token: &'a str, vars: &'a VariableStore) -> Cow<'a, str> {
    match token.strip_prefix('$').and_then(|name| vars.get(name)) {
        Some(value) => Cow::Borrowed(value),
        None => Cow::Borrowed(token),
    }
}

#[derive(Clone, Debug, Default)]
pub struct EchoCommand;

impl EchoCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for EchoCommand {
    fn execute(
        &self,
        args: &[String],
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let words: Vec<Cow<'_, str>> = args.iter().map(|arg| expand_token(arg, ctx.vars)).collect();
        writeln!(out, "{}", words.join(" "))?;
        Ok(())
    }
}
