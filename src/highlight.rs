use inksac::prelude::*;

use crate::shell::pipeline::PIPE;
use crate::shell::redirect::{APPEND, TRUNCATE};

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colors command words, operators and `$var` tokens. Splitting on
    /// single spaces keeps the typed spacing, so the cursor stays put.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut expect_command = true;
        let parts: Vec<String> = input
            .split(' ')
            .map(|part| {
                if part.is_empty() {
                    return String::new();
                }
                if part == PIPE || part == TRUNCATE || part == APPEND {
                    expect_command = part == PIPE;
                    return Self::operator(part);
                }
                if expect_command {
                    expect_command = false;
                    return Self::command(part);
                }
                if part.starts_with('$') {
                    return Self::variable(part);
                }
                part.to_string()
            })
            .collect();

        parts.join(" ")
    }

    fn command(word: &str) -> String {
        let style = Style::builder().foreground(Color::Cyan).bold().build();
        word.style(style).to_string()
    }

    fn operator(word: &str) -> String {
        let style = Style::builder().foreground(Color::Yellow).build();
        word.style(style).to_string()
    }

    fn variable(word: &str) -> String {
        let style = Style::builder().foreground(Color::Green).build();
        word.style(style).to_string()
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keeps_input() {
        let highlighter = SyntaxHighlighter::plain();
        let line = "echo  $x | wc -c >> out";
        assert_eq!(highlighter.highlight_command(line), line);
        assert_eq!(highlighter.highlight_error("microsh: oops"), "microsh: oops");
    }
}
