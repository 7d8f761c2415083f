/// Splits a line into tokens on runs of the space character.
///
/// No quoting or escaping: every token is handed on as-is.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Strips the line terminator a line reader leaves behind.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_spaces() {
        assert_eq!(tokenize("echo a b"), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_space_runs_collapse() {
        assert_eq!(tokenize("  ls   -l  |  wc "), vec!["ls", "-l", "|", "wc"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
    }

    #[test]
    fn test_operators_need_surrounding_spaces() {
        assert_eq!(tokenize("echo hi>out"), vec!["echo", "hi>out"]);
    }

    #[test]
    fn test_tabs_are_not_separators() {
        assert_eq!(tokenize("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending("pwd\n"), "pwd");
        assert_eq!(trim_line_ending("pwd\r\n"), "pwd");
        assert_eq!(trim_line_ending("pwd"), "pwd");
    }
}
