use super::CommandError;
use std::env;

const INVALID: &str = "Invalid command";

/// `export name=value`: sets a variable in the OS environment, where later
/// external commands inherit it. Session variables are not touched.
#[derive(Clone, Debug, Default)]
pub struct ExportCommand;

impl ExportCommand {
    pub fn new() -> Self {
        Self
    }

    fn parse_export(args: &[String]) -> Result<(&str, &str), CommandError> {
        let [arg] = args else {
            return Err(CommandError::InvalidArguments(INVALID.into()));
        };

        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidArguments(INVALID.into()))?;

        if name.is_empty() || name.contains('\0') || value.contains('\0') {
            return Err(CommandError::InvalidArguments(INVALID.into()));
        }

        Ok((name, value))
    }

    pub fn export(&self, args: &[String]) -> Result<(), CommandError> {
        let (name, value) = Self::parse_export(args)?;
        env::set_var(name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_export_simple() -> Result<(), CommandError> {
        ExportCommand::new().export(&args(&["MICROSH_TEST_EXPORT=value"]))?;
        assert_eq!(env::var("MICROSH_TEST_EXPORT").unwrap(), "value");
        Ok(())
    }

    #[test]
    fn test_export_keeps_later_equals_in_value() -> Result<(), CommandError> {
        ExportCommand::new().export(&args(&["MICROSH_TEST_OPTS=a=b"]))?;
        assert_eq!(env::var("MICROSH_TEST_OPTS").unwrap(), "a=b");
        Ok(())
    }

    #[test]
    fn test_export_empty_value_allowed() -> Result<(), CommandError> {
        ExportCommand::new().export(&args(&["MICROSH_TEST_EMPTY="]))?;
        assert_eq!(env::var("MICROSH_TEST_EMPTY").unwrap(), "");
        Ok(())
    }

    #[test]
    fn test_export_error_cases() {
        let cmd = ExportCommand::new();
        for bad in [
            args(&[]),
            args(&["NOEQUALS"]),
            args(&["=value"]),
            args(&["A=1", "B=2"]),
        ] {
            let err = cmd.export(&bad).unwrap_err();
            assert!(matches!(err, CommandError::InvalidArguments(_)));
            assert_eq!(err.to_string(), "Invalid command");
        }
    }
}
