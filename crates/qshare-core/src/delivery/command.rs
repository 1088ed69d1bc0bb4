//! External command specification (`program arg arg`).

use std::process::Stdio;
use tokio::process::Command;

/// A program plus leading arguments, parsed from a whitespace-separated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `None` for blank input. No shell quoting is interpreted.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Command with all stdio detached.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_program_and_args() {
        let spec = CommandSpec::parse("  firefox --new-tab ").unwrap();
        assert_eq!(spec, CommandSpec::new("firefox", &["--new-tab"]));
    }

    #[test]
    fn parse_blank_is_none() {
        assert!(CommandSpec::parse("").is_none());
        assert!(CommandSpec::parse("   ").is_none());
    }
}
