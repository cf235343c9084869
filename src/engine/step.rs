use shell_escape::escape;
use std::borrow::Cow;
use std::fmt;

/// One process invocation in a command plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
}

impl Step {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run `program args...` through sudo.
    pub fn sudo<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = vec![program.to_string()];
        all.extend(args.into_iter().map(Into::into));
        Self::new("sudo", all)
    }

    /// Shell-escaped command line, suitable for copy-pasting.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| quote(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Quote one word for a POSIX shell.
pub fn quote(s: &str) -> String {
    escape(Cow::Borrowed(s)).into_owned()
}
