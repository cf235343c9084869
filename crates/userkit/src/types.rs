use std::fmt;

/// Attributes readable from a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    /// Login shell
    UserShell,
    /// Home directory
    NFSHomeDirectory,
}

impl Attribute {
    /// Record key as dscl spells it.
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::UserShell => "UserShell",
            Attribute::NFSHomeDirectory => "NFSHomeDirectory",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parse the output of `dscl . -read /Users/<user> <Key>`.
///
/// dscl prints `Key: value` for short values and `Key:\n value` when the
/// value is long or contains spaces. Continuation lines
/// are joined with a single space.
pub fn parse_attribute(output: &str, attribute: Attribute) -> Option<String> {
    let prefix = format!("{}:", attribute.key());
    let rest = output.trim_start().strip_prefix(&prefix)?;

    let value = rest
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if value.is_empty() { None } else { Some(value) }
}

/// Parse the output of `dscl . list /Users` (one record name per line).
pub fn parse_user_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
