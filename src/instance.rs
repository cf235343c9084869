//! Instance identity
//!
//! An instance is addressed by a short name. The name is resolved from the
//! positional argument, the `--name` flag and the `template://` shorthand,
//! then validated before anything touches the OS. Each instance name maps
//! to exactly one account name; the mapping is computed, never stored.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::Settings;

/// Name used when neither a positional argument nor `--name` is given
pub const DEFAULT_INSTANCE: &str = "default";

/// Maximum instance name length in bytes
pub const MAX_NAME_LEN: usize = 32;

const TEMPLATE_SCHEME: &str = "template://";
const DEFAULT_TEMPLATE: &str = "template://default";

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:[_-][A-Za-z0-9]+)*$").expect("instance name pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("instance name must not be empty")]
    Empty,

    #[error("instance name {name:?} is longer than {max} characters")]
    TooLong { name: String, max: usize },

    #[error("instance name {0:?} must not contain a slash")]
    ContainsSlash(String),

    #[error(
        "instance name {0:?} may only contain letters, digits and single '_' or '-' between them"
    )]
    InvalidCharacters(String),

    #[error("value of --name={0:?} must not contain a slash")]
    FlagContainsSlash(String),

    #[error("unknown template: {0:?} (currently, only {DEFAULT_TEMPLATE} is available)")]
    UnknownTemplate(String),

    #[error("instance name {positional:?} and flag --name={flag:?} cannot be specified together")]
    Conflict { positional: String, flag: String },

    #[error("flag --name cannot be used with multiple instances")]
    NameWithMultipleInstances,
}

/// A validated instance name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceName(String);

impl InstanceName {
    /// Validate the structural form of a name.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.contains('/') {
            return Err(NameError::ContainsSlash(name.to_string()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                name: name.to_string(),
                max: MAX_NAME_LEN,
            });
        }
        if !NAME_PATTERN.is_match(name) {
            return Err(NameError::InvalidCharacters(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The OS account backing this instance.
    pub fn account(&self, settings: &Settings) -> AccountName {
        AccountName(format!("{}{}", settings.account_base(), self.0))
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OS account name of an instance, e.g. `alcove_alice_default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the instance name from an account listed in the directory.
    ///
    /// Returns `None` for accounts that do not belong to this host user or
    /// whose suffix is not a valid instance name.
    pub fn instance(account: &str, settings: &Settings) -> Option<InstanceName> {
        account
            .strip_prefix(&settings.account_base())
            .and_then(|rest| InstanceName::parse(rest).ok())
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the instance name from a positional argument and `--name`.
///
/// Either argument may be empty. The result is always validated.
pub fn resolve(positional: &str, name_flag: &str) -> Result<InstanceName, NameError> {
    if name_flag.contains('/') {
        return Err(NameError::FlagContainsSlash(name_flag.to_string()));
    }

    let mut name = if name_flag.is_empty() {
        DEFAULT_INSTANCE
    } else {
        name_flag
    };

    if !positional.is_empty() {
        if positional.starts_with(TEMPLATE_SCHEME) {
            if positional != DEFAULT_TEMPLATE {
                return Err(NameError::UnknownTemplate(positional.to_string()));
            }
        } else if !name_flag.is_empty() && positional != name_flag {
            return Err(NameError::Conflict {
                positional: positional.to_string(),
                flag: name_flag.to_string(),
            });
        } else {
            name = positional;
        }
    }

    InstanceName::parse(name)
}

/// Reject `--name` when more than one instance is requested.
pub fn check_batch(requested: usize, name_flag: &str) -> Result<(), NameError> {
    if requested > 1 && !name_flag.is_empty() {
        return Err(NameError::NameWithMultipleInstances);
    }
    Ok(())
}
