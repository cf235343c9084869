//! dscl backend implementation.
//!
//! Uses Apple's `dscl` CLI against the local node (`.`). Only read
//! operations are issued; account mutation happens elsewhere through
//! `sysadminctl`.

use std::process::Command;

use crate::error::{Error, Result};
use crate::types::{Attribute, parse_attribute, parse_user_list};

use super::Directory;

/// Backend implementation using Apple's dscl CLI.
///
/// ## Supported operations
///
/// - `dscl . list /Users` - List user record names
/// - `dscl . -read /Users/<user> <Key>` - Read one attribute
#[derive(Debug, Clone)]
pub struct DsclBackend {
    program: String,
}

impl Default for DsclBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DsclBackend {
    /// Create a backend that runs `dscl` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: "dscl".to_string(),
        }
    }

    /// Run dscl against the local node and return stdout.
    fn run_dscl(&self, args: &[&str]) -> Result<String> {
        let command = format!("{} . {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .arg(".")
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::DsclNotFound
                } else {
                    Error::Io(e)
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(Error::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Directory for DsclBackend {
    fn users(&self) -> Result<Vec<String>> {
        let out = self.run_dscl(&["list", "/Users"])?;
        Ok(parse_user_list(&out))
    }

    fn read_attribute(&self, user: &str, attribute: Attribute) -> Result<String> {
        let record = format!("/Users/{user}");
        let out = self.run_dscl(&["-read", &record, attribute.key()])?;

        parse_attribute(&out, attribute).ok_or_else(|| Error::MissingAttribute {
            user: user.to_string(),
            attribute: attribute.to_string(),
        })
    }
}
