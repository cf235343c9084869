use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use crate::cli::SettingsArgs;
use crate::instance::AccountName;
use crate::runner;

pub const DEFAULT_ACCOUNT_PREFIX: &str = "alcove_";
pub const DEFAULT_HOME_ROOT: &str = "/Users";
pub const DEFAULT_SUDOERS_DIR: &str = "/etc/sudoers.d";

/// Where instances live on this machine.
///
/// Resolved once per invocation and passed down explicitly; nothing reads
/// the environment after this point.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Prefix shared by every instance account
    pub account_prefix: String,
    /// User that owns the instances (the one invoking alcove)
    pub host_user: String,
    /// Parent of the instance home directories
    pub home_root: PathBuf,
    /// Directory holding the per-instance sudoers grants
    pub sudoers_dir: PathBuf,
}

impl Settings {
    /// Build settings from CLI/environment overrides.
    ///
    /// The host user defaults to `id -un`.
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        let host_user = match &args.host_user {
            Some(user) => user.clone(),
            None => runner::run_capture("id", &["-un"])
                .context("Could not determine the current user")?,
        };

        let settings = Self {
            account_prefix: args
                .account_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOUNT_PREFIX.to_string()),
            host_user,
            home_root: args
                .home_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_ROOT)),
            sudoers_dir: args
                .sudoers_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SUDOERS_DIR)),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make account names or grants ambiguous.
    pub fn validate(&self) -> Result<()> {
        if !is_safe_token(&self.account_prefix) {
            bail!("Invalid account prefix: {:?}", self.account_prefix);
        }
        if !is_safe_token(&self.host_user) {
            bail!("Invalid host user: {:?}", self.host_user);
        }
        if is_sudoers_keyword(&self.host_user) {
            bail!(
                "Invalid host user: {:?} is a sudoers keyword",
                self.host_user
            );
        }
        if !self.home_root.is_absolute() {
            bail!("Home root must be absolute: {}", self.home_root.display());
        }
        if !self.sudoers_dir.is_absolute() {
            bail!(
                "Sudoers directory must be absolute: {}",
                self.sudoers_dir.display()
            );
        }
        Ok(())
    }

    /// Common prefix of every account owned by the host user.
    pub fn account_base(&self) -> String {
        format!("{}{}_", self.account_prefix, self.host_user)
    }

    /// Home directory of an instance account.
    pub fn home_dir(&self, account: &AccountName) -> PathBuf {
        self.home_root.join(account.as_str())
    }

    #[cfg(test)]
    pub fn for_host(host_user: &str) -> Self {
        Self {
            account_prefix: DEFAULT_ACCOUNT_PREFIX.to_string(),
            host_user: host_user.to_string(),
            home_root: PathBuf::from(DEFAULT_HOME_ROOT),
            sudoers_dir: PathBuf::from(DEFAULT_SUDOERS_DIR),
        }
    }
}

/// Non-empty and limited to `[A-Za-z0-9._-]`.
pub fn is_safe_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// `ALL` means every user to sudo, in any case.
pub fn is_sudoers_keyword(s: &str) -> bool {
    s.eq_ignore_ascii_case("ALL")
}
