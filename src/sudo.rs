//! sudo credential cache
//!
//! Lifecycle commands run several `sudo` steps in a row. Refreshing the
//! credential cache once up front means the operator types the password a
//! single time, before the plan is shown.

use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};

/// Something that can refresh cached elevation credentials.
pub trait CredentialCache {
    fn refresh(&self) -> Result<()>;
}

/// Refreshes the sudo timestamp with `sudo -v`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SudoCredentialCache;

impl CredentialCache for SudoCredentialCache {
    fn refresh(&self) -> Result<()> {
        log::debug!("Running sudo -v to cache credentials");

        // Inherit stdio so sudo can prompt for the password
        let status = Command::new("sudo")
            .arg("-v")
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .context("Failed to execute sudo")?;

        if !status.success() {
            bail!("sudo -v exited with {status}");
        }
        Ok(())
    }
}

/// Refresh credentials, logging instead of failing.
///
/// A stale cache only means later steps prompt again.
pub fn prewarm(cache: &dyn CredentialCache) {
    if let Err(e) = cache.refresh() {
        log::warn!("failed to run sudo -v error={e:#}");
    }
}
