//! Instance orchestrator
//!
//! Drives create/delete for a batch of instance names. Names are processed
//! one at a time, in order; the first error stops the batch. Account
//! existence is checked right before acting on it, and never assumed when
//! the check itself fails.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::bootstrap::{self, Bootstrap};
use crate::config::Settings;
use crate::engine::{self, ExecuteOptions, LifecycleIntent, Step};
use crate::grant;
use crate::instance::{self, AccountName, InstanceName};
use crate::password::PasswordSource;
use crate::runner::Runner;
use crate::sudo::{self, CredentialCache};
use userkit::Directory;

/// Terminal state of one instance in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Something was created, installed or deleted
    Done,
    /// Already in the requested state
    Skipped,
}

/// What happened to one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceReport {
    pub instance: InstanceName,
    pub account: AccountName,
    pub outcome: Outcome,
}

/// Operator streams used for confirmation.
pub struct Console<'a> {
    pub input: &'a mut dyn BufRead,
    pub err: &'a mut dyn Write,
}

/// Options for `create`.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    /// Positional instance arguments (may be empty)
    pub instances: Vec<String>,
    /// `--name` override, empty when unset
    pub name_flag: String,
    /// `--user-password`, when given
    pub password: Option<String>,
    /// Terminal attached: confirm plans and let sysadminctl prompt
    pub tty: bool,
    /// Skip the Homebrew bootstrap
    pub plain: bool,
    /// Packages to install after the bootstrap
    pub tools: Vec<String>,
    /// Also install the default toolchain
    pub default_tools: bool,
}

/// Options for `delete`.
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub instances: Vec<String>,
    pub tty: bool,
}

/// Everything the lifecycle needs from the outside world.
pub struct Orchestrator<'a> {
    pub settings: &'a Settings,
    pub directory: &'a dyn Directory,
    pub runner: &'a dyn Runner,
    pub bootstrap: &'a dyn Bootstrap,
    pub credentials: &'a dyn CredentialCache,
}

impl Orchestrator<'_> {
    /// Create every requested instance that does not exist yet, then make
    /// sure Homebrew and the requested packages are present in each (unless
    /// `plain`).
    pub fn create(
        &self,
        req: &CreateRequest,
        console: &mut Console<'_>,
    ) -> Result<Vec<InstanceReport>> {
        let args: Vec<&str> = if req.instances.is_empty() {
            vec![""]
        } else {
            req.instances.iter().map(String::as_str).collect()
        };
        instance::check_batch(args.len(), &req.name_flag)?;
        let packages = bootstrap::package_list(req.default_tools, &req.tools)?;
        if req.plain && !packages.is_empty() {
            log::warn!("Not installing packages into plain instances");
        }

        sudo::prewarm(self.credentials);

        let opts = ExecuteOptions { confirm: req.tty };
        let mut reports = Vec::with_capacity(args.len());

        for arg in args {
            let name = instance::resolve(arg, &req.name_flag)?;
            let account = name.account(self.settings);
            let mut outcome = Outcome::Skipped;

            if self.account_exists(&account)? {
                log::info!("Already exists instance={name} account={account}");
            } else {
                log::info!("Creating an instance instance={name} account={account}");
                // Before a password gets generated and shown
                grant::build(self.settings, &account)?;
                let password = PasswordSource::select(&account, req.password.clone(), req.tty);
                let intent = LifecycleIntent::Create(password);
                let steps = engine::plan(&intent, self.settings, &account)?;
                self.run(&steps, &opts, console)?;
                outcome = Outcome::Done;
            }

            if !req.plain && self.ensure_bootstrap(&name, &account, &opts, console)? {
                outcome = Outcome::Done;
            }

            if !req.plain && !packages.is_empty() {
                log::info!(
                    "Installing packages instance={name} account={account} packages={}",
                    packages.join(",")
                );
                self.run(
                    &self.bootstrap.package_steps(&account, &packages),
                    &opts,
                    console,
                )?;
                outcome = Outcome::Done;
            }

            reports.push(InstanceReport {
                instance: name,
                account,
                outcome,
            });
        }

        Ok(reports)
    }

    /// Delete every requested instance that exists.
    pub fn delete(
        &self,
        req: &DeleteRequest,
        console: &mut Console<'_>,
    ) -> Result<Vec<InstanceReport>> {
        if req.instances.is_empty() {
            bail!("At least one instance name is required");
        }

        sudo::prewarm(self.credentials);

        let opts = ExecuteOptions { confirm: req.tty };
        let mut reports = Vec::with_capacity(req.instances.len());

        for arg in &req.instances {
            let name = InstanceName::parse(arg)?;
            let account = name.account(self.settings);

            if !self.account_exists(&account)? {
                log::warn!("No such instance instance={name} account={account}");
                reports.push(InstanceReport {
                    instance: name,
                    account,
                    outcome: Outcome::Skipped,
                });
                continue;
            }

            log::info!("Deleting an instance instance={name} account={account}");
            let steps = engine::plan(&LifecycleIntent::Delete, self.settings, &account)?;
            self.run(&steps, &opts, console)?;

            reports.push(InstanceReport {
                instance: name,
                account,
                outcome: Outcome::Done,
            });
        }

        Ok(reports)
    }

    fn account_exists(&self, account: &AccountName) -> Result<bool> {
        self.directory
            .exists(account.as_str())
            .with_context(|| format!("Could not check whether user {account} exists"))
    }

    /// Install Homebrew for `account` if missing. Returns true if installed now.
    fn ensure_bootstrap(
        &self,
        name: &InstanceName,
        account: &AccountName,
        opts: &ExecuteOptions,
        console: &mut Console<'_>,
    ) -> Result<bool> {
        let installed = self
            .bootstrap
            .is_installed(account)
            .context("Could not check for Homebrew")?;
        if installed {
            log::info!("Homebrew is already installed instance={name} account={account}");
            return Ok(false);
        }

        log::debug!("Homebrew is not installed instance={name} account={account}");
        log::info!(
            "Installing Homebrew (If you are seeing an error, do NOT report it to the upstream Homebrew) instance={name} account={account}"
        );
        self.run(&self.bootstrap.install_steps(account), opts, console)?;

        let installed = self
            .bootstrap
            .is_installed(account)
            .context("Could not check for Homebrew")?;
        if !installed {
            bail!("failed to detect Homebrew for {account} after installing it");
        }
        Ok(true)
    }

    fn run(&self, steps: &[Step], opts: &ExecuteOptions, console: &mut Console<'_>) -> Result<()> {
        engine::execute(steps, opts, self.runner, console.input, console.err)?;
        Ok(())
    }
}
