//! Homebrew bootstrap inside an instance account
//!
//! Homebrew is installed under `~/homebrew` of the instance account, as that
//! account, so it never needs elevated privileges of its own.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::engine::Step;
use crate::engine::step::quote;
use crate::instance::AccountName;
use crate::runner::{RunError, Runner};

const TARBALL_URL: &str = "https://github.com/Homebrew/brew/tarball/master";

/// Formulae installed by `create --default-tools`.
pub const DEFAULT_TOOLS: &[&str] = &["git", "gh", "python@3.12", "uv", "bun"];

/// Formula or `tap/formula` names, e.g. `python@3.12`, `oven-sh/bun/bun`.
static PACKAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9@._+-]*(?:/[A-Za-z0-9][A-Za-z0-9@._+-]*){0,2}$")
        .expect("package pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackageError {
    #[error("invalid package name {0:?}")]
    Invalid(String),
}

/// Packages to install: the defaults when asked for, then `extra`.
///
/// Blank entries are dropped and duplicates keep their first position.
pub fn package_list(with_defaults: bool, extra: &[String]) -> Result<Vec<String>, PackageError> {
    let defaults = if with_defaults { DEFAULT_TOOLS } else { &[] };

    let mut packages: Vec<String> = Vec::new();
    for name in defaults.iter().copied().chain(extra.iter().map(String::as_str)) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if !PACKAGE_PATTERN.is_match(name) {
            return Err(PackageError::Invalid(name.to_string()));
        }
        if !packages.iter().any(|p| p == name) {
            packages.push(name.to_string());
        }
    }
    Ok(packages)
}

/// Package-manager bootstrap for an instance account.
pub trait Bootstrap {
    /// Whether the package manager is usable as `account`.
    fn is_installed(&self, account: &AccountName) -> Result<bool, RunError>;

    /// Steps that install it. Each step is safe to re-run.
    fn install_steps(&self, account: &AccountName) -> Vec<Step>;

    /// Steps that install `packages` with it. Empty for no packages.
    fn package_steps(&self, account: &AccountName, packages: &[String]) -> Vec<Step>;
}

/// Homebrew in `~/homebrew` of the instance account.
pub struct Homebrew<'a> {
    runner: &'a dyn Runner,
}

impl<'a> Homebrew<'a> {
    pub fn new(runner: &'a dyn Runner) -> Self {
        Self { runner }
    }
}

impl Bootstrap for Homebrew<'_> {
    fn is_installed(&self, account: &AccountName) -> Result<bool, RunError> {
        // A login shell picks up the shellenv line written at install time
        let probe = Step::new(
            "sudo",
            ["-u", account.as_str(), "-i", "--", "brew", "--version"],
        );
        self.runner.probe(&probe)
    }

    fn install_steps(&self, account: &AccountName) -> Vec<Step> {
        let fetch = format!(
            r#"test -x "$HOME/homebrew/bin/brew" || (mkdir -p "$HOME/homebrew" && curl -fsSL {TARBALL_URL} | tar xz --strip-components 1 -C "$HOME/homebrew")"#
        );
        let shellenv = r#"for f in "$HOME/.zprofile" "$HOME/.bash_profile"; do grep -qs "brew shellenv" "$f" || echo 'eval "$($HOME/homebrew/bin/brew shellenv)"' >> "$f"; done"#;
        let update = r#""$HOME/homebrew/bin/brew" update --force --quiet"#;

        vec![
            as_user(account, &fetch),
            as_user(account, shellenv),
            as_user(account, update),
        ]
    }

    fn package_steps(&self, account: &AccountName, packages: &[String]) -> Vec<Step> {
        if packages.is_empty() {
            return Vec::new();
        }
        let names: Vec<String> = packages.iter().map(|p| quote(p)).collect();
        let install = format!(r#""$HOME/homebrew/bin/brew" install {}"#, names.join(" "));
        vec![as_user(account, &install)]
    }
}

/// Run `script` with `sh` as `account`, with `HOME` set to its home.
fn as_user(account: &AccountName, script: &str) -> Step {
    Step::new(
        "sudo",
        ["-u", account.as_str(), "-H", "--", "sh", "-c", script],
    )
}
