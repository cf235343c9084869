//! `alcove list`

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde::Serialize;

use crate::Context;
use crate::config::Settings;
use crate::instance::{AccountName, InstanceName};
use crate::ui;
use userkit::{Attribute, Directory};

/// One instance as found in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceEntry {
    pub instance: InstanceName,
    pub account: AccountName,
    pub home: Option<String>,
    pub shell: Option<String>,
}

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let directory = userkit::default_backend();
    let entries = collect(&ctx.settings, &directory)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        ui::info("No instances");
        return Ok(());
    }

    ui::header("Instances");
    for entry in &entries {
        println!(
            "  {:<16} {}",
            entry.instance.as_str().bold(),
            entry.account.as_str().dimmed()
        );
        ui::kv("home", entry.home.as_deref().unwrap_or("-"));
        ui::kv("shell", entry.shell.as_deref().unwrap_or("-"));
    }
    Ok(())
}

/// Find the instances of the configured host user.
///
/// Accounts that share the prefix but do not parse as an instance are
/// ignored. Unreadable attributes are reported as missing.
pub fn collect(settings: &Settings, directory: &dyn Directory) -> Result<Vec<InstanceEntry>> {
    let accounts = directory
        .users_with_prefix(&settings.account_base())
        .context("Could not list user accounts")?;

    let mut entries: Vec<InstanceEntry> = accounts
        .iter()
        .filter_map(|account| AccountName::instance(account, settings))
        .map(|instance| {
            let account = instance.account(settings);
            let home = read(directory, &account, Attribute::NFSHomeDirectory);
            let shell = read(directory, &account, Attribute::UserShell);
            InstanceEntry {
                instance,
                account,
                home,
                shell,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.instance.as_str().cmp(b.instance.as_str()));
    Ok(entries)
}

fn read(directory: &dyn Directory, account: &AccountName, attribute: Attribute) -> Option<String> {
    match directory.read_attribute(account.as_str(), attribute) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!(
                "Could not read attribute account={account} attribute={attribute} error={e}"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDirectory;

    fn settings() -> Settings {
        Settings::for_host("alice")
    }

    #[test]
    fn test_collect_filters_to_host_user() {
        let dir = MemoryDirectory::with_users(&[
            "daemon",
            "alice",
            "alcove_alice_work",
            "alcove_alice_default",
            "alcove_bob_default",
        ]);
        let entries = collect(&settings(), &dir).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.instance.as_str()).collect();
        assert_eq!(names, vec!["default", "work"]);
        assert_eq!(entries[0].account.as_str(), "alcove_alice_default");
    }

    #[test]
    fn test_collect_skips_unparsable_suffix() {
        let dir =
            MemoryDirectory::with_users(&["alcove_alice_", "alcove_alice_a.b", "alcove_alice_ok"]);
        let entries = collect(&settings(), &dir).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].instance.as_str(), "ok");
    }

    #[test]
    fn test_collect_reads_attributes() {
        let dir = MemoryDirectory::with_users(&["alcove_alice_dev"])
            .with_attribute(
                "alcove_alice_dev",
                Attribute::NFSHomeDirectory,
                "/Users/alcove_alice_dev",
            )
            .with_attribute("alcove_alice_dev", Attribute::UserShell, "/bin/zsh");
        let entries = collect(&settings(), &dir).unwrap();
        assert_eq!(entries[0].home.as_deref(), Some("/Users/alcove_alice_dev"));
        assert_eq!(entries[0].shell.as_deref(), Some("/bin/zsh"));
    }

    #[test]
    fn test_collect_missing_attributes_are_none() {
        let dir = MemoryDirectory::with_users(&["alcove_alice_dev"]);
        let entries = collect(&settings(), &dir).unwrap();
        assert!(entries[0].home.is_none());
        assert!(entries[0].shell.is_none());
    }

    #[test]
    fn test_collect_fails_when_directory_fails() {
        let dir = MemoryDirectory::broken();
        let err = collect(&settings(), &dir).unwrap_err();
        assert!(format!("{err:#}").contains("Could not list user accounts"));
    }

    #[test]
    fn test_entry_json_shape() {
        let dir = MemoryDirectory::with_users(&["alcove_alice_dev"])
            .with_attribute("alcove_alice_dev", Attribute::UserShell, "/bin/zsh");
        let entries = collect(&settings(), &dir).unwrap();
        let value = serde_json::to_value(&entries).unwrap();
        assert_eq!(value[0]["instance"], "dev");
        assert_eq!(value[0]["account"], "alcove_alice_dev");
        assert!(value[0]["home"].is_null());
        assert_eq!(value[0]["shell"], "/bin/zsh");
    }
}
