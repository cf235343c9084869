//! Command plans for the instance lifecycle
//!
//! Plans are plain data: building one never touches the OS. Every step is
//! safe to run again by hand after a partial failure.

use crate::config::Settings;
use crate::grant::{self, GrantError, PrivilegeGrant};
use crate::instance::AccountName;
use crate::password::PasswordSource;

use super::step::{Step, quote};

/// What to do with an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleIntent {
    /// Create the account with the given password source
    Create(PasswordSource),
    Delete,
}

/// Steps that create `account` and install its sudoers grant.
///
/// 1. Create the account
/// 2. Close the home directory to group and others
/// 3. Install the grant
pub fn plan_create(
    settings: &Settings,
    account: &AccountName,
    password: &PasswordSource,
) -> Result<Vec<Step>, GrantError> {
    let grant = grant::build(settings, account)?;
    let home = settings.home_dir(account);

    Ok(vec![
        Step::sudo(
            "sysadminctl",
            [
                "-addUser",
                account.as_str(),
                "-password",
                password.argument(),
            ],
        ),
        Step::sudo("chmod", ["go-rx".to_string(), home.display().to_string()]),
        Step::sudo("sh", ["-c".to_string(), install_grant_script(&grant)]),
    ])
}

/// Steps that delete `account` and its sudoers grant.
///
/// `-secure` is passed to sysadminctl unchanged. Removing the grant uses
/// `rm -f`, so a grant that is already gone is not an error.
pub fn plan_delete(settings: &Settings, account: &AccountName) -> Result<Vec<Step>, GrantError> {
    let grant = grant::build(settings, account)?;

    Ok(vec![
        Step::sudo("sysadminctl", ["-deleteUser", account.as_str(), "-secure"]),
        Step::sudo(
            "rm",
            ["-f".to_string(), grant.path.display().to_string()],
        ),
    ])
}

/// Build the plan for `intent`.
pub fn plan(
    intent: &LifecycleIntent,
    settings: &Settings,
    account: &AccountName,
) -> Result<Vec<Step>, GrantError> {
    match intent {
        LifecycleIntent::Create(password) => plan_create(settings, account, password),
        LifecycleIntent::Delete => plan_delete(settings, account),
    }
}

/// Shell script that writes the grant with sudoers permissions.
fn install_grant_script(grant: &PrivilegeGrant) -> String {
    let path = quote(&grant.path.display().to_string());
    format!(
        "printf '%s\\n' {} > {path} && chmod 0440 {path}",
        quote(&grant.content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::for_host("alice")
    }

    fn account() -> AccountName {
        AccountName::new_unchecked("alcove_alice_dev")
    }

    fn lines(steps: &[Step]) -> Vec<String> {
        steps.iter().map(Step::command_line).collect()
    }

    #[test]
    fn test_plan_create_order() {
        let steps = plan_create(&settings(), &account(), &PasswordSource::Prompt).unwrap();
        assert_eq!(steps.len(), 3);
        let lines = lines(&steps);
        assert_eq!(
            lines[0],
            "sudo sysadminctl -addUser alcove_alice_dev -password -"
        );
        assert_eq!(lines[1], "sudo chmod go-rx /Users/alcove_alice_dev");
        assert!(lines[2].starts_with("sudo sh -c "));
    }

    #[test]
    fn test_plan_create_password_sources() {
        let explicit = PasswordSource::Explicit("s3cret".to_string());
        let steps = plan_create(&settings(), &account(), &explicit).unwrap();
        assert_eq!(steps[0].args.last().map(String::as_str), Some("s3cret"));

        let generated = PasswordSource::Generated("x".repeat(64));
        let steps = plan_create(&settings(), &account(), &generated).unwrap();
        assert_eq!(steps[0].args.last().unwrap().len(), 64);
    }

    #[test]
    fn test_plan_create_installs_own_grant() {
        let steps = plan_create(&settings(), &account(), &PasswordSource::Prompt).unwrap();
        let script = &steps[2].args[2];
        assert!(script.contains("'alice ALL=(alcove_alice_dev) NOPASSWD:SETENV: ALL'"));
        assert!(script.contains("> /etc/sudoers.d/alcove_alice_dev"));
        assert!(script.ends_with("chmod 0440 /etc/sudoers.d/alcove_alice_dev"));
    }

    #[test]
    fn test_plan_delete_order() {
        let steps = plan_delete(&settings(), &account()).unwrap();
        assert_eq!(
            lines(&steps),
            vec![
                "sudo sysadminctl -deleteUser alcove_alice_dev -secure",
                "sudo rm -f /etc/sudoers.d/alcove_alice_dev",
            ]
        );
    }

    #[test]
    fn test_plan_dispatch() {
        let create = plan(
            &LifecycleIntent::Create(PasswordSource::Prompt),
            &settings(),
            &account(),
        )
        .unwrap();
        let delete = plan(&LifecycleIntent::Delete, &settings(), &account()).unwrap();
        assert_eq!(create.len(), 3);
        assert_eq!(delete.len(), 2);
    }

    #[test]
    fn test_plan_rejects_malformed_account() {
        let bad = AccountName::new_unchecked("evil/../x");
        assert!(plan_create(&settings(), &bad, &PasswordSource::Prompt).is_err());
        assert!(plan_delete(&settings(), &bad).is_err());
    }
}
