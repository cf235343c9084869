//! Per-instance sudoers grant
//!
//! Each instance gets one file under the sudoers drop-in directory that lets
//! the host user run commands as that instance account, and only that
//! account, without a password.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Settings, is_safe_token, is_sudoers_keyword};
use crate::instance::AccountName;

const MAX_ACCOUNT_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrantError {
    #[error("refusing to build a sudoers grant for malformed account name {0:?}")]
    MalformedAccount(String),

    #[error("refusing to build a sudoers grant for malformed host user {0:?}")]
    MalformedHostUser(String),
}

/// Path and content of an instance's sudoers file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeGrant {
    pub path: PathBuf,
    pub content: String,
}

/// Compute the grant for `account`.
///
/// The file is named after the account, so two accounts can never share a
/// grant path, and the runas list names the account alone.
pub fn build(settings: &Settings, account: &AccountName) -> Result<PrivilegeGrant, GrantError> {
    let name = account.as_str();
    if !is_safe_token(name) || is_sudoers_keyword(name) || name.len() > MAX_ACCOUNT_LEN {
        return Err(GrantError::MalformedAccount(name.to_string()));
    }
    let host = &settings.host_user;
    if !is_safe_token(host) || is_sudoers_keyword(host) {
        return Err(GrantError::MalformedHostUser(host.clone()));
    }

    Ok(PrivilegeGrant {
        path: settings.sudoers_dir.join(file_name(name)),
        content: format!("{host} ALL=({name}) NOPASSWD:SETENV: ALL"),
    })
}

/// Drop-in file name for an account.
///
/// sudo skips drop-in files whose name contains a '.', so dots are written
/// as `%2E`. Account names never contain '%', which keeps the mapping
/// one-to-one.
fn file_name(account: &str) -> String {
    account.replace('.', "%2E")
}
