use crate::error::Result;
use crate::types::Attribute;

#[cfg(feature = "dscl")]
pub mod dscl;

/// Read-only view of the local user directory.
///
/// This trait abstracts the underlying implementation, allowing us to:
/// - Shell out to dscl on macOS
/// - Use an in-memory directory in tests
///
/// Implementations must not cache: accounts can be created or removed by
/// other processes between calls.
pub trait Directory {
    /// List all user record names.
    fn users(&self) -> Result<Vec<String>>;

    /// Read one attribute of a user record.
    fn read_attribute(&self, user: &str, attribute: Attribute) -> Result<String>;

    /// Check whether a user record exists.
    fn exists(&self, user: &str) -> Result<bool> {
        Ok(self.users()?.iter().any(|u| u == user))
    }

    /// List user record names starting with `prefix`.
    fn users_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .users()?
            .into_iter()
            .filter(|u| u.starts_with(prefix))
            .collect())
    }
}

/// Get the default backend based on enabled features.
#[cfg(feature = "dscl")]
pub fn default_backend() -> dscl::DsclBackend {
    dscl::DsclBackend::new()
}
