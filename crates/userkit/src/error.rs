use thiserror::Error;

/// Errors that can occur while querying the user directory.
///
/// Every query reflects live directory state. A failed query is always an
/// error: callers must never read it as "the user does not exist".
#[derive(Debug, Error)]
pub enum Error {
    /// A directory command exited with a non-zero status
    #[error("failed to run {command} (stderr={stderr:?})")]
    CommandFailed {
        /// The command line that failed
        command: String,
        /// Captured standard error of the failed command
        stderr: String,
    },

    /// dscl is not installed (not on macOS?)
    #[error("dscl not found - this crate requires macOS")]
    DsclNotFound,

    /// The requested attribute is not set on the record
    #[error("attribute {attribute} not set for user {user}")]
    MissingAttribute {
        /// User record that was read
        user: String,
        /// Attribute key that was requested
        attribute: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, Error>;
