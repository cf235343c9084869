//! # userkit
//!
//! Read-only access to the macOS local user directory.
//!
//! This crate answers two questions about local accounts:
//! - Does a user record exist?
//! - What is the value of one of its attributes?
//!
//! It never creates, modifies or deletes records.
//!
//! ## Example
//!
//! ```no_run
//! use userkit::{Attribute, Directory};
//!
//! let dir = userkit::default_backend();
//! if dir.exists("alcove_me_default")? {
//!     let shell = dir.read_attribute("alcove_me_default", Attribute::UserShell)?;
//!     println!("shell: {shell}");
//! }
//! # Ok::<(), userkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Directory backends (dscl on macOS).
pub mod backend;
/// Error types for directory queries.
pub mod error;
/// Record attributes and dscl output parsing.
pub mod types;

pub use backend::Directory;
#[cfg(feature = "dscl")]
pub use backend::{default_backend, dscl::DsclBackend};
pub use error::{Error, Result};
pub use types::Attribute;
