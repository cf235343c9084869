//! Execution engine for alcove
//!
//! The engine turns a lifecycle intent into work on the OS:
//! 1. Planning - Build the ordered privileged steps for an account
//! 2. Executing - Confirm, then run the steps in order, stopping at the first failure

pub mod executor;
pub mod planner;
pub mod step;

pub use executor::{ExecuteError, ExecuteOptions, execute};
pub use planner::{LifecycleIntent, plan};
pub use step::Step;
