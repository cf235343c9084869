//! In-memory stand-ins for the OS capabilities, used by unit tests.

use anyhow::bail;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::Once;

use crate::engine::Step;
use crate::runner::{RunError, Runner};
use crate::sudo::CredentialCache;
use userkit::{Attribute, Directory};

/// Records every step instead of running it.
#[derive(Default)]
pub struct FakeRunner {
    ran: RefCell<Vec<String>>,
    probed: RefCell<Vec<String>>,
    fail_on: Option<String>,
    probe_results: RefCell<VecDeque<bool>>,
}

impl FakeRunner {
    /// Fail (exit 1) the step whose command line equals `line`.
    pub fn failing_on(line: &str) -> Self {
        Self {
            fail_on: Some(line.to_string()),
            ..Self::default()
        }
    }

    /// Queue the result of the next probe. Probes default to success.
    pub fn with_probe_result(self, result: bool) -> Self {
        self.probe_results.borrow_mut().push_back(result);
        self
    }

    pub fn ran(&self) -> Vec<String> {
        self.ran.borrow().clone()
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.borrow().clone()
    }
}

impl Runner for FakeRunner {
    fn run(&self, step: &Step) -> Result<(), RunError> {
        let line = step.command_line();
        self.ran.borrow_mut().push(line.clone());
        if self.fail_on.as_deref() == Some(line.as_str()) {
            return Err(RunError::Exit(ExitStatus::from_raw(1 << 8)));
        }
        Ok(())
    }

    fn probe(&self, step: &Step) -> Result<bool, RunError> {
        self.probed.borrow_mut().push(step.command_line());
        Ok(self.probe_results.borrow_mut().pop_front().unwrap_or(true))
    }
}

/// User directory backed by a set of names.
#[derive(Default)]
pub struct MemoryDirectory {
    users: BTreeSet<String>,
    attributes: BTreeMap<(String, Attribute), String>,
    broken: bool,
    queries: Cell<usize>,
}

impl MemoryDirectory {
    pub fn with_users(users: &[&str]) -> Self {
        Self {
            users: users.iter().map(|u| (*u).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Every query fails, as when dscl exits non-zero.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, user: &str, attribute: Attribute, value: &str) -> Self {
        self.attributes
            .insert((user.to_string(), attribute), value.to_string());
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl Directory for MemoryDirectory {
    fn users(&self) -> userkit::Result<Vec<String>> {
        self.queries.set(self.queries.get() + 1);
        if self.broken {
            return Err(userkit::Error::CommandFailed {
                command: "dscl . list /Users".to_string(),
                stderr: "DS Error: -14136 (eDSRecordNotFound)".to_string(),
            });
        }
        Ok(self.users.iter().cloned().collect())
    }

    fn read_attribute(&self, user: &str, attribute: Attribute) -> userkit::Result<String> {
        self.queries.set(self.queries.get() + 1);
        self.attributes
            .get(&(user.to_string(), attribute))
            .cloned()
            .ok_or_else(|| userkit::Error::MissingAttribute {
                user: user.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

/// Counts refreshes; optionally fails them.
#[derive(Default)]
pub struct FakeCredentials {
    pub refreshes: Cell<usize>,
    pub fail: bool,
}

impl CredentialCache for FakeCredentials {
    fn refresh(&self) -> anyhow::Result<()> {
        self.refreshes.set(self.refreshes.get() + 1);
        if self.fail {
            bail!("sudo: a password is required");
        }
        Ok(())
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger that keeps the records of the emitting thread.
///
/// Each test runs on its own thread, so tests only see their own records.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|r| {
            r.borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Run `f` and return the log records it emitted on this thread.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(log::Level, String)>) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });

    RECORDS.with(|r| r.borrow_mut().clear());
    let value = f();
    let records = RECORDS.with(|r| r.borrow_mut().drain(..).collect());
    (value, records)
}
