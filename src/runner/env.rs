//! Immutable snapshot of the environment handed to child processes.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// The harness environment, captured once at startup.
///
/// Children get a derived copy with one override applied; neither the
/// snapshot nor the harness process environment is ever modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildEnvironment {
    vars: BTreeMap<OsString, OsString>,
}

impl ChildEnvironment {
    /// Snapshot the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// A fresh copy of the snapshot with `key` set to `value`.
    #[must_use]
    pub fn with_override(&self, key: &str, value: &str) -> BTreeMap<OsString, OsString> {
        let mut vars = self.vars.clone();
        vars.insert(OsString::from(key), OsString::from(value));
        vars
    }
}
