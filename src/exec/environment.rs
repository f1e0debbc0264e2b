//! Environment overrides for child processes

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// Variables set on top of the inherited environment of a child
///
/// The parent's environment is never modified; overrides only exist on the
/// value that travels with a [`super::CommandPlan`]. Values are kept as
/// `OsString` so inherited bytes reach the child unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, OsString>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set to `value`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(key).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_os_str()))
    }
}

/// Current value of `name` in this process, empty if unset
pub fn inherited_value(name: &str) -> OsString {
    std::env::var_os(name).unwrap_or_default()
}
