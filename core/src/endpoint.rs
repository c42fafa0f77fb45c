//! Declarative description of one API call.
//!
//! # Design
//! An `Endpoint` carries a relative path with every identifier already
//! substituted, plus string parameters. An empty value means "not
//! supplied": the request builder drops it from the query string. Callers
//! that want to send an empty string as a real value cannot; this mirrors
//! the remote API's own clients and is kept for output compatibility.
//!
//! Parameters are held in a `BTreeMap`, so the emitted query string is
//! ordered by parameter name and identical across runs.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    parameters: BTreeMap<String, String>,
}

impl Endpoint {
    /// `path` is relative to the API root, without a leading slash, e.g.
    /// `artist/<mbid>/setlists`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter. An empty `value` is kept in the descriptor but will
    /// not be sent.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Add an optional parameter, recording `None` as the empty-string
    /// "omit" marker.
    pub fn param_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        self.param(name, value)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Parameters that will actually reach the query string.
    pub fn supplied_parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
