//! Instance resolution
//!
//! Picks the one instance a pipeline run addresses and produces the base
//! path every request of that run is made against.

use crate::error::{GameCtlError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Path listing every instance known to the service
pub const INSTANCES_PATH: &str = "/instances";

/// Snapshot of instance name to metadata, as returned by `GET /instances`
pub type InstanceSet = BTreeMap<String, serde_json::Value>;

/// Parse the body of `GET /instances`. An empty response means no instances.
pub fn parse_instances(body: Option<&str>) -> Result<InstanceSet> {
    match body {
        Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(text)?),
        _ => Ok(InstanceSet::new()),
    }
}

/// Resolved base path of the target instance (`/instances/<name>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    name: String,
    base: String,
}

impl TargetPath {
    /// Base path for an instance name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let base = format!("{}/{}", INSTANCES_PATH, name);
        Self { name, base }
    }

    /// Instance name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base path
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Path of a resource below the instance, e.g. `join("server/start")`
    pub fn join(&self, suffix: &str) -> String {
        format!("{}/{}", self.base, suffix.trim_start_matches('/'))
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

/// Characters that would change the meaning of a request path
const RESERVED_IN_NAME: &[char] = &['/', '?', '#', '%'];

/// Reject names that cannot be placed verbatim in a path segment
fn check_name(name: &str) -> Result<&str> {
    if name.contains(RESERVED_IN_NAME) || name.contains(char::is_whitespace) {
        return Err(GameCtlError::config(format!("invalid instance name: {}", name)));
    }
    Ok(name)
}

/// Determine the single instance to operate on.
///
/// A non-empty `requested` name must exist. Without one, the service must
/// host exactly one instance. Either way the chosen name must be usable as a
/// single path segment.
pub fn resolve_instance(requested: Option<&str>, available: &InstanceSet) -> Result<TargetPath> {
    match requested.filter(|name| !name.is_empty()) {
        Some(name) => {
            if available.contains_key(name) {
                Ok(TargetPath::new(check_name(name)?))
            } else {
                Err(GameCtlError::config(format!(
                    "instance does not exist: {}",
                    name
                )))
            }
        }
        None => {
            let mut names = available.keys();
            match (names.next(), names.next()) {
                (Some(only), None) => Ok(TargetPath::new(check_name(only)?)),
                _ => Err(GameCtlError::config("unable to identify instance")),
            }
        }
    }
}
