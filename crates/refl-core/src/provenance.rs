//! Provenance recorded alongside design reports.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Version of the report layout, bumped on breaking changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incremented when existing fields change meaning or disappear.
    pub major: u32,
    /// Incremented when fields are added.
    pub minor: u32,
    /// Incremented for fixes that keep the layout.
    pub patch: u32,
}

impl SchemaVersion {
    /// Version `major.minor.patch`.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Inputs needed to reproduce a set of design results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Hash of the plan that produced the results.
    pub input_hash: String,
    /// Samples studied, sorted and without repeats.
    pub samples: Vec<String>,
    /// Master seed of the plan.
    pub seed: u64,
    /// RFC 3339 timestamp.
    pub created_at: String,
    /// Crate name to version of the tools that produced the results.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Provenance without samples or tool versions.
    pub fn new(input_hash: impl Into<String>, seed: u64, created_at: impl Into<String>) -> Self {
        Self {
            input_hash: input_hash.into(),
            seed,
            created_at: created_at.into(),
            ..Self::default()
        }
    }

    /// Records the studied samples, sorted with repeats removed.
    pub fn with_samples<I, S>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut samples: Vec<String> = samples.into_iter().map(Into::into).collect();
        samples.sort_unstable();
        samples.dedup();
        self.samples = samples;
        self
    }

    /// Records the version of a tool.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }
}
