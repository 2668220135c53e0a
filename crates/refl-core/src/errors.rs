//! Error taxonomy of the reflectometry design crates.
//!
//! Every failure carries an [`ErrorInfo`] with a kebab-case `code` that
//! callers and tests match on, plus free-form context such as the offending
//! parameter, layer or path.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload shared by every [`ReflError`] family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case identifier, e.g. `plan-empty` or `beam-read`.
    pub code: String,
    /// Human readable description.
    pub message: String,
    /// Offending values keyed by what they are (`path`, `sample`, `layer`, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with `code` and `message` and no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry, replacing any previous value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Suggestion shown after the message, e.g. the accepted sample names.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let context: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !context.is_empty() {
            write!(f, " ({})", context.join(", "))?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

/// Error type returned by every fallible operation of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ReflError {
    /// Invalid layers, structures or sample parameters.
    #[error("model: {0}")]
    Model(ErrorInfo),
    /// Reflectivity, beam and data simulation failures.
    #[error("simulation: {0}")]
    Simulation(ErrorInfo),
    /// Fisher information and likelihood failures.
    #[error("information: {0}")]
    Information(ErrorInfo),
    /// Design studies, plans and the optimiser.
    #[error("design: {0}")]
    Design(ErrorInfo),
    /// Seeding failures.
    #[error("rng: {0}")]
    Rng(ErrorInfo),
    /// JSON or YAML encoding and decoding failures.
    #[error("serde: {0}")]
    Serde(ErrorInfo),
    /// Filesystem and rendering failures.
    #[error("io: {0}")]
    Io(ErrorInfo),
}

impl ReflError {
    /// Payload of the error, whatever its family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ReflError::Model(info)
            | ReflError::Simulation(info)
            | ReflError::Information(info)
            | ReflError::Design(info)
            | ReflError::Rng(info)
            | ReflError::Serde(info)
            | ReflError::Io(info) => info,
        }
    }

    /// Shorthand for `self.info().code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Filesystem failure while reading or writing `path`.
    pub fn io(code: &str, path: &Path, err: io::Error) -> Self {
        ReflError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
