//! Structured error types shared across nuject crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`InjectError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, parameter values, event indices).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the injection engine.
///
/// The variants follow the failure taxonomy of the engine: structurally
/// invalid configuration is never retried, domain misses may be retried a
/// bounded number of times by the injector, and table or I/O failures are
/// always fatal and carry the offending path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum InjectError {
    /// Structurally invalid run configuration (inverted bounds, non-positive
    /// geometry, mismatched channel/table). Fatal at configuration time.
    #[error("configuration error: {0}")]
    Configuration(ErrorInfo),
    /// A sampled or queried value fell outside a table's valid support.
    #[error("domain error: {0}")]
    Domain(ErrorInfo),
    /// A cross-section table could not be read or failed validation.
    #[error("table error: {0}")]
    Table(ErrorInfo),
    /// Output sink or other collaborator I/O failure.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl InjectError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            InjectError::Configuration(info)
            | InjectError::Domain(info)
            | InjectError::Table(info)
            | InjectError::Io(info) => info,
        }
    }

    /// Returns the same error with an extra context entry attached.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            InjectError::Configuration(info) => {
                InjectError::Configuration(info.with_context(key, value))
            }
            InjectError::Domain(info) => InjectError::Domain(info.with_context(key, value)),
            InjectError::Table(info) => InjectError::Table(info.with_context(key, value)),
            InjectError::Io(info) => InjectError::Io(info.with_context(key, value)),
        }
    }

    /// Whether the injector may retry the current event after this error.
    ///
    /// Only domain misses are transient; everything else reflects a
    /// structural problem and must surface to the controller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InjectError::Domain(_))
    }
}
