//! Structured error types shared across qimp crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`QimpError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (block names, grid sizes, etc.).
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

/// Canonical error type for the qimp toolkit.
///
/// Families group related failures; the `code` field of the payload carries
/// the precise condition. Stable codes used by the core:
///
/// * `Block`: `duplicate-block`, `unknown-block`, `unknown-index`
/// * `Grid`: `invalid-grid`
/// * `Shape`: `shape-mismatch`
/// * `Spec`: `malformed-spec`
/// * `Engine`: `engine-failure`, `not-converged`, `time-budget-exceeded`
/// * `State`: `already-solved`, `not-ready`
/// * `Archive`: `archive-read`, `archive-parse`, `archive-write`,
///   `missing-key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum QimpError {
    /// Block structure misuse (duplicate or unknown blocks/indices).
    #[error("block error: {0}")]
    Block(ErrorInfo),
    /// Invalid grid parameters at construction.
    #[error("grid error: {0}")]
    Grid(ErrorInfo),
    /// Structural mismatch between operands of algebra or transforms.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Malformed hybridization, operator or parameter specification.
    #[error("spec error: {0}")]
    Spec(ErrorInfo),
    /// Opaque failure reported by the external solving engine.
    #[error("engine error: {0}")]
    Engine(ErrorInfo),
    /// Session lifecycle misuse (re-solve, premature output access).
    #[error("state error: {0}")]
    State(ErrorInfo),
    /// Persistence read/write failures.
    #[error("archive error: {0}")]
    Archive(ErrorInfo),
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

impl QimpError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            QimpError::Block(info)
            | QimpError::Grid(info)
            | QimpError::Shape(info)
            | QimpError::Spec(info)
            | QimpError::Engine(info)
            | QimpError::State(info)
            | QimpError::Archive(info) => info,
        }
    }

    /// Shorthand for a `shape-mismatch` error with the given message.
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        QimpError::Shape(ErrorInfo::new("shape-mismatch", message))
    }

    /// Shorthand for a `malformed-spec` error with the given message.
    pub fn malformed_spec(message: impl Into<String>) -> Self {
        QimpError::Spec(ErrorInfo::new("malformed-spec", message))
    }
}
