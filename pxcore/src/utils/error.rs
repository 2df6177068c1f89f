use std::collections::TryReserveError;

use pxinstr::value::HostValueKind;
use strum::{Display, EnumIs};
use thiserror::Error;

/// Coarse classification of a compile failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The host handed in a null or missing required value.
    Client,
    /// The host handed in a malformed or out-of-range argument.
    Parameter,
    /// The compiler itself failed, typically on allocation.
    Internal,
}

/// Failure reported by a [`crate::coercion::Serializer`]. Forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SerializerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SerializerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("value is null")]
    NullValue,

    #[error("value exceeds representable range")]
    IntegerOverflow,

    #[error("Operation `{op}` requires field `{field}` but the argument bag does not provide it.")]
    MissingField { op: String, field: &'static str },

    #[error("Field `{field}` of operation `{op}` is malformed: expected {expected}, found {found:?}.")]
    InvalidField {
        op: String,
        field: &'static str,
        expected: &'static str,
        found: HostValueKind,
    },

    #[error("unrecognized expression operation type: {0}")]
    UnknownOperation(i64),

    #[error("Operation `{op}` declares unknown result type {code}.")]
    UnknownResultType { op: String, code: i64 },

    #[error("Return type {code} of operation `{op}` cannot be used for a read.")]
    InvalidReturnType { op: String, code: i64 },

    #[error("Malformed context path at step {step}: {reason}")]
    InvalidContext { step: usize, reason: String },

    #[error("Malformed {policy} policy: {reason}")]
    InvalidPolicy { policy: &'static str, reason: String },

    #[error(transparent)]
    Serializer(#[from] SerializerError),

    #[error(
        "Operation `{op}` (record {index}) consumes {expected} operand(s) but declares {declared} child(ren)."
    )]
    ArityMismatch {
        op: String,
        index: usize,
        expected: usize,
        declared: i64,
    },

    #[error("Record {index} declares a negative child count ({declared}).")]
    InvalidChildCount { index: usize, declared: i64 },

    #[error("Expression is incomplete: {pending} child subtree(s) still expected at end of input.")]
    IncompleteExpression { pending: i64 },

    #[error("Record {index} follows an already complete expression.")]
    TrailingRecord { index: usize },

    #[error("Failed to allocate compiler scratch storage: {0}")]
    Allocation(#[from] TryReserveError),

    #[error(
        "Operation `{op}` wrote {written} entries, exceeding the per-node bound of {bound}."
    )]
    RunOverflow {
        op: String,
        written: usize,
        bound: usize,
    },
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::NullValue => ErrorKind::Client,
            CompileError::Serializer(e) => e.kind,
            CompileError::Allocation(_) | CompileError::RunOverflow { .. } => ErrorKind::Internal,
            _ => ErrorKind::Parameter,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Failure while loading or saving a [`crate::config::CompilerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    Parse {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
