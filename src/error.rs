//! Error types.
//!
//! Parser failures keep the parser's own error type; [`ParseError`] only wraps
//! them so that a broken batch contract can be reported alongside.

use std::path::PathBuf;
use thiserror::Error;

/// The rule configuration could not be loaded.
///
/// Loading is all-or-nothing: any of these aborts the whole rule set.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The rule resource could not be opened or read.
    #[error("cannot read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not JSON, or not a list of `{label, pattern}` objects.
    #[error("malformed rule configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule '{label}' has no patterns")]
    EmptyPatterns { label: String },

    #[error("rule '{label}': pattern #{pattern} has no steps")]
    EmptyPattern { label: String, pattern: usize },

    #[error("rule '{label}': unknown token attribute '{attr}'")]
    UnknownAttribute { label: String, attr: String },

    #[error("rule '{label}': attribute {attr} expects a {expected} value")]
    InvalidValue { label: String, attr: &'static str, expected: &'static str },
}

/// A token form could not be located in its source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("token #{index} '{form}' not found in text at or after byte {offset}")]
pub struct AlignError {
    pub form: String,
    pub index: usize,
    pub offset: usize,
}

/// Reading pre-parsed CoNLL-U input failed.
#[derive(Error, Debug)]
pub enum ConlluError {
    #[error("I/O error reading CoNLL-U: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("sentence ending at line {line}: {source}")]
    Align {
        line: usize,
        #[source]
        source: AlignError,
    },
}

/// Turning input texts into parsed sentences failed.
///
/// The parser's own error is carried unchanged in [`ParseError::Parser`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError<E> {
    #[error(transparent)]
    Parser(E),

    /// The parser did not return exactly one document per text, so no
    /// document of that batch can be paired with its identifier.
    #[error("parser returned {got} documents for a batch of {expected} texts")]
    BatchMismatch { expected: usize, got: usize },
}
