// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::num::ParseIntError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
///
/// Every variant's `Display` form is what a client sees after the `-ERR `
/// wire prefix, so the messages here are part of the protocol surface.
#[derive(Error, Debug)]
pub enum PyropeError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// A frame is not yet complete in the read buffer. Never sent to a client;
    /// the codec translates it into "wait for more bytes".
    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("{0} cmd: wrong number of arguments")]
    WrongArgumentCount(String),

    /// An argument failed validation, e.g. a non-numeric LRANGE index.
    /// Rendered as `<CMD> cmd: <reason>`.
    #[error("{cmd} cmd: {reason}")]
    InvalidArgument { cmd: &'static str, reason: String },

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// Domain errors whose exact wording is fixed by the protocol, such as the
    /// XADD monotonicity rejections. The message passes through verbatim.
    #[error("{0}")]
    StreamIdRejected(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for PyropeError {
    fn clone(&self) -> Self {
        match self {
            PyropeError::Io(e) => PyropeError::Io(Arc::clone(e)),
            PyropeError::IncompleteData => PyropeError::IncompleteData,
            PyropeError::Protocol(s) => PyropeError::Protocol(s.clone()),
            PyropeError::UnknownCommand(s) => PyropeError::UnknownCommand(s.clone()),
            PyropeError::WrongArgumentCount(s) => PyropeError::WrongArgumentCount(s.clone()),
            PyropeError::InvalidArgument { cmd, reason } => PyropeError::InvalidArgument {
                cmd: *cmd,
                reason: reason.clone(),
            },
            PyropeError::WrongType => PyropeError::WrongType,
            PyropeError::StreamIdRejected(s) => PyropeError::StreamIdRejected(s.clone()),
            PyropeError::Internal(s) => PyropeError::Internal(s.clone()),
        }
    }
}

impl PartialEq for PyropeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PyropeError::Io(e1), PyropeError::Io(e2)) => e1.to_string() == e2.to_string(),
            (PyropeError::Protocol(s1), PyropeError::Protocol(s2)) => s1 == s2,
            (PyropeError::UnknownCommand(s1), PyropeError::UnknownCommand(s2)) => s1 == s2,
            (PyropeError::WrongArgumentCount(s1), PyropeError::WrongArgumentCount(s2)) => s1 == s2,
            (
                PyropeError::InvalidArgument { cmd: c1, reason: r1 },
                PyropeError::InvalidArgument { cmd: c2, reason: r2 },
            ) => c1 == c2 && r1 == r2,
            (PyropeError::StreamIdRejected(s1), PyropeError::StreamIdRejected(s2)) => s1 == s2,
            (PyropeError::Internal(s1), PyropeError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for PyropeError {
    fn from(e: std::io::Error) -> Self {
        PyropeError::Io(Arc::new(e))
    }
}

impl From<std::string::FromUtf8Error> for PyropeError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        PyropeError::WrongType
    }
}

impl From<ParseIntError> for PyropeError {
    fn from(_: ParseIntError) -> Self {
        PyropeError::Protocol("expected integer".to_string())
    }
}
