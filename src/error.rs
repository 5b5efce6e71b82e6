//! Error types for document writing.
//!
//! Every failure is reported synchronously by the call that triggered it.
//! Nothing is retried or recovered internally: this is a forward-only stream,
//! and a failed write leaves the document malformed.
//!
//! ## Error Categories
//!
//! - **Contract Violations**: the caller broke the writer's calling protocol
//!   (unbalanced begin/end calls, attributes outside a node, writes after close)
//! - **I/O Errors**: the underlying output failed during a write or on close
//! - **Encoding Constraints**: a value cannot be represented on the wire, such as
//!   a genuine NaN when [`NanPolicy::Reject`](crate::NanPolicy::Reject) is active
//!
//! ## Examples
//!
//! ```rust
//! use treedata::{DocumentWriter, Error, TreeDataWriter, ValueTokenWriter};
//!
//! let mut writer = DocumentWriter::new(ValueTokenWriter::new(), "1.0");
//! let result = writer.end_group();
//!
//! assert!(matches!(result, Err(Error::ContractViolation(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while writing a document.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during writing or closing the output
    #[error("IO error: {0}")]
    Io(String),

    /// The calling protocol of the writer was broken
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// An attribute value has no representation on the wire
    #[error("Encoding constraint violated for attribute `{name}`: {msg}")]
    EncodingConstraint { name: String, msg: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a contract violation error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treedata::Error;
    ///
    /// let err = Error::contract("end_node called with no open node");
    /// assert!(err.to_string().contains("no open node"));
    /// ```
    pub fn contract<T: fmt::Display>(msg: T) -> Self {
        Error::ContractViolation(msg.to_string())
    }

    /// Creates an encoding constraint error for the named attribute.
    pub fn encoding(name: &str, msg: &str) -> Self {
        Error::EncodingConstraint {
            name: name.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for output failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` if this error reports a broken calling protocol.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Error::ContractViolation(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_encoding_message() {
        let err = Error::encoding("p", "NaN is reserved for absent values");
        assert_eq!(
            err.to_string(),
            "Encoding constraint violated for attribute `p`: NaN is reserved for absent values"
        );
        assert!(!err.is_contract_violation());
    }
}
