//! Error types for the Ohmsolve DC solver.
//!
//! This module provides a unified error type [`OhmsolveError`] that covers
//! all error conditions that can occur during netlist parsing, circuit
//! construction, and solving.

use thiserror::Error;

/// Result type alias using [`OhmsolveError`].
pub type Result<T> = std::result::Result<T, OhmsolveError>;

/// Unified error type for all Ohmsolve operations.
#[derive(Error, Debug)]
pub enum OhmsolveError {
    // ============ Netlist Parsing Errors ============
    /// Malformed record (bad number, missing tokens, bad wattmeter geometry)
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Nothing usable was found in the input
    #[error("Netlist contains no valid records")]
    EmptyNetlist,

    // ============ Circuit Errors ============
    /// Reference node outside of 1..=N
    #[error("Reference node {node} out of range (circuit has nodes 1..={node_count})")]
    ReferenceOutOfRange { node: usize, node_count: usize },

    /// Circuit invariant violated
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Solving Errors ============
    /// Derived quantity requested before a successful solve
    #[error("Circuit has not been solved since its last modification")]
    NotSolved,

    /// Matrix is singular and cannot be solved
    #[error("Singular matrix - circuit may have a shorted source or a part with no path to the reference node")]
    SingularMatrix,

    /// Meter current could not be reconstructed from its neighbourhood
    #[error("Current through meter leg {index} cannot be derived from the surrounding branches")]
    UnresolvedMeter { index: usize },

    // ============ I/O Errors ============
    /// Error reading the netlist file
    #[error("Failed to read netlist '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the report
    #[error("Failed to write report: {message}")]
    ReportWriteError { message: String },
}

impl OhmsolveError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid topology error
    pub fn topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }
}
