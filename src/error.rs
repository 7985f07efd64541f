//! Error types for CSV parsing

use thiserror::Error;

/// Errors that can occur while parsing a CSV stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    /// The running byte count of the current row exceeded `max_row_bytes`.
    ///
    /// Fatal for the stream: the scanner cannot recover mid-row.
    #[error("Row exceeds the maximum size of {max} bytes")]
    RowSizeExceeded {
        /// Configured maximum number of bytes per row
        max: u64,
    },

    /// A row's cell count did not match the header count (strict mode only).
    ///
    /// Matching historical behavior, this halts emission of further rows for
    /// the stream rather than skipping just the offending row.
    #[error("Row length does not match headers: expected {expected} columns, got {actual} (line {line})")]
    RowLengthMismatch {
        /// Number of established header columns
        expected: usize,
        /// Number of cells found in the offending row
        actual: usize,
        /// Physical line number of the offending row (0-based)
        line: u64,
    },

    /// Failed to read from the underlying source (reader adapter only)
    #[error("Read error: {0}")]
    ReadError(String),

    /// The parser was used after a terminal error
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for CSV operations
pub type Result<T> = std::result::Result<T, CsvError>;
