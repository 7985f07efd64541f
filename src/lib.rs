//! # csvstream
//!
//! Incremental streaming CSV parser: push byte chunks in, get keyed records
//! out. Memory usage stays constant no matter how large the input is - the
//! parser buffers at most one unfinished row between chunks.
//!
//! ## Features
//!
//! - **Chunk-boundary safe**: bytes may be split anywhere (mid-cell,
//!   mid-quote, mid-CRLF); each byte is processed once
//! - **Header handling**: derive from the first row, supply a fixed list,
//!   or parse positionally without headers
//! - **Header and value mappers**: rename or drop columns, transform cell
//!   values in flight
//! - **Configurable characters**: separator, quote, escape, newline (with
//!   CR/LF/CRLF auto-detection), comment marker
//! - **Guard rails**: per-row byte limit, strict column-count checking,
//!   leading-line skipping
//! - **Raw mode**: undecoded byte cells for non-UTF-8 data
//!
//! ## Quick Start
//!
//! Push-based, for bytes arriving from any source:
//!
//! ```
//! use csvstream::CsvParser;
//!
//! let mut parser = CsvParser::default();
//! let mut records = vec![];
//!
//! parser.push(b"name,age\nali", |r| records.push(r)).unwrap();
//! parser.push(b"ce,30\nbob,25\n", |r| records.push(r)).unwrap();
//! parser.finish(|r| records.push(r)).unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].get_str("name"), Some("alice"));
//! assert_eq!(records[1].get_str("age"), Some("25"));
//! ```
//!
//! Pull-based, over any `std::io::Read` source:
//!
//! ```no_run
//! use csvstream::RecordReader;
//!
//! let mut reader = RecordReader::open("data.csv").unwrap();
//! for record in reader.records() {
//!     let record = record.unwrap();
//!     println!("{:?}", record);
//! }
//! ```
//!
//! ## Configuration
//!
//! ```
//! use csvstream::{CsvParser, ParserOptions};
//!
//! let options = ParserOptions::new()
//!     .separator(';')
//!     .skip_comments()
//!     .strict(true);
//! let parser = CsvParser::new(options);
//! # let _ = parser;
//! ```
//!
//! ## Known limitations
//!
//! - Configurable characters are single bytes; a wider character is reduced
//!   to the first byte of its UTF-8 encoding
//! - A newline inside a quoted cell that spans an escape-pair split across
//!   chunk boundaries is not re-examined (historical behavior)
//! - In strict mode, a row-length mismatch halts the whole stream, not just
//!   the offending row (historical behavior, see [`CsvError`])

pub mod error;
pub mod options;
pub mod parser;
pub mod reader;
pub mod record;

pub use error::{CsvError, Result};
pub use options::ParserOptions;
pub use parser::CsvParser;
pub use reader::{RecordIterator, RecordReader};
pub use record::{Record, Value};
