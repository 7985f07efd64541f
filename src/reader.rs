//! Pull-based record reading over any byte source
//!
//! [`RecordReader`] wraps the push-based [`CsvParser`] around a
//! `std::io::Read` source and exposes parsed records through an iterator.
//! The core parser never touches I/O itself; this adapter owns the read
//! loop and the end-of-input flush.

use crate::error::{CsvError, Result};
use crate::options::ParserOptions;
use crate::parser::CsvParser;
use crate::record::Record;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Streaming record reader over any `Read` source
///
/// Reads fixed-size chunks, feeds them to the parser and queues the emitted
/// records for iteration. Memory usage is bounded by the chunk size plus
/// the longest single row.
///
/// # Examples
///
/// ```no_run
/// use csvstream::RecordReader;
///
/// let mut reader = RecordReader::open("data.csv").unwrap();
///
/// for record in reader.records() {
///     let record = record.unwrap();
///     println!("{:?}", record.get_str("name"));
/// }
/// ```
pub struct RecordReader<R> {
    reader: R,
    parser: CsvParser,
    queue: VecDeque<Record>,
    eof: bool,
    failed: bool,
    pending_error: Option<CsvError>,
}

impl RecordReader<BufReader<File>> {
    /// Open a CSV file with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ParserOptions::new())
    }

    /// Open a CSV file with the given options
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::{ParserOptions, RecordReader};
    ///
    /// let reader = RecordReader::open_with(
    ///     "data.csv",
    ///     ParserOptions::new().separator(';').strict(true),
    /// ).unwrap();
    /// # let _ = reader;
    /// ```
    pub fn open_with<P: AsRef<Path>>(path: P, options: ParserOptions) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| CsvError::ReadError(format!("Failed to open CSV file: {}", e)))?;
        Ok(Self::new(BufReader::new(file), options))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap an arbitrary byte source
    pub fn new(reader: R, options: ParserOptions) -> Self {
        RecordReader {
            reader,
            parser: CsvParser::new(options),
            queue: VecDeque::new(),
            eof: false,
            failed: false,
            pending_error: None,
        }
    }

    /// The established header list, once the first row has been consumed
    pub fn headers(&self) -> Option<&[Option<String>]> {
        self.parser.headers()
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` at end of input and after a terminal parse error
    /// has already been reported.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        loop {
            // records already parsed come first, in input order
            if let Some(record) = self.queue.pop_front() {
                return Ok(Some(record));
            }
            if let Some(e) = self.pending_error.take() {
                self.failed = true;
                return Err(e);
            }
            if self.eof || self.failed {
                return Ok(None);
            }

            if let Err(e) = self.fill() {
                self.pending_error = Some(e);
            }
        }
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let n = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(CsvError::ReadError(format!("Failed to read chunk: {}", e)))
                }
            }
        };

        let queue = &mut self.queue;
        if n == 0 {
            self.eof = true;
            self.parser.finish(|r| queue.push_back(r))
        } else {
            self.parser.push(&chunk[..n], |r| queue.push_back(r))
        }
    }

    /// Iterate over records
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::{ParserOptions, RecordReader};
    ///
    /// let data = std::io::Cursor::new("a,b\n1,2\n");
    /// let mut reader = RecordReader::new(data, ParserOptions::new());
    /// for record in reader.records() {
    ///     println!("{:?}", record.unwrap());
    /// }
    /// ```
    pub fn records(&mut self) -> RecordIterator<'_, R> {
        RecordIterator { reader: self }
    }
}

/// Iterator over parsed records
pub struct RecordIterator<'a, R> {
    reader: &'a mut RecordReader<R>,
}

impl<'a, R: Read> Iterator for RecordIterator<'a, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
