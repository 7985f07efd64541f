//! Incremental push-based CSV parser
//!
//! [`CsvParser`] consumes arbitrarily-sized byte chunks and emits one
//! [`Record`] per completed row through a caller-supplied closure. Bytes are
//! processed exactly once no matter how the input is split: a chunk ending
//! mid-row leaves the unfinished tail buffered until the next [`push`] (or
//! [`finish`]) completes it. Memory usage is bounded by the longest single
//! row, never by the input size.
//!
//! Two independent state machines do the work, as the parsing rules differ
//! between them:
//!
//! - the *line scanner* walks every incoming byte, tracking quote/escape
//!   state across chunk boundaries, and finds row boundaries;
//! - the *cell extractor* re-scans each completed line (now contiguous in
//!   memory) with its own local quote state, splitting it into cells and
//!   compacting escape sequences in place.
//!
//! Known limitation, kept from the historical design: a newline inside a
//! quoted cell is honored only while the scanner's quote state is intact,
//! and a quote left open across a chunk boundary that splits an
//! escape-quote pair is not re-examined.
//!
//! [`push`]: CsvParser::push
//! [`finish`]: CsvParser::finish
//!
//! # Examples
//!
//! ```
//! use csvstream::CsvParser;
//!
//! let mut parser = CsvParser::default();
//! let mut records = vec![];
//!
//! // Chunk boundaries may fall anywhere, even mid-cell
//! parser.push(b"name,city\nali", |r| records.push(r)).unwrap();
//! parser.push(b"ce,NYC\n", |r| records.push(r)).unwrap();
//! parser.finish(|r| records.push(r)).unwrap();
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].get_str("name"), Some("alice"));
//! ```

use crate::error::{CsvError, Result};
use crate::options::{Config, HeaderMode, ParserOptions};
use crate::record::{Record, Value};

const CR: u8 = b'\r';
const NL: u8 = b'\n';

/// Column keys for row assembly, established at most once
enum Headers {
    /// Waiting for the first non-skipped line
    Pending,
    /// No headers: keys are bare column indices
    Positional,
    /// Ordered names; `None` entries drop that column from every row
    Named(Vec<Option<String>>),
}

/// Mutable scanner state, exclusively owned by one parser instance
struct ScanState {
    /// True until headers are established
    first: bool,
    /// Physical lines consumed, used for the skip-lines comparison
    line_number: u64,
    /// Offset in the working buffer where the next unscanned line begins
    previous_end: usize,
    /// Running byte count of the row currently being scanned
    row_length: u64,
    /// Currently inside a quoted field
    quoted: bool,
    /// Previous byte was an escape signal awaiting the following quote
    escaped: bool,
    /// Active newline byte; replaced at most once by auto-detection
    newline: u8,
    /// A terminal error was returned; the parser is poisoned
    failed: bool,
}

/// Streaming CSV parser
///
/// Feed byte chunks with [`push`](Self::push) and signal end-of-input with
/// [`finish`](Self::finish); both invoke the supplied closure once per
/// assembled record, in input order, before returning. A returned error is
/// terminal: the stream cannot be resumed and further calls fail.
///
/// Each parser owns its state exclusively; concurrent streams need
/// independent instances.
pub struct CsvParser {
    config: Config,
    state: ScanState,
    headers: Headers,
    /// Carry-over tail: bytes not yet resolved into a complete line
    prev: Option<Vec<u8>>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl CsvParser {
    /// Create a parser from the given options
    pub fn new(options: ParserOptions) -> Self {
        let resolved = options.resolve();

        let (headers, first) = match resolved.headers {
            HeaderMode::Derive => (Headers::Pending, true),
            HeaderMode::Positional => (Headers::Positional, false),
            HeaderMode::Provided(names) => {
                (Headers::Named(names.into_iter().map(Some).collect()), false)
            }
        };

        CsvParser {
            config: resolved.config,
            state: ScanState {
                first,
                line_number: 0,
                previous_end: 0,
                row_length: 0,
                quoted: false,
                escaped: false,
                newline: resolved.newline,
                failed: false,
            },
            headers,
            prev: None,
        }
    }

    /// Shorthand for a parser with a fixed header list
    pub fn with_headers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ParserOptions::with_headers(names))
    }

    /// The established header list, once one exists
    ///
    /// `None` entries are dropped columns. Returns `None` while headers are
    /// still pending and when parsing positionally.
    pub fn headers(&self) -> Option<&[Option<String>]> {
        match &self.headers {
            Headers::Named(names) => Some(names),
            _ => None,
        }
    }

    /// Number of physical lines consumed so far (headers and skipped lines
    /// included)
    pub fn line_count(&self) -> u64 {
        self.state.line_number
    }

    /// Feed one chunk of input
    ///
    /// `emit` is called once per record completed by this chunk, in order,
    /// before `push` returns. Chunks may be empty and may split rows, cells
    /// or multi-byte sequences at any point.
    ///
    /// # Errors
    ///
    /// [`CsvError::RowSizeExceeded`] when a row outgrows `max_row_bytes`,
    /// [`CsvError::RowLengthMismatch`] in strict mode. Both are terminal:
    /// any later call fails with [`CsvError::InvalidState`].
    pub fn push<F>(&mut self, chunk: &[u8], mut emit: F) -> Result<()>
    where
        F: FnMut(Record),
    {
        self.check_usable()?;

        // Working buffer: carried-over tail plus the new chunk. Bytes before
        // `start` were already scanned in a previous call; only the line
        // scanner skips them, quote/escape state persists in `self.state`.
        let (mut buffer, start) = match self.prev.take() {
            Some(mut tail) => {
                let start = tail.len();
                tail.extend_from_slice(chunk);
                (tail, start)
            }
            None => (chunk.to_vec(), 0),
        };

        let len = buffer.len();
        let mut i = start;
        while i < len {
            let chr = buffer[i];
            let next = if i + 1 < len { Some(buffer[i + 1]) } else { None };

            self.state.row_length += 1;
            if self.state.row_length > self.config.max_row_bytes {
                self.state.failed = true;
                return Err(CsvError::RowSizeExceeded {
                    max: self.config.max_row_bytes,
                });
            }

            // An escape signal needs its quote byte in view; at a chunk
            // boundary the pair is split and the signal is not recognized
            // (historical limitation). The first byte of a scan window never
            // starts an escape.
            if !self.state.escaped
                && chr == self.config.escape
                && next == Some(self.config.quote)
                && i != start
            {
                self.state.escaped = true;
                i += 1;
                continue;
            }

            if chr == self.config.quote {
                if self.state.escaped {
                    // escaped literal quote, not a toggle
                    self.state.escaped = false;
                } else {
                    self.state.quoted = !self.state.quoted;
                }
                i += 1;
                continue;
            }

            if !self.state.quoted {
                if self.state.first && !self.config.custom_newline {
                    // Sample the first line-break byte seen: a lone CR
                    // selects CR, otherwise LF. Set at most once.
                    if chr == NL {
                        self.state.newline = NL;
                    } else if chr == CR && next != Some(NL) {
                        self.state.newline = CR;
                    }
                }

                if chr == self.state.newline {
                    let line_start = self.state.previous_end;
                    if let Err(e) = self.parse_line(&mut buffer, line_start, i + 1, &mut emit) {
                        self.state.failed = true;
                        return Err(e);
                    }
                    self.state.previous_end = i + 1;
                    self.state.row_length = 0;
                }
            }

            i += 1;
        }

        if self.state.previous_end == len {
            // everything consumed, no carry
            self.state.previous_end = 0;
            return Ok(());
        }

        // The unconsumed remainder becomes the new tail; drop the consumed
        // prefix and rebase the line-start offset to the tail's start.
        buffer.drain(..self.state.previous_end);
        self.state.previous_end = 0;
        self.prev = Some(buffer);
        Ok(())
    }

    /// Signal end-of-input, flushing a final unterminated line if one is
    /// buffered
    ///
    /// A tail cut off inside a pending escape sequence is dropped silently
    /// (historical behavior). Calling `finish` more than once is harmless.
    pub fn finish<F>(&mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(Record),
    {
        self.check_usable()?;

        if self.state.escaped {
            return Ok(());
        }
        let Some(mut tail) = self.prev.take() else {
            return Ok(());
        };

        let start = self.state.previous_end;
        // plus one: parse_line trims the trailing newline the tail lacks
        let end = tail.len() + 1;
        let result = self.parse_line(&mut tail, start, end, &mut emit);
        if result.is_err() {
            self.state.failed = true;
        }
        self.state.previous_end = 0;
        result
    }

    fn check_usable(&self) -> Result<()> {
        if self.state.failed {
            return Err(CsvError::InvalidState(
                "parser already returned a terminal error".to_string(),
            ));
        }
        Ok(())
    }

    /// Split one completed line (bytes `[start, end)`, `end` one past the
    /// newline) into cells and hand them to the row assembler
    ///
    /// Quote state is re-derived locally: the line is contiguous here, so
    /// the scanner's cross-chunk state does not apply.
    fn parse_line<F>(
        &mut self,
        buffer: &mut Vec<u8>,
        start: usize,
        end: usize,
        emit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Record),
    {
        let mut end = end - 1; // trim the newline byte
        if !self.config.custom_newline && end > start && buffer[end - 1] == CR {
            end -= 1; // CRLF normalization
        }

        if let Some(marker) = self.config.skip_comments {
            if buffer.get(start) == Some(&marker) {
                return Ok(());
            }
        }

        let comma = self.config.separator;
        let quote = self.config.quote;
        let escape = self.config.escape;

        let mut cells: Vec<Value> = Vec::new();
        let mut is_quoted = false;
        let mut offset = start;

        let mut i = start;
        while i < end {
            let b = buffer[i];
            let is_starting_quote = !is_quoted && b == quote;
            // a quote only closes right before a separator; a closing quote
            // at line end is handled by the surrounding-quote strip instead
            let is_ending_quote = is_quoted && b == quote && buffer.get(i + 1) == Some(&comma);
            let is_escape = is_quoted && b == escape && i + 1 < end && buffer[i + 1] == quote;

            if is_starting_quote || is_ending_quote {
                is_quoted = !is_quoted;
                i += 1;
                continue;
            }
            if is_escape {
                i += 2;
                continue;
            }

            if b == comma && !is_quoted {
                let value = self.parse_cell(buffer, offset, i);
                let value = self.map_value(cells.len(), value);
                cells.push(value);
                offset = i + 1;
            }
            i += 1;
        }

        if offset < end {
            let value = self.parse_cell(buffer, offset, end);
            let value = self.map_value(cells.len(), value);
            cells.push(value);
        }

        // a trailing separator yields one final empty cell
        if end > start && buffer[end - 1] == comma {
            let value = self.map_value(cells.len(), Value::empty(self.config.raw));
            cells.push(value);
        }

        let skip = match self.config.skip_lines {
            Some(n) => n > self.state.line_number,
            None => false,
        };
        self.state.line_number += 1;

        if self.state.first && !skip {
            self.state.first = false;
            self.headers = Headers::Named(self.derive_headers(cells));
            return Ok(());
        }

        if !skip && self.config.strict {
            if let Headers::Named(names) = &self.headers {
                if cells.len() != names.len() {
                    return Err(CsvError::RowLengthMismatch {
                        expected: names.len(),
                        actual: cells.len(),
                        line: self.state.line_number - 1,
                    });
                }
            }
        }

        if !skip {
            self.write_row(cells, emit)?;
        }
        Ok(())
    }

    /// Header capture from the first non-skipped line, applying the header
    /// mapper cell by cell
    fn derive_headers(&mut self, cells: Vec<Value>) -> Vec<Option<String>> {
        cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                let text = match cell {
                    Value::Text(s) => s,
                    Value::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
                };
                match self.config.map_headers.as_mut() {
                    Some(f) => f(&text, index),
                    None => Some(text),
                }
            })
            .collect()
    }

    /// Decode one cell spanning `[start, end)`: strip surrounding quotes,
    /// compact escape-quote pairs in place, then decode
    fn parse_cell(&self, buffer: &mut [u8], mut start: usize, mut end: usize) -> Value {
        let quote = self.config.quote;
        let escape = self.config.escape;

        if end > start && buffer[start] == quote && buffer[end - 1] == quote {
            start += 1;
            end -= 1;
        }

        let mut y = start;
        let mut i = start;
        while i < end {
            if buffer[i] == escape && i + 1 < end && buffer[i + 1] == quote {
                i += 1; // drop the escape byte, keep the quote it protects
            }
            if y != i {
                buffer[y] = buffer[i];
            }
            y += 1;
            i += 1;
        }

        self.parse_value(buffer, start, y)
    }

    fn parse_value(&self, buffer: &[u8], start: usize, end: usize) -> Value {
        if self.config.raw {
            Value::Bytes(buffer[start..end].to_vec())
        } else {
            Value::Text(String::from_utf8_lossy(&buffer[start..end]).into_owned())
        }
    }

    /// Apply the configured value mapper to one cell
    ///
    /// Header-row cells pass through untouched. The header name handed to
    /// the mapper is `None` in positional mode, for dropped columns, and
    /// for cells beyond the header list.
    fn map_value(&mut self, index: usize, value: Value) -> Value {
        if self.state.first {
            return value;
        }
        let mapper = match self.config.map_values.as_mut() {
            Some(f) => f,
            None => return value,
        };
        let header = match &self.headers {
            Headers::Named(names) => names.get(index).and_then(Option::as_deref),
            Headers::Positional | Headers::Pending => None,
        };
        mapper(header, index, value)
    }

    /// Assemble a keyed record from an ordered cell list and emit it
    fn write_row<F>(&mut self, cells: Vec<Value>, emit: &mut F) -> Result<()>
    where
        F: FnMut(Record),
    {
        let mut row = Record::new();
        let mut key_buf = itoa::Buffer::new();

        for (index, cell) in cells.into_iter().enumerate() {
            match &self.headers {
                Headers::Positional => {
                    row.insert(key_buf.format(index).to_string(), cell);
                }
                Headers::Named(names) => match names.get(index) {
                    Some(Some(name)) => row.insert(name.clone(), cell),
                    Some(None) => {} // dropped column
                    None => {
                        // cell beyond the header list gets a synthetic key
                        let mut key = String::from("_");
                        key.push_str(key_buf.format(index));
                        row.insert(key, cell);
                    }
                },
                Headers::Pending => {
                    return Err(CsvError::InvalidState(
                        "row assembled before headers were established".to_string(),
                    ));
                }
            }
        }

        emit(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;

    fn collect(parser: &mut CsvParser, chunks: &[&[u8]]) -> Result<Vec<Record>> {
        let mut records = vec![];
        for chunk in chunks {
            parser.push(chunk, |r| records.push(r))?;
        }
        parser.finish(|r| records.push(r))?;
        Ok(records)
    }

    fn parse_all(input: &[u8], options: ParserOptions) -> Result<Vec<Record>> {
        let mut parser = CsvParser::new(options);
        collect(&mut parser, &[input])
    }

    #[test]
    fn test_header_derivation() {
        let records = parse_all(b"a,b,c\n1,2,3\n", ParserOptions::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[0].get_str("b"), Some("2"));
        assert_eq!(records[0].get_str("c"), Some("3"));
    }

    #[test]
    fn test_headers_accessor() {
        let mut parser = CsvParser::default();
        assert!(parser.headers().is_none());
        parser.push(b"a,b\n", |_| {}).unwrap();
        assert_eq!(
            parser.headers(),
            Some(&[Some("a".to_string()), Some("b".to_string())][..])
        );
    }

    #[test]
    fn test_quoted_separator_is_not_a_boundary() {
        let records = parse_all(b"a,b\n1,\"x,y\"\n", ParserOptions::new()).unwrap();
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[0].get_str("b"), Some("x,y"));
    }

    #[test]
    fn test_doubled_quote_escape() {
        let records =
            parse_all(b"a,b\n1,\"ha \"\"ha\"\" ha\"\n", ParserOptions::new()).unwrap();
        assert_eq!(records[0].get_str("b"), Some("ha \"ha\" ha"));
    }

    #[test]
    fn test_custom_escape_character() {
        let input = b"a,b,c\n1,\"some \\\"escaped\\\" value\",2\n3,\"\\\"\\\"\",4\n5,6,7\n";
        let records = parse_all(input, ParserOptions::new().escape('\\')).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get_str("b"), Some("some \"escaped\" value"));
        assert_eq!(records[1].get_str("b"), Some("\"\""));
        assert_eq!(records[2].get_str("b"), Some("6"));
    }

    #[test]
    fn test_chunk_split_mid_cell() {
        let mut parser = CsvParser::default();
        let records =
            collect(&mut parser, &[b"a,b\n1,".as_slice(), b"2\n3,4\n".as_slice()]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_str("b"), Some("2"));
        assert_eq!(records[1].get_str("a"), Some("3"));
    }

    #[test]
    fn test_chunk_split_every_byte() {
        let input: &[u8] = b"a,b\n1,\"x,y\"\n2,z\n";
        let mut parser = CsvParser::default();
        let chunks: Vec<&[u8]> = input.chunks(1).collect();
        let records = collect(&mut parser, &chunks).unwrap();

        let mut whole = CsvParser::default();
        let expected = collect(&mut whole, &[input]).unwrap();
        assert_eq!(records, expected);
    }

    #[test]
    fn test_empty_chunks_are_harmless() {
        let mut parser = CsvParser::default();
        let records = collect(
            &mut parser,
            &[
                b"".as_slice(),
                b"a,b\n".as_slice(),
                b"".as_slice(),
                b"1,2\n".as_slice(),
                b"".as_slice(),
            ],
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut parser = CsvParser::default();
        let records = collect(&mut parser, &[b"a,b\n1,2".as_slice()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("b"), Some("2"));
    }

    #[test]
    fn test_finish_without_tail_is_a_no_op() {
        let mut parser = CsvParser::default();
        parser.push(b"a,b\n1,2\n", |_| {}).unwrap();
        let mut extra = 0;
        parser.finish(|_| extra += 1).unwrap();
        parser.finish(|_| extra += 1).unwrap();
        assert_eq!(extra, 0);
    }

    #[test]
    fn test_crlf_normalization() {
        let records = parse_all(b"a,b\r\n1,2\r\n", ParserOptions::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[0].get_str("b"), Some("2"));
    }

    #[test]
    fn test_lone_cr_newline_autodetection() {
        let records = parse_all(b"a,b\r1,2\r3,4\r", ParserOptions::new()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[1].get_str("b"), Some("4"));
    }

    #[test]
    fn test_custom_newline_byte() {
        // 'X' terminates rows; a quoted cell may still contain it
        let records = parse_all(
            b"a,b,cX1,2,3X\"X-Men\",5,6X7,8,9X",
            ParserOptions::new().newline('X'),
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[1].get_str("a"), Some("X-Men"));
        assert_eq!(records[2].get_str("c"), Some("9"));
    }

    #[test]
    fn test_trailing_separator_appends_empty_cell() {
        let records = parse_all(b"a,b,c\n1,2,\n", ParserOptions::new()).unwrap();
        assert_eq!(records[0].get_str("c"), Some(""));
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn test_positional_keys() {
        let records = parse_all(b"a,b,c\n1,2,3\n", ParserOptions::new().no_headers()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_str("0"), Some("a"));
        assert_eq!(records[1].get_str("2"), Some("3"));
    }

    #[test]
    fn test_provided_headers() {
        let records =
            parse_all(b"1,2,3\n4,5,6\n", ParserOptions::with_headers(["a", "b", "c"])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get_str("c"), Some("6"));
    }

    #[test]
    fn test_map_headers_rename_and_drop() {
        let options = ParserOptions::new().map_headers(|header, _index| match header {
            "a" => Some("x".to_string()),
            "b" => None,
            other => Some(other.to_string()),
        });
        let records = parse_all(b"a,b,c\n1,2,3\n", options).unwrap();
        assert_eq!(records[0].get_str("x"), Some("1"));
        assert_eq!(records[0].get("b"), None);
        assert_eq!(records[0].get_str("c"), Some("3"));
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn test_map_values_sees_header_index_and_value() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(vec![]));
        let seen_inner = Rc::clone(&seen);
        let options = ParserOptions::new().map_values(move |header, index, value| {
            seen_inner
                .borrow_mut()
                .push((header.map(String::from), index));
            Value::Text(format!("<{value}>"))
        });
        let records = parse_all(b"a,b\n1,2\n", options).unwrap();

        assert_eq!(records[0].get_str("a"), Some("<1>"));
        assert_eq!(
            *seen.borrow(),
            vec![(Some("a".to_string()), 0), (Some("b".to_string()), 1)]
        );
    }

    #[test]
    fn test_map_values_header_is_none_outside_header_list() {
        use std::cell::RefCell;
        use std::rc::Rc;

        // positional mode: no header names exist at all
        let seen = Rc::new(RefCell::new(vec![]));
        let seen_inner = Rc::clone(&seen);
        let options = ParserOptions::new()
            .no_headers()
            .map_values(move |header, index, value| {
                seen_inner
                    .borrow_mut()
                    .push((header.map(String::from), index));
                value
            });
        parse_all(b"1,2\n", options).unwrap();
        assert_eq!(*seen.borrow(), vec![(None, 0), (None, 1)]);

        // named mode: cells beyond the header list have no name either
        let seen = Rc::new(RefCell::new(vec![]));
        let seen_inner = Rc::clone(&seen);
        let options = ParserOptions::new().map_values(move |header, index, value| {
            seen_inner
                .borrow_mut()
                .push((header.map(String::from), index));
            value
        });
        let records = parse_all(b"a,b\n1,2,3\n", options).unwrap();
        assert_eq!(records[0].get_str("_2"), Some("3"));
        assert_eq!(
            *seen.borrow(),
            vec![
                (Some("a".to_string()), 0),
                (Some("b".to_string()), 1),
                (None, 2)
            ]
        );
    }

    #[test]
    fn test_map_values_skips_header_row() {
        let options = ParserOptions::new().map_values(|_h, _i, v| Value::Text(format!("{v}!")));
        let records = parse_all(b"a,b\n1,2\n", options).unwrap();
        // keys untouched, values mapped
        assert_eq!(records[0].get_str("a"), Some("1!"));
    }

    #[test]
    fn test_skip_comments() {
        let records =
            parse_all(b"a,b,c\n#comment\n1,2,3\n", ParserOptions::new().skip_comments()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("a"), Some("1"));
    }

    #[test]
    fn test_skip_comments_custom_marker() {
        let records = parse_all(
            b"a,b,c\n~comment\n1,2,3\n",
            ParserOptions::new().skip_comments_with('~'),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_skip_lines_before_header_derivation() {
        let records = parse_all(
            b"junk\nmore junk\na,b,c\n1,2,3\n",
            ParserOptions::new().skip_lines(2),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("a"), Some("1"));
    }

    #[test]
    fn test_skip_lines_with_provided_headers() {
        let records = parse_all(
            b"junk\nmore junk\n1,2,3\n4,5,6\n",
            ParserOptions::with_headers(["s", "p", "h"]).skip_lines(2),
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_str("s"), Some("1"));
        assert_eq!(records[1].get_str("h"), Some("6"));
    }

    #[test]
    fn test_strict_mismatch_is_terminal() {
        let mut parser = CsvParser::new(ParserOptions::new().strict(true));
        let mut records = vec![];
        let err = parser
            .push(b"a,b,c\n1,2,3,4\n5,6,7\n", |r| records.push(r))
            .unwrap_err();
        assert_eq!(
            err,
            CsvError::RowLengthMismatch {
                expected: 3,
                actual: 4,
                line: 1,
            }
        );
        // no record for the offending row, and nothing after it
        assert!(records.is_empty());

        let err = parser.push(b"8,9,10\n", |_| {}).unwrap_err();
        assert!(matches!(err, CsvError::InvalidState(_)));
    }

    #[test]
    fn test_strict_matching_rows_pass() {
        let records =
            parse_all(b"a,b,c\n1,2,3\n4,5,6\n", ParserOptions::new().strict(true)).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_non_strict_short_row_omits_keys() {
        let records = parse_all(b"a,b,c\n1,2\n", ParserOptions::new()).unwrap();
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0].get_str("a"), Some("1"));
        assert_eq!(records[0].get("c"), None);
    }

    #[test]
    fn test_non_strict_long_row_gets_synthetic_keys() {
        let records = parse_all(b"a,b,c\n1,2,3,4\n", ParserOptions::new()).unwrap();
        assert_eq!(records[0].len(), 4);
        assert_eq!(records[0].get_str("_3"), Some("4"));
    }

    #[test]
    fn test_max_row_bytes_exceeded() {
        let mut parser = CsvParser::new(ParserOptions::new().max_row_bytes(8));
        let mut records = vec![];
        let err = parser
            .push(b"a,b\n1,2,3,4,5,6,7\n", |r| records.push(r))
            .unwrap_err();
        assert_eq!(err, CsvError::RowSizeExceeded { max: 8 });
        assert!(records.is_empty());
    }

    #[test]
    fn test_max_row_bytes_spans_chunks() {
        let mut parser = CsvParser::new(ParserOptions::new().max_row_bytes(8));
        parser.push(b"a,b\n", |_| {}).unwrap();
        parser.push(b"12345", |_| {}).unwrap();
        let err = parser.push(b"6789", |_| {}).unwrap_err();
        assert_eq!(err, CsvError::RowSizeExceeded { max: 8 });
    }

    #[test]
    fn test_raw_mode_returns_bytes() {
        let records = parse_all(b"a,b\n1,\xff\xfe\n", ParserOptions::new().raw(true)).unwrap();
        assert_eq!(records[0].get("a"), Some(&Value::Bytes(b"1".to_vec())));
        assert_eq!(records[0].get("b"), Some(&Value::Bytes(vec![0xff, 0xfe])));
    }

    #[test]
    fn test_blank_line_emits_empty_record() {
        let records = parse_all(b"a,b\n1,2\n\n3,4\n", ParserOptions::new()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_quote_only_cell() {
        let records = parse_all(b"a,b\n\"\",\"x\"\n", ParserOptions::new()).unwrap();
        assert_eq!(records[0].get_str("a"), Some(""));
        assert_eq!(records[0].get_str("b"), Some("x"));
    }

    #[test]
    fn test_fresh_instances_are_independent() {
        let input: &[u8] = b"a,b\n\"x\"\"y\",2\n3,4";
        let first = parse_all(input, ParserOptions::new()).unwrap();
        let second = parse_all(input, ParserOptions::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].get_str("a"), Some("x\"y"));
    }

    #[test]
    fn test_line_count() {
        let mut parser = CsvParser::default();
        parser.push(b"a,b\n1,2\n3,4\n", |_| {}).unwrap();
        assert_eq!(parser.line_count(), 3);
    }
}
