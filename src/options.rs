//! Parser configuration and option resolution
//!
//! Options follow the builder pattern: construct with [`ParserOptions::new`]
//! (or [`ParserOptions::with_headers`] as a shorthand for a fixed header
//! list), chain setters, then hand the result to
//! [`CsvParser::new`](crate::CsvParser::new). Characters wider than one byte
//! are reduced to the first byte of their UTF-8 encoding.

use crate::record::Value;

/// Maps a derived header name to its final name, or `None` to drop the
/// column from every subsequent row
pub type HeaderMapFn = Box<dyn FnMut(&str, usize) -> Option<String>>;

/// Transforms a cell value, given the column's header name (when one exists)
/// and index
pub type ValueMapFn = Box<dyn FnMut(Option<&str>, usize, Value) -> Value>;

const DEFAULT_NEWLINE: u8 = b'\n';
const DEFAULT_COMMENT: u8 = b'#';

/// Where column keys come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderMode {
    /// Derive headers from the first non-skipped row (default)
    Derive,
    /// No headers: keys are bare column indices
    Positional,
    /// Use this list of names, in order
    Provided(Vec<String>),
}

/// Configuration for a [`CsvParser`](crate::CsvParser)
///
/// # Examples
///
/// ```
/// use csvstream::{CsvParser, ParserOptions};
///
/// let options = ParserOptions::new()
///     .separator(';')
///     .skip_lines(1)
///     .strict(true);
/// let parser = CsvParser::new(options);
/// # let _ = parser;
/// ```
pub struct ParserOptions {
    separator: u8,
    quote: u8,
    escape: Option<u8>,
    newline: Option<u8>,
    headers: HeaderMode,
    map_headers: Option<HeaderMapFn>,
    map_values: Option<ValueMapFn>,
    skip_comments: Option<u8>,
    skip_lines: Option<u64>,
    max_row_bytes: u64,
    strict: bool,
    raw: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            separator: b',',
            quote: b'"',
            escape: None,
            newline: None,
            headers: HeaderMode::Derive,
            map_headers: None,
            map_values: None,
            skip_comments: None,
            skip_lines: None,
            max_row_bytes: u64::MAX,
            strict: false,
            raw: false,
        }
    }
}

impl ParserOptions {
    /// Create options with all defaults (comma separator, double quote,
    /// headers derived from the first row)
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `ParserOptions::new().headers(names)`
    pub fn with_headers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().headers(names)
    }

    /// Set the cell separator character (default `,`)
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = first_byte(separator);
        self
    }

    /// Set the quote character (default `"`)
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = first_byte(quote);
        self
    }

    /// Set the escape character
    ///
    /// Defaults to the quote character, which gives the common
    /// doubled-quote (`""`) escaping.
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = Some(first_byte(escape));
        self
    }

    /// Set a fixed newline character
    ///
    /// When not set, the newline byte is auto-detected from the first
    /// carriage return or line feed seen in the data.
    pub fn newline(mut self, newline: char) -> Self {
        self.newline = Some(first_byte(newline));
        self
    }

    /// Use this list of column names instead of deriving headers from the
    /// first row
    pub fn headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = HeaderMode::Provided(names.into_iter().map(Into::into).collect());
        self
    }

    /// Parse without headers: column keys are bare index strings
    ///
    /// Strict mode is meaningless without named headers and is forced off.
    pub fn no_headers(mut self) -> Self {
        self.headers = HeaderMode::Positional;
        self
    }

    /// Rename or drop derived header names
    ///
    /// The mapper receives `(header_text, column_index)` and returns the
    /// final name, or `None` to drop that column from every row. Only
    /// applies when headers are derived from the first row.
    pub fn map_headers<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str, usize) -> Option<String> + 'static,
    {
        self.map_headers = Some(Box::new(f));
        self
    }

    /// Transform each data-row cell value
    ///
    /// The mapper receives `(header_name, column_index, value)`; the header
    /// name is `None` for positional parsing and for cells beyond the
    /// header list. Header-row cells are not mapped.
    pub fn map_values<F>(mut self, f: F) -> Self
    where
        F: FnMut(Option<&str>, usize, Value) -> Value + 'static,
    {
        self.map_values = Some(Box::new(f));
        self
    }

    /// Silently drop lines whose first byte is `marker`
    pub fn skip_comments_with(mut self, marker: char) -> Self {
        self.skip_comments = Some(first_byte(marker));
        self
    }

    /// Silently drop lines starting with the default `#` comment marker
    pub fn skip_comments(self) -> Self {
        self.skip_comments_with(DEFAULT_COMMENT as char)
    }

    /// Skip this many physical lines at the start of the stream
    ///
    /// Skipped lines are excluded from header derivation as well.
    pub fn skip_lines(mut self, lines: u64) -> Self {
        self.skip_lines = Some(lines);
        self
    }

    /// Fail the parse if a single row exceeds this many bytes
    pub fn max_row_bytes(mut self, max: u64) -> Self {
        self.max_row_bytes = max;
        self
    }

    /// Require every data row's cell count to equal the header count
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Emit cell values as raw bytes instead of decoded text
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Normalize the options into an immutable parser configuration
    pub(crate) fn resolve(self) -> ResolvedOptions {
        let newline = self.newline.unwrap_or(DEFAULT_NEWLINE);
        let strict = match self.headers {
            // Column length checks are meaningless without named headers
            HeaderMode::Positional => false,
            _ => self.strict,
        };

        ResolvedOptions {
            config: Config {
                separator: self.separator,
                quote: self.quote,
                escape: self.escape.unwrap_or(self.quote),
                custom_newline: newline != DEFAULT_NEWLINE,
                map_headers: self.map_headers,
                map_values: self.map_values,
                skip_comments: self.skip_comments,
                skip_lines: self.skip_lines,
                max_row_bytes: self.max_row_bytes,
                strict,
                raw: self.raw,
            },
            newline,
            headers: self.headers,
        }
    }
}

/// Immutable configuration, produced once at parser creation
pub(crate) struct Config {
    pub separator: u8,
    pub quote: u8,
    pub escape: u8,
    pub custom_newline: bool,
    pub map_headers: Option<HeaderMapFn>,
    pub map_values: Option<ValueMapFn>,
    pub skip_comments: Option<u8>,
    pub skip_lines: Option<u64>,
    pub max_row_bytes: u64,
    pub strict: bool,
    pub raw: bool,
}

/// Resolution output: the read-only config plus the initial mutable pieces
/// derived from it
pub(crate) struct ResolvedOptions {
    pub config: Config,
    /// Initially the configured or default newline byte; replaced at most
    /// once by auto-detection
    pub newline: u8,
    pub headers: HeaderMode,
}

/// Reduce a character to the first byte of its UTF-8 encoding
fn first_byte(c: char) -> u8 {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf);
    buf[0]
}
