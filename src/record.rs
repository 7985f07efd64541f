//! Record and value types produced by the parser

use indexmap::IndexMap;
use std::fmt;

/// A single cell value: decoded text, or raw bytes when the parser runs in
/// raw output mode
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// UTF-8 decoded cell text
    Text(String),
    /// Undecoded cell bytes (raw output mode)
    Bytes(Vec<u8>),
}

impl Value {
    /// Empty value matching the parser's output mode
    pub(crate) fn empty(raw: bool) -> Self {
        if raw {
            Value::Bytes(Vec::new())
        } else {
            Value::Text(String::new())
        }
    }

    /// Get the value as a string slice, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Bytes(_) => None,
        }
    }

    /// Get the underlying bytes regardless of mode
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Text(s) => s.as_bytes(),
            Value::Bytes(b) => b,
        }
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

/// One parsed row: an insertion-ordered mapping from column key to cell value
///
/// Keys are the mapped header names, `_<index>` for cells beyond the header
/// list, or bare index strings when parsing without headers. Key order
/// follows cell order; a duplicate header name keeps its first position and
/// takes the later value.
///
/// # Examples
///
/// ```
/// use csvstream::CsvParser;
///
/// let mut parser = CsvParser::default();
/// let mut records = vec![];
/// parser.push(b"a,b\n1,2\n", |r| records.push(r)).unwrap();
///
/// assert_eq!(records[0].get_str("a"), Some("1"));
/// assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record {
    columns: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record {
            columns: IndexMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.columns.insert(key, value);
    }

    /// Get a value by column key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.columns.get(key)
    }

    /// Get a text value by column key
    ///
    /// Returns `None` if the column is absent or holds raw bytes.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.columns.get(key).and_then(Value::as_str)
    }

    /// Number of columns in this record
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over `(key, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over column keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Consume the record, returning the underlying ordered map
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.columns
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}
