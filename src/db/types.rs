//! Data types and enumerations for the database format

use std::borrow::Cow;
use std::fmt;

/// Table identifier as stored in the schema and index files
pub type TableId = i32;

/// Field identifier as stored in the schema and data files
pub type FieldId = i32;

/// Table id marking a retired field definition
pub const NO_TABLE: TableId = -1;

/// Declared type of a field
///
/// Stored as a single tag byte in the schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Unknown(u8),
}

impl From<u8> for FieldType {
    fn from(value: u8) -> Self {
        match value {
            0 => FieldType::String,
            1 => FieldType::Integer,
            2 => FieldType::Float,
            v => FieldType::Unknown(v),
        }
    }
}

impl FieldType {
    /// Tag byte used by the schema file
    pub fn tag(self) -> u8 {
        match self {
            FieldType::String => 0,
            FieldType::Integer => 1,
            FieldType::Float => 2,
            FieldType::Unknown(v) => v,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Float => f.write_str("float"),
            FieldType::Unknown(v) => write!(f, "unknown({})", v),
        }
    }
}

/// Text as stored in the database files
///
/// The game writes text in a legacy single-byte codepage, so the raw bytes
/// are kept untouched. `Display` and [`DbString::to_string_lossy`] decode
/// them as UTF-8 for reporting only.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbString(Vec<u8>);

impl DbString {
    /// Build from a fixed-width field, dropping every trailing NUL byte
    ///
    /// Interior NULs are kept: `b"a\0b\0\0"` becomes `b"a\0b"`.
    pub fn from_padded(bytes: &[u8]) -> Self {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
        DbString(bytes[..end].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for DbString {
    fn from(s: &str) -> Self {
        DbString(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for DbString {
    fn from(bytes: Vec<u8>) -> Self {
        DbString(bytes)
    }
}

impl PartialEq<str> for DbString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for DbString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Debug for DbString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

impl fmt::Display for DbString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_string_lossy())
    }
}

/// Decoded payload of a field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(DbString),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn as_text(&self) -> Option<&DbString> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Type this payload was decoded as
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Text(_) => FieldType::String,
            Value::Integer(_) => FieldType::Integer,
            Value::Float(_) => FieldType::Float,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}
