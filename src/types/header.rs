//! Custom headers and metadata entries.

use std::fmt;

/// A custom MIME header added to a message or attachment.
///
/// Valid when both name and value are non-empty. Whitespace-only values are
/// accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CustomHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl CustomHeader {
    /// Create a new header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether both name and value are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }
}

impl fmt::Display for CustomHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// A key/value metadata entry attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
    /// Metadata key.
    pub key: String,
    /// Metadata value.
    pub value: String,
}

impl Metadata {
    /// Create a new metadata entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether both key and value are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}
