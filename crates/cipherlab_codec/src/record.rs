//! Record and field value types.

use std::collections::HashMap;

/// A single field payload: raw binary or UTF-8 text.
///
/// Text is promoted to its UTF-8 bytes on encode; decoding always yields
/// [`FieldValue::Bytes`] since the wire format carries no type information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Raw binary payload.
    Bytes(Vec<u8>),
    /// UTF-8 text payload.
    Text(String),
}

impl FieldValue {
    /// Returns the payload as bytes, with text viewed as its UTF-8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A mapping from field name to payload.
///
/// A field may be absent, in which case it encodes as a zero length with no
/// data bytes. Fields not named by the schema are ignored on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: HashMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to the given value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Sets a field to a binary payload.
    pub fn set_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.set(name, FieldValue::Bytes(bytes));
    }

    /// Sets a field to a text payload.
    pub fn set_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.set(name, FieldValue::Text(text.into()));
    }

    /// Returns the value of a field, or `None` if the field is absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Returns the number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the present fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
