//! Record schema definition.

use crate::error::{CodecError, CodecResult};
use std::collections::HashSet;

/// An ordered list of unique field names.
///
/// The schema is fixed at store construction and defines the serialization
/// order of every record written to or read from that store instance. Field
/// order on read must match the schema used on write; the schema itself is
/// never written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Creates a schema from an ordered list of field names.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptySchema`] if the list is empty and
    /// [`CodecError::DuplicateField`] if a name appears more than once.
    pub fn new(fields: Vec<String>) -> CodecResult<Self> {
        if fields.is_empty() {
            return Err(CodecError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for name in &fields {
            if !seen.insert(name.as_str()) {
                return Err(CodecError::duplicate_field(name));
            }
        }

        Ok(Self { fields })
    }

    /// Returns the field names in serialization order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    ///
    /// Always `false` for a successfully constructed schema.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the schema contains the given field name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}
