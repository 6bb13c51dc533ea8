//! Records projected into ordered tag/value maps.

use std::slice;

use crate::codec::encode_record;
use crate::Tag;

/// A decoded sub-record payload.
///
/// The variant is the type hint used when encoding: text gets a trailing
/// zero byte, raw bytes are written as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null-terminated ASCII text, stored without the terminator.
    Text(String),
    /// Raw binary payload.
    Bytes(Vec<u8>),
}

impl Value {
    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Bytes(_) => None,
        }
    }

    /// The bytes, if this is a binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(_) => None,
            Value::Bytes(b) => Some(b),
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

/// The value(s) stored under one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A tag that occurs at most once.
    Single(Value),
    /// A repeatable tag, in stream order.
    Repeated(Vec<Value>),
}

impl Field {
    /// All values of the field, in order.
    pub fn values(&self) -> &[Value] {
        match self {
            Field::Single(v) => slice::from_ref(v),
            Field::Repeated(vs) => vs,
        }
    }
}

/// A record viewed as an ordered mapping from sub-record tag to value.
///
/// Fields keep the position of their first occurrence; overwriting a field
/// keeps its position and appending a new one puts it at the end. That
/// order is the order the record is encoded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredRecord {
    tag: Tag,
    fields: Vec<(Tag, Field)>,
}

impl StructuredRecord {
    /// Create an empty record of the given type.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            fields: Vec::new(),
        }
    }

    /// Record type code.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Fields in encoding order.
    pub fn fields(&self) -> &[(Tag, Field)] {
        &self.fields
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field stored under `tag`.
    pub fn get(&self, tag: Tag) -> Option<&Field> {
        self.fields.iter().find(|(t, _)| *t == tag).map(|(_, f)| f)
    }

    fn get_mut(&mut self, tag: Tag) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|(t, _)| *t == tag)
            .map(|(_, f)| f)
    }

    /// Whether a field is present.
    pub fn contains(&self, tag: Tag) -> bool {
        self.get(tag).is_some()
    }

    /// Text of a single-valued text field.
    pub fn text(&self, tag: Tag) -> Option<&str> {
        match self.get(tag)? {
            Field::Single(v) => v.as_text(),
            Field::Repeated(_) => None,
        }
    }

    /// Bytes of a single-valued binary field.
    pub fn bytes(&self, tag: Tag) -> Option<&[u8]> {
        match self.get(tag)? {
            Field::Single(v) => v.as_bytes(),
            Field::Repeated(_) => None,
        }
    }

    /// All values under `tag`, empty when the field is absent.
    pub fn values(&self, tag: Tag) -> &[Value] {
        self.get(tag).map(Field::values).unwrap_or(&[])
    }

    /// Set a single-valued field, replacing any previous value in place.
    pub fn set(&mut self, tag: Tag, value: impl Into<Value>) -> &mut Self {
        let field = Field::Single(value.into());
        match self.get_mut(tag) {
            Some(existing) => *existing = field,
            None => self.fields.push((tag, field)),
        }
        self
    }

    /// Append a value to a repeatable field, creating it if needed.
    pub fn push(&mut self, tag: Tag, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.get_mut(tag) {
            Some(Field::Repeated(values)) => values.push(value),
            Some(existing) => {
                let previous = std::mem::replace(existing, Field::Repeated(Vec::new()));
                let mut values = previous.values().to_vec();
                values.push(value);
                *existing = Field::Repeated(values);
            }
            None => self.fields.push((tag, Field::Repeated(vec![value]))),
        }
        self
    }

    /// Replace every value of a repeatable field.
    pub fn set_repeated(&mut self, tag: Tag, values: Vec<Value>) -> &mut Self {
        let field = Field::Repeated(values);
        match self.get_mut(tag) {
            Some(existing) => *existing = field,
            None => self.fields.push((tag, field)),
        }
        self
    }

    /// Remove a field.
    pub fn remove(&mut self, tag: Tag) -> Option<Field> {
        let index = self.fields.iter().position(|(t, _)| *t == tag)?;
        Some(self.fields.remove(index).1)
    }

    /// Encode into container bytes.
    pub fn encode(&self) -> Vec<u8> {
        encode_record(self.tag, &self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_position() {
        let mut record = StructuredRecord::new(Tag::BOOK);
        record.set(Tag::NAME, "sc_a").set(Tag::TEXT, "old");
        record.set(Tag::NAME, "sc_b").set(Tag::SCRI, "lrn_sc_b");

        let order: Vec<Tag> = record.fields().iter().map(|(t, _)| *t).collect();
        assert_eq!(order, vec![Tag::NAME, Tag::TEXT, Tag::SCRI]);
        assert_eq!(record.text(Tag::NAME), Some("sc_b"));
    }

    #[test]
    fn test_push_repeated() {
        let mut record = StructuredRecord::new(Tag::NPC_);
        record.push(Tag::NPCO, vec![1u8]).push(Tag::NPCO, vec![2u8]);

        assert_eq!(record.values(Tag::NPCO).len(), 2);
        assert!(record.bytes(Tag::NPCO).is_none());
        assert!(record.values(Tag::NPCS).is_empty());
    }

    #[test]
    fn test_push_onto_single() {
        let mut record = StructuredRecord::new(Tag::ENCH);
        record.set(Tag::ENAM, vec![1u8]).push(Tag::ENAM, vec![2u8]);

        let values = record.values(Tag::ENAM);
        assert_eq!(values, [Value::Bytes(vec![1]), Value::Bytes(vec![2])]);
    }

    #[test]
    fn test_remove() {
        let mut record = StructuredRecord::new(Tag::BOOK);
        record.set(Tag::NAME, "a").set(Tag::DELE, vec![0u8; 4]);
        assert!(record.remove(Tag::DELE).is_some());
        assert!(!record.contains(Tag::DELE));
        assert_eq!(record.len(), 1);
    }
}
