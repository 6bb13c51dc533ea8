//! Raw records and sub-records.

use scribe_common::BinaryWriter;

use crate::Tag;

/// Size of a record header: tag, body length, unknown word, flags.
pub const RECORD_HEADER_LEN: usize = 16;

/// Size of a sub-record header: tag and payload length.
pub const SUB_RECORD_HEADER_LEN: usize = 8;

/// A typed, length-prefixed field inside a record body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRecord {
    /// Type code of the field.
    pub tag: Tag,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl SubRecord {
    /// Create a sub-record.
    pub fn new(tag: Tag, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    /// Size of this sub-record on disk, header included.
    pub fn encoded_len(&self) -> usize {
        SUB_RECORD_HEADER_LEN + self.payload.len()
    }

    /// Append the on-disk form of this sub-record.
    pub fn write(&self, writer: &mut BinaryWriter) {
        writer
            .write_tag(self.tag.bytes())
            .write_u32(self.payload.len() as u32)
            .write_bytes(&self.payload);
    }
}

/// A top-level record: a type code and its ordered sub-records.
///
/// The 8 header bytes after the body length are kept verbatim so that a
/// decoded record re-encodes to exactly the bytes it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Type code of the record.
    pub tag: Tag,
    /// Header word of unknown purpose.
    pub unknown: u32,
    /// Record flags.
    pub flags: u32,
    /// Sub-records in stream order.
    pub sub_records: Vec<SubRecord>,
}

impl Record {
    /// Create a record with zeroed header words.
    pub fn new(tag: Tag, sub_records: Vec<SubRecord>) -> Self {
        Self {
            tag,
            unknown: 0,
            flags: 0,
            sub_records,
        }
    }

    /// Length of the body as declared in the record header.
    pub fn body_len(&self) -> usize {
        self.sub_records.iter().map(SubRecord::encoded_len).sum()
    }

    /// First sub-record with the given tag.
    pub fn find(&self, tag: Tag) -> Option<&SubRecord> {
        self.sub_records.iter().find(|s| s.tag == tag)
    }

    /// Encode the record exactly as stored.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body_len = self.body_len();
        let mut writer = BinaryWriter::with_capacity(RECORD_HEADER_LEN + body_len);
        writer
            .write_tag(self.tag.bytes())
            .write_u32(body_len as u32)
            .write_u32(self.unknown)
            .write_u32(self.flags);
        for sub in &self.sub_records {
            sub.write(&mut writer);
        }
        writer.into_inner()
    }
}
