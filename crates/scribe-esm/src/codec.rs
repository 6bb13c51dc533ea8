//! Generic decode and encode of record containers.

use scribe_common::bytes::decode_cstring;
use scribe_common::{BinaryReader, BinaryWriter};

use crate::record::{RECORD_HEADER_LEN, SUB_RECORD_HEADER_LEN};
use crate::{Error, Field, Record, Result, StructuredRecord, SubRecord, Tag, Value};

/// Sub-records that hold binary data rather than text.
pub const BINARY_FIELDS: &[Tag] = &[
    Tag::BKDT,
    Tag::DELE,
    Tag::ENDT,
    Tag::NPDT,
    Tag::FLAG,
    Tag::NPCO,
    Tag::NPCS,
    Tag::AIDT,
    Tag::AI_W,
    Tag::AI_T,
    Tag::AI_F,
    Tag::AI_E,
    Tag::AI_A,
    Tag::DODT,
    Tag::XSCL,
];

/// How a record type's sub-records are projected.
///
/// The same tag can mean different things in different record types (an
/// `ENAM` is an enchantment id in a book but a binary effect in an
/// enchantment), so the policy is always passed explicitly.
#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy<'a> {
    /// Tags kept as raw bytes; everything else is decoded as a C string.
    pub binary: &'a [Tag],
    /// Tags collected into an ordered sequence instead of overwritten.
    pub repeatable: &'a [Tag],
}

impl<'a> FieldPolicy<'a> {
    /// Create a policy.
    pub const fn new(binary: &'a [Tag], repeatable: &'a [Tag]) -> Self {
        Self { binary, repeatable }
    }

    fn is_binary(&self, tag: Tag) -> bool {
        self.binary.contains(&tag)
    }

    fn is_repeatable(&self, tag: Tag) -> bool {
        self.repeatable.contains(&tag)
    }
}

/// Decode one sub-record from the front of `buffer`.
///
/// Returns the sub-record and the bytes that follow it.
pub fn decode_sub_record(buffer: &[u8]) -> Result<(SubRecord, &[u8])> {
    if buffer.len() < SUB_RECORD_HEADER_LEN {
        return Err(Error::TruncatedInput {
            needed: SUB_RECORD_HEADER_LEN,
            available: buffer.len(),
        });
    }

    let mut reader = BinaryReader::new(buffer);
    let tag = Tag::new(reader.read_array()?);
    let len = reader.read_u32()? as usize;
    let rest = reader.remaining_bytes();

    if rest.len() < len {
        return Err(Error::TruncatedInput {
            needed: len,
            available: rest.len(),
        });
    }

    let (payload, rest) = rest.split_at(len);
    Ok((SubRecord::new(tag, payload), rest))
}

/// Decode the sub-records of a record body of `declared_len` bytes.
pub fn decode_record_body(buffer: &[u8], declared_len: usize) -> Result<Vec<SubRecord>> {
    if buffer.len() < declared_len {
        return Err(Error::TruncatedInput {
            needed: declared_len,
            available: buffer.len(),
        });
    }

    let mut remains = &buffer[..declared_len];
    let mut sub_records = Vec::new();

    while !remains.is_empty() {
        match decode_sub_record(remains) {
            Ok((sub, rest)) => {
                sub_records.push(sub);
                remains = rest;
            }
            Err(Error::TruncatedInput { needed, .. }) => {
                let tag_len = remains.len().min(4);
                return Err(Error::MalformedSubRecord {
                    tag: String::from_utf8_lossy(&remains[..tag_len]).into_owned(),
                    declared: needed,
                    remaining: remains.len().saturating_sub(SUB_RECORD_HEADER_LEN),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(sub_records)
}

/// Project a record into a tag/value map.
///
/// Later occurrences of a non-repeatable tag overwrite earlier ones.
pub fn project_to_structured(record: &Record, policy: &FieldPolicy<'_>) -> StructuredRecord {
    let mut structured = StructuredRecord::new(record.tag);

    for sub in &record.sub_records {
        let value = if policy.is_binary(sub.tag) {
            Value::Bytes(sub.payload.clone())
        } else {
            Value::Text(decode_cstring(&sub.payload))
        };

        if policy.is_repeatable(sub.tag) {
            structured.push(sub.tag, value);
        } else {
            structured.set(sub.tag, value);
        }
    }

    structured
}

/// Book text is the one text field the engine stores without a terminator.
fn is_unterminated_text(record_tag: Tag, field_tag: Tag) -> bool {
    record_tag == Tag::BOOK && field_tag == Tag::TEXT
}

fn write_value(writer: &mut BinaryWriter, record_tag: Tag, field_tag: Tag, value: &Value) {
    writer.write_tag(field_tag.bytes());
    match value {
        Value::Text(text) if is_unterminated_text(record_tag, field_tag) => {
            writer.write_u32(text.len() as u32).write_bytes(text.as_bytes());
        }
        Value::Text(text) => {
            writer
                .write_u32(text.len() as u32 + 1)
                .write_bytes(text.as_bytes())
                .write_zeros(1);
        }
        Value::Bytes(bytes) => {
            writer.write_u32(bytes.len() as u32).write_bytes(bytes);
        }
    }
}

/// Encode a record from ordered fields.
///
/// Fields are written in the given order; repeated fields emit one
/// sub-record per value. The 8 header bytes after the body length are
/// written as zeros.
pub fn encode_record(record_tag: Tag, fields: &[(Tag, Field)]) -> Vec<u8> {
    let mut body = BinaryWriter::new();
    for (tag, field) in fields {
        for value in field.values() {
            write_value(&mut body, record_tag, *tag, value);
        }
    }

    let mut writer = BinaryWriter::with_capacity(RECORD_HEADER_LEN + body.len());
    writer
        .write_tag(record_tag.bytes())
        .write_u32(body.len() as u32)
        .write_zeros(8)
        .write_bytes(body.as_bytes());
    writer.into_inner()
}
