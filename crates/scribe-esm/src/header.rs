//! The `TES3` file header record.

use scribe_common::{BinaryReader, BinaryWriter};

use crate::{project_to_structured, Error, FieldPolicy, Record, Result, StructuredRecord, Tag};

/// Size of the `HEDR` payload.
pub const HEDR_LEN: usize = 300;

const AUTHOR_LEN: usize = 32;
const DESCRIPTION_LEN: usize = 256;

/// Header of a plugin file, stored as its first record.
///
/// Scribe never declares master files: its output is regenerated from the
/// current load order on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    /// Format version, 1.0 (or 1.3 in later tools).
    pub version: f32,
    /// File type flags.
    pub flags: u32,
    /// Author, at most 31 bytes survive encoding.
    pub author: String,
    /// Description, at most 255 bytes survive encoding.
    pub description: String,
    /// Number of records following the header.
    pub record_count: u32,
}

impl FileHeader {
    /// Create a version 1.0 header with no flags.
    pub fn new(author: impl Into<String>, description: impl Into<String>, record_count: u32) -> Self {
        Self {
            version: 1.0,
            flags: 0,
            author: author.into(),
            description: description.into(),
            record_count,
        }
    }

    /// Parse a header from a `TES3` record.
    pub fn from_record(record: &Record) -> Result<Self> {
        if record.tag != Tag::TES3 {
            return Err(Error::UnexpectedRecord {
                expected: Tag::TES3.to_string(),
                actual: record.tag.to_string(),
            });
        }

        let structured = project_to_structured(record, &FieldPolicy::new(&[Tag::HEDR], &[]));
        let hedr = structured.bytes(Tag::HEDR).unwrap_or_default();
        let mut reader = BinaryReader::new(hedr);

        Ok(Self {
            version: reader.read_f32()?,
            flags: reader.read_u32()?,
            author: reader.read_padded_string(AUTHOR_LEN)?,
            description: reader.read_padded_string(DESCRIPTION_LEN)?,
            record_count: reader.read_u32()?,
        })
    }

    /// Encode the `HEDR` payload.
    pub fn hedr_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(HEDR_LEN);
        writer
            .write_f32(self.version)
            .write_u32(self.flags)
            .write_padded_string(&self.author, AUTHOR_LEN)
            .write_padded_string(&self.description, DESCRIPTION_LEN)
            .write_u32(self.record_count);
        writer.into_inner()
    }

    /// The header as a record.
    pub fn to_structured(&self) -> StructuredRecord {
        let mut record = StructuredRecord::new(Tag::TES3);
        record.set(Tag::HEDR, self.hedr_bytes());
        record
    }

    /// Encode the header record.
    pub fn encode(&self) -> Vec<u8> {
        self.to_structured().encode()
    }
}
