//! `SCPT` records.

use scribe_common::BinaryWriter;

use crate::{StructuredRecord, Tag};

/// Width of the name slot in `SCHD`.
pub const SCRIPT_NAME_LEN: usize = 32;

/// A compiled-on-load script: header, (empty) bytecode, and source text.
///
/// OpenMW compiles `SCTX` itself, so no bytecode or local variable table is
/// written; the `SCDT` field is present but empty.
#[derive(Debug, Clone)]
pub struct Script {
    pub id: String,
    pub text: String,
}

impl Script {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// The 52 byte `SCHD`: padded name, then five zero counters
    /// (shorts, longs, floats, data size, local var size).
    pub fn header_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(SCRIPT_NAME_LEN + 20);
        writer.write_padded_string(&self.id, SCRIPT_NAME_LEN);
        for _ in 0..5 {
            writer.write_i32(0);
        }
        writer.into_inner()
    }

    pub fn to_structured(&self) -> StructuredRecord {
        let mut record = StructuredRecord::new(Tag::SCPT);
        record
            .set(Tag::SCHD, self.header_bytes())
            .set(Tag::SCDT, Vec::new())
            .set(Tag::SCTX, self.text.as_bytes().to_vec());
        record
    }

    pub fn encode(&self) -> Vec<u8> {
        self.to_structured().encode()
    }
}
