//! `SPEL` records.

use zerocopy::byteorder::little_endian::I32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{StructuredRecord, Tag, Value};

/// The `SPDT` payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct SpellData {
    /// 0 spell, 1 ability, 2 blight, 3 disease, 4 curse, 5 power.
    pub kind: I32,
    pub cost: I32,
    pub flags: I32,
}

/// A castable spell built from existing effect entries.
#[derive(Debug, Clone)]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub cost: i32,
    /// Effect entries copied verbatim, in order.
    pub effects: Vec<Vec<u8>>,
}

impl Spell {
    /// A plain spell (`kind` 0, no flags).
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: i32, effects: Vec<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            effects,
        }
    }

    /// The `SPDT` payload.
    pub fn data(&self) -> SpellData {
        SpellData {
            kind: I32::new(0),
            cost: I32::new(self.cost),
            flags: I32::new(0),
        }
    }

    /// The record, fields in engine order.
    pub fn to_structured(&self) -> StructuredRecord {
        let mut record = StructuredRecord::new(Tag::SPEL);
        record
            .set(Tag::NAME, self.id.as_str())
            .set(Tag::FNAM, self.name.as_str())
            .set(Tag::SPDT, self.data().as_bytes().to_vec())
            .set_repeated(
                Tag::ENAM,
                self.effects.iter().cloned().map(Value::Bytes).collect(),
            );
        record
    }

    /// Encode the record.
    pub fn encode(&self) -> Vec<u8> {
        self.to_structured().encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordScanner;

    #[test]
    fn test_spell_layout() {
        let spell = Spell::new("spl_sc_test", "Scribed Test", 40, vec![vec![7u8; 24], vec![8u8; 24]]);
        let bytes = spell.encode();
        let record = RecordScanner::new(&bytes[..]).next().unwrap().unwrap();

        let tags: Vec<Tag> = record.sub_records.iter().map(|s| s.tag).collect();
        assert_eq!(tags, vec![Tag::NAME, Tag::FNAM, Tag::SPDT, Tag::ENAM, Tag::ENAM]);
        assert_eq!(record.sub_records[0].payload, b"spl_sc_test\0");
        assert_eq!(
            record.sub_records[2].payload,
            [0i32.to_le_bytes(), 40i32.to_le_bytes(), 0i32.to_le_bytes()].concat()
        );
        assert_eq!(record.sub_records[4].payload, vec![8u8; 24]);
    }
}
