//! `ENCH` records and the magic effect entries they share with spells.

use scribe_common::BinaryReader;
use tracing::warn;
use zerocopy::byteorder::little_endian::{I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{project_to_structured, FieldPolicy, Record, StructuredRecord, Tag, Value};

/// The `ENDT` payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct EnchantData {
    /// 0 cast once, 1 cast on strike, 2 cast when used, 3 constant effect.
    pub kind: I32,
    pub cost: U32,
    pub charge: I32,
    pub autocalc: I32,
}

/// One magic effect entry (`ENAM` in enchantments and spells).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct Effect {
    pub effect_id: U16,
    pub skill: i8,
    pub attribute: i8,
    /// 0 self, 1 touch, 2 target.
    pub range: I32,
    pub area: I32,
    /// Duration in ticks.
    pub duration: I32,
    pub min_magnitude: I32,
    pub max_magnitude: I32,
}

/// Binary fields of an enchantment; `ENAM` here is an effect, not an id.
const ENCHANTMENT_BINARY_FIELDS: &[Tag] = &[Tag::ENDT, Tag::DELE, Tag::ENAM];

/// An enchantment: a named bundle of magic effects.
#[derive(Debug, Clone)]
pub struct Enchantment {
    id: String,
    data: Option<EnchantData>,
    effects: Vec<Vec<u8>>,
    deleted: bool,
    fields: StructuredRecord,
}

impl Enchantment {
    /// Projection policy for `ENCH` records.
    pub const POLICY: FieldPolicy<'static> =
        FieldPolicy::new(ENCHANTMENT_BINARY_FIELDS, &[Tag::ENAM]);

    /// Decode an `ENCH` record. Returns `None` without a `NAME`.
    pub fn from_record(record: &Record) -> Option<Self> {
        Self::from_structured(project_to_structured(record, &Self::POLICY))
    }

    /// Build the view from an already projected record.
    pub fn from_structured(fields: StructuredRecord) -> Option<Self> {
        let id = fields.text(Tag::NAME)?.to_string();
        let data = fields
            .bytes(Tag::ENDT)
            .and_then(|b| BinaryReader::new(b).read_struct::<EnchantData>().ok());
        let effects = fields
            .values(Tag::ENAM)
            .iter()
            .filter_map(Value::as_bytes)
            .map(<[u8]>::to_vec)
            .collect();

        Some(Self {
            id,
            data,
            effects,
            deleted: fields.contains(Tag::DELE),
            fields,
        })
    }

    /// Unique identifier (`NAME`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `ENDT` data, if present and well-sized.
    pub fn data(&self) -> Option<&EnchantData> {
        self.data.as_ref()
    }

    /// Enchantment cost as stored, read unsigned.
    pub fn cost(&self) -> Option<u32> {
        self.data.map(|d| d.cost.get())
    }

    /// Whether the record is marked deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Effect entries exactly as stored, in order.
    pub fn raw_effects(&self) -> &[Vec<u8>] {
        &self.effects
    }

    /// Decoded effect entries. Entries too short to decode are skipped.
    pub fn effects(&self) -> impl Iterator<Item = Effect> + '_ {
        self.effects.iter().filter_map(move |raw| {
            match BinaryReader::new(raw).read_struct::<Effect>() {
                Ok(effect) => Some(effect),
                Err(e) => {
                    warn!(enchantment = %self.id, "skipping effect entry: {}", e);
                    None
                }
            }
        })
    }

    /// The underlying record.
    pub fn to_structured(&self) -> StructuredRecord {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubRecord;
    use zerocopy::IntoBytes;

    fn effect(id: u16, duration: i32, min: i32, max: i32) -> Vec<u8> {
        Effect {
            effect_id: U16::new(id),
            skill: -1,
            attribute: -1,
            range: I32::new(2),
            area: I32::new(0),
            duration: I32::new(duration),
            min_magnitude: I32::new(min),
            max_magnitude: I32::new(max),
        }
        .as_bytes()
        .to_vec()
    }

    fn endt(cost: u32) -> Vec<u8> {
        EnchantData {
            kind: I32::new(0),
            cost: U32::new(cost),
            charge: I32::new(0),
            autocalc: I32::new(0),
        }
        .as_bytes()
        .to_vec()
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<EnchantData>(), 16);
        assert_eq!(std::mem::size_of::<Effect>(), 24);
    }

    #[test]
    fn test_decode_enchantment() {
        let record = Record::new(
            Tag::ENCH,
            vec![
                SubRecord::new(Tag::NAME, b"ench_test\0".to_vec()),
                SubRecord::new(Tag::ENDT, endt(40)),
                SubRecord::new(Tag::ENAM, effect(23, 5, 20, 30)),
                SubRecord::new(Tag::ENAM, effect(75, 0, 10, 10)),
                SubRecord::new(Tag::ENAM, vec![1, 2, 3]),
            ],
        );
        let ench = Enchantment::from_record(&record).unwrap();

        assert_eq!(ench.id(), "ench_test");
        assert_eq!(ench.cost(), Some(40));
        assert!(!ench.is_deleted());
        assert_eq!(ench.raw_effects().len(), 3);

        let effects: Vec<Effect> = ench.effects().collect();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].effect_id.get(), 23);
        assert_eq!(effects[0].duration.get(), 5);
        assert_eq!(effects[0].min_magnitude.get(), 20);
        assert_eq!(effects[0].max_magnitude.get(), 30);
        assert_eq!(effects[1].effect_id.get(), 75);
    }

    #[test]
    fn test_effect_name_is_not_text() {
        // An effect payload full of zeros must survive as bytes.
        let record = Record::new(
            Tag::ENCH,
            vec![
                SubRecord::new(Tag::NAME, b"e\0".to_vec()),
                SubRecord::new(Tag::ENAM, vec![0u8; 24]),
            ],
        );
        let ench = Enchantment::from_record(&record).unwrap();
        assert_eq!(ench.raw_effects()[0], vec![0u8; 24]);
        assert_eq!(ench.to_structured().encode(), record.to_bytes());
    }
}
