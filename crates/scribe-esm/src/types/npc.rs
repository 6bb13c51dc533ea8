//! `NPC_` records: AI service flags and carried inventory.

use scribe_common::bytes::decode_cstring;
use scribe_common::BinaryReader;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{
    project_to_structured, FieldPolicy, Record, StructuredRecord, Tag, Value, BINARY_FIELDS,
};

/// Bits of the `AIDT` service flags.
pub mod services {
    pub const WEAPONS: u32 = 1 << 0;
    pub const ARMOR: u32 = 1 << 1;
    pub const CLOTHING: u32 = 1 << 2;
    pub const BOOKS: u32 = 1 << 3;
    pub const INGREDIENTS: u32 = 1 << 4;
    pub const PICKS: u32 = 1 << 5;
    pub const PROBES: u32 = 1 << 6;
    pub const LIGHTS: u32 = 1 << 7;
    pub const APPARATUS: u32 = 1 << 8;
    pub const REPAIR_ITEMS: u32 = 1 << 9;
    pub const MISC: u32 = 1 << 10;
    pub const SPELLS: u32 = 1 << 11;
    pub const MAGIC_ITEMS: u32 = 1 << 12;
    pub const POTIONS: u32 = 1 << 13;
    pub const TRAINING: u32 = 1 << 14;
    pub const SPELLMAKING: u32 = 1 << 15;
    pub const ENCHANTING: u32 = 1 << 16;
    pub const REPAIR: u32 = 1 << 17;
}

/// The `AIDT` payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AiData {
    pub hello: u8,
    pub unknown1: u8,
    pub fight: u8,
    pub flee: u8,
    pub alarm: u8,
    pub unknown2: [u8; 3],
    pub flags: U32,
}

/// Width of the item id slot in an `NPCO` entry.
const ITEM_ID_LEN: usize = 32;

/// One carried item (`NPCO`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    /// Stack size; negative counts restock.
    pub count: i32,
    /// Item identifier.
    pub id: String,
    raw: Vec<u8>,
}

impl InventoryItem {
    fn parse(raw: &[u8]) -> Self {
        let mut reader = BinaryReader::new(raw);
        let count = reader.read_i32().unwrap_or(0);
        let id = decode_cstring(&reader.remaining_bytes()[..reader.remaining().min(ITEM_ID_LEN)]);
        Self {
            count,
            id,
            raw: raw.to_vec(),
        }
    }
}

/// A non-player character.
#[derive(Debug, Clone)]
pub struct Npc {
    id: String,
    ai: Option<AiData>,
    inventory: Vec<InventoryItem>,
    deleted: bool,
    fields: StructuredRecord,
}

impl Npc {
    /// Projection policy for `NPC_` records.
    pub const POLICY: FieldPolicy<'static> =
        FieldPolicy::new(BINARY_FIELDS, &[Tag::NPCO, Tag::NPCS]);

    /// Decode an `NPC_` record. Returns `None` without a `NAME`.
    pub fn from_record(record: &Record) -> Option<Self> {
        Self::from_structured(project_to_structured(record, &Self::POLICY))
    }

    /// Build the view from an already projected record.
    pub fn from_structured(fields: StructuredRecord) -> Option<Self> {
        let id = fields.text(Tag::NAME)?.to_string();
        let ai = fields
            .bytes(Tag::AIDT)
            .and_then(|b| BinaryReader::new(b).read_struct::<AiData>().ok());
        let inventory = fields
            .values(Tag::NPCO)
            .iter()
            .filter_map(Value::as_bytes)
            .map(InventoryItem::parse)
            .collect();

        Some(Self {
            id,
            ai,
            inventory,
            deleted: fields.contains(Tag::DELE),
            fields,
        })
    }

    /// Unique identifier (`NAME`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the record is marked deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Service flags, if the NPC has AI data.
    pub fn ai_flags(&self) -> Option<u32> {
        self.ai.map(|ai| ai.flags.get())
    }

    /// Whether any of the given service bits is set.
    pub fn offers(&self, mask: u32) -> bool {
        self.ai_flags().is_some_and(|flags| flags & mask != 0)
    }

    /// Clear service bits. Returns whether anything changed.
    pub fn withdraw(&mut self, mask: u32) -> bool {
        match &mut self.ai {
            Some(ai) if ai.flags.get() & mask != 0 => {
                ai.flags = U32::new(ai.flags.get() & !mask);
                true
            }
            _ => false,
        }
    }

    /// Carried items in order.
    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    /// Keep only the items matching `keep`. Returns whether any was removed.
    pub fn retain_inventory<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&InventoryItem) -> bool,
    {
        let before = self.inventory.len();
        self.inventory.retain(|item| keep(item));
        self.inventory.len() != before
    }

    /// The record with the edits made through this view.
    pub fn to_structured(&self) -> StructuredRecord {
        let mut fields = self.fields.clone();
        if let Some(ai) = &self.ai {
            let mut aidt = ai.as_bytes().to_vec();
            if let Some(tail) = fields
                .bytes(Tag::AIDT)
                .and_then(|b| b.get(std::mem::size_of::<AiData>()..))
            {
                aidt.extend_from_slice(tail);
            }
            fields.set(Tag::AIDT, aidt);
        }
        if fields.contains(Tag::NPCO) {
            let items = self
                .inventory
                .iter()
                .map(|item| Value::Bytes(item.raw.clone()))
                .collect();
            fields.set_repeated(Tag::NPCO, items);
        }
        fields
    }

    /// Encode the record.
    pub fn encode(&self) -> Vec<u8> {
        self.to_structured().encode()
    }
}
