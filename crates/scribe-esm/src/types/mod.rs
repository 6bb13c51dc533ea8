//! Typed views of the record kinds Scribe reads and writes.
//!
//! Each view decodes its record under the record type's own
//! [`FieldPolicy`](crate::FieldPolicy), exposes the fields the tool needs as
//! explicit (optional) values, and keeps every other field so the record
//! can be written back unchanged apart from the edits made through the view.

mod book;
mod enchantment;
mod npc;
mod script;
mod spell;

pub use book::{Book, BookData};
pub use enchantment::{EnchantData, Effect, Enchantment};
pub use npc::{services, AiData, InventoryItem, Npc};
pub use script::Script;
pub use spell::{Spell, SpellData};

use crate::{Record, Tag};

/// A record of one of the kinds read from the load order.
#[derive(Debug, Clone)]
pub enum TypedRecord {
    Book(Book),
    Enchantment(Enchantment),
    Npc(Npc),
}

impl TypedRecord {
    /// Record types with a typed view.
    pub const TAGS: [Tag; 3] = [Tag::BOOK, Tag::ENCH, Tag::NPC_];

    /// Decode a record, selecting the view by its type code.
    ///
    /// Returns `None` for other record types and for records without a
    /// `NAME` identifier.
    pub fn from_record(record: &Record) -> Option<Self> {
        match record.tag {
            Tag::BOOK => Book::from_record(record).map(TypedRecord::Book),
            Tag::ENCH => Enchantment::from_record(record).map(TypedRecord::Enchantment),
            Tag::NPC_ => Npc::from_record(record).map(TypedRecord::Npc),
            _ => None,
        }
    }

    /// Identifier of the record.
    pub fn id(&self) -> &str {
        match self {
            TypedRecord::Book(b) => b.id(),
            TypedRecord::Enchantment(e) => e.id(),
            TypedRecord::Npc(n) => n.id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubRecord;

    #[test]
    fn test_dispatch_by_tag() {
        let name = SubRecord::new(Tag::NAME, b"x\0".to_vec());

        let book = Record::new(Tag::BOOK, vec![name.clone()]);
        assert!(matches!(TypedRecord::from_record(&book), Some(TypedRecord::Book(_))));

        let npc = Record::new(Tag::NPC_, vec![name.clone()]);
        assert_eq!(TypedRecord::from_record(&npc).unwrap().id(), "x");

        let cell = Record::new(Tag::new(*b"CELL"), vec![name]);
        assert!(TypedRecord::from_record(&cell).is_none());

        let anonymous = Record::new(Tag::ENCH, Vec::new());
        assert!(TypedRecord::from_record(&anonymous).is_none());
    }
}
