//! `BOOK` records: books and scrolls.

use scribe_common::BinaryReader;
use zerocopy::byteorder::little_endian::{F32, I32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{project_to_structured, FieldPolicy, Record, StructuredRecord, Tag, BINARY_FIELDS};

/// The `BKDT` payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BookData {
    pub weight: F32,
    pub value: I32,
    /// 1 for scrolls, 0 for books.
    pub scroll: I32,
    /// Skill raised by reading, -1 for none.
    pub skill: I32,
    pub enchant_points: I32,
}

impl BookData {
    /// Whether the book is a single-use scroll.
    ///
    /// Only the low byte of the flag is significant.
    pub fn is_scroll(&self) -> bool {
        self.scroll.get() & 0xFF == 1
    }
}

/// A book or scroll item.
#[derive(Debug, Clone)]
pub struct Book {
    id: String,
    name: Option<String>,
    text: Option<String>,
    enchantment: Option<String>,
    script: Option<String>,
    data: Option<BookData>,
    deleted: bool,
    fields: StructuredRecord,
}

impl Book {
    /// Projection policy for `BOOK` records.
    pub const POLICY: FieldPolicy<'static> = FieldPolicy::new(BINARY_FIELDS, &[]);

    /// Decode a `BOOK` record. Returns `None` without a `NAME`.
    pub fn from_record(record: &Record) -> Option<Self> {
        Self::from_structured(project_to_structured(record, &Self::POLICY))
    }

    /// Build the view from an already projected record.
    pub fn from_structured(fields: StructuredRecord) -> Option<Self> {
        let id = fields.text(Tag::NAME)?.to_string();
        let data = fields
            .bytes(Tag::BKDT)
            .and_then(|b| BinaryReader::new(b).read_struct::<BookData>().ok());

        Some(Self {
            id,
            name: fields.text(Tag::FNAM).map(str::to_string),
            text: fields.text(Tag::TEXT).map(str::to_string),
            enchantment: fields.text(Tag::ENAM).map(str::to_string),
            script: fields.text(Tag::SCRI).map(str::to_string),
            data,
            deleted: fields.contains(Tag::DELE),
            fields,
        })
    }

    /// Unique identifier (`NAME`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (`FNAM`).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Book text (`TEXT`).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Identifier of the attached enchantment (`ENAM`).
    pub fn enchantment(&self) -> Option<&str> {
        self.enchantment.as_deref()
    }

    /// Identifier of the attached script (`SCRI`).
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// The `BKDT` data, if present and well-sized.
    pub fn data(&self) -> Option<&BookData> {
        self.data.as_ref()
    }

    /// Whether the record is marked deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// A live, enchanted, single-use scroll.
    pub fn is_scroll(&self) -> bool {
        !self.deleted
            && self.enchantment.is_some()
            && self.data.is_some_and(|d| d.is_scroll())
    }

    /// Append markup to the book text.
    pub fn append_text(&mut self, markup: &str) {
        self.text.get_or_insert_with(String::new).push_str(markup);
    }

    /// Attach a script.
    pub fn set_script(&mut self, script: impl Into<String>) {
        self.script = Some(script.into());
    }

    /// The record with the edits made through this view.
    pub fn to_structured(&self) -> StructuredRecord {
        let mut fields = self.fields.clone();
        if let Some(text) = &self.text {
            fields.set(Tag::TEXT, text.as_str());
        }
        if let Some(script) = &self.script {
            fields.set(Tag::SCRI, script.as_str());
        }
        fields
    }

    /// Encode the record.
    pub fn encode(&self) -> Vec<u8> {
        self.to_structured().encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubRecord;
    use zerocopy::IntoBytes;

    fn bkdt(scroll: i32) -> Vec<u8> {
        BookData {
            weight: F32::new(0.2),
            value: I32::new(50),
            scroll: I32::new(scroll),
            skill: I32::new(-1),
            enchant_points: I32::new(0),
        }
        .as_bytes()
        .to_vec()
    }

    fn scroll_record() -> Record {
        Record::new(
            Tag::BOOK,
            vec![
                SubRecord::new(Tag::NAME, b"sc_test\0".to_vec()),
                SubRecord::new(Tag::FNAM, b"Scroll of Test\0".to_vec()),
                SubRecord::new(Tag::BKDT, bkdt(1)),
                SubRecord::new(Tag::TEXT, b"Words".to_vec()),
                SubRecord::new(Tag::ENAM, b"ench_test\0".to_vec()),
            ],
        )
    }

    #[test]
    fn test_book_data_size() {
        assert_eq!(std::mem::size_of::<BookData>(), 20);
    }

    #[test]
    fn test_scroll_detection() {
        let book = Book::from_record(&scroll_record()).unwrap();
        assert_eq!(book.id(), "sc_test");
        assert_eq!(book.name(), Some("Scroll of Test"));
        assert_eq!(book.enchantment(), Some("ench_test"));
        assert!(book.is_scroll());

        let mut plain = scroll_record();
        plain.sub_records[2].payload = bkdt(0);
        assert!(!Book::from_record(&plain).unwrap().is_scroll());

        let mut deleted = scroll_record();
        deleted.sub_records.push(SubRecord::new(Tag::DELE, vec![0u8; 4]));
        assert!(!Book::from_record(&deleted).unwrap().is_scroll());

        let mut unenchanted = scroll_record();
        unenchanted.sub_records.pop();
        assert!(!Book::from_record(&unenchanted).unwrap().is_scroll());
    }

    #[test]
    fn test_scroll_flag_low_byte_only() {
        let mut record = scroll_record();
        record.sub_records[2].payload = bkdt(0x0101);
        assert!(Book::from_record(&record).unwrap().is_scroll());
    }

    #[test]
    fn test_edits_are_encoded() {
        let mut book = Book::from_record(&scroll_record()).unwrap();
        book.append_text("<BR>more");
        book.set_script("lrn_sc_test");

        let fields = book.to_structured();
        assert_eq!(fields.text(Tag::TEXT), Some("Words<BR>more"));
        assert_eq!(fields.text(Tag::SCRI), Some("lrn_sc_test"));
        // The new script reference goes after the existing fields.
        assert_eq!(fields.fields().last().map(|(t, _)| *t), Some(Tag::SCRI));
    }

    #[test]
    fn test_unedited_book_round_trips() {
        let record = scroll_record();
        let book = Book::from_record(&record).unwrap();
        assert_eq!(book.encode(), record.to_bytes());
    }
}
