//! Record container codec for Morrowind/OpenMW plugin files.
//!
//! Plugin files (`.esm`, `.esp`, `.omwaddon`) are flat sequences of typed,
//! length-prefixed records. Each record body is itself a sequence of typed,
//! length-prefixed sub-records:
//!
//! ```text
//! record     = tag(4) | body length u32 | unknown u32 | flags u32 | body
//! body       = sub-record*
//! sub-record = tag(4) | payload length u32 | payload
//! ```
//!
//! This crate decodes that layout into [`Record`]s, projects them into
//! [`StructuredRecord`]s under an explicit [`FieldPolicy`], offers typed
//! views for the record kinds Scribe works with, and encodes everything back
//! into the exact bytes the engine expects.
//!
//! # Example
//!
//! ```no_run
//! use scribe_esm::{RecordScanner, Tag, types::Book};
//!
//! for record in RecordScanner::open("Morrowind.esm")? {
//!     let record = record?;
//!     if record.tag == Tag::BOOK {
//!         if let Some(book) = Book::from_record(&record) {
//!             println!("{} scroll={}", book.id(), book.is_scroll());
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod error;
mod header;
mod record;
mod scanner;
mod structured;
mod tag;

pub mod types;

pub use codec::{
    decode_record_body, decode_sub_record, encode_record, project_to_structured, FieldPolicy,
    BINARY_FIELDS,
};
pub use error::{Error, Result};
pub use header::FileHeader;
pub use record::{Record, SubRecord, RECORD_HEADER_LEN, SUB_RECORD_HEADER_LEN};
pub use scanner::RecordScanner;
pub use structured::{Field, StructuredRecord, Value};
pub use tag::Tag;
