//! Scribe - learnable scrolls for Morrowind/OpenMW load orders.
//!
//! This crate provides a unified interface to the Scribe library ecosystem.
//!
//! # Crates
//!
//! - [`scribe_common`] - Common utilities (binary reading and writing, field encoders)
//! - [`scribe_esm`] - Plugin record container (codec, scanner, typed records)
//! - [`scribe_magic`] - Load-order merge, school scoring, spell derivation, output modules
//!
//! # Example
//!
//! ```no_run
//! use scribe::prelude::*;
//!
//! let corpus = Corpus::scan_files(["Morrowind.esm", "Tribunal.esm"])?;
//! let derivation = derive(corpus, &mut rand::thread_rng());
//! println!("Spells: {}", derivation.spells.len());
//!
//! let paths = OutputAssembler::default().write("output", &derivation)?;
//! println!("Wrote {}", paths.scribe.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use scribe_common as common;
pub use scribe_esm as esm;
pub use scribe_magic as magic;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use scribe_common::{BinaryReader, BinaryWriter};
    pub use scribe_esm::types::{Book, Enchantment, Npc, Script, Spell, TypedRecord};
    pub use scribe_esm::{FileHeader, Record, RecordScanner, StructuredRecord, Tag};
    pub use scribe_magic::{
        derive, is_own_output, Corpus, CostRoll, Derivation, OutputAssembler, School, SchoolStats,
    };
}

// Re-export commonly used types at the crate root
pub use scribe_magic::{derive, Corpus, OutputAssembler};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
