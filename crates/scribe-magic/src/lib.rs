//! Spell scribing for Morrowind/OpenMW load orders.
//!
//! Given every plugin of a load order, this crate works out which scrolls
//! the player could learn, how hard each would be to learn, and produces
//! two plugins:
//!
//! - a *scribe* module with one learning script and one spell per scroll,
//!   and the scrolls themselves rewired to run that script, and
//! - a *no-sale* module with merchants that no longer sell spells or those
//!   scrolls.
//!
//! # Pipeline
//!
//! 1. [`Corpus`] scans the plugins in load order and keeps the last
//!    definition of every book, enchantment and NPC.
//! 2. [`derive`] classifies each scroll ([`ScrollState`]), scores its
//!    enchantment with the six magic [`School`]s, and builds the records.
//! 3. [`OutputAssembler`] packs the records into the two modules.
//!
//! # Example
//!
//! ```no_run
//! use scribe_magic::{derive, Corpus, OutputAssembler};
//!
//! let mut corpus = Corpus::new();
//! for path in ["Morrowind.esm", "Tribunal.esm", "Bloodmoon.esm"] {
//!     corpus.scan_file(path)?;
//! }
//!
//! let derivation = derive(corpus, &mut rand::thread_rng());
//! OutputAssembler::default().write("output", &derivation)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod derive;
mod error;
mod merge;
mod output;
mod school;
mod script;
mod spell_name;

pub use derive::{classify_scroll, derive, spell_cost, Derivation, ScrollState, RANDOM_SCROLL};
pub use error::{Error, Result};
pub use merge::{merge_by_identifier, partition, Corpus, Identified, LoadOrder};
pub use output::{
    is_own_output, OutputAssembler, OutputPaths, AUTHOR, NO_SALE_DESCRIPTION, NO_SALE_MODULE,
    SCRIBE_DESCRIPTION, SCRIBE_MODULE,
};
pub use school::{CostRoll, School, SchoolStat, SchoolStats};
pub use script::learning_script;
pub use spell_name::spell_name_from_scroll;
