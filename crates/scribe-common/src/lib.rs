//! Common utilities for Scribe.
//!
//! This crate provides the byte-level codec shared by every Scribe crate:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`BinaryWriter`] - Little-endian writing into a growable buffer
//! - [`bytes`] - Free functions for the fixed-width encodings of the format

mod error;
mod reader;
mod writer;

pub mod bytes;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
