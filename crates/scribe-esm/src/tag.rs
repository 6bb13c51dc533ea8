//! Four character type codes.

use std::fmt;

/// A case-sensitive four byte ASCII type code, such as `BOOK` or `NAME`.
///
/// Tags name both records and the sub-records inside them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    // Record types.
    pub const TES3: Tag = Tag(*b"TES3");
    pub const BOOK: Tag = Tag(*b"BOOK");
    pub const ENCH: Tag = Tag(*b"ENCH");
    pub const NPC_: Tag = Tag(*b"NPC_");
    pub const SPEL: Tag = Tag(*b"SPEL");
    pub const SCPT: Tag = Tag(*b"SCPT");

    // Sub-record types.
    pub const HEDR: Tag = Tag(*b"HEDR");
    pub const NAME: Tag = Tag(*b"NAME");
    pub const FNAM: Tag = Tag(*b"FNAM");
    pub const TEXT: Tag = Tag(*b"TEXT");
    pub const SCRI: Tag = Tag(*b"SCRI");
    pub const ENAM: Tag = Tag(*b"ENAM");
    pub const BKDT: Tag = Tag(*b"BKDT");
    pub const DELE: Tag = Tag(*b"DELE");
    pub const ENDT: Tag = Tag(*b"ENDT");
    pub const NPDT: Tag = Tag(*b"NPDT");
    pub const FLAG: Tag = Tag(*b"FLAG");
    pub const NPCO: Tag = Tag(*b"NPCO");
    pub const NPCS: Tag = Tag(*b"NPCS");
    pub const AIDT: Tag = Tag(*b"AIDT");
    pub const AI_W: Tag = Tag(*b"AI_W");
    pub const AI_T: Tag = Tag(*b"AI_T");
    pub const AI_F: Tag = Tag(*b"AI_F");
    pub const AI_E: Tag = Tag(*b"AI_E");
    pub const AI_A: Tag = Tag(*b"AI_A");
    pub const DODT: Tag = Tag(*b"DODT");
    pub const XSCL: Tag = Tag(*b"XSCL");
    pub const SPDT: Tag = Tag(*b"SPDT");
    pub const SCHD: Tag = Tag(*b"SCHD");
    pub const SCDT: Tag = Tag(*b"SCDT");
    pub const SCTX: Tag = Tag(*b"SCTX");

    /// Create a tag from its four bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the tag.
    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Tag::NPC_.to_string(), "NPC_");
        assert_eq!(Tag::new([b'A', 0, b'B', 0xFF]).to_string(), "A\\x00B\\xff");
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(Tag::new(*b"book"), Tag::BOOK);
    }
}
