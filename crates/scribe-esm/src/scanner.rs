//! Streaming record scanner.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use scribe_common::BinaryReader;

use crate::codec::decode_record_body;
use crate::record::RECORD_HEADER_LEN;
use crate::{Error, Record, Result, Tag};

/// Reads a container as a sequence of top-level records.
///
/// Only one record body is held in memory at a time. The first error ends
/// the iteration: a truncated container cannot be resynchronised.
///
/// # Example
///
/// ```
/// use scribe_esm::{Record, RecordScanner, SubRecord, Tag};
///
/// let bytes = Record::new(Tag::ENCH, vec![SubRecord::new(Tag::NAME, b"e\0".to_vec())]).to_bytes();
/// let records: Vec<Record> = RecordScanner::new(&bytes[..]).collect::<Result<_, _>>()?;
///
/// assert_eq!(records[0].tag, Tag::ENCH);
/// # Ok::<(), scribe_esm::Error>(())
/// ```
#[derive(Debug)]
pub struct RecordScanner<R> {
    reader: R,
    offset: u64,
    done: bool,
}

impl RecordScanner<BufReader<File>> {
    /// Open a container file for scanning.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> RecordScanner<R> {
    /// Scan records from any reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            done: false,
        }
    }

    /// Byte offset of the next record.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the next record, or `None` at a clean end of input.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let mut header = [0u8; RECORD_HEADER_LEN];
        let read = read_full(&mut self.reader, &mut header)?;
        if read == 0 {
            return Ok(None);
        }
        if read < RECORD_HEADER_LEN {
            return Err(Error::TruncatedInput {
                needed: RECORD_HEADER_LEN,
                available: read,
            });
        }

        let mut fields = BinaryReader::new(&header);
        let tag = Tag::new(fields.read_array()?);
        let body_len = fields.read_u32()? as usize;
        let unknown = fields.read_u32()?;
        let flags = fields.read_u32()?;

        // Sized by what is actually read, not by the declared length.
        let mut body = Vec::new();
        (&mut self.reader)
            .take(body_len as u64)
            .read_to_end(&mut body)?;
        if body.len() < body_len {
            return Err(Error::TruncatedInput {
                needed: body_len,
                available: body.len(),
            });
        }

        let sub_records = decode_record_body(&body, body_len)?;
        self.offset += (RECORD_HEADER_LEN + body_len) as u64;

        Ok(Some(Record {
            tag,
            unknown,
            flags,
            sub_records,
        }))
    }
}

impl<R: Read> Iterator for RecordScanner<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fill `buf` as far as the reader allows, returning the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubRecord;
    use std::io::Write;

    fn sample() -> Vec<u8> {
        let mut bytes = Record::new(
            Tag::BOOK,
            vec![
                SubRecord::new(Tag::NAME, b"sc_a\0".to_vec()),
                SubRecord::new(Tag::TEXT, b"hello".to_vec()),
            ],
        )
        .to_bytes();
        let mut npc = Record::new(Tag::NPC_, vec![SubRecord::new(Tag::NAME, b"npc\0".to_vec())]);
        npc.flags = 0x2000;
        bytes.extend(npc.to_bytes());
        bytes
    }

    #[test]
    fn test_scan_records_in_order() {
        let bytes = sample();
        let mut scanner = RecordScanner::new(&bytes[..]);

        let first = scanner.next_record().unwrap().unwrap();
        assert_eq!(first.tag, Tag::BOOK);
        assert_eq!(first.sub_records.len(), 2);
        assert_eq!(scanner.offset(), (16 + first.body_len()) as u64);

        let second = scanner.next_record().unwrap().unwrap();
        assert_eq!(second.tag, Tag::NPC_);
        assert_eq!(second.flags, 0x2000);

        assert!(scanner.next_record().unwrap().is_none());
    }

    #[test]
    fn test_raw_round_trip() {
        let bytes = sample();
        let rebuilt: Vec<u8> = RecordScanner::new(&bytes[..])
            .flat_map(|r| r.unwrap().to_bytes())
            .collect();
        assert_eq!(rebuilt, bytes);
    }

    #[test]
    fn test_truncated_body_is_fatal() {
        let mut bytes = sample();
        bytes.truncate(bytes.len() - 3);

        let results: Vec<_> = RecordScanner::new(&bytes[..]).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::TruncatedInput { .. })));
    }

    #[test]
    fn test_truncated_header_is_fatal() {
        let mut bytes = sample();
        bytes.extend_from_slice(b"BOOK\x10");

        let results: Vec<_> = RecordScanner::new(&bytes[..]).collect();
        assert!(matches!(
            results.last(),
            Some(Err(Error::TruncatedInput { needed: 16, available: 5 }))
        ));
    }

    #[test]
    fn test_oversized_length_is_truncation() {
        let mut bytes = b"BOOK".to_vec();
        bytes.extend_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(b"abc");

        let err = RecordScanner::new(&bytes[..]).next_record().unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedInput { needed: 0xFFFF_FFF0, available: 3 }
        ));
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&sample()).unwrap();

        let count = RecordScanner::open(file.path()).unwrap().count();
        assert_eq!(count, 2);
    }
}
