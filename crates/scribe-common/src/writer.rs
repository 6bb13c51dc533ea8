//! Binary writer producing little-endian plugin data.

use std::io::Write;

use crate::bytes::{encode_f32, encode_i32, encode_padded_string, encode_u32};
use crate::Result;

/// A growable little-endian output buffer.
///
/// The mirror image of [`BinaryReader`](crate::BinaryReader): every write
/// appends at the end and the finished bytes are taken with
/// [`into_inner`](Self::into_inner).
///
/// # Example
///
/// ```
/// use scribe_common::BinaryWriter;
///
/// let mut writer = BinaryWriter::new();
/// writer.write_tag(*b"SPDT").write_u32(12).write_i32(0);
///
/// assert_eq!(writer.len(), 12);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append a four character tag.
    pub fn write_tag(&mut self, tag: [u8; 4]) -> &mut Self {
        self.write_bytes(&tag)
    }

    /// Append a little-endian i32.
    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.write_bytes(&encode_i32(value))
    }

    /// Append a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&encode_u32(value))
    }

    /// Append a little-endian f32.
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.write_bytes(&encode_f32(value))
    }

    /// Append `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + count, 0);
        self
    }

    /// Append a string in a fixed-width zero-padded slot.
    pub fn write_padded_string(&mut self, value: &str, width: usize) -> &mut Self {
        let padded = encode_padded_string(value, width);
        self.write_bytes(&padded)
    }

    /// Get the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return its buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Flush the buffer into any `Write` sink.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&self.buf)?;
        Ok(())
    }
}
