//! Fixed-width encodings used throughout plugin files.
//!
//! Every integer in the format is little-endian and 4 bytes wide unless a
//! structure says otherwise. Strings are ASCII, either null-terminated or
//! padded into a fixed-width slot.

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result};

/// Encode a signed 32-bit integer as 4 little-endian bytes.
#[inline]
pub fn encode_i32(value: i32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    LittleEndian::write_i32(&mut buf, value);
    buf
}

/// Encode an unsigned 32-bit integer as 4 little-endian bytes.
#[inline]
pub fn encode_u32(value: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, value);
    buf
}

/// Encode an IEEE-754 single precision float as 4 little-endian bytes.
#[inline]
pub fn encode_f32(value: f32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    LittleEndian::write_f32(&mut buf, value);
    buf
}

/// Encode a string into a fixed-width, zero-padded slot.
///
/// A string that would fill the whole slot is cut to `width - 1` bytes so
/// the slot always ends with a zero byte.
pub fn encode_padded_string(value: &str, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    if width == 0 {
        return out;
    }

    let bytes = value.as_bytes();
    let len = bytes.len().min(width - 1);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// Decode a null-terminated ASCII string.
///
/// Reads up to the first zero byte (or the whole slice when there is none).
/// Bytes outside the ASCII range are dropped rather than reported.
pub fn decode_cstring(bytes: &[u8]) -> String {
    let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
    bytes[..end]
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect()
}

/// Decode an unsigned little-endian integer of any width up to 8 bytes.
///
/// Bytes past the eighth are ignored.
pub fn decode_uint(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (8 * i)))
}

/// Decode a little-endian f32 from the first 4 bytes of a slice.
pub fn decode_f32(bytes: &[u8]) -> Result<f32> {
    if bytes.len() < 4 {
        return Err(Error::UnexpectedEof {
            needed: 4,
            available: bytes.len(),
        });
    }
    Ok(LittleEndian::read_f32(bytes))
}
