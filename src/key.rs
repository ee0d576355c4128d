//! Compact byte keys for symbol ordinals.
//!
//! Ordinals are packed with the UTF-8 variable-length scheme. The packing has no
//! Unicode meaning (surrogate ordinals are fine), it is only used because the
//! resulting codes are prefix-free: the concatenated keys of two different symbol
//! sequences can never be equal, so a rule can be looked up by the concatenation of
//! its symbols' keys.

use std::fmt::{self, Display};

use crate::error::KeyError;

/// Largest ordinal that can be encoded.
pub const MAX_ORDINAL: u32 = 0x10_FFFF;

const CONTINUATION: u8 = 0b1000_0000;
const CONTINUATION_MASK: u8 = 0b1100_0000;
const PAYLOAD_MASK: u8 = 0b0011_1111;

/// The encoded key of a single symbol, between one and four bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    bytes: [u8; 4],
    len: u8,
}

impl Key {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Encode `number` as a key.
///
/// # Errors
/// [`KeyError::InvalidInput`] if `number` is negative or larger than [`MAX_ORDINAL`].
#[allow(clippy::cast_possible_truncation)]
pub fn encode(number: i64) -> Result<Key, KeyError> {
    let n = u32::try_from(number)
        .ok()
        .filter(|n| *n <= MAX_ORDINAL)
        .ok_or(KeyError::InvalidInput(number))?;

    let continuation = |shift: u32| ((n >> shift) as u8 & PAYLOAD_MASK) | CONTINUATION;

    let mut bytes = [0; 4];
    let len = match n {
        0..=0x7F => {
            bytes[0] = n as u8;
            1
        }
        0x80..=0x7FF => {
            bytes[0] = (n >> 6) as u8 | 0b1100_0000;
            bytes[1] = continuation(0);
            2
        }
        0x800..=0xFFFF => {
            bytes[0] = (n >> 12) as u8 | 0b1110_0000;
            bytes[1] = continuation(6);
            bytes[2] = continuation(0);
            3
        }
        _ => {
            bytes[0] = (n >> 18) as u8 | 0b1111_0000;
            bytes[1] = continuation(12);
            bytes[2] = continuation(6);
            bytes[3] = continuation(0);
            4
        }
    };
    Ok(Key { bytes, len })
}

/// Decode a buffer holding exactly one key.
///
/// # Errors
/// [`KeyError::InvalidEncoding`] if the buffer is empty, malformed, overlong, or has
/// bytes left over after the first key.
pub fn decode(bytes: &[u8]) -> Result<u32, KeyError> {
    let (number, len) = decode_at(bytes, 0)?;
    if len == bytes.len() {
        Ok(number)
    } else {
        Err(KeyError::InvalidEncoding { offset: len })
    }
}

/// Iterate over the ordinals of a concatenation of keys, such as a rule key.
///
/// Iteration stops after the first malformed key.
pub fn split(bytes: &[u8]) -> Split<'_> {
    Split {
        bytes,
        offset: 0,
        failed: false,
    }
}

#[derive(Debug, Clone)]
pub struct Split<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl Iterator for Split<'_> {
    type Item = Result<u32, KeyError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        match decode_at(self.bytes, self.offset) {
            Ok((number, len)) => {
                self.offset += len;
                Some(Ok(number))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn decode_at(bytes: &[u8], offset: usize) -> Result<(u32, usize), KeyError> {
    let invalid = |offset| KeyError::InvalidEncoding { offset };

    let Some(&lead) = bytes.get(offset) else {
        return Err(invalid(offset));
    };
    let (mut number, len, smallest) = match lead {
        0x00..=0x7F => return Ok((u32::from(lead), 1)),
        0xC0..=0xDF => (u32::from(lead & 0b0001_1111), 2, 0x80),
        0xE0..=0xEF => (u32::from(lead & 0b0000_1111), 3, 0x800),
        0xF0..=0xF7 => (u32::from(lead & 0b0000_0111), 4, 0x1_0000),
        _ => return Err(invalid(offset)),
    };

    for i in offset + 1..offset + len {
        match bytes.get(i) {
            Some(&b) if b & CONTINUATION_MASK == CONTINUATION => {
                number = (number << 6) | u32::from(b & PAYLOAD_MASK);
            }
            _ => return Err(invalid(i)),
        }
    }

    // Overlong forms would give one ordinal two keys
    if number < smallest || number > MAX_ORDINAL {
        return Err(invalid(offset));
    }
    Ok((number, len))
}
