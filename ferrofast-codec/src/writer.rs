/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Stop-bit primitive writer.
//!
//! This module provides encoding of values using FAST stop-bit encoding.
//! It is the mirror of the readers in [`crate::reader`] and exists to
//! build wire images for tests, replay tooling, and feed simulators.

use crate::pmap::PresenceMap;
use arrayvec::ArrayVec;

/// Scratch for the 7-bit groups of one integer. Ten groups cover the
/// widest value either integer type can produce.
type Groups = ArrayVec<u8, 10>;

/// Stop-bit writer over a growable buffer.
#[derive(Debug, Default)]
pub struct FastWriter {
    /// Output buffer.
    buffer: Vec<u8>,
}

impl FastWriter {
    /// Creates a new writer.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates a new writer with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    fn push_groups(&mut self, mut groups: Groups) {
        groups.reverse();
        if let Some(last) = groups.last_mut() {
            *last |= 0x80;
        }
        self.buffer.extend(groups);
    }

    /// Encodes an unsigned integer using stop-bit encoding.
    ///
    /// # Arguments
    /// * `value` - The value to encode
    pub fn write_uint(&mut self, value: u64) {
        if value == 0 {
            self.buffer.push(0x80);
            return;
        }

        let mut groups = Groups::new();
        let mut v = value;

        while v > 0 {
            groups.push((v & 0x7F) as u8);
            v >>= 7;
        }

        self.push_groups(groups);
    }

    /// Encodes a signed integer using stop-bit encoding.
    ///
    /// Emission stops at the shortest form whose leading payload bit
    /// still carries the sign; the arithmetic shift keeps the sign
    /// flowing through the 7-bit groups.
    ///
    /// # Arguments
    /// * `value` - The value to encode
    pub fn write_int(&mut self, value: i64) {
        let negative = value < 0;
        let mut groups = Groups::new();
        let mut v = value;

        loop {
            let group = (v & 0x7F) as u8;
            groups.push(group);
            v >>= 7;
            let sign_bit = group & 0x40 != 0;
            if (!negative && v == 0 && !sign_bit) || (negative && v == -1 && sign_bit) {
                break;
            }
        }

        self.push_groups(groups);
    }

    /// Encodes an optional unsigned integer: Null is `0x80`, values shift
    /// up by one.
    ///
    /// # Arguments
    /// * `value` - The optional value to encode
    pub fn write_optional_uint(&mut self, value: Option<u64>) {
        match value {
            Some(v) => self.write_uint(v + 1),
            None => self.buffer.push(0x80),
        }
    }

    /// Encodes an optional signed integer: Null is `0x80`, non-negative
    /// values shift up by one, negative values pass through.
    ///
    /// # Arguments
    /// * `value` - The optional value to encode
    pub fn write_optional_int(&mut self, value: Option<i64>) {
        match value {
            Some(v) if v >= 0 => self.write_int(v + 1),
            Some(v) => self.write_int(v),
            None => self.buffer.push(0x80),
        }
    }

    /// Encodes an ASCII string using stop-bit encoding.
    ///
    /// The empty string is the single byte `0x80`.
    ///
    /// # Arguments
    /// * `value` - The string to encode
    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();

        if bytes.is_empty() {
            self.buffer.push(0x80);
            return;
        }

        for (i, &b) in bytes.iter().enumerate() {
            if i == bytes.len() - 1 {
                self.buffer.push(b | 0x80);
            } else {
                self.buffer.push(b & 0x7F);
            }
        }
    }

    /// Encodes an optional ASCII string: Null is `0x80`, the empty string
    /// is `{0x00, 0x80}`.
    ///
    /// # Arguments
    /// * `value` - The optional string to encode
    pub fn write_optional_string(&mut self, value: Option<&str>) {
        match value {
            None => self.buffer.push(0x80),
            Some("") => self.buffer.extend_from_slice(&[0x00, 0x80]),
            Some(s) => self.write_string(s),
        }
    }

    /// Encodes a byte vector with length prefix.
    ///
    /// # Arguments
    /// * `value` - The bytes to encode
    pub fn write_byte_vector(&mut self, value: &[u8]) {
        self.write_uint(value.len() as u64);
        self.buffer.extend_from_slice(value);
    }

    /// Encodes an optional byte vector: Null is `0x80`, otherwise the
    /// length prefix shifts up by one.
    ///
    /// # Arguments
    /// * `value` - The optional bytes to encode
    pub fn write_optional_byte_vector(&mut self, value: Option<&[u8]>) {
        match value {
            None => self.buffer.push(0x80),
            Some(bytes) => {
                self.write_uint(bytes.len() as u64 + 1);
                self.buffer.extend_from_slice(bytes);
            }
        }
    }

    /// Appends a presence map in its wire form.
    ///
    /// # Arguments
    /// * `pmap` - The presence map to encode
    pub fn write_pmap(&mut self, pmap: &PresenceMap) {
        self.buffer.extend(pmap.encode());
    }

    /// Appends raw bytes unchanged.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to append
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    /// Returns a reference to the current buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the current buffer length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clears the buffer for reuse.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
