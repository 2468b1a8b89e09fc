/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! FAST presence map handling.
//!
//! The presence map (PMAP) is a bitmap carried at the front of a message
//! (and of each sequence entry) that tells operator-bearing fields whether
//! a value was encoded for them. It uses stop-bit encoding where the high
//! bit of each byte marks the final byte; the remaining seven bits are
//! map bits, most significant first.
//!
//! Reading past the end of the map yields `false`. Maps are consumed
//! strictly forward and never rewound.

use crate::cursor::Cursor;
use ferrofast_core::DecodeError;
use smallvec::SmallVec;

/// FAST presence map.
///
/// Bits are consumed in order as operator-bearing fields are decoded.
/// Eight wire bytes of bits are stored inline before spilling to the heap.
#[derive(Debug, Clone)]
pub struct PresenceMap {
    /// The raw bits of the presence map.
    bits: SmallVec<[bool; 56]>,
    /// Current bit position.
    position: usize,
}

impl PresenceMap {
    /// Creates an empty presence map.
    ///
    /// Every bit read from it is `false`, which makes it the map handed to
    /// sequence entries whose fields carry no operators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bits: SmallVec::new(),
            position: 0,
        }
    }

    /// Creates a presence map from raw bits.
    #[must_use]
    pub fn from_bits(bits: &[bool]) -> Self {
        Self {
            bits: SmallVec::from_slice(bits),
            position: 0,
        }
    }

    /// Decodes a presence map from the cursor.
    ///
    /// # Errors
    /// Returns `DecodeError::Underflow` if the input ends before a byte
    /// with the stop bit set.
    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        let mut bits = SmallVec::new();

        loop {
            let byte = cursor.read_byte()?;

            // Extract 7 bits (excluding stop bit)
            for i in (0..7).rev() {
                bits.push((byte >> i) & 1 == 1);
            }

            // Check stop bit (high bit)
            if byte & 0x80 != 0 {
                break;
            }
        }

        Ok(Self { bits, position: 0 })
    }

    /// Returns the next bit from the presence map.
    ///
    /// # Returns
    /// `true` if a value was encoded for the field, `false` otherwise.
    /// Returns `false` once the map is exhausted.
    #[inline]
    pub fn next_bit(&mut self) -> bool {
        if self.position < self.bits.len() {
            let bit = self.bits[self.position];
            self.position += 1;
            bit
        } else {
            self.position += 1;
            false
        }
    }

    /// Returns the bit at the specified position without consuming it.
    ///
    /// # Arguments
    /// * `index` - The bit position (0-indexed)
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Returns the number of bits in the presence map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the presence map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the current position in the presence map.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Encodes the presence map to bytes.
    ///
    /// # Returns
    /// The encoded bytes with stop-bit encoding.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        if self.bits.is_empty() {
            return vec![0x80];
        }

        let mut result = Vec::new();
        let mut bit_index = 0;

        while bit_index < self.bits.len() {
            let mut byte: u8 = 0;

            // Pack 7 bits into each byte
            for i in (0..7).rev() {
                if bit_index < self.bits.len() && self.bits[bit_index] {
                    byte |= 1 << i;
                }
                bit_index += 1;
            }

            // Set stop bit if this is the last byte
            if bit_index >= self.bits.len() {
                byte |= 0x80;
            }

            result.push(byte);
        }

        result
    }
}

impl Default for PresenceMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing presence maps.
#[derive(Debug, Default)]
pub struct PresenceMapBuilder {
    bits: SmallVec<[bool; 56]>,
}

impl PresenceMapBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bit to the presence map.
    #[must_use]
    pub fn bit(mut self, present: bool) -> Self {
        self.bits.push(present);
        self
    }

    /// Builds the presence map.
    #[must_use]
    pub fn build(self) -> PresenceMap {
        PresenceMap {
            bits: self.bits,
            position: 0,
        }
    }
}
