/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Forward-only byte cursor over caller-owned input.
//!
//! Every primitive reader consumes bytes through a [`Cursor`]. The cursor
//! never rewinds; underflow is reported as [`DecodeError::Underflow`] and
//! leaves the position where the shortfall was detected.

use ferrofast_core::DecodeError;

/// A forward-only read position over a byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Reads one byte and advances.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Underflow`] if the input is exhausted.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.input.get(self.offset).ok_or(DecodeError::Underflow)?;
        self.offset += 1;
        Ok(byte)
    }

    /// Returns the next byte without advancing.
    #[inline]
    #[must_use]
    pub fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    /// Consumes exactly `count` bytes and returns them as a slice.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Underflow`] if fewer than `count` bytes
    /// remain.
    #[inline]
    pub fn take(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|end| *end <= self.input.len())
            .ok_or(DecodeError::Underflow)?;
        let slice = &self.input[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Current read position from the start of the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    /// Returns `true` if no unread bytes remain.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
