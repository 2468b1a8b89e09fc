/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Stop-bit primitive readers.
//!
//! Each wire byte carries seven payload bits in positions 0..6; bit 7 is
//! the stop bit and marks the terminal byte. Payload bits accumulate
//! MSB-first across bytes. For signed integers the high payload bit of the
//! first byte is the sign, and negative values sign-extend naturally
//! through the shift-or accumulation.
//!
//! Width caps are the narrowest that cannot overflow the target type:
//! 4 bytes (28 payload bits) for 32-bit reads, 8 bytes (56 bits) for
//! 64-bit reads, and 10 bytes (70 bits) for [`read_big_int`]. A missing
//! stop bit within the cap fails with [`DecodeError::StopBitOverflow`].
//!
//! Optional (one-bit-nullable) variants follow the FAST null shift: the
//! wire value 0 (single byte `0x80`) is Null; unsigned values decode as
//! V−1; signed non-negative values decode as V−1 while negative values
//! pass through unchanged.

use crate::cursor::Cursor;
use bytes::Bytes;
use ferrofast_core::DecodeError;

const STOP_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7F;
const SIGN_BIT: u8 = 0x40;

const MAX_BYTES_32: usize = 4;
const MAX_BYTES_64: usize = 8;
const MAX_BYTES_BIG: usize = 10;

fn accumulate_unsigned(cursor: &mut Cursor<'_>, max_bytes: usize) -> Result<u64, DecodeError> {
    let mut result: u64 = 0;
    for _ in 0..max_bytes {
        let byte = cursor.read_byte()?;
        result = (result << 7) | u64::from(byte & PAYLOAD_MASK);
        if byte & STOP_BIT != 0 {
            return Ok(result);
        }
    }
    Err(DecodeError::StopBitOverflow { max_bytes })
}

fn accumulate_signed(cursor: &mut Cursor<'_>, max_bytes: usize) -> Result<i64, DecodeError> {
    let first = cursor.peek_byte().ok_or(DecodeError::Underflow)?;
    let mut result: i64 = if first & SIGN_BIT != 0 { -1 } else { 0 };
    for _ in 0..max_bytes {
        let byte = cursor.read_byte()?;
        result = (result << 7) | i64::from(byte & PAYLOAD_MASK);
        if byte & STOP_BIT != 0 {
            return Ok(result);
        }
    }
    Err(DecodeError::StopBitOverflow { max_bytes })
}

/// Reads a mandatory unsigned 32-bit integer.
///
/// # Errors
///
/// [`DecodeError::Underflow`] if the input ends mid-integer,
/// [`DecodeError::StopBitOverflow`] if no stop bit appears within 4 bytes.
pub fn read_uint32(cursor: &mut Cursor<'_>) -> Result<u32, DecodeError> {
    accumulate_unsigned(cursor, MAX_BYTES_32).map(|v| v as u32)
}

/// Reads a mandatory unsigned 64-bit integer (8-byte cap).
pub fn read_uint64(cursor: &mut Cursor<'_>) -> Result<u64, DecodeError> {
    accumulate_unsigned(cursor, MAX_BYTES_64)
}

/// Reads a mandatory signed 32-bit integer.
///
/// The sign is the high payload bit (`0x40`) of the first byte.
pub fn read_int32(cursor: &mut Cursor<'_>) -> Result<i32, DecodeError> {
    accumulate_signed(cursor, MAX_BYTES_32).map(|v| v as i32)
}

/// Reads a mandatory signed 64-bit integer (8-byte cap).
pub fn read_int64(cursor: &mut Cursor<'_>) -> Result<i64, DecodeError> {
    accumulate_signed(cursor, MAX_BYTES_64)
}

/// Reads a signed wide integer of up to 10 bytes (70 payload bits).
///
/// This is the reader for values whose width must survive overflow, such
/// as the signed deltas applied to 64-bit priors.
pub fn read_big_int(cursor: &mut Cursor<'_>) -> Result<i128, DecodeError> {
    let first = cursor.peek_byte().ok_or(DecodeError::Underflow)?;
    let mut result: i128 = if first & SIGN_BIT != 0 { -1 } else { 0 };
    for _ in 0..MAX_BYTES_BIG {
        let byte = cursor.read_byte()?;
        result = (result << 7) | i128::from(byte & PAYLOAD_MASK);
        if byte & STOP_BIT != 0 {
            return Ok(result);
        }
    }
    Err(DecodeError::StopBitOverflow {
        max_bytes: MAX_BYTES_BIG,
    })
}

/// Reads an optional unsigned 32-bit integer; wire 0 is Null.
pub fn read_optional_uint32(cursor: &mut Cursor<'_>) -> Result<Option<u32>, DecodeError> {
    let raw = accumulate_unsigned(cursor, MAX_BYTES_32)?;
    Ok(if raw == 0 { None } else { Some((raw - 1) as u32) })
}

/// Reads an optional unsigned 64-bit integer; wire 0 is Null.
pub fn read_optional_uint64(cursor: &mut Cursor<'_>) -> Result<Option<u64>, DecodeError> {
    let raw = accumulate_unsigned(cursor, MAX_BYTES_64)?;
    Ok(if raw == 0 { None } else { Some(raw - 1) })
}

/// Reads an optional signed 32-bit integer.
///
/// Wire 0 is Null; positive wire values shift down by one; negative wire
/// values pass through unchanged.
pub fn read_optional_int32(cursor: &mut Cursor<'_>) -> Result<Option<i32>, DecodeError> {
    let raw = accumulate_signed(cursor, MAX_BYTES_32)?;
    Ok(match raw {
        0 => None,
        v if v > 0 => Some((v - 1) as i32),
        v => Some(v as i32),
    })
}

/// Reads an optional signed 64-bit integer (8-byte cap).
pub fn read_optional_int64(cursor: &mut Cursor<'_>) -> Result<Option<i64>, DecodeError> {
    let raw = accumulate_signed(cursor, MAX_BYTES_64)?;
    Ok(match raw {
        0 => None,
        v if v > 0 => Some(v - 1),
        v => Some(v),
    })
}

/// Reads an optional signed wide integer (10-byte cap).
pub fn read_optional_big_int(cursor: &mut Cursor<'_>) -> Result<Option<i128>, DecodeError> {
    let raw = read_big_int(cursor)?;
    Ok(match raw {
        0 => None,
        v if v > 0 => Some(v - 1),
        v => Some(v),
    })
}

/// Consumes bytes until one with the stop bit set and returns the run
/// with the stop bit cleared on the terminal byte.
///
/// This is the shared low layer of the ASCII readers and of delta
/// tunneling for strings; the null/empty wire forms are interpreted by
/// the callers.
pub fn read_stop_bit_run(cursor: &mut Cursor<'_>) -> Result<Vec<u8>, DecodeError> {
    let mut run = Vec::new();
    loop {
        let byte = cursor.read_byte()?;
        run.push(byte & PAYLOAD_MASK);
        if byte & STOP_BIT != 0 {
            return Ok(run);
        }
    }
}

fn string_from_run(run: Vec<u8>) -> Result<String, DecodeError> {
    String::from_utf8(run).map_err(|err| DecodeError::InvalidUnicode(err.utf8_error()))
}

/// Reads a mandatory ASCII string.
///
/// The single byte `0x80` denotes the empty string.
pub fn read_string(cursor: &mut Cursor<'_>) -> Result<String, DecodeError> {
    let run = read_stop_bit_run(cursor)?;
    if run.as_slice() == [0x00] {
        return Ok(String::new());
    }
    string_from_run(run)
}

/// Reads an optional ASCII string.
///
/// The single byte `0x80` denotes Null; the two-byte sequence
/// `{0x00, 0x80}` denotes the empty string.
pub fn read_optional_string(cursor: &mut Cursor<'_>) -> Result<Option<String>, DecodeError> {
    let run = read_stop_bit_run(cursor)?;
    match run.as_slice() {
        [0x00] => Ok(None),
        [0x00, 0x00] => Ok(Some(String::new())),
        _ => string_from_run(run).map(Some),
    }
}

/// Reads a mandatory length-prefixed byte vector.
pub fn read_byte_vector(cursor: &mut Cursor<'_>) -> Result<Bytes, DecodeError> {
    let length = read_uint32(cursor)? as usize;
    Ok(Bytes::copy_from_slice(cursor.take(length)?))
}

/// Reads an optional length-prefixed byte vector; a Null length (`0x80`)
/// denotes Null.
pub fn read_optional_byte_vector(cursor: &mut Cursor<'_>) -> Result<Option<Bytes>, DecodeError> {
    match read_optional_uint32(cursor)? {
        None => Ok(None),
        Some(length) => Ok(Some(Bytes::copy_from_slice(cursor.take(length as usize)?))),
    }
}

/// Reads a mandatory Unicode string: a length-prefixed byte vector
/// validated as UTF-8.
pub fn read_unicode(cursor: &mut Cursor<'_>) -> Result<String, DecodeError> {
    let bytes = read_byte_vector(cursor)?;
    String::from_utf8(bytes.to_vec()).map_err(|err| DecodeError::InvalidUnicode(err.utf8_error()))
}

/// Reads an optional Unicode string; a Null length denotes Null.
pub fn read_optional_unicode(cursor: &mut Cursor<'_>) -> Result<Option<String>, DecodeError> {
    match read_optional_byte_vector(cursor)? {
        None => Ok(None),
        Some(bytes) => String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|err| DecodeError::InvalidUnicode(err.utf8_error())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(bytes: &[u8]) -> Cursor<'_> {
        Cursor::new(bytes)
    }

    #[test]
    fn test_read_uint32_single_byte() {
        let mut c = cursor(&[0x81]);
        assert_eq!(read_uint32(&mut c), Ok(1));
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_read_uint32_boundaries() {
        // (value, wire bytes, expected consumption)
        let cases: [(u32, &[u8]); 7] = [
            (0, &[0x80]),
            (1, &[0x81]),
            (127, &[0xFF]),
            (128, &[0x01, 0x80]),
            (16_383, &[0x7F, 0xFF]),
            (16_384, &[0x01, 0x00, 0x80]),
            ((1 << 28) - 1, &[0x7F, 0x7F, 0x7F, 0xFF]),
        ];
        for (expected, bytes) in cases {
            let mut c = cursor(bytes);
            assert_eq!(read_uint32(&mut c), Ok(expected), "value {expected}");
            assert_eq!(c.position(), bytes.len(), "consumption for {expected}");
        }
    }

    #[test]
    fn test_read_uint32_overflow_after_four_bytes() {
        // 2^28 needs a fifth byte
        let mut c = cursor(&[0x01, 0x00, 0x00, 0x00, 0x80]);
        assert_eq!(
            read_uint32(&mut c),
            Err(DecodeError::StopBitOverflow { max_bytes: 4 })
        );
    }

    #[test]
    fn test_read_uint32_underflow() {
        let mut c = cursor(&[0x01, 0x02]);
        assert_eq!(read_uint32(&mut c), Err(DecodeError::Underflow));
    }

    #[test]
    fn test_read_uint64_wide_value() {
        // 942 = 7 * 128 + 46
        let mut c = cursor(&[0x07, 0xAE]);
        assert_eq!(read_uint64(&mut c), Ok(942));
        // 2^56 - 1 is the widest mandatory uint64
        let mut c = cursor(&[0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0xFF]);
        assert_eq!(read_uint64(&mut c), Ok((1 << 56) - 1));
        let mut c = cursor(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80]);
        assert_eq!(
            read_uint64(&mut c),
            Err(DecodeError::StopBitOverflow { max_bytes: 8 })
        );
    }

    #[test]
    fn test_read_int32_signs() {
        let cases: [(i32, &[u8]); 7] = [
            (0, &[0x80]),
            (1, &[0x81]),
            (63, &[0xBF]),
            (64, &[0x00, 0xC0]),
            (-1, &[0xFF]),
            (-64, &[0xC0]),
            (-65, &[0x7F, 0xBF]),
        ];
        for (expected, bytes) in cases {
            let mut c = cursor(bytes);
            assert_eq!(read_int32(&mut c), Ok(expected), "value {expected}");
            assert_eq!(c.position(), bytes.len());
        }
    }

    #[test]
    fn test_read_int32_sign_is_first_payload_bit() {
        // same low bits, opposite sign bit in the leading byte
        let mut c = cursor(&[0x00, 0xC0]);
        assert_eq!(read_int32(&mut c), Ok(64));
        let mut c = cursor(&[0x7F, 0xC0]);
        assert_eq!(read_int32(&mut c), Ok(-64));
    }

    #[test]
    fn test_read_int64_overflow_after_eight_bytes() {
        let mut c = cursor(&[0x01; 9]);
        assert_eq!(
            read_int64(&mut c),
            Err(DecodeError::StopBitOverflow { max_bytes: 8 })
        );
    }

    #[test]
    fn test_read_big_int_ten_bytes() {
        // i64::MAX encodes as ten bytes: leading zero payload then 63 bits
        let bytes = [0x00, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0xFF];
        let mut c = cursor(&bytes);
        assert_eq!(read_big_int(&mut c), Ok(i128::from(i64::MAX)));

        // i64::MIN: sign bit set in leading byte, rest zero
        let bytes = [0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80];
        let mut c = cursor(&bytes);
        assert_eq!(read_big_int(&mut c), Ok(i128::from(i64::MIN)));
    }

    #[test]
    fn test_read_big_int_cap() {
        let mut c = cursor(&[0x01; 11]);
        assert_eq!(
            read_big_int(&mut c),
            Err(DecodeError::StopBitOverflow { max_bytes: 10 })
        );
    }

    #[test]
    fn test_optional_uint32_null_and_shift() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_uint32(&mut c), Ok(None));
        let mut c = cursor(&[0x81]);
        assert_eq!(read_optional_uint32(&mut c), Ok(Some(0)));
        let mut c = cursor(&[0x8B]);
        assert_eq!(read_optional_uint32(&mut c), Ok(Some(10)));
    }

    #[test]
    fn test_optional_int32_null_shift_and_passthrough() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_int32(&mut c), Ok(None));
        // positive wire values shift down by one
        let mut c = cursor(&[0x81]);
        assert_eq!(read_optional_int32(&mut c), Ok(Some(0)));
        let mut c = cursor(&[0x83]);
        assert_eq!(read_optional_int32(&mut c), Ok(Some(2)));
        // negative wire values pass through
        let mut c = cursor(&[0xFF]);
        assert_eq!(read_optional_int32(&mut c), Ok(Some(-1)));
        let mut c = cursor(&[0xC0]);
        assert_eq!(read_optional_int32(&mut c), Ok(Some(-64)));
    }

    #[test]
    fn test_optional_uint64_and_int64() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_uint64(&mut c), Ok(None));
        let mut c = cursor(&[0x07, 0xAE]);
        assert_eq!(read_optional_uint64(&mut c), Ok(Some(941)));
        let mut c = cursor(&[0x7F, 0xBF]);
        assert_eq!(read_optional_int64(&mut c), Ok(Some(-65)));
    }

    #[test]
    fn test_optional_big_int() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_big_int(&mut c), Ok(None));
        let mut c = cursor(&[0x82]);
        assert_eq!(read_optional_big_int(&mut c), Ok(Some(1)));
        let mut c = cursor(&[0xFF]);
        assert_eq!(read_optional_big_int(&mut c), Ok(Some(-1)));
    }

    #[test]
    fn test_read_string() {
        let mut c = cursor(&[b'H', b'i', b'!' | 0x80]);
        assert_eq!(read_string(&mut c), Ok("Hi!".to_string()));
    }

    #[test]
    fn test_read_string_empty_form() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_string(&mut c), Ok(String::new()));
    }

    #[test]
    fn test_read_optional_string_forms() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_string(&mut c), Ok(None));
        let mut c = cursor(&[0x00, 0x80]);
        assert_eq!(read_optional_string(&mut c), Ok(Some(String::new())));
        let mut c = cursor(&[0x54, 0x45, 0x53, 0x54, 0xB1]);
        assert_eq!(read_optional_string(&mut c), Ok(Some("TEST1".to_string())));
    }

    #[test]
    fn test_read_stop_bit_run_clears_terminal_bit() {
        let mut c = cursor(&[0x54, 0xC5]);
        assert_eq!(read_stop_bit_run(&mut c), Ok(vec![0x54, 0x45]));
    }

    #[test]
    fn test_read_byte_vector() {
        let mut c = cursor(&[0x83, 1, 2, 3]);
        assert_eq!(read_byte_vector(&mut c), Ok(Bytes::from_static(&[1, 2, 3])));
    }

    #[test]
    fn test_read_byte_vector_truncated() {
        let mut c = cursor(&[0x83, 1, 2]);
        assert_eq!(read_byte_vector(&mut c), Err(DecodeError::Underflow));
    }

    #[test]
    fn test_read_optional_byte_vector() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_byte_vector(&mut c), Ok(None));
        // optional length shifts down by one: wire 4 means three bytes
        let mut c = cursor(&[0x84, 9, 8, 7]);
        assert_eq!(
            read_optional_byte_vector(&mut c),
            Ok(Some(Bytes::from_static(&[9, 8, 7])))
        );
    }

    #[test]
    fn test_read_unicode() {
        let euro = "€".as_bytes();
        let mut wire = vec![0x83];
        wire.extend_from_slice(euro);
        let mut c = cursor(&wire);
        assert_eq!(read_unicode(&mut c), Ok("€".to_string()));
    }

    #[test]
    fn test_read_unicode_invalid_utf8() {
        let mut c = cursor(&[0x82, 0xFF, 0xFE]);
        assert!(matches!(
            read_unicode(&mut c),
            Err(DecodeError::InvalidUnicode(_))
        ));
    }

    #[test]
    fn test_read_optional_unicode() {
        let mut c = cursor(&[0x80]);
        assert_eq!(read_optional_unicode(&mut c), Ok(None));
        // optional length shifts down by one: wire 3 means two bytes
        let mut c = cursor(&[0x83, b'a', b'b']);
        assert_eq!(read_optional_unicode(&mut c), Ok(Some("ab".to_string())));
        assert!(c.is_empty());
    }
}
