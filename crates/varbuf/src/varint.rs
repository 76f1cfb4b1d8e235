//! Variable-length integers, 7 payload bits per byte.
//!
//! Groups are emitted least significant first and every byte but the last has
//! bit 7 (`0x80`) set. A 32-bit value takes 1 to 5 bytes. A 64-bit value takes
//! 1 to 9 bytes; the ninth byte carries the top 8 bits whole, with no
//! continuation bit.
//!
//! With `optimize_positive == false` the value is zig-zag transformed first,
//! so small negative numbers stay short. The flag is not on the wire: reader
//! and writer must agree on it out of band.

use crate::{BufferError, GrowableBuffer};

/// Maps signed to unsigned so that small magnitudes stay small:
/// `0, -1, 1, -2, ...` become `0, 1, 2, 3, ...`.
#[inline]
#[must_use]
pub const fn zigzag_encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[inline]
#[must_use]
pub const fn zigzag_decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[inline]
#[must_use]
pub const fn zigzag_encode_64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
#[must_use]
pub const fn zigzag_decode_64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[inline]
fn encode_32(value: i32, optimize_positive: bool) -> u32 {
    if optimize_positive {
        value as u32
    } else {
        zigzag_encode_32(value)
    }
}

#[inline]
fn encode_64(value: i64, optimize_positive: bool) -> u64 {
    if optimize_positive {
        value as u64
    } else {
        zigzag_encode_64(value)
    }
}

#[inline]
fn unsigned_length_32(value: u32) -> usize {
    let bits = (u32::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(7).max(1)
}

#[inline]
fn unsigned_length_64(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(7).clamp(1, 9)
}

/// Number of bytes [`GrowableBuffer::write_var_int`] would write for `value`.
///
/// ```rust
/// use varbuf::var_int_length;
///
/// assert_eq!(var_int_length(0, true), 1);
/// assert_eq!(var_int_length(-1, true), 5);
/// assert_eq!(var_int_length(-1, false), 1);
/// ```
#[must_use]
pub fn var_int_length(value: i32, optimize_positive: bool) -> usize {
    unsigned_length_32(encode_32(value, optimize_positive))
}

/// Number of bytes [`GrowableBuffer::write_var_long`] would write for `value`.
#[must_use]
pub fn var_long_length(value: i64, optimize_positive: bool) -> usize {
    unsigned_length_64(encode_64(value, optimize_positive))
}

impl GrowableBuffer {
    /// Writes a 32-bit varint and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when the buffer cannot grow enough.
    pub fn write_var_int(
        &mut self,
        value: i32,
        optimize_positive: bool,
    ) -> Result<usize, BufferError> {
        let mut value = encode_32(value, optimize_positive);
        let len = unsigned_length_32(value);
        self.ensure(len)?;

        let mut out = [0u8; 5];
        for byte in &mut out[..len - 1] {
            *byte = (value & 0x7F) as u8 | 0x80;
            value >>= 7;
        }
        out[len - 1] = value as u8;
        self.put(&out[..len]);
        Ok(len)
    }

    /// Writes a 64-bit varint and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when the buffer cannot grow enough.
    pub fn write_var_long(
        &mut self,
        value: i64,
        optimize_positive: bool,
    ) -> Result<usize, BufferError> {
        let mut value = encode_64(value, optimize_positive);
        let len = unsigned_length_64(value);
        self.ensure(len)?;

        let mut out = [0u8; 9];
        for byte in &mut out[..len - 1] {
            *byte = (value & 0x7F) as u8 | 0x80;
            value >>= 7;
        }
        // At nine bytes the remaining eight bits go out whole.
        out[len - 1] = value as u8;
        self.put(&out[..len]);
        Ok(len)
    }

    /// Reads a 32-bit varint written with the same `optimize_positive` flag.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when the varint is truncated. Bytes
    /// read before the failure stay consumed.
    pub fn read_var_int(&mut self, optimize_positive: bool) -> Result<i32, BufferError> {
        let mut result = 0u32;
        for shift in (0..35).step_by(7) {
            let byte = self.read_byte()?;
            result |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
        }
        Ok(if optimize_positive {
            result as i32
        } else {
            zigzag_decode_32(result)
        })
    }

    /// Reads a 64-bit varint written with the same `optimize_positive` flag.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when the varint is truncated.
    pub fn read_var_long(&mut self, optimize_positive: bool) -> Result<i64, BufferError> {
        let mut result = 0u64;
        for index in 0..9 {
            let byte = self.read_byte()?;
            if index == 8 {
                result |= u64::from(byte) << 56;
                break;
            }
            result |= u64::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                break;
            }
        }
        Ok(if optimize_positive {
            result as i64
        } else {
            zigzag_decode_64(result)
        })
    }

    /// Whether a complete 32-bit varint starts at the position. Nothing is
    /// consumed.
    #[must_use]
    pub fn can_read_var_int(&self) -> bool {
        self.complete_varint_ahead(5)
    }

    /// Whether a complete 64-bit varint starts at the position. Nothing is
    /// consumed.
    #[must_use]
    pub fn can_read_var_long(&self) -> bool {
        self.complete_varint_ahead(9)
    }

    fn complete_varint_ahead(&self, max_len: usize) -> bool {
        self.data[self.position..]
            .iter()
            .take(max_len)
            .enumerate()
            .any(|(index, byte)| byte & 0x80 == 0 || index + 1 == max_len)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rstest::rstest;

    use super::{var_int_length, var_long_length, zigzag_decode_32, zigzag_encode_32};
    use crate::{BufferError, GrowableBuffer};

    fn encode_int(value: i32, optimize_positive: bool) -> alloc::vec::Vec<u8> {
        let mut buffer = GrowableBuffer::with_max_capacity(1, None).unwrap();
        let written = buffer.write_var_int(value, optimize_positive).unwrap();
        assert_eq!(written, buffer.position());
        buffer.into_bytes()
    }

    fn encode_long(value: i64, optimize_positive: bool) -> alloc::vec::Vec<u8> {
        let mut buffer = GrowableBuffer::with_max_capacity(1, None).unwrap();
        let written = buffer.write_var_long(value, optimize_positive).unwrap();
        assert_eq!(written, buffer.position());
        buffer.into_bytes()
    }

    #[rstest]
    #[case(0, true, 1)]
    #[case(0, false, 1)]
    #[case(-1, false, 1)]
    #[case(-1, true, 5)]
    #[case(127, true, 1)]
    #[case(128, true, 2)]
    #[case(16_383, true, 2)]
    #[case(16_384, true, 3)]
    #[case(268_435_455, true, 4)]
    #[case(268_435_455, false, 5)]
    #[case(i32::MAX, true, 5)]
    #[case(i32::MIN, true, 5)]
    #[case(i32::MIN, false, 5)]
    fn int_lengths(#[case] value: i32, #[case] optimize_positive: bool, #[case] len: usize) {
        assert_eq!(encode_int(value, optimize_positive).len(), len);
        assert_eq!(var_int_length(value, optimize_positive), len);
    }

    #[rstest]
    #[case(0, true, 1)]
    #[case(-1, false, 1)]
    #[case(-1, true, 9)]
    #[case((1 << 49) - 1, true, 7)]
    #[case((1 << 56) - 1, true, 8)]
    #[case(1 << 56, true, 9)]
    #[case(i64::MAX, true, 9)]
    #[case(i64::MIN, true, 9)]
    #[case(i64::MIN, false, 9)]
    fn long_lengths(#[case] value: i64, #[case] optimize_positive: bool, #[case] len: usize) {
        assert_eq!(encode_long(value, optimize_positive).len(), len);
        assert_eq!(var_long_length(value, optimize_positive), len);
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode_int(300, true), vec![0xAC, 0x02]);
        assert_eq!(encode_int(-1, true), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(encode_int(-2, false), vec![0x03]);
        assert_eq!(
            encode_long(-1, true),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            encode_long(i64::MIN, true),
            vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80]
        );
    }

    #[test]
    fn zigzag_extremes() {
        assert_eq!(zigzag_encode_32(i32::MIN), u32::MAX);
        assert_eq!(zigzag_encode_32(i32::MAX), u32::MAX - 1);
        assert_eq!(zigzag_decode_32(u32::MAX), i32::MIN);
        assert_eq!(zigzag_decode_32(1), -1);
    }

    #[rstest]
    #[case(i32::MIN)]
    #[case(-64)]
    #[case(-1)]
    #[case(0)]
    #[case(63)]
    #[case(i32::MAX)]
    fn int_roundtrip_both_modes(#[case] value: i32) {
        for optimize_positive in [true, false] {
            let mut buffer = GrowableBuffer::from_bytes(encode_int(value, optimize_positive));
            assert_eq!(buffer.read_var_int(optimize_positive), Ok(value));
            assert_eq!(buffer.remaining(), 0);
        }
    }

    #[test]
    fn truncated_int_underflows() {
        let mut buffer = GrowableBuffer::from_bytes(vec![0x80, 0x80]);
        assert!(!buffer.can_read_var_int());
        assert_eq!(
            buffer.read_var_int(true),
            Err(BufferError::BufferUnderflow {
                position: 2,
                required: 1,
                available: 0
            })
        );
    }

    #[test]
    fn can_read_does_not_consume() {
        let mut buffer = GrowableBuffer::from_bytes(vec![0xAC, 0x02, 0x80]);
        assert!(buffer.can_read_var_int());
        assert!(buffer.can_read_var_long());
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.read_var_int(true), Ok(300));
        assert!(!buffer.can_read_var_int());
        assert!(!buffer.can_read_var_long());
    }

    #[test]
    fn can_read_stops_at_max_length() {
        // Five continuation bytes still make a complete 32-bit varint, but only
        // the prefix of a 64-bit one.
        let buffer = GrowableBuffer::from_bytes(vec![0xFF; 5]);
        assert!(buffer.can_read_var_int());
        assert!(!buffer.can_read_var_long());

        let buffer = GrowableBuffer::from_bytes(vec![0xFF; 9]);
        assert!(buffer.can_read_var_long());
    }

    #[test]
    fn fixed_size_buffer_overflows_on_long_varint() {
        let mut buffer = GrowableBuffer::new(4);
        assert_eq!(
            buffer.write_var_int(i32::MAX, true),
            Err(BufferError::BufferOverflow {
                max_capacity: 4,
                required: 5
            })
        );
        assert_eq!(buffer.write_var_int(1, true), Ok(1));
    }
}
