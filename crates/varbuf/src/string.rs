//! Compact string codec.
//!
//! Four shapes share one leading byte:
//!
//! | first byte  | meaning                                                    |
//! |-------------|------------------------------------------------------------|
//! | `0x80`      | null                                                       |
//! | `0x81`      | empty string                                               |
//! | `0b0xxxxxxx`| ASCII run; the last byte of the run has bit 7 set          |
//! | `0b1cxxxxxx`| length prefix (`units + 1`), then the code units           |
//!
//! The length prefix packs 6 bits into the first byte (bit 6 is the
//! continuation flag, bit 7 marks "not an ASCII run"), then 7 bits per byte
//! with the usual `0x80` continuation flag, up to five bytes.
//!
//! Code units follow the classic one/two/three byte UTF-8 layout but are
//! applied to UTF-16 code units, so a character outside the BMP becomes two
//! three-byte surrogate halves. Only this decoder should read that data.
//!
//! Short all-ASCII strings (2 to 32 units) take the ASCII run shape. A single
//! ASCII character cannot, since its flagged byte would read as a length
//! prefix.

use alloc::{string::String, vec::Vec};

use crate::{BufferError, EncodingError, GrowableBuffer};

const NULL: u8 = 0x80;
const EMPTY: u8 = 0x81;
const ASCII_RUN: core::ops::RangeInclusive<usize> = 2..=32;

/// Encodes the length prefix, returning the bytes and how many are used.
fn length_prefix(value: u32) -> ([u8; 5], usize) {
    let mut out = [0u8; 5];
    if value >> 6 == 0 {
        out[0] = value as u8 | 0x80;
        return (out, 1);
    }

    out[0] = (value as u8 & 0x3F) | 0xC0;
    let mut rest = value >> 6;
    let mut len = 1;
    while rest >> 7 != 0 && len < 4 {
        out[len] = (rest as u8 & 0x7F) | 0x80;
        rest >>= 7;
        len += 1;
    }
    out[len] = rest as u8;
    (out, len + 1)
}

#[inline]
fn unit_width(unit: u16) -> usize {
    match unit {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        _ => 3,
    }
}

fn continuation(data: &[u8], lead_at: usize, width: usize, at: usize) -> Result<u16, BufferError> {
    let byte = *data
        .get(at)
        .ok_or_else(|| BufferError::underflow(lead_at, width, data.len()))?;
    if byte & 0xC0 != 0x80 {
        return Err(BufferError::encoding(
            EncodingError::InvalidContinuationByte(byte),
            at,
        ));
    }
    Ok(u16::from(byte & 0x3F))
}

impl GrowableBuffer {
    /// Writes `value` in the compact string format. `None` is null.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when the buffer cannot grow enough.
    /// Nothing is written in that case.
    pub fn write_string(&mut self, value: Option<&str>) -> Result<(), BufferError> {
        match value {
            None => self.write_byte(NULL),
            Some("") => self.write_byte(EMPTY),
            Some(value) if ASCII_RUN.contains(&value.len()) && value.is_ascii() => {
                self.write_ascii_run(value.as_bytes())
            }
            Some(value) => self.write_units(value.encode_utf16(), value.encode_utf16().count()),
        }
    }

    /// Writes raw UTF-16 code units in the compact string format. Unpaired
    /// surrogates are allowed and survive [`read_utf16`](Self::read_utf16).
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when the buffer cannot grow enough.
    pub fn write_utf16(&mut self, value: Option<&[u16]>) -> Result<(), BufferError> {
        match value {
            None => self.write_byte(NULL),
            Some([]) => self.write_byte(EMPTY),
            Some(units) if ASCII_RUN.contains(&units.len()) && units.iter().all(|&u| u <= 0x7F) => {
                let mut raw = [0u8; 32];
                for (byte, &unit) in raw.iter_mut().zip(units) {
                    *byte = unit as u8;
                }
                self.write_ascii_run(&raw[..units.len()])
            }
            Some(units) => self.write_units(units.iter().copied(), units.len()),
        }
    }

    /// Writes a string already known to be ASCII as a flagged run, whatever
    /// its length. One-character strings fall back to the length-prefixed
    /// form.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidEncoding`] with [`EncodingError::NonAscii`] when
    /// `value` has a non-ASCII character; nothing is written.
    /// [`BufferError::BufferOverflow`] when the buffer cannot grow enough.
    pub fn write_ascii(&mut self, value: Option<&str>) -> Result<(), BufferError> {
        let Some(value) = value else {
            return self.write_byte(NULL);
        };
        if let Some(unit) = value.encode_utf16().find(|&unit| unit > 0x7F) {
            return Err(BufferError::encoding(
                EncodingError::NonAscii(unit),
                self.position,
            ));
        }
        match value.len() {
            0 => self.write_byte(EMPTY),
            1 => self.write_units(value.bytes().map(u16::from), 1),
            _ => self.write_ascii_run(value.as_bytes()),
        }
    }

    /// Reads a string written by any of the string writers. `None` is null.
    ///
    /// # Errors
    ///
    /// - [`BufferError::BufferUnderflow`] when the string is truncated.
    /// - [`BufferError::InvalidEncoding`] for malformed code units, or for an
    ///   unpaired surrogate that a Rust `String` cannot hold.
    pub fn read_string(&mut self) -> Result<Option<String>, BufferError> {
        let mut out = String::new();
        Ok(self.read_string_into(&mut out)?.then_some(out))
    }

    /// Reads a string and appends it to `out`, returning `false` for null.
    ///
    /// This is the same decoder as [`read_string`](Self::read_string) but
    /// lets the caller reuse one `String` across reads. On error `out` is left
    /// as it was.
    ///
    /// # Errors
    ///
    /// Same as [`read_string`](Self::read_string).
    pub fn read_string_into(&mut self, out: &mut String) -> Result<bool, BufferError> {
        let start = self.position;
        if !self.decode_units()? {
            return Ok(false);
        }

        let restore = out.len();
        out.reserve(self.scratch.len());
        for decoded in char::decode_utf16(self.scratch.iter().copied()) {
            match decoded {
                Ok(ch) => out.push(ch),
                Err(err) => {
                    out.truncate(restore);
                    return Err(BufferError::encoding(
                        EncodingError::UnpairedSurrogate(err.unpaired_surrogate()),
                        start,
                    ));
                }
            }
        }
        Ok(true)
    }

    /// Reads a string as raw UTF-16 code units. `None` is null.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when the string is truncated and
    /// [`BufferError::InvalidEncoding`] for malformed code units.
    pub fn read_utf16(&mut self) -> Result<Option<Vec<u16>>, BufferError> {
        Ok(self.decode_units()?.then(|| self.scratch.clone()))
    }

    fn write_ascii_run(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        debug_assert!(bytes.len() >= 2 && bytes.is_ascii());
        self.ensure(bytes.len())?;
        self.put(bytes);
        self.data[self.position - 1] |= 0x80;
        Ok(())
    }

    fn write_units<I>(&mut self, units: I, count: usize) -> Result<(), BufferError>
    where
        I: Iterator<Item = u16> + Clone,
    {
        let prefix = u32::try_from(count)
            .ok()
            .and_then(|count| count.checked_add(1))
            .ok_or_else(|| BufferError::encoding(EncodingError::TooLong(count), self.position))?;
        let (prefix, prefix_len) = length_prefix(prefix);
        let body_len: usize = units.clone().map(unit_width).sum();
        self.ensure(prefix_len + body_len)?;

        self.put(&prefix[..prefix_len]);
        for unit in units {
            match unit_width(unit) {
                1 => self.put(&[unit as u8]),
                2 => self.put(&[0xC0 | (unit >> 6) as u8, 0x80 | (unit & 0x3F) as u8]),
                _ => self.put(&[
                    0xE0 | (unit >> 12) as u8,
                    0x80 | ((unit >> 6) & 0x3F) as u8,
                    0x80 | (unit & 0x3F) as u8,
                ]),
            }
        }
        Ok(())
    }

    /// Decodes one string into the scratch space. Returns `false` for null.
    fn decode_units(&mut self) -> Result<bool, BufferError> {
        let start = self.position;
        let first = self.read_byte()?;
        self.scratch.clear();

        if first & 0x80 == 0 {
            self.decode_ascii_run(start)?;
            return Ok(true);
        }

        match self.read_length_prefix(first)? {
            0 => Ok(false),
            1 => Ok(true),
            length => {
                self.decode_general(length as usize - 1)?;
                Ok(true)
            }
        }
    }

    fn decode_ascii_run(&mut self, start: usize) -> Result<(), BufferError> {
        let run = &self.data[start..];
        let Some(last) = run.iter().position(|byte| byte & 0x80 != 0) else {
            return Err(BufferError::BufferUnderflow {
                position: start,
                required: run.len() + 1,
                available: run.len(),
            });
        };
        self.scratch
            .extend(run[..=last].iter().map(|&byte| u16::from(byte & 0x7F)));
        self.position = start + last + 1;
        Ok(())
    }

    fn read_length_prefix(&mut self, first: u8) -> Result<u32, BufferError> {
        let mut result = u32::from(first & 0x3F);
        if first & 0x40 == 0 {
            return Ok(result);
        }
        for shift in [6, 13, 20, 27] {
            let byte = self.read_byte()?;
            result |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
        }
        Ok(result)
    }

    fn decode_general(&mut self, count: usize) -> Result<(), BufferError> {
        let capacity = self.data.len();
        // Every code unit takes at least one byte.
        if count > capacity - self.position {
            return Err(BufferError::underflow(self.position, count, capacity));
        }
        self.scratch.reserve(count);

        let data = &self.data;
        let mut at = self.position;
        for _ in 0..count {
            let lead = *data
                .get(at)
                .ok_or_else(|| BufferError::underflow(at, 1, capacity))?;
            let (unit, width) = match lead >> 4 {
                0..=7 => (u16::from(lead), 1),
                12 | 13 => (
                    (u16::from(lead & 0x1F) << 6) | continuation(data, at, 2, at + 1)?,
                    2,
                ),
                14 => (
                    (u16::from(lead & 0x0F) << 12)
                        | (continuation(data, at, 3, at + 1)? << 6)
                        | continuation(data, at, 3, at + 2)?,
                    3,
                ),
                _ => {
                    return Err(BufferError::encoding(
                        EncodingError::InvalidLeadByte(lead),
                        at,
                    ));
                }
            };
            self.scratch.push(unit);
            at += width;
        }
        self.position = at;
        Ok(())
    }
}
