//! The growable byte buffer at the bottom of every codec in this crate.
//!
//! A [`GrowableBuffer`] owns a zero-filled backing array whose length is the
//! buffer's *capacity*, plus a cursor (*position*) that every unparameterized
//! read or write starts at and advances past. Writes grow the array on demand
//! following [`next_capacity`]; reads never grow and fail with
//! [`BufferError::BufferUnderflow`] instead.
//!
//! # Invariants
//!
//! - `position <= capacity <= max_capacity` at all times.
//! - Growth happens before a write touches memory, so a write either has room
//!   for all of its bytes or fails without writing.
//! - Growth keeps every existing byte; only the zero-filled tail is new.
//!
//! Equality and hashing look at the whole backing array, unwritten tail
//! included. Use [`GrowableBuffer::content_eq`] to compare logical contents
//! (`[0, position)`) only.

use alloc::{format, vec, vec::Vec};
use core::{
    fmt,
    hash::{Hash, Hasher},
};

use bstr::BStr;

use crate::{
    error::BufferError,
    options::BufferOptions,
    tracing_compat::{debug, trace},
};

/// Largest capacity a buffer can be given; stands in for "no limit".
pub const UNBOUNDED: usize = isize::MAX as usize;

/// Computes the capacity to grow to so that at least `needed` bytes fit.
///
/// Starting from `current`, the capacity is multiplied by 1.6 (truncating, and
/// always by at least one byte) until it reaches `needed`, then clamped to
/// `max`.
///
/// # Errors
///
/// Returns [`BufferError::BufferOverflow`] when `needed` exceeds `max`.
///
/// # Examples
///
/// ```rust
/// use varbuf::next_capacity;
///
/// assert_eq!(next_capacity(10, 11, 100), Ok(16));
/// assert_eq!(next_capacity(10, 30, 100), Ok(40));
/// assert_eq!(next_capacity(10, 30, 32), Ok(32));
/// assert!(next_capacity(10, 33, 32).is_err());
/// ```
pub fn next_capacity(current: usize, needed: usize, max: usize) -> Result<usize, BufferError> {
    if needed > max {
        return Err(BufferError::BufferOverflow {
            max_capacity: max,
            required: needed,
        });
    }

    let mut capacity = current;
    while capacity < needed {
        let grown = capacity.saturating_add(capacity.saturating_mul(3) / 5);
        capacity = grown.max(capacity + 1).min(max);
    }
    Ok(capacity)
}

fn resolve_max(initial: usize, max_capacity: Option<usize>) -> Result<usize, BufferError> {
    let max = max_capacity.unwrap_or(UNBOUNDED);
    if max > UNBOUNDED {
        return Err(BufferError::InvalidArgument(format!(
            "max capacity {max} exceeds the platform limit {UNBOUNDED}"
        )));
    }
    if initial > max {
        return Err(BufferError::InvalidArgument(format!(
            "capacity {initial} exceeds max capacity {max}"
        )));
    }
    Ok(max)
}

/// A resizable byte array with a read/write cursor.
///
/// See the [module documentation](self) for the invariants it keeps.
pub struct GrowableBuffer {
    pub(crate) data: Vec<u8>,
    pub(crate) position: usize,
    max_capacity: usize,
    /// Decoded UTF-16 code units of the last string read. Only ever grows.
    pub(crate) scratch: Vec<u16>,
}

impl GrowableBuffer {
    /// Creates a zero-filled buffer of `capacity` bytes that cannot grow.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            position: 0,
            max_capacity: capacity,
            scratch: Vec::new(),
        }
    }

    /// Creates a zero-filled buffer of `capacity` bytes that may grow up to
    /// `max_capacity` (`None` for unbounded).
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] when `capacity > max_capacity`.
    pub fn with_max_capacity(
        capacity: usize,
        max_capacity: Option<usize>,
    ) -> Result<Self, BufferError> {
        let max_capacity = resolve_max(capacity, max_capacity)?;
        Ok(Self {
            data: vec![0; capacity],
            position: 0,
            max_capacity,
            scratch: Vec::new(),
        })
    }

    /// Creates a buffer from [`BufferOptions`].
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] when the options are inconsistent.
    pub fn with_options(options: BufferOptions) -> Result<Self, BufferError> {
        Self::with_max_capacity(options.initial_capacity, options.max_capacity)
    }

    /// Wraps `bytes` for reading. Position starts at 0 and the buffer cannot
    /// grow past `bytes.len()`.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let max_capacity = bytes.len();
        Self {
            data: bytes,
            position: 0,
            max_capacity,
            scratch: Vec::new(),
        }
    }

    /// Replaces the backing array wholesale, discarding previous contents, and
    /// resets the position to 0.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] when `bytes.len() > max_capacity`.
    pub fn set_buffer(
        &mut self,
        bytes: Vec<u8>,
        max_capacity: Option<usize>,
    ) -> Result<(), BufferError> {
        self.max_capacity = resolve_max(bytes.len(), max_capacity)?;
        self.data = bytes;
        self.position = 0;
        debug!(
            capacity = self.data.len(),
            max_capacity = self.max_capacity,
            "replaced backing array"
        );
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] when `position` is past the capacity.
    pub fn set_position(&mut self, position: usize) -> Result<(), BufferError> {
        if position > self.data.len() {
            return Err(BufferError::InvalidArgument(format!(
                "position {position} exceeds capacity {}",
                self.data.len()
            )));
        }
        self.position = position;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Changes the growth limit.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] when the new limit is below the
    /// current capacity.
    pub fn set_max_capacity(&mut self, max_capacity: Option<usize>) -> Result<(), BufferError> {
        self.max_capacity = resolve_max(self.data.len(), max_capacity)?;
        Ok(())
    }

    /// Bytes between the cursor and the end of the backing array.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Resets the position to 0. The bytes are left in place.
    pub fn clear(&mut self) {
        self.position = 0;
    }

    /// Same as [`clear`](Self::clear).
    pub fn rewind(&mut self) {
        self.clear();
    }

    /// Resets the position to 0 and zeroes every byte of the backing array.
    ///
    /// Use this instead of [`clear`](Self::clear) when the buffer held key
    /// material or other secrets.
    pub fn clear_secure(&mut self) {
        self.data.fill(0);
        self.scratch.fill(0);
        self.position = 0;
        debug!(wiped = self.data.len(), "zeroed backing array");
    }

    /// The logical contents, `[0, position)`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.position]
    }

    /// A fresh copy of the logical contents, `[0, position)`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Consumes the buffer, returning the logical contents.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.position);
        self.data
    }

    /// The entire backing array, including bytes past the position.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.data
    }

    /// Compares logical contents (`[0, position)`) only, ignoring capacity and
    /// the unwritten tail.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }

    /// Advances the position by `count` bytes, growing the buffer first if the
    /// skipped range would run past the capacity.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when growth would exceed the max
    /// capacity.
    pub fn skip(&mut self, count: usize) -> Result<(), BufferError> {
        self.ensure(count)?;
        self.position += count;
        Ok(())
    }

    /// Writes one byte at the position.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when the buffer is full and cannot grow.
    pub fn write_byte(&mut self, value: u8) -> Result<(), BufferError> {
        self.ensure(1)?;
        self.data[self.position] = value;
        self.position += 1;
        Ok(())
    }

    /// Writes `bytes` at the position.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when growth would exceed the max
    /// capacity. Nothing is written in that case.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.ensure(bytes.len())?;
        self.put(bytes);
        Ok(())
    }

    /// Writes one byte at `offset` without moving the position, growing the
    /// buffer if `offset` is past the capacity.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when growth would exceed the max
    /// capacity.
    pub fn write_byte_at(&mut self, offset: usize, value: u8) -> Result<(), BufferError> {
        self.write_bytes_at(offset, &[value])
    }

    /// Writes `bytes` at `offset` without moving the position, growing the
    /// buffer if the range runs past the capacity.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when growth would exceed the max
    /// capacity.
    pub fn write_bytes_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        let end = offset
            .checked_add(bytes.len())
            .ok_or(BufferError::BufferOverflow {
                max_capacity: self.max_capacity,
                required: usize::MAX,
            })?;
        self.ensure_len(end)?;
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Reads one byte at the position.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] at the end of the backing array.
    pub fn read_byte(&mut self) -> Result<u8, BufferError> {
        let Some(&value) = self.data.get(self.position) else {
            return Err(BufferError::underflow(self.position, 1, self.data.len()));
        };
        self.position += 1;
        Ok(value)
    }

    /// Reads `count` bytes at the position, borrowing them from the backing
    /// array.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when fewer than `count` bytes remain.
    /// The position is left unchanged in that case.
    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8], BufferError> {
        self.require(count)?;
        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    /// Fills `out` from the position.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when fewer than `out.len()` bytes
    /// remain.
    pub fn read_bytes_into(&mut self, out: &mut [u8]) -> Result<(), BufferError> {
        let bytes = self.read_bytes(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    /// Reads the byte at `offset` without moving the position.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when `offset` is past the capacity.
    pub fn read_byte_at(&self, offset: usize) -> Result<u8, BufferError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| BufferError::underflow(offset, 1, self.data.len()))
    }

    /// Borrows `count` bytes starting at `offset` without moving the position.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] when the range runs past the capacity.
    pub fn read_bytes_at(&self, offset: usize, count: usize) -> Result<&[u8], BufferError> {
        offset
            .checked_add(count)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| BufferError::underflow(offset, count, self.data.len()))
    }

    /// Makes room for `additional` bytes after the position.
    pub(crate) fn ensure(&mut self, additional: usize) -> Result<(), BufferError> {
        if self.data.len() - self.position >= additional {
            return Ok(());
        }
        let required = self
            .position
            .checked_add(additional)
            .ok_or(BufferError::BufferOverflow {
                max_capacity: self.max_capacity,
                required: usize::MAX,
            })?;
        self.ensure_len(required)
    }

    /// Grows the backing array so that it is at least `required` bytes long.
    /// An allocation failure is reported as an overflow, like the max capacity.
    fn ensure_len(&mut self, required: usize) -> Result<(), BufferError> {
        if required <= self.data.len() {
            return Ok(());
        }
        let capacity = match next_capacity(self.data.len(), required, self.max_capacity) {
            Ok(capacity) => capacity,
            Err(err) => {
                debug!(
                    max_capacity = self.max_capacity,
                    required, "refused to grow past max capacity"
                );
                return Err(err);
            }
        };
        if self.data.try_reserve_exact(capacity - self.data.len()).is_err() {
            debug!(
                capacity,
                required, "allocator refused to grow backing array"
            );
            return Err(BufferError::BufferOverflow {
                max_capacity: self.max_capacity,
                required,
            });
        }
        trace!(
            from = self.data.len(),
            to = capacity,
            required,
            "growing backing array"
        );
        self.data.resize(capacity, 0);
        Ok(())
    }

    /// Fails unless `count` bytes can be read from the position.
    pub(crate) fn require(&self, count: usize) -> Result<(), BufferError> {
        if self.data.len() - self.position < count {
            return Err(BufferError::underflow(
                self.position,
                count,
                self.data.len(),
            ));
        }
        Ok(())
    }

    /// Copies `bytes` to the position. Capacity must already be ensured.
    #[inline]
    pub(crate) fn put(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], BufferError> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_bytes_at(offset, N)?);
        Ok(out)
    }
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        let options = BufferOptions::default();
        Self {
            data: vec![0; options.initial_capacity],
            position: 0,
            max_capacity: UNBOUNDED,
            scratch: Vec::new(),
        }
    }
}

impl Clone for GrowableBuffer {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            position: self.position,
            max_capacity: self.max_capacity,
            scratch: Vec::new(),
        }
    }
}

impl PartialEq for GrowableBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for GrowableBuffer {}

impl Hash for GrowableBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl fmt::Debug for GrowableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("position", &self.position)
            .field("capacity", &self.data.len())
            .field("max_capacity", &self.max_capacity)
            .field("contents", &BStr::new(self.as_bytes()))
            .finish()
    }
}
