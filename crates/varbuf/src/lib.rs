//! A growable byte buffer with a variable-length integer codec and a compact
//! string codec.
//!
//! [`GrowableBuffer`] owns a byte array and a cursor. Every write lands at the
//! cursor and grows the array (by a factor of 1.6, up to a configurable
//! maximum) when it runs out of room; every read starts at the cursor and
//! fails with [`BufferError::BufferUnderflow`] instead of reading past the
//! end.
//!
//! On top of the raw bytes the buffer speaks three wire formats:
//!
//! - big-endian fixed-width primitives ([`write_int`], [`write_double`], ...);
//! - varints of 1 to 5 bytes (32-bit) or 1 to 9 bytes (64-bit), optionally
//!   zig-zag encoded ([`write_var_int`], [`write_var_long`]);
//! - a compact string format with single-byte null/empty markers, a flagged
//!   ASCII run for short ASCII strings and a length-prefixed general form
//!   ([`write_string`]).
//!
//! ```rust
//! use varbuf::GrowableBuffer;
//!
//! let mut out = GrowableBuffer::with_max_capacity(4, None).unwrap();
//! out.write_var_int(-3, false).unwrap();
//! out.write_string(Some("hello")).unwrap();
//! out.write_string(None).unwrap();
//! out.write_long(1 << 40).unwrap();
//!
//! let mut input = GrowableBuffer::from_bytes(out.to_bytes());
//! assert_eq!(input.read_var_int(false), Ok(-3));
//! assert_eq!(input.read_string(), Ok(Some("hello".into())));
//! assert_eq!(input.read_string(), Ok(None));
//! assert_eq!(input.read_long(), Ok(1 << 40));
//! ```
//!
//! The buffer is not synchronized; give each thread its own.
//!
//! [`write_int`]: GrowableBuffer::write_int
//! [`write_double`]: GrowableBuffer::write_double
//! [`write_var_int`]: GrowableBuffer::write_var_int
//! [`write_var_long`]: GrowableBuffer::write_var_long
//! [`write_string`]: GrowableBuffer::write_string

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod array;
mod buffer;
mod error;
mod fixed;
mod options;
mod string;
mod tracing_compat;
mod varint;

#[cfg(test)]
mod tests;

pub use buffer::{GrowableBuffer, UNBOUNDED, next_capacity};
pub use error::{BufferError, EncodingError};
pub use options::BufferOptions;
pub use varint::{
    var_int_length, var_long_length, zigzag_decode_32, zigzag_decode_64, zigzag_encode_32,
    zigzag_encode_64,
};
