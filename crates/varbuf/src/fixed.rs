//! Fixed-width primitives, big-endian.

use crate::{BufferError, GrowableBuffer};

macro_rules! fixed_width {
    ($($(#[$meta:meta])* $write:ident, $read:ident, $ty:ty;)*) => {
        impl GrowableBuffer {
            $(
                #[doc = concat!("Writes a big-endian `", stringify!($ty), "` at the position.")]
                $(#[$meta])*
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferOverflow`] when the buffer cannot grow
                /// enough.
                pub fn $write(&mut self, value: $ty) -> Result<(), BufferError> {
                    let bytes = value.to_be_bytes();
                    self.ensure(bytes.len())?;
                    self.put(&bytes);
                    Ok(())
                }

                #[doc = concat!("Reads a big-endian `", stringify!($ty), "` at the position.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferUnderflow`] when too few bytes remain.
                /// The position is left unchanged in that case.
                pub fn $read(&mut self) -> Result<$ty, BufferError> {
                    self.read_array().map(<$ty>::from_be_bytes)
                }
            )*
        }
    };
}

fixed_width! {
    write_short, read_short, i16;
    /// A `char` here is a single UTF-16 code unit.
    write_char, read_char, u16;
    write_int, read_int, i32;
    write_long, read_long, i64;
    write_float, read_float, f32;
    write_double, read_double, f64;
}

macro_rules! fixed_width_at {
    ($($write:ident, $read:ident, $ty:ty;)*) => {
        impl GrowableBuffer {
            $(
                #[doc = concat!("Writes a big-endian `", stringify!($ty), "` at `offset` without moving the position.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferOverflow`] when the buffer cannot grow
                /// to cover `offset`.
                pub fn $write(&mut self, offset: usize, value: $ty) -> Result<(), BufferError> {
                    self.write_bytes_at(offset, &value.to_be_bytes())
                }

                #[doc = concat!("Reads a big-endian `", stringify!($ty), "` at `offset` without moving the position.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferUnderflow`] when the value runs past the
                /// capacity.
                pub fn $read(&self, offset: usize) -> Result<$ty, BufferError> {
                    self.read_array_at(offset).map(<$ty>::from_be_bytes)
                }
            )*
        }
    };
}

fixed_width_at! {
    write_short_at, read_short_at, i16;
    write_int_at, read_int_at, i32;
    write_long_at, read_long_at, i64;
}

impl GrowableBuffer {
    /// Writes `1` for `true` and `0` for `false`.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferOverflow`] when the buffer is full.
    pub fn write_boolean(&mut self, value: bool) -> Result<(), BufferError> {
        self.write_byte(u8::from(value))
    }

    /// Reads one byte; anything but `0` is `true`.
    ///
    /// # Errors
    ///
    /// [`BufferError::BufferUnderflow`] at the end of the backing array.
    pub fn read_boolean(&mut self) -> Result<bool, BufferError> {
        self.read_byte().map(|byte| byte != 0)
    }
}
