//! Bulk helpers for runs of primitives.
//!
//! Fixed-width runs reserve room for the whole slice before writing, so they
//! either write everything or nothing.

use alloc::vec::Vec;

use crate::{BufferError, GrowableBuffer};

fn run_length(max_capacity: usize, count: usize, width: usize) -> Result<usize, BufferError> {
    count
        .checked_mul(width)
        .ok_or(BufferError::BufferOverflow {
            max_capacity,
            required: usize::MAX,
        })
}

macro_rules! fixed_runs {
    ($($write:ident, $read:ident, $ty:ty;)*) => {
        impl GrowableBuffer {
            $(
                #[doc = concat!("Writes every `", stringify!($ty), "` of `values` big-endian.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferOverflow`] when the buffer cannot grow
                /// enough; nothing is written.
                pub fn $write(&mut self, values: &[$ty]) -> Result<(), BufferError> {
                    let len = run_length(self.max_capacity(), values.len(), size_of::<$ty>())?;
                    self.ensure(len)?;
                    for value in values {
                        self.put(&value.to_be_bytes());
                    }
                    Ok(())
                }

                #[doc = concat!("Reads `count` big-endian `", stringify!($ty), "` values.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferUnderflow`] when too few bytes remain;
                /// nothing is consumed.
                pub fn $read(&mut self, count: usize) -> Result<Vec<$ty>, BufferError> {
                    let len = count
                        .checked_mul(size_of::<$ty>())
                        .ok_or_else(|| BufferError::underflow(self.position, usize::MAX, self.capacity()))?;
                    let bytes = self.read_bytes(len)?;
                    Ok(bytes
                        .chunks_exact(size_of::<$ty>())
                        .map(|chunk| {
                            let mut raw = [0u8; size_of::<$ty>()];
                            raw.copy_from_slice(chunk);
                            <$ty>::from_be_bytes(raw)
                        })
                        .collect())
                }
            )*
        }
    };
}

fixed_runs! {
    write_shorts, read_shorts, i16;
    write_chars, read_chars, u16;
    write_ints, read_ints, i32;
    write_longs, read_longs, i64;
    write_floats, read_floats, f32;
    write_doubles, read_doubles, f64;
}

macro_rules! varint_runs {
    ($($write:ident, $read:ident, $one_write:ident, $one_read:ident, $ty:ty;)*) => {
        impl GrowableBuffer {
            $(
                #[doc = concat!("Writes every `", stringify!($ty), "` of `values` as a varint, returning the bytes written.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferOverflow`] when the buffer cannot grow
                /// enough. Values written before the failure stay written.
                pub fn $write(
                    &mut self,
                    values: &[$ty],
                    optimize_positive: bool,
                ) -> Result<usize, BufferError> {
                    values.iter().try_fold(0, |total, &value| {
                        Ok(total + self.$one_write(value, optimize_positive)?)
                    })
                }

                #[doc = concat!("Reads `count` varint `", stringify!($ty), "` values.")]
                ///
                /// # Errors
                ///
                /// [`BufferError::BufferUnderflow`] when the run is truncated.
                pub fn $read(
                    &mut self,
                    count: usize,
                    optimize_positive: bool,
                ) -> Result<Vec<$ty>, BufferError> {
                    // Each varint takes at least one byte.
                    self.require(count)?;
                    (0..count)
                        .map(|_| self.$one_read(optimize_positive))
                        .collect()
                }
            )*
        }
    };
}

varint_runs! {
    write_var_ints, read_var_ints, write_var_int, read_var_int, i32;
    write_var_longs, read_var_longs, write_var_long, read_var_long, i64;
}
