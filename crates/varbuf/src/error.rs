use alloc::string::String;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A caller-supplied size or offset violates a documented precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Growing to `required` bytes would exceed `max_capacity`.
    #[error("buffer overflow: max capacity {max_capacity}, required {required}")]
    BufferOverflow { max_capacity: usize, required: usize },
    /// A read wanted more bytes than remain between the cursor and the end of
    /// the backing array.
    #[error("buffer underflow at position {position}: required {required}, available {available}")]
    BufferUnderflow {
        position: usize,
        required: usize,
        available: usize,
    },
    #[error("{source} at position {position}")]
    InvalidEncoding {
        source: EncodingError,
        position: usize,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid lead byte 0x{0:02X}")]
    InvalidLeadByte(u8),
    #[error("invalid continuation byte 0x{0:02X}")]
    InvalidContinuationByte(u8),
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    #[error("non-ASCII code unit \\u{0:04X}")]
    NonAscii(u16),
    #[error("string of {0} code units is too long to encode")]
    TooLong(usize),
}

impl BufferError {
    pub(crate) fn underflow(position: usize, required: usize, capacity: usize) -> Self {
        BufferError::BufferUnderflow {
            position,
            required,
            available: capacity.saturating_sub(position),
        }
    }

    pub(crate) fn encoding(source: EncodingError, position: usize) -> Self {
        BufferError::InvalidEncoding { source, position }
    }
}
