/// Sizing options for a [`GrowableBuffer`](crate::GrowableBuffer).
///
/// # Examples
///
/// ```rust
/// use varbuf::{BufferOptions, GrowableBuffer};
///
/// let buffer = GrowableBuffer::with_options(BufferOptions {
///     initial_capacity: 8,
///     max_capacity: Some(1024),
/// })
/// .unwrap();
/// assert_eq!(buffer.capacity(), 8);
/// assert_eq!(buffer.max_capacity(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferOptions {
    /// Number of bytes allocated up front.
    ///
    /// # Default
    ///
    /// `32`
    pub initial_capacity: usize,

    /// Upper bound the backing array may grow to.
    ///
    /// `None` leaves the buffer unbounded, which in practice means
    /// [`UNBOUNDED`](crate::UNBOUNDED) bytes. A bound smaller than
    /// `initial_capacity` is rejected when the buffer is built.
    ///
    /// # Default
    ///
    /// `None`
    pub max_capacity: Option<usize>,
}

impl BufferOptions {
    /// Options for a buffer that never grows past its initial allocation.
    #[must_use]
    pub fn fixed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            max_capacity: Some(capacity),
        }
    }
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 32,
            max_capacity: None,
        }
    }
}
