#![no_main]
use libfuzzer_sys::fuzz_target;
use varbuf::{BufferError, GrowableBuffer};

/// Walks `data` with the reader picked by each selector byte until the input
/// is exhausted or a read fails. Reads must never panic or move the position
/// past the capacity.
fn decode(data: &[u8]) {
    let Some((&selectors, body)) = data.split_first() else {
        return;
    };
    let mut buffer = GrowableBuffer::from_bytes(body.to_vec());
    let mut scratch = String::new();

    for step in 0u32.. {
        if buffer.remaining() == 0 {
            break;
        }
        let before = buffer.position();
        let result: Result<(), BufferError> = match selectors.rotate_left(step % 8) % 8 {
            0 => buffer.read_string().map(drop),
            1 => {
                scratch.clear();
                buffer.read_string_into(&mut scratch).map(drop)
            }
            2 => buffer.read_utf16().map(drop),
            3 => buffer.read_var_int(step % 2 == 0).map(drop),
            4 => buffer.read_var_long(step % 2 == 0).map(drop),
            5 => buffer.read_long().map(drop),
            6 => buffer.read_var_ints(usize::from(selectors).max(1), true).map(drop),
            _ => buffer.read_char().map(drop),
        };
        assert!(buffer.position() <= buffer.capacity());
        match result {
            Ok(()) => assert!(buffer.position() > before),
            Err(BufferError::BufferUnderflow { .. } | BufferError::InvalidEncoding { .. }) => break,
            Err(err) => panic!("unexpected error while decoding: {err}"),
        }
    }
}

fuzz_target!(|data: &[u8]| decode(data));
