#![allow(missing_docs)]

use std::fmt::Write;

use varbuf::{BufferError, GrowableBuffer};

/// Lowercase hex, one byte per pair, space separated.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        write!(out, "{byte:02x}").unwrap();
    }
    out
}

pub type WriteFn = fn(&mut GrowableBuffer) -> Result<(), BufferError>;

/// Runs each labelled write against a fresh unbounded buffer and renders one
/// `label => bytes` line per write.
pub fn render(cases: &[(&str, WriteFn)]) -> String {
    let mut out = String::new();
    for (label, write) in cases {
        let mut buffer = GrowableBuffer::with_max_capacity(0, None).unwrap();
        match write(&mut buffer) {
            Ok(()) => writeln!(out, "{label} => {}", hex(buffer.as_bytes())).unwrap(),
            Err(err) => writeln!(out, "{label} => error: {err}").unwrap(),
        }
    }
    out
}
