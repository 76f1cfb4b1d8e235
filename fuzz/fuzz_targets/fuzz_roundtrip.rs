#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use varbuf::{BufferError, BufferOptions, GrowableBuffer};

#[derive(Arbitrary, Debug)]
enum Op {
    Byte(u8),
    Boolean(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Double(f64),
    VarInt(i32, bool),
    VarLong(i64, bool),
    String(Option<String>),
    Utf16(Option<Vec<u16>>),
    Ints(Vec<i32>),
}

#[derive(Arbitrary, Debug)]
struct Input {
    initial_capacity: u8,
    headroom: Option<u16>,
    ops: Vec<Op>,
}

fn write(buffer: &mut GrowableBuffer, op: &Op) -> Result<(), BufferError> {
    match op {
        Op::Byte(v) => buffer.write_byte(*v),
        Op::Boolean(v) => buffer.write_boolean(*v),
        Op::Short(v) => buffer.write_short(*v),
        Op::Int(v) => buffer.write_int(*v),
        Op::Long(v) => buffer.write_long(*v),
        Op::Double(v) => buffer.write_double(*v),
        Op::VarInt(v, opt) => buffer.write_var_int(*v, *opt).map(drop),
        Op::VarLong(v, opt) => buffer.write_var_long(*v, *opt).map(drop),
        Op::String(s) => buffer.write_string(s.as_deref()),
        Op::Utf16(units) => buffer.write_utf16(units.as_deref()),
        Op::Ints(values) => buffer.write_ints(values),
    }
}

fn check(reader: &mut GrowableBuffer, op: &Op) {
    match op {
        Op::Byte(v) => assert_eq!(reader.read_byte(), Ok(*v)),
        Op::Boolean(v) => assert_eq!(reader.read_boolean(), Ok(*v)),
        Op::Short(v) => assert_eq!(reader.read_short(), Ok(*v)),
        Op::Int(v) => assert_eq!(reader.read_int(), Ok(*v)),
        Op::Long(v) => assert_eq!(reader.read_long(), Ok(*v)),
        Op::Double(v) => assert_eq!(reader.read_double().map(f64::to_bits), Ok(v.to_bits())),
        Op::VarInt(v, opt) => assert_eq!(reader.read_var_int(*opt), Ok(*v)),
        Op::VarLong(v, opt) => assert_eq!(reader.read_var_long(*opt), Ok(*v)),
        Op::String(s) => assert_eq!(reader.read_string().as_ref(), Ok(s)),
        Op::Utf16(units) => assert_eq!(reader.read_utf16().as_ref(), Ok(units)),
        Op::Ints(values) => assert_eq!(reader.read_ints(values.len()).as_ref(), Ok(values)),
    }
}

/// Writes every op into a bounded buffer, stopping at the first overflow, then
/// reads the accepted prefix back.
fn roundtrip(input: &Input) {
    let initial_capacity = usize::from(input.initial_capacity);
    let max_capacity = input.headroom.map(|h| initial_capacity + usize::from(h));
    let Ok(mut buffer) = GrowableBuffer::with_options(BufferOptions {
        initial_capacity,
        max_capacity,
    }) else {
        return;
    };

    let mut accepted = 0;
    for op in &input.ops {
        let before = buffer.to_bytes();
        match write(&mut buffer, op) {
            Ok(()) => accepted += 1,
            Err(BufferError::BufferOverflow { max_capacity: limit, .. }) => {
                assert_eq!(Some(limit), max_capacity);
                assert_eq!(buffer.to_bytes(), before);
                break;
            }
            Err(err) => panic!("unexpected write error: {err}"),
        }
        if let Some(max) = max_capacity {
            assert!(buffer.capacity() <= max);
        }
    }

    let mut reader = GrowableBuffer::from_bytes(buffer.into_bytes());
    for op in &input.ops[..accepted] {
        check(&mut reader, op);
    }
    assert_eq!(reader.remaining(), 0);
}

fuzz_target!(|input: Input| roundtrip(&input));
