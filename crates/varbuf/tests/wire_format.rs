#![allow(missing_docs)]

mod common;

use varbuf::GrowableBuffer;

use crate::common::{WriteFn, hex, render};

#[test]
fn varint_wire_format() {
    let cases: &[(&str, WriteFn)] = &[
        ("var_int(0, true)", |b| b.write_var_int(0, true).map(drop)),
        ("var_int(300, true)", |b| b.write_var_int(300, true).map(drop)),
        ("var_int(-1, true)", |b| b.write_var_int(-1, true).map(drop)),
        ("var_int(-1, false)", |b| b.write_var_int(-1, false).map(drop)),
        ("var_int(63, false)", |b| b.write_var_int(63, false).map(drop)),
        ("var_int(-64, false)", |b| b.write_var_int(-64, false).map(drop)),
        ("var_int(i32::MAX, true)", |b| b.write_var_int(i32::MAX, true).map(drop)),
        ("var_int(i32::MIN, false)", |b| b.write_var_int(i32::MIN, false).map(drop)),
        ("var_long(1 << 56, true)", |b| b.write_var_long(1 << 56, true).map(drop)),
        ("var_long(-1, true)", |b| b.write_var_long(-1, true).map(drop)),
        ("var_long(i64::MIN, false)", |b| b.write_var_long(i64::MIN, false).map(drop)),
        ("var_long(i64::MAX, false)", |b| b.write_var_long(i64::MAX, false).map(drop)),
    ];

    insta::assert_snapshot!(render(cases), @r"
    var_int(0, true) => 00
    var_int(300, true) => ac 02
    var_int(-1, true) => ff ff ff ff 0f
    var_int(-1, false) => 01
    var_int(63, false) => 7e
    var_int(-64, false) => 7f
    var_int(i32::MAX, true) => ff ff ff ff 07
    var_int(i32::MIN, false) => ff ff ff ff 0f
    var_long(1 << 56, true) => 80 80 80 80 80 80 80 80 01
    var_long(-1, true) => ff ff ff ff ff ff ff ff ff
    var_long(i64::MIN, false) => ff ff ff ff ff ff ff ff ff
    var_long(i64::MAX, false) => fe ff ff ff ff ff ff ff ff
    ");
}

#[test]
fn string_wire_format() {
    let cases: &[(&str, WriteFn)] = &[
        ("null", |b| b.write_string(None)),
        ("empty", |b| b.write_string(Some(""))),
        ("one ascii char", |b| b.write_string(Some("a"))),
        ("ascii run", |b| b.write_string(Some("hello"))),
        ("two-byte unit", |b| b.write_string(Some("é"))),
        ("three-byte units", |b| b.write_string(Some("\u{1234}\u{1234}\u{1234}"))),
        ("surrogate pair", |b| b.write_string(Some("\u{1F600}"))),
        ("mixed widths", |b| b.write_string(Some("ok\u{7FF}"))),
        ("33 ascii chars", |b| b.write_string(Some(&"x".repeat(33)))),
        ("ascii writer", |b| b.write_ascii(Some("hello"))),
        ("ascii writer rejects", |b| b.write_ascii(Some("é"))),
    ];

    insta::assert_snapshot!(render(cases), @r"
    null => 80
    empty => 81
    one ascii char => 82 61
    ascii run => 68 65 6c 6c ef
    two-byte unit => 82 c3 a9
    three-byte units => 84 e1 88 b4 e1 88 b4 e1 88 b4
    surrogate pair => 83 ed a0 bd ed b8 80
    mixed widths => 84 6f 6b df bf
    33 ascii chars => a2 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78 78
    ascii writer => 68 65 6c 6c ef
    ascii writer rejects => error: non-ASCII code unit \u00E9 at position 0
    ");
}

#[test]
fn long_length_prefix_continues() {
    let mut buffer = GrowableBuffer::with_max_capacity(0, None).unwrap();
    let text = "y".repeat(100);
    buffer.write_string(Some(&text)).unwrap();
    assert_eq!(buffer.position(), 102);
    assert_eq!(hex(&buffer.as_bytes()[..3]), "e5 01 79");

    buffer.clear();
    assert_eq!(buffer.read_string().unwrap(), Some(text));
}

#[test]
fn mixed_record_layout() {
    let mut buffer = GrowableBuffer::with_max_capacity(2, None).unwrap();
    buffer.write_boolean(true).unwrap();
    buffer.write_short(-2).unwrap();
    buffer.write_var_int(300, true).unwrap();
    buffer.write_string(Some("hi")).unwrap();
    buffer.write_string(None).unwrap();
    buffer.write_int(1).unwrap();

    insta::assert_snapshot!(hex(buffer.as_bytes()), @"01 ff fe ac 02 68 e9 80 00 00 00 01");

    let mut reader = GrowableBuffer::from_bytes(buffer.into_bytes());
    assert_eq!(reader.read_boolean(), Ok(true));
    assert_eq!(reader.read_short(), Ok(-2));
    assert_eq!(reader.read_var_int(true), Ok(300));
    assert_eq!(reader.read_string(), Ok(Some("hi".into())));
    assert_eq!(reader.read_string(), Ok(None));
    assert_eq!(reader.read_int(), Ok(1));
    assert_eq!(reader.remaining(), 0);
}
