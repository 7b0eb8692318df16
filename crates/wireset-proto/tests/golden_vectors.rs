// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Golden byte vectors for both protocols.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use hex::FromHex;
use wireset_proto::{
    BinaryInputProtocol, BinaryOutputProtocol, CompactInputProtocol, CompactOutputProtocol,
    InputProtocol, OutputProtocol, SetHeader, TType,
};

fn hex_to_vec(s: &str) -> Vec<u8> {
    let s_clean: String = s.split_whitespace().collect();
    Vec::from_hex(s_clean).expect("hex")
}

fn write_i32_set<P: OutputProtocol>(out: &mut P, items: &[i32]) {
    out.write_set_begin(SetHeader::new(TType::I32, items.len()))
        .expect("begin");
    for item in items {
        out.write_i32(*item).expect("item");
    }
    out.write_set_end().expect("end");
}

#[test]
fn binary_i32_set_vector() {
    let mut out = BinaryOutputProtocol::new(Vec::new());
    write_i32_set(&mut out, &[1, 2, 3]);
    let expected = hex_to_vec("08 00000003 00000001 00000002 00000003");
    assert_eq!(out.into_inner(), expected);
}

#[test]
fn compact_i32_set_vector() {
    let mut out = CompactOutputProtocol::new(Vec::new());
    write_i32_set(&mut out, &[1, -1, 64]);
    // header 0x35, then zigzag varints 2, 1, 128 (0x80 0x01)
    let expected = hex_to_vec("35 02 01 8001");
    assert_eq!(out.into_inner(), expected);
}

#[test]
fn binary_string_vector() {
    let mut out = BinaryOutputProtocol::new(Vec::new());
    out.write_string("hi").expect("string");
    assert_eq!(out.into_inner(), hex_to_vec("00000002 6869"));
}

#[test]
fn compact_string_vector() {
    let mut out = CompactOutputProtocol::new(Vec::new());
    out.write_string("hi").expect("string");
    assert_eq!(out.into_inner(), hex_to_vec("02 6869"));
}

#[test]
fn binary_reader_consumes_vector_exactly() {
    let bytes = hex_to_vec("0b 00000001 00000003 616263");
    let mut rest = bytes.as_slice();
    let mut input = BinaryInputProtocol::new(&mut rest);
    assert_eq!(
        input.read_set_begin().expect("begin"),
        SetHeader::new(TType::String, 1)
    );
    assert_eq!(input.read_string().expect("string"), "abc");
    input.read_set_end().expect("end");
    drop(input);
    assert!(rest.is_empty());
}

#[test]
fn compact_reader_rejects_unknown_element_nibble() {
    let bytes = hex_to_vec("1d");
    let mut input = CompactInputProtocol::new(bytes.as_slice());
    assert!(input.read_set_begin().is_err());
}
