//! Size arithmetic and lookup checks for the fluent encoder, one entry
//! kind at a time.

use dtokit::{Dto, Encoder, Tag};

const LENGTH: usize = 4;
const END: usize = 1;
const VALUE_TYPE: usize = 1;
const A_KEY: usize = 2; // "a" plus the terminator
const BOOL: usize = 1;
const INT32: usize = 4;
const INT64: usize = 8;
const DOUBLE: usize = 8;
const B_STRING: usize = LENGTH + 2; // "b" plus the terminator

#[test]
fn empty_document() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + END);
    assert_eq!(dto.entry_count(), 0);
}

#[test]
fn encoded_double() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").double(1.0).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + DOUBLE + END);

    let found = dto.find("a").unwrap();
    assert_eq!(found.key(), b"a");
    assert_eq!(found.to_double(), 1.0);
}

#[test]
fn encoded_string() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").string("b").end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + B_STRING + END);

    let found = dto.find("a").unwrap();
    assert_eq!(found.key(), b"a");
    assert_eq!(found.to_str(), "b");
}

#[test]
fn encoded_empty_key_value() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document)
        .key("a")
        .begin_key_value()
        .end()
        .end();

    let dto = Dto::new(&document);
    assert_eq!(
        dto.length(),
        LENGTH + A_KEY + (VALUE_TYPE + (LENGTH + END)) + END
    );

    let found = dto.find("a").unwrap();
    assert_eq!(found.tag(), Tag::KeyValue);
    assert_eq!(found.to_dto().entry_count(), 0);
}

#[test]
fn encoded_empty_sequence() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document)
        .key("a")
        .begin_sequence()
        .end()
        .end();

    let dto = Dto::new(&document);
    assert_eq!(
        dto.length(),
        LENGTH + A_KEY + (VALUE_TYPE + (LENGTH + END)) + END
    );

    let found = dto.find("a").unwrap();
    assert_eq!(found.tag(), Tag::Sequence);
}

#[test]
fn encoded_binary_blob() {
    let mut document = [0u8; 500];
    let blob = [1u8, 2, 3, 4];
    Encoder::new(&mut document).key("a").binary(0, &blob).end();

    let dto = Dto::new(&document);
    assert_eq!(
        dto.length(),
        LENGTH + A_KEY + VALUE_TYPE + (LENGTH + VALUE_TYPE + blob.len()) + END
    );
    assert!(dto.find("a").is_some());
}

#[test]
fn encoded_uuid() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").uuid(&[0u8; 16]).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + 16 + END);
    assert!(dto.find("a").is_some());
}

#[test]
fn encoded_bool() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").boolean(true).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + BOOL + END);
    assert!(dto.find("a").unwrap().to_bool());
}

#[test]
fn encoded_date() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").date(0).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + INT64 + END);
    assert_eq!(dto.find("a").unwrap().tag(), Tag::Date);
}

#[test]
fn encoded_null() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").null().end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + END);
    assert_eq!(dto.find("a").unwrap().tag(), Tag::Null);
}

#[test]
fn encoded_regex() {
    let mut document = [0u8; 500];
    let pattern = r"(\w+)+";
    Encoder::new(&mut document).key("a").regex(pattern, "").end();

    let dto = Dto::new(&document);
    assert_eq!(
        dto.length(),
        LENGTH + A_KEY + VALUE_TYPE + (pattern.len() + 1) + 1 + END
    );
    assert_eq!(dto.find("a").unwrap().tag(), Tag::RegEx);
}

#[test]
fn encoded_int32() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").int32(0).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + INT32 + END);
    assert_eq!(dto.find("a").unwrap().to_int32(), 0);
}

#[test]
fn encoded_timestamp() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").timestamp(0).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + INT64 + END);
    assert_eq!(dto.find("a").unwrap().tag(), Tag::Timestamp);
}

#[test]
fn encoded_int64() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document).key("a").int64(0).end();

    let dto = Dto::new(&document);
    assert_eq!(dto.length(), LENGTH + A_KEY + VALUE_TYPE + INT64 + END);
    assert_eq!(dto.find("a").unwrap().tag(), Tag::Int64);
}

#[test]
fn sequence_keys_are_synthesized_in_order() {
    let mut document = [0u8; 500];
    Encoder::new(&mut document)
        .key("s")
        .begin_sequence()
        .int32(10)
        .int32(20)
        .int32(30)
        .end()
        .end();

    let dto = Dto::new(&document);
    let sequence = dto.find("s").unwrap().to_dto();

    let mut iter = sequence.iter();
    let mut expected = 0;
    while iter.next() {
        assert_eq!(iter.key(), expected.to_string().as_bytes());
        expected += 1;
    }
    assert_eq!(expected, 3);
}

#[test]
fn append_splices_a_complete_encoder() {
    let mut nested = [0u8; 100];
    let mut nested_encoder = Encoder::new(&mut nested);
    nested_encoder.key("inner").int32(7).end();
    assert!(nested_encoder.complete());

    let mut document = [0u8; 500];
    let mut encoder = Encoder::new(&mut document);
    encoder.key("outer").append(&nested_encoder).end();
    assert!(encoder.complete());

    let dto = Dto::new(&document);
    let found = dto.find("outer").unwrap();
    assert_eq!(found.tag(), Tag::KeyValue);
    assert_eq!(found.to_dto().find("inner").unwrap().to_int32(), 7);
    assert_eq!(dto.find_descendant("outer.inner").unwrap().to_int32(), 7);
}

#[test]
fn encoder_completes_only_at_the_root() {
    let mut document = [0u8; 500];
    let mut encoder = Encoder::new(&mut document);
    assert!(!encoder.complete());

    encoder.key("a").begin_key_value();
    assert!(!encoder.complete());

    encoder.end();
    assert!(!encoder.complete());

    encoder.end();
    assert!(encoder.complete());
    assert_eq!(encoder.length(), Dto::new(encoder.data()).length());
}
