//! Tests for typed value codecs
//!
//! These tests verify:
//! - Byte layout of integers and integer arrays
//! - Malformed lengths are rejected
//! - UTF-8 validation for strings

use dockv::{DocError, ValueCodec};

// =============================================================================
// Integer Tests
// =============================================================================

#[test]
fn test_i32_is_four_little_endian_bytes() {
    let bytes = 2024i32.encode();

    assert_eq!(bytes, 2024i32.to_le_bytes().to_vec());
    assert_eq!(i32::decode(&bytes).unwrap(), 2024);
}

#[test]
fn test_negative_and_extreme_integers() {
    assert_eq!(i32::decode(&(-4i32).encode()).unwrap(), -4);
    assert_eq!(i64::decode(&i64::MIN.encode()).unwrap(), i64::MIN);
    assert_eq!(u64::decode(&u64::MAX.encode()).unwrap(), u64::MAX);
    assert_eq!(u32::decode(&[0xff, 0, 0, 0]).unwrap(), 255);
}

#[test]
fn test_integer_wrong_width_is_malformed() {
    let err = i32::decode(b"I am string").unwrap_err();
    assert!(matches!(err, DocError::MalformedValue(_)));

    assert!(i64::decode(&7i32.encode()).is_err());
    assert!(i32::decode(&[]).is_err());
}

// =============================================================================
// Array Tests
// =============================================================================

#[test]
fn test_i32_array_layout() {
    let array: Vec<i32> = vec![1, 2, 42, -4];
    let bytes = array.encode();

    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[8..12], &42i32.to_le_bytes());
    assert_eq!(Vec::<i32>::decode(&bytes).unwrap(), array);
}

#[test]
fn test_empty_array_is_valid() {
    assert!(Vec::<i32>::new().encode().is_empty());
    assert_eq!(Vec::<i64>::decode(&[]).unwrap(), Vec::<i64>::new());
}

#[test]
fn test_array_partial_element_is_malformed() {
    let err = Vec::<i32>::decode(&[0u8; 6]).unwrap_err();
    match err {
        DocError::MalformedValue(msg) => assert!(msg.contains("6 bytes"), "{msg}"),
        other => panic!("expected MalformedValue, got {other:?}"),
    }

    // A single i32 reads as a one-element array but not as an i64 array
    assert_eq!(Vec::<i32>::decode(&2024i32.encode()).unwrap(), vec![2024]);
    assert!(Vec::<i64>::decode(&2024i32.encode()).is_err());
}

// =============================================================================
// String / Bytes Tests
// =============================================================================

#[test]
fn test_string_is_raw_utf8() {
    let text = "I am string".to_string();

    assert_eq!(text.encode(), b"I am string".to_vec());
    assert_eq!(String::decode("héllo".as_bytes()).unwrap(), "héllo");
}

#[test]
fn test_invalid_utf8_is_malformed() {
    let err = String::decode(&[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, DocError::MalformedValue(_)));
}

#[test]
fn test_raw_bytes_pass_through() {
    let raw = vec![0u8, 255, 7];
    assert_eq!(raw.encode(), raw);
    assert_eq!(Vec::<u8>::decode(&raw).unwrap(), raw);
}
