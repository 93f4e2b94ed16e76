//! Order-preserving integer encoding
//!
//! Integers of any size are encoded so that comparing encodings as unsigned
//! byte sequences gives numeric order. The encoding is a header carrying
//! the sign and the magnitude length, followed by the big-endian magnitude:
//!
//! | first nibble | length bits | header bytes | lengths            |
//! |--------------|-------------|--------------|--------------------|
//! | `0x8`        | 4           | 1            | 0 ..= 15           |
//! | `0x9`        | 12          | 2            | 16 ..= 4095        |
//! | `0xA`        | 20          | 3            | ..= 2^20 - 1       |
//! | `0xB`        | 28          | 4            | ..= 2^28 - 1       |
//! | `0xC0`       | 64          | 9            | larger             |
//!
//! Zero is the single byte `0x80`. Negative numbers use the same layout with
//! every header and magnitude byte complemented, so they sort below zero and
//! longer magnitudes sort first. These bytes end up in persistent index keys
//! and must never change.

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use num_bigint::{BigInt, Sign};
use once_cell::sync::Lazy;
use regex::Regex;

static STRICT_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0|-?[1-9][0-9]*)$").unwrap());

/// Parse an integer leniently: optional sign, leading zeros and surrounding spaces accepted
pub fn parse_integer(value: &[u8]) -> Result<BigInt> {
    let text = std::str::from_utf8(value)
        .map_err(|_| Error::decode("integer value is not valid UTF-8", value))?
        .trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Decode(
            DecodeError::new("invalid integer")
                .with_value(value)
                .with_reason("expected an optional sign followed by decimal digits"),
        ));
    }
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| Error::decode("invalid integer", value))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Check an integer against the strict RFC 4517 Integer syntax
pub fn is_strict_integer(value: &[u8]) -> bool {
    std::str::from_utf8(value)
        .map(|s| STRICT_INTEGER.is_match(s))
        .unwrap_or(false)
}

fn header(length: usize) -> Vec<u8> {
    if length < 0x10 {
        vec![0x80 | length as u8]
    } else if length < 0x1000 {
        vec![0x90 | (length >> 8) as u8, length as u8]
    } else if length < 0x10_0000 {
        vec![0xA0 | (length >> 16) as u8, (length >> 8) as u8, length as u8]
    } else if length < 0x1000_0000 {
        vec![
            0xB0 | (length >> 24) as u8,
            (length >> 16) as u8,
            (length >> 8) as u8,
            length as u8,
        ]
    } else {
        let mut bytes = vec![0xC0];
        bytes.extend_from_slice(&(length as u64).to_be_bytes());
        bytes
    }
}

/// Encode an integer so that byte order equals numeric order
pub fn encode_integer(number: &BigInt) -> ByteString {
    let (sign, magnitude) = number.to_bytes_be();
    if sign == Sign::NoSign {
        return ByteString::from_vec(vec![0x80]);
    }

    let mut bytes = header(magnitude.len());
    bytes.extend_from_slice(&magnitude);
    if sign == Sign::Minus {
        bytes.iter_mut().for_each(|b| *b = !*b);
    }
    ByteString::from_vec(bytes)
}

/// Parse leniently and encode
pub fn normalize_integer(value: &[u8]) -> Result<ByteString> {
    parse_integer(value).map(|n| encode_integer(&n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_i64(n: i64) -> ByteString {
        encode_integer(&BigInt::from(n))
    }

    #[test]
    fn test_header_vectors() {
        assert_eq!(header(1), vec![0x81]);
        assert_eq!(header(15), vec![0x8f]);
        assert_eq!(header(16), vec![0x90, 0x10]);
        assert_eq!(header(4095), vec![0x9f, 0xff]);
        assert_eq!(header(4096), vec![0xa0, 0x10, 0x00]);
        assert_eq!(header(0x10_0000), vec![0xb0, 0x10, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode_i64(0).as_bytes(), &[0x80]);
        assert_eq!(encode_i64(1).as_bytes(), &[0x81, 0x01]);
        assert_eq!(encode_i64(255).as_bytes(), &[0x81, 0xff]);
        assert_eq!(encode_i64(256).as_bytes(), &[0x82, 0x01, 0x00]);
        assert_eq!(encode_i64(-1).as_bytes(), &[0x7e, 0xfe]);
        assert_eq!(encode_i64(-256).as_bytes(), &[0x7d, 0xfe, 0xff]);
    }

    #[test]
    fn test_encode_long_magnitude() {
        // 16 bytes of magnitude needs the two byte header
        let n = BigInt::parse_bytes(b"ffffffffffffffffffffffffffffffff", 16).unwrap();
        let encoded = encode_integer(&n);
        assert_eq!(&encoded[..2], &[0x90, 0x10]);
        assert_eq!(encoded.len(), 18);

        let negative = encode_integer(&-n);
        assert_eq!(&negative[..2], &[0x6f, 0xef]);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_integer(b"007").unwrap(), BigInt::from(7));
        assert_eq!(parse_integer(b"+12").unwrap(), BigInt::from(12));
        assert_eq!(parse_integer(b" -0 ").unwrap(), BigInt::from(0));
        assert!(parse_integer(b"").is_err());
        assert!(parse_integer(b"-").is_err());
        assert!(parse_integer(b"12a").is_err());
        assert!(parse_integer(b"1 2").is_err());
    }

    #[test]
    fn test_strict_syntax() {
        assert!(is_strict_integer(b"0"));
        assert!(is_strict_integer(b"-15"));
        assert!(is_strict_integer(b"123456789012345678901234567890"));
        assert!(!is_strict_integer(b"007"));
        assert!(!is_strict_integer(b"+12"));
        assert!(!is_strict_integer(b"-0"));
        assert!(!is_strict_integer(b""));
    }

    #[test]
    fn test_large_values_order() {
        let big = BigInt::parse_bytes(b"123456789012345678901234567890123456789", 10).unwrap();
        let bigger = &big + BigInt::from(1);
        assert!(encode_integer(&big) < encode_integer(&bigger));
        assert!(encode_integer(&-&bigger) < encode_integer(&-&big));
        assert!(encode_integer(&-&big) < encode_i64(i64::MIN));
        assert!(encode_i64(i64::MAX) < encode_integer(&big));
    }

    proptest! {
        #[test]
        fn prop_encoding_preserves_order(a in any::<i64>(), b in any::<i64>()) {
            let (ea, eb) = (encode_i64(a), encode_i64(b));
            prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
        }

        #[test]
        fn prop_wide_encoding_preserves_order(a in any::<i128>(), b in any::<i128>()) {
            let ea = encode_integer(&BigInt::from(a));
            let eb = encode_integer(&BigInt::from(b));
            prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
        }
    }
}
