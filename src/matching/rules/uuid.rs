//! UUID normalizer

use crate::bytes::ByteString;
use crate::error::{Error, Result};
use crate::matching::Normalizer;
use crate::normalizers::strings::decode_utf8;
use crate::schema::Schema;
use once_cell::sync::Lazy;
use regex::Regex;

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid UUID pattern")
});

/// Returns true if the value is an RFC 4122 UUID string
pub fn is_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Lower-case RFC 4122 string form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNormalizer;

impl Normalizer for UuidNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let text = decode_utf8(value)?;
        if !is_uuid(text) {
            return Err(Error::decode("invalid UUID", value));
        }
        Ok(text.to_ascii_lowercase().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_normalization() {
        let schema = Schema::empty();
        assert_eq!(
            UuidNormalizer
                .normalize_attribute_value(&schema, b"12345678-9ABC-DEF0-1234-1234567890AB")
                .unwrap(),
            ByteString::from("12345678-9abc-def0-1234-1234567890ab")
        );
        assert!(UuidNormalizer
            .normalize_attribute_value(&schema, b"12345678-9ABC-DEF0-1234")
            .is_err());
        assert!(UuidNormalizer
            .normalize_attribute_value(&schema, b"12345678+9ABC-DEF0-1234-1234567890AB")
            .is_err());
    }
}
