//! Integer normalizers

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::Normalizer;
use crate::normalizers::integer::normalize_integer;
use crate::normalizers::strings::first_component;
use crate::schema::Schema;

/// Order-preserving integer encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerNormalizer;

impl Normalizer for IntegerNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_integer(value)
    }
}

/// The integer leading a schema description; assertions are plain integers
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerFirstComponentNormalizer;

impl Normalizer for IntegerFirstComponentNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_integer(first_component(value)?.as_bytes())
    }

    fn normalize_assertion_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_integer(value)
    }
}
