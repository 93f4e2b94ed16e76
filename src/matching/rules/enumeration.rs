//! Ordering by position in an enumeration

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use crate::matching::Normalizer;
use crate::normalizers::integer::encode_integer;
use crate::normalizers::strings::{prepare_str, prepare_string, CaseFolding, Trim};
use crate::schema::Schema;
use num_bigint::BigInt;

/// Maps each enumeration value to the encoded index of its declaration.
///
/// Values are compared case-insensitively; values outside the enumeration
/// are rejected.
#[derive(Debug, Clone)]
pub struct EnumerationOrderingNormalizer {
    values: Vec<String>,
}

impl EnumerationOrderingNormalizer {
    /// Create a normalizer for values in declaration order
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            values: values
                .into_iter()
                .map(|v| prepare_str(v.as_ref(), CaseFolding::Ignore, Trim::Both))
                .collect(),
        }
    }

    /// Prepared values in declaration order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Normalizer for EnumerationOrderingNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let prepared = prepare_string(value, CaseFolding::Ignore, Trim::Both)?;
        let position = self.values.iter().position(|v| *v == prepared).ok_or_else(|| {
            Error::Decode(
                DecodeError::new("value is not part of the enumeration")
                    .with_value(value)
                    .with_reason(format!("expected one of {}", self.values.join(", "))),
            )
        })?;
        Ok(encode_integer(&BigInt::from(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        let schema = Schema::empty();
        let normalizer = EnumerationOrderingNormalizer::new(["Monday", "Tuesday", "Wednesday"]);
        let monday = normalizer.normalize_attribute_value(&schema, b"monday").unwrap();
        let tuesday = normalizer.normalize_attribute_value(&schema, b"TUESDAY").unwrap();
        let wednesday = normalizer.normalize_attribute_value(&schema, b" Wednesday ").unwrap();
        assert!(monday < tuesday && tuesday < wednesday);
        assert!(normalizer.normalize_attribute_value(&schema, b"Sunday").is_err());
    }
}
