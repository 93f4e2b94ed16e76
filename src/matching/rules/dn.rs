//! Distinguished name normalizers

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::Normalizer;
use crate::normalizers::dn::normalize_dn;
use crate::normalizers::strings::normalize_bit_string;
use crate::schema::Schema;

/// Canonical DN bytes, each value normalized by its attribute's equality rule
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinguishedNameNormalizer;

impl Normalizer for DistinguishedNameNormalizer {
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_dn(schema, value)
    }
}

/// Name And Optional UID: `<dn>[#'<bits>'B]`
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueMemberNormalizer;

fn split_optional_uid(value: &[u8]) -> (&[u8], Option<&[u8]>) {
    let trimmed_len = value.len() - value.iter().rev().take_while(|b| **b == b' ').count();
    let trimmed = &value[..trimmed_len];
    if trimmed.ends_with(b"'B") {
        if let Some(hash) = trimmed.windows(2).rposition(|w| w == b"#'") {
            return (&value[..hash], Some(&trimmed[hash + 1..]));
        }
    }
    (value, None)
}

impl Normalizer for UniqueMemberNormalizer {
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let (dn, uid) = split_optional_uid(value);
        let mut out = normalize_dn(schema, dn)?.into_vec();
        if let Some(uid) = uid {
            out.push(b'#');
            out.extend_from_slice(normalize_bit_string(uid)?.as_bytes());
        }
        Ok(ByteString::from_vec(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_member_with_uid() {
        let schema = Schema::core();
        let normalizer = UniqueMemberNormalizer;
        let with_uid = normalizer
            .normalize_attribute_value(&schema, b"CN=Test,DC=Example#'0101'B")
            .unwrap();
        assert_eq!(
            with_uid,
            normalizer
                .normalize_attribute_value(&schema, b"cn=test,dc=example#'0101'B")
                .unwrap()
        );
        let without_uid = normalizer.normalize_attribute_value(&schema, b"cn=test,dc=example").unwrap();
        assert_ne!(with_uid, without_uid);
        assert!(with_uid.starts_with(&without_uid));
    }

    #[test]
    fn test_unique_member_hash_in_value() {
        assert_eq!(split_optional_uid(b"cn=a\\#b"), (&b"cn=a\\#b"[..], None));
        assert_eq!(
            split_optional_uid(b"cn=a#'1'B"),
            (&b"cn=a"[..], Some(&b"'1'B"[..]))
        );
    }

    #[test]
    fn test_invalid_dn_is_decode_error() {
        let schema = Schema::core();
        assert!(DistinguishedNameNormalizer
            .normalize_attribute_value(&schema, b"not a dn")
            .unwrap_err()
            .is_decode());
    }
}
