//! certificateExactMatch

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::Normalizer;
use crate::normalizers::certificate::{parse_gser_assertion, read_certificate_identity};
use crate::schema::Schema;

/// Serial number and issuer of a certificate.
///
/// Attribute values that cannot be read as a certificate are compared by
/// their raw bytes. Assertion values are GSER `CertificateExactAssertion`s
/// or complete certificates, again falling back to the raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateExactNormalizer;

impl Normalizer for CertificateExactNormalizer {
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(match read_certificate_identity(value) {
            Ok(identity) => identity.normalized(schema),
            Err(_) => ByteString::from(value),
        })
    }

    fn normalize_assertion_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        if let Ok(identity) = parse_gser_assertion(value) {
            return Ok(identity.normalized(schema));
        }
        self.normalize_attribute_value(schema, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizers::certificate::tests::certificate_bytes;

    #[test]
    fn test_gser_assertion_matches_certificate() {
        let schema = Schema::core();
        let normalizer = CertificateExactNormalizer;
        let value = normalizer
            .normalize_attribute_value(&schema, &certificate_bytes())
            .unwrap();
        let assertion = normalizer
            .normalize_assertion_value(
                &schema,
                br#"{ serialNumber 12345, issuer rdnSequence:"cn=test ca,o=example corp,c=us" }"#,
            )
            .unwrap();
        assert_eq!(value, assertion);

        let other = normalizer
            .normalize_assertion_value(
                &schema,
                br#"{ serialNumber 12346, issuer rdnSequence:"CN=Test CA,O=Example Corp,C=US" }"#,
            )
            .unwrap();
        assert_ne!(value, other);
    }

    #[test]
    fn test_truncated_certificate_compares_raw_bytes() {
        let schema = Schema::core();
        let normalizer = CertificateExactNormalizer;
        let truncated = &certificate_bytes()[..40];
        let value = normalizer.normalize_attribute_value(&schema, truncated).unwrap();
        assert_eq!(value.as_bytes(), truncated);
        assert_eq!(normalizer.normalize_assertion_value(&schema, truncated).unwrap(), value);
    }
}
