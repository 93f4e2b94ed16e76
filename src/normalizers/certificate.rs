//! X.509 certificate identity for `certificateExactMatch`
//!
//! Only the serial number and the issuer name are read from the DER
//! encoding. Assertion values use the GSER form
//! `{ serialNumber 12345, issuer rdnSequence:"CN=Test CA,O=Example,C=US" }`.

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use crate::normalizers::dn::{Ava, Dn, Rdn};
use crate::normalizers::integer::encode_integer;
use crate::schema::Schema;
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use regex::Regex;

const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OID: u8 = 0x06;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;
const TAG_VERSION: u8 = 0xa0;

static GSER_ASSERTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\{\s*serialNumber\s+(-?[0-9]+|'[0-9A-Fa-f]*'H)\s*,\s*issuer\s+rdnSequence\s*:\s*"((?:[^"]|"")*)"\s*\}$"#,
    )
    .unwrap()
});

/// The fields of a certificate that identify it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateIdentity {
    /// Serial number
    pub serial_number: BigInt,
    /// Issuer name
    pub issuer: Dn,
}

fn der_error(reason: impl Into<String>) -> Error {
    Error::Decode(DecodeError::new("invalid DER certificate").with_reason(reason))
}

struct DerReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek_tag(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn byte(&mut self) -> Result<u8> {
        let b = self
            .bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| der_error("unexpected end of data"))?;
        self.pos += 1;
        Ok(b)
    }

    fn length(&mut self) -> Result<usize> {
        let first = self.byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }
        let count = (first & 0x7f) as usize;
        if count == 0 || count > 4 {
            return Err(der_error("unsupported length encoding"));
        }
        let mut length = 0usize;
        for _ in 0..count {
            length = (length << 8) | self.byte()? as usize;
        }
        Ok(length)
    }

    // Reads one TLV and returns its tag and content
    fn read(&mut self) -> Result<(u8, &'a [u8])> {
        let tag = self.byte()?;
        let length = self.length()?;
        let end = self
            .pos
            .checked_add(length)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| der_error("truncated element"))?;
        let content = &self.bytes[self.pos..end];
        self.pos = end;
        Ok((tag, content))
    }

    fn expect(&mut self, expected: u8) -> Result<&'a [u8]> {
        let (tag, content) = self.read()?;
        if tag != expected {
            return Err(der_error(format!(
                "expected tag 0x{:02x}, found 0x{:02x}",
                expected, tag
            )));
        }
        Ok(content)
    }
}

fn decode_oid(content: &[u8]) -> Result<String> {
    let (&first, rest) = content
        .split_first()
        .ok_or_else(|| der_error("empty object identifier"))?;
    let mut arcs = vec![u64::from(first / 40).min(2), 0];
    arcs[1] = u64::from(first) - arcs[0] * 40;
    let mut value: u64 = 0;
    for &b in rest {
        value = value
            .checked_mul(128)
            .ok_or_else(|| der_error("object identifier arc too large"))?
            | u64::from(b & 0x7f);
        if b & 0x80 == 0 {
            arcs.push(value);
            value = 0;
        }
    }
    Ok(arcs
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("."))
}

fn decode_directory_string(tag: u8, content: &[u8]) -> Vec<u8> {
    match tag {
        // BMPString
        0x1e => {
            let units: Vec<u16> = content
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units).into_bytes()
        }
        _ => content.to_vec(),
    }
}

fn decode_name(content: &[u8]) -> Result<Dn> {
    let mut rdns = Vec::new();
    let mut reader = DerReader::new(content);
    while !reader.is_empty() {
        let set = reader.expect(TAG_SET)?;
        let mut avas = Vec::new();
        let mut set_reader = DerReader::new(set);
        while !set_reader.is_empty() {
            let mut pair = DerReader::new(set_reader.expect(TAG_SEQUENCE)?);
            let attribute_type = decode_oid(pair.expect(TAG_OID)?)?;
            let (tag, value) = pair.read()?;
            avas.push(Ava {
                attribute_type,
                value: decode_directory_string(tag, value),
            });
        }
        rdns.push(Rdn::new(avas).map_err(|_| der_error("empty relative distinguished name"))?);
    }
    // DER names list the root first
    rdns.reverse();
    Ok(Dn::from_rdns(rdns))
}

/// Read the serial number and issuer from a DER certificate.
///
/// Only the leading fields of the TBS certificate are examined, and bytes
/// after the issuer are not checked.
pub fn read_certificate_identity(der: &[u8]) -> Result<CertificateIdentity> {
    let mut outer = DerReader::new(der);
    let mut certificate = DerReader::new(outer.expect(TAG_SEQUENCE)?);
    let mut tbs = DerReader::new(certificate.expect(TAG_SEQUENCE)?);
    if tbs.peek_tag() == Some(TAG_VERSION) {
        tbs.read()?;
    }
    let serial = tbs.expect(TAG_INTEGER)?;
    if serial.is_empty() {
        return Err(der_error("empty serial number"));
    }
    tbs.expect(TAG_SEQUENCE)?;
    let issuer = decode_name(tbs.expect(TAG_SEQUENCE)?)?;
    Ok(CertificateIdentity {
        serial_number: BigInt::from_signed_bytes_be(serial),
        issuer,
    })
}

/// Check that a value is a complete DER certificate
pub fn is_well_formed_certificate(der: &[u8]) -> bool {
    fn check(der: &[u8]) -> Result<()> {
        let mut outer = DerReader::new(der);
        let mut certificate = DerReader::new(outer.expect(TAG_SEQUENCE)?);
        if !outer.is_empty() {
            return Err(der_error("trailing data"));
        }
        // tbsCertificate, signatureAlgorithm, signatureValue
        let mut tbs = DerReader::new(certificate.expect(TAG_SEQUENCE)?);
        certificate.expect(TAG_SEQUENCE)?;
        certificate.expect(TAG_BIT_STRING)?;
        if !certificate.is_empty() {
            return Err(der_error("trailing data in certificate"));
        }
        if tbs.peek_tag() == Some(TAG_VERSION) {
            tbs.read()?;
        }
        tbs.expect(TAG_INTEGER)?;
        for _ in 0..5 {
            // signature, issuer, validity, subject, subjectPublicKeyInfo
            tbs.expect(TAG_SEQUENCE)?;
        }
        while !tbs.is_empty() {
            tbs.read()?;
        }
        read_certificate_identity(der).map(|_| ())
    }
    check(der).is_ok()
}

/// Parse a GSER `CertificateExactAssertion`
pub fn parse_gser_assertion(value: &[u8]) -> Result<CertificateIdentity> {
    let invalid = |reason: &str| {
        Error::Decode(
            DecodeError::new("invalid certificate exact assertion")
                .with_value(value)
                .with_reason(reason),
        )
    };
    let text = std::str::from_utf8(value).map_err(|_| invalid("not UTF-8"))?;
    let captures = GSER_ASSERTION
        .captures(text.trim())
        .ok_or_else(|| invalid("expected { serialNumber <n>, issuer rdnSequence:\"<dn>\" }"))?;

    let serial_text = &captures[1];
    let serial_number = if let Some(hex) = serial_text.strip_prefix('\'') {
        let hex = hex.trim_end_matches("'H");
        if hex.is_empty() {
            BigInt::from(0)
        } else {
            BigInt::parse_bytes(hex.as_bytes(), 16).ok_or_else(|| invalid("invalid hex serial"))?
        }
    } else {
        serial_text
            .parse::<BigInt>()
            .map_err(|_| invalid("invalid serial number"))?
    };
    let issuer = Dn::parse(captures[2].replace("\"\"", "\"").as_bytes())?;
    Ok(CertificateIdentity {
        serial_number,
        issuer,
    })
}

impl CertificateIdentity {
    /// Canonical bytes: the order-preserving serial encoding followed by the
    /// normalized issuer
    pub fn normalized(&self, schema: &Schema) -> ByteString {
        let mut out = encode_integer(&self.serial_number).into_vec();
        out.extend_from_slice(&self.issuer.normalized(schema));
        ByteString::from_vec(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::Engine;

    /// Self-signed certificate, serial 12345, issuer CN=Test CA,O=Example Corp,C=US
    pub(crate) const TEST_CERTIFICATE: &str = "MIIBrzCCAVWgAwIBAgICMDkwCgYIKoZIzj0EAwIwNjELMAkGA1UEBhMCVVMxFTATBgNVBAoMDEV4YW1wbGUgQ29ycDEQMA4GA1UEAwwHVGVzdCBDQTAeFw0yNjEwMTgxMzM3NThaFw0zNjEwMTUxMzM3NThaMDYxCzAJBgNVBAYTAlVTMRUwEwYDVQQKDAxFeGFtcGxlIENvcnAxEDAOBgNVBAMMB1Rlc3QgQ0EwWTATBgcqhkjOPQIBBggqhkjOPQMBBwNCAATCpRzdeMJFu2cn//18hOhRQldCtH658SOQqimwQuTui2P/V64PBiaNVwxp8Rro94QcHCnrYhq3BI5ewVWVUUq6o1MwUTAdBgNVHQ4EFgQUVtJkBL5aZUH8Iy7daaYPd7/n8IMwHwYDVR0jBBgwFoAUVtJkBL5aZUH8Iy7daaYPd7/n8IMwDwYDVR0TAQH/BAUwAwEB/zAKBggqhkjOPQQDAgNIADBFAiBdcNuUVg9bGKuncz5aMJ1LUxGkzu/R0lWtV3DjouVlegIhAJ3Ed39PVs8/Si8gEz9YRZxABGzY2JmPXid3kGU6uUsS";

    pub(crate) fn certificate_bytes() -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(TEST_CERTIFICATE)
            .unwrap()
    }

    #[test]
    fn test_read_identity() {
        let identity = read_certificate_identity(&certificate_bytes()).unwrap();
        assert_eq!(identity.serial_number, BigInt::from(12345));
        assert_eq!(identity.issuer.to_string(), "2.5.4.3=Test CA,2.5.4.10=Example Corp,2.5.4.6=US");
    }

    #[test]
    fn test_well_formed() {
        let der = certificate_bytes();
        assert!(is_well_formed_certificate(&der));
        assert!(!is_well_formed_certificate(&der[..200]));
        assert!(!is_well_formed_certificate(b"not a certificate"));
    }

    #[test]
    fn test_truncated_certificate_rejected() {
        let der = certificate_bytes();
        assert!(read_certificate_identity(&der[..100]).is_err());
    }

    #[test]
    fn test_gser_assertion() {
        let identity = parse_gser_assertion(
            br#"{ serialNumber 12345, issuer rdnSequence:"CN=Test CA,O=Example Corp,C=US" }"#,
        )
        .unwrap();
        assert_eq!(identity.serial_number, BigInt::from(12345));
        assert_eq!(identity.issuer.size(), 3);

        let hex = parse_gser_assertion(br#"{serialNumber '3039'H,issuer rdnSequence:"cn=x"}"#).unwrap();
        assert_eq!(hex.serial_number, BigInt::from(12345));

        assert!(parse_gser_assertion(b"{ serialNumber 1 }").is_err());
        assert!(parse_gser_assertion(br#"{ serialNumber x, issuer rdnSequence:"cn=x" }"#).is_err());
    }

    #[test]
    fn test_decode_oid() {
        assert_eq!(decode_oid(&[0x55, 0x04, 0x03]).unwrap(), "2.5.4.3");
        assert_eq!(
            decode_oid(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b]).unwrap(),
            "1.2.840.113549.1.1.11"
        );
    }
}
