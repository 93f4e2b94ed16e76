//! Distinguished names
//!
//! Parses RFC 4514 string representations and produces the canonical byte
//! form used by `distinguishedNameMatch`. In the canonical form RDNs are
//! ordered from the root down and separated by `0x00`; the attribute value
//! assertions of a multi-valued RDN are sorted and separated by `0x01`.
//! Those bytes, and the escape byte `0x02`, are escaped inside values.

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use crate::names;
use crate::schema::{OidSchemaElement, Schema};
use std::fmt;

const RDN_SEPARATOR: u8 = 0x00;
const AVA_SEPARATOR: u8 = 0x01;
const ESCAPE: u8 = 0x02;

/// One `type=value` pair of an RDN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ava {
    /// Attribute type name or numeric OID as written
    pub attribute_type: String,
    /// Unescaped attribute value
    pub value: Vec<u8>,
}

/// A relative distinguished name: one or more AVAs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rdn {
    avas: Vec<Ava>,
}

/// A parsed distinguished name, leaf RDN first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dn {
    rdns: Vec<Rdn>,
}

fn dn_error(value: &[u8], reason: impl Into<String>) -> Error {
    Error::Decode(
        DecodeError::new("invalid distinguished name")
            .with_value(value)
            .with_reason(reason),
    )
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        dn_error(self.input, format!("{} at position {}", reason.into(), self.pos))
    }

    fn parse_dn(&mut self) -> Result<Dn> {
        let mut rdns = Vec::new();
        self.skip_spaces();
        if self.peek().is_none() {
            return Ok(Dn { rdns });
        }
        loop {
            rdns.push(self.parse_rdn()?);
            match self.peek() {
                None => return Ok(Dn { rdns }),
                Some(b',' | b';') => self.pos += 1,
                Some(c) => return Err(self.error(format!("unexpected character '{}'", c as char))),
            }
        }
    }

    fn parse_rdn(&mut self) -> Result<Rdn> {
        let mut avas = vec![self.parse_ava()?];
        while self.peek() == Some(b'+') {
            self.pos += 1;
            avas.push(self.parse_ava()?);
        }
        Ok(Rdn { avas })
    }

    fn parse_ava(&mut self) -> Result<Ava> {
        self.skip_spaces();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'=' || c == b' ' {
                break;
            }
            self.pos += 1;
        }
        let raw_type = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("attribute type is not valid UTF-8"))?;
        let attribute_type = raw_type
            .strip_prefix("oid.")
            .or_else(|| raw_type.strip_prefix("OID."))
            .unwrap_or(raw_type)
            .to_string();
        if !names::is_valid_oid(&attribute_type, true) {
            return Err(self.error(format!("invalid attribute type '{}'", attribute_type)));
        }
        self.skip_spaces();
        if self.peek() != Some(b'=') {
            return Err(self.error("expected '='"));
        }
        self.pos += 1;
        self.skip_spaces();
        let value = self.parse_value()?;
        Ok(Ava {
            attribute_type,
            value,
        })
    }

    fn parse_value(&mut self) -> Result<Vec<u8>> {
        match self.peek() {
            Some(b'#') => {
                self.pos += 1;
                self.parse_hex_value()
            }
            Some(b'"') => {
                self.pos += 1;
                self.parse_quoted_value()
            }
            _ => self.parse_string_value(),
        }
    }

    fn parse_hex_value(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        while let (Some(hi), Some(lo)) = (
            self.peek().and_then(hex_value),
            self.input.get(self.pos + 1).copied().and_then(hex_value),
        ) {
            bytes.push(hi << 4 | lo);
            self.pos += 2;
        }
        if bytes.is_empty() {
            return Err(self.error("empty or odd-length hex value"));
        }
        self.skip_spaces();
        Ok(decode_ber_string(bytes))
    }

    fn parse_quoted_value(&mut self) -> Result<Vec<u8>> {
        let mut value = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated quoted value")),
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => value.push(self.parse_escape()?),
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
        self.skip_spaces();
        Ok(value)
    }

    fn parse_string_value(&mut self) -> Result<Vec<u8>> {
        let mut value = Vec::new();
        // Length of the value up to its last escaped or non-space byte
        let mut significant = 0;
        while let Some(c) = self.peek() {
            match c {
                b',' | b';' | b'+' => break,
                b'\\' => {
                    value.push(self.parse_escape()?);
                    significant = value.len();
                }
                _ => {
                    value.push(c);
                    self.pos += 1;
                    if c != b' ' {
                        significant = value.len();
                    }
                }
            }
        }
        value.truncate(significant);
        Ok(value)
    }

    fn parse_escape(&mut self) -> Result<u8> {
        self.pos += 1;
        let c = self.peek().ok_or_else(|| self.error("dangling escape"))?;
        if let Some(hi) = hex_value(c) {
            let lo = self
                .input
                .get(self.pos + 1)
                .copied()
                .and_then(hex_value)
                .ok_or_else(|| self.error("invalid hex escape"))?;
            self.pos += 2;
            Ok(hi << 4 | lo)
        } else {
            self.pos += 1;
            Ok(c)
        }
    }
}

// Extracts the content of a BER encoded string type, otherwise keeps the bytes
fn decode_ber_string(bytes: Vec<u8>) -> Vec<u8> {
    const STRING_TAGS: [u8; 7] = [0x04, 0x0c, 0x13, 0x14, 0x16, 0x1a, 0x1c];
    if bytes.len() >= 2 && STRING_TAGS.contains(&bytes[0]) && bytes[1] < 0x80 {
        let length = bytes[1] as usize;
        if bytes.len() == length + 2 {
            return bytes[2..].to_vec();
        }
    }
    bytes
}

fn push_escaped(out: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        if b == RDN_SEPARATOR || b == AVA_SEPARATOR || b == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(b);
    }
}

impl Ava {
    /// Canonical bytes of this AVA: the attribute type OID and the value
    /// normalized by that attribute's equality matching rule
    pub fn normalized(&self, schema: &Schema) -> ByteString {
        let (key, rule) = match schema.lookup_attribute_type(&self.attribute_type) {
            Some(attribute_type) => (
                attribute_type.oid().to_string(),
                attribute_type.equality_matching_rule().clone(),
            ),
            None => (
                names::to_lower_case(&self.attribute_type),
                schema.default_matching_rule().clone(),
            ),
        };
        // Values the rule rejects are compared by their raw bytes
        let value = rule
            .normalize_attribute_value(schema, &self.value)
            .map(ByteString::into_vec)
            .unwrap_or_else(|_| self.value.clone());

        let mut out = Vec::with_capacity(key.len() + value.len() + 1);
        out.extend_from_slice(key.as_bytes());
        out.push(b'=');
        push_escaped(&mut out, &value);
        ByteString::from_vec(out)
    }
}

impl Rdn {
    /// Create an RDN from its AVAs
    pub fn new(avas: Vec<Ava>) -> Result<Self> {
        if avas.is_empty() {
            return Err(Error::InvalidArgument("an RDN needs at least one AVA".to_string()));
        }
        Ok(Self { avas })
    }

    /// The AVAs in the order written
    pub fn avas(&self) -> &[Ava] {
        &self.avas
    }

    /// Returns true if this RDN has more than one AVA
    pub fn is_multi_valued(&self) -> bool {
        self.avas.len() > 1
    }

    /// Canonical bytes of this RDN with its AVAs sorted
    pub fn normalized(&self, schema: &Schema) -> ByteString {
        let mut avas: Vec<ByteString> = self.avas.iter().map(|a| a.normalized(schema)).collect();
        avas.sort();
        avas.dedup();
        let mut out = Vec::new();
        for (i, ava) in avas.iter().enumerate() {
            if i > 0 {
                out.push(AVA_SEPARATOR);
            }
            out.extend_from_slice(ava);
        }
        ByteString::from_vec(out)
    }
}

impl Dn {
    /// Parse an RFC 4514 distinguished name
    pub fn parse(value: &[u8]) -> Result<Self> {
        Parser {
            input: value,
            pos: 0,
        }
        .parse_dn()
    }

    /// Create a DN from RDNs ordered leaf first
    pub fn from_rdns(rdns: Vec<Rdn>) -> Self {
        Self { rdns }
    }

    /// The root DN
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true for the root DN
    pub fn is_root(&self) -> bool {
        self.rdns.is_empty()
    }

    /// RDNs from the leaf up
    pub fn rdns(&self) -> &[Rdn] {
        &self.rdns
    }

    /// Number of RDNs
    pub fn size(&self) -> usize {
        self.rdns.len()
    }

    /// The parent DN, or `None` for the root
    pub fn parent(&self) -> Option<Dn> {
        if self.is_root() {
            None
        } else {
            Some(Dn {
                rdns: self.rdns[1..].to_vec(),
            })
        }
    }

    /// Canonical bytes used for equality matching, root RDN first
    pub fn normalized(&self, schema: &Schema) -> ByteString {
        let mut out = Vec::new();
        for (i, rdn) in self.rdns.iter().rev().enumerate() {
            if i > 0 {
                out.push(RDN_SEPARATOR);
            }
            out.extend_from_slice(&rdn.normalized(schema));
        }
        ByteString::from_vec(out)
    }
}

fn write_escaped_value(f: &mut fmt::Formatter<'_>, value: &[u8]) -> fmt::Result {
    let text = match std::str::from_utf8(value) {
        Ok(text) => text,
        Err(_) => {
            for b in value {
                write!(f, "\\{:02x}", b)?;
            }
            return Ok(());
        }
    };
    let last = text.len().saturating_sub(1);
    for (i, c) in text.char_indices() {
        let special = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=')
            || (i == 0 && (c == '#' || c == ' '))
            || (i == last && c == ' ');
        if special {
            write!(f, "\\{}", c)?;
        } else if c.is_control() {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                write!(f, "\\{:02x}", b)?;
            }
        } else {
            write!(f, "{}", c)?;
        }
    }
    Ok(())
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rdn) in self.rdns.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            for (j, ava) in rdn.avas.iter().enumerate() {
                if j > 0 {
                    write!(f, "+")?;
                }
                write!(f, "{}=", ava.attribute_type)?;
                write_escaped_value(f, &ava.value)?;
            }
        }
        Ok(())
    }
}

/// Parse and normalize a distinguished name
pub fn normalize_dn(schema: &Schema, value: &[u8]) -> Result<ByteString> {
    Ok(Dn::parse(value)?.normalized(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(dn: &str) -> ByteString {
        normalize_dn(&Schema::core(), dn.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let dn = Dn::parse(b"uid=jsmith, dc=example ,dc=net").unwrap();
        assert_eq!(dn.size(), 3);
        assert_eq!(dn.rdns()[0].avas()[0].attribute_type, "uid");
        assert_eq!(dn.rdns()[1].avas()[0].value, b"example");
        assert_eq!(dn.to_string(), "uid=jsmith,dc=example,dc=net");
        assert_eq!(dn.parent().unwrap().to_string(), "dc=example,dc=net");
    }

    #[test]
    fn test_parse_escapes() {
        let dn = Dn::parse(br"cn=Smith\, John\20,o=\23hash,cn=a\2Bb").unwrap();
        assert_eq!(dn.rdns()[0].avas()[0].value, b"Smith, John ");
        assert_eq!(dn.rdns()[1].avas()[0].value, b"#hash");
        assert_eq!(dn.rdns()[2].avas()[0].value, b"a+b");
        assert_eq!(dn.to_string(), r"cn=Smith\, John\ ,o=\#hash,cn=a\+b");
    }

    #[test]
    fn test_parse_hex_and_quoted() {
        let dn = Dn::parse(b"cn=#0403616263,o=\"a,b\"").unwrap();
        assert_eq!(dn.rdns()[0].avas()[0].value, b"abc");
        assert_eq!(dn.rdns()[1].avas()[0].value, b"a,b");
    }

    #[test]
    fn test_parse_errors() {
        for dn in ["cn", "cn=a,", "=a", "cn=a\\", "cn=#zz", "cn=\"abc", "c n=a"] {
            assert!(Dn::parse(dn.as_bytes()).is_err(), "{} should be rejected", dn);
        }
        assert!(Dn::parse(b"").unwrap().is_root());
        assert!(Dn::parse(b"  ").unwrap().is_root());
    }

    #[test]
    fn test_normalize_case() {
        assert_eq!(norm("UID=jsmith,DC=example,DC=net"), norm("uid=jsmith,dc=example,dc=net"));
        assert_eq!(norm("uid=jsmith,dc=example,dc=net"), norm("uid = JSmith , dc=Example,dc=NET"));
        assert_ne!(norm("uid=jsmith,dc=example,dc=net"), norm("uid=jsmith,dc=example,dc=com"));
    }

    #[test]
    fn test_normalize_multi_valued_rdn() {
        assert_eq!(
            norm("givenName=John+cn=Doe,dc=example,dc=net"),
            norm("cn=doe+givenname=john,dc=example,dc=net")
        );
        // a multi-valued RDN never equals two single-valued RDNs
        assert_ne!(norm("cn=doe+sn=john"), norm("cn=doe,sn=john"));
    }

    #[test]
    fn test_normalize_uses_oids_and_root_first() {
        let normalized = norm("cn=test,dc=example");
        let expected = b"0.9.2342.19200300.100.1.25=example\x002.5.4.3=test";
        assert_eq!(normalized.as_bytes(), &expected[..]);
        assert_eq!(norm("2.5.4.3=Test,dc=example"), normalized);
        assert_eq!(norm("commonName=TEST,DC=EXAMPLE"), normalized);
    }

    #[test]
    fn test_normalize_control_characters() {
        assert_eq!(norm("cn=John\\0dDoe"), norm("cn=john doe"));
    }

    #[test]
    fn test_normalize_is_stable() {
        let schema = Schema::core();
        for dn in ["CN=Doe+givenName=John,O=Acme\\, Inc.,C=US", "cn=\\23x,dc=net", ""] {
            let parsed = Dn::parse(dn.as_bytes()).unwrap();
            let reparsed = Dn::parse(parsed.to_string().as_bytes()).unwrap();
            assert_eq!(parsed.normalized(&schema), reparsed.normalized(&schema));
        }
    }

    #[test]
    fn test_escapes_separator_bytes() {
        let schema = Schema::core();
        let dn = Dn::parse(b"x-unknown=a\\00b").unwrap();
        assert_eq!(dn.normalized(&schema).as_bytes(), b"x-unknown=a\x02\x00b");
    }
}
