//! Normalizers of the string-valued syntaxes

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::Normalizer;
use crate::names;
use crate::normalizers::strings::{
    decode_utf8, first_component, normalize_bit_string, normalize_boolean, normalize_case_ignore_list,
    normalize_numeric_string, normalize_telephone_number, prepare_ia5, prepare_str, prepare_string, CaseFolding,
    Trim,
};
use crate::schema::Schema;

/// Directory String preparation with or without case folding
#[derive(Debug, Clone, Copy)]
pub struct DirectoryStringNormalizer {
    folding: CaseFolding,
}

impl DirectoryStringNormalizer {
    /// Create a normalizer
    pub fn new(folding: CaseFolding) -> Self {
        Self { folding }
    }
}

impl Normalizer for DirectoryStringNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(prepare_string(value, self.folding, Trim::Both)?.into())
    }

    fn normalize_substring_component(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(prepare_string(value, self.folding, Trim::None)?.into())
    }
}

/// IA5 String preparation with or without case folding
#[derive(Debug, Clone, Copy)]
pub struct Ia5StringNormalizer {
    folding: CaseFolding,
}

impl Ia5StringNormalizer {
    /// Create a normalizer
    pub fn new(folding: CaseFolding) -> Self {
        Self { folding }
    }
}

impl Normalizer for Ia5StringNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(prepare_ia5(value, self.folding, Trim::Both)?.into())
    }

    fn normalize_substring_component(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(prepare_ia5(value, self.folding, Trim::None)?.into())
    }
}

/// Digits only
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericStringNormalizer;

impl Normalizer for NumericStringNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_numeric_string(value)?.into())
    }
}

/// Telephone numbers without spaces and hyphens
#[derive(Debug, Clone, Copy, Default)]
pub struct TelephoneNumberNormalizer;

impl Normalizer for TelephoneNumberNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_telephone_number(value)?.into())
    }
}

/// `$`-separated case-insensitive lists
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseIgnoreListNormalizer;

impl Normalizer for CaseIgnoreListNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_case_ignore_list(value, Trim::Both)?.into())
    }

    fn normalize_substring_component(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_case_ignore_list(value, Trim::None)?.into())
    }
}

/// The identity
#[derive(Debug, Clone, Copy, Default)]
pub struct OctetStringNormalizer;

impl Normalizer for OctetStringNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(ByteString::from(value))
    }
}

/// `TRUE` or `FALSE`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanNormalizer;

impl Normalizer for BooleanNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_boolean(value)?.into())
    }
}

/// Bit strings of the form `'0101'B`
#[derive(Debug, Clone, Copy, Default)]
pub struct BitStringNormalizer;

impl Normalizer for BitStringNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_bit_string(value)?.into())
    }
}

/// Resolve a numeric OID or a schema element name to its numeric OID
fn normalize_oid(schema: &Schema, text: &str) -> String {
    let text = text.trim();
    if names::is_numeric_oid(text) {
        return text.to_string();
    }
    // Names the schema does not know compare by their lower-case form
    schema
        .oid_for_name(text)
        .map(str::to_string)
        .unwrap_or_else(|| names::to_lower_case(text))
}

/// Object identifiers, with names resolved through the schema
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdentifierNormalizer;

impl Normalizer for ObjectIdentifierNormalizer {
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_oid(schema, decode_utf8(value)?).into())
    }
}

/// The OID leading a schema description; assertions are plain OIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdentifierFirstComponentNormalizer;

impl Normalizer for ObjectIdentifierFirstComponentNormalizer {
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(normalize_oid(schema, &first_component(value)?).into())
    }

    fn normalize_assertion_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        ObjectIdentifierNormalizer.normalize_attribute_value(schema, value)
    }
}

/// The string leading a sequence; assertions are plain strings
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryStringFirstComponentNormalizer;

impl Normalizer for DirectoryStringFirstComponentNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let component = first_component(value)?;
        Ok(prepare_str(&component, CaseFolding::Ignore, Trim::Both).into())
    }

    fn normalize_assertion_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(prepare_string(value, CaseFolding::Ignore, Trim::Both)?.into())
    }
}
