//! Schema and indexing options
//!
//! [`SchemaOptions`] travel with every schema snapshot and influence syntax
//! checking and default bindings. [`IndexingOptions`] are supplied by the
//! storage layer through its index query factory.

use crate::error::{Error, Result};
use crate::schema::constants::{EMR_OCTET_STRING_OID, SYNTAX_OCTET_STRING_OID};
use serde::{Deserialize, Serialize};

/// Default number of bytes in a substring index key
pub const DEFAULT_SUBSTRING_KEY_SIZE: usize = 6;

/// Options controlling schema validation and default bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Syntax used for attribute types with no syntax of their own
    pub default_syntax_oid: String,

    /// Matching rule used where no other rule can be bound
    pub default_matching_rule_oid: String,

    /// Accept names that are not RFC 4512 keystrings (e.g. containing '_')
    pub allow_malformed_names_and_options: bool,

    /// Accept empty Directory String values
    pub allow_zero_length_directory_strings: bool,

    /// Accept telephone numbers that are not in E.123 international form
    pub allow_non_standard_telephone_numbers: bool,

    /// Accept certificate values that are not well-formed DER
    pub allow_malformed_certificates: bool,

    /// Require country strings to be upper-case ISO 3166 codes
    pub strict_format_for_country_strings: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            default_syntax_oid: SYNTAX_OCTET_STRING_OID.to_string(),
            default_matching_rule_oid: EMR_OCTET_STRING_OID.to_string(),
            allow_malformed_names_and_options: true,
            allow_zero_length_directory_strings: false,
            allow_non_standard_telephone_numbers: true,
            allow_malformed_certificates: false,
            strict_format_for_country_strings: true,
        }
    }
}

impl SchemaOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict options (every lenient check disabled)
    pub fn strict() -> Self {
        Self {
            allow_malformed_names_and_options: false,
            allow_zero_length_directory_strings: false,
            allow_non_standard_telephone_numbers: false,
            allow_malformed_certificates: false,
            strict_format_for_country_strings: true,
            ..Self::default()
        }
    }

    /// Set the default syntax OID
    pub fn with_default_syntax_oid(mut self, oid: impl Into<String>) -> Self {
        self.default_syntax_oid = oid.into();
        self
    }

    /// Set the default matching rule OID
    pub fn with_default_matching_rule_oid(mut self, oid: impl Into<String>) -> Self {
        self.default_matching_rule_oid = oid.into();
        self
    }

    /// Allow or reject malformed element names
    pub fn with_allow_malformed_names_and_options(mut self, allow: bool) -> Self {
        self.allow_malformed_names_and_options = allow;
        self
    }

    /// Allow or reject empty directory strings
    pub fn with_allow_zero_length_directory_strings(mut self, allow: bool) -> Self {
        self.allow_zero_length_directory_strings = allow;
        self
    }

    /// Allow or reject non-standard telephone numbers
    pub fn with_allow_non_standard_telephone_numbers(mut self, allow: bool) -> Self {
        self.allow_non_standard_telephone_numbers = allow;
        self
    }

    /// Allow or reject malformed certificates
    pub fn with_allow_malformed_certificates(mut self, allow: bool) -> Self {
        self.allow_malformed_certificates = allow;
        self
    }

    /// Enable or disable strict country string checking
    pub fn with_strict_format_for_country_strings(mut self, strict: bool) -> Self {
        self.strict_format_for_country_strings = strict;
        self
    }

    /// Load options from a JSON document, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        if options.default_syntax_oid.is_empty() || options.default_matching_rule_oid.is_empty() {
            return Err(Error::InvalidArgument(
                "default syntax and matching rule OIDs must not be empty".to_string(),
            ));
        }
        Ok(options)
    }
}

/// Options supplied by the storage layer when indexes are built or queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingOptions {
    /// Length in bytes of the keys emitted by substring indexers
    pub substring_key_size: usize,
}

impl Default for IndexingOptions {
    fn default() -> Self {
        Self {
            substring_key_size: DEFAULT_SUBSTRING_KEY_SIZE,
        }
    }
}

impl IndexingOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the substring key size, which must be at least one
    pub fn with_substring_key_size(mut self, size: usize) -> Result<Self> {
        self.substring_key_size = size;
        self.check()?;
        Ok(self)
    }

    /// Check that the options are usable
    pub fn check(&self) -> Result<()> {
        if self.substring_key_size == 0 {
            Err(Error::InvalidArgument(
                "substring key size must be at least 1".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// Load options from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.check()?;
        Ok(options)
    }
}
