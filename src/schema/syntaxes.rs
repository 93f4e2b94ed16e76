//! LDAP syntaxes
//!
//! A [`Syntax`] decides whether a raw value is acceptable and names the
//! default matching rule of each kind for attribute types using it. The
//! behaviour lives behind the [`SyntaxImpl`] trait: the core syntaxes are a
//! static table of checks, and the extension syntaxes (`X-ENUM`, `X-PATTERN`,
//! `X-SUBST`) are built from a description's extension properties.

use crate::matching::rules::uuid::is_uuid;
use crate::matching::substring::parse_substring_filter;
use crate::names;
use crate::normalizers::certificate::{is_well_formed_certificate, parse_gser_assertion};
use crate::normalizers::dn::Dn;
use crate::normalizers::integer::is_strict_integer;
use crate::normalizers::strings::{first_component, normalize_bit_string, prepare_str, CaseFolding, Trim};
use crate::normalizers::time::GeneralizedTime;
use crate::schema::base::{ExtraProperties, SchemaElement};
use crate::schema::constants::*;
use crate::schema::Schema;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Behaviour of a syntax
pub trait SyntaxImpl: fmt::Debug + Send + Sync {
    /// Human readable name of the syntax
    fn name(&self) -> &str;

    /// Whether values are text
    fn is_human_readable(&self) -> bool {
        true
    }

    /// Returns true if `value` conforms to the syntax
    fn value_is_acceptable(&self, schema: &Schema, value: &[u8]) -> bool;

    /// Default equality matching rule (name or OID)
    fn equality_matching_rule(&self) -> Option<&str> {
        None
    }

    /// Default ordering matching rule (name or OID)
    fn ordering_matching_rule(&self) -> Option<&str> {
        None
    }

    /// Default substring matching rule (name or OID)
    fn substring_matching_rule(&self) -> Option<&str> {
        None
    }

    /// Default approximate matching rule (name or OID)
    fn approximate_matching_rule(&self) -> Option<&str> {
        None
    }
}

// ============================================================================
// Descriptions and elements
// ============================================================================

/// Parsed syntax description
#[derive(Debug, Clone, Default)]
pub struct SyntaxDescription {
    /// Numeric OID
    pub oid: String,
    /// Free-text description
    pub description: String,
    /// Extension properties
    pub extra_properties: ExtraProperties,
    /// Explicit behaviour; resolved from the extension properties or the
    /// core table when absent
    pub implementation: Option<Arc<dyn SyntaxImpl>>,
}

impl PartialEq for SyntaxDescription {
    fn eq(&self, other: &Self) -> bool {
        let same_impl = match (&self.implementation, &other.implementation) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.oid == other.oid
            && self.description == other.description
            && self.extra_properties == other.extra_properties
            && same_impl
    }
}

/// A validated syntax
#[derive(Debug, Clone)]
pub struct Syntax {
    pub(crate) definition: SyntaxDescription,
    pub(crate) implementation: Arc<dyn SyntaxImpl>,
    pub(crate) equality_oid: Option<String>,
    pub(crate) ordering_oid: Option<String>,
    pub(crate) substring_oid: Option<String>,
    pub(crate) approximate_oid: Option<String>,
}

impl Syntax {
    /// Numeric OID
    pub fn oid(&self) -> &str {
        &self.definition.oid
    }

    /// The description this syntax was built from
    pub fn definition(&self) -> &SyntaxDescription {
        &self.definition
    }

    /// Behaviour of the syntax
    pub fn implementation(&self) -> &Arc<dyn SyntaxImpl> {
        &self.implementation
    }

    /// Returns true if `value` conforms to the syntax
    pub fn value_is_acceptable(&self, schema: &Schema, value: &[u8]) -> bool {
        self.implementation.value_is_acceptable(schema, value)
    }

    /// Whether values are text
    pub fn is_human_readable(&self) -> bool {
        self.implementation.is_human_readable()
    }

    /// OID of the default equality matching rule
    pub fn equality_matching_rule_oid(&self) -> Option<&str> {
        self.equality_oid.as_deref()
    }

    /// OID of the default ordering matching rule
    pub fn ordering_matching_rule_oid(&self) -> Option<&str> {
        self.ordering_oid.as_deref()
    }

    /// OID of the default substring matching rule
    pub fn substring_matching_rule_oid(&self) -> Option<&str> {
        self.substring_oid.as_deref()
    }

    /// OID of the default approximate matching rule
    pub fn approximate_matching_rule_oid(&self) -> Option<&str> {
        self.approximate_oid.as_deref()
    }

    /// The syntax used when no other is available: octet strings
    pub(crate) fn fallback(oid: &str) -> Self {
        let implementation = core_syntax_implementation(SYNTAX_OCTET_STRING_OID)
            .unwrap_or_else(|| Arc::new(OpaqueSyntax));
        Self {
            definition: SyntaxDescription {
                oid: oid.to_string(),
                description: "Octet String".to_string(),
                ..Default::default()
            },
            implementation,
            equality_oid: Some(EMR_OCTET_STRING_OID.to_string()),
            ordering_oid: Some(OMR_OCTET_STRING_OID.to_string()),
            substring_oid: Some(SMR_OCTET_STRING_OID.to_string()),
            approximate_oid: None,
        }
    }
}

impl SchemaElement for Syntax {
    fn names(&self) -> &[String] {
        &[]
    }

    fn description(&self) -> &str {
        &self.definition.description
    }

    fn is_obsolete(&self) -> bool {
        false
    }

    fn extra_properties(&self) -> &ExtraProperties {
        &self.definition.extra_properties
    }
}

// ============================================================================
// Core syntaxes
// ============================================================================

type ValueCheck = fn(&Schema, &[u8]) -> bool;

/// A syntax of the core schema: a value check and default rules
#[derive(Debug, Clone)]
pub struct CoreSyntax {
    name: &'static str,
    human_readable: bool,
    check: ValueCheck,
    equality: Option<&'static str>,
    ordering: Option<&'static str>,
    substring: Option<&'static str>,
    approximate: Option<&'static str>,
}

impl CoreSyntax {
    fn new(name: &'static str, check: ValueCheck) -> Self {
        Self {
            name,
            human_readable: true,
            check,
            equality: None,
            ordering: None,
            substring: None,
            approximate: None,
        }
    }

    fn binary(mut self) -> Self {
        self.human_readable = false;
        self
    }

    fn rules(
        mut self,
        equality: Option<&'static str>,
        ordering: Option<&'static str>,
        substring: Option<&'static str>,
        approximate: Option<&'static str>,
    ) -> Self {
        self.equality = equality;
        self.ordering = ordering;
        self.substring = substring;
        self.approximate = approximate;
        self
    }
}

impl SyntaxImpl for CoreSyntax {
    fn name(&self) -> &str {
        self.name
    }

    fn is_human_readable(&self) -> bool {
        self.human_readable
    }

    fn value_is_acceptable(&self, schema: &Schema, value: &[u8]) -> bool {
        (self.check)(schema, value)
    }

    fn equality_matching_rule(&self) -> Option<&str> {
        self.equality
    }

    fn ordering_matching_rule(&self) -> Option<&str> {
        self.ordering
    }

    fn substring_matching_rule(&self) -> Option<&str> {
        self.substring
    }

    fn approximate_matching_rule(&self) -> Option<&str> {
        self.approximate
    }
}

/// Accepts everything; used when even the octet string syntax is missing
#[derive(Debug, Clone, Copy, Default)]
struct OpaqueSyntax;

impl SyntaxImpl for OpaqueSyntax {
    fn name(&self) -> &str {
        "Octet String"
    }

    fn is_human_readable(&self) -> bool {
        false
    }

    fn value_is_acceptable(&self, _schema: &Schema, _value: &[u8]) -> bool {
        true
    }
}

static E123_TELEPHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[0-9][0-9 -]*$").unwrap());

const PRINTABLE_EXTRA: &[u8] = b" '()+,-./:?=";

fn is_printable(value: &[u8]) -> bool {
    value
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || PRINTABLE_EXTRA.contains(b))
}

fn text(value: &[u8]) -> Option<&str> {
    std::str::from_utf8(value).ok()
}

fn accept_any(_schema: &Schema, _value: &[u8]) -> bool {
    true
}

fn check_directory_string(schema: &Schema, value: &[u8]) -> bool {
    text(value).is_some() && (!value.is_empty() || schema.options().allow_zero_length_directory_strings)
}

fn check_ia5_string(_schema: &Schema, value: &[u8]) -> bool {
    value.is_ascii()
}

fn check_printable_string(_schema: &Schema, value: &[u8]) -> bool {
    !value.is_empty() && is_printable(value)
}

fn check_numeric_string(_schema: &Schema, value: &[u8]) -> bool {
    !value.is_empty() && value.iter().all(|b| b.is_ascii_digit() || *b == b' ')
}

fn check_country_string(schema: &Schema, value: &[u8]) -> bool {
    if value.len() != 2 {
        return false;
    }
    if schema.options().strict_format_for_country_strings {
        value.iter().all(u8::is_ascii_uppercase)
    } else {
        is_printable(value)
    }
}

fn check_oid(schema: &Schema, value: &[u8]) -> bool {
    text(value).map_or(false, |s| {
        names::is_valid_oid(s.trim(), schema.options().allow_malformed_names_and_options)
    })
}

fn check_dn(_schema: &Schema, value: &[u8]) -> bool {
    Dn::parse(value).is_ok()
}

fn check_name_and_optional_uid(_schema: &Schema, value: &[u8]) -> bool {
    match value.windows(2).rposition(|w| w == b"#'") {
        Some(hash) if value.ends_with(b"'B") => {
            Dn::parse(&value[..hash]).is_ok() && normalize_bit_string(&value[hash + 1..]).is_ok()
        }
        _ => Dn::parse(value).is_ok(),
    }
}

fn check_boolean(_schema: &Schema, value: &[u8]) -> bool {
    value == b"TRUE" || value == b"FALSE"
}

fn check_bit_string(_schema: &Schema, value: &[u8]) -> bool {
    normalize_bit_string(value).is_ok()
}

fn check_integer(_schema: &Schema, value: &[u8]) -> bool {
    is_strict_integer(value)
}

fn check_generalized_time(_schema: &Schema, value: &[u8]) -> bool {
    GeneralizedTime::parse(value).is_ok()
}

fn check_utc_time(_schema: &Schema, value: &[u8]) -> bool {
    GeneralizedTime::parse_utc_time(value).is_ok()
}

fn check_telephone_number(schema: &Schema, value: &[u8]) -> bool {
    let Some(number) = text(value) else {
        return false;
    };
    if schema.options().allow_non_standard_telephone_numbers {
        number.chars().any(|c| !c.is_whitespace() && c != '-')
    } else {
        E123_TELEPHONE.is_match(number)
    }
}

fn check_postal_address(_schema: &Schema, value: &[u8]) -> bool {
    text(value).map_or(false, |s| s.split('$').all(|line| !line.trim().is_empty()))
}

fn check_uuid(_schema: &Schema, value: &[u8]) -> bool {
    text(value).map_or(false, is_uuid)
}

fn check_certificate(schema: &Schema, value: &[u8]) -> bool {
    schema.options().allow_malformed_certificates || is_well_formed_certificate(value)
}

fn check_substring_assertion(_schema: &Schema, value: &[u8]) -> bool {
    parse_substring_filter(value).is_ok()
}

fn check_certificate_exact_assertion(_schema: &Schema, value: &[u8]) -> bool {
    parse_gser_assertion(value).is_ok()
}

fn check_schema_description(_schema: &Schema, value: &[u8]) -> bool {
    first_component(value).is_ok()
}

fn check_dit_structure_rule_description(_schema: &Schema, value: &[u8]) -> bool {
    first_component(value).map_or(false, |id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

lazy_static! {
    /// Every syntax of the core schema, keyed by OID
    pub static ref CORE_SYNTAXES: IndexMap<&'static str, Arc<CoreSyntax>> = core_syntaxes()
        .into_iter()
        .map(|(oid, syntax)| (oid, Arc::new(syntax)))
        .collect();
}

/// The implementation registered for a core syntax OID
pub fn core_syntax_implementation(oid: &str) -> Option<Arc<dyn SyntaxImpl>> {
    CORE_SYNTAXES
        .get(oid)
        .map(|syntax| syntax.clone() as Arc<dyn SyntaxImpl>)
}

fn core_syntaxes() -> Vec<(&'static str, CoreSyntax)> {
    let ignore = (
        Some(EMR_CASE_IGNORE_OID),
        Some(OMR_CASE_IGNORE_OID),
        Some(SMR_CASE_IGNORE_OID),
        Some(AMR_DOUBLE_METAPHONE_OID),
    );
    let description = Some(EMR_OID_FIRST_COMPONENT_OID);
    vec![
        (
            SYNTAX_DIRECTORY_STRING_OID,
            CoreSyntax::new("Directory String", check_directory_string)
                .rules(ignore.0, ignore.1, ignore.2, ignore.3),
        ),
        (
            SYNTAX_IA5_STRING_OID,
            CoreSyntax::new("IA5 String", check_ia5_string).rules(
                Some(EMR_CASE_IGNORE_IA5_OID),
                None,
                Some(SMR_CASE_IGNORE_IA5_OID),
                Some(AMR_DOUBLE_METAPHONE_OID),
            ),
        ),
        (
            SYNTAX_PRINTABLE_STRING_OID,
            CoreSyntax::new("Printable String", check_printable_string)
                .rules(ignore.0, ignore.1, ignore.2, ignore.3),
        ),
        (
            SYNTAX_NUMERIC_STRING_OID,
            CoreSyntax::new("Numeric String", check_numeric_string).rules(
                Some(EMR_NUMERIC_STRING_OID),
                Some(OMR_NUMERIC_STRING_OID),
                Some(SMR_NUMERIC_STRING_OID),
                None,
            ),
        ),
        (
            SYNTAX_COUNTRY_STRING_OID,
            CoreSyntax::new("Country String", check_country_string)
                .rules(ignore.0, None, ignore.2, ignore.3),
        ),
        (
            SYNTAX_OCTET_STRING_OID,
            CoreSyntax::new("Octet String", accept_any).binary().rules(
                Some(EMR_OCTET_STRING_OID),
                Some(OMR_OCTET_STRING_OID),
                Some(SMR_OCTET_STRING_OID),
                None,
            ),
        ),
        (
            SYNTAX_BINARY_OID,
            CoreSyntax::new("Binary", accept_any)
                .binary()
                .rules(Some(EMR_OCTET_STRING_OID), None, None, None),
        ),
        (
            SYNTAX_JPEG_OID,
            CoreSyntax::new("JPEG", accept_any)
                .binary()
                .rules(Some(EMR_OCTET_STRING_OID), None, None, None),
        ),
        (
            SYNTAX_OID_OID,
            CoreSyntax::new("OID", check_oid).rules(Some(EMR_OID_OID), None, None, None),
        ),
        (
            SYNTAX_DN_OID,
            CoreSyntax::new("DN", check_dn).rules(Some(EMR_DN_OID), None, None, None),
        ),
        (
            SYNTAX_NAME_AND_OPTIONAL_UID_OID,
            CoreSyntax::new("Name And Optional UID", check_name_and_optional_uid)
                .rules(Some(EMR_UNIQUE_MEMBER_OID), None, None, None),
        ),
        (
            SYNTAX_BOOLEAN_OID,
            CoreSyntax::new("Boolean", check_boolean).rules(Some(EMR_BOOLEAN_OID), None, None, None),
        ),
        (
            SYNTAX_BIT_STRING_OID,
            CoreSyntax::new("Bit String", check_bit_string)
                .rules(Some(EMR_BIT_STRING_OID), None, None, None),
        ),
        (
            SYNTAX_INTEGER_OID,
            CoreSyntax::new("INTEGER", check_integer).rules(
                Some(EMR_INTEGER_OID),
                Some(OMR_INTEGER_OID),
                None,
                None,
            ),
        ),
        (
            SYNTAX_GENERALIZED_TIME_OID,
            CoreSyntax::new("Generalized Time", check_generalized_time).rules(
                Some(EMR_GENERALIZED_TIME_OID),
                Some(OMR_GENERALIZED_TIME_OID),
                None,
                None,
            ),
        ),
        (
            SYNTAX_UTC_TIME_OID,
            CoreSyntax::new("UTC Time", check_utc_time).rules(Some(EMR_UTC_TIME_OID), None, None, None),
        ),
        (
            SYNTAX_TELEPHONE_OID,
            CoreSyntax::new("Telephone Number", check_telephone_number).rules(
                Some(EMR_TELEPHONE_OID),
                None,
                Some(SMR_TELEPHONE_OID),
                None,
            ),
        ),
        (
            SYNTAX_POSTAL_ADDRESS_OID,
            CoreSyntax::new("Postal Address", check_postal_address).rules(
                Some(EMR_CASE_IGNORE_LIST_OID),
                None,
                Some(SMR_CASE_IGNORE_LIST_OID),
                None,
            ),
        ),
        (
            SYNTAX_UUID_OID,
            CoreSyntax::new("UUID", check_uuid).rules(Some(EMR_UUID_OID), Some(OMR_UUID_OID), None, None),
        ),
        (
            SYNTAX_CERTIFICATE_OID,
            CoreSyntax::new("Certificate", check_certificate)
                .binary()
                .rules(Some(EMR_CERTIFICATE_EXACT_OID), None, None, None),
        ),
        (
            SYNTAX_CERTLIST_OID,
            CoreSyntax::new("Certificate List", accept_any)
                .binary()
                .rules(Some(EMR_OCTET_STRING_OID), None, None, None),
        ),
        (
            SYNTAX_CERTPAIR_OID,
            CoreSyntax::new("Certificate Pair", accept_any)
                .binary()
                .rules(Some(EMR_OCTET_STRING_OID), None, None, None),
        ),
        (
            SYNTAX_CERTIFICATE_EXACT_ASSERTION_OID,
            CoreSyntax::new("Certificate Exact Assertion", check_certificate_exact_assertion)
                .rules(Some(EMR_CERTIFICATE_EXACT_OID), None, None, None),
        ),
        (
            SYNTAX_SUBSTRING_ASSERTION_OID,
            CoreSyntax::new("Substring Assertion", check_substring_assertion)
                .rules(ignore.0, None, ignore.2, None),
        ),
        (
            SYNTAX_ATTRIBUTE_TYPE_OID,
            CoreSyntax::new("Attribute Type Description", check_schema_description)
                .rules(description, None, None, None),
        ),
        (
            SYNTAX_OBJECTCLASS_OID,
            CoreSyntax::new("Object Class Description", check_schema_description)
                .rules(description, None, None, None),
        ),
        (
            SYNTAX_MATCHING_RULE_OID,
            CoreSyntax::new("Matching Rule Description", check_schema_description)
                .rules(description, None, None, None),
        ),
        (
            SYNTAX_MATCHING_RULE_USE_OID,
            CoreSyntax::new("Matching Rule Use Description", check_schema_description)
                .rules(description, None, None, None),
        ),
        (
            SYNTAX_NAME_FORM_OID,
            CoreSyntax::new("Name Form Description", check_schema_description)
                .rules(description, None, None, None),
        ),
        (
            SYNTAX_DIT_CONTENT_RULE_OID,
            CoreSyntax::new("DIT Content Rule Description", check_schema_description)
                .rules(description, None, None, None),
        ),
        (
            SYNTAX_DIT_STRUCTURE_RULE_OID,
            CoreSyntax::new("DIT Structure Rule Description", check_dit_structure_rule_description)
                .rules(Some(EMR_INTEGER_FIRST_COMPONENT_OID), None, None, None),
        ),
        (
            SYNTAX_LDAP_SYNTAX_OID,
            CoreSyntax::new("LDAP Syntax Description", check_schema_description)
                .rules(description, None, None, None),
        ),
    ]
}

// ============================================================================
// Extension syntaxes
// ============================================================================

/// Values from a fixed list (`X-ENUM`), ordered by declaration
#[derive(Debug, Clone)]
pub struct EnumerationSyntax {
    values: Vec<String>,
    ordering_rule_oid: String,
}

impl EnumerationSyntax {
    /// Create an enumeration of `values` whose ordering rule is `ordering_rule_oid`
    pub fn new(values: Vec<String>, ordering_rule_oid: impl Into<String>) -> Self {
        Self {
            values,
            ordering_rule_oid: ordering_rule_oid.into(),
        }
    }

    /// Values in declaration order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl SyntaxImpl for EnumerationSyntax {
    fn name(&self) -> &str {
        "Enumeration"
    }

    fn value_is_acceptable(&self, _schema: &Schema, value: &[u8]) -> bool {
        let Some(value) = text(value) else {
            return false;
        };
        let value = prepare_str(value, CaseFolding::Ignore, Trim::Both);
        self.values
            .iter()
            .any(|v| prepare_str(v, CaseFolding::Ignore, Trim::Both) == value)
    }

    fn equality_matching_rule(&self) -> Option<&str> {
        Some(EMR_CASE_IGNORE_OID)
    }

    fn ordering_matching_rule(&self) -> Option<&str> {
        Some(&self.ordering_rule_oid)
    }

    fn substring_matching_rule(&self) -> Option<&str> {
        Some(SMR_CASE_IGNORE_OID)
    }

    fn approximate_matching_rule(&self) -> Option<&str> {
        Some(AMR_DOUBLE_METAPHONE_OID)
    }
}

/// Directory strings matching a regular expression (`X-PATTERN`)
#[derive(Debug, Clone)]
pub struct PatternSyntax {
    pattern: Regex,
}

impl PatternSyntax {
    /// Compile `pattern`
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// The regular expression
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl SyntaxImpl for PatternSyntax {
    fn name(&self) -> &str {
        "Pattern"
    }

    fn value_is_acceptable(&self, _schema: &Schema, value: &[u8]) -> bool {
        text(value).map_or(false, |s| self.pattern.is_match(s))
    }

    fn equality_matching_rule(&self) -> Option<&str> {
        Some(EMR_CASE_IGNORE_OID)
    }

    fn ordering_matching_rule(&self) -> Option<&str> {
        Some(OMR_CASE_IGNORE_OID)
    }

    fn substring_matching_rule(&self) -> Option<&str> {
        Some(SMR_CASE_IGNORE_OID)
    }

    fn approximate_matching_rule(&self) -> Option<&str> {
        Some(AMR_DOUBLE_METAPHONE_OID)
    }
}

/// Delegates to another syntax (`X-SUBST`)
#[derive(Debug, Clone)]
pub struct SubstitutionSyntax {
    target_oid: String,
    target: Arc<dyn SyntaxImpl>,
}

impl SubstitutionSyntax {
    /// Substitute the syntax `target_oid`, whose behaviour is `target`
    pub fn new(target_oid: impl Into<String>, target: Arc<dyn SyntaxImpl>) -> Self {
        Self {
            target_oid: target_oid.into(),
            target,
        }
    }

    /// OID of the substituted syntax
    pub fn target_oid(&self) -> &str {
        &self.target_oid
    }
}

impl SyntaxImpl for SubstitutionSyntax {
    fn name(&self) -> &str {
        self.target.name()
    }

    fn is_human_readable(&self) -> bool {
        self.target.is_human_readable()
    }

    fn value_is_acceptable(&self, schema: &Schema, value: &[u8]) -> bool {
        self.target.value_is_acceptable(schema, value)
    }

    fn equality_matching_rule(&self) -> Option<&str> {
        self.target.equality_matching_rule()
    }

    fn ordering_matching_rule(&self) -> Option<&str> {
        self.target.ordering_matching_rule()
    }

    fn substring_matching_rule(&self) -> Option<&str> {
        self.target.substring_matching_rule()
    }

    fn approximate_matching_rule(&self) -> Option<&str> {
        self.target.approximate_matching_rule()
    }
}
