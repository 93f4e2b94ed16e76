//! Well-known OIDs and names of the core schema

/// Base OID of the directory specific matching rules
pub const OID_MATCHING_RULE_BASE: &str = "1.3.6.1.4.1.26027.1.4";

/// Prefix of the OID of the ordering rule generated for an enumeration syntax
pub const OMR_ENUM_OID_PREFIX: &str = "1.3.6.1.4.1.26027.1.4.8.";

// ============================================================================
// Syntaxes
// ============================================================================

/// Attribute Type Description
pub const SYNTAX_ATTRIBUTE_TYPE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.3";
/// Binary
pub const SYNTAX_BINARY_OID: &str = "1.3.6.1.4.1.1466.115.121.1.5";
/// Bit String
pub const SYNTAX_BIT_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.6";
/// Boolean
pub const SYNTAX_BOOLEAN_OID: &str = "1.3.6.1.4.1.1466.115.121.1.7";
/// Certificate
pub const SYNTAX_CERTIFICATE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.8";
/// Certificate List
pub const SYNTAX_CERTLIST_OID: &str = "1.3.6.1.4.1.1466.115.121.1.9";
/// Certificate Pair
pub const SYNTAX_CERTPAIR_OID: &str = "1.3.6.1.4.1.1466.115.121.1.10";
/// Country String
pub const SYNTAX_COUNTRY_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.11";
/// DN
pub const SYNTAX_DN_OID: &str = "1.3.6.1.4.1.1466.115.121.1.12";
/// Directory String
pub const SYNTAX_DIRECTORY_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.15";
/// DIT Content Rule Description
pub const SYNTAX_DIT_CONTENT_RULE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.16";
/// DIT Structure Rule Description
pub const SYNTAX_DIT_STRUCTURE_RULE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.17";
/// Generalized Time
pub const SYNTAX_GENERALIZED_TIME_OID: &str = "1.3.6.1.4.1.1466.115.121.1.24";
/// IA5 String
pub const SYNTAX_IA5_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.26";
/// INTEGER
pub const SYNTAX_INTEGER_OID: &str = "1.3.6.1.4.1.1466.115.121.1.27";
/// JPEG
pub const SYNTAX_JPEG_OID: &str = "1.3.6.1.4.1.1466.115.121.1.28";
/// Matching Rule Description
pub const SYNTAX_MATCHING_RULE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.30";
/// Matching Rule Use Description
pub const SYNTAX_MATCHING_RULE_USE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.31";
/// Name And Optional UID
pub const SYNTAX_NAME_AND_OPTIONAL_UID_OID: &str = "1.3.6.1.4.1.1466.115.121.1.34";
/// Name Form Description
pub const SYNTAX_NAME_FORM_OID: &str = "1.3.6.1.4.1.1466.115.121.1.35";
/// Numeric String
pub const SYNTAX_NUMERIC_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.36";
/// Object Class Description
pub const SYNTAX_OBJECTCLASS_OID: &str = "1.3.6.1.4.1.1466.115.121.1.37";
/// OID
pub const SYNTAX_OID_OID: &str = "1.3.6.1.4.1.1466.115.121.1.38";
/// Octet String
pub const SYNTAX_OCTET_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.40";
/// Postal Address
pub const SYNTAX_POSTAL_ADDRESS_OID: &str = "1.3.6.1.4.1.1466.115.121.1.41";
/// Printable String
pub const SYNTAX_PRINTABLE_STRING_OID: &str = "1.3.6.1.4.1.1466.115.121.1.44";
/// Telephone Number
pub const SYNTAX_TELEPHONE_OID: &str = "1.3.6.1.4.1.1466.115.121.1.50";
/// UTC Time
pub const SYNTAX_UTC_TIME_OID: &str = "1.3.6.1.4.1.1466.115.121.1.53";
/// LDAP Syntax Description
pub const SYNTAX_LDAP_SYNTAX_OID: &str = "1.3.6.1.4.1.1466.115.121.1.54";
/// Substring Assertion
pub const SYNTAX_SUBSTRING_ASSERTION_OID: &str = "1.3.6.1.4.1.1466.115.121.1.58";
/// UUID
pub const SYNTAX_UUID_OID: &str = "1.3.6.1.1.16.1";
/// Certificate Exact Assertion
pub const SYNTAX_CERTIFICATE_EXACT_ASSERTION_OID: &str = "1.3.6.1.1.15.1";

// ============================================================================
// Equality matching rules
// ============================================================================

/// objectIdentifierMatch
pub const EMR_OID_OID: &str = "2.5.13.0";
/// distinguishedNameMatch
pub const EMR_DN_OID: &str = "2.5.13.1";
/// caseIgnoreMatch
pub const EMR_CASE_IGNORE_OID: &str = "2.5.13.2";
/// caseExactMatch
pub const EMR_CASE_EXACT_OID: &str = "2.5.13.5";
/// numericStringMatch
pub const EMR_NUMERIC_STRING_OID: &str = "2.5.13.8";
/// caseIgnoreListMatch
pub const EMR_CASE_IGNORE_LIST_OID: &str = "2.5.13.11";
/// booleanMatch
pub const EMR_BOOLEAN_OID: &str = "2.5.13.13";
/// integerMatch
pub const EMR_INTEGER_OID: &str = "2.5.13.14";
/// bitStringMatch
pub const EMR_BIT_STRING_OID: &str = "2.5.13.16";
/// octetStringMatch
pub const EMR_OCTET_STRING_OID: &str = "2.5.13.17";
/// telephoneNumberMatch
pub const EMR_TELEPHONE_OID: &str = "2.5.13.20";
/// uniqueMemberMatch
pub const EMR_UNIQUE_MEMBER_OID: &str = "2.5.13.23";
/// uTCTimeMatch
pub const EMR_UTC_TIME_OID: &str = "2.5.13.25";
/// generalizedTimeMatch
pub const EMR_GENERALIZED_TIME_OID: &str = "2.5.13.27";
/// integerFirstComponentMatch
pub const EMR_INTEGER_FIRST_COMPONENT_OID: &str = "2.5.13.29";
/// objectIdentifierFirstComponentMatch
pub const EMR_OID_FIRST_COMPONENT_OID: &str = "2.5.13.30";
/// directoryStringFirstComponentMatch
pub const EMR_DIRECTORY_STRING_FIRST_COMPONENT_OID: &str = "2.5.13.31";
/// wordMatch
pub const EMR_WORD_OID: &str = "2.5.13.32";
/// keywordMatch
pub const EMR_KEYWORD_OID: &str = "2.5.13.33";
/// certificateExactMatch
pub const EMR_CERTIFICATE_EXACT_OID: &str = "2.5.13.34";
/// caseExactIA5Match
pub const EMR_CASE_EXACT_IA5_OID: &str = "1.3.6.1.4.1.1466.109.114.1";
/// caseIgnoreIA5Match
pub const EMR_CASE_IGNORE_IA5_OID: &str = "1.3.6.1.4.1.1466.109.114.2";
/// uuidMatch
pub const EMR_UUID_OID: &str = "1.3.6.1.1.16.2";

// ============================================================================
// Ordering matching rules
// ============================================================================

/// caseIgnoreOrderingMatch
pub const OMR_CASE_IGNORE_OID: &str = "2.5.13.3";
/// caseExactOrderingMatch
pub const OMR_CASE_EXACT_OID: &str = "2.5.13.6";
/// numericStringOrderingMatch
pub const OMR_NUMERIC_STRING_OID: &str = "2.5.13.9";
/// integerOrderingMatch
pub const OMR_INTEGER_OID: &str = "2.5.13.15";
/// octetStringOrderingMatch
pub const OMR_OCTET_STRING_OID: &str = "2.5.13.18";
/// generalizedTimeOrderingMatch
pub const OMR_GENERALIZED_TIME_OID: &str = "2.5.13.28";
/// uuidOrderingMatch
pub const OMR_UUID_OID: &str = "1.3.6.1.1.16.3";
/// relativeTimeGTOrderingMatch
pub const OMR_RELATIVE_TIME_GREATER_THAN_OID: &str = "1.3.6.1.4.1.26027.1.4.5";
/// relativeTimeLTOrderingMatch
pub const OMR_RELATIVE_TIME_LESS_THAN_OID: &str = "1.3.6.1.4.1.26027.1.4.6";

// ============================================================================
// Substring matching rules
// ============================================================================

/// caseIgnoreSubstringsMatch
pub const SMR_CASE_IGNORE_OID: &str = "2.5.13.4";
/// caseExactSubstringsMatch
pub const SMR_CASE_EXACT_OID: &str = "2.5.13.7";
/// numericStringSubstringsMatch
pub const SMR_NUMERIC_STRING_OID: &str = "2.5.13.10";
/// caseIgnoreListSubstringsMatch
pub const SMR_CASE_IGNORE_LIST_OID: &str = "2.5.13.12";
/// octetStringSubstringsMatch
pub const SMR_OCTET_STRING_OID: &str = "2.5.13.19";
/// telephoneNumberSubstringsMatch
pub const SMR_TELEPHONE_OID: &str = "2.5.13.21";
/// caseIgnoreIA5SubstringsMatch
pub const SMR_CASE_IGNORE_IA5_OID: &str = "1.3.6.1.4.1.1466.109.114.3";
/// caseExactIA5SubstringsMatch
pub const SMR_CASE_EXACT_IA5_OID: &str = "1.3.6.1.4.1.26027.1.4.902";

// ============================================================================
// Other matching rules
// ============================================================================

/// ds-mr-double-metaphone-approx
pub const AMR_DOUBLE_METAPHONE_OID: &str = "1.3.6.1.4.1.26027.1.4.1";
/// partialDateAndTimeMatchingRule
pub const MR_PARTIAL_DATE_AND_TIME_OID: &str = "1.3.6.1.4.1.26027.1.4.7";

// ============================================================================
// Attribute types and object classes
// ============================================================================

/// objectClass
pub const OBJECT_CLASS_OID: &str = "2.5.4.0";
/// top
pub const TOP_OBJECTCLASS_OID: &str = "2.5.6.0";
/// Name of `top`
pub const TOP_OBJECTCLASS_NAME: &str = "top";
/// extensibleObject
pub const EXTENSIBLE_OBJECT_OBJECTCLASS_OID: &str = "1.3.6.1.4.1.1466.101.120.111";

// ============================================================================
// Extension properties
// ============================================================================

/// Origin of an element
pub const SCHEMA_PROPERTY_ORIGIN: &str = "X-ORIGIN";
/// Regular expression of a pattern syntax
pub const SCHEMA_PROPERTY_PATTERN: &str = "X-PATTERN";
/// Values of an enumeration syntax
pub const SCHEMA_PROPERTY_ENUM: &str = "X-ENUM";
/// Target of a substitution syntax
pub const SCHEMA_PROPERTY_SUBST: &str = "X-SUBST";
