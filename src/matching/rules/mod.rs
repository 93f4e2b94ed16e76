//! Concrete matching rules
//!
//! The generic [`EqualityMatchingRule`], [`OrderingMatchingRule`] and
//! [`SubstringMatchingRule`] bind a [`Normalizer`] to the comparison
//! semantics of their kind. Every rule of the core schema is registered in
//! [`CORE_MATCHING_RULES`], keyed by OID.

pub mod approximate;
pub mod certificate;
pub mod collation;
pub mod dn;
pub mod enumeration;
pub mod keyword;
pub mod numeric;
pub mod strings;
pub mod time;
pub mod uuid;

pub use approximate::DoubleMetaphoneNormalizer;
pub use certificate::CertificateExactNormalizer;
pub use collation::{collation_rule_definitions, Collator, CollationNormalizer, SimpleCollator};
pub use dn::{DistinguishedNameNormalizer, UniqueMemberNormalizer};
pub use enumeration::EnumerationOrderingNormalizer;
pub use keyword::KeywordMatchingRule;
pub use numeric::{IntegerFirstComponentNormalizer, IntegerNormalizer};
pub use strings::{
    BitStringNormalizer, BooleanNormalizer, CaseIgnoreListNormalizer, DirectoryStringFirstComponentNormalizer,
    DirectoryStringNormalizer, Ia5StringNormalizer, NumericStringNormalizer, ObjectIdentifierFirstComponentNormalizer,
    ObjectIdentifierNormalizer, OctetStringNormalizer, TelephoneNumberNormalizer,
};
pub use time::{
    Clock, FixedClock, GeneralizedTimeNormalizer, PartialDateAndTimeRule, RelativeTimeOrderingRule, SystemClock,
    UtcTimeNormalizer,
};
pub use uuid::UuidNormalizer;

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::assertion::{Assertion, EqualityAssertion, OrderingAssertion, OrderingOp};
use crate::matching::indexer::{EqualityIndexer, Indexer, SubstringIndexer};
use crate::matching::substring::{parse_substring_filter, SubstringAssertion};
use crate::matching::{MatchingRuleImpl, MatchingRuleKind, Normalizer};
use crate::normalizers::strings::CaseFolding;
use crate::options::IndexingOptions;
use crate::schema::constants::*;
use crate::schema::Schema;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::sync::Arc;

// ============================================================================
// Generic rules
// ============================================================================

/// Byte equality of normalized values
#[derive(Debug, Clone)]
pub struct EqualityMatchingRule {
    oid: String,
    kind: MatchingRuleKind,
    normalizer: Arc<dyn Normalizer>,
}

impl EqualityMatchingRule {
    /// Create an equality rule indexed under `oid`
    pub fn new(oid: impl Into<String>, normalizer: impl Normalizer + 'static) -> Self {
        Self::with_normalizer(oid, Arc::new(normalizer))
    }

    /// Create an equality rule sharing an existing normalizer
    pub fn with_normalizer(oid: impl Into<String>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            oid: oid.into(),
            kind: MatchingRuleKind::Equality,
            normalizer,
        }
    }

    /// Create an approximate rule: equality of a lossy (e.g. phonetic) normal form
    pub fn approximate(oid: impl Into<String>, normalizer: impl Normalizer + 'static) -> Self {
        Self {
            kind: MatchingRuleKind::Approximate,
            ..Self::new(oid, normalizer)
        }
    }
}

impl MatchingRuleImpl for EqualityMatchingRule {
    fn kind(&self) -> MatchingRuleKind {
        self.kind
    }

    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        self.normalizer.normalize_attribute_value(schema, value)
    }

    fn get_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        let normalized = self.normalizer.normalize_assertion_value(schema, value)?;
        Ok(Box::new(EqualityAssertion::new(&self.oid, normalized)))
    }

    fn create_indexers(&self, _options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        vec![Box::new(EqualityIndexer::new(&self.oid, self.normalizer.clone()))]
    }
}

/// Byte order of normalized values
#[derive(Debug, Clone)]
pub struct OrderingMatchingRule {
    oid: String,
    normalizer: Arc<dyn Normalizer>,
    assertion_op: OrderingOp,
}

impl OrderingMatchingRule {
    /// Create an ordering rule whose plain assertion means `attribute < value`
    pub fn new(oid: impl Into<String>, normalizer: impl Normalizer + 'static) -> Self {
        Self::with_normalizer(oid, Arc::new(normalizer))
    }

    /// Create an ordering rule sharing an existing normalizer
    pub fn with_normalizer(oid: impl Into<String>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            oid: oid.into(),
            normalizer,
            assertion_op: OrderingOp::LessThan,
        }
    }

    /// Change the comparison performed by plain assertions
    pub fn with_assertion_op(mut self, op: OrderingOp) -> Self {
        self.assertion_op = op;
        self
    }

    fn assertion(&self, schema: &Schema, value: &[u8], op: OrderingOp) -> Result<Box<dyn Assertion>> {
        let bound = self.normalizer.normalize_assertion_value(schema, value)?;
        Ok(Box::new(OrderingAssertion::new(&self.oid, bound, op)))
    }
}

impl MatchingRuleImpl for OrderingMatchingRule {
    fn kind(&self) -> MatchingRuleKind {
        MatchingRuleKind::Ordering
    }

    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        self.normalizer.normalize_attribute_value(schema, value)
    }

    fn get_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        self.assertion(schema, value, self.assertion_op)
    }

    fn get_greater_or_equal_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        self.assertion(schema, value, OrderingOp::GreaterOrEqual)
    }

    fn get_less_or_equal_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        self.assertion(schema, value, OrderingOp::LessOrEqual)
    }

    fn create_indexers(&self, _options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        vec![Box::new(EqualityIndexer::new(&self.oid, self.normalizer.clone()))]
    }
}

/// Ordered substring containment of normalized values
#[derive(Debug, Clone)]
pub struct SubstringMatchingRule {
    oid: String,
    normalizer: Arc<dyn Normalizer>,
}

impl SubstringMatchingRule {
    /// Create a substring rule indexed under `oid` and `oid:<key size>`
    pub fn new(oid: impl Into<String>, normalizer: impl Normalizer + 'static) -> Self {
        Self::with_normalizer(oid, Arc::new(normalizer))
    }

    /// Create a substring rule sharing an existing normalizer
    pub fn with_normalizer(oid: impl Into<String>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            oid: oid.into(),
            normalizer,
        }
    }

    fn component(&self, schema: &Schema, value: Option<&[u8]>) -> Result<Option<ByteString>> {
        value
            .map(|v| self.normalizer.normalize_substring_component(schema, v))
            .transpose()
    }
}

impl MatchingRuleImpl for SubstringMatchingRule {
    fn kind(&self) -> MatchingRuleKind {
        MatchingRuleKind::Substring
    }

    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        self.normalizer.normalize_attribute_value(schema, value)
    }

    fn get_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        let components = parse_substring_filter(value)?;
        let any: Vec<&[u8]> = components.any.iter().map(Vec::as_slice).collect();
        self.get_substring_assertion(
            schema,
            components.initial.as_deref(),
            &any,
            components.final_.as_deref(),
        )
    }

    fn get_substring_assertion(
        &self,
        schema: &Schema,
        initial: Option<&[u8]>,
        any: &[&[u8]],
        final_: Option<&[u8]>,
    ) -> Result<Box<dyn Assertion>> {
        let initial = self.component(schema, initial)?;
        let any = any
            .iter()
            .map(|c| self.normalizer.normalize_substring_component(schema, c))
            .collect::<Result<Vec<_>>>()?;
        let final_ = self.component(schema, final_)?;
        Ok(Box::new(SubstringAssertion::new(&self.oid, initial, any, final_)))
    }

    fn create_indexers(&self, options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        vec![
            Box::new(EqualityIndexer::new(&self.oid, self.normalizer.clone())),
            Box::new(SubstringIndexer::new(
                &self.oid,
                options.substring_key_size,
                self.normalizer.clone(),
            )),
        ]
    }
}

// ============================================================================
// Registry
// ============================================================================

/// A matching rule of the core schema
#[derive(Debug, Clone)]
pub struct MatchingRuleDefinition {
    /// Numeric OID
    pub oid: String,
    /// Names, primary name first
    pub names: Vec<String>,
    /// OID of the assertion syntax
    pub syntax_oid: String,
    /// Behaviour
    pub implementation: Arc<dyn MatchingRuleImpl>,
}

impl MatchingRuleDefinition {
    fn new(oid: &str, names: &[&str], syntax_oid: &str, implementation: impl MatchingRuleImpl + 'static) -> Self {
        Self {
            oid: oid.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            syntax_oid: syntax_oid.to_string(),
            implementation: Arc::new(implementation),
        }
    }
}

lazy_static! {
    /// Every matching rule of the core schema, keyed by OID
    pub static ref CORE_MATCHING_RULES: IndexMap<String, MatchingRuleDefinition> = core_matching_rules()
        .into_iter()
        .map(|rule| (rule.oid.clone(), rule))
        .collect();
}

/// The implementation registered for a core matching rule OID
pub fn core_implementation(oid: &str) -> Option<Arc<dyn MatchingRuleImpl>> {
    CORE_MATCHING_RULES.get(oid).map(|rule| rule.implementation.clone())
}

fn core_matching_rules() -> Vec<MatchingRuleDefinition> {
    use CaseFolding::{Exact, Ignore};
    use MatchingRuleDefinition as Def;

    let directory_ignore: Arc<dyn Normalizer> = Arc::new(DirectoryStringNormalizer::new(Ignore));
    let directory_exact: Arc<dyn Normalizer> = Arc::new(DirectoryStringNormalizer::new(Exact));
    let numeric_string: Arc<dyn Normalizer> = Arc::new(NumericStringNormalizer);
    let octet_string: Arc<dyn Normalizer> = Arc::new(OctetStringNormalizer);
    let generalized_time: Arc<dyn Normalizer> = Arc::new(GeneralizedTimeNormalizer);
    let uuid: Arc<dyn Normalizer> = Arc::new(UuidNormalizer);

    let mut rules = vec![
        // Equality
        Def::new(
            EMR_CASE_IGNORE_OID,
            &["caseIgnoreMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            EqualityMatchingRule::with_normalizer(EMR_CASE_IGNORE_OID, directory_ignore.clone()),
        ),
        Def::new(
            EMR_CASE_EXACT_OID,
            &["caseExactMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            EqualityMatchingRule::with_normalizer(EMR_CASE_EXACT_OID, directory_exact.clone()),
        ),
        Def::new(
            EMR_CASE_IGNORE_IA5_OID,
            &["caseIgnoreIA5Match"],
            SYNTAX_IA5_STRING_OID,
            EqualityMatchingRule::new(EMR_CASE_IGNORE_IA5_OID, Ia5StringNormalizer::new(Ignore)),
        ),
        Def::new(
            EMR_CASE_EXACT_IA5_OID,
            &["caseExactIA5Match"],
            SYNTAX_IA5_STRING_OID,
            EqualityMatchingRule::new(EMR_CASE_EXACT_IA5_OID, Ia5StringNormalizer::new(Exact)),
        ),
        Def::new(
            EMR_CASE_IGNORE_LIST_OID,
            &["caseIgnoreListMatch"],
            SYNTAX_POSTAL_ADDRESS_OID,
            EqualityMatchingRule::new(EMR_CASE_IGNORE_LIST_OID, CaseIgnoreListNormalizer),
        ),
        Def::new(
            EMR_NUMERIC_STRING_OID,
            &["numericStringMatch"],
            SYNTAX_NUMERIC_STRING_OID,
            EqualityMatchingRule::with_normalizer(EMR_NUMERIC_STRING_OID, numeric_string.clone()),
        ),
        Def::new(
            EMR_TELEPHONE_OID,
            &["telephoneNumberMatch"],
            SYNTAX_TELEPHONE_OID,
            EqualityMatchingRule::new(EMR_TELEPHONE_OID, TelephoneNumberNormalizer),
        ),
        Def::new(
            EMR_OCTET_STRING_OID,
            &["octetStringMatch"],
            SYNTAX_OCTET_STRING_OID,
            EqualityMatchingRule::with_normalizer(EMR_OCTET_STRING_OID, octet_string.clone()),
        ),
        Def::new(
            EMR_BOOLEAN_OID,
            &["booleanMatch"],
            SYNTAX_BOOLEAN_OID,
            EqualityMatchingRule::new(EMR_BOOLEAN_OID, BooleanNormalizer),
        ),
        Def::new(
            EMR_BIT_STRING_OID,
            &["bitStringMatch"],
            SYNTAX_BIT_STRING_OID,
            EqualityMatchingRule::new(EMR_BIT_STRING_OID, BitStringNormalizer),
        ),
        Def::new(
            EMR_OID_OID,
            &["objectIdentifierMatch"],
            SYNTAX_OID_OID,
            EqualityMatchingRule::new(EMR_OID_OID, ObjectIdentifierNormalizer),
        ),
        Def::new(
            EMR_DN_OID,
            &["distinguishedNameMatch"],
            SYNTAX_DN_OID,
            EqualityMatchingRule::new(EMR_DN_OID, DistinguishedNameNormalizer),
        ),
        Def::new(
            EMR_UNIQUE_MEMBER_OID,
            &["uniqueMemberMatch"],
            SYNTAX_NAME_AND_OPTIONAL_UID_OID,
            EqualityMatchingRule::new(EMR_UNIQUE_MEMBER_OID, UniqueMemberNormalizer),
        ),
        Def::new(
            EMR_INTEGER_OID,
            &["integerMatch"],
            SYNTAX_INTEGER_OID,
            EqualityMatchingRule::new(EMR_INTEGER_OID, IntegerNormalizer),
        ),
        Def::new(
            EMR_GENERALIZED_TIME_OID,
            &["generalizedTimeMatch"],
            SYNTAX_GENERALIZED_TIME_OID,
            EqualityMatchingRule::with_normalizer(EMR_GENERALIZED_TIME_OID, generalized_time.clone()),
        ),
        Def::new(
            EMR_UTC_TIME_OID,
            &["uTCTimeMatch"],
            SYNTAX_UTC_TIME_OID,
            EqualityMatchingRule::new(EMR_UTC_TIME_OID, UtcTimeNormalizer),
        ),
        Def::new(
            EMR_UUID_OID,
            &["uuidMatch"],
            SYNTAX_UUID_OID,
            EqualityMatchingRule::with_normalizer(EMR_UUID_OID, uuid.clone()),
        ),
        Def::new(
            EMR_CERTIFICATE_EXACT_OID,
            &["certificateExactMatch"],
            SYNTAX_CERTIFICATE_EXACT_ASSERTION_OID,
            EqualityMatchingRule::new(EMR_CERTIFICATE_EXACT_OID, CertificateExactNormalizer),
        ),
        Def::new(
            EMR_INTEGER_FIRST_COMPONENT_OID,
            &["integerFirstComponentMatch"],
            SYNTAX_INTEGER_OID,
            EqualityMatchingRule::new(EMR_INTEGER_FIRST_COMPONENT_OID, IntegerFirstComponentNormalizer),
        ),
        Def::new(
            EMR_OID_FIRST_COMPONENT_OID,
            &["objectIdentifierFirstComponentMatch"],
            SYNTAX_OID_OID,
            EqualityMatchingRule::new(EMR_OID_FIRST_COMPONENT_OID, ObjectIdentifierFirstComponentNormalizer),
        ),
        Def::new(
            EMR_DIRECTORY_STRING_FIRST_COMPONENT_OID,
            &["directoryStringFirstComponentMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            EqualityMatchingRule::new(
                EMR_DIRECTORY_STRING_FIRST_COMPONENT_OID,
                DirectoryStringFirstComponentNormalizer,
            ),
        ),
        Def::new(
            EMR_KEYWORD_OID,
            &["keywordMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            KeywordMatchingRule::new(EMR_KEYWORD_OID),
        ),
        Def::new(
            EMR_WORD_OID,
            &["wordMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            KeywordMatchingRule::new(EMR_WORD_OID),
        ),
        // Ordering
        Def::new(
            OMR_CASE_IGNORE_OID,
            &["caseIgnoreOrderingMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            OrderingMatchingRule::with_normalizer(OMR_CASE_IGNORE_OID, directory_ignore.clone()),
        ),
        Def::new(
            OMR_CASE_EXACT_OID,
            &["caseExactOrderingMatch"],
            SYNTAX_DIRECTORY_STRING_OID,
            OrderingMatchingRule::with_normalizer(OMR_CASE_EXACT_OID, directory_exact.clone()),
        ),
        Def::new(
            OMR_NUMERIC_STRING_OID,
            &["numericStringOrderingMatch"],
            SYNTAX_NUMERIC_STRING_OID,
            OrderingMatchingRule::with_normalizer(OMR_NUMERIC_STRING_OID, numeric_string.clone()),
        ),
        Def::new(
            OMR_INTEGER_OID,
            &["integerOrderingMatch"],
            SYNTAX_INTEGER_OID,
            OrderingMatchingRule::new(OMR_INTEGER_OID, IntegerNormalizer),
        ),
        Def::new(
            OMR_OCTET_STRING_OID,
            &["octetStringOrderingMatch"],
            SYNTAX_OCTET_STRING_OID,
            OrderingMatchingRule::with_normalizer(OMR_OCTET_STRING_OID, octet_string.clone()),
        ),
        Def::new(
            OMR_GENERALIZED_TIME_OID,
            &["generalizedTimeOrderingMatch"],
            SYNTAX_GENERALIZED_TIME_OID,
            OrderingMatchingRule::with_normalizer(OMR_GENERALIZED_TIME_OID, generalized_time),
        ),
        Def::new(
            OMR_UUID_OID,
            &["uuidOrderingMatch"],
            SYNTAX_UUID_OID,
            OrderingMatchingRule::with_normalizer(OMR_UUID_OID, uuid),
        ),
        Def::new(
            OMR_RELATIVE_TIME_GREATER_THAN_OID,
            &["relativeTimeGTOrderingMatch", "relativeTimeOrderingMatch.gt"],
            SYNTAX_GENERALIZED_TIME_OID,
            RelativeTimeOrderingRule::greater_than(Arc::new(SystemClock)),
        ),
        Def::new(
            OMR_RELATIVE_TIME_LESS_THAN_OID,
            &["relativeTimeLTOrderingMatch", "relativeTimeOrderingMatch.lt"],
            SYNTAX_GENERALIZED_TIME_OID,
            RelativeTimeOrderingRule::less_than(Arc::new(SystemClock)),
        ),
        // Substring
        Def::new(
            SMR_CASE_IGNORE_OID,
            &["caseIgnoreSubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::with_normalizer(SMR_CASE_IGNORE_OID, directory_ignore),
        ),
        Def::new(
            SMR_CASE_EXACT_OID,
            &["caseExactSubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::with_normalizer(SMR_CASE_EXACT_OID, directory_exact),
        ),
        Def::new(
            SMR_CASE_IGNORE_IA5_OID,
            &["caseIgnoreIA5SubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::new(SMR_CASE_IGNORE_IA5_OID, Ia5StringNormalizer::new(Ignore)),
        ),
        Def::new(
            SMR_CASE_EXACT_IA5_OID,
            &["caseExactIA5SubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::new(SMR_CASE_EXACT_IA5_OID, Ia5StringNormalizer::new(Exact)),
        ),
        Def::new(
            SMR_CASE_IGNORE_LIST_OID,
            &["caseIgnoreListSubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::new(SMR_CASE_IGNORE_LIST_OID, CaseIgnoreListNormalizer),
        ),
        Def::new(
            SMR_NUMERIC_STRING_OID,
            &["numericStringSubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::with_normalizer(SMR_NUMERIC_STRING_OID, numeric_string),
        ),
        Def::new(
            SMR_TELEPHONE_OID,
            &["telephoneNumberSubstringsMatch"],
            SYNTAX_SUBSTRING_ASSERTION_OID,
            SubstringMatchingRule::new(SMR_TELEPHONE_OID, TelephoneNumberNormalizer),
        ),
        Def::new(
            SMR_OCTET_STRING_OID,
            &["octetStringSubstringsMatch"],
            SYNTAX_OCTET_STRING_OID,
            SubstringMatchingRule::with_normalizer(SMR_OCTET_STRING_OID, octet_string),
        ),
        // Approximate and extensible
        Def::new(
            AMR_DOUBLE_METAPHONE_OID,
            &["ds-mr-double-metaphone-approx"],
            SYNTAX_DIRECTORY_STRING_OID,
            EqualityMatchingRule::approximate(AMR_DOUBLE_METAPHONE_OID, DoubleMetaphoneNormalizer),
        ),
        Def::new(
            MR_PARTIAL_DATE_AND_TIME_OID,
            &["partialDateAndTimeMatchingRule"],
            SYNTAX_GENERALIZED_TIME_OID,
            PartialDateAndTimeRule::new(),
        ),
    ];

    for (locales, oid) in collation::LOCALE_OIDS.iter() {
        rules.extend(collation_rule_definitions(locales, oid, Arc::new(SimpleCollator)));
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::assertion::ConditionResult;
    use crate::matching::query::IndexQuery;

    fn rule(oid: &str) -> Arc<dyn MatchingRuleImpl> {
        core_implementation(oid).unwrap()
    }

    #[test]
    fn test_registry_keys_match_definitions() {
        for (oid, definition) in CORE_MATCHING_RULES.iter() {
            assert_eq!(oid, &definition.oid);
            assert!(!definition.names.is_empty(), "{} has no name", oid);
        }
        assert!(core_implementation("9.9.9.9").is_none());
    }

    #[test]
    fn test_equality_rule() {
        let schema = Schema::core();
        let case_ignore = rule(EMR_CASE_IGNORE_OID);
        assert_eq!(case_ignore.kind(), MatchingRuleKind::Equality);

        let assertion = case_ignore.get_assertion(&schema, b"  Hello   World ").unwrap();
        let value = case_ignore.normalize_attribute_value(&schema, b"hello world").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::True);
        assert_eq!(
            assertion.index_query(&IndexingOptions::default()),
            IndexQuery::exact(EMR_CASE_IGNORE_OID, ByteString::from("hello world"))
        );
        assert!(case_ignore.get_greater_or_equal_assertion(&schema, b"x").is_err());
        assert!(case_ignore.get_substring_assertion(&schema, Some(b"x"), &[], None).is_err());
    }

    #[test]
    fn test_case_exact_index_query() {
        let schema = Schema::core();
        let assertion = rule(EMR_CASE_EXACT_OID).get_assertion(&schema, b"def").unwrap();
        let query = assertion.index_query(&IndexingOptions::default());
        assert_eq!(query, IndexQuery::exact(EMR_CASE_EXACT_OID, ByteString::from("def")));
        assert_eq!(query.leaf_count(), 1);
    }

    #[test]
    fn test_ordering_rule() {
        let schema = Schema::core();
        let integer_ordering = rule(OMR_INTEGER_OID);
        let value = integer_ordering.normalize_attribute_value(&schema, b"-5").unwrap();

        let less = integer_ordering.get_assertion(&schema, b"3").unwrap();
        assert_eq!(less.matches(&value), ConditionResult::True);
        let ge = integer_ordering.get_greater_or_equal_assertion(&schema, b"-5").unwrap();
        assert_eq!(ge.matches(&value), ConditionResult::True);
        let le = integer_ordering.get_less_or_equal_assertion(&schema, b"-6").unwrap();
        assert_eq!(le.matches(&value), ConditionResult::False);
    }

    #[test]
    fn test_substring_rule_from_filter() {
        let schema = Schema::core();
        let substrings = rule(SMR_CASE_IGNORE_OID);
        let assertion = substrings.get_assertion(&schema, b"Th*IS*Value").unwrap();
        let value = substrings.normalize_attribute_value(&schema, b"this is a value").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::True);
        assert!(substrings.get_assertion(&schema, b"no wildcard").is_err());
    }

    #[test]
    fn test_substring_rule_indexers() {
        let options = IndexingOptions::new().with_substring_key_size(3).unwrap();
        let indexers = rule(SMR_CASE_EXACT_OID).create_indexers(&options);
        let ids: Vec<&str> = indexers.iter().map(|i| i.index_id()).collect();
        assert_eq!(ids, vec!["2.5.13.7", "2.5.13.7:3"]);
    }
}
