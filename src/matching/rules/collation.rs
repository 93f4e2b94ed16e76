//! Locale collation matching rules
//!
//! Each supported locale has six rules below a base OID: `.1` less than,
//! `.2` less or equal, `.3` equality (also registered under the base OID),
//! `.4` greater or equal, `.5` greater than and `.6` substring. Values are
//! compared by the collation keys of an injected [`Collator`].

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::assertion::OrderingOp;
use crate::matching::rules::{
    EqualityMatchingRule, MatchingRuleDefinition, OrderingMatchingRule, SubstringMatchingRule,
};
use crate::matching::{MatchingRuleImpl, Normalizer};
use crate::normalizers::strings::{prepare_string, CaseFolding, Trim};
use crate::schema::constants::SYNTAX_DIRECTORY_STRING_OID;
use crate::schema::Schema;
use lazy_static::lazy_static;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    /// Locale tags sharing a base OID, and that OID
    pub static ref LOCALE_OIDS: Vec<(Vec<&'static str>, &'static str)> = vec![
        (vec!["de"], "1.3.6.1.4.1.42.2.27.9.4.28.1"),
        (vec!["en", "en-US"], "1.3.6.1.4.1.42.2.27.9.4.34.1"),
        (vec!["es"], "1.3.6.1.4.1.42.2.27.9.4.49.1"),
        (vec!["fr"], "1.3.6.1.4.1.42.2.27.9.4.76.1"),
    ];
}

/// Produces sort keys whose byte order is the collation order
pub trait Collator: fmt::Debug + Send + Sync {
    /// Sort key of prepared text
    fn collation_key(&self, text: &str) -> Vec<u8>;
}

/// Primary strength collation of Latin text: case and diacritics are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCollator;

/// Base letter of a Latin letter with a diacritic
pub fn fold_diacritic(c: char) -> char {
    match c {
        'À'..='Å' | 'à'..='å' | 'Ā' | 'ā' | 'Ă' | 'ă' | 'Ą' | 'ą' => 'a',
        'Ç' | 'ç' | 'Ć' | 'ć' | 'Č' | 'č' => 'c',
        'Ď' | 'ď' | 'Đ' | 'đ' => 'd',
        'È'..='Ë' | 'è'..='ë' | 'Ē' | 'ē' | 'Ė' | 'ė' | 'Ę' | 'ę' | 'Ě' | 'ě' => 'e',
        'Ì'..='Ï' | 'ì'..='ï' | 'Ī' | 'ī' | 'Į' | 'į' => 'i',
        'Ñ' | 'ñ' | 'Ń' | 'ń' | 'Ň' | 'ň' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō' | 'ō' | 'Ő' | 'ő' => 'o',
        'Ŕ' | 'ŕ' | 'Ř' | 'ř' => 'r',
        'Ś' | 'ś' | 'Š' | 'š' | 'Ş' | 'ş' => 's',
        'Ť' | 'ť' | 'Ţ' | 'ţ' => 't',
        'Ù'..='Ü' | 'ù'..='ü' | 'Ū' | 'ū' | 'Ů' | 'ů' | 'Ű' | 'ű' => 'u',
        'Ý' | 'ý' | 'ÿ' => 'y',
        'Ź' | 'ź' | 'Ż' | 'ż' | 'Ž' | 'ž' => 'z',
        _ => c,
    }
}

impl Collator for SimpleCollator {
    fn collation_key(&self, text: &str) -> Vec<u8> {
        let mut key = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                'ß' => key.push_str("ss"),
                'Æ' | 'æ' => key.push_str("ae"),
                'Œ' | 'œ' => key.push_str("oe"),
                _ => key.extend(fold_diacritic(c).to_lowercase()),
            }
        }
        key.into_bytes()
    }
}

/// Collation key of the prepared value
#[derive(Debug, Clone)]
pub struct CollationNormalizer {
    collator: Arc<dyn Collator>,
}

impl CollationNormalizer {
    /// Create a normalizer using `collator`
    pub fn new(collator: Arc<dyn Collator>) -> Self {
        Self { collator }
    }
}

impl Normalizer for CollationNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let prepared = prepare_string(value, CaseFolding::Exact, Trim::Both)?;
        Ok(ByteString::from_vec(self.collator.collation_key(&prepared)))
    }

    fn normalize_substring_component(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let prepared = prepare_string(value, CaseFolding::Exact, Trim::None)?;
        Ok(ByteString::from_vec(self.collator.collation_key(&prepared)))
    }
}

/// The seven rule definitions of the locales sharing `base_oid`
pub fn collation_rule_definitions(
    locales: &[&str],
    base_oid: &str,
    collator: Arc<dyn Collator>,
) -> Vec<MatchingRuleDefinition> {
    let normalizer: Arc<dyn Normalizer> = Arc::new(CollationNormalizer::new(collator));
    let definition = |suffix: Option<(u32, &str)>, implementation: Arc<dyn MatchingRuleImpl>| {
        let (oid, names): (String, Vec<String>) = match suffix {
            None => (base_oid.to_string(), locales.iter().map(|l| l.to_string()).collect()),
            Some((number, symbol)) => (
                format!("{}.{}", base_oid, number),
                locales
                    .iter()
                    .flat_map(|l| [format!("{}.{}", l, symbol), format!("{}.{}", l, number)])
                    .collect(),
            ),
        };
        MatchingRuleDefinition {
            oid,
            names,
            syntax_oid: SYNTAX_DIRECTORY_STRING_OID.to_string(),
            implementation,
        }
    };
    let ordering = |number: u32, op: OrderingOp| -> Arc<dyn MatchingRuleImpl> {
        Arc::new(
            OrderingMatchingRule::with_normalizer(format!("{}.{}", base_oid, number), normalizer.clone())
                .with_assertion_op(op),
        )
    };
    let equality: Arc<dyn MatchingRuleImpl> = Arc::new(EqualityMatchingRule::with_normalizer(
        format!("{}.3", base_oid),
        normalizer.clone(),
    ));

    vec![
        definition(Some((1, "lt")), ordering(1, OrderingOp::LessThan)),
        definition(Some((2, "lte")), ordering(2, OrderingOp::LessOrEqual)),
        definition(Some((3, "eq")), equality.clone()),
        definition(None, equality),
        definition(Some((4, "gte")), ordering(4, OrderingOp::GreaterOrEqual)),
        definition(Some((5, "gt")), ordering(5, OrderingOp::GreaterThan)),
        definition(
            Some((6, "sub")),
            Arc::new(SubstringMatchingRule::with_normalizer(
                format!("{}.6", base_oid),
                normalizer.clone(),
            )),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::assertion::ConditionResult;
    use crate::matching::MatchingRuleKind;

    #[test]
    fn test_simple_collator_folds() {
        let collator = SimpleCollator;
        assert_eq!(collator.collation_key("Éléphant"), b"elephant".to_vec());
        assert_eq!(collator.collation_key("Straße"), b"strasse".to_vec());
        assert!(collator.collation_key("apple") < collator.collation_key("Banana"));
    }

    #[test]
    fn test_definitions_for_locale() {
        let rules = collation_rule_definitions(&["en", "en-US"], "1.2.3", Arc::new(SimpleCollator));
        let oids: Vec<&str> = rules.iter().map(|r| r.oid.as_str()).collect();
        assert_eq!(oids, vec!["1.2.3.1", "1.2.3.2", "1.2.3.3", "1.2.3", "1.2.3.4", "1.2.3.5", "1.2.3.6"]);
        assert_eq!(rules[0].names, vec!["en.lt", "en.1", "en-US.lt", "en-US.1"]);
        assert_eq!(rules[3].names, vec!["en", "en-US"]);
        assert_eq!(rules[6].implementation.kind(), MatchingRuleKind::Substring);
    }

    #[test]
    fn test_collation_ordering() {
        let schema = Schema::empty();
        let rules = collation_rule_definitions(&["fr"], "1.2.3", Arc::new(SimpleCollator));
        let less_than = &rules[0].implementation;
        let value = less_than.normalize_attribute_value(&schema, b"\xc3\xa9cole").unwrap();
        let assertion = less_than.get_assertion(&schema, b"Fromage").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::True);

        let greater_than = &rules[5].implementation;
        let assertion = greater_than.get_assertion(&schema, b"ECOLE").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::False);

        let equality = &rules[2].implementation;
        let assertion = equality.get_assertion(&schema, b"ECOLE").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::True);
    }
}
