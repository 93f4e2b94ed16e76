//! Index key and index query integration tests
//!
//! A small factory renders queries as text, standing in for a storage engine.

use ldapschema::schema::constants::*;
use ldapschema::{ByteString, IndexQuery, IndexQueryBuilder, IndexQueryFactory, Indexer, IndexingOptions, Schema};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

struct TextQueryFactory {
    options: IndexingOptions,
}

impl TextQueryFactory {
    fn new(key_size: usize) -> Self {
        Self {
            options: IndexingOptions::default().with_substring_key_size(key_size).unwrap(),
        }
    }
}

impl IndexQueryFactory for TextQueryFactory {
    type Query = String;

    fn create_exact_match_query(&self, index_id: &str, key: &ByteString) -> String {
        format!("exact({}, {})", index_id, key)
    }

    fn create_range_match_query(
        &self,
        index_id: &str,
        lower: &ByteString,
        upper: &ByteString,
        lower_included: bool,
        upper_included: bool,
    ) -> String {
        format!(
            "range({}, {}{}, {}{})",
            index_id,
            if lower_included { "[" } else { "(" },
            lower,
            upper,
            if upper_included { "]" } else { ")" }
        )
    }

    fn create_match_all_query(&self) -> String {
        "all".to_string()
    }

    fn create_intersection_query(&self, subqueries: Vec<String>) -> String {
        format!("and({})", subqueries.join(", "))
    }

    fn create_union_query(&self, subqueries: Vec<String>) -> String {
        format!("or({})", subqueries.join(", "))
    }

    fn indexing_options(&self) -> &IndexingOptions {
        &self.options
    }
}

// ============================================================================
// Query shapes
// ============================================================================

#[test]
fn test_equality_query() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseExactMatch").unwrap();
    let assertion = rule.get_assertion(&schema, b"def").unwrap();

    let query = assertion.create_index_query(&TextQueryFactory::new(6)).unwrap();
    assert_eq!(query, format!("exact({}, def)", EMR_CASE_EXACT_OID));

    let described = assertion
        .create_index_query(&IndexQueryBuilder::new(IndexingOptions::default()))
        .unwrap();
    assert_eq!(described.leaf_count(), 1);
}

#[test]
fn test_ordering_query_has_one_open_bound() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreOrderingMatch").unwrap();
    let factory = TextQueryFactory::new(6);

    let ge = rule.get_greater_or_equal_assertion(&schema, b"M").unwrap();
    assert_eq!(
        ge.create_index_query(&factory).unwrap(),
        format!("range({}, [m, ))", OMR_CASE_IGNORE_OID)
    );
    let le = rule.get_less_or_equal_assertion(&schema, b"M").unwrap();
    assert_eq!(
        le.create_index_query(&factory).unwrap(),
        format!("range({}, (, m])", OMR_CASE_IGNORE_OID)
    );
}

#[test]
fn test_substring_initial_only() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseExactSubstringsMatch").unwrap();
    let assertion = rule.get_substring_assertion(&schema, Some(b"abcdef"), &[], None).unwrap();

    let query = assertion
        .create_index_query(&IndexQueryBuilder::new(IndexingOptions::default()))
        .unwrap();
    assert_eq!(
        query,
        IndexQuery::Intersection(vec![
            IndexQuery::range(
                SMR_CASE_EXACT_OID,
                ByteString::from("abcdef"),
                ByteString::from("abcdeg"),
                true,
                false
            ),
            IndexQuery::range(
                &format!("{}:6", SMR_CASE_EXACT_OID),
                ByteString::from("abcdef"),
                ByteString::from("abcdeg"),
                true,
                false
            ),
        ])
    );
}

#[test]
fn test_substring_any_and_final() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreSubstringsMatch").unwrap();
    let any: [&[u8]; 1] = [b"WXYZ"];
    let assertion = rule
        .get_substring_assertion(&schema, None, &any, Some(b"ab"))
        .unwrap();

    let query = assertion.create_index_query(&TextQueryFactory::new(3)).unwrap();
    assert_eq!(
        query,
        format!(
            "and(exact({id}, wxy), exact({id}, xyz), range({id}, [ab, ac)))",
            id = format!("{}:3", SMR_CASE_IGNORE_OID)
        )
    );
}

#[test]
fn test_prefix_successor_rolls_over() {
    assert_eq!(
        ByteString::from(&b"ab\xff"[..]).prefix_successor(),
        ByteString::from("ac")
    );
    assert_eq!(ByteString::from(&b"\xff\xff"[..]).prefix_successor(), ByteString::empty());
}

#[test]
fn test_invalid_key_size_is_rejected() {
    assert!(IndexingOptions::default().with_substring_key_size(0).is_err());
}

#[test]
fn test_query_json() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreMatch").unwrap();
    let assertion = rule.get_assertion(&schema, b"Some Value").unwrap();
    let query = assertion
        .create_index_query(&IndexQueryBuilder::new(IndexingOptions::default()))
        .unwrap();
    let json: serde_json::Value = serde_json::to_value(&query).unwrap();
    assert_eq!(json["type"], "exact");
    assert_eq!(json["args"]["index_id"], EMR_CASE_IGNORE_OID);
    assert_eq!(json["args"]["key"], "some value");
}

// ============================================================================
// Index keys
// ============================================================================

#[test]
fn test_equality_keys() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreMatch").unwrap();
    let indexers = rule.create_indexers(&IndexingOptions::default());
    assert_eq!(indexers.len(), 1);
    assert_eq!(indexers[0].index_id(), EMR_CASE_IGNORE_OID);

    let mut keys = BTreeSet::new();
    indexers[0].create_keys(&schema, b"  Hello  World", &mut keys).unwrap();
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![ByteString::from("hello world")]);
}

#[test]
fn test_substring_keys() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("caseIgnoreSubstringsMatch").unwrap();
    let options = IndexingOptions::default().with_substring_key_size(3).unwrap();
    let indexers = rule.create_indexers(&options);
    assert_eq!(indexers.len(), 2);

    let substring_indexer = indexers
        .iter()
        .find(|i| i.index_id() == format!("{}:3", SMR_CASE_IGNORE_OID))
        .unwrap();
    let mut keys = BTreeSet::new();
    substring_indexer.create_keys(&schema, b"ABCDE", &mut keys).unwrap();
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["abc", "bcd", "cde", "de", "e"]);
}

#[test]
fn test_invalid_value_has_no_keys() {
    let schema = Schema::core();
    let rule = schema.get_matching_rule("integerMatch").unwrap();
    let indexers = rule.create_indexers(&IndexingOptions::default());
    let mut keys = BTreeSet::new();
    assert!(indexers[0].create_keys(&schema, b"twelve", &mut keys).is_err());
    assert!(keys.is_empty());
}
