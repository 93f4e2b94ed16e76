//! keywordMatch and wordMatch
//!
//! The attribute value matches when the prepared assertion value occurs in
//! the prepared attribute value bounded by word separators on both sides.

use crate::bytes::ByteString;
use crate::error::{Error, Result};
use crate::matching::assertion::{Assertion, ConditionResult};
use crate::matching::indexer::Indexer;
use crate::matching::query::IndexQuery;
use crate::matching::{MatchingRuleImpl, MatchingRuleKind};
use crate::normalizers::strings::{is_word_separator, prepare_string, CaseFolding, Trim};
use crate::options::IndexingOptions;
use crate::schema::Schema;

/// Returns true if `keyword` occurs in `text` between word boundaries
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    text.match_indices(keyword).any(|(start, _)| {
        let end = start + keyword.len();
        let before = text[..start].chars().next_back().map_or(true, is_word_separator);
        let after = text[end..].chars().next().map_or(true, is_word_separator);
        before && after
    })
}

/// A prepared keyword
#[derive(Debug, Clone)]
pub struct KeywordAssertion {
    keyword: String,
}

impl Assertion for KeywordAssertion {
    fn matches(&self, normalized_attribute_value: &[u8]) -> ConditionResult {
        match std::str::from_utf8(normalized_attribute_value) {
            Ok(text) => ConditionResult::from_bool(contains_keyword(text, &self.keyword)),
            Err(_) => ConditionResult::Undefined,
        }
    }

    fn index_query(&self, _options: &IndexingOptions) -> IndexQuery {
        IndexQuery::MatchAll
    }
}

/// Word containment over case-ignore prepared strings
#[derive(Debug, Clone)]
pub struct KeywordMatchingRule {
    oid: String,
}

impl KeywordMatchingRule {
    /// Create the rule registered under `oid`
    pub fn new(oid: impl Into<String>) -> Self {
        Self { oid: oid.into() }
    }

    /// OID of the rule
    pub fn oid(&self) -> &str {
        &self.oid
    }
}

impl MatchingRuleImpl for KeywordMatchingRule {
    fn kind(&self) -> MatchingRuleKind {
        MatchingRuleKind::Equality
    }

    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        Ok(prepare_string(value, CaseFolding::Ignore, Trim::Both)?.into())
    }

    fn get_assertion(&self, _schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        let keyword = prepare_string(value, CaseFolding::Ignore, Trim::Both)?;
        if keyword.is_empty() {
            return Err(Error::decode("empty keyword", value));
        }
        Ok(Box::new(KeywordAssertion { keyword }))
    }

    fn create_indexers(&self, _options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_keyword() {
        assert!(contains_keyword("the quick brown fox", "quick"));
        assert!(contains_keyword("the quick brown fox", "quick brown"));
        assert!(contains_keyword("fox, the end", "fox"));
        assert!(!contains_keyword("the quickest fox", "quick"));
        assert!(!contains_keyword("thequick fox", "quick"));
        assert!(!contains_keyword("anything", ""));
    }

    #[test]
    fn test_keyword_rule() {
        let schema = Schema::empty();
        let rule = KeywordMatchingRule::new("2.5.13.33");
        let value = rule.normalize_attribute_value(&schema, b"The Quick  Brown Fox").unwrap();
        let assertion = rule.get_assertion(&schema, b"BROWN").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::True);
        let assertion = rule.get_assertion(&schema, b"row").unwrap();
        assert_eq!(assertion.matches(&value), ConditionResult::False);
        assert_eq!(
            assertion.index_query(&IndexingOptions::default()),
            IndexQuery::MatchAll
        );
        assert!(rule.get_assertion(&schema, b"   ").is_err());
        assert!(rule.create_indexers(&IndexingOptions::default()).is_empty());
    }
}
