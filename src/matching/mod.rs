//! Matching rule implementations
//!
//! A schema [`MatchingRule`](crate::schema::MatchingRule) delegates its
//! behaviour to a [`MatchingRuleImpl`]. Most implementations are one of the
//! generic equality, ordering or substring rules in [`rules`] combined with
//! a [`Normalizer`]; rules with unusual assertion semantics (relative time,
//! partial date and time, keywords) implement the trait directly.

pub mod assertion;
pub mod indexer;
pub mod query;
pub mod rules;
pub mod substring;

pub use assertion::{
    Assertion, ConditionResult, EqualityAssertion, OrderingAssertion, OrderingOp,
    UndefinedAssertion,
};
pub use indexer::{EqualityIndexer, Indexer, SubstringIndexer};
pub use query::{IndexQuery, IndexQueryBuilder, IndexQueryFactory};
pub use substring::SubstringAssertion;

use crate::bytes::ByteString;
use crate::error::{Error, Result};
use crate::options::IndexingOptions;
use crate::schema::Schema;
use std::fmt;

/// The comparison semantics of a matching rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchingRuleKind {
    /// Equality
    Equality,
    /// Ordering
    Ordering,
    /// Substring
    Substring,
    /// Approximate (sounds-like) equality
    Approximate,
}

impl MatchingRuleKind {
    /// Lower-case name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingRuleKind::Equality => "equality",
            MatchingRuleKind::Ordering => "ordering",
            MatchingRuleKind::Substring => "substring",
            MatchingRuleKind::Approximate => "approximate",
        }
    }
}

impl fmt::Display for MatchingRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps raw values to canonical bytes
pub trait Normalizer: fmt::Debug + Send + Sync {
    /// Normalize an attribute value
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString>;

    /// Normalize an assertion value; defaults to the attribute value grammar
    fn normalize_assertion_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        self.normalize_attribute_value(schema, value)
    }

    /// Normalize one substring component; defaults to the attribute value grammar
    fn normalize_substring_component(&self, schema: &Schema, value: &[u8]) -> Result<ByteString> {
        self.normalize_attribute_value(schema, value)
    }
}

/// Behaviour of a matching rule
pub trait MatchingRuleImpl: fmt::Debug + Send + Sync {
    /// Comparison semantics
    fn kind(&self) -> MatchingRuleKind;

    /// Normalize an attribute value; fails if the value is not acceptable
    fn normalize_attribute_value(&self, schema: &Schema, value: &[u8]) -> Result<ByteString>;

    /// Build an assertion from an assertion value
    fn get_assertion(&self, schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>>;

    /// Build a substring assertion from raw components
    fn get_substring_assertion(
        &self,
        _schema: &Schema,
        _initial: Option<&[u8]>,
        _any: &[&[u8]],
        _final: Option<&[u8]>,
    ) -> Result<Box<dyn Assertion>> {
        Err(Error::Unsupported(format!(
            "substring assertions are not supported by {} rules",
            self.kind()
        )))
    }

    /// Build an `attribute >= value` assertion
    fn get_greater_or_equal_assertion(&self, _schema: &Schema, _value: &[u8]) -> Result<Box<dyn Assertion>> {
        Err(Error::Unsupported(format!(
            "ordering assertions are not supported by {} rules",
            self.kind()
        )))
    }

    /// Build an `attribute <= value` assertion
    fn get_less_or_equal_assertion(&self, _schema: &Schema, _value: &[u8]) -> Result<Box<dyn Assertion>> {
        Err(Error::Unsupported(format!(
            "ordering assertions are not supported by {} rules",
            self.kind()
        )))
    }

    /// Indexers that maintain the indexes this rule's assertions query
    fn create_indexers(&self, options: &IndexingOptions) -> Vec<Box<dyn Indexer>>;
}
