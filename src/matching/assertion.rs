//! Assertions and three-valued match results
//!
//! An [`Assertion`] is an immutable, already normalized predicate bound to
//! one matching rule. It is evaluated against normalized attribute values
//! and can describe itself as an index query.

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::query::{IndexQuery, IndexQueryFactory};
use crate::options::IndexingOptions;
use std::fmt;

/// Result of evaluating an assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionResult {
    /// The assertion holds
    True,
    /// The assertion does not hold
    False,
    /// The value is present but the rule cannot determine a result
    Undefined,
}

impl ConditionResult {
    /// Convert a boolean
    pub fn from_bool(b: bool) -> Self {
        if b {
            ConditionResult::True
        } else {
            ConditionResult::False
        }
    }

    /// Returns true only for [`ConditionResult::True`]
    pub fn to_bool(self) -> bool {
        self == ConditionResult::True
    }

    /// Three-valued conjunction
    pub fn and(self, other: ConditionResult) -> Self {
        use ConditionResult::*;
        match (self, other) {
            (False, _) | (_, False) => False,
            (True, True) => True,
            _ => Undefined,
        }
    }

    /// Three-valued disjunction
    pub fn or(self, other: ConditionResult) -> Self {
        use ConditionResult::*;
        match (self, other) {
            (True, _) | (_, True) => True,
            (False, False) => False,
            _ => Undefined,
        }
    }

    /// Three-valued negation
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            ConditionResult::True => ConditionResult::False,
            ConditionResult::False => ConditionResult::True,
            ConditionResult::Undefined => ConditionResult::Undefined,
        }
    }

    /// Conjunction of any number of results, `True` when empty
    pub fn and_all<I: IntoIterator<Item = ConditionResult>>(results: I) -> Self {
        results
            .into_iter()
            .fold(ConditionResult::True, ConditionResult::and)
    }

    /// Disjunction of any number of results, `False` when empty
    pub fn or_any<I: IntoIterator<Item = ConditionResult>>(results: I) -> Self {
        results
            .into_iter()
            .fold(ConditionResult::False, ConditionResult::or)
    }
}

impl fmt::Display for ConditionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionResult::True => "TRUE",
            ConditionResult::False => "FALSE",
            ConditionResult::Undefined => "UNDEFINED",
        };
        write!(f, "{}", s)
    }
}

/// A normalized predicate produced by a matching rule
pub trait Assertion: fmt::Debug + Send + Sync {
    /// Evaluate against a value normalized by the same matching rule
    fn matches(&self, normalized_attribute_value: &[u8]) -> ConditionResult;

    /// Describe how an index can satisfy this assertion
    fn index_query(&self, options: &IndexingOptions) -> IndexQuery;
}

impl dyn Assertion {
    /// Build the index query through a storage specific factory
    pub fn create_index_query<F: IndexQueryFactory + ?Sized>(&self, factory: &F) -> Result<F::Query> {
        factory.indexing_options().check()?;
        Ok(self.index_query(factory.indexing_options()).build(factory))
    }
}

/// Byte-for-byte equality with a normalized assertion value
#[derive(Debug, Clone)]
pub struct EqualityAssertion {
    index_id: String,
    value: ByteString,
}

impl EqualityAssertion {
    /// Create an equality assertion against the index `index_id`
    pub fn new(index_id: impl Into<String>, value: ByteString) -> Self {
        Self {
            index_id: index_id.into(),
            value,
        }
    }

    /// The normalized assertion value
    pub fn value(&self) -> &ByteString {
        &self.value
    }
}

impl Assertion for EqualityAssertion {
    fn matches(&self, normalized_attribute_value: &[u8]) -> ConditionResult {
        ConditionResult::from_bool(self.value.as_bytes() == normalized_attribute_value)
    }

    fn index_query(&self, _options: &IndexingOptions) -> IndexQuery {
        IndexQuery::exact(&self.index_id, self.value.clone())
    }
}

/// Comparison performed by an [`OrderingAssertion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingOp {
    /// attribute < assertion
    LessThan,
    /// attribute <= assertion
    LessOrEqual,
    /// attribute >= assertion
    GreaterOrEqual,
    /// attribute > assertion
    GreaterThan,
}

/// Byte-order comparison with a normalized bound
#[derive(Debug, Clone)]
pub struct OrderingAssertion {
    index_id: String,
    bound: ByteString,
    op: OrderingOp,
}

impl OrderingAssertion {
    /// Create an ordering assertion against the index `index_id`
    pub fn new(index_id: impl Into<String>, bound: ByteString, op: OrderingOp) -> Self {
        Self {
            index_id: index_id.into(),
            bound,
            op,
        }
    }

    /// The normalized bound
    pub fn bound(&self) -> &ByteString {
        &self.bound
    }

    /// The comparison operator
    pub fn op(&self) -> OrderingOp {
        self.op
    }
}

impl Assertion for OrderingAssertion {
    fn matches(&self, normalized_attribute_value: &[u8]) -> ConditionResult {
        let value = normalized_attribute_value;
        let bound = self.bound.as_bytes();
        ConditionResult::from_bool(match self.op {
            OrderingOp::LessThan => value < bound,
            OrderingOp::LessOrEqual => value <= bound,
            OrderingOp::GreaterOrEqual => value >= bound,
            OrderingOp::GreaterThan => value > bound,
        })
    }

    fn index_query(&self, _options: &IndexingOptions) -> IndexQuery {
        let unbounded = ByteString::empty();
        let bound = self.bound.clone();
        match self.op {
            OrderingOp::LessThan => IndexQuery::range(&self.index_id, unbounded, bound, false, false),
            OrderingOp::LessOrEqual => IndexQuery::range(&self.index_id, unbounded, bound, false, true),
            OrderingOp::GreaterOrEqual => IndexQuery::range(&self.index_id, bound, unbounded, true, false),
            OrderingOp::GreaterThan => IndexQuery::range(&self.index_id, bound, unbounded, false, false),
        }
    }
}

/// An assertion that never yields a definite result
#[derive(Debug, Clone, Default)]
pub struct UndefinedAssertion;

impl Assertion for UndefinedAssertion {
    fn matches(&self, _normalized_attribute_value: &[u8]) -> ConditionResult {
        ConditionResult::Undefined
    }

    fn index_query(&self, _options: &IndexingOptions) -> IndexQuery {
        IndexQuery::MatchAll
    }
}
