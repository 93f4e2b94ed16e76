//! Index query generation
//!
//! Assertions describe how an index can satisfy them as an [`IndexQuery`]
//! tree of exact, range, match-all, intersection and union nodes. A storage
//! engine turns that tree into its own query objects by implementing
//! [`IndexQueryFactory`]. Intersections and unions are structural only; no
//! reordering or pruning is performed.

use crate::bytes::ByteString;
use crate::options::IndexingOptions;
use serde::Serialize;

/// Builds storage specific query objects.
///
/// An empty `lower` or `upper` bound passed to
/// [`create_range_match_query`](IndexQueryFactory::create_range_match_query)
/// means that side of the range is unbounded.
pub trait IndexQueryFactory {
    /// The query type produced by the storage engine
    type Query;

    /// Keys equal to `key` in the index `index_id`
    fn create_exact_match_query(&self, index_id: &str, key: &ByteString) -> Self::Query;

    /// Keys between `lower` and `upper` in the index `index_id`
    fn create_range_match_query(
        &self,
        index_id: &str,
        lower: &ByteString,
        upper: &ByteString,
        lower_included: bool,
        upper_included: bool,
    ) -> Self::Query;

    /// Every entry
    fn create_match_all_query(&self) -> Self::Query;

    /// Entries matched by every subquery
    fn create_intersection_query(&self, subqueries: Vec<Self::Query>) -> Self::Query;

    /// Entries matched by any subquery
    fn create_union_query(&self, subqueries: Vec<Self::Query>) -> Self::Query;

    /// Options the indexes were built with
    fn indexing_options(&self) -> &IndexingOptions;
}

/// Storage independent description of an index query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum IndexQuery {
    /// Exact key lookup
    Exact {
        /// Index identifier
        index_id: String,
        /// Key
        key: ByteString,
    },
    /// Key range lookup, an empty bound is unbounded
    Range {
        /// Index identifier
        index_id: String,
        /// Lower bound
        lower: ByteString,
        /// Upper bound
        upper: ByteString,
        /// Whether the lower bound is included
        lower_included: bool,
        /// Whether the upper bound is included
        upper_included: bool,
    },
    /// Every entry
    MatchAll,
    /// All subqueries must match
    Intersection(Vec<IndexQuery>),
    /// Any subquery may match
    Union(Vec<IndexQuery>),
}

impl IndexQuery {
    /// Exact match on `index_id`
    pub fn exact(index_id: &str, key: ByteString) -> Self {
        IndexQuery::Exact {
            index_id: index_id.to_string(),
            key,
        }
    }

    /// Range match on `index_id`
    pub fn range(
        index_id: &str,
        lower: ByteString,
        upper: ByteString,
        lower_included: bool,
        upper_included: bool,
    ) -> Self {
        IndexQuery::Range {
            index_id: index_id.to_string(),
            lower,
            upper,
            lower_included,
            upper_included,
        }
    }

    /// Every key starting with `prefix`: `[prefix, successor(prefix))`
    pub fn prefix(index_id: &str, prefix: &ByteString) -> Self {
        Self::range(index_id, prefix.clone(), prefix.prefix_successor(), true, false)
    }

    /// Translate this description through a factory
    pub fn build<F: IndexQueryFactory + ?Sized>(&self, factory: &F) -> F::Query {
        match self {
            IndexQuery::Exact { index_id, key } => factory.create_exact_match_query(index_id, key),
            IndexQuery::Range {
                index_id,
                lower,
                upper,
                lower_included,
                upper_included,
            } => factory.create_range_match_query(
                index_id,
                lower,
                upper,
                *lower_included,
                *upper_included,
            ),
            IndexQuery::MatchAll => factory.create_match_all_query(),
            IndexQuery::Intersection(subqueries) => factory
                .create_intersection_query(subqueries.iter().map(|q| q.build(factory)).collect()),
            IndexQuery::Union(subqueries) => {
                factory.create_union_query(subqueries.iter().map(|q| q.build(factory)).collect())
            }
        }
    }

    /// Number of leaf (exact, range, match-all) queries
    pub fn leaf_count(&self) -> usize {
        match self {
            IndexQuery::Intersection(subqueries) | IndexQuery::Union(subqueries) => {
                subqueries.iter().map(IndexQuery::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

/// A factory producing [`IndexQuery`] descriptions
#[derive(Debug, Clone, Default)]
pub struct IndexQueryBuilder {
    options: IndexingOptions,
}

impl IndexQueryBuilder {
    /// Create a builder using `options`
    pub fn new(options: IndexingOptions) -> Self {
        Self { options }
    }
}

impl IndexQueryFactory for IndexQueryBuilder {
    type Query = IndexQuery;

    fn create_exact_match_query(&self, index_id: &str, key: &ByteString) -> IndexQuery {
        IndexQuery::exact(index_id, key.clone())
    }

    fn create_range_match_query(
        &self,
        index_id: &str,
        lower: &ByteString,
        upper: &ByteString,
        lower_included: bool,
        upper_included: bool,
    ) -> IndexQuery {
        IndexQuery::range(index_id, lower.clone(), upper.clone(), lower_included, upper_included)
    }

    fn create_match_all_query(&self) -> IndexQuery {
        IndexQuery::MatchAll
    }

    fn create_intersection_query(&self, subqueries: Vec<IndexQuery>) -> IndexQuery {
        IndexQuery::Intersection(subqueries)
    }

    fn create_union_query(&self, subqueries: Vec<IndexQuery>) -> IndexQuery {
        IndexQuery::Union(subqueries)
    }

    fn indexing_options(&self) -> &IndexingOptions {
        &self.options
    }
}
