//! Substring assertions
//!
//! Components are matched in order against a cursor over the normalized
//! value: `initial` must be a prefix, each `any` component is searched
//! leftmost from the cursor and consumes its bytes, and `final` must be a
//! suffix of what remains. Components can therefore never overlap or match
//! out of order.

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use crate::matching::assertion::{Assertion, ConditionResult};
use crate::matching::indexer::substring_index_id;
use crate::matching::query::IndexQuery;
use crate::options::IndexingOptions;
use std::collections::BTreeSet;

/// Raw components of a substring filter value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstringComponents {
    /// Leading component
    pub initial: Option<Vec<u8>>,
    /// Middle components in order
    pub any: Vec<Vec<u8>>,
    /// Trailing component
    pub final_: Option<Vec<u8>>,
}

/// Parse the filter form `[initial]*[any]*...*[final]` with `\XX` escapes
pub fn parse_substring_filter(value: &[u8]) -> Result<SubstringComponents> {
    let malformed = |reason: &str| {
        Error::Decode(
            DecodeError::new("malformed substring assertion")
                .with_value(value)
                .with_reason(reason),
        )
    };

    let mut parts: Vec<Vec<u8>> = vec![Vec::new()];
    let mut i = 0;
    while i < value.len() {
        match value[i] {
            b'*' => parts.push(Vec::new()),
            b'\\' => {
                let hex = value
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| malformed("invalid escape sequence"))?;
                if let Some(last) = parts.last_mut() {
                    last.push(hex);
                }
                i += 2;
            }
            b => {
                if let Some(last) = parts.last_mut() {
                    last.push(b);
                }
            }
        }
        i += 1;
    }

    if parts.len() < 2 {
        return Err(malformed("expected at least one '*'"));
    }
    let final_part = parts.pop().filter(|p| !p.is_empty());
    let mut parts = parts.into_iter();
    let initial = parts.next().filter(|p| !p.is_empty());
    let any = parts.filter(|p| !p.is_empty()).collect();
    Ok(SubstringComponents {
        initial,
        any,
        final_: final_part,
    })
}

/// Ordered, non-overlapping substring match
pub fn matches_substrings(
    value: &[u8],
    initial: Option<&[u8]>,
    any: &[ByteString],
    final_: Option<&[u8]>,
) -> bool {
    let mut pos = 0;
    let mut end = value.len();

    if let Some(initial) = initial.filter(|c| !c.is_empty()) {
        if !value.starts_with(initial) {
            return false;
        }
        pos = initial.len();
    }

    if let Some(final_) = final_.filter(|c| !c.is_empty()) {
        if end - pos < final_.len() || !value.ends_with(final_) {
            return false;
        }
        end -= final_.len();
    }

    for component in any.iter().filter(|c| !c.is_empty()) {
        match find(&value[pos..end], component) {
            Some(offset) => pos += offset + component.len(),
            None => return false,
        }
    }
    true
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A normalized substring assertion
#[derive(Debug, Clone)]
pub struct SubstringAssertion {
    rule_oid: String,
    initial: Option<ByteString>,
    any: Vec<ByteString>,
    final_: Option<ByteString>,
}

impl SubstringAssertion {
    /// Create an assertion from normalized components of the rule `rule_oid`
    pub fn new(
        rule_oid: impl Into<String>,
        initial: Option<ByteString>,
        any: Vec<ByteString>,
        final_: Option<ByteString>,
    ) -> Self {
        Self {
            rule_oid: rule_oid.into(),
            initial: initial.filter(|c| !c.is_empty()),
            any: any.into_iter().filter(|c| !c.is_empty()).collect(),
            final_: final_.filter(|c| !c.is_empty()),
        }
    }

    /// Normalized initial component
    pub fn initial(&self) -> Option<&ByteString> {
        self.initial.as_ref()
    }

    /// Normalized middle components
    pub fn any(&self) -> &[ByteString] {
        &self.any
    }

    /// Normalized final component
    pub fn final_(&self) -> Option<&ByteString> {
        self.final_.as_ref()
    }

    fn add_substring_queries(
        &self,
        component: &ByteString,
        index_id: &str,
        key_size: usize,
        queries: &mut Vec<IndexQuery>,
    ) {
        if component.len() < key_size {
            queries.push(IndexQuery::prefix(index_id, component));
            return;
        }
        let grams: BTreeSet<&[u8]> = component.windows(key_size).collect();
        for gram in grams {
            queries.push(IndexQuery::exact(index_id, ByteString::from(gram)));
        }
    }
}

impl Assertion for SubstringAssertion {
    fn matches(&self, normalized_attribute_value: &[u8]) -> ConditionResult {
        ConditionResult::from_bool(matches_substrings(
            normalized_attribute_value,
            self.initial.as_deref(),
            &self.any,
            self.final_.as_deref(),
        ))
    }

    fn index_query(&self, options: &IndexingOptions) -> IndexQuery {
        let key_size = options.substring_key_size.max(1);
        let substring_index = substring_index_id(&self.rule_oid, key_size);
        let mut queries = Vec::new();

        if let Some(initial) = &self.initial {
            // The equality index holds whole values, so a prefix range works there
            if initial.len() > 1 {
                queries.push(IndexQuery::prefix(&self.rule_oid, initial));
            }
            let head = ByteString::from(&initial[..initial.len().min(key_size)]);
            queries.push(IndexQuery::prefix(&substring_index, &head));
        }
        for component in self.any.iter().chain(self.final_.iter()) {
            self.add_substring_queries(component, &substring_index, key_size, &mut queries);
        }

        if queries.is_empty() {
            IndexQuery::MatchAll
        } else {
            IndexQuery::Intersection(queries)
        }
    }
}
