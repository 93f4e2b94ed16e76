//! Index key generation
//!
//! An [`Indexer`] derives the keys stored for an attribute value in one
//! index. Keys are collected into a set: duplicates collapse and order is
//! the byte order of the keys.

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::Normalizer;
use crate::schema::Schema;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Derives index keys from attribute values
pub trait Indexer: fmt::Debug + Send + Sync {
    /// Identifier of the index this indexer feeds
    fn index_id(&self) -> &str;

    /// Add the keys for `value` to `keys`
    fn create_keys(&self, schema: &Schema, value: &[u8], keys: &mut BTreeSet<ByteString>) -> Result<()>;
}

/// Indexes the whole normalized value as a single key
#[derive(Debug, Clone)]
pub struct EqualityIndexer {
    index_id: String,
    normalizer: Arc<dyn Normalizer>,
}

impl EqualityIndexer {
    /// Create an equality indexer
    pub fn new(index_id: impl Into<String>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            index_id: index_id.into(),
            normalizer,
        }
    }
}

impl Indexer for EqualityIndexer {
    fn index_id(&self) -> &str {
        &self.index_id
    }

    fn create_keys(&self, schema: &Schema, value: &[u8], keys: &mut BTreeSet<ByteString>) -> Result<()> {
        keys.insert(self.normalizer.normalize_attribute_value(schema, value)?);
        Ok(())
    }
}

/// Indexes every substring of `key_size` bytes, plus the shorter tail fragments
#[derive(Debug, Clone)]
pub struct SubstringIndexer {
    index_id: String,
    key_size: usize,
    normalizer: Arc<dyn Normalizer>,
}

impl SubstringIndexer {
    /// Create a substring indexer; the index id is `<rule OID>:<key size>`
    pub fn new(rule_oid: &str, key_size: usize, normalizer: Arc<dyn Normalizer>) -> Self {
        let key_size = key_size.max(1);
        Self {
            index_id: substring_index_id(rule_oid, key_size),
            key_size,
            normalizer,
        }
    }

    /// Number of bytes per key
    pub fn key_size(&self) -> usize {
        self.key_size
    }
}

impl Indexer for SubstringIndexer {
    fn index_id(&self) -> &str {
        &self.index_id
    }

    fn create_keys(&self, schema: &Schema, value: &[u8], keys: &mut BTreeSet<ByteString>) -> Result<()> {
        let normalized = self.normalizer.normalize_attribute_value(schema, value)?;
        substring_keys(&normalized, self.key_size, keys);
        Ok(())
    }
}

/// Identifier of the substring index of a rule for a key size
pub fn substring_index_id(rule_oid: &str, key_size: usize) -> String {
    format!("{}:{}", rule_oid, key_size)
}

/// For each start position, the next `key_size` bytes or what remains
pub fn substring_keys(value: &[u8], key_size: usize, keys: &mut BTreeSet<ByteString>) {
    let key_size = key_size.max(1);
    for start in 0..value.len() {
        let end = (start + key_size).min(value.len());
        keys.insert(ByteString::from(&value[start..end]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::rules::OctetStringNormalizer;

    fn keys(value: &str, size: usize) -> Vec<String> {
        let mut set = BTreeSet::new();
        substring_keys(value.as_bytes(), size, &mut set);
        set.into_iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_substring_keys() {
        assert_eq!(keys("ABCDE", 3), vec!["ABC", "BCD", "CDE", "DE", "E"]);
        assert_eq!(keys("AB", 3), vec!["AB", "B"]);
        assert!(keys("", 3).is_empty());
    }

    #[test]
    fn test_substring_keys_deduplicate() {
        assert_eq!(keys("aaaa", 2), vec!["a", "aa"]);
    }

    #[test]
    fn test_substring_index_id() {
        assert_eq!(substring_index_id("2.5.13.4", 6), "2.5.13.4:6");
    }

    #[test]
    fn test_substring_indexer_zero_key_size() {
        let indexer = SubstringIndexer::new("2.5.13.7", 0, Arc::new(OctetStringNormalizer));
        assert_eq!(indexer.key_size(), 1);
        // Same index id as the one substring assertions query
        assert_eq!(indexer.index_id(), "2.5.13.7:1");

        let mut keys = BTreeSet::new();
        indexer.create_keys(&Schema::empty(), b"ab", &mut keys).unwrap();
        assert_eq!(keys.into_iter().map(|k| k.to_string()).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
