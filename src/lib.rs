//! # ldapschema
//!
//! An LDAP schema model with the matching rule engine a directory server
//! needs to compare, order and index attribute values.
//!
//! ## Features
//!
//! - Immutable, cheaply shared [`Schema`] snapshots built by a
//!   [`SchemaBuilder`] with order-independent reference resolution
//! - Core syntaxes, matching rules, attribute types and object classes
//! - Equality, ordering, substring and approximate matching rules producing
//!   three-valued [`ConditionResult`]s
//! - Index key generation and storage independent index queries
//! - Order-preserving encodings of integers, times and UUIDs
//!
//! ## Example
//!
//! ```rust
//! use ldapschema::{ConditionResult, Schema};
//!
//! let schema = Schema::core();
//! let cn = schema.get_attribute_type("cn").unwrap();
//! let rule = cn.equality_matching_rule();
//! let assertion = rule.get_assertion(&schema, b"  John   SMITH ").unwrap();
//! assert_eq!(rule.evaluate(&schema, assertion.as_ref(), b"john smith"), ConditionResult::True);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bytes;
pub mod dump;
pub mod error;
pub mod matching;
pub mod names;
pub mod normalizers;
pub mod options;
pub mod schema;

// Re-exports for convenience
pub use bytes::ByteString;
pub use error::{DecodeError, Error, Result};
pub use matching::{Assertion, ConditionResult, IndexQuery, IndexQueryBuilder, IndexQueryFactory, Indexer};
pub use options::{IndexingOptions, SchemaOptions};
pub use schema::{AttributeType, MatchingRule, ObjectClass, OidSchemaElement, Schema, SchemaBuilder, SchemaElement, Syntax};

/// Version of the ldapschema library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
