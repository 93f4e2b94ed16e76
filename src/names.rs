//! Object identifier and name validation
//!
//! Schema elements are identified by a numeric OID and optionally by a list
//! of `descr` names (RFC 4512 section 1.4). Names are compared
//! case-insensitively.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_OID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*$").unwrap());

static KEYSTRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());

// Tolerated when malformed names are allowed
static LENIENT_KEYSTRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.;-]*$").unwrap());

static EXTENSION_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^X-[A-Za-z_-]+$").unwrap());

/// Check if a string is a dotted-decimal numeric OID
pub fn is_numeric_oid(oid: &str) -> bool {
    NUMERIC_OID.is_match(oid)
}

/// Check if a string is a valid `descr` keystring
pub fn is_valid_descr(name: &str, allow_malformed: bool) -> bool {
    if allow_malformed {
        LENIENT_KEYSTRING.is_match(name)
    } else {
        KEYSTRING.is_match(name)
    }
}

/// Check if a string is a valid extension property key (`X-...`)
pub fn is_valid_extension_key(key: &str) -> bool {
    EXTENSION_KEY.is_match(key)
}

/// Check if a string is either a numeric OID or a `descr`
pub fn is_valid_oid(oid: &str, allow_malformed: bool) -> bool {
    is_numeric_oid(oid) || is_valid_descr(oid, allow_malformed)
}

/// Validate an element OID supplied to a builder
pub fn validate_oid(oid: &str) -> Result<()> {
    if oid.trim().is_empty() {
        Err(Error::InvalidArgument("OID must not be empty".to_string()))
    } else {
        Ok(())
    }
}

/// Normalize a name or OID for case-insensitive lookups
pub fn to_lower_case(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Strip a trailing `-oid` suffix that some definitions use for descriptive OIDs
pub fn strip_oid_suffix(oid: &str) -> &str {
    match oid.len().checked_sub(4).and_then(|at| oid.get(at..).map(|tail| (at, tail))) {
        Some((at, tail)) if at > 0 && tail.eq_ignore_ascii_case("-oid") => &oid[..at],
        _ => oid,
    }
}
