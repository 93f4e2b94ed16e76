//! Immutable byte sequences
//!
//! Normalized values and index keys are [`ByteString`]s. They order by
//! unsigned lexicographic byte comparison, which is the only comparator the
//! matching rules rely on.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// An owned sequence of bytes ordered lexicographically
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteString(Vec<u8>);

impl ByteString {
    /// Create an empty byte string
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Wrap a vector of bytes
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the underlying vector
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Decode the bytes as UTF-8 if possible
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Render as lower-case hexadecimal
    pub fn to_hex_string(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Returns true if this byte string starts with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }

    /// The smallest byte string greater than every string prefixed by `self`.
    ///
    /// Trailing `0xff` bytes are dropped and the last remaining byte is
    /// incremented. Returns an empty byte string (an unbounded upper limit)
    /// when every byte is `0xff` or `self` is empty.
    pub fn prefix_successor(&self) -> ByteString {
        let mut bytes = self.0.clone();
        while let Some(last) = bytes.pop() {
            if last != 0xff {
                bytes.push(last + 1);
                return ByteString(bytes);
            }
        }
        ByteString::empty()
    }
}

impl Deref for ByteString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Some(s) if !s.chars().any(|c| c.is_control()) => write!(f, "{}", s),
            _ => write!(f, "#{}", self.to_hex_string()),
        }
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteString({})", self)
    }
}

impl Serialize for ByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
