//! Byte-sequence normalizers
//!
//! Pure functions mapping raw values to the canonical byte sequences that
//! matching rules compare and index.

pub mod certificate;
pub mod dn;
pub mod integer;
pub mod strings;
pub mod time;

pub use certificate::{parse_gser_assertion, read_certificate_identity, CertificateIdentity};
pub use dn::{normalize_dn, Ava, Dn, Rdn};
pub use integer::{encode_integer, normalize_integer, parse_integer};
pub use strings::{prepare_string, CaseFolding, Trim};
pub use time::{normalize_generalized_time, normalize_utc_time, GeneralizedTime};
