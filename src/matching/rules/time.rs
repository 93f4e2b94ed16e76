//! Time based matching rules
//!
//! Besides the plain Generalized Time and UTC Time normalizers this module
//! provides the relative time ordering rules, whose assertions are offsets
//! from the current time, and the partial date and time rule, whose
//! assertions constrain individual calendar fields.

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use crate::matching::assertion::{Assertion, ConditionResult, OrderingAssertion, OrderingOp};
use crate::matching::indexer::{EqualityIndexer, Indexer};
use crate::matching::query::IndexQuery;
use crate::matching::{MatchingRuleImpl, MatchingRuleKind, Normalizer};
use crate::normalizers::time::{normalize_generalized_time, normalize_utc_time, GeneralizedTime};
use crate::options::IndexingOptions;
use crate::schema::constants::{MR_PARTIAL_DATE_AND_TIME_OID, OMR_GENERALIZED_TIME_OID};
use crate::schema::Schema;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Generalized Time to its canonical UTC form
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizedTimeNormalizer;

impl Normalizer for GeneralizedTimeNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_generalized_time(value)
    }
}

/// UTC Time to the canonical Generalized Time form
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcTimeNormalizer;

impl Normalizer for UtcTimeNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_utc_time(value)
    }
}

// ============================================================================
// Relative time
// ============================================================================

/// Source of the current time
pub trait Clock: fmt::Debug + Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn relative_time_error(value: &[u8], reason: &str) -> Error {
    Error::Decode(
        DecodeError::new("invalid relative time assertion")
            .with_value(value)
            .with_reason(reason),
    )
}

/// Parse `[+|-]<n><s|m|h|d|w>` into signed milliseconds
pub fn parse_relative_time(value: &[u8]) -> Result<i64> {
    let (negative, rest) = match value.first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let (unit, digits) = rest
        .split_last()
        .ok_or_else(|| relative_time_error(value, "empty value"))?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(relative_time_error(value, "expected a number followed by a unit"));
    }
    let unit_ms: i64 = match unit {
        b's' => 1_000,
        b'm' => 60_000,
        b'h' => 3_600_000,
        b'd' => 86_400_000,
        b'w' => 604_800_000,
        _ => return Err(relative_time_error(value, "unit must be one of s, m, h, d or w")),
    };
    let amount = std::str::from_utf8(digits)
        .ok()
        .and_then(|d| d.parse::<i64>().ok())
        .and_then(|n| n.checked_mul(unit_ms))
        .ok_or_else(|| relative_time_error(value, "offset too large"))?;
    Ok(if negative { -amount } else { amount })
}

/// `attribute > now + offset` or `attribute < now + offset`.
///
/// The boundary is fixed when the assertion is created. Assertions query the
/// generalizedTimeOrderingMatch index.
#[derive(Debug, Clone)]
pub struct RelativeTimeOrderingRule {
    op: OrderingOp,
    clock: Arc<dyn Clock>,
}

impl RelativeTimeOrderingRule {
    /// Values after the boundary match
    pub fn greater_than(clock: Arc<dyn Clock>) -> Self {
        Self {
            op: OrderingOp::GreaterThan,
            clock,
        }
    }

    /// Values before the boundary match
    pub fn less_than(clock: Arc<dyn Clock>) -> Self {
        Self {
            op: OrderingOp::LessThan,
            clock,
        }
    }
}

impl MatchingRuleImpl for RelativeTimeOrderingRule {
    fn kind(&self) -> MatchingRuleKind {
        MatchingRuleKind::Ordering
    }

    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_generalized_time(value)
    }

    fn get_assertion(&self, _schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        let offset = parse_relative_time(value)?;
        let boundary = self
            .clock
            .now()
            .checked_add_signed(Duration::milliseconds(offset))
            .filter(|t| (0..=9999).contains(&t.year()))
            .ok_or_else(|| relative_time_error(value, "boundary outside the supported time range"))?;
        let bound = GeneralizedTime::from_datetime(boundary).normalized();
        Ok(Box::new(OrderingAssertion::new(OMR_GENERALIZED_TIME_OID, bound, self.op)))
    }

    fn create_indexers(&self, _options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        vec![Box::new(EqualityIndexer::new(
            OMR_GENERALIZED_TIME_OID,
            Arc::new(GeneralizedTimeNormalizer),
        ))]
    }
}

// ============================================================================
// Partial date and time
// ============================================================================

const FIELD_TAGS: [u8; 6] = [b'Y', b'M', b'D', b'h', b'm', b's'];

fn partial_time_error(value: &[u8], reason: impl Into<String>) -> Error {
    Error::Decode(
        DecodeError::new("invalid partial date and time assertion")
            .with_value(value)
            .with_reason(reason),
    )
}

fn field_key(tag: u8, value: u32) -> ByteString {
    let mut key = vec![tag];
    if tag == b'Y' {
        key.extend_from_slice(&(value as u16).to_be_bytes());
    } else {
        key.push(value as u8);
    }
    ByteString::from_vec(key)
}

fn days_in_month(year: Option<u32>, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => match year {
            // February 29 is possible unless a non-leap year is given
            None => 29,
            Some(y) => {
                if NaiveDate::from_ymd_opt(y as i32, 2, 29).is_some() {
                    29
                } else {
                    28
                }
            }
        },
        _ => 31,
    }
}

/// Calendar fields required by a partial date and time assertion, in
/// the order year, month, day, hour, minute, second
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialDateAndTimeAssertion {
    fields: [Option<u32>; 6],
}

impl PartialDateAndTimeAssertion {
    /// Parse components such as `2012Y03M15D` in any order
    pub fn parse(value: &[u8]) -> Result<Self> {
        let mut fields = [None; 6];
        let mut pos = 0;
        while pos < value.len() {
            let start = pos;
            while pos < value.len() && value[pos].is_ascii_digit() {
                pos += 1;
            }
            if start == pos || pos - start > 4 {
                return Err(partial_time_error(value, "expected a number of at most four digits"));
            }
            let number = value[start..pos]
                .iter()
                .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
            let tag = *value
                .get(pos)
                .ok_or_else(|| partial_time_error(value, "missing unit after number"))?;
            let index = FIELD_TAGS
                .iter()
                .position(|t| *t == tag)
                .ok_or_else(|| partial_time_error(value, format!("unknown unit '{}'", tag as char)))?;
            if fields[index].is_some() {
                return Err(partial_time_error(value, format!("duplicate unit '{}'", tag as char)));
            }
            fields[index] = Some(number);
            pos += 1;
        }
        if fields.iter().all(Option::is_none) {
            return Err(partial_time_error(value, "no components"));
        }

        let [year, month, day, hour, minute, second] = fields;
        let check = |name: &str, field: Option<u32>, min: u32, max: u32| match field {
            Some(n) if n < min || n > max => Err(partial_time_error(
                value,
                format!("{} {} out of range {}..={}", name, n, min, max),
            )),
            _ => Ok(()),
        };
        check("month", month, 1, 12)?;
        check("hour", hour, 0, 23)?;
        check("minute", minute, 0, 59)?;
        check("second", second, 0, 59)?;
        let max_day = month.map_or(31, |m| days_in_month(year, m));
        check("day", day, 1, max_day)?;

        Ok(Self { fields })
    }

    /// The required year
    pub fn year(&self) -> Option<u32> {
        self.fields[0]
    }

    /// The required month
    pub fn month(&self) -> Option<u32> {
        self.fields[1]
    }

    /// The required day
    pub fn day(&self) -> Option<u32> {
        self.fields[2]
    }
}

fn time_fields(time: &GeneralizedTime) -> [u32; 6] {
    [
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second(),
    ]
}

impl Assertion for PartialDateAndTimeAssertion {
    fn matches(&self, normalized_attribute_value: &[u8]) -> ConditionResult {
        let time = match GeneralizedTime::from_normalized(normalized_attribute_value) {
            Ok(time) => time,
            Err(_) => return ConditionResult::Undefined,
        };
        let actual = time_fields(&time);
        ConditionResult::from_bool(
            self.fields
                .iter()
                .zip(actual.iter())
                .all(|(expected, actual)| expected.map_or(true, |e| e == *actual)),
        )
    }

    fn index_query(&self, _options: &IndexingOptions) -> IndexQuery {
        IndexQuery::Intersection(
            self.fields
                .iter()
                .zip(FIELD_TAGS.iter())
                .filter_map(|(field, tag)| {
                    field.map(|n| IndexQuery::exact(MR_PARTIAL_DATE_AND_TIME_OID, field_key(*tag, n)))
                })
                .collect(),
        )
    }
}

/// Indexes each calendar field of a time value as a tagged key
#[derive(Debug, Clone, Default)]
pub struct PartialDateAndTimeIndexer;

impl Indexer for PartialDateAndTimeIndexer {
    fn index_id(&self) -> &str {
        MR_PARTIAL_DATE_AND_TIME_OID
    }

    fn create_keys(&self, _schema: &Schema, value: &[u8], keys: &mut BTreeSet<ByteString>) -> Result<()> {
        let time = GeneralizedTime::parse(value)?;
        for (tag, n) in FIELD_TAGS.iter().zip(time_fields(&time).iter()) {
            keys.insert(field_key(*tag, *n));
        }
        Ok(())
    }
}

/// Matches time values whose calendar fields equal the asserted ones
#[derive(Debug, Clone, Default)]
pub struct PartialDateAndTimeRule;

impl PartialDateAndTimeRule {
    /// Create the rule
    pub fn new() -> Self {
        Self
    }
}

impl MatchingRuleImpl for PartialDateAndTimeRule {
    fn kind(&self) -> MatchingRuleKind {
        MatchingRuleKind::Equality
    }

    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        normalize_generalized_time(value)
    }

    fn get_assertion(&self, _schema: &Schema, value: &[u8]) -> Result<Box<dyn Assertion>> {
        Ok(Box::new(PartialDateAndTimeAssertion::parse(value)?))
    }

    fn create_indexers(&self, _options: &IndexingOptions) -> Vec<Box<dyn Indexer>> {
        vec![Box::new(PartialDateAndTimeIndexer)]
    }
}
