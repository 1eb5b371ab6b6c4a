// ⏰ Timeline Assembler - Owners grouped by when they held the parcel
//
// Key order is part of the output contract:
//   1999-01-01, 2020-05-01, unknown_date_1, unknown_date_2, current
//
// DateKey derives Ord in exactly that order, so a BTreeMap keeps it for free.

use crate::deduplication::Deduplicator;
use crate::entities::ParsedOwner;
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const UNKNOWN_PREFIX: &str = "unknown_date_";
const CURRENT_LABEL: &str = "current";

// ============================================================================
// DATE KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateKey {
    /// A sale with a known date
    Date(NaiveDate),

    /// `unknown_date_N`, N >= 1
    Unknown(u32),

    /// Present owners, always last
    Current,
}

impl DateKey {
    /// Parse a bucket label: ISO date, US date, `unknown_date_N` or `current`
    pub fn parse(label: &str) -> Option<DateKey> {
        let label = label.trim();

        if label.eq_ignore_ascii_case(CURRENT_LABEL) {
            return Some(DateKey::Current);
        }

        if let Some(n) = label.strip_prefix(UNKNOWN_PREFIX) {
            return n.parse::<u32>().ok().filter(|n| *n > 0).map(DateKey::Unknown);
        }

        if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
            return Some(DateKey::Date(date));
        }

        if let Ok(date) = NaiveDate::parse_from_str(label, "%m/%d/%Y") {
            return Some(DateKey::Date(date));
        }

        None
    }

    pub fn is_current(&self) -> bool {
        matches!(self, DateKey::Current)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateKey::Unknown(n) => write!(f, "{}{}", UNKNOWN_PREFIX, n),
            DateKey::Current => f.write_str(CURRENT_LABEL),
        }
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// OWNER TIMELINE
// ============================================================================

/// Finished `owners_by_date` map
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerTimeline {
    buckets: BTreeMap<DateKey, Vec<ParsedOwner>>,
}

impl OwnerTimeline {
    pub fn get(&self, key: &DateKey) -> Option<&[ParsedOwner]> {
        self.buckets.get(key).map(|owners| owners.as_slice())
    }

    pub fn current(&self) -> &[ParsedOwner] {
        self.get(&DateKey::Current).unwrap_or(&[])
    }

    /// Keys in output order
    pub fn keys(&self) -> impl Iterator<Item = &DateKey> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &Vec<ParsedOwner>)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every owner across all buckets
    pub fn owner_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl Serialize for OwnerTimeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, owners) in &self.buckets {
            map.serialize_entry(key, owners)?;
        }
        map.end()
    }
}

// ============================================================================
// TIMELINE ASSEMBLER
// ============================================================================

/// Collects already-parsed owners per bucket, deduping within each bucket
#[derive(Debug, Default)]
pub struct TimelineAssembler {
    buckets: BTreeMap<DateKey, Deduplicator>,

    /// Unknown-bucket numbers taken by explicit labels or earlier synthesis
    used_unknown: BTreeSet<u32>,
}

impl TimelineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an explicit `unknown_date_N` label before any number is synthesized
    pub fn reserve_label(&mut self, label: &str) {
        if let Some(DateKey::Unknown(n)) = DateKey::parse(label) {
            self.used_unknown.insert(n);
        }
    }

    /// Smallest unknown number not yet used
    fn next_unknown(&mut self) -> DateKey {
        let mut n = 1;
        while self.used_unknown.contains(&n) {
            n += 1;
        }
        self.used_unknown.insert(n);
        DateKey::Unknown(n)
    }

    fn add(&mut self, key: DateKey, owners: Vec<ParsedOwner>) {
        if let DateKey::Unknown(n) = key {
            self.used_unknown.insert(n);
        }
        self.buckets.entry(key).or_default().extend(owners);
    }

    pub fn add_current(&mut self, owners: Vec<ParsedOwner>) {
        self.add(DateKey::Current, owners);
    }

    /// Add one sale's grantees. A missing or unparseable date gets its own
    /// unknown bucket, but only when there is someone to put in it.
    pub fn add_sale(&mut self, date: Option<&str>, owners: Vec<ParsedOwner>) -> Option<DateKey> {
        let date = date.map(str::trim).filter(|d| !d.is_empty());

        let key = match date.map(|d| (d, DateKey::parse(d))) {
            Some((_, Some(key))) => key,
            Some((raw, None)) => {
                if owners.is_empty() {
                    return None;
                }
                let key = self.next_unknown();
                tracing::warn!(date = raw, bucket = %key, "unrecognized sale date, using unknown bucket");
                key
            }
            None => {
                if owners.is_empty() {
                    return None;
                }
                self.next_unknown()
            }
        };

        self.add(key, owners);
        Some(key)
    }

    /// Prior owners with no sale date of their own go into a fresh unknown bucket
    pub fn add_leftovers(&mut self, owners: Vec<ParsedOwner>) -> Option<DateKey> {
        if owners.is_empty() {
            return None;
        }

        let key = self.next_unknown();
        self.add(key, owners);
        Some(key)
    }

    /// Whether any bucket already holds an owner with this canonical key
    pub fn contains_key(&self, canonical_key: &str) -> bool {
        self.buckets.values().any(|b| b.contains_key(canonical_key))
    }

    /// Drop empty buckets except `current`, which is always emitted
    pub fn finish(self) -> OwnerTimeline {
        let mut buckets: BTreeMap<DateKey, Vec<ParsedOwner>> = BTreeMap::new();

        for (key, dedup) in self.buckets {
            if dedup.is_empty() && !key.is_current() {
                continue;
            }
            tracing::debug!(bucket = %key, owners = dedup.len(), merged = dedup.merged(), "assembled bucket");
            buckets.insert(key, dedup.into_owners());
        }

        buckets.entry(DateKey::Current).or_default();

        OwnerTimeline { buckets }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Company, Person};

    fn person(first: &str, last: &str) -> ParsedOwner {
        Person::new(first, last).unwrap().into()
    }

    fn labels(timeline: &OwnerTimeline) -> Vec<String> {
        timeline.keys().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_date_key_parse() {
        assert_eq!(
            DateKey::parse("2020-05-01"),
            Some(DateKey::Date(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()))
        );
        assert_eq!(
            DateKey::parse("05/01/2020"),
            Some(DateKey::Date(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()))
        );
        assert_eq!(DateKey::parse("unknown_date_3"), Some(DateKey::Unknown(3)));
        assert_eq!(DateKey::parse("CURRENT"), Some(DateKey::Current));
        assert_eq!(DateKey::parse("unknown_date_0"), None);
        assert_eq!(DateKey::parse("2020-13-45"), None);
        assert_eq!(DateKey::parse("sometime"), None);
    }

    #[test]
    fn test_key_order_dates_then_unknown_then_current() {
        let mut assembler = TimelineAssembler::new();
        assembler.add_current(vec![person("Jane", "Doe")]);
        assembler.add_sale(Some("2020-05-01"), vec![person("John", "Smith")]);
        assembler.add_sale(Some("1999-01-01"), vec![person("Mary", "Jones")]);
        assembler.add_leftovers(vec![person("Old", "Owner")]);

        let timeline = assembler.finish();
        assert_eq!(
            labels(&timeline),
            vec!["1999-01-01", "2020-05-01", "unknown_date_1", "current"]
        );

        // Serialization streams keys in the same order
        let json = serde_json::to_string(&timeline).unwrap();
        let positions: Vec<usize> = ["1999-01-01", "2020-05-01", "unknown_date_1", "current"]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_buckets_omitted_except_current() {
        let mut assembler = TimelineAssembler::new();
        assembler.add_sale(Some("2001-02-03"), vec![]);
        assembler.add_sale(None, vec![]);
        assert_eq!(assembler.add_leftovers(vec![]), None);

        let timeline = assembler.finish();
        assert_eq!(labels(&timeline), vec!["current"]);
        assert!(timeline.current().is_empty());

        let json = serde_json::to_string(&timeline).unwrap();
        assert_eq!(json, r#"{"current":[]}"#);
    }

    #[test]
    fn test_unknown_numbers_skip_explicit_labels() {
        let mut assembler = TimelineAssembler::new();
        assembler.reserve_label("unknown_date_1");

        let null_sale = assembler.add_sale(None, vec![person("A", "Buyer")]);
        let labeled = assembler.add_sale(Some("unknown_date_1"), vec![person("B", "Buyer")]);
        let garbled = assembler.add_sale(Some("sometime in 1990"), vec![person("C", "Buyer")]);
        let leftovers = assembler.add_leftovers(vec![person("D", "Seller")]);

        assert_eq!(labeled, Some(DateKey::Unknown(1)));
        assert_eq!(null_sale, Some(DateKey::Unknown(2)));
        assert_eq!(garbled, Some(DateKey::Unknown(3)));
        assert_eq!(leftovers, Some(DateKey::Unknown(4)));
    }

    #[test]
    fn test_same_date_merges_and_dedups() {
        let mut assembler = TimelineAssembler::new();
        assembler.add_sale(Some("2010-06-30"), vec![person("John", "Smith")]);
        assembler.add_sale(
            Some("2010-06-30"),
            vec![person("John", "Smith"), Company::new("ACME LLC").unwrap().into()],
        );

        assert!(assembler.contains_key("company:acme llc"));
        assert!(!assembler.contains_key("company:other llc"));

        let timeline = assembler.finish();
        let key = DateKey::parse("2010-06-30").unwrap();
        assert_eq!(timeline.get(&key).unwrap().len(), 2);
        assert_eq!(timeline.owner_count(), 2);

        let sizes: Vec<(String, usize)> = timeline
            .iter()
            .map(|(key, owners)| (key.to_string(), owners.len()))
            .collect();
        assert_eq!(
            sizes,
            vec![("2010-06-30".to_string(), 2), ("current".to_string(), 0)]
        );
    }

    #[test]
    fn test_dedup_is_per_bucket() {
        let mut assembler = TimelineAssembler::new();
        assembler.add_sale(Some("2010-06-30"), vec![person("John", "Smith")]);
        assembler.add_current(vec![person("John", "Smith")]);

        let timeline = assembler.finish();
        assert_eq!(timeline.owner_count(), 2);
        assert_eq!(timeline.len(), 2);
    }
}
