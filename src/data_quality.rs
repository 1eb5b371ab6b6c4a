// ✅ Data Quality - Audit trail of fragments that could not be resolved
//
// Every rejection point in the pipeline reports here instead of failing:
// the engine is total over its input, and a caller that wants strict
// behavior turns a non-empty list into an error one layer up.

use crate::normalizer::collapse_whitespace;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// REASON CODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Raw string had content but nothing survived cleaning ("ET AL")
    EmptyAfterClean,

    /// Splitting left no fragment with any letters or digits
    UnparseableOrEmpty,

    /// Comma form with nothing usable before the comma
    PersonMissingLastName,

    /// A required name part came out blank
    PersonMissingFirstOrLast,

    /// Fewer than two name tokens and no carried surname
    InsufficientNameParts,

    /// Name part failed the plausibility check, or an affix had to be left in place
    AmbiguousOrIncompletePersonName,

    /// Digits in a fragment with no company keyword
    NameContainsDigits,

    /// Digit-bearing fragment emitted as a Company under the company digit policy
    CompanyFallback,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::EmptyAfterClean => "empty_after_clean",
            ReasonCode::UnparseableOrEmpty => "unparseable_or_empty",
            ReasonCode::PersonMissingLastName => "person_missing_last_name",
            ReasonCode::PersonMissingFirstOrLast => "person_missing_first_or_last",
            ReasonCode::InsufficientNameParts => "insufficient_name_parts",
            ReasonCode::AmbiguousOrIncompletePersonName => "ambiguous_or_incomplete_person_name",
            ReasonCode::NameContainsDigits => "name_contains_digits",
            ReasonCode::CompanyFallback => "company_fallback",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// INVALID FRAGMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidFragment {
    pub raw: String,
    pub reason: ReasonCode,
}

impl InvalidFragment {
    pub fn new(raw: impl Into<String>, reason: ReasonCode) -> Self {
        InvalidFragment {
            raw: raw.into(),
            reason,
        }
    }

    /// Whitespace-collapsed, lowercase form used for dedup
    fn dedup_key(&self) -> (String, ReasonCode) {
        (collapse_whitespace(&self.raw).to_lowercase(), self.reason)
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Append-only sink shared by every stage of one document's resolution
#[derive(Debug, Default)]
pub struct InvalidCollector {
    entries: Vec<InvalidFragment>,
}

impl InvalidCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, raw: impl Into<String>, reason: ReasonCode) {
        let fragment = InvalidFragment::new(raw, reason);
        tracing::debug!(raw = %fragment.raw, reason = %reason, "rejected owner fragment");
        self.entries.push(fragment);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[InvalidFragment] {
        &self.entries
    }

    /// Deduplicate by (normalized raw, reason); the first occurrence keeps its casing
    pub fn finish(self) -> Vec<InvalidFragment> {
        let mut seen = HashSet::new();
        self.entries
            .into_iter()
            .filter(|f| seen.insert(f.dedup_key()))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_serialize_snake_case() {
        let fragment = InvalidFragment::new("X", ReasonCode::InsufficientNameParts);
        let json = serde_json::to_string(&fragment).unwrap();
        assert_eq!(json, r#"{"raw":"X","reason":"insufficient_name_parts"}"#);
        assert_eq!(ReasonCode::CompanyFallback.to_string(), "company_fallback");
    }

    #[test]
    fn test_finish_dedups_keeping_first_casing() {
        let mut collector = InvalidCollector::new();
        collector.record("Smith", ReasonCode::InsufficientNameParts);
        collector.record("  SMITH ", ReasonCode::InsufficientNameParts);
        collector.record("SMITH", ReasonCode::NameContainsDigits);

        assert_eq!(collector.len(), 3);

        let finished = collector.finish();
        assert_eq!(finished.len(), 2);
        assert_eq!(finished[0].raw, "Smith");
        assert_eq!(finished[0].reason, ReasonCode::InsufficientNameParts);
        assert_eq!(finished[1].reason, ReasonCode::NameContainsDigits);
    }

    #[test]
    fn test_empty_collector() {
        let collector = InvalidCollector::new();
        assert!(collector.is_empty());
        assert!(collector.finish().is_empty());
    }
}
