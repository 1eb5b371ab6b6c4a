// 🏢 Entity Classifier - Company or Person?
//
// A company keyword anywhere in the fragment wins outright:
// "SMITH FAMILY TRUST" is a Company even though SMITH is a plausible surname.

use crate::affixes::AffixTable;
use crate::error::{ResolveError, Result};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Company,

    /// Not yet parsed; the person parser decides first/middle/last
    Person,

    /// Digits outside any affix and no company keyword: never a person name
    DigitBearing,
}

#[derive(Debug, Clone)]
pub struct EntityClassifier {
    /// Bounded alternation of every company keyword, None when the list is empty
    pattern: Option<Regex>,
}

impl EntityClassifier {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let mut keywords: Vec<&String> = keywords.iter().filter(|k| !k.trim().is_empty()).collect();
        keywords.sort_by(|a, b| b.len().cmp(&a.len()));

        if keywords.is_empty() {
            return Ok(EntityClassifier { pattern: None });
        }

        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();

        // Explicit letter/number boundaries so "L.L.C." and "INC." match too
        let pattern = format!(
            r"(?i)(?:^|[^\p{{L}}\p{{N}}])(?:{})(?:$|[^\p{{L}}\p{{N}}])",
            alternatives.join("|")
        );

        let pattern = Regex::new(&pattern).map_err(|e| {
            ResolveError::Config(format!("invalid company keyword table: {}", e))
        })?;

        Ok(EntityClassifier { pattern: Some(pattern) })
    }

    pub fn is_company(&self, fragment: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(false, |p| p.is_match(fragment))
    }

    /// Classify one fragment. Affix tokens like "3RD" do not count as digits.
    pub fn classify(&self, fragment: &str, affixes: &AffixTable) -> Classification {
        if self.is_company(fragment) {
            return Classification::Company;
        }

        let has_digits = fragment
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty() && !affixes.is_affix(t))
            .any(|t| t.chars().any(|c| c.is_ascii_digit()));

        if has_digits {
            Classification::DigitBearing
        } else {
            Classification::Person
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
