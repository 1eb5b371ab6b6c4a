// 🎩 Affix Extractor - Honorific prefixes and trailing suffixes
//
// "DR. JAMES T O'BRIEN JR" → prefix "Dr.", suffix "Jr.", core [JAMES, T, O'BRIEN]
//
// Lookup goes through a normalized token key so "JR", "Jr." and "jr," all hit
// the same canonical entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// AFFIX CLASS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixClass {
    /// Leading title: Mr., Dr., Capt.
    Honorific,

    /// Jr., Sr., II..IV
    Generational,

    /// Credentials: MD, PhD, Esq.
    Professional,

    /// Ret. and similar service-status markers
    Status,
}

impl AffixClass {
    pub fn is_prefix(&self) -> bool {
        matches!(self, AffixClass::Honorific)
    }
}

/// One row of the affix table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixEntry {
    /// Value emitted in `prefix_name` / `suffix_name`
    pub canonical: String,

    pub class: AffixClass,

    /// Spellings that map to the canonical form; may span two tokens ("PH D")
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Normalized lookup key: uppercase, no periods or commas, single spaces
pub fn affix_key(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

// ============================================================================
// EXTRACTION RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AffixExtraction {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Core tokens left for first/middle/last assignment
    pub remaining: Vec<String>,
    /// An affix was present but left in place to keep enough name tokens
    pub starved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixTake {
    pub prefix: Option<String>,
    pub consumed: usize,
    pub starved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuffixTake {
    pub suffix: Option<String>,
    /// Number of tokens consumed from the end
    pub consumed: usize,
    pub starved: bool,
}

// ============================================================================
// AFFIX TABLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct AffixTable {
    prefixes: HashMap<String, String>,
    suffixes: HashMap<String, (String, AffixClass)>,
    priority: Vec<AffixClass>,
}

impl AffixTable {
    pub fn new(entries: &[AffixEntry], priority: &[AffixClass]) -> Self {
        let mut prefixes = HashMap::new();
        let mut suffixes = HashMap::new();

        for entry in entries {
            let keys = std::iter::once(&entry.canonical)
                .chain(entry.aliases.iter())
                .map(|s| affix_key(s))
                .filter(|k| !k.is_empty());

            for key in keys {
                if entry.class.is_prefix() {
                    prefixes.entry(key).or_insert_with(|| entry.canonical.clone());
                } else {
                    suffixes
                        .entry(key)
                        .or_insert_with(|| (entry.canonical.clone(), entry.class));
                }
            }
        }

        AffixTable {
            prefixes,
            suffixes,
            priority: priority.to_vec(),
        }
    }

    /// Canonical honorific for a token, if any
    pub fn lookup_prefix(&self, token: &str) -> Option<&str> {
        self.prefixes.get(&affix_key(token)).map(|s| s.as_str())
    }

    /// Canonical suffix and its class for a token (or two-token run)
    pub fn lookup_suffix(&self, token: &str) -> Option<(&str, AffixClass)> {
        self.suffixes
            .get(&affix_key(token))
            .map(|(canonical, class)| (canonical.as_str(), *class))
    }

    pub fn is_affix(&self, token: &str) -> bool {
        self.lookup_prefix(token).is_some() || self.lookup_suffix(token).is_some()
    }

    /// Lower rank wins. Classes missing from the priority list rank last.
    fn rank(&self, class: AffixClass) -> usize {
        self.priority
            .iter()
            .position(|c| *c == class)
            .unwrap_or(self.priority.len())
    }

    /// Consume a leading honorific, keeping at least `min_remaining` tokens
    pub fn take_prefix(&self, tokens: &[String], min_remaining: usize) -> PrefixTake {
        let found = tokens.first().and_then(|t| self.lookup_prefix(t));

        match found {
            Some(canonical) if tokens.len() - 1 >= min_remaining => PrefixTake {
                prefix: Some(canonical.to_string()),
                consumed: 1,
                starved: false,
            },
            Some(_) => PrefixTake { prefix: None, consumed: 0, starved: true },
            None => PrefixTake { prefix: None, consumed: 0, starved: false },
        }
    }

    /// Consume the trailing suffix run, keeping at least `min_remaining` tokens.
    ///
    /// Every suffix in the run is stripped from the core; the one with the best
    /// priority rank becomes the reported suffix ("SMITH JR MD" → "Jr.").
    pub fn take_suffix(&self, tokens: &[String], min_remaining: usize) -> SuffixTake {
        let mut end = tokens.len();
        let mut found: Vec<(&str, AffixClass)> = Vec::new();
        let mut starved = false;

        loop {
            let two = if end >= 2 {
                self.lookup_suffix(&format!("{} {}", tokens[end - 2], tokens[end - 1]))
                    .map(|hit| (hit, 2))
            } else {
                None
            };
            let candidate = two.or_else(|| {
                if end >= 1 {
                    self.lookup_suffix(&tokens[end - 1]).map(|hit| (hit, 1))
                } else {
                    None
                }
            });

            let Some((hit, width)) = candidate else { break };

            if end - width < min_remaining {
                starved = true;
                break;
            }

            found.push(hit);
            end -= width;
        }

        // Stable min: on equal rank the suffix closest to the name wins
        let suffix = found
            .iter()
            .rev()
            .min_by_key(|(_, class)| self.rank(*class))
            .map(|(canonical, _)| canonical.to_string());

        SuffixTake {
            suffix,
            consumed: tokens.len() - end,
            starved,
        }
    }

    /// Pick the better-ranked of two canonical suffixes; `a` wins ties
    pub fn preferred_suffix(&self, a: Option<String>, b: Option<String>) -> Option<String> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let rank_of = |s: &str| {
                    self.lookup_suffix(s)
                        .map(|(_, class)| self.rank(class))
                        .unwrap_or(usize::MAX)
                };
                if rank_of(&b) < rank_of(&a) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, b) => a.or(b),
        }
    }

    /// Prefix from the front, then suffix from the back of what is left
    pub fn extract(&self, tokens: &[String], min_remaining: usize) -> AffixExtraction {
        let prefix = self.take_prefix(tokens, min_remaining);
        let rest = &tokens[prefix.consumed..];
        let suffix = self.take_suffix(rest, min_remaining);

        AffixExtraction {
            prefix: prefix.prefix,
            suffix: suffix.suffix,
            remaining: rest[..rest.len() - suffix.consumed].to_vec(),
            starved: prefix.starved || suffix.starved,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
