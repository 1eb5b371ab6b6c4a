// ✂️ Composite Splitter - one raw string, many parties
//
// "DOE JANE & SMITH MARY"       → ["DOE JANE", "SMITH MARY"]
// "SMITH, JOHN ROBERT"          → ["SMITH, JOHN ROBERT"]      (LAST, FIRST kept whole)
// "SMITH, JOHN, JONES, MARY"    → ["SMITH, JOHN", "JONES, MARY"]
// "JOHNSON & JOHNSON LLC"       → ["JOHNSON & JOHNSON LLC"]   (lone token glued to company)
// "SMITH BROTHERS AND SONS INC" → ["SMITH BROTHERS AND SONS INC"]

use crate::affixes::AffixTable;
use crate::classifier::EntityClassifier;
use crate::normalizer::is_stray_punct;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&|\bAND\b").unwrap());

static SEPARATORS_WITH_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&|/|\bAND\b").unwrap());

/// Largest given-name run ("FIRST MIDDLE MIDDLE") allowed after "LAST,"
const MAX_GIVEN_TOKENS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub fragments: Vec<String>,

    /// Nothing usable came out of splitting; the whole string was put back
    pub reinstated: bool,
}

#[derive(Debug, Clone)]
pub struct CompositeSplitter {
    split_on_slash: bool,
    particles: HashSet<String>,
}

impl CompositeSplitter {
    pub fn new(split_on_slash: bool, particles: &[String]) -> Self {
        CompositeSplitter {
            split_on_slash,
            particles: particles.iter().map(|p| p.trim().to_uppercase()).collect(),
        }
    }

    pub fn split(
        &self,
        text: &str,
        classifier: &EntityClassifier,
        affixes: &AffixTable,
    ) -> SplitResult {
        let text = text.trim();
        let mut fragments = Vec::new();

        for part in self.party_spans(text, classifier) {
            self.split_commas(part, classifier, affixes, &mut fragments);
        }

        let fragments: Vec<String> = fragments
            .into_iter()
            .map(|f| f.trim_matches(is_stray_punct).to_string())
            .filter(|f| f.chars().any(|c| c.is_alphanumeric()))
            .collect();

        if fragments.is_empty() && !text.is_empty() {
            return SplitResult {
                fragments: vec![text.to_string()],
                reinstated: true,
            };
        }

        SplitResult {
            fragments,
            reinstated: false,
        }
    }

    /// Split on "&", "AND" (and "/"). A piece is glued onto a following
    /// company when it is a lone token ("JOHNSON & JOHNSON LLC") or when the
    /// two are joined by the word AND ("SMITH BROTHERS AND SONS INC").
    fn party_spans<'t>(&self, text: &'t str, classifier: &EntityClassifier) -> Vec<&'t str> {
        let separators = if self.split_on_slash {
            &*SEPARATORS_WITH_SLASH
        } else {
            &*SEPARATORS
        };

        // (start, end, separator that follows)
        let mut bounds = Vec::new();
        let mut start = 0;
        for m in separators.find_iter(text) {
            bounds.push((start, m.start(), m.as_str()));
            start = m.end();
        }
        bounds.push((start, text.len(), ""));

        let mut spans = Vec::with_capacity(bounds.len());
        let mut i = 0;
        while i < bounds.len() {
            let (s, e, separator) = bounds[i];
            let piece = text[s..e].trim();

            if i + 1 < bounds.len() {
                let (next_s, next_e, _) = bounds[i + 1];
                let tokens = piece.split_whitespace().count();
                let joins_name = tokens == 1 || (tokens > 1 && separator.eq_ignore_ascii_case("and"));

                if joins_name
                    && !piece.contains(',')
                    && !classifier.is_company(piece)
                    && classifier.is_company(&text[next_s..next_e])
                {
                    spans.push(text[s..next_e].trim());
                    i += 2;
                    continue;
                }
            }

            spans.push(piece);
            i += 1;
        }

        spans
    }

    /// Comma handling inside one party span
    fn split_commas(
        &self,
        part: &str,
        classifier: &EntityClassifier,
        affixes: &AffixTable,
        out: &mut Vec<String>,
    ) {
        let segments: Vec<&str> = part
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if segments.len() <= 1 {
            if let Some(segment) = segments.first() {
                out.push(segment.to_string());
            }
            return;
        }

        let start_len = out.len();
        let mut i = 0;
        while i < segments.len() {
            let segment = segments[i];

            // "SMITH, JOHN, JR": a pure-suffix segment belongs to the party before it
            if out.len() > start_len && all_affixes(segment, affixes) {
                if let Some(previous) = out.last_mut() {
                    previous.push(' ');
                    previous.push_str(segment);
                }
                i += 1;
                continue;
            }

            // A lone "LAST, ..." pair is always one party
            let single_pair = segments.len() == 2 && !classifier.is_company(segments[1]);

            if i + 1 < segments.len()
                && self.is_surname_segment(segment, classifier, affixes)
                && (single_pair || self.is_given_segment(segments[i + 1], classifier, affixes))
            {
                out.push(format!("{}, {}", segment, segments[i + 1]));
                i += 2;
                continue;
            }

            out.push(segment.to_string());
            i += 1;
        }
    }

    /// At most one real surname token once particles and suffixes are ignored
    fn is_surname_segment(
        &self,
        segment: &str,
        classifier: &EntityClassifier,
        affixes: &AffixTable,
    ) -> bool {
        if classifier.is_company(segment) {
            return false;
        }

        let core = segment
            .split_whitespace()
            .filter(|t| !affixes.is_affix(t))
            .filter(|t| !self.particles.contains(&t.trim_end_matches('.').to_uppercase()))
            .count();

        core <= 1
    }

    fn is_given_segment(
        &self,
        segment: &str,
        classifier: &EntityClassifier,
        affixes: &AffixTable,
    ) -> bool {
        if classifier.is_company(segment) {
            return false;
        }

        let names = segment
            .split_whitespace()
            .filter(|t| !affixes.is_affix(t))
            .count();

        (1..=MAX_GIVEN_TOKENS).contains(&names)
    }
}

fn all_affixes(segment: &str, affixes: &AffixTable) -> bool {
    let mut tokens = segment.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|t| affixes.is_affix(t))
}

// ============================================================================
// TESTS
// ============================================================================
