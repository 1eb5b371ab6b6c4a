// 🧹 Normalizer - First pass over a raw owner string
//
// "SMITH JOHN ET AL (DECEASED)"   → "SMITH JOHN"
// "C/O RIVERSIDE HOLDINGS LLC 50%" → "RIVERSIDE HOLDINGS LLC"
//
// Output is a fixed point: normalizing it again changes nothing.

use crate::error::{ResolveError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static PERCENT_INTEREST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,3}(?:\.\d+)?\s*%(?:\s*INTEREST\b)?|%\s*INTEREST\b").unwrap()
});

static LEADING_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|\s)[%#*@]+").unwrap());

static COMMA_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:,\s*)+").unwrap());

/// Collapse every whitespace run (NBSP included) to one space and trim
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

fn bare_upper(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Drop bracketed asides, nested ones included. An unclosed bracket swallows
/// the rest of the string; an unmatched closer is dropped on its own.
fn strip_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' | '[' => {
                if depth == 0 {
                    out.push(' ');
                }
                depth += 1;
            }
            ')' | ']' => {
                if depth > 0 {
                    depth -= 1;
                }
                if depth == 0 {
                    out.push(' ');
                }
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out
}

pub(crate) fn is_stray_punct(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | ':' | '&' | '/' | '-' | '+')
}

// ============================================================================
// NORMALIZER
// ============================================================================

#[derive(Debug, Clone)]
pub struct Normalizer {
    /// Alternation of every configured noise phrase, None when the list is empty
    noise: Option<Regex>,

    /// Bare uppercase company suffixes for the interest-number rule
    company_suffixes: HashSet<String>,
}

impl Normalizer {
    pub fn new(noise_phrases: &[String], company_suffixes: &[String]) -> Result<Self> {
        let mut phrases: Vec<&String> = noise_phrases.iter().collect();
        // Longest first so "TRUSTEES" is not cut down to "TRUSTEE" + "S"
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternatives: Vec<String> = phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| phrase_pattern(p))
            .collect();

        let noise = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)(?:{})\.?", alternatives.join("|"));
            Some(Regex::new(&pattern).map_err(|e| {
                ResolveError::Config(format!("invalid noise phrase table: {}", e))
            })?)
        };

        Ok(Normalizer {
            noise,
            company_suffixes: company_suffixes.iter().map(|s| bare_upper(s)).collect(),
        })
    }

    /// Clean a raw owner string. Empty output means "no owner here".
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.clean_once(raw);

        // After the first pass every change removes text, so this ends
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, input: &str) -> String {
        let text = strip_brackets(input);
        let text = PERCENT_INTEREST.replace_all(&text, " ");

        let text = match &self.noise {
            Some(noise) => noise.replace_all(&text, " ").into_owned(),
            None => text.into_owned(),
        };

        let text = LEADING_MARKERS.replace_all(&text, "$1");
        let text = self.drop_interest_numbers(&text);
        let text = COMMA_SPACING.replace_all(&text, ", ");
        let text = collapse_whitespace(&text);
        let text = text.trim_matches(is_stray_punct);

        if !text.chars().any(|c| c.is_alphanumeric()) {
            return String::new();
        }

        text.to_string()
    }

    /// "ACME LLC 50" → "ACME LLC": a bare number right after an entity suffix
    /// is a share count, not part of the name
    fn drop_interest_numbers(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let numeric = token.chars().any(|c| c.is_ascii_digit())
                && token.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '/'));

            let after_suffix = i > 0 && self.company_suffixes.contains(&bare_upper(tokens[i - 1]));

            if numeric && after_suffix {
                continue;
            }
            kept.push(token);
        }

        kept.join(" ")
    }
}

/// Word-bounded, whitespace-tolerant pattern for one noise phrase
fn phrase_pattern(phrase: &str) -> String {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let starts_word = phrase.trim_start().starts_with(|c: char| c.is_alphanumeric());
    let ends_word = phrase.trim_end().ends_with(|c: char| c.is_alphanumeric());

    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        body,
        if ends_word { r"\b" } else { "" }
    )
}

// ============================================================================
// TESTS
// ============================================================================
