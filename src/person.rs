// 👤 Person Name Parser - first / middle / last from core tokens
//
// Ordering heuristics, highest precedence first:
//   1. "LAST, FIRST MIDDLE"           (comma form)
//   2. "LAST FIRST MIDDLE"            (ALL-CAPS tax-roll export)
//   3. "FIRST MIDDLE LAST"            (mixed case)
//   4. "& MARY" after "JOHN SMITH"    (carried surname)
//
// Order is ambiguous by nature; the strategy is configurable per jurisdiction
// and can be forced through the ParseContext.

use crate::affixes::AffixTable;
use crate::config::NameOrder;
use crate::data_quality::ReasonCode;
use crate::entities::Person;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Letters, spaces, hyphen, apostrophe and period only
static NAME_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{L}[\p{L} '.\-]*$").unwrap());

// ============================================================================
// PARSE CONTEXT
// ============================================================================

/// Context threaded between fragments of the same raw string.
///
/// Immutable: each step builds the next context instead of mutating shared
/// state, so documents can be resolved concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    previous_last_name: Option<String>,
    force_order: Option<NameOrder>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_previous_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.previous_last_name = Some(last_name.into());
        self
    }

    pub fn with_force_order(mut self, order: NameOrder) -> Self {
        self.force_order = Some(order);
        self
    }

    pub fn previous_last_name(&self) -> Option<&str> {
        self.previous_last_name.as_deref()
    }

    pub fn force_order(&self) -> Option<NameOrder> {
        self.force_order
    }
}

/// Successful parse. `affix_starved` means an affix was left inside the name
/// to keep enough tokens; the caller reports it for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonParse {
    pub person: Person,
    pub affix_starved: bool,
}

// ============================================================================
// PARSER
// ============================================================================

#[derive(Debug, Clone)]
pub struct PersonNameParser {
    affixes: AffixTable,
    particles: HashSet<String>,
    order: NameOrder,
}

impl PersonNameParser {
    pub fn new(affixes: AffixTable, particles: &[String], order: NameOrder) -> Self {
        PersonNameParser {
            affixes,
            particles: particles.iter().map(|p| p.trim().to_uppercase()).collect(),
            order,
        }
    }

    pub fn affixes(&self) -> &AffixTable {
        &self.affixes
    }

    /// Parse one fragment already classified as a person
    pub fn parse(&self, fragment: &str, ctx: &ParseContext) -> Result<PersonParse, ReasonCode> {
        match fragment.split_once(',') {
            Some((left, right)) => self.parse_comma_form(left, &right.replace(',', " ")),
            None => self.parse_ordered(&tokenize(fragment), ctx),
        }
    }

    fn parse_comma_form(&self, left: &str, right: &str) -> Result<PersonParse, ReasonCode> {
        let affixes = &self.affixes;
        let mut last_tokens = tokenize(left);
        let mut given = tokenize(right);

        // all() is true on empty lists too
        if last_tokens.iter().all(|t| affixes.is_affix(t)) {
            return Err(ReasonCode::PersonMissingLastName);
        }
        if given.iter().all(|t| affixes.is_affix(t)) {
            return Err(ReasonCode::PersonMissingFirstOrLast);
        }

        // "SMITH, DR JOHN" or "DR SMITH, JOHN"
        let mut prefix = None;
        let take = affixes.take_prefix(&given, 1);
        if take.prefix.is_some() {
            prefix = take.prefix;
            given.drain(..take.consumed);
        } else {
            let take = affixes.take_prefix(&last_tokens, 1);
            if take.prefix.is_some() {
                prefix = take.prefix;
                last_tokens.drain(..take.consumed);
            }
        }

        // Suffix may trail either side: "SMITH, JOHN JR" / "SMITH JR, JOHN"
        let given_suffix = affixes.take_suffix(&given, 1);
        given.truncate(given.len() - given_suffix.consumed);
        let last_suffix = affixes.take_suffix(&last_tokens, 1);
        last_tokens.truncate(last_tokens.len() - last_suffix.consumed);

        let suffix = affixes.preferred_suffix(given_suffix.suffix, last_suffix.suffix);
        let starved = given_suffix.starved || last_suffix.starved;

        self.build(
            &given[0],
            &given[1..].join(" "),
            &last_tokens.join(" "),
            prefix,
            suffix,
            starved,
        )
    }

    fn parse_ordered(&self, tokens: &[String], ctx: &ParseContext) -> Result<PersonParse, ReasonCode> {
        let carried = ctx.previous_last_name().filter(|s| !s.trim().is_empty());
        let min_remaining = if carried.is_some() { 1 } else { 2 };

        let extraction = self.affixes.extract(tokens, min_remaining);
        let core = &extraction.remaining;

        if core.is_empty() {
            return Err(ReasonCode::InsufficientNameParts);
        }

        if let Some(surname) = carried {
            if takes_carried_surname(core) {
                return self.build(
                    &core[0],
                    &core[1..].join(" "),
                    surname,
                    extraction.prefix,
                    extraction.suffix,
                    extraction.starved,
                );
            }
        }

        if core.len() < 2 {
            return Err(ReasonCode::InsufficientNameParts);
        }

        let order = self.resolve_order(ctx, core, extraction.prefix.is_some());
        let (first, middle, last) = match order {
            NameOrder::LastFirst => self.split_last_first(core),
            _ => self.split_first_last(core),
        };

        self.build(
            &first,
            &middle,
            &last,
            extraction.prefix,
            extraction.suffix,
            extraction.starved,
        )
    }

    /// Turn Auto into a concrete order for this token run
    fn resolve_order(&self, ctx: &ParseContext, core: &[String], had_prefix: bool) -> NameOrder {
        match ctx.force_order().unwrap_or(self.order) {
            NameOrder::Auto => {
                // "DR JAMES T OBRIEN": titles and a second-position initial
                // only occur in display order
                let initial_second = core.len() >= 3
                    && is_initial(&core[1])
                    && !is_initial(&core[core.len() - 1]);

                if had_prefix || initial_second {
                    NameOrder::FirstLast
                } else if is_all_caps(core) {
                    NameOrder::LastFirst
                } else {
                    NameOrder::FirstLast
                }
            }
            forced => forced,
        }
    }

    fn is_particle(&self, token: &str) -> bool {
        self.particles
            .contains(&token.trim_end_matches('.').to_uppercase())
    }

    /// LAST FIRST MIDDLE, with leading particles bound to the surname
    fn split_last_first(&self, core: &[String]) -> (String, String, String) {
        let mut k = 0;
        while k + 1 < core.len() && self.is_particle(&core[k]) {
            k += 1;
        }
        k += 1;
        if k >= core.len() {
            k = 1;
        }

        (core[k].clone(), core[k + 1..].join(" "), core[..k].join(" "))
    }

    /// FIRST MIDDLE LAST, with particles before the last token bound to it
    fn split_first_last(&self, core: &[String]) -> (String, String, String) {
        let mut j = core.len() - 1;
        while j > 1 && self.is_particle(&core[j - 1]) {
            j -= 1;
        }

        (core[0].clone(), core[1..j].join(" "), core[j..].join(" "))
    }

    fn build(
        &self,
        first: &str,
        middle: &str,
        last: &str,
        prefix: Option<String>,
        suffix: Option<String>,
        affix_starved: bool,
    ) -> Result<PersonParse, ReasonCode> {
        let first = format_component(first)?;
        let last = format_component(last)?;
        let middle = if middle.trim().is_empty() {
            None
        } else {
            Some(format_component(middle)?)
        };

        let person = Person::new(first, last)
            .ok_or(ReasonCode::PersonMissingFirstOrLast)?
            .with_middle_name(middle)
            .with_prefix_name(prefix)
            .with_suffix_name(suffix);

        Ok(PersonParse {
            person,
            affix_starved,
        })
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn tokenize(s: &str) -> Vec<String> {
    s.split_whitespace().map(|t| t.to_string()).collect()
}

/// One letter, optionally followed by a period: "T", "T."
fn is_initial(token: &str) -> bool {
    let bare = token.trim_end_matches('.');
    let mut chars = bare.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

fn is_all_caps(tokens: &[String]) -> bool {
    let mut any_letter = false;
    for c in tokens.iter().flat_map(|t| t.chars()) {
        if c.is_lowercase() {
            return false;
        }
        if c.is_alphabetic() {
            any_letter = true;
        }
    }
    any_letter
}

/// Only a bare given name (optionally with an initial) borrows the surname
fn takes_carried_surname(core: &[String]) -> bool {
    core.len() == 1 || (core.len() == 2 && is_initial(&core[1]))
}

/// Capitalize the first letter of each word and after a hyphen, lowercase the rest
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut capitalize = true;
            for c in word.chars() {
                if capitalize && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                    capitalize = false;
                } else {
                    out.extend(c.to_lowercase());
                }
                if c == '-' {
                    capitalize = true;
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_component(raw: &str) -> Result<String, ReasonCode> {
    let cleaned = raw.trim().trim_matches(',');
    if cleaned.is_empty() {
        return Err(ReasonCode::PersonMissingFirstOrLast);
    }

    let formatted = title_case(cleaned);
    if !NAME_SHAPE.is_match(&formatted) {
        return Err(ReasonCode::AmbiguousOrIncompletePersonName);
    }

    Ok(formatted)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;

    fn parser() -> PersonNameParser {
        parser_with(NameOrder::Auto)
    }

    fn parser_with(order: NameOrder) -> PersonNameParser {
        let config = ResolverConfig::default();
        PersonNameParser::new(
            AffixTable::new(&config.affixes, &config.suffix_priority),
            &config.surname_particles,
            order,
        )
    }

    fn parse(fragment: &str) -> Person {
        parser().parse(fragment, &ParseContext::new()).unwrap().person
    }

    #[test]
    fn test_comma_form() {
        let person = parse("SMITH, JOHN ROBERT");
        assert_eq!(person.first_name(), "John");
        assert_eq!(person.last_name(), "Smith");
        assert_eq!(person.middle_name(), Some("Robert"));
        assert_eq!(person.prefix_name(), None);
        assert_eq!(person.suffix_name(), None);
    }

    #[test]
    fn test_comma_form_suffix_on_either_side() {
        let person = parse("SMITH JR, JOHN");
        assert_eq!(person.last_name(), "Smith");
        assert_eq!(person.first_name(), "John");
        assert_eq!(person.suffix_name(), Some("Jr."));

        let person = parse("SMITH, JOHN A III");
        assert_eq!(person.middle_name(), Some("A"));
        assert_eq!(person.suffix_name(), Some("III"));

        let person = parse("Smith MD, John Sr");
        assert_eq!(person.suffix_name(), Some("Sr."));
    }

    #[test]
    fn test_comma_form_prefix() {
        let person = parse("SMITH, MRS JANE");
        assert_eq!(person.prefix_name(), Some("Mrs."));
        assert_eq!(person.first_name(), "Jane");
    }

    #[test]
    fn test_comma_form_missing_parts() {
        let p = parser();
        let ctx = ParseContext::new();
        assert_eq!(p.parse("JR, JOHN", &ctx), Err(ReasonCode::PersonMissingLastName));
        assert_eq!(p.parse("SMITH, JR", &ctx), Err(ReasonCode::PersonMissingFirstOrLast));
    }

    #[test]
    fn test_all_caps_is_last_first() {
        let person = parse("DOE JANE MARIE");
        assert_eq!(person.last_name(), "Doe");
        assert_eq!(person.first_name(), "Jane");
        assert_eq!(person.middle_name(), Some("Marie"));
    }

    #[test]
    fn test_mixed_case_is_first_last() {
        let person = parse("Jane Marie Doe");
        assert_eq!(person.first_name(), "Jane");
        assert_eq!(person.middle_name(), Some("Marie"));
        assert_eq!(person.last_name(), "Doe");
    }

    #[test]
    fn test_prefix_and_suffix_extraction() {
        let person = parse("DR. JAMES T O'BRIEN JR");
        assert_eq!(person.prefix_name(), Some("Dr."));
        assert_eq!(person.first_name(), "James");
        assert_eq!(person.middle_name(), Some("T"));
        assert_eq!(person.last_name(), "O'brien");
        assert_eq!(person.suffix_name(), Some("Jr."));
    }

    #[test]
    fn test_generational_suffix_preferred() {
        let person = parse("SMITH JOHN JR MD");
        assert_eq!(person.last_name(), "Smith");
        assert_eq!(person.first_name(), "John");
        assert_eq!(person.suffix_name(), Some("Jr."));
    }

    #[test]
    fn test_surname_particles() {
        let person = parse("VAN DYKE JOHN");
        assert_eq!(person.last_name(), "Van Dyke");
        assert_eq!(person.first_name(), "John");

        let person = parse("Maria Elena de la Cruz");
        assert_eq!(person.first_name(), "Maria");
        assert_eq!(person.middle_name(), Some("Elena"));
        assert_eq!(person.last_name(), "De La Cruz");
    }

    #[test]
    fn test_carried_surname() {
        let p = parser();
        let ctx = ParseContext::new().with_previous_last_name("Smith");

        let person = p.parse("MARY", &ctx).unwrap().person;
        assert_eq!(person.first_name(), "Mary");
        assert_eq!(person.last_name(), "Smith");

        let person = p.parse("MARY K", &ctx).unwrap().person;
        assert_eq!(person.middle_name(), Some("K"));
        assert_eq!(person.last_name(), "Smith");

        let person = p.parse("MRS MARY", &ctx).unwrap().person;
        assert_eq!(person.prefix_name(), Some("Mrs."));
        assert_eq!(person.first_name(), "Mary");
    }

    #[test]
    fn test_full_name_ignores_carried_surname() {
        let ctx = ParseContext::new().with_previous_last_name("Doe");
        let person = parser().parse("SMITH MARY", &ctx).unwrap().person;
        assert_eq!(person.last_name(), "Smith");
        assert_eq!(person.first_name(), "Mary");
    }

    #[test]
    fn test_insufficient_name_parts() {
        let p = parser();
        assert_eq!(
            p.parse("SMITH", &ParseContext::new()),
            Err(ReasonCode::InsufficientNameParts)
        );
        assert_eq!(p.parse("DR", &ParseContext::new()), Err(ReasonCode::InsufficientNameParts));
    }

    #[test]
    fn test_affix_starvation_is_flagged() {
        let result = parser().parse("SMITH JR", &ParseContext::new()).unwrap();
        assert!(result.affix_starved);
        assert_eq!(result.person.suffix_name(), None);
    }

    #[test]
    fn test_implausible_component_fails() {
        assert_eq!(
            parser().parse("SMITH J@HN", &ParseContext::new()),
            Err(ReasonCode::AmbiguousOrIncompletePersonName)
        );
    }

    #[test]
    fn test_forced_order() {
        let ctx = ParseContext::new().with_force_order(NameOrder::FirstLast);
        let person = parser().parse("JOHN SMITH", &ctx).unwrap().person;
        assert_eq!(person.first_name(), "John");
        assert_eq!(person.last_name(), "Smith");

        let person = parser_with(NameOrder::LastFirst)
            .parse("Smith John", &ParseContext::new())
            .unwrap()
            .person;
        assert_eq!(person.last_name(), "Smith");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("O'BRIEN"), "O'brien");
        assert_eq!(title_case("SMITH-JONES"), "Smith-Jones");
        assert_eq!(title_case("de la cruz"), "De La Cruz");
        assert_eq!(title_case("T."), "T.");
    }
}
