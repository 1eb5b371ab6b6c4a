// Owner Entities
//
// A parsed owner is decided once, by the classifier, to be either a Person or
// a Company. Nothing downstream re-infers the tag from which fields are set.
//
// Both constructors refuse empty required fields, so an invalid owner cannot
// exist; the parser reports an InvalidFragment instead.

pub mod company;
pub mod person;

pub use company::Company;
pub use person::Person;

use serde::Serialize;

// ============================================================================
// PARSED OWNER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParsedOwner {
    Person(Person),
    Company(Company),
}

impl ParsedOwner {
    /// Lowercase equality key used only for dedup.
    ///
    /// `company:<name>` or `person:<prefix>|<first>|<middle>|<last>|<suffix>`
    pub fn canonical_key(&self) -> String {
        match self {
            ParsedOwner::Company(c) => format!("company:{}", c.name()).to_lowercase(),
            ParsedOwner::Person(p) => format!(
                "person:{}|{}|{}|{}|{}",
                p.prefix_name().unwrap_or(""),
                p.first_name(),
                p.middle_name().unwrap_or(""),
                p.last_name(),
                p.suffix_name().unwrap_or(""),
            )
            .to_lowercase(),
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self, ParsedOwner::Person(_))
    }

    pub fn as_person(&self) -> Option<&Person> {
        match self {
            ParsedOwner::Person(p) => Some(p),
            ParsedOwner::Company(_) => None,
        }
    }

    pub fn as_company(&self) -> Option<&Company> {
        match self {
            ParsedOwner::Company(c) => Some(c),
            ParsedOwner::Person(_) => None,
        }
    }

    pub fn mailing_address(&self) -> Option<&str> {
        match self {
            ParsedOwner::Person(p) => p.mailing_address(),
            ParsedOwner::Company(c) => c.mailing_address(),
        }
    }

    /// Attach a mailing address; blank input is ignored
    pub fn with_mailing_address(self, address: Option<String>) -> Self {
        match self {
            ParsedOwner::Person(p) => ParsedOwner::Person(p.with_mailing_address(address)),
            ParsedOwner::Company(c) => ParsedOwner::Company(c.with_mailing_address(address)),
        }
    }

    /// Fill optional fields that are missing here from a duplicate
    pub fn backfill_from(&mut self, other: &ParsedOwner) {
        match (self, other) {
            (ParsedOwner::Person(kept), ParsedOwner::Person(later)) => kept.backfill_from(later),
            (ParsedOwner::Company(kept), ParsedOwner::Company(later)) => kept.backfill_from(later),
            _ => {}
        }
    }
}

impl From<Person> for ParsedOwner {
    fn from(person: Person) -> Self {
        ParsedOwner::Person(person)
    }
}

impl From<Company> for ParsedOwner {
    fn from(company: Company) -> Self {
        ParsedOwner::Company(company)
    }
}

/// Trim and drop blank optional values
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================
