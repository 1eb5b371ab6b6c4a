use super::non_blank;
use serde::Serialize;

/// Natural person owner.
///
/// First and last name are always non-empty. Optional parts serialize as
/// `null` rather than being omitted so consumers see a stable schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    prefix_name: Option<String>,
    suffix_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    mailing_address: Option<String>,
}

impl Person {
    /// None when either required part is blank
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Option<Self> {
        let first_name = first_name.into().trim().to_string();
        let last_name = last_name.into().trim().to_string();

        if first_name.is_empty() || last_name.is_empty() {
            return None;
        }

        Some(Person {
            first_name,
            last_name,
            middle_name: None,
            prefix_name: None,
            suffix_name: None,
            mailing_address: None,
        })
    }

    pub fn with_middle_name(mut self, middle: Option<String>) -> Self {
        self.middle_name = non_blank(middle);
        self
    }

    pub fn with_prefix_name(mut self, prefix: Option<String>) -> Self {
        self.prefix_name = non_blank(prefix);
        self
    }

    pub fn with_suffix_name(mut self, suffix: Option<String>) -> Self {
        self.suffix_name = non_blank(suffix);
        self
    }

    pub fn with_mailing_address(mut self, address: Option<String>) -> Self {
        if let Some(address) = non_blank(address) {
            self.mailing_address = Some(address);
        }
        self
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }

    pub fn prefix_name(&self) -> Option<&str> {
        self.prefix_name.as_deref()
    }

    pub fn suffix_name(&self) -> Option<&str> {
        self.suffix_name.as_deref()
    }

    pub fn mailing_address(&self) -> Option<&str> {
        self.mailing_address.as_deref()
    }

    pub(crate) fn backfill_from(&mut self, other: &Person) {
        if self.mailing_address.is_none() {
            self.mailing_address = other.mailing_address.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_first_and_last() {
        assert!(Person::new("", "Smith").is_none());
        assert!(Person::new("John", " ").is_none());
        assert!(Person::new("John", "Smith").is_some());
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let person = Person::new("John", "Smith")
            .unwrap()
            .with_middle_name(Some("  ".to_string()))
            .with_prefix_name(Some("Dr.".to_string()));

        assert_eq!(person.middle_name(), None);
        assert_eq!(person.prefix_name(), Some("Dr."));
    }
}
