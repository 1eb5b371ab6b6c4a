// 🔍 Deduplicator - One entry per canonical key within a group
//
// First occurrence wins its position; later duplicates may only fill in
// optional fields the kept record is missing (mailing address).

use crate::entities::ParsedOwner;
use std::collections::HashMap;

// ============================================================================
// DEDUPLICATOR
// ============================================================================

/// Order-preserving dedup for one date bucket (or the current-owner set)
#[derive(Debug, Default)]
pub struct Deduplicator {
    /// canonical key → index into `owners`
    seen: HashMap<String, usize>,

    owners: Vec<ParsedOwner>,

    /// How many duplicates were folded into an earlier record
    merged: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one owner. Returns true when it was new to this group.
    pub fn push(&mut self, owner: ParsedOwner) -> bool {
        let key = owner.canonical_key();
        if key.is_empty() {
            return false;
        }

        match self.seen.get(&key) {
            Some(&index) => {
                self.owners[index].backfill_from(&owner);
                self.merged += 1;
                false
            }
            None => {
                self.seen.insert(key, self.owners.len());
                self.owners.push(owner);
                true
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = ParsedOwner>>(&mut self, owners: I) {
        for owner in owners {
            self.push(owner);
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn merged(&self) -> usize {
        self.merged
    }

    pub fn into_owners(self) -> Vec<ParsedOwner> {
        self.owners
    }
}

/// Dedup a finished list in one call
pub fn dedup_owners(owners: Vec<ParsedOwner>) -> Vec<ParsedOwner> {
    let mut dedup = Deduplicator::new();
    dedup.extend(owners);
    dedup.into_owners()
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

    fn company(name: &str) -> ParsedOwner {
        Company::new(name).unwrap().into()
    }

    #[test]
    fn test_identical_keys_collapse() {
        let owners = dedup_owners(vec![
            person("John", "Smith"),
            company("ACME LLC"),
            person("John", "Smith"),
        ]);

        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0], person("John", "Smith"));
        assert_eq!(owners[1], company("ACME LLC"));
    }

    #[test]
    fn test_company_dedup_is_case_insensitive() {
        let owners = dedup_owners(vec![company("Acme LLC"), company("ACME LLC")]);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].as_company().unwrap().name(), "Acme LLC");
    }

    #[test]
    fn test_person_key_includes_every_name_part() {
        let junior: ParsedOwner = Person::new("John", "Smith")
            .unwrap()
            .with_suffix_name(Some("Jr.".to_string()))
            .into();

        let owners = dedup_owners(vec![person("John", "Smith"), junior]);
        assert_eq!(owners.len(), 2);
    }

    #[test]
    fn test_later_duplicate_backfills_mailing_address() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.push(person("Jane", "Doe")));

        let with_address: ParsedOwner = Person::new("Jane", "Doe")
            .unwrap()
            .with_mailing_address(Some("PO BOX 12, OCALA FL".to_string()))
            .into();
        assert!(!dedup.push(with_address));

        assert_eq!(dedup.len(), 1);
        assert_eq!(dedup.merged(), 1);
        assert!(dedup.contains_key("person:|jane||doe|"));

        let owners = dedup.into_owners();
        assert_eq!(owners[0].mailing_address(), Some("PO BOX 12, OCALA FL"));
    }

    #[test]
    fn test_empty_group() {
        let dedup = Deduplicator::new();
        assert!(dedup.is_empty());
        assert!(dedup.into_owners().is_empty());
    }
}
